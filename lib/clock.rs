use crate::chess::Color;
use derive_more::{Display, Error};
use std::time::{Duration, Instant};

/// The reason why a side can no longer move.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display(fmt = "{} ran out of time", _0)]
pub struct Timeout(#[error(not(source))] pub Color);

/// A two sided countdown clock.
///
/// At most one side runs at any time.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Clock {
    budget: Duration,
    white: Duration,
    black: Duration,
    running: Option<(Color, Instant)>,
}

impl Clock {
    /// Constructs a paused clock with `budget` remaining for each side.
    pub fn new(budget: Duration) -> Self {
        Clock {
            budget,
            white: budget,
            black: budget,
            running: None,
        }
    }

    /// The time each side started with.
    #[inline]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// The side whose time is running, if any.
    #[inline]
    pub fn running(&self) -> Option<Color> {
        self.running.map(|(c, _)| c)
    }

    /// Starts counting down `color`'s time, pausing the other side.
    pub fn start(&mut self, color: Color) {
        self.stop();
        self.running = Some((color, Instant::now()));
    }

    /// Pauses the running side, if any.
    pub fn stop(&mut self) {
        if let Some((color, since)) = self.running.take() {
            let remaining = self.slot(color);
            *remaining = remaining.saturating_sub(since.elapsed());
        }
    }

    /// Pauses the running side and starts the other one.
    ///
    /// Does nothing if the clock is paused.
    pub fn switch(&mut self) {
        if let Some(color) = self.running() {
            self.start(!color);
        }
    }

    /// Restores the full budget to both sides and pauses the clock.
    pub fn reset(&mut self) {
        *self = Clock::new(self.budget);
    }

    /// The time `color` has left.
    pub fn remaining(&self, color: Color) -> Duration {
        let stored = match color {
            Color::White => self.white,
            Color::Black => self.black,
        };

        match self.running {
            Some((c, since)) if c == color => stored.saturating_sub(since.elapsed()),
            _ => stored,
        }
    }

    /// Checks whether `color` still has time left.
    pub fn elapsed(&self, color: Color) -> Result<(), Timeout> {
        if self.remaining(color).is_zero() {
            Err(Timeout(color))
        } else {
            Ok(())
        }
    }

    /// The side that has run out of time, if any.
    pub fn flagged(&self) -> Option<Color> {
        [Color::White, Color::Black]
            .into_iter()
            .find(|&c| self.elapsed(c).is_err())
    }

    fn slot(&mut self, color: Color) -> &mut Duration {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
}
