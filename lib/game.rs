use crate::chess::{Color, IllegalMove, Move, ParseMoveError, Position};
use crate::{clock::Clock, settings::Settings};
use derive_more::{Display, Error, From};
use tracing::{info, instrument};

/// How a game ended.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Outcome {
    /// The loser ran out of time.
    #[display(fmt = "{} wins on time", winner)]
    Timeout { winner: Color },
}

impl Outcome {
    /// The winning side.
    #[inline]
    pub fn winner(&self) -> Color {
        match *self {
            Outcome::Timeout { winner } => winner,
        }
    }
}

/// The reason why a move was rejected.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error, From)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum GameError {
    #[display(fmt = "the game has already ended, {}", _0)]
    GameOver(#[error(not(source))] Outcome),

    #[display(fmt = "illegal move, {}", _0)]
    IllegalMove(IllegalMove),
}

/// A game session between two players.
///
/// Owns the [`Position`] and, for timed games, the [`Clock`].
#[derive(Debug, Clone)]
pub struct Game {
    settings: Settings,
    position: Position,
    clock: Option<Clock>,
    outcome: Option<Outcome>,
}

impl Game {
    /// Starts a new game with the given [`Settings`].
    pub fn new(settings: Settings) -> Self {
        let clock = settings.timer.then(|| Clock::new(settings.time));

        let mut game = Game {
            settings,
            position: Position::default(),
            clock,
            outcome: None,
        };

        game.new_game();
        game
    }

    /// The configuration of this game.
    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current position.
    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// The clock, if the game is timed.
    #[inline]
    pub fn clock(&self) -> Option<&Clock> {
        self.clock.as_ref()
    }

    /// How the game ended, if it has.
    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Plays a move input by the local player, if legal.
    #[instrument(level = "trace", skip(self), err)]
    pub fn play(&mut self, m: Move) -> Result<(), GameError> {
        if let Some(o) = self.outcome {
            return Err(GameError::GameOver(o));
        }

        self.position.play(m)?;
        self.restart_clock();
        info!(%m, turn = %self.position.turn(), "played");

        Ok(())
    }

    /// Mirrors a move token received from the remote peer.
    ///
    /// The peer is trusted to have validated the move, so it is applied unchecked.
    #[instrument(level = "trace", skip(self), err)]
    pub fn mirror(&mut self, token: &str) -> Result<Move, ParseMoveError> {
        let m: Move = token.parse()?;
        self.position.apply_unchecked(m);
        self.restart_clock();
        info!(%m, turn = %self.position.turn(), "mirrored");

        Ok(m)
    }

    /// Restores the initial position and the full time budget.
    #[instrument(level = "trace", skip(self))]
    pub fn new_game(&mut self) {
        self.position.reset();
        self.outcome = None;

        if let Some(clock) = &mut self.clock {
            clock.reset();
            clock.start(Color::White);
        }
    }

    /// Checks the clock, ending the game if the side to move ran out of time.
    pub fn tick(&mut self) -> Option<Outcome> {
        if self.outcome.is_none() {
            if let Some(clock) = &mut self.clock {
                if let Some(loser) = clock.flagged() {
                    clock.stop();
                    let outcome = Outcome::Timeout { winner: !loser };
                    info!(%outcome, "game over");
                    self.outcome = Some(outcome);
                }
            }
        }

        self.outcome
    }

    /// A human readable announcement of the outcome.
    pub fn announce(&self, outcome: Outcome) -> String {
        let winner = self.settings.name(outcome.winner());

        match outcome {
            Outcome::Timeout { .. } => format!("{} wins - time out!", winner),
        }
    }

    fn restart_clock(&mut self) {
        if let Some(clock) = &mut self.clock {
            if clock.running().is_some() {
                clock.start(self.position.turn());
            }
        }
    }
}
