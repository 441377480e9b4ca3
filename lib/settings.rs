use crate::chess::Color;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, time::Duration};

#[cfg(test)]
use proptest::prelude::*;

/// Configuration for a game between two players.
///
/// Serialized in [RON], with durations in [humantime] notation, e.g.
/// `(white: "Alice", timer: true, time: "5m")`.
///
/// [RON]: https://crates.io/crates/ron
/// [humantime]: https://crates.io/crates/humantime
#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, rename = "settings", default)]
pub struct Settings {
    /// The display name of the player with the white pieces.
    #[cfg_attr(test, strategy("[A-Za-z][A-Za-z ]{0,15}"))]
    pub white: String,

    /// The display name of the player with the black pieces.
    #[cfg_attr(test, strategy("[A-Za-z][A-Za-z ]{0,15}"))]
    pub black: String,

    /// Whether each player's time is limited.
    pub timer: bool,

    /// The time each player has for the whole game.
    #[cfg_attr(test, strategy((1u64..=180).prop_map(|m| Duration::from_secs(m * 60))))]
    #[serde(with = "humantime_serde")]
    pub time: Duration,
}

impl Settings {
    const WHITE: &'static str = "White Player";
    const BLACK: &'static str = "Black Player";

    /// The display name of the player with the given [`Color`].
    ///
    /// Blank names fall back to a generic one.
    pub fn name(&self, color: Color) -> &str {
        let (name, fallback) = match color {
            Color::White => (&self.white, Self::WHITE),
            Color::Black => (&self.black, Self::BLACK),
        };

        match name.trim() {
            "" => fallback,
            name => name,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            white: Self::WHITE.into(),
            black: Self::BLACK.into(),
            timer: false,
            time: Duration::from_secs(10 * 60),
        }
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ron::ser::to_string(self).map_err(|_| fmt::Error)?)
    }
}

/// The reason why parsing [`Settings`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse settings")]
pub struct ParseSettingsError(ron::de::SpannedError);

impl FromStr for Settings {
    type Err = ParseSettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}
