use crate::chess::{ParseSquareError, Square};
use derive_more::{Display, Error};
use std::str::FromStr;

/// A chess move.
///
/// Moves are relayed between peers in pure coordinate notation, a 4-character token
/// `<file><rank><file><rank>` such as `e2e4`.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{}{}", _0, _1)]
pub struct Move(Square, Square);

impl Move {
    /// Constructs [`Move`] from the source and destination squares.
    #[inline]
    pub fn new(whence: Square, whither: Square) -> Self {
        Move(whence, whither)
    }

    /// The source [`Square`].
    #[inline]
    pub fn whence(&self) -> Square {
        self.0
    }

    /// The destination [`Square`].
    #[inline]
    pub fn whither(&self) -> Square {
        self.1
    }
}

/// The reason why parsing [`Move`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
pub enum ParseMoveError {
    #[display(fmt = "failed to parse move, expected exactly 4 characters")]
    InvalidLength,

    #[display(fmt = "failed to parse move, invalid 'from' square")]
    InvalidFromSquare(ParseSquareError),

    #[display(fmt = "failed to parse move, invalid 'to' square")]
    InvalidToSquare(ParseSquareError),
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use ParseMoveError::*;

        if s.chars().count() != 4 {
            return Err(InvalidLength);
        }

        let i = s.char_indices().nth(2).map_or_else(|| s.len(), |(i, _)| i);

        Ok(Move(
            s[..i].parse().map_err(InvalidFromSquare)?,
            s[i..].parse().map_err(InvalidToSquare)?,
        ))
    }
}
