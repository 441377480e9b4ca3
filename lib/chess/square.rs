use crate::chess::{File, ParseFileError, ParseRankError, Rank};
use derive_more::{Display, Error, From};
use std::ops::Sub;
use std::{fmt, str::FromStr};

/// A square on the chess board.
///
/// Squares are addressed either by [`File`] and [`Rank`], or by (row, col) where
/// row 0 is rank `8` and col 0 is file `a`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Square {
    file: File,
    rank: Rank,
}

impl Square {
    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    #[inline]
    pub fn new(file: File, rank: Rank) -> Self {
        Square { file, rank }
    }

    /// Constructs [`Square`] from (row, col), or returns `None` if out of range.
    #[inline]
    pub fn from_coords(row: u8, col: u8) -> Option<Self> {
        Some(Square::new(File::from_col(col)?, Rank::from_row(row)?))
    }

    /// This square's [`File`].
    #[inline]
    pub fn file(&self) -> File {
        self.file
    }

    /// This square's [`Rank`].
    #[inline]
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// This square's row index.
    #[inline]
    pub fn row(&self) -> u8 {
        self.rank.row()
    }

    /// This square's column index.
    #[inline]
    pub fn col(&self) -> u8 {
        self.file.col()
    }

    /// The square `dr` rows and `dc` columns away, if still on the board.
    #[inline]
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row().checked_add_signed(dr)?;
        let col = self.col().checked_add_signed(dc)?;
        Square::from_coords(row, col)
    }

    /// An iterator over all squares in row-major order, starting at `a8`.
    #[inline]
    pub fn iter() -> impl Iterator<Item = Self> {
        Rank::iter()
            .rev()
            .flat_map(|r| File::iter().map(move |f| Square::new(f, r)))
    }
}

/// The (row, col) displacement from `rhs` to `self`.
impl Sub for Square {
    type Output = (i8, i8);

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        (
            self.row() as i8 - rhs.row() as i8,
            self.col() as i8 - rhs.col() as i8,
        )
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.file, f)?;
        fmt::Display::fmt(&self.rank, f)?;
        Ok(())
    }
}

/// The reason why parsing [`Square`] failed.
#[derive(Debug, Display, Clone, Eq, PartialEq, Error, From)]
pub enum ParseSquareError {
    #[display(fmt = "failed to parse square, {}", _0)]
    InvalidFile(ParseFileError),
    #[display(fmt = "failed to parse square, {}", _0)]
    InvalidRank(ParseRankError),
}

impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let i = s.char_indices().nth(1).map_or_else(|| s.len(), |(i, _)| i);
        Ok(Square::new(s[..i].parse()?, s[i..].parse()?))
    }
}
