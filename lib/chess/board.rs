use crate::chess::{Color, File, Piece, Rank, Role, Square};
use std::{fmt, ops::Index};

/// The piece placement on the board.
///
/// This type does not validate whether the placement it holds is valid
/// according to any set of chess rules.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
}

// We provide a custom implementation of Arbitrary rather than deriving,
// otherwise proptest overflows the stack generating large arrays.
#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Board {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Board>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::prelude::*;

        proptest::collection::vec(any::<Option<Piece>>(), 64)
            .prop_map(|v| {
                let mut board = Board::empty();

                board
                    .squares
                    .iter_mut()
                    .flatten()
                    .zip(v)
                    .for_each(|(s, p)| *s = p);

                board
            })
            .boxed()
    }
}

impl Board {
    const BACK_RANK: [Role; 8] = [
        Role::Rook,
        Role::Knight,
        Role::Bishop,
        Role::Queen,
        Role::King,
        Role::Bishop,
        Role::Knight,
        Role::Rook,
    ];

    /// A board with no pieces on it.
    #[inline]
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
        }
    }

    /// Places `piece` on `sq`, or clears it if `None`, returning the previous occupant.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        let slot = &mut self.squares[usize::from(sq.row())][usize::from(sq.col())];
        std::mem::replace(slot, piece)
    }

    /// Builder style version of [`Board::set`].
    #[inline]
    pub fn with(mut self, sq: Square, piece: Piece) -> Self {
        self.set(sq, Some(piece));
        self
    }

    /// Whether `sq` holds no piece.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self[sq].is_none()
    }

    /// An iterator over occupied squares and their pieces.
    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|sq| Some((sq, self[sq]?)))
    }
}

/// The standard initial placement.
impl Default for Board {
    fn default() -> Self {
        let mut board = Board::empty();

        for c in [Color::White, Color::Black] {
            for (f, r) in File::iter().zip(Self::BACK_RANK) {
                board.set(Square::new(f, c.back_rank()), Some(Piece::new(c, r)));
                board.set(Square::new(f, c.pawn_rank()), Some(Piece::new(c, Role::Pawn)));
            }
        }

        board
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    #[inline]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.squares[usize::from(sq.row())][usize::from(sq.col())]
    }
}

/// Renders the board as a grid, with black's back rank on top.
///
/// Pieces are printed as letters, or as figurines if alternate.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "  ")?;
        for file in File::iter() {
            write!(f, "   {}", file)?;
        }

        writeln!(f)?;
        writeln!(f, "   +---+---+---+---+---+---+---+---+")?;

        for rank in Rank::iter().rev() {
            write!(f, " {} |", rank)?;

            for file in File::iter() {
                match self[Square::new(file, rank)] {
                    Some(piece) if f.alternate() => write!(f, " {:#} |", piece)?,
                    Some(piece) => write!(f, " {} |", piece)?,
                    None => write!(f, "   |")?,
                }
            }

            writeln!(f, " {}", rank)?;
            writeln!(f, "   +---+---+---+---+---+---+---+---+")?;
        }

        write!(f, "  ")?;
        for file in File::iter() {
            write!(f, "   {}", file)?;
        }

        Ok(())
    }
}
