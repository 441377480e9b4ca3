use crate::chess::{Board, Color, Move, Piece, Ray, Role, Square};
use arrayvec::ArrayVec;
use derive_more::{Display, Error};
use std::fmt;

/// The reason why a [`Move`] is illegal in a [`Position`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[error(ignore)]
pub enum IllegalMove {
    #[display(fmt = "there is no piece on {}", _0)]
    NoPiece(Square),

    #[display(fmt = "it is not {}'s turn", _0)]
    WrongTurn(Color),

    #[display(fmt = "{} is occupied by a {} piece", _0, _1)]
    SelfCapture(Square, Color),

    #[display(fmt = "the path is blocked on {}", _0)]
    BlockedPath(Square),

    #[display(fmt = "a {} cannot move like that", _0)]
    IllegalGeometry(Piece),
}

/// The current position on the board.
///
/// Validates turn ownership and the movement geometry of every piece, but
/// never whether a move leaves a king under attack.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Position {
    board: Board,
    turn: Color,
}

/// The standard initial position with white to move.
impl Default for Position {
    fn default() -> Self {
        Position {
            board: Board::default(),
            turn: Color::White,
        }
    }
}

impl Position {
    /// Constructs [`Position`] from an arbitrary piece placement.
    #[inline]
    pub fn new(board: Board, turn: Color) -> Self {
        Position { board, turn }
    }

    /// The piece placement.
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The piece on `sq`, if any.
    #[inline]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.board[sq]
    }

    /// Restores the standard initial position with white to move.
    pub fn reset(&mut self) {
        *self = Position::default();
    }

    /// Validates `m`, returning the piece that would move.
    pub fn validate(&self, m: Move) -> Result<Piece, IllegalMove> {
        let (whence, whither) = (m.whence(), m.whither());
        let piece = self.piece_on(whence).ok_or(IllegalMove::NoPiece(whence))?;

        if piece.color() != self.turn {
            return Err(IllegalMove::WrongTurn(piece.color()));
        }

        match self.piece_on(whither) {
            Some(p) if p.color() == piece.color() => {
                return Err(IllegalMove::SelfCapture(whither, p.color()))
            }
            _ => {}
        }

        let (dr, dc) = whither - whence;

        let (straight, diagonal) = (dr == 0 || dc == 0, dr.abs() == dc.abs());

        let reachable = match piece.role() {
            Role::Pawn => return self.validate_pawn(piece, m).map(|()| piece),
            Role::Knight => matches!((dr.abs(), dc.abs()), (2, 1) | (1, 2)),
            Role::King => dr.abs() <= 1 && dc.abs() <= 1,
            Role::Rook => straight,
            Role::Bishop => diagonal,
            Role::Queen => straight || diagonal,
        };

        if !reachable {
            return Err(IllegalMove::IllegalGeometry(piece));
        }

        if piece.role().is_sliding() {
            self.clear(m)?;
        }

        Ok(piece)
    }

    /// Whether `m` is legal, without playing it.
    #[inline]
    pub fn check_move(&self, m: Move) -> bool {
        self.validate(m).is_ok()
    }

    /// Plays `m` if legal, otherwise returns the reason why not.
    ///
    /// The position is left untouched if the move is illegal.
    pub fn play(&mut self, m: Move) -> Result<(), IllegalMove> {
        self.validate(m)?;
        self.apply_unchecked(m);
        Ok(())
    }

    /// Plays `m` if legal and returns whether it was played.
    #[inline]
    pub fn attempt_move(&mut self, m: Move) -> bool {
        self.play(m).is_ok()
    }

    /// Relocates whatever is on the source square of `m` to its destination and passes the turn.
    ///
    /// Performs no validation of any kind, the destination is overwritten unconditionally
    /// and the source is always left empty, even if it is also the destination.
    pub fn apply_unchecked(&mut self, m: Move) {
        let piece = self.board[m.whence()];
        self.board.set(m.whither(), piece);
        self.board.set(m.whence(), None);
        self.turn = !self.turn;
    }

    /// The squares the piece on `whence` may legally move to.
    pub fn destinations(&self, whence: Square) -> ArrayVec<Square, 27> {
        Square::iter()
            .filter(|&whither| self.check_move(Move::new(whence, whither)))
            .collect()
    }

    fn validate_pawn(&self, pawn: Piece, m: Move) -> Result<(), IllegalMove> {
        let (whence, whither) = (m.whence(), m.whither());
        let forward = pawn.color().forward();
        let (dr, dc) = whither - whence;

        let vacant = self.board.is_empty(whither);

        if dc == 0 && dr == forward && vacant {
            return Ok(());
        }

        if dc == 0 && dr == 2 * forward && whence.rank() == pawn.color().pawn_rank() && vacant {
            return match whence.offset(forward, 0) {
                Some(sq) if !self.board.is_empty(sq) => Err(IllegalMove::BlockedPath(sq)),
                _ => Ok(()),
            };
        }

        if dc.abs() == 1 && dr == forward && !vacant {
            return Ok(());
        }

        Err(IllegalMove::IllegalGeometry(pawn))
    }

    fn clear(&self, m: Move) -> Result<(), IllegalMove> {
        let ray = Ray::between(m.whence(), m.whither());

        match ray.into_iter().flatten().find(|&sq| !self.board.is_empty(sq)) {
            Some(sq) => Err(IllegalMove::BlockedPath(sq)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.board, f)?;
        writeln!(f)?;
        write!(f, "{} to move", self.turn)
    }
}
