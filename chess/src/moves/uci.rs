//! Coordinate notation, as used by UCI engines

use super::base::{self, CreateError, MoveKind, PromotePiece, ValidateError};
use crate::board::Board;
use crate::geometry;
use crate::types::{File, Piece, Square, SquareParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Malformed coordinate string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    #[error("expected 4 or 5 ASCII chars")]
    BadLength,
    #[error("invalid source square: {0}")]
    BadSrc(SquareParseError),
    #[error("invalid destination square: {0}")]
    BadDst(SquareParseError),
    #[error("unknown promotion piece {0:?}")]
    BadPromote(char),
}

/// Coordinate string which is malformed or can't denote any move
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum BasicParseError {
    #[error("malformed move: {0}")]
    Parse(#[from] RawParseError),
    #[error("impossible move: {0}")]
    Create(#[from] CreateError),
}

/// Coordinate string which doesn't denote a valid move in the position
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("malformed move: {0}")]
    Parse(#[from] RawParseError),
    #[error("impossible move: {0}")]
    Create(#[from] CreateError),
    #[error("illegal move: {0}")]
    Validate(#[from] ValidateError),
}

/// Move as a pair of squares, like `g1f3` or `a7a8q`
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub src: Square,
    pub dst: Square,
    pub promote: Option<PromotePiece>,
}

/// Guesses the kind of a non-promoting move from the piece on `src`
fn kind_by_piece(b: &Board, src: Square, dst: Square) -> MoveKind {
    let side = b.side();
    let cell = b.get(src);
    if cell.color() != Some(side) {
        return MoveKind::Simple;
    }
    match cell.piece() {
        Some(Piece::Pawn) if dst.rank() == geometry::double_move_dst_rank(side)
            && src.rank() == geometry::pawn_home_rank(side) =>
        {
            MoveKind::PawnDouble
        }
        Some(Piece::Pawn) if src.file() != dst.file() && b.get(dst).is_free() => {
            MoveKind::Enpassant
        }
        Some(Piece::Pawn) => MoveKind::PawnSimple,
        Some(Piece::King) => {
            let rank = geometry::castling_rank(side);
            let home = Square::from_parts(File::E, rank);
            match dst.file() {
                File::G if src == home && dst.rank() == rank => MoveKind::CastlingKingside,
                File::C if src == home && dst.rank() == rank => MoveKind::CastlingQueenside,
                _ => MoveKind::Simple,
            }
        }
        _ => MoveKind::Simple,
    }
}

impl Move {
    /// Resolves the move kind in position `b`
    ///
    /// The result is well-formed. Legality is not checked here.
    pub fn into_move(self, b: &Board) -> Result<base::Move, CreateError> {
        let kind = match self.promote {
            Some(p) => MoveKind::from(p),
            None => kind_by_piece(b, self.src, self.dst),
        };
        base::Move::new(kind, self.src, self.dst, b.side())
    }
}

impl From<base::Move> for Move {
    #[inline]
    fn from(mv: base::Move) -> Move {
        Move {
            src: mv.src(),
            dst: mv.dst(),
            promote: mv.promote(),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(p) = self.promote {
            write!(f, "{}", Piece::from(p).as_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(RawParseError::BadLength);
        }
        let (squares, tail) = s.split_at(4);
        let src = Square::from_str(&squares[..2]).map_err(RawParseError::BadSrc)?;
        let dst = Square::from_str(&squares[2..]).map_err(RawParseError::BadDst)?;
        let promote = match tail.chars().next() {
            None => None,
            Some(c) => Some(
                PromotePiece::ALL
                    .into_iter()
                    .find(|&p| Piece::from(p).as_char().to_ascii_lowercase() == c)
                    .ok_or(RawParseError::BadPromote(c))?,
            ),
        };
        Ok(Move { src, dst, promote })
    }
}
