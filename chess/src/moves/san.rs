//! Moves in standard algebraic notation
//!
//! Only formatting is supported, as moves are always entered in coordinate form.

use super::base::{self, MoveKind, PromotePiece, ValidateError};
use crate::board::Board;
use crate::movegen;
use crate::types::{CastlingSide, Cell, Color, File, Piece, Rank, Square};

use std::fmt;

/// Piece symbols used in SAN
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Style {
    /// `N`, `B`, `R`, `Q`, `K`, with `=` before the promoted piece
    Algebraic,
    /// White chess symbols, promoted piece right after the square
    Utf8,
}

impl Style {
    fn piece(self, piece: Piece) -> char {
        match self {
            Style::Algebraic => piece.as_char(),
            Style::Utf8 => Cell::from_parts(Color::White, piece).as_utf8_char(),
        }
    }

    fn write_promote(self, f: &mut fmt::Formatter<'_>, promote: Option<PromotePiece>) -> fmt::Result {
        let Some(promote) = promote else {
            return Ok(());
        };
        if self == Style::Algebraic {
            f.write_str("=")?;
        }
        write!(f, "{}", self.piece(promote.into()))
    }
}

/// SAN of a move without the check suffix
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Data {
    Castling(CastlingSide),
    /// Pawn push, possibly with promotion
    PawnMove {
        dst: Square,
        promote: Option<PromotePiece>,
    },
    /// Pawn capture, en passant included
    PawnCapture {
        src: File,
        dst: Square,
        promote: Option<PromotePiece>,
    },
    /// Move of any piece except a pawn
    Simple {
        piece: Piece,
        /// Source file, present when needed to tell the move apart
        file: Option<File>,
        /// Source rank, present when the file is not enough
        rank: Option<Rank>,
        is_capture: bool,
        dst: Square,
    },
}

/// Picks the parts of `src` needed to tell it apart from `rivals`, which are the other squares
/// holding the same kind of piece and able to reach the same destination
fn disambiguate(src: Square, rivals: impl Iterator<Item = Square>) -> (Option<File>, Option<Rank>) {
    let (mut any, mut same_file, mut same_rank) = (false, false, false);
    for sq in rivals {
        any = true;
        same_file |= sq.file() == src.file();
        same_rank |= sq.rank() == src.rank();
    }
    match (any, same_file, same_rank) {
        (false, _, _) => (None, None),
        (true, false, _) => (Some(src.file()), None),
        (true, true, false) => (None, Some(src.rank())),
        (true, true, true) => (Some(src.file()), Some(src.rank())),
    }
}

impl Data {
    #[inline]
    pub fn styled(&self, style: Style) -> StyledData<'_> {
        StyledData(self, style)
    }

    /// Builds the notation for `mv`, which must be legal in `b`
    pub fn from_move(mv: base::Move, b: &Board) -> Data {
        let (src, dst) = (mv.src(), mv.dst());
        match mv.kind() {
            MoveKind::CastlingKingside => Data::Castling(CastlingSide::King),
            MoveKind::CastlingQueenside => Data::Castling(CastlingSide::Queen),
            MoveKind::Enpassant => Data::PawnCapture {
                src: src.file(),
                dst,
                promote: None,
            },
            MoveKind::PawnSimple
            | MoveKind::PawnDouble
            | MoveKind::PromoteKnight
            | MoveKind::PromoteBishop
            | MoveKind::PromoteRook
            | MoveKind::PromoteQueen => match src.file() == dst.file() {
                true => Data::PawnMove {
                    dst,
                    promote: mv.promote(),
                },
                false => Data::PawnCapture {
                    src: src.file(),
                    dst,
                    promote: mv.promote(),
                },
            },
            MoveKind::Simple => {
                let cell = b.get(src);
                let moves = movegen::legal::gen_all(b);
                let rivals = moves
                    .iter()
                    .filter(|m| m.dst() == dst && m.src() != src && b.get(m.src()) == cell)
                    .map(|m| m.src());
                let (file, rank) = disambiguate(src, rivals);
                Data::Simple {
                    piece: cell.piece().unwrap_or(Piece::King),
                    file,
                    rank,
                    is_capture: b.get(dst).is_occupied(),
                    dst,
                }
            }
        }
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, style: Style) -> fmt::Result {
        match *self {
            Data::Castling(CastlingSide::King) => f.write_str("O-O"),
            Data::Castling(CastlingSide::Queen) => f.write_str("O-O-O"),
            Data::PawnMove { dst, promote } => {
                write!(f, "{}", dst)?;
                style.write_promote(f, promote)
            }
            Data::PawnCapture { src, dst, promote } => {
                write!(f, "{}x{}", src.as_char(), dst)?;
                style.write_promote(f, promote)
            }
            Data::Simple {
                piece,
                file,
                rank,
                is_capture,
                dst,
            } => {
                write!(f, "{}", style.piece(piece))?;
                if let Some(file) = file {
                    write!(f, "{}", file.as_char())?;
                }
                if let Some(rank) = rank {
                    write!(f, "{}", rank.as_char())?;
                }
                if is_capture {
                    f.write_str("x")?;
                }
                write!(f, "{}", dst)
            }
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, Style::Algebraic)
    }
}

/// Suffix telling that the move attacks the king
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CheckMark {
    /// `+`
    Check,
    /// `#`
    Checkmate,
}

impl CheckMark {
    #[inline]
    pub fn as_char(self) -> char {
        match self {
            CheckMark::Check => '+',
            CheckMark::Checkmate => '#',
        }
    }
}

/// Complete SAN of a move
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub data: Data,
    pub check: Option<CheckMark>,
}

pub struct StyledData<'a>(&'a Data, Style);

pub struct StyledMove<'a>(&'a Move, Style);

impl Move {
    /// Formats the move with the piece symbols of `style`
    ///
    /// ```
    /// # use chessrules::{Board, Move, moves::san::Style};
    /// #
    /// let b = Board::from_fen("8/4P3/8/8/8/8/1k6/6K1 w - - 0 1").unwrap();
    /// let san = Move::from_uci_legal("e7e8n", &b).unwrap().san(&b).unwrap();
    /// assert_eq!(san.styled(Style::Algebraic).to_string(), "e8=N");
    /// assert_eq!(san.styled(Style::Utf8).to_string(), "e8♘");
    /// ```
    #[inline]
    pub fn styled(&self, style: Style) -> StyledMove<'_> {
        StyledMove(self, style)
    }

    /// Describes `mv` played in position `b`, failing if it is not legal there
    pub fn from_move(mv: base::Move, b: &Board) -> Result<Move, ValidateError> {
        mv.validate(b)?;
        let mut after = b.clone();
        base::make_move_unchecked(&mut after, mv);
        Ok(Move {
            data: Data::from_move(mv, b),
            check: check_mark(&after),
        })
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, style: Style) -> fmt::Result {
        self.data.write(f, style)?;
        match self.check {
            Some(mark) => write!(f, "{}", mark.as_char()),
            None => Ok(()),
        }
    }
}

/// Check suffix for a move leading to the position `after`
pub(crate) fn check_mark(after: &Board) -> Option<CheckMark> {
    if !after.is_check() {
        return None;
    }
    match after.has_legal_moves() {
        true => Some(CheckMark::Check),
        false => Some(CheckMark::Checkmate),
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f, Style::Algebraic)
    }
}

impl<'a> fmt::Display for StyledData<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write(f, self.1)
    }
}

impl<'a> fmt::Display for StyledMove<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.write(f, self.1)
    }
}
