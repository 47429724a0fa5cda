use super::{san, uci};
use crate::board::Board;
use crate::types::{CastlingSide, Cell, Color, File, Piece, Rank, Square};
use crate::{geometry, movegen};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// What a move does besides relocating one piece
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Knight, bishop, rook, queen or king move, possibly a capture
    Simple = 1,
    /// King goes to the `g` file, rook from `h` to `f`
    CastlingKingside = 2,
    /// King goes to the `c` file, rook from `a` to `d`
    CastlingQueenside = 3,
    /// Pawn advances by one or captures, without reaching the last rank
    PawnSimple = 4,
    /// Pawn advances by two from its home rank
    PawnDouble = 5,
    /// Pawn captures the pawn which has just passed the destination
    Enpassant = 6,
    /// Pawn reaches the last rank and becomes a knight
    PromoteKnight = 7,
    /// Pawn reaches the last rank and becomes a bishop
    PromoteBishop = 8,
    /// Pawn reaches the last rank and becomes a rook
    PromoteRook = 9,
    /// Pawn reaches the last rank and becomes a queen
    PromoteQueen = 10,
}

/// Target piece for promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotePiece {
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
}

impl PromotePiece {
    /// All the promotion targets, in the order they are generated
    pub const ALL: [PromotePiece; 4] = [
        PromotePiece::Knight,
        PromotePiece::Bishop,
        PromotePiece::Rook,
        PromotePiece::Queen,
    ];
}

/// Notation used by [`Move::styled()`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Style {
    /// SAN with piece letters, like `Nf3`
    San,
    /// SAN with chess symbols, like `♘f3`
    SanUtf8,
    /// Coordinate notation, like `g1f3`
    Uci,
}

// Promotion kinds go in the same order as `PromotePiece`, shifted by this offset
const PROMOTE_KIND_OFFSET: u8 = MoveKind::PromoteKnight as u8 - PromotePiece::Knight as u8;

impl From<PromotePiece> for Piece {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        Piece::ALL[p as usize]
    }
}

impl TryFrom<Piece> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(p: Piece) -> Result<Self, Self::Error> {
        PromotePiece::ALL
            .into_iter()
            .find(|&pp| pp as usize == p.index())
            .ok_or(())
    }
}

impl From<CastlingSide> for MoveKind {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::Queen => Self::CastlingQueenside,
            CastlingSide::King => Self::CastlingKingside,
        }
    }
}

impl TryFrom<MoveKind> for CastlingSide {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        [CastlingSide::Queen, CastlingSide::King]
            .into_iter()
            .find(|&side| MoveKind::from(side) == kind)
            .ok_or(())
    }
}

impl From<PromotePiece> for MoveKind {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        match p {
            PromotePiece::Queen => Self::PromoteQueen,
            PromotePiece::Rook => Self::PromoteRook,
            PromotePiece::Bishop => Self::PromoteBishop,
            PromotePiece::Knight => Self::PromoteKnight,
        }
    }
}

impl TryFrom<MoveKind> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        let idx = (kind as u8).checked_sub(PROMOTE_KIND_OFFSET).ok_or(())?;
        PromotePiece::ALL
            .into_iter()
            .find(|&p| p as u8 == idx)
            .ok_or(())
    }
}

impl MoveKind {
    /// Returns the piece which the pawn becomes, or `None` if this is not a promotion
    #[inline]
    pub fn promote(self) -> Option<Piece> {
        PromotePiece::try_from(self).ok().map(Piece::from)
    }

    #[inline]
    pub fn is_castling(self) -> bool {
        matches!(self, Self::CastlingKingside | Self::CastlingQueenside)
    }
}

/// Chess move
///
/// A move is checked at three levels:
///
/// - _well-formed_: the squares fit the kind, e.g. a double pawn move starts on the home rank and
///   goes two squares forward. All constructors except [`Move::new_unchecked()`] guarantee it;
/// - _semilegal_: the move follows the piece movement rules in the given position, but may
///   leave the own king attacked;
/// - _legal_: the move is semilegal and the own king is not attacked afterwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    kind: MoveKind,
    src: Square,
    dst: Square,
    side: Color,
}

/// Move doesn't fit the position
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Piece cannot move this way, or it's not its turn
    #[error("move breaks the piece movement rules")]
    NotSemiLegal,
    /// Move leaves the own king attacked
    #[error("move leaves the king in check")]
    NotLegal,
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum CreateError {
    /// Squares don't fit the move kind
    #[error("squares don't match the move kind")]
    NotWellFormed,
}

impl Move {
    #[inline]
    pub fn from_castling(color: Color, side: CastlingSide) -> Move {
        let rank = geometry::castling_rank(color);
        let src = Square::from_parts(File::E, rank);
        let dst = match side {
            CastlingSide::King => Square::from_parts(File::G, rank),
            CastlingSide::Queen => Square::from_parts(File::C, rank),
        };
        Move {
            kind: MoveKind::from(side),
            src,
            dst,
            side: color,
        }
    }

    /// Creates a move from its raw parts without checking that it is well-formed
    ///
    /// Making a move that is not well-formed is rejected by validation, so this is only useful
    /// when the move is known to be correct, e.g. inside the move generator.
    #[inline]
    pub const fn new_unchecked(kind: MoveKind, src: Square, dst: Square, side: Color) -> Move {
        Move {
            kind,
            src,
            dst,
            side,
        }
    }

    /// Creates a move from its raw parts and validates it for well-formedness
    pub fn new(kind: MoveKind, src: Square, dst: Square, side: Color) -> Result<Move, CreateError> {
        let mv = Move {
            kind,
            src,
            dst,
            side,
        };
        mv.is_well_formed()
            .then_some(mv)
            .ok_or(CreateError::NotWellFormed)
    }

    /// Parses the move in coordinate notation `s` for the position `b`
    ///
    /// Only well-formedness is checked. Use [`Move::from_uci_legal()`] to get a legal move.
    #[inline]
    pub fn from_uci(s: &str, b: &Board) -> Result<Move, uci::BasicParseError> {
        Ok(uci::Move::from_str(s)?.into_move(b)?)
    }

    /// Like [`Move::from_uci()`], also checking that the move is semilegal
    pub fn from_uci_semilegal(s: &str, b: &Board) -> Result<Move, uci::ParseError> {
        let res = uci::Move::from_str(s)?.into_move(b)?;
        res.semi_validate(b)?;
        Ok(res)
    }

    /// Like [`Move::from_uci()`], also checking that the move is legal
    pub fn from_uci_legal(s: &str, b: &Board) -> Result<Move, uci::ParseError> {
        let res = uci::Move::from_str(s)?.into_move(b)?;
        res.validate(b)?;
        Ok(res)
    }

    pub fn is_semilegal(&self, b: &Board) -> bool {
        self.side == b.side()
            && self.is_well_formed()
            && movegen::semilegal::gen_from(b, self.src).contains(self)
    }

    /// Returns `true` if the semilegal move doesn't leave the king of the moving side under attack
    ///
    /// The result is meaningless if the move is not semilegal.
    #[inline]
    pub fn is_legal_unchecked(&self, b: &Board) -> bool {
        movegen::is_king_safe_after(b, *self)
    }

    #[inline]
    pub fn semi_validate(&self, b: &Board) -> Result<(), ValidateError> {
        if !self.is_semilegal(b) {
            return Err(ValidateError::NotSemiLegal);
        }
        Ok(())
    }

    /// Checks that the move is legal in the position `b`
    #[inline]
    pub fn validate(&self, b: &Board) -> Result<(), ValidateError> {
        self.semi_validate(b)?;
        match self.is_legal_unchecked(b) {
            true => Ok(()),
            false => Err(ValidateError::NotLegal),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        let side = self.side;
        let file_diff = self.src.col().abs_diff(self.dst.col());
        let step = self.dst.row() as isize - self.src.row() as isize;
        let fwd = geometry::pawn_forward(side);

        match self.kind {
            MoveKind::Simple => self.src != self.dst,
            MoveKind::CastlingKingside => *self == Move::from_castling(side, CastlingSide::King),
            MoveKind::CastlingQueenside => *self == Move::from_castling(side, CastlingSide::Queen),
            MoveKind::PawnSimple => {
                file_diff <= 1
                    && step == fwd
                    && !matches!(self.src.rank(), Rank::R1 | Rank::R8)
                    && self.dst.rank() != geometry::promote_rank(side)
            }
            MoveKind::PawnDouble => {
                file_diff == 0
                    && step == 2 * fwd
                    && self.src.rank() == geometry::pawn_home_rank(side)
            }
            MoveKind::Enpassant => {
                file_diff == 1
                    && step == fwd
                    && self.dst.rank() == geometry::enpassant_rank(side.inv())
            }
            MoveKind::PromoteKnight
            | MoveKind::PromoteBishop
            | MoveKind::PromoteRook
            | MoveKind::PromoteQueen => {
                file_diff <= 1 && step == fwd && self.dst.rank() == geometry::promote_rank(side)
            }
        }
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn src(&self) -> Square {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Square {
        self.dst
    }

    #[inline]
    pub const fn side(&self) -> Color {
        self.side
    }

    /// Returns the promotion target, if the move is a promotion
    #[inline]
    pub fn promote(&self) -> Option<PromotePiece> {
        self.kind.try_into().ok()
    }

    /// Returns `true` if the move captures a piece in position `b`
    #[inline]
    pub fn is_capture(&self, b: &Board) -> bool {
        self.kind == MoveKind::Enpassant || b.get(self.dst).is_occupied()
    }

    #[inline]
    pub fn uci(&self) -> uci::Move {
        (*self).into()
    }

    /// Describes the move in SAN for the position `b`, failing if the move is not legal there
    #[inline]
    pub fn san(&self, b: &Board) -> Result<san::Move, ValidateError> {
        san::Move::from_move(*self, b)
    }

    /// Formats the move in the notation `style`
    ///
    /// SAN depends on the position, so the move must be legal in `b`.
    ///
    /// # Example
    ///
    /// ```
    /// # use chessrules::{Move, Board, MoveKind, File, Rank, Square, Color, moves::Style};
    /// #
    /// let b = Board::initial();
    /// let g1 = Square::from_parts(File::G, Rank::R1);
    /// let f3 = Square::from_parts(File::F, Rank::R3);
    /// let mv = Move::new(MoveKind::Simple, g1, f3, Color::White).unwrap();
    /// assert_eq!(mv.styled(&b, Style::Uci).unwrap().to_string(), "g1f3");
    /// assert_eq!(mv.styled(&b, Style::San).unwrap().to_string(), "Nf3");
    /// assert_eq!(mv.styled(&b, Style::SanUtf8).unwrap().to_string(), "♘f3");
    /// ```
    pub fn styled(&self, b: &Board, style: Style) -> Result<StyledMove, ValidateError> {
        match style {
            Style::Uci => Ok(StyledMove(Styled::Uci((*self).into()))),
            Style::San => Ok(StyledMove(Styled::San(
                san::Move::from_move(*self, b)?,
                san::Style::Algebraic,
            ))),
            Style::SanUtf8 => Ok(StyledMove(Styled::San(
                san::Move::from_move(*self, b)?,
                san::Style::Utf8,
            ))),
        }
    }
}

impl fmt::Display for Move {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.uci().fmt(f)
    }
}

enum Styled {
    Uci(uci::Move),
    San(san::Move, san::Style),
}

/// Move formatted by [`Move::styled()`]
pub struct StyledMove(Styled);

impl fmt::Display for StyledMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match &self.0 {
            Styled::Uci(mv) => mv.fmt(f),
            Styled::San(mv, sty) => mv.styled(*sty).fmt(f),
        }
    }
}

/// Moves the pieces of the move `mv` on `cells`, returning the captured cell
///
/// Only the placement is touched: the rook is relocated for castling, the pawn taken en passant
/// is removed from behind the destination square, and the promoted piece replaces the pawn.
pub(crate) fn apply_to_cells(cells: &mut [Cell; 64], mv: Move) -> Cell {
    let src_cell = cells[mv.src.index()];
    let mut captured = cells[mv.dst.index()];
    cells[mv.src.index()] = Cell::EMPTY;
    cells[mv.dst.index()] = match mv.kind.promote() {
        Some(piece) => Cell::from_parts(mv.side, piece),
        None => src_cell,
    };

    match mv.kind {
        MoveKind::Enpassant => {
            let taken = Square::new(mv.src.row(), mv.dst.col());
            captured = cells[taken.index()];
            cells[taken.index()] = Cell::EMPTY;
        }
        MoveKind::CastlingKingside | MoveKind::CastlingQueenside => {
            let rank = geometry::castling_rank(mv.side);
            let (rook_src, rook_dst) = match mv.kind {
                MoveKind::CastlingKingside => (File::H, File::F),
                _ => (File::A, File::D),
            };
            let rook_src = Square::from_parts(rook_src, rank);
            let rook_dst = Square::from_parts(rook_dst, rank);
            cells[rook_dst.index()] = cells[rook_src.index()];
            cells[rook_src.index()] = Cell::EMPTY;
        }
        _ => {}
    }

    captured
}

fn revoke_castling(b: &mut Board, sq: Square) {
    for color in [Color::White, Color::Black] {
        if sq.rank() != geometry::castling_rank(color) {
            continue;
        }
        match sq.file() {
            File::E => b.r.castling.unset_color(color),
            File::A => b.r.castling.unset(color, CastlingSide::Queen),
            File::H => b.r.castling.unset(color, CastlingSide::King),
            _ => {}
        }
    }
}

/// Makes the move `mv` on the board `b`
///
/// The move must be legal, otherwise the board may end up in an invalid state.
pub(crate) fn make_move_unchecked(b: &mut Board, mv: Move) {
    let src_cell = b.get(mv.src);
    let captured = apply_to_cells(&mut b.r.cells, mv);

    if src_cell.piece() == Some(Piece::King) {
        b.kings[mv.side.index()] = mv.dst;
    }

    // Touching a home square of the king or a rook revokes the corresponding rights forever.
    revoke_castling(b, mv.src);
    revoke_castling(b, mv.dst);

    b.r.ep_target = match mv.kind {
        MoveKind::PawnDouble => mv.src.shift(geometry::pawn_forward(mv.side), 0),
        _ => None,
    };

    if captured.is_occupied() || src_cell.piece() == Some(Piece::Pawn) {
        b.r.halfmove_clock = 0;
    } else {
        b.r.halfmove_clock = b.r.halfmove_clock.saturating_add(1);
    }
    if mv.side == Color::Black {
        b.r.fullmove_number = b.r.fullmove_number.saturating_add(1);
    }
    b.r.side = mv.side.inv();
    b.hash = b.r.zobrist_hash();
}
