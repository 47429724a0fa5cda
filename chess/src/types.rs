//! Core chess types

use std::fmt;

use bitflags::bitflags;

pub use chessrules_base::types::{
    CastlingRights, CastlingRightsParseError, CastlingSide, Cell, CellParseError, Color,
    ColorParseError, File, Piece, Rank, Square, SquareParseError,
};

bitflags! {
    /// Classification of a completed move
    ///
    /// Several tags may hold at once, e.g. a capture that gives check carries both
    /// [`MoveType::CAPTURE`] and [`MoveType::CHECK`]. [`MoveType::BASIC_MOVE`] is set only
    /// when the move is neither a capture, nor castling, nor promotion. [`MoveType::CHECK`]
    /// and [`MoveType::CHECK_MATE`] never occur together.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub struct MoveType: u8 {
        const BASIC_MOVE = 1 << 0;
        const CAPTURE = 1 << 1;
        const CASTLING = 1 << 2;
        const PROMOTION = 1 << 3;
        const CHECK = 1 << 4;
        const CHECK_MATE = 1 << 5;
    }
}

/// Check status of the side to move
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CheckState {
    king: Option<Square>,
}

impl CheckState {
    /// State without check
    pub const NONE: CheckState = CheckState { king: None };

    /// Creates a state where the king on `king` is checked
    #[inline]
    pub const fn checked(king: Square) -> CheckState {
        CheckState { king: Some(king) }
    }

    #[inline]
    pub const fn is_in_check(&self) -> bool {
        self.king.is_some()
    }

    /// Returns the square of the checked king, if any
    #[inline]
    pub const fn king_square(&self) -> Option<Square> {
        self.king
    }
}

/// Description of an executed move, as shown to the user
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct LastMove {
    /// Piece which made the move, before promotion
    pub piece: Cell,
    /// Source square
    pub src: Square,
    /// Destination square
    pub dst: Square,
    /// Piece the pawn was promoted to, if any
    pub promotion: Option<Piece>,
    /// Classification of the move
    pub move_type: MoveType,
}

/// Reason for game finish with win
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WinReason {
    /// Game ends with checkmate
    Checkmate,
}

/// Reason for game finish with draw
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// Side to move is not in check and has no legal moves
    Stalemate,
    /// Neither side can deliver mate
    InsufficientMaterial,
    /// 75 moves without pawn moves or captures
    Moves75,
    /// Fivefold repetition
    Repeat5,
    /// 50 moves without pawn moves or captures
    Moves50,
    /// Threefold repetition
    Repeat3,
}

/// Game outcome
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// One side wins
    Win {
        /// Winning side
        side: Color,
        /// Reason
        reason: WinReason,
    },
    /// Draw
    Draw(DrawReason),
}

/// Filter which decides what outcomes finish the game automatically
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OutcomeFilter {
    /// Only checkmate and stalemate
    #[default]
    Force,
    /// Also insufficient material, 75 move rule and fivefold repetition
    Strict,
    /// Also 50 move rule and threefold repetition
    Relaxed,
}

impl Outcome {
    /// Returns the winner, or `None` in case of draw
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match self {
            Self::Win { side, .. } => Some(*side),
            Self::Draw(_) => None,
        }
    }

    /// Returns `true` if the game cannot continue under the rules of chess
    #[inline]
    pub fn is_force(&self) -> bool {
        matches!(
            *self,
            Self::Win {
                reason: WinReason::Checkmate,
                ..
            } | Self::Draw(DrawReason::Stalemate)
        )
    }

    /// Returns `true` if the outcome passes the filter `filter`
    pub fn passes(&self, filter: OutcomeFilter) -> bool {
        if self.is_force() {
            return true;
        }
        if matches!(filter, OutcomeFilter::Strict | OutcomeFilter::Relaxed)
            && matches!(
                *self,
                Self::Draw(DrawReason::InsufficientMaterial | DrawReason::Moves75 | DrawReason::Repeat5)
            )
        {
            return true;
        }
        matches!(filter, OutcomeFilter::Relaxed)
            && matches!(*self, Self::Draw(DrawReason::Moves50 | DrawReason::Repeat3))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::Win { side, reason } => match reason {
                WinReason::Checkmate => write!(f, "{} won by checkmate", side.as_long_str()),
            },
            Self::Draw(reason) => match reason {
                DrawReason::Stalemate => write!(f, "Draw by stalemate"),
                DrawReason::InsufficientMaterial => write!(f, "Draw due to insufficient material"),
                DrawReason::Moves75 => write!(f, "Draw by 75 move rule"),
                DrawReason::Repeat5 => write!(f, "Draw by fivefold repetition"),
                DrawReason::Moves50 => write!(f, "Draw by 50 move rule"),
                DrawReason::Repeat3 => write!(f, "Draw by threefold repetition"),
            },
        }
    }
}
