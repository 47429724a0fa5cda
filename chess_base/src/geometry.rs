use crate::types::{Color, Rank};

pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

pub const fn pawn_home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

pub const fn double_move_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R4,
        Color::Black => Rank::R5,
    }
}

/// Rank of the square passed over by a double move of a pawn with color `c`
pub const fn enpassant_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R3,
        Color::Black => Rank::R6,
    }
}

pub const fn promote_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Row delta of a single forward pawn step
pub const fn pawn_forward(c: Color) -> isize {
    match c {
        Color::White => 1,
        Color::Black => -1,
    }
}
