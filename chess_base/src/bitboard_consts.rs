use crate::bitboard::Bitboard;
use crate::types::{File, Rank};

pub const CELLS_DARK: Bitboard = Bitboard::from_raw(0xaa55aa55aa55aa55);
pub const CELLS_LIGHT: Bitboard = Bitboard::from_raw(!0xaa55aa55aa55aa55);

pub const fn file(f: File) -> Bitboard {
    Bitboard::from_raw(0x0101010101010101 << f.index())
}

pub const fn rank(r: Rank) -> Bitboard {
    Bitboard::from_raw(0xff << (r.index() * 8))
}
