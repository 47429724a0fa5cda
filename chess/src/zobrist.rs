use crate::types::{CastlingRights, Cell, Square};

include!(concat!(env!("OUT_DIR"), "/zobrist.rs"));

pub fn pieces(cell: Cell, sq: Square) -> u64 {
    PIECES[cell.index()][sq.index()]
}

pub fn enpassant(sq: Square) -> u64 {
    ENPASSANT[sq.index()]
}

pub fn castling(rights: CastlingRights) -> u64 {
    CASTLING[rights.index()]
}
