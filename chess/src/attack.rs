//! Attack patterns of the pieces
//!
//! All the functions here work on bare cell arrays and don't check legality, so they can be used
//! on intermediate positions during legality checks.

use crate::bitboard::Bitboard;
use crate::geometry;
use crate::types::{Cell, Color, Piece, Square};

pub(crate) const KING_DELTAS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

pub(crate) const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub(crate) const DIAG_DIRS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
pub(crate) const LINE_DIRS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

fn leaper(sq: Square, deltas: &[(isize, isize)]) -> Bitboard {
    deltas
        .iter()
        .filter_map(|&(dr, dc)| sq.shift(dr, dc))
        .collect()
}

fn slider(cells: &[Cell; 64], sq: Square, dirs: &[(isize, isize)]) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    for &(dr, dc) in dirs {
        let mut cur = sq;
        while let Some(next) = cur.shift(dr, dc) {
            res.set(next);
            if cells[next.index()].is_occupied() {
                break;
            }
            cur = next;
        }
    }
    res
}

/// Squares attacked by a king standing on `sq`
#[inline]
pub fn king(sq: Square) -> Bitboard {
    leaper(sq, &KING_DELTAS)
}

/// Squares attacked by a knight standing on `sq`
#[inline]
pub fn knight(sq: Square) -> Bitboard {
    leaper(sq, &KNIGHT_DELTAS)
}

/// Squares attacked by a pawn of color `color` standing on `sq`
#[inline]
pub fn pawn(color: Color, sq: Square) -> Bitboard {
    leaper(
        sq,
        &[
            (geometry::pawn_forward(color), -1),
            (geometry::pawn_forward(color), 1),
        ],
    )
}

/// Squares attacked by a bishop on `sq`
///
/// Each ray stops at the first occupied square, which is included.
#[inline]
pub fn bishop(cells: &[Cell; 64], sq: Square) -> Bitboard {
    slider(cells, sq, &DIAG_DIRS)
}

/// Squares attacked by a rook on `sq`
///
/// Each ray stops at the first occupied square, which is included.
#[inline]
pub fn rook(cells: &[Cell; 64], sq: Square) -> Bitboard {
    slider(cells, sq, &LINE_DIRS)
}

/// Squares attacked by the piece standing on `sq`
///
/// Returns an empty set if `sq` is empty.
pub fn from_square(cells: &[Cell; 64], sq: Square) -> Bitboard {
    let cell = cells[sq.index()];
    let (Some(color), Some(piece)) = (cell.color(), cell.piece()) else {
        return Bitboard::EMPTY;
    };
    match piece {
        Piece::Pawn => pawn(color, sq),
        Piece::King => king(sq),
        Piece::Knight => knight(sq),
        Piece::Bishop => bishop(cells, sq),
        Piece::Rook => rook(cells, sq),
        Piece::Queen => bishop(cells, sq) | rook(cells, sq),
    }
}

fn has_piece(cells: &[Cell; 64], set: Bitboard, cell: Cell) -> bool {
    set.into_iter().any(|sq| cells[sq.index()] == cell)
}

fn pieces_in(cells: &[Cell; 64], set: Bitboard, cell: Cell) -> Bitboard {
    set.into_iter()
        .filter(|sq| cells[sq.index()] == cell)
        .collect()
}

/// Returns `true` if square `sq` is attacked by any piece of color `by`
pub fn is_attacked(cells: &[Cell; 64], sq: Square, by: Color) -> bool {
    // Pawn attacks are traced back from the target, so we take the opposite color
    has_piece(cells, pawn(by.inv(), sq), Cell::from_parts(by, Piece::Pawn))
        || has_piece(cells, knight(sq), Cell::from_parts(by, Piece::Knight))
        || has_piece(cells, king(sq), Cell::from_parts(by, Piece::King))
        || {
            let diag = bishop(cells, sq);
            has_piece(cells, diag, Cell::from_parts(by, Piece::Bishop))
                || has_piece(cells, diag, Cell::from_parts(by, Piece::Queen))
        }
        || {
            let line = rook(cells, sq);
            has_piece(cells, line, Cell::from_parts(by, Piece::Rook))
                || has_piece(cells, line, Cell::from_parts(by, Piece::Queen))
        }
}

/// Returns all the pieces of color `by` attacking square `sq`
pub fn attackers(cells: &[Cell; 64], sq: Square, by: Color) -> Bitboard {
    let diag = bishop(cells, sq);
    let line = rook(cells, sq);
    pieces_in(cells, pawn(by.inv(), sq), Cell::from_parts(by, Piece::Pawn))
        | pieces_in(cells, knight(sq), Cell::from_parts(by, Piece::Knight))
        | pieces_in(cells, king(sq), Cell::from_parts(by, Piece::King))
        | pieces_in(cells, diag, Cell::from_parts(by, Piece::Bishop))
        | pieces_in(cells, diag, Cell::from_parts(by, Piece::Queen))
        | pieces_in(cells, line, Cell::from_parts(by, Piece::Rook))
        | pieces_in(cells, line, Cell::from_parts(by, Piece::Queen))
}

/// Returns the union of squares attacked by pieces of color `by`
pub fn attacked_squares(cells: &[Cell; 64], by: Color) -> Bitboard {
    let mut res = Bitboard::EMPTY;
    for sq in Square::iter() {
        if cells[sq.index()].color() == Some(by) {
            res |= from_square(cells, sq);
        }
    }
    res
}
