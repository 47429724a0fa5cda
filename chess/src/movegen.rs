//! Move generation
//!
//! Moves are first generated as semilegal (i.e. the king of the moving side may remain under
//! attack), then filtered by simulating each move on a copy of the cells.

use crate::attack::{self, DIAG_DIRS, KING_DELTAS, KNIGHT_DELTAS, LINE_DIRS};
use crate::board::Board;
use crate::moves::{self, Move, MoveKind, PromotePiece};
use crate::types::{CastlingSide, Color, File, Piece, Square};
use crate::geometry;

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// List of moves
///
/// No legal chess position has more than 218 moves, so the list never overflows.
#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

/// Ordered legal destinations of a single piece
///
/// A queen on an open board has 27 destinations, which is the maximum.
pub type Destinations = ArrayVec<Square, 27>;

/// Legal destinations for each origin square of the side to move
///
/// Origins without legal moves are not present in the map.
pub type SafeSquares = BTreeMap<Square, Destinations>;

/// Receiver for generated moves
pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        Vec::push(self, m);
    }
}

struct LegalFilter<'a, P> {
    board: &'a Board,
    inner: &'a mut P,
}

impl<'a, P: MovePush> MovePush for LegalFilter<'a, P> {
    fn push(&mut self, mv: Move) {
        if is_king_safe_after(self.board, mv) {
            self.inner.push(mv);
        }
    }
}

/// Returns `true` if the king of the moving side is not attacked after the semilegal move `mv`
pub(crate) fn is_king_safe_after(b: &Board, mv: Move) -> bool {
    let mut cells = b.r.cells;
    moves::apply_to_cells(&mut cells, mv);
    let king = match b.get(mv.src()).piece() {
        Some(Piece::King) => mv.dst(),
        _ => b.king_pos(mv.side()),
    };
    !attack::is_attacked(&cells, king, mv.side().inv())
}

struct MoveGen<'a, P> {
    board: &'a Board,
    side: Color,
    dst: &'a mut P,
}

impl<'a, P: MovePush> MoveGen<'a, P> {
    fn new(board: &'a Board, dst: &'a mut P) -> Self {
        MoveGen {
            board,
            side: board.side(),
            dst,
        }
    }

    fn add_move(&mut self, kind: MoveKind, src: Square, dst: Square) {
        self.dst
            .push(Move::new_unchecked(kind, src, dst, self.side));
    }

    fn can_land(&self, dst: Square) -> bool {
        self.board.get(dst).color() != Some(self.side)
    }

    fn gen_pawn_move(&mut self, src: Square, dst: Square) {
        if dst.rank() == geometry::promote_rank(self.side) {
            for p in PromotePiece::ALL {
                self.add_move(p.into(), src, dst);
            }
        } else {
            self.add_move(MoveKind::PawnSimple, src, dst);
        }
    }

    fn gen_pawn(&mut self, src: Square) {
        let fwd = geometry::pawn_forward(self.side);

        if let Some(one) = src.shift(fwd, 0) {
            if self.board.get(one).is_free() {
                self.gen_pawn_move(src, one);
                if src.rank() == geometry::pawn_home_rank(self.side) {
                    if let Some(two) = src.shift(2 * fwd, 0) {
                        if self.board.get(two).is_free() {
                            self.add_move(MoveKind::PawnDouble, src, two);
                        }
                    }
                }
            }
        }

        for dcol in [-1, 1] {
            let Some(dst) = src.shift(fwd, dcol) else {
                continue;
            };
            if self.board.get(dst).color() == Some(self.side.inv()) {
                self.gen_pawn_move(src, dst);
            } else if self.board.ep_target() == Some(dst) {
                self.add_move(MoveKind::Enpassant, src, dst);
            }
        }
    }

    fn gen_leaper(&mut self, src: Square, deltas: &[(isize, isize)]) {
        for &(drow, dcol) in deltas {
            if let Some(dst) = src.shift(drow, dcol) {
                if self.can_land(dst) {
                    self.add_move(MoveKind::Simple, src, dst);
                }
            }
        }
    }

    fn gen_slider(&mut self, src: Square, dirs: &[(isize, isize)]) {
        for &(drow, dcol) in dirs {
            let mut cur = src;
            while let Some(dst) = cur.shift(drow, dcol) {
                let cell = self.board.get(dst);
                if cell.color() == Some(self.side) {
                    break;
                }
                self.add_move(MoveKind::Simple, src, dst);
                if cell.is_occupied() {
                    break;
                }
                cur = dst;
            }
        }
    }

    fn gen_castling(&mut self) {
        let c = self.side;
        let b = self.board;
        if !b.castling().has_color(c) || b.is_check() {
            return;
        }
        let rank = geometry::castling_rank(c);
        let sq = |file: File| Square::from_parts(file, rank);
        let is_free = |file: File| b.get(sq(file)).is_free();
        let is_safe = |file: File| !b.is_square_attacked(sq(file), c.inv());

        if b.castling().has(c, CastlingSide::King)
            && is_free(File::F)
            && is_free(File::G)
            && is_safe(File::F)
            && is_safe(File::G)
        {
            self.dst.push(Move::from_castling(c, CastlingSide::King));
        }
        if b.castling().has(c, CastlingSide::Queen)
            && is_free(File::B)
            && is_free(File::C)
            && is_free(File::D)
            && is_safe(File::D)
            && is_safe(File::C)
        {
            self.dst.push(Move::from_castling(c, CastlingSide::Queen));
        }
    }

    fn gen_from(&mut self, src: Square) {
        let cell = self.board.get(src);
        if cell.color() != Some(self.side) {
            return;
        }
        match cell.piece() {
            Some(Piece::Pawn) => self.gen_pawn(src),
            Some(Piece::Knight) => self.gen_leaper(src, &KNIGHT_DELTAS),
            Some(Piece::King) => {
                self.gen_leaper(src, &KING_DELTAS);
                self.gen_castling();
            }
            Some(Piece::Bishop) => self.gen_slider(src, &DIAG_DIRS),
            Some(Piece::Rook) => self.gen_slider(src, &LINE_DIRS),
            Some(Piece::Queen) => {
                self.gen_slider(src, &DIAG_DIRS);
                self.gen_slider(src, &LINE_DIRS);
            }
            None => {}
        }
    }

    fn gen_all(&mut self) {
        for src in Square::iter() {
            self.gen_from(src);
        }
    }
}

/// Semilegal move generation
///
/// Semilegal moves obey the rules of chess, except that the king may remain under attack.
pub mod semilegal {
    use super::*;

    /// Generates all the semilegal moves into `dst`
    pub fn gen_all_into<P: MovePush>(b: &Board, dst: &mut P) {
        MoveGen::new(b, dst).gen_all();
    }

    /// Generates all the semilegal moves
    pub fn gen_all(b: &Board) -> MoveList {
        let mut res = MoveList::new();
        gen_all_into(b, &mut res);
        res
    }

    /// Generates all the semilegal moves of the piece standing on `src`
    ///
    /// The result is empty if `src` is empty or contains a piece of the side not to move.
    pub fn gen_from(b: &Board, src: Square) -> MoveList {
        let mut res = MoveList::new();
        MoveGen::new(b, &mut res).gen_from(src);
        res
    }
}

/// Legal move generation
pub mod legal {
    use super::*;

    /// Generates all the legal moves into `dst`
    pub fn gen_all_into<P: MovePush>(b: &Board, dst: &mut P) {
        let mut filter = LegalFilter { board: b, inner: dst };
        MoveGen::new(b, &mut filter).gen_all();
    }

    /// Generates all the legal moves
    pub fn gen_all(b: &Board) -> MoveList {
        let mut res = MoveList::new();
        gen_all_into(b, &mut res);
        res
    }

    /// Generates all the legal moves of the piece standing on `src`
    ///
    /// The result is empty if `src` is empty or contains a piece of the side not to move.
    pub fn gen_from(b: &Board, src: Square) -> MoveList {
        let mut res = MoveList::new();
        let mut filter = LegalFilter {
            board: b,
            inner: &mut res,
        };
        MoveGen::new(b, &mut filter).gen_from(src);
        res
    }
}

/// Returns `true` if the side to move has at least one legal move
pub fn has_legal_moves(b: &Board) -> bool {
    Square::iter()
        .filter(|&sq| b.get(sq).color() == Some(b.side()))
        .any(|sq| !legal::gen_from(b, sq).is_empty())
}

/// Returns the legal destinations of the piece standing on `src`, sorted by square index
///
/// Promotions to different pieces share one destination, so it is listed only once.
pub fn legal_destinations(b: &Board, src: Square) -> Destinations {
    let mut res = Destinations::new();
    for mv in &legal::gen_from(b, src) {
        if !res.contains(&mv.dst()) {
            res.push(mv.dst());
        }
    }
    res.sort_unstable();
    res
}

/// Returns the legal destinations for each piece of the side to move
pub fn safe_squares(b: &Board) -> SafeSquares {
    Square::iter()
        .filter(|&sq| b.get(sq).color() == Some(b.side()))
        .map(|sq| (sq, legal_destinations(b, sq)))
        .filter(|(_, dsts)| !dsts.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::Make;
    use std::str::FromStr;

    fn perft(b: &Board, depth: usize) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = legal::gen_all(b);
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .iter()
            .map(|mv| perft(&mv.make(b).unwrap(), depth - 1))
            .sum()
    }

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    #[test]
    fn test_perft_initial() {
        let b = Board::initial();
        assert_eq!(perft(&b, 1), 20);
        assert_eq!(perft(&b, 2), 400);
        assert_eq!(perft(&b, 3), 8902);
    }

    #[test]
    fn test_perft_kiwipete() {
        let b = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(perft(&b, 1), 48);
        assert_eq!(perft(&b, 2), 2039);
    }

    #[test]
    fn test_perft_endgame() {
        let b = Board::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap();
        assert_eq!(perft(&b, 1), 14);
        assert_eq!(perft(&b, 2), 191);
        assert_eq!(perft(&b, 3), 2812);
    }

    #[test]
    fn test_perft_promotions() {
        let b = Board::from_fen(
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
        )
        .unwrap();
        assert_eq!(perft(&b, 1), 6);
        assert_eq!(perft(&b, 2), 264);
        assert_eq!(perft(&b, 3), 9467);

        let b = Board::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8")
            .unwrap();
        assert_eq!(perft(&b, 1), 44);
        assert_eq!(perft(&b, 2), 1486);
    }

    #[test]
    fn test_destinations() {
        let b = Board::initial();
        assert_eq!(
            legal_destinations(&b, sq("e2")).as_slice(),
            &[sq("e3"), sq("e4")]
        );
        assert_eq!(
            legal_destinations(&b, sq("g1")).as_slice(),
            &[sq("f3"), sq("h3")]
        );
        assert!(legal_destinations(&b, sq("e4")).is_empty());
        assert!(legal_destinations(&b, sq("e7")).is_empty());
        assert!(legal_destinations(&b, sq("a1")).is_empty());

        let safe = safe_squares(&b);
        assert_eq!(safe.len(), 10);
        assert_eq!(safe.values().map(|d| d.len()).sum::<usize>(), 20);
    }

    #[test]
    fn test_pinned() {
        let b = Board::from_fen("4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1").unwrap();
        assert!(legal_destinations(&b, sq("e2")).is_empty());
        assert!(semilegal::gen_from(&b, sq("e2")).len() > 0);
    }

    #[test]
    fn test_promotion_destinations() {
        let b = Board::from_fen("1n5k/P7/8/8/8/8/8/K7 w - - 0 1").unwrap();
        assert_eq!(legal::gen_from(&b, sq("a7")).len(), 8);
        assert_eq!(
            legal_destinations(&b, sq("a7")).as_slice(),
            &[sq("a8"), sq("b8")]
        );
    }

    #[test]
    fn test_castling() {
        let b = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let dsts = legal_destinations(&b, sq("e1"));
        assert!(dsts.contains(&sq("g1")));
        assert!(dsts.contains(&sq("c1")));

        // f1 is attacked, so the king cannot pass through it
        let b = Board::from_fen("r3kr2/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
        let dsts = legal_destinations(&b, sq("e1"));
        assert!(!dsts.contains(&sq("g1")));
        assert!(dsts.contains(&sq("c1")));

        // g1 is attacked
        let b = Board::from_fen("r3k1r1/8/8/8/8/8/8/R3K2R w KQq - 0 1").unwrap();
        assert!(!legal_destinations(&b, sq("e1")).contains(&sq("g1")));

        // b1 is attacked, but the king doesn't pass it
        let b = Board::from_fen("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(legal_destinations(&b, sq("e1")).contains(&sq("c1")));

        // b1 is occupied
        let b = Board::from_fen("4k3/8/8/8/8/8/8/RN2K2R w KQ - 0 1").unwrap();
        assert!(!legal_destinations(&b, sq("e1")).contains(&sq("c1")));

        // in check
        let b = Board::from_fen("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
        let dsts = legal_destinations(&b, sq("e1"));
        assert!(!dsts.contains(&sq("c1")));
        assert!(!dsts.contains(&sq("g1")));
    }

    #[test]
    fn test_enpassant() {
        let b = Board::initial()
            .make_move(moves::Uci("e2e4"))
            .unwrap()
            .make_move(moves::Uci("a7a6"))
            .unwrap()
            .make_move(moves::Uci("e4e5"))
            .unwrap()
            .make_move(moves::Uci("d7d5"))
            .unwrap();
        assert_eq!(b.ep_target(), Some(sq("d6")));
        assert_eq!(
            legal_destinations(&b, sq("e5")).as_slice(),
            &[sq("d6"), sq("e6")]
        );

        // The en passant capture would expose the king along the rank
        let b = Board::from_fen("8/8/8/K2pP2r/8/8/8/7k w - d6 0 1").unwrap();
        assert_eq!(legal_destinations(&b, sq("e5")).as_slice(), &[sq("e6")]);
    }

    #[test]
    fn test_has_legal_moves() {
        assert!(has_legal_moves(&Board::initial()));
        let b = Board::from_fen("7K/8/5n2/5n2/8/8/7k/8 w - - 0 1").unwrap();
        assert!(!has_legal_moves(&b));
        assert!(safe_squares(&b).is_empty());
    }
}
