//! Game history and notation
//!
//! [`History`] is an append-only list of position snapshots. Entry 0 is the starting position,
//! and each executed move adds one entry with the position reached, its FEN and the SAN of the
//! move.

use crate::board::{self, Board, BoardView};
use crate::moves::{self, san, uci, Move, ValidateError};
use crate::types::{CheckState, Color, DrawReason, LastMove, MoveType, Outcome, Piece};

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// Error accessing the history
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// Requested index is not in `[0, len - 1]`
    #[error("history index {index} is out of range, history has {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Error parsing a list of UCI moves
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot parse UCI move #{}: {}", .pos + 1, .source)]
pub struct UciParseError {
    pub pos: usize,
    pub source: uci::ParseError,
}

impl LastMove {
    fn from_move(before: &Board, mv: Move, check: Option<san::CheckMark>) -> LastMove {
        let mut move_type = MoveType::empty();
        if mv.is_capture(before) {
            move_type |= MoveType::CAPTURE;
        }
        if mv.kind().is_castling() {
            move_type |= MoveType::CASTLING;
        }
        if mv.promote().is_some() {
            move_type |= MoveType::PROMOTION;
        }
        if move_type.is_empty() {
            move_type |= MoveType::BASIC_MOVE;
        }
        match check {
            Some(san::CheckMark::Check) => move_type |= MoveType::CHECK,
            Some(san::CheckMark::Checkmate) => move_type |= MoveType::CHECK_MATE,
            None => {}
        }

        LastMove {
            piece: before.get(mv.src()),
            src: mv.src(),
            dst: mv.dst(),
            promotion: mv.promote().map(Piece::from),
            move_type,
        }
    }
}

/// Immutable snapshot of the game after some move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    board: Board,
    check_state: CheckState,
    mv: Option<Move>,
    last_move: Option<LastMove>,
    fen: String,
    san: Option<String>,
}

impl HistoryEntry {
    fn new(board: Board, mv: Option<(Move, LastMove, String)>) -> HistoryEntry {
        let (mv, last_move, san) = match mv {
            Some((mv, last_move, san)) => (Some(mv), Some(last_move), Some(san)),
            None => (None, None, None),
        };
        HistoryEntry {
            check_state: board.check_state(),
            fen: board.as_fen(),
            board,
            mv,
            last_move,
            san,
        }
    }

    /// Position after the move
    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn view(&self) -> BoardView {
        self.board.view()
    }

    #[inline]
    pub fn check_state(&self) -> CheckState {
        self.check_state
    }

    /// Move which led to this position, `None` for the starting position
    #[inline]
    pub fn mv(&self) -> Option<Move> {
        self.mv
    }

    #[inline]
    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    #[inline]
    pub fn fen(&self) -> &str {
        &self.fen
    }

    /// SAN of the move which led to this position, `None` for the starting position
    #[inline]
    pub fn san(&self) -> Option<&str> {
        self.san.as_deref()
    }
}

/// Game history
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    repeat: HashMap<u64, usize>,
}

impl History {
    /// Creates a history with the starting position `b`
    pub fn new(b: Board) -> History {
        let mut res = History {
            entries: Vec::new(),
            repeat: HashMap::new(),
        };
        res.push_entry(HistoryEntry::new(b, None));
        res
    }

    pub fn new_initial() -> History {
        History::new(Board::initial())
    }

    pub fn from_fen(s: &str) -> Result<History, board::FenParseError> {
        Ok(History::new(Board::from_fen(s)?))
    }

    /// Creates a history from the starting position `b` and space-separated UCI moves
    pub fn from_uci_list(b: Board, uci_list: &str) -> Result<History, UciParseError> {
        let mut res = History::new(b);
        res.push_uci_list(uci_list)?;
        Ok(res)
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        *self.repeat.entry(entry.board.zobrist_hash()).or_insert(0) += 1;
        self.entries.push(entry);
    }

    /// Number of entries, including the starting position
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always returns `false`, as the starting position is always present
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Latest entry
    #[inline]
    pub fn last(&self) -> &HistoryEntry {
        // The starting entry is never removed
        &self.entries[self.entries.len() - 1]
    }

    /// Current position
    #[inline]
    pub fn board(&self) -> &Board {
        &self.last().board
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> + '_ {
        self.entries.iter()
    }

    /// Returns the entry with index `index`
    pub fn position_at(&self, index: usize) -> Result<&HistoryEntry, HistoryError> {
        self.entries
            .get(index)
            .ok_or(HistoryError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    /// Number of times the current position occurred in the history, including itself
    pub fn repeat_count(&self) -> usize {
        self.repeat
            .get(&self.board().zobrist_hash())
            .copied()
            .unwrap_or(0)
    }

    /// Makes the move `mv` and appends the resulting position
    ///
    /// The move must be legal. On error, the history is left untouched. Returns the description
    /// of the executed move.
    pub fn push(&mut self, mv: Move) -> Result<LastMove, ValidateError> {
        let before = self.board();
        let san = mv.san(before)?;
        let last_move = LastMove::from_move(before, mv, san.check);
        let mut after = before.clone();
        moves::make_move_unchecked(&mut after, mv);

        self.push_entry(HistoryEntry::new(
            after,
            Some((mv, last_move, san.to_string())),
        ));
        Ok(last_move)
    }

    pub fn push_uci(&mut self, s: &str) -> Result<LastMove, uci::ParseError> {
        let mv = Move::from_uci_legal(s, self.board())?;
        Ok(self.push(mv)?)
    }

    pub fn push_uci_list(&mut self, uci_list: &str) -> Result<(), UciParseError> {
        for (pos, token) in uci_list.split_ascii_whitespace().enumerate() {
            self.push_uci(token)
                .map_err(|source| UciParseError { pos, source })?;
        }
        Ok(())
    }

    /// Calculates the outcome in the current position
    ///
    /// Unlike [`Board::calc_outcome()`], this also considers draws by repetition. If several
    /// outcomes hold at once, the strongest one is returned, in the order: checkmate and
    /// stalemate, insufficient material, 75 move rule, fivefold repetition, 50 move rule,
    /// threefold repetition.
    pub fn calc_outcome(&self) -> Option<Outcome> {
        let board = self.board();
        let outcome = board.calc_outcome();
        if let Some(o) = outcome {
            if o.is_force() {
                return outcome;
            }
        }

        let rep = self.repeat_count();
        match outcome {
            Some(Outcome::Draw(DrawReason::InsufficientMaterial | DrawReason::Moves75)) => outcome,
            _ if rep >= 5 => Some(Outcome::Draw(DrawReason::Repeat5)),
            Some(_) => outcome,
            None if rep >= 3 => Some(Outcome::Draw(DrawReason::Repeat3)),
            None => None,
        }
    }

    pub fn uci_list(&self) -> UciList<'_> {
        UciList(self)
    }

    /// Returns the wrapper to display the moves in SAN, like `1. e4 e5 2. Nf3`
    pub fn san_list(&self, policy: NumberPolicy) -> SanList<'_> {
        SanList {
            inner: self,
            policy,
        }
    }

    fn moves(&self) -> impl Iterator<Item = (&Board, &HistoryEntry)> + '_ {
        self.entries
            .iter()
            .zip(self.entries.iter().skip(1))
            .map(|(prev, entry)| (&prev.board, entry))
    }

    /// Groups the moves in SAN into rows of a move table
    ///
    /// If the history starts with Black to move, the first row has no White move.
    pub fn move_list(&self) -> Vec<MovePair<'_>> {
        let mut res: Vec<MovePair<'_>> = Vec::new();
        for (b, entry) in self.moves() {
            let number = b.raw().fullmove_number;
            let san = entry.san();
            match b.side() {
                Color::White => res.push(MovePair {
                    number,
                    white: san,
                    black: None,
                }),
                Color::Black => match res.last_mut() {
                    Some(pair) if pair.number == number && pair.black.is_none() => {
                        pair.black = san;
                    }
                    _ => res.push(MovePair {
                        number,
                        white: None,
                        black: san,
                    }),
                },
            }
        }
        res
    }
}

/// Row of a move table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MovePair<'a> {
    /// Move number
    pub number: u16,
    /// White's move in SAN
    pub white: Option<&'a str>,
    /// Black's move in SAN
    pub black: Option<&'a str>,
}

pub struct UciList<'a>(&'a History);

impl<'a> fmt::Display for UciList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, (_, entry)) in self.0.moves().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            if let Some(mv) = entry.mv() {
                write!(f, "{}", mv)?;
            }
        }
        Ok(())
    }
}

/// Numbering of moves in [`SanList`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum NumberPolicy {
    /// Don't print move numbers
    Omit,
    /// Take move numbers from the positions
    FromBoard,
    /// Start numbering from the given number
    Custom(usize),
}

pub struct SanList<'a> {
    inner: &'a History,
    policy: NumberPolicy,
}

impl<'a> fmt::Display for SanList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let real_start_num = self.inner.entries[0].board.raw().fullmove_number as usize;
        let start_num = match self.policy {
            NumberPolicy::Omit => None,
            NumberPolicy::FromBoard => Some(real_start_num),
            NumberPolicy::Custom(u) => Some(u),
        };

        for (i, (b, entry)) in self.inner.moves().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            if let Some(num) = start_num {
                let num = b.raw().fullmove_number as usize - real_start_num + num;
                match b.side() {
                    Color::White => write!(f, "{}. ", num)?,
                    Color::Black if i == 0 => write!(f, "{}... ", num)?,
                    Color::Black => {}
                }
            }
            write!(f, "{}", entry.san().unwrap_or_default())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Cell, Square, WinReason};
    use rand::{Rng, SeedableRng};
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    #[test]
    fn test_entries() {
        let h = History::from_uci_list(Board::initial(), "e2e4 e7e5 g1f3").unwrap();
        assert_eq!(h.len(), 4);
        assert_eq!(h.position_at(0).unwrap().fen(), Board::initial().as_fen());
        assert_eq!(h.position_at(0).unwrap().san(), None);
        assert_eq!(h.position_at(0).unwrap().last_move(), None);
        assert_eq!(
            h.position_at(1).unwrap().fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(h.position_at(3).unwrap().san(), Some("Nf3"));
        assert_eq!(
            h.position_at(3).unwrap().last_move(),
            Some(LastMove {
                piece: Cell::from_str("N").unwrap(),
                src: sq("g1"),
                dst: sq("f3"),
                promotion: None,
                move_type: MoveType::BASIC_MOVE,
            })
        );
        assert_eq!(
            h.position_at(4),
            Err(HistoryError::IndexOutOfRange { index: 4, len: 4 })
        );
        assert_eq!(h.uci_list().to_string(), "e2e4 e7e5 g1f3");
    }

    #[test]
    fn test_failed_push() {
        let mut h = History::new_initial();
        assert!(h.push_uci("e2e5").is_err());
        assert!(h.push_uci("e7e5").is_err());
        assert_eq!(h.len(), 1);
        assert_eq!(
            History::from_uci_list(Board::initial(), "e2e4 e2e4")
                .err()
                .map(|e| e.pos),
            Some(1)
        );
    }

    #[test]
    fn test_san_list() {
        let h = History::from_uci_list(Board::initial(), "e2e4 e7e5 g1f3 b8c6 f1b5").unwrap();
        assert_eq!(
            h.san_list(NumberPolicy::FromBoard).to_string(),
            "1. e4 e5 2. Nf3 Nc6 3. Bb5"
        );
        assert_eq!(
            h.san_list(NumberPolicy::Omit).to_string(),
            "e4 e5 Nf3 Nc6 Bb5"
        );
        assert_eq!(
            h.san_list(NumberPolicy::Custom(10)).to_string(),
            "10. e4 e5 11. Nf3 Nc6 12. Bb5"
        );
        assert_eq!(
            h.move_list(),
            vec![
                MovePair {
                    number: 1,
                    white: Some("e4"),
                    black: Some("e5")
                },
                MovePair {
                    number: 2,
                    white: Some("Nf3"),
                    black: Some("Nc6")
                },
                MovePair {
                    number: 3,
                    white: Some("Bb5"),
                    black: None
                },
            ]
        );

        let h = History::from_uci_list(
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1")
                .unwrap(),
            "e7e5 g1f3",
        )
        .unwrap();
        assert_eq!(
            h.san_list(NumberPolicy::FromBoard).to_string(),
            "1... e5 2. Nf3"
        );
        assert_eq!(
            h.move_list(),
            vec![
                MovePair {
                    number: 1,
                    white: None,
                    black: Some("e5")
                },
                MovePair {
                    number: 2,
                    white: Some("Nf3"),
                    black: None
                },
            ]
        );

        assert_eq!(History::new_initial().san_list(NumberPolicy::FromBoard).to_string(), "");
    }

    #[test]
    fn test_move_types() {
        let h = History::from_uci_list(
            Board::from_fen("r7/1P6/6k1/8/8/8/8/R3K2R w KQ - 0 1").unwrap(),
            "b7a8q g6g5 e1g1",
        )
        .unwrap();
        let promote = h.position_at(1).unwrap().last_move().unwrap();
        assert_eq!(
            promote.move_type,
            MoveType::CAPTURE | MoveType::PROMOTION
        );
        assert_eq!(promote.promotion, Some(Piece::Queen));
        assert_eq!(h.position_at(1).unwrap().san(), Some("bxa8=Q"));

        let castle = h.position_at(3).unwrap().last_move().unwrap();
        assert_eq!(castle.move_type, MoveType::CASTLING);
        assert_eq!(h.position_at(3).unwrap().san(), Some("O-O"));

        let h = History::from_uci_list(
            Board::from_fen("4k3/8/8/4p3/8/8/8/4RK2 w - - 0 1").unwrap(),
            "e1e5",
        )
        .unwrap();
        let capture = h.last().last_move().unwrap();
        assert_eq!(capture.move_type, MoveType::CAPTURE | MoveType::CHECK);
        assert_eq!(h.last().san(), Some("Rxe5+"));
        assert_eq!(h.last().check_state().king_square(), Some(sq("e8")));
    }

    #[test]
    fn test_check_types() {
        let h = History::from_uci_list(Board::initial(), "f2f3 e7e5 g2g4 d8h4").unwrap();
        let check = h.position_at(2).unwrap();
        assert!(!check.check_state().is_in_check());
        let mate = h.position_at(4).unwrap();
        assert_eq!(
            mate.last_move().unwrap().move_type,
            MoveType::BASIC_MOVE | MoveType::CHECK_MATE
        );
        assert_eq!(mate.check_state().king_square(), Some(sq("e1")));
        assert_eq!(mate.san(), Some("Qh4#"));
        assert_eq!(
            h.calc_outcome(),
            Some(Outcome::Win {
                side: Color::Black,
                reason: WinReason::Checkmate
            })
        );

        let h = History::from_uci_list(Board::initial(), "e2e4 f7f6 d1h5").unwrap();
        let last = h.last().last_move().unwrap();
        assert_eq!(last.move_type, MoveType::BASIC_MOVE | MoveType::CHECK);
        assert!(h.last().check_state().is_in_check());
    }

    #[test]
    fn test_repetition() {
        let mut h = History::new_initial();
        assert_eq!(h.repeat_count(), 1);
        for _ in 0..2 {
            h.push_uci_list("g1f3 g8f6 f3g1 f6g8").unwrap();
        }
        assert_eq!(h.repeat_count(), 3);
        assert_eq!(h.calc_outcome(), Some(Outcome::Draw(DrawReason::Repeat3)));
        for _ in 0..2 {
            h.push_uci_list("g1f3 g8f6 f3g1 f6g8").unwrap();
        }
        assert_eq!(h.repeat_count(), 5);
        assert_eq!(h.calc_outcome(), Some(Outcome::Draw(DrawReason::Repeat5)));
        h.push_uci("e2e4").unwrap();
        assert_eq!(h.calc_outcome(), None);
    }

    #[test]
    fn test_repetition_after_double_push() {
        // The position right after e2e4 carries an en passant target nobody can use
        let mut h = History::from_uci_list(Board::initial(), "e2e4").unwrap();
        assert_eq!(h.repeat_count(), 1);
        h.push_uci_list("g8f6 g1f3 f6g8 f3g1").unwrap();
        assert_eq!(h.board().ep_target(), None);
        assert_eq!(h.repeat_count(), 2);
        h.push_uci_list("g8f6 g1f3 f6g8 f3g1").unwrap();
        assert_eq!(h.repeat_count(), 3);
        assert_eq!(h.calc_outcome(), Some(Outcome::Draw(DrawReason::Repeat3)));
    }

    #[test]
    fn test_replay() {
        let mut rng = seeded_rng();
        let mut h = History::new_initial();
        for _ in 0..60 {
            let moves = crate::movegen::legal::gen_all(h.board());
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            h.push(mv).unwrap();
        }

        let mut b = Board::initial();
        for (i, entry) in h.iter().enumerate() {
            if let Some(mv) = entry.mv() {
                b = b.make_move(mv).unwrap();
            }
            let snapshot = h.position_at(i).unwrap();
            assert_eq!(snapshot.view(), b.view());
            assert_eq!(snapshot.check_state(), b.check_state());
            assert_eq!(snapshot.fen(), b.as_fen());
            assert_eq!(Board::from_fen(snapshot.fen()).unwrap(), b);
        }
    }

    fn seeded_rng() -> rand::rngs::StdRng {
        rand::rngs::StdRng::seed_from_u64(0x5eed_0f_6a3e)
    }
}
