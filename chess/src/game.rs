//! Game session
//!
//! [`Game`] is what an interactive board talks to. It accepts coordinate pairs, holds
//! promotions until the piece is chosen, and keeps the history together with the legal
//! destinations for the side to move.
//!
//! # Example
//!
//! ```
//! # use chessrules::{Game, Square, PromotePiece};
//! # use chessrules::game::MoveStatus;
//! # use std::str::FromStr;
//! let sq = |s| Square::from_str(s).unwrap();
//!
//! let mut game = Game::new();
//! assert!(game.legal_destinations(sq("e2")).contains(&sq("e4")));
//! assert!(matches!(game.attempt_move(sq("e2"), sq("e4"), None), Ok(MoveStatus::Done(_))));
//! assert_eq!(game.fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
//! ```

use crate::board::{Board, BoardView, FenParseError};
use crate::geometry;
use crate::history::{History, HistoryEntry, HistoryError, MovePair, NumberPolicy};
use crate::movegen::{self, SafeSquares};
use crate::moves::{uci, PromotePiece};
use crate::types::{CheckState, Color, LastMove, Outcome, OutcomeFilter, Piece, Square};

use crossbeam_channel::{Receiver, Sender};
use log::{debug, info, trace};
use thiserror::Error;

/// Error executing a request on a [`Game`]
///
/// A rejected request never changes the game.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("game is already finished")]
    GameFinished,
    #[error("square {0} has no piece of the side to move")]
    InvalidSelection(Square),
    #[error("piece on {src} cannot move to {dst}")]
    IllegalDestination { src: Square, dst: Square },
    #[error("no promotion is pending")]
    NoPendingPromotion,
}

/// Result of a successful [`Game::attempt_move()`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MoveStatus {
    /// Move is executed
    Done(LastMove),
    /// Pawn reaches the last rank, and the promotion piece must be given via
    /// [`Game::promote()`]. The board is not changed yet.
    PromotionPending,
}

/// Interactive chess game
///
/// A cloned game keeps publishing to the subscribers of the original one.
#[derive(Debug, Clone)]
pub struct Game {
    history: History,
    safe_squares: SafeSquares,
    pending: Option<(Square, Square)>,
    selected: Option<Square>,
    outcome: Option<Outcome>,
    filter: OutcomeFilter,
    observers: Vec<Sender<String>>,
}

impl Game {
    /// Starts a game from the initial position, which ends only by checkmate or stalemate
    pub fn new() -> Game {
        Game::from_board(Board::initial(), OutcomeFilter::Force)
    }

    /// Starts a game from the initial position, with outcomes filtered by `filter`
    pub fn with_filter(filter: OutcomeFilter) -> Game {
        Game::from_board(Board::initial(), filter)
    }

    pub fn from_board(board: Board, filter: OutcomeFilter) -> Game {
        let mut res = Game {
            history: History::new(board),
            safe_squares: SafeSquares::new(),
            pending: None,
            selected: None,
            outcome: None,
            filter,
            observers: Vec::new(),
        };
        res.refresh();
        res
    }

    pub fn from_fen(fen: &str, filter: OutcomeFilter) -> Result<Game, FenParseError> {
        Ok(Game::from_board(Board::from_fen(fen)?, filter))
    }

    fn refresh(&mut self) {
        self.outcome = self
            .history
            .calc_outcome()
            .filter(|o| o.passes(self.filter));
        self.safe_squares = match self.outcome {
            Some(_) => SafeSquares::new(),
            None => movegen::safe_squares(self.history.board()),
        };
    }

    /// Current position
    #[inline]
    pub fn board(&self) -> &Board {
        self.history.board()
    }

    #[inline]
    pub fn view(&self) -> BoardView {
        self.board().view()
    }

    #[inline]
    pub fn side(&self) -> Color {
        self.board().side()
    }

    #[inline]
    pub fn check_state(&self) -> CheckState {
        self.history.last().check_state()
    }

    /// Last executed move, or `None` if no moves were made yet
    #[inline]
    pub fn last_move(&self) -> Option<LastMove> {
        self.history.last().last_move()
    }

    /// Legal destinations of each piece of the side to move
    ///
    /// Empty if the game is finished.
    #[inline]
    pub fn safe_squares(&self) -> &SafeSquares {
        &self.safe_squares
    }

    #[inline]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[inline]
    pub fn filter(&self) -> OutcomeFilter {
        self.filter
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Returns the message to show when the game is finished, like "White won by checkmate"
    pub fn game_over_message(&self) -> Option<String> {
        self.outcome.map(|o| o.to_string())
    }

    /// FEN of the current position
    #[inline]
    pub fn fen(&self) -> &str {
        self.history.last().fen()
    }

    #[inline]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Moves made in the game in SAN, like `1. e4 e5 2. Nf3`
    pub fn san_list(&self) -> String {
        self.history.san_list(NumberPolicy::FromBoard).to_string()
    }

    pub fn move_list(&self) -> Vec<MovePair<'_>> {
        self.history.move_list()
    }

    /// Returns the snapshot with index `index`, where index 0 is the starting position
    pub fn position_at(&self, index: usize) -> Result<&HistoryEntry, HistoryError> {
        self.history.position_at(index)
    }

    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Source and destination of the move waiting for a promotion piece
    #[inline]
    pub fn pending_promotion(&self) -> Option<(Square, Square)> {
        self.pending
    }

    /// Subscribes to the FEN of the current position
    ///
    /// The receiver gets the current FEN right away, and then a new one after every executed
    /// move. Held promotions and rejected requests publish nothing. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<String> {
        let (tx, rx) = crossbeam_channel::unbounded();
        if tx.send(self.fen().to_string()).is_ok() {
            self.observers.push(tx);
        }
        rx
    }

    fn publish(&mut self) {
        let fen = self.fen().to_string();
        let before = self.observers.len();
        self.observers.retain(|tx| tx.send(fen.clone()).is_ok());
        if self.observers.len() < before {
            trace!("{} observers unsubscribed", before - self.observers.len());
        }
    }

    /// Returns the ordered legal destinations of the piece on `src`
    ///
    /// The result is empty if `src` doesn't hold a piece of the side to move, or if the game is
    /// finished.
    pub fn legal_destinations(&self, src: Square) -> &[Square] {
        self.safe_squares
            .get(&src)
            .map(|dsts| dsts.as_slice())
            .unwrap_or(&[][..])
    }

    /// Selects the piece on `sq` and returns its legal destinations
    ///
    /// Selecting the already selected square clears the selection and returns an empty list.
    pub fn select_origin(&mut self, sq: Square) -> Result<&[Square], MoveError> {
        self.check_running()?;
        if self.selected == Some(sq) {
            self.selected = None;
            return Ok(&[][..]);
        }
        self.check_origin(sq)?;
        self.selected = Some(sq);
        Ok(self.legal_destinations(sq))
    }

    /// Clears the selection made by [`Game::select_origin()`]
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    fn check_running(&self) -> Result<(), MoveError> {
        if self.outcome.is_some() {
            trace!("request rejected: game is finished");
            return Err(MoveError::GameFinished);
        }
        Ok(())
    }

    fn check_origin(&self, src: Square) -> Result<(), MoveError> {
        if self.board().get(src).color() != Some(self.side()) {
            trace!("request rejected: no piece to move on {}", src);
            return Err(MoveError::InvalidSelection(src));
        }
        Ok(())
    }

    /// Tries to move the piece from `src` to `dst`
    ///
    /// If a pawn reaches the last rank and `promote` is `None`, the move is held until
    /// [`Game::promote()`] is called, and [`MoveStatus::PromotionPending`] is returned. The
    /// promotion piece is ignored for other moves. A successful attempt discards the previously
    /// pending promotion.
    pub fn attempt_move(
        &mut self,
        src: Square,
        dst: Square,
        promote: Option<PromotePiece>,
    ) -> Result<MoveStatus, MoveError> {
        self.check_running()?;
        self.check_origin(src)?;
        if !self.legal_destinations(src).contains(&dst) {
            trace!("request rejected: {} cannot move to {}", src, dst);
            return Err(MoveError::IllegalDestination { src, dst });
        }

        let side = self.side();
        let is_promote = self.board().get(src).piece() == Some(Piece::Pawn)
            && dst.rank() == geometry::promote_rank(side);
        match (is_promote, promote) {
            (true, None) => {
                debug!("holding promotion {}{} until the piece is chosen", src, dst);
                self.pending = Some((src, dst));
                Ok(MoveStatus::PromotionPending)
            }
            (true, Some(_)) => self.execute(src, dst, promote).map(MoveStatus::Done),
            (false, _) => self.execute(src, dst, None).map(MoveStatus::Done),
        }
    }

    /// Finalizes the pending promotion with the piece `piece`
    pub fn promote(&mut self, piece: PromotePiece) -> Result<LastMove, MoveError> {
        self.check_running()?;
        let Some((src, dst)) = self.pending else {
            trace!("request rejected: no promotion is pending");
            return Err(MoveError::NoPendingPromotion);
        };
        self.execute(src, dst, Some(piece))
    }

    /// Discards the pending promotion, returns `true` if there was one
    pub fn cancel_promotion(&mut self) -> bool {
        let res = self.pending.take();
        if let Some((src, dst)) = res {
            debug!("promotion {}{} cancelled", src, dst);
        }
        res.is_some()
    }

    fn execute(
        &mut self,
        src: Square,
        dst: Square,
        promote: Option<PromotePiece>,
    ) -> Result<LastMove, MoveError> {
        let illegal = MoveError::IllegalDestination { src, dst };
        let mv = uci::Move { src, dst, promote }
            .into_move(self.board())
            .map_err(|_| illegal)?;
        let last_move = self.history.push(mv).map_err(|_| illegal)?;

        self.pending = None;
        self.selected = None;
        self.refresh();
        self.publish();

        debug!(
            "executed {} ({}), {} to move",
            mv,
            self.history.last().san().unwrap_or_default(),
            self.side()
        );
        if let Some(outcome) = self.outcome {
            info!("game finished: {}", outcome);
        }
        Ok(last_move)
    }
}

impl Default for Game {
    fn default() -> Game {
        Game::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::legal;
    use crate::types::{CastlingSide, Cell, DrawReason, MoveType, WinReason};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    fn play(game: &mut Game, moves: &[(&str, &str)]) {
        for &(src, dst) in moves {
            assert!(matches!(
                game.attempt_move(sq(src), sq(dst), None),
                Ok(MoveStatus::Done(_))
            ));
        }
    }

    #[test]
    fn test_enpassant() {
        let mut game = Game::new();
        play(&mut game, &[("e2", "e4")]);
        assert_eq!(game.board().ep_target(), Some(Square::new(2, 4)));
        play(&mut game, &[("a7", "a6")]);
        assert_eq!(game.board().ep_target(), None);

        play(&mut game, &[("e4", "e5"), ("d7", "d5")]);
        assert_eq!(game.board().ep_target(), Some(sq("d6")));
        assert!(game.legal_destinations(sq("e5")).contains(&sq("d6")));
        let last = match game.attempt_move(sq("e5"), sq("d6"), None) {
            Ok(MoveStatus::Done(last)) => last,
            res => panic!("unexpected result {:?}", res),
        };
        assert_eq!(last.move_type, MoveType::CAPTURE);
        assert_eq!(game.board().get(sq("d5")), Cell::EMPTY);
        assert_eq!(game.board().get(sq("d6")), Cell::from_str("P").unwrap());
        assert_eq!(game.board().ep_target(), None);
        assert_eq!(game.san_list(), "1. e4 a6 2. e5 d5 3. exd6");
    }

    #[test]
    fn test_castling() {
        let mut game =
            Game::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1", OutcomeFilter::Force)
                .unwrap();
        assert_eq!(game.legal_destinations(sq("e1")), &[sq("c1"), sq("d1"), sq("f1"), sq("g1")][..]);

        let last = game.attempt_move(sq("e1"), sq("g1"), None).unwrap();
        assert!(matches!(last, MoveStatus::Done(l) if l.move_type == MoveType::CASTLING));
        assert_eq!(game.board().get(sq("f1")), Cell::from_str("R").unwrap());
        assert_eq!(game.board().get(sq("h1")), Cell::EMPTY);
        assert!(!game.board().castling().has_color(Color::White));
        assert!(game.board().castling().has(Color::Black, CastlingSide::Queen));

        let game = Game::from_fen("4k3/8/8/8/8/8/8/4KN1R w K - 0 1", OutcomeFilter::Force).unwrap();
        assert!(!game.legal_destinations(sq("e1")).contains(&sq("g1")));

        let game = Game::from_fen("4kr2/8/8/8/8/8/8/4K2R w K - 0 1", OutcomeFilter::Force).unwrap();
        assert!(!game.legal_destinations(sq("e1")).contains(&sq("g1")));

        let game = Game::from_fen("4k1r1/8/8/8/8/8/8/4K2R w K - 0 1", OutcomeFilter::Force).unwrap();
        assert!(!game.legal_destinations(sq("e1")).contains(&sq("g1")));

        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K2R w - - 0 1", OutcomeFilter::Force).unwrap();
        assert!(!game.legal_destinations(sq("e1")).contains(&sq("g1")));
    }

    #[test]
    fn test_pending_promotion() {
        let mut game = Game::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1", OutcomeFilter::Force).unwrap();
        let fen = game.fen().to_string();

        assert_eq!(game.promote(PromotePiece::Queen), Err(MoveError::NoPendingPromotion));
        assert_eq!(
            game.attempt_move(sq("e7"), sq("e8"), None),
            Ok(MoveStatus::PromotionPending)
        );
        assert_eq!(game.pending_promotion(), Some((sq("e7"), sq("e8"))));
        assert_eq!(game.fen(), fen);
        assert_eq!(game.history().len(), 1);
        assert_eq!(game.side(), Color::White);

        assert!(game.cancel_promotion());
        assert!(!game.cancel_promotion());
        assert_eq!(game.pending_promotion(), None);

        game.attempt_move(sq("e7"), sq("e8"), None).unwrap();
        assert_eq!(
            game.attempt_move(sq("e7"), sq("d8"), None),
            Err(MoveError::IllegalDestination {
                src: sq("e7"),
                dst: sq("d8")
            })
        );
        assert_eq!(game.pending_promotion(), Some((sq("e7"), sq("e8"))));

        let last = game.promote(PromotePiece::Knight).unwrap();
        assert_eq!(last.promotion, Some(Piece::Knight));
        assert_eq!(last.move_type, MoveType::PROMOTION);
        assert_eq!(game.board().get(sq("e8")), Cell::from_str("N").unwrap());
        assert_eq!(game.board().get(sq("e7")), Cell::EMPTY);
        assert_eq!(game.pending_promotion(), None);
        assert_eq!(game.side(), Color::Black);
        assert_eq!(game.history().last().san(), Some("e8=N"));
    }

    #[test]
    fn test_promotion_with_piece() {
        let mut game = Game::from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1", OutcomeFilter::Force).unwrap();
        let res = game.attempt_move(sq("e7"), sq("e8"), Some(PromotePiece::Queen));
        assert!(matches!(res, Ok(MoveStatus::Done(l)) if l.promotion == Some(Piece::Queen)));
        assert_eq!(game.board().get(sq("e8")), Cell::from_str("Q").unwrap());
    }

    #[test]
    fn test_rejects() {
        let mut game = Game::new();
        let fen = game.fen().to_string();
        assert_eq!(
            game.attempt_move(sq("e4"), sq("e5"), None),
            Err(MoveError::InvalidSelection(sq("e4")))
        );
        assert_eq!(
            game.attempt_move(sq("e7"), sq("e5"), None),
            Err(MoveError::InvalidSelection(sq("e7")))
        );
        assert_eq!(
            game.attempt_move(sq("e2"), sq("e5"), None),
            Err(MoveError::IllegalDestination {
                src: sq("e2"),
                dst: sq("e5")
            })
        );
        assert_eq!(game.fen(), fen);
        assert_eq!(game.history().len(), 1);
        assert!(game.legal_destinations(sq("e7")).is_empty());
        assert!(game.legal_destinations(sq("e4")).is_empty());
    }

    #[test]
    fn test_select() {
        let mut game = Game::new();
        assert_eq!(
            game.select_origin(sq("g1")).unwrap(),
            &[sq("f3"), sq("h3")][..]
        );
        assert_eq!(game.selected(), Some(sq("g1")));
        assert!(game.select_origin(sq("g1")).unwrap().is_empty());
        assert_eq!(game.selected(), None);
        assert_eq!(
            game.select_origin(sq("g8")),
            Err(MoveError::InvalidSelection(sq("g8")))
        );
        game.select_origin(sq("e2")).unwrap();
        play(&mut game, &[("e2", "e4")]);
        assert_eq!(game.selected(), None);
    }

    #[test]
    fn test_checkmate() {
        let mut game = Game::new();
        play(&mut game, &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")]);
        assert_eq!(
            game.outcome(),
            Some(Outcome::Win {
                side: Color::Black,
                reason: WinReason::Checkmate
            })
        );
        assert_eq!(game.game_over_message().as_deref(), Some("Black won by checkmate"));
        assert_eq!(game.check_state().king_square(), Some(sq("e1")));
        assert!(!game.board().has_legal_moves());
        assert!(game.safe_squares().is_empty());
        assert_eq!(
            game.attempt_move(sq("e1"), sq("f2"), None),
            Err(MoveError::GameFinished)
        );
        assert_eq!(game.select_origin(sq("e1")), Err(MoveError::GameFinished));
        assert_eq!(
            game.last_move().map(|l| l.move_type),
            Some(MoveType::BASIC_MOVE | MoveType::CHECK_MATE)
        );
        assert_eq!(game.san_list(), "1. f3 e5 2. g4 Qh4#");
    }

    #[test]
    fn test_stalemate() {
        let mut game = Game::from_fen("k7/8/8/2Q5/8/8/8/7K w - - 0 1", OutcomeFilter::Force).unwrap();
        assert_eq!(game.outcome(), None);
        play(&mut game, &[("c5", "c7")]);
        assert_eq!(game.outcome(), Some(Outcome::Draw(DrawReason::Stalemate)));
        assert_eq!(game.game_over_message().as_deref(), Some("Draw by stalemate"));
        assert!(!game.check_state().is_in_check());
        assert!(!game.board().has_legal_moves());
    }

    #[test]
    fn test_filter() {
        let cycle = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];

        let mut game = Game::new();
        play(&mut game, &cycle);
        play(&mut game, &cycle);
        assert_eq!(game.history().repeat_count(), 3);
        assert_eq!(game.outcome(), None);

        let mut game = Game::with_filter(OutcomeFilter::Strict);
        play(&mut game, &cycle);
        play(&mut game, &cycle);
        assert_eq!(game.outcome(), None);

        let mut game = Game::with_filter(OutcomeFilter::Relaxed);
        play(&mut game, &cycle);
        play(&mut game, &cycle);
        assert_eq!(game.outcome(), Some(Outcome::Draw(DrawReason::Repeat3)));
        assert_eq!(
            game.game_over_message().as_deref(),
            Some("Draw by threefold repetition")
        );

        let game = Game::from_fen("8/8/8/3k4/8/8/8/2NK4 w - - 0 1", OutcomeFilter::Force).unwrap();
        assert_eq!(game.outcome(), None);
        let game = Game::from_fen("8/8/8/3k4/8/8/8/2NK4 w - - 0 1", OutcomeFilter::Strict).unwrap();
        assert_eq!(
            game.outcome(),
            Some(Outcome::Draw(DrawReason::InsufficientMaterial))
        );
    }

    #[test]
    fn test_history() {
        let mut game = Game::new();
        play(&mut game, &[("e2", "e4"), ("e7", "e5"), ("g1", "f3")]);
        assert_eq!(game.history().len(), 4);
        assert_eq!(game.position_at(0).unwrap().view(), Board::initial().view());
        assert_eq!(
            game.position_at(1).unwrap().fen(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(
            game.position_at(7),
            Err(HistoryError::IndexOutOfRange { index: 7, len: 4 })
        );
        assert_eq!(game.move_list().len(), 2);
        assert_eq!(game.move_list()[1].white, Some("Nf3"));
    }

    #[test]
    fn test_subscribe() {
        let mut game = Game::from_fen("8/4P3/8/8/8/8/1k6/6K1 w - - 0 1", OutcomeFilter::Force).unwrap();
        let rx = game.subscribe();
        let dropped = game.subscribe();
        assert_eq!(rx.try_recv().unwrap(), "8/4P3/8/8/8/8/1k6/6K1 w - - 0 1");
        drop(dropped);

        assert!(game.attempt_move(sq("g1"), sq("g3"), None).is_err());
        assert_eq!(
            game.attempt_move(sq("e7"), sq("e8"), None),
            Ok(MoveStatus::PromotionPending)
        );
        assert!(rx.try_recv().is_err());

        game.promote(PromotePiece::Queen).unwrap();
        assert_eq!(game.observers.len(), 1);
        play(&mut game, &[("b2", "b3")]);

        let published: Vec<String> = rx.try_iter().collect();
        assert_eq!(
            published,
            vec![
                "4Q3/8/8/8/8/8/1k6/6K1 b - - 0 1".to_string(),
                "4Q3/8/8/8/8/1k6/8/6K1 w - - 1 2".to_string(),
            ]
        );
        assert_eq!(published.last().map(String::as_str), Some(game.fen()));
    }

    #[test]
    fn test_random_playouts() {
        let mut rng = StdRng::seed_from_u64(0xc4e55);
        for _ in 0..20 {
            let mut game = Game::with_filter(OutcomeFilter::Strict);
            for _ in 0..300 {
                let board = game.board().clone();

                for (&src, dsts) in game.safe_squares() {
                    for mv in &legal::gen_from(&board, src) {
                        assert!(dsts.contains(&mv.dst()));
                        let after = board.make_move(*mv).unwrap();
                        assert!(!after.is_opponent_king_attacked());
                    }
                }

                let has_moves = !movegen::safe_squares(&board).is_empty();
                assert_eq!(has_moves, board.has_legal_moves());
                if board.is_check() {
                    assert_eq!(
                        !has_moves,
                        matches!(
                            game.outcome(),
                            Some(Outcome::Win {
                                reason: WinReason::Checkmate,
                                ..
                            })
                        )
                    );
                }
                if game.is_finished() {
                    break;
                }

                let origins: Vec<Square> = game.safe_squares().keys().copied().collect();
                let src = origins[rng.gen_range(0..origins.len())];
                let dsts = game.legal_destinations(src);
                let dst = dsts[rng.gen_range(0..dsts.len())];
                let last = match game.attempt_move(src, dst, None).unwrap() {
                    MoveStatus::Done(last) => last,
                    MoveStatus::PromotionPending => {
                        let piece = PromotePiece::ALL[rng.gen_range(0..4)];
                        game.promote(piece).unwrap()
                    }
                };

                let after = game.board();
                assert!(after.castling().is_subset_of(board.castling()));
                let double_push = last.piece.piece() == Some(Piece::Pawn)
                    && last.src.row().abs_diff(last.dst.row()) == 2;
                if double_push {
                    let passed = Square::new((last.src.row() + last.dst.row()) / 2, last.src.col());
                    assert_eq!(after.ep_target(), Some(passed));
                } else {
                    assert_eq!(after.ep_target(), None);
                }
                assert_eq!(Board::from_fen(game.fen()).unwrap(), *after);
            }
        }
    }
}
