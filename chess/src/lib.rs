//! # Chess rules engine
//!
//! This crate implements the rules of chess for an interactive board: move generation with
//! checks, pins, castling, en passant and promotions, detection of check, checkmate and
//! stalemate, and the game history in FEN and SAN.
//!
//! The main entry point for a user interface is [`Game`]. It accepts coordinate pairs, reports
//! legal destinations and keeps the history. Lower-level building blocks are also available:
//! [`Board`] for positions, [`Move`] for moves and [`movegen`] for move generation.
//!
//! # Example
//!
//! ```
//! use chessrules::{Board, Game, Outcome, WinReason, Color, Square};
//! use chessrules::moves::uci;
//! use std::str::FromStr;
//!
//! // Play a fool's mate through the game interface
//! let mut game = Game::new();
//! for (src, dst) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
//!     let src = Square::from_str(src).unwrap();
//!     let dst = Square::from_str(dst).unwrap();
//!     game.attempt_move(src, dst, None).unwrap();
//! }
//! assert_eq!(
//!     game.outcome(),
//!     Some(Outcome::Win { side: Color::Black, reason: WinReason::Checkmate }),
//! );
//! assert_eq!(game.game_over_message().as_deref(), Some("Black won by checkmate"));
//! assert_eq!(game.san_list(), "1. f3 e5 2. g4 Qh4#");
//!
//! // Work with boards directly
//! let board = Board::initial();
//! let mv = uci::Move::from_str("e2e4").unwrap();
//! let board = board.make_move(mv).unwrap();
//! assert_eq!(board.as_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
//! ```

pub mod attack;
pub mod board;
pub mod game;
pub mod history;
pub mod movegen;
pub mod moves;
pub mod types;

mod zobrist;

pub use chessrules_base::{bitboard, bitboard_consts, geometry};

pub use bitboard::Bitboard;
pub use board::{Board, RawBoard};
pub use game::{Game, MoveError, MoveStatus};
pub use history::{History, HistoryEntry};
pub use movegen::{legal_destinations, safe_squares, MoveList};
pub use moves::{Make, Move, MoveKind, PromotePiece};
pub use types::{
    CastlingRights, CastlingSide, Cell, CheckState, Color, DrawReason, File, LastMove, MoveType,
    Outcome, OutcomeFilter, Piece, Rank, Square, WinReason,
};
