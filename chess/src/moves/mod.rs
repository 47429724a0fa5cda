//! Moves and related stuff

mod base;
mod make;

pub mod san;
pub mod uci;

pub use base::*;
pub use make::*;

pub(crate) use base::{apply_to_cells, make_move_unchecked};

pub type SanMove = san::Move;
pub type UciMove = uci::Move;
