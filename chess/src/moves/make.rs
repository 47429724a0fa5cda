use super::base::{self, Move, ValidateError};
use super::uci;
use crate::board::Board;

/// Something that can be applied to a board as a move
///
/// The original board is never changed: a new board with the move applied is returned instead.
pub trait Make {
    type Err;

    fn make(&self, board: &Board) -> Result<Board, Self::Err>;
}

impl Make for Move {
    type Err = ValidateError;

    #[inline]
    fn make(&self, board: &Board) -> Result<Board, Self::Err> {
        self.validate(board)?;
        let mut cloned = board.clone();
        base::make_move_unchecked(&mut cloned, *self);
        Ok(cloned)
    }
}

impl Make for uci::Move {
    type Err = uci::ParseError;

    #[inline]
    fn make(&self, board: &Board) -> Result<Board, Self::Err> {
        let mv = self.into_move(board)?;
        Ok(mv.make(board)?)
    }
}

/// Move given as a UCI string, like `e2e4`
pub struct Uci<S: AsRef<str>>(pub S);

impl<S: AsRef<str>> Make for Uci<S> {
    type Err = uci::ParseError;

    #[inline]
    fn make(&self, board: &Board) -> Result<Board, Self::Err> {
        let mv = Move::from_uci_legal(self.0.as_ref(), board)?;
        let mut cloned = board.clone();
        base::make_move_unchecked(&mut cloned, mv);
        Ok(cloned)
    }
}
