//! Board and related things

use crate::bitboard::Bitboard;
use crate::moves::Make;
use crate::types::{
    self, CastlingRights, CastlingSide, Cell, CheckState, Color, DrawReason, File, Outcome, Piece,
    Rank, Square, WinReason,
};
use crate::{attack, bitboard_consts, geometry, movegen, zobrist};

use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// Error converting [`RawBoard`] into [`Board`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// En passant target is not on the 3rd rank after White's move or on the 6th rank after
    /// Black's move
    #[error("en passant target {0} is on a wrong rank")]
    InvalidEnpassant(Square),
    /// A side has more than 16 pieces
    #[error("{0:?} has more than 16 pieces")]
    TooManyPieces(Color),
    #[error("{0:?} has no king")]
    NoKing(Color),
    #[error("{0:?} has more than one king")]
    TooManyKings(Color),
    /// Pawn stands on the 1st or the 8th rank
    #[error("pawn on {0} cannot stand on a back rank")]
    InvalidPawn(Square),
    /// King of the side which is not to move is in check
    #[error("king of the side not to move is in check")]
    OpponentKingAttacked,
}

/// Error parsing piece placement, the first field of FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    #[error("row for rank {0} describes more than 8 squares")]
    RowTooLong(Rank),
    #[error("row for rank {0} describes less than 8 squares")]
    RowTooShort(Rank),
    #[error("more than 8 rows")]
    TooManyRows,
    #[error("less than 8 rows")]
    NotEnoughRows,
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Malformed FEN string
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawFenParseError {
    #[error("FEN is empty")]
    Empty,
    #[error("bad piece placement: {0}")]
    Placement(#[from] PlacementParseError),
    #[error("side to move is missing")]
    NoMoveSide,
    #[error("bad side to move: {0}")]
    MoveSide(#[from] types::ColorParseError),
    #[error("castling rights are missing")]
    NoCastling,
    #[error("bad castling rights: {0}")]
    Castling(#[from] types::CastlingRightsParseError),
    #[error("en passant target is missing")]
    NoEnpassant,
    #[error("bad en passant target: {0}")]
    Enpassant(#[from] types::SquareParseError),
    /// En passant target doesn't match the side which made the last move
    #[error("en passant target cannot be on rank {0}")]
    InvalidEnpassantRank(Rank),
    #[error("bad halfmove clock: {0}")]
    HalfmoveClock(ParseIntError),
    #[error("bad fullmove number: {0}")]
    FullmoveNumber(ParseIntError),
    /// FEN has more than six fields
    #[error("extra data after the fullmove number")]
    ExtraData,
}

/// FEN string which is malformed or describes an invalid position
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// FEN syntax is wrong
    #[error("cannot parse FEN: {0}")]
    Fen(#[from] RawFenParseError),
    /// FEN is well-formed, but describes an invalid position
    #[error("invalid position: {0}")]
    Valid(#[from] ValidateError),
}

/// Row-major view of the board, `view[row][col]`
///
/// Row 0 is White's back rank, column 0 is the `a` file.
pub type BoardView = [[Cell; 8]; 8];

/// Raw chess board
///
/// Holds the same data as [`Board`], but without any validation, so the fields are public and
/// may describe an impossible position. Edit it freely, then turn it into a [`Board`] with
/// [`Board::try_from()`].
///
/// # Example
///
/// ```
/// # use chessrules::{RawBoard, Board, File, Rank, Color, Piece, Cell};
/// #
/// let mut raw = RawBoard::empty();
/// raw.side = Color::Black;
/// raw.halfmove_clock = 3;
/// raw.fullmove_number = 17;
/// raw.put2(File::G, Rank::R1, Cell::from_parts(Color::White, Piece::King));
/// raw.put2(File::A, Rank::R7, Cell::from_parts(Color::Black, Piece::King));
/// raw.put2(File::C, Rank::R3, Cell::from_parts(Color::White, Piece::Bishop));
///
/// let board = Board::try_from(raw).unwrap();
/// assert_eq!(board.as_fen(), "8/k7/8/8/8/2B5/8/6K1 b - - 3 17");
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RawBoard {
    /// Contents of the board, indexed by [`Square::index()`]
    pub cells: [Cell; 64],
    /// Side to move
    pub side: Color,
    /// Castling rights
    pub castling: CastlingRights,
    /// En passant target square
    ///
    /// It is the square passed over by a pawn which has just made a double move. It stays
    /// set for exactly one move, whether or not an en passant capture is possible.
    pub ep_target: Option<Square>,
    /// Half-moves since the last pawn move or capture
    pub halfmove_clock: u16,
    /// Number of the current full move, starting from 1 and incremented after Black moves
    pub fullmove_number: u16,
}

impl RawBoard {
    /// Returns an empty `RawBoard`
    #[inline]
    pub const fn empty() -> RawBoard {
        RawBoard {
            cells: [Cell::EMPTY; 64],
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Standard starting position
    pub fn initial() -> RawBoard {
        let mut res = RawBoard {
            castling: CastlingRights::FULL,
            ..RawBoard::empty()
        };
        const BACK_RANK: [Piece; 8] = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for color in [Color::White, Color::Black] {
            let back = geometry::castling_rank(color);
            let pawns = geometry::pawn_home_rank(color);
            for (file, piece) in File::iter().zip(BACK_RANK) {
                res.put2(file, back, Cell::from_parts(color, piece));
                res.put2(file, pawns, Cell::from_parts(color, Piece::Pawn));
            }
        }
        res
    }

    /// Parses a board from FEN
    #[inline]
    pub fn from_fen(fen: &str) -> Result<RawBoard, RawFenParseError> {
        RawBoard::from_str(fen)
    }

    /// Returns the contents of the square `sq`
    #[inline]
    pub fn get(&self, sq: Square) -> Cell {
        self.cells[sq.index()]
    }

    /// Same as `get()`, addressing the square by file and rank
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.get(Square::from_parts(file, rank))
    }

    /// Puts `cell` to the square `sq`
    #[inline]
    pub fn put(&mut self, sq: Square, cell: Cell) {
        self.cells[sq.index()] = cell;
    }

    /// Same as `put()`, addressing the square by file and rank
    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, cell: Cell) {
        self.put(Square::from_parts(file, rank), cell);
    }

    fn can_capture_enpassant(&self, target: Square) -> bool {
        let pawn = Cell::from_parts(self.side, Piece::Pawn);
        let back = -geometry::pawn_forward(self.side);
        [-1, 1]
            .into_iter()
            .filter_map(|dc| target.shift(back, dc))
            .any(|sq| self.get(sq) == pawn)
    }

    /// Returns the row-major view of the cells
    pub fn view(&self) -> BoardView {
        let mut res = [[Cell::EMPTY; 8]; 8];
        for sq in Square::iter() {
            res[sq.row()][sq.col()] = self.get(sq);
        }
        res
    }

    /// Computes the Zobrist hash from scratch
    ///
    /// Counters are not hashed, so equal hashes mean a repeated position. The en passant
    /// target is hashed only when a pawn of the side to move stands next to the passed pawn.
    pub fn zobrist_hash(&self) -> u64 {
        let mut hash = if self.side == Color::White {
            zobrist::MOVE_SIDE
        } else {
            0
        };
        if let Some(p) = self.ep_target.filter(|&p| self.can_capture_enpassant(p)) {
            hash ^= zobrist::enpassant(p);
        }
        hash ^= zobrist::castling(self.castling);
        for (i, cell) in self.cells.iter().enumerate() {
            if cell.is_occupied() {
                hash ^= zobrist::pieces(*cell, Square::from_index(i));
            }
        }
        hash
    }

    /// Wraps the board to allow pretty-printing with the given style `style`
    ///
    /// # Example
    ///
    /// ```
    /// # use chessrules::{RawBoard, board::PrettyStyle};
    /// #
    /// let r = RawBoard::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|abcdefgh
    /// "#;
    /// assert_eq!(r.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { raw: self, style }
    }

    /// Formats the position as FEN
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl Default for RawBoard {
    #[inline]
    fn default() -> RawBoard {
        RawBoard::empty()
    }
}

/// Validated chess position
///
/// Every value of this type passed the checks in [`Board::try_from()`], so move generation and
/// check detection can rely on both kings being present and the side to move not giving check.
///
/// The board is small and `Copy`-sized, so moves are made on copies instead of being undone.
#[derive(Debug, Clone)]
pub struct Board {
    pub(crate) r: RawBoard,
    pub(crate) hash: u64,
    pub(crate) kings: [Square; Color::COUNT],
}

impl Board {
    /// Standard starting position
    pub fn initial() -> Board {
        let r = RawBoard::initial();
        Board {
            r,
            hash: r.zobrist_hash(),
            kings: [
                Square::from_parts(File::E, Rank::R1),
                Square::from_parts(File::E, Rank::R8),
            ],
        }
    }

    /// Parses a board from FEN
    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        Board::from_str(fen)
    }

    /// Unvalidated data behind this board
    #[inline]
    pub fn raw(&self) -> &RawBoard {
        &self.r
    }

    /// Returns the contents of the square `sq`
    #[inline]
    pub fn get(&self, sq: Square) -> Cell {
        self.r.get(sq)
    }

    /// Same as `get()`, addressing the square by file and rank
    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Cell {
        self.r.get2(file, rank)
    }

    /// Returns side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.r.side
    }

    /// Returns castling rights
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.r.castling
    }

    /// Returns en passant target square
    #[inline]
    pub fn ep_target(&self) -> Option<Square> {
        self.r.ep_target
    }

    /// Square of the `c` king
    #[inline]
    pub fn king_pos(&self, c: Color) -> Square {
        self.kings[c.index()]
    }

    /// Returns the row-major view of the cells
    #[inline]
    pub fn view(&self) -> BoardView {
        self.r.view()
    }

    /// Squares occupied by `c` pieces
    pub fn color(&self, c: Color) -> Bitboard {
        Square::iter()
            .filter(|&sq| self.get(sq).color() == Some(c))
            .collect()
    }

    /// Squares occupied by `c` pieces of kind `p`
    pub fn piece2(&self, c: Color, p: Piece) -> Bitboard {
        let cell = Cell::from_parts(c, p);
        Square::iter().filter(|&sq| self.get(sq) == cell).collect()
    }

    /// Zobrist hash, kept up to date by every move
    #[inline]
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    /// Applies `m` and returns the new position, see [`Make`]
    pub fn make_move<M: Make>(&self, m: M) -> Result<Self, M::Err> {
        m.make(self)
    }

    /// Returns `true` if square `sq` is attacked by pieces of color `by`
    #[inline]
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        attack::is_attacked(&self.r.cells, sq, by)
    }

    /// Returns all the squares attacked by pieces of color `by`
    #[inline]
    pub fn attacked_squares(&self, by: Color) -> Bitboard {
        attack::attacked_squares(&self.r.cells, by)
    }

    /// Returns `true` if the `c` king is attacked, whichever side is to move
    #[inline]
    pub fn is_king_attacked(&self, c: Color) -> bool {
        self.is_square_attacked(self.king_pos(c), c.inv())
    }

    /// Returns `true` if the side which just moved left its king attacked
    #[inline]
    pub fn is_opponent_king_attacked(&self) -> bool {
        self.is_king_attacked(self.r.side.inv())
    }

    /// Returns `true` unless the side to move is mated or stalemated
    #[inline]
    pub fn has_legal_moves(&self) -> bool {
        movegen::has_legal_moves(self)
    }

    /// Returns `true` if the king of the side to move is attacked
    #[inline]
    pub fn is_check(&self) -> bool {
        self.is_king_attacked(self.r.side)
    }

    /// Returns the check state of the side to move
    #[inline]
    pub fn check_state(&self) -> CheckState {
        match self.is_check() {
            true => CheckState::checked(self.king_pos(self.r.side)),
            false => CheckState::NONE,
        }
    }

    /// Pieces attacking the king of the side to move
    #[inline]
    pub fn checkers(&self) -> Bitboard {
        let c = self.r.side;
        attack::attackers(&self.r.cells, self.king_pos(c), c.inv())
    }

    /// Returns `true` if no sequence of moves can lead to a checkmate
    ///
    /// Such positions include:
    ///
    /// - king vs king
    /// - king + knight vs king
    /// - kings and bishops, all the bishops standing on squares of the same color
    pub fn is_insufficient_material(&self) -> bool {
        let mut others = Bitboard::EMPTY;
        let mut knights = Bitboard::EMPTY;
        let mut bishops = Bitboard::EMPTY;
        for sq in Square::iter() {
            match self.get(sq).piece() {
                None | Some(Piece::King) => continue,
                Some(Piece::Knight) => knights.set(sq),
                Some(Piece::Bishop) => bishops.set(sq),
                Some(_) => others.set(sq),
            }
        }
        if others.is_nonempty() {
            return false;
        }

        // Two kings only
        if knights.is_empty() && bishops.is_empty() {
            return true;
        }

        // King vs king + knight
        if bishops.is_empty() && knights.len() == 1 {
            return true;
        }

        // Kings and bishops of the same cell color
        knights.is_empty()
            && ((bishops & bitboard_consts::CELLS_DARK).is_empty()
                || (bishops & bitboard_consts::CELLS_LIGHT).is_empty())
    }

    /// Finds the outcome which follows from this position alone
    ///
    /// Repetitions need earlier positions, see [`History`](crate::history::History) for them.
    ///
    /// Checkmate and stalemate take precedence over other outcomes.
    pub fn calc_outcome(&self) -> Option<Outcome> {
        if !self.has_legal_moves() {
            return if self.is_check() {
                Some(Outcome::Win {
                    side: self.r.side.inv(),
                    reason: WinReason::Checkmate,
                })
            } else {
                Some(Outcome::Draw(DrawReason::Stalemate))
            };
        }

        self.calc_draw_simple().map(Outcome::Draw)
    }

    /// Calculates the draws by insufficient material and by 50 and 75 move rules
    pub fn calc_draw_simple(&self) -> Option<DrawReason> {
        if self.is_insufficient_material() {
            return Some(DrawReason::InsufficientMaterial);
        }

        // 75 move rule must be checked first, as it is stricter.
        if self.r.halfmove_clock >= 150 {
            return Some(DrawReason::Moves75);
        }
        if self.r.halfmove_clock >= 100 {
            return Some(DrawReason::Moves50);
        }

        None
    }

    /// Same as [`RawBoard::pretty()`]
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        self.r.pretty(style)
    }

    /// Formats the position as FEN
    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for Board {
    #[inline]
    fn eq(&self, other: &Board) -> bool {
        self.r == other.r
    }
}

impl Eq for Board {}

impl Hash for Board {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.r.hash(state)
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::initial()
    }
}

impl TryFrom<RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(mut raw: RawBoard) -> Result<Board, ValidateError> {
        // Check enpassant
        if let Some(p) = raw.ep_target {
            let mover = raw.side.inv();
            if p.rank() != geometry::enpassant_rank(mover) {
                return Err(ValidateError::InvalidEnpassant(p));
            }

            // Reset enpassant if there is no pawn which has just passed this square
            let pawn_pos = p.shift(geometry::pawn_forward(mover), 0);
            let has_pawn = pawn_pos.map(|s| raw.get(s)) == Some(Cell::from_parts(mover, Piece::Pawn));
            if !has_pawn || raw.get(p).is_occupied() {
                raw.ep_target = None;
            }
        }

        // Drop castling rights whose king or rook has left its home square
        for color in [Color::White, Color::Black] {
            let rank = geometry::castling_rank(color);
            let king_home = raw.get2(File::E, rank) == Cell::from_parts(color, Piece::King);
            let rook = Cell::from_parts(color, Piece::Rook);
            for (side, file) in [(CastlingSide::Queen, File::A), (CastlingSide::King, File::H)] {
                if !king_home || raw.get2(file, rank) != rook {
                    raw.castling.unset(color, side);
                }
            }
        }

        // Check TooManyPieces, NoKing, TooManyKings, InvalidPawn
        let mut counts = [0_usize; Color::COUNT];
        let mut kings: [Option<Square>; Color::COUNT] = [None; Color::COUNT];
        for sq in Square::iter() {
            let cell = raw.get(sq);
            let (Some(color), Some(piece)) = (cell.color(), cell.piece()) else {
                continue;
            };
            counts[color.index()] += 1;
            match piece {
                Piece::King => {
                    if kings[color.index()].is_some() {
                        return Err(ValidateError::TooManyKings(color));
                    }
                    kings[color.index()] = Some(sq);
                }
                Piece::Pawn => {
                    if matches!(sq.rank(), Rank::R1 | Rank::R8) {
                        return Err(ValidateError::InvalidPawn(sq));
                    }
                }
                _ => {}
            }
        }
        for color in [Color::White, Color::Black] {
            if counts[color.index()] > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
        }
        let white_king = kings[Color::White.index()].ok_or(ValidateError::NoKing(Color::White))?;
        let black_king = kings[Color::Black.index()].ok_or(ValidateError::NoKing(Color::Black))?;

        let res = Board {
            r: raw,
            hash: raw.zobrist_hash(),
            kings: [white_king, black_king],
        };
        if res.is_opponent_king_attacked() {
            return Err(ValidateError::OpponentKingAttacked);
        }

        Ok(res)
    }
}

impl TryFrom<&RawBoard> for Board {
    type Error = ValidateError;

    fn try_from(raw: &RawBoard) -> Result<Board, ValidateError> {
        (*raw).try_into()
    }
}

/// Character set for board diagrams
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// ASCII letters for pieces and frame
    Ascii,
    /// Chess symbols and box-drawing characters
    Utf8,
}

/// Board diagram returned by [`RawBoard::pretty()`]
pub struct Pretty<'a> {
    raw: &'a RawBoard,
    style: PrettyStyle,
}

fn parse_placement(s: &str) -> Result<[Cell; 64], PlacementParseError> {
    type Error = PlacementParseError;

    let mut cells = [Cell::EMPTY; 64];
    let mut parts = s.split('/');
    // FEN lists the rows from rank 8 down to rank 1
    for row in (0..8).rev() {
        let rank = Rank::from_index(row);
        let part = parts.next().ok_or(Error::NotEnoughRows)?;
        let mut col = 0;
        for c in part.chars() {
            match c.to_digit(10) {
                Some(skip @ 1..=8) => col += skip as usize,
                _ => {
                    let cell = Cell::from_char(c).ok_or(Error::UnexpectedChar(c))?;
                    if col < 8 {
                        cells[Square::new(row, col).index()] = cell;
                    }
                    col += 1;
                }
            }
            if col > 8 {
                return Err(Error::RowTooLong(rank));
            }
        }
        if col < 8 {
            return Err(Error::RowTooShort(rank));
        }
    }
    if parts.next().is_some() {
        return Err(Error::TooManyRows);
    }

    Ok(cells)
}

fn parse_ep_target(s: &str, side: Color) -> Result<Option<Square>, RawFenParseError> {
    if s == "-" {
        return Ok(None);
    }
    let target = Square::from_str(s)?;
    if target.rank() != geometry::enpassant_rank(side.inv()) {
        return Err(RawFenParseError::InvalidEnpassantRank(target.rank()));
    }
    Ok(Some(target))
}

impl FromStr for RawBoard {
    type Err = RawFenParseError;

    /// Parses FEN. The halfmove clock and the fullmove number may be omitted, and default to
    /// 0 and 1.
    fn from_str(s: &str) -> Result<RawBoard, Self::Err> {
        type Error = RawFenParseError;

        let mut fields = s.split_ascii_whitespace();
        let cells = parse_placement(fields.next().ok_or(Error::Empty)?)?;
        let side = fields.next().ok_or(Error::NoMoveSide)?.parse::<Color>()?;
        let castling = fields.next().ok_or(Error::NoCastling)?.parse::<CastlingRights>()?;
        let ep_target = parse_ep_target(fields.next().ok_or(Error::NoEnpassant)?, side)?;
        let halfmove_clock = fields
            .next()
            .map_or(Ok(0), u16::from_str)
            .map_err(Error::HalfmoveClock)?;
        let fullmove_number = fields
            .next()
            .map_or(Ok(1), u16::from_str)
            .map_err(Error::FullmoveNumber)?;
        if fields.next().is_some() {
            return Err(Error::ExtraData);
        }

        Ok(RawBoard {
            cells,
            side,
            castling,
            ep_target,
            halfmove_clock,
            fullmove_number,
        })
    }
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Ok(RawBoard::from_str(s)?.try_into()?)
    }
}

fn write_placement(view: &BoardView, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, row) in view.iter().rev().enumerate() {
        if i != 0 {
            write!(f, "/")?;
        }
        let mut empty = 0;
        for cell in row {
            if cell.is_free() {
                empty += 1;
                continue;
            }
            if empty != 0 {
                write!(f, "{}", empty)?;
                empty = 0;
            }
            write!(f, "{}", cell)?;
        }
        if empty != 0 {
            write!(f, "{}", empty)?;
        }
    }
    Ok(())
}

impl Display for RawBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_placement(&self.view(), f)?;
        write!(f, " {} {} ", self.side, self.castling)?;
        match self.ep_target {
            Some(sq) => write!(f, "{}", sq)?,
            None => write!(f, "-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.r.fmt(f)
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (horz, vert, corner) = match self.style {
            PrettyStyle::Ascii => ('-', '|', '+'),
            PrettyStyle::Utf8 => ('─', '│', '┼'),
        };
        let side = match (self.style, self.raw.side) {
            (PrettyStyle::Ascii, color) => color.as_char().to_ascii_uppercase(),
            (PrettyStyle::Utf8, Color::White) => '○',
            (PrettyStyle::Utf8, Color::Black) => '●',
        };

        for (row, cells) in self.raw.view().iter().enumerate().rev() {
            write!(f, "{}{}", Rank::from_index(row), vert)?;
            for cell in cells {
                match self.style {
                    PrettyStyle::Ascii => write!(f, "{}", cell.as_char())?,
                    PrettyStyle::Utf8 => write!(f, "{}", cell.as_utf8_char())?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", horz, corner)?;
        for _ in File::iter() {
            write!(f, "{}", horz)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", side, vert)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INITIAL: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    fn cell(c: char) -> Cell {
        Cell::from_char(c).unwrap()
    }

    #[test]
    fn test_initial() {
        assert_eq!(RawBoard::initial().as_fen(), INITIAL);
        assert_eq!(Board::initial().as_fen(), INITIAL);
        assert_eq!(RawBoard::from_fen(INITIAL), Ok(RawBoard::initial()));
        assert_eq!(Board::from_fen(INITIAL), Ok(Board::initial()));
        assert_eq!(Board::initial().zobrist_hash(), RawBoard::initial().zobrist_hash());
        assert_eq!(Board::default(), Board::initial());
    }

    #[test]
    fn test_view() {
        let view = Board::initial().view();
        assert_eq!(view[0][4], cell('K'));
        assert_eq!(view[7][3], cell('q'));
        assert_eq!(view[1][0], cell('P'));
        assert_eq!(view[6][7], cell('p'));
        assert!(view[3][4].is_free());
    }

    #[test]
    fn test_position() {
        const FEN: &str = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq - 1 5";

        let board = Board::from_fen(FEN).unwrap();
        assert_eq!(board.as_fen(), FEN);
        assert_eq!(board.get2(File::C, Rank::R5), cell('b'));
        assert_eq!(board.get(Square::new(2, 5)), cell('N'));
        assert_eq!(board.king_pos(Color::White), Square::new(0, 4));
        assert_eq!(board.king_pos(Color::Black), Square::new(7, 4));
        assert_eq!(board.side(), Color::White);
        assert_eq!(board.castling(), CastlingRights::FULL);
        assert_eq!(board.ep_target(), None);
        assert_eq!(board.raw().halfmove_clock, 1);
        assert_eq!(board.raw().fullmove_number, 5);
        assert_eq!(board.color(Color::White).len(), 16);
        assert_eq!(board.piece2(Color::Black, Piece::Knight).len(), 2);
    }

    #[test]
    fn test_fixes() {
        let raw = RawBoard::from_fen("r3k2r/8/8/8/8/8/8/R4RK1 w KQkq - 0 1").unwrap();
        assert_eq!(raw.castling, CastlingRights::FULL);
        let board = Board::try_from(&raw).unwrap();
        assert!(!board.castling().has_color(Color::White));
        assert!(board.castling().has(Color::Black, CastlingSide::King));
        assert!(board.castling().has(Color::Black, CastlingSide::Queen));

        let raw =
            RawBoard::from_fen("rnbqkbnr/ppp1pppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq d6 0 2").unwrap();
        assert_eq!(raw.ep_target, Some(Square::new(5, 3)));
        let board = Board::try_from(raw).unwrap();
        assert_eq!(board.ep_target(), None);
        assert_eq!(
            board.as_fen(),
            "rnbqkbnr/ppp1pppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 2"
        );

        let mut raw = RawBoard::initial();
        raw.ep_target = Some(Square::new(3, 4));
        assert_eq!(
            Board::try_from(raw),
            Err(ValidateError::InvalidEnpassant(Square::new(3, 4)))
        );
    }

    #[test]
    fn test_enpassant_kept() {
        const FEN: &str = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1";
        let board = Board::from_fen(FEN).unwrap();
        assert_eq!(board.ep_target(), Some(Square::new(2, 4)));
        assert_eq!(board.as_fen(), FEN);
    }

    #[test]
    fn test_enpassant_hash() {
        // No black pawn can take on e3, so the target doesn't change the position
        let with_ep =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1").unwrap();
        let without_ep =
            Board::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1").unwrap();
        assert_eq!(with_ep.zobrist_hash(), without_ep.zobrist_hash());

        let with_ep = Board::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - e3 0 1").unwrap();
        let without_ep = Board::from_fen("4k3/8/8/8/3pP3/8/8/4K3 b - - 0 1").unwrap();
        assert_ne!(with_ep.zobrist_hash(), without_ep.zobrist_hash());
        assert_eq!(with_ep.zobrist_hash(), with_ep.raw().zobrist_hash());
    }

    #[test]
    fn test_optional_counters() {
        let raw = RawBoard::from_fen("4k3/8/8/8/8/8/8/4K3 b - -").unwrap();
        assert_eq!(raw.halfmove_clock, 0);
        assert_eq!(raw.fullmove_number, 1);

        let raw = RawBoard::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 7").unwrap();
        assert_eq!(raw.halfmove_clock, 7);
        assert_eq!(raw.fullmove_number, 1);
        assert_eq!(raw.as_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 7 1");
    }

    #[test]
    fn test_bad_fen() {
        assert_eq!(RawBoard::from_fen(""), Err(RawFenParseError::Empty));
        assert_eq!(
            RawBoard::from_fen("4k3/8/8/8/8/8/8/4K3"),
            Err(RawFenParseError::NoMoveSide)
        );
        assert_eq!(
            RawBoard::from_fen("4k3/8/8/8/8/8/8/4K3 w"),
            Err(RawFenParseError::NoCastling)
        );
        assert_eq!(
            RawBoard::from_fen("4k3/8/8/8/8/8/8/4K3 w -"),
            Err(RawFenParseError::NoEnpassant)
        );
        assert_eq!(
            RawBoard::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra"),
            Err(RawFenParseError::ExtraData)
        );
        assert_eq!(
            RawBoard::from_fen("4k3/8/8/8/8/8/8/4K3 w - e3 0 1"),
            Err(RawFenParseError::InvalidEnpassantRank(Rank::R3))
        );
        assert!(matches!(
            RawBoard::from_fen("4k3/8/8/8/8/8/8/4K3 w - - x 1"),
            Err(RawFenParseError::HalfmoveClock(_))
        ));
        assert!(matches!(
            RawBoard::from_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(RawFenParseError::MoveSide(_))
        ));

        let placement = |s: &str| match RawBoard::from_fen(&format!("{} w - - 0 1", s)) {
            Err(RawFenParseError::Placement(e)) => Some(e),
            _ => None,
        };
        assert_eq!(
            placement("4k3/8/8/9/8/8/8/4K3"),
            Some(PlacementParseError::UnexpectedChar('9'))
        );
        assert_eq!(
            placement("4k3/8/8/8/8/8/4K3"),
            Some(PlacementParseError::NotEnoughRows)
        );
        assert_eq!(
            placement("4k3/8/8/8/8/8/8/8/4K3"),
            Some(PlacementParseError::TooManyRows)
        );
        assert_eq!(
            placement("4k4/8/8/8/8/8/8/4K3"),
            Some(PlacementParseError::RowTooLong(Rank::R8))
        );
        assert_eq!(
            placement("4k3/8/8/8/8/8/7/4K3"),
            Some(PlacementParseError::RowTooShort(Rank::R2))
        );
    }

    #[test]
    fn test_invalid_position() {
        let invalid = |fen: &str| match Board::from_fen(fen) {
            Err(FenParseError::Valid(e)) => Some(e),
            _ => None,
        };
        assert_eq!(
            invalid("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Some(ValidateError::NoKing(Color::Black))
        );
        assert_eq!(
            invalid("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Some(ValidateError::TooManyKings(Color::White))
        );
        assert_eq!(
            invalid("4k3/8/8/8/8/8/8/p3K3 w - - 0 1"),
            Some(ValidateError::InvalidPawn(Square::new(0, 0)))
        );
        assert_eq!(
            invalid("4k3/8/8/8/8/8/PPPPPPPP/NNNNKNNN w - - 0 1"),
            None
        );
        assert_eq!(
            invalid("4k3/8/8/8/8/PPPPPPPP/PPPPPPPP/NNNNKNNN w - - 0 1"),
            Some(ValidateError::TooManyPieces(Color::White))
        );
        assert_eq!(invalid("4k3/8/8/8/8/8/8/4K2Q b - - 0 1"), None);
        assert_eq!(
            invalid("4k3/8/8/8/8/8/8/4Q2K w - - 0 1"),
            Some(ValidateError::OpponentKingAttacked)
        );
    }

    #[test]
    fn test_pretty() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4K2R b K - 0 1").unwrap();
        let expected = "\
8|....k...
7|........
6|........
5|........
4|........
3|........
2|........
1|....K..R
-+--------
B|abcdefgh
";
        assert_eq!(board.pretty(PrettyStyle::Ascii).to_string(), expected);
        assert!(board
            .pretty(PrettyStyle::Utf8)
            .to_string()
            .starts_with("8│....♚...\n"));
    }

    #[test]
    fn test_check_state() {
        let b = Board::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        assert!(b.is_check());
        assert_eq!(b.check_state(), CheckState::checked(Square::new(0, 4)));
        assert_eq!(b.check_state().king_square(), Some(Square::new(0, 4)));
        assert_eq!(
            b.checkers().into_iter().collect::<Vec<_>>(),
            vec![Square::new(0, 0)]
        );
        assert!(b.is_square_attacked(Square::new(0, 2), Color::Black));
        assert!(!b.is_square_attacked(Square::new(1, 2), Color::Black));
        assert!(b.is_king_attacked(Color::White));
        assert!(!b.is_king_attacked(Color::Black));
        assert!(!b.is_opponent_king_attacked());
        assert_eq!(Board::initial().check_state(), CheckState::NONE);
    }

    #[test]
    fn test_outcome() {
        assert_eq!(Board::initial().calc_outcome(), None);

        let b = Board::from_fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 1 1").unwrap();
        assert!(b.is_check());
        assert!(!b.has_legal_moves());
        assert_eq!(
            b.calc_outcome(),
            Some(Outcome::Win {
                side: Color::White,
                reason: WinReason::Checkmate
            })
        );

        let b = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!b.is_check());
        assert!(!b.has_legal_moves());
        assert_eq!(b.calc_outcome(), Some(Outcome::Draw(DrawReason::Stalemate)));

        let insufficient = Some(Outcome::Draw(DrawReason::InsufficientMaterial));
        let b = Board::from_fen("8/8/4k3/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(b.calc_outcome(), insufficient);
        let b = Board::from_fen("8/8/4k3/8/8/2N5/8/4K3 w - - 0 1").unwrap();
        assert_eq!(b.calc_outcome(), insufficient);
        let b = Board::from_fen("8/8/4k3/8/2b5/8/B7/4K3 w - - 0 1").unwrap();
        assert_eq!(b.calc_outcome(), insufficient);
        let b = Board::from_fen("8/8/4k3/8/2b5/8/8/B3K3 w - - 0 1").unwrap();
        assert_eq!(b.calc_outcome(), None);
        let b = Board::from_fen("8/8/4k3/8/8/2N5/3N4/4K3 w - - 0 1").unwrap();
        assert_eq!(b.calc_outcome(), None);

        let b = Board::from_fen("8/8/4k3/8/8/2N5/3N4/4K3 w - - 100 70").unwrap();
        assert_eq!(b.calc_outcome(), Some(Outcome::Draw(DrawReason::Moves50)));
        let b = Board::from_fen("8/8/4k3/8/8/2N5/3N4/4K3 w - - 150 90").unwrap();
        assert_eq!(b.calc_outcome(), Some(Outcome::Draw(DrawReason::Moves75)));
    }
}
