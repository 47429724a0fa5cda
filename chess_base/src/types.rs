use std::fmt::{self, Display};
use std::str::FromStr;
use thiserror::Error;

/// Error parsing a square in algebraic form, like `e4`
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SquareParseError {
    #[error("{0:?} is not a file letter")]
    UnexpectedFileChar(char),
    #[error("{0:?} is not a rank digit")]
    UnexpectedRankChar(char),
    #[error("square must be exactly two chars long")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CellParseError {
    #[error("{0:?} is not a piece letter")]
    UnexpectedChar(char),
    #[error("cell must be exactly one char long")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("{0:?} is not a side, expected 'w' or 'b'")]
    UnexpectedChar(char),
    #[error("side must be exactly one char long")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CastlingRightsParseError {
    #[error("{0:?} is not one of \"KQkq\"")]
    UnexpectedChar(char),
    #[error("castling right {0:?} is given twice")]
    DuplicateChar(char),
    #[error("castling rights are empty, use \"-\" instead")]
    EmptyString,
}

/// Board column, `A` is column 0
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    pub const ALL: [File; 8] = [
        File::A,
        File::B,
        File::C,
        File::D,
        File::E,
        File::F,
        File::G,
        File::H,
    ];

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    /// Returns the file with index `val`, panicking if `val >= 8`
    pub const fn from_index(val: usize) -> Self {
        Self::ALL[val]
    }

    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        let idx = (c as u32).checked_sub('a' as u32)?;
        Self::ALL.get(idx as usize).copied()
    }

    pub fn as_char(&self) -> char {
        (b'a' + *self as u8) as char
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Board row, `R1` (White's back rank) is row 0
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[repr(u8)]
pub enum Rank {
    R1 = 0,
    R2 = 1,
    R3 = 2,
    R4 = 3,
    R5 = 4,
    R6 = 5,
    R7 = 6,
    R8 = 7,
}

impl Rank {
    pub const ALL: [Rank; 8] = [
        Rank::R1,
        Rank::R2,
        Rank::R3,
        Rank::R4,
        Rank::R5,
        Rank::R6,
        Rank::R7,
        Rank::R8,
    ];

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    /// Returns the rank with index `val`, panicking if `val >= 8`
    pub const fn from_index(val: usize) -> Self {
        Self::ALL[val]
    }

    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        Self::ALL.into_iter()
    }

    pub fn from_char(c: char) -> Option<Self> {
        let idx = (c as u32).checked_sub('1' as u32)?;
        Self::ALL.get(idx as usize).copied()
    }

    pub fn as_char(&self) -> char {
        (b'1' + *self as u8) as char
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

/// Square on the board, addressed as a (row, column) pair
///
/// Row 0 is White's back rank, column 0 is the `a` file. Internally the square
/// is stored as `row * 8 + col`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    pub const COUNT: usize = 64;

    pub const fn from_index(val: usize) -> Square {
        assert!(val < 64, "square must be between 0 and 63");
        Square(val as u8)
    }

    pub const unsafe fn from_index_unchecked(val: usize) -> Square {
        Square(val as u8)
    }

    /// Creates a square from its row and column, panicking if any of them is out of range
    pub const fn new(row: usize, col: usize) -> Square {
        assert!(row < 8 && col < 8, "row and column must be between 0 and 7");
        Square((row * 8 + col) as u8)
    }

    /// Creates a square from its row and column, returning `None` if any of them is out of range
    pub const fn try_new(row: usize, col: usize) -> Option<Square> {
        if row < 8 && col < 8 {
            Some(Square((row * 8 + col) as u8))
        } else {
            None
        }
    }

    pub const fn from_parts(file: File, rank: Rank) -> Square {
        Square(((rank as u8) << 3) | file as u8)
    }

    pub const fn row(&self) -> usize {
        (self.0 >> 3) as usize
    }

    pub const fn col(&self) -> usize {
        (self.0 & 7) as usize
    }

    pub const fn file(&self) -> File {
        File::ALL[self.col()]
    }

    pub const fn rank(&self) -> Rank {
        Rank::ALL[self.row()]
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns `true` if the square is dark on a regular chessboard
    ///
    /// Depends only on the coordinates, `a1` is dark.
    pub const fn is_dark(&self) -> bool {
        (self.row() + self.col()) % 2 == 0
    }

    pub fn shift(self, delta_row: isize, delta_col: isize) -> Option<Square> {
        let new_row = self.row().wrapping_add(delta_row as usize);
        let new_col = self.col().wrapping_add(delta_col as usize);
        Square::try_new(new_row, new_col)
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0_u8..64_u8).map(Square)
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 < 64 {
            return write!(f, "Square({})", self);
        }
        write!(f, "Square(?{:?})", self.0)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file().as_char(), self.rank().as_char())
    }
}

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 || !s.is_ascii() {
            return Err(SquareParseError::BadLength);
        }
        let bytes = s.as_bytes();
        let (file_ch, rank_ch) = (bytes[0] as char, bytes[1] as char);
        Ok(Square::from_parts(
            File::from_char(file_ch).ok_or(SquareParseError::UnexpectedFileChar(file_ch))?,
            Rank::from_char(rank_ch).ok_or(SquareParseError::UnexpectedRankChar(rank_ch))?,
        ))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const COUNT: usize = 2;

    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    pub fn as_long_str(&self) -> &'static str {
        match *self {
            Color::White => "White",
            Color::Black => "Black",
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ColorParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Color::from_char(ch).ok_or(ColorParseError::UnexpectedChar(ch))
    }
}

/// Kind of a chess piece, without color
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    King = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
}

impl Piece {
    pub const COUNT: usize = 6;

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    /// Uppercase letter used for this piece in FEN and SAN
    pub fn as_char(&self) -> char {
        b"PKNBRQ"[*self as usize] as char
    }

    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::King,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
    ];

    pub fn iter() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter()
    }
}

/// Contents of a single square: empty or a piece of some color
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Cell(u8);

impl Cell {
    pub const EMPTY: Cell = Cell(0);
    pub const COUNT: usize = 13;

    pub const fn is_free(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_occupied(&self) -> bool {
        self.0 != 0
    }

    pub const fn from_index(val: usize) -> Cell {
        assert!(val < Self::COUNT, "index too large");
        Cell(val as u8)
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    pub const fn from_parts(c: Color, p: Piece) -> Cell {
        Cell(match c {
            Color::White => 1 + p as u8,
            Color::Black => 7 + p as u8,
        })
    }

    pub const fn color(&self) -> Option<Color> {
        match self.0 {
            0 => None,
            1..=6 => Some(Color::White),
            _ => Some(Color::Black),
        }
    }

    pub const fn piece(&self) -> Option<Piece> {
        match self.0 {
            0 => None,
            // White pieces take indices 1..=6, black ones take 7..=12
            x => Some(Piece::ALL[((x - 1) % 6) as usize]),
        }
    }

    pub fn iter() -> impl Iterator<Item = Self> {
        (0..Self::COUNT as u8).map(Cell)
    }

    pub fn as_char(&self) -> char {
        b".PKNBRQpknbrq"[self.0 as usize] as char
    }

    pub fn as_utf8_char(&self) -> char {
        [
            '.', '♙', '♔', '♘', '♗', '♖', '♕', '♟', '♚', '♞', '♝', '♜', '♛',
        ][self.0 as usize]
    }

    pub fn from_char(c: char) -> Option<Self> {
        if c == '.' {
            return Some(Cell::EMPTY);
        }
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let piece = match c.to_ascii_lowercase() {
            'p' => Piece::Pawn,
            'k' => Piece::King,
            'n' => Piece::Knight,
            'b' => Piece::Bishop,
            'r' => Piece::Rook,
            'q' => Piece::Queen,
            _ => return None,
        };
        Some(Cell::from_parts(color, piece))
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if (self.0 as usize) < Self::COUNT {
            return write!(f, "Cell({})", self.as_char());
        }
        write!(f, "Cell(?{:?})", self.0)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Cell {
    type Err = CellParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(CellParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Cell::from_char(ch).ok_or(CellParseError::UnexpectedChar(ch))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    Queen = 0,
    King = 1,
}

/// Castling rights of both sides, stored as four bits
#[derive(Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    const fn to_index(c: Color, s: CastlingSide) -> u8 {
        ((c as u8) << 1) | s as u8
    }

    pub const EMPTY: CastlingRights = CastlingRights(0);
    pub const FULL: CastlingRights = CastlingRights(15);
    pub const COUNT: usize = 16;

    pub const fn has(&self, c: Color, s: CastlingSide) -> bool {
        ((self.0 >> Self::to_index(c, s)) & 1) != 0
    }

    pub const fn has_color(&self, c: Color) -> bool {
        self.has(c, CastlingSide::King) || self.has(c, CastlingSide::Queen)
    }

    pub const fn with(self, c: Color, s: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 | (1_u8 << Self::to_index(c, s)))
    }

    pub const fn without(self, c: Color, s: CastlingSide) -> CastlingRights {
        CastlingRights(self.0 & !(1_u8 << Self::to_index(c, s)))
    }

    pub fn set(&mut self, c: Color, s: CastlingSide) {
        *self = self.with(c, s)
    }

    pub fn unset(&mut self, c: Color, s: CastlingSide) {
        *self = self.without(c, s)
    }

    pub fn unset_color(&mut self, c: Color) {
        self.unset(c, CastlingSide::King);
        self.unset(c, CastlingSide::Queen);
    }

    /// Returns `true` if every right present in `self` is also present in `other`
    pub const fn is_subset_of(&self, other: CastlingRights) -> bool {
        self.0 & !other.0 == 0
    }

    pub const fn from_index(val: usize) -> CastlingRights {
        assert!(val < 16, "raw castling rights must be between 0 and 15");
        CastlingRights(val as u8)
    }

    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.0 < 16 {
            return write!(f, "CastlingRights({})", self);
        }
        write!(f, "CastlingRights(?{:?})", self.0)
    }
}

/// FEN letters for castling rights, in the order they are written
const CASTLING_CHARS: [(char, Color, CastlingSide); 4] = [
    ('K', Color::White, CastlingSide::King),
    ('Q', Color::White, CastlingSide::Queen),
    ('k', Color::Black, CastlingSide::King),
    ('q', Color::Black, CastlingSide::Queen),
];

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::EMPTY {
            return write!(f, "-");
        }
        for (ch, color, side) in CASTLING_CHARS {
            if self.has(color, side) {
                write!(f, "{}", ch)?;
            }
        }
        Ok(())
    }
}

impl FromStr for CastlingRights {
    type Err = CastlingRightsParseError;

    fn from_str(s: &str) -> Result<CastlingRights, Self::Err> {
        match s {
            "-" => return Ok(CastlingRights::EMPTY),
            "" => return Err(CastlingRightsParseError::EmptyString),
            _ => {}
        }
        s.chars().try_fold(CastlingRights::EMPTY, |res, ch| {
            let &(_, color, side) = CASTLING_CHARS
                .iter()
                .find(|(c, _, _)| *c == ch)
                .ok_or(CastlingRightsParseError::UnexpectedChar(ch))?;
            if res.has(color, side) {
                return Err(CastlingRightsParseError::DuplicateChar(ch));
            }
            Ok(res.with(color, side))
        })
    }
}
