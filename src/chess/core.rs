//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use itertools::Itertools;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use ply::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// The board is a flat array without border sentinels, so a square can only be
/// obtained through checked constructors: a [`Square`] value is always within
/// `0..BOARD_SIZE`.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    /// Position of the square in the flat board array.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Adds a raw index offset to the square. Returns `None` if the result
    /// leaves the board.
    ///
    /// The offset is applied to the flat index: stepping off the H file with
    /// `+1` lands on the A file of the next rank. Callers that care about
    /// wrapping have to re-check the geometry of the resulting move.
    ///
    /// ```
    /// use ply::chess::core::Square;
    ///
    /// assert_eq!(Square::E2.offset(16), Some(Square::E4));
    /// assert_eq!(Square::H1.offset(1), Some(Square::A2));
    /// assert_eq!(Square::A1.offset(-1), None);
    /// assert_eq!(Square::H8.offset(9), None);
    /// ```
    #[must_use]
    pub fn offset(self, delta: i8) -> Option<Self> {
        let candidate = i16::from(self as u8) + i16::from(delta);
        u8::try_from(candidate)
            .ok()
            .and_then(|index| Self::try_from(index).ok())
    }

    /// Iterates over all squares in index order (A1, B1, ..., H8).
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..BOARD_SIZE).map(|index| unsafe { mem::transmute::<u8, Self>(index) })
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        // Exclusive range patterns are not allowed:
        // https://github.com/rust-lang/rust/issues/37854
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute::<u8, Self>(square_index) }),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let Some((file, rank)) = square.chars().collect_tuple() else {
            bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            )
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
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
    /// Iterates over files from A to H.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..BOARD_WIDTH).map(|column| unsafe { mem::transmute::<u8, Self>(column) })
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// Iterates over ranks from One to Eight.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..BOARD_WIDTH).map(|row| unsafe { mem::transmute::<u8, Self>(row) })
    }

    /// Ranks where pawns promote.
    #[must_use]
    pub const fn is_backrank(self) -> bool {
        matches!(self, Self::One | Self::Eight)
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two sides: White (having the
/// advantage of the first turn) and Black.
///
/// White starts on the low ranks (indices 0..16) and its pawns advance towards
/// higher indices. This is a static property of the starting setup, it is not
/// recomputed per piece.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Colour {
    White,
    Black,
}

impl Colour {
    /// "Flips" the colour.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Index offset of a single pawn push.
    #[must_use]
    pub const fn push_direction(self) -> i8 {
        match self {
            Self::White => BOARD_WIDTH as i8,
            Self::Black => -(BOARD_WIDTH as i8),
        }
    }

    /// Rank with the pieces other than pawns in the starting position.
    #[must_use]
    pub const fn backrank(self) -> Rank {
        match self {
            Self::White => Rank::One,
            Self::Black => Rank::Eight,
        }
    }

    /// Rank the pawns start on and can double push from.
    #[must_use]
    pub const fn pawns_starting(self) -> Rank {
        match self {
            Self::White => Rank::Two,
            Self::Black => Rank::Seven,
        }
    }

    /// Rank our pawn has to stand on to capture en passant: the one the
    /// opponent's pawns land on after a double push.
    #[must_use]
    pub const fn en_passant_rank(self) -> Rank {
        match self {
            Self::White => Rank::Five,
            Self::Black => Rank::Four,
        }
    }
}

impl TryFrom<&str> for Colour {
    type Error = anyhow::Error;

    fn try_from(colour: &str) -> anyhow::Result<Self> {
        match colour {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("colour should be 'w' or 'b', got '{colour}'"),
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match &self {
            Self::White => "White",
            Self::Black => "Black",
        })
    }
}

/// Standard [chess pieces].
///
/// An empty square is not a piece kind: boards store `Option<Piece>`.
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Bishop,
    Knight,
    Rook,
    Pawn,
}

impl PieceKind {
    /// Queen, rook and bishop move along rays until blocked.
    #[must_use]
    pub const fn is_sliding(self) -> bool {
        matches!(self, Self::Queen | Self::Rook | Self::Bishop)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Rook => 'r',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player together with the number of
/// moves it has made.
///
/// The step counter gates double pawn pushes, castling and en passant. It is
/// bumped once per move that relocates the piece (a castling rook included).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub kind: PieceKind,
    #[allow(missing_docs)]
    pub colour: Colour,
    steps_taken: u16,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[must_use]
    pub const fn new(kind: PieceKind, colour: Colour) -> Self {
        Self {
            kind,
            colour,
            steps_taken: 0,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn king(colour: Colour) -> Self {
        Self::new(PieceKind::King, colour)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn queen(colour: Colour) -> Self {
        Self::new(PieceKind::Queen, colour)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn bishop(colour: Colour) -> Self {
        Self::new(PieceKind::Bishop, colour)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn knight(colour: Colour) -> Self {
        Self::new(PieceKind::Knight, colour)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rook(colour: Colour) -> Self {
        Self::new(PieceKind::Rook, colour)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn pawn(colour: Colour) -> Self {
        Self::new(PieceKind::Pawn, colour)
    }

    /// Returns the same piece with a different move history. Useful for
    /// setting up positions that did not come from the starting one.
    #[must_use]
    pub const fn with_steps_taken(self, steps_taken: u16) -> Self {
        Self {
            steps_taken,
            ..self
        }
    }

    /// Number of moves this piece has made.
    #[must_use]
    pub const fn steps_taken(&self) -> u16 {
        self.steps_taken
    }

    pub(super) fn increment_steps_taken(&mut self) {
        self.steps_taken = self.steps_taken.saturating_add(1);
    }

    /// Checks kind and owner, ignoring the move history.
    #[must_use]
    pub fn is(&self, kind: PieceKind, colour: Colour) -> bool {
        self.kind == kind && self.colour == colour
    }

    /// Unicode chess symbol of the piece for terminal output.
    #[must_use]
    pub const fn glyph(&self) -> char {
        match (self.colour, self.kind) {
            (Colour::White, PieceKind::King) => '♔',
            (Colour::White, PieceKind::Queen) => '♕',
            (Colour::White, PieceKind::Rook) => '♖',
            (Colour::White, PieceKind::Bishop) => '♗',
            (Colour::White, PieceKind::Knight) => '♘',
            (Colour::White, PieceKind::Pawn) => '♙',
            (Colour::Black, PieceKind::King) => '♚',
            (Colour::Black, PieceKind::Queen) => '♛',
            (Colour::Black, PieceKind::Rook) => '♜',
            (Colour::Black, PieceKind::Bishop) => '♝',
            (Colour::Black, PieceKind::Knight) => '♞',
            (Colour::Black, PieceKind::Pawn) => '♟',
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    /// Parses a piece from its FEN symbol: uppercase for White, lowercase for
    /// Black. The step counter starts at zero.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let colour = if symbol.is_ascii_uppercase() {
            Colour::White
        } else {
            Colour::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self::new(kind, colour))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.colour {
            // White player: uppercase symbols.
            Colour::White => f.write_str(&symbol.to_ascii_uppercase()),
            // Black player: lowercase symbols.
            Colour::Black => f.write_str(&symbol),
        }
    }
}
