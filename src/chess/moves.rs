//! Moves as plain geometry between two squares and their classification.

use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context};
use itertools::Itertools;

use crate::chess::board::Board;
use crate::chess::core::{PieceKind, Square};

/// A move from one square to another.
///
/// A move does not know what it does: castling, capturing, en passant and
/// promotion are all derived from the [`Board`] it is applied to. Equality is
/// structural over `(from, to)`. Since [`Square`] is always in range, a move can
/// never leave the board boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    from: Square,
    to: Square,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// Horizontal and vertical displacement: (file delta, rank delta).
    fn displacement(&self) -> (i8, i8) {
        let dx = self.to.file() as i8 - self.from.file() as i8;
        let dy = self.to.rank() as i8 - self.from.rank() as i8;
        (dx, dy)
    }

    /// Raw index difference `to - from`.
    pub(super) fn direction(&self) -> i8 {
        self.to as i8 - self.from as i8
    }

    /// Both squares share a file or a rank.
    #[must_use]
    pub fn is_straight_slide(&self) -> bool {
        let (dx, dy) = self.displacement();
        dx == 0 || dy == 0
    }

    /// Both squares lie on the same diagonal.
    #[must_use]
    pub fn is_diagonal_slide(&self) -> bool {
        let (dx, dy) = self.displacement();
        dx != 0 && dx.abs() == dy.abs()
    }

    /// L-shaped jump. The check is distance-based, so a flat index offset that
    /// wrapped around the board edge is rejected.
    #[must_use]
    pub fn is_knight_move(&self) -> bool {
        matches!(
            self.displacement(),
            (1 | -1, 2 | -2) | (2 | -2, 1 | -1)
        )
    }

    /// A straight or diagonal move of exactly one square.
    #[must_use]
    pub fn is_king_step(&self) -> bool {
        let (dx, dy) = self.displacement();
        dx.abs().max(dy.abs()) == 1
    }

    /// The target square holds an opponent piece.
    #[must_use]
    pub fn is_capture(&self, board: &Board) -> bool {
        match (board.at(self.from), board.at(self.to)) {
            (Some(active), Some(captured)) => captured.colour == active.colour.opponent(),
            _ => false,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_kingside_castling(&self, board: &Board) -> bool {
        self.moves_kind(board, PieceKind::King) && self.direction() == 2
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_queenside_castling(&self, board: &Board) -> bool {
        self.moves_kind(board, PieceKind::King) && self.direction() == -2
    }

    /// A diagonal pawn step onto an empty square.
    #[must_use]
    pub fn is_en_passant(&self, board: &Board) -> bool {
        self.moves_kind(board, PieceKind::Pawn)
            && !self.is_capture(board)
            && matches!(self.direction().abs(), 7 | 9)
    }

    /// A pawn reaching either back rank.
    #[must_use]
    pub fn is_pawn_promotion(&self, board: &Board) -> bool {
        self.moves_kind(board, PieceKind::Pawn) && self.to.rank().is_backrank()
    }

    /// Classifies the move in the context of the given board.
    #[must_use]
    pub fn attributes(&self, board: &Board) -> MoveAttributes {
        let mut attributes = MoveAttributes::QUIET;
        if self.is_capture(board) {
            attributes |= MoveAttributes::CAPTURE;
        }
        if self.is_kingside_castling(board) {
            attributes |= MoveAttributes::KINGSIDE_CASTLE;
        }
        if self.is_queenside_castling(board) {
            attributes |= MoveAttributes::QUEENSIDE_CASTLE;
        }
        if self.is_en_passant(board) {
            attributes |= MoveAttributes::EN_PASSANT;
        }
        if self.is_pawn_promotion(board) {
            attributes |= MoveAttributes::PROMOTION;
        }
        attributes
    }

    fn moves_kind(&self, board: &Board, kind: PieceKind) -> bool {
        board.at(self.from).is_some_and(|piece| piece.kind == kind)
    }

    /// Returns the square of the pawn removed by an en passant capture: same
    /// rank as the origin, file of the target.
    pub(super) fn en_passant_victim(&self) -> Square {
        Square::new(self.to.file(), self.from.rank())
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    /// Parses a move either in the human-readable form with a space between
    /// the squares (`"a2 e4"`) or in the compact form (`"a2e4"`).
    fn from_str(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        let (from, to) = match input.split_whitespace().collect_tuple() {
            Some((from, to)) => (from, to),
            None if input.is_ascii() && input.len() == 4 => input.split_at(2),
            None => bail!("move should look like \"e2 e4\" or \"e2e4\", got \"{input}\""),
        };
        let from = Square::try_from(from).with_context(|| format!("invalid move \"{input}\""))?;
        let to = Square::try_from(to).with_context(|| format!("invalid move \"{input}\""))?;
        Ok(Self::new(from, to))
    }
}

impl TryFrom<&str> for Move {
    type Error = anyhow::Error;

    fn try_from(input: &str) -> anyhow::Result<Self> {
        input.parse()
    }
}

impl fmt::Display for Move {
    /// Serializes a move in compact coordinate notation (`e2e4`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

bitflags::bitflags! {
    /// What a [`Move`] does on a particular [`Board`]. Computed on demand by
    /// [`Move::attributes`], never stored alongside the move.
    ///
    /// - [En passant] is a capture of opponent's pawn "in passing" (when it
    ///   advances two squares from its original position). It is not a
    ///   [`MoveAttributes::CAPTURE`]: the target square is empty.
    /// - The [Castle] move involves a king and a rook "jumping" over each
    ///   other. Technically, castling is a king move, so `from` and `to` move
    ///   squares correspond to the king.
    /// - Promotion always produces a queen.
    ///
    /// [Castle]: https://en.wikipedia.org/wiki/Castling
    /// [En passant]: https://en.wikipedia.org/wiki/En_passant
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MoveAttributes: u8 {
        /// Moves that do not change the material balance.
        const QUIET = 0;
        /// Moves that change the material balance by taking the piece on the
        /// target square.
        const CAPTURE = 0b0000_0001;
        /// Short castle or O-O.
        const KINGSIDE_CASTLE = 0b0000_0010;
        /// Long castle or O-O-O.
        const QUEENSIDE_CASTLE = 0b0000_0100;
        /// Diagonal pawn step onto an empty square behind a pushed pawn.
        const EN_PASSANT = 0b0000_1000;
        /// Pawn move to the opponent's "home" rank.
        const PROMOTION = 0b0001_0000;
        #[allow(missing_docs)]
        const CASTLE = Self::KINGSIDE_CASTLE.bits() | Self::QUEENSIDE_CASTLE.bits();
    }
}
