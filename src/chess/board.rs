//! Square-centric ("mailbox") board representation: the placement of pieces,
//! move application and legal move filtering.
//!
//! A [`Board`] is a value: applying a move never mutates it but produces a new
//! board with its own copy of all 64 squares, step counters included. This
//! keeps every snapshot independent, so a game can hand out references to its
//! board and previous positions are never affected by later moves.

use std::fmt::{self, Write};

use anyhow::{bail, Context};

use crate::chess::core::{Colour, File, Piece, PieceKind, Rank, Square, BOARD_SIZE, BOARD_WIDTH};
use crate::chess::moves::{Move, MoveAttributes};

/// The average branching factor for chess is 35 but some positions have more
/// than 100 pseudo-legal moves.
const EXPECTED_MOVES: usize = 64;

/// Placement of the pieces on the 64 squares, indexed from A1 (0) to H8 (63).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    squares: [Option<Piece>; BOARD_SIZE as usize],
}

impl Board {
    /// Creates a board without any pieces.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
        }
    }

    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use ply::chess::board::Board;
    ///
    /// assert_eq!(
    ///     Board::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for colour in [Colour::White, Colour::Black] {
            for (file, kind) in File::iter().zip(BACKRANK) {
                board.set(Square::new(file, colour.backrank()), Some(Piece::new(kind, colour)));
                board.set(
                    Square::new(file, colour.pawns_starting()),
                    Some(Piece::pawn(colour)),
                );
            }
        }
        board
    }

    /// Returns the piece on the given square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Puts a piece on the square, replacing whatever was there. Used for
    /// setting up positions.
    ///
    /// ```
    /// use ply::chess::board::Board;
    /// use ply::chess::core::{Colour, Piece, Square};
    ///
    /// let board = Board::empty()
    ///     .place(Square::E1, Piece::king(Colour::White))
    ///     .place(Square::E8, Piece::king(Colour::Black));
    /// assert_eq!(board.to_string(), "4k3/8/8/8/8/8/8/4K3");
    /// ```
    #[must_use]
    pub fn place(mut self, square: Square, piece: Piece) -> Self {
        self.squares[square.index()] = Some(piece);
        self
    }

    fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }

    /// Iterates over occupied squares in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.at(square).map(|piece| (square, piece)))
    }

    /// Number of pieces owned by `colour`.
    #[must_use]
    pub fn count_pieces(&self, colour: Colour) -> usize {
        self.pieces()
            .filter(|(_, piece)| piece.colour == colour)
            .count()
    }

    /// Location of `colour`'s king. A board is expected to have at most one
    /// king per colour.
    #[must_use]
    pub fn king_square(&self, colour: Colour) -> Option<Square> {
        self.pieces()
            .find(|(_, piece)| piece.is(PieceKind::King, colour))
            .map(|(square, _)| square)
    }

    /// Produces the board after playing the move. The move is not validated:
    /// it has to come from this board's move generator (or be checked against
    /// it).
    ///
    /// Castling also relocates the rook, en passant removes the pawn that has
    /// passed by and a pawn reaching the last rank becomes a queen. The moving
    /// piece (and the castling rook) increment their step counters.
    #[must_use]
    pub fn apply(&self, next_move: &Move) -> Self {
        let mut next = self.clone();
        let (from, to) = (next_move.from(), next_move.to());
        let attributes = next_move.attributes(self);
        if attributes.contains(MoveAttributes::QUEENSIDE_CASTLE) {
            next.relocate_castling_rook(from, -4, -1);
        } else if attributes.contains(MoveAttributes::KINGSIDE_CASTLE) {
            next.relocate_castling_rook(from, 3, 1);
        } else if attributes.contains(MoveAttributes::EN_PASSANT) {
            next.set(next_move.en_passant_victim(), None);
        }
        let Some(mut piece) = next.squares[from.index()].take() else {
            log::warn!("applying {next_move} without a piece on {from}");
            return next;
        };
        if attributes.contains(MoveAttributes::PROMOTION) {
            piece.kind = PieceKind::Queen;
        }
        piece.increment_steps_taken();
        next.set(to, Some(piece));
        next
    }

    fn relocate_castling_rook(&mut self, king: Square, rook_offset: i8, target_offset: i8) {
        let (Some(rook_square), Some(target)) = (king.offset(rook_offset), king.offset(target_offset))
        else {
            return;
        };
        if let Some(mut rook) = self.squares[rook_square.index()].take() {
            rook.increment_steps_taken();
            self.set(target, Some(rook));
        }
    }

    /// Collects the moves of all `colour`'s pieces, ignoring whether they leave
    /// the king capturable.
    #[must_use]
    pub fn generate_pseudo_legal_moves(&self, colour: Colour) -> Vec<Move> {
        let mut moves = Vec::with_capacity(EXPECTED_MOVES);
        for (square, piece) in self.pieces() {
            if piece.colour == colour {
                piece.generate_pseudo_legal_moves(square, self, &mut moves);
            }
        }
        moves
    }

    /// Calculates a list of legal moves (i.e. the moves that do not leave our
    /// king capturable).
    ///
    /// Every pseudo-legal candidate is played on a copy of the board and the
    /// opponent's pseudo-legal replies are generated on the result: if any of
    /// them lands on our king, the candidate is discarded. This costs
    /// O(branching²) per call and works on immutable snapshots only, so it can
    /// be called concurrently on shared boards.
    ///
    /// This is a correctness-critical path: every modification should be
    /// carefully tested (e.g. with perft).
    #[must_use]
    pub fn generate_legal_moves(&self, colour: Colour) -> Vec<Move> {
        self.generate_pseudo_legal_moves(colour)
            .into_iter()
            .filter(|candidate| {
                let next = self.apply(candidate);
                let replies = next.generate_pseudo_legal_moves(colour.opponent());
                let exposes_king = next.is_king_under_attack(colour, &replies);
                if exposes_king {
                    log::trace!("{candidate} would leave {colour} king capturable");
                }
                !exposes_king
            })
            .collect()
    }

    /// Checks whether a king could castle with the rook `move_to_rook` points
    /// at: it is our unmoved rook on the same rank and every square between the
    /// king and the rook is empty.
    ///
    /// Whether the king itself is allowed to castle (i.e. has not moved yet) is
    /// checked by its move generator.
    #[must_use]
    pub fn is_castling_possible(&self, move_to_rook: &Move) -> bool {
        let (king, rook) = (move_to_rook.from(), move_to_rook.to());
        if king.rank() != rook.rank() {
            return false;
        }
        let Some(king_colour) = self.at(king).map(|piece| piece.colour) else {
            return false;
        };
        let rook_ready = self
            .at(rook)
            .is_some_and(|piece| piece.is(PieceKind::Rook, king_colour) && piece.steps_taken() == 0);
        if !rook_ready {
            return false;
        }
        let (low, high) = (king.min(rook).index(), king.max(rook).index());
        self.squares[low + 1..high].iter().all(Option::is_none)
    }

    /// Checks whether any of the opponent's moves lands on `king_colour`'s
    /// king.
    #[must_use]
    pub fn is_king_under_attack(&self, king_colour: Colour, opponent_moves: &[Move]) -> bool {
        opponent_moves.iter().any(|opponent_move| {
            self.at(opponent_move.to())
                .is_some_and(|piece| piece.is(PieceKind::King, king_colour))
        })
    }

    /// Checks whether `colour`'s king is attacked in the current placement.
    #[must_use]
    pub fn is_in_check(&self, colour: Colour) -> bool {
        self.is_king_under_attack(colour, &self.generate_pseudo_legal_moves(colour.opponent()))
    }

    /// Parses the board and the side to move from [Forsyth-Edwards Notation]
    /// (FEN). Halfmove clock and fullmove counter are optional and ignored.
    ///
    /// FEN does not record how many times each piece has moved, so step
    /// counters are derived from the other fields:
    ///
    /// - Kings and rooks that can still castle according to the castling
    ///   rights have not moved, others have moved once.
    /// - Pawns on their starting rank have not moved. Other pawns have moved
    ///   twice (i.e. they can not be taken en passant), except the pawn that
    ///   has just been pushed according to the en passant square.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if the input is malformed or the position can
    /// not be handled by the move generator (e.g. there is not exactly one
    /// king per side or pawns stand on the back ranks).
    ///
    /// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
    pub fn from_fen(input: &str) -> anyhow::Result<(Self, Colour)> {
        let mut parts = input.split_whitespace();
        let Some(placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let mut board = Self::parse_placement(placement)?;
        let side_to_move: Colour = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        let Some(castling) = parts.next() else {
            bail!("incorrect FEN: missing castling rights");
        };
        board.derive_castling_steps(castling)?;
        board.derive_pawn_steps();
        match parts.next() {
            Some("-") => {},
            Some(value) => board.mark_double_push(value, side_to_move)?,
            None => bail!("incorrect FEN: missing en passant square"),
        }
        for counter in parts.by_ref().take(2) {
            if !counter.bytes().all(|c| c.is_ascii_digit()) {
                bail!("incorrect FEN: move counters can only contain digits, got {counter}");
            }
        }
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }
        Ok((board, side_to_move))
    }

    fn parse_placement(placement: &str) -> anyhow::Result<Self> {
        let mut board = Self::empty();
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != BOARD_WIDTH as usize {
            bail!("incorrect FEN: expected 8 ranks, got {placement}");
        }
        for (rank, rank_fen) in Rank::iter().rev().zip(ranks) {
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                if file >= BOARD_WIDTH {
                    bail!("incorrect FEN: rank {rank_fen} is longer than {BOARD_WIDTH}");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                if piece.kind == PieceKind::Pawn && rank.is_backrank() {
                    bail!("pawns can not be placed on backranks");
                }
                board.set(Square::new(file.try_into()?, rank), Some(piece));
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}");
            }
        }
        for colour in [Colour::White, Colour::Black] {
            let kings = board
                .pieces()
                .filter(|(_, piece)| piece.is(PieceKind::King, colour))
                .count();
            if kings != 1 {
                bail!("expected 1 {colour} king, got {kings}");
            }
        }
        Ok(board)
    }

    fn derive_castling_steps(&mut self, castling: &str) -> anyhow::Result<()> {
        let (mut short, mut long) = ([false; 2], [false; 2]);
        if castling != "-" {
            for symbol in castling.chars() {
                match symbol {
                    'K' => short[0] = true,
                    'Q' => long[0] = true,
                    'k' => short[1] = true,
                    'q' => long[1] = true,
                    _ => bail!("unknown castle rights: {castling}"),
                }
            }
        }
        for (side, colour) in [Colour::White, Colour::Black].into_iter().enumerate() {
            let backrank = colour.backrank();
            let unmoved = [
                (Square::new(File::E, backrank), short[side] || long[side]),
                (Square::new(File::H, backrank), short[side]),
                (Square::new(File::A, backrank), long[side]),
            ];
            for (square, slot) in Square::iter().zip(self.squares.iter_mut()) {
                let Some(piece) = slot.as_mut() else {
                    continue;
                };
                if piece.colour != colour || !matches!(piece.kind, PieceKind::King | PieceKind::Rook)
                {
                    continue;
                }
                let can_castle = unmoved
                    .iter()
                    .any(|(origin, allowed)| *allowed && *origin == square);
                if !can_castle {
                    *piece = piece.with_steps_taken(1);
                }
            }
        }
        Ok(())
    }

    fn derive_pawn_steps(&mut self) {
        for (square, slot) in Square::iter().zip(self.squares.iter_mut()) {
            let Some(piece) = slot.as_mut() else {
                continue;
            };
            if piece.kind == PieceKind::Pawn && square.rank() != piece.colour.pawns_starting() {
                *piece = piece.with_steps_taken(2);
            }
        }
    }

    fn mark_double_push(&mut self, en_passant: &str, side_to_move: Colour) -> anyhow::Result<()> {
        let square = Square::try_from(en_passant).context("incorrect FEN: en passant square")?;
        let expected_rank = match side_to_move {
            Colour::White => Rank::Six,
            Colour::Black => Rank::Three,
        };
        if square.rank() != expected_rank {
            bail!(
                "expected en passant square to be on rank {}, got {}",
                expected_rank,
                square.rank()
            );
        }
        let pushed = square
            .offset(side_to_move.opponent().push_direction())
            .context("en passant square is not beyond pushed pawn")?;
        match self.at(pushed) {
            Some(pawn) if pawn.is(PieceKind::Pawn, side_to_move.opponent()) => {
                self.set(pushed, Some(pawn.with_steps_taken(1)));
                Ok(())
            },
            _ => bail!("en passant square is not beyond pushed pawn"),
        }
    }

    /// Renders the board with Unicode chess symbols and file/rank labels for
    /// the terminal, White at the bottom.
    #[must_use]
    pub fn render(&self) -> String {
        let mut result = String::new();
        for rank in Rank::iter().rev() {
            result.push_str(&format!("{rank} "));
            for file in File::iter() {
                result.push(' ');
                result.push(self.at(Square::new(file, rank)).map_or('·', |piece| piece.glyph()));
            }
            result.push('\n');
        }
        result.push_str("  ");
        for file in File::iter() {
            result.push_str(&format!(" {file}"));
        }
        result.push('\n');
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0i32;
            for file in File::iter() {
                if let Some(piece) = self.at(Square::new(file, rank)) {
                    if empty_squares != 0 {
                        write!(f, "{empty_squares}")?;
                        empty_squares = 0;
                    }
                    write!(f, "{piece}")?;
                } else {
                    empty_squares += 1;
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    write!(f, "{SQUARE_SEPARATOR}")?;
                }
            }
            if rank != Rank::One {
                write!(f, "{LINE_SEPARATOR}")?;
            }
        }
        Ok(())
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
