//! The state of a single game: the current board, the side to move and its
//! legal moves.

use std::fmt;

use crate::chess::board::Board;
use crate::chess::core::Colour;
use crate::chess::moves::Move;

/// Rejection of a move that is not among the legal moves of the side to move.
/// The game is not modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0} is not a legal move")]
pub struct IllegalMove(pub Move);

/// How the game stands for the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The side to move has at least one legal move.
    Ongoing,
    /// The side to move has no legal moves and its king is attacked.
    Checkmate {
        #[allow(missing_docs)]
        winner: Colour,
    },
    /// The side to move has no legal moves but is not in check.
    Stalemate,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => f.write_str("ongoing"),
            Self::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            Self::Stalemate => f.write_str("stalemate"),
        }
    }
}

/// A game keeps the legal moves of the side to move cached: they are
/// recomputed once after every move and used both for validating the next
/// move and for detecting the end of the game.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    active_colour: Colour,
    legal_moves: Vec<Move>,
}

impl Game {
    /// Starts a new game from the standard position with White to move.
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(Board::starting(), Colour::White)
    }

    /// Continues a game from an arbitrary board.
    #[must_use]
    pub fn from_board(board: Board, active_colour: Colour) -> Self {
        let legal_moves = board.generate_legal_moves(active_colour);
        Self {
            board,
            active_colour,
            legal_moves,
        }
    }

    /// Sets up the game from [FEN](https://www.chessprogramming.org/Forsyth-Edwards_Notation).
    ///
    /// # Errors
    ///
    /// Returns an error when [`Board::from_fen`] rejects the input.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let (board, active_colour) = Board::from_fen(input)?;
        Ok(Self::from_board(board, active_colour))
    }

    /// Plays the move for the side to move and passes the turn. Returns
    /// `true` if the game is over, i.e. the new side to move has no legal
    /// moves. Checkmate and stalemate are not distinguished here, see
    /// [`Game::outcome`].
    ///
    /// ```
    /// use ply::chess::game::Game;
    ///
    /// let mut game = Game::new();
    /// for next_move in ["f2 f3", "e7 e5", "g2 g4"] {
    ///     assert_eq!(game.make_move(next_move.parse().unwrap()), Ok(false));
    /// }
    /// assert_eq!(game.make_move("d8 h4".parse().unwrap()), Ok(true));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMove`] and leaves the game untouched if the move is
    /// not legal in the current position.
    pub fn make_move(&mut self, next_move: Move) -> Result<bool, IllegalMove> {
        if !self.is_legal_move(&next_move) {
            log::warn!("rejected {next_move}: not legal for {}", self.active_colour);
            return Err(IllegalMove(next_move));
        }
        log::debug!("{} plays {next_move}", self.active_colour);
        self.board = self.board.apply(&next_move);
        self.active_colour = self.active_colour.opponent();
        self.legal_moves = self.board.generate_legal_moves(self.active_colour);
        if self.is_over() {
            log::info!("game over: {}", self.outcome());
        }
        Ok(self.is_over())
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_legal_move(&self, candidate: &Move) -> bool {
        self.legal_moves.contains(candidate)
    }

    /// Goes back to the starting position with White to move.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move. After the game is over, this is the side that has no
    /// legal moves.
    #[must_use]
    pub const fn active_colour(&self) -> Colour {
        self.active_colour
    }

    /// Legal moves of the side to move in generation order.
    #[must_use]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.legal_moves.is_empty()
    }

    /// Tells checkmate from stalemate once the side to move runs out of
    /// moves.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if !self.is_over() {
            Outcome::Ongoing
        } else if self.board.is_in_check(self.active_colour) {
            Outcome::Checkmate {
                winner: self.active_colour.opponent(),
            }
        } else {
            Outcome::Stalemate
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::{Piece, Square};

    fn play(game: &mut Game, moves: &[&str]) -> bool {
        let mut over = false;
        for next_move in moves {
            over = game
                .make_move(next_move.parse().unwrap())
                .unwrap_or_else(|e| panic!("playing {next_move}: {e}"));
        }
        over
    }

    #[test]
    fn opening_push() {
        let mut game = Game::new();
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.make_move(Move::new(Square::E2, Square::E4)), Ok(false));
        assert_eq!(game.board().at(Square::E2), None);
        assert_eq!(
            game.board().at(Square::E4),
            Some(Piece::pawn(Colour::White).with_steps_taken(1))
        );
        assert_eq!(game.active_colour(), Colour::Black);
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(game.outcome(), Outcome::Ongoing);
    }

    #[test]
    fn illegal_move_keeps_state() {
        let mut game = Game::new();
        let before = game.board().clone();
        let rejected = Move::new(Square::E2, Square::E5);
        assert_eq!(game.make_move(rejected), Err(IllegalMove(rejected)));
        assert_eq!(
            IllegalMove(rejected).to_string(),
            "e2e5 is not a legal move"
        );
        // Black pieces can not move on White's turn.
        assert!(game.make_move(Move::new(Square::E7, Square::E5)).is_err());
        assert_eq!(game.board(), &before);
        assert_eq!(game.active_colour(), Colour::White);
        assert_eq!(game.legal_moves().len(), 20);
    }

    #[test]
    fn checkmate() {
        let mut game = Game::new();
        assert!(play(&mut game, &["f2 f3", "e7 e5", "g2 g4", "d8 h4"]));
        assert!(game.is_over());
        assert_eq!(game.active_colour(), Colour::White);
        assert_eq!(
            game.outcome(),
            Outcome::Checkmate {
                winner: Colour::Black
            }
        );
        assert_eq!(game.outcome().to_string(), "checkmate, Black wins");
    }

    #[test]
    fn stalemate() {
        let mut game = Game::from_fen("7k/8/5Q2/8/8/8/8/K7 w - - 0 1").unwrap();
        assert!(!game.is_over());
        assert!(play(&mut game, &["f6 g6"]));
        assert_eq!(game.active_colour(), Colour::Black);
        assert_eq!(game.outcome(), Outcome::Stalemate);
    }

    #[test]
    fn reset() {
        let mut game = Game::new();
        assert!(!play(&mut game, &["e2 e4", "e7 e5"]));
        game.reset();
        assert_eq!(game.board(), &Board::starting());
        assert_eq!(game.active_colour(), Colour::White);
        assert_eq!(game.legal_moves().len(), 20);
        assert_eq!(Game::default().board(), game.board());
    }
}
