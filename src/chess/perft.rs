//! [Perft] (*per*formance *t*esting) is a technique for checking correctness of
//! move generation (tested functions are generate legal moves and apply move).
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::board::Board;
use crate::chess::core::Colour;
use crate::chess::moves::Move;

/// Counts the leaf nodes of the legal move tree of the given depth.
#[must_use]
pub fn perft(board: &Board, active_colour: Colour, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = board.generate_legal_moves(active_colour);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next_move| perft(&board.apply(next_move), active_colour.opponent(), depth - 1))
        .sum()
}

/// Splits the [`perft`] count by the root moves, which helps to find the
/// first diverging move when comparing against other move generators.
#[must_use]
pub fn divide(board: &Board, active_colour: Colour, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    board
        .generate_legal_moves(active_colour)
        .into_iter()
        .map(|next_move| {
            let nodes = perft(&board.apply(&next_move), active_colour.opponent(), depth - 1);
            (next_move, nodes)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn starting_position() {
        let board = Board::starting();
        assert_eq!(perft(&board, Colour::White, 0), 1);
        assert_eq!(perft(&board, Colour::White, 1), 20);
        assert_eq!(perft(&board, Colour::White, 2), 400);
    }

    #[test]
    fn divide_sums_up() {
        let board = Board::starting();
        let split = divide(&board, Colour::White, 2);
        assert_eq!(split.len(), 20);
        assert!(split.iter().all(|(_, nodes)| *nodes == 20));
        assert_eq!(split.iter().map(|(_, nodes)| nodes).sum::<u64>(), 400);
        assert!(divide(&board, Colour::White, 0).is_empty());
    }
}
