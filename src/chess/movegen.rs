//! Pseudo-legal move [generation] for each kind of piece on a flat 64-square
//! board.
//!
//! The board has no border sentinels, so adding an offset to a square index
//! happily wraps from the H file onto the A file of the next rank. Each
//! generator re-derives the geometry of the candidate move relative to its
//! origin and drops candidates that wrapped.
//!
//! Nothing here checks whether the moving side's king is left capturable:
//! that is [`Board::generate_legal_moves`]'s job.
//!
//! [generation]: https://www.chessprogramming.org/Move_Generation

use crate::chess::board::Board;
use crate::chess::core::{Piece, PieceKind, Square};
use crate::chess::moves::Move;

const KING_DIRECTIONS: [i8; 8] = [1, -1, 9, -9, 8, -8, 7, -7];
const QUEEN_DIRECTIONS: [i8; 8] = KING_DIRECTIONS;
const ROOK_DIRECTIONS: [i8; 4] = [-1, 1, 8, -8];
const BISHOP_DIRECTIONS: [i8; 4] = [9, -9, 7, -7];
const KNIGHT_OFFSETS: [i8; 8] = [6, -6, 10, -10, 15, -15, 17, -17];

/// Offset from the king to the kingside rook in the starting position.
const KINGSIDE_ROOK_OFFSET: i8 = 3;
/// Offset from the king to the queenside rook in the starting position.
const QUEENSIDE_ROOK_OFFSET: i8 = -4;
const CASTLING_KING_WALK: i8 = 2;

impl Piece {
    /// Appends the moves this piece can make from `from` obeying its movement
    /// geometry and board occupancy.
    pub fn generate_pseudo_legal_moves(&self, from: Square, board: &Board, moves: &mut Vec<Move>) {
        match self.kind {
            PieceKind::King => self.generate_king_moves(from, board, moves),
            PieceKind::Queen => self.generate_sliding_moves(from, &QUEEN_DIRECTIONS, board, moves),
            PieceKind::Rook => self.generate_sliding_moves(from, &ROOK_DIRECTIONS, board, moves),
            PieceKind::Bishop => self.generate_sliding_moves(from, &BISHOP_DIRECTIONS, board, moves),
            PieceKind::Knight => self.generate_knight_moves(from, board, moves),
            PieceKind::Pawn => self.generate_pawn_moves(from, board, moves),
        }
    }

    /// Checks whether the target square is free or holds an opponent piece.
    fn can_land_on(&self, target: Square, board: &Board) -> bool {
        board
            .at(target)
            .map_or(true, |piece| piece.colour != self.colour)
    }

    fn generate_sliding_moves(
        &self,
        from: Square,
        directions: &[i8],
        board: &Board,
        moves: &mut Vec<Move>,
    ) {
        for &direction in directions {
            let mut current = from;
            // Walk the ray until it hits a piece, leaves the board or wraps
            // around an edge.
            while let Some(next) = current.offset(direction) {
                current = next;
                let candidate = Move::new(from, current);
                let stays_on_ray = match direction.abs() {
                    // From the A file, the H file wraps back onto the A file
                    // of the next rank.
                    1 => candidate.is_straight_slide() && from.rank() == current.rank(),
                    8 => candidate.is_straight_slide(),
                    _ => candidate.is_diagonal_slide(),
                };
                if !stays_on_ray {
                    break;
                }
                match board.at(current) {
                    None => moves.push(candidate),
                    Some(piece) if piece.colour == self.colour => break,
                    Some(_) => {
                        moves.push(candidate);
                        break;
                    },
                }
            }
        }
    }

    fn generate_king_moves(&self, from: Square, board: &Board, moves: &mut Vec<Move>) {
        for direction in KING_DIRECTIONS {
            let Some(to) = from.offset(direction) else {
                continue;
            };
            let candidate = Move::new(from, to);
            if !candidate.is_king_step() {
                continue;
            }
            if self.can_land_on(to, board) {
                moves.push(candidate);
            }
        }
        if self.steps_taken() != 0 {
            return;
        }
        for (rook_offset, walk) in [
            (KINGSIDE_ROOK_OFFSET, CASTLING_KING_WALK),
            (QUEENSIDE_ROOK_OFFSET, -CASTLING_KING_WALK),
        ] {
            let Some(rook_square) = from.offset(rook_offset) else {
                continue;
            };
            if !board.is_castling_possible(&Move::new(from, rook_square)) {
                continue;
            }
            if let Some(to) = from.offset(walk) {
                moves.push(Move::new(from, to));
            }
        }
    }

    fn generate_knight_moves(&self, from: Square, board: &Board, moves: &mut Vec<Move>) {
        for offset in KNIGHT_OFFSETS {
            let Some(to) = from.offset(offset) else {
                continue;
            };
            let candidate = Move::new(from, to);
            if candidate.is_knight_move() && self.can_land_on(to, board) {
                moves.push(candidate);
            }
        }
    }

    fn generate_pawn_moves(&self, from: Square, board: &Board, moves: &mut Vec<Move>) {
        let advance = self.colour.push_direction();
        // Pawns never stand on the last rank: they are promoted on arrival.
        let Some(one_ahead) = from.offset(advance) else {
            return;
        };
        if board.at(one_ahead).is_none() {
            moves.push(Move::new(from, one_ahead));
            if self.steps_taken() == 0 {
                if let Some(two_ahead) = one_ahead.offset(advance) {
                    if board.at(two_ahead).is_none() {
                        moves.push(Move::new(from, two_ahead));
                    }
                }
            }
        }
        for side in [1, -1] {
            let Some(to) = from.offset(advance + side) else {
                continue;
            };
            let capture = Move::new(from, to);
            if !capture.is_diagonal_slide() {
                continue;
            }
            match board.at(to) {
                Some(target) if target.colour != self.colour => moves.push(capture),
                Some(_) => {},
                None => {
                    if self.can_capture_en_passant(from, side, board) {
                        moves.push(capture);
                    }
                },
            }
        }
    }

    /// The opponent pawn right next to us (towards the capture side) has just
    /// made its double push.
    fn can_capture_en_passant(&self, from: Square, side: i8, board: &Board) -> bool {
        if from.rank() != self.colour.en_passant_rank() {
            return false;
        }
        // Diagonal target is on the board, so the neighbour is on the same rank.
        from.offset(side)
            .and_then(|neighbour| board.at(neighbour))
            .is_some_and(|neighbour| {
                neighbour.is(PieceKind::Pawn, self.colour.opponent())
                    && neighbour.steps_taken() == 1
            })
    }
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::Colour;

    fn targets(board: &Board, from: Square) -> Vec<String> {
        let mut moves = vec![];
        let piece = board.at(from).expect("square should be occupied");
        piece.generate_pseudo_legal_moves(from, board, &mut moves);
        moves
            .iter()
            .map(|m| {
                assert_eq!(m.from(), from);
                m.to().to_string()
            })
            .sorted()
            .collect()
    }

    fn expected(squares: &[&str]) -> Vec<String> {
        squares.iter().map(|s| (*s).to_string()).sorted().collect()
    }

    #[test]
    fn rook_stops_at_board_edges() {
        let board = Board::empty().place(Square::H1, Piece::rook(Colour::White));
        assert_eq!(
            targets(&board, Square::H1),
            expected(&[
                "a1", "b1", "c1", "d1", "e1", "f1", "g1", "h2", "h3", "h4", "h5", "h6", "h7", "h8"
            ])
        );
        let board = Board::empty().place(Square::A8, Piece::rook(Colour::Black));
        assert_eq!(
            targets(&board, Square::A8),
            expected(&[
                "b8", "c8", "d8", "e8", "f8", "g8", "h8", "a7", "a6", "a5", "a4", "a3", "a2", "a1"
            ])
        );
    }

    #[test]
    fn rook_does_not_wrap_along_rank() {
        let board = Board::empty().place(Square::A1, Piece::rook(Colour::White));
        assert_eq!(
            targets(&board, Square::A1),
            expected(&[
                "b1", "c1", "d1", "e1", "f1", "g1", "h1", "a2", "a3", "a4", "a5", "a6", "a7", "a8"
            ])
        );
    }

    #[test]
    fn bishop_does_not_wrap_around() {
        let board = Board::empty().place(Square::H4, Piece::bishop(Colour::White));
        assert_eq!(
            targets(&board, Square::H4),
            expected(&["g5", "f6", "e7", "d8", "g3", "f2", "e1"])
        );
        let board = Board::empty().place(Square::A1, Piece::bishop(Colour::Black));
        assert_eq!(
            targets(&board, Square::A1),
            expected(&["b2", "c3", "d4", "e5", "f6", "g7", "h8"])
        );
    }

    #[test]
    fn sliders_stop_at_pieces() {
        let board = Board::empty()
            .place(Square::D4, Piece::queen(Colour::White))
            .place(Square::D6, Piece::pawn(Colour::White))
            .place(Square::F4, Piece::knight(Colour::Black))
            .place(Square::B2, Piece::rook(Colour::Black));
        assert_eq!(
            targets(&board, Square::D4),
            expected(&[
                "d5", "e4", "f4", "c4", "b4", "a4", "d3", "d2", "d1", "e5", "f6", "g7", "h8", "c5",
                "b6", "a7", "e3", "f2", "g1", "c3", "b2",
            ])
        );
    }

    #[test]
    fn knight_jumps() {
        let board = Board::empty()
            .place(Square::G1, Piece::knight(Colour::White))
            .place(Square::E2, Piece::pawn(Colour::White))
            .place(Square::H3, Piece::pawn(Colour::Black));
        assert_eq!(targets(&board, Square::G1), expected(&["f3", "h3"]));
        let board = Board::empty().place(Square::A4, Piece::knight(Colour::Black));
        assert_eq!(
            targets(&board, Square::A4),
            expected(&["b6", "c5", "c3", "b2"])
        );
    }

    #[test]
    fn king_steps() {
        let board = Board::empty()
            .place(Square::A1, Piece::king(Colour::White).with_steps_taken(1))
            .place(Square::B2, Piece::pawn(Colour::White));
        // H1 (+7) is across the board edge.
        assert_eq!(targets(&board, Square::A1), expected(&["a2", "b1"]));
        let board =
            Board::empty().place(Square::H8, Piece::king(Colour::Black).with_steps_taken(3));
        assert_eq!(targets(&board, Square::H8), expected(&["g8", "g7", "h7"]));
    }

    #[test]
    fn castling_candidates() {
        let board = Board::empty()
            .place(Square::E1, Piece::king(Colour::White))
            .place(Square::A1, Piece::rook(Colour::White))
            .place(Square::H1, Piece::rook(Colour::White));
        let moves = targets(&board, Square::E1);
        assert!(moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));

        // The kingside rook has moved.
        let board = board.place(Square::H1, Piece::rook(Colour::White).with_steps_taken(2));
        let moves = targets(&board, Square::E1);
        assert!(!moves.contains(&"g1".to_string()));
        assert!(moves.contains(&"c1".to_string()));

        // Blocked on the queenside.
        let board = board.place(Square::B1, Piece::knight(Colour::White));
        let moves = targets(&board, Square::E1);
        assert!(!moves.contains(&"c1".to_string()));

        // The king has moved.
        let board = Board::empty()
            .place(Square::E1, Piece::king(Colour::White).with_steps_taken(2))
            .place(Square::H1, Piece::rook(Colour::White));
        assert!(!targets(&board, Square::E1).contains(&"g1".to_string()));
    }

    #[test]
    fn pawn_pushes() {
        let board = Board::starting();
        assert_eq!(targets(&board, Square::E2), expected(&["e3", "e4"]));
        assert_eq!(targets(&board, Square::D7), expected(&["d6", "d5"]));

        // Double push requires both squares ahead to be empty.
        let board = Board::starting().place(Square::E4, Piece::knight(Colour::Black));
        assert_eq!(targets(&board, Square::E2), expected(&["e3"]));
        let board = Board::starting().place(Square::E3, Piece::knight(Colour::Black));
        assert_eq!(targets(&board, Square::E2), Vec::<String>::new());

        // A pawn that moved pushes one square.
        let board = Board::empty().place(Square::C3, Piece::pawn(Colour::White).with_steps_taken(1));
        assert_eq!(targets(&board, Square::C3), expected(&["c4"]));
    }

    #[test]
    fn pawn_captures() {
        let board = Board::empty()
            .place(Square::A4, Piece::pawn(Colour::White).with_steps_taken(1))
            .place(Square::B5, Piece::rook(Colour::Black))
            .place(Square::H4, Piece::rook(Colour::Black))
            .place(Square::H5, Piece::rook(Colour::Black));
        // H4 and H5 would be reached through wrapping.
        assert_eq!(targets(&board, Square::A4), expected(&["a5", "b5"]));

        let board = Board::empty()
            .place(Square::E6, Piece::pawn(Colour::Black).with_steps_taken(1))
            .place(Square::D5, Piece::pawn(Colour::White))
            .place(Square::F5, Piece::pawn(Colour::Black));
        assert_eq!(targets(&board, Square::E6), expected(&["e5", "d5"]));
    }

    #[test]
    fn en_passant_candidates() {
        let board = Board::empty()
            .place(Square::E5, Piece::pawn(Colour::White).with_steps_taken(2))
            .place(Square::D5, Piece::pawn(Colour::Black).with_steps_taken(1))
            .place(Square::F5, Piece::pawn(Colour::Black).with_steps_taken(1));
        assert_eq!(
            targets(&board, Square::E5),
            expected(&["e6", "d6", "f6"])
        );

        // The neighbour has moved twice: it did not just double push.
        let board = board.place(Square::D5, Piece::pawn(Colour::Black).with_steps_taken(2));
        assert_eq!(targets(&board, Square::E5), expected(&["e6", "f6"]));

        // Wrong rank for White.
        let board = Board::empty()
            .place(Square::E4, Piece::pawn(Colour::White).with_steps_taken(1))
            .place(Square::D4, Piece::pawn(Colour::Black).with_steps_taken(1));
        assert_eq!(targets(&board, Square::E4), expected(&["e5"]));

        // Black captures on the fourth rank (index 3).
        let board = Board::empty()
            .place(Square::B4, Piece::pawn(Colour::Black).with_steps_taken(2))
            .place(Square::A4, Piece::pawn(Colour::White).with_steps_taken(1));
        assert_eq!(targets(&board, Square::B4), expected(&["b3", "a3"]));
    }
}
