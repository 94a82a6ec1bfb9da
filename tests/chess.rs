use ply::chess::board::Board;
use ply::chess::core::{Colour, Piece, PieceKind, Square};
use ply::chess::game::{Game, IllegalMove, Outcome};
use ply::chess::moves::{Move, MoveAttributes};
use pretty_assertions::assert_eq;

// Positions with checks, pins, castling rights, promotions and en passant.
const POSITIONS: [&str; 8] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    "4k1r1/8/8/4PpP1/6K1/8/8/8 w - f6 0 1",
    "1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1",
];

fn setup(input: &str) -> (Board, Colour) {
    Board::from_fen(input).unwrap_or_else(|e| panic!("parsing legal position {input}: {e}"))
}

fn play(game: &mut Game, moves: &[&str]) -> bool {
    let mut game_over = false;
    for next_move in moves {
        game_over = game
            .make_move(next_move.parse().unwrap())
            .unwrap_or_else(|e| panic!("playing {next_move}: {e}"));
    }
    game_over
}

fn total_pieces(board: &Board) -> usize {
    board.count_pieces(Colour::White) + board.count_pieces(Colour::Black)
}

#[test]
fn starting_position() {
    let game = Game::new();
    assert_eq!(game.board().count_pieces(Colour::White), 16);
    assert_eq!(game.board().count_pieces(Colour::Black), 16);
    assert_eq!(game.legal_moves().len(), 20);
    assert_eq!(game.active_colour(), Colour::White);
}

#[test]
fn opening_push() {
    let mut game = Game::new();
    let e2 = Square::try_from(12u8).unwrap();
    let e4 = Square::try_from(28u8).unwrap();
    assert_eq!(game.make_move(Move::new(e2, e4)), Ok(false));
    assert_eq!(game.board().at(e2), None);
    let pawn = game.board().at(e4).unwrap();
    assert_eq!(pawn.kind, PieceKind::Pawn);
    assert_eq!(pawn.colour, Colour::White);
    assert_eq!(pawn.steps_taken(), 1);
    assert_eq!(game.active_colour(), Colour::Black);
    assert_eq!(game.legal_moves().len(), 20);
}

#[test]
fn legal_moves_never_expose_king() {
    for input in POSITIONS {
        let (board, colour) = setup(input);
        for next_move in board.generate_legal_moves(colour) {
            let next = board.apply(&next_move);
            let replies = next.generate_pseudo_legal_moves(colour.opponent());
            assert!(
                !next.is_king_under_attack(colour, &replies),
                "{next_move} exposes the king in {input}"
            );
        }
    }
}

#[test]
fn captures_remove_exactly_one_piece() {
    for input in POSITIONS {
        let (board, colour) = setup(input);
        for next_move in board.generate_legal_moves(colour) {
            let attributes = next_move.attributes(&board);
            let removed = total_pieces(&board) - total_pieces(&board.apply(&next_move));
            let expected = usize::from(
                attributes.intersects(MoveAttributes::CAPTURE | MoveAttributes::EN_PASSANT),
            );
            assert_eq!(removed, expected, "{next_move} in {input}");
        }
    }
}

#[test]
fn promotion_always_gives_queen() {
    let mut promotions = 0;
    for input in POSITIONS {
        let (board, colour) = setup(input);
        for next_move in board.generate_legal_moves(colour) {
            if !next_move.is_pawn_promotion(&board) {
                continue;
            }
            promotions += 1;
            assert_eq!(
                board.apply(&next_move).at(next_move.to()),
                Some(Piece::queen(colour).with_steps_taken(3)),
                "{next_move} in {input}"
            );
        }
    }
    assert!(promotions > 0);
}

#[test]
fn moved_rook_blocks_castling() {
    let (board, colour) = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    // Move the rook away and back.
    let board = board
        .apply(&Move::new(Square::H1, Square::H2))
        .apply(&Move::new(Square::H2, Square::H1));
    assert_eq!(board.at(Square::H1).map(|rook| rook.steps_taken()), Some(2));
    let mut moves = Vec::new();
    board
        .at(Square::E1)
        .unwrap()
        .generate_pseudo_legal_moves(Square::E1, &board, &mut moves);
    assert!(!moves.contains(&Move::new(Square::E1, Square::G1)));
    assert!(moves.contains(&Move::new(Square::E1, Square::C1)));
    assert!(!board
        .generate_legal_moves(colour)
        .contains(&Move::new(Square::E1, Square::G1)));
}

#[test]
fn en_passant_capture() {
    let mut game = Game::new();
    assert!(!play(&mut game, &["a2 a3", "d7 d5", "a3 a4", "d5 d4", "e2 e4"]));
    let capture = Move::new(Square::D4, Square::E3);
    assert!(game.is_legal_move(&capture));
    assert_eq!(
        capture.attributes(game.board()),
        MoveAttributes::EN_PASSANT
    );
    assert_eq!(game.make_move(capture), Ok(false));
    // The pawn is removed from the square it moved to, not from the one it
    // passed.
    assert_eq!(game.board().at(Square::E4), None);
    assert_eq!(
        game.board().at(Square::E3).map(|pawn| pawn.colour),
        Some(Colour::Black)
    );
    assert_eq!(game.board().count_pieces(Colour::White), 15);
}

#[test]
fn castling_moves_rook() {
    let mut game = Game::new();
    assert!(!play(
        &mut game,
        &["e2 e4", "e7 e5", "g1 f3", "b8 c6", "f1 c4", "g8 f6", "e1 g1"]
    ));
    assert_eq!(game.board().at(Square::G1), Some(Piece::king(Colour::White).with_steps_taken(1)));
    assert_eq!(game.board().at(Square::F1), Some(Piece::rook(Colour::White).with_steps_taken(1)));
    assert_eq!(game.board().at(Square::H1), None);
    assert_eq!(game.board().at(Square::E1), None);
}

#[test]
fn checkmate_ends_game() {
    let mut game = Game::new();
    assert!(play(&mut game, &["f2 f3", "e7 e5", "g2 g4", "d8 h4"]));
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.active_colour(), Colour::White);
    assert_eq!(
        game.outcome(),
        Outcome::Checkmate {
            winner: Colour::Black
        }
    );
}

#[test]
fn stalemate_ends_game() {
    let mut game = Game::from_fen("k7/8/2Q5/8/8/8/8/7K w - - 0 1").unwrap();
    assert!(play(&mut game, &["c6 b6"]));
    assert!(game.legal_moves().is_empty());
    assert_eq!(game.active_colour(), Colour::Black);
    assert_eq!(game.outcome(), Outcome::Stalemate);
}

#[test]
fn illegal_move_is_rejected() {
    let mut game = Game::new();
    let knight_jump = Move::new(Square::G1, Square::G3);
    assert_eq!(game.make_move(knight_jump), Err(IllegalMove(knight_jump)));
    assert_eq!(game.board(), &Board::starting());
    assert_eq!(game.active_colour(), Colour::White);
}

#[test]
fn snapshots_stay_independent() {
    let mut game = Game::new();
    let before = game.board().clone();
    assert!(!play(&mut game, &["e2 e4"]));
    assert_eq!(before, Board::starting());
    assert_ne!(game.board(), &before);
}
