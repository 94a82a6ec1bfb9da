//! Commands understood by the [`super::Console`].

use crate::chess::moves::Move;

/// Perft grows exponentially: anything deeper would not finish in reasonable
/// time with the mailbox move generator.
const MAX_PERFT_DEPTH: u8 = 6;

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Command {
    Move(Move),
    ListMoves,
    Display,
    SetPosition { fen: String },
    NewGame,
    Perft { depth: u8 },
    Help,
    Quit,
    Unknown(String),
}

impl Command {
    pub(super) fn parse(input: &str) -> Self {
        let input = input.trim();
        let parts: Vec<&str> = input.split_whitespace().collect();
        match parts.as_slice() {
            ["moves"] => Self::ListMoves,
            ["d" | "display"] => Self::Display,
            ["fen", fen @ ..] if !fen.is_empty() => Self::SetPosition {
                fen: fen.join(" "),
            },
            ["new"] => Self::NewGame,
            ["perft", depth] => match depth.parse() {
                Ok(depth) if depth <= MAX_PERFT_DEPTH => Self::Perft { depth },
                _ => Self::Unknown(input.to_string()),
            },
            ["help"] => Self::Help,
            ["quit" | "exit"] => Self::Quit,
            _ => input
                .parse()
                .map_or_else(|_| Self::Unknown(input.to_string()), Self::Move),
        }
    }
}

pub(super) const HELP: &str = "\
Commands:
  <from> <to>    play a move, e.g. \"e2 e4\" or \"e2e4\"
  moves          list legal moves of the side to move
  d              show the board
  fen <FEN>      set up a position
  new            start a new game
  perft <depth>  count leaf nodes of the move tree, split by the first move
  help           show this message
  quit           exit";
