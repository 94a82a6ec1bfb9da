use std::io;

use anyhow::Context;
use clap::Parser;
use ply::chess::game::Game;
use ply::chess::perft::perft;
use ply::interface::Console;

/// Plays chess in the terminal: moves are typed as "e2 e4", "help" lists
/// other commands.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Config {
    /// Starting position in Forsyth-Edwards Notation.
    #[arg(long)]
    fen: Option<String>,
    /// Count leaf nodes of the move tree of the given depth and exit.
    #[arg(long, value_name = "DEPTH")]
    perft: Option<u8>,
    /// Do not draw the board after every move.
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();
    log::debug!("{config:?}");

    let game = match &config.fen {
        Some(fen) => Game::from_fen(fen).context("parsing --fen")?,
        None => Game::new(),
    };

    if let Some(depth) = config.perft {
        println!("{}", perft(game.board(), game.active_colour(), depth));
        return Ok(());
    }

    if !config.quiet {
        ply::print_engine_info();
    }
    let mut input = io::stdin().lock();
    let mut output = io::stdout().lock();
    let mut console = Console::new(game, &mut input, &mut output);
    if config.quiet {
        console = console.quiet();
    }
    console.run()
}
