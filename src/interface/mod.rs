//! Line-oriented terminal front-end for playing a game against a human on the
//! other side of the keyboard.
//!
//! [`Console::run`] is the "main loop": it reads commands from the input
//! stream, applies them to the [`Game`] and writes responses to the output
//! stream. Both streams are generic, so the console can be driven by stdin or
//! by a buffer in tests.

use std::io::{BufRead, Write};

use itertools::Itertools;

use crate::chess::game::{Game, Outcome};
use crate::chess::perft::divide;
use crate::interface::command::{Command, HELP};

mod command;

/// Connects the game with the user's input and output.
pub struct Console<'a, R: BufRead, W: Write> {
    game: Game,
    input: &'a mut R,
    output: &'a mut W,
    show_board: bool,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    /// Creates a console that continues `game` with the provided I/O.
    #[must_use]
    pub fn new(game: Game, input: &'a mut R, output: &'a mut W) -> Self {
        Self {
            game,
            input,
            output,
            show_board: true,
        }
    }

    /// Stops drawing the board after every move. It is still shown on `d`.
    #[must_use]
    pub const fn quiet(mut self) -> Self {
        self.show_board = false;
        self
    }

    /// Reads and executes commands until "quit" is sent, the input ends or the
    /// game is over.
    ///
    /// Malformed commands and illegal moves are reported and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error when reading the input or writing the output fails.
    pub fn run(&mut self) -> anyhow::Result<()> {
        if self.show_board {
            self.handle_display()?;
        }
        if self.report_game_over()? {
            return Ok(());
        }
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            match Command::parse(&line) {
                Command::Move(next_move) => match self.game.make_move(next_move) {
                    Ok(game_over) => {
                        if self.show_board {
                            self.handle_display()?;
                        }
                        if game_over {
                            let _ = self.report_game_over()?;
                            break;
                        }
                    },
                    Err(e) => writeln!(self.output, "error: {e}")?,
                },
                Command::ListMoves => self.handle_moves()?,
                Command::Display => self.handle_display()?,
                Command::SetPosition { fen } => match Game::from_fen(&fen) {
                    Ok(game) => {
                        self.game = game;
                        self.handle_display()?;
                        if self.report_game_over()? {
                            break;
                        }
                    },
                    Err(e) => writeln!(self.output, "error: invalid position: {e:#}")?,
                },
                Command::NewGame => {
                    self.game.reset();
                    self.handle_display()?;
                },
                Command::Perft { depth } => self.handle_perft(depth)?,
                Command::Help => writeln!(self.output, "{HELP}")?,
                Command::Quit => break,
                Command::Unknown(command) => writeln!(
                    self.output,
                    "error: unknown command \"{command}\", type \"help\" for the list of commands"
                )?,
            }
        }
        Ok(())
    }

    fn handle_display(&mut self) -> anyhow::Result<()> {
        write!(self.output, "{}", self.game.board().render())?;
        writeln!(self.output, "{} to move", self.game.active_colour())?;
        Ok(())
    }

    /// Prints the legal moves sorted by the squares so that the output is easy
    /// to scan.
    fn handle_moves(&mut self) -> anyhow::Result<()> {
        let moves = self.game.legal_moves().iter().sorted().join(" ");
        writeln!(self.output, "{moves}")?;
        Ok(())
    }

    fn handle_perft(&mut self, depth: u8) -> anyhow::Result<()> {
        let split = divide(self.game.board(), self.game.active_colour(), depth);
        for (root_move, nodes) in split.iter().sorted() {
            writeln!(self.output, "{root_move}: {nodes}")?;
        }
        let total: u64 = split.iter().map(|(_, nodes)| nodes).sum();
        writeln!(self.output, "Nodes searched: {total}")?;
        Ok(())
    }

    /// Prints the result if the side to move has no legal moves. Returns
    /// whether the game is over.
    fn report_game_over(&mut self) -> anyhow::Result<bool> {
        let outcome = self.game.outcome();
        if outcome == Outcome::Ongoing {
            return Ok(false);
        }
        writeln!(
            self.output,
            "Game over: {} has no legal moves ({outcome})",
            self.game.active_colour()
        )?;
        Ok(true)
    }
}
