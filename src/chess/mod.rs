//! Implementation of chess rules: the board, move generation and the game
//! state.

pub mod board;
pub mod core;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod perft;
