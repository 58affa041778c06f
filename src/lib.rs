pub mod cli;
pub mod error;
pub mod game;
pub mod tui;
