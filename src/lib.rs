//! UNO Quiz
//!
//! A card-picking trivia game for the terminal. Pick one of three face-down
//! cards, read the question, reveal the answers and beat the clock.
//!
//! # Game Mechanics
//!
//! - **Cards**: every round starts by picking one of three cards
//! - **Time Pressure**: six minutes per question, a bonus for answering in three
//! - **Penalties**: each wrong attempt costs a point on the eventual answer
//! - **Rounds**: six questions drawn at random from the question bank
//!
//! # Architecture
//!
//! - `game` - Game controller, phase transitions, scoring, countdown
//! - `tui` - Terminal user interface with ratatui
//! - `data` - Questions, question banks and score breakdowns
//! - `config` - Settings layered from file, environment and command line
//! - `testing` - Manual clock and recording notifier for tests

pub mod config;
pub mod data;
pub mod game;
pub mod testing;
pub mod tui;

pub use data::*;
pub use game::Game;

/// Game version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the game
pub type Result<T> = anyhow::Result<T>;

/// Custom error types
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum QuizError {
    #[error("Question {id} is invalid: {reason}")]
    InvalidQuestion { id: u32, reason: String },

    #[error("Question id {0} appears more than once")]
    DuplicateQuestionId(u32),

    #[error("Question bank has {available} questions, a game needs {required}")]
    NotEnoughQuestions { available: usize, required: usize },

    #[error("Unsupported question bank format: {0}")]
    UnsupportedBankFormat(String),
}
