//! Data structures for the quiz
//!
//! Defines questions, question banks and score breakdowns.

pub mod questions;
pub mod score;

pub use questions::*;
pub use score::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for one started game, used to correlate log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameId(pub Uuid);

impl GameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of feedback surfaced to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoticeKind {
    Correct,
    Incorrect,
    Timeout,
}

impl NoticeKind {
    pub fn title(&self) -> &'static str {
        match self {
            NoticeKind::Correct => "Correct!",
            NoticeKind::Incorrect => "Wrong!",
            NoticeKind::Timeout => "Time's up!",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            NoticeKind::Correct => "✔",
            NoticeKind::Incorrect => "✘",
            NoticeKind::Timeout => "⚠",
        }
    }
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeKind::Correct => write!(f, "CORRECT"),
            NoticeKind::Incorrect => write!(f, "INCORRECT"),
            NoticeKind::Timeout => write!(f, "TIMEOUT"),
        }
    }
}
