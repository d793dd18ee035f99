//! Score breakdown for one resolved question

use serde::{Deserialize, Serialize};

/// Itemized points awarded for a single question
///
/// `total` is always `base_points + time_bonus - wrong_penalty` and may be
/// negative when the penalty outweighs the base points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_points: i32,
    pub time_bonus: i32,
    pub wrong_penalty: i32,
    pub total: i32,
}

impl ScoreBreakdown {
    pub fn new(base_points: i32, time_bonus: i32, wrong_penalty: i32) -> Self {
        Self {
            base_points,
            time_bonus,
            wrong_penalty,
            total: base_points + time_bonus - wrong_penalty,
        }
    }

    pub fn has_time_bonus(&self) -> bool {
        self.time_bonus > 0
    }

    pub fn has_penalty(&self) -> bool {
        self.wrong_penalty > 0
    }

    /// Lines shown in the score panel; bonus and penalty only when non-zero
    pub fn lines(&self) -> Vec<(&'static str, String)> {
        let mut lines = vec![("Base points", format!("+{}", self.base_points))];
        if self.has_time_bonus() {
            lines.push(("Time bonus", format!("+{}", self.time_bonus)));
        }
        if self.has_penalty() {
            lines.push(("Wrong penalty", format!("-{}", self.wrong_penalty)));
        }
        lines.push(("Total", self.total.to_string()));
        lines
    }
}
