//! Points awarded for a resolved question

use crate::data::ScoreBreakdown;

/// Seconds allowed per question
pub const QUESTION_SECONDS: u32 = 360;

/// Answers given within this many seconds earn the speed bonus
pub const SPEED_BONUS_SECONDS: u32 = QUESTION_SECONDS / 2;

pub const PERFECT_POINTS: i32 = 10;      // correct on the first try
pub const RECOVERED_POINTS: i32 = 8;     // correct after wrong attempts
pub const TIMEOUT_POINTS: i32 = 5;       // time ran out
pub const SPEED_BONUS_POINTS: i32 = 10;
pub const PENALTY_PER_WRONG: i32 = 1;

/// Score one question.
///
/// Timeouts earn a flat [`TIMEOUT_POINTS`] with no bonus and no penalty.
/// A correct answer earns [`PERFECT_POINTS`] when there were no wrong
/// attempts, otherwise [`RECOVERED_POINTS`] minus one point per wrong
/// attempt, plus [`SPEED_BONUS_POINTS`] when answered within
/// [`SPEED_BONUS_SECONDS`]. The penalty is not capped, so `total` can be
/// negative.
pub fn calculate_score(is_correct: bool, wrong_attempts: u32, elapsed_seconds: u32) -> ScoreBreakdown {
    if !is_correct {
        return ScoreBreakdown::new(TIMEOUT_POINTS, 0, 0);
    }

    let (base_points, wrong_penalty) = if wrong_attempts == 0 {
        (PERFECT_POINTS, 0)
    } else {
        let wrong = i32::try_from(wrong_attempts).unwrap_or(i32::MAX);
        (RECOVERED_POINTS, wrong.saturating_mul(PENALTY_PER_WRONG))
    };

    let time_bonus = if elapsed_seconds <= SPEED_BONUS_SECONDS {
        SPEED_BONUS_POINTS
    } else {
        0
    };

    ScoreBreakdown::new(base_points, time_bonus, wrong_penalty)
}
