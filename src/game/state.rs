//! Game state and phase transitions
//!
//! Transitions are pure: [`GameState::apply`] consumes the state and an
//! event and returns the next state plus the effects the controller has to
//! carry out. Events that make no sense in the current phase leave the state
//! untouched and produce no effects.

use super::scoring::{calculate_score, QUESTION_SECONDS};
use super::{CARD_COUNT, FEEDBACK_DELAY_MS, QUESTIONS_PER_GAME};
use crate::data::*;
use chrono::{DateTime, Utc};

/// Current phase of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    Start,
    CardSelection,
    Question,         // prompt visible, answers hidden
    Answers,          // answers visible, accepting picks
    Finished,
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GamePhase::Start => write!(f, "start"),
            GamePhase::CardSelection => write!(f, "card-selection"),
            GamePhase::Question => write!(f, "question"),
            GamePhase::Answers => write!(f, "answers"),
            GamePhase::Finished => write!(f, "finished"),
        }
    }
}

/// Something that happened to the game
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Start { questions: Vec<Question>, game_id: GameId },
    SelectCard { index: usize, at: DateTime<Utc> },
    RevealAnswers,
    SelectAnswer { index: usize, at: DateTime<Utc> },
    Tick { remaining: u32 },
    TimeUp,
    Advance { question_index: usize },
    Reset,
}

/// Work the controller performs after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartCountdown { seconds: u32 },
    StopCountdown,
    Notify { kind: NoticeKind, message: String },
    ScheduleAdvance { question_index: usize, delay_ms: i64 },
    CancelAdvance,
}

/// Result of applying one event
#[derive(Debug, Clone)]
pub struct Transition {
    pub state: GameState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: GameState) -> Self {
        Self { state, effects: Vec::new() }
    }
}

/// The whole state of one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub game_id: Option<GameId>,
    pub phase: GamePhase,
    pub current_question_index: usize,
    pub score: i32,
    pub wrong_attempts: u32,
    pub selected_card: Option<usize>,
    pub questions: Vec<Question>,
    pub question_started_at: Option<DateTime<Utc>>,
    pub time_left: u32,

    /// Breakdown of the current question once it is resolved and waiting
    /// for the deferred advance
    pub resolution: Option<ScoreBreakdown>,

    /// Most recent breakdown, kept for display until reset
    pub last_breakdown: Option<ScoreBreakdown>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            game_id: None,
            phase: GamePhase::Start,
            current_question_index: 0,
            score: 0,
            wrong_attempts: 0,
            selected_card: None,
            questions: Vec::new(),
            question_started_at: None,
            time_left: QUESTION_SECONDS,
            resolution: None,
            last_breakdown: None,
        }
    }

    /// Question being played; only meaningful in the question and answers
    /// phases
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question_index)
    }

    pub fn is_last_question(&self) -> bool {
        self.current_question_index + 1 >= self.questions.len()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Final score divided by the number of questions, rounded
    pub fn average_score(&self) -> i32 {
        if self.questions.is_empty() {
            return 0;
        }
        (self.score as f64 / self.questions.len() as f64).round() as i32
    }

    /// Apply one event
    pub fn apply(self, event: GameEvent) -> Transition {
        match (self.phase, event) {
            (_, GameEvent::Reset) => self.reset(),
            (GamePhase::Start, GameEvent::Start { questions, game_id }) => self.start(questions, game_id),
            (GamePhase::CardSelection, GameEvent::SelectCard { index, at }) => self.select_card(index, at),
            (GamePhase::Question, GameEvent::RevealAnswers) => self.reveal_answers(),
            (GamePhase::Question, GameEvent::TimeUp) => self.reveal_after_time_up(),
            (GamePhase::Answers, GameEvent::SelectAnswer { index, at }) => self.select_answer(index, at),
            (GamePhase::Answers, GameEvent::TimeUp) => self.time_up(),
            (GamePhase::Question | GamePhase::Answers, GameEvent::Tick { remaining }) => {
                Transition::unchanged(Self { time_left: remaining, ..self })
            }
            (GamePhase::Answers, GameEvent::Advance { question_index }) => self.advance(question_index),
            (phase, event) => {
                tracing::debug!(%phase, ?event, "ignoring event");
                Transition::unchanged(self)
            }
        }
    }

    fn reset(self) -> Transition {
        Transition {
            state: Self::new(),
            effects: vec![Effect::StopCountdown, Effect::CancelAdvance],
        }
    }

    fn start(self, questions: Vec<Question>, game_id: GameId) -> Transition {
        if questions.len() != QUESTIONS_PER_GAME {
            tracing::warn!(count = questions.len(), "refusing to start with wrong question count");
            return Transition::unchanged(self);
        }

        Transition::unchanged(Self {
            game_id: Some(game_id),
            phase: GamePhase::CardSelection,
            questions,
            ..Self::new()
        })
    }

    fn select_card(self, index: usize, at: DateTime<Utc>) -> Transition {
        if index >= CARD_COUNT {
            tracing::debug!(index, "no such card");
            return Transition::unchanged(self);
        }

        Transition {
            state: Self {
                phase: GamePhase::Question,
                selected_card: Some(index),
                question_started_at: Some(at),
                time_left: QUESTION_SECONDS,
                ..self
            },
            effects: vec![Effect::StartCountdown { seconds: QUESTION_SECONDS }],
        }
    }

    fn reveal_answers(self) -> Transition {
        Transition::unchanged(Self {
            phase: GamePhase::Answers,
            ..self
        })
    }

    /// The prompt ran out of time before the answers were shown. The answers
    /// get a fresh countdown, whose expiry scores the timeout.
    fn reveal_after_time_up(self) -> Transition {
        Transition {
            state: Self {
                phase: GamePhase::Answers,
                time_left: QUESTION_SECONDS,
                ..self
            },
            effects: vec![Effect::StartCountdown { seconds: QUESTION_SECONDS }],
        }
    }

    fn select_answer(self, index: usize, at: DateTime<Utc>) -> Transition {
        if self.is_resolved() {
            return Transition::unchanged(self);
        }
        let Some(question) = self.current_question() else {
            return Transition::unchanged(self);
        };
        if index >= question.answers.len() {
            return Transition::unchanged(self);
        }

        if question.is_correct(index) {
            let elapsed = self
                .question_started_at
                .map(|started| (at - started).num_seconds().max(0))
                .unwrap_or(0);
            let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
            let breakdown = calculate_score(true, self.wrong_attempts, elapsed);
            let question_index = self.current_question_index;

            Transition {
                state: Self {
                    resolution: Some(breakdown),
                    last_breakdown: Some(breakdown),
                    ..self
                },
                effects: vec![
                    Effect::StopCountdown,
                    Effect::Notify {
                        kind: NoticeKind::Correct,
                        message: format!("+{} points", breakdown.total),
                    },
                    Effect::ScheduleAdvance { question_index, delay_ms: FEEDBACK_DELAY_MS },
                ],
            }
        } else {
            Transition {
                state: Self {
                    wrong_attempts: self.wrong_attempts + 1,
                    ..self
                },
                effects: vec![Effect::Notify {
                    kind: NoticeKind::Incorrect,
                    message: "Try again!".to_string(),
                }],
            }
        }
    }

    fn time_up(self) -> Transition {
        if self.is_resolved() {
            return Transition::unchanged(self);
        }

        let breakdown = calculate_score(false, self.wrong_attempts, QUESTION_SECONDS);
        let question_index = self.current_question_index;

        Transition {
            state: Self {
                time_left: 0,
                resolution: Some(breakdown),
                last_breakdown: Some(breakdown),
                ..self
            },
            effects: vec![
                Effect::Notify {
                    kind: NoticeKind::Timeout,
                    message: format!("+{} points", breakdown.total),
                },
                Effect::ScheduleAdvance { question_index, delay_ms: FEEDBACK_DELAY_MS },
            ],
        }
    }

    fn advance(self, question_index: usize) -> Transition {
        let Some(breakdown) = self.resolution else {
            return Transition::unchanged(self);
        };
        if question_index != self.current_question_index {
            tracing::debug!(question_index, current = self.current_question_index, "stale advance");
            return Transition::unchanged(self);
        }

        let score = self.score + breakdown.total;

        let state = if self.is_last_question() {
            Self {
                phase: GamePhase::Finished,
                score,
                resolution: None,
                ..self
            }
        } else {
            Self {
                phase: GamePhase::CardSelection,
                score,
                current_question_index: self.current_question_index + 1,
                wrong_attempts: 0,
                selected_card: None,
                question_started_at: None,
                time_left: QUESTION_SECONDS,
                resolution: None,
                ..self
            }
        };

        Transition::unchanged(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn six_questions() -> Vec<Question> {
        (1..=6)
            .map(|id| Question::new(id, &format!("Q{id}?"), ["a", "b", "c", "d"], (id as usize) % 4))
            .collect()
    }

    fn started() -> GameState {
        GameState::new()
            .apply(GameEvent::Start { questions: six_questions(), game_id: GameId::new() })
            .state
    }

    fn in_answers() -> GameState {
        started()
            .apply(GameEvent::SelectCard { index: 1, at: t0() })
            .state
            .apply(GameEvent::RevealAnswers)
            .state
    }

    fn correct_index(state: &GameState) -> usize {
        state.current_question().unwrap().correct_answer
    }

    fn wrong_index(state: &GameState) -> usize {
        (correct_index(state) + 1) % 4
    }

    #[test]
    fn start_enters_card_selection() {
        let state = started();
        assert_eq!(state.phase, GamePhase::CardSelection);
        assert_eq!(state.questions.len(), 6);
        assert_eq!(state.current_question_index, 0);
        assert_eq!(state.score, 0);
        assert!(state.game_id.is_some());
    }

    #[test]
    fn start_with_wrong_count_is_ignored() {
        let mut questions = six_questions();
        questions.pop();
        let t = GameState::new().apply(GameEvent::Start { questions, game_id: GameId::new() });
        assert_eq!(t.state, GameState::new());
        assert!(t.effects.is_empty());
    }

    #[test]
    fn start_outside_start_phase_is_ignored() {
        let state = started();
        let t = state.clone().apply(GameEvent::Start { questions: six_questions(), game_id: GameId::new() });
        assert_eq!(t.state, state);
    }

    #[test]
    fn select_card_starts_countdown() {
        let t = started().apply(GameEvent::SelectCard { index: 2, at: t0() });
        assert_eq!(t.state.phase, GamePhase::Question);
        assert_eq!(t.state.selected_card, Some(2));
        assert_eq!(t.state.question_started_at, Some(t0()));
        assert_eq!(t.effects, vec![Effect::StartCountdown { seconds: 360 }]);
    }

    #[test]
    fn select_missing_card_is_ignored() {
        let state = started();
        let t = state.clone().apply(GameEvent::SelectCard { index: 3, at: t0() });
        assert_eq!(t.state, state);
    }

    #[test]
    fn select_card_outside_card_selection_is_ignored() {
        let state = in_answers();
        let t = state.clone().apply(GameEvent::SelectCard { index: 0, at: t0() });
        assert_eq!(t.state, state);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn time_up_during_question_reveals_answers_with_a_fresh_countdown() {
        let state = started().apply(GameEvent::SelectCard { index: 0, at: t0() }).state;
        let state = state.apply(GameEvent::Tick { remaining: 0 }).state;
        let t = state.apply(GameEvent::TimeUp);
        assert_eq!(t.state.phase, GamePhase::Answers);
        assert_eq!(t.state.resolution, None);
        assert_eq!(t.state.time_left, 360);
        assert_eq!(t.effects, vec![Effect::StartCountdown { seconds: 360 }]);

        let t = t.state.apply(GameEvent::TimeUp);
        assert_eq!(t.state.resolution, Some(ScoreBreakdown::new(5, 0, 0)));
    }

    #[test]
    fn select_answer_outside_answers_changes_nothing() {
        let state = started().apply(GameEvent::SelectCard { index: 0, at: t0() }).state;
        for index in 0..4 {
            let t = state.clone().apply(GameEvent::SelectAnswer { index, at: t0() });
            assert_eq!(t.state.score, state.score);
            assert_eq!(t.state.wrong_attempts, state.wrong_attempts);
            assert_eq!(t.state.phase, GamePhase::Question);
        }
    }

    #[test]
    fn wrong_answers_count_up_and_keep_phase() {
        let mut state = in_answers();
        let wrong = wrong_index(&state);
        for expected in 1..=5 {
            let t = state.apply(GameEvent::SelectAnswer { index: wrong, at: t0() });
            state = t.state;
            assert_eq!(state.wrong_attempts, expected);
            assert_eq!(state.phase, GamePhase::Answers);
            assert!(matches!(
                t.effects.as_slice(),
                [Effect::Notify { kind: NoticeKind::Incorrect, .. }]
            ));
        }
    }

    #[test]
    fn correct_answer_resolves_and_schedules_advance() {
        let state = in_answers();
        let correct = correct_index(&state);
        let t = state.apply(GameEvent::SelectAnswer { index: correct, at: t0() + Duration::seconds(3) });

        let expected = ScoreBreakdown::new(10, 10, 0);
        assert_eq!(t.state.phase, GamePhase::Answers);
        assert_eq!(t.state.resolution, Some(expected));
        assert_eq!(t.state.last_breakdown, Some(expected));
        assert_eq!(t.state.score, 0);
        assert_eq!(
            t.effects,
            vec![
                Effect::StopCountdown,
                Effect::Notify { kind: NoticeKind::Correct, message: "+20 points".to_string() },
                Effect::ScheduleAdvance { question_index: 0, delay_ms: 1500 },
            ]
        );
    }

    #[test]
    fn answers_after_resolution_are_ignored() {
        let state = in_answers();
        let correct = correct_index(&state);
        let wrong = wrong_index(&state);
        let resolved = state.apply(GameEvent::SelectAnswer { index: correct, at: t0() }).state;

        for index in [correct, wrong] {
            let t = resolved.clone().apply(GameEvent::SelectAnswer { index, at: t0() });
            assert_eq!(t.state, resolved);
            assert!(t.effects.is_empty());
        }
        let t = resolved.clone().apply(GameEvent::TimeUp);
        assert_eq!(t.state, resolved);
    }

    #[test]
    fn time_up_during_answers_scores_timeout() {
        let mut state = in_answers();
        let wrong = wrong_index(&state);
        state = state.apply(GameEvent::SelectAnswer { index: wrong, at: t0() }).state;

        let t = state.apply(GameEvent::TimeUp);
        assert_eq!(t.state.resolution, Some(ScoreBreakdown::new(5, 0, 0)));
        assert_eq!(t.state.time_left, 0);
        assert_eq!(
            t.effects,
            vec![
                Effect::Notify { kind: NoticeKind::Timeout, message: "+5 points".to_string() },
                Effect::ScheduleAdvance { question_index: 0, delay_ms: 1500 },
            ]
        );
    }

    #[test]
    fn advance_moves_to_next_card_selection() {
        let state = in_answers();
        let correct = correct_index(&state);
        let wrong = wrong_index(&state);
        let state = state
            .apply(GameEvent::SelectAnswer { index: wrong, at: t0() })
            .state
            .apply(GameEvent::SelectAnswer { index: correct, at: t0() + Duration::seconds(200) })
            .state;

        let next = state.apply(GameEvent::Advance { question_index: 0 }).state;
        assert_eq!(next.phase, GamePhase::CardSelection);
        assert_eq!(next.score, 7);
        assert_eq!(next.current_question_index, 1);
        assert_eq!(next.wrong_attempts, 0);
        assert_eq!(next.selected_card, None);
        assert_eq!(next.resolution, None);
        assert_eq!(next.last_breakdown, Some(ScoreBreakdown::new(8, 0, 1)));
        assert_eq!(next.time_left, 360);
    }

    #[test]
    fn advance_without_resolution_or_for_stale_question_is_ignored() {
        let state = in_answers();
        let t = state.clone().apply(GameEvent::Advance { question_index: 0 });
        assert_eq!(t.state, state);

        let correct = correct_index(&state);
        let resolved = state.apply(GameEvent::SelectAnswer { index: correct, at: t0() }).state;
        let t = resolved.clone().apply(GameEvent::Advance { question_index: 4 });
        assert_eq!(t.state, resolved);
    }

    #[test]
    fn last_question_finishes_with_summed_score() {
        let mut state = started();
        let mut expected = 0;
        for round in 0..6 {
            state = state
                .apply(GameEvent::SelectCard { index: round % 3, at: t0() })
                .state
                .apply(GameEvent::RevealAnswers)
                .state;
            state = if round % 2 == 0 {
                let correct = correct_index(&state);
                state.apply(GameEvent::SelectAnswer { index: correct, at: t0() }).state
            } else {
                state.apply(GameEvent::TimeUp).state
            };
            expected += state.resolution.unwrap().total;
            state = state.apply(GameEvent::Advance { question_index: round }).state;
        }

        assert_eq!(state.phase, GamePhase::Finished);
        assert_eq!(state.score, expected);
        assert_eq!(expected, 3 * 20 + 3 * 5);
        assert_eq!(state.average_score(), 13);
    }

    #[test]
    fn reset_from_anywhere_returns_to_start() {
        let t = in_answers().apply(GameEvent::Reset);
        assert_eq!(t.state, GameState::new());
        assert_eq!(t.effects, vec![Effect::StopCountdown, Effect::CancelAdvance]);
    }

    #[test]
    fn ticks_update_time_left_only_while_timed() {
        let state = started().apply(GameEvent::SelectCard { index: 0, at: t0() }).state;
        let t = state.apply(GameEvent::Tick { remaining: 200 });
        assert_eq!(t.state.time_left, 200);

        let card_selection = started();
        let t = card_selection.clone().apply(GameEvent::Tick { remaining: 5 });
        assert_eq!(t.state, card_selection);
    }
}
