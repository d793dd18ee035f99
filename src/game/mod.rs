//! Core game logic and state management

pub mod scoring;
pub mod state;
pub mod timer;

pub use scoring::calculate_score;
pub use state::{Effect, GameEvent, GamePhase, GameState, Transition};
pub use timer::{Countdown, TimerEvent, TimerToken};

use crate::data::*;
use crate::QuizError;
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Questions drawn for every game
pub const QUESTIONS_PER_GAME: usize = 6;

/// Face-down cards offered before each question
pub const CARD_COUNT: usize = 3;

/// Pause between resolving a question and moving on
pub const FEEDBACK_DELAY_MS: i64 = 1500;

/// Source of wall-clock time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Receives player feedback; nothing it does feeds back into the game
pub trait Notifier {
    fn notify(&mut self, kind: NoticeKind, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&mut self, _kind: NoticeKind, _message: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingAdvance {
    due: DateTime<Utc>,
    question_index: usize,
}

/// The game controller
///
/// Owns the state and runs the effects each transition asks for. Driven by
/// the action methods and by [`Game::tick`], which the main loop calls on
/// every iteration.
pub struct Game<N: Notifier = NullNotifier> {
    state: GameState,
    countdown: Countdown,
    active_timer: Option<TimerToken>,
    pending_advance: Option<PendingAdvance>,
    source: Box<dyn QuestionSource>,
    rng: StdRng,
    clock: Box<dyn Clock>,
    notifier: N,
}

impl<N: Notifier> Game<N> {
    pub fn new(source: impl QuestionSource + 'static, notifier: N) -> Self {
        Self {
            state: GameState::new(),
            countdown: Countdown::new(),
            active_timer: None,
            pending_advance: None,
            source: Box::new(source),
            rng: StdRng::from_entropy(),
            clock: Box::new(SystemClock),
            notifier,
        }
    }

    /// Use a seeded random source so question draws are reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn last_breakdown(&self) -> Option<&ScoreBreakdown> {
        self.state.last_breakdown.as_ref()
    }

    /// Seconds on the running countdown, or the last count shown once it
    /// has stopped
    pub fn time_left(&self) -> u32 {
        self.countdown.remaining().unwrap_or(self.state.time_left)
    }

    /// True while a resolved question waits for the deferred advance
    pub fn is_advance_pending(&self) -> bool {
        self.pending_advance.is_some()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Draw a fresh set of questions and move to card selection.
    /// Does nothing outside the start phase.
    pub fn start_game(&mut self) -> std::result::Result<(), QuizError> {
        if self.state.phase != GamePhase::Start {
            debug!(phase = %self.state.phase, "start ignored");
            return Ok(());
        }

        let questions = sample_questions(self.source.as_ref(), QUESTIONS_PER_GAME, &mut self.rng)?;
        let game_id = GameId::new();
        info!(%game_id, ids = ?questions.iter().map(|q| q.id).collect::<Vec<_>>(), "game started");
        self.dispatch(GameEvent::Start { questions, game_id });
        Ok(())
    }

    pub fn select_card(&mut self, index: usize) {
        self.tick();
        let at = self.clock.now();
        self.dispatch(GameEvent::SelectCard { index, at });
    }

    pub fn reveal_answers(&mut self) {
        self.tick();
        self.dispatch(GameEvent::RevealAnswers);
    }

    /// Answer the current question. An expiry that is already due is
    /// handled first, so late answers count as timeouts.
    pub fn select_answer(&mut self, index: usize) {
        self.tick();
        let at = self.clock.now();
        self.dispatch(GameEvent::SelectAnswer { index, at });
    }

    pub fn reset_game(&mut self) {
        self.dispatch(GameEvent::Reset);
    }

    /// Advance the countdown and fire the deferred advance when due
    pub fn tick(&mut self) {
        let now = self.clock.now();

        for event in self.countdown.poll(now) {
            self.handle_timer_event(event);
        }

        if let Some(pending) = self.pending_advance {
            if pending.due <= now {
                self.pending_advance = None;
                self.dispatch(GameEvent::Advance { question_index: pending.question_index });
            }
        }
    }

    fn handle_timer_event(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Tick { token, remaining } if Some(token) == self.active_timer => {
                self.dispatch(GameEvent::Tick { remaining });
            }
            TimerEvent::Expired { token } if Some(token) == self.active_timer => {
                self.active_timer = None;
                info!(question = self.state.current_question_index, "time is up");
                self.dispatch(GameEvent::TimeUp);
            }
            stale => debug!(?stale, "dropping event from superseded countdown"),
        }
    }

    fn dispatch(&mut self, event: GameEvent) {
        let before = self.state.phase;
        let Transition { state, effects } = std::mem::take(&mut self.state).apply(event);
        self.state = state;

        if self.state.phase != before {
            info!(
                game_id = ?self.state.game_id,
                from = %before,
                to = %self.state.phase,
                question = self.state.current_question_index,
                score = self.state.score,
                "phase change"
            );
        }

        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        let now = self.clock.now();
        match effect {
            Effect::StartCountdown { seconds } => {
                self.active_timer = Some(self.countdown.start(seconds, now));
            }
            Effect::StopCountdown => {
                self.countdown.stop();
                self.active_timer = None;
            }
            Effect::Notify { kind, message } => {
                debug!(%kind, %message, "notify");
                self.notifier.notify(kind, &message);
            }
            Effect::ScheduleAdvance { question_index, delay_ms } => {
                self.pending_advance = Some(PendingAdvance {
                    due: now + Duration::milliseconds(delay_ms),
                    question_index,
                });
            }
            Effect::CancelAdvance => {
                self.pending_advance = None;
            }
        }
    }
}
