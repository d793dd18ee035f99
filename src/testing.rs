//! Deterministic stand-ins for driving a [`Game`](crate::Game) from tests.
//! Nothing in the binary uses these.

use crate::data::NoticeKind;
use crate::game::{Clock, Notifier};
use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use std::rc::Rc;

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Rc::new(Cell::new(start)) }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.now.set(to);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Keeps every notice it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pub notices: Vec<(NoticeKind, String)>,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, kind: NoticeKind, message: &str) {
        self.notices.push((kind, message.to_string()));
    }
}
