//! Short-lived feedback messages shown over the table

use crate::data::NoticeKind;
use crate::game::Notifier;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const TOAST_TTL: Duration = Duration::from_millis(2500);
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: NoticeKind,
    pub message: String,
    pub shown_at: Instant,
}

/// Notifier that keeps the latest few notices until they expire
#[derive(Debug, Clone)]
pub struct ToastQueue {
    toasts: VecDeque<Toast>,
    ttl: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            ttl,
        }
    }

    /// Drop toasts older than the time-to-live
    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.toasts.retain(|t| now.duration_since(t.shown_at) < ttl);
    }

    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }
}

impl Notifier for ToastQueue {
    fn notify(&mut self, kind: NoticeKind, message: &str) {
        self.toasts.push_back(Toast {
            kind,
            message: message.to_string(),
            shown_at: Instant::now(),
        });
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_only_latest_toasts() {
        let mut q = ToastQueue::default();
        for i in 0..5 {
            q.notify(NoticeKind::Incorrect, &format!("try {i}"));
        }
        let messages: Vec<_> = q.visible().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, vec!["try 2", "try 3", "try 4"]);
    }

    #[test]
    fn prune_drops_expired() {
        let mut q = ToastQueue::new(Duration::from_millis(10));
        q.notify(NoticeKind::Correct, "+20 points");
        q.prune(Instant::now() + Duration::from_millis(20));
        assert!(q.is_empty());
    }

    #[test]
    fn prune_keeps_fresh() {
        let mut q = ToastQueue::new(Duration::from_secs(60));
        q.notify(NoticeKind::Timeout, "+5 points");
        q.prune(Instant::now());
        assert_eq!(q.visible().count(), 1);
    }
}
