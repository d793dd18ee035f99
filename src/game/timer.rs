//! Question countdown
//!
//! The countdown is polled from the main loop rather than running on its
//! own thread. Each `start` hands out a fresh [`TimerToken`]; a stopped or
//! superseded countdown never emits again, and callers can drop any event
//! whose token is not the current one.

use chrono::{DateTime, Utc};

/// Identity of one started countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Something the countdown reports when polled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// One second elapsed
    Tick { token: TimerToken, remaining: u32 },
    /// Reached zero; emitted once, after which the countdown is idle
    Expired { token: TimerToken },
}

#[derive(Debug, Clone)]
struct Running {
    token: TimerToken,
    duration: u32,
    remaining: u32,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct Countdown {
    generation: u64,
    running: Option<Running>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down from `seconds`, replacing any running countdown
    pub fn start(&mut self, seconds: u32, now: DateTime<Utc>) -> TimerToken {
        self.generation += 1;
        let token = TimerToken(self.generation);
        self.running = Some(Running {
            token,
            duration: seconds,
            remaining: seconds,
            started_at: now,
        });
        token
    }

    pub fn stop(&mut self) {
        self.running = None;
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    pub fn remaining(&self) -> Option<u32> {
        self.running.as_ref().map(|r| r.remaining)
    }

    /// Emit one tick per whole second elapsed since the last poll, then the
    /// expiry once the count reaches zero
    pub fn poll(&mut self, now: DateTime<Utc>) -> Vec<TimerEvent> {
        let Some(running) = self.running.as_mut() else {
            return Vec::new();
        };

        let elapsed = (now - running.started_at).num_seconds().max(0);
        let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
        let target = running.duration.saturating_sub(elapsed);

        let mut events = Vec::new();
        while running.remaining > target {
            running.remaining -= 1;
            events.push(TimerEvent::Tick {
                token: running.token,
                remaining: running.remaining,
            });
        }

        if running.remaining == 0 {
            events.push(TimerEvent::Expired { token: running.token });
            self.running = None;
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn ticks_once_per_second() {
        let mut c = Countdown::new();
        let token = c.start(3, t0());

        assert!(c.poll(t0() + Duration::milliseconds(900)).is_empty());
        assert_eq!(
            c.poll(t0() + Duration::seconds(1)),
            vec![TimerEvent::Tick { token, remaining: 2 }]
        );
        assert_eq!(c.remaining(), Some(2));
    }

    #[test]
    fn late_poll_catches_up_and_expires_once() {
        let mut c = Countdown::new();
        let token = c.start(2, t0());

        let events = c.poll(t0() + Duration::seconds(10));
        assert_eq!(
            events,
            vec![
                TimerEvent::Tick { token, remaining: 1 },
                TimerEvent::Tick { token, remaining: 0 },
                TimerEvent::Expired { token },
            ]
        );
        assert!(!c.is_running());
        assert!(c.poll(t0() + Duration::seconds(11)).is_empty());
    }

    #[test]
    fn superseded_countdown_never_fires() {
        let mut c = Countdown::new();
        let first = c.start(1, t0());
        let second = c.start(5, t0() + Duration::milliseconds(500));
        assert_ne!(first, second);

        let events = c.poll(t0() + Duration::seconds(2));
        assert!(events.iter().all(|e| match e {
            TimerEvent::Tick { token, .. } | TimerEvent::Expired { token } => *token == second,
        }));
        assert!(!events.iter().any(|e| matches!(e, TimerEvent::Expired { .. })));
    }

    #[test]
    fn stopped_countdown_is_silent() {
        let mut c = Countdown::new();
        c.start(1, t0());
        c.stop();
        assert!(c.poll(t0() + Duration::seconds(5)).is_empty());
        assert!(!c.is_running());
        assert_eq!(c.remaining(), None);
    }

    #[test]
    fn zero_duration_expires_on_first_poll() {
        let mut c = Countdown::new();
        let token = c.start(0, t0());
        assert_eq!(c.poll(t0()), vec![TimerEvent::Expired { token }]);
    }
}
