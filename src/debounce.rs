//! Trailing-edge debounce for search input
//!
//! The pending timer lives in a field of the owner, so cancellation always
//! reaches the latest timer no matter how often the screen is redrawn.
//! Time is passed in by the caller, which keeps the logic deterministic.

use std::time::{Duration, Instant};

/// Identifies one scheduled lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone)]
struct PendingLookup {
    id: TimerId,
    query: String,
    deadline: Instant,
}

/// Delays a lookup until input has been quiet for `delay`.
///
/// There is no maximum wait: a steady stream of input faster than the delay
/// postpones the lookup indefinitely.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<PendingLookup>,
    next_id: u64,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            next_id: 0,
        }
    }

    /// Schedule a lookup for `query`, replacing any pending one.
    pub fn schedule(&mut self, query: String, now: Instant) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending = Some(PendingLookup {
            id,
            query,
            deadline: now + self.delay,
        });
        id
    }

    /// Drop the pending lookup, returning its id if there was one
    pub fn cancel(&mut self) -> Option<TimerId> {
        self.pending.take().map(|p| p.id)
    }

    /// Take the pending query once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some(p) if now >= p.deadline => self.pending.take().map(|p| p.query),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_id(&self) -> Option<TimerId> {
        self.pending.as_ref().map(|p| p.id)
    }

    /// Remaining time until the pending lookup is due
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.deadline.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(100);

    #[test]
    fn test_fires_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.schedule("dai".to_string(), t0);

        assert_eq!(d.poll(t0 + Duration::from_millis(99)), None);
        assert_eq!(d.poll(t0 + DELAY), Some("dai".to_string()));
        // fires once
        assert_eq!(d.poll(t0 + DELAY * 2), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn test_new_schedule_cancels_previous() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        let first = d.schedule("d".to_string(), t0);
        let second = d.schedule("da".to_string(), t0 + Duration::from_millis(60));
        assert!(second > first);
        assert_eq!(d.pending_id(), Some(second));

        // The first deadline passes without firing.
        assert_eq!(d.poll(t0 + DELAY), None);
        assert_eq!(
            d.poll(t0 + Duration::from_millis(160)),
            Some("da".to_string())
        );
    }

    #[test]
    fn test_burst_postpones_indefinitely() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        let mut now = t0;
        for i in 0..50 {
            d.schedule(format!("q{}", i), now);
            now += Duration::from_millis(50);
            assert_eq!(d.poll(now), None);
        }
        assert_eq!(d.poll(now + DELAY), Some("q49".to_string()));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        assert_eq!(d.cancel(), None);
        let id = d.schedule("x".to_string(), t0);
        assert_eq!(d.cancel(), Some(id));
        assert_eq!(d.poll(t0 + DELAY), None);
    }

    #[test]
    fn test_time_until_ready() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(DELAY);
        assert_eq!(d.time_until_ready(t0), None);

        d.schedule("x".to_string(), t0);
        assert_eq!(
            d.time_until_ready(t0 + Duration::from_millis(30)),
            Some(Duration::from_millis(70))
        );
        assert_eq!(d.time_until_ready(t0 + DELAY * 3), Some(Duration::ZERO));
    }
}
