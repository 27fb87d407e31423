//! Throttled preview re-rendering
//!
//! Every edit marks the preview stale. Rendering happens once the buffer has
//! been quiet for the configured delay, so a burst of keystrokes costs one
//! render instead of one per key.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct PreviewScheduler {
    delay: Duration,
    last_change: Option<Instant>,
}

impl PreviewScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_change: None,
        }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Record an edit at `now`; restarts the quiet period.
    pub fn mark_changed(&mut self, now: Instant) {
        self.last_change = Some(now);
    }

    #[allow(dead_code)]
    pub fn is_stale(&self) -> bool {
        self.last_change.is_some()
    }

    /// True once the quiet period has elapsed. Consumes the pending render.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.last_change {
            Some(changed) if now.saturating_duration_since(changed) >= self.delay => {
                self.last_change = None;
                true
            }
            _ => false,
        }
    }

    /// Time left before a pending render becomes due, for repaint scheduling.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_change
            .map(|changed| self.delay.saturating_sub(now.saturating_duration_since(changed)))
    }
}

impl Default for PreviewScheduler {
    fn default() -> Self {
        Self::from_millis(300)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_without_changes() {
        let mut scheduler = PreviewScheduler::default();
        assert!(!scheduler.is_stale());
        assert!(!scheduler.take_due(Instant::now()));
        assert_eq!(scheduler.remaining(Instant::now()), None);
    }

    #[test]
    fn test_due_after_quiet_period() {
        let mut scheduler = PreviewScheduler::from_millis(300);
        let t0 = Instant::now();
        scheduler.mark_changed(t0);

        assert!(!scheduler.take_due(t0 + Duration::from_millis(100)));
        assert_eq!(
            scheduler.remaining(t0 + Duration::from_millis(100)),
            Some(Duration::from_millis(200))
        );
        assert!(scheduler.take_due(t0 + Duration::from_millis(300)));
        // consumed
        assert!(!scheduler.take_due(t0 + Duration::from_millis(400)));
    }

    #[test]
    fn test_burst_of_edits_renders_once() {
        let mut scheduler = PreviewScheduler::from_millis(300);
        let t0 = Instant::now();
        let mut renders = 0;
        for step in 0..10u64 {
            let now = t0 + Duration::from_millis(step * 100);
            scheduler.mark_changed(now);
            if scheduler.take_due(now) {
                renders += 1;
            }
        }
        assert_eq!(renders, 0);
        assert!(scheduler.take_due(t0 + Duration::from_millis(1300)));
    }

    #[test]
    fn test_zero_delay_is_immediate() {
        let mut scheduler = PreviewScheduler::from_millis(0);
        let now = Instant::now();
        scheduler.mark_changed(now);
        assert!(scheduler.take_due(now));
    }
}
