use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Stops a `LoopTimer` from whoever holds a clone of it.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One-shot countdown re-armed after every firing. At most one delay is
/// pending at a time; it is driven by the elapsed time of the render loop.
#[derive(Debug, Default)]
pub struct LoopTimer {
    armed: Option<Duration>,
    remaining: Duration,
    cancel: CancelHandle,
}

impl LoopTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any pending delay.
    pub fn arm(&mut self, delay: Duration) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.armed = Some(delay);
        self.remaining = delay;
    }

    pub fn disarm(&mut self) {
        self.armed = None;
        self.remaining = Duration::ZERO;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.armed.is_some()
    }

    /// The delay the pending countdown was armed with.
    #[cfg(test)]
    pub fn pending_delay(&self) -> Option<Duration> {
        self.armed
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Returns true exactly once per `arm`, when the countdown runs out.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.cancel.is_cancelled() {
            self.disarm();
            return false;
        }
        if self.armed.is_none() {
            return false;
        }

        self.remaining = self.remaining.saturating_sub(dt);
        if self.remaining.is_zero() {
            self.disarm();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn fires_once_when_delay_elapses() {
        let mut timer = LoopTimer::new();
        timer.arm(ms(120));

        assert!(!timer.tick(ms(100)));
        assert!(timer.tick(ms(20)));
        assert!(!timer.is_pending());
        assert!(!timer.tick(ms(500)));
    }

    #[test]
    fn late_tick_fires_without_carrying_over() {
        let mut timer = LoopTimer::new();
        timer.arm(ms(120));
        assert!(timer.tick(ms(400)));

        timer.arm(ms(120));
        assert!(!timer.tick(ms(119)));
        assert!(timer.tick(ms(1)));
    }

    #[test]
    fn rearming_replaces_pending_delay() {
        let mut timer = LoopTimer::new();
        timer.arm(ms(1000));
        timer.arm(ms(120));

        assert_eq!(timer.pending_delay(), Some(ms(120)));
        assert!(timer.tick(ms(120)));
    }

    #[test]
    fn unarmed_timer_never_fires() {
        let mut timer = LoopTimer::new();
        assert!(!timer.tick(ms(10_000)));
    }

    #[test]
    fn cancel_handle_stops_pending_and_future_delays() {
        let mut timer = LoopTimer::new();
        let handle = timer.cancel_handle();
        timer.arm(ms(120));

        handle.cancel();
        assert!(!timer.tick(ms(120)));
        assert!(!timer.is_pending());

        timer.arm(ms(120));
        assert!(!timer.is_pending());
        assert!(!timer.tick(ms(120)));
    }
}
