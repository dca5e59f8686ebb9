// One-shot millisecond timers for note gates and step blinks

use std::time::{Duration, Instant};

/// One-shot countdown timer: restart it, then poll `finished`.
///
/// A timer that was never started reads as finished.
#[derive(Debug, Clone)]
pub struct PulseTimer {
    duration: Duration,
    started: Option<Instant>,
}

impl PulseTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started: None,
        }
    }

    /// Start (or re-start) the countdown from now.
    pub fn restart(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Stop without waiting for the countdown.
    pub fn cancel(&mut self) {
        self.started = None;
    }

    pub fn finished(&self) -> bool {
        match self.started {
            Some(at) => at.elapsed() >= self.duration,
            None => true,
        }
    }

    pub fn is_running(&self) -> bool {
        !self.finished()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Change the countdown length. An already-running countdown is
    /// measured against the new length.
    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstarted_timer_is_finished() {
        let timer = PulseTimer::new(Duration::from_millis(100));
        assert!(timer.finished());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_restart_begins_countdown() {
        let mut timer = PulseTimer::new(Duration::from_secs(60));
        timer.restart();
        assert!(timer.is_running());

        timer.cancel();
        assert!(timer.finished());
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut timer = PulseTimer::new(Duration::ZERO);
        timer.restart();
        assert!(timer.finished());
    }

    #[test]
    fn test_countdown_elapses() {
        let mut timer = PulseTimer::new(Duration::from_millis(10));
        timer.restart();
        std::thread::sleep(Duration::from_millis(20));
        assert!(timer.finished());
    }

    #[test]
    fn test_set_duration_applies_to_running_countdown() {
        let mut timer = PulseTimer::new(Duration::from_secs(60));
        timer.restart();
        assert!(timer.is_running());

        timer.set_duration(Duration::ZERO);
        assert!(timer.finished());
    }
}
