use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use crate::time::duration::Duration;
use crate::time::time::Time;

/// Clock handed to whoever needs "now". Callers hold the source they were
/// given; there is no process-wide current clock.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Time;

    /// A clock reading of zero means the clock has not started yet.
    fn is_valid(&self) -> bool {
        !self.now().is_zero()
    }

    fn is_sim_time(&self) -> bool {
        false
    }
}

// ─────────────────────────────────────────────
// Wall clock
// ─────────────────────────────────────────────

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Time {
        Time::from_datetime(&Utc::now())
    }
}

// ─────────────────────────────────────────────
// Simulated clock
// ─────────────────────────────────────────────

/// Clock driven explicitly through `set_now`/`advance`, e.g. from recorded
/// sensor stamps. Reads zero (invalid) until `init` and after `shutdown`.
#[derive(Debug, Default)]
pub struct SimulatedTimeSource {
    state: RwLock<Option<Time>>
}

impl SimulatedTimeSource {
    pub fn new() -> SimulatedTimeSource {
        SimulatedTimeSource { state: RwLock::new(None) }
    }

    pub fn init(&self) {
        let mut state = self.write();
        if state.is_none() {
            *state = Some(Time::ZERO);
        }
    }

    pub fn shutdown(&self) {
        *self.write() = None;
    }

    /// Ignored while the clock is shut down.
    pub fn set_now(&self, now: Time) {
        let mut state = self.write();
        if let Some(current) = state.as_mut() {
            *current = now;
        }
    }

    pub fn advance(&self, step: Duration) {
        let mut state = self.write();
        if let Some(current) = state.as_mut() {
            *current += step;
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Time>> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Time>> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> Time {
        (*self.read()).unwrap_or(Time::ZERO)
    }

    fn is_sim_time(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn simulated_clock_follows_init_and_shutdown() {
        let clock = SimulatedTimeSource::new();
        clock.set_now(Time::new(5, 0));
        assert_eq!(clock.now(), Time::ZERO);

        clock.init();
        assert!(!clock.is_valid());
        clock.set_now(Time::new(5, 0));
        clock.advance(Duration::from_sec(0.5));
        assert_eq!(clock.now(), Time::new(5, 500_000_000));
        assert!(clock.is_valid());

        clock.shutdown();
        assert!(!clock.is_valid());
    }

    #[test]
    fn sources_are_injectable_behind_trait_objects() {
        let simulated = Arc::new(SimulatedTimeSource::new());
        simulated.init();
        simulated.set_now(Time::new(42, 0));

        let simulated_source: Arc<dyn TimeSource> = simulated.clone();
        let system_source: Arc<dyn TimeSource> = Arc::new(SystemTimeSource);
        let sources = [simulated_source, system_source];
        assert!(sources[0].is_sim_time());
        assert_eq!(sources[0].now(), Time::new(42, 0));
        assert!(!sources[1].is_sim_time());
        assert!(sources[1].is_valid());
    }
}
