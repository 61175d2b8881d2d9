//! Countdown timer registry and per-timer state machine

use std::collections::HashMap;
use std::time::{Duration, Instant};

use thiserror::Error;

/// Errors produced by registry operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A live timer already uses this label; the registry is left unchanged
    #[error("a timer labeled '{0}' already exists")]
    DuplicateLabel(String),
    /// The referenced label is not in the registry
    #[error("no timer labeled '{0}'")]
    UnknownLabel(String),
}

/// One named countdown record.
///
/// While running, `remaining` is never authoritative: every observation
/// recomputes it from `duration - (now - started_at)`. Only a pause or
/// stop freezes it. Pausing also collapses `duration` down to the frozen
/// remaining time, so a later start re-arms `started_at` against the
/// remaining budget rather than the original total.
#[derive(Debug, Clone)]
pub struct TimerRecord {
    duration: Duration,
    remaining: Duration,
    running: bool,
    paused: bool,
    started_at: Option<Instant>,
    steps: Vec<String>,
}

impl TimerRecord {
    fn new(duration: Duration, steps: Vec<String>) -> Self {
        Self {
            duration,
            remaining: duration,
            running: false,
            paused: false,
            started_at: None,
            steps,
        }
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }
}

/// In-memory collection of named countdown records.
///
/// Owned by exactly one session; labels are unique within it. There is no
/// background clock: callers run [`TimerRegistry::tick`] whenever they
/// observe the registry, passing an explicit `now`.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: HashMap<String, TimerRecord>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new timer in the idle state.
    ///
    /// A duplicate label is rejected and leaves the registry unchanged.
    pub fn create(
        &mut self,
        label: &str,
        duration: Duration,
        steps: Vec<String>,
    ) -> Result<(), RegistryError> {
        if self.timers.contains_key(label) {
            return Err(RegistryError::DuplicateLabel(label.to_string()));
        }
        self.timers
            .insert(label.to_string(), TimerRecord::new(duration, steps));
        Ok(())
    }

    /// Start an idle timer, or resume a paused one.
    ///
    /// Resuming first collapses the reference duration to the frozen
    /// remaining time, then re-arms `started_at`, so elapsed-time math
    /// restarts from the remaining budget. Starting a timer that is
    /// already running is a no-op.
    pub fn start(&mut self, label: &str, now: Instant) -> Result<(), RegistryError> {
        let timer = self
            .timers
            .get_mut(label)
            .ok_or_else(|| RegistryError::UnknownLabel(label.to_string()))?;

        if timer.running {
            return Ok(());
        }
        if timer.paused {
            timer.duration = timer.remaining;
        }
        timer.started_at = Some(now);
        timer.running = true;
        timer.paused = false;
        Ok(())
    }

    /// Freeze a running timer's remaining time.
    ///
    /// Pausing a timer that is not running is a no-op.
    pub fn pause(&mut self, label: &str, now: Instant) -> Result<(), RegistryError> {
        let timer = self
            .timers
            .get_mut(label)
            .ok_or_else(|| RegistryError::UnknownLabel(label.to_string()))?;

        if !timer.running {
            return Ok(());
        }
        let started = timer.started_at.take().unwrap_or(now);
        timer.remaining = timer
            .duration
            .saturating_sub(now.saturating_duration_since(started));
        timer.duration = timer.remaining;
        timer.running = false;
        timer.paused = true;
        Ok(())
    }

    /// Remove a timer from any non-terminal state.
    ///
    /// Idempotent: an absent label is a no-op, and `false` is returned.
    pub fn stop(&mut self, label: &str) -> bool {
        self.timers.remove(label).is_some()
    }

    /// Recompute remaining time for every running timer and remove the
    /// ones that reached zero. Returns the expired labels so the caller
    /// can surface them.
    pub fn tick(&mut self, now: Instant) -> Vec<String> {
        let mut expired = Vec::new();
        for (label, timer) in self.timers.iter_mut() {
            if timer.running && !timer.paused {
                if let Some(started) = timer.started_at {
                    timer.remaining = timer
                        .duration
                        .saturating_sub(now.saturating_duration_since(started));
                    if timer.remaining.is_zero() {
                        expired.push(label.clone());
                    }
                }
            }
        }
        for label in &expired {
            self.timers.remove(label);
        }
        expired
    }

    pub fn get(&self, label: &str) -> Option<&TimerRecord> {
        self.timers.get(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TimerRecord)> {
        self.timers.iter()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_create_rejects_duplicate_label() {
        let mut reg = TimerRegistry::new();
        reg.create("Rice", secs(600), Vec::new()).unwrap();
        let err = reg.create("Rice", secs(30), Vec::new()).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateLabel("Rice".to_string()));
        // The original record is untouched
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("Rice").unwrap().remaining(), secs(600));
    }

    #[test]
    fn test_idle_timer_ignores_tick() {
        let mut reg = TimerRegistry::new();
        reg.create("Soup", secs(120), Vec::new()).unwrap();
        let t0 = Instant::now();
        assert!(reg.tick(t0 + secs(500)).is_empty());
        assert_eq!(reg.get("Soup").unwrap().remaining(), secs(120));
    }

    #[test]
    fn test_running_timer_counts_down() {
        let mut reg = TimerRegistry::new();
        reg.create("Rice", secs(600), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.start("Rice", t0).unwrap();
        reg.tick(t0 + secs(10));
        assert_eq!(reg.get("Rice").unwrap().remaining(), secs(590));
    }

    #[test]
    fn test_repeated_ticks_do_not_double_count() {
        let mut reg = TimerRegistry::new();
        reg.create("Rice", secs(600), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.start("Rice", t0).unwrap();
        // Several observations at the same instant all derive the same value
        for _ in 0..5 {
            reg.tick(t0 + secs(10));
        }
        assert_eq!(reg.get("Rice").unwrap().remaining(), secs(590));
    }

    #[test]
    fn test_pause_freezes_remaining() {
        let mut reg = TimerRegistry::new();
        reg.create("Rice", secs(600), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.start("Rice", t0).unwrap();
        reg.pause("Rice", t0 + secs(10)).unwrap();
        let timer = reg.get("Rice").unwrap();
        assert_eq!(timer.remaining(), secs(590));
        assert!(timer.is_paused());
        assert!(!timer.is_running());
        // Time passing while paused changes nothing
        reg.tick(t0 + secs(400));
        assert_eq!(reg.get("Rice").unwrap().remaining(), secs(590));
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let mut reg = TimerRegistry::new();
        reg.create("Stew", secs(600), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.start("Stew", t0).unwrap();
        reg.tick(t0 + secs(7));
        reg.pause("Stew", t0 + secs(10)).unwrap();
        // Long idle gap, then resume; the budget restarts from 590
        reg.start("Stew", t0 + secs(100)).unwrap();
        reg.tick(t0 + secs(110));
        assert_eq!(reg.get("Stew").unwrap().remaining(), secs(580));
    }

    #[test]
    fn test_start_while_running_is_noop() {
        let mut reg = TimerRegistry::new();
        reg.create("Eggs", secs(300), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.start("Eggs", t0).unwrap();
        // A second start must not re-arm the start timestamp
        reg.start("Eggs", t0 + secs(60)).unwrap();
        reg.tick(t0 + secs(100));
        assert_eq!(reg.get("Eggs").unwrap().remaining(), secs(200));
    }

    #[test]
    fn test_pause_while_idle_is_noop() {
        let mut reg = TimerRegistry::new();
        reg.create("Eggs", secs(300), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.pause("Eggs", t0).unwrap();
        let timer = reg.get("Eggs").unwrap();
        assert!(!timer.is_paused());
        assert_eq!(timer.remaining(), secs(300));
    }

    #[test]
    fn test_expiry_removes_timer_and_reports_label() {
        let mut reg = TimerRegistry::new();
        reg.create("Toast", secs(5), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.start("Toast", t0).unwrap();
        let expired = reg.tick(t0 + secs(6));
        assert_eq!(expired, vec!["Toast".to_string()]);
        assert!(reg.get("Toast").is_none());
        // Later passes report nothing
        assert!(reg.tick(t0 + secs(7)).is_empty());
    }

    #[test]
    fn test_expiry_at_exact_boundary() {
        let mut reg = TimerRegistry::new();
        reg.create("Toast", secs(5), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.start("Toast", t0).unwrap();
        let expired = reg.tick(t0 + secs(5));
        assert_eq!(expired, vec!["Toast".to_string()]);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut reg = TimerRegistry::new();
        reg.create("Rice", secs(600), Vec::new()).unwrap();
        assert!(reg.stop("Rice"));
        assert!(!reg.stop("Rice"));
        assert!(reg.is_empty());
    }

    #[test]
    fn test_operations_on_unknown_label() {
        let mut reg = TimerRegistry::new();
        let now = Instant::now();
        assert_eq!(
            reg.start("Ghost", now).unwrap_err(),
            RegistryError::UnknownLabel("Ghost".to_string())
        );
        assert_eq!(
            reg.pause("Ghost", now).unwrap_err(),
            RegistryError::UnknownLabel("Ghost".to_string())
        );
    }

    #[test]
    fn test_rice_scenario() {
        let mut reg = TimerRegistry::new();
        reg.create("Rice", secs(600), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.start("Rice", t0).unwrap();
        reg.tick(t0 + secs(10));
        assert_eq!(reg.get("Rice").unwrap().remaining(), secs(590));
        reg.pause("Rice", t0 + secs(10)).unwrap();
        assert_eq!(reg.get("Rice").unwrap().remaining(), secs(590));
        assert!(reg.stop("Rice"));
        assert_eq!(
            reg.start("Rice", t0 + secs(20)).unwrap_err(),
            RegistryError::UnknownLabel("Rice".to_string())
        );
    }

    #[test]
    fn test_independent_timers() {
        let mut reg = TimerRegistry::new();
        reg.create("Rice", secs(600), Vec::new()).unwrap();
        reg.create("Toast", secs(5), Vec::new()).unwrap();
        let t0 = Instant::now();
        reg.start("Rice", t0).unwrap();
        reg.start("Toast", t0).unwrap();
        let expired = reg.tick(t0 + secs(10));
        assert_eq!(expired, vec!["Toast".to_string()]);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("Rice").unwrap().remaining(), secs(590));
    }
}
