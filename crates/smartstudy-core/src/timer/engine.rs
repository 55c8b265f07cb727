//! Pomodoro count-down engine.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads; the caller is responsible for calling `tick()` periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!           |
//!           v
//!       Completed -> Running (restarts the same mode)
//! ```
//!
//! Besides the count-down the engine carries the selected task and the
//! auto-sync flag, so one serialized value is enough to restore a session.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::{ModeDurations, PomodoroMode};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    #[serde(default)]
    durations: ModeDurations,
    mode: PomodoroMode,
    state: TimerState,
    /// Remaining time in milliseconds for the current mode.
    remaining_ms: u64,
    /// Timestamp (ms since epoch) when the timer was last started or flushed.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
    #[serde(default)]
    selected_task_id: Option<String>,
    #[serde(default = "default_auto_sync")]
    auto_sync: bool,
}

fn default_auto_sync() -> bool {
    true
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(ModeDurations::default(), true)
    }
}

impl TimerEngine {
    /// Idle in focus mode with a full count-down.
    pub fn new(durations: ModeDurations, auto_sync: bool) -> Self {
        Self {
            durations,
            mode: PomodoroMode::Focus,
            state: TimerState::Idle,
            remaining_ms: durations.ms(PomodoroMode::Focus),
            last_tick_epoch_ms: None,
            selected_task_id: None,
            auto_sync,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn total_ms(&self) -> u64 {
        self.durations.ms(self.mode)
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn selected_task_id(&self) -> Option<&str> {
        self.selected_task_id.as_deref()
    }

    pub fn auto_sync(&self) -> bool {
        self.auto_sync
    }

    pub fn durations(&self) -> ModeDurations {
        self.durations
    }

    /// 0.0 .. 100.0 progress within the current mode.
    pub fn progress_pct(&self) -> f64 {
        let total = self.total_ms();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.remaining_ms as f64 / total as f64) * 100.0
    }

    /// Remaining time as `MM:SS`.
    pub fn display(&self) -> String {
        let secs = self.remaining_ms.div_ceil(1000);
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            mode: self.mode,
            remaining_ms: self.remaining_ms,
            total_ms: self.total_ms(),
            progress_pct: self.progress_pct(),
            display: self.display(),
            selected_task_id: self.selected_task_id.clone(),
            auto_sync: self.auto_sync,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    pub fn pause(&mut self) -> Option<Event> {
        self.pause_at(now_ms())
    }

    /// Start when stopped, pause when running.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Stop and restore the current mode's full length.
    pub fn reset(&mut self) -> Option<Event> {
        self.stop_and_refill();
        Some(Event::TimerReset {
            mode: self.mode,
            at: Utc::now(),
        })
    }

    /// Manual mode switch. Turns auto-sync off.
    pub fn set_mode(&mut self, mode: PomodoroMode) -> Option<Event> {
        self.auto_sync = false;
        self.change_mode(mode)
    }

    pub fn set_auto_sync(&mut self, enabled: bool) {
        self.auto_sync = enabled;
    }

    /// Replace mode lengths, e.g. after a config change.
    pub fn set_durations(&mut self, durations: ModeDurations) {
        self.durations = durations;
        if !self.is_running() {
            self.remaining_ms = self.remaining_ms.min(durations.ms(self.mode));
        }
    }

    /// Call periodically. Returns `Some(Event::TimerCompleted)` when the
    /// count-down reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    // ── Crate-internal ───────────────────────────────────────────────

    /// Switch mode, stopping the count-down. Leaves auto-sync untouched.
    pub(crate) fn change_mode(&mut self, mode: PomodoroMode) -> Option<Event> {
        let from = self.mode;
        self.mode = mode;
        self.stop_and_refill();
        Some(Event::ModeChanged {
            from,
            to: mode,
            at: Utc::now(),
        })
    }

    pub(crate) fn select_task(&mut self, id: Option<String>) {
        self.selected_task_id = id;
    }

    fn start_at(&mut self, now: u64) -> Option<Event> {
        match self.state {
            TimerState::Running => None,
            TimerState::Idle | TimerState::Paused | TimerState::Completed => {
                if self.state == TimerState::Completed || self.remaining_ms == 0 {
                    self.remaining_ms = self.total_ms();
                }
                self.state = TimerState::Running;
                self.last_tick_epoch_ms = Some(now);
                tracing::debug!(mode = ?self.mode, remaining_ms = self.remaining_ms, "timer started");
                Some(Event::TimerStarted {
                    mode: self.mode,
                    remaining_ms: self.remaining_ms,
                    at: Utc::now(),
                })
            }
        }
    }

    fn pause_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        self.state = TimerState::Paused;
        self.last_tick_epoch_ms = None;
        Some(Event::TimerPaused {
            remaining_ms: self.remaining_ms,
            at: Utc::now(),
        })
    }

    fn tick_at(&mut self, now: u64) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.flush_elapsed(now);
        if self.remaining_ms > 0 {
            return None;
        }
        self.state = TimerState::Completed;
        self.last_tick_epoch_ms = None;
        tracing::info!(mode = ?self.mode, task = ?self.selected_task_id, "timer completed");
        Some(Event::TimerCompleted {
            mode: self.mode,
            selected_task_id: self.selected_task_id.clone(),
            at: Utc::now(),
        })
    }

    fn stop_and_refill(&mut self) {
        self.state = TimerState::Idle;
        self.last_tick_epoch_ms = None;
        self.remaining_ms = self.total_ms();
    }

    fn flush_elapsed(&mut self, now: u64) {
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed = now.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now);
        }
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: u64 = 60_000;

    #[test]
    fn starts_idle_in_focus() {
        let engine = TimerEngine::default();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.mode(), PomodoroMode::Focus);
        assert_eq!(engine.remaining_ms(), 25 * MIN);
        assert_eq!(engine.display(), "25:00");
        assert!(engine.auto_sync());
    }

    #[test]
    fn start_pause_resume_keeps_remaining() {
        let mut engine = TimerEngine::default();
        assert!(engine.start_at(1_000).is_some());
        assert!(engine.start_at(2_000).is_none());
        assert_eq!(engine.state(), TimerState::Running);

        let paused = engine.pause_at(1_000 + 2 * MIN);
        assert!(matches!(paused, Some(Event::TimerPaused { remaining_ms, .. }) if remaining_ms == 23 * MIN));
        assert_eq!(engine.state(), TimerState::Paused);

        // Time spent paused does not count.
        engine.start_at(10 * MIN);
        engine.pause_at(11 * MIN);
        assert_eq!(engine.remaining_ms(), 22 * MIN);
    }

    #[test]
    fn tick_completes_at_zero() {
        let mut engine = TimerEngine::default();
        engine.change_mode(PomodoroMode::ShortBreak);
        engine.start_at(0);
        assert!(engine.tick_at(4 * MIN).is_none());
        let done = engine.tick_at(5 * MIN + 10);
        assert!(matches!(
            done,
            Some(Event::TimerCompleted { mode: PomodoroMode::ShortBreak, .. })
        ));
        assert_eq!(engine.state(), TimerState::Completed);
        assert_eq!(engine.remaining_ms(), 0);
        assert!(engine.tick_at(6 * MIN).is_none());

        // Starting again refills the same mode.
        engine.start_at(7 * MIN);
        assert_eq!(engine.remaining_ms(), 5 * MIN);
    }

    #[test]
    fn reset_restores_full_length() {
        let mut engine = TimerEngine::default();
        engine.start_at(0);
        engine.pause_at(3 * MIN);
        engine.reset();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_ms(), 25 * MIN);
    }

    #[test]
    fn change_mode_stops_and_refills() {
        let mut engine = TimerEngine::default();
        engine.start_at(0);
        engine.change_mode(PomodoroMode::LongBreak);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_ms(), 15 * MIN);
        assert!(engine.auto_sync());
    }

    #[test]
    fn manual_mode_disables_auto_sync() {
        let mut engine = TimerEngine::default();
        engine.set_mode(PomodoroMode::ShortBreak);
        assert!(!engine.auto_sync());
        assert_eq!(engine.mode(), PomodoroMode::ShortBreak);
    }

    #[test]
    fn toggle_alternates() {
        let mut engine = TimerEngine::default();
        assert!(matches!(engine.toggle(), Some(Event::TimerStarted { .. })));
        assert!(matches!(engine.toggle(), Some(Event::TimerPaused { .. })));
    }

    #[test]
    fn state_survives_serialization() {
        let mut engine = TimerEngine::new(
            ModeDurations {
                focus_min: 50,
                short_break_min: 10,
                long_break_min: 30,
            },
            false,
        );
        engine.select_task(Some("t-1".into()));
        let json = serde_json::to_string(&engine).unwrap();
        let restored: TimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.remaining_ms(), 50 * MIN);
        assert_eq!(restored.selected_task_id(), Some("t-1"));
        assert!(!restored.auto_sync());
    }

    #[test]
    fn snapshot_reports_mode_and_display() {
        let engine = TimerEngine::default();
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                mode,
                total_ms,
                display,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(mode, PomodoroMode::Focus);
                assert_eq!(total_ms, 25 * MIN);
                assert_eq!(display, "25:00");
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
