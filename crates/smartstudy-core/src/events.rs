use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{PomodoroMode, TimerState};

/// Every timer state change produces an Event.
/// The CLI prints them as JSON; the watch loop reacts to completions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: PomodoroMode,
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted {
        mode: PomodoroMode,
        selected_task_id: Option<String>,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: PomodoroMode,
        at: DateTime<Utc>,
    },
    ModeChanged {
        from: PomodoroMode,
        to: PomodoroMode,
        at: DateTime<Utc>,
    },
    /// Auto-sync picked the task scheduled for the current minute.
    TaskSynced {
        task_id: String,
        title: String,
        mode: PomodoroMode,
        at: DateTime<Utc>,
    },
    /// The user picked a task or project by hand.
    TaskSelected {
        task_id: Option<String>,
        mode: PomodoroMode,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        mode: PomodoroMode,
        remaining_ms: u64,
        total_ms: u64,
        progress_pct: f64,
        display: String,
        selected_task_id: Option<String>,
        auto_sync: bool,
        at: DateTime<Utc>,
    },
}
