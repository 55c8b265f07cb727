//! Keeps the timer in step with the day's schedule.
//!
//! The driver calls [`sync`] once a minute. With auto-sync on, whichever
//! uncompleted task of today covers the current minute is selected and the
//! timer switches to the matching mode. A manual selection or mode change
//! turns auto-sync off until the user turns it back on.

use chrono::NaiveDateTime;
use chrono::Utc;

use super::{PomodoroMode, TimerEngine};
use crate::events::Event;
use crate::schedule::{ClockTime, Task, TaskCategory};

/// Break length at which a break task maps to a long break.
pub const LONG_BREAK_THRESHOLD_MIN: u32 = 15;

/// Timer mode for a task's category and length.
pub fn mode_for_task(task: &Task) -> PomodoroMode {
    match task.category {
        TaskCategory::Break if task.duration >= LONG_BREAK_THRESHOLD_MIN => PomodoroMode::LongBreak,
        TaskCategory::Break => PomodoroMode::ShortBreak,
        _ => PomodoroMode::Focus,
    }
}

/// First uncompleted task on `now`'s date whose block contains `now`.
///
/// Blocks are half-open: a task from 08:00 for 25 minutes covers 08:00
/// through 08:24.
pub fn active_task(tasks: &[Task], now: NaiveDateTime) -> Option<&Task> {
    let date = now.date();
    let minute = ClockTime::from(now.time());
    tasks
        .iter()
        .filter(|t| t.date == date && !t.completed)
        .find(|t| t.covers(minute))
}

/// One auto-sync poll. Returns an event only when the selection changed.
pub fn sync(engine: &mut TimerEngine, tasks: &[Task], now: NaiveDateTime) -> Option<Event> {
    if !engine.auto_sync() {
        return None;
    }
    let task = active_task(tasks, now)?;
    if engine.selected_task_id() == Some(task.id.as_str()) {
        return None;
    }

    let mode = mode_for_task(task);
    engine.select_task(Some(task.id.clone()));
    engine.change_mode(mode);
    tracing::info!(task = %task.id, title = %task.title, ?mode, "auto-synced to scheduled task");
    Some(Event::TaskSynced {
        task_id: task.id.clone(),
        title: task.title.clone(),
        mode,
        at: Utc::now(),
    })
}

/// Manual selection from the picker. `id` may name a task or a project;
/// anything that is not a task runs in focus mode. An empty id clears the
/// selection without touching the mode.
pub fn select(engine: &mut TimerEngine, tasks: &[Task], id: Option<&str>) -> Event {
    engine.set_auto_sync(false);
    engine.select_task(id.map(str::to_string));

    let mode = id.map(|id| {
        tasks
            .iter()
            .find(|t| t.id == id)
            .map(mode_for_task)
            .unwrap_or(PomodoroMode::Focus)
    });
    if let Some(mode) = mode {
        engine.change_mode(mode);
    }

    Event::TaskSelected {
        task_id: id.map(str::to_string),
        mode: engine.mode(),
        at: Utc::now(),
    }
}
