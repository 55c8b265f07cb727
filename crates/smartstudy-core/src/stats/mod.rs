//! Statistics for the dashboard and the app-wide trends view.
//!
//! Both are pure folds over tasks and projects; nothing here touches storage.

mod dashboard;
mod trends;

pub use dashboard::{format_hours, CategoryShare, Dashboard, ProjectProgress};
pub use trends::AppTrends;

use crate::schedule::Task;

/// Minutes actually spent on a task: tracked time, else the planned block
/// once it is completed.
pub(crate) fn spent_minutes(task: &Task) -> u32 {
    match task.actual_duration {
        Some(m) if m > 0 => m,
        _ if task.completed => task.duration,
        _ => 0,
    }
}

/// Sum of minutes that stops at `u32::MAX` instead of overflowing.
pub(crate) fn total_minutes(minutes: impl IntoIterator<Item = u32>) -> u32 {
    minutes.into_iter().fold(0, u32::saturating_add)
}

/// Rounded percentage, 0 when `total` is 0.
pub(crate) fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u8
}

pub(crate) fn one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
