//! Aggregates across every registered user.

use serde::{Deserialize, Serialize};

use super::{one_decimal, percent, spent_minutes, total_minutes};
use crate::schedule::TaskCategory;
use crate::storage::User;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppTrends {
    pub total_users: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// One decimal.
    pub avg_tasks_per_user: f64,
    /// One decimal.
    pub avg_study_hours_per_user: f64,
    pub completion_rate: u8,
    /// Task counts per category, zero counts left out.
    pub categories: Vec<(TaskCategory, usize)>,
}

impl AppTrends {
    pub fn compute(users: &[User]) -> Self {
        let tasks: Vec<_> = users.iter().flat_map(|u| &u.data.tasks).collect();
        let completed_tasks = tasks.iter().filter(|t| t.completed).count();
        let study_minutes = total_minutes(tasks.iter().map(|t| spent_minutes(t)));

        let per_user = |x: f64| {
            if users.is_empty() {
                0.0
            } else {
                one_decimal(x / users.len() as f64)
            }
        };

        let categories = TaskCategory::ALL
            .iter()
            .map(|&c| (c, tasks.iter().filter(|t| t.category == c).count()))
            .filter(|&(_, n)| n > 0)
            .collect();

        Self {
            total_users: users.len(),
            total_tasks: tasks.len(),
            completed_tasks,
            avg_tasks_per_user: per_user(tasks.len() as f64),
            avg_study_hours_per_user: per_user(study_minutes as f64 / 60.0),
            completion_rate: percent(completed_tasks, tasks.len()),
            categories,
        }
    }
}
