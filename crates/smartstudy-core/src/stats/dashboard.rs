//! Per-user dashboard figures.

use serde::{Deserialize, Serialize};

use super::{one_decimal, percent, spent_minutes, total_minutes};
use crate::schedule::{Project, Task, TaskCategory};

/// Hours booked against one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: TaskCategory,
    pub minutes: u32,
    /// Hours rounded to one decimal.
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectProgress {
    pub name: String,
    pub progress: u8,
}

/// Summary shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// 0..=100
    pub completion_rate: u8,
    pub expected_minutes: u32,
    pub actual_minutes: u32,
    pub active_projects: usize,
    /// Categories with time booked; empty ones are left out.
    pub categories: Vec<CategoryShare>,
    pub projects: Vec<ProjectProgress>,
}

impl Dashboard {
    pub fn compute(tasks: &[Task], projects: &[Project]) -> Self {
        let completed_tasks = tasks.iter().filter(|t| t.completed).count();
        let expected_minutes = total_minutes(tasks.iter().map(|t| t.duration));
        let actual_minutes = total_minutes(tasks.iter().map(spent_minutes));

        let categories = TaskCategory::ALL
            .iter()
            .map(|&category| {
                let minutes = total_minutes(
                    tasks
                        .iter()
                        .filter(|t| t.category == category)
                        .map(|t| t.actual_duration.filter(|&m| m > 0).unwrap_or(t.duration)),
                );
                CategoryShare {
                    category,
                    minutes,
                    hours: one_decimal(minutes as f64 / 60.0),
                }
            })
            .filter(|c| c.hours > 0.0)
            .collect();

        Self {
            total_tasks: tasks.len(),
            completed_tasks,
            completion_rate: percent(completed_tasks, tasks.len()),
            expected_minutes,
            actual_minutes,
            active_projects: projects.len(),
            categories,
            projects: projects
                .iter()
                .map(|p| ProjectProgress {
                    name: p.name.clone(),
                    progress: p.progress,
                })
                .collect(),
        }
    }

    /// A brand-new user with nothing planned.
    pub fn is_empty(&self) -> bool {
        self.total_tasks == 0 && self.active_projects == 0
    }

    /// Greeting line under the dashboard title.
    pub fn headline(&self) -> String {
        if self.is_empty() {
            "Chào mừng bạn mới!".to_string()
        } else if self.completion_rate == 100 {
            "Tuyệt vời! Bạn đã hoàn thành tất cả.".to_string()
        } else {
            format!("Bạn đã hoàn thành {}% mục tiêu hôm nay.", self.completion_rate)
        }
    }
}

/// `65` -> `"1h 5p"`, `120` -> `"2h"`, `45` -> `"45p"`.
pub fn format_hours(minutes: u32) -> String {
    let h = minutes / 60;
    let m = minutes % 60;
    match (h, m) {
        (0, m) => format!("{m}p"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}p"),
    }
}
