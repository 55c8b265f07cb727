//! Schedule types for tasks and projects.
//!
//! Tasks are dated, clock-positioned study blocks. The operations here act
//! on a user's task and project lists in place; persistence is the caller's
//! concern (see [`crate::storage::AuthService::update_user_data`]).

pub mod clock;
pub mod split;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, Result, ValidationError};

pub use clock::ClockTime;
pub use split::{split_block, SplitRequest, SplitRules};

/// What a scheduled block is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Study,
    Project,
    Break,
    Review,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 4] = [
        TaskCategory::Study,
        TaskCategory::Project,
        TaskCategory::Review,
        TaskCategory::Break,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Study => "study",
            TaskCategory::Project => "project",
            TaskCategory::Break => "break",
            TaskCategory::Review => "review",
        }
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "study" => Ok(TaskCategory::Study),
            "project" => Ok(TaskCategory::Project),
            "break" => Ok(TaskCategory::Break),
            "review" => Ok(TaskCategory::Review),
            other => Err(ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("'{other}' is not one of study, project, break, review"),
            }),
        }
    }
}

/// A scheduled block on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    /// Duration in minutes.
    pub duration: u32,
    pub category: TaskCategory,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Minutes actually spent, when tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_duration: Option<u32>,
}

impl Task {
    pub fn end_time(&self) -> ClockTime {
        self.start_time.add_minutes(self.duration)
    }

    /// Whether `now` falls inside this task's block.
    pub fn covers(&self, now: ClockTime) -> bool {
        now.within(self.start_time, self.duration)
    }
}

/// Fields that may change when editing an existing task.
#[derive(Debug, Clone, Default)]
pub struct TaskEdit {
    pub title: Option<String>,
    pub start_time: Option<ClockTime>,
    pub duration: Option<u32>,
    pub category: Option<TaskCategory>,
    pub description: Option<String>,
}

/// A longer-running goal tracked by progress percentage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Free-form deadline as entered (usually `YYYY-MM-DD`).
    #[serde(default)]
    pub deadline: String,
    /// 0..=100
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub description: String,
}

/// Fields that may change when editing a project.
#[derive(Debug, Clone, Default)]
pub struct ProjectEdit {
    pub name: Option<String>,
    pub deadline: Option<String>,
    pub progress: Option<u32>,
    pub description: Option<String>,
}

/// Longest block a single task may book: one day.
pub const MAX_TASK_MINUTES: u32 = 24 * 60;

/// Reject durations longer than [`MAX_TASK_MINUTES`].
pub fn check_duration(duration: u32) -> Result<u32, ValidationError> {
    if duration > MAX_TASK_MINUTES {
        return Err(ValidationError::InvalidValue {
            field: "duration".into(),
            message: format!("{duration} minutes is longer than a day ({MAX_TASK_MINUTES})"),
        });
    }
    Ok(duration)
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(s.to_string()))
}

// ── Task list operations ─────────────────────────────────────────────

/// Add tasks produced from `request`, splitting study blocks when asked.
///
/// Returns the ids of the tasks that were appended.
pub fn add_tasks(tasks: &mut Vec<Task>, request: &SplitRequest, rules: &SplitRules) -> Result<Vec<String>> {
    if request.title.trim().is_empty() {
        return Err(ValidationError::MissingField("title".into()).into());
    }
    check_duration(request.duration)?;
    let created = split_block(request, rules);
    let ids = created.iter().map(|t| t.id.clone()).collect();
    tasks.extend(created);
    Ok(ids)
}

/// Apply an edit to an existing task. Edits never split.
pub fn edit_task(tasks: &mut [Task], id: &str, edit: TaskEdit) -> Result<Task> {
    let task = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| CoreError::not_found("task", id))?;

    if let Some(duration) = edit.duration {
        check_duration(duration)?;
    }
    if let Some(title) = edit.title {
        if title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".into()).into());
        }
        task.title = title;
    }
    if let Some(start) = edit.start_time {
        task.start_time = start;
    }
    if let Some(duration) = edit.duration {
        task.duration = duration;
    }
    if let Some(category) = edit.category {
        task.category = category;
    }
    if let Some(description) = edit.description {
        task.description = Some(description);
    }
    Ok(task.clone())
}

/// Flip a task's completion flag, returning the new value.
pub fn toggle_task(tasks: &mut [Task], id: &str) -> Result<bool> {
    let task = tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| CoreError::not_found("task", id))?;
    task.completed = !task.completed;
    Ok(task.completed)
}

pub fn delete_task(tasks: &mut Vec<Task>, id: &str) -> Result<Task> {
    let pos = tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| CoreError::not_found("task", id))?;
    Ok(tasks.remove(pos))
}

/// Tasks for one day ordered by start time.
pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    let mut day: Vec<&Task> = tasks.iter().filter(|t| t.date == date).collect();
    day.sort_by_key(|t| t.start_time);
    day
}

// ── Project operations ───────────────────────────────────────────────

pub fn create_project(
    projects: &mut Vec<Project>,
    name: &str,
    deadline: &str,
    progress: u32,
    description: &str,
) -> Result<Project> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField("name".into()).into());
    }
    let project = Project {
        id: new_id(),
        name: name.to_string(),
        deadline: deadline.to_string(),
        progress: clamp_progress(progress),
        description: description.to_string(),
    };
    projects.push(project.clone());
    Ok(project)
}

pub fn update_project(projects: &mut [Project], id: &str, edit: ProjectEdit) -> Result<Project> {
    let project = projects
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| CoreError::not_found("project", id))?;

    if let Some(name) = edit.name {
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".into()).into());
        }
        project.name = name;
    }
    if let Some(deadline) = edit.deadline {
        project.deadline = deadline;
    }
    if let Some(progress) = edit.progress {
        project.progress = clamp_progress(progress);
    }
    if let Some(description) = edit.description {
        project.description = description;
    }
    Ok(project.clone())
}

pub fn delete_project(projects: &mut Vec<Project>, id: &str) -> Result<Project> {
    let pos = projects
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| CoreError::not_found("project", id))?;
    Ok(projects.remove(pos))
}

fn clamp_progress(progress: u32) -> u8 {
    progress.min(100) as u8
}
