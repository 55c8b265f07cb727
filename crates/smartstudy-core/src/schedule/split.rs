//! Pomodoro auto-split for new study blocks.
//!
//! A single "study for N minutes" request becomes alternating study and
//! break tasks:
//!
//! ```text
//! 60 min  ->  study 25 | break 5 | study 25 | break 5
//! 52 min  ->  study 25 | break 5 | study 22
//! 33 min  ->  study 25 | break 5 | study 3
//! 57 min  ->  study 25 | break 5 | study 25         (2 min tail dropped)
//! ```
//!
//! Only `study` requests of at least `min_total_min` minutes are split;
//! anything else becomes one task as entered.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{new_id, ClockTime, Task, TaskCategory};

pub const BREAK_TITLE: &str = "Nghỉ giải lao";
pub const BREAK_DESCRIPTION: &str = "Thư giãn mắt, vươn vai.";

/// Duration rules for splitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRules {
    #[serde(default = "default_study_block")]
    pub study_block_min: u32,
    #[serde(default = "default_break_block")]
    pub break_block_min: u32,
    /// Requests shorter than this are never split.
    #[serde(default = "default_min_total")]
    pub min_total_min: u32,
}

fn default_study_block() -> u32 {
    25
}
fn default_break_block() -> u32 {
    5
}
fn default_min_total() -> u32 {
    30
}

impl Default for SplitRules {
    fn default() -> Self {
        Self {
            study_block_min: default_study_block(),
            break_block_min: default_break_block(),
            min_total_min: default_min_total(),
        }
    }
}

/// A request to schedule a block of time.
#[derive(Debug, Clone)]
pub struct SplitRequest {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub duration: u32,
    pub category: TaskCategory,
    pub description: Option<String>,
    pub auto_split: bool,
}

impl SplitRequest {
    fn should_split(&self, rules: &SplitRules) -> bool {
        self.auto_split
            && self.category == TaskCategory::Study
            && self.duration >= rules.min_total_min
            && rules.study_block_min > 0
    }

    fn single(&self) -> Task {
        Task {
            id: new_id(),
            title: self.title.clone(),
            date: self.date,
            start_time: self.start_time,
            duration: self.duration,
            category: self.category,
            completed: false,
            description: self.description.clone(),
            actual_duration: None,
        }
    }
}

/// Expand `request` into the tasks it should produce.
pub fn split_block(request: &SplitRequest, rules: &SplitRules) -> Vec<Task> {
    if !request.should_split(rules) {
        return vec![request.single()];
    }

    let mut out = Vec::new();
    let mut remaining = request.duration;
    let mut cursor = request.start_time;
    let mut cycle = 1;

    while remaining > 0 {
        let study = remaining.min(rules.study_block_min);
        out.push(Task {
            id: new_id(),
            title: format!("{} ({cycle})", request.title),
            date: request.date,
            start_time: cursor,
            duration: study,
            category: TaskCategory::Study,
            completed: false,
            description: request.description.clone(),
            actual_duration: None,
        });
        cursor = cursor.add_minutes(study);
        remaining -= study;

        if rules.break_block_min > 0 && remaining >= rules.break_block_min {
            out.push(Task {
                id: new_id(),
                title: BREAK_TITLE.to_string(),
                date: request.date,
                start_time: cursor,
                duration: rules.break_block_min,
                category: TaskCategory::Break,
                completed: false,
                description: Some(BREAK_DESCRIPTION.to_string()),
                actual_duration: None,
            });
            cursor = cursor.add_minutes(rules.break_block_min);
            remaining -= rules.break_block_min;
        } else {
            // A tail shorter than a break is not worth a task.
            remaining = 0;
        }
        cycle += 1;
    }

    tracing::debug!(
        title = %request.title,
        duration = request.duration,
        blocks = out.len(),
        "split study block"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn request(start: &str, duration: u32) -> SplitRequest {
        SplitRequest {
            title: "Math".into(),
            date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            start_time: start.parse().unwrap(),
            duration,
            category: TaskCategory::Study,
            description: Some("chapter 3".into()),
            auto_split: true,
        }
    }

    fn shape(tasks: &[Task]) -> Vec<(String, u32, TaskCategory)> {
        tasks
            .iter()
            .map(|t| (t.start_time.to_string(), t.duration, t.category))
            .collect()
    }

    #[test]
    fn sixty_minutes_alternates_study_and_break() {
        let tasks = split_block(&request("08:00", 60), &SplitRules::default());
        assert_eq!(
            shape(&tasks),
            vec![
                ("08:00".into(), 25, TaskCategory::Study),
                ("08:25".into(), 5, TaskCategory::Break),
                ("08:30".into(), 25, TaskCategory::Study),
                ("08:55".into(), 5, TaskCategory::Break),
            ]
        );
        assert_eq!(tasks[0].title, "Math (1)");
        assert_eq!(tasks[2].title, "Math (2)");
        assert_eq!(tasks[1].title, BREAK_TITLE);
        assert_eq!(tasks[1].description.as_deref(), Some(BREAK_DESCRIPTION));
        assert_eq!(tasks[0].description.as_deref(), Some("chapter 3"));
    }

    #[test]
    fn thirty_minutes_is_one_cycle() {
        let tasks = split_block(&request("09:00", 30), &SplitRules::default());
        assert_eq!(
            shape(&tasks),
            vec![
                ("09:00".into(), 25, TaskCategory::Study),
                ("09:25".into(), 5, TaskCategory::Break),
            ]
        );
    }

    #[test]
    fn short_last_study_block() {
        let tasks = split_block(&request("09:00", 52), &SplitRules::default());
        assert_eq!(
            shape(&tasks),
            vec![
                ("09:00".into(), 25, TaskCategory::Study),
                ("09:25".into(), 5, TaskCategory::Break),
                ("09:30".into(), 22, TaskCategory::Study),
            ]
        );
    }

    #[test]
    fn tail_under_break_length_is_dropped() {
        let tasks = split_block(&request("09:00", 57), &SplitRules::default());
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks.iter().map(|t| t.duration).sum::<u32>(), 55);
        assert_eq!(tasks[2].category, TaskCategory::Study);
    }

    #[test]
    fn short_study_after_break_is_kept() {
        let tasks = split_block(&request("09:00", 33), &SplitRules::default());
        assert_eq!(
            shape(&tasks),
            vec![
                ("09:00".into(), 25, TaskCategory::Study),
                ("09:25".into(), 5, TaskCategory::Break),
                ("09:30".into(), 3, TaskCategory::Study),
            ]
        );
        assert_eq!(tasks[2].title, "Math (2)");
    }

    #[test]
    fn wraps_past_midnight_on_same_date() {
        let tasks = split_block(&request("23:50", 60), &SplitRules::default());
        assert_eq!(tasks[1].start_time.to_string(), "00:15");
        assert!(tasks.iter().all(|t| t.date == tasks[0].date));
    }

    #[test]
    fn no_split_below_threshold_or_for_other_categories() {
        let rules = SplitRules::default();
        let short = split_block(&request("08:00", 29), &rules);
        assert_eq!(short.len(), 1);
        assert_eq!(short[0].title, "Math");
        assert_eq!(short[0].duration, 29);

        let mut review = request("08:00", 120);
        review.category = TaskCategory::Review;
        assert_eq!(split_block(&review, &rules).len(), 1);

        let mut manual = request("08:00", 120);
        manual.auto_split = false;
        let one = split_block(&manual, &rules);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].duration, 120);
    }

    #[test]
    fn ids_are_unique() {
        let tasks = split_block(&request("08:00", 240), &SplitRules::default());
        let mut ids: Vec<_> = tasks.iter().map(|t| t.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), tasks.len());
    }

    proptest! {
        #[test]
        fn split_never_exceeds_request(duration in 30u32..600, start in 0u32..1440) {
            let start = ClockTime::MIDNIGHT.add_minutes(start);
            let mut req = request("00:00", duration);
            req.start_time = start;
            let tasks = split_block(&req, &SplitRules::default());

            let total: u32 = tasks.iter().map(|t| t.duration).sum();
            prop_assert!(total <= duration);
            prop_assert!(duration - total < 5);
            prop_assert!(tasks.iter().all(|t| t.duration <= 25 && t.duration > 0));
            prop_assert_eq!(tasks[0].category, TaskCategory::Study);

            // Blocks are contiguous.
            for pair in tasks.windows(2) {
                prop_assert_eq!(pair[0].end_time(), pair[1].start_time);
            }
            // Study and break strictly alternate.
            for pair in tasks.windows(2) {
                prop_assert_ne!(pair[0].category, pair[1].category);
            }
        }
    }
}
