//! Suggestions and bug reports sent to the administrators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::schedule::new_id;
use crate::storage::database::{self, collections, DocumentStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    #[default]
    Feature,
    Bug,
    Other,
}

impl FeedbackKind {
    pub fn label(self) -> &'static str {
        match self {
            FeedbackKind::Feature => "Tính năng mới",
            FeedbackKind::Bug => "Báo lỗi",
            FeedbackKind::Other => "Khác",
        }
    }
}

impl std::str::FromStr for FeedbackKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "feature" => Ok(FeedbackKind::Feature),
            "bug" => Ok(FeedbackKind::Bug),
            "other" => Ok(FeedbackKind::Other),
            other => Err(ValidationError::InvalidValue {
                field: "type".into(),
                message: format!("'{other}' is not one of feature, bug, other"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub author: String,
    #[serde(rename = "type")]
    pub kind: FeedbackKind,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Record a feedback entry from `author`.
pub fn submit(store: &dyn DocumentStore, author: &str, kind: FeedbackKind, content: &str) -> Result<Feedback> {
    if content.trim().is_empty() {
        return Err(ValidationError::MissingField("content".into()).into());
    }
    let feedback = Feedback {
        id: new_id(),
        author: author.to_string(),
        kind,
        content: content.to_string(),
        created_at: Utc::now(),
    };
    database::save(store, collections::FEEDBACKS, &feedback.id, &feedback)?;
    tracing::info!(author, kind = ?kind, "feedback submitted");
    Ok(feedback)
}

/// Every entry, newest first.
pub fn list(store: &dyn DocumentStore) -> Result<Vec<Feedback>> {
    let mut all: Vec<Feedback> = database::load_all(store, collections::FEEDBACKS)?;
    all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(all)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStore;

    #[test]
    fn blank_content_rejected() {
        let db = SqliteStore::open_memory().unwrap();
        assert!(submit(&db, "lan", FeedbackKind::Bug, "  \n").is_err());
        assert!(list(&db).unwrap().is_empty());
    }

    #[test]
    fn listed_newest_first() {
        let db = SqliteStore::open_memory().unwrap();
        let first = submit(&db, "lan", FeedbackKind::Feature, "Dark mode").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = submit(&db, "minh", FeedbackKind::Bug, "Timer freezes").unwrap();

        let ids: Vec<_> = list(&db).unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, [second.id, first.id]);
    }

    #[test]
    fn kind_parses_and_serializes_lowercase() {
        assert_eq!("bug".parse::<FeedbackKind>().unwrap(), FeedbackKind::Bug);
        assert!("idea".parse::<FeedbackKind>().is_err());
        let json = serde_json::to_value(FeedbackKind::Other).unwrap();
        assert_eq!(json, "other");
        assert_eq!(FeedbackKind::Feature.label(), "Tính năng mới");
    }
}
