//! Personal notes: free text or checklists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};
use crate::schedule::new_id;
use crate::storage::database::{self, collections, DocumentStore};

pub const DEFAULT_COLOR: &str = "white";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteKind {
    Text,
    Checklist,
}

impl std::str::FromStr for NoteKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(NoteKind::Text),
            "checklist" => Ok(NoteKind::Checklist),
            other => Err(ValidationError::InvalidValue {
                field: "type".into(),
                message: format!("'{other}' is not one of text, checklist"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub author_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "type")]
    pub kind: NoteKind,
    /// Present only on checklists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ChecklistItem>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_color")]
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Note {
    fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }
}

/// One author's notes.
pub struct NoteBook<'a> {
    store: &'a dyn DocumentStore,
    author_id: String,
}

impl<'a> NoteBook<'a> {
    pub fn new(store: &'a dyn DocumentStore, author_id: impl Into<String>) -> Self {
        Self {
            store,
            author_id: author_id.into(),
        }
    }

    /// New empty note. Checklists start with an empty item list.
    pub fn create(&self, kind: NoteKind, title: &str) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: new_id(),
            author_id: self.author_id.clone(),
            title: title.to_string(),
            content: String::new(),
            kind,
            items: (kind == NoteKind::Checklist).then(Vec::new),
            tags: Vec::new(),
            color: default_color(),
            created_at: now,
            updated_at: now,
        };
        self.save(&note)?;
        Ok(note)
    }

    pub fn get(&self, id: &str) -> Result<Note> {
        database::load::<Note>(self.store, collections::NOTES, id)?
            .filter(|n| n.author_id == self.author_id)
            .ok_or_else(|| CoreError::not_found("note", id))
    }

    /// Newest edits first.
    pub fn list(&self) -> Result<Vec<Note>> {
        let mut notes: Vec<Note> = database::load_all::<Note>(self.store, collections::NOTES)?
            .into_iter()
            .filter(|n| n.author_id == self.author_id)
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(notes)
    }

    /// Case-insensitive match on title or content.
    pub fn search(&self, term: &str) -> Result<Vec<Note>> {
        let needle = term.to_lowercase();
        Ok(self.list()?.into_iter().filter(|n| n.matches(&needle)).collect())
    }

    pub fn update(&self, id: &str, title: Option<String>, content: Option<String>) -> Result<Note> {
        self.modify(id, |note| {
            if let Some(title) = title {
                note.title = title;
            }
            if let Some(content) = content {
                note.content = content;
            }
            Ok(())
        })
    }

    pub fn set_tags(&self, id: &str, tags: Vec<String>) -> Result<Note> {
        self.modify(id, |note| {
            note.tags = tags;
            Ok(())
        })
    }

    pub fn set_color(&self, id: &str, color: &str) -> Result<Note> {
        self.modify(id, |note| {
            note.color = color.to_string();
            Ok(())
        })
    }

    pub fn add_item(&self, id: &str, text: &str) -> Result<Note> {
        if text.trim().is_empty() {
            return Err(ValidationError::MissingField("text".into()).into());
        }
        self.modify(id, |note| {
            checklist_items(note)?.push(ChecklistItem {
                text: text.to_string(),
                done: false,
            });
            Ok(())
        })
    }

    /// Flip the `done` flag of the item at `index` (0-based).
    pub fn toggle_item(&self, id: &str, index: usize) -> Result<Note> {
        self.modify(id, |note| {
            let items = checklist_items(note)?;
            let len = items.len();
            let item = items.get_mut(index).ok_or_else(|| ValidationError::InvalidValue {
                field: "index".into(),
                message: format!("{index} is out of range for {len} items"),
            })?;
            item.done = !item.done;
            Ok(())
        })
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        // ownership check
        self.get(id)?;
        self.store.delete(collections::NOTES, id)?;
        Ok(())
    }

    fn modify(&self, id: &str, change: impl FnOnce(&mut Note) -> Result<()>) -> Result<Note> {
        let mut note = self.get(id)?;
        change(&mut note)?;
        note.updated_at = Utc::now();
        self.save(&note)?;
        Ok(note)
    }

    fn save(&self, note: &Note) -> Result<()> {
        database::save(self.store, collections::NOTES, &note.id, note)
    }
}

fn checklist_items(note: &mut Note) -> Result<&mut Vec<ChecklistItem>> {
    if note.kind != NoteKind::Checklist {
        return Err(ValidationError::InvalidValue {
            field: "type".into(),
            message: "note is not a checklist".into(),
        }
        .into());
    }
    Ok(note.items.get_or_insert_with(Vec::new))
}
