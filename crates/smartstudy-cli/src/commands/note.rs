use clap::Subcommand;
use smartstudy_core::forum::parse_tags;
use smartstudy_core::{NoteBook, NoteKind, SqliteStore};

use super::{current_user, print_json, CliResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Create an empty note
    Create {
        #[arg(default_value = "")]
        title: String,
        /// text or checklist
        #[arg(long, default_value = "text")]
        kind: NoteKind,
    },
    /// List notes, most recently edited first
    List,
    /// Find notes by title or content
    Search {
        term: String,
    },
    /// Print one note
    Show {
        id: String,
    },
    /// Change title and/or content
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Replace the tags (comma-separated)
    Tag {
        id: String,
        tags: String,
    },
    /// Set the background colour
    Color {
        id: String,
        color: String,
    },
    /// Append an item to a checklist
    AddItem {
        id: String,
        text: String,
    },
    /// Check or uncheck a checklist item (0-based index)
    ToggleItem {
        id: String,
        index: usize,
    },
    /// Delete a note
    Delete {
        id: String,
    },
}

pub fn run(action: NoteAction) -> CliResult {
    let db = SqliteStore::open()?;
    let user = current_user(&db)?;
    let book = NoteBook::new(&db, user.id);

    match action {
        NoteAction::Create { title, kind } => print_json(&book.create(kind, &title)?),
        NoteAction::List => print_json(&book.list()?),
        NoteAction::Search { term } => print_json(&book.search(&term)?),
        NoteAction::Show { id } => print_json(&book.get(&id)?),
        NoteAction::Edit { id, title, content } => print_json(&book.update(&id, title, content)?),
        NoteAction::Tag { id, tags } => print_json(&book.set_tags(&id, parse_tags(&tags))?),
        NoteAction::Color { id, color } => print_json(&book.set_color(&id, &color)?),
        NoteAction::AddItem { id, text } => print_json(&book.add_item(&id, &text)?),
        NoteAction::ToggleItem { id, index } => print_json(&book.toggle_item(&id, index)?),
        NoteAction::Delete { id } => {
            book.delete(&id)?;
            println!("Note deleted: {id}");
            Ok(())
        }
    }
}
