use clap::Subcommand;
use smartstudy_core::feedback;
use smartstudy_core::{FeedbackKind, SqliteStore};

use super::{current_user, print_json, CliResult};

#[derive(Subcommand)]
pub enum FeedbackAction {
    /// Send a suggestion or bug report
    Send {
        content: String,
        /// feature, bug or other
        #[arg(long, default_value = "feature")]
        kind: FeedbackKind,
    },
    /// Everything sent so far, newest first
    List,
}

pub fn run(action: FeedbackAction) -> CliResult {
    let db = SqliteStore::open()?;
    match action {
        FeedbackAction::Send { content, kind } => {
            let user = current_user(&db)?;
            let entry = feedback::submit(&db, &user.username, kind, &content)?;
            println!("Feedback sent: {}", entry.kind.label());
        }
        FeedbackAction::List => print_json(&feedback::list(&db)?)?,
    }
    Ok(())
}
