//! Project management commands for CLI.

use clap::Subcommand;
use smartstudy_core::schedule::{self, ProjectEdit};
use smartstudy_core::SqliteStore;

use super::{current_user, print_json, with_user_data, CliResult};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project
    Create {
        /// Project name
        name: String,
        /// Deadline (usually YYYY-MM-DD)
        #[arg(long, default_value = "")]
        deadline: String,
        /// Progress percent, clamped to 100
        #[arg(long, default_value = "0")]
        progress: u32,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List projects
    List,
    /// Update a project
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        deadline: Option<String>,
        #[arg(long)]
        progress: Option<u32>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a project
    Delete {
        id: String,
    },
}

pub fn run(action: ProjectAction) -> CliResult {
    let db = SqliteStore::open()?;

    match action {
        ProjectAction::Create {
            name,
            deadline,
            progress,
            description,
        } => {
            let project = with_user_data(&db, |data| {
                schedule::create_project(&mut data.projects, &name, &deadline, progress, &description)
            })?;
            println!("Project created: {}", project.id);
            print_json(&project)?;
        }
        ProjectAction::List => {
            print_json(&current_user(&db)?.data.projects)?;
        }
        ProjectAction::Update {
            id,
            name,
            deadline,
            progress,
            description,
        } => {
            let edit = ProjectEdit {
                name,
                deadline,
                progress,
                description,
            };
            let project = with_user_data(&db, |data| schedule::update_project(&mut data.projects, &id, edit))?;
            print_json(&project)?;
        }
        ProjectAction::Delete { id } => {
            let project = with_user_data(&db, |data| schedule::delete_project(&mut data.projects, &id))?;
            println!("Project deleted: {}", project.id);
        }
    }
    Ok(())
}
