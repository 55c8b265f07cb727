use clap::Subcommand;
use serde::Serialize;
use smartstudy_core::{AuthService, SqliteStore};

use super::{current_user, print_json, CliResult};

#[derive(Subcommand)]
pub enum UsersAction {
    /// Registered members, optionally filtered by name
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Update your avatar and notification settings
    Profile {
        #[arg(long)]
        avatar: Option<String>,
        #[arg(long)]
        notifications: Option<bool>,
        #[arg(long)]
        sound: Option<bool>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Member {
    username: String,
    avatar: String,
    tasks: usize,
    completed_tasks: usize,
}

pub fn run(action: UsersAction) -> CliResult {
    let db = SqliteStore::open()?;
    let auth = AuthService::new(&db);
    match action {
        UsersAction::List { search } => {
            let members: Vec<Member> = auth
                .search_users(&search)?
                .into_iter()
                .map(|u| Member {
                    completed_tasks: u.data.tasks.iter().filter(|t| t.completed).count(),
                    tasks: u.data.tasks.len(),
                    username: u.username,
                    avatar: u.avatar,
                })
                .collect();
            print_json(&members)
        }
        UsersAction::Profile {
            avatar,
            notifications,
            sound,
        } => {
            let user = current_user(&db)?;
            let user = auth.update_user(&user.id, |u| {
                if let Some(avatar) = avatar {
                    u.avatar = avatar;
                }
                if let Some(on) = notifications {
                    u.settings.notifications = on;
                }
                if let Some(on) = sound {
                    u.settings.sound_enabled = on;
                }
            })?;
            print_json(&user.settings)
        }
    }
}
