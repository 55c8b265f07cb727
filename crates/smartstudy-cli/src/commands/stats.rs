use clap::Subcommand;
use serde_json::json;
use smartstudy_core::stats::format_hours;
use smartstudy_core::{AppTrends, AuthService, Dashboard, SqliteStore};

use super::{current_user, print_json, CliResult};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Your completion rate, hours and project progress
    Dashboard,
    /// Averages across every registered user
    Trends,
}

pub fn run(action: StatsAction) -> CliResult {
    let db = SqliteStore::open()?;
    match action {
        StatsAction::Dashboard => {
            let user = current_user(&db)?;
            let dash = Dashboard::compute(&user.data.tasks, &user.data.projects);
            print_json(&json!({
                "headline": dash.headline(),
                "hours": format!("{} / {}", format_hours(dash.actual_minutes), format_hours(dash.expected_minutes)),
                "dashboard": dash,
            }))
        }
        StatsAction::Trends => {
            let users = AuthService::new(&db).list_users()?;
            print_json(&AppTrends::compute(&users))
        }
    }
}
