//! Task management commands for CLI.

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use smartstudy_core::schedule::{self, parse_date, ClockTime, SplitRequest, TaskCategory, TaskEdit};
use smartstudy_core::{Config, GeminiClient, SqliteStore};

use super::{current_user, print_json, runtime, with_user_data, CliResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Schedule a task; long study blocks are split into pomodoros
    Add {
        /// Task title
        title: String,
        /// Date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Start time (HH:mm)
        #[arg(long)]
        start: String,
        /// Duration in minutes
        #[arg(long)]
        duration: u32,
        /// study, project, review or break
        #[arg(long, default_value = "study")]
        category: TaskCategory,
        #[arg(long)]
        description: Option<String>,
        /// Keep the block whole even if auto-split is on
        #[arg(long)]
        no_split: bool,
    },
    /// List tasks, optionally for one date
    List {
        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },
    /// Edit a task (never splits)
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        category: Option<TaskCategory>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Flip a task's completed flag
    Toggle {
        id: String,
    },
    /// Delete a task
    Delete {
        id: String,
    },
    /// Ask the AI for a pomodoro-style plan and add it
    Generate {
        /// Comma-separated subjects
        #[arg(long)]
        focus: String,
        /// Date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Hours available
        #[arg(long, default_value = "3")]
        hours: u32,
        /// Print the plan without saving it
        #[arg(long)]
        dry_run: bool,
    },
}

fn date_or_today(date: Option<String>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    match date {
        Some(d) => Ok(parse_date(&d)?),
        None => Ok(Local::now().date_naive()),
    }
}

pub fn run(action: TaskAction) -> CliResult {
    let db = SqliteStore::open()?;

    match action {
        TaskAction::Add {
            title,
            date,
            start,
            duration,
            category,
            description,
            no_split,
        } => {
            let config = Config::load_or_default();
            let request = SplitRequest {
                title,
                date: date_or_today(date)?,
                start_time: start.parse::<ClockTime>()?,
                duration,
                category,
                description,
                auto_split: config.schedule.auto_split && !no_split,
            };
            let rules = config.schedule.rules();
            let ids = with_user_data(&db, |data| schedule::add_tasks(&mut data.tasks, &request, &rules))?;
            println!("Tasks created: {}", ids.len());
            print_json(&ids)?;
        }
        TaskAction::List { date } => {
            let user = current_user(&db)?;
            match date {
                Some(d) => print_json(&schedule::tasks_on(&user.data.tasks, parse_date(&d)?))?,
                None => print_json(&user.data.tasks)?,
            }
        }
        TaskAction::Edit {
            id,
            title,
            start,
            duration,
            category,
            description,
        } => {
            let edit = TaskEdit {
                title,
                start_time: start.map(|s| s.parse::<ClockTime>()).transpose()?,
                duration,
                category,
                description,
            };
            let task = with_user_data(&db, |data| schedule::edit_task(&mut data.tasks, &id, edit))?;
            print_json(&task)?;
        }
        TaskAction::Toggle { id } => {
            let done = with_user_data(&db, |data| schedule::toggle_task(&mut data.tasks, &id))?;
            println!("{}", if done { "completed" } else { "reopened" });
        }
        TaskAction::Delete { id } => {
            let task = with_user_data(&db, |data| schedule::delete_task(&mut data.tasks, &id))?;
            println!("Task deleted: {}", task.id);
        }
        TaskAction::Generate {
            focus,
            date,
            hours,
            dry_run,
        } => {
            let focus: Vec<String> = focus
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            let date = date_or_today(date)?;
            let client = GeminiClient::from_config(&Config::load_or_default().ai)?;
            let tasks = runtime()?.block_on(client.generate_smart_schedule(&focus, date, hours));
            if tasks.is_empty() {
                return Err("no schedule generated".into());
            }
            if !dry_run {
                let added = tasks.clone();
                with_user_data(&db, |data| {
                    data.tasks.extend(added);
                    Ok(())
                })?;
            }
            print_json(&tasks)?;
        }
    }
    Ok(())
}
