use clap::Subcommand;
use smartstudy_core::{Config, GeminiClient};

use super::{print_json, runtime, CliResult};

#[derive(Subcommand)]
pub enum TutorAction {
    /// Explain a weak topic and lay out steps to fix it
    Plan {
        /// Subject, e.g. "Giải tích"
        subject: String,
        /// What exactly is hard
        weakness: String,
    },
}

pub fn run(action: TutorAction) -> CliResult {
    match action {
        TutorAction::Plan { subject, weakness } => {
            if subject.trim().is_empty() || weakness.trim().is_empty() {
                return Err("subject and weakness are required".into());
            }
            let client = GeminiClient::from_config(&Config::load_or_default().ai)?;
            let plan = runtime()?.block_on(client.generate_remediation_plan(&subject, &weakness));
            match plan {
                Some(plan) => print_json(&plan),
                None => Err("tutor is unavailable right now".into()),
            }
        }
    }
}
