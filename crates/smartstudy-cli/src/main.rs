use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "smartstudy-cli", version, about = "SmartStudy CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Account and session management
    Auth {
        #[command(subcommand)]
        action: commands::auth::AuthAction,
    },
    /// Onboarding surveys and study profile
    Survey {
        #[command(subcommand)]
        action: commands::survey::SurveyAction,
    },
    /// Scheduled tasks
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Project tracking
    Project {
        #[command(subcommand)]
        action: commands::project::ProjectAction,
    },
    /// Personal notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Pomodoro timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Community forum
    Forum {
        #[command(subcommand)]
        action: commands::forum::ForumAction,
    },
    /// AI tutor for weak topics
    Tutor {
        #[command(subcommand)]
        action: commands::tutor::TutorAction,
    },
    /// Dashboard and app-wide statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Feedback to the administrators
    Feedback {
        #[command(subcommand)]
        action: commands::feedback::FeedbackAction,
    },
    /// Member directory and profile settings
    Users {
        #[command(subcommand)]
        action: commands::users::UsersAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SMARTSTUDY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Auth { action } => commands::auth::run(action),
        Commands::Survey { action } => commands::survey::run(action),
        Commands::Task { action } => commands::task::run(action),
        Commands::Project { action } => commands::project::run(action),
        Commands::Note { action } => commands::note::run(action),
        Commands::Timer { action } => commands::timer::run(action),
        Commands::Forum { action } => commands::forum::run(action),
        Commands::Tutor { action } => commands::tutor::run(action),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Feedback { action } => commands::feedback::run(action),
        Commands::Users { action } => commands::users::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
