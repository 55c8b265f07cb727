//! # SmartStudy Core Library
//!
//! Business logic for SmartStudy, a study-habit companion. Everything the
//! `smartstudy-cli` binary does goes through this crate.
//!
//! ## Architecture
//!
//! - **Survey**: scores the phone-usage and sleep questionnaires into risk
//!   groups and builds a study-method recommendation with a roadmap
//! - **Schedule**: tasks and projects, with long study blocks auto-split into
//!   25/5 pomodoro chunks
//! - **Timer**: a wall-clock pomodoro engine that the caller drives with
//!   `tick()`, plus the heuristic that follows the task scheduled right now
//! - **Storage**: JSON documents in SQLite, local accounts and TOML configuration
//! - **AI**: Gemini-backed day planner and tutor
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Pomodoro state machine
//! - [`SqliteStore`]: Document persistence behind [`DocumentStore`]
//! - [`AuthService`]: Accounts and the logged-in session
//! - [`Config`]: Application configuration management

pub mod ai;
pub mod error;
pub mod events;
pub mod feedback;
pub mod forum;
pub mod notes;
pub mod schedule;
pub mod stats;
pub mod storage;
pub mod survey;
pub mod timer;

pub use ai::{GeminiClient, ProfileInsight, RemediationPlan};
pub use error::{AiError, AuthError, ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use feedback::{Feedback, FeedbackKind};
pub use forum::{Forum, ForumComment, ForumPost};
pub use notes::{Note, NoteBook, NoteKind};
pub use schedule::{ClockTime, Project, SplitRequest, SplitRules, Task, TaskCategory};
pub use stats::{AppTrends, Dashboard};
pub use storage::{AuthService, Config, DocumentStore, SqliteStore, User, UserData};
pub use survey::{AnalysisGroup, PhoneUsageSurvey, RiskGroup, SleepSurvey, SsrAnalysis, StudentProfile};
pub use timer::{ModeDurations, PomodoroMode, TimerEngine, TimerState};
