pub mod auth;
pub mod config;
pub mod feedback;
pub mod forum;
pub mod note;
pub mod project;
pub mod stats;
pub mod survey;
pub mod task;
pub mod timer;
pub mod tutor;
pub mod users;

use serde::Serialize;
use smartstudy_core::{AuthService, SqliteStore, User, UserData};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// The logged-in user, or an error telling them to log in.
pub fn current_user(db: &SqliteStore) -> Result<User, Box<dyn std::error::Error>> {
    Ok(AuthService::new(db).require_user()?)
}

/// Load the current user's data, let `change` edit it, and save it back.
pub fn with_user_data<R>(
    db: &SqliteStore,
    change: impl FnOnce(&mut UserData) -> smartstudy_core::error::Result<R>,
) -> Result<R, Box<dyn std::error::Error>> {
    let user = current_user(db)?;
    let mut data = user.data;
    let out = change(&mut data)?;
    AuthService::new(db).update_user_data(&user.id, data)?;
    Ok(out)
}

/// Runtime for the commands that talk to the network or wait on timers.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
