use clap::Subcommand;
use smartstudy_core::ai::API_KEY_ENTRY;
use smartstudy_core::storage::keyring_store;
use smartstudy_core::{AuthService, SqliteStore};

use super::{print_json, CliResult};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Create an account and log in
    Register {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Log in to an existing account
    Login {
        username: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Print the logged-in user as JSON
    Whoami,
    /// Store the Gemini API key in the OS keyring
    SetApiKey {
        key: String,
    },
    /// Remove the stored Gemini API key
    ClearApiKey,
}

pub fn run(action: AuthAction) -> CliResult {
    match action {
        AuthAction::Register { username, password } => {
            let db = SqliteStore::open()?;
            let user = AuthService::new(&db).register(&username, &password)?;
            println!("registered as {}", user.username);
        }
        AuthAction::Login { username, password } => {
            let db = SqliteStore::open()?;
            let user = AuthService::new(&db).login(&username, &password)?;
            println!("logged in as {}", user.username);
        }
        AuthAction::Logout => {
            let db = SqliteStore::open()?;
            AuthService::new(&db).logout()?;
            println!("logged out");
        }
        AuthAction::Whoami => {
            let db = SqliteStore::open()?;
            match AuthService::new(&db).current_user()? {
                Some(user) => print_json(&user)?,
                None => println!("not logged in"),
            }
        }
        AuthAction::SetApiKey { key } => {
            keyring_store::set(API_KEY_ENTRY, key.trim())?;
            println!("api key stored");
        }
        AuthAction::ClearApiKey => {
            keyring_store::delete(API_KEY_ENTRY)?;
            println!("api key removed");
        }
    }
    Ok(())
}
