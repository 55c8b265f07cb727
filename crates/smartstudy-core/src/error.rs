//! Core error types for smartstudy-core.
//!
//! This module defines the error hierarchy using thiserror. Storage,
//! configuration, account and AI failures each get their own enum and fold
//! into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for smartstudy-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Account and session errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Generative AI client errors
    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Lookup by id found nothing
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Stored document could not be decoded
    #[error("Corrupt document {collection}/{key}: {message}")]
    CorruptDocument {
        collection: String,
        key: String,
        message: String,
    },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Account and session errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Username already registered
    #[error("username already taken: {0}")]
    UsernameTaken(String),

    /// Wrong username or password
    #[error("invalid username or password")]
    InvalidCredentials,

    /// No user is logged in
    #[error("not logged in")]
    NotLoggedIn,

    /// Only the owner may change this
    #[error("{0} belongs to another user")]
    NotOwner(&'static str),

    /// Credential storage failed
    #[error("credential store error: {0}")]
    Keyring(String),
}

/// Generative AI client errors.
#[derive(Error, Debug)]
pub enum AiError {
    /// No API key in the environment or keyring
    #[error("API key not configured (set GEMINI_API_KEY or run `auth set-api-key`)")]
    MissingApiKey,

    /// Transport failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with an error status
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response had no text candidate
    #[error("empty response")]
    EmptyResponse,

    /// Response text was not the expected JSON
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Endpoint URL could not be built
    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Clock string is not `HH:mm`
    #[error("Invalid time '{0}': expected HH:mm")]
    InvalidClock(String),

    /// Date string is not `YYYY-MM-DD`
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Required field left empty
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Survey has unanswered questions
    #[error("Survey incomplete: unanswered {0:?}")]
    IncompleteSurvey(Vec<&'static str>),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        AuthError::Keyring(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_kind() {
        let err = CoreError::not_found("task", "t-1");
        assert_eq!(err.to_string(), "task not found: t-1");
    }

    #[test]
    fn validation_wraps_into_core() {
        let err: CoreError = ValidationError::InvalidClock("25:99".into()).into();
        assert!(err.to_string().contains("25:99"));
    }
}
