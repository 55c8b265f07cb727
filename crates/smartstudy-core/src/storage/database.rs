//! Document storage.
//!
//! Everything the app persists is a JSON document addressed by
//! `(collection, key)`, plus a small key-value table for local state such
//! as the logged-in session and the serialized timer.
//!
//! [`DocumentStore`] is the seam; [`SqliteStore`] is the on-disk
//! implementation at `~/.config/smartstudy/smartstudy.db`.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{data_dir, migrations};
use crate::error::{DatabaseError, Result};

/// Collection names.
pub mod collections {
    pub const USERS: &str = "users";
    pub const CREDENTIALS: &str = "credentials";
    pub const NOTES: &str = "notes";
    pub const FORUM_POSTS: &str = "forum_posts";
    pub const FEEDBACKS: &str = "feedbacks";
}

/// Keyed JSON documents grouped into collections.
pub trait DocumentStore {
    /// Insert or replace a document.
    fn put(&self, collection: &str, key: &str, doc: &Value) -> Result<()>;

    fn get(&self, collection: &str, key: &str) -> Result<Option<Value>>;

    /// Returns whether a document was removed.
    fn delete(&self, collection: &str, key: &str) -> Result<bool>;

    /// All documents in a collection, oldest insert first.
    fn list(&self, collection: &str) -> Result<Vec<(String, Value)>>;

    fn kv_get(&self, key: &str) -> Result<Option<String>>;

    fn kv_set(&self, key: &str, value: &str) -> Result<()>;

    fn kv_delete(&self, key: &str) -> Result<()>;
}

/// Serialize and store a typed document.
pub fn save<T: Serialize>(store: &dyn DocumentStore, collection: &str, key: &str, doc: &T) -> Result<()> {
    store.put(collection, key, &serde_json::to_value(doc)?)
}

/// Load and decode a typed document.
pub fn load<T: DeserializeOwned>(store: &dyn DocumentStore, collection: &str, key: &str) -> Result<Option<T>> {
    store
        .get(collection, key)?
        .map(|v| decode(collection, key, v))
        .transpose()
}

/// Load every document in a collection.
pub fn load_all<T: DeserializeOwned>(store: &dyn DocumentStore, collection: &str) -> Result<Vec<T>> {
    store
        .list(collection)?
        .into_iter()
        .map(|(key, v)| decode(collection, &key, v))
        .collect()
}

fn decode<T: DeserializeOwned>(collection: &str, key: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| {
        DatabaseError::CorruptDocument {
            collection: collection.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// SQLite-backed [`DocumentStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database at `~/.config/smartstudy/smartstudy.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("smartstudy.db");
        Self::open_at(&path)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        tracing::debug!(path = %path.display(), "opened document store");
        Ok(store)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<()> {
        migrations::migrate(&self.conn)?;
        Ok(())
    }

    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

impl DocumentStore for SqliteStore {
    fn put(&self, collection: &str, key: &str, doc: &Value) -> Result<()> {
        self.conn.execute(
            "INSERT INTO documents (collection, key, body, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(collection, key)
             DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
            params![collection, key, doc.to_string(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND key = ?2",
                params![collection, key],
                |row| row.get(0),
            )
            .optional()?;
        body.map(|b| parse_body(collection, key, &b)).transpose()
    }

    fn delete(&self, collection: &str, key: &str) -> Result<bool> {
        let n = self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND key = ?2",
            params![collection, key],
        )?;
        Ok(n > 0)
    }

    fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, body FROM documents WHERE collection = ?1 ORDER BY rowid",
        )?;
        let rows = stmt.query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (key, body) = row?;
            let value = parse_body(collection, &key, &body)?;
            out.push((key, value));
        }
        Ok(out)
    }

    fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

fn parse_body(collection: &str, key: &str, body: &str) -> Result<Value> {
    serde_json::from_str(body).map_err(|e| {
        DatabaseError::CorruptDocument {
            collection: collection.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        }
        .into()
    })
}
