//! Local accounts and the logged-in session.
//!
//! A user is a document in `users`; password material lives separately in
//! `credentials` so user documents can be printed and shared freely. The
//! session is a single kv entry holding the current user's id.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::database::{self, collections, DocumentStore};
use crate::error::{AuthError, Result, ValidationError};
use crate::schedule::{new_id, Project, Task};
use crate::survey::StudentProfile;

pub const DEFAULT_AVATAR_BASE: &str = "https://api.dicebear.com/7.x/notionists/svg?seed=";

const SESSION_KEY: &str = "session_user_id";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub notifications: bool,
    pub sound_enabled: bool,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            notifications: true,
            sound_enabled: true,
        }
    }
}

/// Everything a user plans: tasks, projects and the onboarding profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub profile: Option<StudentProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub avatar: String,
    #[serde(default)]
    pub settings: UserSettings,
    #[serde(default)]
    pub data: UserData,
}

/// Stored password material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub salt: String,
    pub hash: String,
}

impl Credentials {
    fn new(password: &str) -> Self {
        let salt = uuid::Uuid::new_v4().simple().to_string();
        let hash = hash_password(&salt, password);
        Self { salt, hash }
    }

    fn verify(&self, password: &str) -> bool {
        hash_password(&self.salt, password) == self.hash
    }
}

fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Account operations over a [`DocumentStore`].
pub struct AuthService<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> AuthService<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Create an account and log it in.
    pub fn register(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::MissingField("username".into()).into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password".into()).into());
        }
        if self.find_by_username(username)?.is_some() {
            return Err(AuthError::UsernameTaken(username.to_string()).into());
        }

        let user = User {
            id: new_id(),
            username: username.to_string(),
            avatar: format!("{DEFAULT_AVATAR_BASE}{username}"),
            settings: UserSettings::default(),
            data: UserData::default(),
        };
        // Credentials go first so a stored user can always log in.
        database::save(
            self.store,
            collections::CREDENTIALS,
            &user.id,
            &Credentials::new(password),
        )?;
        if let Err(e) = database::save(self.store, collections::USERS, &user.id, &user) {
            self.store.delete(collections::CREDENTIALS, &user.id)?;
            return Err(e);
        }
        self.store.kv_set(SESSION_KEY, &user.id)?;
        tracing::info!(user = %user.username, "registered");
        Ok(user)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .find_by_username(username.trim())?
            .ok_or(AuthError::InvalidCredentials)?;
        let creds: Credentials = database::load(self.store, collections::CREDENTIALS, &user.id)?
            .ok_or(AuthError::InvalidCredentials)?;
        if !creds.verify(password) {
            tracing::warn!(user = %user.username, "login rejected");
            return Err(AuthError::InvalidCredentials.into());
        }
        self.store.kv_set(SESSION_KEY, &user.id)?;
        Ok(user)
    }

    pub fn logout(&self) -> Result<()> {
        self.store.kv_delete(SESSION_KEY)
    }

    /// The logged-in user, if the session still points at one.
    pub fn current_user(&self) -> Result<Option<User>> {
        let Some(id) = self.store.kv_get(SESSION_KEY)? else {
            return Ok(None);
        };
        database::load(self.store, collections::USERS, &id)
    }

    pub fn require_user(&self) -> Result<User> {
        self.current_user()?
            .ok_or_else(|| AuthError::NotLoggedIn.into())
    }

    /// Replace the user's data bundle.
    pub fn update_user_data(&self, user_id: &str, data: UserData) -> Result<User> {
        self.update_user(user_id, |u| u.data = data)
    }

    /// Apply `change` to a stored user and save it.
    pub fn update_user(&self, user_id: &str, change: impl FnOnce(&mut User)) -> Result<User> {
        let mut user: User = database::load(self.store, collections::USERS, user_id)?
            .ok_or_else(|| crate::error::CoreError::not_found("user", user_id))?;
        change(&mut user);
        database::save(self.store, collections::USERS, &user.id, &user)?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        database::load_all(self.store, collections::USERS)
    }

    /// Users whose name contains `term`, ignoring case.
    pub fn search_users(&self, term: &str) -> Result<Vec<User>> {
        let needle = term.to_lowercase();
        Ok(self
            .list_users()?
            .into_iter()
            .filter(|u| u.username.to_lowercase().contains(&needle))
            .collect())
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .list_users()?
            .into_iter()
            .find(|u| u.username == username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, DatabaseError};
    use crate::storage::SqliteStore;
    use serde_json::Value;

    /// Delegates to SQLite but refuses writes to one collection.
    struct RefuseWrites<'a> {
        inner: &'a SqliteStore,
        collection: &'static str,
    }

    impl DocumentStore for RefuseWrites<'_> {
        fn put(&self, collection: &str, key: &str, doc: &Value) -> Result<()> {
            if collection == self.collection {
                return Err(DatabaseError::QueryFailed("disk full".into()).into());
            }
            self.inner.put(collection, key, doc)
        }
        fn get(&self, collection: &str, key: &str) -> Result<Option<Value>> {
            self.inner.get(collection, key)
        }
        fn delete(&self, collection: &str, key: &str) -> Result<bool> {
            self.inner.delete(collection, key)
        }
        fn list(&self, collection: &str) -> Result<Vec<(String, Value)>> {
            self.inner.list(collection)
        }
        fn kv_get(&self, key: &str) -> Result<Option<String>> {
            self.inner.kv_get(key)
        }
        fn kv_set(&self, key: &str, value: &str) -> Result<()> {
            self.inner.kv_set(key, value)
        }
        fn kv_delete(&self, key: &str) -> Result<()> {
            self.inner.kv_delete(key)
        }
    }

    #[test]
    fn register_sets_defaults_and_session() {
        let db = SqliteStore::open_memory().unwrap();
        let auth = AuthService::new(&db);
        let user = auth.register("lan", "secret").unwrap();
        assert_eq!(user.avatar, "https://api.dicebear.com/7.x/notionists/svg?seed=lan");
        assert!(user.settings.notifications && user.settings.sound_enabled);
        assert!(user.data.tasks.is_empty());
        assert_eq!(auth.current_user().unwrap().unwrap().id, user.id);
    }

    #[test]
    fn usernames_are_unique() {
        let db = SqliteStore::open_memory().unwrap();
        let auth = AuthService::new(&db);
        auth.register("lan", "a").unwrap();
        assert!(matches!(
            auth.register("lan", "b"),
            Err(CoreError::Auth(AuthError::UsernameTaken(_)))
        ));
    }

    #[test]
    fn failed_register_leaves_username_free() {
        let db = SqliteStore::open_memory().unwrap();
        for collection in [collections::CREDENTIALS, collections::USERS] {
            let flaky = RefuseWrites { inner: &db, collection };
            assert!(AuthService::new(&flaky).register("lan", "secret").is_err());
            assert!(db.list(collections::USERS).unwrap().is_empty());
            assert!(db.list(collections::CREDENTIALS).unwrap().is_empty());
            assert!(db.kv_get(SESSION_KEY).unwrap().is_none());
        }

        let auth = AuthService::new(&db);
        auth.register("lan", "secret").unwrap();
        assert!(auth.login("lan", "secret").is_ok());
    }

    #[test]
    fn login_checks_password() {
        let db = SqliteStore::open_memory().unwrap();
        let auth = AuthService::new(&db);
        auth.register("minh", "hunter2").unwrap();
        auth.logout().unwrap();
        assert!(auth.current_user().unwrap().is_none());

        assert!(matches!(
            auth.login("minh", "wrong"),
            Err(CoreError::Auth(AuthError::InvalidCredentials))
        ));
        assert!(matches!(
            auth.login("nobody", "hunter2"),
            Err(CoreError::Auth(AuthError::InvalidCredentials))
        ));
        assert_eq!(auth.login("minh", "hunter2").unwrap().username, "minh");
    }

    #[test]
    fn password_is_not_stored_on_user() {
        let db = SqliteStore::open_memory().unwrap();
        let auth = AuthService::new(&db);
        let user = auth.register("an", "pw").unwrap();
        let doc = db.get(collections::USERS, &user.id).unwrap().unwrap();
        assert!(!doc.to_string().contains("pw\""));
        let creds: Credentials = database::load(&db, collections::CREDENTIALS, &user.id)
            .unwrap()
            .unwrap();
        assert_ne!(creds.hash, "pw");
        assert_eq!(creds.hash.len(), 64);
    }

    #[test]
    fn update_user_data_persists() {
        let db = SqliteStore::open_memory().unwrap();
        let auth = AuthService::new(&db);
        let user = auth.register("an", "pw").unwrap();
        let mut data = user.data.clone();
        data.profile = Some(crate::survey::demo_profile("an"));
        auth.update_user_data(&user.id, data).unwrap();
        let reloaded = auth.require_user().unwrap();
        assert!(reloaded.data.profile.is_some());
    }

    #[test]
    fn search_ignores_case() {
        let db = SqliteStore::open_memory().unwrap();
        let auth = AuthService::new(&db);
        auth.register("LanAnh", "pw").unwrap();
        auth.register("minh", "pw").unwrap();
        let found = auth.search_users("lan").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].username, "LanAnh");
        assert_eq!(auth.search_users("").unwrap().len(), 2);
    }

    #[test]
    fn require_user_without_session_fails() {
        let db = SqliteStore::open_memory().unwrap();
        let auth = AuthService::new(&db);
        assert!(matches!(
            auth.require_user(),
            Err(CoreError::Auth(AuthError::NotLoggedIn))
        ));
    }
}
