//! Persistence for editor texts and user profiles.
//!
//! Two backends behind one enum:
//! - `InMemory`: thread-safe maps, used by tests and when no path is set.
//! - `Redb`: ACID-backed storage using `redb`, values stored as JSON.
//!
//! Editor texts are keyed by the message identifier the editor is attached
//! to. Profiles are keyed by user id and diffed field by field on update.

use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Redb(#[from] redb::Error),

    #[error("record encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("in-memory store lock poisoned")]
    Poisoned,
}

/// Stored editor row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorRecord {
    pub text: String,
    pub created_by: Option<u64>,
    /// Seconds since the Unix epoch.
    pub created_at: u64,
}

impl EditorRecord {
    fn new(text: &str, created_by: Option<u64>) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        Self {
            text: text.to_string(),
            created_by,
            created_at,
        }
    }
}

/// Profile of a user who pressed a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
}

impl UserProfile {
    pub fn new(id: u64, first_name: impl Into<String>) -> Self {
        Self {
            id,
            is_bot: false,
            first_name: first_name.into(),
            last_name: None,
            username: None,
            language_code: None,
        }
    }
}

/// Outcome of recording a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserChange {
    Inserted,
    /// Names of the fields that differed from the stored row.
    Updated(Vec<String>),
    Unchanged,
}

/// Field names whose values differ between two profiles, `id` excluded.
fn profile_diff(stored: &UserProfile, incoming: &UserProfile) -> Result<Vec<String>, StoreError> {
    let stored = serde_json::to_value(stored)?;
    let incoming = serde_json::to_value(incoming)?;
    let null = serde_json::Value::Null;
    let (Some(stored), Some(incoming)) = (stored.as_object(), incoming.as_object()) else {
        return Ok(Vec::new());
    };
    let mut keys: Vec<&String> = stored.keys().chain(incoming.keys()).collect();
    keys.sort();
    keys.dedup();
    Ok(keys
        .into_iter()
        .filter(|key| key.as_str() != "id")
        .filter(|key| stored.get(*key).unwrap_or(&null) != incoming.get(*key).unwrap_or(&null))
        .cloned()
        .collect())
}

/// Thread-safe in-memory store.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    editors: Arc<RwLock<HashMap<String, EditorRecord>>>,
    users: Arc<RwLock<HashMap<u64, UserProfile>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn create_editor(&self, message_id: &str, record: EditorRecord) -> Result<bool, StoreError> {
        let mut map = self.editors.write().map_err(|_| StoreError::Poisoned)?;
        if map.contains_key(message_id) {
            return Ok(false);
        }
        map.insert(message_id.to_string(), record);
        Ok(true)
    }

    fn editor(&self, message_id: &str) -> Result<Option<EditorRecord>, StoreError> {
        let map = self.editors.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(message_id).cloned())
    }

    fn put_editor(&self, message_id: &str, record: EditorRecord) -> Result<(), StoreError> {
        let mut map = self.editors.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(message_id.to_string(), record);
        Ok(())
    }

    fn user(&self, id: u64) -> Result<Option<UserProfile>, StoreError> {
        let map = self.users.read().map_err(|_| StoreError::Poisoned)?;
        Ok(map.get(&id).cloned())
    }

    fn put_user(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let mut map = self.users.write().map_err(|_| StoreError::Poisoned)?;
        map.insert(profile.id, profile.clone());
        Ok(())
    }
}

/// Redb-backed store.
pub struct RedbStore {
    db: redb::Database,
    path: PathBuf,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").field("path", &self.path).finish()
    }
}

impl RedbStore {
    const EDITORS: redb::TableDefinition<'static, &'static str, &'static str> =
        redb::TableDefinition::new("editors");
    const USERS: redb::TableDefinition<'static, u64, &'static str> =
        redb::TableDefinition::new("users");

    /// Create or open a database at `path`, creating both tables.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, redb::Error> {
        if let Some(parent) = path.as_ref().parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(%err, dir = %parent.display(), "failed to create store directory");
            }
        }
        let db = redb::Database::create(path.as_ref())?;
        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(Self::EDITORS)?;
            write_txn.open_table(Self::USERS)?;
        }
        write_txn.commit()?;
        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
        })
    }

    fn get_editor_json(&self, message_id: &str) -> Result<Option<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::EDITORS)?;
        Ok(table.get(message_id)?.map(|v| v.value().to_string()))
    }

    /// Write `json` under `message_id`. With `only_if_absent`, an existing
    /// row is kept and `false` is returned.
    fn put_editor_json(&self, message_id: &str, json: &str, only_if_absent: bool) -> Result<bool, redb::Error> {
        let write_txn = self.db.begin_write()?;
        let written = {
            let mut table = write_txn.open_table(Self::EDITORS)?;
            let exists = table.get(message_id)?.is_some();
            if exists && only_if_absent {
                false
            } else {
                table.insert(message_id, json)?;
                true
            }
        };
        write_txn.commit()?;
        Ok(written)
    }

    fn get_user_json(&self, id: u64) -> Result<Option<String>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::USERS)?;
        Ok(table.get(id)?.map(|v| v.value().to_string()))
    }

    fn put_user_json(&self, id: u64, json: &str) -> Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::USERS)?;
            table.insert(id, json)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

/// Store backend switch.
#[derive(Clone, Debug)]
pub enum EditorStore {
    InMemory(InMemoryStore),
    Redb(Arc<RedbStore>),
}

impl Default for EditorStore {
    fn default() -> Self {
        Self::new_in_memory()
    }
}

impl EditorStore {
    pub fn new_in_memory() -> Self {
        EditorStore::InMemory(InMemoryStore::new())
    }

    pub fn new_redb<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Ok(EditorStore::Redb(Arc::new(RedbStore::open(path)?)))
    }

    /// Store the initial text of a new editor. Returns `false` when a row for
    /// `message_id` already exists; the existing row is kept.
    pub fn create_editor(
        &self,
        message_id: &str,
        text: &str,
        created_by: Option<u64>,
    ) -> Result<bool, StoreError> {
        let record = EditorRecord::new(text, created_by);
        match self {
            EditorStore::InMemory(m) => m.create_editor(message_id, record),
            EditorStore::Redb(r) => {
                let json = serde_json::to_string(&record)?;
                Ok(r.put_editor_json(message_id, &json, true)?)
            }
        }
    }

    pub fn load_editor(&self, message_id: &str) -> Result<Option<EditorRecord>, StoreError> {
        match self {
            EditorStore::InMemory(m) => m.editor(message_id),
            EditorStore::Redb(r) => match r.get_editor_json(message_id)? {
                Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                None => Ok(None),
            },
        }
    }

    /// Stored text for `message_id`, if any.
    pub fn load_text(&self, message_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load_editor(message_id)?.map(|record| record.text))
    }

    /// Replace the stored text, keeping creator and creation time.
    pub fn save_text(&self, message_id: &str, text: &str) -> Result<(), StoreError> {
        let record = match self.load_editor(message_id)? {
            Some(mut record) => {
                record.text = text.to_string();
                record
            }
            None => EditorRecord::new(text, None),
        };
        match self {
            EditorStore::InMemory(m) => m.put_editor(message_id, record),
            EditorStore::Redb(r) => {
                let json = serde_json::to_string(&record)?;
                r.put_editor_json(message_id, &json, false)?;
                Ok(())
            }
        }
    }

    pub fn user(&self, id: u64) -> Result<Option<UserProfile>, StoreError> {
        match self {
            EditorStore::InMemory(m) => m.user(id),
            EditorStore::Redb(r) => match r.get_user_json(id)? {
                Some(json) => Ok(Some(serde_json::from_str(&json)?)),
                None => Ok(None),
            },
        }
    }

    /// Insert a new profile or update the stored one when any field changed.
    pub fn record_user(&self, profile: &UserProfile) -> Result<UserChange, StoreError> {
        let change = match self.user(profile.id)? {
            None => UserChange::Inserted,
            Some(stored) => {
                let fields = profile_diff(&stored, profile)?;
                if fields.is_empty() {
                    return Ok(UserChange::Unchanged);
                }
                UserChange::Updated(fields)
            }
        };
        match self {
            EditorStore::InMemory(m) => m.put_user(profile)?,
            EditorStore::Redb(r) => r.put_user_json(profile.id, &serde_json::to_string(profile)?)?,
        }
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_create_keeps_first_row() {
        let store = EditorStore::new_in_memory();
        assert!(store.create_editor("msg", "hello", Some(7)).unwrap());
        assert!(!store.create_editor("msg", "other", Some(8)).unwrap());
        let record = store.load_editor("msg").unwrap().unwrap();
        assert_eq!(record.text, "hello");
        assert_eq!(record.created_by, Some(7));
    }

    #[test]
    fn save_text_keeps_creator() {
        let store = EditorStore::new_in_memory();
        store.create_editor("msg", "a", Some(1)).unwrap();
        store.save_text("msg", "ab").unwrap();
        let record = store.load_editor("msg").unwrap().unwrap();
        assert_eq!(record.text, "ab");
        assert_eq!(record.created_by, Some(1));
        assert_eq!(store.load_text("missing").unwrap(), None);
    }

    #[test]
    fn record_user_reports_changed_fields() {
        let store = EditorStore::new_in_memory();
        let mut user = UserProfile::new(5, "Ada");
        assert_eq!(store.record_user(&user).unwrap(), UserChange::Inserted);
        assert_eq!(store.record_user(&user).unwrap(), UserChange::Unchanged);

        user.username = Some("ada_l".into());
        user.first_name = "Ada L.".into();
        assert_eq!(
            store.record_user(&user).unwrap(),
            UserChange::Updated(vec!["first_name".into(), "username".into()])
        );
        assert_eq!(store.user(5).unwrap(), Some(user));
    }
}
