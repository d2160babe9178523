//! Live editor sessions.
//!
//! `SessionManager` keeps recently used editors in an LRU cache keyed by the
//! message they are attached to. Each session carries:
//! - a busy mark, set while one press or create is being applied, whether
//!   or not the editor is cached
//! - an optional owner lock that expires after an idle timeout
//!
//! Presses for editors that fell out of the cache are replayed against the
//! stored text using the mode and caret carried in the button payload.
//!
//! Time is passed in by the caller so lock expiry stays deterministic.

use crate::action::ActionPayload;
use crate::config::KeypadConfig;
use crate::store::{EditorStore, UserChange, UserProfile};
use crate::view::KeyboardView;
use keypad_core::{Editor, EditorError, EditorState, KeyDispatcher, LayoutRegistry};
use lru::LruCache;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

/// Inline message id, or `"{user}:{chat}"` for editors in a private chat.
pub type SessionKey = String;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("a bit slowly please")]
    Busy,

    #[error("the editor is busy (locked by user {owner})")]
    Locked { owner: u64 },

    #[error("no editor stored for session {0}")]
    UnknownSession(SessionKey),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("invalid payload: {0}")]
    Payload(String),
}

#[derive(Debug, Clone)]
struct EditLock {
    owner: UserProfile,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
struct EditSession {
    editor: Editor,
    lock: Option<EditLock>,
}

impl EditSession {
    /// Owner of a lock that is still live at `now`.
    fn holder(&self, now: Instant) -> Option<&UserProfile> {
        self.lock
            .as_ref()
            .filter(|lock| lock.expires_at > now)
            .map(|lock| &lock.owner)
    }
}

/// Cached editors plus the keys with a press or create in flight. A key is
/// marked busy whether or not its editor is cached, so two presses on an
/// evicted editor cannot both rebuild it.
struct SessionTable {
    cache: LruCache<SessionKey, EditSession>,
    in_flight: HashSet<SessionKey>,
}

/// Clears the busy mark of a key when dropped.
struct InFlight<'a> {
    manager: &'a SessionManager,
    key: &'a str,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.manager.table().in_flight.remove(self.key);
    }
}

pub struct SessionManager {
    sessions: Mutex<SessionTable>,
    dispatcher: KeyDispatcher,
    store: EditorStore,
    editor_config: keypad_core::Config,
    idle_timeout: Duration,
    blank_label: String,
}

impl SessionManager {
    pub fn new(config: &KeypadConfig, layouts: Arc<LayoutRegistry>, store: EditorStore) -> Self {
        let capacity = NonZeroUsize::new(config.session_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(SessionTable {
                cache: LruCache::new(capacity),
                in_flight: HashSet::new(),
            }),
            dispatcher: KeyDispatcher::new(layouts),
            store,
            editor_config: config.base.clone(),
            idle_timeout: config.idle_timeout(),
            blank_label: config.blank_label.clone(),
        }
    }

    /// Session key for an update: the inline message id when present, else
    /// `"{user}:{chat}"`.
    pub fn key_for(inline_message_id: Option<&str>, user: Option<u64>, chat: Option<i64>) -> Option<SessionKey> {
        match (inline_message_id, user, chat) {
            (Some(id), _, _) if !id.is_empty() => Some(id.to_string()),
            (_, Some(user), Some(chat)) => Some(format!("{user}:{chat}")),
            _ => None,
        }
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn layouts(&self) -> &LayoutRegistry {
        self.dispatcher.layouts()
    }

    /// Number of cached editors.
    pub fn len(&self) -> usize {
        self.table().cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the cached editor for `key`.
    pub fn editor(&self, key: &str) -> Option<Editor> {
        self.table().cache.peek(key).map(|s| s.editor.clone())
    }

    /// Open an editor locked to `owner`. A new editor is seeded with
    /// `initial_text`; when a row for `key` is already stored, the stored
    /// text wins so cache and store agree.
    pub fn create(
        &self,
        key: &str,
        initial_text: &str,
        owner: &UserProfile,
        now: Instant,
    ) -> Result<KeyboardView, SessionError> {
        self.layouts().layout(self.editor_config.initial_mode)?;
        self.record_user(owner);

        let _in_flight = {
            let mut table = self.table();
            if table.in_flight.contains(key) {
                debug!(key, user = owner.id, "create rejected, session busy");
                return Err(SessionError::Busy);
            }
            if let Some(holder) = table.cache.peek(key).and_then(|s| s.holder(now)) {
                if holder.id != owner.id {
                    debug!(key, user = owner.id, owner = holder.id, "create rejected, locked");
                    return Err(SessionError::Locked { owner: holder.id });
                }
            }
            table.in_flight.insert(key.to_string());
            InFlight { manager: self, key }
        };

        let text = match self.store.create_editor(key, initial_text, Some(owner.id)) {
            Ok(true) => initial_text.to_string(),
            Ok(false) => match self.store.load_text(key) {
                Ok(Some(stored)) => {
                    debug!(key, "editor row already stored, reopening it");
                    stored
                }
                Ok(None) => initial_text.to_string(),
                Err(err) => {
                    warn!(%err, key, "failed to load stored editor text");
                    initial_text.to_string()
                }
            },
            Err(err) => {
                warn!(%err, key, "failed to persist new editor");
                initial_text.to_string()
            }
        };

        let editor = self.editor_config.new_editor(text);
        let view = self.view(&editor, Some(owner))?;
        self.table().cache.put(
            key.to_string(),
            EditSession {
                editor,
                lock: Some(self.lock_for(owner, now)),
            },
        );
        debug!(key, owner = owner.id, "editor created");
        Ok(view)
    }

    /// Apply a button press. `payload` is the data carried by the button.
    pub fn press(
        &self,
        key: &str,
        payload: &str,
        user: &UserProfile,
        now: Instant,
    ) -> Result<KeyboardView, SessionError> {
        let payload = ActionPayload::parse(payload).map_err(SessionError::Payload)?;
        self.apply(key, &payload.token(), Some(payload.state()), payload.owner, user, now)
    }

    /// Apply a raw key token (a grid code, toggle or control name) to a
    /// cached editor. Uncached editors cannot be replayed without a payload.
    pub fn press_token(
        &self,
        key: &str,
        token: &str,
        user: &UserProfile,
        now: Instant,
    ) -> Result<KeyboardView, SessionError> {
        self.apply(key, token, None, None, user, now)
    }

    /// Release every lock idle past the timeout and return the unlocked
    /// views that have to be shown in place of the locked ones.
    pub fn expire_idle(&self, now: Instant) -> Vec<(SessionKey, KeyboardView)> {
        let mut table = self.table();
        let SessionTable { cache, in_flight } = &mut *table;
        let mut released = Vec::new();
        for (key, session) in cache.iter_mut() {
            let expired = session
                .lock
                .as_ref()
                .is_some_and(|lock| lock.expires_at <= now);
            if !expired || in_flight.contains(key) {
                continue;
            }
            session.lock = None;
            match self.view(&session.editor, None) {
                Ok(view) => {
                    debug!(key = key.as_str(), "editor lock released");
                    released.push((key.clone(), view));
                }
                Err(err) => warn!(%err, key = key.as_str(), "failed to render unlocked editor"),
            }
        }
        released
    }

    fn apply(
        &self,
        key: &str,
        token: &str,
        state: Option<EditorState>,
        payload_owner: Option<u64>,
        user: &UserProfile,
        now: Instant,
    ) -> Result<KeyboardView, SessionError> {
        self.record_user(user);

        let (cached, _in_flight) = {
            let mut table = self.table();
            if table.in_flight.contains(key) {
                debug!(key, user = user.id, "press rejected, session busy");
                return Err(SessionError::Busy);
            }
            let cached = match table.cache.get(key) {
                Some(session) => {
                    if let Some(holder) = session.holder(now) {
                        if holder.id != user.id {
                            debug!(key, user = user.id, owner = holder.id, "press rejected, locked");
                            return Err(SessionError::Locked { owner: holder.id });
                        }
                    }
                    Some(session.editor.clone())
                }
                None => {
                    if let Some(owner) = payload_owner.filter(|owner| *owner != user.id) {
                        debug!(key, user = user.id, owner, "press rejected, payload locked");
                        return Err(SessionError::Locked { owner });
                    }
                    None
                }
            };
            table.in_flight.insert(key.to_string());
            (cached, InFlight { manager: self, key })
        };

        let mut editor = match cached {
            Some(editor) => editor,
            None => self.reconstruct(key, state)?,
        };
        let before = editor.text().to_string();

        self.dispatcher.process(&mut editor, token)?;
        let view = self.view(&editor, Some(user))?;

        if editor.text() != before {
            if let Err(err) = self.store.save_text(key, editor.text()) {
                warn!(%err, key, "failed to persist editor text");
            }
        }

        self.table().cache.put(
            key.to_string(),
            EditSession {
                editor,
                lock: Some(self.lock_for(user, now)),
            },
        );
        Ok(view)
    }

    /// Rebuild an evicted editor from its stored text.
    fn reconstruct(&self, key: &str, state: Option<EditorState>) -> Result<Editor, SessionError> {
        let Some(state) = state else {
            return Err(SessionError::UnknownSession(key.to_string()));
        };
        let text = match self.store.load_text(key) {
            Ok(text) => text,
            Err(err) => {
                warn!(%err, key, "failed to load editor text");
                None
            }
        };
        let text = text.ok_or_else(|| SessionError::UnknownSession(key.to_string()))?;
        debug!(key, mode = state.mode.bits(), caret = state.caret, "editor restored from store");
        Ok(self.editor_config.restore_editor(text, state))
    }

    fn lock_for(&self, owner: &UserProfile, now: Instant) -> EditLock {
        EditLock {
            owner: owner.clone(),
            expires_at: now + self.idle_timeout,
        }
    }

    fn view(&self, editor: &Editor, owner: Option<&UserProfile>) -> Result<KeyboardView, EditorError> {
        KeyboardView::build(editor, self.dispatcher.layouts(), owner, &self.blank_label)
    }

    fn record_user(&self, user: &UserProfile) {
        match self.store.record_user(user) {
            Ok(UserChange::Inserted) => debug!(user = user.id, "user recorded"),
            Ok(UserChange::Updated(fields)) => debug!(user = user.id, ?fields, "user updated"),
            Ok(UserChange::Unchanged) => {}
            Err(err) => warn!(%err, user = user.id, "failed to record user"),
        }
    }

    fn table(&self) -> MutexGuard<'_, SessionTable> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
