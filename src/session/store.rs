//! Chat session store
//!
//! Single source of truth for all chat sessions and the current selection,
//! durable across process restarts. The full session list is re-serialized
//! and written through the blob store after every mutation; persistence
//! failures are logged and swallowed so the in-memory state stays
//! authoritative for the rest of the process.

use crate::session::persistence::{BlobStore, SESSIONS_KEY};
use crate::session::{ChatMessage, ChatSession};
use uuid::Uuid;

/// Title used when a rename trims down to nothing
const FALLBACK_TITLE: &str = "New Chat";

/// Store of chat sessions with one active selection
///
/// Constructed once per process. Loads persisted state at construction, or
/// synthesizes a single default session when nothing usable is stored.
/// Mutators take `&mut self`, so concurrent mutation is ruled out by the
/// borrow checker; drive the store from a single task.
///
/// # Examples
///
/// ```
/// use parley::session::{ChatMessage, MemoryBlobStore, SessionStore};
///
/// let mut store = SessionStore::open(MemoryBlobStore::new());
/// let id = store.selected_session().unwrap().id;
/// store.add_message(id, ChatMessage::user("hello"));
/// assert_eq!(store.selected_session().unwrap().messages.len(), 1);
/// ```
pub struct SessionStore<S: BlobStore> {
    blobs: S,
    sessions: Vec<ChatSession>,
    selected: Option<Uuid>,
}

impl<S: BlobStore> SessionStore<S> {
    /// Open a session store over the given persistence facility
    ///
    /// Loads persisted sessions immediately; see [`SessionStore::load`].
    pub fn open(blobs: S) -> Self {
        let mut store = Self {
            blobs,
            sessions: Vec::new(),
            selected: None,
        };
        store.load();
        store
    }

    /// Load persisted sessions, replacing in-memory state
    ///
    /// On successful decode the sessions are sorted by creation time
    /// descending (most recent first) and the first one is selected.
    /// Missing or undecodable data is a recovery path, not a failure:
    /// the store falls back to a single default session and no error is
    /// surfaced to the caller.
    pub fn load(&mut self) {
        self.sessions.clear();
        self.selected = None;

        match self.blobs.get(SESSIONS_KEY) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<ChatSession>>(&bytes) {
                Ok(mut sessions) => {
                    sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                    self.sessions = sessions;
                    self.selected = self.sessions.first().map(|s| s.id);
                    tracing::debug!(count = self.sessions.len(), "Loaded persisted sessions");
                }
                Err(e) => {
                    tracing::warn!("Discarding undecodable session blob: {}", e);
                }
            },
            Ok(None) => {
                tracing::debug!("No persisted sessions found");
            }
            Err(e) => {
                tracing::warn!("Failed to read persisted sessions: {}", e);
            }
        }

        self.ensure_active_chat();
    }

    /// Restore the store invariants: at least one session, valid selection
    ///
    /// Idempotent. An empty list gets a fresh default session; a missing or
    /// stale selection moves to the first (most recent) session.
    pub fn ensure_active_chat(&mut self) {
        if self.sessions.is_empty() {
            self.create_new_chat();
            return;
        }

        let selection_valid = self
            .selected
            .is_some_and(|id| self.sessions.iter().any(|s| s.id == id));
        if !selection_valid {
            self.selected = self.sessions.first().map(|s| s.id);
        }
    }

    /// Create a default-titled session, select it, and persist
    ///
    /// The title is `"New Chat <count+1>"` from the live session count, so
    /// numbers can be reused after deletions. Returns the new session id.
    pub fn create_new_chat(&mut self) -> Uuid {
        let title = format!("New Chat {}", self.sessions.len() + 1);
        let session = ChatSession::new(title);
        let id = session.id;

        self.sessions.insert(0, session);
        self.selected = Some(id);
        self.persist();

        tracing::debug!(%id, "Created new chat session");
        id
    }

    /// Delete the session with the given id and persist
    ///
    /// When the deleted session was selected, selection moves to the new
    /// first session. The store never ends up empty: deleting the last
    /// session immediately creates a fresh default one.
    pub fn delete_chat(&mut self, id: Uuid) {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            tracing::debug!(%id, "Delete requested for unknown session");
        }

        if self.selected == Some(id) {
            self.selected = self.sessions.first().map(|s| s.id);
        }

        self.ensure_active_chat();
        self.persist();
    }

    /// Rename a session, normalizing the title, and persist
    ///
    /// The new title is trimmed; a title that trims to nothing falls back
    /// to `"New Chat"`. Returns false (and does not persist) when the id
    /// is unknown.
    pub fn update_chat_title(&mut self, id: Uuid, new_title: &str) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            tracing::debug!(%id, "Rename requested for unknown session");
            return false;
        };

        let trimmed = new_title.trim();
        session.title = if trimmed.is_empty() {
            FALLBACK_TITLE.to_string()
        } else {
            trimmed.to_string()
        };

        self.persist();
        true
    }

    /// Append a message to a session and persist
    ///
    /// Returns false (and does not persist) when the session id is unknown.
    pub fn add_message(&mut self, session_id: Uuid, message: ChatMessage) -> bool {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == session_id) else {
            tracing::debug!(%session_id, "Message appended to unknown session");
            return false;
        };

        session.messages.push(message);
        self.persist();
        true
    }

    /// Make the session with the given id the active one
    ///
    /// Selection is presentation state: it is not persisted and is
    /// recomputed on load. Returns false when the id is unknown.
    pub fn select(&mut self, id: Uuid) -> bool {
        if self.sessions.iter().any(|s| s.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// The currently selected session, if the selection is valid
    pub fn selected_session(&self) -> Option<&ChatSession> {
        self.selected
            .and_then(|id| self.sessions.iter().find(|s| s.id == id))
    }

    /// All sessions in presentation order (most recently created first
    /// after load; new sessions are inserted at the front)
    pub fn sessions(&self) -> &[ChatSession] {
        &self.sessions
    }

    /// Find a session whose id string starts with the given prefix
    ///
    /// Returns None when the prefix is empty, matches nothing, or is
    /// ambiguous. Rejecting the empty prefix keeps destructive commands
    /// from resolving against a single-session store by accident.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<&ChatSession> {
        if prefix.is_empty() {
            return None;
        }

        let mut matches = self
            .sessions
            .iter()
            .filter(|s| s.id.to_string().starts_with(prefix));
        let first = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// Serialize the full session list and write it through the blob store
    ///
    /// Failures are logged and swallowed: the in-memory state remains
    /// authoritative for the rest of the process lifetime.
    fn persist(&self) {
        let bytes = match serde_json::to_vec(&self.sessions) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to serialize sessions, keeping in-memory state: {}", e);
                return;
            }
        };

        if let Err(e) = self.blobs.set(SESSIONS_KEY, &bytes) {
            tracing::warn!("Failed to persist sessions, keeping in-memory state: {}", e);
        }
    }
}
