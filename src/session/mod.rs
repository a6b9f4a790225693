//! Chat session data model and storage
//!
//! This module owns the persistent conversation state: the `ChatSession`
//! and `ChatMessage` records, the blob persistence seam, and the
//! `SessionStore` that ties them together.

pub mod persistence;
pub mod store;

pub use persistence::{BlobStore, MemoryBlobStore, SledBlobStore, SESSIONS_KEY};
pub use store::SessionStore;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One conversation thread
///
/// The wire shape (camelCase field names) is the persisted JSON format:
/// `{id, title, createdAt, messages}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    /// Unique session identifier, assigned at creation, immutable
    pub id: Uuid,

    /// Human-readable label; never empty
    pub title: String,

    /// Creation timestamp, used only for default ordering
    pub created_at: DateTime<Utc>,

    /// Ordered message sequence, append-only
    pub messages: Vec<ChatMessage>,
}

impl ChatSession {
    /// Create a new session with the given title and no messages
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            created_at: Utc::now(),
            messages: Vec::new(),
        }
    }

    /// Short identifier prefix shown in listings
    pub fn short_id(&self) -> String {
        self.id.to_string()[..8].to_string()
    }
}

/// One turn in a conversation, immutable once constructed
///
/// Persisted as `{id, content, isUser}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Unique message identifier
    pub id: Uuid,

    /// Raw text as produced by the user or the completion client;
    /// may contain embedded labeled or unlabeled fenced code segments
    pub content: String,

    /// Provenance flag: true when authored by the human
    pub is_user: bool,
}

impl ChatMessage {
    /// Create a message authored by the human
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            is_user: true,
        }
    }

    /// Create a message returned by the assistant
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            is_user: false,
        }
    }
}
