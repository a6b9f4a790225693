//! Completion client trait and common wire types
//!
//! Defines the boundary contract with third-party completion endpoints:
//! send the conversation so far, get one assistant string back, or fail
//! with a transport/decode error. Callers substitute a user-visible error
//! message on failure; a provider failure never ends the conversation.

use crate::error::Result;
use crate::session::ChatSession;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One role-tagged message on the provider wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatTurn {
    /// Creates a new user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Map a stored session onto the provider wire format
///
/// Provenance flags become roles: user-authored messages are `user`,
/// everything else is `assistant`.
///
/// # Examples
///
/// ```
/// use parley::providers::conversation_turns;
/// use parley::session::{ChatMessage, ChatSession};
///
/// let mut session = ChatSession::new("demo");
/// session.messages.push(ChatMessage::user("hi"));
/// session.messages.push(ChatMessage::assistant("hello"));
///
/// let turns = conversation_turns(&session);
/// assert_eq!(turns[0].role, "user");
/// assert_eq!(turns[1].role, "assistant");
/// ```
pub fn conversation_turns(session: &ChatSession) -> Vec<ChatTurn> {
    session
        .messages
        .iter()
        .map(|m| {
            if m.is_user {
                ChatTurn::user(&m.content)
            } else {
                ChatTurn::assistant(&m.content)
            }
        })
        .collect()
}

/// Chat completion client boundary
///
/// Implementations own their HTTP plumbing and wire DTOs; the rest of the
/// application only sees this contract.
#[async_trait]
pub trait CompletionClient: Send + Sync + std::fmt::Debug {
    /// Send the conversation and return the assistant's reply text
    ///
    /// # Arguments
    ///
    /// * `turns` - The conversation so far, oldest first
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Provider` (or an HTTP error) on transport
    /// failure, non-success status, or a malformed response body.
    async fn send_message(&self, turns: &[ChatTurn]) -> Result<String>;

    /// Short provider name for logging and display
    fn name(&self) -> &str;
}
