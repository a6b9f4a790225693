//! Parley - chat client library for LLM HTTP endpoints
//!
//! This library provides the core functionality for the Parley chat
//! client: persistent chat sessions, response content parsing, and
//! completion provider clients.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `session`: chat session records, blob persistence, and the session store
//! - `response_parser`: extraction of labeled code segments from reply text
//! - `providers`: completion client abstraction and implementations
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//! - `commands`: CLI command handlers
//!
//! # Example
//!
//! ```
//! use parley::session::{ChatMessage, MemoryBlobStore, SessionStore};
//!
//! let mut store = SessionStore::open(MemoryBlobStore::new());
//! let id = store.selected_session().unwrap().id;
//! store.add_message(id, ChatMessage::user("Hello!"));
//! assert_eq!(store.selected_session().unwrap().messages.len(), 1);
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod providers;
pub mod response_parser;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use error::{ParleyError, Result};
pub use response_parser::{CodeSegment, ResponseParser};
pub use session::{ChatMessage, ChatSession, SessionStore};
