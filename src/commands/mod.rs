/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`     — interactive chat loop against the configured provider
- `sessions` — session management (list, new, rename, delete)

The handlers are intentionally small and use the library components:
the session store, the response parser, and the completion clients.
*/

pub mod chat;
pub mod sessions;
