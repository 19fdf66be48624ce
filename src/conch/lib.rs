//! # Conch Architecture
//!
//! Conch is an extensible interactive command shell. The library owns the
//! whole read, dispatch and report cycle; the binary only supplies a terminal
//! input source and a terminal reporter.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Session Loop (session.rs)                                  │
//! │  - Reads lines from a LineSource until EOF or exit          │
//! │  - Reports command failures and panics, keeps going         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Dispatcher (dispatch.rs)                                   │
//! │  - line.rs: shell-word parsing into keyword + tokens        │
//! │  - registry/: keyword and alias lookup                      │
//! │  - args.rs: schema binding with late-bound choices          │
//! │  - Reports parse, lookup and usage errors as one message    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Commands (command.rs contract, commands/*.rs)              │
//! │  - Return CmdResult values, never print                     │
//! │  - Only EndOfSession crosses back past the dispatcher       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - WorkspaceStore trait                                     │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup
//!
//! Commands are discovered exactly once, before the first line is read:
//!
//! 1. Every [`registry::CommandSource`] is loaded, skipping disabled entries.
//! 2. Each command's metadata is validated and its names are indexed.
//! 3. A keyword or alias claimed twice aborts startup with
//!    [`error::ShellError::DuplicateKeyword`].
//!
//! The registry is immutable from then on and is handed to the dispatcher by
//! value; there is no global command table.
//!
//! ## Testing Strategy
//!
//! Almost everything is tested in-process: commands through
//! [`test_utils::TestEnv`] over an in-memory store, the dispatcher and session
//! against a [`report::MemoryReporter`] and a scripted input. The end-to-end
//! tests in `tests/` drive the real binary through piped stdin.

pub mod args;
pub mod command;
pub mod commands;
pub mod completion;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod line;
pub mod model;
pub mod registry;
pub mod report;
pub mod session;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
