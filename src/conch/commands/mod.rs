//! # Built-in and External Commands
//!
//! Each command lives in its own submodule as a type implementing
//! [`crate::command::Command`].
//!
//! Commands are UI-agnostic. They never print, never read from the terminal
//! and never exit the process. Everything they want the user to see goes into
//! the returned [`crate::command::CmdResult`], and ending the session is a
//! [`crate::command::Flow`] value, not an exit.
//!
//! ## Testing Strategy
//!
//! Command tests run against [`crate::store::memory::InMemoryStore`] through
//! [`crate::test_utils::TestEnv`], binding real input lines so that schema and
//! behavior are tested together.
//!
//! ## Command Modules
//!
//! - [`exit`]: End the session (requires `--yes`)
//! - [`help`]: Help menu and per-command help
//! - [`workspace`]: List, create, delete, describe and switch workspaces
//! - [`external`]: Run an external program declared by a manifest

pub mod exit;
pub mod external;
pub mod help;
pub mod workspace;
