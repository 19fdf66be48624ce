//! # CLI Layer
//!
//! The only place that knows about the terminal, the process environment and
//! exit codes.
//!
//! ## Input Selection
//!
//! 1. `-c/--command` lines, when given, are run in order and the process exits.
//! 2. An interactive terminal gets a rustyline editor with history and
//!    completion.
//! 3. Anything else (a pipe, a file) is read line by line without prompting.
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap
//! - `commands`: Startup wiring and the `run()` entry point
//! - `render`: Terminal output for command results
//! - `input`: Line sources for terminals and pipes

mod commands;
mod input;
mod render;
pub mod setup;

pub use commands::run;
