//! # Conch CLI
//!
//! The binary is intentionally thin: everything below lives in `cli/`, and this
//! file only invokes `cli::run()` and handles process termination.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (src/conch/cli/)                                 │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Paths, config, discovery and session wiring (commands.rs)│
//! │  - Terminal rendering of results (render.rs)                │
//! │  - rustyline and piped-stdin line sources (input.rs)        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Library (conch::session, conch::dispatch, ...)             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only startup failures (unreadable config, colliding command names,
//! malformed manifests) end the process with a non-zero status. Once the
//! session is running, every failure is reported and the prompt returns.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
