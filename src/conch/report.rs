//! Where user-visible output goes.
//!
//! Every diagnostic the shell produces is a [`CmdMessage`] passed to
//! [`Reporter::report`]; every command result is passed to [`Reporter::render`].
//! The terminal implementation lives in the binary. [`MemoryReporter`] records
//! everything and is what tests and embedders use.

use crate::command::{CmdMessage, CmdResult, MessageLevel};

pub trait Reporter {
    /// Shows a single message.
    fn report(&mut self, message: &CmdMessage);

    /// Shows a command result. The default shows its messages only.
    fn render(&mut self, result: &CmdResult) {
        for message in &result.messages {
            self.report(message);
        }
    }
}

/// Records reports and rendered results in order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub messages: Vec<CmdMessage>,
    pub results: Vec<CmdResult>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message, reported directly or inside a rendered result.
    pub fn contents(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.content.as_str()).collect()
    }

    pub fn errors(&self) -> Vec<&str> {
        self.messages
            .iter()
            .filter(|m| m.level == MessageLevel::Error)
            .map(|m| m.content.as_str())
            .collect()
    }

    /// Output text of every rendered result.
    pub fn text(&self) -> Vec<&str> {
        self.results
            .iter()
            .flat_map(|r| r.text.iter().map(String::as_str))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.results.is_empty()
    }
}

impl Reporter for MemoryReporter {
    fn report(&mut self, message: &CmdMessage) {
        self.messages.push(message.clone());
    }

    fn render(&mut self, result: &CmdResult) {
        self.messages.extend(result.messages.iter().cloned());
        self.results.push(result.clone());
    }
}
