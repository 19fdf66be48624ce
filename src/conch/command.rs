//! # The Command Contract
//!
//! Every invokable unit of shell functionality implements [`Command`]: a
//! [`CommandMeta`] describing how it is invoked and documented, plus a single
//! [`Command::run`] entry point.
//!
//! Commands are values, constructed once when their source is loaded and never
//! mutated afterwards. Anything a command needs to change lives in the
//! [`Context`] it is handed for the duration of one run.
//!
//! Commands do not print. They return a [`CmdResult`] that the caller hands to a
//! [`crate::report::Reporter`], which is the only place that knows about the
//! terminal.

use crate::args::{ArgSchema, BoundArgs};
use crate::error::{Result, ShellError};
use crate::model::{ShellState, Workspace};
use crate::registry::Registry;
use crate::store::WorkspaceStore;
use std::collections::BTreeSet;

/// Static description of a command.
#[derive(Debug, Clone)]
pub struct CommandMeta {
    /// Canonical, unique invocation name
    pub keyword: String,
    /// Secondary invocation names; never contains `keyword`
    pub aliases: BTreeSet<String>,
    /// One-line description shown in the help menu
    pub summary: String,
    /// Text shown by `help <keyword>`
    pub long_help: String,
    /// `None` means the command receives the raw text after its keyword
    pub arguments: Option<ArgSchema>,
}

impl CommandMeta {
    pub fn new(
        keyword: impl Into<String>,
        summary: impl Into<String>,
        long_help: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            aliases: BTreeSet::new(),
            summary: summary.into(),
            long_help: long_help.into(),
            arguments: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }

    pub fn arguments(mut self, schema: ArgSchema) -> Self {
        self.arguments = Some(schema);
        self
    }

    /// The keyword followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.keyword.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Checks the metadata is complete enough to be registered.
    ///
    /// `origin` names where the definition came from and is only used in the error.
    pub fn validate(&self, origin: &str) -> Result<()> {
        let fail = |reason: String| Err(ShellError::invalid_definition(origin, reason));

        for name in self.names() {
            if name.is_empty() || name.chars().any(char::is_whitespace) {
                return fail(format!("invalid command name {:?}", name));
            }
        }
        if self.aliases.contains(&self.keyword) {
            return fail(format!(
                "'{}' lists its own keyword as an alias",
                self.keyword
            ));
        }
        if self.summary.trim().is_empty() {
            return fail(format!("'{}' has no summary", self.keyword));
        }
        if self.long_help.trim().is_empty() {
            return fail(format!("'{}' has no help text", self.keyword));
        }
        if let Some(schema) = &self.arguments {
            schema
                .validate()
                .or_else(|reason| fail(format!("'{}': {}", self.keyword, reason)))?;
        }
        Ok(())
    }
}

/// A single named, invokable unit of shell functionality.
pub trait Command {
    fn meta(&self) -> &CommandMeta;

    /// Executes the command.
    ///
    /// An `Err` is an operation failure: it is reported by the session loop,
    /// which then carries on reading lines.
    fn run(&self, ctx: &mut Context<'_>, input: &CommandInput) -> Result<CmdResult>;
}

/// What a command receives after its keyword has been stripped.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandInput {
    /// Arguments bound against the command's schema
    Bound(BoundArgs),
    /// Verbatim text after the keyword, for commands without a schema
    Raw(String),
}

impl CommandInput {
    /// Bound arguments, or an empty set for raw input.
    pub fn args(&self) -> &BoundArgs {
        match self {
            CommandInput::Bound(args) => args,
            CommandInput::Raw(_) => BoundArgs::empty(),
        }
    }

    /// The raw remainder, or an empty string for bound input.
    pub fn raw(&self) -> &str {
        match self {
            CommandInput::Raw(text) => text,
            CommandInput::Bound(_) => "",
        }
    }
}

/// Everything a command may touch while it runs.
pub struct Context<'a> {
    pub registry: &'a Registry,
    pub store: &'a mut dyn WorkspaceStore,
    pub state: &'a mut ShellState,
}

/// Control signal returned alongside every result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Flow {
    #[default]
    Continue,
    /// Ends the session; the only signal allowed past the dispatcher.
    EndOfSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// One row of the help menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub keyword: String,
    pub aliases: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedWorkspace {
    pub workspace: Workspace,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CmdResult {
    pub messages: Vec<CmdMessage>,
    pub help_entries: Vec<HelpEntry>,
    pub listed_workspaces: Vec<ListedWorkspace>,
    pub text: Vec<String>,
    pub flow: Flow,
}

impl CmdResult {
    pub fn end_session() -> Self {
        Self {
            flow: Flow::EndOfSession,
            ..Self::default()
        }
    }

    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_help_entries(mut self, entries: Vec<HelpEntry>) -> Self {
        self.help_entries = entries;
        self
    }

    pub fn with_listed_workspaces(mut self, workspaces: Vec<ListedWorkspace>) -> Self {
        self.listed_workspaces = workspaces;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text.push(text.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
            && self.help_entries.is_empty()
            && self.listed_workspaces.is_empty()
            && self.text.is_empty()
    }
}
