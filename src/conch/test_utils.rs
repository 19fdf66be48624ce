use crate::args::{ArgSchema, BindError, BoundArgs};
use crate::command::{CmdResult, Command, CommandInput, CommandMeta, Context};
use crate::dispatch::prepare_input;
use crate::error::{Result, ShellError};
use crate::line::parse_line;
use crate::model::ShellState;
use crate::registry::builtin::BuiltinSource;
use crate::registry::Registry;
use crate::store::memory::fixtures::StoreFixture;
use crate::store::memory::InMemoryStore;
use std::collections::BTreeSet;

/// The builtin commands over an in-memory store holding the default workspace.
///
/// `run` feeds a line through parsing and binding and hands back the command's
/// result directly, with no reporter in between.
pub struct TestEnv {
    pub registry: Registry,
    pub store: InMemoryStore,
    pub state: ShellState,
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnv {
    pub fn new() -> Self {
        let registry = Registry::discover(&[&BuiltinSource], &BTreeSet::new())
            .expect("builtin commands should register");
        Self::with_registry(registry)
    }

    pub fn with_registry(registry: Registry) -> Self {
        Self {
            registry,
            store: StoreFixture::new().with_default().store,
            state: ShellState::default(),
        }
    }

    /// Execution context over this environment, for running commands directly.
    pub fn context(&mut self) -> Context<'_> {
        Context {
            registry: &self.registry,
            store: &mut self.store,
            state: &mut self.state,
        }
    }

    /// Parses and binds a line without running it.
    pub fn bind(&self, line: &str) -> std::result::Result<BoundArgs, BindError> {
        let parsed = parse_line(line)
            .expect("line should parse")
            .expect("line should not be blank");
        let command = self
            .registry
            .lookup(&parsed.keyword)
            .expect("command should exist");
        match prepare_input(command, &parsed, &self.registry)? {
            CommandInput::Bound(args) => Ok(args),
            CommandInput::Raw(_) => Ok(BoundArgs::default()),
        }
    }

    /// Runs a line, panicking if it does not parse or bind.
    pub fn run(&mut self, line: &str) -> Result<CmdResult> {
        let parsed = parse_line(line)
            .expect("line should parse")
            .expect("line should not be blank");
        let command = self
            .registry
            .lookup(&parsed.keyword)
            .expect("command should exist");
        let input = prepare_input(command, &parsed, &self.registry).expect("line should bind");
        let mut ctx = Context {
            registry: &self.registry,
            store: &mut self.store,
            state: &mut self.state,
        };
        command.run(&mut ctx, &input)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Behavior {
    Echo,
    Fail,
    Panic,
    End,
}

/// A configurable command for exercising the registry, dispatcher and session.
///
/// By default it echoes what it received as output text:
/// `<keyword> raw=<remainder>` for raw input, `<keyword> args=<bound>` otherwise.
pub struct StubCommand {
    meta: CommandMeta,
    behavior: Behavior,
}

impl StubCommand {
    pub fn new(keyword: &str) -> Self {
        Self {
            meta: CommandMeta::new(keyword, format!("The {} command", keyword), "Stub help."),
            behavior: Behavior::Echo,
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.meta = self.meta.alias(alias);
        self
    }

    pub fn arguments(mut self, schema: ArgSchema) -> Self {
        self.meta = self.meta.arguments(schema);
        self
    }

    pub fn failing(mut self) -> Self {
        self.behavior = Behavior::Fail;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.behavior = Behavior::Panic;
        self
    }

    pub fn ending(mut self) -> Self {
        self.behavior = Behavior::End;
        self
    }
}

impl Command for StubCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn run(&self, _ctx: &mut Context<'_>, input: &CommandInput) -> Result<CmdResult> {
        match self.behavior {
            Behavior::Echo => {
                let text = match input {
                    CommandInput::Raw(raw) => format!("{} raw={}", self.meta.keyword, raw),
                    CommandInput::Bound(args) => format!("{} args={:?}", self.meta.keyword, args),
                };
                Ok(CmdResult::default().with_text(text))
            }
            Behavior::Fail => Err(ShellError::Command(format!(
                "{} failed",
                self.meta.keyword
            ))),
            Behavior::Panic => panic!("{} exploded", self.meta.keyword),
            Behavior::End => Ok(CmdResult::end_session()),
        }
    }
}
