//! # Session Loop
//!
//! Reads lines from a [`LineSource`] and hands each to the [`Dispatcher`] until
//! the input ends or a command ends the session.
//!
//! ```text
//!   Running --line--> dispatch --Continue--> Running
//!      |                 |
//!      |                 +--EndOfSession--> Stopped
//!      +--EndOfInput-------------------->  Stopped
//! ```
//!
//! An interrupt abandons the line being read and prompts again. A command that
//! fails, or panics, is reported and the loop carries on.

use crate::command::{CmdMessage, Flow};
use crate::dispatch::Dispatcher;
use crate::error::Result;
use crate::report::Reporter;
use crate::store::WorkspaceStore;
use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Line(String),
    /// The pending read was cancelled (Ctrl-C)
    Interrupted,
    /// No more input (Ctrl-D, closed pipe)
    EndOfInput,
}

/// Where lines come from.
pub trait LineSource {
    /// Blocks until a line is available. `prompt` is shown where that makes sense.
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent>;
}

/// A fixed sequence of events, followed by end of input.
#[derive(Debug, Default, Clone)]
pub struct ScriptedInput {
    events: VecDeque<LineEvent>,
    prompts: Vec<String>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = LineEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
            prompts: Vec::new(),
        }
    }

    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::new(lines.into_iter().map(|l| LineEvent::Line(l.into())))
    }

    /// Prompts shown so far, in order.
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent> {
        self.prompts.push(prompt.to_string());
        Ok(self.events.pop_front().unwrap_or(LineEvent::EndOfInput))
    }
}

pub struct Session<I: LineSource, S: WorkspaceStore> {
    input: I,
    dispatcher: Dispatcher<S>,
    prompt_name: String,
    running: bool,
}

impl<I: LineSource, S: WorkspaceStore> Session<I, S> {
    pub fn new(input: I, dispatcher: Dispatcher<S>, prompt_name: impl Into<String>) -> Self {
        Self {
            input,
            dispatcher,
            prompt_name: prompt_name.into(),
            running: true,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "({}) {} > ",
            self.dispatcher.state().current_workspace,
            self.prompt_name
        )
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn dispatcher(&self) -> &Dispatcher<S> {
        &self.dispatcher
    }

    /// Runs until end of input or until a command ends the session.
    ///
    /// A stopped session stays stopped; calling `run` again returns at once.
    pub fn run(&mut self, out: &mut dyn Reporter) {
        if self.running {
            tracing::info!("session started");
        }

        while self.running {
            let prompt = self.prompt();
            let line = match self.input.read_line(&prompt) {
                Ok(LineEvent::Line(line)) => line,
                Ok(LineEvent::Interrupted) => continue,
                Ok(LineEvent::EndOfInput) => {
                    self.running = false;
                    break;
                }
                Err(e) => {
                    out.report(&CmdMessage::error(format!("Error: {}", e)));
                    self.running = false;
                    break;
                }
            };

            let dispatcher = &mut self.dispatcher;
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| dispatcher.dispatch(&line, out)));
            match outcome {
                Ok(Ok(Flow::Continue)) => {}
                Ok(Ok(Flow::EndOfSession)) => self.running = false,
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "command failed");
                    out.report(&CmdMessage::error(format!("Error: {}", e)));
                }
                Err(payload) => {
                    let reason = panic_reason(payload.as_ref());
                    tracing::warn!(reason = %reason, "command panicked");
                    out.report(&CmdMessage::error(format!("Error: {}", reason)));
                }
            }
        }

        tracing::info!("session stopped");
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "command panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShellError;
    use crate::model::ShellState;
    use crate::registry::builtin::BuiltinSource;
    use crate::registry::Registry;
    use crate::report::MemoryReporter;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use crate::test_utils::StubCommand;
    use std::collections::BTreeSet;

    fn builtin_session(input: ScriptedInput) -> Session<ScriptedInput, InMemoryStore> {
        let registry = Registry::discover(&[&BuiltinSource], &BTreeSet::new()).unwrap();
        let store = StoreFixture::new().with_default().store;
        Session::new(
            input,
            Dispatcher::new(registry, store, ShellState::default()),
            "conch",
        )
    }

    struct FailingInput;

    impl LineSource for FailingInput {
        fn read_line(&mut self, _prompt: &str) -> Result<LineEvent> {
            Err(ShellError::Input("terminal went away".into()))
        }
    }

    #[test]
    fn end_of_input_stops_the_session() {
        let mut session = builtin_session(ScriptedInput::default());
        let mut out = MemoryReporter::new();
        session.run(&mut out);
        assert!(!session.is_running());
        assert!(out.is_empty());
    }

    #[test]
    fn exit_stops_before_reading_further_lines() {
        let input = ScriptedInput::from_lines(["exit", "exit --yes", "help"]);
        let mut session = builtin_session(input);
        let mut out = MemoryReporter::new();
        session.run(&mut out);

        assert!(!session.is_running());
        assert_eq!(session.input().remaining(), 1);
        assert!(out.contents()[0].contains("not confirmed"));
    }

    #[test]
    fn interrupts_and_bad_lines_do_not_stop_the_session() {
        let input = ScriptedInput::new([
            LineEvent::Interrupted,
            LineEvent::Line("'unterminated".into()),
            LineEvent::Line("nope".into()),
            LineEvent::Line("help nope".into()),
            LineEvent::Interrupted,
            LineEvent::Line("workspace ghost".into()),
            LineEvent::Line("exit -y".into()),
        ]);
        let mut session = builtin_session(input);
        let mut out = MemoryReporter::new();
        session.run(&mut out);

        assert_eq!(out.errors().len(), 4);
        assert!(out.errors()[3].contains("ghost"));
        assert_eq!(session.input().remaining(), 0);
        assert_eq!(session.input().prompts().len(), 7);
    }

    #[test]
    fn panicking_command_is_reported_and_the_loop_continues() {
        let registry = Registry::from_commands(vec![
            Box::new(StubCommand::new("kaboom").panicking()),
            Box::new(StubCommand::new("bye").ending()),
        ])
        .unwrap();
        let input = ScriptedInput::from_lines(["kaboom", "bye"]);
        let mut session = Session::new(
            input,
            Dispatcher::new(registry, InMemoryStore::new(), ShellState::default()),
            "conch",
        );
        let mut out = MemoryReporter::new();
        session.run(&mut out);

        assert_eq!(out.errors(), vec!["Error: kaboom exploded"]);
        assert_eq!(session.input().remaining(), 0);
        assert!(!session.is_running());
    }

    #[test]
    fn input_failure_is_reported_and_stops() {
        let registry = Registry::default();
        let mut session = Session::new(
            FailingInput,
            Dispatcher::new(registry, InMemoryStore::new(), ShellState::default()),
            "conch",
        );
        let mut out = MemoryReporter::new();
        session.run(&mut out);
        assert!(!session.is_running());
        assert_eq!(out.errors(), vec!["Error: Input error: terminal went away"]);
    }

    #[test]
    fn prompt_follows_the_current_workspace() {
        let input = ScriptedInput::from_lines(["workspace --add lab", "workspace lab"]);
        let mut session = builtin_session(input);
        assert_eq!(session.prompt(), "(default) conch > ");

        session.run(&mut MemoryReporter::new());
        let prompts = session.input().prompts();
        assert_eq!(prompts[0], "(default) conch > ");
        assert_eq!(prompts[2], "(lab) conch > ");
    }

    #[test]
    fn stopped_session_does_not_read_again() {
        let mut session = builtin_session(ScriptedInput::from_lines(["exit --yes", "help"]));
        session.run(&mut MemoryReporter::new());
        session.run(&mut MemoryReporter::new());
        assert_eq!(session.input().remaining(), 1);
    }
}
