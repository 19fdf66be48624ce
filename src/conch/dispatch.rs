//! # Dispatcher
//!
//! Runs one line through parse, lookup, bind and execute.
//!
//! Every failure up to the point a command starts running is turned into a
//! single reported message and a normal return:
//!
//! | Failure | Reported as |
//! |---------|-------------|
//! | unbalanced quoting | `Error: no closing quotation` |
//! | unknown keyword | `Error: '<keyword>' unknown command` |
//! | bad arguments | `Incorrect arguments: <detail>` |
//!
//! `-h`/`--help` is not a failure: the command's help is rendered instead.
//!
//! What a command does once it runs is passed back as-is. A returned
//! [`Flow::EndOfSession`] is the only signal meant to stop the caller, and an
//! `Err` from the command is left for the session loop to report.

use crate::args::{bind, BindError};
use crate::command::{CmdMessage, CmdResult, Command, CommandInput, Context, Flow};
use crate::error::Result;
use crate::line::{parse_line, ParsedLine};
use crate::model::ShellState;
use crate::registry::Registry;
use crate::report::Reporter;
use crate::store::WorkspaceStore;

pub struct Dispatcher<S: WorkspaceStore> {
    registry: Registry,
    store: S,
    state: ShellState,
}

impl<S: WorkspaceStore> Dispatcher<S> {
    pub fn new(registry: Registry, store: S, state: ShellState) -> Self {
        Self {
            registry,
            store,
            state,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> &ShellState {
        &self.state
    }

    pub fn dispatch(&mut self, line: &str, out: &mut dyn Reporter) -> Result<Flow> {
        let parsed = match parse_line(line) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                out.report(&CmdMessage::error(format!("Error: {}", e)));
                return Ok(Flow::Continue);
            }
        };

        let Some(command) = self.registry.lookup(&parsed.keyword) else {
            out.report(&CmdMessage::error(format!(
                "Error: '{}' unknown command",
                parsed.keyword
            )));
            return Ok(Flow::Continue);
        };
        tracing::debug!(
            keyword = %parsed.keyword,
            command = %command.meta().keyword,
            "dispatching"
        );

        let input = match prepare_input(command, &parsed, &self.registry) {
            Ok(input) => input,
            Err(BindError::HelpRequested(help)) => {
                out.render(&CmdResult::default().with_text(help.trim_end()));
                return Ok(Flow::Continue);
            }
            Err(e) => {
                tracing::debug!(keyword = %parsed.keyword, error = %e, "usage error");
                out.report(&CmdMessage::error(format!("Incorrect arguments: {}", e)));
                return Ok(Flow::Continue);
            }
        };

        let mut ctx = Context {
            registry: &self.registry,
            store: &mut self.store,
            state: &mut self.state,
        };
        let result = command.run(&mut ctx, &input)?;
        out.render(&result);
        Ok(result.flow)
    }
}

/// What a command receives for a parsed line.
///
/// Commands with a non-empty schema get bound arguments; the rest get the raw
/// remainder of the line.
pub fn prepare_input(
    command: &dyn Command,
    parsed: &ParsedLine,
    registry: &Registry,
) -> std::result::Result<CommandInput, BindError> {
    let meta = command.meta();
    match meta.arguments.as_ref().filter(|schema| !schema.is_empty()) {
        Some(schema) => bind(&parsed.tokens, meta, schema, registry).map(CommandInput::Bound),
        None => Ok(CommandInput::Raw(parsed.remainder.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{ArgSchema, ArgSpec};
    use crate::error::ShellError;
    use crate::registry::builtin::BuiltinSource;
    use crate::report::MemoryReporter;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;
    use crate::test_utils::StubCommand;
    use std::collections::BTreeSet;

    fn dispatcher() -> Dispatcher<InMemoryStore> {
        let registry = Registry::discover(&[&BuiltinSource], &BTreeSet::new()).unwrap();
        Dispatcher::new(
            registry,
            StoreFixture::new().with_default().store,
            ShellState::default(),
        )
    }

    fn stub_dispatcher(commands: Vec<Box<dyn Command>>) -> Dispatcher<InMemoryStore> {
        Dispatcher::new(
            Registry::from_commands(commands).unwrap(),
            InMemoryStore::new(),
            ShellState::default(),
        )
    }

    #[test]
    fn whitespace_lines_are_a_no_op() {
        let mut d = dispatcher();
        for line in ["", "   ", "\t", "  \n "] {
            let mut out = MemoryReporter::new();
            assert_eq!(d.dispatch(line, &mut out).unwrap(), Flow::Continue);
            assert!(out.is_empty(), "{:?} reported {:?}", line, out.messages);
        }
    }

    #[test]
    fn unknown_keyword_is_reported_quoted() {
        let mut d = dispatcher();
        for keyword in ["frobnicate", "x", "exit2"] {
            let mut out = MemoryReporter::new();
            let flow = d.dispatch(&format!("{} --some args", keyword), &mut out).unwrap();
            assert_eq!(flow, Flow::Continue);
            assert_eq!(
                out.contents(),
                vec![format!("Error: '{}' unknown command", keyword)]
            );
        }
    }

    #[test]
    fn unterminated_quote_is_reported_once() {
        let mut d = dispatcher();
        let mut out = MemoryReporter::new();
        assert_eq!(d.dispatch("'unterminated", &mut out).unwrap(), Flow::Continue);
        assert_eq!(out.errors().len(), 1);
        assert!(out.errors()[0].starts_with("Error:"));
        assert_eq!(d.state().current_workspace, "default");
    }

    #[test]
    fn exit_without_confirmation_continues() {
        let mut d = dispatcher();
        let mut out = MemoryReporter::new();
        assert_eq!(d.dispatch("exit", &mut out).unwrap(), Flow::Continue);
        assert!(out.contents()[0].contains("not confirmed"));
    }

    #[test]
    fn confirmed_exit_propagates_end_of_session() {
        let mut d = dispatcher();
        let mut out = MemoryReporter::new();
        assert_eq!(d.dispatch("exit --yes", &mut out).unwrap(), Flow::EndOfSession);
    }

    #[test]
    fn usage_errors_are_reported_as_incorrect_arguments() {
        let mut d = dispatcher();
        for line in ["help badtopic", "exit --force", "workspace a --add --delete"] {
            let mut out = MemoryReporter::new();
            assert_eq!(d.dispatch(line, &mut out).unwrap(), Flow::Continue);
            assert_eq!(out.errors().len(), 1, "{}", line);
            assert!(
                out.errors()[0].starts_with("Incorrect arguments"),
                "{}: {}",
                line,
                out.errors()[0]
            );
        }
    }

    #[test]
    fn help_flag_renders_command_help() {
        let mut d = dispatcher();
        let mut out = MemoryReporter::new();
        assert_eq!(d.dispatch("exit --help", &mut out).unwrap(), Flow::Continue);
        assert!(out.errors().is_empty());
        assert!(out.text()[0].contains("--yes"));
    }

    #[test]
    fn schemaless_commands_get_the_raw_remainder() {
        let mut d = stub_dispatcher(vec![Box::new(StubCommand::new("say"))]);
        let mut out = MemoryReporter::new();
        d.dispatch("say  hello   'big world'", &mut out).unwrap();
        assert_eq!(out.text(), vec!["say raw= hello   'big world'"]);
    }

    #[test]
    fn bound_tokens_are_unescaped() {
        let schema = ArgSchema::new().arg(ArgSpec::positional("word", "Word"));
        let mut d = stub_dispatcher(vec![Box::new(StubCommand::new("echo").arguments(schema))]);
        let mut out = MemoryReporter::new();
        d.dispatch(r"echo 'a\tb'", &mut out).unwrap();
        assert!(out.text()[0].contains(r#"Text("a\tb")"#), "{}", out.text()[0]);
    }

    #[test]
    fn command_failures_are_returned_to_the_caller() {
        let mut d = stub_dispatcher(vec![Box::new(StubCommand::new("boom").failing())]);
        let mut out = MemoryReporter::new();
        let result = d.dispatch("boom", &mut out);
        assert!(matches!(result, Err(ShellError::Command(_))));
        assert!(out.is_empty());
    }

    #[test]
    fn commands_can_change_session_state() {
        let mut d = dispatcher();
        let mut out = MemoryReporter::new();
        d.dispatch("workspace --add lab", &mut out).unwrap();
        d.dispatch("workspace lab", &mut out).unwrap();
        assert_eq!(d.state().current_workspace, "lab");
        assert!(d.store().exists("lab").unwrap());
    }
}
