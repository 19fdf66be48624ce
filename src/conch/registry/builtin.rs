use super::CommandSource;
use crate::command::Command;
use crate::commands::{exit::ExitCommand, help::HelpCommand, workspace::WorkspaceCommand};
use crate::error::Result;
use std::collections::BTreeSet;

type Constructor = fn() -> Box<dyn Command>;

static BUILTINS: &[(&str, Constructor)] = &[
    ("exit", exit),
    ("help", help),
    ("workspace", workspace),
];

fn exit() -> Box<dyn Command> {
    Box::new(ExitCommand::new())
}

fn help() -> Box<dyn Command> {
    Box::new(HelpCommand::new())
}

fn workspace() -> Box<dyn Command> {
    Box::new(WorkspaceCommand::new())
}

/// The commands compiled into the shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinSource;

impl BuiltinSource {
    pub fn entry_names() -> impl Iterator<Item = &'static str> {
        BUILTINS.iter().map(|(name, _)| *name)
    }
}

impl CommandSource for BuiltinSource {
    fn name(&self) -> &str {
        "builtin"
    }

    fn load(&self, skip: &BTreeSet<String>) -> Result<Vec<Box<dyn Command>>> {
        Ok(BUILTINS
            .iter()
            .filter(|(name, _)| {
                let skipped = skip.contains(*name);
                if skipped {
                    tracing::debug!(name, "builtin command disabled");
                }
                !skipped
            })
            .map(|(_, construct)| construct())
            .collect())
    }
}
