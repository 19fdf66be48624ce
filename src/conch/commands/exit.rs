use crate::args::{ArgSchema, ArgSpec};
use crate::command::{CmdMessage, CmdResult, Command, CommandInput, CommandMeta, Context};
use crate::error::Result;

pub struct ExitCommand {
    meta: CommandMeta,
}

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        let meta = CommandMeta::new(
            "exit",
            "Exit the shell",
            "Ends the session. Pass --yes to confirm.",
        )
        .alias("quit")
        .arguments(ArgSchema::new().arg(ArgSpec::flag(&["-y", "--yes"], "Confirm exit")));
        Self { meta }
    }
}

impl Command for ExitCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn run(&self, _ctx: &mut Context<'_>, input: &CommandInput) -> Result<CmdResult> {
        if !input.args().flag("yes") {
            return Ok(CmdResult::default()
                .with_message(CmdMessage::warning("Exit not confirmed (use '--yes')")));
        }
        Ok(CmdResult::end_session())
    }
}
