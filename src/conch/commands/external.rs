//! Runs an external program declared by a manifest.
//!
//! The command takes no schema, so it receives the raw text after its keyword.
//! That text is shell-split and appended to the manifest's fixed arguments.

use crate::command::{CmdMessage, CmdResult, Command, CommandInput, CommandMeta, Context};
use crate::error::{Result, ShellError};
use crate::registry::manifest::Manifest;
use std::process::Command as Process;

pub struct ExternalCommand {
    meta: CommandMeta,
    program: String,
    args: Vec<String>,
}

impl ExternalCommand {
    pub fn from_manifest(manifest: Manifest) -> Self {
        let mut meta = CommandMeta::new(manifest.keyword, manifest.summary, manifest.help);
        meta.aliases.extend(manifest.aliases);
        Self {
            meta,
            program: manifest.program,
            args: manifest.args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Command for ExternalCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn run(&self, _ctx: &mut Context<'_>, input: &CommandInput) -> Result<CmdResult> {
        let extra = shell_words::split(input.raw())
            .map_err(|e| ShellError::Command(format!("{}: {}", self.meta.keyword, e)))?;

        tracing::debug!(program = %self.program, args = ?self.args, ?extra, "running external command");
        let output = Process::new(&self.program)
            .args(&self.args)
            .args(&extra)
            .output()
            .map_err(|e| ShellError::Command(format!("failed to run '{}': {}", self.program, e)))?;

        let mut result = CmdResult::default();
        result.text = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(String::from)
            .collect();
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            result.add_message(CmdMessage::warning(line));
        }
        if !output.status.success() {
            result.add_message(CmdMessage::error(format!(
                "'{}' exited with {}",
                self.program, output.status
            )));
        }
        Ok(result)
    }
}
