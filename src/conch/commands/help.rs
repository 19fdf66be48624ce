use crate::args::{self, ArgSchema, ArgSpec, Choices, Complete};
use crate::command::{CmdResult, Command, CommandInput, CommandMeta, Context, HelpEntry};
use crate::error::{Result, ShellError};
use crate::registry::Registry;

pub struct HelpCommand {
    meta: CommandMeta,
}

impl Default for HelpCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpCommand {
    pub fn new() -> Self {
        // Topic choices are resolved against the registry each time the line is
        // bound, so this command can describe itself and everything loaded after it.
        let topic = ArgSpec::positional("topic", "Command to describe")
            .choices(Choices::KeywordsAndAliases)
            .complete(Complete::Choices);
        let meta = CommandMeta::new(
            "help",
            "List commands or describe one",
            "Without a topic, lists every command with its aliases and summary.\n\
             With a topic, shows the full help and usage of that command.",
        )
        .alias("?")
        .arguments(ArgSchema::new().arg(topic));
        Self { meta }
    }
}

impl Command for HelpCommand {
    fn meta(&self) -> &CommandMeta {
        &self.meta
    }

    fn run(&self, ctx: &mut Context<'_>, input: &CommandInput) -> Result<CmdResult> {
        match input.args().text("topic") {
            None => Ok(CmdResult::default().with_help_entries(menu(ctx.registry))),
            Some(topic) => describe(ctx.registry, topic),
        }
    }
}

pub fn menu(registry: &Registry) -> Vec<HelpEntry> {
    registry
        .commands()
        .map(|command| {
            let meta = command.meta();
            HelpEntry {
                keyword: meta.keyword.clone(),
                aliases: meta.aliases.iter().cloned().collect(),
                summary: meta.summary.clone(),
            }
        })
        .collect()
}

fn describe(registry: &Registry, topic: &str) -> Result<CmdResult> {
    let meta = registry
        .lookup(topic)
        .map(|command| command.meta())
        .ok_or_else(|| ShellError::Command(format!("'{}' unknown command", topic)))?;

    let mut result = CmdResult::default().with_text(meta.long_help.trim_end());
    if !meta.aliases.is_empty() {
        let aliases: Vec<&str> = meta.aliases.iter().map(String::as_str).collect();
        result = result.with_text(format!("Aliases: {}", aliases.join(", ")));
    }
    let usage = match meta.arguments.as_ref().filter(|schema| !schema.is_empty()) {
        Some(schema) => args::usage(meta, schema, registry),
        None => format!("Usage: {} [TEXT]...", meta.keyword),
    };
    Ok(result.with_text(usage))
}
