//! # Rendering Module
//!
//! Turns [`CmdResult`]s into terminal output. Layout (column widths,
//! truncation, padding) is computed on plain text with `unicode-width`; color is
//! applied afterwards so escape codes never affect alignment.

use chrono::{DateTime, Utc};
use colored::*;
use conch::command::{CmdMessage, CmdResult, HelpEntry, ListedWorkspace, MessageLevel};
use conch::report::Reporter;
use unicode_width::UnicodeWidthStr;

pub const LINE_WIDTH: usize = 100;
pub const TIME_WIDTH: usize = 14;
pub const CURRENT_MARKER: &str = "*";

/// Prints everything to stdout.
#[derive(Debug, Default)]
pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for TerminalReporter {
    fn report(&mut self, message: &CmdMessage) {
        print!("{}", render_messages(std::slice::from_ref(message)));
    }

    fn render(&mut self, result: &CmdResult) {
        print!("{}", render_result(result));
    }
}

pub fn render_result(result: &CmdResult) -> String {
    let mut output = String::new();
    if !result.help_entries.is_empty() {
        output.push_str(&render_help_menu(&result.help_entries));
    }
    if !result.listed_workspaces.is_empty() {
        output.push_str(&render_workspaces(&result.listed_workspaces));
    }
    for line in &result.text {
        output.push_str(line);
        output.push('\n');
    }
    output.push_str(&render_messages(&result.messages));
    output
}

pub fn render_messages(messages: &[CmdMessage]) -> String {
    messages
        .iter()
        .map(|msg| {
            let content = match msg.level {
                MessageLevel::Info => msg.content.dimmed(),
                MessageLevel::Success => msg.content.green(),
                MessageLevel::Warning => msg.content.yellow(),
                MessageLevel::Error => msg.content.red(),
            };
            format!("{}\n", content)
        })
        .collect()
}

fn render_help_menu(entries: &[HelpEntry]) -> String {
    const HEADERS: [&str; 3] = ["Command", "Aliases", "Description"];

    let aliases: Vec<String> = entries.iter().map(|e| e.aliases.join(", ")).collect();
    let keyword_width = entries
        .iter()
        .map(|e| e.keyword.width())
        .chain([HEADERS[0].width()])
        .max()
        .unwrap_or_default();
    let alias_width = aliases
        .iter()
        .map(|a| a.width())
        .chain([HEADERS[1].width()])
        .max()
        .unwrap_or_default();
    let summary_width = LINE_WIDTH.saturating_sub(keyword_width + alias_width + 4);

    let mut output = format!(
        "{}{}  {}{}  {}\n",
        HEADERS[0].bold(),
        pad(HEADERS[0], keyword_width),
        HEADERS[1].bold(),
        pad(HEADERS[1], alias_width),
        HEADERS[2].bold()
    );
    for (entry, aliases) in entries.iter().zip(&aliases) {
        output.push_str(&format!(
            "{}{}  {}{}  {}\n",
            entry.keyword.cyan(),
            pad(&entry.keyword, keyword_width),
            aliases.dimmed(),
            pad(aliases, alias_width),
            truncate_to_width(&entry.summary, summary_width)
        ));
    }
    output
}

fn render_workspaces(workspaces: &[ListedWorkspace]) -> String {
    let name_width = workspaces
        .iter()
        .map(|l| l.workspace.name.width())
        .max()
        .unwrap_or_default();
    let description_width = LINE_WIDTH.saturating_sub(name_width + TIME_WIDTH + 6);

    workspaces
        .iter()
        .map(|listed| {
            let ws = &listed.workspace;
            let marker = if listed.is_current { CURRENT_MARKER } else { " " };
            let name = if listed.is_current {
                ws.name.bold()
            } else {
                ws.name.normal()
            };
            let description = truncate_to_width(&ws.description, description_width);
            let padding = description_width.saturating_sub(description.width());
            format!(
                "{} {}{}  {}{}  {}\n",
                marker.yellow(),
                name,
                pad(&ws.name, name_width),
                description,
                " ".repeat(padding),
                format_time_ago(ws.updated_at.unwrap_or(ws.created_at)).dimmed()
            )
        })
        .collect()
}

fn pad(s: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(s.width()))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    let limit = max_width.saturating_sub(1);

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > limit {
            break;
        }
        result.push(c);
        current_width += char_width;
    }
    result.push('…');
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
