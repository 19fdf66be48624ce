//! # Argument Schema & Binder
//!
//! A command declares its arguments as an [`ArgSchema`]: an ordered list of
//! [`ArgSpec`]s plus groups of mutually exclusive arguments. [`bind`] turns the
//! tokens that followed the keyword into a [`BoundArgs`] bundle or a
//! [`BindError`].
//!
//! The heavy lifting is done by clap. A fresh `clap::Command` is built for every
//! bind, which is what lets choice sets be late-bound: [`Choices::Keywords`] and
//! [`Choices::KeywordsAndAliases`] are resolved against the registry at the
//! moment the line is bound, so a listing command can offer every command,
//! itself included, without knowing about them when it is constructed.
//!
//! clap's usage errors are returned as values here; nothing in this module
//! exits the process.

use crate::command::CommandMeta;
use crate::registry::Registry;
use clap::builder::PossibleValuesParser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgGroup, ColorChoice};
use std::collections::{BTreeMap, BTreeSet};
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Present or absent, takes no value
    Flag,
    Text,
    Integer,
}

/// Completion hint for an argument's values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Complete {
    /// Offer the argument's choice set
    Choices,
    #[default]
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choices {
    Static(Vec<String>),
    /// Every canonical keyword known to the registry
    Keywords,
    /// Every keyword and alias known to the registry
    KeywordsAndAliases,
}

impl Choices {
    pub fn resolve(&self, registry: &Registry) -> Vec<String> {
        match self {
            Choices::Static(values) => values.clone(),
            Choices::Keywords => registry.keywords().into_iter().collect(),
            Choices::KeywordsAndAliases => registry.all_keywords().into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgSpec {
    /// Flag forms (`-y`, `--yes`) or a single positional name (`topic`)
    pub names: Vec<String>,
    pub value_type: ValueType,
    pub required: bool,
    pub default: Option<String>,
    pub choices: Option<Choices>,
    pub complete: Complete,
    pub help: String,
}

impl ArgSpec {
    fn new(names: &[&str], value_type: ValueType, help: &str) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            value_type,
            required: false,
            default: None,
            choices: None,
            complete: Complete::Nothing,
            help: help.to_string(),
        }
    }

    pub fn flag(names: &[&str], help: &str) -> Self {
        Self::new(names, ValueType::Flag, help)
    }

    pub fn option(names: &[&str], help: &str) -> Self {
        Self::new(names, ValueType::Text, help)
    }

    pub fn positional(name: &str, help: &str) -> Self {
        Self::new(&[name], ValueType::Text, help)
    }

    pub fn integer(mut self) -> Self {
        self.value_type = ValueType::Integer;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn choices(mut self, choices: Choices) -> Self {
        self.choices = Some(choices);
        self
    }

    pub fn complete(mut self, complete: Complete) -> Self {
        self.complete = complete;
        self
    }

    pub fn is_positional(&self) -> bool {
        self.names.first().is_some_and(|n| !n.starts_with('-'))
    }

    /// Key the bound value is stored under.
    ///
    /// The first long form wins (`--desc,--description` binds as `desc`), then
    /// the first short form, then the positional name.
    pub fn dest(&self) -> String {
        let name = self
            .names
            .iter()
            .find_map(|n| n.strip_prefix("--"))
            .or_else(|| self.names.iter().find_map(|n| n.strip_prefix('-')))
            .or_else(|| self.names.first().map(String::as_str))
            .unwrap_or_default();
        name.replace('-', "_")
    }

    /// Name used in diagnostics.
    pub fn display_name(&self) -> String {
        self.names
            .iter()
            .find(|n| n.starts_with("--"))
            .or_else(|| self.names.first())
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgSchema {
    specs: Vec<ArgSpec>,
    exclusive: Vec<Vec<String>>,
}

impl ArgSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, spec: ArgSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Declares that at most one of the given argument destinations may be supplied.
    pub fn exclusive(mut self, dests: &[&str]) -> Self {
        self.exclusive
            .push(dests.iter().map(|d| d.to_string()).collect());
        self
    }

    pub fn specs(&self) -> &[ArgSpec] {
        &self.specs
    }

    pub fn exclusive_groups(&self) -> &[Vec<String>] {
        &self.exclusive
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn find(&self, dest: &str) -> Option<&ArgSpec> {
        self.specs.iter().find(|s| s.dest() == dest)
    }

    /// Structural checks run when a command is registered.
    ///
    /// Anything that would make clap reject the schema at bind time is caught here.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen_names = BTreeSet::new();
        let mut seen_dests = BTreeSet::new();
        let mut optional_positional: Option<String> = None;

        for spec in &self.specs {
            if spec.names.is_empty() {
                return Err("argument without a name".to_string());
            }
            if spec.is_positional() {
                if spec.names.len() != 1 {
                    return Err(format!("positional '{}' has several names", spec.names[0]));
                }
                if spec.value_type == ValueType::Flag {
                    return Err(format!("positional '{}' cannot be a flag", spec.names[0]));
                }
                if spec.required {
                    if let Some(earlier) = &optional_positional {
                        return Err(format!(
                            "required positional '{}' follows optional '{}'",
                            spec.names[0], earlier
                        ));
                    }
                } else if optional_positional.is_none() {
                    optional_positional = Some(spec.names[0].clone());
                }
            } else {
                for name in &spec.names {
                    let valid = match name.strip_prefix("--") {
                        Some(long) => !long.is_empty() && !long.starts_with('-'),
                        None => name.len() == 2 && name.starts_with('-') && name != "--",
                    };
                    if !valid {
                        return Err(format!("malformed flag name '{}'", name));
                    }
                    if name == "-h" || name == "--help" {
                        return Err(format!("'{}' is reserved", name));
                    }
                }
            }
            for name in &spec.names {
                if !seen_names.insert(name.clone()) {
                    return Err(format!("argument name '{}' declared twice", name));
                }
            }
            if !seen_dests.insert(spec.dest()) {
                return Err(format!("argument '{}' declared twice", spec.dest()));
            }
            if spec.value_type == ValueType::Flag && spec.choices.is_some() {
                return Err(format!("flag '{}' cannot have choices", spec.display_name()));
            }
            if let (Some(Choices::Static(values)), Some(default)) = (&spec.choices, &spec.default)
            {
                if !values.contains(default) {
                    return Err(format!(
                        "default '{}' of '{}' is not one of its choices",
                        default,
                        spec.display_name()
                    ));
                }
            }
        }

        for group in &self.exclusive {
            if group.len() < 2 {
                return Err("exclusive group needs at least two arguments".to_string());
            }
            if let Some(unknown) = group.iter().find(|d| !seen_dests.contains(*d)) {
                return Err(format!("exclusive group names unknown argument '{}'", unknown));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Flag(bool),
    Text(String),
    Integer(i64),
}

/// Validated, typed arguments keyed by [`ArgSpec::dest`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundArgs {
    values: BTreeMap<String, Value>,
}

static EMPTY_ARGS: BoundArgs = BoundArgs {
    values: BTreeMap::new(),
};

impl BoundArgs {
    pub fn empty() -> &'static BoundArgs {
        &EMPTY_ARGS
    }

    pub fn insert(&mut self, dest: impl Into<String>, value: Value) {
        self.values.insert(dest.into(), value);
    }

    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.values.get(dest)
    }

    /// `false` when the flag is absent or the argument is not a flag.
    pub fn flag(&self, dest: &str) -> bool {
        matches!(self.values.get(dest), Some(Value::Flag(true)))
    }

    pub fn text(&self, dest: &str) -> Option<&str> {
        match self.values.get(dest) {
            Some(Value::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn integer(&self, dest: &str) -> Option<i64> {
        match self.values.get(dest) {
            Some(Value::Integer(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("unknown argument '{0}'")]
    UnknownFlag(String),

    #[error("invalid value '{raw}' for '{name}'")]
    InvalidValue { name: String, raw: String },

    #[error("'{value}' is not a valid choice for '{name}' (choose from {})", .choices.join(", "))]
    NotInChoices {
        name: String,
        value: String,
        choices: Vec<String>,
    },

    #[error("missing required argument '{0}'")]
    MissingRequired(String),

    #[error("'{0}' needs a value")]
    MissingValue(String),

    #[error("'{0}' was given more than once")]
    Repeated(String),

    #[error("'{first}' cannot be used with '{second}'")]
    Conflict { first: String, second: String },

    #[error("invalid escape sequence in '{0}'")]
    InvalidEscape(String),

    #[error("{0}")]
    Usage(String),

    /// `-h`/`--help` was given; carries the rendered help.
    #[error("help requested")]
    HelpRequested(String),
}

impl BindError {
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, BindError::HelpRequested(_))
    }
}

/// Binds `tokens` against `schema`.
///
/// Tokens are escape-normalized first, then parsed, then coerced to their
/// declared value types.
pub fn bind(
    tokens: &[String],
    meta: &CommandMeta,
    schema: &ArgSchema,
    registry: &Registry,
) -> Result<BoundArgs, BindError> {
    let tokens = tokens
        .iter()
        .map(|t| unescape(t))
        .collect::<Result<Vec<_>, _>>()?;

    let choices = resolve_choices(schema, registry)?;
    let matches = build_parser(meta, schema, &choices)
        .try_get_matches_from(tokens)
        .map_err(from_clap)?;

    let mut bound = BoundArgs::default();
    for spec in schema.specs() {
        let dest = spec.dest();
        match spec.value_type {
            ValueType::Flag => {
                let set = matches.get_flag(&dest);
                bound.insert(dest, Value::Flag(set));
            }
            ValueType::Text => {
                if let Some(raw) = matches.get_one::<String>(&dest) {
                    let value = Value::Text(raw.clone());
                    bound.insert(dest, value);
                }
            }
            ValueType::Integer => {
                if let Some(raw) = matches.get_one::<String>(&dest) {
                    let n = raw.parse::<i64>().map_err(|_| BindError::InvalidValue {
                        name: spec.display_name(),
                        raw: raw.clone(),
                    })?;
                    bound.insert(dest, Value::Integer(n));
                }
            }
        }
    }
    Ok(bound)
}

/// One-line usage for a command, e.g. `Usage: exit [OPTIONS]`.
pub fn usage(meta: &CommandMeta, schema: &ArgSchema, registry: &Registry) -> String {
    let choices = resolve_choices(schema, registry).unwrap_or_default();
    build_parser(meta, schema, &choices)
        .render_usage()
        .to_string()
}

fn resolve_choices(
    schema: &ArgSchema,
    registry: &Registry,
) -> Result<BTreeMap<String, Vec<String>>, BindError> {
    let mut resolved = BTreeMap::new();
    for spec in schema.specs() {
        let Some(choices) = &spec.choices else {
            continue;
        };
        let values = choices.resolve(registry);
        if let Some(default) = &spec.default {
            if !values.contains(default) {
                return Err(BindError::NotInChoices {
                    name: spec.display_name(),
                    value: default.clone(),
                    choices: values,
                });
            }
        }
        resolved.insert(spec.dest(), values);
    }
    Ok(resolved)
}

fn build_parser(
    meta: &CommandMeta,
    schema: &ArgSchema,
    choices: &BTreeMap<String, Vec<String>>,
) -> clap::Command {
    let mut parser = clap::Command::new(meta.keyword.clone())
        .about(meta.summary.clone())
        .no_binary_name(true)
        .disable_version_flag(true)
        .color(ColorChoice::Never);

    for spec in schema.specs() {
        parser = parser.arg(clap_arg(spec, choices.get(&spec.dest())));
    }
    for (i, group) in schema.exclusive_groups().iter().enumerate() {
        parser = parser.group(
            ArgGroup::new(format!("exclusive-{}", i))
                .args(group.clone())
                .multiple(false),
        );
    }
    parser
}

fn clap_arg(spec: &ArgSpec, choices: Option<&Vec<String>>) -> Arg {
    let dest = spec.dest();
    let mut arg = Arg::new(dest.clone()).help(spec.help.clone());

    if spec.is_positional() {
        arg = arg.value_name(dest.to_uppercase());
    } else {
        let mut longs = spec.names.iter().filter_map(|n| n.strip_prefix("--"));
        let mut shorts = spec
            .names
            .iter()
            .filter(|n| !n.starts_with("--"))
            .filter_map(|n| n.strip_prefix('-'))
            .filter_map(|s| s.chars().next());
        if let Some(long) = longs.next() {
            arg = arg.long(long.to_string());
        }
        for long in longs {
            arg = arg.visible_alias(long.to_string());
        }
        if let Some(short) = shorts.next() {
            arg = arg.short(short);
        }
        for short in shorts {
            arg = arg.visible_short_alias(short);
        }
    }

    match spec.value_type {
        ValueType::Flag => arg.action(ArgAction::SetTrue),
        ValueType::Text | ValueType::Integer => {
            arg = arg
                .action(ArgAction::Set)
                .required(spec.required && spec.default.is_none());
            if let Some(default) = &spec.default {
                arg = arg.default_value(default.clone());
            }
            if let Some(values) = choices {
                arg = arg.value_parser(PossibleValuesParser::new(values.clone()));
            }
            arg
        }
    }
}

fn from_clap(err: clap::Error) -> BindError {
    let context = |kind| match err.get(kind) {
        Some(ContextValue::String(s)) => Some(s.clone()),
        Some(ContextValue::Strings(v)) => Some(v.join(", ")),
        _ => None,
    };

    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            BindError::HelpRequested(err.to_string())
        }
        ErrorKind::UnknownArgument => {
            BindError::UnknownFlag(context(ContextKind::InvalidArg).unwrap_or_default())
        }
        ErrorKind::InvalidValue => {
            let name = context(ContextKind::InvalidArg).unwrap_or_default();
            let value = context(ContextKind::InvalidValue).unwrap_or_default();
            match err.get(ContextKind::ValidValue) {
                Some(ContextValue::Strings(valid)) if !valid.is_empty() => {
                    BindError::NotInChoices {
                        name,
                        value,
                        choices: valid.clone(),
                    }
                }
                // clap reports an option given without its value this way
                _ if value.is_empty() => BindError::MissingValue(name),
                _ => BindError::InvalidValue { name, raw: value },
            }
        }
        ErrorKind::MissingRequiredArgument => {
            BindError::MissingRequired(context(ContextKind::InvalidArg).unwrap_or_default())
        }
        ErrorKind::ArgumentConflict => {
            let first = context(ContextKind::InvalidArg).unwrap_or_default();
            let second = context(ContextKind::PriorArg).unwrap_or_default();
            if first == second {
                BindError::Repeated(first)
            } else {
                BindError::Conflict { first, second }
            }
        }
        kind => BindError::Usage(kind.as_str().unwrap_or("invalid arguments").to_string()),
    }
}

/// Resolves backslash escapes the way a string literal would.
///
/// Unknown escapes are kept verbatim, a trailing lone backslash is kept, and a
/// truncated `\x`/`\u`/`\U` sequence is an error.
pub fn unescape(token: &str) -> Result<String, BindError> {
    if !token.contains('\\') {
        return Ok(token.to_string());
    }

    let invalid = || BindError::InvalidEscape(token.to_string());
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            None => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('v') => out.push('\x0b'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or_default();
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(next) => {
                            value = value * 8 + next;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).ok_or_else(invalid)?);
            }
            Some('x') => out.push(read_hex(&mut chars, 2).ok_or_else(invalid)?),
            Some('u') => out.push(read_hex(&mut chars, 4).ok_or_else(invalid)?),
            Some('U') => out.push(read_hex(&mut chars, 8).ok_or_else(invalid)?),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
        }
    }
    Ok(out)
}

fn read_hex(chars: &mut Peekable<Chars<'_>>, digits: usize) -> Option<char> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        let digit = chars.next()?.to_digit(16)?;
        value = value * 16 + digit;
    }
    char::from_u32(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::StubCommand;

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    fn exit_like() -> (CommandMeta, ArgSchema) {
        let schema = ArgSchema::new().arg(ArgSpec::flag(&["-y", "--yes"], "Confirm"));
        (CommandMeta::new("exit", "Exit", "Leave."), schema)
    }

    fn workspace_like() -> (CommandMeta, ArgSchema) {
        let schema = ArgSchema::new()
            .arg(ArgSpec::positional("target", "Target"))
            .arg(ArgSpec::flag(&["-a", "--add"], "Add"))
            .arg(ArgSpec::flag(&["-d", "--delete"], "Delete"))
            .arg(ArgSpec::option(&["--desc", "--description"], "Description").default_value(""))
            .arg(ArgSpec::option(&["--limit"], "Limit").integer())
            .exclusive(&["add", "delete"]);
        (CommandMeta::new("workspace", "Workspaces", "Manage."), schema)
    }

    fn bind_line(line: &str, (meta, schema): &(CommandMeta, ArgSchema)) -> Result<BoundArgs, BindError> {
        bind(&tokens(line), meta, schema, &Registry::default())
    }

    #[test]
    fn flags_match_any_declared_name() {
        let cmd = exit_like();
        assert!(bind_line("--yes", &cmd).unwrap().flag("yes"));
        assert!(bind_line("-y", &cmd).unwrap().flag("yes"));
        assert!(!bind_line("", &cmd).unwrap().flag("yes"));
    }

    #[test]
    fn unknown_flag_is_reported_by_name() {
        let err = bind_line("--force", &exit_like()).unwrap_err();
        assert_eq!(err, BindError::UnknownFlag("--force".into()));
        assert!(err.is_usage_error());
    }

    #[test]
    fn dest_uses_first_long_name() {
        let cmd = workspace_like();
        let args = bind_line("proj --description hello", &cmd).unwrap();
        assert_eq!(args.text("target"), Some("proj"));
        assert_eq!(args.text("desc"), Some("hello"));
    }

    #[test]
    fn defaults_fill_missing_values() {
        let args = bind_line("", &workspace_like()).unwrap();
        assert_eq!(args.text("desc"), Some(""));
        assert_eq!(args.text("target"), None);
        assert_eq!(args.integer("limit"), None);
    }

    #[test]
    fn integers_are_coerced() {
        let cmd = workspace_like();
        assert_eq!(bind_line("--limit 12", &cmd).unwrap().integer("limit"), Some(12));
        assert_eq!(
            bind_line("--limit twelve", &cmd).unwrap_err(),
            BindError::InvalidValue {
                name: "--limit".into(),
                raw: "twelve".into()
            }
        );
    }

    #[test]
    fn exclusive_flags_conflict() {
        let err = bind_line("proj --add --delete", &workspace_like()).unwrap_err();
        assert!(matches!(err, BindError::Conflict { .. }), "{:?}", err);
    }

    #[test]
    fn option_without_value_needs_a_value() {
        let cmd = workspace_like();
        for line in ["--desc", "--limit", "proj --description"] {
            let err = bind_line(line, &cmd).unwrap_err();
            assert!(matches!(err, BindError::MissingValue(_)), "{}: {:?}", line, err);
            assert!(err.to_string().ends_with("needs a value"), "{}", err);
            assert!(err.is_usage_error());
        }
    }

    #[test]
    fn repeated_flag_is_not_a_conflict() {
        let err = bind_line("--yes --yes", &exit_like()).unwrap_err();
        assert_eq!(err, BindError::Repeated("--yes".into()));
        assert_eq!(err.to_string(), "'--yes' was given more than once");
    }

    #[test]
    fn missing_required_positional() {
        let meta = CommandMeta::new("open", "Open", "Open a thing.");
        let schema = ArgSchema::new().arg(ArgSpec::positional("path", "Path").required());
        let err = bind(&[], &meta, &schema, &Registry::default()).unwrap_err();
        assert!(matches!(err, BindError::MissingRequired(name) if name.contains("PATH")));
    }

    #[test]
    fn static_choices_are_enforced() {
        let meta = CommandMeta::new("color", "Color", "Pick a color.");
        let schema = ArgSchema::new().arg(
            ArgSpec::positional("name", "Name")
                .choices(Choices::Static(vec!["red".into(), "blue".into()])),
        );
        let registry = Registry::default();
        assert!(bind(&tokens("red"), &meta, &schema, &registry).is_ok());
        let err = bind(&tokens("green"), &meta, &schema, &registry).unwrap_err();
        assert!(matches!(err, BindError::NotInChoices { ref value, .. } if value == "green"));
    }

    #[test]
    fn late_bound_choices_follow_the_registry() {
        let registry = Registry::from_commands(vec![
            Box::new(StubCommand::new("alpha").alias("a")),
            Box::new(StubCommand::new("beta")),
        ])
        .unwrap();
        let meta = CommandMeta::new("help", "Help", "Show help.");
        let schema = ArgSchema::new()
            .arg(ArgSpec::positional("topic", "Topic").choices(Choices::KeywordsAndAliases));

        let args = bind(&tokens("a"), &meta, &schema, &registry).unwrap();
        assert_eq!(args.text("topic"), Some("a"));

        let err = bind(&tokens("gamma"), &meta, &schema, &registry).unwrap_err();
        match err {
            BindError::NotInChoices { choices, .. } => {
                assert_eq!(choices, vec!["a", "alpha", "beta"]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn default_outside_dynamic_choices_is_rejected() {
        let meta = CommandMeta::new("help", "Help", "Show help.");
        let schema = ArgSchema::new().arg(
            ArgSpec::positional("topic", "Topic")
                .choices(Choices::Keywords)
                .default_value("missing"),
        );
        let err = bind(&[], &meta, &schema, &Registry::default()).unwrap_err();
        assert!(matches!(err, BindError::NotInChoices { .. }));
    }

    #[test]
    fn help_flag_is_not_a_usage_error() {
        let err = bind_line("--help", &exit_like()).unwrap_err();
        match &err {
            BindError::HelpRequested(text) => assert!(text.contains("--yes")),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!err.is_usage_error());
    }

    #[test]
    fn tokens_are_unescaped_before_binding() {
        let args = bind(
            &["--desc".to_string(), "line1\\nline2".to_string()],
            &workspace_like().0,
            &workspace_like().1,
            &Registry::default(),
        )
        .unwrap();
        assert_eq!(args.text("desc"), Some("line1\nline2"));
    }

    #[test]
    fn unescape_handles_common_sequences() {
        assert_eq!(unescape("plain").unwrap(), "plain");
        assert_eq!(unescape(r"a\tb").unwrap(), "a\tb");
        assert_eq!(unescape(r"\x41é\U0001F600").unwrap(), "Aé😀");
        assert_eq!(unescape(r"\101\0").unwrap(), "A\0");
        assert_eq!(unescape(r"keep\q").unwrap(), r"keep\q");
        assert_eq!(unescape("trailing\\").unwrap(), "trailing\\");
    }

    #[test]
    fn truncated_hex_escape_is_an_error() {
        assert_eq!(
            unescape(r"\x4").unwrap_err(),
            BindError::InvalidEscape(r"\x4".into())
        );
        assert!(unescape(r"\uZZZZ").is_err());
    }

    #[test]
    fn validate_rejects_bad_schemas() {
        let dup = ArgSchema::new()
            .arg(ArgSpec::flag(&["-y"], ""))
            .arg(ArgSpec::flag(&["-y", "--yes"], ""));
        assert!(dup.validate().is_err());

        let reserved = ArgSchema::new().arg(ArgSpec::flag(&["-h"], ""));
        assert!(reserved.validate().is_err());

        let order = ArgSchema::new()
            .arg(ArgSpec::positional("a", ""))
            .arg(ArgSpec::positional("b", "").required());
        assert!(order.validate().is_err());

        let group = ArgSchema::new()
            .arg(ArgSpec::flag(&["--add"], ""))
            .exclusive(&["add", "remove"]);
        assert!(group.validate().is_err());

        let bad_default = ArgSchema::new().arg(
            ArgSpec::option(&["--mode"], "")
                .choices(Choices::Static(vec!["fast".into()]))
                .default_value("slow"),
        );
        assert!(bad_default.validate().is_err());

        assert!(workspace_like().1.validate().is_ok());
    }

    #[test]
    fn usage_line_names_the_command() {
        let (meta, schema) = exit_like();
        let usage = usage(&meta, &schema, &Registry::default());
        assert!(usage.contains("exit"), "{}", usage);
    }
}
