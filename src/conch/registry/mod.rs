//! # Command Registry
//!
//! The registry is built once at startup by [`Registry::discover`] and is
//! read-only afterwards. It owns every command and answers lookups by keyword
//! or alias.
//!
//! ## Sources
//!
//! Commands come from [`CommandSource`]s, consulted in order:
//!
//! - [`builtin::BuiltinSource`]: the compiled-in commands, from a static table
//! - [`manifest::ManifestSource`]: external programs declared by JSON
//!   manifests in a directory
//!
//! Each source entry has a name (the table name or the manifest file stem).
//! Discovery takes an exclusion set of entry names; excluded entries are never
//! constructed. This is how commands are disabled from configuration.
//!
//! ## Collisions
//!
//! Keywords and aliases share one namespace. A name claimed by two commands is
//! a [`ShellError::DuplicateKeyword`] and aborts discovery; nothing is ever
//! silently replaced.

use crate::command::Command;
use crate::error::{Result, ShellError};
use std::collections::{BTreeMap, BTreeSet};

pub mod builtin;
pub mod manifest;

/// Something that can produce commands at startup.
pub trait CommandSource {
    /// Shown in logs and in definition errors
    fn name(&self) -> &str;

    /// Constructs every command this source offers, except the entries named in `skip`.
    ///
    /// A source with nothing to offer returns an empty list. A malformed entry
    /// is an error and fails the whole source.
    fn load(&self, skip: &BTreeSet<String>) -> Result<Vec<Box<dyn Command>>>;
}

#[derive(Default)]
pub struct Registry {
    commands: Vec<Box<dyn Command>>,
    by_keyword: BTreeMap<String, usize>,
    by_alias: BTreeMap<String, usize>,
}

impl Registry {
    /// Loads every source in order and registers what they yield.
    pub fn discover(sources: &[&dyn CommandSource], skip: &BTreeSet<String>) -> Result<Self> {
        let mut registry = Self::default();
        for source in sources {
            let commands = source.load(skip)?;
            tracing::debug!(
                source = source.name(),
                count = commands.len(),
                "loaded command source"
            );
            for command in commands {
                registry.register(command, source.name())?;
            }
        }
        Ok(registry)
    }

    /// Builds a registry from already constructed commands.
    pub fn from_commands(commands: Vec<Box<dyn Command>>) -> Result<Self> {
        let mut registry = Self::default();
        for command in commands {
            registry.register(command, "static")?;
        }
        Ok(registry)
    }

    fn register(&mut self, command: Box<dyn Command>, origin: &str) -> Result<()> {
        let meta = command.meta();
        meta.validate(origin)?;

        for name in meta.names() {
            if let Some(owner) = self.lookup(name) {
                return Err(ShellError::DuplicateKeyword {
                    keyword: name.to_string(),
                    first: owner.meta().keyword.clone(),
                    second: meta.keyword.clone(),
                });
            }
        }

        let index = self.commands.len();
        self.by_keyword.insert(meta.keyword.clone(), index);
        for alias in &meta.aliases {
            self.by_alias.insert(alias.clone(), index);
        }
        tracing::debug!(keyword = %meta.keyword, origin, "registered command");

        self.commands.push(command);
        Ok(())
    }

    /// Finds the command a keyword or alias refers to.
    pub fn lookup(&self, name: &str) -> Option<&dyn Command> {
        self.by_keyword
            .get(name)
            .or_else(|| self.by_alias.get(name))
            .map(|&index| self.commands[index].as_ref())
    }

    /// Canonical keywords.
    pub fn keywords(&self) -> BTreeSet<String> {
        self.by_keyword.keys().cloned().collect()
    }

    pub fn aliases(&self) -> BTreeSet<String> {
        self.by_alias.keys().cloned().collect()
    }

    /// Every name that resolves to a command.
    pub fn all_keywords(&self) -> BTreeSet<String> {
        self.by_keyword
            .keys()
            .chain(self.by_alias.keys())
            .cloned()
            .collect()
    }

    /// Commands ordered by keyword.
    pub fn commands(&self) -> impl Iterator<Item = &dyn Command> {
        self.by_keyword
            .values()
            .map(|&index| self.commands[index].as_ref())
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
