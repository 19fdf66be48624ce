//! Tab-completion candidates, computed from a snapshot of the registry.
//!
//! The snapshot is taken once discovery has finished, so late-bound choice
//! sets already see every command.

use crate::args::{Complete, ValueType};
use crate::registry::Registry;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CommandCompletions {
    flags: BTreeSet<String>,
    values: BTreeSet<String>,
}

#[derive(Debug, Default, Clone)]
pub struct CompletionIndex {
    /// Keywords and aliases; each maps to its command's completions
    by_name: BTreeMap<String, Arc<CommandCompletions>>,
}

impl CompletionIndex {
    pub fn build(registry: &Registry) -> Self {
        let mut by_name = BTreeMap::new();
        for command in registry.commands() {
            let meta = command.meta();
            let mut completions = CommandCompletions::default();
            if let Some(schema) = &meta.arguments {
                for spec in schema.specs() {
                    if !spec.is_positional() {
                        completions.flags.extend(spec.names.iter().cloned());
                    }
                    let wants_values =
                        spec.complete == Complete::Choices && spec.value_type != ValueType::Flag;
                    if let (true, Some(choices)) = (wants_values, &spec.choices) {
                        completions.values.extend(choices.resolve(registry));
                    }
                }
            }
            let completions = Arc::new(completions);
            for name in meta.names() {
                by_name.insert(name.to_string(), Arc::clone(&completions));
            }
        }
        Self { by_name }
    }

    /// Candidates for the word ending at `pos`.
    ///
    /// Returns the byte offset where that word starts, and the candidates that
    /// extend it, sorted.
    pub fn complete(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let Some(before) = line.get(..pos) else {
            return (pos, Vec::new());
        };
        let start = before
            .char_indices()
            .filter(|(_, c)| c.is_whitespace())
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let word = &before[start..];

        let Some(keyword) = before[..start].split_whitespace().next() else {
            let names = self
                .by_name
                .keys()
                .filter(|name| name.starts_with(word))
                .cloned()
                .collect();
            return (start, names);
        };

        let Some(completions) = self.by_name.get(keyword) else {
            return (start, Vec::new());
        };
        let pool = if word.starts_with('-') {
            &completions.flags
        } else {
            &completions.values
        };
        let candidates = pool
            .iter()
            .filter(|candidate| candidate.starts_with(word))
            .cloned()
            .collect();
        (start, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::builtin::BuiltinSource;
    use std::collections::BTreeSet;

    fn index() -> CompletionIndex {
        let registry = Registry::discover(&[&BuiltinSource], &BTreeSet::new()).unwrap();
        CompletionIndex::build(&registry)
    }

    #[test]
    fn first_word_completes_keywords_and_aliases() {
        let index = index();
        assert_eq!(
            index.complete("wor", 3),
            (0, vec!["workspace".to_string(), "workspaces".to_string()])
        );
        assert_eq!(index.complete("q", 1).1, vec!["quit"]);
        assert_eq!(index.complete("", 0).1.len(), 6);
    }

    #[test]
    fn flags_complete_after_the_keyword() {
        let index = index();
        let (start, candidates) = index.complete("workspace --d", 13);
        assert_eq!(start, 10);
        assert_eq!(candidates, vec!["--delete", "--desc", "--description"]);
        assert_eq!(index.complete("quit --", 7).1, vec!["--yes"]);
    }

    #[test]
    fn help_topics_complete_from_the_registry() {
        let index = index();
        assert_eq!(index.complete("help e", 6).1, vec!["exit"]);
        assert_eq!(index.complete("? w", 3).1, vec!["workspace", "workspaces"]);
    }

    #[test]
    fn arguments_without_choice_hint_offer_nothing() {
        let index = index();
        assert!(index.complete("workspace de", 12).1.is_empty());
        assert!(index.complete("nope x", 6).1.is_empty());
    }
}
