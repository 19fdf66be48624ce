//! External commands declared by JSON manifests.
//!
//! Every `*.json` file directly inside the manifest directory declares one
//! command that runs an external program:
//!
//! ```json
//! {
//!   "keyword": "greet",
//!   "aliases": ["hi"],
//!   "summary": "Say hello",
//!   "help": "Prints a greeting for every name given.",
//!   "program": "echo",
//!   "args": ["hello"]
//! }
//! ```
//!
//! The file stem is the entry name used by the exclusion set.

use super::CommandSource;
use crate::command::Command;
use crate::commands::external::ExternalCommand;
use crate::error::{Result, ShellError};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub keyword: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub summary: String,
    pub help: String,
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

pub struct ManifestSource {
    dir: PathBuf,
}

impl ManifestSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Manifest files in name order.
    fn manifest_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_manifest =
                path.is_file() && path.extension().is_some_and(|ext| ext == MANIFEST_EXTENSION);
            if is_manifest {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let origin = path.display().to_string();
    let content = fs::read_to_string(path)?;
    let manifest: Manifest = serde_json::from_str(&content)
        .map_err(|e| ShellError::invalid_definition(&origin, e.to_string()))?;
    if manifest.program.trim().is_empty() {
        return Err(ShellError::invalid_definition(origin, "no program to run"));
    }
    Ok(manifest)
}

impl CommandSource for ManifestSource {
    fn name(&self) -> &str {
        "manifest"
    }

    fn load(&self, skip: &BTreeSet<String>) -> Result<Vec<Box<dyn Command>>> {
        if !self.dir.is_dir() {
            tracing::debug!(dir = %self.dir.display(), "no manifest directory");
            return Ok(Vec::new());
        }

        let mut commands: Vec<Box<dyn Command>> = Vec::new();
        for path in self.manifest_files()? {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if skip.contains(stem) {
                tracing::debug!(name = stem, "manifest command disabled");
                continue;
            }
            let manifest = read_manifest(&path)?;
            let command = ExternalCommand::from_manifest(manifest);
            command.meta().validate(&path.display().to_string())?;
            commands.push(Box::new(command));
        }
        Ok(commands)
    }
}
