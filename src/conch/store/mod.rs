//! # Storage Layer
//!
//! Workspaces are the only persisted data the shell knows about, and only the
//! `workspace` command touches them. The [`WorkspaceStore`] trait is the narrow
//! CRUD interface that command sees; everything else in the shell is unaware
//! that persistence exists.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production storage, a single `workspaces.json` file in
//!   the data directory keyed by workspace name.
//! - [`memory::InMemoryStore`]: no persistence, used by tests.

use crate::error::Result;
use crate::model::{Workspace, DEFAULT_WORKSPACE};

pub mod fs;
pub mod memory;

/// Abstract interface for workspace storage.
///
/// Names are unique; `save` replaces any workspace with the same name.
pub trait WorkspaceStore {
    /// All workspaces, ordered by name
    fn list(&self) -> Result<Vec<Workspace>>;

    /// Get a workspace by name
    fn get(&self, name: &str) -> Result<Option<Workspace>>;

    /// Create or replace a workspace
    fn save(&mut self, workspace: &Workspace) -> Result<()>;

    /// Remove a workspace, returning whether it existed
    fn delete(&mut self, name: &str) -> Result<bool>;

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.get(name)?.is_some())
    }
}

/// Creates the default workspace unless it is already present.
///
/// Returns `true` when a workspace was created.
pub fn ensure_default_workspace<S: WorkspaceStore + ?Sized>(store: &mut S) -> Result<bool> {
    if store.exists(DEFAULT_WORKSPACE)? {
        tracing::debug!("found default workspace, skipping");
        return Ok(false);
    }
    store.save(&Workspace::new(DEFAULT_WORKSPACE, "Default workspace"))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryStore;
    use super::*;

    #[test]
    fn default_workspace_is_created_once() {
        let mut store = InMemoryStore::new();
        assert!(ensure_default_workspace(&mut store).unwrap());
        assert!(!ensure_default_workspace(&mut store).unwrap());

        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, DEFAULT_WORKSPACE);
    }
}
