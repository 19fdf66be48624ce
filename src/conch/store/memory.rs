use super::WorkspaceStore;
use crate::error::{Result, ShellError};
use crate::model::Workspace;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    workspaces: BTreeMap<String, Workspace>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WorkspaceStore for InMemoryStore {
    fn list(&self) -> Result<Vec<Workspace>> {
        Ok(self.workspaces.values().cloned().collect())
    }

    fn get(&self, name: &str) -> Result<Option<Workspace>> {
        Ok(self.workspaces.get(name).cloned())
    }

    fn save(&mut self, workspace: &Workspace) -> Result<()> {
        if workspace.name.trim().is_empty() {
            return Err(ShellError::Store(
                "Workspace name cannot be empty".to_string(),
            ));
        }
        self.workspaces
            .insert(workspace.name.clone(), workspace.clone());
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        Ok(self.workspaces.remove(name).is_some())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::DEFAULT_WORKSPACE;

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_default(self) -> Self {
            self.with_workspace(DEFAULT_WORKSPACE, "Default workspace")
        }

        pub fn with_workspace(mut self, name: &str, description: &str) -> Self {
            self.store
                .save(&Workspace::new(name, description))
                .unwrap();
            self
        }
    }
}
