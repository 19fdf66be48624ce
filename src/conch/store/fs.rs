use super::WorkspaceStore;
use crate::error::{Result, ShellError};
use crate::model::Workspace;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DATA_FILENAME: &str = "workspaces.json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(ShellError::Io)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, Workspace>> {
        let data_file = self.data_file();
        if !data_file.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(data_file).map_err(ShellError::Io)?;
        let workspaces: BTreeMap<String, Workspace> =
            serde_json::from_str(&content).map_err(ShellError::Serialization)?;
        Ok(workspaces)
    }

    fn write(&self, workspaces: &BTreeMap<String, Workspace>) -> Result<()> {
        self.ensure_dir()?;
        let content =
            serde_json::to_string_pretty(workspaces).map_err(ShellError::Serialization)?;
        fs::write(self.data_file(), content).map_err(ShellError::Io)?;
        Ok(())
    }
}

impl WorkspaceStore for FileStore {
    fn list(&self) -> Result<Vec<Workspace>> {
        Ok(self.load()?.into_values().collect())
    }

    fn get(&self, name: &str) -> Result<Option<Workspace>> {
        Ok(self.load()?.remove(name))
    }

    fn save(&mut self, workspace: &Workspace) -> Result<()> {
        if workspace.name.trim().is_empty() {
            return Err(ShellError::Store(
                "Workspace name cannot be empty".to_string(),
            ));
        }
        let mut workspaces = self.load()?;
        workspaces.insert(workspace.name.clone(), workspace.clone());
        self.write(&workspaces)
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        let mut workspaces = self.load()?;
        if workspaces.remove(name).is_none() {
            return Ok(false);
        }
        self.write(&workspaces)?;
        Ok(true)
    }
}
