use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name of the workspace every session starts in.
pub const DEFAULT_WORKSPACE: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Workspace {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.updated_at = Some(Utc::now());
    }
}

/// Mutable per-session state handed to commands while they run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellState {
    pub current_workspace: String,
}

impl ShellState {
    pub fn new(current_workspace: impl Into<String>) -> Self {
        Self {
            current_workspace: current_workspace.into(),
        }
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(DEFAULT_WORKSPACE)
    }
}
