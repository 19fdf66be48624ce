use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("duplicate keyword '{keyword}': claimed by both '{first}' and '{second}'")]
    DuplicateKeyword {
        keyword: String,
        first: String,
        second: String,
    },

    #[error("invalid command definition in {origin}: {reason}")]
    InvalidDefinition { origin: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(String),

    #[error("Command error: {0}")]
    Command(String),

    #[error("Input error: {0}")]
    Input(String),
}

impl ShellError {
    pub fn invalid_definition(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        ShellError::InvalidDefinition {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShellError>;
