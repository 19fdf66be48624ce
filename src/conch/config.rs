use crate::error::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_PROMPT: &str = "conch";
const COMMANDS_DIRNAME: &str = "commands";

/// Shell configuration, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShellConfig {
    /// Name shown in the prompt after the current workspace
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Directory of command manifests; `<config dir>/commands` when unset
    #[serde(default)]
    pub commands_dir: Option<PathBuf>,

    /// Source entries that are never loaded
    #[serde(default)]
    pub disabled_commands: BTreeSet<String>,
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            commands_dir: None,
            disabled_commands: BTreeSet::new(),
        }
    }
}

impl ShellConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ShellError::Io)?;
        let config: ShellConfig =
            serde_json::from_str(&content).map_err(ShellError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ShellError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ShellError::Serialization)?;
        fs::write(config_path, content).map_err(ShellError::Io)?;
        Ok(())
    }

    /// The manifest directory, resolving relative paths against `config_dir`.
    pub fn commands_dir(&self, config_dir: &Path) -> PathBuf {
        match &self.commands_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => config_dir.join(dir),
            None => config_dir.join(COMMANDS_DIRNAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = ShellConfig::default();
        assert_eq!(config.prompt, "conch");
        assert!(config.commands_dir.is_none());
        assert!(config.disabled_commands.is_empty());
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempdir().unwrap();
        let config = ShellConfig::load(dir.path().join("absent")).unwrap();
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let mut config = ShellConfig {
            prompt: "lab".to_string(),
            ..Default::default()
        };
        config.disabled_commands.insert("workspace".to_string());
        config.save(dir.path().join("nested")).unwrap();

        let loaded = ShellConfig::load(dir.path().join("nested")).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            r#"{"disabled_commands": ["help"]}"#,
        )
        .unwrap();
        let config = ShellConfig::load(dir.path()).unwrap();
        assert_eq!(config.prompt, "conch");
        assert!(config.disabled_commands.contains("help"));
    }

    #[test]
    fn test_commands_dir_resolution() {
        let base = Path::new("/etc/conch");
        let mut config = ShellConfig::default();
        assert_eq!(config.commands_dir(base), base.join("commands"));

        config.commands_dir = Some(PathBuf::from("plugins"));
        assert_eq!(config.commands_dir(base), base.join("plugins"));

        let absolute = std::env::temp_dir().join("conch-plugins");
        config.commands_dir = Some(absolute.clone());
        assert_eq!(config.commands_dir(base), absolute);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "prompt = 'toml'").unwrap();
        assert!(matches!(
            ShellConfig::load(dir.path()),
            Err(ShellError::Serialization(_))
        ));
    }
}
