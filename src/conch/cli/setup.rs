use clap::Parser;
use std::path::PathBuf;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format for releases: "v0.3.2"
/// Format for dev builds: "v0.3.2\ndev: abc1234 2024-01-15 14:30"
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            format!("v{}", VERSION)
        } else {
            format!("v{}\ndev: {} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "conch",
    bin_name = "conch",
    version = get_version(),
    about = "An extensible interactive command shell",
    long_about = None,
    after_help = "Type 'help' at the prompt to list the available commands."
)]
pub struct Cli {
    /// Keep configuration and data in DIR instead of the platform directories
    #[arg(long, env = "CONCH_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Load command manifests from DIR
    #[arg(long, value_name = "DIR")]
    pub commands_dir: Option<PathBuf>,

    /// Do not load the named command (repeatable)
    #[arg(long = "disable", value_name = "NAME")]
    pub disabled: Vec<String>,

    /// Run LINE instead of reading input, then exit (repeatable)
    #[arg(short = 'c', long = "command", value_name = "LINE")]
    pub commands: Vec<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeatable_flags_accumulate() {
        let cli = Cli::try_parse_from([
            "conch",
            "--disable",
            "help",
            "--disable",
            "workspace",
            "-c",
            "help",
            "--command",
            "exit --yes",
        ])
        .unwrap();
        assert_eq!(cli.disabled, vec!["help", "workspace"]);
        assert_eq!(cli.commands, vec!["help", "exit --yes"]);
        assert!(!cli.verbose);
    }

    #[test]
    fn paths_are_optional() {
        let cli = Cli::try_parse_from(["conch", "--commands-dir", "/tmp/plugins", "-v"]).unwrap();
        assert_eq!(cli.commands_dir, Some(PathBuf::from("/tmp/plugins")));
        assert!(cli.verbose);
    }

    #[test]
    fn version_starts_with_package_version() {
        assert!(get_version().starts_with(&format!("v{}", env!("CARGO_PKG_VERSION"))));
    }
}
