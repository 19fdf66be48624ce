use super::input::{EditorInput, ReaderInput};
use super::render::TerminalReporter;
use super::setup::Cli;
use clap::Parser;
use conch::completion::CompletionIndex;
use conch::config::ShellConfig;
use conch::dispatch::Dispatcher;
use conch::error::{Result, ShellError};
use conch::model::ShellState;
use conch::registry::builtin::BuiltinSource;
use conch::registry::manifest::ManifestSource;
use conch::registry::Registry;
use conch::session::{ScriptedInput, Session};
use conch::store::ensure_default_workspace;
use conch::store::fs::FileStore;
use directories::ProjectDirs;
use std::collections::BTreeSet;
use std::io::IsTerminal;
use std::panic;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Where configuration and data live for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ShellPaths {
    config: PathBuf,
    data: PathBuf,
}

impl ShellPaths {
    /// `home` (from `--home` or `CONCH_HOME`) holds both; otherwise the platform directories.
    fn resolve(home: Option<&Path>) -> Result<Self> {
        if let Some(home) = home {
            return Ok(Self {
                config: home.to_path_buf(),
                data: home.to_path_buf(),
            });
        }
        let dirs = ProjectDirs::from("com", "conch", "conch").ok_or_else(|| {
            ShellError::Io(std::io::Error::other("could not determine home directory"))
        })?;
        Ok(Self {
            config: dirs.config_dir().to_path_buf(),
            data: dirs.data_dir().to_path_buf(),
        })
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Sends panic messages to the log instead of stderr.
///
/// The session loop already reports a panicking command as one error line.
fn quiet_panics() {
    panic::set_hook(Box::new(|info| {
        tracing::debug!(%info, "command panicked");
    }));
}

/// Entry names excluded from discovery: the config's list plus `--disable`.
fn disabled_commands(config: &ShellConfig, cli: &Cli) -> BTreeSet<String> {
    let mut skip = config.disabled_commands.clone();
    skip.extend(cli.disabled.iter().cloned());
    skip
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let paths = ShellPaths::resolve(cli.home.as_deref())?;
    let config = ShellConfig::load(&paths.config)?;
    tracing::debug!(config = %paths.config.display(), data = %paths.data.display(), "resolved paths");

    let skip = disabled_commands(&config, &cli);
    let commands_dir = cli
        .commands_dir
        .clone()
        .unwrap_or_else(|| config.commands_dir(&paths.config));
    let manifests = ManifestSource::new(commands_dir);
    let registry = Registry::discover(&[&BuiltinSource, &manifests], &skip)?;

    let mut store = FileStore::new(&paths.data);
    if ensure_default_workspace(&mut store)? {
        tracing::info!(root = %store.root().display(), "created default workspace");
    }

    let completions = CompletionIndex::build(&registry);
    let dispatcher = Dispatcher::new(registry, store, ShellState::default());
    let mut out = TerminalReporter::new();
    quiet_panics();

    if !cli.commands.is_empty() {
        let input = ScriptedInput::from_lines(cli.commands);
        Session::new(input, dispatcher, config.prompt).run(&mut out);
    } else if std::io::stdin().is_terminal() {
        let input = EditorInput::new(completions)?;
        Session::new(input, dispatcher, config.prompt).run(&mut out);
    } else {
        let input = ReaderInput::stdin();
        Session::new(input, dispatcher, config.prompt).run(&mut out);
    }
    Ok(())
}
