//! Command-line interface implementation
//!
//! Parses arguments, resolves run settings, performs the merge and then
//! starts the downstream process. The launch is only attempted after the
//! property file has been saved.

mod logging;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use tracing::debug;

use crate::config::{load_settings, merge_cli_overrides, CliOverrides, Settings, MAX_INDENT};
use crate::launch::{Launcher, ShellLauncher};
use crate::merge::{ConfigMerger, MergeError};

pub use logging::{init_logging, LogLevel};

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// propmerge - Apply name=value overrides to an XML property file, then launch
#[derive(Debug, Parser)]
#[command(name = "propmerge")]
#[command(about = "Apply name=value overrides to an XML property file, then launch the dependent service")]
#[command(version)]
pub struct Cli {
    /// Property file to update in place
    #[arg(short = 'c', long = "config", visible_alias = "mesos.conf.path", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Overrides applied in order; a repeated name keeps the last value
    #[arg(value_name = "NAME=VALUE")]
    pub overrides: Vec<String>,

    /// Settings file (default: nearest propmerge.toml, else built-in defaults)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Reject overrides with an empty property name
    #[arg(long)]
    pub strict: bool,

    /// Spaces per nesting level in the saved file (0 writes a single line)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=MAX_INDENT as i64))]
    pub indent: Option<u8>,

    /// Command line to run after saving (overrides launch.command)
    #[arg(long, value_name = "CMD")]
    pub exec: Option<String>,

    /// Do not print the saved document
    #[arg(short, long)]
    pub quiet: bool,

    /// Diagnostic log verbosity (written to stderr)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

impl Cli {
    /// Settings overrides carried by the flags that were actually given.
    pub fn settings_overrides(&self) -> CliOverrides {
        CliOverrides {
            strict: self.strict.then_some(true),
            indent: self.indent.map(usize::from),
            echo: self.quiet.then_some(false),
            command: self.exec.clone(),
        }
    }
}

/// Map a merge failure to the process exit code.
pub fn exit_code_for(err: &MergeError) -> u8 {
    match err {
        MergeError::ConfigPathMissing | MergeError::MalformedOverride(_) => EXIT_INVALID_ARGS,
        MergeError::Load(_) | MergeError::Save(_) => EXIT_ERROR,
    }
}

/// Resolve settings from the settings file and the command line.
fn resolve_settings(cli: &Cli) -> Result<Settings, ExitCode> {
    let mut settings = load_settings(cli.settings.as_deref()).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })?;
    merge_cli_overrides(&mut settings, &cli.settings_overrides());

    let errors = settings.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("Error: {}", e);
        }
        return Err(ExitCode::from(EXIT_INVALID_ARGS));
    }

    debug!(?settings, "resolved settings");
    Ok(settings)
}

/// Merge, echo, launch.
pub fn execute(cli: &Cli) -> ExitCode {
    let settings = match resolve_settings(cli) {
        Ok(settings) => settings,
        Err(code) => return code,
    };

    let merger = ConfigMerger::new()
        .with_strictness(settings.merge.strictness())
        .with_indent(settings.merge.indent);

    let outcome = match merger.merge(cli.config.as_deref(), &cli.overrides) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(exit_code_for(&e));
        }
    };

    if settings.merge.echo {
        print!("{}", outcome.written);
    }

    let launcher = ShellLauncher::new(settings.launch.command);
    match launcher.launch() {
        // The downstream exit status is logged by the launcher, not propagated
        Ok(_) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    execute(&cli)
}
