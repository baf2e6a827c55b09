//! Settings loading and discovery for `propmerge.toml`
//!
//! Provides functions to find, load, and merge run settings.

use super::schema::Settings;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name searched for when no settings path is given
pub const SETTINGS_FILE: &str = "propmerge.toml";

/// Settings loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SettingsError {
    /// File I/O error
    #[error("Failed to read settings '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing error
    #[error("Failed to parse propmerge.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Settings validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override settings values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override strict token checking
    pub strict: Option<bool>,
    /// Override indentation width
    pub indent: Option<usize>,
    /// Override echoing of the saved document
    pub echo: Option<bool>,
    /// Override the downstream command
    pub command: Option<String>,
}

/// Find propmerge.toml by walking up from the current working directory.
pub fn find_settings() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_settings_from)
}

/// Find propmerge.toml by walking up from a specific directory.
pub fn find_settings_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let settings_path = current.join(SETTINGS_FILE);
        if settings_path.is_file() {
            return Some(settings_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load run settings.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// `find_settings()` and falls back to defaults when nothing is found.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, SettingsError> {
    let settings_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_settings(),
    };

    match settings_path {
        Some(p) => load_settings_file(&p),
        None => {
            debug!("no {} found, using defaults", SETTINGS_FILE);
            Ok(Settings::default())
        }
    }
}

/// Load settings from a specific file path.
fn load_settings_file(path: &Path) -> Result<Settings, SettingsError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| SettingsError::Io { path: path.to_path_buf(), source })?;
    let settings: Settings = toml::from_str(&contents)?;

    let errors = settings.validate();
    if !errors.is_empty() {
        return Err(SettingsError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    debug!(path = %path.display(), "loaded settings");
    Ok(settings)
}

/// Merge CLI overrides into settings.
///
/// CLI arguments take precedence over settings file values.
pub fn merge_cli_overrides(settings: &mut Settings, overrides: &CliOverrides) {
    if let Some(strict) = overrides.strict {
        settings.merge.strict = strict;
    }

    if let Some(indent) = overrides.indent {
        settings.merge.indent = indent;
    }

    if let Some(echo) = overrides.echo {
        settings.merge.echo = echo;
    }

    if let Some(ref command) = overrides.command {
        settings.launch.command = command.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_settings(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join(SETTINGS_FILE);
        File::create(&path)
            .expect("should create settings file")
            .write_all(contents.as_bytes())
            .expect("should write settings content");
        path
    }

    #[test]
    fn test_find_settings_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_settings(temp.path(), "[merge]\nstrict = true\n");

        let found = find_settings_from(temp.path().to_path_buf());
        assert_eq!(found, Some(path));
    }

    #[test]
    fn test_find_settings_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_settings(temp.path(), "");

        let subdir = temp.path().join("etc").join("hadoop");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_settings_from(subdir);
        assert_eq!(found, Some(path));
    }

    #[test]
    fn test_find_settings_ignores_directory_with_same_name() {
        let temp = TempDir::new().expect("should create temp dir");
        fs::create_dir(temp.path().join(SETTINGS_FILE)).expect("should create directory");

        let found = find_settings_from(temp.path().to_path_buf());
        assert_ne!(found, Some(temp.path().join(SETTINGS_FILE)));
    }

    #[test]
    fn test_load_settings_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_settings(
            temp.path(),
            r#"
[merge]
indent = 4
echo = false

[launch]
command = "true"
"#,
        );

        let settings = load_settings(Some(&path)).expect("should load valid settings");
        assert_eq!(settings.merge.indent, 4);
        assert!(!settings.merge.echo);
        assert_eq!(settings.launch.command, "true");
    }

    #[test]
    fn test_load_settings_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_settings(Some(&temp.path().join("nonexistent.toml")));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_load_settings_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_settings(temp.path(), "this is not valid toml {{{");

        let result = load_settings(Some(&path));
        assert!(matches!(result, Err(SettingsError::Parse(_))));
    }

    #[test]
    fn test_load_settings_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_settings(temp.path(), "[launch]\ncommand = \"\"\n");

        let result = load_settings(Some(&path));
        assert!(matches!(result, Err(SettingsError::Validation(_))));
    }

    #[test]
    fn test_merge_cli_overrides_command() {
        let mut settings = Settings::default();
        let overrides = CliOverrides { command: Some("echo started".to_string()), ..Default::default() };

        merge_cli_overrides(&mut settings, &overrides);
        assert_eq!(settings.launch.command, "echo started");
    }

    #[test]
    fn test_merge_cli_overrides_multiple() {
        let mut settings = Settings::default();
        let overrides = CliOverrides {
            strict: Some(true),
            indent: Some(0),
            echo: Some(false),
            ..Default::default()
        };

        merge_cli_overrides(&mut settings, &overrides);
        assert!(settings.merge.strict);
        assert_eq!(settings.merge.indent, 0);
        assert!(!settings.merge.echo);
        assert_eq!(settings.launch.command, "./bin/hdfs-mesos");
    }

    #[test]
    fn test_merge_cli_overrides_none_keeps_settings() {
        let mut settings = Settings::default();
        settings.merge.indent = 4;

        merge_cli_overrides(&mut settings, &CliOverrides::default());
        assert_eq!(settings.merge.indent, 4);
    }
}
