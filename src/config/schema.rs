//! Run settings schema for `propmerge.toml`
//!
//! Defines the structure and validation rules for the optional settings file
//! that controls how merges are written and what gets launched afterwards.

use serde::{Deserialize, Serialize};

use crate::document::DEFAULT_INDENT;
use crate::overrides::Strictness;

/// Largest accepted indentation width
pub const MAX_INDENT: usize = 8;

/// Command launched after the property file has been saved
pub const DEFAULT_LAUNCH_COMMAND: &str = "./bin/hdfs-mesos";

/// How overrides are applied and the result written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeSettings {
    /// Reject overrides with an empty property name
    #[serde(default)]
    pub strict: bool,
    /// Spaces per nesting level in the saved file (0 = single line)
    #[serde(default = "default_indent")]
    pub indent: usize,
    /// Print the saved document to stdout
    #[serde(default = "default_true")]
    pub echo: bool,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self { strict: false, indent: default_indent(), echo: true }
    }
}

impl MergeSettings {
    pub fn strictness(&self) -> Strictness {
        Strictness::from_flag(self.strict)
    }
}

fn default_indent() -> usize {
    DEFAULT_INDENT
}

fn default_true() -> bool {
    true
}

/// Downstream process settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchSettings {
    /// Shell command line run once the file is saved
    #[serde(default = "default_command")]
    pub command: String,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self { command: default_command() }
    }
}

fn default_command() -> String {
    DEFAULT_LAUNCH_COMMAND.to_string()
}

/// Complete `propmerge.toml` contents
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub merge: MergeSettings,
    #[serde(default)]
    pub launch: LaunchSettings,
}

/// Settings validation error
#[derive(Debug, Clone)]
pub struct SettingsValidationError {
    /// Path to the invalid field (e.g., "launch.command")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for SettingsValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "propmerge.toml: '{}' {}", self.field, self.message)
    }
}

impl Settings {
    /// Validate the settings and return any errors
    pub fn validate(&self) -> Vec<SettingsValidationError> {
        let mut errors = Vec::new();

        if self.merge.indent > MAX_INDENT {
            errors.push(SettingsValidationError {
                field: "merge.indent".to_string(),
                message: format!("must be between 0 and {}", MAX_INDENT),
            });
        }

        if self.launch.command.trim().is_empty() {
            errors.push(SettingsValidationError {
                field: "launch.command".to_string(),
                message: "must be a non-empty command line".to_string(),
            });
        }

        errors
    }
}
