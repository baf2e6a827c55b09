//! Load, override, save
//!
//! [`ConfigMerger`] runs the whole edit of a property file: read and parse
//! it, apply the overrides in order, then write it back to the same path.
//! Every token is validated before the file is read, and the file is only
//! written once all overrides have been applied in memory.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::document::{ConfigDocument, DocumentError, DEFAULT_INDENT};
use crate::overrides::{parse_overrides, Override, OverrideError, Strictness};
use crate::store::Upsert;

/// The property file could not be loaded
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not a valid property file: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: DocumentError,
    },
}

/// The property file could not be saved
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SaveError {
    #[error("cannot serialize document: {0}")]
    Serialize(#[source] DocumentError),
    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any failure of a full merge run
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MergeError {
    /// No property file path was supplied
    #[error("no property file given (use --config <FILE>)")]
    ConfigPathMissing,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    MalformedOverride(#[from] OverrideError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Counts of what [`ConfigMerger::apply_overrides`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub created: usize,
    pub updated: usize,
}

/// Result of a completed [`ConfigMerger::merge`].
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub document: ConfigDocument,
    pub summary: MergeSummary,
    /// Exact text written to disk
    pub written: String,
}

/// Applies `name=value` overrides to an XML property file.
#[derive(Debug, Clone)]
pub struct ConfigMerger {
    strictness: Strictness,
    indent: usize,
}

impl Default for ConfigMerger {
    fn default() -> Self {
        Self { strictness: Strictness::Lenient, indent: DEFAULT_INDENT }
    }
}

impl ConfigMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how override tokens are checked
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Set the indentation width used when saving
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Read and parse the property file at `path`.
    ///
    /// A repeated property name is an error in strict mode. Otherwise it is
    /// logged and the first record with that name is the one updated.
    pub fn load(&self, path: &Path) -> Result<ConfigDocument, LoadError> {
        let contents = fs::read_to_string(path)
            .map_err(|source| LoadError::Read { path: path.to_path_buf(), source })?;
        let document = ConfigDocument::parse(&contents)
            .map_err(|source| LoadError::Parse { path: path.to_path_buf(), source })?;

        if let Some(name) = document.properties().duplicate_names().first() {
            if self.strictness == Strictness::Strict {
                return Err(LoadError::Parse {
                    path: path.to_path_buf(),
                    source: DocumentError::DuplicateName(name.to_string()),
                });
            }
            warn!(path = %path.display(), property = %name, "repeated property name, updating the first");
        }
        debug!(path = %path.display(), properties = document.properties().len(), "loaded property file");
        Ok(document)
    }

    /// Upsert each override in order; later entries win over earlier ones.
    ///
    /// Descriptions are never touched on this path.
    pub fn apply_overrides(&self, document: &mut ConfigDocument, overrides: &[Override]) -> MergeSummary {
        let mut summary = MergeSummary::default();
        let store = document.properties_mut();
        for ov in overrides {
            match store.upsert(&ov.name, "", &ov.value) {
                Upsert::Created => summary.created += 1,
                Upsert::Updated => summary.updated += 1,
            }
        }
        summary
    }

    /// Serialize `document` and overwrite `path` with it.
    ///
    /// Returns the text that was written.
    pub fn save(&self, document: &ConfigDocument, path: &Path) -> Result<String, SaveError> {
        let xml = document.to_xml(self.indent).map_err(SaveError::Serialize)?;
        fs::write(path, &xml)
            .map_err(|source| SaveError::Write { path: path.to_path_buf(), source })?;
        debug!(path = %path.display(), bytes = xml.len(), "saved property file");
        Ok(xml)
    }

    /// Run a complete load, apply, save sequence.
    ///
    /// Tokens are parsed before the file is read, so a bad token leaves the
    /// file untouched.
    pub fn merge<S: AsRef<str>>(
        &self,
        path: Option<&Path>,
        tokens: &[S],
    ) -> Result<MergeOutcome, MergeError> {
        let path = path.ok_or(MergeError::ConfigPathMissing)?;
        let overrides = parse_overrides(tokens, self.strictness)?;

        let mut document = self.load(path)?;
        let summary = self.apply_overrides(&mut document, &overrides);
        let written = self.save(&document, path)?;

        info!(
            path = %path.display(),
            created = summary.created,
            updated = summary.updated,
            "merged overrides"
        );
        Ok(MergeOutcome { document, summary, written })
    }
}
