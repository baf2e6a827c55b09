//! propmerge - Apply command-line overrides to an XML property file
//!
//! This library provides functionality to:
//! - Parse and write Hadoop-style `<property>` documents
//! - Upsert properties by name while keeping document order and descriptions
//! - Run a load, override, save sequence and then launch a dependent process

pub mod cli;
pub mod config;
pub mod document;
pub mod launch;
pub mod merge;
pub mod models;
pub mod overrides;
pub mod store;

pub use document::ConfigDocument;
pub use merge::{ConfigMerger, LoadError, MergeError, SaveError};
pub use models::PropertyRecord;
pub use overrides::{Override, OverrideError, Strictness};
pub use store::PropertyStore;
