//! Run settings for propmerge
//!
//! Provides types, discovery and loading for the optional `propmerge.toml`.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
