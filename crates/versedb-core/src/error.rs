//! Error type for configuration, keyword-rule loading and canon lookups.
//!
//! Collaborator failures are not wrapped here; they travel as `anyhow::Error`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown {kind}: '{id}'")]
    NotFound { kind: &'static str, id: String },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
