//! Error types of the styling core

use std::path::PathBuf;

use thiserror::Error;

use crate::tree::selector::SelectorError;
use crate::tree::TreeError;

/// Error type for typesetter construction and rendering
#[derive(Debug, Error)]
pub enum Error {
    /// Variant identifier not recognized
    #[error("Unsupported variant: {0}")]
    UnsupportedVariant(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Composite pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Invalid root selector
    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),

    /// Mutation of the host tree failed
    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    /// Configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML
    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;
