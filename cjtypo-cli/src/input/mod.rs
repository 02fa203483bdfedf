//! Input handling module

pub mod file_reader;
pub mod glob_resolver;

use anyhow::Result;
use cjtypo_core::tree::Document;
use clap::ValueEnum;

use crate::error::CliError;

pub use file_reader::FileReader;
pub use glob_resolver::{resolve_patterns, InputSource};

/// How input content is turned into a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputFormat {
    /// JSON for `.json` files, text otherwise
    #[default]
    Auto,
    /// JSON node tree
    Json,
    /// Plain text, one paragraph per line
    Text,
}

impl InputFormat {
    /// Concrete format for a source
    pub fn resolve(self, source: &InputSource) -> InputFormat {
        match self {
            InputFormat::Auto if source.has_extension("json") => InputFormat::Json,
            InputFormat::Auto => InputFormat::Text,
            other => other,
        }
    }
}

/// Build a document from the content of `source`
pub fn load_document(source: &InputSource, content: &str, format: InputFormat) -> Result<Document> {
    match format.resolve(source) {
        InputFormat::Json => Document::from_json_str(content).map_err(|e| {
            CliError::InvalidInput(format!("{source} is not a valid document: {e}")).into()
        }),
        _ => Ok(Document::from_paragraphs(content)),
    }
}
