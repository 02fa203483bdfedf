//! Output formatting module

use anyhow::Result;
use cjtypo_core::tree::Document;
use cjtypo_core::RenderStats;
use clap::ValueEnum;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and output one styled document
    fn format_document(&mut self, source: &str, document: &Document, stats: &RenderStats)
        -> Result<()>;

    /// Finalize output (e.g., close JSON array)
    fn finish(&mut self) -> Result<()>;
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Serialised HTML fragment
    Html,
    /// JSON node trees with render statistics
    Json,
}

pub mod html;
pub mod json;

pub use html::HtmlFormatter;
pub use json::JsonFormatter;
