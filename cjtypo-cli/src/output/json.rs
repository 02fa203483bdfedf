//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use cjtypo_core::tree::{Document, NodeSpec};
use cjtypo_core::RenderStats;
use serde::Serialize;
use std::io::Write;

/// JSON formatter - outputs all documents as one JSON array
pub struct JsonFormatter<W: Write> {
    writer: W,
    pretty: bool,
    documents: Vec<DocumentReport>,
}

/// Data structure for JSON output
#[derive(Debug, Serialize)]
pub struct DocumentReport {
    /// Where the document was read from
    pub source: String,
    /// Render counters
    pub stats: RenderStats,
    /// Top-level nodes after styling
    pub nodes: Vec<NodeSpec>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W, pretty: bool) -> Self {
        Self {
            writer,
            pretty,
            documents: Vec::new(),
        }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_document(
        &mut self,
        source: &str,
        document: &Document,
        stats: &RenderStats,
    ) -> Result<()> {
        self.documents.push(DocumentReport {
            source: source.to_string(),
            stats: *stats,
            nodes: document.to_node_specs(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &self.documents)?;
        } else {
            serde_json::to_writer(&mut self.writer, &self.documents)?;
        }
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
