//! HTML output formatter

use super::OutputFormatter;
use anyhow::Result;
use cjtypo_core::tree::Document;
use cjtypo_core::RenderStats;
use std::io::Write;

/// HTML formatter - writes each document as one fragment
///
/// When more than one document is written, each fragment is preceded by a
/// comment naming its source.
pub struct HtmlFormatter<W: Write> {
    writer: W,
    label_sources: bool,
}

impl<W: Write> HtmlFormatter<W> {
    /// Create a new HTML formatter
    pub fn new(writer: W, label_sources: bool) -> Self {
        Self {
            writer,
            label_sources,
        }
    }
}

impl<W: Write> OutputFormatter for HtmlFormatter<W> {
    fn format_document(
        &mut self,
        source: &str,
        document: &Document,
        _stats: &RenderStats,
    ) -> Result<()> {
        if self.label_sources {
            writeln!(self.writer, "<!-- {} -->", source.replace("--", "- -"))?;
        }
        writeln!(self.writer, "{}", document.to_html())?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
