//! Styled output of one text run

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Style applied to a marked segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleKind {
    /// Punctuation rendered at reduced width
    #[serde(rename = "halfwidth")]
    HalfWidth,
    /// Extra kerning at a CJK/Latin boundary
    #[serde(rename = "extra-spaced")]
    ExtraSpaced,
}

impl StyleKind {
    /// Class name carried by the wrapping element
    pub fn class_name(&self) -> &'static str {
        match self {
            StyleKind::HalfWidth => "halfwidth",
            StyleKind::ExtraSpaced => "extra-spaced",
        }
    }

    /// Inverse of [`StyleKind::class_name`]
    pub fn from_class_name(name: &str) -> Option<Self> {
        match name {
            "halfwidth" => Some(StyleKind::HalfWidth),
            "extra-spaced" => Some(StyleKind::ExtraSpaced),
            _ => None,
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

/// One piece of styled output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    /// Text copied through unchanged
    Plain { text: String },
    /// Text wrapped in a styled container
    Marked { style: StyleKind, text: String },
}

impl Segment {
    pub fn text(&self) -> &str {
        match self {
            Segment::Plain { text } | Segment::Marked { text, .. } => text,
        }
    }

    /// Style of the segment, `None` for plain text
    pub fn style(&self) -> Option<StyleKind> {
        match self {
            Segment::Plain { .. } => None,
            Segment::Marked { style, .. } => Some(*style),
        }
    }
}

/// Rewritten content of one leaf
///
/// Adjacent plain pieces are coalesced and empty pieces are dropped, so a
/// run without any marked text is exactly one plain segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyledOutput {
    segments: SmallVec<[Segment; 4]>,
}

impl StyledOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append unchanged text
    pub fn push_plain(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Plain { text: last }) = self.segments.last_mut() {
            last.push_str(text);
            return;
        }
        self.segments.push(Segment::Plain {
            text: text.to_string(),
        });
    }

    /// Append text wrapped with `style`
    pub fn push_marked(&mut self, style: StyleKind, text: &str) {
        if text.is_empty() {
            return;
        }
        self.segments.push(Segment::Marked {
            style,
            text: text.to_string(),
        });
    }

    /// Append text, marked only when `style` is given
    pub fn push(&mut self, style: Option<StyleKind>, text: &str) {
        match style {
            Some(style) => self.push_marked(style, text),
            None => self.push_plain(text),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when no segment carries a style
    pub fn is_unchanged(&self) -> bool {
        self.segments.iter().all(|segment| segment.style().is_none())
    }

    /// Number of segments marked with `style`
    pub fn count(&self, style: StyleKind) -> usize {
        self.segments
            .iter()
            .filter(|segment| segment.style() == Some(style))
            .count()
    }

    /// Concatenated text with all styles removed
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(Segment::text).collect()
    }

    /// Render as HTML, wrapping marked segments in `<span class="...">`
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Plain { text } => html.push_str(&escape_html(text)),
                Segment::Marked { style, text } => {
                    html.push_str("<span class=\"");
                    html.push_str(style.class_name());
                    html.push_str("\">");
                    html.push_str(&escape_html(text));
                    html.push_str("</span>");
                }
            }
        }
        html
    }
}

impl fmt::Display for StyledOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Escape text for use in HTML element content or quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
