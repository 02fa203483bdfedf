//! Per-node decisions of the traversal

use crate::tree::{ContentTree, NodeKind};

/// Default tags whose content is never styled
pub const DEFAULT_SKIP_TAGS: &[&str] = &["code", "img"];

/// Which elements are excluded from styling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipPolicy {
    /// Lowercased tag names
    skip_tags: Vec<String>,
    /// Language codes that are styled; compared exactly
    include_lang_codes: Vec<String>,
}

impl SkipPolicy {
    pub fn new<T, L>(skip_tags: T, include_lang_codes: L) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        Self {
            skip_tags: skip_tags
                .into_iter()
                .map(|tag| tag.as_ref().to_ascii_lowercase())
                .collect(),
            include_lang_codes: include_lang_codes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn skip_tags(&self) -> &[String] {
        &self.skip_tags
    }

    pub fn include_lang_codes(&self) -> &[String] {
        &self.include_lang_codes
    }

    /// Whether an element with this tag and `lang` attribute is skipped
    ///
    /// An empty or missing `lang` never causes a skip.
    pub fn skips(&self, tag: Option<&str>, lang: Option<&str>) -> bool {
        let skipped_tag = tag.is_some_and(|tag| {
            self.skip_tags
                .iter()
                .any(|skipped| skipped.eq_ignore_ascii_case(tag))
        });
        let skipped_lang = lang.is_some_and(|lang| {
            !lang.is_empty() && !self.include_lang_codes.iter().any(|code| code == lang)
        });
        skipped_tag || skipped_lang
    }
}

/// How one node takes part in boundary propagation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeDecision {
    pub is_inline: bool,
    pub is_ignorable: bool,
    pub is_skipped: bool,
    pub first_char: Option<char>,
    pub last_char: Option<char>,
}

impl NodeDecision {
    /// Inspect a node of `tree`
    pub fn inspect<T: ContentTree>(tree: &T, node: T::NodeId, policy: &SkipPolicy) -> Self {
        let kind = tree.kind(node);
        let (is_inline, is_ignorable, is_skipped) = match kind {
            NodeKind::Text => (true, false, false),
            NodeKind::Element => {
                let style = tree.computed_style(node);
                (
                    style.display.is_inline_level(),
                    style.is_ignorable(),
                    policy.skips(tree.tag_name(node), tree.lang(node)),
                )
            }
            NodeKind::Other => (false, false, false),
        };

        Self {
            is_inline,
            is_ignorable,
            is_skipped,
            first_char: tree.first_char(node),
            last_char: tree.last_char(node),
        }
    }
}
