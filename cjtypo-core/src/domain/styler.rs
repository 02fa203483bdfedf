//! Styling of a single text run
//!
//! The styler scans `preceding + text + following` so that rules can see one
//! character of each neighbouring node, but only ever emits the characters
//! of `text` itself.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::domain::patterns::{Category, Matcher};
use crate::domain::segment::{StyleKind, StyledOutput};

/// Per-call toggles of the styler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleOptions {
    /// Wrap compressible punctuation in `halfwidth` segments
    pub compress_punctuations: bool,
    /// Wrap script boundaries in `extra-spaced` segments
    pub auto_space: bool,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self {
            compress_punctuations: true,
            auto_space: true,
        }
    }
}

/// Applies a compiled matcher to text runs
#[derive(Debug, Clone)]
pub struct Styler {
    matcher: Matcher,
    options: StyleOptions,
}

/// Scan buffer with its owned range
struct RunBuffer {
    text: String,
    owned: Range<usize>,
}

impl RunBuffer {
    fn new(text: &str, preceding: Option<char>, following: Option<char>) -> Self {
        let mut buffer = String::with_capacity(text.len() + 8);
        if let Some(ch) = preceding {
            buffer.push(ch);
        }
        let start = buffer.len();
        buffer.push_str(text);
        let end = buffer.len();
        if let Some(ch) = following {
            buffer.push(ch);
        }
        Self {
            text: buffer,
            owned: start..end,
        }
    }

    /// Offset of the character that ends at `end`
    fn char_before(&self, end: usize) -> usize {
        self.text[..end]
            .char_indices()
            .next_back()
            .map_or(0, |(index, _)| index)
    }
}

impl Styler {
    pub fn new(matcher: Matcher, options: StyleOptions) -> Self {
        Self { matcher, options }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn options(&self) -> StyleOptions {
        self.options
    }

    /// Style one run of text
    ///
    /// `preceding` and `following` are the characters immediately around the
    /// run in document order. Returns `None` when the run is empty or only
    /// whitespace.
    pub fn style(
        &self,
        text: &str,
        preceding: Option<char>,
        following: Option<char>,
    ) -> Option<StyledOutput> {
        if text.trim().is_empty() {
            return None;
        }

        let buffer = RunBuffer::new(text, preceding, following);
        let haystack = buffer.text.as_str();
        let owned = buffer.owned.clone();

        let half_width = self
            .options
            .compress_punctuations
            .then_some(StyleKind::HalfWidth);
        let extra_spaced = self.options.auto_space.then_some(StyleKind::ExtraSpaced);

        let mut output = StyledOutput::new();
        let mut cursor = 0;
        let mut last = owned.start;

        while let Some(found) = self.matcher.find_at(haystack, cursor) {
            if found.start >= owned.end {
                break;
            }

            let start = found.start.max(last);
            let end = found.end.min(owned.end);
            if end <= last {
                // Everything this match covers was already emitted or belongs
                // to the preceding node
                cursor = found.end;
                continue;
            }

            output.push_plain(&haystack[last..start]);
            let region = &haystack[start..end];

            match found.category {
                Category::HalfWidth => output.push(half_width, region),
                Category::HalfWidthLookbehind => {
                    if half_width.is_some() && found.start >= last {
                        let first_len = region.chars().next().map_or(0, char::len_utf8);
                        output.push_plain(&region[..first_len]);
                        output.push(half_width, &region[first_len..]);
                    } else {
                        output.push(half_width, region);
                    }
                }
                Category::AutoSpace => output.push(extra_spaced, region),
            }

            last = end;
            // Step back one character so the last character of this match can
            // start the next one
            cursor = buffer.char_before(found.end);
        }

        output.push_plain(&haystack[last..owned.end]);
        Some(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patterns::PatternCompiler;
    use crate::domain::segment::Segment;
    use crate::domain::variant::{CharacterClassifier, Variant};

    fn styler(variant: Variant, strict: bool, options: StyleOptions) -> Styler {
        let classifier = CharacterClassifier::new(variant, strict);
        let matcher = PatternCompiler::new(&classifier).compile().unwrap();
        Styler::new(matcher, options)
    }

    fn default_styler(variant: Variant) -> Styler {
        styler(variant, true, StyleOptions::default())
    }

    fn plain(text: &str) -> Segment {
        Segment::Plain {
            text: text.to_string(),
        }
    }

    fn half(text: &str) -> Segment {
        Segment::Marked {
            style: StyleKind::HalfWidth,
            text: text.to_string(),
        }
    }

    fn spaced(text: &str) -> Segment {
        Segment::Marked {
            style: StyleKind::ExtraSpaced,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_whitespace_only_is_noop() {
        let s = default_styler(Variant::TraditionalChinese);
        assert!(s.style("", None, None).is_none());
        assert!(s.style("  \n\t", Some('中'), Some('A')).is_none());
    }

    #[test]
    fn test_mark_before_closing_japanese() {
        let s = default_styler(Variant::Japanese);
        let out = s.style("你好，」", None, None).unwrap();
        assert_eq!(out.segments(), &[plain("你好"), half("，"), plain("」")]);
    }

    #[test]
    fn test_mark_before_closing_absent_in_traditional() {
        let s = default_styler(Variant::TraditionalChinese);
        let out = s.style("你好，」", None, None).unwrap();
        assert_eq!(out.segments(), &[plain("你好，」")]);
    }

    #[test]
    fn test_closing_then_opening_only_compresses_opening() {
        let s = default_styler(Variant::TraditionalChinese);
        let out = s.style("」「", None, None).unwrap();
        assert_eq!(out.segments(), &[plain("」"), half("「")]);
    }

    #[test]
    fn test_opening_run() {
        let s = default_styler(Variant::TraditionalChinese);
        let out = s.style("（「好", None, None).unwrap();
        assert_eq!(out.segments(), &[plain("（"), half("「"), plain("好")]);
    }

    #[test]
    fn test_chained_closing_brackets_each_compressed() {
        let s = default_styler(Variant::TraditionalChinese);
        // 」 before 。 compresses; 。 before 「 compresses the bracket
        let out = s.style("好」。「對", None, None).unwrap();
        assert_eq!(
            out.segments(),
            &[plain("好"), half("」"), plain("。"), half("「"), plain("對")]
        );
        assert_eq!(out.plain_text(), "好」。「對");
    }

    #[test]
    fn test_auto_space_around_latin() {
        let s = default_styler(Variant::TraditionalChinese);
        let out = s.style("用Rust寫", None, None).unwrap();
        assert_eq!(
            out.segments(),
            &[spaced("用"), plain("Rus"), spaced("t"), plain("寫")]
        );
    }

    #[test]
    fn test_following_context_fires_rule() {
        let s = default_styler(Variant::TraditionalChinese);
        let out = s.style("A", None, Some('中')).unwrap();
        assert_eq!(out.segments(), &[spaced("A")]);
    }

    #[test]
    fn test_preceding_context_is_never_emitted() {
        let s = default_styler(Variant::TraditionalChinese);
        let out = s.style("中", Some('A'), None).unwrap();
        assert_eq!(out.segments(), &[plain("中")]);

        let out = s.style("「xyz", Some('」'), None).unwrap();
        assert_eq!(out.segments(), &[half("「"), plain("xyz")]);
    }

    #[test]
    fn test_closing_before_opening_across_following_context() {
        let s = default_styler(Variant::TraditionalChinese);
        let out = s.style("abc」", None, Some('「')).unwrap();
        assert_eq!(out.segments(), &[plain("abc」")]);
    }

    #[test]
    fn test_compression_disabled() {
        let options = StyleOptions {
            compress_punctuations: false,
            auto_space: true,
        };
        let s = styler(Variant::Japanese, true, options);
        let out = s.style("你好，」「A", None, None).unwrap();
        assert_eq!(out.count(StyleKind::HalfWidth), 0);
        assert_eq!(out.plain_text(), "你好，」「A");
    }

    #[test]
    fn test_auto_space_disabled() {
        let options = StyleOptions {
            compress_punctuations: true,
            auto_space: false,
        };
        let s = styler(Variant::TraditionalChinese, true, options);
        let out = s.style("中A中", None, None).unwrap();
        assert_eq!(out.segments(), &[plain("中A中")]);
    }

    #[test]
    fn test_simplified_repeated_exclamation() {
        let s = default_styler(Variant::SimplifiedChinese);
        let out = s.style("！？", None, None).unwrap();
        assert_eq!(out.segments(), &[half("！"), plain("？")]);

        let out = s.style("好！！？", None, None).unwrap();
        assert_eq!(out.segments(), &[plain("好"), half("！！"), plain("？")]);

        let tc = default_styler(Variant::TraditionalChinese);
        let out = tc.style("！？", None, None).unwrap();
        assert!(out.is_unchanged());
    }

    #[test]
    fn test_simplified_bare_middle_dot() {
        let s = default_styler(Variant::SimplifiedChinese);
        let out = s.style("克·里", None, None).unwrap();
        assert_eq!(out.segments(), &[plain("克"), half("·"), plain("里")]);
    }

    #[test]
    fn test_middle_dot_in_following_context_terminates() {
        let s = default_styler(Variant::SimplifiedChinese);
        let out = s.style("克", None, Some('·')).unwrap();
        assert_eq!(out.segments(), &[plain("克")]);
    }

    #[test]
    fn test_astral_characters_pass_through() {
        let s = default_styler(Variant::TraditionalChinese);
        let out = s.style("𠀀A🙂", Some('🙂'), Some('𠀀')).unwrap();
        assert_eq!(out.plain_text(), "𠀀A🙂");
        assert_eq!(out.segments()[0], spaced("𠀀"));
    }
}
