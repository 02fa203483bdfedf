//! Character classes used by the punctuation and spacing rules
//!
//! A class is a sorted, immutable list of inclusive code-point ranges. Classes
//! render themselves as regex bracket-expression bodies so that the pattern
//! compiler never has to deal with escaping.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named character classes recognised by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    /// Comma/period family punctuation (、。，．)
    BasicMark,
    /// Interpunct family used as a word separator
    MiddleDot,
    /// Opening brackets and quotes
    OpeningBracket,
    /// Closing brackets and quotes
    ClosingBracket,
    /// Hyphen-like and dash marks
    Hyphen,
    /// Hiragana syllabary
    Hiragana,
    /// Katakana syllabary
    Katakana,
    /// Han ideographs, radicals and strokes
    Ideograph,
    /// Latin, Greek, Cyrillic and Armenian letters plus ASCII digits
    LetterOrDigit,
}

impl ClassKind {
    /// Every class kind, in table order
    pub const ALL: [ClassKind; 9] = [
        ClassKind::BasicMark,
        ClassKind::MiddleDot,
        ClassKind::OpeningBracket,
        ClassKind::ClosingBracket,
        ClassKind::Hyphen,
        ClassKind::Hiragana,
        ClassKind::Katakana,
        ClassKind::Ideograph,
        ClassKind::LetterOrDigit,
    ];

    /// Whether non-strict mode may extend this class
    pub fn is_extensible(&self) -> bool {
        matches!(
            self,
            ClassKind::BasicMark
                | ClassKind::MiddleDot
                | ClassKind::OpeningBracket
                | ClassKind::ClosingBracket
        )
    }

    /// Snake-case name used in listings and configuration
    pub fn name(&self) -> &'static str {
        match self {
            ClassKind::BasicMark => "basic_mark",
            ClassKind::MiddleDot => "middle_dot",
            ClassKind::OpeningBracket => "opening_bracket",
            ClassKind::ClosingBracket => "closing_bracket",
            ClassKind::Hyphen => "hyphen",
            ClassKind::Hiragana => "hiragana",
            ClassKind::Katakana => "katakana",
            ClassKind::Ideograph => "ideograph",
            ClassKind::LetterOrDigit => "letter_or_digit",
        }
    }
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable set of code-point ranges
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharClass {
    ranges: Vec<(char, char)>,
}

impl CharClass {
    /// Build a class from inclusive ranges
    ///
    /// Ranges are sorted and overlapping or adjacent ranges are merged, so two
    /// classes with the same members always compare equal.
    pub fn from_ranges(ranges: &[(char, char)]) -> Self {
        let mut sorted: Vec<(char, char)> = ranges
            .iter()
            .map(|&(lo, hi)| if lo <= hi { (lo, hi) } else { (hi, lo) })
            .collect();
        sorted.sort_unstable();

        let mut merged: Vec<(char, char)> = Vec::with_capacity(sorted.len());
        for (lo, hi) in sorted {
            if let Some(last) = merged.last_mut() {
                if (lo as u32) <= (last.1 as u32).saturating_add(1) {
                    if hi > last.1 {
                        last.1 = hi;
                    }
                    continue;
                }
            }
            merged.push((lo, hi));
        }

        Self { ranges: merged }
    }

    /// Build a class from individual characters
    pub fn from_chars(chars: &[char]) -> Self {
        let ranges: Vec<(char, char)> = chars.iter().map(|&c| (c, c)).collect();
        Self::from_ranges(&ranges)
    }

    /// Union of this class and `other`
    pub fn union(&self, other: &CharClass) -> Self {
        let mut ranges = self.ranges.clone();
        ranges.extend_from_slice(&other.ranges);
        Self::from_ranges(&ranges)
    }

    /// Check membership
    #[inline]
    pub fn contains(&self, ch: char) -> bool {
        self.ranges
            .binary_search_by(|&(lo, hi)| {
                if hi < ch {
                    std::cmp::Ordering::Less
                } else if lo > ch {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .is_ok()
    }

    /// True when every member of `self` is also a member of `other`
    pub fn is_subset_of(&self, other: &CharClass) -> bool {
        self.ranges.iter().all(|&(lo, hi)| {
            other
                .ranges
                .iter()
                .any(|&(olo, ohi)| olo <= lo && hi <= ohi)
        })
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The normalised ranges
    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    /// Render as the body of a regex bracket expression (without the brackets)
    pub fn to_regex_body(&self) -> String {
        let mut body = String::with_capacity(self.ranges.len() * 16);
        for &(lo, hi) in &self.ranges {
            body.push_str(&format!("\\x{{{:x}}}", lo as u32));
            if hi != lo {
                body.push_str(&format!("-\\x{{{:x}}}", hi as u32));
            }
        }
        body
    }

    /// Render as a complete bracket expression
    ///
    /// An empty class renders as a set that never matches, which keeps rule
    /// templates valid even when a variant leaves a class empty.
    pub fn to_regex(&self) -> String {
        if self.ranges.is_empty() {
            "[^\\x{0}-\\x{10ffff}]".to_string()
        } else {
            format!("[{}]", self.to_regex_body())
        }
    }
}

/// Strict and non-strict halves of one class definition
#[derive(Debug, Clone, Copy)]
pub struct ClassDef {
    pub strict: &'static [(char, char)],
    pub extension: &'static [(char, char)],
}

impl ClassDef {
    pub const fn strict(strict: &'static [(char, char)]) -> Self {
        Self {
            strict,
            extension: &[],
        }
    }

    pub const fn with_extension(
        strict: &'static [(char, char)],
        extension: &'static [(char, char)],
    ) -> Self {
        Self { strict, extension }
    }

    /// Resolve to a class, merging the extension when `strict_mode` is off
    pub fn resolve(&self, strict_mode: bool) -> CharClass {
        let base = CharClass::from_ranges(self.strict);
        if strict_mode || self.extension.is_empty() {
            base
        } else {
            base.union(&CharClass::from_ranges(self.extension))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_are_merged() {
        let class = CharClass::from_ranges(&[('c', 'e'), ('a', 'b'), ('d', 'g')]);
        assert_eq!(class.ranges(), &[('a', 'g')]);
    }

    #[test]
    fn test_contains() {
        let class = CharClass::from_ranges(&[('\u{3041}', '\u{3096}'), ('A', 'Z')]);
        assert!(class.contains('あ'));
        assert!(class.contains('Q'));
        assert!(!class.contains('q'));
        assert!(!class.contains('ア'));
    }

    #[test]
    fn test_regex_rendering() {
        let class = CharClass::from_chars(&['、', '。']);
        assert_eq!(class.to_regex(), "[\\x{3001}-\\x{3002}]");

        let single = CharClass::from_chars(&['·']);
        assert_eq!(single.to_regex(), "[\\x{b7}]");
    }

    #[test]
    fn test_empty_class_never_matches() {
        let empty = CharClass::default();
        let re = regex::Regex::new(&empty.to_regex()).unwrap();
        assert!(!re.is_match("abc、。"));
    }

    #[test]
    fn test_extension_only_in_loose_mode() {
        const STRICT: &[(char, char)] = &[('、', '、')];
        const EXT: &[(char, char)] = &[('！', '！')];
        let def = ClassDef::with_extension(STRICT, EXT);

        assert!(!def.resolve(true).contains('！'));
        assert!(def.resolve(false).contains('！'));
        assert!(def.resolve(true).is_subset_of(&def.resolve(false)));
    }
}
