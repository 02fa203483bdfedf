//! Rule patterns and the composite matcher
//!
//! Every rule belongs to one of three categories. The compiler collects the
//! rules of a variant, renders each one against the variant's classes and
//! joins them into a single regex:
//!
//! ```text
//! (?P<half_width>r0|r1|..)|(?P<lookbehind>..)|(?P<auto_space>..)
//! ```
//!
//! The regex engine has no lookaround, so a rule's trailing context is
//! compiled as a consuming capture group (`la<N>`). The start of that group
//! is the logical end of the match.

use std::fmt;

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::classes::{CharClass, ClassKind};
use crate::domain::variant::CharacterClassifier;

/// What a match asks the styler to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Compress the whole match to half width
    HalfWidth,
    /// Compress everything but the first character of the match
    HalfWidthLookbehind,
    /// Add spacing around a script boundary
    AutoSpace,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::HalfWidth,
        Category::HalfWidthLookbehind,
        Category::AutoSpace,
    ];

    fn group_name(&self) -> &'static str {
        match self {
            Category::HalfWidth => "half_width",
            Category::HalfWidthLookbehind => "lookbehind",
            Category::AutoSpace => "auto_space",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.group_name())
    }
}

/// Individual rewrite rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Basic mark followed by a closing bracket
    MarkBeforeClosing,
    /// Closing bracket followed by a basic mark
    ClosingBeforeMark,
    /// Run of closing brackets followed by another closing bracket
    ClosingRun,
    /// Closing bracket followed by a middle dot
    ClosingBeforeMiddleDot,
    /// Run of full-width `!`/`?` followed by another one
    RepeatedExclamQuestion,
    /// Any middle dot
    BareMiddleDot,
    /// Basic mark then opening bracket; only the bracket is compressed
    MarkBeforeOpening,
    /// Closing bracket then opening bracket; only the opening one is compressed
    ClosingBeforeOpening,
    /// Opening bracket followed by more opening brackets
    OpeningRun,
    /// Middle dot then opening bracket; only the bracket is compressed
    MiddleDotBeforeOpening,
    /// Kana or ideograph followed by a Latin letter or digit
    ScriptBeforeLatin,
    /// Latin letter or digit followed by kana or an ideograph
    LatinBeforeScript,
}

/// Base half-width rules, in priority order
pub const HALF_WIDTH_RULES: &[Rule] = &[
    Rule::MarkBeforeClosing,
    Rule::ClosingBeforeMark,
    Rule::ClosingRun,
    Rule::ClosingBeforeMiddleDot,
];

/// Base lookbehind-style half-width rules, in priority order
pub const LOOKBEHIND_RULES: &[Rule] = &[
    Rule::MarkBeforeOpening,
    Rule::ClosingBeforeOpening,
    Rule::OpeningRun,
    Rule::MiddleDotBeforeOpening,
];

/// Auto-space rules
pub const AUTO_SPACE_RULES: &[Rule] = &[Rule::ScriptBeforeLatin, Rule::LatinBeforeScript];

/// A rule rendered against concrete classes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePattern {
    pub rule: Rule,
    pub body: String,
    pub lookahead: Option<String>,
}

impl Rule {
    pub fn category(&self) -> Category {
        match self {
            Rule::MarkBeforeClosing
            | Rule::ClosingBeforeMark
            | Rule::ClosingRun
            | Rule::ClosingBeforeMiddleDot
            | Rule::RepeatedExclamQuestion
            | Rule::BareMiddleDot => Category::HalfWidth,
            Rule::MarkBeforeOpening
            | Rule::ClosingBeforeOpening
            | Rule::OpeningRun
            | Rule::MiddleDotBeforeOpening => Category::HalfWidthLookbehind,
            Rule::ScriptBeforeLatin | Rule::LatinBeforeScript => Category::AutoSpace,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rule::MarkBeforeClosing => "mark_before_closing",
            Rule::ClosingBeforeMark => "closing_before_mark",
            Rule::ClosingRun => "closing_run",
            Rule::ClosingBeforeMiddleDot => "closing_before_middle_dot",
            Rule::RepeatedExclamQuestion => "repeated_exclam_question",
            Rule::BareMiddleDot => "bare_middle_dot",
            Rule::MarkBeforeOpening => "mark_before_opening",
            Rule::ClosingBeforeOpening => "closing_before_opening",
            Rule::OpeningRun => "opening_run",
            Rule::MiddleDotBeforeOpening => "middle_dot_before_opening",
            Rule::ScriptBeforeLatin => "script_before_latin",
            Rule::LatinBeforeScript => "latin_before_script",
        }
    }

    /// Render the rule against a classifier's classes
    pub fn render(&self, classifier: &CharacterClassifier) -> RulePattern {
        let class = |kind: ClassKind| classifier.class(kind).to_regex();
        let marks = class(ClassKind::BasicMark);
        let dots = class(ClassKind::MiddleDot);
        let opening = class(ClassKind::OpeningBracket);
        let closing = class(ClassKind::ClosingBracket);

        let (body, lookahead) = match self {
            Rule::MarkBeforeClosing => (marks, Some(closing)),
            Rule::ClosingBeforeMark => (closing, Some(marks)),
            Rule::ClosingRun => (format!("{closing}+"), Some(closing)),
            Rule::ClosingBeforeMiddleDot => (closing, Some(dots)),
            Rule::RepeatedExclamQuestion => {
                let bang_question = CharClass::from_chars(&['\u{ff01}', '\u{ff1f}']).to_regex();
                (format!("{bang_question}+"), Some(bang_question))
            }
            Rule::BareMiddleDot => (dots, None),
            Rule::MarkBeforeOpening => (format!("{marks}{opening}"), None),
            Rule::ClosingBeforeOpening => (format!("{closing}{opening}"), None),
            Rule::OpeningRun => (format!("{opening}{opening}+"), None),
            Rule::MiddleDotBeforeOpening => (format!("{dots}{opening}"), None),
            Rule::ScriptBeforeLatin => (
                script_class(classifier).to_regex(),
                Some(class(ClassKind::LetterOrDigit)),
            ),
            Rule::LatinBeforeScript => (
                class(ClassKind::LetterOrDigit),
                Some(script_class(classifier).to_regex()),
            ),
        };

        RulePattern {
            rule: *self,
            body,
            lookahead,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Hiragana, katakana and ideographs as one class
fn script_class(classifier: &CharacterClassifier) -> CharClass {
    classifier
        .class(ClassKind::Hiragana)
        .union(classifier.class(ClassKind::Katakana))
        .union(classifier.class(ClassKind::Ideograph))
}

/// Builds the rule lists of a variant and compiles them
#[derive(Debug)]
pub struct PatternCompiler<'a> {
    classifier: &'a CharacterClassifier,
}

impl<'a> PatternCompiler<'a> {
    pub fn new(classifier: &'a CharacterClassifier) -> Self {
        Self { classifier }
    }

    /// Rules of one category after the variant's overrides, in priority order
    pub fn rules(&self, category: Category) -> Vec<Rule> {
        let base = match category {
            Category::HalfWidth => HALF_WIDTH_RULES,
            Category::HalfWidthLookbehind => LOOKBEHIND_RULES,
            Category::AutoSpace => AUTO_SPACE_RULES,
        };
        let overrides = self.classifier.variant().rule_overrides();

        let mut rules: Vec<Rule> = base
            .iter()
            .copied()
            .filter(|rule| !overrides.removed.contains(rule))
            .collect();
        for rule in overrides.added.iter().copied() {
            if rule.category() == category && !rules.contains(&rule) {
                rules.push(rule);
            }
        }
        rules
    }

    /// Rendered patterns of one category
    pub fn patterns(&self, category: Category) -> Vec<RulePattern> {
        self.rules(category)
            .iter()
            .map(|rule| rule.render(self.classifier))
            .collect()
    }

    /// Compile all categories into one matcher
    pub fn compile(&self) -> Result<Matcher, regex::Error> {
        let mut rules = Vec::new();
        let mut alternatives = Vec::with_capacity(Category::ALL.len());

        for category in Category::ALL {
            let mut branches = Vec::new();
            for pattern in self.patterns(category) {
                let index = rules.len();
                let branch = match &pattern.lookahead {
                    Some(lookahead) => format!("(?P<r{index}>{}(?P<la{index}>{lookahead}))", pattern.body),
                    None => format!("(?P<r{index}>{})", pattern.body),
                };
                branches.push(branch);
                rules.push(pattern.rule);
            }
            let inner = if branches.is_empty() {
                CharClass::default().to_regex()
            } else {
                branches.join("|")
            };
            alternatives.push(format!("(?P<{}>{inner})", category.group_name()));
        }

        let source = alternatives.join("|");
        let regex = Regex::new(&source)?;
        debug!(
            "compiled {} matcher: {} rules, {} bytes of pattern (strict: {})",
            self.classifier.variant().code(),
            rules.len(),
            source.len(),
            self.classifier.strict_mode()
        );

        let groups = (0..rules.len())
            .map(|index| (format!("r{index}"), format!("la{index}")))
            .collect();

        Ok(Matcher {
            regex,
            rules,
            groups,
        })
    }
}

/// One match of the composite pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub category: Category,
    pub rule: Rule,
    /// Byte offset of the first matched character
    pub start: usize,
    /// Byte offset just past the match, trailing context excluded
    pub end: usize,
}

/// The composite pattern of one variant
///
/// The matcher keeps no scan state; callers pass the start offset of every
/// search, so one instance can serve any number of styling calls.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    rules: Vec<Rule>,
    /// Rule group and trailing-context group names, parallel to `rules`
    groups: Vec<(String, String)>,
}

impl Matcher {
    /// Find the leftmost match starting at or after byte offset `start`
    pub fn find_at(&self, haystack: &str, start: usize) -> Option<RuleMatch> {
        let caps = self.regex.captures_at(haystack, start)?;

        let category = Category::ALL
            .into_iter()
            .find(|category| caps.name(category.group_name()).is_some())?;

        let (index, whole) = self
            .groups
            .iter()
            .enumerate()
            .find_map(|(index, (rule_group, _))| caps.name(rule_group).map(|m| (index, m)))?;

        let end = caps
            .name(&self.groups[index].1)
            .map_or(whole.end(), |lookahead| lookahead.start());

        Some(RuleMatch {
            category,
            rule: self.rules[index],
            start: whole.start(),
            end,
        })
    }

    /// Iterate non-overlapping matches, resuming right after each match
    pub fn find_iter<'a>(&'a self, haystack: &'a str) -> impl Iterator<Item = RuleMatch> + 'a {
        let mut cursor = 0;
        std::iter::from_fn(move || {
            if cursor > haystack.len() {
                return None;
            }
            let found = self.find_at(haystack, cursor)?;
            cursor = found.end.max(found.start + 1);
            while cursor < haystack.len() && !haystack.is_char_boundary(cursor) {
                cursor += 1;
            }
            Some(found)
        })
    }

    /// Rules in the order they appear in the composite pattern
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// The composite pattern source
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Populated (category groups, rule groups) of the match at `start`
    #[cfg(test)]
    fn populated_groups_at(&self, haystack: &str, start: usize) -> Option<(usize, usize)> {
        let caps = self.regex.captures_at(haystack, start)?;
        let categories = Category::ALL
            .iter()
            .filter(|category| caps.name(category.group_name()).is_some())
            .count();
        let rules = self
            .groups
            .iter()
            .filter(|(rule_group, _)| caps.name(rule_group).is_some())
            .count();
        Some((categories, rules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::variant::Variant;

    fn matcher(variant: Variant, strict: bool) -> Matcher {
        let classifier = CharacterClassifier::new(variant, strict);
        PatternCompiler::new(&classifier).compile().unwrap()
    }

    #[test]
    fn test_traditional_drops_mark_before_closing() {
        let classifier = CharacterClassifier::new(Variant::TraditionalChinese, true);
        let rules = PatternCompiler::new(&classifier).rules(Category::HalfWidth);
        assert_eq!(
            rules,
            vec![
                Rule::ClosingBeforeMark,
                Rule::ClosingRun,
                Rule::ClosingBeforeMiddleDot
            ]
        );
    }

    #[test]
    fn test_simplified_overrides() {
        let classifier = CharacterClassifier::new(Variant::SimplifiedChinese, true);
        let compiler = PatternCompiler::new(&classifier);
        assert_eq!(
            compiler.rules(Category::HalfWidth),
            vec![
                Rule::MarkBeforeClosing,
                Rule::ClosingBeforeMark,
                Rule::ClosingRun,
                Rule::RepeatedExclamQuestion,
                Rule::BareMiddleDot,
            ]
        );
        assert!(!compiler
            .rules(Category::HalfWidthLookbehind)
            .contains(&Rule::MiddleDotBeforeOpening));
    }

    #[test]
    fn test_japanese_uses_base_rules() {
        let classifier = CharacterClassifier::new(Variant::Japanese, true);
        let compiler = PatternCompiler::new(&classifier);
        assert_eq!(compiler.rules(Category::HalfWidth), HALF_WIDTH_RULES);
        assert_eq!(compiler.rules(Category::HalfWidthLookbehind), LOOKBEHIND_RULES);
        assert_eq!(compiler.rules(Category::AutoSpace), AUTO_SPACE_RULES);
    }

    #[test]
    fn test_lookahead_is_excluded_from_match() {
        let m = matcher(Variant::Japanese, true);
        let text = "好，」";
        let found = m.find_at(text, 0).unwrap();
        assert_eq!(found.rule, Rule::MarkBeforeClosing);
        assert_eq!(found.category, Category::HalfWidth);
        assert_eq!(&text[found.start..found.end], "，");
    }

    #[test]
    fn test_closing_run_keeps_last_bracket_out() {
        let m = matcher(Variant::Japanese, true);
        let text = "」』）";
        let found = m.find_at(text, 0).unwrap();
        assert_eq!(found.rule, Rule::ClosingRun);
        assert_eq!(&text[found.start..found.end], "」』");
    }

    #[test]
    fn test_lookbehind_category_consumes_both() {
        let m = matcher(Variant::TraditionalChinese, true);
        let text = "」「";
        let found = m.find_at(text, 0).unwrap();
        assert_eq!(found.category, Category::HalfWidthLookbehind);
        assert_eq!(found.rule, Rule::ClosingBeforeOpening);
        assert_eq!(&text[found.start..found.end], "」「");
    }

    #[test]
    fn test_auto_space_both_directions() {
        let m = matcher(Variant::TraditionalChinese, true);

        let text = "中A";
        let found = m.find_at(text, 0).unwrap();
        assert_eq!(found.category, Category::AutoSpace);
        assert_eq!(&text[found.start..found.end], "中");

        let text = "A中";
        let found = m.find_at(text, 0).unwrap();
        assert_eq!(found.rule, Rule::LatinBeforeScript);
        assert_eq!(&text[found.start..found.end], "A");
    }

    #[test]
    fn test_find_at_respects_start() {
        let m = matcher(Variant::TraditionalChinese, true);
        let text = "中A中";
        let first = m.find_at(text, 0).unwrap();
        assert_eq!(first.start, 0);
        let second = m.find_at(text, first.end).unwrap();
        assert_eq!(&text[second.start..second.end], "A");
    }

    #[test]
    fn test_no_match_for_unrelated_text() {
        let m = matcher(Variant::SimplifiedChinese, true);
        assert!(m.find_at("hello world", 0).is_none());
        assert!(m.find_at("", 0).is_none());
        assert!(m.find_at("🙂🙂", 0).is_none());
    }

    #[test]
    fn test_find_iter_yields_one_category_per_match() {
        let m = matcher(Variant::SimplifiedChinese, false);
        let text = "他说：“你好。”然后（Hello）走了·再见！！？";
        let found: Vec<RuleMatch> = m.find_iter(text).collect();
        assert!(!found.is_empty());
        for hit in found {
            assert_eq!(hit.rule.category(), hit.category);
            assert!(hit.start < hit.end);
        }
    }

    #[test]
    fn test_every_rule_compiles_for_every_variant() {
        for variant in Variant::ALL {
            for strict in [true, false] {
                let m = matcher(variant, strict);
                assert!(!m.rules().is_empty());
                assert!(m.as_str().contains("(?P<auto_space>"));
            }
        }
    }

    #[test]
    fn test_match_populates_one_category_group() {
        let m = matcher(Variant::SimplifiedChinese, false);
        let text = "他说：“你好。”（Hello）·再见！！？";
        let mut start = 0;
        while let Some(found) = m.find_at(text, start) {
            assert_eq!(m.populated_groups_at(text, start), Some((1, 1)));
            start = found.end.max(found.start + 1);
            while !text.is_char_boundary(start) {
                start += 1;
            }
        }
        assert_eq!(m.populated_groups_at("plain", 0), None);
    }

    const ALPHABET: &[char] = &[
        'a', '7', '中', 'か', 'カ', '、', '。', '，', '！', '？', '：', '·', '‧', '・', '「',
        '」', '（', '）', '“', '”', '【', '】', '-', ' ',
    ];

    proptest::proptest! {
        #[test]
        fn every_match_populates_exactly_one_category_group(
            chars in proptest::collection::vec(proptest::sample::select(ALPHABET), 0..20),
            variant in proptest::sample::select(Variant::ALL.to_vec()),
            strict in proptest::bool::ANY,
        ) {
            let text: String = chars.into_iter().collect();
            let m = matcher(variant, strict);
            for (start, _) in text.char_indices() {
                if m.find_at(&text, start).is_some() {
                    proptest::prop_assert_eq!(m.populated_groups_at(&text, start), Some((1, 1)));
                }
            }
        }
    }
}
