//! Language variants and their character tables
//!
//! Each variant starts from the shared base table and overrides a few
//! classes. Rule additions and removals live next to the tables so the whole
//! policy of a variant can be read in one place.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::classes::{CharClass, ClassDef, ClassKind};
use crate::domain::patterns::Rule;
use crate::error::Error;

/// Supported typesetting variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Variant {
    /// Traditional Chinese (Taiwan, Hong Kong)
    #[default]
    TraditionalChinese,
    /// Simplified Chinese (Mainland China)
    SimplifiedChinese,
    /// Japanese
    Japanese,
}

mod ranges {
    pub const BASIC_MARKS: &[(char, char)] = &[
        ('\u{3001}', '\u{3002}'),
        ('\u{ff0c}', '\u{ff0c}'),
        ('\u{ff0e}', '\u{ff0e}'),
    ];
    pub const FULLWIDTH_BANG_COLON_SEMI_QUESTION: &[(char, char)] = &[
        ('\u{ff01}', '\u{ff01}'),
        ('\u{ff1a}', '\u{ff1b}'),
        ('\u{ff1f}', '\u{ff1f}'),
    ];

    pub const BASE_MIDDLE_DOTS: &[(char, char)] = &[('\u{30fb}', '\u{30fb}')];

    pub const BASE_OPENING: &[(char, char)] = &[
        ('\u{2018}', '\u{2018}'),
        ('\u{201c}', '\u{201c}'),
        ('\u{3008}', '\u{3008}'),
        ('\u{300a}', '\u{300a}'),
        ('\u{300c}', '\u{300c}'),
        ('\u{300e}', '\u{300e}'),
        ('\u{3010}', '\u{3010}'),
        ('\u{3014}', '\u{3014}'),
        ('\u{3016}', '\u{3016}'),
        ('\u{ff08}', '\u{ff08}'),
        ('\u{ff3b}', '\u{ff3b}'),
        ('\u{ff5b}', '\u{ff5b}'),
    ];
    pub const BASE_CLOSING: &[(char, char)] = &[
        ('\u{2019}', '\u{2019}'),
        ('\u{201d}', '\u{201d}'),
        ('\u{3009}', '\u{3009}'),
        ('\u{300b}', '\u{300b}'),
        ('\u{300d}', '\u{300d}'),
        ('\u{300f}', '\u{300f}'),
        ('\u{3011}', '\u{3011}'),
        ('\u{3015}', '\u{3015}'),
        ('\u{3017}', '\u{3017}'),
        ('\u{ff09}', '\u{ff09}'),
        ('\u{ff3d}', '\u{ff3d}'),
        ('\u{ff5d}', '\u{ff5d}'),
    ];

    pub const HYPHENS: &[(char, char)] = &[
        ('\u{002c}', '\u{002c}'),
        ('\u{002d}', '\u{002e}'),
        ('\u{2013}', '\u{2014}'),
        ('\u{ff5e}', '\u{ff5e}'),
    ];
    pub const HIRAGANA: &[(char, char)] = &[('\u{3041}', '\u{3096}')];
    pub const KATAKANA: &[(char, char)] = &[('\u{30a1}', '\u{30fa}')];
    pub const IDEOGRAPHS: &[(char, char)] = &[
        ('\u{2e80}', '\u{2fdf}'),
        ('\u{3100}', '\u{3120}'),
        ('\u{3190}', '\u{319f}'),
        ('\u{31a0}', '\u{31ba}'),
        ('\u{31c0}', '\u{31ff}'),
        ('\u{3400}', '\u{4dbf}'),
        ('\u{4e00}', '\u{9fff}'),
        ('\u{f900}', '\u{faff}'),
        ('\u{20000}', '\u{2fa1f}'),
    ];
    pub const LETTERS_AND_DIGITS: &[(char, char)] = &[
        ('\u{0030}', '\u{0039}'),
        ('\u{0041}', '\u{005a}'),
        ('\u{0061}', '\u{007a}'),
        ('\u{00c0}', '\u{00d6}'),
        ('\u{00d8}', '\u{00f6}'),
        ('\u{00f8}', '\u{02af}'),
        ('\u{0372}', '\u{0373}'),
        ('\u{0376}', '\u{0377}'),
        ('\u{037b}', '\u{037d}'),
        ('\u{037f}', '\u{037f}'),
        ('\u{0386}', '\u{0386}'),
        ('\u{0388}', '\u{038a}'),
        ('\u{038c}', '\u{038c}'),
        ('\u{038e}', '\u{0481}'),
        ('\u{048a}', '\u{052f}'),
        ('\u{053a}', '\u{0556}'),
        ('\u{0561}', '\u{0587}'),
    ];

    // Traditional Chinese
    pub const TC_MIDDLE_DOTS: &[(char, char)] = &[('\u{2027}', '\u{2027}')];
    pub const TC_MIDDLE_DOTS_EXT: &[(char, char)] = &[
        ('\u{00b7}', '\u{00b7}'),
        ('\u{ff0e}', '\u{ff0e}'),
        ('\u{30fb}', '\u{30fb}'),
    ];
    pub const TC_OPENING: &[(char, char)] = &[
        ('\u{3008}', '\u{3008}'),
        ('\u{300a}', '\u{300a}'),
        ('\u{300c}', '\u{300c}'),
        ('\u{300e}', '\u{300e}'),
        ('\u{ff08}', '\u{ff08}'),
    ];
    pub const TC_OPENING_EXT: &[(char, char)] = &[
        ('\u{2018}', '\u{2018}'),
        ('\u{201c}', '\u{201c}'),
        ('\u{3010}', '\u{3010}'),
        ('\u{3014}', '\u{3014}'),
        ('\u{3016}', '\u{3016}'),
        ('\u{ff3b}', '\u{ff3b}'),
        ('\u{ff5b}', '\u{ff5b}'),
        ('\u{ff5f}', '\u{ff5f}'),
    ];
    pub const TC_CLOSING: &[(char, char)] = &[
        ('\u{3009}', '\u{3009}'),
        ('\u{300b}', '\u{300b}'),
        ('\u{300d}', '\u{300d}'),
        ('\u{300f}', '\u{300f}'),
        ('\u{ff09}', '\u{ff09}'),
    ];
    pub const TC_CLOSING_EXT: &[(char, char)] = &[
        ('\u{2019}', '\u{2019}'),
        ('\u{201d}', '\u{201d}'),
        ('\u{3011}', '\u{3011}'),
        ('\u{3015}', '\u{3015}'),
        ('\u{3017}', '\u{3017}'),
        ('\u{ff3d}', '\u{ff3d}'),
        ('\u{ff5d}', '\u{ff5d}'),
        ('\u{ff60}', '\u{ff60}'),
    ];

    // Simplified Chinese
    pub const SC_MIDDLE_DOTS: &[(char, char)] = &[('\u{00b7}', '\u{00b7}')];
    pub const SC_MIDDLE_DOTS_EXT: &[(char, char)] =
        &[('\u{2027}', '\u{2027}'), ('\u{30fb}', '\u{30fb}')];
    pub const SC_OPENING: &[(char, char)] = &[
        ('\u{2018}', '\u{2018}'),
        ('\u{201c}', '\u{201c}'),
        ('\u{3008}', '\u{3008}'),
        ('\u{300a}', '\u{300a}'),
        ('\u{3010}', '\u{3010}'),
        ('\u{3014}', '\u{3014}'),
        ('\u{ff08}', '\u{ff08}'),
        ('\u{ff3b}', '\u{ff3b}'),
    ];
    pub const SC_OPENING_EXT: &[(char, char)] = &[
        ('\u{300c}', '\u{300c}'),
        ('\u{300e}', '\u{300e}'),
        ('\u{3016}', '\u{3016}'),
        ('\u{ff5b}', '\u{ff5b}'),
        ('\u{ff5f}', '\u{ff5f}'),
    ];
    pub const SC_CLOSING: &[(char, char)] = &[
        ('\u{2019}', '\u{2019}'),
        ('\u{201d}', '\u{201d}'),
        ('\u{3009}', '\u{3009}'),
        ('\u{300b}', '\u{300b}'),
        ('\u{3011}', '\u{3011}'),
        ('\u{3015}', '\u{3015}'),
        ('\u{ff09}', '\u{ff09}'),
        ('\u{ff3d}', '\u{ff3d}'),
    ];
    pub const SC_CLOSING_EXT: &[(char, char)] = &[
        ('\u{300d}', '\u{300d}'),
        ('\u{300f}', '\u{300f}'),
        ('\u{3017}', '\u{3017}'),
        ('\u{ff5d}', '\u{ff5d}'),
        ('\u{ff60}', '\u{ff60}'),
    ];

    // Japanese
    pub const JP_MIDDLE_DOTS: &[(char, char)] =
        &[('\u{30fb}', '\u{30fb}'), ('\u{ff1a}', '\u{ff1b}')];
    pub const JP_OPENING: &[(char, char)] = &[
        ('\u{300c}', '\u{300c}'),
        ('\u{300e}', '\u{300e}'),
        ('\u{301d}', '\u{301d}'),
        ('\u{ff08}', '\u{ff08}'),
        ('\u{ff5f}', '\u{ff5f}'),
    ];
    pub const JP_OPENING_EXT: &[(char, char)] = &[
        ('\u{2018}', '\u{2018}'),
        ('\u{201c}', '\u{201c}'),
        ('\u{3008}', '\u{3008}'),
        ('\u{300a}', '\u{300a}'),
        ('\u{3010}', '\u{3010}'),
        ('\u{3014}', '\u{3014}'),
        ('\u{3016}', '\u{3016}'),
        ('\u{ff3b}', '\u{ff3b}'),
        ('\u{ff5b}', '\u{ff5b}'),
    ];
    pub const JP_CLOSING: &[(char, char)] = &[
        ('\u{300d}', '\u{300d}'),
        ('\u{300f}', '\u{300f}'),
        ('\u{301f}', '\u{301f}'),
        ('\u{ff09}', '\u{ff09}'),
        ('\u{ff60}', '\u{ff60}'),
    ];
    pub const JP_CLOSING_EXT: &[(char, char)] = &[
        ('\u{2019}', '\u{2019}'),
        ('\u{201d}', '\u{201d}'),
        ('\u{3009}', '\u{3009}'),
        ('\u{300b}', '\u{300b}'),
        ('\u{3011}', '\u{3011}'),
        ('\u{3015}', '\u{3015}'),
        ('\u{3017}', '\u{3017}'),
        ('\u{ff3d}', '\u{ff3d}'),
        ('\u{ff5d}', '\u{ff5d}'),
    ];
}

/// Static class definitions of one variant
#[derive(Debug, Clone, Copy)]
pub struct VariantTable {
    pub basic_marks: ClassDef,
    pub middle_dots: ClassDef,
    pub opening_brackets: ClassDef,
    pub closing_brackets: ClassDef,
    pub hyphens: ClassDef,
    pub hiragana: ClassDef,
    pub katakana: ClassDef,
    pub ideographs: ClassDef,
    pub letters_and_digits: ClassDef,
}

impl VariantTable {
    fn def(&self, kind: ClassKind) -> &ClassDef {
        match kind {
            ClassKind::BasicMark => &self.basic_marks,
            ClassKind::MiddleDot => &self.middle_dots,
            ClassKind::OpeningBracket => &self.opening_brackets,
            ClassKind::ClosingBracket => &self.closing_brackets,
            ClassKind::Hyphen => &self.hyphens,
            ClassKind::Hiragana => &self.hiragana,
            ClassKind::Katakana => &self.katakana,
            ClassKind::Ideograph => &self.ideographs,
            ClassKind::LetterOrDigit => &self.letters_and_digits,
        }
    }
}

const BASE_TABLE: VariantTable = VariantTable {
    basic_marks: ClassDef::strict(ranges::BASIC_MARKS),
    middle_dots: ClassDef::strict(ranges::BASE_MIDDLE_DOTS),
    opening_brackets: ClassDef::strict(ranges::BASE_OPENING),
    closing_brackets: ClassDef::strict(ranges::BASE_CLOSING),
    hyphens: ClassDef::strict(ranges::HYPHENS),
    hiragana: ClassDef::strict(ranges::HIRAGANA),
    katakana: ClassDef::strict(ranges::KATAKANA),
    ideographs: ClassDef::strict(ranges::IDEOGRAPHS),
    letters_and_digits: ClassDef::strict(ranges::LETTERS_AND_DIGITS),
};

const TRADITIONAL_TABLE: VariantTable = VariantTable {
    basic_marks: ClassDef::with_extension(
        ranges::BASIC_MARKS,
        ranges::FULLWIDTH_BANG_COLON_SEMI_QUESTION,
    ),
    middle_dots: ClassDef::with_extension(ranges::TC_MIDDLE_DOTS, ranges::TC_MIDDLE_DOTS_EXT),
    opening_brackets: ClassDef::with_extension(ranges::TC_OPENING, ranges::TC_OPENING_EXT),
    closing_brackets: ClassDef::with_extension(ranges::TC_CLOSING, ranges::TC_CLOSING_EXT),
    ..BASE_TABLE
};

const SIMPLIFIED_TABLE: VariantTable = VariantTable {
    basic_marks: ClassDef::with_extension(
        ranges::BASIC_MARKS,
        ranges::FULLWIDTH_BANG_COLON_SEMI_QUESTION,
    ),
    middle_dots: ClassDef::with_extension(ranges::SC_MIDDLE_DOTS, ranges::SC_MIDDLE_DOTS_EXT),
    opening_brackets: ClassDef::with_extension(ranges::SC_OPENING, ranges::SC_OPENING_EXT),
    closing_brackets: ClassDef::with_extension(ranges::SC_CLOSING, ranges::SC_CLOSING_EXT),
    ..BASE_TABLE
};

const JAPANESE_TABLE: VariantTable = VariantTable {
    middle_dots: ClassDef::strict(ranges::JP_MIDDLE_DOTS),
    opening_brackets: ClassDef::with_extension(ranges::JP_OPENING, ranges::JP_OPENING_EXT),
    closing_brackets: ClassDef::with_extension(ranges::JP_CLOSING, ranges::JP_CLOSING_EXT),
    ..BASE_TABLE
};

/// Rule changes of one variant relative to the base rule set
#[derive(Debug, Clone, Copy)]
pub struct RuleOverrides {
    pub removed: &'static [Rule],
    pub added: &'static [Rule],
}

impl Variant {
    /// All supported variants
    pub const ALL: [Variant; 3] = [
        Variant::TraditionalChinese,
        Variant::SimplifiedChinese,
        Variant::Japanese,
    ];

    /// Parse a variant identifier
    ///
    /// Accepts short codes (`tc`, `sc`, `jp`), BCP 47 style tags and English
    /// names, case-insensitively.
    pub fn from_code(code: &str) -> Result<Self, Error> {
        match code.trim().to_lowercase().as_str() {
            "tc" | "zh-tw" | "zh-hk" | "zh-hant" | "traditional" | "traditional-chinese" => {
                Ok(Variant::TraditionalChinese)
            }
            "sc" | "zh-cn" | "zh-hans" | "simplified" | "simplified-chinese" => {
                Ok(Variant::SimplifiedChinese)
            }
            "jp" | "ja" | "japanese" => Ok(Variant::Japanese),
            _ => Err(Error::UnsupportedVariant(code.to_string())),
        }
    }

    /// Short code of the variant
    pub fn code(&self) -> &'static str {
        match self {
            Variant::TraditionalChinese => "tc",
            Variant::SimplifiedChinese => "sc",
            Variant::Japanese => "jp",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Variant::TraditionalChinese => "Traditional Chinese",
            Variant::SimplifiedChinese => "Simplified Chinese",
            Variant::Japanese => "Japanese",
        }
    }

    /// Language codes whose `lang` attribute is styled when none are configured
    pub fn default_lang_codes(&self) -> &'static [&'static str] {
        match self {
            Variant::TraditionalChinese => &["zh", "zh-TW", "zh-HK"],
            Variant::SimplifiedChinese => &["zh", "zh-CN"],
            Variant::Japanese => &["jp"],
        }
    }

    pub fn table(&self) -> &'static VariantTable {
        match self {
            Variant::TraditionalChinese => &TRADITIONAL_TABLE,
            Variant::SimplifiedChinese => &SIMPLIFIED_TABLE,
            Variant::Japanese => &JAPANESE_TABLE,
        }
    }

    pub fn rule_overrides(&self) -> RuleOverrides {
        match self {
            Variant::TraditionalChinese => RuleOverrides {
                removed: &[Rule::MarkBeforeClosing],
                added: &[],
            },
            Variant::SimplifiedChinese => RuleOverrides {
                removed: &[Rule::ClosingBeforeMiddleDot, Rule::MiddleDotBeforeOpening],
                added: &[Rule::RepeatedExclamQuestion, Rule::BareMiddleDot],
            },
            Variant::Japanese => RuleOverrides {
                removed: &[],
                added: &[],
            },
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Variant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl TryFrom<String> for Variant {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_code(&value)
    }
}

impl From<Variant> for String {
    fn from(variant: Variant) -> Self {
        variant.code().to_string()
    }
}

/// Resolved character classes of a variant
#[derive(Debug, Clone)]
pub struct CharacterClassifier {
    variant: Variant,
    strict_mode: bool,
    classes: [CharClass; 9],
}

impl CharacterClassifier {
    pub fn new(variant: Variant, strict_mode: bool) -> Self {
        let table = variant.table();
        let classes = ClassKind::ALL
            .map(|kind| table.def(kind).resolve(strict_mode || !kind.is_extensible()));
        Self {
            variant,
            strict_mode,
            classes,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    /// The resolved class of the given kind
    pub fn class(&self, kind: ClassKind) -> &CharClass {
        &self.classes[kind as usize]
    }

    #[inline]
    pub fn contains(&self, kind: ClassKind, ch: char) -> bool {
        self.class(kind).contains(ch)
    }

    /// Every class the character belongs to, in table order
    pub fn classify(&self, ch: char) -> smallvec::SmallVec<[ClassKind; 2]> {
        ClassKind::ALL
            .iter()
            .copied()
            .filter(|&kind| self.contains(kind, ch))
            .collect()
    }
}
