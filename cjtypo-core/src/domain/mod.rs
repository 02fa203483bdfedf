//! Styling domain: character classes, rule patterns and the text styler
//!
//! Everything here works on plain strings. Tree handling lives in
//! [`crate::tree`].

pub mod classes;
pub mod patterns;
pub mod segment;
pub mod styler;
pub mod variant;

pub use classes::{CharClass, ClassKind};
pub use patterns::{Category, Matcher, PatternCompiler, Rule, RuleMatch};
pub use segment::{Segment, StyleKind, StyledOutput};
pub use styler::{StyleOptions, Styler};
pub use variant::{CharacterClassifier, Variant};
