//! A small CSS selector subset for picking root nodes
//!
//! Supported: `*`, type selectors, `.class`, `#id`, compounds such as
//! `p.note#intro`, the descendant combinator (`article p`) and selector
//! lists separated by commas.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected character '{ch}' in selector '{selector}'")]
    UnexpectedChar { ch: char, selector: String },

    #[error("missing name after '{prefix}' in selector '{selector}'")]
    MissingName { prefix: char, selector: String },
}

/// Element properties a selector looks at
pub trait Selectable {
    fn tag(&self) -> &str;
    fn id(&self) -> Option<&str>;
    fn has_class(&self, class: &str) -> bool;
}

/// One compound selector, e.g. `p.note#intro`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Compound {
    /// `None` matches any tag
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
}

impl Compound {
    pub fn matches<E: Selectable + ?Sized>(&self, element: &E) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(element.tag()) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|class| element.has_class(class))
    }
}

/// A chain of compounds joined by the descendant combinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    /// Outermost ancestor first, subject last
    pub compounds: Vec<Compound>,
}

impl Complex {
    /// Match `subject` given its ancestors, nearest first
    pub fn matches<'e, E, I>(&self, subject: &E, ancestors: I) -> bool
    where
        E: Selectable + ?Sized + 'e,
        I: IntoIterator<Item = &'e E>,
    {
        let Some((last, rest)) = self.compounds.split_last() else {
            return false;
        };
        if !last.matches(subject) {
            return false;
        }

        let mut pending = rest.iter().rev().peekable();
        for ancestor in ancestors {
            match pending.peek() {
                Some(compound) if compound.matches(ancestor) => {
                    pending.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        pending.peek().is_none()
    }
}

/// A parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(source: &str) -> Result<Self, SelectorError> {
        let mut alternatives = Vec::new();
        for part in source.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(SelectorError::Empty);
            }
            let compounds = part
                .split_whitespace()
                .map(|token| parse_compound(token, source))
                .collect::<Result<Vec<_>, _>>()?;
            alternatives.push(Complex { compounds });
        }

        Ok(Self {
            source: source.trim().to_string(),
            alternatives,
        })
    }

    pub fn alternatives(&self) -> &[Complex] {
        &self.alternatives
    }

    pub fn matches<'e, E, I>(&self, subject: &E, ancestors: I) -> bool
    where
        E: Selectable + ?Sized + 'e,
        I: IntoIterator<Item = &'e E>,
        I::IntoIter: Clone,
    {
        let ancestors = ancestors.into_iter();
        self.alternatives
            .iter()
            .any(|complex| complex.matches(subject, ancestors.clone()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '-' || ch == '_'
}

fn parse_compound(token: &str, selector: &str) -> Result<Compound, SelectorError> {
    let mut compound = Compound::default();
    let mut chars = token.chars().peekable();

    if chars.peek() == Some(&'*') {
        chars.next();
    } else {
        let tag: String = std::iter::from_fn(|| chars.next_if(|&ch| is_name_char(ch))).collect();
        if !tag.is_empty() {
            compound.tag = Some(tag.to_ascii_lowercase());
        }
    }

    while let Some(prefix) = chars.next() {
        if prefix != '.' && prefix != '#' {
            return Err(SelectorError::UnexpectedChar {
                ch: prefix,
                selector: selector.to_string(),
            });
        }
        let name: String = std::iter::from_fn(|| chars.next_if(|&ch| is_name_char(ch))).collect();
        if name.is_empty() {
            return Err(SelectorError::MissingName {
                prefix,
                selector: selector.to_string(),
            });
        }
        if prefix == '.' {
            compound.classes.push(name);
        } else {
            compound.id = Some(name);
        }
    }

    Ok(compound)
}
