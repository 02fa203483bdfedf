//! Public API of the styling core
//!
//! [`Typesetter`] bundles a [`Config`], the variant's character classes and
//! the compiled matcher, and applies them to any [`ContentTree`].
//!
//! [`ContentTree`]: crate::tree::ContentTree

mod config;
mod typesetter;

#[cfg(test)]
mod tests;

pub use crate::error::{Error, Result};
pub use config::{defaults, Config, ConfigBuilder};
pub use typesetter::{RenderStats, Typesetter};
