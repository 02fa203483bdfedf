//! CJK typography markup for content trees
//!
//! This crate marks up CJK text for finer typesetting: full-width
//! punctuation that should be compressed to half width is wrapped in
//! `halfwidth` spans, and characters at boundaries between CJK and Latin
//! text are wrapped in `extra-spaced` spans. Rendering of those classes is
//! left to the stylesheet of the host.
//!
//! # Architecture
//!
//! - **Domain layer**: per-variant character classes, the rule patterns
//!   compiled into one matcher, and the styler for single text runs
//! - **Tree layer**: the [`ContentTree`](tree::ContentTree) capability, the
//!   boundary-propagating traversal and an in-memory [`Document`](tree::Document)
//! - **API layer**: [`Config`] and the [`Typesetter`] tying everything together
//!
//! # Example
//!
//! ```rust
//! use cjtypo_core::{Config, Typesetter};
//! use cjtypo_core::tree::Document;
//!
//! let config = Config::builder().variant("tc").build().unwrap();
//! let typesetter = Typesetter::with_config(config).unwrap();
//!
//! let mut doc = Document::from_paragraphs("用Rust寫「程式」");
//! typesetter.render(&mut doc, "p").unwrap();
//!
//! assert_eq!(
//!     doc.to_html(),
//!     "<p><span class=\"extra-spaced\">用</span>Rus<span class=\"extra-spaced\">t</span>寫「程式」</p>"
//! );
//! ```

pub mod api;
pub mod domain;
pub mod error;
pub mod tree;

pub use api::{Config, ConfigBuilder, RenderStats, Typesetter};
pub use domain::{Segment, StyleKind, StyledOutput, Variant};
pub use error::{Error, Result};
