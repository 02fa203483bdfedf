//! Main typesetter implementation

use std::collections::HashSet;

use log::{debug, trace};
use serde::Serialize;

use crate::api::Config;
use crate::domain::patterns::{PatternCompiler, Rule};
use crate::domain::segment::StyledOutput;
use crate::domain::styler::Styler;
use crate::domain::variant::{CharacterClassifier, Variant};
use crate::error::Result;
use crate::tree::{
    BoundaryTraversal, ContentTree, Document, NodeKind, Selector, SkipPolicy, TraversalStats,
};

/// Counters of one [`Typesetter::render`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Roots rendered
    pub roots: usize,
    /// Selected roots inside another selected root
    pub nested_roots: usize,
    #[serde(flatten)]
    pub traversal: TraversalStats,
}

impl RenderStats {
    pub fn merge(&mut self, other: &RenderStats) {
        self.roots += other.roots;
        self.nested_roots += other.nested_roots;
        self.traversal.merge(&other.traversal);
    }
}

/// Styles content trees for one configuration
///
/// The class tables and the composite matcher are built once on
/// construction and reused for every call.
#[derive(Debug, Clone)]
pub struct Typesetter {
    config: Config,
    classifier: CharacterClassifier,
    styler: Styler,
    policy: SkipPolicy,
}

impl Typesetter {
    /// Create a typesetter with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(Config::default())
    }

    /// Create a typesetter with custom configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let classifier = CharacterClassifier::new(config.variant, config.strict_mode);
        let matcher = PatternCompiler::new(&classifier).compile()?;
        let styler = Styler::new(matcher, config.style_options());
        let policy = SkipPolicy::new(&config.skip_tags, config.resolved_lang_codes());

        debug!(
            "typesetter ready: variant={} strict={} compress={} auto_space={} lang_codes={:?}",
            config.variant,
            config.strict_mode,
            config.compress_punctuations,
            config.auto_space,
            policy.include_lang_codes()
        );

        Ok(Self {
            config,
            classifier,
            styler,
            policy,
        })
    }

    /// Create a typesetter for a variant code with otherwise default settings
    pub fn for_variant(code: impl Into<String>) -> Result<Self> {
        let config = Config::builder().variant(code).build()?;
        Self::with_config(config)
    }

    /// Get the current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn variant(&self) -> Variant {
        self.config.variant
    }

    pub fn classifier(&self) -> &CharacterClassifier {
        &self.classifier
    }

    pub fn styler(&self) -> &Styler {
        &self.styler
    }

    pub fn policy(&self) -> &SkipPolicy {
        &self.policy
    }

    /// Active rules in matching priority order
    pub fn rules(&self) -> &[Rule] {
        self.styler.matcher().rules()
    }

    /// Style one text run given its neighbouring characters
    pub fn style_text(
        &self,
        text: &str,
        preceding: Option<char>,
        following: Option<char>,
    ) -> Option<StyledOutput> {
        self.styler.style(text, preceding, following)
    }

    /// Style every root matching `selector`
    ///
    /// Each root's content is traversed with no outside context. A root
    /// nested inside another selected root is styled as part of the outer
    /// one only. A root excluded by the skip policy, or lying inside an
    /// excluded element, is left untouched.
    pub fn render<T: ContentTree>(&self, tree: &mut T, selector: &str) -> Result<RenderStats> {
        let roots = tree.select(selector);
        let selected: HashSet<T::NodeId> = roots.iter().copied().collect();
        debug!("selector '{}' matched {} roots", selector, roots.len());

        let mut stats = RenderStats::default();
        for root in roots {
            if has_selected_ancestor(tree, root, &selected) {
                trace!("{:?} is inside another root", root);
                stats.nested_roots += 1;
                continue;
            }
            if self.is_excluded(tree, root) {
                trace!("{:?} is excluded by the skip policy", root);
                stats.traversal.nodes_skipped += 1;
                continue;
            }
            stats.roots += 1;
            stats.traversal.merge(&self.render_node(tree, root)?);
        }
        Ok(stats)
    }

    /// Whether `root` or one of its ancestors is excluded by the skip policy
    fn is_excluded<T: ContentTree>(&self, tree: &T, root: T::NodeId) -> bool {
        std::iter::successors(Some(root), |&n| tree.parent(n))
            .filter(|&n| tree.kind(n) == NodeKind::Element)
            .any(|n| self.policy.skips(tree.tag_name(n), tree.lang(n)))
    }

    /// Style the content of one root node
    pub fn render_node<T: ContentTree>(&self, tree: &mut T, root: T::NodeId) -> Result<TraversalStats> {
        let Some(first) = tree.first_child(root) else {
            return Ok(TraversalStats::default());
        };
        debug!("rendering {:?}", root);
        let (_, stats) = BoundaryTraversal::new(&self.styler, &self.policy).run(tree, first, None, None)?;
        Ok(stats)
    }

    /// Render a [`Document`], rejecting selectors it cannot parse
    pub fn render_document(&self, document: &mut Document, selector: &str) -> Result<RenderStats> {
        Selector::parse(selector)?;
        self.render(document, selector)
    }
}

fn has_selected_ancestor<T: ContentTree>(
    tree: &T,
    node: T::NodeId,
    selected: &HashSet<T::NodeId>,
) -> bool {
    std::iter::successors(tree.parent(node), |&n| tree.parent(n)).any(|n| selected.contains(&n))
}
