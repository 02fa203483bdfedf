//! Boundary-propagating traversal of a content tree
//!
//! Every node is entered with the character that precedes it and the one
//! that follows it in reading order. The following character is only known
//! once the next sibling has been resolved, so siblings are processed right
//! to left and each node reports its own first character back to the node
//! on its left (or to its parent).
//!
//! The walk uses an explicit frame stack; neither tree depth nor the number
//! of siblings grows the call stack.

use log::trace;
use serde::Serialize;

use crate::domain::segment::StyleKind;
use crate::domain::styler::Styler;
use crate::tree::policy::{NodeDecision, SkipPolicy};
use crate::tree::{ContentTree, NodeKind, TreeError};

/// Counters collected during one traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TraversalStats {
    /// Leaves replaced with styled content
    pub leaves_styled: usize,
    /// Non-empty text leaves where no rule fired
    pub leaves_unchanged: usize,
    /// Elements excluded by the skip policy
    pub nodes_skipped: usize,
    pub halfwidth_segments: usize,
    pub extra_spaced_segments: usize,
}

impl TraversalStats {
    pub fn merge(&mut self, other: &TraversalStats) {
        self.leaves_styled += other.leaves_styled;
        self.leaves_unchanged += other.leaves_unchanged;
        self.nodes_skipped += other.nodes_skipped;
        self.halfwidth_segments += other.halfwidth_segments;
        self.extra_spaced_segments += other.extra_spaced_segments;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Enter,
    AwaitSibling,
    Body,
    AwaitChild,
}

#[derive(Debug, Clone, Copy)]
struct Frame<N> {
    node: N,
    preceding: Option<char>,
    following: Option<char>,
    decision: Option<NodeDecision>,
    stage: Stage,
}

impl<N> Frame<N> {
    fn new(node: N, preceding: Option<char>, following: Option<char>) -> Self {
        Self {
            node,
            preceding,
            following,
            decision: None,
            stage: Stage::Enter,
        }
    }
}

/// Walks a tree and styles its text leaves
#[derive(Debug, Clone, Copy)]
pub struct BoundaryTraversal<'a> {
    styler: &'a Styler,
    policy: &'a SkipPolicy,
}

impl<'a> BoundaryTraversal<'a> {
    pub fn new(styler: &'a Styler, policy: &'a SkipPolicy) -> Self {
        Self { styler, policy }
    }

    /// Style `start` and all of its following siblings and descendants
    ///
    /// Returns the first character of `start` as seen by its parent, along
    /// with the traversal counters. The first mutation that fails aborts the
    /// walk; leaves styled before it keep their markup.
    pub fn run<T: ContentTree>(
        &self,
        tree: &mut T,
        start: T::NodeId,
        preceding: Option<char>,
        following: Option<char>,
    ) -> Result<(Option<char>, TraversalStats), TreeError> {
        let mut stats = TraversalStats::default();
        let mut stack = vec![Frame::new(start, preceding, following)];
        let mut returned: Option<char> = None;

        while let Some(top) = stack.len().checked_sub(1) {
            let frame = stack[top];
            match frame.stage {
                Stage::Enter => {
                    let decision = NodeDecision::inspect(tree, frame.node, self.policy);
                    stack[top].decision = Some(decision);

                    match tree.next_sibling(frame.node) {
                        Some(sibling) => {
                            let mut last = decision.last_char.filter(|_| decision.is_inline);
                            if decision.is_inline && decision.is_ignorable && last.is_none() {
                                last = frame.preceding;
                            }
                            stack[top].stage = Stage::AwaitSibling;
                            stack.push(Frame::new(sibling, last, frame.following));
                        }
                        None => stack[top].stage = Stage::Body,
                    }
                }
                Stage::AwaitSibling => {
                    stack[top].following = returned.take();
                    stack[top].stage = Stage::Body;
                }
                Stage::Body => {
                    let decision = decision_of(&frame);
                    let (preceding, following) = if decision.is_inline {
                        (frame.preceding, frame.following)
                    } else {
                        (None, None)
                    };

                    if decision.is_skipped {
                        trace!("skipping {:?}", frame.node);
                        stats.nodes_skipped += 1;
                        returned = finish(&frame, None);
                        stack.pop();
                    } else if let Some(child) = tree.first_child(frame.node) {
                        stack[top].stage = Stage::AwaitChild;
                        stack.push(Frame::new(child, preceding, following));
                    } else {
                        self.style_leaf(tree, frame.node, preceding, following, &mut stats)?;
                        returned = finish(&frame, decision.first_char);
                        stack.pop();
                    }
                }
                Stage::AwaitChild => {
                    let first = returned.take();
                    returned = finish(&frame, first);
                    stack.pop();
                }
            }
        }

        Ok((returned, stats))
    }

    fn style_leaf<T: ContentTree>(
        &self,
        tree: &mut T,
        node: T::NodeId,
        preceding: Option<char>,
        following: Option<char>,
        stats: &mut TraversalStats,
    ) -> Result<(), TreeError> {
        if tree.kind(node) != NodeKind::Text {
            return Ok(());
        }

        let text = tree.text_content(node);
        let Some(output) = self.styler.style(&text, preceding, following) else {
            return Ok(());
        };

        if output.is_unchanged() {
            stats.leaves_unchanged += 1;
            return Ok(());
        }

        trace!(
            "styling {:?} ({:?} | {} | {:?}) -> {}",
            node,
            preceding,
            text,
            following,
            output
        );
        tree.replace_with(node, &output)?;
        stats.leaves_styled += 1;
        stats.halfwidth_segments += output.count(StyleKind::HalfWidth);
        stats.extra_spaced_segments += output.count(StyleKind::ExtraSpaced);
        Ok(())
    }
}

fn decision_of<N>(frame: &Frame<N>) -> NodeDecision {
    frame.decision.unwrap_or(NodeDecision {
        is_inline: false,
        is_ignorable: false,
        is_skipped: true,
        first_char: None,
        last_char: None,
    })
}

/// First character reported to the caller
///
/// Blocks report nothing, so a block never leaks its content across its
/// boundary. An inline ignorable node with nothing to report lets the
/// character that follows it flow through.
fn finish<N>(frame: &Frame<N>, first: Option<char>) -> Option<char> {
    let decision = decision_of(frame);
    if !decision.is_inline {
        None
    } else if decision.is_ignorable && first.is_none() {
        frame.following
    } else {
        first
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::patterns::PatternCompiler;
    use crate::domain::styler::StyleOptions;
    use crate::domain::variant::{CharacterClassifier, Variant};
    use crate::tree::policy::DEFAULT_SKIP_TAGS;
    use crate::tree::{ComputedStyle, Document, NodeSpec, Position};

    fn styler(variant: Variant) -> Styler {
        let classifier = CharacterClassifier::new(variant, true);
        let matcher = PatternCompiler::new(&classifier).compile().unwrap();
        Styler::new(matcher, StyleOptions::default())
    }

    fn policy(variant: Variant) -> SkipPolicy {
        SkipPolicy::new(DEFAULT_SKIP_TAGS, variant.default_lang_codes().iter().copied())
    }

    fn render(doc: &mut Document, variant: Variant) -> TraversalStats {
        let styler = styler(variant);
        let policy = policy(variant);
        let traversal = BoundaryTraversal::new(&styler, &policy);
        let root = doc.root();
        let first = doc.first_child(root).unwrap();
        traversal.run(doc, first, None, None).unwrap().1
    }

    fn paragraph(children: Vec<NodeSpec>) -> Document {
        Document::from_spec(&NodeSpec::element("div", ComputedStyle::block(), children))
    }

    #[test]
    fn test_junction_between_text_nodes() {
        let mut doc = paragraph(vec![NodeSpec::text("abc」"), NodeSpec::text("「xyz")]);
        let stats = render(&mut doc, Variant::TraditionalChinese);
        assert_eq!(stats.leaves_styled, 1);
        assert_eq!(
            doc.to_html(),
            "<div>abc」<span class=\"halfwidth\">「</span>xyz</div>"
        );
    }

    #[test]
    fn test_junction_through_inline_element() {
        let mut doc = paragraph(vec![
            NodeSpec::element("em", ComputedStyle::inline(), vec![NodeSpec::text("A")]),
            NodeSpec::text("中文"),
        ]);
        render(&mut doc, Variant::TraditionalChinese);
        assert_eq!(
            doc.to_html(),
            "<div><em><span class=\"extra-spaced\">A</span></em>中文</div>"
        );
    }

    #[test]
    fn test_block_sibling_stops_propagation() {
        let mut doc = paragraph(vec![
            NodeSpec::text("A"),
            NodeSpec::element("p", ComputedStyle::block(), vec![NodeSpec::text("中")]),
        ]);
        let stats = render(&mut doc, Variant::TraditionalChinese);
        assert_eq!(stats.leaves_styled, 0);
        assert_eq!(doc.to_html(), "<div>A<p>中</p></div>");
    }

    #[test]
    fn test_skipped_lang_is_left_alone_but_still_a_neighbour() {
        let mut english =
            NodeSpec::element("span", ComputedStyle::inline(), vec![NodeSpec::text("B中")]);
        english.set_lang("en");
        let mut doc = paragraph(vec![NodeSpec::text("中"), english]);
        let stats = render(&mut doc, Variant::TraditionalChinese);

        assert_eq!(stats.nodes_skipped, 1);
        // The skipped span reports no first character, so nothing fires on
        // the left; its own content stays untouched.
        assert_eq!(doc.to_html(), "<div>中<span lang=\"en\">B中</span></div>");
    }

    #[test]
    fn test_skipped_node_last_char_reaches_right_sibling() {
        let code = NodeSpec::element("code", ComputedStyle::inline(), vec![NodeSpec::text("」")]);
        let mut doc = paragraph(vec![code, NodeSpec::text("「好")]);
        render(&mut doc, Variant::TraditionalChinese);
        assert_eq!(
            doc.to_html(),
            "<div><code>」</code><span class=\"halfwidth\">「</span>好</div>"
        );

        let code = NodeSpec::element("code", ComputedStyle::inline(), vec![NodeSpec::text("中")]);
        let mut doc = paragraph(vec![code, NodeSpec::text("x")]);
        render(&mut doc, Variant::TraditionalChinese);
        assert_eq!(doc.to_html(), "<div><code>中</code>x</div>");
    }

    #[test]
    fn test_ignorable_empty_wrapper_is_transparent() {
        let marker = NodeSpec::element(
            "span",
            ComputedStyle {
                position: Position::Absolute,
                ..ComputedStyle::inline()
            },
            vec![],
        );
        let mut doc = paragraph(vec![NodeSpec::text("A"), marker, NodeSpec::text("中")]);
        render(&mut doc, Variant::TraditionalChinese);
        assert_eq!(
            doc.to_html(),
            "<div><span class=\"extra-spaced\">A</span><span></span>中</div>"
        );
    }

    #[test]
    fn test_whitespace_leaf_is_untouched() {
        let mut doc = paragraph(vec![NodeSpec::text("   ")]);
        let stats = render(&mut doc, Variant::TraditionalChinese);
        assert_eq!(stats, TraversalStats::default());
        assert_eq!(doc.to_html(), "<div>   </div>");
    }

    #[test]
    fn test_deep_tree_does_not_overflow() {
        let mut spec = NodeSpec::text("中A");
        for _ in 0..5_000 {
            spec = NodeSpec::element("span", ComputedStyle::inline(), vec![spec]);
        }
        let mut doc = paragraph(vec![spec]);
        let stats = render(&mut doc, Variant::TraditionalChinese);
        assert_eq!(stats.leaves_styled, 1);
    }

    #[test]
    fn test_reports_first_char() {
        let mut doc = paragraph(vec![NodeSpec::text("甲"), NodeSpec::text("乙")]);
        let styler = styler(Variant::TraditionalChinese);
        let policy = policy(Variant::TraditionalChinese);
        let first = doc.first_child(doc.root()).unwrap();
        let (reported, _) = BoundaryTraversal::new(&styler, &policy)
            .run(&mut doc, first, None, None)
            .unwrap();
        assert_eq!(reported, Some('甲'));
    }
}
