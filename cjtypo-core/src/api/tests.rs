//! Tests for the typesetter API

#[cfg(test)]
mod api_tests {
    use crate::api::*;
    use crate::domain::{Rule, StyleKind, Variant};
    use crate::tree::{ComputedStyle, Document, NodeSpec};

    fn document(json: &str) -> Document {
        Document::from_json_str(json).unwrap()
    }

    #[test]
    fn test_typesetter_creation() {
        let typesetter = Typesetter::new().unwrap();
        assert_eq!(typesetter.variant(), Variant::TraditionalChinese);

        let jp = Typesetter::for_variant("ja").unwrap();
        assert_eq!(jp.variant(), Variant::Japanese);
        assert_eq!(jp.policy().include_lang_codes(), &["jp"]);

        assert!(matches!(
            Typesetter::for_variant("klingon"),
            Err(Error::UnsupportedVariant(_))
        ));
    }

    #[test]
    fn test_rules_follow_variant() {
        let tc = Typesetter::new().unwrap();
        assert!(!tc.rules().contains(&Rule::MarkBeforeClosing));

        let sc = Typesetter::for_variant("sc").unwrap();
        assert!(sc.rules().contains(&Rule::RepeatedExclamQuestion));
        assert!(sc.rules().contains(&Rule::BareMiddleDot));
    }

    #[test]
    fn test_style_text() {
        let typesetter = Typesetter::new().unwrap();
        let output = typesetter.style_text("用Rust寫", None, None).unwrap();
        assert_eq!(output.count(StyleKind::ExtraSpaced), 2);
        assert_eq!(output.plain_text(), "用Rust寫");
        assert!(typesetter.style_text(" ", None, None).is_none());
    }

    #[test]
    fn test_render_selected_roots() {
        let mut doc = document(
            r#"[
                {"tag": "p", "class": ["zh"], "children": [{"text": "中A"}]},
                {"tag": "p", "children": [{"text": "中A"}]}
            ]"#,
        );
        let typesetter = Typesetter::new().unwrap();
        let stats = typesetter.render(&mut doc, "p.zh").unwrap();

        assert_eq!(stats.roots, 1);
        assert_eq!(stats.traversal.leaves_styled, 1);
        assert_eq!(stats.traversal.extra_spaced_segments, 1);
        assert_eq!(
            doc.to_html(),
            "<p class=\"zh\"><span class=\"extra-spaced\">中</span>A</p><p>中A</p>"
        );
    }

    #[test]
    fn test_nested_roots_are_rendered_once() {
        let mut doc = document(
            r#"{"tag": "div", "children": [
                {"tag": "div", "children": [{"text": "中A"}]}
            ]}"#,
        );
        let typesetter = Typesetter::new().unwrap();
        let stats = typesetter.render(&mut doc, "div").unwrap();

        assert_eq!(stats.roots, 1);
        assert_eq!(stats.nested_roots, 1);
        assert_eq!(
            doc.to_html(),
            "<div><div><span class=\"extra-spaced\">中</span>A</div></div>"
        );
    }

    #[test]
    fn test_root_without_children_is_left_alone() {
        let mut doc = Document::from_spec(&NodeSpec::element("p", ComputedStyle::block(), vec![]));
        let stats = Typesetter::new().unwrap().render(&mut doc, "p").unwrap();
        assert_eq!(stats.roots, 1);
        assert_eq!(stats.traversal.leaves_styled, 0);
        assert_eq!(doc.to_html(), "<p></p>");
    }

    #[test]
    fn test_render_document_rejects_bad_selector() {
        let mut doc = Document::from_paragraphs("中A");
        let typesetter = Typesetter::new().unwrap();
        assert!(matches!(
            typesetter.render_document(&mut doc, "p > a"),
            Err(Error::Selector(_))
        ));
        assert_eq!(doc.to_html(), "<p>中A</p>");
    }

    #[test]
    fn test_disabled_toggles() {
        let config = Config::builder()
            .compress_punctuations(false)
            .auto_space(false)
            .build()
            .unwrap();
        let typesetter = Typesetter::with_config(config).unwrap();
        let mut doc = Document::from_paragraphs("」「中A");
        let stats = typesetter.render(&mut doc, "p").unwrap();
        assert_eq!(stats.traversal.leaves_styled, 0);
        assert_eq!(doc.to_html(), "<p>」「中A</p>");
    }

    #[test]
    fn test_custom_lang_codes() {
        let json = r#"{"tag": "p", "children": [
            {"tag": "span", "lang": "en", "children": [{"text": "中A"}]}
        ]}"#;

        let mut doc = document(json);
        let stats = Typesetter::new().unwrap().render(&mut doc, "p").unwrap();
        assert_eq!(stats.traversal.nodes_skipped, 1);
        assert_eq!(stats.traversal.leaves_styled, 0);

        let config = Config::builder().include_lang_codes(["en"]).build().unwrap();
        let mut doc = document(json);
        let stats = Typesetter::with_config(config)
            .unwrap()
            .render(&mut doc, "p")
            .unwrap();
        assert_eq!(stats.traversal.nodes_skipped, 0);
        assert_eq!(stats.traversal.leaves_styled, 1);
    }

    #[test]
    fn test_selected_root_with_foreign_lang_is_skipped() {
        let mut doc = document(
            r#"[
                {"tag": "p", "children": [{"text": "中A"}]},
                {"tag": "p", "lang": "en", "children": [{"text": "English中文"}]},
                {"tag": "code", "children": [{"text": "中A"}]}
            ]"#,
        );
        let stats = Typesetter::new().unwrap().render(&mut doc, "*").unwrap();

        assert_eq!(stats.roots, 1);
        assert_eq!(stats.traversal.nodes_skipped, 2);
        assert_eq!(
            doc.to_html(),
            "<p><span class=\"extra-spaced\">中</span>A</p>\
             <p lang=\"en\">English中文</p><code>中A</code>"
        );
    }

    #[test]
    fn test_selected_root_inside_skipped_element() {
        let mut doc = document(
            r#"{"tag": "div", "lang": "en", "children": [
                {"tag": "p", "children": [{"text": "中A"}]}
            ]}"#,
        );
        let stats = Typesetter::new().unwrap().render(&mut doc, "p").unwrap();
        assert_eq!(stats.roots, 0);
        assert_eq!(doc.to_html(), "<div lang=\"en\"><p>中A</p></div>");
    }

    #[test]
    fn test_stats_serialize_flat() {
        let stats = RenderStats {
            roots: 2,
            ..RenderStats::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["roots"], 2);
        assert_eq!(json["leaves_styled"], 0);
    }
}
