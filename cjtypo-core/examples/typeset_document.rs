//! Example of styling a small document

use cjtypo_core::tree::{ComputedStyle, Document, NodeSpec};
use cjtypo_core::{Config, Typesetter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: Styling a single text run
    println!("=== Example 1: Text Run ===");
    let typesetter = Typesetter::new()?;
    let output = typesetter
        .style_text("我們用Rust寫「排版」工具。", None, None)
        .ok_or("nothing to style")?;
    println!("{}", output.to_html());

    // Example 2: Boundaries across nodes
    println!("\n=== Example 2: Document ===");
    let spec = NodeSpec::element(
        "p",
        ComputedStyle::block(),
        vec![
            NodeSpec::text("他說：「好」"),
            NodeSpec::tag("em", vec![NodeSpec::text("「走吧」")]),
            NodeSpec::tag("code", vec![NodeSpec::text("cargo run")]),
            NodeSpec::text("之後"),
        ],
    );
    let mut doc = Document::from_spec(&spec);
    let stats = typesetter.render(&mut doc, "p")?;
    println!("{}", doc.to_html());
    println!("{:?}", stats);

    // Example 3: Custom configuration
    println!("\n=== Example 3: Japanese, loose mode ===");
    let config = Config::builder()
        .variant("jp")
        .strict_mode(false)
        .auto_space(false)
        .build()?;
    let japanese = Typesetter::with_config(config)?;
    let mut doc = Document::from_paragraphs("「こんにちは」。『はい』と言った。\n（テスト）「です」");
    japanese.render(&mut doc, "p")?;
    println!("{}", doc.to_html());

    Ok(())
}
