//! List command implementations

use anyhow::Result;
use cjtypo_core::{Config, Typesetter, Variant};

/// One line per variant: code, name and default language codes
pub fn variant_lines() -> Vec<String> {
    Variant::ALL
        .iter()
        .map(|variant| {
            format!(
                "{:<4}{:<22}lang: {}",
                variant.code(),
                variant.name(),
                variant.default_lang_codes().join(", ")
            )
        })
        .collect()
}

/// One line per active rule: category and rule name
pub fn rule_lines(variant: Variant, strict: bool) -> Result<Vec<String>> {
    let config = Config::builder()
        .variant_kind(variant)
        .strict_mode(strict)
        .build()?;
    let typesetter = Typesetter::with_config(config)?;

    Ok(typesetter
        .rules()
        .iter()
        .map(|rule| format!("{:<12}{}", rule.category().to_string(), rule))
        .collect())
}

pub fn list_variants() -> Result<()> {
    println!("Supported variants:");
    for line in variant_lines() {
        println!("  {line}");
    }
    Ok(())
}

pub fn list_rules(variant: Variant, strict: bool) -> Result<()> {
    println!(
        "Rules for {} ({} mode):",
        variant.name(),
        if strict { "strict" } else { "loose" }
    );
    for line in rule_lines(variant, strict)? {
        println!("  {line}");
    }
    Ok(())
}
