//! Configuration module
//!
//! A configuration file has a `[style]` table read by the core and an
//! `[output]` table read here.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cjtypo_core::tree::Selector;
use cjtypo_core::{Config, Variant};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::CliError;
use crate::output::OutputFormat;

/// Selector used when neither the file nor the flags name one
pub const DEFAULT_SELECTOR: &str = "*";

/// CLI configuration structure
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Styling configuration
    pub style: Config,

    /// Output configuration
    pub output: OutputConfig,
}

/// Output-related configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root elements to style
    pub selector: String,

    /// Default output format
    pub format: String,

    /// Pretty print JSON output
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            selector: DEFAULT_SELECTOR.to_string(),
            format: "html".to_string(),
            pretty_json: true,
        }
    }
}

impl OutputConfig {
    /// Parsed output format
    pub fn format(&self) -> Result<OutputFormat> {
        OutputFormat::from_str(&self.format, true).map_err(|_| {
            CliError::ConfigError(format!(
                "unknown output format '{}' (expected html or json)",
                self.format
            ))
            .into()
        })
    }

    /// Check the selector and format
    pub fn validate(&self) -> Result<()> {
        Selector::parse(&self.selector)
            .map_err(|e| CliError::InvalidSelector(format!("{}: {e}", self.selector)))?;
        self.format()?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct OutputSection {
    #[serde(default)]
    output: OutputConfig,
}

impl CliConfig {
    /// Parse a configuration document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let style = Config::from_toml_str(source).context("Invalid [style] table")?;
        let section: OutputSection = toml::from_str(source).context("Invalid [output] table")?;
        section.output.validate()?;

        Ok(Self {
            style,
            output: section.output,
        })
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Commented configuration template for a variant
    pub fn template(variant: Variant) -> String {
        let lang_codes = variant
            .default_lang_codes()
            .iter()
            .map(|code| format!("\"{code}\""))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"# cjtypo configuration ({name})

[style]
# Variant: "tc" (Traditional Chinese), "sc" (Simplified Chinese) or "jp" (Japanese)
variant = "{code}"

# Use only the strict character tables; false adds the extended
# punctuation and bracket sets of the variant
strict_mode = true

# Wrap compressible punctuation in <span class="halfwidth">
compress_punctuations = true

# Wrap characters at CJK/Latin boundaries in <span class="extra-spaced">
auto_space = true

# Elements whose content is never styled
skip_tags = ["code", "img"]

# Elements with a lang attribute outside this list are skipped.
# Leave it commented out to use the defaults of the variant.
# include_lang_codes = [{lang_codes}]

[output]
# Root elements to style
selector = "{selector}"

# "html" or "json"
format = "html"

# Indent JSON output
pretty_json = true
"#,
            name = variant.name(),
            code = variant.code(),
            selector = DEFAULT_SELECTOR,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.output.selector, "*");
        assert_eq!(config.output.format().unwrap(), OutputFormat::Html);
        assert!(config.output.pretty_json);
        assert_eq!(config.style, Config::default());
    }

    #[test]
    fn test_template_round_trips() {
        for variant in Variant::ALL {
            let config = CliConfig::from_toml_str(&CliConfig::template(variant)).unwrap();
            assert_eq!(config.style.variant(), variant);
            assert_eq!(config.output, OutputConfig::default());
        }
    }

    #[test]
    fn test_output_section() {
        let config = CliConfig::from_toml_str(
            r#"
[output]
selector = "article p"
format = "JSON"
pretty_json = false
"#,
        )
        .unwrap();
        assert_eq!(config.output.format().unwrap(), OutputFormat::Json);
        assert_eq!(config.output.selector, "article p");
        assert!(!config.output.pretty_json);
    }

    #[test]
    fn test_invalid_output_section() {
        let err = CliConfig::from_toml_str("[output]\nformat = \"xml\"\n").unwrap_err();
        assert!(err.to_string().contains("unknown output format"));

        let err = CliConfig::from_toml_str("[output]\nselector = \"p >\"\n").unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }

    #[test]
    fn test_invalid_style_section() {
        let err = CliConfig::from_toml_str("[style]\nvariant = \"ko\"\n").unwrap_err();
        assert!(err.to_string().contains("[style]"));
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::load(Path::new("/nonexistent/cjtypo.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::FileNotFound(_))
        ));
    }
}
