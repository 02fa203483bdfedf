//! Configuration API for the typesetter

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::styler::StyleOptions;
use crate::domain::variant::Variant;
use crate::error::{Error, Result};

/// Default configuration constants
pub mod defaults {
    /// Only the strict class tables are used
    pub const STRICT_MODE: bool = true;

    /// Punctuation compression is on
    pub const COMPRESS_PUNCTUATIONS: bool = true;

    /// Extra spacing at script boundaries is on
    pub const AUTO_SPACE: bool = true;

    /// Elements whose content is never styled
    pub const SKIP_TAGS: &[&str] = crate::tree::policy::DEFAULT_SKIP_TAGS;
}

/// Styling configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub(crate) variant: Variant,
    pub(crate) strict_mode: bool,
    pub(crate) compress_punctuations: bool,
    pub(crate) auto_space: bool,
    /// `None` = the variant's default language codes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) include_lang_codes: Option<Vec<String>>,
    pub(crate) skip_tags: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            strict_mode: defaults::STRICT_MODE,
            compress_punctuations: defaults::COMPRESS_PUNCTUATIONS,
            auto_space: defaults::AUTO_SPACE,
            include_lang_codes: None,
            skip_tags: defaults::SKIP_TAGS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Layout of a configuration file
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    style: Config,
}

impl Config {
    /// Create a configuration builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Parse the `[style]` table of a TOML document
    ///
    /// A document without the table yields the default configuration.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(source)?;
        file.style.validate()?;
        Ok(file.style)
    }

    /// Read and parse a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn strict_mode(&self) -> bool {
        self.strict_mode
    }

    pub fn compress_punctuations(&self) -> bool {
        self.compress_punctuations
    }

    pub fn auto_space(&self) -> bool {
        self.auto_space
    }

    /// Explicit include list, if one was configured
    pub fn include_lang_codes(&self) -> Option<&[String]> {
        self.include_lang_codes.as_deref()
    }

    /// Language codes that are styled, falling back to the variant defaults
    pub fn resolved_lang_codes(&self) -> Vec<String> {
        match &self.include_lang_codes {
            Some(codes) => codes.clone(),
            None => self
                .variant
                .default_lang_codes()
                .iter()
                .map(|code| code.to_string())
                .collect(),
        }
    }

    pub fn skip_tags(&self) -> &[String] {
        &self.skip_tags
    }

    pub fn style_options(&self) -> StyleOptions {
        StyleOptions {
            compress_punctuations: self.compress_punctuations,
            auto_space: self.auto_space,
        }
    }

    /// Validate the configuration
    pub(crate) fn validate(&self) -> Result<()> {
        if self.skip_tags.iter().any(|tag| tag.trim().is_empty()) {
            return Err(Error::Configuration(
                "skip_tags must not contain empty tag names".into(),
            ));
        }

        if let Some(codes) = &self.include_lang_codes {
            if codes.iter().any(|code| code.trim().is_empty()) {
                return Err(Error::Configuration(
                    "include_lang_codes must not contain empty codes".into(),
                ));
            }
        }

        Ok(())
    }
}

/// Fluent builder for configuration
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    variant: Option<String>,
    strict_mode: Option<bool>,
    compress_punctuations: Option<bool>,
    auto_space: Option<bool>,
    include_lang_codes: Option<Vec<String>>,
    skip_tags: Option<Vec<String>>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the variant by code (`tc`, `sc`, `jp`, or a BCP 47 tag such as `zh-TW`)
    pub fn variant(mut self, code: impl Into<String>) -> Self {
        self.variant = Some(code.into());
        self
    }

    /// Set the variant directly
    pub fn variant_kind(mut self, variant: Variant) -> Self {
        self.variant = Some(variant.code().to_string());
        self
    }

    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = Some(strict);
        self
    }

    pub fn compress_punctuations(mut self, enabled: bool) -> Self {
        self.compress_punctuations = Some(enabled);
        self
    }

    pub fn auto_space(mut self, enabled: bool) -> Self {
        self.auto_space = Some(enabled);
        self
    }

    /// Replace the variant's default include list
    pub fn include_lang_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_lang_codes = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    pub fn skip_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        if let Some(code) = self.variant {
            config.variant = Variant::from_code(&code)?;
        }

        if let Some(strict) = self.strict_mode {
            config.strict_mode = strict;
        }

        if let Some(enabled) = self.compress_punctuations {
            config.compress_punctuations = enabled;
        }

        if let Some(enabled) = self.auto_space {
            config.auto_space = enabled;
        }

        if self.include_lang_codes.is_some() {
            config.include_lang_codes = self.include_lang_codes;
        }

        if let Some(tags) = self.skip_tags {
            config.skip_tags = tags;
        }

        config.validate()?;
        Ok(config)
    }
}
