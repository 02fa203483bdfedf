//! Style command implementation

use anyhow::{Context, Result};
use cjtypo_core::tree::Selector;
use cjtypo_core::{Config, RenderStats, Typesetter, Variant};
use clap::Args;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::input::{self, FileReader, InputFormat};
use crate::output::{HtmlFormatter, JsonFormatter, OutputFormat, OutputFormatter};
use crate::progress::ProgressReporter;

/// Arguments for the style command
#[derive(Debug, Args)]
pub struct StyleArgs {
    /// Input files or patterns (supports glob, `-` reads stdin)
    #[arg(short, long, value_name = "FILE/PATTERN", required = true)]
    pub input: Vec<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (default: from config, else html)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// How input files are read
    #[arg(long, value_enum, default_value = "auto")]
    pub input_format: InputFormat,

    /// Typesetting variant
    #[arg(short = 'l', long = "variant", value_enum, env = "CJTYPO_VARIANT")]
    pub variant: Option<VariantArg>,

    /// Use the extended punctuation and bracket tables
    #[arg(long)]
    pub loose: bool,

    /// Do not compress punctuation
    #[arg(long)]
    pub no_compress: bool,

    /// Do not add spacing at CJK/Latin boundaries
    #[arg(long)]
    pub no_auto_space: bool,

    /// Language codes to style (comma separated)
    #[arg(long, value_name = "CODES", value_delimiter = ',')]
    pub lang_codes: Option<Vec<String>>,

    /// Tags whose content is never styled (comma separated)
    #[arg(long, value_name = "TAGS", value_delimiter = ',')]
    pub skip_tags: Option<Vec<String>>,

    /// Root elements to style
    #[arg(short, long, value_name = "SELECTOR")]
    pub selector: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Variant names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VariantArg {
    /// Traditional Chinese
    Tc,
    /// Simplified Chinese
    Sc,
    /// Japanese
    Jp,
}

impl VariantArg {
    pub fn variant(self) -> Variant {
        match self {
            VariantArg::Tc => Variant::TraditionalChinese,
            VariantArg::Sc => Variant::SimplifiedChinese,
            VariantArg::Jp => Variant::Japanese,
        }
    }
}

impl StyleArgs {
    /// Execute the style command
    pub fn execute(&self) -> Result<()> {
        // Initialize logging based on verbosity
        self.init_logging();

        log::info!("Starting document styling");
        log::debug!("Arguments: {:?}", self);

        let cli_config = match &self.config {
            Some(path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };

        let config = self.build_config(&cli_config.style)?;
        let typesetter = Typesetter::with_config(config).context("Failed to set up typesetter")?;

        let selector = self
            .selector
            .clone()
            .unwrap_or_else(|| cli_config.output.selector.clone());
        Selector::parse(&selector)
            .map_err(|e| CliError::InvalidSelector(format!("{selector}: {e}")))?;

        let format = match self.format {
            Some(format) => format,
            None => cli_config.output.format()?,
        };

        let sources = input::resolve_patterns(&self.input)?;
        log::info!("Found {} input(s)", sources.len());

        let writer: Box<dyn Write> = match &self.output {
            Some(path) => Box::new(BufWriter::new(File::create(path).with_context(|| {
                format!("Failed to create output file: {}", path.display())
            })?)),
            None => Box::new(io::stdout().lock()),
        };
        let mut formatter: Box<dyn OutputFormatter> = match format {
            OutputFormat::Html => Box::new(HtmlFormatter::new(writer, sources.len() > 1)),
            OutputFormat::Json => {
                Box::new(JsonFormatter::new(writer, cli_config.output.pretty_json))
            }
        };

        let mut progress = ProgressReporter::new(self.quiet);
        progress.init_documents(sources.len() as u64);

        let mut total = RenderStats::default();
        for source in &sources {
            let name = source.to_string();
            log::debug!(
                "Styling {} ({} bytes)",
                name,
                FileReader::source_size(source)?
            );

            let content = FileReader::read_source(source)?;
            let mut document = input::load_document(source, &content, self.input_format)?;
            let stats = typesetter
                .render_document(&mut document, &selector)
                .with_context(|| format!("Failed to style {name}"))?;

            formatter.format_document(&name, &document, &stats)?;
            total.merge(&stats);
            progress.document_completed(&name);
        }

        formatter.finish()?;
        progress.finish();

        log::info!(
            "Styled {} document(s): {} roots, {} leaves, {} halfwidth and {} extra-spaced segments, {} skipped nodes",
            sources.len(),
            total.roots,
            total.traversal.leaves_styled,
            total.traversal.halfwidth_segments,
            total.traversal.extra_spaced_segments,
            total.traversal.nodes_skipped
        );

        Ok(())
    }

    /// Merge flags over the configuration file
    fn build_config(&self, base: &Config) -> Result<Config> {
        let variant = self.variant.map_or(base.variant(), VariantArg::variant);
        let mut builder = Config::builder()
            .variant_kind(variant)
            .strict_mode(base.strict_mode() && !self.loose)
            .compress_punctuations(base.compress_punctuations() && !self.no_compress)
            .auto_space(base.auto_space() && !self.no_auto_space)
            .skip_tags(
                self.skip_tags
                    .clone()
                    .unwrap_or_else(|| base.skip_tags().to_vec()),
            );

        let lang_codes = self
            .lang_codes
            .clone()
            .or_else(|| base.include_lang_codes().map(<[String]>::to_vec));
        if let Some(codes) = lang_codes {
            builder = builder.include_lang_codes(codes);
        }

        builder
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Initialize logging based on verbosity level
    fn init_logging(&self) {
        let log_level = match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };

        if !self.quiet {
            // A logger may already be installed when running inside tests
            let _ = env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(log_level),
            )
            .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(input: Vec<String>) -> StyleArgs {
        StyleArgs {
            input,
            output: None,
            format: None,
            input_format: InputFormat::Auto,
            variant: None,
            loose: false,
            no_compress: false,
            no_auto_space: false,
            lang_codes: None,
            skip_tags: None,
            selector: None,
            config: None,
            quiet: true,
            verbose: 0,
        }
    }

    #[test]
    fn test_build_config_flags_override_file() {
        let base = Config::builder()
            .variant("sc")
            .include_lang_codes(["zh"])
            .build()
            .unwrap();

        let mut style = args(vec![]);
        style.variant = Some(VariantArg::Jp);
        style.loose = true;
        style.no_auto_space = true;
        let config = style.build_config(&base).unwrap();

        assert_eq!(config.variant(), Variant::Japanese);
        assert!(!config.strict_mode());
        assert!(config.compress_punctuations());
        assert!(!config.auto_space());
        assert_eq!(config.resolved_lang_codes(), vec!["zh"]);
    }

    #[test]
    fn test_build_config_keeps_file_values() {
        let base = Config::builder()
            .variant("jp")
            .compress_punctuations(false)
            .build()
            .unwrap();
        let config = args(vec![]).build_config(&base).unwrap();
        assert_eq!(config, base);
    }

    #[test]
    fn test_build_config_rejects_empty_skip_tag() {
        let mut style = args(vec![]);
        style.skip_tags = Some(vec!["code".to_string(), String::new()]);
        let err = style.build_config(&Config::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::ConfigError(_))
        ));
    }

    #[test]
    fn test_execute_writes_output_file() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        let output = dir.path().join("out.html");
        fs::write(&input, "用Rust寫\n中文").unwrap();

        let mut style = args(vec![input.display().to_string()]);
        style.output = Some(output.clone());
        style.execute().unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert_eq!(
            html,
            "<p><span class=\"extra-spaced\">用</span>Rus<span class=\"extra-spaced\">t</span>寫</p><p>中文</p>\n"
        );
    }

    #[test]
    fn test_execute_rejects_bad_selector() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("in.txt");
        fs::write(&input, "中A").unwrap();

        let mut style = args(vec![input.display().to_string()]);
        style.selector = Some("p > a".to_string());
        let err = style.execute().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::InvalidSelector(_))
        ));
    }
}
