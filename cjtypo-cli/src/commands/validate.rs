//! Validate command implementation

use anyhow::Result;
use cjtypo_core::Typesetter;
use clap::Args;
use std::path::PathBuf;

use crate::config::CliConfig;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the configuration file to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub config: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating configuration: {}", self.config.display());

        let result = CliConfig::load(&self.config).and_then(|config| {
            let typesetter = Typesetter::with_config(config.style.clone())?;
            Ok((config, typesetter))
        });

        match result {
            Ok((config, typesetter)) => {
                let variant = typesetter.variant();
                println!("✓ Configuration is valid!");
                println!("  Variant: {} ({})", variant.name(), variant.code());
                println!("  Active rules: {}", typesetter.rules().len());
                println!(
                    "  Language codes: {}",
                    typesetter.config().resolved_lang_codes().join(", ")
                );
                println!("  Selector: {}", config.output.selector);
                Ok(())
            }
            Err(e) => {
                println!("✗ Configuration is invalid!");
                println!("  Error: {e:#}");
                Err(e.context("Validation failed"))
            }
        }
    }
}
