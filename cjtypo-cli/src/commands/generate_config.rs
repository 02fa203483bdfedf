//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::PathBuf;

use super::style::VariantArg;
use crate::config::CliConfig;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,

    /// Variant the template is written for
    #[arg(short = 'l', long, value_enum, default_value = "tc")]
    pub variant: VariantArg,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to overwrite)",
                self.output.display()
            );
        }

        let variant = self.variant.variant();
        println!("Generating configuration template...");
        println!("  Variant: {} ({})", variant.name(), variant.code());
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, CliConfig::template(variant))
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the [style] and [output] tables");
        println!("2. Validate your configuration:");
        println!("   cjtypo validate -c {}", self.output.display());
        println!("3. Use it for styling:");
        println!("   cjtypo style -i input.json -c {}", self.output.display());

        Ok(())
    }
}
