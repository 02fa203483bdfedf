//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod generate_config;
pub mod list;
pub mod style;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mark up documents for CJK punctuation compression and spacing
    Style(style::StyleArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },

    /// Generate a configuration file template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// Validate a configuration file
    Validate(validate::ValidateArgs),
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List supported variants
    Variants,

    /// List the active rules of a variant in matching order
    Rules {
        /// Variant to list
        #[arg(short = 'l', long, value_enum, default_value = "tc")]
        variant: style::VariantArg,

        /// Use the extended character tables
        #[arg(long)]
        loose: bool,
    },
}

impl Commands {
    /// Run the command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Style(args) => args.execute(),
            Commands::List { subcommand } => match subcommand {
                ListCommands::Variants => list::list_variants(),
                ListCommands::Rules { variant, loose } => list::list_rules(variant.variant(), !loose),
            },
            Commands::GenerateConfig(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
        }
    }
}
