//! cjtypo command-line entry point

use anyhow::Result;
use clap::Parser;

use cjtypo_cli::commands::Commands;

/// CJK punctuation compression and auto-spacing for documents
#[derive(Debug, Parser)]
#[command(name = "cjtypo", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.command.execute()
}
