//! grab - pinned binary installer CLI

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "grab")]
#[command(author, version, about = "Pinned installs of single-binary tools from GitHub releases")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Install one or more targets (owner/repo[/binary]@tag[:sha256-<checksum>])
    Install {
        /// Target spec(s), e.g. cli/cli/gh@v2.40.0
        #[arg(required = true)]
        targets: Vec<String>,
        /// Install binaries into this directory instead of ~/.grab/bin
        #[arg(long)]
        bin_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Install { targets, bin_dir } => cmd::install::install(&targets, bin_dir).await,
    }
}
