//! nftdns - DNS-backed nftables address variables with safe apply.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use nftdns::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = cli.settings();

    match cli.command {
        Commands::Apply { ref key, dry_run } => {
            nftdns::commands::apply::run(key, dry_run, &settings).await
        }
        Commands::Render { ref key } => nftdns::commands::render::run(key, &settings).await,
        Commands::Check => nftdns::commands::check::run(&settings).await,
        Commands::Version => {
            println!("nftdns {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
