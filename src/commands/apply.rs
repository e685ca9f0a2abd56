//! Apply command: generate the addon artifact and deploy it safely.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::cmd_abstraction::RealCommandExecutor;
use crate::config::{AddonConfig, Settings};
use crate::deploy::{DeployOutcome, Deployer};
use crate::lock::LockGuard;
use crate::pipeline::generate_document;
use crate::resolver::SystemResolver;

/// Run the apply command
pub async fn run(key: &str, dry_run: bool, settings: &Settings) -> Result<()> {
    let mapping = AddonConfig::load(settings, key)
        .with_context(|| format!("Config for addon '{key}' could not be loaded"))?;

    info!(
        "Resolving {} variables for addon '{}'",
        mapping.variables.len(),
        key
    );
    let resolver = Arc::new(SystemResolver);
    let content = generate_document(&resolver, settings, &mapping).await;

    if dry_run {
        print!("{content}");
        return Ok(());
    }

    // Serialize staging+commit across runs; the addon directory and the
    // live-root validation are shared even between different keys.
    let _lock = LockGuard::acquire(&settings.lock_file)?;

    let executor = RealCommandExecutor::new(settings.command_timeout);
    let deployer = Deployer::new(settings, &executor);

    match deployer.deploy(key, &content).await? {
        DeployOutcome::Unchanged => {
            println!("[OK] {key}: config unchanged");
        }
        DeployOutcome::Committed { reloaded: true } => {
            println!("[OK] {key}: config committed and nftables reloaded");
        }
        DeployOutcome::Committed { reloaded: false } => {
            println!("[OK] {key}: config committed (reload failed, see logs)");
        }
    }

    Ok(())
}
