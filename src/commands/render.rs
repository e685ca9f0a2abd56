//! Render command: resolve and print the generated document, no deployment.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::config::{AddonConfig, Settings};
use crate::pipeline::generate_document;
use crate::resolver::SystemResolver;

/// Run the render command
pub async fn run(key: &str, settings: &Settings) -> Result<()> {
    let mapping = AddonConfig::load(settings, key)
        .with_context(|| format!("Config for addon '{key}' could not be loaded"))?;

    let resolver = Arc::new(SystemResolver);
    let content = generate_document(&resolver, settings, &mapping).await;
    print!("{content}");

    Ok(())
}
