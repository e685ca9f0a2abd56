//! Wrappers around the external nftables validator and service reload.
//!
//! Both are opaque command-line tools; only exit codes are consumed.

use std::path::Path;
use tracing::{debug, info};

use crate::cmd_abstraction::CommandExecutor;
use crate::config::Settings;
use crate::error::NftdnsError;

/// Validator and reload trigger over an injected executor.
pub struct Firewall<'a, E: CommandExecutor> {
    settings: &'a Settings,
    executor: &'a E,
}

impl<'a, E: CommandExecutor> Firewall<'a, E> {
    pub fn new(settings: &'a Settings, executor: &'a E) -> Self {
        Self { settings, executor }
    }

    /// Syntax-check a config file with `nft -cf`. Exit code 0 means valid.
    pub async fn validate(&self, path: &Path) -> Result<bool, NftdnsError> {
        let args = vec!["-cf".to_string(), path.display().to_string()];
        let output = self
            .executor
            .execute(&self.settings.nft_bin, &args)
            .await
            .map_err(|e| NftdnsError::Command(e.to_string()))?;

        if !output.success {
            debug!("nft -cf {} failed: {}", path.display(), output.stderr.trim());
        }
        Ok(output.success)
    }

    /// Trigger a reload of the nftables service.
    ///
    /// The exit code is reported to the caller but a reload failure does not
    /// invalidate an already-committed configuration.
    pub async fn reload(&self) -> Result<bool, NftdnsError> {
        let (cmd, args) = self.settings.reload_cmd.split_first().ok_or_else(|| {
            NftdnsError::Config("Reload command is empty".to_string())
        })?;

        info!("Reloading nftables");
        let output = self
            .executor
            .execute(cmd, args)
            .await
            .map_err(|e| NftdnsError::Command(e.to_string()))?;

        if !output.success {
            debug!("Reload failed: {}", output.stderr.trim());
        }
        Ok(output.success)
    }
}
