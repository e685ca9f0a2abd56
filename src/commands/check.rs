//! Check command: validate the live nftables configuration.

use anyhow::Result;

use crate::cmd_abstraction::RealCommandExecutor;
use crate::config::Settings;
use crate::firewall::Firewall;

/// Run the check command
pub async fn run(settings: &Settings) -> Result<()> {
    let executor = RealCommandExecutor::new(settings.command_timeout);
    let firewall = Firewall::new(settings, &executor);

    if firewall.validate(&settings.live_config).await? {
        println!("[OK] {} is valid", settings.live_config.display());
        Ok(())
    } else {
        anyhow::bail!("{} failed validation", settings.live_config.display())
    }
}
