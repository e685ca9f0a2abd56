//! CLI argument parsing with clap.

use clap::builder::TypedValueParser as _;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "nftdns")]
#[command(author, version, about = "DNS-backed nftables address variables with safe apply")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Addon directory holding configs and generated artifacts
    #[arg(long, default_value = "/etc/nftables.d/addons", global = true)]
    pub addon_dir: PathBuf,

    /// Base config directory included via glob during staging validation
    /// (pass an empty value to disable the glob include)
    #[arg(
        long,
        default_value = "/etc/nftables.d",
        global = true,
        value_parser = clap::builder::OsStringValueParser::new().map(PathBuf::from)
    )]
    pub base_dir: PathBuf,

    /// Live root nftables configuration
    #[arg(long, default_value = "/etc/nftables.conf", global = true)]
    pub live_config: PathBuf,

    /// Path to the nft binary
    #[arg(long, default_value = "/usr/sbin/nft", global = true)]
    pub nft_bin: String,

    /// Service reload command, whitespace-separated
    /// (e.g. "sudo systemctl reload nftables.service" when running unprivileged)
    #[arg(long, global = true)]
    pub reload_cmd: Option<String>,

    /// Skip AAAA resolution and v6 variables
    #[arg(long, global = true)]
    pub no_ipv6: bool,

    /// Quiet mode (for cron/systemd timer)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve hostnames and deploy the generated addon artifact
    Apply {
        /// Addon key (config `<key>.json`, artifact `<key>.nft`)
        #[arg(default_value = "dns")]
        key: String,

        /// Print the generated document instead of staging and deploying
        #[arg(long)]
        dry_run: bool,
    },

    /// Resolve hostnames and print the generated document without deploying
    Render {
        /// Addon key (config `<key>.json`)
        #[arg(default_value = "dns")]
        key: String,
    },

    /// Validate the live nftables configuration
    Check,

    /// Show version
    Version,
}

impl Cli {
    /// Build pipeline settings from the defaults and CLI overrides.
    pub fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            addon_dir: self.addon_dir.clone(),
            base_dir: if self.base_dir.as_os_str().is_empty() {
                None
            } else {
                Some(self.base_dir.clone())
            },
            live_config: self.live_config.clone(),
            nft_bin: self.nft_bin.clone(),
            reload_cmd: match &self.reload_cmd {
                Some(cmd) => cmd.split_whitespace().map(str::to_string).collect(),
                None => defaults.reload_cmd.clone(),
            },
            process_ipv6: !self.no_ipv6,
            ..defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_apply_defaults_to_dns_key() {
        let cli = Cli::try_parse_from(["nftdns", "apply"]).unwrap();
        match cli.command {
            Commands::Apply { key, dry_run } => {
                assert_eq!(key, "dns");
                assert!(!dry_run);
            }
            _ => panic!("Expected Apply command"),
        }
    }

    #[test]
    fn test_apply_with_key_and_dry_run() {
        let cli = Cli::try_parse_from(["nftdns", "apply", "geoip", "--dry-run"]).unwrap();
        match cli.command {
            Commands::Apply { key, dry_run } => {
                assert_eq!(key, "geoip");
                assert!(dry_run);
            }
            _ => panic!("Expected Apply command"),
        }
    }

    #[test]
    fn test_global_overrides_build_settings() {
        let cli = Cli::try_parse_from([
            "nftdns",
            "--addon-dir",
            "/custom/addons",
            "--live-config",
            "/custom/nftables.conf",
            "--nft-bin",
            "/sbin/nft",
            "--no-ipv6",
            "apply",
        ])
        .unwrap();

        let settings = cli.settings();
        assert_eq!(settings.addon_dir, PathBuf::from("/custom/addons"));
        assert_eq!(settings.live_config, PathBuf::from("/custom/nftables.conf"));
        assert_eq!(settings.nft_bin, "/sbin/nft");
        assert!(!settings.process_ipv6);
        assert_eq!(settings.base_dir, Some(PathBuf::from("/etc/nftables.d")));
    }

    #[test]
    fn test_empty_base_dir_disables_glob_include() {
        let cli = Cli::try_parse_from(["nftdns", "--base-dir", "", "apply"]).unwrap();
        assert_eq!(cli.settings().base_dir, None);
    }

    #[test]
    fn test_render_defaults_to_dns_key() {
        let cli = Cli::try_parse_from(["nftdns", "render"]).unwrap();
        match cli.command {
            Commands::Render { key } => assert_eq!(key, "dns"),
            _ => panic!("Expected Render command"),
        }
    }

    #[test]
    fn test_reload_cmd_override_is_split_on_whitespace() {
        let cli = Cli::try_parse_from([
            "nftdns",
            "--reload-cmd",
            "sudo systemctl reload nftables.service",
            "apply",
        ])
        .unwrap();

        assert_eq!(
            cli.settings().reload_cmd,
            ["sudo", "systemctl", "reload", "nftables.service"]
        );
    }

    #[test]
    fn test_reload_cmd_defaults_to_systemctl() {
        let cli = Cli::try_parse_from(["nftdns", "apply"]).unwrap();
        assert_eq!(
            cli.settings().reload_cmd,
            ["systemctl", "reload", "nftables.service"]
        );
    }

    #[test]
    fn test_check_command() {
        let cli = Cli::try_parse_from(["nftdns", "check"]).unwrap();
        assert!(matches!(cli.command, Commands::Check));
    }

    #[test]
    fn test_version_command() {
        let cli = Cli::try_parse_from(["nftdns", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_quiet_and_verbose_flags() {
        let cli = Cli::try_parse_from(["nftdns", "-q", "-v", "check"]).unwrap();
        assert!(cli.quiet);
        assert!(cli.verbose);
    }
}
