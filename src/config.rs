//! Configuration for nftdns.
//!
//! [`Settings`] carries every path, command, and formatting constant the
//! pipeline needs. It is built once (from CLI arguments in production, by
//! hand in tests) and passed down explicitly, so independent runs never
//! interfere through shared globals.
//!
//! [`AddonConfig`] is the operator-supplied mapping of symbolic variable
//! names to hostnames, loaded from `<addon_dir>/<key>.json`.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::NftdnsError;

/// Default timeout for external command invocations (nft, systemctl)
const COMMAND_TIMEOUT_SECS: u64 = 30;

/// Default timeout for one hostname lookup
const DNS_TIMEOUT_SECS: u64 = 5;

/// Pipeline settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Path to the nft binary used for `-cf` validation
    pub nft_bin: String,

    /// Command that reloads the nftables service after a successful commit
    pub reload_cmd: Vec<String>,

    /// The live root nftables configuration
    pub live_config: PathBuf,

    /// Base config directory, included via glob in staging validation.
    /// `None` disables the glob include.
    pub base_dir: Option<PathBuf>,

    /// Directory holding one generated artifact per addon key
    pub addon_dir: PathBuf,

    /// Artifact file extension, including the leading dot
    pub config_ext: String,

    /// Directory for staging temp files
    pub tmp_dir: PathBuf,

    /// Prefix for staging temp file names
    pub tmp_prefix: String,

    /// Variable name suffix per IP version; blank suffixes are skipped
    pub suffix_v4: String,
    pub suffix_v6: String,

    /// Resolve AAAA records and emit v6 variables
    pub process_ipv6: bool,

    /// Unix mode for every file this pipeline writes
    pub file_mode: u32,

    /// Bound on every external command invocation
    pub command_timeout: Duration,

    /// Bound on each hostname lookup
    pub dns_timeout: Duration,

    /// Advisory lock serializing the staging+commit sequence
    pub lock_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nft_bin: "/usr/sbin/nft".to_string(),
            reload_cmd: vec![
                "systemctl".to_string(),
                "reload".to_string(),
                "nftables.service".to_string(),
            ],
            live_config: PathBuf::from("/etc/nftables.conf"),
            base_dir: Some(PathBuf::from("/etc/nftables.d")),
            addon_dir: PathBuf::from("/etc/nftables.d/addons"),
            config_ext: ".nft".to_string(),
            tmp_dir: PathBuf::from("/tmp"),
            tmp_prefix: "nftables_".to_string(),
            suffix_v4: "v4".to_string(),
            suffix_v6: "v6".to_string(),
            process_ipv6: true,
            file_mode: 0o640,
            command_timeout: Duration::from_secs(COMMAND_TIMEOUT_SECS),
            dns_timeout: Duration::from_secs(DNS_TIMEOUT_SECS),
            lock_file: PathBuf::from("/var/run/nftdns.lock"),
        }
    }
}

impl Settings {
    /// File name of the generated artifact for an addon key.
    pub fn artifact_name(&self, key: &str) -> String {
        format!("{}{}", key, self.config_ext)
    }

    /// Canonical on-disk path of the generated artifact for an addon key.
    pub fn artifact_path(&self, key: &str) -> PathBuf {
        self.addon_dir.join(self.artifact_name(key))
    }

    /// Path of the addon config file for a key.
    pub fn addon_config_path(&self, key: &str) -> PathBuf {
        self.addon_dir.join(format!("{key}.json"))
    }
}

/// A config value may bind one hostname or a list of hostnames to a variable.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HostnameEntry {
    One(String),
    Many(Vec<String>),
}

impl HostnameEntry {
    fn into_list(self) -> Vec<String> {
        match self {
            HostnameEntry::One(host) => vec![host],
            HostnameEntry::Many(hosts) => hosts,
        }
    }
}

/// Operator-supplied mapping of variable names to hostnames for one addon.
///
/// Loaded from `<addon_dir>/<key>.json`, which must contain a top-level
/// object keyed by the addon key:
///
/// ```json
/// { "dns": { "allow_api": ["api.example.com"], "repo": "deb.debian.org" } }
/// ```
///
/// A `BTreeMap` keeps variable order deterministic across runs, which keeps
/// change detection stable.
#[derive(Debug, Clone)]
pub struct AddonConfig {
    pub variables: BTreeMap<String, Vec<String>>,
}

impl AddonConfig {
    /// Load the mapping for an addon key. Missing file, malformed JSON,
    /// missing key, or an empty mapping are all fatal.
    pub fn load(settings: &Settings, key: &str) -> Result<Self, NftdnsError> {
        let path = settings.addon_config_path(key);
        let raw = fs::read_to_string(&path).map_err(|e| {
            NftdnsError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::parse(&raw, key, &path)
    }

    fn parse(raw: &str, key: &str, path: &Path) -> Result<Self, NftdnsError> {
        let mut doc: BTreeMap<String, BTreeMap<String, HostnameEntry>> =
            serde_json::from_str(raw).map_err(|e| {
                NftdnsError::Config(format!(
                    "Failed to parse config file {}: {e}",
                    path.display()
                ))
            })?;

        let section = doc.remove(key).ok_or_else(|| {
            NftdnsError::Config(format!(
                "Config file {} has no '{key}' section",
                path.display()
            ))
        })?;

        if section.is_empty() {
            return Err(NftdnsError::Config(format!(
                "Config file {} maps no variables under '{key}'",
                path.display()
            )));
        }

        let variables = section
            .into_iter()
            .map(|(name, entry)| (name, entry.into_list()))
            .collect();

        Ok(Self { variables })
    }
}
