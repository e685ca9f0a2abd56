//! # nftdns - DNS-backed nftables address variables
//!
//! Turns a declarative JSON mapping of symbolic names to hostnames into
//! nftables `define` variables, and deploys the generated artifact into the
//! live configuration tree without ever committing an invalid ruleset.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        nftdns                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: apply, render, check, version              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_json)                                        │
//! │    └── Settings + addon mapping (<addon_dir>/<key>.json)    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Resolver (dns-lookup)                                      │
//! │    └── A/AAAA lookups, dedup + sort, fallback on failure    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Formatter                                                  │
//! │    └── define <name>_v4/_v6 = { ... } document rendering    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Deployer (md5 + tempfile + CommandExecutor)                │
//! │    ├── Change detection against the deployed artifact       │
//! │    ├── Staged validation of the composite config (nft -cf)  │
//! │    └── Promote -> live re-validation -> service reload      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Safety discipline
//!
//! The platform offers no transactional primitive, so the apply pipeline
//! encodes one explicitly:
//!
//! 1. **Change detection** - md5 fingerprint of the candidate vs the
//!    deployed artifact; an unchanged candidate is a logged no-op.
//! 2. **Staged validation** - the candidate is written to a unique temp
//!    file and validated together with every sibling addon artifact and the
//!    base config directory, catching cross-file errors before commit.
//! 3. **Commit** - the canonical artifact is overwritten wholesale (mode
//!    0640), the real live root is re-validated, and only then is the
//!    nftables service reloaded.
//!
//! Temp files are removed on every exit path. A live-validation failure
//! after promotion is fatal and performs no rollback; the operator must
//! intervene.
//!
//! ## Example Usage
//!
//! ```no_run
//! use nftdns::cmd_abstraction::RealCommandExecutor;
//! use nftdns::config::{AddonConfig, Settings};
//! use nftdns::deploy::Deployer;
//! use nftdns::pipeline::generate_document;
//! use nftdns::resolver::SystemResolver;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::default();
//!     let mapping = AddonConfig::load(&settings, "dns")?;
//!
//!     let resolver = Arc::new(SystemResolver);
//!     let content = generate_document(&resolver, &settings, &mapping).await;
//!
//!     let executor = RealCommandExecutor::new(settings.command_timeout);
//!     let deployer = Deployer::new(&settings, &executor);
//!     deployer.deploy("dns", &content).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`cmd_abstraction`] - Command execution with bounded timeouts
//! - [`commands`] - CLI command implementations
//! - [`config`] - Pipeline settings and addon config loading
//! - [`deploy`] - Change detection, staged validation, commit
//! - [`error`] - Fatal error taxonomy
//! - [`firewall`] - nft validator and service reload wrappers
//! - [`formatter`] - Variable definition and document rendering
//! - [`lock`] - File locking for concurrent execution prevention
//! - [`pipeline`] - Resolution fan-out and document generation
//! - [`resolver`] - DNS resolution with timeout

pub mod cli;
pub mod cmd_abstraction;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod firewall;
pub mod formatter;
pub mod lock;
pub mod pipeline;
pub mod resolver;

pub use cli::{Cli, Commands};
pub use config::Settings;
pub use error::NftdnsError;
