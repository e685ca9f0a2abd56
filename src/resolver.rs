//! Hostname resolution for address-set variables.
//!
//! One synchronous lookup per hostname per address family, no retries and no
//! caching. Any failure degrades the lookup to an empty result; the affected
//! variable then renders with its fallback value instead of aborting the run.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[cfg(test)]
use mockall::automock;

/// IP address family of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Fixed value substituted when resolution yields no addresses.
    pub fn fallback(self) -> &'static str {
        match self {
            IpVersion::V4 => "0.0.0.0",
            IpVersion::V6 => "::",
        }
    }

    /// Whether an address belongs to this family.
    pub fn matches(self, addr: &IpAddr) -> bool {
        matches!(
            (self, addr),
            (IpVersion::V4, IpAddr::V4(_)) | (IpVersion::V6, IpAddr::V6(_))
        )
    }
}

/// Trait abstracting the name-to-address lookup for dependency injection.
#[cfg_attr(test, automock)]
pub trait NameResolver: Send + Sync {
    /// Look up all addresses for a hostname, both families mixed.
    fn lookup(&self, hostname: &str) -> std::io::Result<Vec<IpAddr>>;
}

/// Production resolver using the system's getaddrinfo.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl NameResolver for SystemResolver {
    fn lookup(&self, hostname: &str) -> std::io::Result<Vec<IpAddr>> {
        dns_lookup::lookup_host(hostname)
    }
}

/// Resolve a hostname to the addresses of one family.
///
/// The result is deduplicated and sorted lexicographically so output order
/// is deterministic across runs. Lookup errors (NXDOMAIN, transient failure,
/// malformed name) return an empty result.
pub fn resolve_with<R: NameResolver + ?Sized>(
    resolver: &R,
    hostname: &str,
    version: IpVersion,
) -> Vec<String> {
    let addrs = match resolver.lookup(hostname) {
        Ok(addrs) => addrs,
        Err(e) => {
            debug!("Resolution of {} ({:?}) failed: {}", hostname, version, e);
            return Vec::new();
        }
    };

    let mut values: Vec<String> = addrs
        .into_iter()
        .filter(|addr| version.matches(addr))
        .map(|addr| addr.to_string())
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Resolve with a bounded timeout, running the blocking lookup off the
/// async runtime. Timeout and task failure both degrade to an empty result.
pub async fn resolve<R: NameResolver + 'static>(
    resolver: Arc<R>,
    hostname: String,
    version: IpVersion,
    timeout: Duration,
) -> Vec<String> {
    let host = hostname.clone();
    let lookup =
        tokio::task::spawn_blocking(move || resolve_with(resolver.as_ref(), &host, version));

    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok(values)) => values,
        Ok(Err(e)) => {
            warn!("Resolution task for {} failed: {}", hostname, e);
            Vec::new()
        }
        Err(_) => {
            warn!(
                "Resolution of {} timed out after {}s",
                hostname,
                timeout.as_secs()
            );
            Vec::new()
        }
    }
}
