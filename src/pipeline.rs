//! Document generation: resolution fan-out and artifact rendering.
//!
//! Every hostname of a variable is resolved per address family, the results
//! are merged deterministically (deduplicated, sorted) independent of
//! completion order, and one definition per family is rendered.

use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::config::{AddonConfig, Settings};
use crate::formatter::{render_document, VariableDefinition};
use crate::resolver::{self, IpVersion, NameResolver};

/// Resolve all configured hostnames and render the full artifact document.
pub async fn generate_document<R: NameResolver + 'static>(
    resolver: &Arc<R>,
    settings: &Settings,
    mapping: &AddonConfig,
) -> String {
    let mut defs = Vec::new();

    for (name, hostnames) in &mapping.variables {
        let mut values_v4 = BTreeSet::new();
        let mut values_v6 = BTreeSet::new();

        for hostname in hostnames {
            values_v4.extend(
                resolver::resolve(
                    Arc::clone(resolver),
                    hostname.clone(),
                    IpVersion::V4,
                    settings.dns_timeout,
                )
                .await,
            );
            if settings.process_ipv6 {
                values_v6.extend(
                    resolver::resolve(
                        Arc::clone(resolver),
                        hostname.clone(),
                        IpVersion::V6,
                        settings.dns_timeout,
                    )
                    .await,
                );
            }
        }
        debug!(
            "{}: {} v4 / {} v6 addresses",
            name,
            values_v4.len(),
            values_v6.len()
        );

        defs.push(VariableDefinition::new(
            name,
            IpVersion::V4,
            values_v4.into_iter().collect(),
        ));
        if settings.process_ipv6 {
            defs.push(VariableDefinition::new(
                name,
                IpVersion::V6,
                values_v6.into_iter().collect(),
            ));
        }
    }

    render_document(&defs, settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::MockNameResolver;
    use std::collections::BTreeMap;
    use std::net::IpAddr;

    fn addr(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn mapping(entries: &[(&str, &[&str])]) -> AddonConfig {
        let variables: BTreeMap<String, Vec<String>> = entries
            .iter()
            .map(|(name, hosts)| {
                (
                    name.to_string(),
                    hosts.iter().map(|h| h.to_string()).collect(),
                )
            })
            .collect();
        AddonConfig { variables }
    }

    #[tokio::test]
    async fn test_end_to_end_document() {
        let mut mock = MockNameResolver::new();
        mock.expect_lookup()
            .withf(|host| host == "api.example.com")
            .returning(|_| Ok(vec![addr("203.0.113.5")]));

        let settings = Settings::default();
        let config = mapping(&[("allow_api", &["api.example.com"])]);

        let doc = generate_document(&Arc::new(mock), &settings, &config).await;

        assert!(doc.contains("define allow_api_v4 = 203.0.113.5\n"));
        assert!(doc.contains("define allow_api_v6 = ::\n"));
        assert!(doc.starts_with("# Auto-Generated config"));
    }

    #[tokio::test]
    async fn test_values_merged_across_hostnames() {
        let mut mock = MockNameResolver::new();
        mock.expect_lookup()
            .withf(|host| host == "a.example.com")
            .returning(|_| Ok(vec![addr("1.1.1.1"), addr("9.9.9.9")]));
        mock.expect_lookup()
            .withf(|host| host == "b.example.com")
            .returning(|_| Ok(vec![addr("1.0.0.1"), addr("1.1.1.1")]));

        let settings = Settings {
            process_ipv6: false,
            ..Settings::default()
        };
        let config = mapping(&[("mixed", &["a.example.com", "b.example.com"])]);

        let doc = generate_document(&Arc::new(mock), &settings, &config).await;

        // Deduplicated and sorted across both hostnames.
        assert!(doc.contains("define mixed_v4 = { 1.0.0.1, 1.1.1.1, 9.9.9.9 }\n"));
    }

    #[tokio::test]
    async fn test_ipv6_disabled_emits_no_v6_variables() {
        let mut mock = MockNameResolver::new();
        mock.expect_lookup()
            .returning(|_| Ok(vec![addr("203.0.113.5"), addr("2001:db8::1")]));

        let settings = Settings {
            process_ipv6: false,
            ..Settings::default()
        };
        let config = mapping(&[("api", &["api.example.com"])]);

        let doc = generate_document(&Arc::new(mock), &settings, &config).await;

        assert!(doc.contains("define api_v4 = 203.0.113.5\n"));
        assert!(!doc.contains("api_v6"));
    }

    #[tokio::test]
    async fn test_failed_resolution_degrades_to_fallbacks() {
        let mut mock = MockNameResolver::new();
        mock.expect_lookup().returning(|_| {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "NXDOMAIN",
            ))
        });

        let settings = Settings::default();
        let config = mapping(&[("gone", &["gone.example.com"])]);

        let doc = generate_document(&Arc::new(mock), &settings, &config).await;

        assert!(doc.contains("define gone_v4 = 0.0.0.0\n"));
        assert!(doc.contains("define gone_v6 = ::\n"));
    }

    #[tokio::test]
    async fn test_generation_is_deterministic() {
        let settings = Settings::default();
        let config = mapping(&[("zeta", &["z.example.com"]), ("alpha", &["a.example.com"])]);

        let mut mock_a = MockNameResolver::new();
        mock_a.expect_lookup().returning(|_| Ok(vec![addr("10.0.0.1")]));
        let first = generate_document(&Arc::new(mock_a), &settings, &config).await;

        let mut mock_b = MockNameResolver::new();
        mock_b.expect_lookup().returning(|_| Ok(vec![addr("10.0.0.1")]));
        let second = generate_document(&Arc::new(mock_b), &settings, &config).await;

        assert_eq!(first, second);
        // Variables render in sorted order.
        let alpha = first.find("alpha").unwrap();
        let zeta = first.find("zeta").unwrap();
        assert!(alpha < zeta);
    }
}
