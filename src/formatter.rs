//! Rendering of nftables variable definitions.
//!
//! Pure formatting: no I/O, fully deterministic for given inputs.

use crate::config::Settings;
use crate::resolver::IpVersion;

/// Header comment marking generated artifacts. The exact bytes matter:
/// artifacts already deployed by earlier tooling carry this line, and any
/// difference would trigger a spurious change cycle on takeover.
pub const FILE_HEADER: &str = "# Auto-Generated config - DO NOT EDIT MANUALLY!\n";

/// One named variable bound to the resolved addresses of one IP family.
#[derive(Debug, Clone)]
pub struct VariableDefinition {
    /// Base symbolic name, before the per-version suffix
    pub name: String,
    pub version: IpVersion,
    /// Deduplicated, sorted address strings; empty when resolution failed
    pub values: Vec<String>,
    /// Force set-literal syntax even for zero or one value
    pub as_set: bool,
    /// Caller-supplied replacement for the per-version fallback constant
    pub fallback: Option<String>,
}

impl VariableDefinition {
    pub fn new(name: &str, version: IpVersion, values: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            version,
            values,
            as_set: false,
            fallback: None,
        }
    }

    /// Render this definition as one line of nftables syntax.
    ///
    /// Set-literal syntax is chosen when `as_set` is true or more than one
    /// value is present. Empty values render as the per-version fallback
    /// so the artifact never contains an empty construct.
    pub fn render(&self, settings: &Settings) -> String {
        let suffix = match self.version {
            IpVersion::V4 => &settings.suffix_v4,
            IpVersion::V6 => &settings.suffix_v6,
        };

        let name = if suffix.trim().is_empty() {
            self.name.clone()
        } else {
            format!("{}_{}", self.name, suffix)
        };

        let value = if self.values.is_empty() {
            self.fallback
                .clone()
                .unwrap_or_else(|| self.version.fallback().to_string())
        } else {
            self.values.join(", ")
        };

        if self.as_set || self.values.len() > 1 {
            format!("define {name} = {{ {value} }}")
        } else {
            format!("define {name} = {value}")
        }
    }
}

/// Render the full artifact document: header comment, one line per
/// definition, and a trailing blank line.
pub fn render_document(defs: &[VariableDefinition], settings: &Settings) -> String {
    let mut out = String::from(FILE_HEADER);
    out.push('\n');
    for def in defs {
        out.push_str(&def.render(settings));
        out.push('\n');
    }
    out.push('\n');
    out
}
