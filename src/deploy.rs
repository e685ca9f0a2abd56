//! Change detection, staged validation, and commit of generated artifacts.
//!
//! The underlying platform offers no transactional primitive, so the commit
//! discipline is engineered explicitly: fingerprint the candidate against
//! the deployed artifact, stage it in a synthetic root next to every sibling
//! artifact, validate the staged composite, and only then overwrite the
//! canonical path. The live root is re-validated after promotion because it
//! may legitimately differ from the synthetic staging root. Temp files are
//! removed on every exit path via RAII.
//!
//! There is no rollback after promotion: a live-validation failure leaves
//! the artifact overwritten and surfaces a fatal error for the operator.

use md5::{Digest, Md5};
use std::fmt::Write as _;
use std::fs;
use std::io::Write as _;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, warn};

use crate::cmd_abstraction::CommandExecutor;
use crate::config::Settings;
use crate::error::NftdnsError;
use crate::firewall::Firewall;

/// Content hash used purely for change detection, not for security.
/// Collision risk of md5 is an accepted tradeoff.
pub fn fingerprint(content: &[u8]) -> String {
    let digest = Md5::digest(content);
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Fingerprint of the bytes at a path; a missing file hashes as empty input.
pub fn file_fingerprint(path: &Path) -> std::io::Result<String> {
    if path.exists() {
        Ok(fingerprint(&fs::read(path)?))
    } else {
        Ok(fingerprint(b""))
    }
}

/// Whether candidate content differs from what is deployed at `path`.
pub fn content_changed(candidate: &str, path: &Path) -> std::io::Result<bool> {
    Ok(fingerprint(candidate.as_bytes()) != file_fingerprint(path)?)
}

/// Outcome of a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployOutcome {
    /// Candidate matched the deployed artifact; nothing was staged,
    /// validated, or reloaded.
    Unchanged,
    /// Artifact promoted and live config validated.
    Committed {
        /// Whether the service reload command exited zero
        reloaded: bool,
    },
}

/// Safe-apply pipeline for one addon artifact.
pub struct Deployer<'a, E: CommandExecutor> {
    settings: &'a Settings,
    firewall: Firewall<'a, E>,
}

impl<'a, E: CommandExecutor> Deployer<'a, E> {
    pub fn new(settings: &'a Settings, executor: &'a E) -> Self {
        Self {
            settings,
            firewall: Firewall::new(settings, executor),
        }
    }

    /// Run change detection, staged validation, promotion, live validation,
    /// and reload for one addon key.
    pub async fn deploy(&self, key: &str, content: &str) -> Result<DeployOutcome, NftdnsError> {
        let artifact = self.settings.artifact_path(key);

        if !content_changed(content, &artifact)? {
            info!("Config {} unchanged - nothing to do", artifact.display());
            return Ok(DeployOutcome::Unchanged);
        }

        // Both temp files are deleted on drop, on every exit path below.
        let candidate = self.write_temp(key, content)?;
        let staging = self.staging_document(key, candidate.path())?;
        let staging_root = self.write_temp("main", &staging)?;

        if !self.firewall.validate(staging_root.path()).await? {
            return Err(NftdnsError::StagingValidation(format!(
                "{} did not validate; live config untouched",
                staging_root.path().display()
            )));
        }
        info!("Staged config validated successfully");

        self.write_artifact(&artifact, content)?;
        debug!("Promoted candidate to {}", artifact.display());

        if !self.firewall.validate(&self.settings.live_config).await? {
            return Err(NftdnsError::LiveValidation(format!(
                "{} is invalid after promoting {}; manual intervention required",
                self.settings.live_config.display(),
                artifact.display()
            )));
        }
        info!("Live config validated successfully");

        let reloaded = self.firewall.reload().await?;
        if !reloaded {
            warn!("nftables reload returned nonzero; config remains committed");
        }

        Ok(DeployOutcome::Committed { reloaded })
    }

    /// Synthesize the staging root: the candidate first, then every other
    /// committed artifact in the addon directory (sorted for determinism),
    /// then the optional base-directory glob include. Validating the
    /// composite catches cross-file errors (duplicate defines, conflicting
    /// references) before they can reach the live tree.
    fn staging_document(&self, key: &str, candidate: &Path) -> Result<String, NftdnsError> {
        let own_name = self.settings.artifact_name(key);
        let mut doc = format!("include \"{}\"\n", candidate.display());

        let mut siblings = Vec::new();
        for entry in fs::read_dir(&self.settings.addon_dir)? {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(&self.settings.config_ext) && name != own_name {
                siblings.push(name);
            }
        }
        siblings.sort();

        for name in siblings {
            let _ = writeln!(
                doc,
                "include \"{}\"",
                self.settings.addon_dir.join(name).display()
            );
        }

        if let Some(base) = &self.settings.base_dir {
            let _ = writeln!(
                doc,
                "include \"{}/*{}\"",
                base.display(),
                self.settings.config_ext
            );
        }

        Ok(doc)
    }

    /// Write content to a uniquely named temp file with conservative
    /// permissions. The file is removed when the returned handle drops.
    fn write_temp(&self, tag: &str, content: &str) -> Result<NamedTempFile, NftdnsError> {
        let mut file = Builder::new()
            .prefix(&format!("{}{}_", self.settings.tmp_prefix, tag))
            .suffix(&self.settings.config_ext)
            .tempfile_in(&self.settings.tmp_dir)?;

        file.write_all(content.as_bytes())?;
        file.flush()?;
        fs::set_permissions(
            file.path(),
            fs::Permissions::from_mode(self.settings.file_mode),
        )?;

        Ok(file)
    }

    /// Overwrite the canonical artifact wholesale, never patching in place.
    fn write_artifact(&self, path: &Path, content: &str) -> Result<(), NftdnsError> {
        fs::write(path, content)?;
        fs::set_permissions(path, fs::Permissions::from_mode(self.settings.file_mode))?;
        Ok(())
    }
}
