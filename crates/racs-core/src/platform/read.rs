use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::{fs, path::Path};

use crate::report::model::{ProfileHash, ProfileInfo};

use super::profile::PlatformProfile;

/// Parsed platform description plus the cryptographic fingerprint of
/// the file it came from.
#[derive(Debug, Clone)]
pub struct ProfileContext {
    /// Optional source path (informational only).
    pub path: Option<String>,

    /// Parsed machine description.
    pub profile: PlatformProfile,

    /// Size of the description file in bytes.
    pub size_bytes: u64,

    /// Hash algorithm used for fingerprinting.
    pub hash_alg: String,

    /// Hex-encoded hash of the file bytes.
    pub hash_hex: String,
}

impl ProfileContext {
    /// Split into the runnable description and the report-facing
    /// provenance metadata.
    pub fn into_parts(self) -> (PlatformProfile, ProfileInfo) {
        let info = ProfileInfo {
            path: self.path,
            size_bytes: self.size_bytes,
            hash: ProfileHash {
                algorithm: self.hash_alg,
                value: self.hash_hex,
            },
        };
        (self.profile, info)
    }
}

/// Read and parse a platform description, fingerprinting the raw bytes.
///
/// The fingerprint depends **only** on the file bytes, so the same
/// description always identifies itself the same way in reports.
pub fn read_profile(path: &Path) -> Result<ProfileContext> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read platform description: {}", path.display()))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hasher.finalize();

    let profile: PlatformProfile = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse platform description: {}", path.display()))?;

    Ok(ProfileContext {
        path: Some(path.display().to_string()),
        profile,
        size_bytes: bytes.len() as u64,
        hash_alg: "sha256".to_string(),
        hash_hex: hex::encode(digest),
    })
}
