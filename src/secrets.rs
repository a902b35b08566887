// src/secrets.rs
// Token storage for contribs
// Stores GitHub tokens in local JSON files, one per identity

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::{identity_to_dirname, resolve_data_root};

// ============================================
// Internal Types (Private)
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct IdentitySecrets {
    token: Option<String>,
}

// ============================================
// Public API
// ============================================

/// Storage for the GitHub token of one identity
///
/// Callers don't need to know where the token lives; the store loads it on
/// creation and persists every change immediately.
pub struct TokenStore {
    identity: String,
    secrets: IdentitySecrets,
}

impl TokenStore {
    /// Create a store for an identity
    ///
    /// Loads an existing token if available, or starts empty.
    pub fn new(identity: &str) -> Result<Self> {
        let secrets = load_secrets_from_file(identity).unwrap_or_default();
        Ok(Self {
            identity: identity.to_owned(),
            secrets,
        })
    }

    /// Get the stored token
    pub fn get_token(&self) -> Option<String> {
        self.secrets.token.clone()
    }

    /// Store a token, replacing any previous one
    pub fn store_token(&mut self, token: String) -> Result<()> {
        self.secrets = IdentitySecrets { token: Some(token) };
        save_secrets_to_file(&self.identity, &self.secrets)
    }

    /// Delete the stored token
    pub fn delete_all(&mut self) -> Result<()> {
        self.secrets = IdentitySecrets::default();
        delete_secrets_file(&self.identity)
    }
}

// ============================================
// Internal Implementation
// ============================================

pub(crate) fn credentials_file_path(identity: &str) -> Result<PathBuf> {
    let data_root = resolve_data_root()?;
    Ok(data_root
        .join("accounts")
        .join(identity_to_dirname(identity))
        .join("meta")
        .join("credentials.json"))
}

fn load_secrets_from_file(identity: &str) -> Result<IdentitySecrets> {
    let path = credentials_file_path(identity)?;
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read credentials from {}", path.display()))?;
    let secrets: IdentitySecrets = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse credentials from {}", path.display()))?;
    Ok(secrets)
}

fn save_secrets_to_file(identity: &str, secrets: &IdentitySecrets) -> Result<()> {
    let path = credentials_file_path(identity)?;

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(secrets).context("Failed to serialize credentials")?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write credentials to {}", path.display()))?;

    restrict_permissions(&path)?;

    Ok(())
}

#[cfg(unix)]
fn restrict_permissions(path: &std::path::Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to restrict permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &std::path::Path) -> Result<()> {
    Ok(())
}

fn delete_secrets_file(identity: &str) -> Result<()> {
    let path = credentials_file_path(identity)?;
    if path.exists() {
        fs::remove_file(&path)
            .with_context(|| format!("Failed to delete credentials file {}", path.display()))?;
    }
    Ok(())
}
