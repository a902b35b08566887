use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::{identity_to_dirname, resolve_data_root};

/// Preferences for identity selection, stored globally.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Preferences {
    /// Last identity picked interactively
    #[serde(default)]
    pub last_selected: Option<String>,
}

impl Preferences {
    fn file_path() -> Result<PathBuf> {
        Ok(resolve_data_root()?.join("global").join("preferences.json"))
    }

    /// Load preferences, or defaults when none were saved yet
    pub fn load() -> Result<Self> {
        let path = Self::file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    /// Persist preferences under `global/`
    pub fn save(&self) -> Result<()> {
        let path = Self::file_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&path, contents).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Picks the identity to show when `--user` is not given, remembering the
/// last interactive choice.
pub struct AccountSelector {
    preferences: Preferences,
}

impl AccountSelector {
    /// Create a new account selector, loading preferences
    pub fn new() -> Result<Self> {
        let preferences = Preferences::load()?;
        Ok(Self { preferences })
    }

    /// Discover identities with a directory under `accounts/`.
    /// Returns Vec of (identity, account_dir) tuples, sorted by identity.
    pub fn discover_accounts() -> Result<Vec<(String, PathBuf)>> {
        let data_root = resolve_data_root()?;
        let accounts_root = data_root.join("accounts");

        if !accounts_root.exists() {
            return Ok(Vec::new());
        }

        let mut accounts = Vec::new();
        for entry in fs::read_dir(&accounts_root).context("Failed to read accounts directory")? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                let identity = entry.file_name().to_string_lossy().to_string();
                accounts.push((identity, entry.path()));
            }
        }
        accounts.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(accounts)
    }

    /// Resolve the identity to use.
    ///
    /// Behavior:
    /// - If `identity_flag` is Some, returns it as-is (stored or not; public
    ///   calendars need no token)
    /// - If exactly one identity is stored, returns it (no UI)
    /// - If several are stored, shows a single-select UI starting at the last choice
    pub fn select_identity(&mut self, identity_flag: Option<String>) -> Result<String> {
        if let Some(identity) = identity_flag {
            return Ok(identity);
        }

        let all_accounts = Self::discover_accounts()?;
        match all_accounts.len() {
            0 => anyhow::bail!("No identity given. Pass --user or run 'contribs login' first."),
            1 => Ok(all_accounts[0].0.clone()),
            _ => self.select_single(&all_accounts),
        }
    }

    /// Resolve the stored identities an account command applies to.
    pub fn select_stored(&self, identity_flag: Option<String>) -> Result<Vec<(String, PathBuf)>> {
        let all_accounts = Self::discover_accounts()?;

        if let Some(identity) = identity_flag {
            let dirname = identity_to_dirname(&identity);
            return match all_accounts.into_iter().find(|(id, _)| *id == dirname) {
                Some(account) => Ok(vec![account]),
                None => anyhow::bail!("Account not found: {}", identity),
            };
        }

        Ok(all_accounts)
    }

    /// Show single-select UI for choosing one identity
    fn select_single(&mut self, all_accounts: &[(String, PathBuf)]) -> Result<String> {
        let identities: Vec<String> = all_accounts.iter().map(|(id, _)| id.clone()).collect();

        // Use saved preference if it exists and is still valid
        let default_idx = self
            .preferences
            .last_selected
            .as_ref()
            .and_then(|last| identities.iter().position(|id| id == last));

        let prompt = inquire::Select::new("Select GitHub identity:", identities);
        let selected = match default_idx {
            Some(idx) => prompt.with_starting_cursor(idx).prompt()?,
            None => prompt.prompt()?,
        };

        self.preferences.last_selected = Some(selected.clone());
        self.preferences.save()?;

        Ok(selected)
    }
}
