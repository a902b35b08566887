use anyhow::{Context, Result};
use rpassword::prompt_password;
use std::fs;
use std::io::{self, Write};

use crate::account_selector::AccountSelector;
use crate::config::{identity_to_dirname, resolve_data_root};
use crate::secrets::TokenStore;
use crate::validate::{is_valid_token, is_valid_username};

pub fn run(identity_flag: Option<String>) -> Result<()> {
    let data_root = resolve_data_root()?;
    let accounts_root = data_root.join("accounts");
    fs::create_dir_all(&accounts_root)
        .with_context(|| format!("create accounts dir at {}", accounts_root.display()))?;

    // List existing identities for information when no --user provided
    if identity_flag.is_none() {
        let existing = AccountSelector::discover_accounts()?;
        if !existing.is_empty() {
            eprintln!("Stored identities:");
            for (identity, _) in &existing {
                eprintln!("  - {}", identity);
            }
            eprintln!();
        }

        eprintln!("Add a new identity.");
    }

    let identity = match identity_flag {
        Some(identity) => identity,
        None => prompt("GitHub username: ")?.trim().to_owned(),
    };

    let token = prompt_password("GitHub token (input hidden): ")?;
    let token = token.trim().to_owned();

    let stored_as = store_credentials(&identity, token)?;
    eprintln!("Stored token for {}", stored_as);

    Ok(())
}

/// Validate and persist a token for `identity`, returning the stored identity key.
pub fn store_credentials(identity: &str, token: String) -> Result<String> {
    if !is_valid_username(identity) {
        anyhow::bail!("'{}' is not a valid GitHub username", identity);
    }
    if token.is_empty() {
        anyhow::bail!("Empty token, nothing stored");
    }
    if !is_valid_token(&token) {
        eprintln!("Warning: token does not look like a GitHub token (ghp_/gho_/ghu_/ghs_/ghr_); storing it anyway.");
        tracing::warn!(identity, "Stored token has an unrecognized format");
    }

    let mut store = TokenStore::new(identity)?;
    store.store_token(token)?;
    tracing::info!(identity, "Stored token");

    Ok(identity_to_dirname(identity))
}

pub fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input)
}
