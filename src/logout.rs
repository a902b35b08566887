use anyhow::{Context, Result};
use inquire::MultiSelect;
use std::fs;

use crate::account_selector::AccountSelector;
use crate::login::prompt;
use crate::secrets::TokenStore;

pub fn run(identity_flag: Option<String>) -> Result<()> {
    let selector = AccountSelector::new()?;
    let stored = selector.select_stored(identity_flag.clone())?;

    if stored.is_empty() {
        eprintln!("No stored identities.");
        return Ok(());
    }

    // Determine which identities to forget
    let to_remove: Vec<String> = if identity_flag.is_some() || stored.len() == 1 {
        stored.iter().map(|(id, _)| id.clone()).collect()
    } else {
        let selected = MultiSelect::new(
            "Select identities to log out (use Space to select, Enter to confirm):",
            stored.iter().map(|(id, _)| id.clone()).collect(),
        )
        .with_all_selected_by_default()
        .prompt()?;

        if selected.is_empty() {
            anyhow::bail!("No identities selected");
        }
        selected
    };

    // Confirm before proceeding
    if to_remove.len() == 1 {
        eprintln!("You are about to log out: {}", to_remove[0]);
    } else {
        eprintln!("You are about to log out {} identities:", to_remove.len());
        for identity in &to_remove {
            eprintln!("  - {}", identity);
        }
    }
    let confirm = prompt("Proceed? [y/N]: ")?;
    if !matches!(confirm.trim(), "y" | "Y") {
        eprintln!("Logout cancelled.");
        return Ok(());
    }

    for identity in &to_remove {
        remove_identity(&selector, identity)?;
        eprintln!("Logged out: {}", identity);
    }

    Ok(())
}

/// Delete the stored token and the identity's directory
pub fn remove_identity(selector: &AccountSelector, identity: &str) -> Result<()> {
    let mut store = TokenStore::new(identity)?;
    store.delete_all()?;

    for (_, account_dir) in selector.select_stored(Some(identity.to_string()))? {
        fs::remove_dir_all(&account_dir)
            .with_context(|| format!("Failed to remove account data for {}", identity))?;
    }

    tracing::info!(identity, "Removed stored identity");
    Ok(())
}
