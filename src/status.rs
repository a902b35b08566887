use crate::account_selector::AccountSelector;
use crate::secrets::{credentials_file_path, TokenStore};
use crate::validate::is_valid_token;
use anyhow::Result;

/// Status of an identity's stored files and token
pub struct AccountStatus {
    pub identity: String,
    pub credentials_exists: bool,
    pub token_exists: bool,
    pub token_format: String,
}

/// Check the stored state of one identity.
pub fn check_account_status(identity: &str) -> Result<AccountStatus> {
    let credentials_exists = credentials_file_path(identity)?.exists();
    let token = TokenStore::new(identity)?.get_token();

    let token_format = match token.as_deref() {
        None => "-".to_string(),
        Some(t) if is_valid_token(t) => "✓ Looks like a GitHub token".to_string(),
        Some(_) => "⚠ Unrecognized format".to_string(),
    };

    Ok(AccountStatus {
        identity: identity.to_string(),
        credentials_exists,
        token_exists: token.is_some(),
        token_format,
    })
}

pub fn run(identity_flag: Option<String>) -> Result<()> {
    let selector = AccountSelector::new()?;
    let accounts = selector.select_stored(identity_flag)?;

    if accounts.is_empty() {
        println!("No stored identities.");
        return Ok(());
    }

    for (identity, account_dir) in &accounts {
        let status = check_account_status(identity)?;
        println!("\nIdentity: {}", status.identity);
        println!("  Directory: {}", account_dir.display());
        println!(
            "  meta/credentials.json: {}",
            if status.credentials_exists {
                "OK"
            } else {
                "missing"
            }
        );
        println!(
            "  Token: {} ({})",
            if status.token_exists { "stored" } else { "none" },
            status.token_format
        );
    }

    Ok(())
}
