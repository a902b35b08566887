//! Shape checks for GitHub usernames and tokens.

const MAX_USERNAME_LEN: usize = 39;
const MIN_TOKEN_BODY_LEN: usize = 36;

/// 1-39 ASCII alphanumerics or hyphens, not starting or ending with a hyphen.
pub fn is_valid_username(username: &str) -> bool {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return false;
    }
    if username.starts_with('-') || username.ends_with('-') {
        return false;
    }
    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// `gh{p,o,u,s,r}_` followed by at least 36 ASCII alphanumerics or underscores.
pub fn is_valid_token(token: &str) -> bool {
    let Some(rest) = token.strip_prefix("gh") else {
        return false;
    };
    let mut chars = rest.chars();
    if !matches!(chars.next(), Some('p' | 'o' | 'u' | 's' | 'r')) {
        return false;
    }
    if chars.next() != Some('_') {
        return false;
    }
    let body = chars.as_str();
    body.len() >= MIN_TOKEN_BODY_LEN
        && body.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
