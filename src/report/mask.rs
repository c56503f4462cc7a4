//! Masking of secrets for display.

const VISIBLE_PREFIX: usize = 6;
const VISIBLE_SUFFIX: usize = 4;

/// Show the first 6 and last 4 characters joined by `...`.
///
/// Values too short to hide anything that way are fully replaced.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= VISIBLE_PREFIX + VISIBLE_SUFFIX {
        return "****".to_string();
    }

    let prefix: String = chars[..VISIBLE_PREFIX].iter().collect();
    let suffix: String = chars[chars.len() - VISIBLE_SUFFIX..].iter().collect();
    format!("{}...{}", prefix, suffix)
}
