//! Inbox slug derivation and validation.
//!
//! An inbox is addressed publicly as `/to/{slug}`. The slug is derived from
//! the owner's identity-provider nickname on first login and never changes
//! afterwards.

use crate::error::CoreError;

/// Maximum slug length in bytes (slugs are ASCII-only).
pub const MAX_SLUG_LENGTH: usize = 64;

/// Upper bound on disambiguation attempts when a slug is already taken.
pub const MAX_SLUG_ATTEMPTS: u32 = 50;

/// Derive a URL-safe slug from a nickname.
///
/// Lowercases, keeps ASCII alphanumerics, `-`, `_` and `.`, and replaces
/// every other run of characters with a single `-`. Leading and trailing
/// `-`/`.` are trimmed.
pub fn derive_slug(nickname: &str) -> Result<String, CoreError> {
    let mut slug = String::with_capacity(nickname.len());
    let mut pending_dash = false;

    for c in nickname.trim().chars() {
        let c = c.to_ascii_lowercase();
        if is_slug_char(c) {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_SLUG_LENGTH);
    let slug = slug.trim_matches(|c| c == '-' || c == '.').to_string();

    if slug.is_empty() {
        return Err(CoreError::Validation(format!(
            "Nickname '{nickname}' does not yield a usable inbox slug"
        )));
    }
    Ok(slug)
}

/// Candidate slug for the given disambiguation attempt.
///
/// Attempt `0` is the base slug itself; attempt `n` appends `-{n + 1}`,
/// so the sequence reads `alice`, `alice-2`, `alice-3`, ...
pub fn candidate_slug(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        return base.to_string();
    }
    let suffix = format!("-{}", attempt + 1);
    let keep = MAX_SLUG_LENGTH.saturating_sub(suffix.len()).min(base.len());
    format!("{}{suffix}", base[..keep].trim_end_matches(['-', '.']))
}

/// Check that a path segment could be a slug produced by [`derive_slug`].
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.is_empty() {
        return Err("Slug cannot be empty".to_string());
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(format!(
            "Slug exceeds maximum length of {MAX_SLUG_LENGTH} characters"
        ));
    }
    if !slug.chars().all(is_slug_char) {
        return Err(format!("Slug '{slug}' contains invalid characters"));
    }
    Ok(())
}

fn is_slug_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')
}
