//! Page naming: `<frameset><number>`, e.g. `notes12`.

use crate::error::StoreError;

/// Validate a frameset name.
///
/// A frameset name starts with an ASCII letter, holds only ASCII alphanumerics
/// or `_`, and must not end with a digit (the page number is appended to it).
pub fn validate_frameset_name(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let body_ok = name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let ends_ok = !name.ends_with(|c: char| c.is_ascii_digit());

    if starts_with_letter && body_ok && ends_ok {
        Ok(())
    } else {
        Err(StoreError::InvalidFramesetName(name.to_string()))
    }
}

/// Build the name of page `number` in `frameset`.
pub fn page_name(frameset: &str, number: u32) -> String {
    format!("{}{}", frameset, number)
}

/// Split a page name into its frameset name and page number.
pub fn parse_page_name(name: &str) -> Result<(String, u32), StoreError> {
    let split = name
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)
        .ok_or_else(|| StoreError::InvalidPageName(name.to_string()))?;

    let (frameset, digits) = name.split_at(split);
    validate_frameset_name(frameset).map_err(|_| StoreError::InvalidPageName(name.to_string()))?;
    let number = digits
        .parse::<u32>()
        .map_err(|_| StoreError::InvalidPageName(name.to_string()))?;

    Ok((frameset.to_string(), number))
}

/// Canonical key for a frameset; frameset names compare case-insensitively.
pub fn frameset_key(frameset: &str) -> String {
    frameset.to_ascii_lowercase()
}

/// Canonical key for a page name.
pub fn page_key(name: &str) -> String {
    name.to_ascii_lowercase()
}
