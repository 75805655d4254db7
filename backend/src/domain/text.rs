//! Shared helpers for validating free-text and URL fields.

use url::Url;

/// Outcome of a failed bounded-text check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TextError {
    Empty,
    TooLong { max: usize },
}

/// Trim `value` and require between one and `max` characters.
pub(crate) fn bounded(value: &str, max: usize) -> Result<String, TextError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TextError::Empty);
    }
    if trimmed.chars().count() > max {
        return Err(TextError::TooLong { max });
    }
    Ok(trimmed.to_owned())
}

/// Trim an optional value, treating blank input as absent.
pub(crate) fn optional_bounded(value: Option<&str>, max: usize) -> Result<Option<String>, TextError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => bounded(v, max).map(Some),
        None => Ok(None),
    }
}

/// Maximum accepted length for image and avatar URLs.
pub(crate) const URL_MAX: usize = 2048;

/// Validate an optional absolute `http`/`https` URL.
///
/// Returns `Ok(None)` for blank input and `Err(())` when the value is too
/// long or does not parse as a web URL.
pub(crate) fn optional_http_url(value: Option<&str>) -> Result<Option<String>, ()> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if raw.len() > URL_MAX {
        return Err(());
    }
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Some(raw.to_owned())),
        _ => Err(()),
    }
}
