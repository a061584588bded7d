//! Input validation for submitted URLs.

use thiserror::Error;
use url::Url;

/// Maximum accepted URL length.
pub const MAX_URL_LENGTH: usize = 2048;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} characters")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    Malformed(String),

    #[error("Invalid protocol '{0}'. Only HTTP and HTTPS are allowed.")]
    Scheme(String),

    #[error("URL must include a host")]
    MissingHost,
}

/// Validate a video URL and return its normalized form.
pub fn validate_video_url(url: &str) -> Result<String, UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::Empty);
    }
    if url.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong);
    }

    let parsed = Url::parse(url).map_err(|e| UrlValidationError::Malformed(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::Scheme(scheme.to_string())),
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed.to_string()),
        _ => Err(UrlValidationError::MissingHost),
    }
}
