//! Validators for caller-supplied values and server responses.
//!
//! Each function returns `Ok(())` or a descriptive error and has no other
//! effect. The header composer calls the value validators before anything is
//! sent; the client calls `validate_response` before decoding a body.

use std::collections::BTreeMap;

use url::Url;
use validator::ValidateEmail;

use crate::error::{Error, ValidationError};
use crate::http::HttpResponse;

/// Upper bound on the summed byte length of all custom-field keys and values.
pub const MAX_CUSTOM_FIELDS_BYTES: usize = 512;

/// Accepts absolute `http`/`https` URLs with a host.
///
/// The value is sent verbatim as a header, so control characters and
/// surrounding whitespace are rejected even though URL parsing would strip
/// them.
pub fn validate_url(value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidUrl(value.to_string());
    if value.trim() != value || value.chars().any(char::is_control) {
        return Err(invalid());
    }
    let url = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(invalid());
    }
    Ok(())
}

/// Accepts a process id only if it fits in one path segment: ASCII
/// alphanumerics, `-` and `_`.
pub fn validate_process_id(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
        return Err(ValidationError::InvalidProcessId(value.to_string()));
    }
    Ok(())
}

pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || !value.validate_email() {
        return Err(ValidationError::InvalidEmail(value.to_string()));
    }
    Ok(())
}

/// Checks a merged custom-field set.
///
/// Keys become part of a header name, so they are limited to ASCII
/// alphanumerics, `-` and `_`. Values must be printable ASCII so they survive
/// as header values unchanged.
pub fn validate_custom_fields(fields: &BTreeMap<String, String>) -> Result<(), ValidationError> {
    let mut total = 0;
    for (key, value) in fields {
        if key.is_empty() {
            return Err(ValidationError::InvalidCustomFields(
                "field name must not be empty".to_string(),
            ));
        }
        if !key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
            return Err(ValidationError::InvalidCustomFields(format!(
                "field name {key:?} contains characters not allowed in a header name"
            )));
        }
        if !value.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b)) {
            return Err(ValidationError::InvalidCustomFields(format!(
                "value of {key:?} contains non-printable or non-ASCII characters"
            )));
        }
        total += key.len() + value.len();
    }
    if total > MAX_CUSTOM_FIELDS_BYTES {
        return Err(ValidationError::InvalidCustomFields(format!(
            "fields total {total} bytes, limit is {MAX_CUSTOM_FIELDS_BYTES}"
        )));
    }
    Ok(())
}

/// Rejects any non-2xx response with an `Api` error carrying status and body.
pub fn validate_response(response: &HttpResponse) -> Result<(), Error> {
    if response.is_success() {
        return Ok(());
    }
    Err(Error::Api {
        status: response.status,
        body: response.body_text(),
    })
}
