//! Header composition.
//!
//! # Design
//! The header set for a request is the union of independent contributions:
//! callbacks, authentication, sandbox flag, content type, partial scan,
//! custom fields and user agent. Each contribution is a pure function of
//! `(RequestOptions, ClientConfig)` listed in `HEADER_STEPS` and the results
//! are folded left to right. Steps own disjoint header names, so the order of
//! the fold never changes the outcome. Validation failures short-circuit the
//! fold, which means no request is ever built with a malformed callback or
//! custom field.

use std::collections::btree_map;
use std::collections::BTreeMap;

use crate::config::ClientConfig;
use crate::error::ValidationError;
use crate::options::RequestOptions;
use crate::validate::{validate_custom_fields, validate_email, validate_url};

pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const USER_AGENT: &str = "User-Agent";
pub const SANDBOX_MODE: &str = "copyleaks-sandbox-mode";
pub const ALLOW_PARTIAL_SCAN: &str = "copyleaks-allow-partial-scan";
pub const HTTP_CALLBACK: &str = "copyleaks-http-callback";
pub const EMAIL_CALLBACK: &str = "copyleaks-email-callback";
pub const CUSTOM_FIELD_PREFIX: &str = "copyleaks-client-custom-";

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Identity sent in `User-Agent` on every request.
pub const SDK_USER_AGENT: &str = concat!("copyleaks-rust-sdk/", env!("CARGO_PKG_VERSION"));

/// Header name → value, sorted by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet(BTreeMap<String, String>);

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut set = Self::new();
        set.0.insert(name.into(), value.into());
        set
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Adds every header of `other`. Names must not overlap: debug builds
    /// panic on a repeat, release builds keep the first value.
    pub fn merge(&mut self, other: HeaderSet) {
        for (name, value) in other.0 {
            debug_assert!(!self.0.contains_key(&name), "header {name} produced twice");
            self.0.entry(name).or_insert(value);
        }
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a HeaderSet {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One independent contribution to the header set.
pub type HeaderStep = fn(&RequestOptions, &ClientConfig) -> Result<HeaderSet, ValidationError>;

/// Every contribution, in fold order.
pub const HEADER_STEPS: [HeaderStep; 8] = [
    http_callback,
    email_callback,
    authorization,
    sandbox_mode,
    content_type,
    allow_partial_scan,
    custom_fields,
    user_agent,
];

/// Builds the full header set for one request.
pub fn compose(options: &RequestOptions, config: &ClientConfig) -> Result<HeaderSet, ValidationError> {
    HEADER_STEPS
        .iter()
        .try_fold(HeaderSet::new(), |mut headers, step| {
            headers.merge(step(options, config)?);
            Ok::<_, ValidationError>(headers)
        })
}

pub fn http_callback(options: &RequestOptions, config: &ClientConfig) -> Result<HeaderSet, ValidationError> {
    if options.no_http_callback || options.no_callbacks {
        return Ok(HeaderSet::new());
    }
    match options.http_callback.as_ref().or(config.http_callback.as_ref()) {
        Some(url) => {
            validate_url(url)?;
            Ok(HeaderSet::single(HTTP_CALLBACK, url.as_str()))
        }
        None => Ok(HeaderSet::new()),
    }
}

pub fn email_callback(options: &RequestOptions, config: &ClientConfig) -> Result<HeaderSet, ValidationError> {
    if options.no_email_callback || options.no_callbacks {
        return Ok(HeaderSet::new());
    }
    match options.email_callback.as_ref().or(config.email_callback.as_ref()) {
        Some(email) => {
            validate_email(email)?;
            Ok(HeaderSet::single(EMAIL_CALLBACK, email.as_str()))
        }
        None => Ok(HeaderSet::new()),
    }
}

pub fn authorization(options: &RequestOptions, _config: &ClientConfig) -> Result<HeaderSet, ValidationError> {
    Ok(match &options.token {
        Some(token) => HeaderSet::single(AUTHORIZATION, format!("Bearer {token}")),
        None => HeaderSet::new(),
    })
}

pub fn sandbox_mode(_options: &RequestOptions, config: &ClientConfig) -> Result<HeaderSet, ValidationError> {
    Ok(if config.sandbox_mode {
        HeaderSet::single(SANDBOX_MODE, "")
    } else {
        HeaderSet::new()
    })
}

pub fn content_type(options: &RequestOptions, _config: &ClientConfig) -> Result<HeaderSet, ValidationError> {
    let value = match &options.boundary {
        Some(boundary) => format!("multipart/form-data; boundary=\"{boundary}\""),
        None => JSON_CONTENT_TYPE.to_string(),
    };
    Ok(HeaderSet::single(CONTENT_TYPE, value))
}

pub fn allow_partial_scan(options: &RequestOptions, config: &ClientConfig) -> Result<HeaderSet, ValidationError> {
    let allowed = options.allow_partial_scan.unwrap_or(config.allow_partial_scan);
    Ok(if allowed {
        HeaderSet::single(ALLOW_PARTIAL_SCAN, "")
    } else {
        HeaderSet::new()
    })
}

pub fn custom_fields(options: &RequestOptions, config: &ClientConfig) -> Result<HeaderSet, ValidationError> {
    if options.no_custom_fields {
        return Ok(HeaderSet::new());
    }
    let mut merged = config.custom_fields.clone();
    merged.extend(options.custom_fields.clone());
    validate_custom_fields(&merged)?;
    Ok(HeaderSet(
        merged
            .into_iter()
            .map(|(key, value)| (format!("{CUSTOM_FIELD_PREFIX}{key}"), value))
            .collect(),
    ))
}

pub fn user_agent(_options: &RequestOptions, _config: &ClientConfig) -> Result<HeaderSet, ValidationError> {
    Ok(HeaderSet::single(USER_AGENT, SDK_USER_AGENT))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ClientConfig {
        ClientConfig::new("http://localhost:3000")
    }

    #[test]
    fn bare_request_gets_json_and_user_agent_only() {
        let headers = compose(&RequestOptions::new(), &config()).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get(CONTENT_TYPE), Some(JSON_CONTENT_TYPE));
        assert_eq!(headers.get(USER_AGENT), Some(SDK_USER_AGENT));
    }

    #[test]
    fn boundary_switches_content_type_to_multipart() {
        let options = RequestOptions {
            boundary: Some("B1".to_string()),
            ..RequestOptions::default()
        };
        let headers = compose(&options, &config()).unwrap();
        assert_eq!(
            headers.get(CONTENT_TYPE),
            Some("multipart/form-data; boundary=\"B1\"")
        );
        assert_eq!(headers.names().filter(|n| *n == CONTENT_TYPE).count(), 1);
    }

    #[test]
    fn token_becomes_bearer_authorization() {
        let headers = compose(&RequestOptions::new().with_token("abc"), &config()).unwrap();
        assert_eq!(headers.get(AUTHORIZATION), Some("Bearer abc"));
    }

    #[test]
    fn sandbox_flag_has_empty_value() {
        let headers = compose(&RequestOptions::new(), &config().with_sandbox_mode(true)).unwrap();
        assert_eq!(headers.get(SANDBOX_MODE), Some(""));
    }

    #[test]
    fn configured_http_callback_is_used_without_override() {
        let config = config().with_http_callback("https://cb.example");
        let headers = compose(&RequestOptions::new(), &config).unwrap();
        assert_eq!(headers.get(HTTP_CALLBACK), Some("https://cb.example"));
    }

    #[test]
    fn per_call_http_callback_overrides_config() {
        let config = config().with_http_callback("https://cb.example");
        let options = RequestOptions::new().with_http_callback("https://other.example/hook");
        let headers = compose(&options, &config).unwrap();
        assert_eq!(headers.get(HTTP_CALLBACK), Some("https://other.example/hook"));
    }

    #[test]
    fn malformed_http_callback_fails() {
        let options = RequestOptions::new().with_http_callback("not-a-url");
        let err = compose(&options, &config()).unwrap_err();
        assert_eq!(err, ValidationError::InvalidUrl("not-a-url".to_string()));
    }

    #[test]
    fn http_callback_with_line_break_never_becomes_a_header() {
        let options = RequestOptions::new().with_http_callback("https://cb.example/\r\nX-Evil: 1");
        let err = compose(&options, &config()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidUrl(_)));
    }

    #[test]
    fn malformed_configured_email_fails() {
        let config = config().with_email_callback("nobody");
        let err = compose(&RequestOptions::new(), &config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidEmail(_)));
    }

    #[test]
    fn suppressed_callbacks_skip_validation() {
        let config = config()
            .with_http_callback("not-a-url")
            .with_email_callback("nobody");
        let headers = compose(&RequestOptions::new().without_callbacks(), &config).unwrap();
        assert!(!headers.contains(HTTP_CALLBACK));
        assert!(!headers.contains(EMAIL_CALLBACK));
    }

    #[test]
    fn no_callbacks_wins_over_per_call_values() {
        let options = RequestOptions::new()
            .with_http_callback("https://cb.example")
            .with_email_callback("someone@example.com")
            .without_callbacks();
        let headers = compose(&options, &config()).unwrap();
        assert!(!headers.contains(HTTP_CALLBACK));
        assert!(!headers.contains(EMAIL_CALLBACK));
    }

    #[test]
    fn individual_callback_suppression() {
        let config = config()
            .with_http_callback("https://cb.example")
            .with_email_callback("someone@example.com");
        let options = RequestOptions {
            no_http_callback: true,
            ..RequestOptions::default()
        };
        let headers = compose(&options, &config).unwrap();
        assert!(!headers.contains(HTTP_CALLBACK));
        assert_eq!(headers.get(EMAIL_CALLBACK), Some("someone@example.com"));
    }

    #[test]
    fn partial_scan_resolution() {
        let off = config();
        let on = config().with_allow_partial_scan(true);

        let unset = RequestOptions::new();
        assert!(!compose(&unset, &off).unwrap().contains(ALLOW_PARTIAL_SCAN));
        assert_eq!(compose(&unset, &on).unwrap().get(ALLOW_PARTIAL_SCAN), Some(""));

        let forced = RequestOptions::new().with_allow_partial_scan(true);
        assert_eq!(compose(&forced, &off).unwrap().get(ALLOW_PARTIAL_SCAN), Some(""));

        let refused = RequestOptions::new().with_allow_partial_scan(false);
        assert!(!compose(&refused, &on).unwrap().contains(ALLOW_PARTIAL_SCAN));
    }

    #[test]
    fn custom_fields_merge_with_per_call_precedence() {
        let config = config().with_custom_field("a", "1");
        let options = RequestOptions::new()
            .with_custom_field("a", "2")
            .with_custom_field("b", "3");
        let headers = compose(&options, &config).unwrap();
        assert_eq!(headers.get("copyleaks-client-custom-a"), Some("2"));
        assert_eq!(headers.get("copyleaks-client-custom-b"), Some("3"));
    }

    #[test]
    fn no_custom_fields_suppresses_and_skips_validation() {
        let config = config().with_custom_field("bad key", "1");
        let headers = compose(&RequestOptions::new().without_custom_fields(), &config).unwrap();
        assert!(!headers.names().any(|n| n.starts_with(CUSTOM_FIELD_PREFIX)));
    }

    #[test]
    fn invalid_merged_custom_fields_fail() {
        let options = RequestOptions::new().with_custom_field("a", "line\nbreak");
        let err = compose(&options, &config()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCustomFields(_)));
    }

    #[test]
    fn steps_produce_disjoint_headers() {
        let config = config()
            .with_sandbox_mode(true)
            .with_allow_partial_scan(true)
            .with_http_callback("https://cb.example")
            .with_email_callback("someone@example.com")
            .with_custom_field("a", "1");
        let options = RequestOptions {
            token: Some("t".to_string()),
            boundary: Some("B".to_string()),
            ..RequestOptions::default()
        };

        let separate: usize = HEADER_STEPS
            .iter()
            .map(|step| step(&options, &config).unwrap().len())
            .sum();
        let composed = compose(&options, &config).unwrap();
        assert_eq!(composed.len(), separate);
        assert_eq!(composed.len(), 8);
    }
}
