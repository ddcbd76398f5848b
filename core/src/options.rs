//! Per-call request options.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Options that shape the headers (and for uploads, the body) of one request.
///
/// Every field defaults to "not set". `Option` fields distinguish "unset,
/// fall back to `ClientConfig`" from an explicit value; the `no_*` flags
/// suppress a header family outright.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Bearer credential. Omitted for unauthenticated calls such as login.
    pub token: Option<String>,
    pub http_callback: Option<String>,
    pub no_http_callback: bool,
    pub email_callback: Option<String>,
    pub no_email_callback: bool,
    /// Suppresses both callback headers. GET and DELETE always set this.
    pub no_callbacks: bool,
    pub allow_partial_scan: Option<bool>,
    /// Merged over `ClientConfig::custom_fields`; entries here win.
    pub custom_fields: BTreeMap<String, String>,
    pub no_custom_fields: bool,
    /// Multipart boundary. Set by `build_post_file`; its presence switches
    /// the Content-Type to multipart.
    pub boundary: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_http_callback(mut self, url: impl Into<String>) -> Self {
        self.http_callback = Some(url.into());
        self
    }

    pub fn with_email_callback(mut self, email: impl Into<String>) -> Self {
        self.email_callback = Some(email.into());
        self
    }

    pub fn without_callbacks(mut self) -> Self {
        self.no_callbacks = true;
        self
    }

    pub fn with_allow_partial_scan(mut self, allow: bool) -> Self {
        self.allow_partial_scan = Some(allow);
        self
    }

    pub fn with_custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    pub fn without_custom_fields(mut self) -> Self {
        self.no_custom_fields = true;
        self
    }
}
