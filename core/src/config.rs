//! Client-wide configuration.
//!
//! # Design
//! `ClientConfig` is a plain value handed to `CopyleaksClient` at
//! construction and never mutated afterwards. Per-call `RequestOptions`
//! layer on top of it. The struct derives `Deserialize` with field defaults
//! so an embedding application can load it from whatever format it already
//! uses; this crate reads no files or environment on its own.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.copyleaks.com";

/// Largest response body read before the transport gives up, 64 MiB.
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// Settings shared by every request a client sends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and host the `/v1/...` paths are joined to.
    pub base_url: String,
    /// Route requests to the non-billing sandbox.
    pub sandbox_mode: bool,
    /// Allow partial scans unless a call says otherwise.
    pub allow_partial_scan: bool,
    /// Default webhook for completion notifications.
    pub http_callback: Option<String>,
    /// Default address for completion notifications.
    pub email_callback: Option<String>,
    /// Custom fields attached to every request that does not opt out.
    pub custom_fields: BTreeMap<String, String>,
    /// Skip TLS peer verification. Only for test hosts with self-signed
    /// certificates.
    pub accept_invalid_certs: bool,
    /// Response bodies longer than this fail with `Error::Transport`.
    pub max_response_bytes: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            sandbox_mode: false,
            allow_partial_scan: false,
            http_callback: None,
            email_callback: None,
            custom_fields: BTreeMap::new(),
            accept_invalid_certs: false,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_sandbox_mode(mut self, enabled: bool) -> Self {
        self.sandbox_mode = enabled;
        self
    }

    pub fn with_allow_partial_scan(mut self, enabled: bool) -> Self {
        self.allow_partial_scan = enabled;
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

    pub fn with_custom_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_fields.insert(key.into(), value.into());
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn with_max_response_bytes(mut self, limit: u64) -> Self {
        self.max_response_bytes = limit;
        self
    }
}
