//! Stateless HTTP request builder and response parser for the Copyleaks API.
//!
//! # Design
//! `CopyleaksClient` holds only its `ClientConfig` and carries no mutable
//! state between calls. Each verb is split into a `build_*` method that
//! produces an `HttpRequest` and a shared `parse_response` that consumes an
//! `HttpResponse`. The round trip in between belongs to a
//! [`crate::Transport`], which keeps every header and body rule here
//! deterministic and testable without a network.

use std::path::Path;

use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::headers::compose;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart;
use crate::options::RequestOptions;
use crate::validate::validate_response;

/// Version prefix every API path lives under.
pub const API_VERSION: &str = "v1";

/// Synchronous, stateless request builder for the Copyleaks API.
#[derive(Debug, Clone)]
pub struct CopyleaksClient {
    config: ClientConfig,
}

impl CopyleaksClient {
    pub fn new(mut config: ClientConfig) -> Self {
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for a path relative to the versioned API root.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{API_VERSION}/{}",
            self.config.base_url,
            path.trim_start_matches('/')
        )
    }

    /// GET never registers callbacks.
    pub fn build_get(&self, path: &str, options: &RequestOptions) -> Result<HttpRequest> {
        self.build(HttpMethod::Get, path, &without_callbacks(options), None)
    }

    /// DELETE never registers callbacks.
    pub fn build_delete(&self, path: &str, options: &RequestOptions) -> Result<HttpRequest> {
        self.build(HttpMethod::Delete, path, &without_callbacks(options), None)
    }

    /// POST with a pre-serialized body, typically JSON text.
    pub fn build_post(
        &self,
        path: &str,
        body: impl Into<Vec<u8>>,
        options: &RequestOptions,
    ) -> Result<HttpRequest> {
        self.build(HttpMethod::Post, path, options, Some(body.into()))
    }

    /// POST a file as `multipart/form-data` under a fresh boundary.
    ///
    /// The file is read before any header is composed, so an unreadable file
    /// fails with `Error::Io` even when the options would not validate.
    pub fn build_post_file(
        &self,
        path: &str,
        file_path: &Path,
        options: &RequestOptions,
    ) -> Result<HttpRequest> {
        let boundary = multipart::new_boundary();
        let body = multipart::encode(file_path, &boundary)?;
        let options = RequestOptions {
            boundary: Some(boundary),
            allow_partial_scan: Some(
                options
                    .allow_partial_scan
                    .unwrap_or(self.config.allow_partial_scan),
            ),
            ..options.clone()
        };
        self.build(HttpMethod::Post, path, &options, Some(body))
    }

    /// Checks the status, then decodes the body as JSON.
    ///
    /// A 204 has no body by definition and decodes to `Value::Null`; any
    /// other success must carry valid JSON.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value> {
        validate_response(&response)?;
        if response.status == 204 {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&response.body).map_err(|e| Error::Protocol(e.to_string()))
    }

    fn build(
        &self,
        method: HttpMethod,
        path: &str,
        options: &RequestOptions,
        body: Option<Vec<u8>>,
    ) -> Result<HttpRequest> {
        let headers = compose(options, &self.config)?;
        Ok(HttpRequest {
            method,
            url: self.api_url(path),
            headers,
            body,
        })
    }
}

fn without_callbacks(options: &RequestOptions) -> RequestOptions {
    RequestOptions {
        no_callbacks: true,
        ..options.clone()
    }
}
