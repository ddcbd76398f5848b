//! Executing `HttpRequest` values over the network.
//!
//! # Design
//! `Transport` is the only place I/O happens. The default implementation
//! wraps a `ureq::Agent`, whose connection pool is shared by clones and is
//! safe to use from several threads at once. Status codes are returned as
//! data rather than errors so the client decides what a 4xx/5xx means.
//! Bodies are read whole, up to `ClientConfig::max_response_bytes`.

use std::sync::Arc;

use ureq::tls::TlsConfig;
use ureq::{Agent, RequestBuilder};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::headers::HeaderSet;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round trip.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by a pooled `ureq::Agent`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    max_response_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        if config.accept_invalid_certs {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification is disabled"
            );
        }
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .tls_config(
                TlsConfig::builder()
                    .disable_verification(config.accept_invalid_certs)
                    .build(),
            )
            .build()
            .new_agent();
        Self {
            agent,
            max_response_bytes: config.max_response_bytes,
        }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let sent = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), &request.headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), &request.headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), &request.headers).send(body)
            }
            (HttpMethod::Post, None) => {
                with_headers(self.agent.post(url), &request.headers).send_empty()
            }
        };
        let mut response = sent.map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_response_bytes)
            .read_to_vec()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &HeaderSet) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
