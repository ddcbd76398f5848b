//! Request dispatch: build, send, validate, decode.
//!
//! `Dispatcher` pairs the stateless `CopyleaksClient` with a `Transport`.
//! Each entry point performs exactly one round trip and either returns the
//! decoded JSON body or the first error encountered; nothing is retried.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::client::CopyleaksClient;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::HttpRequest;
use crate::options::RequestOptions;
use crate::transport::{Transport, UreqTransport};

pub struct Dispatcher<T = UreqTransport> {
    client: CopyleaksClient,
    transport: T,
}

impl Dispatcher<UreqTransport> {
    /// Dispatcher over a pooled HTTPS agent configured from `config`.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Dispatcher<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: CopyleaksClient::new(config),
            transport,
        }
    }

    pub fn client(&self) -> &CopyleaksClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, path: &str, options: &RequestOptions) -> Result<Value> {
        self.send(self.client.build_get(path, options)?)
    }

    pub fn delete(&self, path: &str, options: &RequestOptions) -> Result<Value> {
        self.send(self.client.build_delete(path, options)?)
    }

    pub fn post(&self, path: &str, body: impl Into<Vec<u8>>, options: &RequestOptions) -> Result<Value> {
        self.send(self.client.build_post(path, body, options)?)
    }

    /// Serializes `body` to JSON, then behaves like [`Dispatcher::post`].
    pub fn post_json<B: Serialize>(&self, path: &str, body: &B, options: &RequestOptions) -> Result<Value> {
        let body = serde_json::to_vec(body).map_err(|e| Error::Serialization(e.to_string()))?;
        self.post(path, body, options)
    }

    pub fn post_file(&self, path: &str, file_path: impl AsRef<Path>, options: &RequestOptions) -> Result<Value> {
        self.send(self.client.build_post_file(path, file_path.as_ref(), options)?)
    }

    fn send(&self, request: HttpRequest) -> Result<Value> {
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            headers = ?request.headers.names().collect::<Vec<_>>(),
            body_len = request.body.as_ref().map_or(0, Vec::len),
            "dispatching request"
        );
        let response = self.transport.execute(&request)?;
        let status = response.status;
        self.client.parse_response(response).inspect_err(|err| {
            tracing::warn!(method = %request.method, url = %request.url, status, error = %err, "request failed");
        })
    }
}
