//! Typed helpers for the v1 endpoints.
//!
//! Thin wrappers over the `Dispatcher` verbs: each picks the path, attaches
//! the token and decodes the JSON into a typed payload. A body that decodes
//! as JSON but not as the expected shape is a protocol violation.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::dispatcher::Dispatcher;
use crate::error::{Error, Result};
use crate::options::RequestOptions;
use crate::transport::Transport;
use crate::types::{
    AccessToken, CreateByUrl, CreditBalance, LoginRequest, ProcessInfo, ProcessStatus, Product,
};
use crate::validate::{validate_process_id, validate_url};

impl<T: Transport> Dispatcher<T> {
    /// Exchanges account credentials for a bearer token. Sent without
    /// authentication or callbacks.
    pub fn login(&self, email: &str, api_key: &str) -> Result<AccessToken> {
        let body = LoginRequest {
            email: email.to_string(),
            api_key: api_key.to_string(),
        };
        let options = RequestOptions::new().without_callbacks().without_custom_fields();
        decode(self.post_json("account/login-api", &body, &options)?)
    }

    pub fn count_credits(&self, product: Product, token: &str) -> Result<CreditBalance> {
        let path = format!("{product}/count-credits");
        decode(self.get(&path, &RequestOptions::new().with_token(token))?)
    }

    /// Submits a web page for scanning. `options` must carry the token.
    pub fn create_by_url(&self, product: Product, url: &str, options: &RequestOptions) -> Result<ProcessInfo> {
        validate_url(url)?;
        let body = CreateByUrl { url: url.to_string() };
        decode(self.post_json(&format!("{product}/create-by-url"), &body, options)?)
    }

    /// Uploads a local file for scanning. `options` must carry the token.
    pub fn create_by_file(
        &self,
        product: Product,
        file_path: impl AsRef<Path>,
        options: &RequestOptions,
    ) -> Result<ProcessInfo> {
        decode(self.post_file(&format!("{product}/create-by-file"), file_path, options)?)
    }

    pub fn status(&self, product: Product, process_id: &str, token: &str) -> Result<ProcessStatus> {
        let path = process_path(product, process_id, "status")?;
        decode(self.get(&path, &RequestOptions::new().with_token(token))?)
    }

    /// Raw scan results; their shape varies by product.
    ///
    /// Results can be large. With the default transport a body longer than
    /// `ClientConfig::max_response_bytes` fails with `Error::Transport`.
    pub fn result(&self, product: Product, process_id: &str, token: &str) -> Result<Value> {
        let path = process_path(product, process_id, "result")?;
        self.get(&path, &RequestOptions::new().with_token(token))
    }

    pub fn delete_process(&self, product: Product, process_id: &str, token: &str) -> Result<()> {
        let path = process_path(product, process_id, "delete")?;
        self.delete(&path, &RequestOptions::new().with_token(token))?;
        Ok(())
    }

    pub fn list(&self, product: Product, token: &str) -> Result<Vec<ProcessInfo>> {
        decode(self.get(&format!("{product}/list"), &RequestOptions::new().with_token(token))?)
    }
}

/// `{product}/{process_id}/{action}`, refusing ids that would escape their
/// path segment.
fn process_path(product: Product, process_id: &str, action: &str) -> Result<String> {
    validate_process_id(process_id)?;
    Ok(format!("{product}/{process_id}/{action}"))
}

fn decode<D: DeserializeOwned>(value: Value) -> Result<D> {
    serde_json::from_value(value).map_err(|e| Error::Protocol(e.to_string()))
}
