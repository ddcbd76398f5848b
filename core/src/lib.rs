//! Client core for the Copyleaks plagiarism-detection API.
//!
//! # Overview
//! Builds authenticated JSON and multipart requests against the fixed
//! `/v1/...` API surface, sends them through a pluggable transport, and
//! validates and decodes the responses.
//!
//! # Design
//! - `CopyleaksClient` is stateless: it turns a path plus `RequestOptions`
//!   into an `HttpRequest` and an `HttpResponse` into JSON, never touching
//!   the network.
//! - Headers come from independent steps in [`headers`], each a pure function
//!   of the options and the `ClientConfig`.
//! - `Dispatcher` pairs the client with a `Transport` (by default a pooled
//!   `ureq` agent) and exposes `get`, `post`, `delete` and `post_file`, plus
//!   typed endpoint helpers.
//! - `ClientConfig` is an explicit value fixed at construction; there is no
//!   process-wide state.

pub mod api;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod headers;
pub mod http;
pub mod multipart;
pub mod options;
pub mod transport;
pub mod types;
pub mod validate;

pub use client::CopyleaksClient;
pub use config::ClientConfig;
pub use dispatcher::Dispatcher;
pub use error::{Error, Result, ValidationError};
pub use headers::{compose, HeaderSet};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use options::RequestOptions;
pub use transport::{Transport, UreqTransport};
pub use types::{AccessToken, CreditBalance, ProcessInfo, ProcessStatus, Product};
