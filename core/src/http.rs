//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data.
//! `CopyleaksClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network; a [`crate::Transport`] executes the
//! round trip in between. Keeping the two halves apart lets every header and
//! body rule be tested without a socket.
//!
//! Bodies are raw bytes because multipart uploads carry arbitrary file
//! content.

use std::fmt;

use crate::headers::HeaderSet;

/// HTTP method for a request. The API only uses these three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by `CopyleaksClient::build_*`. `url` is absolute
/// (`<base_url>/v1/<path>`).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HeaderSet,
    pub body: Option<Vec<u8>>,
}

/// An HTTP response described as plain data.
///
/// Produced by a transport, then handed to `CopyleaksClient::parse_response`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
