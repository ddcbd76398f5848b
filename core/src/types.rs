//! Payloads exchanged with the v1 API.
//!
//! Field names follow the service's PascalCase wire format; the Rust side
//! uses snake_case through `serde` renames.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The API family a scan is billed under. Each maps to a path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Businesses,
    Education,
    Websites,
}

impl Product {
    pub fn as_path(&self) -> &'static str {
        match self {
            Product::Businesses => "businesses",
            Product::Education => "education",
            Product::Websites => "websites",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Body of `account/login-api`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    pub email: String,
    pub api_key: String,
}

/// Bearer token issued by `account/login-api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(rename = ".issued")]
    pub issued: String,
    #[serde(rename = ".expires")]
    pub expires: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreditBalance {
    pub amount: u64,
}

/// Body of `<product>/create-by-url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateByUrl {
    pub url: String,
}

/// A scan process as reported by create and list calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessInfo {
    pub process_id: String,
    #[serde(rename = "CreationTimeUTC", default)]
    pub creation_time_utc: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProcessStatus {
    pub status: String,
    pub progress_percents: u8,
}
