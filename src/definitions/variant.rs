//! Response variant decoding.
//!
//! # Responsibilities
//! - Decode a variant file into a `Variant`
//! - Apply field defaults (200, no headers, `null` body)
//! - Validate status code (200-999) and header tokens once, at load time
//!
//! # Design Decisions
//! - Unknown fields are ignored so newer files still load
//! - Body bytes and the header map are built here, so serving never fails
//!   and never rewrites the stored definition

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde::Deserialize;

/// Problems found while decoding a single variant file.
#[derive(Debug, thiserror::Error)]
pub enum VariantError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid response_code {0}")]
    Status(u16),
    #[error("invalid header {name:?}")]
    Header { name: String },
}

/// On-disk shape of a variant file.
#[derive(Debug, Deserialize)]
struct VariantFile {
    #[serde(default = "default_response_code")]
    response_code: u16,

    #[serde(default)]
    headers: BTreeMap<String, String>,

    #[serde(default)]
    body: serde_json::Value,
}

fn default_response_code() -> u16 {
    200
}

/// A fully specified response for one endpoint.
#[derive(Debug, Clone)]
pub struct Variant {
    status: StatusCode,
    headers: BTreeMap<String, String>,
    header_map: HeaderMap,
    body: serde_json::Value,
    body_bytes: Bytes,
}

impl Variant {
    /// Decode a variant from the raw contents of a definition file.
    pub fn from_slice(raw: &[u8]) -> Result<Self, VariantError> {
        let file: VariantFile = serde_json::from_slice(raw)?;
        Self::build(file.response_code, file.headers, file.body)
    }

    /// Build a variant from already decoded parts.
    pub fn build(
        response_code: u16,
        headers: BTreeMap<String, String>,
        body: serde_json::Value,
    ) -> Result<Self, VariantError> {
        // 1xx cannot be sent as a final response.
        let status = StatusCode::from_u16(response_code)
            .ok()
            .filter(|s| !s.is_informational())
            .ok_or(VariantError::Status(response_code))?;

        let mut header_map = HeaderMap::with_capacity(headers.len());
        for (name, value) in &headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| VariantError::Header { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| VariantError::Header { name: name.clone() })?;
            header_map.append(header_name, header_value);
        }

        let body_bytes = Bytes::from(serde_json::to_vec(&body)?);

        Ok(Self {
            status,
            headers,
            header_map,
            body,
            body_bytes,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Headers exactly as written in the definition file.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn header_map(&self) -> &HeaderMap {
        &self.header_map
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    /// The body serialized as JSON.
    pub fn body_bytes(&self) -> Bytes {
        self.body_bytes.clone()
    }
}
