//! Response construction.
//!
//! # Design Decisions
//! - A variant is written exactly as defined: its status, its headers, its
//!   body as JSON. Nothing is added (no content type, no request ID)
//! - Misses are 404 with an empty body
//! - Control failures are 400 with a plain-text reason

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::definitions::Variant;

/// Build the response for a variant.
pub fn variant_response(variant: &Variant) -> Response {
    let mut response = Response::new(Body::from(variant.body_bytes()));
    *response.status_mut() = variant.status();
    *response.headers_mut() = variant.header_map().clone();
    response
}

/// 404 with an empty body.
pub fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

/// 400 carrying a short reason.
pub fn bad_request(reason: String) -> Response {
    (StatusCode::BAD_REQUEST, reason).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_variant_response_is_verbatim() {
        let headers = BTreeMap::from([("Header-One".to_string(), "Value 1".to_string())]);
        let body = serde_json::json!({ "a": 1, "b": 2, "c": 3 });
        let variant = Variant::build(201, headers, body.clone()).unwrap();

        let response = variant_response(&variant);
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().len(), 1);
        assert_eq!(response.headers()["header-one"], "Value 1");

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, body);
    }

    #[tokio::test]
    async fn test_not_found_is_empty() {
        let response = not_found();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(bytes.is_empty());
    }
}
