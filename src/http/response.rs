//! Completed exchange result and typed decoding

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::error::{NetError, Result};

/// Result of a completed HTTP exchange. Owned by the caller; the dispatcher
/// performs no further mutation after returning it.
#[derive(Debug, Clone)]
pub struct NetworkResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Raw body bytes; `None` when the transport delivered no bytes
    pub body: Option<Vec<u8>>,
}

impl NetworkResponse {
    /// Decode the body into a typed value.
    ///
    /// A missing body, malformed payload, or schema mismatch all yield
    /// `DecodingFailed`; a partially populated value is never returned.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        let body = self
            .body
            .as_deref()
            .ok_or_else(|| NetError::DecodingFailed("response body is empty".to_string()))?;
        serde_json::from_slice(body).map_err(|e| NetError::DecodingFailed(e.to_string()))
    }
}
