//! Response DTOs.

use serde::{Deserialize, Serialize};

/// A list together with its length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T: Serialize> {
    pub results: usize,
    pub records: Vec<T>,
}

impl<T: Serialize> ListResponse<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            results: records.len(),
            records,
        }
    }
}

/// Acknowledgement without a payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub status: String,
    pub message: String,
}

impl MessageResponse {
    /// A `"success"` acknowledgement.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: String,
    pub version: String,
    /// Active storage backend.
    pub backend: String,
    pub database: String,
}
