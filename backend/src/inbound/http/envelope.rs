//! Success envelope shared by every REST endpoint.
//!
//! ```text
//! {"success": true, "data": <payload>, "message": "Card listed for sale successfully."}
//! ```
//!
//! Failures use the same outer shape; see [`super::error`].

use actix_web::web;
use serde::Serialize;

/// Wrapper for successful responses.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T> {
    success: bool,
    data: T,
    message: String,
}

impl<T: Serialize> ApiEnvelope<T> {
    /// Wrap `data` with a human-readable confirmation.
    pub fn ok(data: T, message: impl Into<String>) -> web::Json<Self> {
        web::Json(Self {
            success: true,
            data,
            message: message.into(),
        })
    }

    /// Payload carried by the envelope.
    pub fn data(&self) -> &T {
        &self.data
    }
}
