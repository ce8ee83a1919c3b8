//! Wire-level frame definitions for the WebSocket adapter.
//!
//! Frames are JSON text messages tagged by `type`. Clients open with
//! `connect`, then exchange `send` frames; the server answers with
//! `connected`, `sent`, `message` and non-fatal `error` frames.

use serde::{Deserialize, Serialize};

use crate::domain::{AuthenticatedIdentity, ChatMessage, Error, ErrorCode};

/// Frames accepted from clients.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientFrame {
    /// Authenticate the connection; only valid as the first frame.
    Connect {
        #[serde(default)]
        authorization: Option<String>,
    },
    /// Direct message to another user.
    Send(SendRequest),
}

/// Payload of a `send` frame.
///
/// `senderId` and `senderUsername` are tolerated for older clients but never
/// trusted; the bound identity is used instead.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub recipient_id: String,
    pub content: String,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub sender_username: Option<String>,
}

/// Frames emitted to clients.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerFrame {
    /// Authentication succeeded.
    #[serde(rename_all = "camelCase")]
    Connected { subject_id: String, username: String },
    /// Acknowledges a stored message to its sender.
    Sent { message: ChatMessage },
    /// Inbound direct message for the bound user.
    Message { message: ChatMessage },
    /// Non-fatal failure of a single frame.
    Error { code: ErrorCode, message: String },
}

impl From<&AuthenticatedIdentity> for ServerFrame {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self::Connected {
            subject_id: identity.subject_id().as_ref().to_owned(),
            username: identity.username().as_ref().to_owned(),
        }
    }
}

impl From<&Error> for ServerFrame {
    fn from(error: &Error) -> Self {
        let message = if matches!(error.code(), ErrorCode::InternalError) {
            "Internal server error".to_owned()
        } else {
            error.message().to_owned()
        };
        Self::Error {
            code: error.code(),
            message,
        }
    }
}
