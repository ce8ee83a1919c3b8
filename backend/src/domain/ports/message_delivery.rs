//! Driven port for live delivery to connected recipients.

use crate::domain::{ChatMessage, SubjectId};

/// Best-effort push of a message to a recipient's open connections.
///
/// Implementations must not block: delivery is a one-shot enqueue evaluated
/// at send time, with no queueing for offline recipients.
#[cfg_attr(test, mockall::automock)]
pub trait MessageDelivery: Send + Sync {
    /// Push `message` to every connection bound to `recipient`.
    ///
    /// Returns how many connections accepted the message; zero means the
    /// recipient is offline.
    fn deliver(&self, recipient: &SubjectId, message: &ChatMessage) -> usize;
}
