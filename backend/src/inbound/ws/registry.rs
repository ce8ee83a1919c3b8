//! In-process registry of authenticated WebSocket connections.
//!
//! Each bound connection owns an unbounded queue; delivery is a non-blocking
//! enqueue onto every queue registered for the recipient. Queues whose
//! session has gone away are pruned during delivery.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

use crate::domain::ports::MessageDelivery;
use crate::domain::{ChatMessage, SubjectId};

type Connections = HashMap<SubjectId, Vec<(u64, UnboundedSender<ChatMessage>)>>;

/// Subject → live connection queues.
#[derive(Default)]
pub struct ConnectionRegistry {
    next_id: AtomicU64,
    connections: Mutex<Connections>,
}

/// Keeps a connection registered until dropped.
pub struct Registration {
    registry: Arc<ConnectionRegistry>,
    subject: SubjectId,
    id: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.registry.unregister(&self.subject, self.id);
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Connections> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind a new connection to `subject`.
    ///
    /// The receiver yields every message delivered to the subject until the
    /// returned [`Registration`] is dropped.
    pub fn register(
        self: &Arc<Self>,
        subject: SubjectId,
    ) -> (Registration, UnboundedReceiver<ChatMessage>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = unbounded_channel();
        self.lock()
            .entry(subject.clone())
            .or_default()
            .push((id, sender));
        debug!(subject = %subject, connection = id, "connection registered");
        let registration = Registration {
            registry: Arc::clone(self),
            subject,
            id,
        };
        (registration, receiver)
    }

    fn unregister(&self, subject: &SubjectId, id: u64) {
        let mut connections = self.lock();
        if let Some(queues) = connections.get_mut(subject) {
            queues.retain(|(queue_id, _)| *queue_id != id);
            if queues.is_empty() {
                connections.remove(subject);
            }
        }
        debug!(subject = %subject, connection = id, "connection unregistered");
    }

    /// Number of live connections bound to `subject`.
    pub fn connection_count(&self, subject: &SubjectId) -> usize {
        self.lock().get(subject).map_or(0, Vec::len)
    }
}

impl MessageDelivery for ConnectionRegistry {
    fn deliver(&self, recipient: &SubjectId, message: &ChatMessage) -> usize {
        let mut connections = self.lock();
        let Some(queues) = connections.get_mut(recipient) else {
            return 0;
        };
        queues.retain(|(_, sender)| sender.send(message.clone()).is_ok());
        let delivered = queues.len();
        if queues.is_empty() {
            connections.remove(recipient);
        }
        delivered
    }
}
