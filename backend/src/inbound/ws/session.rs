//! Per-connection WebSocket handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge while deferring
//! authentication and message routing to the injected domain ports. A
//! connection starts unauthenticated; its first frame must be `connect` with a
//! valid bearer credential, after which it is bound to that identity for its
//! lifetime. A connection still unbound one client timeout after the upgrade
//! is closed with a policy violation, whatever else it sends. The public
//! contract pings every 5s and considers a connection idle after 10s without
//! client traffic. Tests shorten these intervals.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time;
use tracing::{debug, info, warn};

use crate::domain::{
    AuthenticatedIdentity, BearerCredential, ChatMessage, Error, ErrorCode, MessageContent,
    SubjectId, TraceId,
};
use crate::inbound::ws::messages::{ClientFrame, SendRequest, ServerFrame};
use crate::inbound::ws::registry::Registration;
use crate::inbound::ws::state::WsState;

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(state: WsState, session: Session, stream: MessageStream) {
    WsSession::new(state).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    PolicyViolation(&'static str),
    AuthenticationUnavailable,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

/// Live-delivery queue of an authenticated connection.
struct Binding {
    receiver: UnboundedReceiver<ChatMessage>,
    _registration: Registration,
}

struct WsSession {
    state: WsState,
    identity: Option<AuthenticatedIdentity>,
    opened_at: Instant,
}

/// Next message queued for this connection; pending until it is bound.
async fn next_delivery(outbound: &mut Option<Binding>) -> Option<ChatMessage> {
    match outbound {
        Some(binding) => binding.receiver.recv().await,
        None => std::future::pending().await,
    }
}

impl WsSession {
    fn new(state: WsState) -> Self {
        Self {
            state,
            identity: None,
            opened_at: Instant::now(),
        }
    }

    async fn run(mut self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);
        let mut outbound: Option<Binding> = None;

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(
                        &mut session,
                        &mut last_heartbeat,
                        &mut outbound,
                        message,
                    )
                    .await
                }
                Some(message) = next_delivery(&mut outbound) => {
                    self.send_json(&mut session, &ServerFrame::Message { message })
                        .await
                        .map_err(SessionError::Network)
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                let close_action = self.close_action_for(&error);
                self.close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        let now = Instant::now();
        if self.identity.is_none() && now.duration_since(self.opened_at) > CLIENT_TIMEOUT {
            return Err(SessionError::PolicyViolation("authentication timeout"));
        }
        if now.duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        outbound: &mut Option<Binding>,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => {
                self.handle_message(session, last_heartbeat, outbound, message)
                    .await
            }
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &mut self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        outbound: &mut Option<Binding>,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                TraceId::scope(
                    TraceId::generate(),
                    self.handle_text_message(session, outbound, text.as_ref()),
                )
                .await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &mut self,
        session: &mut Session,
        outbound: &mut Option<Binding>,
        text: &str,
    ) -> Result<(), SessionError> {
        let frame = serde_json::from_str::<ClientFrame>(text).map_err(|error| {
            warn!(error = %error, "Rejected malformed WebSocket payload");
            SessionError::PolicyViolation("invalid payload")
        })?;

        match (frame, self.identity.clone()) {
            (ClientFrame::Connect { authorization }, None) => {
                self.connect(session, outbound, authorization.as_deref())
                    .await
            }
            (ClientFrame::Connect { .. }, Some(_)) => {
                Err(SessionError::PolicyViolation("already authenticated"))
            }
            (ClientFrame::Send(_), None) => {
                Err(SessionError::PolicyViolation("authentication required"))
            }
            (ClientFrame::Send(request), Some(identity)) => {
                self.send(session, &identity, request).await
            }
        }
    }

    async fn connect(
        &mut self,
        session: &mut Session,
        outbound: &mut Option<Binding>,
        authorization: Option<&str>,
    ) -> Result<(), SessionError> {
        let credential = BearerCredential::parse(authorization).map_err(|error| {
            warn!(error = %error, "Rejected WebSocket credential");
            SessionError::PolicyViolation("authentication failed")
        })?;

        let identity = match self.state.authenticator.authenticate(&credential).await {
            Ok(identity) => identity,
            Err(error) if error.code() == ErrorCode::Unauthorized => {
                warn!(error = %error, "WebSocket authentication rejected");
                return Err(SessionError::PolicyViolation("authentication failed"));
            }
            Err(error) => {
                warn!(error = %error, "WebSocket authentication could not complete");
                return Err(SessionError::AuthenticationUnavailable);
            }
        };

        let (registration, receiver) = self
            .state
            .registry
            .register(identity.subject_id().clone());
        *outbound = Some(Binding {
            receiver,
            _registration: registration,
        });
        info!(subject = %identity.subject_id(), "WebSocket connection bound");

        let frame = ServerFrame::from(&identity);
        self.identity = Some(identity);
        self.send_json(session, &frame)
            .await
            .map_err(SessionError::Network)
    }

    async fn send(
        &self,
        session: &mut Session,
        identity: &AuthenticatedIdentity,
        request: SendRequest,
    ) -> Result<(), SessionError> {
        if request.sender_id.is_some() || request.sender_username.is_some() {
            warn!(
                subject = %identity.subject_id(),
                "Ignoring self-asserted sender fields on send frame"
            );
        }

        let frame = match self.route(identity, request).await {
            Ok(message) => ServerFrame::Sent { message },
            Err(error) => {
                debug!(code = error.code().as_str(), "Send frame failed");
                ServerFrame::from(&error)
            }
        };
        self.send_json(session, &frame)
            .await
            .map_err(SessionError::Network)
    }

    async fn route(
        &self,
        identity: &AuthenticatedIdentity,
        request: SendRequest,
    ) -> Result<ChatMessage, Error> {
        let recipient = SubjectId::new(request.recipient_id).map_err(|error| {
            Error::invalid_request(error.to_string())
                .with_details(serde_json::json!({ "field": "recipientId" }))
        })?;
        let content = MessageContent::new(request.content).map_err(|error| {
            Error::invalid_request(error.to_string())
                .with_details(serde_json::json!({ "field": "content" }))
        })?;
        let receipt = self
            .state
            .messaging
            .send_direct_message(identity, &recipient, content)
            .await?;
        Ok(receipt.message)
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        session: &mut Session,
        payload: &T,
    ) -> Result<(), Closed> {
        match serde_json::to_string(payload) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                warn!(error = %error, "Failed to serialize WebSocket payload");
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::PolicyViolation(reason) => {
                warn!(reason = *reason, "Closing WebSocket on policy violation");
            }
            SessionError::AuthenticationUnavailable
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::PolicyViolation(reason) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some((*reason).to_owned()),
            })),
            SessionError::AuthenticationUnavailable => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Error,
                description: Some("authentication unavailable".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
