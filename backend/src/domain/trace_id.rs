//! Correlation id for one unit of work.
//!
//! An HTTP request and each WebSocket text frame run inside their own
//! [`TraceId::scope`]. Errors built inside the scope pick the id up, so the
//! `traceId` in a failure envelope matches the `trace-id` response header and
//! the log lines of the same request.
//!
//! The id lives in a Tokio task-local and is not inherited by spawned tasks;
//! wrap the spawned future in [`TraceId::scope`] to carry it over.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static ACTIVE: TraceId;
}

/// Random UUID identifying one request or frame.
///
/// # Examples
/// ```
/// use tradepost::TraceId;
///
/// let id = TraceId::generate();
/// let parsed: TraceId = id.to_string().parse().expect("round trip");
/// assert_eq!(parsed, id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random (v4) id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Id of the enclosing scope, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    ///
    /// Scopes nest; the innermost id wins until its future completes.
    ///
    /// # Examples
    /// ```
    /// use tradepost::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let frame_id = TraceId::generate();
    /// let seen = TraceId::scope(frame_id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(frame_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        ACTIVE.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
