//! Request, event and outcome types for one streamed exchange.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

use crate::error::StreamError;

/// Outbound payload. Serializes as `{"message": "<text>"}`.
///
/// `text` must be non-empty; callers validate before sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRequest {
    /// The user's text.
    #[serde(rename = "message")]
    pub text: String,
}

impl StreamRequest {
    /// Create a request carrying `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Terminal result of one exchange.
#[derive(Debug)]
pub enum StreamOutcome {
    /// The response was received and decoded.
    Completed,
    /// The exchange failed; see [`StreamError`].
    Failed(StreamError),
}

impl StreamOutcome {
    /// True for [`StreamOutcome::Completed`].
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The failure reason, if any.
    pub fn error(&self) -> Option<&StreamError> {
        match self {
            Self::Completed => None,
            Self::Failed(err) => Some(err),
        }
    }
}

/// One item produced while an exchange is in flight.
///
/// A well-formed stream yields zero or more `Fragment`s followed by exactly
/// one `Done`, and nothing after it.
#[derive(Debug)]
pub enum StreamEvent {
    /// A piece of assistant text, in arrival order.
    Fragment(String),
    /// The terminal outcome.
    Done(StreamOutcome),
}

/// Handle to an in-flight exchange.
pub struct StreamHandle {
    /// The event stream. Ends after the `Done` event.
    pub receiver: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
}

impl StreamHandle {
    /// Wrap any event stream.
    pub fn new(stream: impl Stream<Item = StreamEvent> + Send + 'static) -> Self {
        Self {
            receiver: Box::pin(stream),
        }
    }

    /// A handle that yields no fragments and finishes with `outcome`.
    pub fn finished(outcome: StreamOutcome) -> Self {
        Self::new(futures::stream::once(async move { StreamEvent::Done(outcome) }))
    }

    /// Drive the stream to completion, delivering events to callbacks.
    ///
    /// `on_done` runs exactly once and nothing runs after it. Events a
    /// misbehaving stream yields after `Done` are dropped, and a stream that
    /// ends without `Done` is reported as a network failure.
    pub async fn into_callbacks<F, D>(self, mut on_fragment: F, on_done: D)
    where
        F: FnMut(String),
        D: FnOnce(StreamOutcome),
    {
        on_done(self.drive(|text| on_fragment(text)).await);
    }

    /// Deliver fragments to `on_fragment` and return the terminal outcome.
    ///
    /// Same contract as [`into_callbacks`](Self::into_callbacks), for callers
    /// that want to await the outcome instead of receiving it in a closure.
    pub async fn drive(self, mut on_fragment: impl FnMut(String)) -> StreamOutcome {
        let mut receiver = self.receiver;
        while let Some(event) = receiver.next().await {
            match event {
                StreamEvent::Fragment(text) => on_fragment(text),
                StreamEvent::Done(outcome) => return outcome,
            }
        }
        StreamOutcome::Failed(StreamError::network("stream ended without an outcome"))
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}
