//! ScriptedBackend — replays queued replies and records requests.

use crate::backend::ChatBackend;
use crate::error::StreamError;
use crate::stream::{StreamEvent, StreamHandle, StreamOutcome, StreamRequest};
use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

/// One scripted reply: fragments in order, then the terminal outcome.
#[derive(Debug)]
pub struct ScriptedReply {
    fragments: Vec<String>,
    outcome: StreamOutcome,
}

impl ScriptedReply {
    /// A successful reply streaming `fragments` in order.
    pub fn completed<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            outcome: StreamOutcome::Completed,
        }
    }

    /// A reply that fails with `error` before producing any fragment.
    pub fn failed(error: StreamError) -> Self {
        Self {
            fragments: Vec::new(),
            outcome: StreamOutcome::Failed(error),
        }
    }

    /// A reply that streams `fragments` and then fails with `error`.
    pub fn interrupted<I, S>(fragments: I, error: StreamError) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fragments: fragments.into_iter().map(Into::into).collect(),
            outcome: StreamOutcome::Failed(error),
        }
    }

    fn into_events(self) -> Vec<StreamEvent> {
        let mut events: Vec<StreamEvent> =
            self.fragments.into_iter().map(StreamEvent::Fragment).collect();
        events.push(StreamEvent::Done(self.outcome));
        events
    }
}

/// A backend that answers requests from a queue of [`ScriptedReply`]s.
///
/// When the queue runs dry every further request fails with a network
/// error. Requests are recorded so tests can assert on what was sent.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<StreamRequest>>,
}

impl ScriptedBackend {
    /// Create a backend with the given replies, answered in order.
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue another reply.
    pub fn push(&self, reply: ScriptedReply) {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<StreamRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ChatBackend for ScriptedBackend {
    fn stream(&self, request: StreamRequest) -> impl Future<Output = StreamHandle> + Send {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        async move {
            match reply {
                Some(reply) => StreamHandle::new(futures::stream::iter(reply.into_events())),
                None => StreamHandle::finished(StreamOutcome::Failed(StreamError::network(
                    "no scripted reply left",
                ))),
            }
        }
    }
}
