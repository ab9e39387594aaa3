//! EchoBackend — answers every request with its own text.

use crate::backend::ChatBackend;
use crate::stream::{StreamEvent, StreamHandle, StreamOutcome, StreamRequest};
use std::future::Future;

/// A backend that streams the request text back as a single fragment.
/// Used for testing sessions and renderers.
pub struct EchoBackend;

impl ChatBackend for EchoBackend {
    fn stream(&self, request: StreamRequest) -> impl Future<Output = StreamHandle> + Send {
        async move {
            StreamHandle::new(futures::stream::iter(vec![
                StreamEvent::Fragment(request.text),
                StreamEvent::Done(StreamOutcome::Completed),
            ]))
        }
    }
}
