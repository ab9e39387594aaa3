//! The seam between a chat session and whatever answers it.
//!
//! [`ChatBackend`] returns `impl Future`, so it is not object-safe.
//! Sessions are generic over it.

use std::future::Future;

use crate::stream::{StreamHandle, StreamRequest};

/// Something that can answer a [`StreamRequest`] with a stream of events.
///
/// Implementations never fail at the call site: every failure is reported
/// as the terminal `Done(Failed(_))` event of the returned handle.
pub trait ChatBackend: Send + Sync {
    /// Start one exchange.
    fn stream(&self, request: StreamRequest) -> impl Future<Output = StreamHandle> + Send;
}
