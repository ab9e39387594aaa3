//! # streamchat-core — transcript model and streaming protocol
//!
//! This crate holds everything a chat client needs that does not touch the
//! network:
//!
//! | Piece | Types | What it does |
//! |-------|-------|-------------|
//! | Messages | [`Message`], [`Sender`] | One bubble, one author, one or more fragments |
//! | Transcript | [`Transcript`] | Ordered log with the assistant merge rule |
//! | Exchange | [`StreamRequest`], [`StreamEvent`], [`StreamOutcome`], [`StreamHandle`] | One request and its streamed answer |
//! | Backend | [`ChatBackend`] | Seam between a session and the transport |
//!
//! ## Delivery contract
//!
//! A [`StreamHandle`] yields zero or more [`StreamEvent::Fragment`]s and then
//! exactly one [`StreamEvent::Done`]. Failures are never raised any other
//! way, so a caller that drains the handle sees one unambiguous outcome.

#![deny(missing_docs)]

pub mod backend;
pub mod error;
pub mod message;
pub mod stream;
pub mod transcript;

#[cfg(feature = "test-utils")]
pub mod test_utils;

// Re-exports for convenience
pub use backend::ChatBackend;
pub use error::StreamError;
pub use message::{Message, Sender};
pub use stream::{StreamEvent, StreamHandle, StreamOutcome, StreamRequest};
pub use transcript::Transcript;
