#![deny(missing_docs)]
//! # streamchat — umbrella crate
//!
//! A single import surface for the streaming chat core: the transcript
//! model and protocol types from `streamchat-core`, the HTTP client from
//! `streamchat-client` (feature `client`, on by default), and
//! [`ChatSession`], which ties a backend to a transcript.
//!
//! ```no_run
//! use streamchat::prelude::*;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StreamingChatClient::from_env()?;
//! let mut session = ChatSession::new(client);
//!
//! let report = session.submit("Hi", &mut ()).await?;
//! for message in session.transcript() {
//!     println!("{:?}: {}", message.sender(), message.text());
//! }
//! if let Some(err) = report.outcome.error() {
//!     eprintln!("reply failed: {err}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod session;

pub use streamchat_core;

#[cfg(feature = "client")]
pub use streamchat_client;

/// In-memory backends for testing sessions (feature `test-utils`).
#[cfg(feature = "test-utils")]
pub use streamchat_core::test_utils;

pub use session::{ChatSession, SessionError, SessionObserver, SubmitReport};

/// Happy-path imports for building a chat screen.
pub mod prelude {
    pub use streamchat_core::{
        ChatBackend, Message, Sender, StreamError, StreamEvent, StreamHandle, StreamOutcome,
        StreamRequest, Transcript,
    };

    pub use crate::session::{ChatSession, SessionError, SessionObserver, SubmitReport};

    #[cfg(feature = "client")]
    pub use streamchat_client::{Credential, DeliveryMode, StreamingChatClient};
}
