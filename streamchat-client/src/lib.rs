//! HTTP client for a streaming chat endpoint.
//!
//! [`StreamingChatClient`] posts `{"message": "..."}` with a bearer
//! credential and decodes the `data: `-prefixed records of the response into
//! fragments, delivered either per record as they arrive or, in
//! [`DeliveryMode::Buffered`], as one fragment once the whole body is in.
//!
//! ```no_run
//! use streamchat_client::StreamingChatClient;
//! use streamchat_core::StreamRequest;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StreamingChatClient::from_env()?;
//! let handle = client.send(
//!     StreamRequest::new("Hi"),
//!     |fragment| print!("{fragment}"),
//!     |outcome| println!("\n{outcome:?}"),
//! );
//! handle.await?;
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod config;
pub mod credential;
pub mod decode;
pub(crate) mod error;

pub use client::StreamingChatClient;
pub use config::{ConfigError, DeliveryMode};
pub use credential::Credential;

// Re-export streamchat-core for convenience
pub use streamchat_core::{StreamError, StreamEvent, StreamHandle, StreamOutcome, StreamRequest};
