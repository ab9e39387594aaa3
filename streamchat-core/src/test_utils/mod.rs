//! In-memory backends for testing.
//!
//! Available behind the `test-utils` feature flag. These answer requests
//! without a network so session logic can be exercised deterministically.

mod echo_backend;
mod scripted_backend;

pub use echo_backend::EchoBackend;
pub use scripted_backend::{ScriptedBackend, ScriptedReply};
