//! Streaming example: print an assistant reply as it arrives.
//!
//! Set STREAMCHAT_TOKEN (and optionally STREAMCHAT_BASE_URL,
//! STREAMCHAT_DELIVERY) in your environment and run:
//!   cargo run --example stream -p streamchat-client -- "Hello there"
//!
//! Set RUST_LOG=debug to see request logging.

use std::io::Write;

use streamchat_client::StreamingChatClient;
use streamchat_core::{StreamOutcome, StreamRequest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let text = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        eprintln!("usage: stream <message>");
        std::process::exit(2);
    }

    let client = StreamingChatClient::from_env()?;
    let handle = client.stream(StreamRequest::new(text)).await;

    let outcome = handle
        .drive(|fragment| {
            print!("{fragment}");
            let _ = std::io::stdout().flush();
        })
        .await;
    println!();

    match outcome {
        StreamOutcome::Completed => Ok(()),
        StreamOutcome::Failed(err) => Err(err.into()),
    }
}
