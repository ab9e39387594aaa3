//! Streaming chat client struct and builder.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use streamchat_core::{ChatBackend, StreamEvent, StreamHandle, StreamOutcome, StreamRequest};
use tokio::task::JoinHandle;

use crate::config::{ConfigError, DeliveryMode, EnvSettings};
use crate::credential::Credential;
use crate::decode::decode_stream;
use crate::error::{map_http_status, map_reqwest_error};

/// Default endpoint base URL.
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";

/// Path of the send endpoint, appended to the base URL.
const CHAT_PATH: &str = "/api/chat/send";

/// Client for the streaming chat endpoint.
///
/// Each call performs one `POST` exchange and decodes the `data: ` records
/// of the response body into fragments. No retries; no cancellation beyond
/// the optional timeout.
///
/// # Example
///
/// ```no_run
/// use streamchat_client::{DeliveryMode, StreamingChatClient};
///
/// let client = StreamingChatClient::new("token")
///     .base_url("https://chat.example.com")
///     .delivery(DeliveryMode::PerRecord);
/// ```
pub struct StreamingChatClient {
    /// Bearer credential, shared with in-flight exchanges.
    pub(crate) credential: Arc<Credential>,
    /// Endpoint base URL (override for testing or proxies).
    pub(crate) base_url: String,
    /// How records are handed to the caller.
    pub(crate) delivery: DeliveryMode,
    /// Per-request timeout; `None` leaves it to the HTTP stack.
    pub(crate) timeout: Option<Duration>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl StreamingChatClient {
    /// Create a client with the given credential and default settings.
    ///
    /// Default base URL: `http://127.0.0.1:8080`.
    /// Default delivery: [`DeliveryMode::PerRecord`].
    #[must_use]
    pub fn new(credential: impl Into<Credential>) -> Self {
        Self {
            credential: Arc::new(credential.into()),
            base_url: DEFAULT_BASE_URL.into(),
            delivery: DeliveryMode::default(),
            timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from `STREAMCHAT_*` environment variables.
    ///
    /// See [`crate::config`] for the variables and their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let settings = EnvSettings::resolve(lookup)?;
        let mut client = Self::new(settings.token).delivery(settings.delivery);
        if let Some(url) = settings.base_url {
            client = client.base_url(url);
        }
        if let Some(timeout) = settings.timeout {
            client = client.timeout(timeout);
        }
        Ok(client)
    }

    /// Override the endpoint base URL.
    ///
    /// Useful for testing with a local mock server or a proxy.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Choose how decoded records are delivered.
    #[must_use]
    pub fn delivery(mut self, mode: DeliveryMode) -> Self {
        self.delivery = mode;
        self
    }

    /// Bound each exchange, from connecting until the body has been read.
    ///
    /// An exchange that runs past it fails with `StreamError::Timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured delivery mode.
    pub fn delivery_mode(&self) -> DeliveryMode {
        self.delivery
    }

    /// Build the send endpoint URL.
    pub(crate) fn chat_url(&self) -> String {
        format!("{}{CHAT_PATH}", self.base_url)
    }

    /// Start one exchange and return its event stream.
    ///
    /// Never fails directly: errors arrive as the handle's terminal
    /// `Done(Failed(_))` event.
    pub async fn stream(&self, request: StreamRequest) -> StreamHandle {
        self.exchange().open(request).await
    }

    /// Send `request` and report progress through callbacks.
    ///
    /// Returns immediately; the exchange runs on a spawned tokio task and the
    /// callbacks are invoked from that task. `on_fragment` is called for each
    /// decoded fragment (once per record, or exactly once in
    /// [`DeliveryMode::Buffered`]), then `on_done` exactly once. Nothing is
    /// called after `on_done`.
    ///
    /// Concurrent sends are not coordinated with each other. Callers that
    /// feed one transcript from several sends must serialize them.
    ///
    /// Must be called from within a tokio runtime.
    pub fn send<F, D>(&self, request: StreamRequest, on_fragment: F, on_done: D) -> JoinHandle<()>
    where
        F: FnMut(String) + Send + 'static,
        D: FnOnce(StreamOutcome) + Send + 'static,
    {
        let exchange = self.exchange();
        tokio::spawn(async move {
            exchange
                .open(request)
                .await
                .into_callbacks(on_fragment, on_done)
                .await;
        })
    }

    fn exchange(&self) -> Exchange {
        Exchange {
            http: self.client.clone(),
            url: self.chat_url(),
            credential: Arc::clone(&self.credential),
            delivery: self.delivery,
            timeout: self.timeout,
        }
    }
}

impl std::fmt::Debug for StreamingChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamingChatClient")
            .field("base_url", &self.base_url)
            .field("delivery", &self.delivery)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ChatBackend for StreamingChatClient {
    fn stream(&self, request: StreamRequest) -> impl Future<Output = StreamHandle> + Send {
        self.exchange().open(request)
    }
}

/// Everything one exchange needs, detached from the client's lifetime.
struct Exchange {
    http: reqwest::Client,
    url: String,
    credential: Arc<Credential>,
    delivery: DeliveryMode,
    timeout: Option<Duration>,
}

impl Exchange {
    async fn open(self, request: StreamRequest) -> StreamHandle {
        tracing::debug!(url = %self.url, delivery = %self.delivery, "sending chat message");

        let mut builder = self
            .http
            .post(&self.url)
            .header(AUTHORIZATION, self.credential.bearer_header().as_str())
            .header(CONTENT_TYPE, "application/json")
            .json(&request);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return failed(&self.url, map_reqwest_error(e)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return failed(&self.url, map_http_status(status, &body));
        }

        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(map_reqwest_error));
        let url = self.url;
        let events = decode_stream(bytes, self.delivery).inspect(move |event| {
            if let StreamEvent::Done(outcome) = event {
                log_outcome(&url, outcome);
            }
        });
        StreamHandle::new(events)
    }
}

fn failed(url: &str, error: streamchat_core::StreamError) -> StreamHandle {
    let outcome = StreamOutcome::Failed(error);
    log_outcome(url, &outcome);
    StreamHandle::finished(outcome)
}

fn log_outcome(url: &str, outcome: &StreamOutcome) {
    match outcome {
        StreamOutcome::Completed => tracing::debug!(url = %url, "chat stream completed"),
        StreamOutcome::Failed(err) => tracing::warn!(url = %url, error = %err, "chat stream failed"),
    }
}
