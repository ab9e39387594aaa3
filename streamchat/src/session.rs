//! A chat session: one transcript fed by one backend, one exchange at a time.
//!
//! [`ChatSession::submit`] is the whole user-facing flow. It validates the
//! input, records the user message, streams the reply into the transcript
//! and reports the outcome. Fragments are applied on the task that awaits
//! `submit`, so the transcript has a single writer, and `&mut self` means a
//! second submit cannot start before the first has finished.

use streamchat_core::{ChatBackend, StreamError, StreamOutcome, StreamRequest, Transcript};
use thiserror::Error;

/// Errors that stop a submit before anything is sent.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The text was empty. Whitespace-only text is sent as is.
    #[error("message is empty")]
    EmptyInput,
}

/// Receives progress while a reply streams in.
///
/// Every method has a no-op default; implement only what you render.
/// The transcript passed in already reflects the event.
pub trait SessionObserver {
    /// A fragment was appended to the assistant's message.
    fn on_fragment(&mut self, fragment: &str, transcript: &Transcript) {
        let _ = (fragment, transcript);
    }

    /// The reply finished successfully.
    fn on_completed(&mut self, transcript: &Transcript) {
        let _ = transcript;
    }

    /// The exchange failed. Fragments already applied stay in the transcript.
    fn on_failed(&mut self, error: &StreamError, transcript: &Transcript) {
        let _ = (error, transcript);
    }
}

/// Observer that ignores everything.
impl SessionObserver for () {}

/// Summary of one submit.
#[derive(Debug)]
pub struct SubmitReport {
    /// How the exchange ended.
    pub outcome: StreamOutcome,
    /// Number of fragments applied to the transcript.
    pub fragments: usize,
}

/// One conversation: a [`Transcript`] and the backend that answers it.
pub struct ChatSession<B> {
    backend: B,
    transcript: Transcript,
}

impl<B: ChatBackend> ChatSession<B> {
    /// Start an empty conversation.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            transcript: Transcript::new(),
        }
    }

    /// The conversation so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The backend answering this session.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consume the session, keeping the transcript.
    pub fn into_transcript(self) -> Transcript {
        self.transcript
    }

    /// Send `text` and stream the reply into the transcript.
    ///
    /// Empty text is rejected before the transcript or the network is
    /// touched. Otherwise the user message is appended, then every fragment
    /// is merged into one assistant message and reported to `observer`,
    /// and finally exactly one of `on_completed` / `on_failed` fires.
    /// A failed exchange is still `Ok`: the failure is in the report.
    pub async fn submit<O>(
        &mut self,
        text: &str,
        observer: &mut O,
    ) -> Result<SubmitReport, SessionError>
    where
        O: SessionObserver + ?Sized,
    {
        if text.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        self.transcript.append_user_message(text);
        tracing::debug!(messages = self.transcript.len(), "submitting user message");

        let handle = self.backend.stream(StreamRequest::new(text)).await;

        let transcript = &mut self.transcript;
        let mut fragments = 0;
        let outcome = handle
            .drive(|fragment| {
                transcript.append_assistant_fragment(fragment);
                fragments += 1;
                if let Some(applied) = transcript.last().and_then(|m| m.fragments().last()) {
                    observer.on_fragment(applied, transcript);
                }
            })
            .await;

        match &outcome {
            StreamOutcome::Completed => {
                tracing::debug!(fragments, "assistant reply completed");
                observer.on_completed(&self.transcript);
            }
            StreamOutcome::Failed(err) => {
                tracing::debug!(fragments, error = %err, "assistant reply failed");
                observer.on_failed(err, &self.transcript);
            }
        }

        Ok(SubmitReport { outcome, fragments })
    }
}

impl<B> std::fmt::Debug for ChatSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("transcript", &self.transcript)
            .finish_non_exhaustive()
    }
}
