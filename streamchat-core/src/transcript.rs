//! The ordered message log for one conversation.

use serde::Serialize;

use crate::message::{Message, Sender};

/// Ordered log of chat messages. Insertion order is display order.
///
/// The log only grows. Assistant fragments that arrive back to back are
/// merged into the last assistant message, so one streamed response always
/// renders as one bubble.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new user message. Never merges with the previous entry.
    pub fn append_user_message(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    /// Append a fragment of the assistant's reply.
    ///
    /// If the last message is from the assistant the fragment is appended to
    /// it in place; otherwise a new assistant message is started. Empty
    /// fragments are kept.
    pub fn append_assistant_fragment(&mut self, text: impl Into<String>) {
        match self.messages.last_mut() {
            Some(last) if last.sender() == Sender::Assistant => last.push_fragment(text),
            _ => self.messages.push(Message::assistant(text)),
        }
    }

    /// True iff nothing has been appended yet.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages (bubbles).
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Every message in display order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Iterate messages in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
