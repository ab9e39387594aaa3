//! Chat messages: one bubble attributed to a single sender.

use serde::{Deserialize, Serialize};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Text typed by the person using the client.
    User,
    /// Text streamed back by the chat service.
    Assistant,
}

/// One logically grouped chat entry.
///
/// A message always holds at least one fragment, and its sender is fixed at
/// construction. The only mutation is appending fragments, which is reserved
/// for [`Transcript`](crate::Transcript)'s merge rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    sender: Sender,
    fragments: Vec<String>,
}

impl Message {
    /// A user message holding `text` as its single fragment.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// An assistant message whose first fragment is `text`.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            fragments: vec![text.into()],
        }
    }

    /// The author of this message.
    pub fn sender(&self) -> Sender {
        self.sender
    }

    /// True when the user authored this message.
    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }

    /// Fragments in arrival order. Never empty.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Display text: every fragment concatenated in order.
    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    pub(crate) fn push_fragment(&mut self, text: impl Into<String>) {
        self.fragments.push(text.into());
    }
}
