use crate::types::ids::MessageId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    User,
}

/// A single chat message.
///
/// Assistant content is an accumulator: it starts empty on
/// `TEXT_MESSAGE_START` and grows by appending deltas. Messages are
/// never removed from a session once added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(id: impl Into<MessageId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: Role::User,
            content: content.into(),
        }
    }

    /// A new assistant message with an empty content buffer.
    pub fn assistant(id: impl Into<MessageId>) -> Self {
        Self {
            id: id.into(),
            role: Role::Assistant,
            content: String::new(),
        }
    }

    pub fn append(&mut self, delta: &str) {
        self.content.push_str(delta);
    }
}
