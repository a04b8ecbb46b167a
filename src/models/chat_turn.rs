use serde::{Deserialize, Serialize};

/// Who produced a turn. The serialized names match the message types used by
/// the history store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    Human,
    Ai,
    System,
}

impl Actor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Human => "human",
            Actor::Ai => "ai",
            Actor::System => "system",
        }
    }

    /// Role name expected by OpenAI-compatible chat-completion APIs.
    pub fn chat_role(&self) -> &'static str {
        match self {
            Actor::Human => "user",
            Actor::Ai => "assistant",
            Actor::System => "system",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub actor: Actor,
    pub message: String,
}

impl ChatTurn {
    pub fn human(message: impl Into<String>) -> Self {
        ChatTurn { actor: Actor::Human, message: message.into() }
    }

    pub fn ai(message: impl Into<String>) -> Self {
        ChatTurn { actor: Actor::Ai, message: message.into() }
    }

    pub fn system(message: impl Into<String>) -> Self {
        ChatTurn { actor: Actor::System, message: message.into() }
    }
}
