/// Chat-completion boundary.
///
/// [`ChatModel`] abstracts the remote chat service. The answer step of the
/// pipeline and the interactive session both go through it.
pub mod mock;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};
use crate::tools::ToolDefinition;

/// A role-tagged chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A model's request to invoke one of the offered tools.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub name: String,
    /// JSON-encoded arguments, exactly as the model produced them.
    pub arguments: String,
}

/// What the chat service answered with.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Text(String),
    ToolCalls(Vec<ToolCall>),
}

/// Trait for chat-completion backends.
pub trait ChatModel: Send + Sync {
    /// Send `messages` to `model`. When `tools` is non-empty the model may
    /// answer with tool calls instead of text (tool choice "auto").
    fn complete(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatReply>;
}

/// Ask `model` to answer a single prompt and return its text.
pub fn answer(chat: &dyn ChatModel, model: &str, prompt: &str) -> Result<String> {
    match chat.complete(model, &[Message::user(prompt)], &[])? {
        ChatReply::Text(text) => Ok(text),
        ChatReply::ToolCalls(_) => Err(RagError::MalformedResponse(
            "expected a text reply, got tool calls".to_string(),
        )),
    }
}
