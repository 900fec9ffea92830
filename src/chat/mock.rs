/// Mock chat model for testing purposes.
///
/// Replays scripted replies in order and records every request it sees.
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ChatModel, ChatReply, Message};
use crate::error::{RagError, Result};
use crate::tools::ToolDefinition;

/// One request as observed by [`MockChatModel`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
}

pub struct MockChatModel {
    script: Mutex<VecDeque<Result<ChatReply>>>,
    fallback: Option<String>,
    requests: Mutex<Vec<RecordedRequest>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockChatModel {
    /// Answer every request with the same text.
    #[must_use]
    pub fn always(text: impl Into<String>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Some(text.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer with `replies` in order. Once exhausted, requests fail with
    /// `ServiceUnavailable`.
    #[must_use]
    pub fn scripted(replies: Vec<Result<ChatReply>>) -> Self {
        Self {
            script: Mutex::new(replies.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests seen so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }
}

impl ChatModel for MockChatModel {
    fn complete(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatReply> {
        lock(&self.requests).push(RecordedRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        });

        if let Some(reply) = lock(&self.script).pop_front() {
            return reply;
        }

        match &self.fallback {
            Some(text) => Ok(ChatReply::Text(text.clone())),
            None => Err(RagError::ServiceUnavailable(
                "mock chat model has no scripted reply left".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_then_exhausted() {
        let chat = MockChatModel::scripted(vec![Ok(ChatReply::Text("one".into()))]);
        assert_eq!(
            chat.complete("m", &[], &[]).unwrap(),
            ChatReply::Text("one".into())
        );
        assert!(matches!(
            chat.complete("m", &[], &[]),
            Err(RagError::ServiceUnavailable(_))
        ));
        assert_eq!(chat.requests().len(), 2);
    }
}
