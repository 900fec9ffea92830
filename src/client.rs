/// Blocking HTTP client for the Mistral API.
///
/// Implements [`Embedder`] over `/v1/embeddings` and [`ChatModel`] over
/// `/v1/chat/completions`. Every call blocks until the service answers,
/// unless a request timeout is configured.
use std::time::Duration;

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::chat::{ChatModel, ChatReply, Message, ToolCall};
use crate::config::Config;
use crate::embedder::Embedder;
use crate::error::{RagError, Result};
use crate::tools::ToolDefinition;

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<FunctionTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Serialize)]
struct FunctionTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolDefinition,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    arguments: Value,
}

// ── Response helpers ─────────────────────────────────────────────────

/// Map an HTTP status to the pipeline's error kinds.
fn check_status(status: u16, body: &str) -> Result<()> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(RagError::Authentication(format!("HTTP {status}: {body}"))),
        _ => Err(RagError::ServiceUnavailable(format!("HTTP {status}: {body}"))),
    }
}

fn first_embedding(resp: EmbeddingResponse) -> Result<Vec<f32>> {
    resp.data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| RagError::MalformedResponse("embedding response has no data".to_string()))
}

fn into_reply(resp: ChatResponse) -> Result<ChatReply> {
    let message = resp
        .choices
        .into_iter()
        .next()
        .map(|c| c.message)
        .ok_or_else(|| RagError::MalformedResponse("chat response has no choices".to_string()))?;

    if let Some(calls) = message.tool_calls.filter(|c| !c.is_empty()) {
        let calls = calls
            .into_iter()
            .map(|c| ToolCall {
                name: c.function.name,
                // Mistral sends a JSON string; some servers inline the object.
                arguments: match c.function.arguments {
                    Value::String(s) => s,
                    other => other.to_string(),
                },
            })
            .collect();
        return Ok(ChatReply::ToolCalls(calls));
    }

    message
        .content
        .map(ChatReply::Text)
        .ok_or_else(|| RagError::MalformedResponse("chat message has no content".to_string()))
}

// ── Client ───────────────────────────────────────────────────────────

pub struct MistralClient {
    http: Client,
    base_url: String,
    api_key: String,
    embedding_model: String,
}

impl MistralClient {
    /// `timeout` bounds each whole request. `None` waits indefinitely; the
    /// blocking client's own 30 second default is not used.
    pub fn new(
        base_url: &str,
        api_key: &str,
        embedding_model: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            embedding_model: embedding_model.to_string(),
        })
    }

    /// Build a client from config, reading the API key from the environment.
    /// Fails before any network traffic when the key is missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?;
        Self::new(
            &config.api_base_url,
            &api_key,
            &config.embedding_model,
            config.request_timeout_secs.map(Duration::from_secs),
        )
    }

    fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let url = format!("{}{path}", self.base_url);
        debug!("POST {url}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()?;

        let status = response.status().as_u16();
        let text = response.text()?;
        check_status(status, &text)?;

        serde_json::from_str(&text)
            .map_err(|e| RagError::MalformedResponse(format!("{path}: {e}")))
    }
}

impl Embedder for MistralClient {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.embedding_model,
            input: vec![text],
        };
        let response: EmbeddingResponse = self.post_json("/v1/embeddings", &request)?;
        first_embedding(response)
    }
}

impl ChatModel for MistralClient {
    fn complete(
        &self,
        model: &str,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> Result<ChatReply> {
        let request = ChatRequest {
            model,
            messages,
            tools: tools
                .iter()
                .map(|function| FunctionTool {
                    kind: "function",
                    function,
                })
                .collect(),
            tool_choice: (!tools.is_empty()).then_some("auto"),
        };
        let response: ChatResponse = self.post_json("/v1/chat/completions", &request)?;
        into_reply(response)
    }
}
