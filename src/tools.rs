/// Tools a chat model may call.
///
/// Each tool is a name, a JSON-schema description of its arguments and a
/// callable bound to its state at configuration time. The registry maps
/// names to tools and dispatches a model's tool call by name.
use std::collections::HashMap;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::chat::{self, ChatModel};
use crate::config::Config;
use crate::embedder::Embedder;
use crate::error::{RagError, Result};
use crate::prompt::build_prompt;
use crate::retriever::Retriever;

pub const QA_TOOL_NAME: &str = "qa_with_context";

/// Describes a tool's interface for LLM consumption, in the shape of the
/// `function` object of a function-calling request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema describing the expected arguments.
    pub parameters: Value,
}

/// All tools implement this trait.
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Run the tool with JSON-encoded `arguments`.
    fn call(&self, arguments: &str) -> Result<String>;
}

/// JSON schema for `T`, without the top-level `$schema` and `title` keys.
fn parameters_schema<T: JsonSchema>() -> Value {
    let mut schema = schemars::schema_for!(T);
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
    }
    schema.to_value()
}

fn parse_arguments<'de, T: Deserialize<'de>>(tool: &str, arguments: &'de str) -> Result<T> {
    serde_json::from_str(arguments).map_err(|e| RagError::InvalidToolArguments {
        tool: tool.to_string(),
        reason: e.to_string(),
    })
}

// ── qa_with_context ──────────────────────────────────────────────────

#[derive(Deserialize, JsonSchema)]
struct QaParams {
    /// User question
    question: String,
}

/// Answers a question about one document: retrieve the nearest chunks,
/// build the prompt, ask the answer model.
pub struct QaTool {
    document: Arc<str>,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    answer_model: String,
    chunk_size: usize,
    top_k: usize,
}

impl QaTool {
    pub fn new(
        document: Arc<str>,
        embedder: Arc<dyn Embedder>,
        chat: Arc<dyn ChatModel>,
        config: &Config,
    ) -> Self {
        Self {
            document,
            embedder,
            chat,
            answer_model: config.answer_model.clone(),
            chunk_size: config.chunk_size,
            top_k: config.top_k,
        }
    }

    /// Retrieve context for `question` and return the model's answer.
    pub fn ask(&self, question: &str) -> Result<String> {
        let retrieved = Retriever::new(self.embedder.as_ref(), self.chunk_size)
            .with_top_k(self.top_k)
            .retrieve(&self.document, question)?;
        let prompt = build_prompt(&retrieved, question);
        chat::answer(self.chat.as_ref(), &self.answer_model, &prompt)
    }
}

impl Tool for QaTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: QA_TOOL_NAME.to_string(),
            description: "Answer AI related user question by retrieving relevant context"
                .to_string(),
            parameters: parameters_schema::<QaParams>(),
        }
    }

    fn call(&self, arguments: &str) -> Result<String> {
        let params: QaParams = parse_arguments(QA_TOOL_NAME, arguments)?;
        self.ask(&params.question)
    }
}

// ── Registry ─────────────────────────────────────────────────────────

/// Manages available tools, their schemas, and lookup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Returns an error if the name is already taken.
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<()> {
        let name = tool.definition().name;
        if self.tools.contains_key(&name) {
            return Err(RagError::DuplicateTool(name));
        }
        self.tools.insert(name, Arc::new(tool));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Definitions of every tool, sorted by name (for sending to the model).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| t.definition()).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Invoke the tool called `name` with JSON-encoded `arguments`.
    pub fn dispatch(&self, name: &str, arguments: &str) -> Result<String> {
        let tool = self
            .get(name)
            .ok_or_else(|| RagError::UnknownTool(name.to_string()))?;
        info!("Dispatching tool {name}");
        tool.call(arguments)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Build the tool registry for one document.
pub fn configure_tools(
    document: Arc<str>,
    embedder: Arc<dyn Embedder>,
    chat: Arc<dyn ChatModel>,
    config: &Config,
) -> Result<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry.register(QaTool::new(document, embedder, chat, config))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::mock::MockChatModel;
    use crate::embedder::mock::MockEmbedder;
    use serde_json::json;

    fn config(chunk_size: usize) -> Config {
        Config {
            chunk_size,
            ..Config::default()
        }
    }

    fn registry_for(document: &str, chat: Arc<MockChatModel>) -> ToolRegistry {
        configure_tools(
            Arc::from(document),
            Arc::new(MockEmbedder::default()),
            chat,
            &config(10),
        )
        .unwrap()
    }

    #[test]
    fn test_configure_tools_registers_qa_only() {
        let registry = registry_for("Sample text", Arc::new(MockChatModel::always("x")));
        assert_eq!(registry.names(), vec![QA_TOOL_NAME]);
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_qa_definition_schema() {
        let registry = registry_for("Sample text", Arc::new(MockChatModel::always("x")));
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "qa_with_context");
        assert_eq!(
            defs[0].description,
            "Answer AI related user question by retrieving relevant context"
        );

        let params = &defs[0].parameters;
        assert_eq!(params["type"], "object");
        assert_eq!(params["properties"]["question"]["type"], "string");
        assert_eq!(params["properties"]["question"]["description"], "User question");
        assert_eq!(params["required"], json!(["question"]));
        assert!(params.get("$schema").is_none());
    }

    #[test]
    fn test_parameters_schema_is_plain_object() {
        let schema = parameters_schema::<QaParams>();
        let obj = schema.as_object().unwrap();
        assert!(!obj.contains_key("title"));
        assert!(!obj.contains_key("$schema"));
        assert_eq!(obj["type"], "object");
        assert!(obj["properties"].get("question").is_some());
    }

    #[test]
    fn test_dispatch_qa_returns_model_answer() {
        let chat = Arc::new(MockChatModel::always("This is a mock response."));
        let registry = registry_for(
            "This is a long document that we will split into chunks.",
            chat.clone(),
        );

        let answer = registry
            .dispatch(QA_TOOL_NAME, r#"{"question": "What is this document about?"}"#)
            .unwrap();
        assert!(answer.to_lowercase().contains("mock response"));

        let requests = chat.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "mistral-small-latest");
        let prompt = &requests[0].messages[0].content;
        assert!(prompt.contains("Query: What is this document about?"));
        assert!(prompt.starts_with("Context information is below."));
    }

    #[test]
    fn test_dispatch_unknown_tool() {
        let registry = registry_for("doc", Arc::new(MockChatModel::always("x")));
        assert!(matches!(
            registry.dispatch("web_search", "{}"),
            Err(RagError::UnknownTool(name)) if name == "web_search"
        ));
    }

    #[test]
    fn test_dispatch_bad_arguments() {
        let registry = registry_for("doc", Arc::new(MockChatModel::always("x")));
        assert!(matches!(
            registry.dispatch(QA_TOOL_NAME, r#"{"query": "missing field"}"#),
            Err(RagError::InvalidToolArguments { .. })
        ));
        assert!(matches!(
            registry.dispatch(QA_TOOL_NAME, "not json"),
            Err(RagError::InvalidToolArguments { .. })
        ));
    }

    #[test]
    fn test_duplicate_registration() {
        let chat: Arc<dyn ChatModel> = Arc::new(MockChatModel::always("x"));
        let embedder: Arc<dyn Embedder> = Arc::new(MockEmbedder::default());
        let mut registry = ToolRegistry::new();
        let cfg = config(10);
        registry
            .register(QaTool::new(Arc::from("a"), embedder.clone(), chat.clone(), &cfg))
            .unwrap();
        assert!(matches!(
            registry.register(QaTool::new(Arc::from("b"), embedder, chat, &cfg)),
            Err(RagError::DuplicateTool(_))
        ));
    }

    #[test]
    fn test_qa_on_empty_document() {
        let registry = registry_for("", Arc::new(MockChatModel::always("x")));
        assert!(matches!(
            registry.dispatch(QA_TOOL_NAME, r#"{"question": "q"}"#),
            Err(RagError::EmptyCorpus)
        ));
    }
}
