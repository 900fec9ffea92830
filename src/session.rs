/// Interactive chat session.
///
/// Keeps the conversation history, offers the registered tools to the
/// chat model on every turn, and runs a line-oriented loop over any
/// reader/writer pair.
use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::warn;

use crate::chat::{ChatModel, ChatReply, Message};
use crate::error::{RagError, Result};
use crate::tools::ToolRegistry;

/// Result of one successful turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Name of the tool the model chose, if any.
    pub tool: Option<String>,
    pub reply: String,
}

pub struct ChatSession {
    chat: Arc<dyn ChatModel>,
    tools: ToolRegistry,
    model: String,
    history: Vec<Message>,
}

/// Exact match, ignoring ASCII case only. Surrounding whitespace makes the
/// line an ordinary message.
fn is_quit(line: &str) -> bool {
    line.eq_ignore_ascii_case("quit")
}

impl ChatSession {
    pub fn new(chat: Arc<dyn ChatModel>, tools: ToolRegistry, model: impl Into<String>) -> Self {
        Self {
            chat,
            tools,
            model: model.into(),
            history: Vec::new(),
        }
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Run one turn. The user message is appended before the model is
    /// called and stays in history even when the turn fails.
    pub fn handle_turn(&mut self, user_input: &str) -> Result<Turn> {
        self.history.push(Message::user(user_input));

        let reply = self
            .chat
            .complete(&self.model, &self.history, &self.tools.definitions())?;

        let turn = match reply {
            ChatReply::Text(text) => Turn {
                tool: None,
                reply: text,
            },
            ChatReply::ToolCalls(calls) => {
                // Only the first call is honoured.
                let call = calls.into_iter().next().ok_or_else(|| {
                    RagError::MalformedResponse("empty tool call list".to_string())
                })?;
                let reply = self.tools.dispatch(&call.name, &call.arguments)?;
                Turn {
                    tool: Some(call.name),
                    reply,
                }
            }
        };

        self.history.push(Message::assistant(turn.reply.clone()));
        Ok(turn)
    }

    /// Read lines from `input` until `quit` or end of input. Errors inside a
    /// turn are reported to `output` and the loop keeps going.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        mut input: R,
        output: &mut W,
    ) -> std::io::Result<()> {
        writeln!(output, "Simple Chatbot (type 'quit' to exit)")?;

        let mut line = String::new();
        loop {
            write!(output, "You: ")?;
            output.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(output)?;
                break;
            }
            let user_input = line.trim_end_matches(['\r', '\n']);

            if is_quit(user_input) {
                break;
            }

            match self.handle_turn(user_input) {
                Ok(turn) => {
                    if let Some(tool) = &turn.tool {
                        writeln!(output, "===== Model requested the {tool} tool =====")?;
                    }
                    writeln!(output, "Assistant: {}", turn.reply)?;
                }
                Err(e) => {
                    warn!("Turn failed: {e}");
                    writeln!(output, "An error occurred: {e}")?;
                }
            }
        }

        writeln!(output, "Goodbye!")?;
        Ok(())
    }
}
