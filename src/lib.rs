//! # docqa - Retrieval-augmented question answering over one document
//!
//! Splits a document into fixed-size character chunks, embeds them through a
//! remote embedding service, picks the chunks nearest to a question by
//! squared Euclidean distance, and asks a remote chat model to answer from
//! that context. The whole pipeline is exposed to a chat model as the tool
//! `qa_with_context`.
//!
//! ## Architecture
//!
//! - **[`chunker`]** - Fixed-size, non-overlapping character windows
//! - **[`embedder`]** - `Embedder` trait and a deterministic mock
//! - **[`index`]** - Exact flat L2 index, built per query
//! - **[`retriever`]** - Chunk → embed → index → search
//! - **[`prompt`]** - Context-augmented prompt template
//! - **[`chat`]** - `ChatModel` trait, message types, scripted mock
//! - **[`client`]** - Blocking Mistral API client (embeddings + chat)
//! - **[`tools`]** - Tool definitions and the name → tool registry
//! - **[`session`]** - Interactive tool-calling chat loop
//! - **[`config`]** - JSON configuration and API key lookup

pub mod chat;
pub mod chunker;
pub mod client;
pub mod config;
pub mod embedder;
pub mod error;
pub mod index;
pub mod prompt;
pub mod retriever;
pub mod session;
pub mod tools;

pub use error::{RagError, Result};
