use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use docqa::chat::ChatModel;
use docqa::client::MistralClient;
use docqa::config::{Config, DEFAULT_CONFIG_PATH};
use docqa::retriever::Retriever;
use docqa::session::ChatSession;
use docqa::tools::{QaTool, configure_tools};

#[derive(Parser)]
#[command(version, about = "Ask questions about a document with retrieval-augmented generation")]
struct Cli {
    /// Path to the JSON config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Document to answer questions about (overrides config)
    #[arg(short, long)]
    document: Option<String>,

    /// Chunk size in characters (overrides config)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Number of chunks to retrieve (overrides config)
    #[arg(long)]
    top_k: Option<usize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat; the model may call the document QA tool
    Chat,
    /// Answer one question from the document
    Ask { question: String },
    /// Show the chunks retrieved for a question
    Retrieve { question: String },
    /// Write a default config file
    InitConfig {
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: String,
    },
}

/// Config, document text and API client shared by every command.
struct Workspace {
    config: Config,
    document: Arc<str>,
    client: Arc<MistralClient>,
}

impl Workspace {
    fn open(cli: &Cli) -> Result<Self> {
        // 1. Load config
        let mut config = Config::load(&cli.config)?;
        if let Some(document) = &cli.document {
            config.document_path = document.clone();
        }
        if let Some(chunk_size) = cli.chunk_size {
            config.chunk_size = chunk_size;
        }
        if let Some(top_k) = cli.top_k {
            config.top_k = top_k;
        }
        config.validate()?;

        // 2. Init client (fails fast without an API key)
        let client = Arc::new(MistralClient::from_config(&config)?);

        // 3. Load document
        let document: Arc<str> = std::fs::read_to_string(&config.document_path)
            .with_context(|| format!("failed to read document: {}", config.document_path))?
            .into();
        info!(
            "Loaded {} ({} chars)",
            config.document_path,
            document.chars().count()
        );

        Ok(Self {
            config,
            document,
            client,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Command::Chat) {
        Command::InitConfig { path } => {
            Config::default().save(path)?;
            println!("Wrote {path}");
        }
        Command::Chat => {
            let ws = Workspace::open(&cli)?;
            let chat: Arc<dyn ChatModel> = ws.client.clone();
            let tools = configure_tools(ws.document, ws.client, chat.clone(), &ws.config)?;
            let mut session = ChatSession::new(chat, tools, ws.config.chat_model.clone());
            session.run(io::stdin().lock(), &mut io::stdout())?;
        }
        Command::Ask { question } => {
            let ws = Workspace::open(&cli)?;
            let tool = QaTool::new(ws.document, ws.client.clone(), ws.client, &ws.config);
            println!("{}", tool.ask(question)?);
        }
        Command::Retrieve { question } => {
            let ws = Workspace::open(&cli)?;
            let hits = Retriever::new(ws.client.as_ref(), ws.config.chunk_size)
                .with_top_k(ws.config.top_k)
                .retrieve_scored(&ws.document, question)?;
            for hit in hits {
                println!("[{}] distance={:.6}", hit.position, hit.distance);
                println!("{}", hit.content);
                println!();
            }
        }
    }

    Ok(())
}
