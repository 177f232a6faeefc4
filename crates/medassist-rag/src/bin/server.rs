//! Medical assistant server binary
//!
//! Run with: cargo run -p medassist-rag --bin medassist-rag-server

use std::path::PathBuf;

use clap::Parser;
use medassist_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "medassist-rag-server", version, about = "Medical assistant chat and document Q&A server")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "MEDASSIST_CONFIG")]
    config: Option<PathBuf>,

    /// Bind host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; the environment may already be set
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "medassist_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Chat model: {}", config.llm.generate_model);
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Retrieval top-k: {}", config.retrieval.top_k);

    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /chat         - General medical chat");
    println!("  POST /upload-doc   - Upload a .txt, .md or .pdf document");
    println!("  POST /doc-qna      - Ask about the uploaded document");
    println!("  GET  /index-status - Active index state");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
