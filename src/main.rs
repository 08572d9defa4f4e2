use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use shopscout::api::create_router;
use shopscout::config::CONFIG;
use shopscout::search::SearchService;

#[derive(Parser)]
#[command(name = "shopscout", about = "Amazon product search through Bright Data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// Address to listen on; defaults to BIND_ADDR.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Run a single search and print the JSON response.
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    let search_service = Arc::new(SearchService::new(CONFIG.clone()));

    match cli.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| CONFIG.bind_addr.clone());
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            tracing::info!("listening on http://{addr}");
            axum::serve(listener, create_router(search_service)).await?;
        }
        Command::Search { query, limit } => {
            let limit = limit.to_string();
            let response = search_service
                .handle(Some(&query), Some(&limit))
                .await
                .with_context(|| format!("search for '{query}' failed"))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
