use anyhow::Result;
use axum::Router;
use clap::Parser;
use medsearch_core::ScoringMode;
use server::build_app;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Model directory holding tfidf_vectors.bin, idf.bin and inverted_index.bin
    #[arg(long, default_value = "./ri_model")]
    model: String,
    /// Metadata JSON file
    #[arg(long, default_value = "./meta_data.json")]
    metadata: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 5000)]
    port: u16,
    /// Score only documents sharing a term with the query
    #[arg(long, default_value_t = false)]
    pruned: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let mode = if args.pruned { ScoringMode::IndexPruned } else { ScoringMode::FullScan };
    let app: Router = build_app(&args.model, &args.metadata, mode)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
