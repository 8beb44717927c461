use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use medsearch_core::builder::{build_model, BuildOptions};
use medsearch_core::persist::{save_document_vectors, save_idf, save_inverted_index, save_meta, MetaFile, ModelPaths};
use medsearch_core::{ScoringMode, SearchEngine};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs;
use std::path::Path;

#[derive(Parser)]
#[command(name = "medsearch-indexer")]
#[command(about = "Build the TF-IDF model artifacts and query them from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the model from a directory of Markdown documents
    Build {
        /// Directory containing the *.md documents
        #[arg(long, default_value = "./med_md")]
        input: String,
        /// Output model directory
        #[arg(long, default_value = "./ri_model")]
        output: String,
        /// Use smoothed IDF = ln(1 + N/df) instead of ln(N/df)
        #[arg(long, default_value_t = false)]
        smoothed_idf: bool,
    },
    /// Run one query against a built model and print the ranking
    Search {
        /// Model directory
        #[arg(long, default_value = "./ri_model")]
        model: String,
        /// Metadata JSON file
        #[arg(long, default_value = "./meta_data.json")]
        metadata: String,
        /// Query text
        #[arg(long)]
        query: String,
        /// Number of results
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        /// Score only documents sharing a term with the query
        #[arg(long, default_value_t = false)]
        pruned: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output, smoothed_idf } => build(&input, &output, smoothed_idf),
        Commands::Search { model, metadata, query, top_k, pruned } => search(&model, &metadata, &query, top_k, pruned),
    }
}

/// Read every `*.md` file directly under `input`, in file name order. The file name is the document id.
fn read_documents(input: &Path) -> Result<Vec<(String, String)>> {
    if !input.is_dir() {
        bail!("input directory not found: {}", input.display());
    }
    let mut docs = Vec::new();
    for entry in WalkDir::new(input).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let p = entry.path();
        if !p.is_file() || p.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        let text = fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
        docs.push((name, text));
    }
    Ok(docs)
}

fn build(input: &str, output: &str, smoothed_idf: bool) -> Result<()> {
    let docs = read_documents(Path::new(input))?;
    let num_docs = docs.len() as u32;
    tracing::info!(num_docs, input, "read documents");

    let model = build_model(docs, BuildOptions { smoothed_idf });
    let num_terms = model.idf.len() as u32;
    tracing::info!(num_docs, num_terms, "computed tf-idf vectors");

    let out_paths = ModelPaths::new(output);
    save_document_vectors(&out_paths, &model.vectors)?;
    save_idf(&out_paths, &model.idf)?;
    save_inverted_index(&out_paths, &model.inverted_index)?;
    let meta = MetaFile {
        num_docs,
        num_terms,
        created_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_else(|_| "".into()),
        version: 1,
    };
    save_meta(&out_paths, &meta)?;

    tracing::info!(output, "model build complete");
    Ok(())
}

fn search(model: &str, metadata: &str, query: &str, top_k: usize, pruned: bool) -> Result<()> {
    let mode = if pruned { ScoringMode::IndexPruned } else { ScoringMode::FullScan };
    let engine = SearchEngine::load(model, metadata)?.with_mode(mode);
    let outcome = engine.search(query, top_k);

    println!("{:<4} {:<15} {:<10} Nom", "#", "Doc ID", "Score");
    println!("{}", "-".repeat(80));
    for (i, r) in outcome.results.iter().enumerate() {
        let name: String = r.name.chars().take(50).collect();
        println!("{:<4} {:<15} {:<10.4} {}", i + 1, r.document_id, r.score, name);
    }
    println!("\n{} results in {:.3}s", outcome.results.len(), outcome.elapsed_secs);
    Ok(())
}
