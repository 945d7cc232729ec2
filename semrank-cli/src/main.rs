//! Command-line interface for building and querying semrank indexes.
//!
//! `semrank index` ingests a corpus (a profile directory tree or a CSV
//! export), embeds it, and writes a snapshot directory. `semrank query`
//! loads a snapshot and ranks entities for a query, optionally asking a
//! chat model to explain the top matches. `semrank classify` does the same
//! retrieval, then asks the model for a structured ticket analysis.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use semrank_ingest::{CsvMapping, load_csv, load_profile_directory};
use semrank_reason::{
    ChatCompletionsClient, Classifier, ContextOptions, build_match_context, explain_top,
};
use semrank_retrieval::{
    Document, EmbeddingProvider, InMemoryVectorStore, MatchConfig, MatchPipeline,
    RecursiveChunker, providers::HttpEmbeddingProvider,
};

const DEFAULT_COLLECTION: &str = "profiles";

#[derive(Parser)]
#[command(name = "semrank", version, about = "Semantic matching over document corpora")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build an index snapshot from a corpus.
    Index {
        /// Root directory of entity profile folders (one subdirectory per entity).
        #[arg(long, conflicts_with = "csv")]
        profiles_dir: Option<PathBuf>,

        /// CSV file to ingest instead of a directory tree.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Column holding the row identifier (CSV mode).
        #[arg(long, default_value = "id")]
        id_column: String,

        /// Columns composed into the document text (CSV mode, repeatable).
        #[arg(long = "text-column")]
        text_columns: Vec<String>,

        /// Columns carried as metadata (CSV mode, repeatable).
        #[arg(long = "metadata-column")]
        metadata_columns: Vec<String>,

        /// Directory to write the snapshot into.
        #[arg(long, default_value = "semrank-index")]
        out: PathBuf,

        /// Chunk size in characters.
        #[arg(long, default_value_t = 1000)]
        chunk_size: usize,

        /// Overlap between consecutive chunks in characters.
        #[arg(long, default_value_t = 200)]
        chunk_overlap: usize,

        #[command(flatten)]
        embeddings: EmbeddingArgs,
    },

    /// Rank entities in an existing snapshot against a query.
    Query {
        /// Snapshot directory produced by `semrank index`.
        #[arg(long, default_value = "semrank-index")]
        index: PathBuf,

        /// The query text.
        query: String,

        /// Number of nearest chunks to retrieve.
        #[arg(long, default_value_t = MatchConfig::default().top_k)]
        top_k: usize,

        /// Ask a chat model to explain the top matches.
        #[arg(long)]
        explain: bool,

        /// How many of the top matches to explain.
        #[arg(long, default_value_t = 3)]
        explain_top: usize,

        #[command(flatten)]
        embeddings: EmbeddingArgs,
    },

    /// Classify a support ticket using similar historical tickets as context.
    Classify {
        /// Snapshot directory produced by `semrank index`.
        #[arg(long, default_value = "semrank-index")]
        index: PathBuf,

        /// The ticket text to classify.
        ticket: String,

        /// Number of nearest chunks to retrieve for context.
        #[arg(long, default_value_t = MatchConfig::default().top_k)]
        top_k: usize,

        #[command(flatten)]
        embeddings: EmbeddingArgs,
    },
}

#[derive(clap::Args)]
struct EmbeddingArgs {
    /// Base URL of the embeddings API.
    #[arg(long = "embeddings-url")]
    embeddings_url: Option<String>,

    /// Embedding model name (requires --embeddings-dimensions).
    #[arg(long = "embeddings-model", requires = "embeddings_dimensions")]
    embeddings_model: Option<String>,

    /// Embedding dimensionality (requires --embeddings-model).
    #[arg(long = "embeddings-dimensions", requires = "embeddings_model")]
    embeddings_dimensions: Option<usize>,
}

impl EmbeddingArgs {
    fn build_provider(&self) -> anyhow::Result<HttpEmbeddingProvider> {
        let mut provider = HttpEmbeddingProvider::from_env()
            .context("embedding provider setup failed (is SEMRANK_EMBEDDINGS_API_KEY set?)")?;
        if let Some(url) = &self.embeddings_url {
            provider = provider.with_base_url(url.clone());
        }
        if let (Some(model), Some(dims)) = (&self.embeddings_model, self.embeddings_dimensions) {
            provider = provider.with_model(model.clone(), dims);
        }
        Ok(provider)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Index {
            profiles_dir,
            csv,
            id_column,
            text_columns,
            metadata_columns,
            out,
            chunk_size,
            chunk_overlap,
            embeddings,
        } => {
            let documents = load_corpus(
                profiles_dir,
                csv,
                id_column,
                text_columns,
                metadata_columns,
            )?;
            index(documents, out, chunk_size, chunk_overlap, embeddings).await
        }
        Command::Query { index, query, top_k, explain, explain_top: n, embeddings } => {
            run_query(index, query, top_k, explain, n, embeddings).await
        }
        Command::Classify { index, ticket, top_k, embeddings } => {
            classify(index, ticket, top_k, embeddings).await
        }
    }
}

fn load_corpus(
    profiles_dir: Option<PathBuf>,
    csv: Option<PathBuf>,
    id_column: String,
    text_columns: Vec<String>,
    metadata_columns: Vec<String>,
) -> anyhow::Result<Vec<Document>> {
    match (profiles_dir, csv) {
        (Some(root), None) => {
            let documents = load_profile_directory(&root)
                .with_context(|| format!("failed to load profiles from {}", root.display()))?;
            Ok(documents)
        }
        (None, Some(path)) => {
            if text_columns.is_empty() {
                bail!("--csv requires at least one --text-column");
            }
            let mapping = CsvMapping { id_column, text_columns, metadata_columns };
            let documents = load_csv(&path, &mapping)
                .with_context(|| format!("failed to load CSV from {}", path.display()))?;
            Ok(documents)
        }
        _ => bail!("exactly one of --profiles-dir or --csv is required"),
    }
}

async fn index(
    documents: Vec<Document>,
    out: PathBuf,
    chunk_size: usize,
    chunk_overlap: usize,
    embeddings: EmbeddingArgs,
) -> anyhow::Result<()> {
    if documents.is_empty() {
        bail!("corpus is empty, nothing to index");
    }
    info!(document_count = documents.len(), "loaded corpus");

    let provider = Arc::new(embeddings.build_provider()?);
    let store = Arc::new(InMemoryVectorStore::new());
    let config = MatchConfig::builder()
        .chunk_size(chunk_size)
        .chunk_overlap(chunk_overlap)
        .build()
        .context("invalid chunking configuration")?;
    let pipeline = MatchPipeline::builder()
        .config(config)
        .embedding_provider(provider.clone())
        .vector_store(store.clone())
        .chunker(Arc::new(RecursiveChunker::new(chunk_size, chunk_overlap)?))
        .build()?;

    pipeline.create_collection(DEFAULT_COLLECTION).await?;
    let chunk_count = pipeline.index_corpus(DEFAULT_COLLECTION, &documents).await?;
    store.save(&out, provider.model_id(), provider.dimensions()).await?;

    println!(
        "Indexed {} documents ({} chunks) into {}",
        documents.len(),
        chunk_count,
        out.display()
    );
    Ok(())
}

async fn build_query_pipeline(
    index: &PathBuf,
    embeddings: &EmbeddingArgs,
) -> anyhow::Result<MatchPipeline> {
    let provider = Arc::new(embeddings.build_provider()?);
    let store = Arc::new(
        InMemoryVectorStore::load(index)
            .await
            .with_context(|| format!("failed to load index from {}", index.display()))?,
    );

    let config = MatchConfig::default();
    let pipeline = MatchPipeline::builder()
        .config(config.clone())
        .embedding_provider(provider)
        .vector_store(store)
        .chunker(Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)?))
        .build()?;
    Ok(pipeline)
}

async fn run_query(
    index: PathBuf,
    query: String,
    top_k: usize,
    explain: bool,
    explain_n: usize,
    embeddings: EmbeddingArgs,
) -> anyhow::Result<()> {
    let pipeline = build_query_pipeline(&index, &embeddings).await?;
    let mut ranked = pipeline.rank(DEFAULT_COLLECTION, &query, top_k).await?;

    if ranked.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    if explain {
        let client = ChatCompletionsClient::from_env()
            .context("explanation setup failed (is SEMRANK_CHAT_API_KEY set?)")?;
        explain_top(&client, &query, &mut ranked, explain_n).await;
    }

    for (i, profile) in ranked.iter().enumerate() {
        println!(
            "{rank}. {entity}  {score:.2}%  ({chunks} matching chunks)",
            rank = i + 1,
            entity = profile.entity_id,
            score = profile.match_score_percent,
            chunks = profile.contributing_chunks.len(),
        );
        if let Some(explanation) = &profile.explanation {
            println!("   {explanation}");
        }
    }
    Ok(())
}

async fn classify(
    index: PathBuf,
    ticket: String,
    top_k: usize,
    embeddings: EmbeddingArgs,
) -> anyhow::Result<()> {
    let pipeline = build_query_pipeline(&index, &embeddings).await?;
    let ranked = pipeline.rank(DEFAULT_COLLECTION, &ticket, top_k).await?;

    let context = build_match_context(&ranked, &ContextOptions::default());
    if context.is_empty() {
        info!("no similar historical tickets above the score floor");
    }

    let client = ChatCompletionsClient::from_env()
        .context("classification setup failed (is SEMRANK_CHAT_API_KEY set?)")?;
    let analysis = client.classify(&ticket, &context).await?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_top_k_defaults_to_pipeline_config() {
        let cli = Cli::try_parse_from(["semrank", "query", "battery storage"]).unwrap();
        let Command::Query { top_k, .. } = cli.command else {
            panic!("expected query command");
        };
        assert_eq!(top_k, MatchConfig::default().top_k);
    }

    #[test]
    fn embedding_model_and_dimensions_require_each_other() {
        assert!(
            Cli::try_parse_from([
                "semrank",
                "query",
                "q",
                "--embeddings-model",
                "all-MiniLM-L6-v2"
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from(["semrank", "query", "q", "--embeddings-dimensions", "384"])
                .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "semrank",
                "query",
                "q",
                "--embeddings-model",
                "all-MiniLM-L6-v2",
                "--embeddings-dimensions",
                "384"
            ])
            .is_ok()
        );
    }
}
