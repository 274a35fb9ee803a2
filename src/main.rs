// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use semsearch::utils::logging::{format_success, format_warning};
use semsearch::{
    BatchInserter, Config, FileScanner, InsertStats, OpenAiEmbeddingClient, SchemaManager,
    Validator, VectorStoreClient,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "semsearch")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Semantic similarity search over LanceDB collections", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a collection for documents by semantic similarity
    Search {
        /// Search query text
        query: String,

        /// Number of results to return (defaults to the configured limit)
        #[arg(short = 'k', long, value_name = "NUM")]
        limit: Option<usize>,

        /// Only return documents with this source
        #[arg(short, long)]
        source: Option<String>,

        /// Override the configured collection name
        #[arg(long)]
        collection: Option<String>,
    },

    /// Embed text files from a directory into a collection
    Ingest {
        /// Directory of .txt/.md files to embed
        #[arg(value_name = "DIR")]
        path: PathBuf,

        /// Override the configured collection name
        #[arg(long)]
        collection: Option<String>,
    },

    /// List collections present in the store
    Collections,

    /// Show document count for the configured collection
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    semsearch::utils::logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let mut config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Search {
            query,
            limit,
            source,
            collection,
        } => {
            if let Some(name) = collection {
                config.store.collection = name;
            }
            let limit = limit.unwrap_or(config.search.limit);
            cmd_search(&config, &query, limit, source.as_deref()).await?;
        }
        Commands::Ingest { path, collection } => {
            if let Some(name) = collection {
                config.store.collection = name;
            }
            cmd_ingest(&config, &path).await?;
        }
        Commands::Collections => {
            cmd_collections(&config).await?;
        }
        Commands::Stats => {
            cmd_stats(&config).await?;
        }
    }

    Ok(())
}

async fn cmd_search(config: &Config, query: &str, limit: usize, source: Option<&str>) -> Result<()> {
    Validator::validate_query(query)?;
    Validator::validate_limit(limit)?;
    Validator::validate_collection_name(&config.store.collection)?;

    info!(
        "Searching '{}' for: {}",
        config.store.collection, query
    );

    let embedder = OpenAiEmbeddingClient::from_config(&config.embedding)
        .context("Failed to create embedding client")?;

    let client = VectorStoreClient::new(config.store.clone())
        .await
        .context("Failed to open vector store")?;

    let query_embedding = embedder
        .generate_embedding(query)
        .await
        .context("Failed to embed query")?;

    let results = client
        .vector_search(query_embedding, limit, source)
        .await
        .context("Vector search failed")?;

    if results.is_empty() {
        println!(
            "\n{}",
            format_warning(&format!("No results found for query: \"{}\"", query))
        );
        return Ok(());
    }

    println!("\nSearch results for: \"{}\"", query);

    for (idx, result) in results.iter().enumerate() {
        println!("\n{}", result.format_block(idx + 1));
    }

    info!("Search complete");

    Ok(())
}

async fn cmd_ingest(config: &Config, path: &PathBuf) -> Result<()> {
    Validator::validate_directory(path)?;
    Validator::validate_collection_name(&config.store.collection)?;

    info!(
        "Ingesting {} into collection '{}'",
        path.display(),
        config.store.collection
    );

    let embedder = OpenAiEmbeddingClient::from_config(&config.embedding)
        .context("Failed to create embedding client")?;

    let client = VectorStoreClient::new(config.store.clone())
        .await
        .context("Failed to open vector store")?;

    let schema_manager = SchemaManager::new(&client);
    if !schema_manager.verify_collection().await? {
        info!(
            "Collection '{}' will be created on first insert",
            config.store.collection
        );
    }

    let scanner = FileScanner::new(config.ingest.clone());
    let files = scanner
        .scan_directory(path)
        .context("Failed to scan directory")?;

    if files.is_empty() {
        println!("{}", format_warning("No text files found to ingest"));
        return Ok(());
    }

    let inserter = BatchInserter::new(&client, &embedder);
    let mut stats = InsertStats::default();

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
            )
            .expect("Failed to create progress bar template")
            .progress_chars("█▓▒░"),
    );

    for file in &files {
        bar.set_message(file.relative_path.clone());

        let result = ingest_file(&inserter, file).await;
        match result {
            Ok(_) => stats.documents_inserted += 1,
            Err(e) => {
                warn!("Failed to ingest {}: {}", file.relative_path, e);
                stats.errors += 1;
            }
        }

        bar.inc(1);
    }

    bar.finish_with_message("Ingestion complete");

    println!(
        "{}",
        format_success(&format!(
            "Ingested {} documents into '{}' ({} failed)",
            stats.documents_inserted, config.store.collection, stats.errors
        ))
    );

    Ok(())
}

async fn ingest_file(
    inserter: &BatchInserter<'_>,
    file: &semsearch::ScannedFile,
) -> Result<String> {
    let content = std::fs::read_to_string(&file.path).context("Failed to read file")?;

    Validator::validate_content_not_empty(&content)?;

    let document = semsearch::Document::new(file.relative_path.clone(), content);
    let id = inserter.insert_document(&document).await?;

    Ok(id)
}

async fn cmd_collections(config: &Config) -> Result<()> {
    let client = VectorStoreClient::new(config.store.clone())
        .await
        .context("Failed to open vector store")?;

    client.ping().await?;

    let names = client.collection_names().await?;

    if names.is_empty() {
        println!("{}", format_warning("Store contains no collections"));
        return Ok(());
    }

    println!("Collections in {}:", config.store.uri);
    for name in names {
        if name == config.store.collection {
            println!("  {} (configured)", name);
        } else {
            println!("  {}", name);
        }
    }

    Ok(())
}

async fn cmd_stats(config: &Config) -> Result<()> {
    let client = VectorStoreClient::new(config.store.clone())
        .await
        .context("Failed to open vector store")?;

    let count = client.count_documents().await?;

    println!(
        "Collection '{}': {} documents (metric: {})",
        config.store.collection,
        count,
        config.store.distance_metric.keyword()
    );

    Ok(())
}
