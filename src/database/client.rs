// file: src/database/client.rs
// description: LanceDB client wrapper with connection management
// reference: https://docs.rs/lancedb

use crate::config::StoreConfig;
use crate::error::{Result, SearchError};
use crate::models::SearchResult;
use arrow_array::{Float32Array, StringArray};
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table, connect};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Clone)]
pub struct VectorStoreClient {
    connection: Connection,
    config: StoreConfig,
}

impl VectorStoreClient {
    /// Open a directory-backed store. The path must already exist;
    /// connecting would otherwise create an empty store and mask a
    /// misconfigured uri.
    pub async fn new(config: StoreConfig) -> Result<Self> {
        info!("Connecting to vector store at {}", config.uri);

        if !Path::new(&config.uri).is_dir() {
            return Err(SearchError::Connection(format!(
                "Store path does not exist: {}",
                config.uri
            )));
        }

        let connection = connect(&config.uri).execute().await.map_err(|e| {
            SearchError::Connection(format!("Failed to connect to store: {}", e))
        })?;

        Ok(Self { connection, config })
    }

    pub fn get_connection(&self) -> &Connection {
        &self.connection
    }

    pub fn collection_name(&self) -> &str {
        &self.config.collection
    }

    pub async fn ping(&self) -> Result<bool> {
        debug!("Checking store connection");

        match self.connection.table_names().execute().await {
            Ok(_) => Ok(true),
            Err(e) => Err(SearchError::Connection(format!(
                "Store connection failed: {}",
                e
            ))),
        }
    }

    pub async fn collection_names(&self) -> Result<Vec<String>> {
        self.connection
            .table_names()
            .execute()
            .await
            .map_err(|e| SearchError::Connection(format!("Failed to list collections: {}", e)))
    }

    pub async fn collection_exists(&self, name: &str) -> Result<bool> {
        let names = self.collection_names().await?;
        Ok(names.iter().any(|n| n == name))
    }

    /// Open the configured collection. A missing collection is a connection
    /// error, not an empty result: the caller asked for a collection that
    /// was never built.
    pub async fn open_collection(&self) -> Result<Table> {
        let name = &self.config.collection;

        if !self.collection_exists(name).await? {
            return Err(SearchError::Connection(format!(
                "Collection '{}' does not exist in store {}",
                name, self.config.uri
            )));
        }

        self.connection
            .open_table(name)
            .execute()
            .await
            .map_err(|e| {
                SearchError::Connection(format!("Failed to open collection {}: {}", name, e))
            })
    }

    pub async fn count_documents(&self) -> Result<u64> {
        let table = self.open_collection().await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| SearchError::Query(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }

    /// Search the configured collection for the `limit` nearest documents.
    ///
    /// Results are ranked by the collection's distance metric: ascending raw
    /// distance, which is descending similarity score. An empty collection
    /// yields an empty result list.
    pub async fn vector_search(
        &self,
        query_embedding: Vec<f32>,
        limit: usize,
        source_filter: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        let table = self.open_collection().await?;

        info!("Performing vector search with limit {}", limit);

        let mut query = table
            .vector_search(query_embedding)
            .map_err(|e| SearchError::Query(format!("Failed to create vector search: {}", e)))?
            .distance_type(self.config.distance_metric.distance_type())
            .limit(limit);

        if let Some(source) = source_filter {
            let filter = format!("source = '{}'", source.replace('\'', "''"));
            query = query.only_if(&filter);
            debug!("Applied filter: {}", filter);
        }

        let mut results_stream = query
            .execute()
            .await
            .map_err(|e| SearchError::Query(format!("Vector search failed: {}", e)))?;

        let mut search_results = Vec::new();

        while let Some(batch_result) = results_stream.next().await {
            let batch = batch_result
                .map_err(|e| SearchError::Query(format!("Failed to read result batch: {}", e)))?;

            let num_rows = batch.num_rows();

            let ids = string_column(&batch, "id")?;
            let sources = string_column(&batch, "source")?;
            let contents = string_column(&batch, "content")?;
            let metadata_blobs = string_column(&batch, "metadata")?;

            let distances = batch
                .column_by_name("_distance")
                .and_then(|col| col.as_any().downcast_ref::<Float32Array>())
                .ok_or_else(|| {
                    SearchError::Query("Missing '_distance' column in search results".to_string())
                })?;

            for i in 0..num_rows {
                let distance = distances.value(i);
                let score = self.config.distance_metric.score_from_distance(distance);
                let metadata = parse_metadata(metadata_blobs.value(i))?;

                search_results.push(SearchResult::new(
                    ids.value(i).to_string(),
                    sources.value(i).to_string(),
                    contents.value(i).to_string(),
                    metadata,
                    score,
                    distance,
                ));
            }
        }

        info!("Vector search returned {} results", search_results.len());
        Ok(search_results)
    }
}

fn string_column<'a>(
    batch: &'a arrow_array::RecordBatch,
    name: &str,
) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| SearchError::Query(format!("Missing '{}' column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| SearchError::Query(format!("Invalid '{}' column type", name)))
}

fn parse_metadata(blob: &str) -> Result<HashMap<String, String>> {
    if blob.trim().is_empty() {
        return Ok(HashMap::new());
    }

    serde_json::from_str(blob)
        .map_err(|e| SearchError::Query(format!("Invalid metadata blob: {}", e)))
}
