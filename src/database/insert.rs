// file: src/database/insert.rs
// description: LanceDB insertion operations with vector embeddings
// reference: https://docs.rs/lancedb

use crate::database::client::VectorStoreClient;
use crate::database::embeddings::OpenAiEmbeddingClient;
use crate::database::schema::SchemaManager;
use crate::error::{Result, SearchError};
use crate::models::Document;
use arrow_array::{
    FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray, UInt64Array,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct BatchInserter<'a> {
    client: &'a VectorStoreClient,
    embedder: &'a OpenAiEmbeddingClient,
}

#[derive(Debug, Clone, Default)]
pub struct InsertStats {
    pub documents_inserted: usize,
    pub errors: usize,
}

impl<'a> BatchInserter<'a> {
    pub fn new(client: &'a VectorStoreClient, embedder: &'a OpenAiEmbeddingClient) -> Self {
        Self { client, embedder }
    }

    /// Embed a document's content and insert it into the configured
    /// collection, creating the collection on first insert.
    pub async fn insert_document(&self, document: &Document) -> Result<String> {
        let schema = SchemaManager::collection_schema(self.embedder.dimension());

        let embedding = self.embedder.generate_embedding(&document.content).await?;

        let record_batch =
            Self::create_record_batch(schema.clone(), vec![document.clone()], vec![embedding])?;

        let collection = self.client.collection_name();

        if !self.client.collection_exists(collection).await? {
            self.client
                .get_connection()
                .create_table(
                    collection,
                    RecordBatchIterator::new(vec![Ok(record_batch)], schema.clone()),
                )
                .execute()
                .await
                .map_err(|e| {
                    SearchError::Query(format!("Failed to create collection: {}", e))
                })?;
            info!("Created new collection: {}", collection);
        } else {
            let table = self.client.open_collection().await?;
            table
                .add(RecordBatchIterator::new(vec![Ok(record_batch)], schema))
                .execute()
                .await
                .map_err(|e| {
                    SearchError::Query(format!("Failed to insert document: {}", e))
                })?;
        }

        debug!("Inserted document: {}", document.source);
        Ok(document.id.clone())
    }

    /// Create an Arrow RecordBatch from documents and embeddings
    fn create_record_batch(
        schema: Arc<arrow_schema::Schema>,
        documents: Vec<Document>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<RecordBatch> {
        let ids: StringArray = documents.iter().map(|doc| Some(doc.id.clone())).collect();

        let sources: StringArray = documents
            .iter()
            .map(|doc| Some(doc.source.clone()))
            .collect();

        let contents: StringArray = documents
            .iter()
            .map(|doc| Some(doc.content.clone()))
            .collect();

        let metadata_blobs = documents
            .iter()
            .map(|doc| {
                serde_json::to_string(&doc.metadata)
                    .map(Some)
                    .map_err(|e| {
                        SearchError::Query(format!("Failed to serialize metadata: {}", e))
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        let metadata: StringArray = metadata_blobs.into_iter().collect();

        let ingested_ats: UInt64Array = documents
            .iter()
            .map(|doc| Some(doc.ingested_at))
            .collect();

        let embedding_values: Float32Array = embeddings
            .iter()
            .flat_map(|emb| emb.iter().copied())
            .collect();

        let embedding_list = FixedSizeListArray::try_new_from_values(
            embedding_values,
            embeddings[0].len() as i32,
        )
        .map_err(|e| SearchError::Query(format!("Failed to create embedding array: {}", e)))?;

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(ids),
                Arc::new(sources),
                Arc::new(contents),
                Arc::new(metadata),
                Arc::new(ingested_ats),
                Arc::new(embedding_list),
            ],
        )
        .map_err(|e| SearchError::Query(format!("Failed to create record batch: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_stats_default() {
        let stats = InsertStats::default();
        assert_eq!(stats.documents_inserted, 0);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_create_record_batch() {
        let schema = SchemaManager::collection_schema(4);
        let document = Document::new("chapter1.txt".to_string(), "Some text".to_string());
        let embedding = vec![0.1, 0.2, 0.3, 0.4];

        let batch =
            BatchInserter::create_record_batch(schema, vec![document], vec![embedding]).unwrap();

        assert_eq!(batch.num_rows(), 1);
        assert_eq!(batch.num_columns(), 6);
    }
}
