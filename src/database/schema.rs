// file: src/database/schema.rs
// description: LanceDB schema management for vector collections
// reference: https://docs.rs/lancedb

use crate::database::client::VectorStoreClient;
use crate::error::Result;
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;
use tracing::{info, warn};

pub struct SchemaManager<'a> {
    client: &'a VectorStoreClient,
}

impl<'a> SchemaManager<'a> {
    pub fn new(client: &'a VectorStoreClient) -> Self {
        Self { client }
    }

    pub async fn verify_collection(&self) -> Result<bool> {
        let name = self.client.collection_name();

        if !self.client.collection_exists(name).await? {
            warn!("Collection '{}' does not exist", name);
            return Ok(false);
        }

        info!("Collection '{}' exists", name);
        Ok(true)
    }

    /// Arrow schema for collection rows. The embedding column is a
    /// fixed-size list whose width must match the configured model
    /// dimension.
    pub fn collection_schema(embedding_dim: usize) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("source", DataType::Utf8, false),
            Field::new("content", DataType::Utf8, false),
            // Arbitrary metadata keys, serialized as a JSON object
            Field::new("metadata", DataType::Utf8, false),
            Field::new("ingested_at", DataType::UInt64, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, true)),
                    embedding_dim as i32,
                ),
                false,
            ),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema = SchemaManager::collection_schema(3072);
        assert_eq!(schema.fields().len(), 6);

        let embedding_field = schema.field_with_name("embedding").unwrap();
        assert!(matches!(
            embedding_field.data_type(),
            DataType::FixedSizeList(_, 3072)
        ));
    }

    #[test]
    fn test_schema_column_names() {
        let schema = SchemaManager::collection_schema(8);
        for name in ["id", "source", "content", "metadata", "ingested_at"] {
            assert!(schema.field_with_name(name).is_ok(), "missing column {}", name);
        }
    }
}
