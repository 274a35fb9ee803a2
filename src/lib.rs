// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod database;
pub mod error;
pub mod ingest;
pub mod models;
pub mod utils;

pub use config::{
    Config, DistanceMetric, EmbeddingConfig, IngestConfig, SearchConfig, StoreConfig,
};
pub use database::{
    BatchInserter, InsertStats, OpenAiEmbeddingClient, SchemaManager, VectorStoreClient,
};
pub use error::{Result, SearchError};
pub use ingest::{FileScanner, ScannedFile};
pub use models::{Document, SearchResult};
pub use utils::Validator;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let config = Config::default_config();
        assert_eq!(config.store.distance_metric, DistanceMetric::Dot);
    }
}
