// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{Result, SearchError};
use dotenvy::dotenv;
use lancedb::DistanceType;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub store: StoreConfig,
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
    pub ingest: IngestConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    pub uri: String,
    pub collection: String,
    pub distance_metric: DistanceMetric,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub limit: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    pub skip_patterns: Vec<String>,
    pub max_file_size_mb: usize,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Distance metric keyword for a collection. The keyword must match the
/// metric the collection was built with; scores are only comparable within
/// a single metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DistanceMetric {
    /// Inner product ("ip"). The store reports the negated dot product as
    /// the distance, so lower distance still means more similar.
    Dot,
    Cosine,
    L2,
}

impl DistanceMetric {
    pub fn parse(keyword: &str) -> Result<Self> {
        match keyword {
            "ip" | "dot" | "inner_product" => Ok(DistanceMetric::Dot),
            "cosine" => Ok(DistanceMetric::Cosine),
            "l2" => Ok(DistanceMetric::L2),
            other => Err(SearchError::Config(format!(
                "Unknown distance metric '{}' (expected ip, cosine, or l2)",
                other
            ))),
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            DistanceMetric::Dot => "ip",
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::L2 => "l2",
        }
    }

    pub fn distance_type(&self) -> DistanceType {
        match self {
            DistanceMetric::Dot => DistanceType::Dot,
            DistanceMetric::Cosine => DistanceType::Cosine,
            DistanceMetric::L2 => DistanceType::L2,
        }
    }

    /// Convert the store's raw distance into a similarity score. Each
    /// conversion is monotone decreasing in distance, so ranking by
    /// ascending distance and by descending score agree.
    pub fn score_from_distance(&self, distance: f32) -> f32 {
        match self {
            DistanceMetric::Dot => -distance,
            DistanceMetric::Cosine => 1.0 - distance,
            DistanceMetric::L2 => 1.0 / (1.0 + distance),
        }
    }
}

impl TryFrom<String> for DistanceMetric {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DistanceMetric> for String {
    fn from(metric: DistanceMetric) -> Self {
        metric.keyword().to_string()
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("SEMSEARCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        let mut config: Config = settings
            .try_deserialize()
            .map_err(|e| SearchError::Config(e.to_string()))?;

        if config.embedding.api_key.is_none() {
            config.embedding.api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            store: StoreConfig {
                uri: "data/lancedb".to_string(),
                collection: "mycollection_200".to_string(),
                distance_metric: DistanceMetric::Dot,
            },
            embedding: EmbeddingConfig {
                model: "text-embedding-3-large".to_string(),
                dimension: 3072,
                api_key: std::env::var("OPENAI_API_KEY").ok(),
                api_base: default_api_base(),
            },
            search: SearchConfig { limit: 4 },
            ingest: IngestConfig {
                skip_patterns: vec![".git/*".to_string(), "*.zip".to_string()],
                max_file_size_mb: 10,
            },
        }
    }

    fn validate(&self) -> Result<()> {
        if self.store.collection.trim().is_empty() {
            return Err(SearchError::Config(
                "collection name must not be empty".to_string(),
            ));
        }

        if self.embedding.dimension == 0 {
            return Err(SearchError::Config(
                "embedding dimension must be greater than 0".to_string(),
            ));
        }

        if self.search.limit == 0 {
            return Err(SearchError::Config(
                "search limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_metric_keywords() {
        assert_eq!(DistanceMetric::parse("ip").unwrap(), DistanceMetric::Dot);
        assert_eq!(DistanceMetric::parse("dot").unwrap(), DistanceMetric::Dot);
        assert_eq!(
            DistanceMetric::parse("inner_product").unwrap(),
            DistanceMetric::Dot
        );
        assert_eq!(
            DistanceMetric::parse("cosine").unwrap(),
            DistanceMetric::Cosine
        );
        assert_eq!(DistanceMetric::parse("l2").unwrap(), DistanceMetric::L2);
        assert!(DistanceMetric::parse("hamming").is_err());
    }

    #[test]
    fn test_metric_keyword_roundtrip() {
        for metric in [
            DistanceMetric::Dot,
            DistanceMetric::Cosine,
            DistanceMetric::L2,
        ] {
            assert_eq!(DistanceMetric::parse(metric.keyword()).unwrap(), metric);
        }
    }

    #[test]
    fn test_score_from_distance() {
        assert_eq!(DistanceMetric::Dot.score_from_distance(-0.75), 0.75);
        assert_eq!(DistanceMetric::Cosine.score_from_distance(0.25), 0.75);
        assert_eq!(DistanceMetric::L2.score_from_distance(0.0), 1.0);
        assert_eq!(DistanceMetric::L2.score_from_distance(1.0), 0.5);
    }

    #[test]
    fn test_score_ordering_matches_distance_ordering() {
        for metric in [
            DistanceMetric::Dot,
            DistanceMetric::Cosine,
            DistanceMetric::L2,
        ] {
            let near = metric.score_from_distance(0.1);
            let far = metric.score_from_distance(0.9);
            assert!(
                near > far,
                "score must decrease with distance for {:?}",
                metric
            );
        }
    }

    #[test]
    fn test_default_config_validates() {
        assert!(Config::default_config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_limit() {
        let mut config = Config::default_config();
        config.search.limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_collection() {
        let mut config = Config::default_config();
        config.store.collection = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
