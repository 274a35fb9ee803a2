// file: src/models/search_result.rs
// description: Search result model with similarity scores
// reference: Used for vector similarity search results

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Document ID (content hash)
    pub id: String,

    /// Origin of the document, e.g. "chapter1.txt"
    pub source: String,

    /// Document content
    pub content: String,

    /// Metadata stored with the document. Always contains the "source" key
    /// when the collection was ingested with one.
    pub metadata: HashMap<String, String>,

    /// Similarity score (higher is more similar under the configured metric)
    pub score: f32,

    /// Raw distance as reported by the store (lower is more similar)
    pub distance: f32,
}

impl SearchResult {
    pub fn new(
        id: String,
        source: String,
        content: String,
        mut metadata: HashMap<String, String>,
        score: f32,
        distance: f32,
    ) -> Self {
        metadata.insert("source".to_string(), source.clone());

        Self {
            id,
            source,
            content,
            metadata,
            score,
            distance,
        }
    }

    /// Format one result as a display block: index, source, score to four
    /// decimal places, then the document body.
    pub fn format_block(&self, index: usize) -> String {
        format!(
            "=== Result {} ===\nSource: {}\nScore: {:.4}\nContent: {}",
            index, self.source, self.score, self.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_result_creation() {
        let result = SearchResult::new(
            "abc123".to_string(),
            "chapter1.txt".to_string(),
            "Test content".to_string(),
            HashMap::new(),
            0.95,
            -0.95,
        );

        assert_eq!(result.score, 0.95);
        assert_eq!(result.distance, -0.95);
        assert_eq!(result.metadata.get("source").unwrap(), "chapter1.txt");
    }

    #[test]
    fn test_metadata_keys_survive() {
        let mut metadata = HashMap::new();
        metadata.insert("chapter".to_string(), "1".to_string());

        let result = SearchResult::new(
            "abc123".to_string(),
            "chapter1.txt".to_string(),
            "Test content".to_string(),
            metadata,
            0.5,
            -0.5,
        );

        assert_eq!(result.metadata.get("chapter").unwrap(), "1");
        assert_eq!(result.metadata.get("source").unwrap(), "chapter1.txt");
    }

    #[test]
    fn test_format_block() {
        let result = SearchResult::new(
            "abc123".to_string(),
            "docs/readme.md".to_string(),
            "This is the document body".to_string(),
            HashMap::new(),
            0.87,
            -0.87,
        );

        let block = result.format_block(1);
        assert!(block.contains("=== Result 1 ==="));
        assert!(block.contains("Source: docs/readme.md"));
        assert!(block.contains("Score: 0.8700"));
        assert!(block.contains("This is the document body"));
    }
}
