// file: src/models/document.rs
// description: core document model with content hashing
// reference: internal data structures

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, the sha256 of the content.
    pub id: String,

    /// Origin of the document, typically a relative file path.
    pub source: String,

    /// Document body.
    pub content: String,

    /// Additional metadata keys stored alongside the document.
    pub metadata: HashMap<String, String>,

    /// Unix timestamp of when the document was ingested.
    pub ingested_at: u64,
}

impl Document {
    pub fn new(source: String, content: String) -> Self {
        let id = Self::compute_hash(&content);
        let ingested_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            id,
            source,
            content,
            metadata: HashMap::new(),
            ingested_at,
        }
    }

    fn compute_hash(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_creation() {
        let doc = Document::new(
            "chapter1.txt".to_string(),
            "The letter arrived on a Tuesday.".to_string(),
        );

        assert_eq!(doc.source, "chapter1.txt");
        assert!(!doc.id.is_empty());
        assert!(doc.metadata.is_empty());
    }

    #[test]
    fn test_hash_consistency() {
        let content = "Test content";
        let hash1 = Document::compute_hash(content);
        let hash2 = Document::compute_hash(content);
        assert_eq!(hash1, hash2);
    }

    #[test]
    fn test_hash_differs_by_content() {
        let a = Document::new("a.txt".to_string(), "first".to_string());
        let b = Document::new("a.txt".to_string(), "second".to_string());
        assert_ne!(a.id, b.id);
    }
}
