// file: src/database/embeddings.rs
// description: OpenAI API integration for text embeddings
// reference: https://platform.openai.com/docs/api-reference/embeddings

use crate::config::EmbeddingConfig;
use crate::error::{Result, SearchError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct EmbeddingRequest {
    input: Vec<String>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct OpenAiEmbeddingClient {
    client: Client,
    api_key: String,
    model: String,
    dimension: usize,
    api_base: String,
}

impl OpenAiEmbeddingClient {
    pub fn new(api_key: String, model: String, dimension: usize, api_base: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            dimension,
            api_base,
        }
    }

    /// Build a client from configuration. The API key must be present,
    /// either in the config file or as OPENAI_API_KEY in the environment.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            SearchError::Config(
                "No embedding API key configured (set OPENAI_API_KEY)".to_string(),
            )
        })?;

        Ok(Self::new(
            api_key,
            config.model.clone(),
            config.dimension,
            config.api_base.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Embed a single text. A response vector whose length differs from the
    /// configured dimension is an error: it would silently break distance
    /// comparisons against the stored collection.
    pub async fn generate_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embeddings", self.api_base);

        let request = EmbeddingRequest {
            input: vec![text.to_string()],
            model: self.model.clone(),
        };

        debug!("Requesting embedding for {} chars", text.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                SearchError::Embedding(format!("Failed to send embedding request: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Embedding(format!(
                "Embedding request failed with status {}: {}",
                status, error_text
            )));
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            SearchError::Embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        let embedding = embedding_response
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or_else(|| {
                SearchError::Embedding("No embedding data returned from API".to_string())
            })?;

        if embedding.len() != self.dimension {
            return Err(SearchError::Embedding(format!(
                "Embedding dimension mismatch: got {}, expected {}",
                embedding.len(),
                self.dimension
            )));
        }

        debug!("Received embedding of dimension {}", embedding.len());
        Ok(embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_payload_shape() {
        let request = EmbeddingRequest {
            input: vec!["hello".to_string()],
            model: "text-embedding-3-large".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "text-embedding-3-large");
        assert_eq!(value["input"][0], "hello");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"data":[{"embedding":[0.1,0.2,0.3]}]}"#;
        let response: EmbeddingResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.data[0].embedding, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = EmbeddingConfig {
            model: "text-embedding-3-large".to_string(),
            dimension: 3072,
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
        };

        let err = OpenAiEmbeddingClient::from_config(&config).unwrap_err();
        assert!(matches!(err, SearchError::Config(_)));
    }

    #[test]
    fn test_from_config_with_key() {
        let config = EmbeddingConfig {
            model: "text-embedding-3-large".to_string(),
            dimension: 3072,
            api_key: Some("sk-test".to_string()),
            api_base: "https://api.openai.com/v1".to_string(),
        };

        let client = OpenAiEmbeddingClient::from_config(&config).unwrap();
        assert_eq!(client.model(), "text-embedding-3-large");
        assert_eq!(client.dimension(), 3072);
    }
}
