// file: src/utils/validation.rs
// description: input validation utilities and helpers
// reference: input validation patterns

use crate::error::{Result, SearchError};
use std::path::Path;

pub struct Validator;

impl Validator {
    pub fn validate_query(query: &str) -> Result<()> {
        if query.trim().is_empty() {
            return Err(SearchError::Validation(
                "Query must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Reject k = 0 before any embedding or store call is made.
    pub fn validate_limit(limit: usize) -> Result<()> {
        if limit == 0 {
            return Err(SearchError::Validation(
                "Result limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_collection_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(SearchError::Validation(
                "Collection name must not be empty".to_string(),
            ));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(SearchError::Validation(format!(
                "Invalid collection name: {}",
                name
            )));
        }

        Ok(())
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(SearchError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(SearchError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(SearchError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }
}
