// file: src/ingest/scanner.rs
// description: Directory walking and file discovery with filtering
// reference: https://docs.rs/walkdir

use crate::config::IngestConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct FileScanner {
    config: IngestConfig,
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub relative_path: String,
    pub size: u64,
}

impl FileScanner {
    pub fn new(config: IngestConfig) -> Self {
        Self { config }
    }

    pub fn scan_directory(&self, root: &Path) -> Result<Vec<ScannedFile>> {
        info!("Scanning directory: {}", root.display());
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();

            if self.should_skip(path) {
                debug!("Skipping file: {}", path.display());
                continue;
            }

            if Self::is_text_file(path)
                && let Ok(metadata) = entry.metadata()
            {
                let size = metadata.len();
                let max_size = (self.config.max_file_size_mb * 1024 * 1024) as u64;

                if size > max_size {
                    debug!(
                        "Skipping large file ({} MB): {}",
                        size / 1024 / 1024,
                        path.display()
                    );
                    continue;
                }

                let relative_path = path
                    .strip_prefix(root)
                    .unwrap_or(path)
                    .to_string_lossy()
                    .to_string();

                files.push(ScannedFile {
                    path: path.to_path_buf(),
                    relative_path,
                    size,
                });
            }
        }

        info!("Found {} text files", files.len());
        Ok(files)
    }

    fn is_text_file(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("txt") | Some("md") | Some("markdown")
        )
    }

    fn should_skip(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.config.skip_patterns {
            if pattern.contains('*') {
                let pattern_without_star = pattern.replace("*.", ".");
                if path_str.ends_with(&pattern_without_star) {
                    return true;
                }
            } else if path_str.contains(pattern) {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config() -> IngestConfig {
        IngestConfig {
            skip_patterns: vec![],
            max_file_size_mb: 10,
        }
    }

    #[test]
    fn test_scan_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("chapter1.txt"), "The letter arrived.").unwrap();
        fs::write(temp.path().join("notes.md"), "# Notes").unwrap();
        fs::write(temp.path().join("image.png"), [0u8; 4]).unwrap();

        let scanner = FileScanner::new(test_config());
        let mut files = scanner.scan_directory(temp.path()).unwrap();
        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].relative_path, "chapter1.txt");
        assert_eq!(files[1].relative_path, "notes.md");
    }

    #[test]
    fn test_skip_patterns() {
        let config = IngestConfig {
            skip_patterns: vec!["*.zip".to_string(), ".git/*".to_string()],
            max_file_size_mb: 10,
        };

        let scanner = FileScanner::new(config);

        assert!(scanner.should_skip(Path::new("test.zip")));
        assert!(scanner.should_skip(Path::new(".git/config")));
        assert!(!scanner.should_skip(Path::new("test.md")));
    }

    #[test]
    fn test_size_cap() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("big.txt"), vec![b'a'; 2 * 1024 * 1024]).unwrap();

        let config = IngestConfig {
            skip_patterns: vec![],
            max_file_size_mb: 1,
        };

        let scanner = FileScanner::new(config);
        let files = scanner.scan_directory(temp.path()).unwrap();
        assert!(files.is_empty());
    }
}
