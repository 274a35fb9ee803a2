// file: src/ingest/mod.rs
// description: ingestion module exports
// reference: internal module structure

pub mod scanner;

pub use scanner::{FileScanner, ScannedFile};
