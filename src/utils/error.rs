// src/utils/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Report not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read report {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Report {} is {size} bytes, above the {limit} byte limit", .path.display())]
    InputTooLarge {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("Pattern error: {0}")]
    Pattern(String),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Data processing failed: {0}")]
    Processing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_path() {
        let err = ExtractError::NotFound(PathBuf::from("missing/report.tex"));
        assert_eq!(err.to_string(), "Report not found: missing/report.tex");
    }

    #[test]
    fn test_app_error_wraps_extract_error() {
        let err: AppError = ExtractError::Pattern("bad".to_string()).into();
        assert!(matches!(err, AppError::Extraction(ExtractError::Pattern(_))));
        assert_eq!(err.to_string(), "Extraction failed: Pattern error: bad");
    }
}
