use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the listings pipeline.
///
/// Value coercion failures during normalization are not errors; they are
/// collected as [`crate::data::normalize::CoercionWarning`]s instead.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The dataset file is missing, unreadable or not tabular.
    #[error("Failed to load dataset {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// A column referenced by the pipeline is absent from the dataset.
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// A numeric operation referenced a column holding text.
    #[error("Column {column} is not numeric")]
    NotNumeric { column: String },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ExplorerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_load() {
        let err = ExplorerError::Load {
            path: PathBuf::from("/data/listings.csv"),
            reason: "no such file".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to load dataset"));
        assert!(msg.contains("/data/listings.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_missing_column() {
        let err = ExplorerError::MissingColumn("price".to_string());
        assert_eq!(err.to_string(), "Missing column: price");
    }

    #[test]
    fn test_error_display_not_numeric() {
        let err = ExplorerError::NotNumeric {
            column: "room_type".to_string(),
        };
        assert_eq!(err.to_string(), "Column room_type is not numeric");
    }
}
