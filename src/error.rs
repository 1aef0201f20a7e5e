use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for purchaser operations
#[derive(Error, Diagnostic, Debug)]
pub enum PurchaserError {
    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(purchaser::io))]
    Io { path: PathBuf, message: String },

    #[error("Parse error: {message}")]
    #[diagnostic(code(purchaser::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Table is missing required columns: {}", .missing.join(", "))]
    #[diagnostic(code(purchaser::schema))]
    Schema {
        missing: Vec<String>,
        #[help]
        help: Option<String>,
    },

    #[error("Image error with {path}: {message}")]
    #[diagnostic(code(purchaser::image))]
    Image { path: PathBuf, message: String },

    #[error("Encode error: {message}")]
    #[diagnostic(code(purchaser::encode))]
    Encode { message: String },

    #[error("Config error: {message}")]
    #[diagnostic(code(purchaser::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl PurchaserError {
    /// Schema error listing the columns that were found alongside the missing ones.
    pub fn missing_columns(missing: Vec<String>, found: &[String]) -> Self {
        PurchaserError::Schema {
            missing,
            help: Some(format!(
                "Expected template, id, cars, ttd_len and layout columns; found: {}",
                found.join(", ")
            )),
        }
    }
}

pub type Result<T> = std::result::Result<T, PurchaserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_names_missing_columns() {
        let err = PurchaserError::missing_columns(
            vec!["layout".to_string()],
            &["id".to_string(), "cars".to_string()],
        );
        assert_eq!(err.to_string(), "Table is missing required columns: layout");
        match err {
            PurchaserError::Schema { help, .. } => {
                assert!(help.unwrap().ends_with("found: id, cars"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_image_error_includes_path() {
        let err = PurchaserError::Image {
            path: PathBuf::from("1x/loco_8bpp.png"),
            message: "not an indexed image".to_string(),
        };
        assert!(err.to_string().contains("1x/loco_8bpp.png"));
    }
}
