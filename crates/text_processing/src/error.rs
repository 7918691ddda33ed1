//! Error types for text processing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Invalid intent patterns: {0}")]
    InvalidPatterns(String),
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;
