//! Error types for huffpack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("empty input")]
    EmptyInput,

    #[error("extract from empty priority queue")]
    EmptyQueue,

    #[error("symbol {0:#04x} has no code in the table")]
    UnknownSymbol(u8),

    #[error("truncated stream: needed {needed}, got {available}")]
    TruncatedStream { needed: String, available: String },

    #[error("malformed tree: {0}")]
    MalformedTree(String),

    #[error("unsupported symbol {0:?}: outside the 8-bit alphabet")]
    UnsupportedSymbol(char),

    #[error("frequency table counts {counted} symbols but the text has {encoded}")]
    FrequencyMismatch { counted: u64, encoded: u64 },

    #[error("input too large: {size} exceeds limit {limit}")]
    InputTooLarge { size: usize, limit: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl CompressError {
    pub(crate) fn truncated(needed: impl Into<String>, available: impl Into<String>) -> Self {
        CompressError::TruncatedStream {
            needed: needed.into(),
            available: available.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressError>;
