use thiserror::Error;

/// Errors raised by the loading and analysis pipeline.
#[derive(Error, Debug)]
pub enum TuningError {
    /// The source is missing a required key, or a value has the wrong shape.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An option string (`stat`, `kind`, `group_by`) was not recognized.
    #[error("invalid {option}: '{value}' (expected {expected})")]
    InvalidOption {
        option: &'static str,
        value: String,
        expected: &'static str,
    },

    /// Two curves that must be index-aligned have different lengths.
    #[error("inconsistent curve length: expected {expected}, found {found}")]
    InconsistentLength { expected: usize, found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
}

pub type Result<T> = std::result::Result<T, TuningError>;

impl TuningError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        TuningError::MalformedInput(msg.into())
    }
}
