use thiserror::Error;

/// Top-level error type for an evaluation run
#[derive(Error, Debug)]
pub enum LvpError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    #[error("Failed to write report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to the geometry of a predictor table
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("table must have at least one entry")]
    ZeroEntries,

    #[error("table associativity must be at least one")]
    ZeroAssoc,

    #[error("associativity {assoc} does not divide {entries} entries")]
    AssocDoesNotDivide { entries: usize, assoc: usize },
}

/// Errors related to reading load records from a trace
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("trace must have columns {required:?}, got {found:?}")]
    MissingColumns { required: Vec<String>, found: Vec<String> },

    #[error("malformed record at line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("invalid access width: {0} (expected 1, 2, 4, or 8)")]
    InvalidWidth(u64),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
impl TraceError {
    /// Returns true if this error only affects a single record, and
    /// the rest of the trace can still be used.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Malformed { .. } | Self::InvalidWidth(_))
    }
}

/// Type alias for Result with [LvpError]
pub type LvpResult<T> = Result<T, LvpError>;
