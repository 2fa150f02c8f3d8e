//! Error types for Praxis operations

/// Result type for Praxis operations
pub type Result<T> = std::result::Result<T, PraxisError>;

/// Error types for the Praxis crate boundary (configuration, serialization, I/O).
///
/// Tool execution surfaces do not use this type; they return
/// [`ToolResult`](crate::tools::ToolResult) so the agent loop never has to
/// unwind through a language-level error.
#[derive(Debug, thiserror::Error)]
pub enum PraxisError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for PraxisError {
    fn from(s: String) -> Self {
        PraxisError::Other(s)
    }
}

impl From<&str> for PraxisError {
    fn from(s: &str) -> Self {
        PraxisError::Other(s.to_string())
    }
}

impl From<anyhow::Error> for PraxisError {
    fn from(err: anyhow::Error) -> Self {
        PraxisError::Other(err.to_string())
    }
}
