// Error types for route listing

use thiserror::Error;

/// Failure to turn a single routing-table line into a `Route`.
///
/// These are line-level errors: the collector logs them and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid destination: {0}")]
    InvalidDestination(String),

    #[error("missing value for keyword: {0}")]
    TruncatedValue(String),

    #[error("empty route line")]
    EmptyLine,
}

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to collect routing table: {0}")]
    CollectionFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Convert error to user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::CollectionFailed(_) => {
                "Failed to read routing table. Make sure iproute2 is installed and `ip route list` works.".to_string()
            }
            AppError::Config(_) => {
                "Configuration error. Check your config file or command-line arguments.".to_string()
            }
            AppError::Io(_) => {
                "File system error. Check permissions and paths.".to_string()
            }
            AppError::Serialization(_) => {
                "Data format error. This might be a bug, please report it.".to_string()
            }
        }
    }

    /// Whether running the same operation again could succeed.
    /// Nothing is retried automatically; the caller decides.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::CollectionFailed(_) | AppError::Io(_))
    }
}
