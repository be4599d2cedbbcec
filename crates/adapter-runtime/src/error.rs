use model::error::PagingError;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Outcome of a page load that did not produce a page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The adapter's loader returned an error.
    #[error("Failed to load the next page: {0}")]
    Failed(#[source] BoxError),

    /// The adapter's loader panicked on the worker task.
    #[error("Page loader panicked: {0}")]
    Panicked(String),

    /// The fetch was cancelled before its load completed.
    #[error("Fetch was cancelled before it settled")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("items_per_page must be at least 1")]
    ZeroPageSize,

    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value '{value}' for {key}")]
    InvalidEnv { key: String, value: String },
}

/// Top-level error for building and driving an endless list.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Paging error: {0}")]
    Paging(#[from] PagingError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The list was created outside a Tokio runtime and given no handle.
    #[error("No Tokio runtime to run page loads on")]
    NoRuntime,
}
