use adapter_runtime::{
    PagingError,
    error::{AdapterError, ConfigError},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid adapter configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build the endless list: {0}")]
    Adapter(#[from] AdapterError),

    #[error("Failed to render a row: {0}")]
    Paging(#[from] PagingError),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
