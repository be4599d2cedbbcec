pub mod adapter;
pub mod config;
pub mod error;
pub mod fetch;
pub mod list;
pub mod metrics;

#[cfg(test)]
mod tests;

pub use adapter::EndlessAdapter;
pub use config::{AdapterConfig, DEFAULT_ITEMS_PER_PAGE};
pub use list::{EndlessList, Settlement};
pub use model::{
    change::{ChangeListener, ChangeLog, RowChange},
    error::PagingError,
    row::{RowKind, RowView},
};
