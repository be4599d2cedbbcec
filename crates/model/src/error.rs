use crate::row::RowKind;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PagingError {
    /// A row was queried past the end of the virtual list.
    #[error("Row index {index} is out of range (row count {row_count})")]
    IndexOutOfRange { index: usize, row_count: usize },

    /// A view created for one row kind was bound to a row of the other kind.
    #[error("Row {index} is a {expected} row, but a {actual} view was bound to it")]
    ViewKindMismatch {
        index: usize,
        expected: RowKind,
        actual: RowKind,
    },
}
