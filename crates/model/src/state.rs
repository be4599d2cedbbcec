use crate::{
    change::{ChangeListener, NoopListener},
    error::PagingError,
    row::RowKind,
};
use std::fmt;
use tracing::debug;

/// Loaded items plus the keep-appending flag.
///
/// Row count and row kind are derived from `(items.len(), keep_appending)`
/// on every query. When the flag is set, the placeholder row sits at index
/// `items.len()`, always last.
///
/// Every structural change is reported to the listener as an inserted or
/// removed position range.
pub struct PagingState<T> {
    items: Vec<T>,
    keep_appending: bool,
    listener: Box<dyn ChangeListener>,
}

impl<T> PagingState<T> {
    /// Creates the state with the placeholder row shown.
    pub fn new(items: Vec<T>) -> Self {
        Self::with_keep_appending(items, true)
    }

    pub fn with_keep_appending(items: Vec<T>, keep_appending: bool) -> Self {
        Self {
            items,
            keep_appending,
            listener: Box::new(NoopListener),
        }
    }

    pub fn with_listener(mut self, listener: impl ChangeListener + 'static) -> Self {
        self.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl ChangeListener + 'static) {
        self.listener = Box::new(listener);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of loaded items, excluding the placeholder row.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_keep_appending(&self) -> bool {
        self.keep_appending
    }

    /// Number of virtual rows: loaded items plus the placeholder, if shown.
    pub fn row_count(&self) -> usize {
        if self.keep_appending {
            self.items.len() + 1
        } else {
            self.items.len()
        }
    }

    /// Position of the placeholder row, if it is shown.
    pub fn placeholder_position(&self) -> Option<usize> {
        self.keep_appending.then_some(self.items.len())
    }

    pub fn row_kind(&self, index: usize) -> Result<RowKind, PagingError> {
        let row_count = self.row_count();
        if index >= row_count {
            return Err(PagingError::IndexOutOfRange { index, row_count });
        }

        if self.keep_appending && index == self.items.len() {
            Ok(RowKind::Placeholder)
        } else {
            Ok(RowKind::Item)
        }
    }

    /// Returns the item at `index`, or `None` for the placeholder row.
    pub fn item(&self, index: usize) -> Result<Option<&T>, PagingError> {
        match self.row_kind(index)? {
            RowKind::Placeholder => Ok(None),
            RowKind::Item => Ok(self.items.get(index)),
        }
    }

    /// Appends `new_items` in order and reports them as one inserted range.
    ///
    /// Returns the number of appended items. Appending nothing emits nothing.
    pub fn append_items(&mut self, new_items: impl IntoIterator<Item = T>) -> usize {
        let position = self.items.len();
        self.items.extend(new_items);
        let count = self.items.len() - position;

        if count > 0 {
            debug!(position, count, "items appended");
            self.listener.on_range_inserted(position, count);
        }

        count
    }

    /// Shows or hides the placeholder row.
    ///
    /// Emits a single-row insert or remove at the placeholder position when
    /// the flag flips; setting the current value is a no-op. Returns whether
    /// the flag changed.
    pub fn set_keep_appending(&mut self, keep_appending: bool) -> bool {
        if self.keep_appending == keep_appending {
            return false;
        }

        self.keep_appending = keep_appending;
        let position = self.items.len();
        if keep_appending {
            debug!(position, "placeholder row inserted");
            self.listener.on_range_inserted(position, 1);
        } else {
            debug!(position, "placeholder row removed");
            self.listener.on_range_removed(position, 1);
        }

        true
    }

    pub fn stop_appending(&mut self) -> bool {
        self.set_keep_appending(false)
    }

    pub fn restart_appending(&mut self) -> bool {
        self.set_keep_appending(true)
    }
}

impl<T: fmt::Debug> fmt::Debug for PagingState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagingState")
            .field("items", &self.items)
            .field("keep_appending", &self.keep_appending)
            .finish_non_exhaustive()
    }
}
