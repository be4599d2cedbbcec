use crate::error::{BoxError, FetchError};
use async_trait::async_trait;
use model::row::RowKind;

/// Extension points supplied by the embedding application.
///
/// The row methods run on the main context, the context that owns the
/// [`EndlessList`](crate::list::EndlessList). `load_next_page` runs on a
/// worker task, so any page bookkeeping the implementation keeps (the last
/// loaded page, a cursor) has to tolerate that, typically with atomics.
///
/// The list:
///   * calls `create_row_view` / `create_placeholder_view` when the host asks
///     for a new view of a kind,
///   * calls `bind_row` for every item row the host binds,
///   * calls `load_next_page` each time the placeholder row is bound,
///   * calls `on_page_applied` with every page it actually appends,
///   * and calls `on_error` when a load fails, to decide whether the
///     placeholder row stays.
#[async_trait]
pub trait EndlessAdapter: Send + Sync + 'static {
    type Item: Send + 'static;
    type RowHandle;

    /// Creates a view for an item row.
    fn create_row_view(&self, kind: RowKind) -> Self::RowHandle;

    /// Renders `item`, found at `index`, into `handle`.
    fn bind_row(&self, handle: &mut Self::RowHandle, index: usize, item: &Self::Item);

    /// Creates the view shown while the next page loads.
    fn create_placeholder_view(&self) -> Self::RowHandle;

    /// Loads the page that follows everything loaded so far.
    async fn load_next_page(&self) -> Result<Vec<Self::Item>, BoxError>;

    /// Called on the main context right before `page` is appended. Pages of
    /// superseded fetches never get here, so a page cursor advanced in this
    /// hook skips nothing.
    fn on_page_applied(&self, _page: &[Self::Item]) {}

    /// Returns `true` to keep the placeholder row (and retry on its next
    /// bind), `false` to stop appending. Stops by default.
    fn on_error(&self, _error: &FetchError) -> bool {
        false
    }
}
