use crate::{
    adapter::EndlessAdapter,
    config::AdapterConfig,
    error::AdapterError,
    fetch::{FetchId, FetchOutcome, FetchState, InFlightFetch, spawn_fetch},
    metrics::FetchMetrics,
};
use model::{
    change::ChangeListener,
    error::PagingError,
    row::{RowKind, RowView},
    state::PagingState,
};
use std::sync::Arc;
use tokio::{runtime::Handle, sync::mpsc};
use tracing::{debug, info, warn};

/// What applying one fetch outcome did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The current fetch delivered a page and it was appended.
    Appended {
        id: FetchId,
        count: usize,
        keep_appending: bool,
    },

    /// The current fetch failed; `keep_appending` is the adapter's decision.
    Failed { id: FetchId, keep_appending: bool },

    /// The outcome belonged to a superseded or released fetch and was dropped.
    Stale { id: FetchId },
}

/// A paged list with a trailing placeholder row that loads the next page
/// whenever the placeholder is bound.
///
/// The value itself is the main context: every state change, every
/// notification and every applied fetch result happens through `&mut self`.
/// Page loads run on Tokio worker tasks and their results wait in a channel
/// until [`process_completions`](Self::process_completions) or
/// [`next_completion`](Self::next_completion) applies them.
pub struct EndlessList<A: EndlessAdapter> {
    adapter: Arc<A>,
    state: PagingState<A::Item>,
    items_per_page: usize,
    runtime: Handle,

    // Single-flight bookkeeping
    in_flight: Option<InFlightFetch>,
    last_fetch_id: FetchId,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome<A::Item>>,
    outcome_rx: mpsc::UnboundedReceiver<FetchOutcome<A::Item>>,

    metrics: FetchMetrics,
}

impl<A: EndlessAdapter> EndlessList<A> {
    /// Creates a list with the default page size and the placeholder shown.
    ///
    /// Fetches run on the Tokio runtime the list is created in; fails with
    /// [`AdapterError::NoRuntime`] outside of one.
    pub fn new(adapter: A, items: Vec<A::Item>) -> Result<Self, AdapterError> {
        Self::with_config(adapter, AdapterConfig::default(), items)
    }

    pub fn with_config(
        adapter: A,
        config: AdapterConfig,
        items: Vec<A::Item>,
    ) -> Result<Self, AdapterError> {
        Self::from_shared(Arc::new(adapter), config, items)
    }

    /// Like [`with_config`](Self::with_config), for an adapter the caller
    /// keeps a handle to.
    pub fn from_shared(
        adapter: Arc<A>,
        config: AdapterConfig,
        items: Vec<A::Item>,
    ) -> Result<Self, AdapterError> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| AdapterError::NoRuntime)?;
        Ok(Self::build(adapter, config, items, runtime))
    }

    /// Creates a list whose fetches run on `runtime`.
    ///
    /// The list itself can then be driven from any thread, including one that
    /// is not part of the runtime.
    pub fn with_runtime(
        adapter: A,
        config: AdapterConfig,
        items: Vec<A::Item>,
        runtime: Handle,
    ) -> Result<Self, AdapterError> {
        config.validate()?;
        Ok(Self::build(Arc::new(adapter), config, items, runtime))
    }

    fn build(
        adapter: Arc<A>,
        config: AdapterConfig,
        items: Vec<A::Item>,
        runtime: Handle,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            adapter,
            state: PagingState::with_keep_appending(items, config.keep_appending),
            items_per_page: config.items_per_page,
            runtime,
            in_flight: None,
            last_fetch_id: FetchId::default(),
            outcome_tx,
            outcome_rx,
            metrics: FetchMetrics::new(),
        }
    }

    pub fn with_listener(mut self, listener: impl ChangeListener + 'static) -> Self {
        self.state.set_listener(listener);
        self
    }

    pub fn set_listener(&mut self, listener: impl ChangeListener + 'static) {
        self.state.set_listener(listener);
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn metrics(&self) -> &FetchMetrics {
        &self.metrics
    }

    pub fn row_count(&self) -> usize {
        self.state.row_count()
    }

    pub fn row_kind(&self, index: usize) -> Result<RowKind, PagingError> {
        self.state.row_kind(index)
    }

    /// Returns the item at `index`, or `None` for the placeholder row.
    pub fn item(&self, index: usize) -> Result<Option<&A::Item>, PagingError> {
        self.state.item(index)
    }

    pub fn items(&self) -> &[A::Item] {
        self.state.items()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn is_keep_appending(&self) -> bool {
        self.state.is_keep_appending()
    }

    pub fn append_items(&mut self, items: impl IntoIterator<Item = A::Item>) -> usize {
        self.state.append_items(items)
    }

    pub fn set_keep_appending(&mut self, keep_appending: bool) -> bool {
        self.state.set_keep_appending(keep_appending)
    }

    pub fn stop_appending(&mut self) -> bool {
        self.state.stop_appending()
    }

    pub fn restart_appending(&mut self) -> bool {
        self.state.restart_appending()
    }

    /// Creates a new view for rows of `kind`.
    pub fn create_row(&self, kind: RowKind) -> RowView<A::RowHandle> {
        match kind {
            RowKind::Placeholder => RowView::Placeholder(self.adapter.create_placeholder_view()),
            RowKind::Item => RowView::Item(self.adapter.create_row_view(kind)),
        }
    }

    /// Binds `view` to the row at `index`.
    ///
    /// Binding the placeholder row starts a fetch, superseding any fetch
    /// still in flight. Item rows are handed to the adapter with their item.
    /// Works from any thread: the fetch is spawned on the runtime captured
    /// when the list was built.
    pub fn bind_row(
        &mut self,
        view: &mut RowView<A::RowHandle>,
        index: usize,
    ) -> Result<(), PagingError> {
        let expected = self.state.row_kind(index)?;
        if view.kind() != expected {
            return Err(PagingError::ViewKindMismatch {
                index,
                expected,
                actual: view.kind(),
            });
        }

        match view {
            RowView::Placeholder(_) => {
                self.request_next_page();
            }
            RowView::Item(handle) => {
                if let Some(item) = self.state.item(index)? {
                    self.adapter.bind_row(handle, index, item);
                }
            }
        }

        Ok(())
    }

    /// Starts loading the next page.
    ///
    /// Any fetch still in flight is cancelled and its eventual result will
    /// be discarded, even if it was about to settle. The placeholder row is
    /// shown while the new fetch runs. The fetch runs on the list's runtime
    /// whether or not the caller is inside one.
    pub fn request_next_page(&mut self) -> FetchId {
        if let Some(previous) = &self.in_flight {
            debug!(fetch_id = %previous.id(), "superseding in-flight fetch");
            previous.cancel();
            self.metrics.increment_superseded();
        }

        self.state.set_keep_appending(true);

        let id = self.last_fetch_id.next();
        self.last_fetch_id = id;
        let fetch = spawn_fetch(
            &self.runtime,
            Arc::clone(&self.adapter),
            id,
            self.outcome_tx.clone(),
        );
        self.in_flight = Some(fetch);
        self.metrics.increment_started();

        info!(fetch_id = %id, loaded = self.state.len(), "requesting next page");
        id
    }

    pub fn fetch_state(&self) -> FetchState {
        match &self.in_flight {
            Some(fetch) => FetchState::Fetching(fetch.id()),
            None => FetchState::Idle,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Cancels and releases the in-flight fetch. Its result, if it still
    /// arrives, is discarded. The paging state is left untouched.
    pub fn cancel_pending_fetch(&mut self) -> Option<FetchId> {
        let fetch = self.in_flight.take()?;
        fetch.cancel();
        debug!(fetch_id = %fetch.id(), "released in-flight fetch");
        Some(fetch.id())
    }

    /// Applies every fetch outcome that has already arrived, without waiting.
    pub fn process_completions(&mut self) -> Vec<Settlement> {
        let mut settled = Vec::new();
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            settled.push(self.apply_outcome(outcome));
        }
        settled
    }

    /// Waits for the next fetch outcome and applies it.
    ///
    /// Returns `None` when nothing is queued and no fetch is in flight.
    pub async fn next_completion(&mut self) -> Option<Settlement> {
        if let Ok(outcome) = self.outcome_rx.try_recv() {
            return Some(self.apply_outcome(outcome));
        }

        if self.in_flight.is_none() {
            return None;
        }
        let outcome = self.outcome_rx.recv().await?;
        Some(self.apply_outcome(outcome))
    }

    /// Waits until the current fetch settles, skipping stale outcomes.
    pub async fn settle(&mut self) -> Option<Settlement> {
        while let Some(settlement) = self.next_completion().await {
            if !matches!(settlement, Settlement::Stale { .. }) {
                return Some(settlement);
            }
        }
        None
    }

    pub(crate) fn apply_outcome(&mut self, outcome: FetchOutcome<A::Item>) -> Settlement {
        let FetchOutcome { id, result } = outcome;

        let is_current = self.in_flight.as_ref().is_some_and(|fetch| fetch.id() == id);
        if !is_current {
            debug!(fetch_id = %id, "discarding stale fetch result");
            self.metrics.increment_stale();
            return Settlement::Stale { id };
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                self.adapter.on_page_applied(&page);
                let count = self.state.append_items(page);
                let keep_appending = count >= self.items_per_page;
                self.state.set_keep_appending(keep_appending);
                self.metrics.record_page(count as u64);

                info!(
                    fetch_id = %id,
                    count,
                    keep_appending,
                    loaded = self.state.len(),
                    "page appended"
                );
                Settlement::Appended {
                    id,
                    count,
                    keep_appending,
                }
            }
            Err(error) => {
                self.metrics.increment_failures();
                let keep_appending = self.adapter.on_error(&error);
                self.state.set_keep_appending(keep_appending);

                warn!(
                    fetch_id = %id,
                    error = %error,
                    keep_appending,
                    "failed to load next page"
                );
                Settlement::Failed { id, keep_appending }
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn outcome_sender(&self) -> mpsc::UnboundedSender<FetchOutcome<A::Item>> {
        self.outcome_tx.clone()
    }
}

impl<A: EndlessAdapter> Drop for EndlessList<A> {
    fn drop(&mut self) {
        if let Some(fetch) = self.in_flight.take() {
            fetch.cancel();
        }
    }
}
