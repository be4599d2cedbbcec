use adapter_runtime::{
    EndlessAdapter, EndlessList, RowKind,
    error::{BoxError, FetchError},
};
use async_trait::async_trait;
use std::{
    collections::HashSet,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub page: usize,
}

pub fn create_page(page: usize, size: usize) -> Vec<Entry> {
    (0..size)
        .map(|i| Entry {
            name: format!("Item {i} (page {page})"),
            page,
        })
        .collect()
}

/// Numbered pages, page 0 being the initial items handed to the list.
pub struct PagedFixture {
    page_size: usize,
    short_page: Option<(usize, usize)>,
    failing_pages: Mutex<HashSet<usize>>,
    delay: Duration,
    retry_on_error: bool,
    last_page: AtomicUsize,
    pub loads: AtomicUsize,
    pub errors_seen: AtomicUsize,
}

impl PagedFixture {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            short_page: None,
            failing_pages: Mutex::new(HashSet::new()),
            delay: Duration::ZERO,
            retry_on_error: false,
            last_page: AtomicUsize::new(0),
            loads: AtomicUsize::new(0),
            errors_seen: AtomicUsize::new(0),
        }
    }

    /// Makes `page` return only `len` items.
    pub fn short_at(mut self, page: usize, len: usize) -> Self {
        self.short_page = Some((page, len));
        self
    }

    /// Makes the first load of `page` fail.
    pub fn failing_once_at(self, page: usize) -> Self {
        self.failing_pages.lock().unwrap().insert(page);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn retrying(mut self) -> Self {
        self.retry_on_error = true;
        self
    }

    /// Last page the list appended. Loads ask for the page after it.
    pub fn last_page(&self) -> usize {
        self.last_page.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EndlessAdapter for PagedFixture {
    type Item = Entry;
    type RowHandle = String;

    fn create_row_view(&self, _kind: RowKind) -> String {
        String::new()
    }

    fn bind_row(&self, handle: &mut String, _index: usize, item: &Entry) {
        handle.clone_from(&item.name);
    }

    fn create_placeholder_view(&self) -> String {
        "loading...".to_string()
    }

    async fn load_next_page(&self) -> Result<Vec<Entry>, BoxError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let page = self.last_page.load(Ordering::SeqCst) + 1;
        if self.failing_pages.lock().unwrap().remove(&page) {
            return Err(format!("page {page} unavailable").into());
        }

        let size = match self.short_page {
            Some((short, len)) if short == page => len,
            _ => self.page_size,
        };
        debug!(page, size, "fixture page loaded");
        Ok(create_page(page, size))
    }

    fn on_page_applied(&self, _page: &[Entry]) {
        self.last_page.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, _error: &FetchError) -> bool {
        self.errors_seen.fetch_add(1, Ordering::SeqCst);
        self.retry_on_error
    }
}

/// Binds every row from `first` up to the end of the list, the way a
/// renderer scrolled to the bottom would. Returns whether the placeholder
/// row was bound.
pub fn bind_from(list: &mut EndlessList<PagedFixture>, first: usize) -> bool {
    let mut placeholder_bound = false;
    for index in first..list.row_count() {
        let kind = list.row_kind(index).unwrap();
        let mut view = list.create_row(kind);
        list.bind_row(&mut view, index).unwrap();
        placeholder_bound |= kind == RowKind::Placeholder;
    }
    placeholder_bound
}
