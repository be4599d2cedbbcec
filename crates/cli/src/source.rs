use adapter_runtime::{
    EndlessAdapter, RowKind,
    error::{BoxError, FetchError},
};
use async_trait::async_trait;
use std::{
    fmt,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageItem {
    pub label: String,
    pub page: usize,
}

/// One line of terminal output standing in for a row view.
#[derive(Debug, Clone, Default)]
pub struct TerminalRow {
    text: String,
}

impl fmt::Display for TerminalRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Synthetic data source producing `"Item {i} (page {p})"` rows.
///
/// Page 0 is handed to the list up front; every load returns the page after
/// the last one the list appended, so a superseded load never skips a page.
/// The short page comes back one item short, which ends appending.
pub struct NumberedPages {
    page_size: usize,
    delay: Duration,
    short_page: usize,
    fail_on_page: Mutex<Option<usize>>,
    retry_on_error: bool,
    last_page: AtomicUsize,
}

impl NumberedPages {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            delay: Duration::from_secs(1),
            short_page: 10,
            fail_on_page: Mutex::new(None),
            retry_on_error: false,
            last_page: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_short_page(mut self, page: usize) -> Self {
        self.short_page = page;
        self
    }

    /// The first load of `page` fails, later ones succeed.
    pub fn failing_once_at(self, page: Option<usize>) -> Self {
        if let Ok(mut slot) = self.fail_on_page.lock() {
            *slot = page;
        }
        self
    }

    pub fn retry_on_error(mut self, retry: bool) -> Self {
        self.retry_on_error = retry;
        self
    }

    pub fn first_page(&self) -> Vec<PageItem> {
        self.page(0, self.page_size)
    }

    fn page(&self, page: usize, size: usize) -> Vec<PageItem> {
        (0..size)
            .map(|i| PageItem {
                label: format!("Item {i} (page {page})"),
                page,
            })
            .collect()
    }

    fn take_failure(&self, page: usize) -> bool {
        match self.fail_on_page.lock() {
            Ok(mut slot) if *slot == Some(page) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl EndlessAdapter for NumberedPages {
    type Item = PageItem;
    type RowHandle = TerminalRow;

    fn create_row_view(&self, _kind: RowKind) -> TerminalRow {
        TerminalRow::default()
    }

    fn bind_row(&self, handle: &mut TerminalRow, index: usize, item: &PageItem) {
        handle.text = format!("{index:>6}  {}", item.label);
    }

    fn create_placeholder_view(&self) -> TerminalRow {
        TerminalRow {
            text: format!("{:>6}  ... loading ...", ""),
        }
    }

    async fn load_next_page(&self) -> Result<Vec<PageItem>, BoxError> {
        tokio::time::sleep(self.delay).await;

        let page = self.last_page.load(Ordering::SeqCst) + 1;
        if self.take_failure(page) {
            return Err(format!("page {page} could not be loaded").into());
        }

        let size = if page == self.short_page {
            self.page_size.saturating_sub(1)
        } else {
            self.page_size
        };
        debug!(page, size, "loaded demo page");
        Ok(self.page(page, size))
    }

    fn on_page_applied(&self, _page: &[PageItem]) {
        self.last_page.fetch_add(1, Ordering::SeqCst);
    }

    fn on_error(&self, error: &FetchError) -> bool {
        warn!(error = %error, retry = self.retry_on_error, "demo page load failed");
        self.retry_on_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_page_is_one_item_short() {
        let source = NumberedPages::new(4)
            .with_delay(Duration::ZERO)
            .with_short_page(2);

        assert_eq!(source.first_page().len(), 4);
        let page = source.load_next_page().await.unwrap();
        assert_eq!(page.len(), 4);
        source.on_page_applied(&page);

        let short = source.load_next_page().await.unwrap();
        assert_eq!(short.len(), 3);
        assert_eq!(short[2].label, "Item 2 (page 2)");
    }

    #[tokio::test]
    async fn test_failing_page_fails_once() {
        let source = NumberedPages::new(2)
            .with_delay(Duration::ZERO)
            .failing_once_at(Some(1));

        assert!(source.load_next_page().await.is_err());
        let page = source.load_next_page().await.unwrap();
        assert_eq!(page[0].page, 1);
    }

    #[tokio::test]
    async fn test_discarded_load_does_not_advance_the_cursor() {
        let source = NumberedPages::new(2).with_delay(Duration::ZERO);

        // A load whose page is never applied leaves the cursor in place.
        let discarded = source.load_next_page().await.unwrap();
        assert_eq!(discarded[0].page, 1);

        let page = source.load_next_page().await.unwrap();
        assert_eq!(page[0].page, 1);
        source.on_page_applied(&page);
        assert_eq!(source.load_next_page().await.unwrap()[0].page, 2);
    }
}
