use adapter_runtime::{EndlessAdapter, EndlessList, PagingError, RowKind, RowView};
use tracing::debug;

/// Fixed-height window over the list's virtual rows.
///
/// Views scrolled off screen go back to a per-kind pool and are rebound
/// instead of recreated.
pub struct Viewport<H> {
    height: usize,
    top: usize,
    visible: Vec<RowView<H>>,
    item_pool: Vec<RowView<H>>,
    placeholder_pool: Vec<RowView<H>>,
}

impl<H> Viewport<H> {
    pub fn new(height: usize) -> Self {
        Self {
            height,
            top: 0,
            visible: Vec::with_capacity(height),
            item_pool: Vec::new(),
            placeholder_pool: Vec::new(),
        }
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn visible(&self) -> &[RowView<H>] {
        &self.visible
    }

    /// Binds every row on screen. Returns whether the placeholder is visible.
    pub fn render<A>(&mut self, list: &mut EndlessList<A>) -> Result<bool, PagingError>
    where
        A: EndlessAdapter<RowHandle = H>,
    {
        for view in self.visible.drain(..) {
            match view.kind() {
                RowKind::Item => self.item_pool.push(view),
                RowKind::Placeholder => self.placeholder_pool.push(view),
            }
        }

        let end = (self.top + self.height).min(list.row_count());
        let mut placeholder_visible = false;
        for index in self.top..end {
            let kind = list.row_kind(index)?;
            let recycled = match kind {
                RowKind::Item => self.item_pool.pop(),
                RowKind::Placeholder => self.placeholder_pool.pop(),
            };
            let mut view = match recycled {
                Some(view) => view,
                None => {
                    debug!(index, kind = %kind, "creating row view");
                    list.create_row(kind)
                }
            };
            list.bind_row(&mut view, index)?;
            placeholder_visible |= kind.is_placeholder();
            self.visible.push(view);
        }
        Ok(placeholder_visible)
    }

    /// Moves down one screen if there are rows below. Returns whether the
    /// window moved.
    pub fn scroll(&mut self, row_count: usize) -> bool {
        if self.top + self.height >= row_count {
            return false;
        }
        self.top += self.height;
        true
    }
}
