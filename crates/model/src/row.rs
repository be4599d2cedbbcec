use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer view type reported for rows backed by a loaded item.
pub const VIEW_TYPE_ITEM: u32 = 0;

/// Integer view type reported for the trailing placeholder row.
pub const VIEW_TYPE_PLACEHOLDER: u32 = 1;

/// Kind of a virtual row.
///
/// Never stored: it is derived per index from the loaded length and the
/// keep-appending flag.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// Row backed by a loaded item.
    Item,

    /// Trailing "loading more" row, not backed by any item.
    Placeholder,
}

impl RowKind {
    pub fn view_type(self) -> u32 {
        match self {
            RowKind::Item => VIEW_TYPE_ITEM,
            RowKind::Placeholder => VIEW_TYPE_PLACEHOLDER,
        }
    }

    pub fn from_view_type(view_type: u32) -> Option<Self> {
        match view_type {
            VIEW_TYPE_ITEM => Some(RowKind::Item),
            VIEW_TYPE_PLACEHOLDER => Some(RowKind::Placeholder),
            _ => None,
        }
    }

    pub fn is_placeholder(self) -> bool {
        self == RowKind::Placeholder
    }
}

impl fmt::Display for RowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKind::Item => write!(f, "item"),
            RowKind::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// A caller-owned view created for one row kind.
///
/// Placeholder views carry no per-index data, so a host may keep one and
/// rebind it wherever the placeholder row shows up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowView<H> {
    Item(H),
    Placeholder(H),
}

impl<H> RowView<H> {
    pub fn kind(&self) -> RowKind {
        match self {
            RowView::Item(_) => RowKind::Item,
            RowView::Placeholder(_) => RowKind::Placeholder,
        }
    }

    pub fn handle(&self) -> &H {
        match self {
            RowView::Item(handle) | RowView::Placeholder(handle) => handle,
        }
    }

    pub fn handle_mut(&mut self) -> &mut H {
        match self {
            RowView::Item(handle) | RowView::Placeholder(handle) => handle,
        }
    }

    pub fn into_handle(self) -> H {
        match self {
            RowView::Item(handle) | RowView::Placeholder(handle) => handle,
        }
    }
}
