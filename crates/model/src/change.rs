use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};

/// A structural change of the virtual row list, expressed in row positions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RowChange {
    Inserted { position: usize, count: usize },
    Removed { position: usize, count: usize },
}

/// Receives range notifications from the paging state.
///
/// The rendering layer translates these into its own diffing calls.
pub trait ChangeListener: Send {
    fn on_range_inserted(&mut self, position: usize, count: usize);

    fn on_range_removed(&mut self, position: usize, count: usize);
}

/// Listener that drops every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl ChangeListener for NoopListener {
    fn on_range_inserted(&mut self, _position: usize, _count: usize) {}

    fn on_range_removed(&mut self, _position: usize, _count: usize) {}
}

impl<F> ChangeListener for F
where
    F: FnMut(RowChange) + Send,
{
    fn on_range_inserted(&mut self, position: usize, count: usize) {
        self(RowChange::Inserted { position, count });
    }

    fn on_range_removed(&mut self, position: usize, count: usize) {
        self(RowChange::Removed { position, count });
    }
}

/// Records every change in order.
///
/// Clones share the same log, so one clone can be handed to the paging state
/// while another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct ChangeLog {
    changes: Arc<Mutex<Vec<RowChange>>>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<RowChange> {
        self.lock().clone()
    }

    /// Returns the recorded changes and clears the log.
    pub fn take(&self) -> Vec<RowChange> {
        std::mem::take(&mut *self.lock())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RowChange>> {
        // A poisoned log still holds valid entries.
        self.changes.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChangeListener for ChangeLog {
    fn on_range_inserted(&mut self, position: usize, count: usize) {
        self.lock().push(RowChange::Inserted { position, count });
    }

    fn on_range_removed(&mut self, position: usize, count: usize) {
        self.lock().push(RowChange::Removed { position, count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_log_shares_entries_between_clones() {
        let log = ChangeLog::new();
        let mut writer = log.clone();

        writer.on_range_inserted(0, 3);
        writer.on_range_removed(3, 1);

        assert_eq!(
            log.changes(),
            vec![
                RowChange::Inserted {
                    position: 0,
                    count: 3
                },
                RowChange::Removed {
                    position: 3,
                    count: 1
                },
            ]
        );
        assert_eq!(log.take().len(), 2);
        assert!(log.is_empty());
    }

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |change: RowChange| seen.push(change);
            listener.on_range_inserted(5, 1);
        }
        assert_eq!(
            seen,
            vec![RowChange::Inserted {
                position: 5,
                count: 1
            }]
        );
    }

    #[test]
    fn test_row_change_json_shape() {
        let json = serde_json::to_string(&RowChange::Removed {
            position: 20,
            count: 1,
        })
        .unwrap();
        assert_eq!(json, r#"{"op":"removed","position":20,"count":1}"#);
    }
}
