use crate::{adapter::EndlessAdapter, error::FetchError};
use futures::FutureExt;
use std::{any::Any, fmt, panic::AssertUnwindSafe, sync::Arc};
use tokio::{runtime::Handle, sync::mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Identity of one fetch. Results are matched to the current fetch by id,
/// never by arrival order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchId(u64);

impl FetchId {
    pub fn get(self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> FetchId {
        FetchId(self.0 + 1)
    }
}

impl fmt::Display for FetchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fetch-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    /// No fetch outstanding.
    Idle,

    /// The given fetch is current and has not settled.
    Fetching(FetchId),
}

/// Result of one fetch, sent from its worker task back to the list.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub id: FetchId,
    pub result: Result<Vec<T>, FetchError>,
}

/// Handle to a running fetch.
///
/// Cancelling is advisory: the worker stops at its next await point, but a
/// load that already finished still reports its result.
#[derive(Debug)]
pub(crate) struct InFlightFetch {
    id: FetchId,
    cancel: CancellationToken,
}

impl InFlightFetch {
    pub(crate) fn id(&self) -> FetchId {
        self.id
    }

    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Spawns a worker task that runs `load_next_page` once and sends the
/// outcome to `outcome_tx`.
pub(crate) fn spawn_fetch<A>(
    runtime: &Handle,
    adapter: Arc<A>,
    id: FetchId,
    outcome_tx: mpsc::UnboundedSender<FetchOutcome<A::Item>>,
) -> InFlightFetch
where
    A: EndlessAdapter,
{
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    runtime.spawn(async move {
        let load = AssertUnwindSafe(adapter.load_next_page()).catch_unwind();

        let result = tokio::select! {
            biased;

            _ = token.cancelled() => Err(FetchError::Cancelled),
            loaded = load => match loaded {
                Ok(Ok(page)) => Ok(page),
                Ok(Err(e)) => Err(FetchError::Failed(e)),
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(fetch_id = %id, panic = %message, "page loader panicked");
                    Err(FetchError::Panicked(message))
                }
            },
        };

        if outcome_tx.send(FetchOutcome { id, result }).is_err() {
            debug!(fetch_id = %id, "list dropped before the fetch settled");
        }
    });

    InFlightFetch { id, cancel }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
