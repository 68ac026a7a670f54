//! # Collection Resolver
//!
//! Resolves a set of linked resources while completing as much work as
//! possible under partial failure.
//!
//! Two entry points share one aggregation path:
//!
//! - [`resolve_links`] takes URIs the caller already holds (typically a
//!   resource's [`LinkSet`](crate::LinkSet)).
//! - [`list_referenced`] takes a single collection URI, expands it through
//!   [`collect_list`] and resolves every member.
//!
//! ## Concurrency Model
//!
//! One task is spawned per distinct member URI. Every task reports exactly once
//! over a single `mpsc` channel, and one aggregating future drains that channel in
//! completion order until it closes. The channel closes when the last sender
//! is dropped, which happens only after the expansion step has run and every
//! fetch task has reported. A task that panics cannot report for itself; its
//! URI is sent on its behalf as [`RedfishError::Incomplete`]. Only the
//! aggregator writes the
//! [`CollectionError`], so the failure map is never shared between tasks.
//!
//! There is no bound on fan-out and no cancellation: once launched, each fetch
//! runs to completion before the call returns.
//!
//! Output order is completion order. Do not rely on it matching input order.

use crate::client::ClientHandle;
use crate::collection::{collect_collection, collect_list, unique};
use crate::entity::{get_resource, short_type_name, Resource};
use crate::error::{CollectionError, RedfishError};
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

/// Outcome of a batch fetch: every success plus every failure, keyed by URI.
///
/// Each attempted URI appears exactly once, either in `items` or in `failures`.
#[derive(Debug)]
pub struct Resolved<T> {
    pub items: Vec<T>,
    pub failures: CollectionError,
}

impl<T> Default for Resolved<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: CollectionError::new(),
        }
    }
}

impl<T> Resolved<T> {
    /// A batch where every URI failed because the owning resource had no client.
    pub fn detached(uris: &[String], odata_id: &str) -> Self {
        Self {
            items: Vec::new(),
            failures: unique(uris)
                .into_iter()
                .map(|uri| {
                    let err = RedfishError::Detached {
                        odata_id: odata_id.to_string(),
                    };
                    (uri, err)
                })
                .collect(),
        }
    }

    /// True when nothing failed.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// The aggregate error, or `None` when it is empty.
    pub fn error(&self) -> Option<&CollectionError> {
        if self.failures.is_empty() {
            None
        } else {
            Some(&self.failures)
        }
    }

    /// Splits into the successes and the aggregate error (`None` when empty).
    pub fn into_parts(self) -> (Vec<T>, Option<CollectionError>) {
        let error = if self.failures.is_empty() {
            None
        } else {
            Some(self.failures)
        };
        (self.items, error)
    }

    /// All-or-nothing view: the items if nothing failed, the aggregate error otherwise.
    pub fn into_result(self) -> Result<Vec<T>, CollectionError> {
        match self.into_parts() {
            (items, None) => Ok(items),
            (_, Some(error)) => Err(error),
        }
    }
}

/// What one fetch task reports back to the aggregator.
struct GetResult<T> {
    link: String,
    outcome: Result<T, RedfishError>,
}

/// Fetch every URI in `uris` as `T`, concurrently.
///
/// Duplicate URIs are fetched once. An empty slice returns immediately
/// without any request.
#[instrument(skip(client, uris), fields(resource = short_type_name::<T>(), count = uris.len()))]
pub async fn resolve_links<T: Resource>(client: &ClientHandle, uris: &[String]) -> Resolved<T> {
    if uris.is_empty() {
        return Resolved::default();
    }

    let (tx, rx) = mpsc::unbounded_channel::<GetResult<T>>();
    let incomplete_tx = tx.clone();
    let get = {
        let client = client.clone();
        move |link: String| {
            let client = client.clone();
            let tx = tx.clone();
            async move {
                let outcome = get_resource::<T>(&client, &link).await;
                let _ = tx.send(GetResult { link, outcome });
            }
        }
    };

    // The last sender is dropped once every task is joined and the stragglers are filed.
    let producer = async move {
        let unfinished = collect_collection(get, uris).await;
        send_incomplete(&incomplete_tx, unfinished);
    };
    let ((), resolved) = tokio::join!(producer, gather(rx));
    report(&resolved);
    resolved
}

/// Expand the collection at `link` and fetch every member as `T`, concurrently.
///
/// An empty `link` returns immediately without any request. If the collection
/// itself cannot be read, that one failure is filed under `link`.
#[instrument(skip(client), fields(resource = short_type_name::<T>()))]
pub async fn list_referenced<T: Resource>(client: &ClientHandle, link: &str) -> Resolved<T> {
    if link.is_empty() {
        return Resolved::default();
    }

    let (tx, rx) = mpsc::unbounded_channel::<GetResult<T>>();
    let expansion_tx = tx.clone();
    let get = {
        let client = client.clone();
        move |member: String| {
            let client = client.clone();
            let tx = tx.clone();
            async move {
                let outcome = get_resource::<T>(&client, &member).await;
                let _ = tx.send(GetResult {
                    link: member,
                    outcome,
                });
            }
        }
    };

    let producer = async move {
        match collect_list(get, client, link).await {
            Ok(unfinished) => send_incomplete(&expansion_tx, unfinished),
            Err(e) => {
                let _ = expansion_tx.send(GetResult {
                    link: link.to_string(),
                    outcome: Err(e),
                });
            }
        }
    };
    let ((), resolved) = tokio::join!(producer, gather(rx));
    report(&resolved);
    resolved
}

/// Report members whose fetch task died before sending its own result.
fn send_incomplete<T>(tx: &mpsc::UnboundedSender<GetResult<T>>, unfinished: Vec<(String, JoinError)>) {
    for (link, e) in unfinished {
        let _ = tx.send(GetResult {
            link,
            outcome: Err(RedfishError::Incomplete {
                message: e.to_string(),
            }),
        });
    }
}

/// Drain `rx` until every sender is gone, splitting successes from failures.
async fn gather<T>(mut rx: mpsc::UnboundedReceiver<GetResult<T>>) -> Resolved<T> {
    let mut resolved = Resolved::default();
    while let Some(GetResult { link, outcome }) = rx.recv().await {
        match outcome {
            Ok(item) => {
                debug!(uri = %link, "Fetched");
                resolved.items.push(item);
            }
            Err(e) => {
                warn!(uri = %link, error = %e, "Fetch failed");
                resolved.failures.insert(link, e);
            }
        }
    }
    resolved
}

fn report<T>(resolved: &Resolved<T>) {
    if resolved.is_complete() {
        info!(fetched = resolved.items.len(), "Resolved");
    } else {
        warn!(
            fetched = resolved.items.len(),
            failed = resolved.failures.len(),
            "Resolved with failures"
        );
    }
}
