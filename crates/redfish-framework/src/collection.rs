//! # Collection Expansion
//!
//! A Redfish collection enumerates its members as `Members` links, and may
//! split them across pages chained with `Members@odata.nextLink`.
//!
//! [`get_collection`] follows the chain and returns every member URI.
//! [`collect_list`] then runs a caller-supplied fetch callback once per distinct
//! member, each in its own task, and returns once all of them have finished.
//! A task that panics or is cancelled is handed back to the caller together
//! with its URI, so no member goes unaccounted for.

use crate::client::ClientHandle;
use crate::entity::decode_body;
use crate::error::{DecodeError, RedfishError};
use crate::link::{Link, LinkSet};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, instrument};

/// One page of a collection document.
#[derive(Debug, Deserialize)]
struct CollectionPage {
    #[serde(rename = "@odata.id", default)]
    odata_id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Members", default)]
    members: Option<Vec<Link>>,
    #[serde(rename = "Members@odata.count", default)]
    count: Option<usize>,
    #[serde(rename = "Members@odata.nextLink", default)]
    next_link: Option<String>,
}

/// A fully expanded collection.
///
/// `members` holds the URIs of every page in order; its declared count is the
/// one reported by the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collection {
    pub odata_id: String,
    pub name: String,
    pub members: LinkSet,
}

/// Fetch the collection at `uri`, following `Members@odata.nextLink` to the last page.
#[instrument(skip(client))]
pub async fn get_collection(client: &ClientHandle, uri: &str) -> Result<Collection, RedfishError> {
    let mut visited = HashSet::new();
    let mut next = Some(uri.to_string());
    let mut collection: Option<Collection> = None;
    let mut uris = Vec::new();
    let mut declared_count = None;

    while let Some(page_uri) = next.take() {
        if !visited.insert(page_uri.clone()) {
            return Err(DecodeError::PaginationLoop(page_uri).into());
        }

        let response = client.get(&page_uri).await?;
        let page: CollectionPage = decode_body(response.into_body(), &page_uri).await?;
        debug!(page = %page_uri, members = page.members.as_ref().map_or(0, Vec::len), "Page read");

        if collection.is_none() {
            declared_count = page.count;
            collection = Some(Collection {
                odata_id: page.odata_id,
                name: page.name,
                members: LinkSet::default(),
            });
        }
        uris.extend(page.members.unwrap_or_default().into_iter().map(String::from));
        next = page.next_link.filter(|link| !link.is_empty());
    }

    let mut collection = collection.unwrap_or_default();
    collection.members = LinkSet::new(uris, declared_count);
    Ok(collection)
}

/// Expand the collection at `link` and invoke `get` once per member URI.
///
/// Returns only after every invocation has completed. An error means the
/// collection itself could not be read; no member was fetched in that case.
/// `Ok` holds the members whose callback did not run to completion, see
/// [`collect_collection`].
pub async fn collect_list<F, Fut>(
    get: F,
    client: &ClientHandle,
    link: &str,
) -> Result<Vec<(String, JoinError)>, RedfishError>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let collection = get_collection(client, link).await?;
    Ok(collect_collection(get, collection.members.uris()).await)
}

/// Run `get` for every distinct URI in `links` concurrently, one task per URI,
/// and wait for all of them.
///
/// Repeated URIs run once, at their first position. Returns the URIs whose
/// task panicked or was cancelled, with the join error.
pub async fn collect_collection<F, Fut>(get: F, links: &[String]) -> Vec<(String, JoinError)>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut tasks = JoinSet::new();
    let mut pending = HashMap::new();
    for link in unique(links) {
        let handle = tasks.spawn(get(link.clone()));
        pending.insert(handle.id(), link);
    }

    let mut unfinished = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let Err(e) = joined else { continue };
        match pending.remove(&e.id()) {
            Some(link) => {
                error!(uri = %link, error = %e, "Fetch task did not complete");
                unfinished.push((link, e));
            }
            None => error!(error = %e, "Unknown fetch task did not complete"),
        }
    }
    unfinished
}

/// `uris` without repeats, first occurrence kept.
pub(crate) fn unique(uris: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    uris.iter()
        .filter(|uri| seen.insert(uri.as_str()))
        .cloned()
        .collect()
}
