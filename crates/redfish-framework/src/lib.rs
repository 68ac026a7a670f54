//! # Redfish Framework
//!
//! This crate provides the building blocks for typed Redfish clients: decoding
//! JSON resources into structs, and following the links between them,
//! concurrently, without letting one bad member sink a whole batch.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Transport Layer** ([`Client`]) - `GET uri` → owned [`Response`] body.
//!    [`HttpClient`] in production, [`mock::MockClient`] in tests.
//! 2. **Entity Layer** ([`Resource`], [`Entity`], [`LinkSet`]) - decode one
//!    document, keep its links as bare URIs, remember the client.
//! 3. **Resolution Layer** ([`resolve_links`], [`list_referenced`]) - fan out
//!    one fetch task per URI, gather over a channel, return a [`Resolved`].
//!
//! ## Core Abstractions
//!
//! ### [`Resource`] - The Typed Record
//!
//! Implement it (or let [`redfish_resource!`] do it) for every resource type:
//!
//! ```rust
//! use redfish_framework::{from_json, redfish_resource, Entity, Link, LinkSet};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! #[serde(from = "RawChassis")]
//! pub struct Chassis {
//!     pub entity: Entity,
//!     pub model: String,
//!     pub drives: LinkSet,
//! }
//!
//! #[derive(Deserialize)]
//! struct RawChassis {
//!     #[serde(flatten)]
//!     entity: Entity,
//!     #[serde(rename = "Model", default)]
//!     model: String,
//!     #[serde(rename = "Links", default)]
//!     links: RawChassisLinks,
//! }
//!
//! #[derive(Default, Deserialize)]
//! struct RawChassisLinks {
//!     #[serde(rename = "Drives")]
//!     drives: Option<Vec<Link>>,
//!     #[serde(rename = "Drives@odata.count")]
//!     drives_count: Option<usize>,
//! }
//!
//! impl From<RawChassis> for Chassis {
//!     fn from(raw: RawChassis) -> Self {
//!         Self {
//!             entity: raw.entity,
//!             model: raw.model,
//!             drives: LinkSet::from_links(raw.links.drives, raw.links.drives_count),
//!         }
//!     }
//! }
//!
//! redfish_resource!(Chassis, chassis);
//!
//! let chassis: Chassis = from_json(br#"{
//!     "@odata.id": "/redfish/v1/Chassis/1", "Id": "1", "Model": "R750",
//!     "Links": { "Drives": [{"@odata.id": "/redfish/v1/Chassis/1/Drives/0"}],
//!                "Drives@odata.count": 1 }
//! }"#).unwrap();
//! assert_eq!(chassis.drives.uris(), ["/redfish/v1/Chassis/1/Drives/0"]);
//! ```
//!
//! ### [`Resolved`] - Partial Success Is Still Success
//!
//! A batch never fails as a whole. It returns every decoded item together with
//! a [`CollectionError`] mapping each failed URI to its own error. An empty
//! `CollectionError` means nothing failed.
//!
//! ## Concurrency Model
//!
//! - One Tokio task per linked URI; no bound on fan-out
//! - A single aggregator drains results from one channel in completion order
//! - Only the aggregator touches the failure map (no locks)
//! - No cancellation: every launched fetch reports before the call returns
//!
//! ## Testing
//!
//! [`mock::MockClient`] scripts a service URI by URI and tracks requests,
//! concurrency and body release. See the [`mock`] module.

pub mod client;
pub mod collection;
pub mod entity;
pub mod error;
pub mod http;
pub mod link;
pub mod macros;
pub mod mock;
pub mod resolver;
pub mod tracing;

#[doc(hidden)]
pub use paste;

// Re-export core types for convenience
pub use client::{Body, Client, ClientHandle, Response};
pub use collection::{collect_collection, collect_list, get_collection, Collection};
pub use entity::{decode_body, from_json, get_resource, Entity, Resource};
pub use error::{CollectionError, DecodeError, RedfishError, TransportError};
pub use http::{ClientConfig, HttpClient};
pub use link::{Link, LinkSet};
pub use resolver::{list_referenced, resolve_links, Resolved};
