//! # Entity Decoder
//!
//! The [`Resource`] trait defines the contract every Redfish resource type
//! (`Certificate`, `CertificateLocations`, …) implements so the generic fetch
//! and resolution code can be written once.
//!
//! Decoding is split in two phases by the resource types themselves:
//!
//! 1. Plain attributes deserialize straight into the record. The shared
//!    [`Entity`] header (`@odata.id`, `Id`, `Name`) is flattened in.
//! 2. The `Links` sub-object deserializes into a private helper whose link
//!    arrays are reduced to bare URIs ([`LinkSet`](crate::LinkSet)) and stored
//!    on the record, outside the plain-attribute set.
//!
//! Nothing here touches the network except [`get_resource`], which fetches,
//! decodes, then attaches the client handle so the resource can follow its
//! own links later.

use crate::client::{Body, ClientHandle};
use crate::error::{DecodeError, RedfishError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};

/// Common header carried by every Redfish resource.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "@odata.id", default)]
    pub odata_id: String,
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Name", default)]
    pub name: String,
    #[serde(skip)]
    client: Option<ClientHandle>,
}

impl Entity {
    /// Attach the client used for later link resolution.
    pub fn set_client(&mut self, client: ClientHandle) {
        self.client = Some(client);
    }

    /// The attached client, or [`RedfishError::Detached`] if there is none.
    pub fn client(&self) -> Result<ClientHandle, RedfishError> {
        self.client.clone().ok_or_else(|| RedfishError::Detached {
            odata_id: self.odata_id.clone(),
        })
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.odata_id == other.odata_id && self.id == other.id && self.name == other.name
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("odata_id", &self.odata_id)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("client", &self.client.as_ref().map(|_| "attached"))
            .finish()
    }
}

/// Trait that any resource type must implement to be fetched and resolved.
pub trait Resource: DeserializeOwned + Send + Sync + 'static {
    fn entity(&self) -> &Entity;

    fn entity_mut(&mut self) -> &mut Entity;

    fn odata_id(&self) -> &str {
        &self.entity().odata_id
    }

    fn set_client(&mut self, client: ClientHandle) {
        self.entity_mut().set_client(client);
    }

    fn client(&self) -> Result<ClientHandle, RedfishError> {
        self.entity().client()
    }
}

/// Decode raw JSON bytes into `T`. No client is attached.
pub fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read `body` to the end and decode it. The body is consumed, and therefore
/// released, whichever way this returns.
pub async fn decode_body<T: DeserializeOwned>(mut body: Body, uri: &str) -> Result<T, RedfishError> {
    let bytes = body.read_all(uri).await?;
    body.close();
    Ok(from_json(&bytes)?)
}

/// Fetch `uri`, decode it as `T` and attach `client` to the result.
#[instrument(skip(client), fields(resource = short_type_name::<T>()))]
pub async fn get_resource<T: Resource>(client: &ClientHandle, uri: &str) -> Result<T, RedfishError> {
    debug!("Sending request");
    let response = client.get(uri).await.map_err(|e| {
        warn!(error = %e, "GET failed");
        e
    })?;

    let mut resource: T = decode_body(response.into_body(), uri).await.map_err(|e| {
        warn!(error = %e, "Decode failed");
        e
    })?;

    resource.set_client(client.clone());
    Ok(resource)
}

/// Last path segment of a type name (`Certificate` rather than `redfish_schema::…::Certificate`).
pub(crate) fn short_type_name<T>() -> &'static str {
    std::any::type_name::<T>()
        .split("::")
        .last()
        .unwrap_or("Unknown")
}
