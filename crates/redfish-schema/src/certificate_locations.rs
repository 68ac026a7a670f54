//! # Certificate Locations
//!
//! Lists where every certificate installed on the service lives. The
//! resource carries no certificates itself, only links to them under
//! `Links.Certificates`, which [`CertificateLocations::certificates`]
//! resolves on demand.

use crate::certificate::Certificate;
use redfish_framework::{redfish_resource, resolve_links, Entity, Link, LinkSet, Resolved};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCertificateLocations")]
pub struct CertificateLocations {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "@odata.context")]
    pub odata_context: String,
    #[serde(rename = "@odata.etag")]
    pub odata_etag: String,
    #[serde(rename = "@odata.type")]
    pub odata_type: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(skip)]
    certificates: LinkSet,
}

/// Wire shape: plain attributes plus the `Links` object.
#[derive(Deserialize)]
struct RawCertificateLocations {
    #[serde(flatten)]
    entity: Entity,
    #[serde(rename = "@odata.context", default)]
    odata_context: String,
    #[serde(rename = "@odata.etag", default)]
    odata_etag: String,
    #[serde(rename = "@odata.type", default)]
    odata_type: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Links", default)]
    links: RawLinks,
}

#[derive(Default, Deserialize)]
struct RawLinks {
    #[serde(rename = "Certificates", default)]
    certificates: Option<Vec<Link>>,
    #[serde(rename = "Certificates@odata.count", default)]
    certificates_count: Option<usize>,
}

impl From<RawCertificateLocations> for CertificateLocations {
    fn from(raw: RawCertificateLocations) -> Self {
        let certificates =
            LinkSet::from_links(raw.links.certificates, raw.links.certificates_count);
        if let Err(e) = certificates.check_count("Certificates") {
            warn!(odata_id = %raw.entity.odata_id, error = %e, "Link count mismatch");
        }

        Self {
            entity: raw.entity,
            odata_context: raw.odata_context,
            odata_etag: raw.odata_etag,
            odata_type: raw.odata_type,
            description: raw.description,
            certificates,
        }
    }
}

redfish_resource!(CertificateLocations, certificate_locations);

impl CertificateLocations {
    /// URIs of the installed certificates, with the count the service declared.
    pub fn certificate_links(&self) -> &LinkSet {
        &self.certificates
    }

    /// `Certificates@odata.count` as sent by the service.
    pub fn certificates_count(&self) -> Option<usize> {
        self.certificates.declared_count()
    }

    /// Fetch every linked certificate.
    ///
    /// Certificates that fail to load are reported in the returned
    /// [`Resolved::failures`], keyed by URI, next to those that loaded.
    #[instrument(skip(self), fields(odata_id = %self.entity.odata_id))]
    pub async fn certificates(&self) -> Resolved<Certificate> {
        match self.entity.client() {
            Ok(client) => resolve_links(&client, self.certificates.uris()).await,
            Err(_) => Resolved::detached(self.certificates.uris(), &self.entity.odata_id),
        }
    }
}
