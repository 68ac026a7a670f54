//! # Certificate Service
//!
//! Entry point for certificate management. Its `CertificateLocations`
//! navigation property leads to the list of installed certificates.

use crate::certificate_locations::CertificateLocations;
use redfish_framework::{get_resource, redfish_resource, Entity, Link, RedfishError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Well-known location of the service.
pub const CERTIFICATE_SERVICE_URI: &str = "/redfish/v1/CertificateService";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateService {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "@odata.type", default)]
    pub odata_type: String,
    #[serde(rename = "Description", default)]
    pub description: String,
    #[serde(rename = "CertificateLocations", default, skip_serializing_if = "Option::is_none")]
    pub certificate_locations: Option<Link>,
}

redfish_resource!(CertificateService, certificate_service);

impl CertificateService {
    /// Follow the `CertificateLocations` link. `Ok(None)` when the service has none.
    #[instrument(skip(self), fields(odata_id = %self.entity.odata_id))]
    pub async fn certificate_locations(&self) -> Result<Option<CertificateLocations>, RedfishError> {
        let Some(link) = &self.certificate_locations else {
            debug!("No CertificateLocations link");
            return Ok(None);
        };
        let client = self.entity.client()?;
        get_resource(&client, &link.odata_id).await.map(Some)
    }
}
