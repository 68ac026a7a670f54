//! # Certificate Inventory
//!
//! Connects to the Redfish service named by `REDFISH_ENDPOINT` (see
//! [`ClientConfig::from_env`]), walks
//! `CertificateService → CertificateLocations → Certificates` and logs every
//! certificate found. Certificates that cannot be read are logged with their
//! URI; the rest are still listed.
//!
//! ```bash
//! REDFISH_ENDPOINT=https://10.0.0.5 REDFISH_USERNAME=root REDFISH_PASSWORD=... \
//!     REDFISH_INSECURE=1 RUST_LOG=info cargo run --bin redfish-certificates
//! ```
//!
//! An optional first argument overrides the certificate service URI.

use redfish_framework::tracing::setup_tracing;
use redfish_framework::{ClientConfig, HttpClient};
use redfish_schema::{get_certificate_service, CERTIFICATE_SERVICE_URI};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ClientConfig::from_env().map_err(|e| e.to_string())?;
    info!(endpoint = %config.endpoint, "Connecting");
    let client = HttpClient::connect(config).map_err(|e| e.to_string())?;

    let service_uri = std::env::args()
        .nth(1)
        .unwrap_or_else(|| CERTIFICATE_SERVICE_URI.to_string());

    let span = tracing::info_span!("certificate_inventory");
    async {
        let service = get_certificate_service(&client, &service_uri)
            .await
            .map_err(|e| e.to_string())?;

        let Some(locations) = service
            .certificate_locations()
            .await
            .map_err(|e| e.to_string())?
        else {
            info!("Service exposes no certificate locations");
            return Ok(());
        };

        let resolved = locations.certificates().await;
        for cert in &resolved.items {
            info!(
                uri = %cert.entity.odata_id,
                subject = cert.common_name().unwrap_or("-"),
                valid_not_after = %cert.valid_not_after,
                "Certificate"
            );
        }
        if let Some(failures) = resolved.error() {
            for (uri, e) in failures.iter() {
                error!(uri = %uri, error = %e, "Certificate unavailable");
            }
        }

        info!(
            found = resolved.items.len(),
            declared = ?locations.certificates_count(),
            "Inventory complete"
        );
        Ok(())
    }
    .instrument(span)
    .await
}
