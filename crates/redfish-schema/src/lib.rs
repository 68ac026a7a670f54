//! # Redfish Certificate Resources
//!
//! Typed resources for the certificate part of the Redfish schema, built on
//! [`redfish_framework`].
//!
//! - [`CertificateService`]: entry point, links to the locations list.
//! - [`CertificateLocations`]: links to every installed [`Certificate`].
//! - [`Certificate`]: one installed certificate.
//!
//! Each type comes with `get_*` and `list_referenced_*` helpers, e.g.
//! [`get_certificate_locations`] and [`list_referenced_certificate`].

pub mod certificate;
pub mod certificate_locations;
pub mod certificate_service;

pub use certificate::{get_certificate, list_referenced_certificate, Certificate, CertificateType, Identifier};
pub use certificate_locations::{
    get_certificate_locations, list_referenced_certificate_locations, CertificateLocations,
};
pub use certificate_service::{
    get_certificate_service, list_referenced_certificate_service, CertificateService,
    CERTIFICATE_SERVICE_URI,
};
