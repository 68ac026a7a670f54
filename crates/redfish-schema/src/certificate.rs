//! # Certificate
//!
//! A certificate installed on the service, as referenced from
//! [`CertificateLocations`](crate::CertificateLocations).

use redfish_framework::{redfish_resource, Entity};
use serde::{Deserialize, Serialize};

/// Format of `CertificateString`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CertificateType {
    #[serde(rename = "PEM")]
    Pem,
    #[serde(rename = "PEMchain")]
    PemChain,
    #[serde(rename = "PKCS7")]
    Pkcs7,
    #[serde(other)]
    Unknown,
}

/// Distinguished name of a certificate's issuer or subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Identifier {
    pub city: Option<String>,
    pub common_name: Option<String>,
    pub country: Option<String>,
    pub email: Option<String>,
    pub organization: Option<String>,
    pub organizational_unit: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Certificate {
    #[serde(flatten)]
    pub entity: Entity,
    #[serde(rename = "@odata.type", default)]
    pub odata_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub certificate_string: String,
    #[serde(default)]
    pub certificate_type: Option<CertificateType>,
    #[serde(default)]
    pub issuer: Option<Identifier>,
    #[serde(default)]
    pub subject: Option<Identifier>,
    /// RFC 3339 timestamp, kept as sent.
    #[serde(default)]
    pub valid_not_before: String,
    #[serde(default)]
    pub valid_not_after: String,
    #[serde(default)]
    pub key_usage: Vec<String>,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub fingerprint: String,
    #[serde(default)]
    pub fingerprint_hash_algorithm: String,
}

redfish_resource!(Certificate, certificate);

impl Certificate {
    /// Subject common name, if the service reported one.
    pub fn common_name(&self) -> Option<&str> {
        self.subject.as_ref()?.common_name.as_deref()
    }
}
