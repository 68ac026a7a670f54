//! # Links
//!
//! Redfish references other resources with `{"@odata.id": "<uri>"}` objects,
//! grouped into arrays under a resource's `Links` object and paired with a
//! sibling `<Name>@odata.count`. These types hold the bare URIs once decoded.

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};

/// A single reference to another resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

impl Link {
    pub fn new(odata_id: impl Into<String>) -> Self {
        Self {
            odata_id: odata_id.into(),
        }
    }
}

impl From<Link> for String {
    fn from(link: Link) -> Self {
        link.odata_id
    }
}

/// Ordered URIs extracted from one link array, plus the count the service declared.
///
/// The declared count is kept as sent. Use [`LinkSet::check_count`] to detect a
/// service that disagrees with itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    uris: Vec<String>,
    declared_count: Option<usize>,
}

impl LinkSet {
    pub fn new(uris: Vec<String>, declared_count: Option<usize>) -> Self {
        Self {
            uris,
            declared_count,
        }
    }

    /// Builds a set from a decoded link array. A missing or `null` array is empty.
    pub fn from_links(links: Option<Vec<Link>>, declared_count: Option<usize>) -> Self {
        let uris = links
            .unwrap_or_default()
            .into_iter()
            .map(String::from)
            .collect();
        Self::new(uris, declared_count)
    }

    pub fn uris(&self) -> &[String] {
        &self.uris
    }

    pub fn len(&self) -> usize {
        self.uris.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uris.is_empty()
    }

    pub fn declared_count(&self) -> Option<usize> {
        self.declared_count
    }

    /// Fails when a declared count is present and differs from the URI count.
    pub fn check_count(&self, name: &str) -> Result<(), DecodeError> {
        match self.declared_count {
            Some(declared) if declared != self.uris.len() => Err(DecodeError::CountMismatch {
                name: name.to_string(),
                declared,
                actual: self.uris.len(),
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_array_becomes_bare_uris() {
        let links: Vec<Link> = serde_json::from_str(
            r#"[{"@odata.id": "/redfish/v1/a"}, {"@odata.id": "/redfish/v1/b"}]"#,
        )
        .unwrap();
        let set = LinkSet::from_links(Some(links), Some(2));

        assert_eq!(set.uris(), ["/redfish/v1/a", "/redfish/v1/b"]);
        assert!(set.check_count("Certificates").is_ok());
    }

    #[test]
    fn test_missing_array_is_empty() {
        let set = LinkSet::from_links(None, None);
        assert!(set.is_empty());
        assert!(set.check_count("Certificates").is_ok());
    }

    #[test]
    fn test_count_mismatch_is_reported() {
        let set = LinkSet::new(vec!["/a".into()], Some(3));
        match set.check_count("Certificates") {
            Err(DecodeError::CountMismatch {
                name,
                declared,
                actual,
            }) => {
                assert_eq!(name, "Certificates");
                assert_eq!(declared, 3);
                assert_eq!(actual, 1);
            }
            other => panic!("Expected CountMismatch, got {:?}", other),
        }
    }
}
