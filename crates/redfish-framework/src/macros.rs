//! # Resource Declaration
//!
//! [`redfish_resource!`](crate::redfish_resource) implements
//! [`Resource`](crate::Resource) for a struct with an `entity: Entity` field
//! and declares the per-type fetch helpers:
//!
//! - `get_<name>(client, uri) -> Result<T, RedfishError>`
//! - `list_referenced_<name>(client, link) -> Resolved<T>`
//!
//! ```rust
//! use redfish_framework::{redfish_resource, Entity};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Fan {
//!     #[serde(flatten)]
//!     pub entity: Entity,
//!     #[serde(rename = "Reading", default)]
//!     pub reading: u32,
//! }
//!
//! redfish_resource!(Fan, fan);
//!
//! // Declared: get_fan(&client, uri) and list_referenced_fan(&client, link)
//! ```

/// Implements [`Resource`](crate::Resource) for `$ty` and declares
/// `get_$name` / `list_referenced_$name`.
#[macro_export]
macro_rules! redfish_resource {
    ($ty:ident, $name:ident) => {
        impl $crate::Resource for $ty {
            fn entity(&self) -> &$crate::Entity {
                &self.entity
            }

            fn entity_mut(&mut self) -> &mut $crate::Entity {
                &mut self.entity
            }
        }

        $crate::paste::paste! {
            #[doc = "Fetch one [`" $ty "`] from the service and attach `client` to it."]
            pub async fn [<get_ $name>](
                client: &$crate::ClientHandle,
                uri: &str,
            ) -> ::std::result::Result<$ty, $crate::RedfishError> {
                $crate::get_resource::<$ty>(client, uri).await
            }

            #[doc = "Resolve every [`" $ty "`] member of the collection at `link`."]
            pub async fn [<list_referenced_ $name>](
                client: &$crate::ClientHandle,
                link: &str,
            ) -> $crate::Resolved<$ty> {
                $crate::list_referenced::<$ty>(client, link).await
            }
        }
    };
}
