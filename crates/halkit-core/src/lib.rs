//! # halkit-core
//!
//! HAL (Hypertext Application Language) resource model and its
//! `application/hal+json` codec.
//!
//! This crate defines:
//! - [`Resource`]: links, embedded resources and free-form properties
//! - [`Link`] and [`RelationSlot`]: single-or-many relation values
//! - [`merge`]: the recursive property merge behind [`Resource::add`]
//! - [`codec`]: encoding and decoding of HAL+JSON documents
//! - [`HalConfig`] and [`NamingPolicy`]: codec settings
//! - Error hierarchy ([`HalError`])
//!
//! ```
//! use halkit_core::{codec, HalConfig, Link, Resource};
//!
//! let mut order = Resource::with_self("/orders/1");
//! order
//!     .add_link("next", Link::new("/orders/2"))?
//!     .add(&serde_json::json!({"total": 30}))?;
//!
//! let text = codec::to_string(&order, &HalConfig::default())?;
//! assert_eq!(
//!     text,
//!     r#"{"_links":{"self":{"href":"/orders/1"},"next":{"href":"/orders/2"}},"total":30}"#
//! );
//! # Ok::<(), halkit_core::HalError>(())
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod factory;
pub mod link;
pub mod merge;
pub mod naming;
pub mod properties;
pub mod relations;
pub mod resource;
pub mod slot;

pub use config::HalConfig;
pub use error::{HalError, RelationKind, Result};
pub use factory::ResourceFactory;
pub use link::Link;
pub use naming::{NameTransform, NamingPolicy};
pub use properties::Properties;
pub use relations::Relations;
pub use resource::Resource;
pub use slot::RelationSlot;

/// Media type of HAL JSON documents.
pub const HAL_JSON_MEDIA_TYPE: &str = "application/hal+json";

/// Reserved key holding link relations.
pub const LINKS: &str = "_links";

/// Reserved key holding embedded resources.
pub const EMBEDDED: &str = "_embedded";

/// Relation of the link pointing at the resource itself.
pub const SELF: &str = "self";

/// Relation holding CURIE templates.
pub const CURIES: &str = "curies";
