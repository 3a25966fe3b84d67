//! Resource factory bound to one codec configuration.

use crate::codec;
use crate::config::HalConfig;
use crate::error::Result;
use crate::resource::Resource;

/// Creates resources and encodes/decodes them with a shared [`HalConfig`],
/// so a service configures naming and layout in one place.
#[derive(Debug, Clone, Default)]
pub struct ResourceFactory {
    config: HalConfig,
}

impl ResourceFactory {
    #[must_use]
    pub fn new(config: HalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HalConfig {
        &self.config
    }

    /// An empty resource.
    #[must_use]
    pub fn create(&self) -> Resource {
        Resource::new()
    }

    /// A resource with a `self` link to `href`.
    #[must_use]
    pub fn create_with_self(&self, href: impl Into<String>) -> Resource {
        Resource::with_self(href)
    }

    /// Encode with this factory's config.
    ///
    /// # Errors
    ///
    /// See [`codec::serialize`].
    pub fn serialize(&self, resource: &Resource) -> Result<Vec<u8>> {
        codec::serialize(resource, &self.config)
    }

    /// Decode with this factory's config.
    ///
    /// # Errors
    ///
    /// See [`codec::deserialize`].
    pub fn deserialize(&self, bytes: &[u8]) -> Result<Resource> {
        codec::deserialize(bytes, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn factory_encodes_with_its_config() {
        let factory = ResourceFactory::new(HalConfig::web());
        let mut r = factory.create_with_self("http://self");
        r.add(&json!({"FirstName": "John"})).unwrap();

        let bytes = factory.serialize(&r).unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            r#"{"_links":{"self":{"href":"http://self"}},"firstName":"John"}"#
        );

        let back = factory.deserialize(&bytes).unwrap();
        assert_eq!(back.self_href(), Some("http://self"));
        assert_eq!(back.get_value::<String>("FirstName").unwrap().as_deref(), Some("John"));
    }

    #[test]
    fn create_returns_empty_resource() {
        let factory = ResourceFactory::default();
        assert_eq!(factory.create(), Resource::new());
        assert_eq!(factory.config(), &HalConfig::default());
    }
}
