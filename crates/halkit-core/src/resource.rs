//! Resource type: the HAL aggregate of links, embedded resources and
//! free-form properties.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{HalError, RelationKind, Result};
use crate::link::Link;
use crate::properties::{is_reserved, Properties};
use crate::relations::Relations;
use crate::slot::RelationSlot;
use crate::{CURIES, SELF};

/// A HAL resource object.
///
/// A resource owns its embedded resources. Mutating methods return
/// `&mut Self` so calls can be chained with `?`.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    links: Relations<Link>,
    embedded: Relations<Resource>,
    properties: Properties,
}

impl Default for Resource {
    fn default() -> Self {
        Self::new()
    }
}

impl Resource {
    /// An empty resource: no links, nothing embedded, no properties.
    #[must_use]
    pub fn new() -> Self {
        Self {
            links: Relations::new(RelationKind::Link),
            embedded: Relations::new(RelationKind::Embedded),
            properties: Properties::new(),
        }
    }

    /// A resource whose only content is its `self` link.
    #[must_use]
    pub fn with_self(href: impl Into<String>) -> Self {
        let mut links = Relations::new(RelationKind::Link);
        links.push_new(SELF, RelationSlot::Single(Link::new(href)));
        Self {
            links,
            ..Self::new()
        }
    }

    pub(crate) fn from_parts(
        links: Relations<Link>,
        embedded: Relations<Resource>,
        properties: Properties,
    ) -> Self {
        Self {
            links,
            embedded,
            properties,
        }
    }

    // === Links ===

    /// The href of the `self` link, if the resource has a single-valued one.
    pub fn self_href(&self) -> Option<&str> {
        self.get_link(SELF).map(Link::href)
    }

    /// The link stored under `rel` when that relation is single-valued.
    /// Multi-valued relations are read with [`Resource::get_links`].
    pub fn get_link(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel).and_then(RelationSlot::as_single)
    }

    /// Every link stored under `rel`; empty when the relation is absent.
    pub fn get_links(&self, rel: &str) -> &[Link] {
        self.links.get(rel).map(RelationSlot::values).unwrap_or(&[])
    }

    /// The links registered under the reserved `curies` relation.
    pub fn get_curies(&self) -> &[Link] {
        self.get_links(CURIES)
    }

    /// Expand a compact relation such as `acme:widgets` into the
    /// documentation URI given by the templated curie named `acme`.
    pub fn expand_curie(&self, rel: &str) -> Option<String> {
        let (prefix, reference) = rel.split_once(':')?;
        let curie = self
            .get_curies()
            .iter()
            .find(|curie| curie.name() == Some(prefix))?;
        if !curie.is_templated() {
            return None;
        }
        Some(curie.href().replace("{rel}", reference))
    }

    pub fn contains_link(&self, rel: &str) -> bool {
        self.links.contains(rel)
    }

    /// Add a single-valued link.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::DuplicateRelation`] if `rel` already has links.
    pub fn add_link(&mut self, rel: &str, link: impl Into<Link>) -> Result<&mut Self> {
        self.links.insert(rel, RelationSlot::Single(link.into()))?;
        Ok(self)
    }

    /// Add a multi-valued link relation. It is written as an array even if
    /// it holds a single link.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::DuplicateRelation`] if `rel` already has links and
    /// [`HalError::InvalidArgument`] if `links` is empty.
    pub fn add_links(
        &mut self,
        rel: &str,
        links: impl IntoIterator<Item = Link>,
    ) -> Result<&mut Self> {
        let links: Vec<Link> = links.into_iter().collect();
        if links.is_empty() {
            return Err(HalError::InvalidArgument(format!(
                "at least one link is required for relation '{rel}'"
            )));
        }
        self.links.insert(rel, RelationSlot::Many(links))?;
        Ok(self)
    }

    /// Register curie links.
    ///
    /// # Errors
    ///
    /// Same as [`Resource::add_links`] for the `curies` relation.
    pub fn add_curies(&mut self, links: impl IntoIterator<Item = Link>) -> Result<&mut Self> {
        self.add_links(CURIES, links)
    }

    /// Remove the links stored under `rel`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::NotFound`] if `rel` has no links.
    pub fn remove_link(&mut self, rel: &str) -> Result<&mut Self> {
        self.links.remove(rel)?;
        Ok(self)
    }

    pub fn links(&self) -> &Relations<Link> {
        &self.links
    }

    // === Embedded resources ===

    /// The embedded resource stored under `rel` when that relation is
    /// single-valued.
    pub fn get_embedded(&self, rel: &str) -> Option<&Resource> {
        self.embedded.get(rel).and_then(RelationSlot::as_single)
    }

    /// Every embedded resource stored under `rel`; empty when absent.
    pub fn get_embedded_many(&self, rel: &str) -> &[Resource] {
        self.embedded.get(rel).map(RelationSlot::values).unwrap_or(&[])
    }

    pub fn contains_embedded(&self, rel: &str) -> bool {
        self.embedded.contains(rel)
    }

    /// Embed a single resource.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::DuplicateRelation`] if `rel` is already embedded.
    pub fn add_embedded(&mut self, rel: &str, resource: Resource) -> Result<&mut Self> {
        self.embedded.insert(rel, RelationSlot::Single(resource))?;
        Ok(self)
    }

    /// Embed a list of resources.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::DuplicateRelation`] if `rel` is already embedded
    /// and [`HalError::InvalidArgument`] if `resources` is empty.
    pub fn add_embedded_many(
        &mut self,
        rel: &str,
        resources: impl IntoIterator<Item = Resource>,
    ) -> Result<&mut Self> {
        let resources: Vec<Resource> = resources.into_iter().collect();
        if resources.is_empty() {
            return Err(HalError::InvalidArgument(format!(
                "at least one resource is required for embedded relation '{rel}'"
            )));
        }
        self.embedded.insert(rel, RelationSlot::Many(resources))?;
        Ok(self)
    }

    /// Remove the embedded resource(s) stored under `rel`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::NotFound`] if nothing is embedded under `rel`.
    pub fn remove_embedded(&mut self, rel: &str) -> Result<&mut Self> {
        self.embedded.remove(rel)?;
        Ok(self)
    }

    pub fn embedded(&self) -> &Relations<Resource> {
        &self.embedded
    }

    // === Properties ===

    /// Merge the serialized form of `value` into the properties.
    ///
    /// Repeated calls accumulate: objects merge key by key, arrays append,
    /// other values are replaced. A value serializing to `null` (such as
    /// `None`) is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`] if `value` cannot be serialized or
    /// does not serialize to a JSON object, and [`HalError::InvalidArgument`]
    /// if it carries a reserved `_links` / `_embedded` key in any casing. The
    /// resource is left untouched on error.
    pub fn add<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self> {
        let tree = serde_json::to_value(value).map_err(|e| HalError::Serialization(e.to_string()))?;
        self.merge_tree(tree)
    }

    /// Like [`Resource::add`], but only merges what `projection` picks out
    /// of `value`.
    ///
    /// # Errors
    ///
    /// Same as [`Resource::add`].
    pub fn add_projected<T, P, F>(&mut self, value: &T, projection: F) -> Result<&mut Self>
    where
        P: Serialize,
        F: FnOnce(&T) -> P,
    {
        self.add(&projection(value))
    }

    fn merge_tree(&mut self, tree: Value) -> Result<&mut Self> {
        let source: Map<String, Value> = match tree {
            Value::Null => return Ok(self),
            Value::Object(map) => map,
            other => {
                return Err(HalError::Serialization(format!(
                    "resource properties must serialize to a JSON object, got {}",
                    json_kind(&other)
                )))
            }
        };

        if let Some(reserved) = source.keys().find(|k| is_reserved(k)) {
            return Err(HalError::InvalidArgument(format!(
                "'{reserved}' is reserved and cannot be used as a property name"
            )));
        }

        self.properties.merge(&source);
        Ok(self)
    }

    /// Read one property, matching `name` case-insensitively.
    ///
    /// Returns `Ok(None)` if the property is absent.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::TypeConversion`] if the stored value cannot be
    /// converted to `T`.
    pub fn get_value<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let Some(value) = self.properties.get(name) else {
            return Ok(None);
        };
        T::deserialize(value)
            .map(Some)
            .map_err(|source| HalError::TypeConversion {
                name: name.to_string(),
                target: std::any::type_name::<T>(),
                source,
            })
    }

    /// Read all properties as a `T`.
    ///
    /// # Errors
    ///
    /// Returns [`HalError::Serialization`] if the properties do not
    /// deserialize into `T`.
    pub fn as_type<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.properties.as_map().clone())).map_err(|e| {
            HalError::Serialization(format!(
                "cannot read resource properties as {}: {e}",
                std::any::type_name::<T>()
            ))
        })
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Serialize)]
    #[serde(rename_all = "PascalCase")]
    struct Person {
        first_name: &'static str,
        last_name: &'static str,
        birth_date: NaiveDate,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct Employee {
        first_name: String,
        last_name: String,
        birth_date: NaiveDate,
    }

    fn john() -> Person {
        Person {
            first_name: "John",
            last_name: "Doe",
            birth_date: NaiveDate::from_ymd_opt(2024, 4, 23).unwrap(),
        }
    }

    #[test]
    fn minimal_resource_has_self_link() {
        let r = Resource::with_self("http://self");
        assert_eq!(r.self_href(), Some("http://self"));
        assert_eq!(r.get_link("self").unwrap().href(), "http://self");
    }

    #[test]
    fn empty_resource_has_no_self() {
        let r = Resource::new();
        assert_eq!(r.self_href(), None);
        assert!(r.links().is_empty());
    }

    #[test]
    fn can_add_other_link() {
        let mut r = Resource::with_self("http://self");
        r.add_link("other", "http://link").unwrap();
        assert_eq!(r.get_link("other").unwrap().href(), "http://link");
        assert!(r.get_link("does_not_exist").is_none());
    }

    #[test]
    fn cannot_add_two_links_with_same_rel() {
        let mut r = Resource::with_self("http://self");
        let err = r
            .add_link("same", "http://link")
            .and_then(|r| r.add_link("same", "http://link"))
            .unwrap_err();
        assert!(matches!(err, HalError::DuplicateRelation { ref rel, .. } if rel == "same"));
    }

    #[test]
    fn cannot_remove_missing_link() {
        let mut r = Resource::with_self("http://self");
        let err = r.remove_link("does_not_exist").unwrap_err();
        assert!(matches!(err, HalError::NotFound { kind: RelationKind::Link, .. }));

        r.remove_link("self").unwrap();
        assert!(!r.contains_link("self"));
    }

    #[test]
    fn multi_valued_links_keep_names() {
        let mut r = Resource::with_self("http://self");
        r.add_links(
            "other",
            [
                Link::new("http://link").with_name("1"),
                Link::new("http://link2").with_name("2"),
            ],
        )
        .unwrap();

        let links = r.get_links("other");
        let by_name = |n: &str| links.iter().find(|l| l.name() == Some(n)).unwrap().href();
        assert_eq!(by_name("1"), "http://link");
        assert_eq!(by_name("2"), "http://link2");
        assert!(r.get_link("other").is_none());
    }

    #[test]
    fn add_links_rejects_empty_list() {
        let mut r = Resource::new();
        let err = r.add_links("other", Vec::new()).unwrap_err();
        assert!(matches!(err, HalError::InvalidArgument(_)));
        assert!(!r.contains_link("other"));
    }

    #[test]
    fn curies_expand_compact_relations() {
        let mut r = Resource::with_self("/");
        r.add_curies([
            Link::new("https://docs.example.com/relations/v1/{rel}")
                .with_name("v1")
                .templated(true),
            Link::new("https://docs.example.com/relations/v2/{rel}")
                .with_name("v2")
                .templated(true),
        ])
        .unwrap()
        .add_link(
            "v1:orders",
            Link::new("https://api.example.com/orders")
                .with_deprecation("https://dev.example.com/deprecations/v1-orders"),
        )
        .unwrap()
        .add_link("v2:orders", "https://api.example.com/order-list")
        .unwrap();

        assert_eq!(r.get_curies().len(), 2);
        assert_eq!(r.get_curies()[1].name(), Some("v2"));
        assert_eq!(
            r.expand_curie("v1:orders").as_deref(),
            Some("https://docs.example.com/relations/v1/orders")
        );
        assert!(r.get_link("v2:orders").is_some());
        assert_eq!(r.expand_curie("v3:orders"), None);
        assert_eq!(r.expand_curie("orders"), None);
    }

    #[test]
    fn embedded_resources_round_through_accessors() {
        let mut r = Resource::new();
        let mut child = Resource::with_self("/child");
        child.add(&json!({"hello": "world"})).unwrap();
        r.add_embedded("child", child).unwrap();
        r.add_embedded_many("items", [Resource::with_self("/1"), Resource::with_self("/2")])
            .unwrap();

        assert_eq!(
            r.get_embedded("child").unwrap().get_value::<String>("hello").unwrap(),
            Some("world".to_string())
        );
        assert_eq!(r.get_embedded_many("items").len(), 2);
        assert!(r.get_embedded("items").is_none());

        let err = r.add_embedded("child", Resource::new()).unwrap_err();
        assert!(matches!(err, HalError::DuplicateRelation { kind: RelationKind::Embedded, .. }));

        r.remove_embedded("items").unwrap();
        assert!(!r.contains_embedded("items"));
        assert!(r.remove_embedded("items").is_err());
    }

    #[test]
    fn properties_from_struct() {
        let mut r = Resource::with_self("http://self");
        r.add(&john()).unwrap();

        assert_eq!(r.get_value::<String>("FirstName").unwrap().as_deref(), Some("John"));
        assert_eq!(r.get_value::<String>("LastName").unwrap().as_deref(), Some("Doe"));
        let birth: NaiveDate = r.get_value("BirthDate").unwrap().unwrap();
        assert_eq!(birth, NaiveDate::from_ymd_opt(2024, 4, 23).unwrap());
    }

    #[test]
    fn property_names_are_case_insensitive() {
        let mut r = Resource::with_self("http://self");
        r.add(&json!({"FirstName": "John"})).unwrap();

        for name in ["FirstName", "firstName", "FIRSTNAME", "firstname"] {
            assert_eq!(r.get_value::<String>(name).unwrap().as_deref(), Some("John"));
        }
    }

    #[test]
    fn missing_property_is_none() {
        let mut r = Resource::with_self("http://self");
        r.add(&json!({"FirstName": "John"})).unwrap();
        assert_eq!(r.get_value::<String>("Address").unwrap(), None);
    }

    #[test]
    fn invalid_property_cast_is_type_conversion_error() {
        let mut r = Resource::with_self("http://self");
        r.add(&json!({"FirstName": "John"})).unwrap();
        let err = r.get_value::<i32>("firstName").unwrap_err();
        assert!(matches!(err, HalError::TypeConversion { ref name, .. } if name == "firstName"));
    }

    #[test]
    fn as_type_reads_whole_property_map() {
        let mut r = Resource::with_self("http://self");
        r.add(&john()).unwrap();
        let e: Employee = r.as_type().unwrap();
        assert_eq!(e.first_name, "John");
        assert_eq!(e.last_name, "Doe");
        assert_eq!(e.birth_date, NaiveDate::from_ymd_opt(2024, 4, 23).unwrap());

        let err = r.as_type::<Vec<String>>().unwrap_err();
        assert!(matches!(err, HalError::Serialization(_)));
    }

    #[test]
    fn repeated_adds_merge() {
        let mut r = Resource::with_self("http://dfdfd");
        r.add(&json!({"test": "coucou", "sub": {"sub1": "sub1"}}))
            .unwrap()
            .add(&json!({"test2": "coucou2"}))
            .unwrap()
            .add(&json!({"TEST2": "coucou_MAJUSCULE"}))
            .unwrap()
            .add(&json!({"test": "replaced", "WithSpecialCase": 33, "sub": {"coucou": "dfdf", "SUB1": "replaced_sub"}}))
            .unwrap()
            .add(&json!({"array": ["A", "B", "C"]}))
            .unwrap()
            .add(&json!({"array": ["D", "E", "F"]}))
            .unwrap();

        assert_eq!(r.get_value::<String>("test").unwrap().as_deref(), Some("replaced"));
        assert_eq!(
            r.get_value::<String>("test2").unwrap().as_deref(),
            Some("coucou_MAJUSCULE")
        );
        assert_eq!(
            r.get_value::<Value>("sub").unwrap(),
            Some(json!({"sub1": "replaced_sub", "coucou": "dfdf"}))
        );
        assert_eq!(
            r.get_value::<Vec<String>>("array").unwrap().unwrap(),
            vec!["A", "B", "C", "D", "E", "F"]
        );
    }

    #[test]
    fn projection_limits_merged_fields() {
        #[derive(Serialize)]
        struct Pair {
            coucou: &'static str,
            sub1: &'static str,
        }

        let mut r = Resource::new();
        r.add_projected(&Pair { coucou: "Hello", sub1: "Sub1" }, |p| {
            json!({ "coucou": p.coucou })
        })
        .unwrap();

        assert!(r.properties().contains("coucou"));
        assert!(!r.properties().contains("sub1"));
    }

    #[test]
    fn null_value_is_a_no_op() {
        let mut r = Resource::new();
        r.add(&Option::<Person>::None).unwrap();
        assert!(r.properties().is_empty());
    }

    #[test]
    fn non_object_values_are_rejected_without_mutation() {
        let mut r = Resource::new();
        r.add(&json!({"kept": true})).unwrap();

        let err = r.add(&42).unwrap_err();
        assert!(matches!(err, HalError::Serialization(_)));

        let err = r
            .add(&json!({"extra": 1, "_links": {"self": {"href": "/"}}}))
            .unwrap_err();
        assert!(matches!(err, HalError::InvalidArgument(_)));

        assert_eq!(r.properties().len(), 1);
        assert!(!r.properties().contains("extra"));
    }

    #[test]
    fn reserved_keys_are_rejected_in_any_case() {
        let mut r = Resource::with_self("/x");
        for doc in [
            json!({"_Links": {"evil": {"href": "/pwn"}}}),
            json!({"_LINKS": 1}),
            json!({"_Embedded": {}}),
        ] {
            let err = r.add(&doc).unwrap_err();
            assert!(matches!(err, HalError::InvalidArgument(_)), "{doc}");
        }
        assert!(r.properties().is_empty());
        assert_eq!(r.get_value::<Value>("_links").unwrap(), None);
    }

    #[test]
    fn resource_is_plain_shareable_data() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resource>();
        assert_send_sync::<Link>();
    }
}
