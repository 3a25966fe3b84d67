//! `application/hal+json` encoder and decoder.
//!
//! Encoding writes one JSON object per resource, in this order:
//!
//! ```json
//! {
//!   "_links":    { "<rel>": <link> | [<link>, ...] },
//!   "_embedded": { "<rel>": <resource> | [<resource>, ...] },
//!   "<property>": <any JSON value>
//! }
//! ```
//!
//! `_links` and `_embedded` are left out when empty. Decoding walks the
//! top-level members in stream order and routes them to links, embedded
//! resources or properties.

use std::fmt;
use std::marker::PhantomData;

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{self, SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::config::HalConfig;
use crate::error::{HalError, RelationKind, Result};
use crate::link::Link;
use crate::naming::{NameTransform, NamingPolicy};
use crate::properties::{is_reserved, Properties};
use crate::relations::Relations;
use crate::resource::Resource;
use crate::slot::RelationSlot;
use crate::{EMBEDDED, LINKS};

const HREF: &str = "href";
const DEPRECATION: &str = "deprecation";
const HREFLANG: &str = "hreflang";
const LANG: &str = "lang";
const NAME: &str = "name";
const PROFILE: &str = "profile";
const TEMPLATED: &str = "templated";
const TEMPLATE: &str = "template";
const TITLE: &str = "title";
const TYPE: &str = "type";

static DEFAULT_CONFIG: HalConfig = HalConfig::new();

/// Encode a resource with the naming and layout settings of `config`.
///
/// # Errors
///
/// Returns [`HalError::Serialization`] if the JSON writer fails.
pub fn serialize(resource: &Resource, config: &HalConfig) -> Result<Vec<u8>> {
    serialize_with(resource, &config.naming, config.pretty)
}

/// Encode a resource with an arbitrary key transform.
///
/// # Errors
///
/// Returns [`HalError::Serialization`] if the JSON writer fails.
pub fn serialize_with<N>(resource: &Resource, naming: &N, pretty: bool) -> Result<Vec<u8>>
where
    N: NameTransform + ?Sized,
{
    debug!(
        links = resource.links().len(),
        embedded = resource.embedded().len(),
        properties = resource.properties().len(),
        pretty,
        "encoding HAL resource"
    );
    let document = Wire::new(resource, naming);
    let bytes = if pretty {
        serde_json::to_vec_pretty(&document)
    } else {
        serde_json::to_vec(&document)
    };
    bytes.map_err(|e| HalError::Serialization(e.to_string()))
}

/// Encode a resource to a string.
///
/// # Errors
///
/// Same as [`serialize`].
pub fn to_string(resource: &Resource, config: &HalConfig) -> Result<String> {
    String::from_utf8(serialize(resource, config)?)
        .map_err(|e| HalError::Serialization(e.to_string()))
}

/// Decode one HAL document.
///
/// # Errors
///
/// Returns [`HalError::MalformedDocument`] if the input is not valid JSON,
/// is not an object at the top level, or breaks a HAL structural rule
/// (link without `href`, relation that is neither object nor array,
/// duplicate relation name).
pub fn deserialize(bytes: &[u8], config: &HalConfig) -> Result<Resource> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let resource = ResourceSeed { config }
        .deserialize(&mut de)
        .map_err(malformed)?;
    de.end().map_err(malformed)?;
    debug!(
        links = resource.links().len(),
        embedded = resource.embedded().len(),
        properties = resource.properties().len(),
        "decoded HAL resource"
    );
    Ok(resource)
}

/// Decode one HAL document from text.
///
/// # Errors
///
/// Same as [`deserialize`].
pub fn from_str(text: &str, config: &HalConfig) -> Result<Resource> {
    deserialize(text.as_bytes(), config)
}

fn malformed(e: serde_json::Error) -> HalError {
    HalError::MalformedDocument(e.to_string())
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Types that know how to write themselves in HAL form with renamed keys.
trait WireEncode {
    fn encode<S, N>(&self, naming: &N, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
        N: NameTransform + ?Sized;
}

/// Pairs a value with the key transform so it can be handed to serde.
struct Wire<'a, T: ?Sized, N: ?Sized> {
    value: &'a T,
    naming: &'a N,
}

impl<'a, T: ?Sized, N: ?Sized> Wire<'a, T, N> {
    fn new(value: &'a T, naming: &'a N) -> Self {
        Self { value, naming }
    }
}

impl<T, N> Serialize for Wire<'_, T, N>
where
    T: WireEncode + ?Sized,
    N: NameTransform + ?Sized,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.value.encode(self.naming, serializer)
    }
}

impl WireEncode for Resource {
    fn encode<S, N>(&self, naming: &N, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
        N: NameTransform + ?Sized,
    {
        let len = usize::from(!self.links().is_empty())
            + usize::from(!self.embedded().is_empty())
            + self.properties().len();
        let mut map = serializer.serialize_map(Some(len))?;
        if !self.links().is_empty() {
            map.serialize_entry(LINKS, &Wire::new(self.links(), naming))?;
        }
        if !self.embedded().is_empty() {
            map.serialize_entry(EMBEDDED, &Wire::new(self.embedded(), naming))?;
        }
        for (key, value) in self.properties() {
            let name = naming.transform(key);
            if is_reserved(&name) {
                return Err(<S::Error as ser::Error>::custom(format_args!(
                    "property '{key}' would be written as reserved key '{name}'"
                )));
            }
            map.serialize_entry(&*name, &Wire::new(value, naming))?;
        }
        map.end()
    }
}

impl<T: WireEncode> WireEncode for Relations<T> {
    fn encode<S, N>(&self, naming: &N, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
        N: NameTransform + ?Sized,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (rel, slot) in self.iter() {
            map.serialize_entry(&*naming.transform(rel), &Wire::new(slot, naming))?;
        }
        map.end()
    }
}

impl<T: WireEncode> WireEncode for RelationSlot<T> {
    fn encode<S, N>(&self, naming: &N, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
        N: NameTransform + ?Sized,
    {
        match self {
            RelationSlot::Single(value) => value.encode(naming, serializer),
            RelationSlot::Many(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(&Wire::new(value, naming))?;
                }
                seq.end()
            }
        }
    }
}

impl WireEncode for Link {
    fn encode<S, N>(&self, naming: &N, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
        N: NameTransform + ?Sized,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(&*naming.transform(HREF), self.href())?;
        write_text(&mut map, naming, DEPRECATION, self.deprecation())?;
        write_text(&mut map, naming, HREFLANG, self.hreflang())?;
        write_text(&mut map, naming, NAME, self.name())?;
        write_text(&mut map, naming, PROFILE, self.profile())?;
        if self.is_templated() {
            map.serialize_entry(&*naming.transform(TEMPLATED), &true)?;
        }
        write_text(&mut map, naming, TITLE, self.title())?;
        write_text(&mut map, naming, TYPE, self.media_type())?;
        map.end()
    }
}

/// Write an optional link field, skipping unset and blank values.
fn write_text<M, N>(
    map: &mut M,
    naming: &N,
    key: &str,
    value: Option<&str>,
) -> std::result::Result<(), M::Error>
where
    M: SerializeMap,
    N: NameTransform + ?Sized,
{
    match value {
        Some(text) if !text.trim().is_empty() => {
            map.serialize_entry(&*naming.transform(key), text)
        }
        _ => Ok(()),
    }
}

impl WireEncode for Value {
    fn encode<S, N>(&self, naming: &N, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
        N: NameTransform + ?Sized,
    {
        match self {
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(&*naming.transform(key), &Wire::new(value, naming))?;
                }
                map.end()
            }
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(&Wire::new(item, naming))?;
                }
                seq.end()
            }
            scalar => scalar.serialize(serializer),
        }
    }
}

impl Serialize for Resource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.encode(&NamingPolicy::Identity, serializer)
    }
}

impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.encode(&NamingPolicy::Identity, serializer)
    }
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

impl<'de> Deserialize<'de> for Resource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        ResourceSeed {
            config: &DEFAULT_CONFIG,
        }
        .deserialize(deserializer)
    }
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(LinkVisitor)
    }
}

/// Decodes a resource, carrying the config down into embedded resources.
#[derive(Clone, Copy)]
struct ResourceSeed<'a> {
    config: &'a HalConfig,
}

impl<'de> DeserializeSeed<'de> for ResourceSeed<'_> {
    type Value = Resource;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Resource, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for ResourceSeed<'_> {
    type Value = Resource;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a HAL resource object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Resource, A::Error> {
        let mut links = Relations::new(RelationKind::Link);
        let mut embedded = Relations::new(RelationKind::Embedded);
        let mut properties = Properties::new();

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                LINKS => map.next_value_seed(RelationsSeed {
                    target: &mut links,
                    element: PhantomData::<Link>,
                    config: self.config,
                })?,
                EMBEDDED => map.next_value_seed(RelationsSeed {
                    target: &mut embedded,
                    element: self,
                    config: self.config,
                })?,
                _ if is_reserved(&key) => {
                    return Err(<A::Error as de::Error>::custom(format_args!(
                        "property '{key}' collides with a reserved key"
                    )));
                }
                _ => {
                    let value: Value = map.next_value()?;
                    properties.insert(key, value);
                }
            }
        }

        Ok(Resource::from_parts(links, embedded, properties))
    }
}

/// Decodes a `_links` or `_embedded` object into an existing registry.
struct RelationsSeed<'a, S, T> {
    target: &'a mut Relations<T>,
    element: S,
    config: &'a HalConfig,
}

impl<'de, S, T> DeserializeSeed<'de> for RelationsSeed<'_, S, T>
where
    S: DeserializeSeed<'de, Value = T> + Copy,
{
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de, S, T> Visitor<'de> for RelationsSeed<'_, S, T>
where
    S: DeserializeSeed<'de, Value = T> + Copy,
{
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target.kind() {
            RelationKind::Link => formatter.write_str("a `_links` object"),
            RelationKind::Embedded => formatter.write_str("an `_embedded` object"),
        }
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<(), A::Error> {
        while let Some(rel) = map.next_key::<String>()? {
            let slot = map.next_value_seed(SlotSeed {
                element: self.element,
                rel: &rel,
                config: self.config,
            })?;
            self.target.insert(rel, slot).map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(())
    }
}

/// Decodes one relation value: an object becomes `Single`, an array `Many`.
struct SlotSeed<'a, S> {
    element: S,
    rel: &'a str,
    config: &'a HalConfig,
}

impl<'de, S> DeserializeSeed<'de> for SlotSeed<'_, S>
where
    S: DeserializeSeed<'de> + Copy,
{
    type Value = RelationSlot<S::Value>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de, S> Visitor<'de> for SlotSeed<'_, S>
where
    S: DeserializeSeed<'de> + Copy,
{
    type Value = RelationSlot<S::Value>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "an object or an array of objects for relation '{}'",
            self.rel
        )
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<Self::Value, A::Error> {
        self.element
            .deserialize(MapAccessDeserializer::new(map))
            .map(RelationSlot::Single)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Self::Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(self.element)? {
            items.push(item);
        }
        if items.is_empty() && !self.config.allow_empty_relations {
            return Err(de::Error::custom(format_args!(
                "relation '{}' is an empty array",
                self.rel
            )));
        }
        Ok(RelationSlot::Many(items))
    }
}

struct LinkVisitor;

impl<'de> Visitor<'de> for LinkVisitor {
    type Value = Link;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a HAL link object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Link, A::Error> {
        let mut href: Option<String> = None;
        let mut title = None;
        let mut media_type = None;
        let mut name = None;
        let mut templated = false;
        let mut deprecation = None;
        let mut hreflang = None;
        let mut profile = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                HREF => href = map.next_value()?,
                DEPRECATION => deprecation = map.next_value()?,
                HREFLANG | LANG => hreflang = map.next_value()?,
                NAME => name = map.next_value()?,
                PROFILE => profile = map.next_value()?,
                TEMPLATED | TEMPLATE => {
                    templated = map.next_value::<Option<bool>>()?.unwrap_or(false);
                }
                TITLE => title = map.next_value()?,
                TYPE => media_type = map.next_value()?,
                other => {
                    trace!(field = other, "skipping unknown link field");
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let href = href.ok_or_else(|| <A::Error as de::Error>::custom("Link must have an href"))?;
        Ok(Link {
            href,
            title,
            media_type,
            name,
            templated,
            deprecation,
            hreflang,
            profile,
        })
    }
}
