//! Decoded configuration data.

use super::yaml;
use crate::error::{ProviderError, Result};
use config::{Map, Value, ValueKind};
use serde::de::DeserializeOwned;

/// A decoded configuration document: string keys mapped to nested values.
///
/// A `ConfigMap` is a snapshot. It exposes lookups only, so once a provider
/// hands one out it stays exactly as it was decoded.
///
/// # Examples
///
/// ```rust
/// use confmap_provider::core::ConfigMap;
///
/// let map = ConfigMap::from_yaml_str("server:\n  port: 8080\n").unwrap();
/// let port = map.get_path("server.port").unwrap().clone().into_int().unwrap();
/// assert_eq!(port, 8080);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigMap {
    entries: Map<String, Value>,
}

impl ConfigMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a YAML document whose root is a mapping.
    ///
    /// An empty or null document yields an empty map. Scalar keys such as
    /// `true` or `1.5` are stringified.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Decode`] if the text is not valid YAML, its
    /// root is not a mapping, or a key is a sequence or mapping.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Self::parse("yaml", config::FileFormat::Yaml, text)
    }

    /// Decode text in the given format. `locator` names the source in errors.
    pub(crate) fn parse(locator: &str, format: config::FileFormat, text: &str) -> Result<Self> {
        let entries = match format {
            config::FileFormat::Yaml => yaml::decode(locator, text)?,
            other => config::Format::parse(&other, None, text)
                .map_err(|e| ProviderError::decode(locator, e))?,
        };
        Ok(Self { entries })
    }

    /// Get a top-level value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Get a nested value by a dot-separated path, e.g. `server.tls.cert`.
    ///
    /// Each path segment must name a key of a table; arrays are not indexed.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.entries.get(segments.next()?)?;
        for segment in segments {
            match &current.kind {
                ValueKind::Table(table) => current = table.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Whether a top-level key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Top-level keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over top-level entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Borrow the underlying table.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Consume the snapshot and return the underlying table.
    pub fn into_inner(self) -> Map<String, Value> {
        self.entries
    }

    /// Deserialize the whole map into a typed configuration struct.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Decode`] if the map does not fit `T`.
    pub fn try_deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        Value::from(self.entries.clone())
            .try_deserialize()
            .map_err(|e| ProviderError::decode("config map", e))
    }
}

impl From<Map<String, Value>> for ConfigMap {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = std::collections::hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
