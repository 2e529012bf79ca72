//! YAML decoding into the `config` value model.

use crate::error::{ProviderError, Result};
use config::{Map, Value, ValueKind};
use serde_yaml::Value as Yaml;

/// Decode a YAML document into a table.
///
/// An empty or null document is an empty table. Scalar mapping keys are
/// stringified (`true`, `1.5`; null becomes the empty string). Merge keys
/// (`<<`) are applied before conversion and custom tags are dropped.
pub(crate) fn decode(locator: &str, text: &str) -> Result<Map<String, Value>> {
    if is_blank(text) {
        return Ok(Map::new());
    }

    let mut doc: Yaml = serde_yaml::from_str(text).map_err(|e| ProviderError::decode(locator, e))?;
    doc.apply_merge()
        .map_err(|e| ProviderError::decode(locator, e))?;
    root(locator, doc)
}

fn root(locator: &str, doc: Yaml) -> Result<Map<String, Value>> {
    match doc {
        Yaml::Null => Ok(Map::new()),
        Yaml::Mapping(mapping) => table(locator, mapping),
        Yaml::Tagged(tagged) => root(locator, tagged.value),
        other => Err(ProviderError::decode(
            locator,
            format!("document root is a {}, expected a mapping", kind_name(&other)),
        )),
    }
}

fn is_blank(text: &str) -> bool {
    text.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    })
}

fn table(locator: &str, mapping: serde_yaml::Mapping) -> Result<Map<String, Value>> {
    let mut table = Map::with_capacity(mapping.len());
    for (key, value) in mapping {
        table.insert(key_string(locator, key)?, convert(locator, value)?);
    }
    Ok(table)
}

fn key_string(locator: &str, key: Yaml) -> Result<String> {
    match key {
        Yaml::String(s) => Ok(s),
        Yaml::Bool(b) => Ok(b.to_string()),
        Yaml::Number(n) => Ok(n.to_string()),
        Yaml::Null => Ok(String::new()),
        Yaml::Tagged(tagged) => key_string(locator, tagged.value),
        other => Err(ProviderError::decode(
            locator,
            format!("unsupported mapping key: a {} cannot be a key", kind_name(&other)),
        )),
    }
}

fn convert(locator: &str, value: Yaml) -> Result<Value> {
    let kind = match value {
        Yaml::Null => ValueKind::Nil,
        Yaml::Bool(b) => ValueKind::Boolean(b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                ValueKind::I64(i)
            } else if let Some(u) = n.as_u64() {
                ValueKind::U64(u)
            } else {
                ValueKind::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Yaml::String(s) => ValueKind::String(s),
        Yaml::Sequence(items) => ValueKind::Array(
            items
                .into_iter()
                .map(|item| convert(locator, item))
                .collect::<Result<_>>()?,
        ),
        Yaml::Mapping(mapping) => ValueKind::Table(table(locator, mapping)?),
        Yaml::Tagged(tagged) => return convert(locator, tagged.value),
    };
    Ok(Value::new(None, kind))
}

fn kind_name(value: &Yaml) -> &'static str {
    match value {
        Yaml::Null => "null",
        Yaml::Bool(_) => "boolean",
        Yaml::Number(_) => "number",
        Yaml::String(_) => "string",
        Yaml::Sequence(_) => "sequence",
        Yaml::Mapping(_) => "mapping",
        Yaml::Tagged(_) => "tagged value",
    }
}
