//! Operator-supplied instance overrides.
//!
//! Keys follow `Module::Name.index` (or `Module::Name.i1.i2…` for
//! multi-part indices); values are literal numbers or text. The persisted
//! form is a flat JSON object with exactly these keys and scalar values,
//! and must round-trip unchanged — hence the untagged value enum.

use std::collections::BTreeMap;
use std::fmt;

/// A literal override value: number or text.
#[derive(Clone, Debug, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum OverrideValue {
    /// Whole number.
    Integer(i64),
    /// Fractional number.
    Float(f64),
    /// Text.
    Text(String),
}

impl fmt::Display for OverrideValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v}"),
        }
    }
}

impl OverrideValue {
    /// The value as text, for string-family coercion.
    #[must_use]
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// The value as a signed integer, if it is one or parses as one.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// A parsed override key: declaration identity plus index arcs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverrideKey {
    /// Module part of `Module::Name`.
    pub module: String,
    /// Name part of `Module::Name`.
    pub name: String,
    /// One or more index integers.
    pub index: Vec<u32>,
}

impl OverrideKey {
    /// Parse `Module::Name.index[.index…]`. Returns `None` for keys that
    /// lack the module qualifier or an index, or whose index is not all
    /// integers; such keys are skipped by the injection pass.
    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        let (qualified, index_part) = {
            let (module_and_name, rest) = key.split_once('.')?;
            (module_and_name, rest)
        };
        let (module, name) = qualified.split_once("::")?;
        if module.is_empty() || name.is_empty() {
            return None;
        }
        let index: Vec<u32> = index_part
            .split('.')
            .map(|part| part.parse().ok())
            .collect::<Option<_>>()?;
        if index.is_empty() {
            return None;
        }
        Some(Self {
            module: module.to_string(),
            name: name.to_string(),
            index,
        })
    }
}

/// The full override map, keyed by the textual `Module::Name.index` form.
#[derive(Clone, Debug, Default, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Overrides {
    entries: BTreeMap<String, OverrideValue>,
}

impl Overrides {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the override for one symbolic instance key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OverrideValue> {
        self.entries.get(key)
    }

    /// Insert or replace an override.
    pub fn insert(&mut self, key: impl Into<String>, value: OverrideValue) {
        self.entries.insert(key.into(), value);
    }

    /// Iterate `(raw key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverrideValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate only the entries whose key parses as `Module::Name.index…`.
    pub fn parsed_entries(&self) -> impl Iterator<Item = (OverrideKey, &OverrideValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| OverrideKey::parse(k).map(|key| (key, v)))
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no overrides are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
