use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::{Map, Value};

/// A record with a unique identity inside its collection.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Metadata for one leaf setting.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    /// Keys the generator does not interpret (`sourceType`, `deprecation`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PropertyRecord {
    /// A synthesized property: `id` and `name` are both the composed path.
    pub fn synthesized(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: Some(path.clone()),
            name: path,
            type_name: None,
            description: None,
            short_description: None,
            default_value: None,
            extra: Map::new(),
        }
    }

    /// Splits the path into `(group path, leaf name)` at the last `.`.
    pub fn split_path(&self) -> Option<(&str, &str)> {
        self.name
            .rfind('.')
            .map(|pos| (&self.name[..pos], &self.name[pos + 1..]))
    }
}

impl Keyed for PropertyRecord {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Metadata for a configuration sub-tree, naming its declaring type.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl GroupRecord {
    pub fn synthesized(path: impl Into<String>, declaring_type: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: Some(path.clone()),
            name: path,
            type_name: Some(declaring_type.into()),
            extra: Map::new(),
        }
    }
}

impl Keyed for GroupRecord {
    fn key(&self) -> &str {
        &self.name
    }
}

/// One entry of a hint's `values` list.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValueHint {
    pub value: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ValueHint {
    /// `[<marker>, <automated>]`, described by the module name.
    pub fn requires_module(marker: &str, module: &str, automated: bool) -> Self {
        Self {
            value: Value::Array(vec![Value::String(marker.to_string()), Value::Bool(automated)]),
            description: Some(module.to_string()),
        }
    }

    pub fn required_property(marker: &str) -> Self {
        Self {
            value: Value::String(marker.to_string()),
            description: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct HintRecord {
    pub name: String,
    #[serde(default)]
    pub values: Vec<ValueHint>,
    #[serde(default)]
    pub providers: Vec<Value>,
}

impl HintRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            providers: Vec::new(),
        }
    }
}

impl Keyed for HintRecord {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Insertion-ordered set of records keyed by identity.
///
/// The first record inserted under a key wins; later inserts with the same
/// key are dropped, whatever their content. Serialized as a JSON array.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for RecordSet<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T: Keyed> RecordSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if a record with the same key was already present.
    pub fn insert(&mut self, record: T) -> bool {
        let key = record.key().to_string();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, record);
        true
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<T: Keyed> Extend<T> for RecordSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for record in iter {
            self.insert(record);
        }
    }
}

impl<T: Keyed> FromIterator<T> for RecordSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T> IntoIterator for RecordSet<T> {
    type Item = T;
    type IntoIter = indexmap::map::IntoValues<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl<T: Serialize> Serialize for RecordSet<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for record in self.entries.values() {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}

impl<'de, T: Keyed + Deserialize<'de>> Deserialize<'de> for RecordSet<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let records = Vec::<T>::deserialize(deserializer)?;
        Ok(records.into_iter().collect())
    }
}
