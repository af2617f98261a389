//! Ordered `(name, value)` metadata as reported back to the orchestrator.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A flat record with a statically declared field order.
///
/// Values are already textified: integers in decimal, booleans as
/// `true`/`false`, timestamps as RFC 3339.
pub trait Record {
    fn fields(&self) -> Vec<(&'static str, String)>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    pub value: String,
}

/// Insertion-ordered metadata. Names may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Vec<MetadataField>);

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: &impl Record) -> Self {
        let mut metadata = Self::new();
        for (name, value) in record.fields() {
            metadata.add(name, value);
        }
        metadata
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push(MetadataField {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Value of the first field called `name`.
    pub fn get(&self, name: &str) -> Result<&str, CoreError> {
        self.0
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
            .ok_or_else(|| CoreError::MissingField(name.to_string()))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MetadataField> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = &'a MetadataField;
    type IntoIter = std::slice::Iter<'a, MetadataField>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
