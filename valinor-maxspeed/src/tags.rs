use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of OSM tags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether `key` is tagged with exactly `value`.
    #[inline]
    pub fn has_tag(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// Whether `key` is tagged with any of `values`.
    pub fn has_any<S: AsRef<str>>(&self, key: &str, values: &[S]) -> bool {
        self.get(key)
            .is_some_and(|tagged| values.iter().any(|value| value.as_ref() == tagged))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

/// A way (road segment) as read from the source data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OsmWay {
    pub id: i64,
    pub tags: Tags,
}

impl OsmWay {
    pub fn new(id: i64, tags: Tags) -> Self {
        Self { id, tags }
    }
}

/// Tags of the relations a way is a member of.
///
/// Used for attributes that can come from enclosing areas,
/// like the country from an administrative boundary.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RelationContext {
    relations: Vec<Tags>,
}

impl RelationContext {
    pub fn new(relations: Vec<Tags>) -> Self {
        Self { relations }
    }

    pub fn relations(&self) -> &[Tags] {
        &self.relations
    }

    /// Relations tagged `boundary=administrative`.
    pub fn administrative_boundaries(&self) -> impl Iterator<Item = &Tags> {
        self.relations
            .iter()
            .filter(|relation| relation.has_tag("boundary", "administrative"))
    }
}
