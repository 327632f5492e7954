use crate::tags::Tags;
use serde::Deserialize;

/// A condition on a way's tags and surroundings.
///
/// Deserialized from the rule table, e.g.
/// `{"tag": {"key": "highway", "values": ["motorway", "motorway_link"]}}`
/// or `{"any": ["urban", {"lanes_per_direction_at_least": 2}]}`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    Urban,
    Rural,
    /// The tag is present and, if `values` is non-empty, has one of them.
    Tag {
        key: String,
        #[serde(default)]
        values: Vec<String>,
    },
    LanesPerDirectionAtLeast(u8),
    All(Vec<Filter>),
    Any(Vec<Filter>),
    Not(Box<Filter>),
}

impl Filter {
    pub fn matches(&self, tags: &Tags, is_urban: bool) -> bool {
        match self {
            Filter::Urban => is_urban,
            Filter::Rural => !is_urban,
            Filter::Tag { key, values } if values.is_empty() => tags.contains_key(key),
            Filter::Tag { key, values } => tags.has_any(key, values.as_slice()),
            Filter::LanesPerDirectionAtLeast(minimum) => {
                lanes_per_direction(tags).is_some_and(|lanes| lanes >= *minimum)
            }
            Filter::All(filters) => filters.iter().all(|filter| filter.matches(tags, is_urban)),
            Filter::Any(filters) => filters.iter().any(|filter| filter.matches(tags, is_urban)),
            Filter::Not(filter) => !filter.matches(tags, is_urban),
        }
    }
}

/// Lanes available to traffic in one direction.
///
/// On two-way roads the `lanes` total is shared between the directions.
fn lanes_per_direction(tags: &Tags) -> Option<u8> {
    let total: u8 = tags.get("lanes")?.trim().parse().ok()?;
    if tags.has_any("oneway", &["yes", "true", "1", "-1"]) {
        Some(total)
    } else {
        Some(total / 2)
    }
}
