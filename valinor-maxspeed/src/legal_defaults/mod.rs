//! Default speed limits by jurisdiction, for roads without a tagged limit.

mod filter;
mod table;

pub use filter::Filter;
pub use table::{LegalDefaultSpeeds, LegalDefaultsError};

use crate::tag_parsing::parse_speed;
use crate::tags::Tags;
use valinor_encoded_values::DecimalValue;

/// The outcome of a successful rule lookup.
#[derive(Clone, Debug, PartialEq)]
pub struct LegalDefault {
    /// The rule set that matched (a subdivision can fall back to its country's).
    pub jurisdiction: String,
    /// The road type of the matching rule, if it had one.
    pub road_type: Option<String>,
    /// The tags the rule implies, e.g. `maxspeed=50`.
    pub tags: Tags,
}

impl LegalDefault {
    /// The implied speed limit, in km/h.
    ///
    /// Unset if the rule implies no (parseable) `maxspeed`.
    pub fn max_speed(&self) -> DecimalValue {
        self.tags
            .get("maxspeed")
            .and_then(parse_speed)
            .unwrap_or(DecimalValue::Unset)
    }
}

/// Source of legal default speeds.
///
/// Jurisdictions are named by ISO 3166-1 alpha-2 country codes
/// or ISO 3166-2 subdivision codes.
pub trait LegalDefaultLookup: Send + Sync {
    /// Whether any rules apply in the jurisdiction.
    fn has_rules(&self, jurisdiction: &str) -> bool;

    /// Finds the rule for a way with `tags`, in an urban or rural context.
    fn lookup(&self, jurisdiction: &str, tags: &Tags, is_urban: bool) -> Option<LegalDefault>;
}
