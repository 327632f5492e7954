use super::{Filter, LegalDefault, LegalDefaultLookup};
use crate::tags::Tags;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

const EMBEDDED_RULES: &str = include_str!("../../data/legal_default_speeds.json");

#[derive(Debug, Error)]
pub enum LegalDefaultsError {
    #[error("Unable to read the rule table: {0}")]
    Io(#[from] std::io::Error),
    #[error("The rule table is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rule {index} of {jurisdiction} refers to unknown road type {road_type:?}")]
    UnknownRoadType {
        jurisdiction: String,
        index: usize,
        road_type: String,
    },
}

#[derive(Clone, Debug, Deserialize)]
struct Rule {
    #[serde(default)]
    road_type: Option<String>,
    tags: Tags,
}

/// A versioned table of per-jurisdiction speed rules.
///
/// Each jurisdiction has an ordered rule list; the first rule
/// whose road type matches the way wins, and a rule without a road type matches anything.
/// Road types are named, reusable [`Filter`]s.
/// A subdivision without rules of its own (e.g. `US-WA`) uses its country's (`US`).
#[derive(Clone, Debug, Deserialize)]
pub struct LegalDefaultSpeeds {
    version: String,
    road_types: BTreeMap<String, Filter>,
    jurisdictions: BTreeMap<String, Vec<Rule>>,
}

impl LegalDefaultSpeeds {
    /// The rule table bundled with the crate.
    ///
    /// # Errors
    ///
    /// Fails only if the bundled table is broken.
    pub fn embedded() -> Result<Self, LegalDefaultsError> {
        Self::from_json(EMBEDDED_RULES)
    }

    /// Parses and validates a rule table.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, or if a rule names an undefined road type.
    pub fn from_json(json: &str) -> Result<Self, LegalDefaultsError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Reads a rule table from disk.
    ///
    /// # Errors
    ///
    /// See [`from_json`](Self::from_json); also fails if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, LegalDefaultsError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn jurisdictions(&self) -> impl Iterator<Item = &str> {
        self.jurisdictions.keys().map(String::as_str)
    }

    fn validate(&self) -> Result<(), LegalDefaultsError> {
        for (jurisdiction, rules) in &self.jurisdictions {
            for (index, rule) in rules.iter().enumerate() {
                let unknown = rule
                    .road_type
                    .as_ref()
                    .filter(|road_type| !self.road_types.contains_key(road_type.as_str()));
                if let Some(road_type) = unknown {
                    return Err(LegalDefaultsError::UnknownRoadType {
                        jurisdiction: jurisdiction.clone(),
                        index,
                        road_type: road_type.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The rule list for a jurisdiction, and the key it was found under.
    fn rules_for<'s>(&'s self, jurisdiction: &'s str) -> Option<(&'s str, &'s [Rule])> {
        if let Some(rules) = self.jurisdictions.get(jurisdiction) {
            return Some((jurisdiction, rules));
        }
        let (country, _) = jurisdiction.split_once('-')?;
        self.jurisdictions
            .get(country)
            .map(|rules| (country, rules.as_slice()))
    }
}

impl LegalDefaultLookup for LegalDefaultSpeeds {
    fn has_rules(&self, jurisdiction: &str) -> bool {
        self.rules_for(jurisdiction)
            .is_some_and(|(_, rules)| !rules.is_empty())
    }

    fn lookup(&self, jurisdiction: &str, tags: &Tags, is_urban: bool) -> Option<LegalDefault> {
        let (matched, rules) = self.rules_for(jurisdiction)?;
        let rule = rules.iter().find(|rule| match &rule.road_type {
            None => true,
            Some(road_type) => self
                .road_types
                .get(road_type)
                .is_some_and(|filter| filter.matches(tags, is_urban)),
        })?;

        Some(LegalDefault {
            jurisdiction: matched.to_string(),
            road_type: rule.road_type.clone(),
            tags: rule.tags.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valinor_encoded_values::DecimalValue;

    fn speed(table: &LegalDefaultSpeeds, jurisdiction: &str, tags: &Tags, urban: bool) -> f64 {
        table
            .lookup(jurisdiction, tags, urban)
            .and_then(|rule| rule.max_speed().finite())
            .unwrap_or_else(|| panic!("no finite speed for {jurisdiction}"))
    }

    #[test]
    fn test_embedded_table_is_valid() {
        let table = LegalDefaultSpeeds::embedded().unwrap();
        assert!(!table.version().is_empty());
        assert!(table.jurisdictions().count() > 20);
    }

    #[test]
    fn test_first_match_wins() {
        let table = LegalDefaultSpeeds::embedded().unwrap();
        let motorway = Tags::new().with_tag("highway", "motorway");
        let rule = table.lookup("DE", &motorway, true).unwrap();
        assert_eq!(rule.road_type.as_deref(), Some("motorway"));
        assert_eq!(rule.max_speed(), DecimalValue::Unlimited);

        let primary = Tags::new().with_tag("highway", "primary");
        let rule = table.lookup("DE", &primary, true).unwrap();
        assert_eq!(rule.road_type.as_deref(), Some("urban"));
        let rule = table.lookup("DE", &primary, false).unwrap();
        assert_eq!(rule.road_type, None);
        assert!((rule.max_speed().finite().unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_subdivision_falls_back_to_country() {
        let table = LegalDefaultSpeeds::embedded().unwrap();
        let primary = Tags::new().with_tag("highway", "primary");

        let rule = table.lookup("US-WA", &primary, false).unwrap();
        assert_eq!(rule.jurisdiction, "US");
        let rule = table.lookup("US-FL", &primary, false).unwrap();
        assert_eq!(rule.jurisdiction, "US-FL");
        assert!(table.has_rules("US-WA"));
    }

    #[test]
    fn test_unsupported_jurisdiction() {
        let table = LegalDefaultSpeeds::embedded().unwrap();
        assert!(!table.has_rules("AI"));
        assert!(!table.has_rules("XX-YY"));
        assert_eq!(
            table.lookup("AI", &Tags::new().with_tag("highway", "primary"), false),
            None
        );
    }

    #[test]
    fn test_direction_specific_tags_are_ignored() {
        let table = LegalDefaultSpeeds::embedded().unwrap();
        let tags = Tags::new()
            .with_tag("highway", "primary")
            .with_tag("maxspeed:forward", "30");
        assert!((speed(&table, "DE", &tags, true) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_imperial_rules() {
        let table = LegalDefaultSpeeds::embedded().unwrap();
        let residential = Tags::new().with_tag("highway", "residential");
        assert!((speed(&table, "GB", &residential, true) - 48.280_32).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_road_type_is_rejected() {
        let json = r#"{
            "version": "test",
            "road_types": {"urban": "urban"},
            "jurisdictions": {"XX": [{"road_type": "autobahn", "tags": {"maxspeed": "none"}}]}
        }"#;
        assert!(matches!(
            LegalDefaultSpeeds::from_json(json),
            Err(LegalDefaultsError::UnknownRoadType { index: 0, .. })
        ));
        assert!(matches!(
            LegalDefaultSpeeds::from_json("{"),
            Err(LegalDefaultsError::Json(_))
        ));
    }
}
