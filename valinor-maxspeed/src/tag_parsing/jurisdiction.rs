use super::TagParser;
use crate::attributes::{Country, State};
use crate::tags::{OsmWay, RelationContext};
use tracing::debug;
use valinor_encoded_values::{EnumAttribute, SegmentEdges};

/// Way tag holding the ISO 3166-1 alpha-3 code of the enclosing country.
pub const COUNTRY_KEY: &str = "country";
/// Way tag holding the ISO 3166-2 code of the enclosing state.
pub const STATE_KEY: &str = "country_state";
const BOUNDARY_COUNTRY_KEY: &str = "ISO3166-1:alpha3";
const BOUNDARY_STATE_KEY: &str = "ISO3166-2";

/// Finds the country of a way.
///
/// A `country` tag on the way wins over the administrative boundaries it is a member of.
pub(crate) fn country_of(way: &OsmWay, relations: &RelationContext) -> Country {
    way.tags
        .get(COUNTRY_KEY)
        .and_then(Country::from_alpha3)
        .or_else(|| {
            relations
                .administrative_boundaries()
                .find_map(|boundary| boundary.get(BOUNDARY_COUNTRY_KEY))
                .and_then(Country::from_alpha3)
        })
        .unwrap_or(Country::Missing)
}

/// Finds the state of a way, tagged or from the administrative boundaries.
pub(crate) fn state_of(way: &OsmWay, relations: &RelationContext) -> State {
    way.tags
        .get(STATE_KEY)
        .and_then(State::from_code)
        .or_else(|| {
            relations
                .administrative_boundaries()
                .filter_map(|boundary| boundary.get(BOUNDARY_STATE_KEY))
                .find_map(State::from_code)
        })
        .unwrap_or(State::Missing)
}

#[derive(Clone, Debug)]
pub struct CountryParser {
    country: EnumAttribute<Country>,
}

impl CountryParser {
    pub fn new(country: EnumAttribute<Country>) -> Self {
        Self { country }
    }
}

impl TagParser for CountryParser {
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        relations: &RelationContext,
    ) {
        let country = country_of(way, relations);
        edges.update(|_, record| self.country.set(false, record, country));
    }
}

/// Stores the state of a way, as long as it belongs to the country already stored on the edges.
///
/// Must run after [`CountryParser`].
#[derive(Clone, Debug)]
pub struct StateParser {
    country: EnumAttribute<Country>,
    state: EnumAttribute<State>,
}

impl StateParser {
    pub fn new(country: EnumAttribute<Country>, state: EnumAttribute<State>) -> Self {
        Self { country, state }
    }
}

impl TagParser for StateParser {
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        relations: &RelationContext,
    ) {
        let Some(first) = edges.first() else {
            return;
        };

        let country = self.country.get(false, first);
        let state = match state_of(way, relations) {
            State::Missing => State::Missing,
            state if state.country() == country => state,
            state => {
                debug!(
                    way = way.id,
                    state = state.code(),
                    country = country.alpha3(),
                    "Ignoring state outside of the way's country"
                );
                State::Missing
            }
        };
        edges.update(|_, record| self.state.set(false, record, state));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::EdgeAttributes;
    use crate::tags::Tags;
    use valinor_encoded_values::EdgeRecordStore;

    fn parse(tags: Tags, relations: Vec<Tags>) -> (Country, State) {
        let (_, attributes) = EdgeAttributes::standard().unwrap();
        let mut store = EdgeRecordStore::new();
        let range = store.create_edges(2);
        let way = OsmWay::new(1, tags);
        let relations = RelationContext::new(relations);

        let mut edges = store.segment_mut(range);
        CountryParser::new(attributes.country.clone()).handle_way_tags(
            &mut edges,
            &way,
            &relations,
        );
        StateParser::new(attributes.country.clone(), attributes.state.clone()).handle_way_tags(
            &mut edges,
            &way,
            &relations,
        );

        let last = store.get(1).unwrap();
        (
            attributes.country.get(false, last),
            attributes.state.get(false, last),
        )
    }

    #[test]
    fn test_way_tags() {
        let tags = Tags::new()
            .with_tag(COUNTRY_KEY, "USA")
            .with_tag(STATE_KEY, "US-CA");
        assert_eq!(
            parse(tags, vec![]),
            (Country::UnitedStates, State::UsCalifornia)
        );
    }

    #[test]
    fn test_boundary_relations() {
        let boundary = Tags::new()
            .with_tag("boundary", "administrative")
            .with_tag(BOUNDARY_COUNTRY_KEY, "CAN")
            .with_tag(BOUNDARY_STATE_KEY, "CA-QC");
        assert_eq!(
            parse(Tags::new(), vec![boundary]),
            (Country::Canada, State::CaQuebec)
        );
    }

    #[test]
    fn test_non_administrative_relations_are_ignored() {
        let relation = Tags::new()
            .with_tag("boundary", "postal_code")
            .with_tag(BOUNDARY_COUNTRY_KEY, "CAN");
        assert_eq!(
            parse(Tags::new(), vec![relation]),
            (Country::Missing, State::Missing)
        );
    }

    #[test]
    fn test_state_of_another_country_is_dropped() {
        let tags = Tags::new()
            .with_tag(COUNTRY_KEY, "DEU")
            .with_tag(STATE_KEY, "US-FL");
        assert_eq!(parse(tags, vec![]), (Country::Germany, State::Missing));
    }

    #[test]
    fn test_countries_without_rules_are_stored() {
        let tags = Tags::new().with_tag(COUNTRY_KEY, "SWE");
        assert_eq!(parse(tags, vec![]), (Country::Sweden, State::Missing));
    }

    #[test]
    fn test_unknown_codes() {
        let tags = Tags::new()
            .with_tag(COUNTRY_KEY, "XYZ")
            .with_tag(STATE_KEY, "US-ZZ");
        assert_eq!(parse(tags, vec![]), (Country::Missing, State::Missing));
    }
}
