//! Legal speed inference.
//!
//! Whether an edge is urban or rural is only known once the whole graph has been ingested,
//! but the legal default depends on it.
//! So inference runs in two passes:
//!
//! 1. While tags are parsed, [`LegalSpeedParser`] looks up the defaults for *both* contexts
//!    and keeps them as candidates in a private record store.
//! 2. After urban density has been written for every edge,
//!    [`LegalSpeedEngine::fill_max_speeds`] picks the matching candidate for each direction
//!    that has no explicit speed, and flags it as estimated.

use crate::attributes::{Country, EdgeAttributes, MAX_SPEED_SPEC, State, UrbanDensity};
use crate::legal_defaults::LegalDefaultLookup;
use crate::tag_parsing::{TagParser, country_of, state_of};
use crate::tags::{OsmWay, RelationContext, Tags};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use valinor_encoded_values::{
    AttributeRegistryBuilder, DecimalAttribute, DecimalValue, EdgeId, EdgeRecord,
    EdgeRecordStore, RegistryError, SegmentEdges,
};

const CANDIDATE_RECORD_BITS: u32 = 16;

/// Rural and urban default speeds per edge, between the two passes.
#[derive(Debug)]
struct CandidateSpeeds {
    rural: DecimalAttribute,
    urban: DecimalAttribute,
    records: EdgeRecordStore,
}

impl CandidateSpeeds {
    fn new(edge_count: usize) -> Result<Self, RegistryError> {
        let mut builder = AttributeRegistryBuilder::new(CANDIDATE_RECORD_BITS)?;
        let rural = builder.add_decimal("rural_max_speed", MAX_SPEED_SPEC, false)?;
        let urban = builder.add_decimal("urban_max_speed", MAX_SPEED_SPEC, false)?;
        Ok(Self {
            rural,
            urban,
            records: EdgeRecordStore::with_edge_count(edge_count),
        })
    }

    fn store(&mut self, edge: EdgeId, rural: DecimalValue, urban: DecimalValue) {
        self.records.ensure_edge(edge);
        self.records.update(edge, |record| {
            let record = self.rural.set(false, record, rural);
            self.urban.set(false, record, urban)
        });
    }

    /// The candidate for an edge's context. Edges never seen in pass 1 have none.
    fn get(&self, edge: EdgeId, density: UrbanDensity) -> DecimalValue {
        let record = self.records.get(edge).unwrap_or(EdgeRecord::EMPTY);
        match density {
            UrbanDensity::Rural => self.rural.get(false, record),
            UrbanDensity::Urban => self.urban.get(false, record),
        }
    }
}

/// Counts of edge directions by the outcome of [`LegalSpeedEngine::fill_max_speeds`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FillStats {
    /// Directions that kept an explicitly tagged speed.
    pub explicit: usize,
    /// Directions that received a legal default.
    pub estimated: usize,
    /// Directions (explicit or estimated) without a limit.
    pub unlimited: usize,
    /// Directions left without any speed.
    pub unset: usize,
}

impl FillStats {
    fn record(&mut self, value: DecimalValue, estimated: bool) {
        match value {
            DecimalValue::Unset => self.unset += 1,
            _ if estimated => self.estimated += 1,
            _ => self.explicit += 1,
        }
        if value == DecimalValue::Unlimited {
            self.unlimited += 1;
        }
    }

    #[must_use]
    fn merge(self, other: Self) -> Self {
        Self {
            explicit: self.explicit + other.explicit,
            estimated: self.estimated + other.estimated,
            unlimited: self.unlimited + other.unlimited,
            unset: self.unset + other.unset,
        }
    }

    /// The number of directions visited.
    pub fn total(&self) -> usize {
        self.explicit + self.estimated + self.unset
    }
}

/// Infers legal speed limits for edges without an explicit one.
pub struct LegalSpeedEngine {
    lookup: Arc<dyn LegalDefaultLookup>,
    attributes: EdgeAttributes,
    candidates: CandidateSpeeds,
}

impl LegalSpeedEngine {
    /// Creates an engine with candidate storage for `edge_count` edges.
    ///
    /// The candidate store grows if pass 1 sees more edges than that.
    ///
    /// # Errors
    ///
    /// Fails if the candidate record layout cannot be built, which indicates a bug.
    pub fn new(
        lookup: Arc<dyn LegalDefaultLookup>,
        attributes: &EdgeAttributes,
        edge_count: usize,
    ) -> Result<Self, RegistryError> {
        Ok(Self {
            lookup,
            attributes: attributes.clone(),
            candidates: CandidateSpeeds::new(edge_count)?,
        })
    }

    /// The pass 1 pipeline step, to be run after the country, state and explicit speed parsers.
    pub fn parser(&mut self) -> LegalSpeedParser<'_> {
        LegalSpeedParser { engine: self }
    }

    /// The jurisdiction code to look up, from the stored attributes or else the way itself.
    fn jurisdiction(
        &self,
        record: EdgeRecord,
        way: &OsmWay,
        relations: &RelationContext,
    ) -> Option<&'static str> {
        let mut country = self.attributes.country.get(false, record);
        let mut state = self.attributes.state.get(false, record);
        if country == Country::Missing {
            country = country_of(way, relations);
            state = state_of(way, relations);
        }

        match country {
            Country::Missing => None,
            _ if state != State::Missing && state.country() == country => Some(state.code()),
            _ => Some(country.alpha2()),
        }
    }

    fn default_speed(&self, jurisdiction: &str, tags: &Tags, is_urban: bool) -> DecimalValue {
        let Some(rule) = self.lookup.lookup(jurisdiction, tags, is_urban) else {
            return DecimalValue::Unset;
        };
        let speed = rule.max_speed();
        if speed.is_unset() {
            debug!(
                jurisdiction,
                road_type = rule.road_type.as_deref(),
                "Legal default rule has no usable speed"
            );
        }
        speed
    }

    fn compute_candidates(
        &mut self,
        edges: &SegmentEdges<'_>,
        way: &OsmWay,
        relations: &RelationContext,
    ) {
        let Some(first) = edges.first() else {
            return;
        };
        let Some(jurisdiction) = self.jurisdiction(first, way, relations) else {
            return;
        };
        if !self.lookup.has_rules(jurisdiction) {
            debug!(way = way.id, jurisdiction, "No legal default speeds");
            return;
        }

        let rural = self.default_speed(jurisdiction, &way.tags, false);
        let urban = self.default_speed(jurisdiction, &way.tags, true);
        for edge in edges.edge_ids() {
            self.candidates.store(edge, rural, urban);
        }
    }

    /// Pass 2: resolves the final speed of every direction of every edge in `store`.
    ///
    /// Explicit speeds are kept. Other directions get the candidate matching the edge's
    /// urban density and are flagged as estimated (unless there is no candidate).
    /// Directions flagged by an earlier run are re-resolved rather than treated as explicit.
    ///
    /// Consumes the engine; the candidates are of no use afterwards.
    pub fn fill_max_speeds(self, store: &mut EdgeRecordStore) -> FillStats {
        let Self {
            attributes,
            candidates,
            ..
        } = self;

        let stats = store
            .as_mut_slice()
            .par_iter_mut()
            .enumerate()
            .map(|(edge, record)| {
                let density = attributes.urban_density.get(false, *record);
                let candidate = candidates.get(edge, density);
                let (resolved, stats) = resolve_edge(&attributes, *record, candidate);
                *record = resolved;
                stats
            })
            .reduce(FillStats::default, FillStats::merge);

        info!(
            edges = store.len(),
            explicit = stats.explicit,
            estimated = stats.estimated,
            unlimited = stats.unlimited,
            unset = stats.unset,
            "Filled max speeds"
        );
        stats
    }
}

fn resolve_edge(
    attributes: &EdgeAttributes,
    mut record: EdgeRecord,
    candidate: DecimalValue,
) -> (EdgeRecord, FillStats) {
    let mut stats = FillStats::default();
    for reverse in [false, true] {
        let explicit = if attributes.max_speed_estimated.get(reverse, record) {
            DecimalValue::Unset
        } else {
            attributes.max_speed.get(reverse, record)
        };
        let (value, estimated) = if explicit.is_unset() {
            (candidate, !candidate.is_unset())
        } else {
            (explicit, false)
        };

        record = attributes.max_speed.set(reverse, record, value);
        record = attributes
            .max_speed_estimated
            .set(reverse, record, estimated);
        stats.record(value, estimated);
    }
    (record, stats)
}

/// The pass 1 step of a [`LegalSpeedEngine`].
pub struct LegalSpeedParser<'a> {
    engine: &'a mut LegalSpeedEngine,
}

impl TagParser for LegalSpeedParser<'_> {
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        relations: &RelationContext,
    ) {
        self.engine.compute_candidates(edges, way, relations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legal_defaults::LegalDefaultSpeeds;
    use crate::tag_parsing::{
        COUNTRY_KEY, OsmParsers, RoadClassParser, STATE_KEY, WayTagParser,
    };

    struct Edge {
        forward: DecimalValue,
        backward: DecimalValue,
        forward_estimated: bool,
        backward_estimated: bool,
    }

    /// Runs both passes over a single one-edge way.
    fn infer(country: &str, tags: &[(&str, &str)], density: UrbanDensity) -> Edge {
        let mut tags: Tags = tags.iter().copied().collect();
        tags.insert(COUNTRY_KEY, country);
        let (_, attributes) = EdgeAttributes::standard().unwrap();
        let lookup = Arc::new(LegalDefaultSpeeds::embedded().unwrap());
        let mut engine = LegalSpeedEngine::new(lookup, &attributes, 1).unwrap();

        let mut store = EdgeRecordStore::new();
        let range = store.create_edges(1);
        {
            let mut parsers = OsmParsers::standard(&attributes, engine.parser());
            parsers.handle_way(
                &mut store.segment_mut(range),
                &OsmWay::new(1, tags),
                &RelationContext::default(),
            );
        }
        store.update(0, |record| {
            attributes.urban_density.set(false, record, density)
        });
        engine.fill_max_speeds(&mut store);

        let record = store.get(0).unwrap();
        Edge {
            forward: attributes.max_speed.get(false, record),
            backward: attributes.max_speed.get(true, record),
            forward_estimated: attributes.max_speed_estimated.get(false, record),
            backward_estimated: attributes.max_speed_estimated.get(true, record),
        }
    }

    fn speed(country: &str, tags: &[(&str, &str)], density: UrbanDensity) -> DecimalValue {
        let edge = infer(country, tags, density);
        assert_eq!(edge.forward, edge.backward);
        edge.forward
    }

    fn kmh(value: f64) -> DecimalValue {
        DecimalValue::Finite(value)
    }

    #[test]
    fn test_germany_urban_and_rural() {
        let primary = [("highway", "primary")];
        assert_eq!(speed("DEU", &primary, UrbanDensity::Urban), kmh(50.0));
        assert_eq!(speed("DEU", &primary, UrbanDensity::Rural), kmh(100.0));

        let residential = infer("DEU", &[("highway", "residential")], UrbanDensity::Urban);
        assert_eq!(residential.forward, kmh(50.0));
        assert!(residential.forward_estimated && residential.backward_estimated);
        assert_eq!(
            speed("DEU", &[("highway", "residential")], UrbanDensity::Rural),
            kmh(100.0)
        );
    }

    #[test]
    fn test_explicit_speed_wins() {
        let edge = infer(
            "DEU",
            &[("highway", "residential"), ("maxspeed", "70")],
            UrbanDensity::Urban,
        );
        assert_eq!((edge.forward, edge.backward), (kmh(70.0), kmh(70.0)));
        assert!(!edge.forward_estimated && !edge.backward_estimated);
    }

    #[test]
    fn test_unrestricted_motorway() {
        for density in [UrbanDensity::Urban, UrbanDensity::Rural] {
            let edge = infer("DEU", &[("highway", "motorway")], density);
            assert_eq!(edge.forward, DecimalValue::Unlimited);
            assert_eq!(edge.backward, DecimalValue::Unlimited);
            assert!(edge.forward_estimated);
        }
    }

    #[test]
    fn test_both_directions_explicit() {
        let edge = infer(
            "DEU",
            &[
                ("highway", "primary"),
                ("maxspeed:forward", "50"),
                ("maxspeed:backward", "70"),
            ],
            UrbanDensity::Rural,
        );
        assert_eq!(edge.forward, kmh(50.0));
        assert_eq!(edge.backward, kmh(70.0));
        assert!(!edge.forward_estimated && !edge.backward_estimated);
    }

    #[test]
    fn test_forward_only_explicit() {
        let edge = infer(
            "DEU",
            &[("highway", "primary"), ("maxspeed:forward", "50")],
            UrbanDensity::Rural,
        );
        assert_eq!(edge.forward, kmh(50.0));
        assert!(!edge.forward_estimated);
        assert_eq!(edge.backward, kmh(100.0));
        assert!(edge.backward_estimated);
    }

    #[test]
    fn test_living_street() {
        assert_eq!(
            speed("AUT", &[("highway", "living_street")], UrbanDensity::Urban),
            kmh(6.0)
        );
        let edge = infer(
            "DEU",
            &[("highway", "living_street"), ("maxspeed", "30")],
            UrbanDensity::Urban,
        );
        assert_eq!((edge.forward, edge.backward), (kmh(30.0), kmh(30.0)));
        assert!(!edge.backward_estimated);
    }

    #[test]
    fn test_roundabout() {
        assert_eq!(
            speed("CRI", &[("highway", "primary")], UrbanDensity::Urban),
            kmh(50.0)
        );
        assert_eq!(
            speed(
                "CRI",
                &[("highway", "primary"), ("junction", "roundabout")],
                UrbanDensity::Urban
            ),
            kmh(30.0)
        );
    }

    #[test]
    fn test_lanes() {
        assert_eq!(
            speed("CHL", &[("highway", "primary")], UrbanDensity::Rural),
            kmh(100.0)
        );
        assert_eq!(
            speed(
                "CHL",
                &[("highway", "primary"), ("lanes", "4")],
                UrbanDensity::Rural
            ),
            kmh(120.0)
        );
    }

    #[test]
    fn test_surface() {
        assert_eq!(
            speed("LTU", &[("highway", "primary")], UrbanDensity::Rural),
            kmh(90.0)
        );
        assert_eq!(
            speed(
                "LTU",
                &[("highway", "primary"), ("surface", "compacted")],
                UrbanDensity::Rural
            ),
            kmh(70.0)
        );
    }

    #[test]
    fn test_states_differ() {
        let primary = [("highway", "primary")];
        let california = speed(
            "USA",
            &[primary[0], (STATE_KEY, "US-CA")],
            UrbanDensity::Rural,
        );
        let florida = speed(
            "USA",
            &[primary[0], (STATE_KEY, "US-FL")],
            UrbanDensity::Rural,
        );
        // 55 and 60 mph
        assert_eq!(california, kmh(88.0));
        assert_eq!(florida, kmh(96.0));

        let trunk = [("highway", "trunk"), (STATE_KEY, "US-CA")];
        for density in [UrbanDensity::Urban, UrbanDensity::Rural] {
            let limit = speed("USA", &trunk, density).finite().unwrap();
            assert!(limit > 100.0, "{limit}");
        }
    }

    #[test]
    fn test_unsupported_country() {
        let edge = infer("AIA", &[("highway", "primary")], UrbanDensity::Rural);
        assert_eq!(edge.forward, DecimalValue::Unset);
        assert_eq!(edge.backward, DecimalValue::Unset);
        assert!(!edge.forward_estimated && !edge.backward_estimated);

        // Explicit speeds still apply, but nothing is inferred for the other direction
        let edge = infer(
            "AIA",
            &[("highway", "primary"), ("maxspeed:forward", "40")],
            UrbanDensity::Rural,
        );
        assert_eq!(edge.forward, kmh(40.0));
        assert_eq!(edge.backward, DecimalValue::Unset);
    }

    #[test]
    fn test_missing_country() {
        let edge = infer("", &[("highway", "primary")], UrbanDensity::Urban);
        assert_eq!(edge.forward, DecimalValue::Unset);
    }

    #[test]
    fn test_motorway_everywhere() {
        let lookup = LegalDefaultSpeeds::embedded().unwrap();
        let motorway = Tags::new().with_tag("highway", "motorway");
        let jurisdictions = Country::ALL
            .iter()
            .map(|country| country.alpha2())
            .chain(State::ALL.iter().map(|state| state.code()))
            .filter(|jurisdiction| lookup.has_rules(jurisdiction));

        let mut checked = 0;
        for jurisdiction in jurisdictions {
            for is_urban in [false, true] {
                let speed = lookup
                    .lookup(jurisdiction, &motorway, is_urban)
                    .map_or(DecimalValue::Unset, |rule| rule.max_speed());
                match speed {
                    DecimalValue::Unlimited => {}
                    DecimalValue::Finite(kmh) => assert!(kmh >= 80.0, "{jurisdiction}: {kmh}"),
                    DecimalValue::Unset => panic!("{jurisdiction} has no motorway speed"),
                }
            }
            checked += 1;
        }
        assert!(checked > 20);
    }

    #[test]
    fn test_candidates_are_per_segment() {
        let (_, attributes) = EdgeAttributes::standard().unwrap();
        let lookup = Arc::new(LegalDefaultSpeeds::embedded().unwrap());
        // Deliberately undersized
        let mut engine = LegalSpeedEngine::new(lookup, &attributes, 0).unwrap();
        let mut store = EdgeRecordStore::new();
        let relations = RelationContext::default();

        let motorway = store.create_edges(2);
        let residential = store.create_edges(3);
        {
            let mut parsers = OsmParsers::standard(&attributes, engine.parser());
            let way = OsmWay::new(
                1,
                Tags::new()
                    .with_tag("highway", "motorway")
                    .with_tag(COUNTRY_KEY, "FRA"),
            );
            parsers.handle_way(&mut store.segment_mut(motorway), &way, &relations);
            let way = OsmWay::new(
                2,
                Tags::new()
                    .with_tag("highway", "residential")
                    .with_tag(COUNTRY_KEY, "FRA"),
            );
            parsers.handle_way(&mut store.segment_mut(residential), &way, &relations);
        }
        // One urban edge in the middle of the residential way
        store.update(3, |record| {
            attributes
                .urban_density
                .set(false, record, UrbanDensity::Urban)
        });

        let stats = engine.fill_max_speeds(&mut store);
        assert_eq!(
            stats,
            FillStats {
                explicit: 0,
                estimated: 10,
                unlimited: 0,
                unset: 0,
            }
        );

        let speeds: Vec<_> = store
            .as_slice()
            .iter()
            .map(|record| attributes.max_speed.get(false, *record))
            .collect();
        assert_eq!(
            speeds,
            [
                kmh(130.0),
                kmh(130.0),
                kmh(80.0),
                kmh(50.0),
                kmh(80.0)
            ]
        );
    }

    #[test]
    fn test_jurisdiction_from_way_without_country_parser() {
        let (_, attributes) = EdgeAttributes::standard().unwrap();
        let lookup = Arc::new(LegalDefaultSpeeds::embedded().unwrap());
        let mut engine = LegalSpeedEngine::new(lookup, &attributes, 1).unwrap();
        let mut store = EdgeRecordStore::new();
        let range = store.create_edges(1);
        let tags = Tags::new()
            .with_tag("highway", "primary")
            .with_tag(COUNTRY_KEY, "USA")
            .with_tag(STATE_KEY, "US-FL");
        {
            let mut parsers = OsmParsers::new()
                .with_parser(WayTagParser::RoadClass(RoadClassParser::new(
                    attributes.road_class.clone(),
                )))
                .with_parser(WayTagParser::LegalDefaultSpeeds(engine.parser()));
            parsers.handle_way(
                &mut store.segment_mut(range),
                &OsmWay::new(1, tags),
                &RelationContext::default(),
            );
        }

        let record = store.get(0).unwrap();
        assert_eq!(attributes.country.get(false, record), Country::Missing);
        assert_eq!(engine.candidates.get(0, UrbanDensity::Rural), kmh(96.0));

        engine.fill_max_speeds(&mut store);
        let record = store.get(0).unwrap();
        assert_eq!(attributes.max_speed.get(false, record), kmh(96.0));
        assert!(attributes.max_speed_estimated.get(true, record));
    }

    #[test]
    fn test_candidates_stored_for_explicit_ways() {
        let (_, attributes) = EdgeAttributes::standard().unwrap();
        let lookup = Arc::new(LegalDefaultSpeeds::embedded().unwrap());
        let mut engine = LegalSpeedEngine::new(lookup, &attributes, 1).unwrap();
        let mut store = EdgeRecordStore::new();
        let range = store.create_edges(1);
        let tags = Tags::new()
            .with_tag("highway", "primary")
            .with_tag(COUNTRY_KEY, "DEU")
            .with_tag("maxspeed", "70");
        {
            let mut parsers = OsmParsers::standard(&attributes, engine.parser());
            parsers.handle_way(
                &mut store.segment_mut(range),
                &OsmWay::new(1, tags),
                &RelationContext::default(),
            );
        }

        assert_eq!(engine.candidates.get(0, UrbanDensity::Rural), kmh(100.0));
        assert_eq!(engine.candidates.get(0, UrbanDensity::Urban), kmh(50.0));

        let stats = engine.fill_max_speeds(&mut store);
        assert_eq!(stats.explicit, 2);
        let record = store.get(0).unwrap();
        assert_eq!(attributes.max_speed.get(true, record), kmh(70.0));
    }

    #[test]
    fn test_reparsed_explicit_speed_wins_over_earlier_estimate() {
        let (_, attributes) = EdgeAttributes::standard().unwrap();
        let lookup: Arc<dyn LegalDefaultLookup> =
            Arc::new(LegalDefaultSpeeds::embedded().unwrap());
        let mut store = EdgeRecordStore::new();
        let range = store.create_edges(1);
        let relations = RelationContext::default();

        let run = |store: &mut EdgeRecordStore, tags: Tags| {
            let mut engine = LegalSpeedEngine::new(lookup.clone(), &attributes, 1).unwrap();
            {
                let mut parsers = OsmParsers::standard(&attributes, engine.parser());
                parsers.handle_way(
                    &mut store.segment_mut(range.clone()),
                    &OsmWay::new(1, tags),
                    &relations,
                );
            }
            engine.fill_max_speeds(store)
        };

        let primary = Tags::new()
            .with_tag("highway", "primary")
            .with_tag(COUNTRY_KEY, "DEU");
        let stats = run(&mut store, primary.clone());
        assert_eq!(stats.estimated, 2);
        let record = store.get(0).unwrap();
        assert_eq!(attributes.max_speed.get(false, record), kmh(100.0));
        assert!(attributes.max_speed_estimated.get(false, record));

        let stats = run(&mut store, primary.with_tag("maxspeed", "70"));
        assert_eq!(stats.explicit, 2);
        let record = store.get(0).unwrap();
        for reverse in [false, true] {
            assert_eq!(attributes.max_speed.get(reverse, record), kmh(70.0));
            assert!(!attributes.max_speed_estimated.get(reverse, record));
        }
    }

    #[test]
    fn test_refill_keeps_explicit_speeds() {
        let (_, attributes) = EdgeAttributes::standard().unwrap();
        let record = attributes
            .max_speed
            .set(false, EdgeRecord::EMPTY, kmh(30.0));
        let (record, _) = resolve_edge(&attributes, record, kmh(100.0));
        // A second run with a different candidate only changes the estimated direction
        let (record, stats) = resolve_edge(&attributes, record, kmh(50.0));

        assert_eq!(attributes.max_speed.get(false, record), kmh(30.0));
        assert_eq!(attributes.max_speed.get(true, record), kmh(50.0));
        assert_eq!(stats.explicit, 1);
        assert_eq!(stats.estimated, 1);
    }

    #[test]
    fn test_stats_count_unlimited() {
        let (_, attributes) = EdgeAttributes::standard().unwrap();
        let (_, stats) = resolve_edge(&attributes, EdgeRecord::EMPTY, DecimalValue::Unlimited);
        assert_eq!(stats.unlimited, 2);
        assert_eq!(stats.estimated, 2);
        let (_, stats) = resolve_edge(&attributes, EdgeRecord::EMPTY, DecimalValue::Unset);
        assert_eq!(stats.unset, 2);
        assert_eq!(stats.total(), 2);
    }
}
