//! Derivation of edge attributes from way tags.
//!
//! Each parser reads the tags of one way and writes one attribute
//! to every edge the way was split into.
//! Parsers run in the order they were added to [`OsmParsers`],
//! and later parsers may read what earlier ones wrote.

mod jurisdiction;
mod max_speed;
mod road;
mod speed;

pub use jurisdiction::{COUNTRY_KEY, CountryParser, STATE_KEY, StateParser};
pub(crate) use jurisdiction::{country_of, state_of};
pub use max_speed::MaxSpeedParser;
pub use road::{LanesParser, RoadClassParser, RoundaboutParser, SurfaceParser};
pub use speed::{KMH_PER_KNOT, KMH_PER_MPH, WALKING_SPEED_KMH, parse_speed};

use crate::attributes::EdgeAttributes;
use crate::legal_speed::LegalSpeedParser;
use crate::tags::{OsmWay, RelationContext};
use valinor_encoded_values::SegmentEdges;

pub trait TagParser {
    /// Derives attribute values from the tags of `way` and writes them to its edges.
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        relations: &RelationContext,
    );
}

/// Every parser the pipeline knows about.
pub enum WayTagParser<'a> {
    Country(CountryParser),
    State(StateParser),
    RoadClass(RoadClassParser),
    Surface(SurfaceParser),
    Lanes(LanesParser),
    Roundabout(RoundaboutParser),
    MaxSpeed(MaxSpeedParser),
    LegalDefaultSpeeds(LegalSpeedParser<'a>),
}

impl TagParser for WayTagParser<'_> {
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        relations: &RelationContext,
    ) {
        match self {
            WayTagParser::Country(parser) => parser.handle_way_tags(edges, way, relations),
            WayTagParser::State(parser) => parser.handle_way_tags(edges, way, relations),
            WayTagParser::RoadClass(parser) => parser.handle_way_tags(edges, way, relations),
            WayTagParser::Surface(parser) => parser.handle_way_tags(edges, way, relations),
            WayTagParser::Lanes(parser) => parser.handle_way_tags(edges, way, relations),
            WayTagParser::Roundabout(parser) => parser.handle_way_tags(edges, way, relations),
            WayTagParser::MaxSpeed(parser) => parser.handle_way_tags(edges, way, relations),
            WayTagParser::LegalDefaultSpeeds(parser) => {
                parser.handle_way_tags(edges, way, relations);
            }
        }
    }
}

/// An ordered pipeline of tag parsers.
#[derive(Default)]
pub struct OsmParsers<'a> {
    parsers: Vec<WayTagParser<'a>>,
}

impl<'a> OsmParsers<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The full pipeline, with legal default speeds resolved last.
    pub fn standard(attributes: &EdgeAttributes, legal_speeds: LegalSpeedParser<'a>) -> Self {
        Self::new()
            .with_parser(WayTagParser::Country(CountryParser::new(
                attributes.country.clone(),
            )))
            .with_parser(WayTagParser::State(StateParser::new(
                attributes.country.clone(),
                attributes.state.clone(),
            )))
            .with_parser(WayTagParser::RoadClass(RoadClassParser::new(
                attributes.road_class.clone(),
            )))
            .with_parser(WayTagParser::Surface(SurfaceParser::new(
                attributes.surface.clone(),
            )))
            .with_parser(WayTagParser::Lanes(LanesParser::new(
                attributes.lanes.clone(),
            )))
            .with_parser(WayTagParser::Roundabout(RoundaboutParser::new(
                attributes.roundabout.clone(),
            )))
            .with_parser(WayTagParser::MaxSpeed(MaxSpeedParser::new(
                attributes.max_speed.clone(),
                attributes.max_speed_estimated.clone(),
            )))
            .with_parser(WayTagParser::LegalDefaultSpeeds(legal_speeds))
    }

    pub fn add_parser(&mut self, parser: WayTagParser<'a>) {
        self.parsers.push(parser);
    }

    #[must_use]
    pub fn with_parser(mut self, parser: WayTagParser<'a>) -> Self {
        self.add_parser(parser);
        self
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Runs every parser over one way.
    pub fn handle_way(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        relations: &RelationContext,
    ) {
        for parser in &mut self.parsers {
            parser.handle_way_tags(edges, way, relations);
        }
    }
}
