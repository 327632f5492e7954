use super::TagParser;
use crate::attributes::{RoadClass, Surface};
use crate::tags::{OsmWay, RelationContext};
use valinor_encoded_values::{
    BooleanAttribute, DecimalAttribute, DecimalValue, EnumAttribute, SegmentEdges,
};

#[derive(Clone, Debug)]
pub struct RoadClassParser {
    road_class: EnumAttribute<RoadClass>,
}

impl RoadClassParser {
    pub fn new(road_class: EnumAttribute<RoadClass>) -> Self {
        Self { road_class }
    }
}

impl TagParser for RoadClassParser {
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        _relations: &RelationContext,
    ) {
        let class = way
            .tags
            .get("highway")
            .map_or(RoadClass::Other, RoadClass::from_highway);
        edges.update(|_, record| self.road_class.set(false, record, class));
    }
}

#[derive(Clone, Debug)]
pub struct SurfaceParser {
    surface: EnumAttribute<Surface>,
}

impl SurfaceParser {
    pub fn new(surface: EnumAttribute<Surface>) -> Self {
        Self { surface }
    }
}

impl TagParser for SurfaceParser {
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        _relations: &RelationContext,
    ) {
        let surface = way
            .tags
            .get("surface")
            .map_or(Surface::Missing, Surface::from_tag);
        edges.update(|_, record| self.surface.set(false, record, surface));
    }
}

/// Stores the total lane count from the `lanes` tag.
#[derive(Clone, Debug)]
pub struct LanesParser {
    lanes: DecimalAttribute,
}

impl LanesParser {
    pub fn new(lanes: DecimalAttribute) -> Self {
        Self { lanes }
    }
}

impl TagParser for LanesParser {
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        _relations: &RelationContext,
    ) {
        let lanes = way
            .tags
            .get("lanes")
            .and_then(|value| value.trim().parse::<u8>().ok())
            .filter(|lanes| *lanes > 0)
            .map_or(DecimalValue::Unset, |lanes| {
                DecimalValue::Finite(f64::from(lanes))
            });
        edges.update(|_, record| self.lanes.set(false, record, lanes));
    }
}

/// Marks ways tagged `junction=roundabout` or `junction=circular`.
#[derive(Clone, Debug)]
pub struct RoundaboutParser {
    roundabout: BooleanAttribute,
}

impl RoundaboutParser {
    pub fn new(roundabout: BooleanAttribute) -> Self {
        Self { roundabout }
    }
}

impl TagParser for RoundaboutParser {
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        _relations: &RelationContext,
    ) {
        let roundabout = way.tags.has_any("junction", &["roundabout", "circular"]);
        edges.update(|_, record| self.roundabout.set(false, record, roundabout));
    }
}
