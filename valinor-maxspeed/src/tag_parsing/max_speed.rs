use super::TagParser;
use super::speed::parse_speed;
use crate::tags::{OsmWay, RelationContext};
use tracing::debug;
use valinor_encoded_values::{BooleanAttribute, DecimalAttribute, DecimalValue, SegmentEdges};

const MAX_SPEED_KEY: &str = "maxspeed";
const MAX_SPEED_FORWARD_KEY: &str = "maxspeed:forward";
const MAX_SPEED_BACKWARD_KEY: &str = "maxspeed:backward";

/// Stores explicitly tagged speed limits.
///
/// `maxspeed:forward` and `maxspeed:backward` override `maxspeed` for their direction.
/// Malformed values count as untagged, which leaves the direction for legal defaults.
/// Estimated flags from an earlier run are cleared, so re-parsed ways start fresh.
#[derive(Clone, Debug)]
pub struct MaxSpeedParser {
    max_speed: DecimalAttribute,
    max_speed_estimated: BooleanAttribute,
}

impl MaxSpeedParser {
    pub fn new(max_speed: DecimalAttribute, max_speed_estimated: BooleanAttribute) -> Self {
        Self {
            max_speed,
            max_speed_estimated,
        }
    }
}

fn tagged_speed(way: &OsmWay, key: &str) -> Option<DecimalValue> {
    let value = way.tags.get(key)?;
    let speed = parse_speed(value);
    if speed.is_none() {
        debug!(way = way.id, key, value, "Ignoring malformed speed");
    }
    speed
}

impl TagParser for MaxSpeedParser {
    fn handle_way_tags(
        &mut self,
        edges: &mut SegmentEdges<'_>,
        way: &OsmWay,
        _relations: &RelationContext,
    ) {
        let both = tagged_speed(way, MAX_SPEED_KEY);
        let forward = tagged_speed(way, MAX_SPEED_FORWARD_KEY)
            .or(both)
            .unwrap_or(DecimalValue::Unset);
        let backward = tagged_speed(way, MAX_SPEED_BACKWARD_KEY)
            .or(both)
            .unwrap_or(DecimalValue::Unset);

        edges.update(|_, record| {
            let record = self.max_speed.set_both(record, forward, backward);
            self.max_speed_estimated.set_both(record, false, false)
        });
    }
}
