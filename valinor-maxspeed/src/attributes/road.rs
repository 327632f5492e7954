use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Serialize;
use valinor_encoded_values::EncodedEnum;

/// The class of a road, derived from its `highway` tag.
///
/// Link roads share the class of the road they connect to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RoadClass {
    Other,
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Unclassified,
    Service,
    Road,
    Track,
    Bridleway,
    Steps,
    Cycleway,
    Path,
    LivingStreet,
    Footway,
    Pedestrian,
    Platform,
    Corridor,
    Construction,
    Busway,
}

impl RoadClass {
    pub fn from_highway(value: &str) -> Self {
        match value {
            "motorway" | "motorway_link" => RoadClass::Motorway,
            "trunk" | "trunk_link" => RoadClass::Trunk,
            "primary" | "primary_link" => RoadClass::Primary,
            "secondary" | "secondary_link" => RoadClass::Secondary,
            "tertiary" | "tertiary_link" => RoadClass::Tertiary,
            "residential" => RoadClass::Residential,
            "unclassified" => RoadClass::Unclassified,
            "service" => RoadClass::Service,
            "road" => RoadClass::Road,
            "track" => RoadClass::Track,
            "bridleway" => RoadClass::Bridleway,
            "steps" => RoadClass::Steps,
            "cycleway" => RoadClass::Cycleway,
            "path" => RoadClass::Path,
            "living_street" => RoadClass::LivingStreet,
            "footway" => RoadClass::Footway,
            "pedestrian" => RoadClass::Pedestrian,
            "platform" => RoadClass::Platform,
            "corridor" => RoadClass::Corridor,
            "construction" => RoadClass::Construction,
            "busway" => RoadClass::Busway,
            _ => RoadClass::Other,
        }
    }
}

impl EncodedEnum for RoadClass {
    const VARIANT_COUNT: u8 = 22;
}

/// The road surface, derived from the `surface` tag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Surface {
    Missing,
    Paved,
    Asphalt,
    Concrete,
    PavingStones,
    Cobblestone,
    Unpaved,
    Compacted,
    FineGravel,
    Gravel,
    Ground,
    Dirt,
    Grass,
    Sand,
    Wood,
    /// Tagged, but with a value we don't classify.
    Other,
}

impl Surface {
    pub fn from_tag(value: &str) -> Self {
        match value {
            "paved" => Surface::Paved,
            "asphalt" | "chipseal" => Surface::Asphalt,
            "concrete" | "concrete:plates" | "concrete:lanes" => Surface::Concrete,
            "paving_stones" | "paving_stones:lanes" => Surface::PavingStones,
            "cobblestone" | "sett" | "unhewn_cobblestone" => Surface::Cobblestone,
            "unpaved" => Surface::Unpaved,
            "compacted" => Surface::Compacted,
            "fine_gravel" => Surface::FineGravel,
            "gravel" | "pebblestone" => Surface::Gravel,
            "ground" | "earth" | "mud" => Surface::Ground,
            "dirt" => Surface::Dirt,
            "grass" | "grass_paver" => Surface::Grass,
            "sand" => Surface::Sand,
            "wood" => Surface::Wood,
            _ => Surface::Other,
        }
    }
}

impl EncodedEnum for Surface {
    const VARIANT_COUNT: u8 = 16;
}

/// Whether an edge lies in a built-up area.
///
/// This is computed outside of the tag pipeline (typically from residential area polygons)
/// and must be written before legal default speeds are resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum UrbanDensity {
    Rural,
    Urban,
}

impl EncodedEnum for UrbanDensity {
    const VARIANT_COUNT: u8 = 2;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_counts() {
        assert_eq!(
            RoadClass::try_from(RoadClass::VARIANT_COUNT - 1).ok(),
            Some(RoadClass::Busway)
        );
        assert!(RoadClass::try_from(RoadClass::VARIANT_COUNT).is_err());
        assert_eq!(
            Surface::try_from(Surface::VARIANT_COUNT - 1).ok(),
            Some(Surface::Other)
        );
        assert!(Surface::try_from(Surface::VARIANT_COUNT).is_err());
        assert_eq!(RoadClass::bits(), 5);
        assert_eq!(Surface::bits(), 4);
        assert_eq!(UrbanDensity::bits(), 1);
    }

    #[test]
    fn test_link_roads_share_class() {
        assert_eq!(RoadClass::from_highway("motorway_link"), RoadClass::Motorway);
        assert_eq!(RoadClass::from_highway("primary_link"), RoadClass::Primary);
        assert_eq!(RoadClass::from_highway("proposed"), RoadClass::Other);
    }

    #[test]
    fn test_surface_synonyms() {
        assert_eq!(Surface::from_tag("sett"), Surface::Cobblestone);
        assert_eq!(Surface::from_tag("earth"), Surface::Ground);
        assert_eq!(Surface::from_tag("moon_dust"), Surface::Other);
        assert_eq!(Surface::from_tag("chipseal"), Surface::Asphalt);
    }
}
