//! The edge attributes used by the speed pipeline, and their record layout.

mod jurisdiction;
mod road;

pub use jurisdiction::{Country, State};
pub use road::{RoadClass, Surface, UrbanDensity};

use valinor_encoded_values::{
    AttributeRegistry, AttributeRegistryBuilder, BooleanAttribute, DecimalAttribute, DecimalSpec,
    EnumAttribute, RegistryError,
};

/// Attribute names, as they appear in the registry layout.
pub mod names {
    pub const URBAN_DENSITY: &str = "urban_density";
    pub const COUNTRY: &str = "country";
    pub const STATE: &str = "state";
    pub const ROAD_CLASS: &str = "road_class";
    pub const SURFACE: &str = "surface";
    pub const LANES: &str = "lanes";
    pub const ROUNDABOUT: &str = "roundabout";
    pub const MAX_SPEED: &str = "max_speed";
    pub const MAX_SPEED_ESTIMATED: &str = "max_speed_estimated";
}

/// Width of the primary edge record.
pub const EDGE_RECORD_BITS: u32 = 64;

/// Speeds in km/h, in steps of 2 up to 250, plus a code for "no limit".
pub const MAX_SPEED_SPEC: DecimalSpec = DecimalSpec::new(7, 0.0, 2.0, 250.0).with_unlimited();

/// Lane counts from 1 to 7; anything wider saturates.
pub const LANES_SPEC: DecimalSpec = DecimalSpec::new(3, 1.0, 1.0, 7.0);

/// Typed handles for every attribute of the primary edge record.
///
/// Handles are cheap to clone and can be shared between threads;
/// the records they read and write live in an
/// [`EdgeRecordStore`](valinor_encoded_values::EdgeRecordStore).
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeAttributes {
    pub urban_density: EnumAttribute<UrbanDensity>,
    pub country: EnumAttribute<Country>,
    pub state: EnumAttribute<State>,
    pub road_class: EnumAttribute<RoadClass>,
    pub surface: EnumAttribute<Surface>,
    pub lanes: DecimalAttribute,
    pub roundabout: BooleanAttribute,
    /// Direction-aware.
    pub max_speed: DecimalAttribute,
    /// Direction-aware; set for each direction whose speed came from legal defaults.
    ///
    /// An edge counts as estimated if either direction is.
    pub max_speed_estimated: BooleanAttribute,
}

impl EdgeAttributes {
    /// Registers every attribute, in a fixed order.
    ///
    /// Record layouts depend on registration order,
    /// so this order must not change between the writer and readers of a store.
    ///
    /// # Errors
    ///
    /// Fails if the builder lacks room for the attributes or already uses one of their names.
    pub fn register(builder: &mut AttributeRegistryBuilder) -> Result<Self, RegistryError> {
        Ok(Self {
            urban_density: builder.add_enum(names::URBAN_DENSITY, false)?,
            country: builder.add_enum(names::COUNTRY, false)?,
            state: builder.add_enum(names::STATE, false)?,
            road_class: builder.add_enum(names::ROAD_CLASS, false)?,
            surface: builder.add_enum(names::SURFACE, false)?,
            lanes: builder.add_decimal(names::LANES, LANES_SPEC, false)?,
            roundabout: builder.add_boolean(names::ROUNDABOUT, false)?,
            max_speed: builder.add_decimal(names::MAX_SPEED, MAX_SPEED_SPEC, true)?,
            max_speed_estimated: builder.add_boolean(names::MAX_SPEED_ESTIMATED, true)?,
        })
    }

    /// Builds the standard 64 bit layout.
    ///
    /// # Errors
    ///
    /// Only fails if the attribute set has outgrown [`EDGE_RECORD_BITS`].
    pub fn standard() -> Result<(AttributeRegistry, Self), RegistryError> {
        let mut builder = AttributeRegistryBuilder::new(EDGE_RECORD_BITS)?;
        let attributes = Self::register(&mut builder)?;
        Ok((builder.finalize(), attributes))
    }

    /// Looks up every handle by name in an existing registry.
    ///
    /// # Errors
    ///
    /// Fails if an attribute is missing or was registered with a different kind.
    pub fn from_registry(registry: &AttributeRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            urban_density: registry.enumerated(names::URBAN_DENSITY)?,
            country: registry.enumerated(names::COUNTRY)?,
            state: registry.enumerated(names::STATE)?,
            road_class: registry.enumerated(names::ROAD_CLASS)?,
            surface: registry.enumerated(names::SURFACE)?,
            lanes: registry.decimal(names::LANES)?,
            roundabout: registry.boolean(names::ROUNDABOUT)?,
            max_speed: registry.decimal(names::MAX_SPEED)?,
            max_speed_estimated: registry.boolean(names::MAX_SPEED_ESTIMATED)?,
        })
    }
}
