//! # Legal speed limits for routing graph edges
//!
//! Derives per-edge attributes from OSM way tags,
//! and gives every direction of every edge a speed limit:
//! the tagged one where present, otherwise the legal default of its jurisdiction
//! for the road type and urban or rural context.
//!
//! ```text
//! way tags ──▶ OsmParsers (pass 1) ──▶ EdgeRecordStore
//!                 │                         ▲
//!                 └─ LegalSpeedParser       │ urban density (external)
//!                      └─ candidates ──▶ LegalSpeedEngine::fill_max_speeds (pass 2)
//! ```

#[macro_use]
mod macros;

pub mod attributes;
pub mod legal_defaults;
mod legal_speed;
pub mod tag_parsing;
mod tags;

pub use attributes::EdgeAttributes;
pub use legal_defaults::{LegalDefault, LegalDefaultLookup, LegalDefaultSpeeds, LegalDefaultsError};
pub use legal_speed::{FillStats, LegalSpeedEngine, LegalSpeedParser};
pub use tag_parsing::{OsmParsers, TagParser, WayTagParser};
pub use tags::{OsmWay, RelationContext, Tags};
