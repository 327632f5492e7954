//! # Encoded edge values
//!
//! Compact, direction-aware storage of heterogeneous per-edge attributes.
//!
//! Every edge owns one fixed-width [`EdgeRecord`].
//! An [`AttributeRegistry`] carves the record into non-overlapping bit ranges,
//! one per registered attribute (two for direction-aware attributes),
//! and hands out typed accessors:
//!
//! * [`BooleanAttribute`] - a single bit
//! * [`DecimalAttribute`] - a bounded, quantized quantity with unset/unlimited sentinels
//! * [`EnumAttribute`] - one variant of a closed [`EncodedEnum`]
//!
//! Accessors are pure functions of the record:
//! reads take a record, writes take a record and return the updated copy.

mod boolean;
mod decimal;
mod enumerated;
mod record;
pub mod registry;

pub use boolean::BooleanAttribute;
pub use decimal::{DecimalAttribute, DecimalSpec, DecimalValue};
pub use enumerated::{EncodedEnum, EnumAttribute};
pub use record::{BitRange, EdgeId, EdgeRecord, EdgeRecordStore, MAX_RECORD_BITS, SegmentEdges};
pub use registry::{
    AttributeDescriptor, AttributeRegistry, AttributeRegistryBuilder, RegistryError, ValueKind,
};
