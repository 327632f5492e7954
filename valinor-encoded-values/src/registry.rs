//! # Attribute registry
//!
//! The registry hands out non-overlapping bit ranges within an [`EdgeRecord`](crate::EdgeRecord)
//! to a set of named attributes.
//! Ranges are assigned in registration order, starting at bit 0,
//! so the registration order *is* the record schema:
//! two registries built in a different order cannot read each other's records.
//! Use [`AttributeRegistry::layout_bytes`] and [`AttributeRegistry::check_layout`]
//! to persist and verify a schema alongside stored records.

mod layout;

use crate::boolean::BooleanAttribute;
use crate::decimal::{DecimalAttribute, DecimalSpec};
use crate::enumerated::{EncodedEnum, EnumAttribute};
use crate::record::{BitRange, MAX_RECORD_BITS};
use thiserror::Error;

pub use layout::LayoutEntry;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Records are limited to {MAX_RECORD_BITS} bits, but {0} were requested.")]
    RecordTooWide(u32),
    #[error(
        "Attribute {name} needs {required} bits, but only {available} of the record remain free."
    )]
    Capacity {
        name: String,
        required: u32,
        available: u32,
    },
    #[error("An attribute named {0} is already registered.")]
    DuplicateName(String),
    #[error("Invalid descriptor for attribute {name}: {reason}")]
    InvalidDescriptor { name: String, reason: String },
    #[error("No attribute named {0} is registered.")]
    UnknownAttribute(String),
    #[error("Attribute {name} is not {expected}.")]
    WrongKind { name: String, expected: &'static str },
    #[error("Stored layout does not match this registry: {0}")]
    LayoutMismatch(String),
}

/// What an attribute stores.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ValueKind {
    Boolean,
    Decimal(DecimalSpec),
    Enumerated { variant_count: u8 },
}

impl ValueKind {
    /// The width of a single (one direction) copy of the value.
    pub fn bits(&self) -> u32 {
        match self {
            ValueKind::Boolean => 1,
            ValueKind::Decimal(spec) => spec.bits(),
            ValueKind::Enumerated { variant_count } => {
                bit_twiddling_helpers::word::bits_for_codes(u64::from(*variant_count))
            }
        }
    }
}

/// Describes an attribute to be registered.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeDescriptor {
    name: String,
    kind: ValueKind,
    directional: bool,
}

impl AttributeDescriptor {
    pub fn new(name: impl Into<String>, kind: ValueKind, directional: bool) -> Self {
        Self {
            name: name.into(),
            kind,
            directional,
        }
    }

    pub fn boolean(name: impl Into<String>, directional: bool) -> Self {
        Self::new(name, ValueKind::Boolean, directional)
    }

    pub fn decimal(name: impl Into<String>, spec: DecimalSpec, directional: bool) -> Self {
        Self::new(name, ValueKind::Decimal(spec), directional)
    }

    pub fn enumerated<E: EncodedEnum>(name: impl Into<String>, directional: bool) -> Self {
        Self::new(
            name,
            ValueKind::Enumerated {
                variant_count: E::VARIANT_COUNT,
            },
            directional,
        )
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Is the value stored independently for the forward and backward direction?
    #[inline]
    pub fn is_directional(&self) -> bool {
        self.directional
    }

    /// The total number of record bits the attribute occupies.
    pub fn storage_bits(&self) -> u32 {
        if self.directional {
            self.kind.bits() * 2
        } else {
            self.kind.bits()
        }
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidDescriptor {
            name: self.name.clone(),
            reason,
        };
        if self.name.is_empty() {
            return Err(invalid("name must not be empty".to_string()));
        }
        match &self.kind {
            ValueKind::Boolean => Ok(()),
            ValueKind::Decimal(spec) => spec.validate().map_err(invalid),
            ValueKind::Enumerated { variant_count: 0 } => {
                Err(invalid("an enum needs at least one variant".to_string()))
            }
            ValueKind::Enumerated { .. } => Ok(()),
        }
    }
}

/// The bit ranges assigned to an attribute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeSlot {
    name: String,
    forward: BitRange,
    backward: Option<BitRange>,
}

impl AttributeSlot {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_directional(&self) -> bool {
        self.backward.is_some()
    }

    /// The range holding the value for the given direction.
    #[inline]
    pub fn range(&self, reverse: bool) -> BitRange {
        match self.backward {
            Some(backward) if reverse => backward,
            _ => self.forward,
        }
    }
}

/// A descriptor together with its assigned bits.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisteredAttribute {
    descriptor: AttributeDescriptor,
    slot: AttributeSlot,
}

impl RegisteredAttribute {
    #[inline]
    pub fn descriptor(&self) -> &AttributeDescriptor {
        &self.descriptor
    }

    #[inline]
    pub fn slot(&self) -> &AttributeSlot {
        &self.slot
    }
}

/// Collects attribute descriptors and assigns them bit ranges.
///
/// [`finalize`](Self::finalize) consumes the builder,
/// so no attribute can be added once the record layout is fixed.
#[derive(Debug)]
pub struct AttributeRegistryBuilder {
    record_bits: u32,
    next_offset: u32,
    attributes: Vec<RegisteredAttribute>,
}

impl AttributeRegistryBuilder {
    /// Starts a registry for records of `record_bits` bits.
    ///
    /// # Errors
    ///
    /// Fails if `record_bits` is wider than an [`EdgeRecord`](crate::EdgeRecord).
    pub fn new(record_bits: u32) -> Result<Self, RegistryError> {
        if record_bits > MAX_RECORD_BITS {
            return Err(RegistryError::RecordTooWide(record_bits));
        }

        Ok(Self {
            record_bits,
            next_offset: 0,
            attributes: Vec::new(),
        })
    }

    /// The number of bits that are still unassigned.
    #[inline]
    pub fn free_bits(&self) -> u32 {
        self.record_bits - self.next_offset
    }

    /// Assigns the next free bit range(s) to an attribute.
    ///
    /// Direction-aware attributes get two adjacent ranges of the same width,
    /// forward first.
    ///
    /// # Errors
    ///
    /// Fails if the descriptor is invalid, its name is taken,
    /// or it does not fit in the remaining bits of the record.
    pub fn register(
        &mut self,
        descriptor: AttributeDescriptor,
    ) -> Result<AttributeSlot, RegistryError> {
        descriptor.validate()?;

        if self
            .attributes
            .iter()
            .any(|attribute| attribute.descriptor.name == descriptor.name)
        {
            return Err(RegistryError::DuplicateName(descriptor.name));
        }

        let required = descriptor.storage_bits();
        if required > self.free_bits() {
            return Err(RegistryError::Capacity {
                name: descriptor.name,
                required,
                available: self.free_bits(),
            });
        }

        let width = descriptor.kind.bits();
        let forward = BitRange::new(self.next_offset, width);
        let backward = descriptor
            .directional
            .then(|| BitRange::new(forward.end(), width));
        self.next_offset += required;

        let slot = AttributeSlot {
            name: descriptor.name.clone(),
            forward,
            backward,
        };
        self.attributes.push(RegisteredAttribute {
            descriptor,
            slot: slot.clone(),
        });

        Ok(slot)
    }

    /// Registers a boolean attribute.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn add_boolean(
        &mut self,
        name: &str,
        directional: bool,
    ) -> Result<BooleanAttribute, RegistryError> {
        self.register(AttributeDescriptor::boolean(name, directional))
            .map(BooleanAttribute::new)
    }

    /// Registers a decimal attribute.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn add_decimal(
        &mut self,
        name: &str,
        spec: DecimalSpec,
        directional: bool,
    ) -> Result<DecimalAttribute, RegistryError> {
        self.register(AttributeDescriptor::decimal(name, spec, directional))
            .map(|slot| DecimalAttribute::new(slot, spec))
    }

    /// Registers an enum attribute.
    ///
    /// # Errors
    ///
    /// See [`register`](Self::register).
    pub fn add_enum<E: EncodedEnum>(
        &mut self,
        name: &str,
        directional: bool,
    ) -> Result<EnumAttribute<E>, RegistryError> {
        self.register(AttributeDescriptor::enumerated::<E>(name, directional))
            .map(EnumAttribute::new)
    }

    /// Fixes the layout.
    pub fn finalize(self) -> AttributeRegistry {
        AttributeRegistry {
            record_bits: self.record_bits,
            used_bits: self.next_offset,
            attributes: self.attributes,
        }
    }
}

/// A finalized record layout.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeRegistry {
    record_bits: u32,
    used_bits: u32,
    attributes: Vec<RegisteredAttribute>,
}

impl AttributeRegistry {
    /// The configured record width.
    #[inline]
    pub fn record_bits(&self) -> u32 {
        self.record_bits
    }

    /// The number of bits assigned to attributes.
    #[inline]
    pub fn used_bits(&self) -> u32 {
        self.used_bits
    }

    /// All attributes, in registration order.
    pub fn attributes(&self) -> impl Iterator<Item = &RegisteredAttribute> {
        self.attributes.iter()
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredAttribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.descriptor.name == name)
    }

    fn find(&self, name: &str) -> Result<&RegisteredAttribute, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownAttribute(name.to_string()))
    }

    /// Looks up a boolean attribute by name.
    ///
    /// # Errors
    ///
    /// Fails if there is no such attribute or it is not a boolean.
    pub fn boolean(&self, name: &str) -> Result<BooleanAttribute, RegistryError> {
        let attribute = self.find(name)?;
        match attribute.descriptor.kind {
            ValueKind::Boolean => Ok(BooleanAttribute::new(attribute.slot.clone())),
            _ => Err(RegistryError::WrongKind {
                name: name.to_string(),
                expected: "a boolean",
            }),
        }
    }

    /// Looks up a decimal attribute by name.
    ///
    /// # Errors
    ///
    /// Fails if there is no such attribute or it is not a decimal.
    pub fn decimal(&self, name: &str) -> Result<DecimalAttribute, RegistryError> {
        let attribute = self.find(name)?;
        match attribute.descriptor.kind {
            ValueKind::Decimal(spec) => Ok(DecimalAttribute::new(attribute.slot.clone(), spec)),
            _ => Err(RegistryError::WrongKind {
                name: name.to_string(),
                expected: "a decimal",
            }),
        }
    }

    /// Looks up an enum attribute by name.
    ///
    /// # Errors
    ///
    /// Fails if there is no such attribute,
    /// or it was not registered with the variant count of `E`.
    pub fn enumerated<E: EncodedEnum>(&self, name: &str) -> Result<EnumAttribute<E>, RegistryError> {
        let attribute = self.find(name)?;
        match attribute.descriptor.kind {
            ValueKind::Enumerated { variant_count } if variant_count == E::VARIANT_COUNT => {
                Ok(EnumAttribute::new(attribute.slot.clone()))
            }
            _ => Err(RegistryError::WrongKind {
                name: name.to_string(),
                expected: "an enum with a matching variant set",
            }),
        }
    }

    /// The packed layout, one entry per attribute in registration order.
    pub fn layout(&self) -> Vec<LayoutEntry> {
        self.attributes.iter().map(LayoutEntry::from).collect()
    }

    /// The layout as little endian bytes, suitable for storing next to the records.
    pub fn layout_bytes(&self) -> Vec<u8> {
        layout::to_bytes(&self.layout())
    }

    /// Verifies that records written under a stored layout can be read by this registry.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::LayoutMismatch`] if the stored layout differs in any way,
    /// including the order in which attributes were registered.
    pub fn check_layout(&self, stored: &[u8]) -> Result<(), RegistryError> {
        let stored = layout::from_bytes(stored)?;
        let current = self.layout();

        if stored.len() != current.len() {
            return Err(RegistryError::LayoutMismatch(format!(
                "expected {} attributes, found {}",
                current.len(),
                stored.len()
            )));
        }

        match stored
            .iter()
            .zip(&current)
            .zip(&self.attributes)
            .find(|((stored, current), _)| stored != current)
        {
            Some(((stored, _), attribute)) => Err(RegistryError::LayoutMismatch(format!(
                "attribute {} is stored as {stored:?}",
                attribute.descriptor.name
            ))),
            None => Ok(()),
        }
    }
}
