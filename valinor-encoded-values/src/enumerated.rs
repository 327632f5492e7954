use crate::record::EdgeRecord;
use crate::registry::AttributeSlot;
use std::fmt::Debug;
use std::marker::PhantomData;

/// A closed set of variants with a stable integer mapping.
///
/// Codes must be dense, starting at zero.
/// The variant with code zero is what an empty record reads back as,
/// so it should be the "missing" or default variant.
///
/// The conversions are normally derived with `num_enum`'s
/// `IntoPrimitive` and `TryFromPrimitive`.
pub trait EncodedEnum: Copy + Debug + Into<u8> + TryFrom<u8> + 'static {
    /// The number of declared variants.
    const VARIANT_COUNT: u8;

    /// The field width needed to store any variant.
    fn bits() -> u32 {
        bit_twiddling_helpers::word::bits_for_codes(u64::from(Self::VARIANT_COUNT))
    }
}

/// An attribute holding one variant of an [`EncodedEnum`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumAttribute<E> {
    slot: AttributeSlot,
    _variants: PhantomData<fn() -> E>,
}

impl<E: EncodedEnum> EnumAttribute<E> {
    pub(crate) fn new(slot: AttributeSlot) -> Self {
        Self {
            slot,
            _variants: PhantomData,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.slot.name()
    }

    #[inline]
    pub fn is_directional(&self) -> bool {
        self.slot.is_directional()
    }

    /// Reads the stored variant.
    ///
    /// # Panics
    ///
    /// Panics if the field holds a code outside of the declared variant set.
    /// Correct writers never produce one, so this indicates corrupt records
    /// or a record read with the wrong registry.
    #[inline]
    pub fn get(&self, reverse: bool, record: EdgeRecord) -> E {
        let code = record.read(self.slot.range(reverse));
        match u8::try_from(code).ok().and_then(|code| E::try_from(code).ok()) {
            Some(value) => value,
            None => panic!(
                "Invalid code {code} for enum attribute {} ({} declared variants)",
                self.slot.name(),
                E::VARIANT_COUNT
            ),
        }
    }

    #[inline]
    #[must_use]
    pub fn set(&self, reverse: bool, record: EdgeRecord, value: E) -> EdgeRecord {
        let code: u8 = value.into();
        record.write(self.slot.range(reverse), code.into())
    }
}
