use super::{RegisteredAttribute, RegistryError, ValueKind};
use bitfield_struct::bitfield;
use zerocopy::{LE, U32};
use zerocopy_derive::{FromBytes, Immutable, IntoBytes, Unaligned};

const KIND_BOOLEAN: u8 = 0;
const KIND_DECIMAL: u8 = 1;
const KIND_ENUMERATED: u8 = 2;

/// The persisted description of one registered attribute.
///
/// Downstream storage must treat the sequence of entries as a fixed schema:
/// records are only interchangeable between registries with identical entries.
#[bitfield(u32,
    repr = U32<LE>,
    from = bit_twiddling_helpers::conv_u32le::from_inner,
    into = bit_twiddling_helpers::conv_u32le::into_inner
)]
#[derive(FromBytes, IntoBytes, Immutable, Unaligned, PartialEq, Eq)]
pub struct LayoutEntry {
    /// Offset of the forward (or only) copy of the value.
    #[bits(7)]
    pub offset: u8,
    /// Width of a single copy of the value.
    #[bits(7)]
    pub width: u8,
    #[bits(1)]
    pub directional: u8,
    /// 0 = boolean, 1 = decimal, 2 = enum
    #[bits(2)]
    pub kind: u8,
    #[bits(15)]
    _spare: u16,
}

impl From<&RegisteredAttribute> for LayoutEntry {
    fn from(attribute: &RegisteredAttribute) -> Self {
        let range = attribute.slot.range(false);
        let kind = match attribute.descriptor.kind {
            ValueKind::Boolean => KIND_BOOLEAN,
            ValueKind::Decimal(_) => KIND_DECIMAL,
            ValueKind::Enumerated { .. } => KIND_ENUMERATED,
        };

        // Offsets and widths are bounded by the 64 bit record.
        #[expect(clippy::cast_possible_truncation)]
        let offset = range.offset() as u8;
        #[expect(clippy::cast_possible_truncation)]
        let width = range.width() as u8;

        LayoutEntry::new()
            .with_offset(offset)
            .with_width(width)
            .with_directional(attribute.slot.is_directional().into())
            .with_kind(kind)
    }
}

pub(super) fn to_bytes(entries: &[LayoutEntry]) -> Vec<u8> {
    zerocopy::IntoBytes::as_bytes(entries).to_vec()
}

pub(super) fn from_bytes(bytes: &[u8]) -> Result<Vec<LayoutEntry>, RegistryError> {
    const ENTRY_SIZE: usize = size_of::<LayoutEntry>();
    if bytes.len() % ENTRY_SIZE != 0 {
        return Err(RegistryError::LayoutMismatch(format!(
            "{} bytes is not a whole number of {ENTRY_SIZE} byte entries",
            bytes.len()
        )));
    }

    bytes
        .chunks_exact(ENTRY_SIZE)
        .map(|chunk| {
            <LayoutEntry as zerocopy::FromBytes>::read_from_bytes(chunk)
                .map_err(|_| RegistryError::LayoutMismatch("unreadable entry".to_string()))
        })
        .collect()
}
