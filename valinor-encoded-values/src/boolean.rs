use crate::record::EdgeRecord;
use crate::registry::AttributeSlot;

/// A single-bit flag (optionally one bit per direction).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BooleanAttribute {
    slot: AttributeSlot,
}

impl BooleanAttribute {
    pub(crate) fn new(slot: AttributeSlot) -> Self {
        Self { slot }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.slot.name()
    }

    #[inline]
    pub fn is_directional(&self) -> bool {
        self.slot.is_directional()
    }

    #[inline]
    pub fn get(&self, reverse: bool, record: EdgeRecord) -> bool {
        record.read(self.slot.range(reverse)) != 0
    }

    #[inline]
    #[must_use]
    pub fn set(&self, reverse: bool, record: EdgeRecord, value: bool) -> EdgeRecord {
        record.write(self.slot.range(reverse), value.into())
    }

    #[inline]
    #[must_use]
    pub fn set_both(&self, record: EdgeRecord, forward: bool, backward: bool) -> EdgeRecord {
        self.set(true, self.set(false, record, forward), backward)
    }
}
