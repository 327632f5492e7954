use bit_twiddling_helpers::{conv_u64le, word};
use std::fmt::{Debug, Formatter};
use std::ops::Range;
use zerocopy::{LE, U64};
use zerocopy_derive::{FromBytes, Immutable, IntoBytes, Unaligned};

/// The index of a directed edge in an [`EdgeRecordStore`].
pub type EdgeId = usize;

/// The widest record a registry may lay out.
pub const MAX_RECORD_BITS: u32 = u64::BITS;

/// A contiguous range of bits within an [`EdgeRecord`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BitRange {
    offset: u32,
    width: u32,
}

impl BitRange {
    pub(crate) const fn new(offset: u32, width: u32) -> Self {
        Self { offset, width }
    }

    /// The position of the least significant bit of the range.
    #[inline]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    #[inline]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// One past the most significant bit of the range.
    #[inline]
    pub const fn end(&self) -> u32 {
        self.offset + self.width
    }
}

/// The fixed-width packed attribute record of a single edge.
///
/// Records are plain values.
/// Attribute setters take a record and hand back the updated copy,
/// which keeps every write confined to the bits of the targeted attribute.
/// The layout is fixed to little endian so a record slice can be persisted as-is.
#[repr(C)]
#[derive(FromBytes, IntoBytes, Immutable, Unaligned, Copy, Clone, PartialEq, Eq)]
pub struct EdgeRecord(U64<LE>);

impl EdgeRecord {
    /// A freshly allocated record.
    ///
    /// Every attribute reads back as its zero value:
    /// `false`, unset, or the first enum variant.
    pub const EMPTY: Self = Self::from_raw(0);

    /// Wraps a raw record value, e.g. one read back from external storage.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(conv_u64le::from_inner(raw))
    }

    #[inline]
    pub const fn raw(self) -> u64 {
        conv_u64le::into_inner(self.0)
    }

    #[inline]
    pub(crate) const fn read(self, range: BitRange) -> u64 {
        word::extract(self.raw(), range.offset, range.width)
    }

    #[inline]
    #[must_use]
    pub(crate) const fn write(self, range: BitRange, value: u64) -> Self {
        Self::from_raw(word::deposit(self.raw(), range.offset, range.width, value))
    }
}

impl Default for EdgeRecord {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Debug for EdgeRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EdgeRecord({:#018x})", self.raw())
    }
}

/// Owned storage for the records of every edge in a graph.
///
/// Edges are created in contiguous batches, one batch per source segment,
/// so the edges realizing a segment can be handed to the tag parsers as a single slice.
#[derive(Debug, Clone, Default)]
pub struct EdgeRecordStore {
    records: Vec<EdgeRecord>,
}

impl EdgeRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates storage for `edge_count` empty records up front.
    pub fn with_edge_count(edge_count: usize) -> Self {
        Self {
            records: vec![EdgeRecord::EMPTY; edge_count],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends `count` empty records and returns their edge IDs.
    pub fn create_edges(&mut self, count: usize) -> Range<EdgeId> {
        let start = self.records.len();
        self.records.resize(start + count, EdgeRecord::EMPTY);
        start..self.records.len()
    }

    /// Grows the store (with empty records) so that `edge` is a valid ID.
    pub fn ensure_edge(&mut self, edge: EdgeId) {
        if edge >= self.records.len() {
            self.records.resize(edge + 1, EdgeRecord::EMPTY);
        }
    }

    /// Gets the record of an edge, if it exists.
    #[inline]
    pub fn get(&self, edge: EdgeId) -> Option<EdgeRecord> {
        self.records.get(edge).copied()
    }

    /// Replaces the record of an edge with the result of `f`.
    ///
    /// # Panics
    ///
    /// Panics if the edge does not exist.
    #[inline]
    pub fn update(&mut self, edge: EdgeId, f: impl FnOnce(EdgeRecord) -> EdgeRecord) {
        let record = &mut self.records[edge];
        *record = f(*record);
    }

    /// A mutable view over the records of a batch of edges.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn segment_mut(&mut self, edges: Range<EdgeId>) -> SegmentEdges<'_> {
        let first_edge = edges.start;
        SegmentEdges::new(first_edge, &mut self.records[edges])
    }

    #[inline]
    pub fn as_slice(&self) -> &[EdgeRecord] {
        &self.records
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [EdgeRecord] {
        &mut self.records
    }

    /// The raw little endian bytes of all records, in edge order.
    pub fn as_bytes(&self) -> &[u8] {
        zerocopy::IntoBytes::as_bytes(self.records.as_slice())
    }
}

/// The records of all edges realizing one source segment.
pub struct SegmentEdges<'s> {
    first_edge: EdgeId,
    records: &'s mut [EdgeRecord],
}

impl<'s> SegmentEdges<'s> {
    pub fn new(first_edge: EdgeId, records: &'s mut [EdgeRecord]) -> Self {
        Self {
            first_edge,
            records,
        }
    }

    #[inline]
    pub fn edge_ids(&self) -> Range<EdgeId> {
        self.first_edge..self.first_edge + self.records.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The record of the first edge.
    ///
    /// Attributes derived from segment tags are identical across all edges of a segment,
    /// so this is the canonical place to read them back from.
    #[inline]
    pub fn first(&self) -> Option<EdgeRecord> {
        self.records.first().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, EdgeRecord)> + '_ {
        self.edge_ids().zip(self.records.iter().copied())
    }

    /// Rewrites every record of the segment.
    pub fn update(&mut self, mut f: impl FnMut(EdgeId, EdgeRecord) -> EdgeRecord) {
        for (edge, record) in self.edge_ids().zip(self.records.iter_mut()) {
            *record = f(edge, *record);
        }
    }
}
