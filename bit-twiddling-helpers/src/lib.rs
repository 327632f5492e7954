//! Helpers for packing values into native integer words,
//! and for converting between native integers and zerocopy endian-aware wrappers.

/// Pure shift/mask transforms over a 64-bit word.
///
/// Offsets count from the least significant bit.
/// Callers are responsible for keeping `offset + width <= 64`;
/// the registry that hands out bit ranges guarantees this.
pub mod word {
    /// A mask with the lowest `width` bits set.
    #[inline]
    pub const fn mask(width: u32) -> u64 {
        if width >= u64::BITS {
            u64::MAX
        } else {
            (1 << width) - 1
        }
    }

    /// Reads `width` bits starting at `offset`.
    #[inline]
    pub const fn extract(word: u64, offset: u32, width: u32) -> u64 {
        (word >> offset) & mask(width)
    }

    /// Writes the low `width` bits of `value` at `offset`, leaving every other bit untouched.
    ///
    /// Bits of `value` above `width` are discarded.
    #[inline]
    pub const fn deposit(word: u64, offset: u32, width: u32, value: u64) -> u64 {
        let field = mask(width) << offset;
        (word & !field) | ((value << offset) & field)
    }

    /// The number of bits required to store codes `0..count`.
    ///
    /// Always at least one bit.
    #[inline]
    pub const fn bits_for_codes(count: u64) -> u32 {
        if count <= 2 {
            1
        } else {
            u64::BITS - (count - 1).leading_zeros()
        }
    }
}

pub mod conv_u64le {
    use zerocopy::{LE, U64};
    pub const fn from_inner(n: u64) -> U64<LE> {
        U64::<LE>::new(n)
    }
    pub const fn into_inner(v: U64<LE>) -> u64 {
        v.get()
    }
}

pub mod conv_u32le {
    use zerocopy::{LE, U32};
    pub const fn from_inner(n: u32) -> U32<LE> {
        U32::<LE>::new(n)
    }
    pub const fn into_inner(v: U32<LE>) -> u32 {
        v.get()
    }
}
