use std::ops::RangeInclusive;

/// Helper methods to read and write bits of a register-sized integer.
/// Bit indices go from lsb to msb (right to left).
pub trait Bits: Copy {
    const WIDTH: u8;

    fn get_bit(self, bit_idx: u8) -> bool;

    fn set_bit(&mut self, bit_idx: u8, value: bool);

    /// Returns the value of `bits_range` moved down to bit 0.
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self;
}

impl Bits for u32 {
    const WIDTH: u8 = Self::BITS as u8;

    #[inline]
    fn get_bit(self, bit_idx: u8) -> bool {
        debug_assert!(bit_idx < Self::WIDTH);
        (self >> bit_idx) & 1 == 1
    }

    #[inline]
    fn set_bit(&mut self, bit_idx: u8, value: bool) {
        debug_assert!(bit_idx < Self::WIDTH);
        let mask = 1 << bit_idx;
        if value {
            *self |= mask;
        } else {
            *self &= !mask;
        }
    }

    #[inline]
    fn get_bits(self, bits_range: RangeInclusive<u8>) -> Self {
        let (start, end) = (*bits_range.start(), *bits_range.end());
        debug_assert!(start <= end && end < Self::WIDTH);
        let length = end - start + 1;
        let mask = if length == Self::WIDTH {
            Self::MAX
        } else {
            (1 << length) - 1
        };
        (self >> start) & mask
    }
}
