//! Memory interface seen by the CPU core.
//!
//! The core only ever calls [`Bus::fetch_opcode_word`]; the data accessors
//! are there for the instruction semantics plugged into the dispatcher.
//! Wait states and open-bus behaviour belong to the implementor.

use serde::{Deserialize, Serialize};

pub trait Bus {
    /// Reads the instruction word at `address`. Must not touch CPU state.
    fn fetch_opcode_word(&mut self, address: u32) -> u32 {
        self.read_word(address)
    }

    fn read_word(&mut self, address: u32) -> u32;

    fn read_half_word(&mut self, address: u32) -> u16;

    fn read_byte(&mut self, address: u32) -> u8;

    fn write_word(&mut self, address: u32, value: u32);

    fn write_half_word(&mut self, address: u32, value: u16);

    fn write_byte(&mut self, address: u32, value: u8);
}

/// Little-endian RAM mirrored over the whole address space.
///
/// Accesses are force-aligned to their width, like the ARM7TDMI bus does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlatMemory {
    data: Vec<u8>,
    mask: u32,
}

impl FlatMemory {
    /// `size` must be a power of two, at least one word.
    #[must_use]
    pub fn new(size: usize) -> Self {
        assert!(
            size.is_power_of_two() && size >= 4,
            "memory size must be a power of two >= 4, got {size}"
        );
        let mask = u32::try_from(size - 1).unwrap_or(u32::MAX);
        Self {
            data: vec![0; size],
            mask,
        }
    }

    /// Writes `words` starting at `address`.
    pub fn load_words(&mut self, address: u32, words: &[u32]) {
        let mut address = address;
        for &word in words {
            self.write_word(address, word);
            address = address.wrapping_add(4);
        }
    }

    fn index(&self, address: u32) -> usize {
        (address & self.mask) as usize
    }
}

impl Bus for FlatMemory {
    fn read_word(&mut self, address: u32) -> u32 {
        let base = self.index(address & !0b11);
        u32::from_le_bytes([
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
            self.data[base + 3],
        ])
    }

    fn read_half_word(&mut self, address: u32) -> u16 {
        let base = self.index(address & !0b1);
        u16::from_le_bytes([self.data[base], self.data[base + 1]])
    }

    fn read_byte(&mut self, address: u32) -> u8 {
        self.data[self.index(address)]
    }

    fn write_word(&mut self, address: u32, value: u32) {
        let base = self.index(address & !0b11);
        self.data[base..base + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn write_half_word(&mut self, address: u32, value: u16) {
        let base = self.index(address & !0b1);
        self.data[base..base + 2].copy_from_slice(&value.to_le_bytes());
    }

    fn write_byte(&mut self, address: u32, value: u8) {
        let index = self.index(address);
        self.data[index] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn little_endian_access() {
        let mut memory = FlatMemory::new(0x100);
        memory.write_word(0x10, 0x1122_3344);

        assert_eq!(memory.read_byte(0x10), 0x44);
        assert_eq!(memory.read_half_word(0x12), 0x1122);
        assert_eq!(memory.fetch_opcode_word(0x10), 0x1122_3344);
    }

    #[test]
    fn accesses_are_aligned_and_mirrored() {
        let mut memory = FlatMemory::new(0x100);
        memory.load_words(0xFC, &[0xE1A0_0000, 0xEAFF_FFFE]);

        assert_eq!(memory.read_word(0xFE), 0xE1A0_0000);
        assert_eq!(memory.read_word(0x100), 0xEAFF_FFFE);
        assert_eq!(memory.read_word(0x0), 0xEAFF_FFFE);
    }

    #[test]
    #[should_panic(expected = "power of two")]
    fn size_must_be_power_of_two() {
        let _ = FlatMemory::new(100);
    }
}
