//! # ARM Decode Table
//!
//! Decoding an ARM word is a single lookup in a 256 × 16 table:
//!
//! ```text
//! 31-28  27 ........ 20  19 ........ 8  7 .. 4  3 .. 0
//! [Cond] [   primary   ] [           ] [second] [     ]
//! ```
//!
//! The primary index (bits 27-20) carries the instruction class and its
//! P/U/B/W/L or opcode/S bits; the secondary index (bits 7-4) separates the
//! shifter forms from the multiply, swap and halfword transfer encodings
//! that share the same primary values.
//!
//! The table is generated once from the rules in [`classify`] and is
//! read-only afterwards, so a single instance is shared by every core
//! through [`DecodeTable::shared`].

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::cpu::arm::addressing::{
    AddressingMode, BlockMode, Indexing, OffsetKind, Offsetting, PsrKind, ShiftKind,
};
use crate::cpu::arm::operation::{
    AluOp, Half, HalfwordTransferKind, MultiplyLongVariant, MultiplyVariant, Operation,
    SaturatingKind, SignedHalfwordMultiply,
};

pub const PRIMARY_COUNT: usize = 256;
pub const SECONDARY_COUNT: usize = 16;
pub const TABLE_SIZE: usize = PRIMARY_COUNT * SECONDARY_COUNT;

static SHARED: LazyLock<DecodeTable> = LazyLock::new(DecodeTable::build);

/// Bits 27-20 of an instruction word.
#[inline]
#[must_use]
pub const fn primary_index(op_code: u32) -> u8 {
    (op_code >> 20) as u8
}

/// Bits 7-4 of an instruction word.
#[inline]
#[must_use]
pub const fn secondary_index(op_code: u32) -> u8 {
    ((op_code >> 4) & 0xF) as u8
}

/// An (operation handler, addressing-mode resolver) pair.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct DecodeEntry {
    pub operation: Operation,
    pub addressing: AddressingMode,
}

impl DecodeEntry {
    pub const UNDEFINED: Self = Self::new(Operation::Undefined, AddressingMode::None);

    #[must_use]
    pub const fn new(operation: Operation, addressing: AddressingMode) -> Self {
        Self {
            operation,
            addressing,
        }
    }

    #[must_use]
    pub const fn is_undefined(self) -> bool {
        matches!(self.operation, Operation::Undefined)
    }
}

impl std::fmt::Display for DecodeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.operation, self.addressing)
    }
}

/// Total map from (primary, secondary) to a [`DecodeEntry`].
///
/// # Example
///
/// ```
/// use armcore::cpu::arm::decode_table::DecodeTable;
///
/// let table = DecodeTable::shared();
/// // ADDS R0, R1, R2, LSL #3
/// let entry = table.decode(0xE091_0182);
/// assert_eq!(entry.to_string(), "ADDS lli");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable {
    entries: Box<[DecodeEntry]>,
}

impl DecodeTable {
    /// Evaluates the decode rules for all 4096 index pairs.
    #[must_use]
    pub fn build() -> Self {
        let entries: Box<[DecodeEntry]> = (0..TABLE_SIZE)
            .map(|index| {
                let (primary, secondary) = ((index >> 4) as u8, (index & 0xF) as u8);
                classify(primary, secondary)
            })
            .collect();

        let undefined = entries.iter().filter(|entry| entry.is_undefined()).count();
        tracing::debug!(
            "ARM decode table built: {} entries, {} undefined",
            entries.len(),
            undefined
        );

        Self { entries }
    }

    /// Process-wide table, built on first use.
    #[must_use]
    pub fn shared() -> &'static Self {
        &SHARED
    }

    #[inline]
    #[must_use]
    pub fn lookup(&self, primary: u8, secondary: u8) -> DecodeEntry {
        self.entries[(usize::from(primary) << 4) | usize::from(secondary & 0xF)]
    }

    #[inline]
    #[must_use]
    pub fn decode(&self, op_code: u32) -> DecodeEntry {
        self.lookup(primary_index(op_code), secondary_index(op_code))
    }

    /// Every entry with its (primary, secondary) index, in table order.
    pub fn iter(&self) -> impl Iterator<Item = ((u8, u8), DecodeEntry)> + '_ {
        self.entries.iter().enumerate().map(|(index, entry)| {
            let key = ((index >> 4) as u8, (index & 0xF) as u8);
            (key, *entry)
        })
    }
}

const fn bit(value: u8, idx: u8) -> bool {
    (value >> idx) & 1 == 1
}

/// Decode rules. `primary` bit n is instruction bit n + 20, `secondary`
/// bit n is instruction bit n + 4.
fn classify(primary: u8, secondary: u8) -> DecodeEntry {
    match primary >> 5 {
        0b000 => data_processing_register_space(primary, secondary),
        0b001 => data_processing_immediate_space(primary),
        0b010 | 0b011 => single_data_transfer(primary, secondary),
        0b100 => block_data_transfer(primary),
        0b101 => DecodeEntry::new(
            Operation::Branch {
                link: bit(primary, 4),
            },
            AddressingMode::BranchOffset,
        ),
        0b110 => coprocessor_data_transfer(primary),
        _ if bit(primary, 4) => DecodeEntry::new(Operation::SoftwareInterrupt, AddressingMode::None),
        _ => coprocessor_operation(primary, secondary),
    }
}

fn data_processing_register_space(primary: u8, secondary: u8) -> DecodeEntry {
    // Bits 7 and 4 both set: multiply, swap and halfword transfers.
    if secondary & 0b1001 == 0b1001 {
        return if secondary == 0b1001 {
            multiply_or_swap(primary)
        } else {
            halfword_data_transfer(primary, secondary)
        };
    }

    let alu = AluOp::from(u32::from(primary >> 1));
    let set_conditions = bit(primary, 0);
    if alu.is_test() && !set_conditions {
        return miscellaneous(primary, secondary);
    }

    let shift = ShiftKind::from(u32::from(secondary >> 1));
    let addressing = if bit(secondary, 0) {
        AddressingMode::ShiftByRegister(shift)
    } else {
        AddressingMode::ShiftByImmediate(shift)
    };

    DecodeEntry::new(
        Operation::DataProcessing {
            alu,
            set_conditions,
        },
        addressing,
    )
}

fn multiply_or_swap(primary: u8) -> DecodeEntry {
    let set_conditions = bit(primary, 0);
    let operation = match primary {
        0x00..=0x03 => Operation::Multiply {
            variant: if bit(primary, 1) {
                MultiplyVariant::Mla
            } else {
                MultiplyVariant::Mul
            },
            set_conditions,
        },
        0x08..=0x0F => Operation::MultiplyLong {
            variant: MultiplyLongVariant::from(u32::from(primary >> 1)),
            set_conditions,
        },
        0x10 => Operation::SingleDataSwap { byte: false },
        0x14 => Operation::SingleDataSwap { byte: true },
        _ => return DecodeEntry::UNDEFINED,
    };

    DecodeEntry::new(operation, AddressingMode::None)
}

fn halfword_data_transfer(primary: u8, secondary: u8) -> DecodeEntry {
    let kind = match (bit(primary, 0), secondary) {
        (false, 0xB) => HalfwordTransferKind::Strh,
        (false, 0xD) => HalfwordTransferKind::Ldrd,
        (false, _) => HalfwordTransferKind::Strd,
        (true, 0xB) => HalfwordTransferKind::Ldrh,
        (true, 0xD) => HalfwordTransferKind::Ldrsb,
        (true, _) => HalfwordTransferKind::Ldrsh,
    };

    let offset = if bit(primary, 2) {
        OffsetKind::SplitImmediate8
    } else {
        OffsetKind::Register
    };

    DecodeEntry::new(
        Operation::HalfwordDataTransfer(kind),
        AddressingMode::Memory {
            indexing: Indexing::from_bits(bit(primary, 4), bit(primary, 1)),
            offsetting: bit(primary, 3).into(),
            offset,
        },
    )
}

/// TST/TEQ/CMP/CMN encodings with S clear (primary 0x10, 0x12, 0x14, 0x16).
fn miscellaneous(primary: u8, secondary: u8) -> DecodeEntry {
    let psr = PsrKind::from(bit(primary, 2));
    let writes_psr = bit(primary, 1);

    match secondary {
        0x0 => DecodeEntry::new(
            if writes_psr {
                Operation::Msr
            } else {
                Operation::Mrs
            },
            AddressingMode::StatusRegister(psr),
        ),
        0x1 if primary == 0x12 => {
            DecodeEntry::new(Operation::BranchAndExchange, AddressingMode::None)
        }
        0x5 => {
            let kind = match primary {
                0x10 => SaturatingKind::Qadd,
                0x12 => SaturatingKind::Qsub,
                0x14 => SaturatingKind::Qdadd,
                _ => SaturatingKind::Qdsub,
            };
            DecodeEntry::new(Operation::Saturating(kind), AddressingMode::None)
        }
        0x8 | 0xA | 0xC | 0xE => {
            let x = Half::from(bit(secondary, 1));
            let y = Half::from(bit(secondary, 2));
            let kind = match primary {
                0x10 => SignedHalfwordMultiply::Smla { x, y },
                0x12 if x == Half::Bottom => SignedHalfwordMultiply::Smlaw { y },
                0x12 => SignedHalfwordMultiply::Smulw { y },
                0x14 => SignedHalfwordMultiply::Smlal { x, y },
                _ => SignedHalfwordMultiply::Smul { x, y },
            };
            DecodeEntry::new(
                Operation::SignedHalfwordMultiply(kind),
                AddressingMode::None,
            )
        }
        _ => DecodeEntry::UNDEFINED,
    }
}

fn data_processing_immediate_space(primary: u8) -> DecodeEntry {
    let alu = AluOp::from(u32::from(primary >> 1));
    let set_conditions = bit(primary, 0);

    if alu.is_test() && !set_conditions {
        return match primary {
            0x32 => DecodeEntry::new(
                Operation::Msr,
                AddressingMode::StatusRegisterImmediate(PsrKind::Cpsr),
            ),
            0x36 => DecodeEntry::new(
                Operation::Msr,
                AddressingMode::StatusRegisterImmediate(PsrKind::Spsr),
            ),
            _ => DecodeEntry::UNDEFINED,
        };
    }

    DecodeEntry::new(
        Operation::DataProcessing {
            alu,
            set_conditions,
        },
        AddressingMode::Immediate,
    )
}

fn single_data_transfer(primary: u8, secondary: u8) -> DecodeEntry {
    let register_offset = bit(primary, 5);
    if register_offset && bit(secondary, 0) {
        return DecodeEntry::UNDEFINED;
    }

    let pre = bit(primary, 4);
    let write_back = bit(primary, 1);
    let offset = if register_offset {
        OffsetKind::ScaledRegister(ShiftKind::from(u32::from(secondary >> 1)))
    } else {
        OffsetKind::Immediate12
    };

    DecodeEntry::new(
        Operation::SingleDataTransfer {
            load: bit(primary, 0),
            byte: bit(primary, 2),
            translated: !pre && write_back,
        },
        AddressingMode::Memory {
            indexing: Indexing::from_bits(pre, write_back),
            offsetting: Offsetting::from(bit(primary, 3)),
            offset,
        },
    )
}

fn block_data_transfer(primary: u8) -> DecodeEntry {
    DecodeEntry::new(
        Operation::BlockDataTransfer {
            load: bit(primary, 0),
            user_bank: bit(primary, 2),
        },
        AddressingMode::Block {
            mode: BlockMode::from_bits(bit(primary, 4), bit(primary, 3)),
            write_back: bit(primary, 1),
        },
    )
}

fn coprocessor_data_transfer(primary: u8) -> DecodeEntry {
    DecodeEntry::new(
        Operation::CoprocessorDataTransfer {
            load: bit(primary, 0),
        },
        AddressingMode::Memory {
            indexing: Indexing::from_bits(bit(primary, 4), bit(primary, 1)),
            offsetting: Offsetting::from(bit(primary, 3)),
            offset: OffsetKind::WordImmediate8,
        },
    )
}

fn coprocessor_operation(primary: u8, secondary: u8) -> DecodeEntry {
    let operation = if bit(secondary, 0) {
        Operation::CoprocessorRegisterTransfer {
            load: bit(primary, 0),
        }
    } else {
        Operation::CoprocessorDataOperation
    };

    DecodeEntry::new(operation, AddressingMode::None)
}
