//! Addressing-mode resolvers a decode entry pairs with its operation.
//!
//! A resolver turns the executing word plus register state into an operand
//! value or a memory address (and, for shifter operands, a carry out). The
//! same operation recurs with many resolvers, so the two are selected
//! independently.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Barrel shifter operation, bits 6-5.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ShiftKind {
    Lsl,
    Lsr,
    Asr,
    Ror,
}

impl From<u32> for ShiftKind {
    fn from(op_code: u32) -> Self {
        match op_code & 0b11 {
            0b00 => Self::Lsl,
            0b01 => Self::Lsr,
            0b10 => Self::Asr,
            _ => Self::Ror,
        }
    }
}

impl ShiftKind {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Lsl => "ll",
            Self::Lsr => "lr",
            Self::Asr => "ar",
            Self::Ror => "rr",
        }
    }
}

/// Which status register an MRS/MSR targets (bit 22).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum PsrKind {
    Cpsr,
    Spsr,
}

impl From<bool> for PsrKind {
    fn from(spsr: bool) -> Self {
        if spsr { Self::Spsr } else { Self::Cpsr }
    }
}

/// When the offset is applied to the base register (bits 24 and 21).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Indexing {
    /// Transfer at base, then write base + offset back.
    Post,

    /// Transfer at base + offset, base unchanged.
    Offset,

    /// Transfer at base + offset and write it back.
    Pre,
}

impl Indexing {
    #[must_use]
    pub const fn from_bits(pre: bool, write_back: bool) -> Self {
        match (pre, write_back) {
            (false, _) => Self::Post,
            (true, false) => Self::Offset,
            (true, true) => Self::Pre,
        }
    }
}

/// Direction the offset moves the base (bit 23).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Offsetting {
    /// Subtract the offset from base.
    Down,

    /// Add the offset to base.
    Up,
}

impl From<bool> for Offsetting {
    fn from(state: bool) -> Self {
        if state { Self::Up } else { Self::Down }
    }
}

/// Where a memory offset comes from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum OffsetKind {
    /// 12-bit immediate in bits 11-0 (LDR/STR).
    Immediate12,

    /// 8-bit immediate split over bits 11-8 and 3-0 (halfword group).
    SplitImmediate8,

    /// Plain Rm (halfword group).
    Register,

    /// Rm shifted by a 5-bit immediate (LDR/STR).
    ScaledRegister(ShiftKind),

    /// 8-bit immediate counted in words (coprocessor transfers).
    WordImmediate8,
}

/// LDM/STM address sequence (bits 24-23).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum BlockMode {
    IncrementAfter,
    IncrementBefore,
    DecrementAfter,
    DecrementBefore,
}

impl BlockMode {
    #[must_use]
    pub const fn from_bits(pre: bool, up: bool) -> Self {
        match (pre, up) {
            (false, true) => Self::IncrementAfter,
            (true, true) => Self::IncrementBefore,
            (false, false) => Self::DecrementAfter,
            (true, false) => Self::DecrementBefore,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum AddressingMode {
    /// No operand to resolve.
    None,

    /// 8-bit immediate rotated right by twice bits 11-8.
    Immediate,

    /// Rm shifted by a 5-bit immediate.
    ShiftByImmediate(ShiftKind),

    /// Rm shifted by the bottom byte of Rs.
    ShiftByRegister(ShiftKind),

    /// MRS source or MSR register-form destination.
    StatusRegister(PsrKind),

    /// MSR with a rotated immediate source.
    StatusRegisterImmediate(PsrKind),

    Memory {
        indexing: Indexing,
        offsetting: Offsetting,
        offset: OffsetKind,
    },

    Block {
        mode: BlockMode,
        write_back: bool,
    },

    /// Signed 24-bit word offset from R15.
    BranchOffset,
}

impl Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::None => f.write_str("NOP"),
            Self::Immediate => f.write_str("imm"),
            Self::ShiftByImmediate(kind) => write!(f, "{}i", kind.prefix()),
            Self::ShiftByRegister(kind) => write!(f, "{}r", kind.prefix()),
            Self::StatusRegister(PsrKind::Cpsr) => f.write_str("rc"),
            Self::StatusRegister(PsrKind::Spsr) => f.write_str("rs"),
            Self::StatusRegisterImmediate(PsrKind::Cpsr) => f.write_str("ic"),
            Self::StatusRegisterImmediate(PsrKind::Spsr) => f.write_str("is"),
            Self::Memory {
                indexing,
                offsetting,
                offset,
            } => {
                f.write_str(match indexing {
                    Indexing::Post => "pt",
                    Indexing::Offset => "of",
                    Indexing::Pre => "pr",
                })?;
                let source = match offset {
                    OffsetKind::Register | OffsetKind::ScaledRegister(_) => "r",
                    OffsetKind::Immediate12
                    | OffsetKind::SplitImmediate8
                    | OffsetKind::WordImmediate8 => "i",
                };
                f.write_str(source)?;
                f.write_str(match offsetting {
                    Offsetting::Down => "m",
                    Offsetting::Up => "p",
                })?;
                match offset {
                    OffsetKind::ScaledRegister(kind) => write!(f, "_{}i", kind.prefix()),
                    OffsetKind::Immediate12 => f.write_str("_12"),
                    OffsetKind::WordImmediate8 => f.write_str("_cp"),
                    OffsetKind::Register | OffsetKind::SplitImmediate8 => Ok(()),
                }
            }
            Self::Block { mode, write_back } => {
                f.write_str(match mode {
                    BlockMode::IncrementAfter => "ia",
                    BlockMode::IncrementBefore => "ib",
                    BlockMode::DecrementAfter => "da",
                    BlockMode::DecrementBefore => "db",
                })?;
                if write_back {
                    f.write_str("w")?;
                }
                Ok(())
            }
            Self::BranchOffset => f.write_str("off"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indexing_from_p_and_w() {
        assert_eq!(Indexing::from_bits(false, false), Indexing::Post);
        assert_eq!(Indexing::from_bits(false, true), Indexing::Post);
        assert_eq!(Indexing::from_bits(true, false), Indexing::Offset);
        assert_eq!(Indexing::from_bits(true, true), Indexing::Pre);
    }

    #[test]
    fn block_mode_from_p_and_u() {
        assert_eq!(BlockMode::from_bits(false, true), BlockMode::IncrementAfter);
        assert_eq!(BlockMode::from_bits(true, false), BlockMode::DecrementBefore);
    }

    #[test]
    fn resolver_names() {
        assert_eq!(AddressingMode::ShiftByImmediate(ShiftKind::Asr).to_string(), "ari");
        assert_eq!(AddressingMode::ShiftByRegister(ShiftKind::Ror).to_string(), "rrr");
        assert_eq!(
            AddressingMode::Memory {
                indexing: Indexing::Pre,
                offsetting: Offsetting::Down,
                offset: OffsetKind::Register,
            }
            .to_string(),
            "prrm"
        );
        assert_eq!(
            AddressingMode::Memory {
                indexing: Indexing::Offset,
                offsetting: Offsetting::Up,
                offset: OffsetKind::ScaledRegister(ShiftKind::Lsl),
            }
            .to_string(),
            "ofrp_lli"
        );
        assert_eq!(
            AddressingMode::Block {
                mode: BlockMode::DecrementBefore,
                write_back: true,
            }
            .to_string(),
            "dbw"
        );
    }
}
