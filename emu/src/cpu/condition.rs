//! # ARM Conditional Execution
//!
//! Every ARM instruction carries a 4-bit condition field in bits 31-28. The
//! instruction sitting in the execute stage only runs when the current
//! condition flags satisfy that field; otherwise the cycle is spent and the
//! instruction is skipped.
//!
//! | Code | Suffix | Runs when        | Code | Suffix | Runs when          |
//! |------|--------|------------------|------|--------|--------------------|
//! | 0x0  | EQ     | Z                | 0x8  | HI     | C and not Z        |
//! | 0x1  | NE     | not Z            | 0x9  | LS     | not C or Z         |
//! | 0x2  | CS     | C                | 0xA  | GE     | N = V              |
//! | 0x3  | CC     | not C            | 0xB  | LT     | N != V             |
//! | 0x4  | MI     | N                | 0xC  | GT     | not Z and N = V    |
//! | 0x5  | PL     | not N            | 0xD  | LE     | Z or N != V        |
//! | 0x6  | VS     | V                | 0xE  | AL     | always             |
//! | 0x7  | VC     | not V            | 0xF  | NV     | never              |
//!
//! `NV` is not a second "always": a word carrying it is never dispatched.

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;

/// Snapshot of the four condition flags (CPSR bits 31-28).
#[derive(Debug, Default, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct ConditionFlags {
    pub zero: bool,
    pub carry: bool,
    pub negative: bool,
    pub overflow: bool,
}

impl ConditionFlags {
    #[must_use]
    pub const fn new(zero: bool, carry: bool, negative: bool, overflow: bool) -> Self {
        Self {
            zero,
            carry,
            negative,
            overflow,
        }
    }
}

/// Condition codes for ARM conditional execution.
///
/// # Example
///
/// ```
/// use armcore::cpu::condition::{Condition, ConditionFlags};
///
/// let flags = ConditionFlags::new(true, false, false, false);
/// assert!(Condition::EQ.is_satisfied(flags));
/// assert!(!Condition::NE.is_satisfied(flags));
/// assert!(!Condition::NV.is_satisfied(flags));
/// ```
#[derive(Debug, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub enum Condition {
    EQ = 0x0,
    NE = 0x1,
    CS = 0x2,
    CC = 0x3,
    MI = 0x4,
    PL = 0x5,
    VS = 0x6,
    VC = 0x7,
    HI = 0x8,
    LS = 0x9,
    GE = 0xA,
    LT = 0xB,
    GT = 0xC,
    LE = 0xD,
    AL = 0xE,

    /// Reserved since `ARMv3`.
    NV = 0xF,
}

/// Conditions in field order.
const BY_FIELD: [Condition; 16] = [
    Condition::EQ,
    Condition::NE,
    Condition::CS,
    Condition::CC,
    Condition::MI,
    Condition::PL,
    Condition::VS,
    Condition::VC,
    Condition::HI,
    Condition::LS,
    Condition::GE,
    Condition::LT,
    Condition::GT,
    Condition::LE,
    Condition::AL,
    Condition::NV,
];

impl Condition {
    /// Condition field of an instruction word (bits 31-28).
    #[must_use]
    pub fn of(op_code: u32) -> Self {
        // Only four bits survive the shift.
        #[allow(clippy::cast_possible_truncation)]
        Self::from(op_code.get_bits(28..=31) as u8)
    }

    /// Mnemonic suffix; empty for `AL`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::AL => "",
            Self::NV => "_NEVER",
            Self::EQ => "EQ",
            Self::NE => "NE",
            Self::CS => "CS",
            Self::CC => "CC",
            Self::MI => "MI",
            Self::PL => "PL",
            Self::VS => "VS",
            Self::VC => "VC",
            Self::HI => "HI",
            Self::LS => "LS",
            Self::GE => "GE",
            Self::LT => "LT",
            Self::GT => "GT",
            Self::LE => "LE",
        }
    }

    #[must_use]
    pub const fn is_satisfied(self, flags: ConditionFlags) -> bool {
        let ConditionFlags {
            zero: z,
            carry: c,
            negative: n,
            overflow: v,
        } = flags;

        match self {
            Self::AL => true,
            Self::EQ => z,
            Self::NE => !z,
            Self::CS => c,
            Self::CC => !c,
            Self::MI => n,
            Self::PL => !n,
            Self::VS => v,
            Self::VC => !v,
            Self::HI => c && !z,
            Self::LS => !c || z,
            Self::GE => n == v,
            Self::LT => n != v,
            Self::GT => !z && n == v,
            Self::LE => z || n != v,
            Self::NV => false,
        }
    }
}

/// Decides whether `op_code` runs this cycle under `flags`.
///
/// `AL` is by far the most frequent condition so it is tested before
/// decoding the field any further.
#[inline]
#[must_use]
pub fn condition_passed(op_code: u32, flags: ConditionFlags) -> bool {
    let field = op_code >> 28;
    if field == Condition::AL as u32 {
        return true;
    }

    Condition::of(op_code).is_satisfied(flags)
}

impl From<u8> for Condition {
    fn from(field: u8) -> Self {
        BY_FIELD[usize::from(field & 0xF)]
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn all_flags() -> impl Iterator<Item = ConditionFlags> {
        (0_u8..16).map(|bits| {
            ConditionFlags::new(
                bits & 0b0001 != 0,
                bits & 0b0010 != 0,
                bits & 0b0100 != 0,
                bits & 0b1000 != 0,
            )
        })
    }

    /// Textbook definition, written independently from `is_satisfied`.
    fn reference(code: u8, f: ConditionFlags) -> bool {
        let (z, c, n, v) = (f.zero, f.carry, f.negative, f.overflow);
        match code {
            0x0 => z,
            0x1 => !z,
            0x2 => c,
            0x3 => !c,
            0x4 => n,
            0x5 => !n,
            0x6 => v,
            0x7 => !v,
            0x8 => c & !z,
            0x9 => !(c & !z),
            0xA => !(n ^ v),
            0xB => n ^ v,
            0xC => !z & !(n ^ v),
            0xD => !(!z & !(n ^ v)),
            0xE => true,
            _ => false,
        }
    }

    #[test]
    fn truth_table_matches_reference() {
        let mut checked = 0;
        for code in 0_u8..16 {
            for flags in all_flags() {
                let op_code = (u32::from(code) << 28) | 0x00A0_0000;
                assert_eq!(
                    condition_passed(op_code, flags),
                    reference(code, flags),
                    "code {code:#X} flags {flags:?}"
                );
                checked += 1;
            }
        }
        assert_eq!(checked, 256);
    }

    #[test]
    fn always_and_never() {
        for flags in all_flags() {
            assert!(condition_passed(0xE000_0000, flags));
            assert!(!condition_passed(0xF000_0000, flags));
            assert!(!condition_passed(0xFFFF_FFFF, flags));
        }
    }

    #[test]
    fn only_top_nibble_matters() {
        let flags = ConditionFlags::new(false, true, false, false);
        assert!(condition_passed(0x2000_0000, flags));
        assert!(condition_passed(0x2FFF_FFFF, flags));
        assert!(!condition_passed(0x3FFF_FFFF, flags));
    }

    #[test]
    fn decode_condition_field() {
        assert_eq!(Condition::of(0xE12F_FF11), Condition::AL);
        assert_eq!(Condition::of(0x0A00_0000), Condition::EQ);
        assert_eq!(Condition::of(0xDA00_0000), Condition::LE);
        assert_eq!(Condition::from(0x1F), Condition::NV);
    }

    #[test]
    fn display_suffix() {
        assert_eq!(Condition::GT.to_string(), "GT");
        assert_eq!(Condition::AL.to_string(), "");
    }
}
