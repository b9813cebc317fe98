//! The closed set of ARM operation handlers a decode entry can select.
//!
//! One variant (or one variant payload) per instruction mnemonic. The
//! semantics live behind [`InstructionSemantics`](super::dispatch::InstructionSemantics);
//! this module only names them.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// Data processing opcodes, bits 24-21.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum AluOp {
    And = 0x0,
    Eor = 0x1,
    Sub = 0x2,
    Rsb = 0x3,
    Add = 0x4,
    Adc = 0x5,
    Sbc = 0x6,
    Rsc = 0x7,
    Tst = 0x8,
    Teq = 0x9,
    Cmp = 0xA,
    Cmn = 0xB,
    Orr = 0xC,
    Mov = 0xD,
    Bic = 0xE,
    Mvn = 0xF,
}

impl AluOp {
    /// TST, TEQ, CMP and CMN only update flags and have no destination.
    #[must_use]
    pub const fn is_test(self) -> bool {
        matches!(self, Self::Tst | Self::Teq | Self::Cmp | Self::Cmn)
    }
}

impl From<u32> for AluOp {
    fn from(alu_op_code: u32) -> Self {
        match alu_op_code & 0xF {
            0x0 => Self::And,
            0x1 => Self::Eor,
            0x2 => Self::Sub,
            0x3 => Self::Rsb,
            0x4 => Self::Add,
            0x5 => Self::Adc,
            0x6 => Self::Sbc,
            0x7 => Self::Rsc,
            0x8 => Self::Tst,
            0x9 => Self::Teq,
            0xA => Self::Cmp,
            0xB => Self::Cmn,
            0xC => Self::Orr,
            0xD => Self::Mov,
            0xE => Self::Bic,
            _ => Self::Mvn,
        }
    }
}

impl Display for AluOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::And => "AND",
            Self::Eor => "EOR",
            Self::Sub => "SUB",
            Self::Rsb => "RSB",
            Self::Add => "ADD",
            Self::Adc => "ADC",
            Self::Sbc => "SBC",
            Self::Rsc => "RSC",
            Self::Tst => "TST",
            Self::Teq => "TEQ",
            Self::Cmp => "CMP",
            Self::Cmn => "CMN",
            Self::Orr => "ORR",
            Self::Mov => "MOV",
            Self::Bic => "BIC",
            Self::Mvn => "MVN",
        })
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum MultiplyVariant {
    Mul,
    Mla,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum MultiplyLongVariant {
    Umull,
    Umlal,
    Smull,
    Smlal,
}

impl From<u32> for MultiplyLongVariant {
    /// Bits 22-21: signed, accumulate.
    fn from(bits: u32) -> Self {
        match bits & 0b11 {
            0b00 => Self::Umull,
            0b01 => Self::Umlal,
            0b10 => Self::Smull,
            _ => Self::Smlal,
        }
    }
}

/// Halfword, signed byte and doubleword transfers (bits 6-5 plus L).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum HalfwordTransferKind {
    Strh,
    Ldrh,
    Ldrsb,
    Ldrsh,
    Ldrd,
    Strd,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum SaturatingKind {
    Qadd,
    Qsub,
    Qdadd,
    Qdsub,
}

/// Which 16-bit half of an operand a DSP multiply reads.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Half {
    Bottom,
    Top,
}

impl From<bool> for Half {
    fn from(top: bool) -> Self {
        if top { Self::Top } else { Self::Bottom }
    }
}

impl Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bottom => "B",
            Self::Top => "T",
        })
    }
}

/// Signed halfword multiplies. `x` selects the half of Rm, `y` the half of Rs.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum SignedHalfwordMultiply {
    Smla { x: Half, y: Half },
    Smlaw { y: Half },
    Smulw { y: Half },
    Smlal { x: Half, y: Half },
    Smul { x: Half, y: Half },
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    DataProcessing {
        alu: AluOp,
        set_conditions: bool,
    },
    Multiply {
        variant: MultiplyVariant,
        set_conditions: bool,
    },
    MultiplyLong {
        variant: MultiplyLongVariant,
        set_conditions: bool,
    },
    /// Move status register to register.
    Mrs,
    /// Move register or immediate to status register.
    Msr,
    BranchAndExchange,
    SingleDataSwap {
        byte: bool,
    },
    HalfwordDataTransfer(HalfwordTransferKind),
    SingleDataTransfer {
        load: bool,
        byte: bool,
        /// LDRT/STRT family: user-mode access from a privileged mode.
        translated: bool,
    },
    Saturating(SaturatingKind),
    SignedHalfwordMultiply(SignedHalfwordMultiply),
    BlockDataTransfer {
        load: bool,
        /// S bit: user bank transfer, or CPSR restore for LDM with R15.
        user_bank: bool,
    },
    Branch {
        link: bool,
    },
    CoprocessorDataTransfer {
        load: bool,
    },
    CoprocessorDataOperation,
    /// MRC when `load`, MCR otherwise.
    CoprocessorRegisterTransfer {
        load: bool,
    },
    SoftwareInterrupt,
    /// Encodings with no architectural instruction; raises the undefined trap.
    Undefined,
}

impl Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::DataProcessing {
                alu,
                set_conditions,
            } => {
                write!(f, "{alu}")?;
                if set_conditions {
                    f.write_str("S")?;
                }
                Ok(())
            }
            Self::Multiply {
                variant,
                set_conditions,
            } => {
                f.write_str(match variant {
                    MultiplyVariant::Mul => "MUL",
                    MultiplyVariant::Mla => "MLA",
                })?;
                if set_conditions {
                    f.write_str("S")?;
                }
                Ok(())
            }
            Self::MultiplyLong {
                variant,
                set_conditions,
            } => {
                f.write_str(match variant {
                    MultiplyLongVariant::Umull => "UMULL",
                    MultiplyLongVariant::Umlal => "UMLAL",
                    MultiplyLongVariant::Smull => "SMULL",
                    MultiplyLongVariant::Smlal => "SMLAL",
                })?;
                if set_conditions {
                    f.write_str("S")?;
                }
                Ok(())
            }
            Self::Mrs => f.write_str("MRS"),
            Self::Msr => f.write_str("MSR"),
            Self::BranchAndExchange => f.write_str("BX"),
            Self::SingleDataSwap { byte } => f.write_str(if byte { "SWPB" } else { "SWP" }),
            Self::HalfwordDataTransfer(kind) => f.write_str(match kind {
                HalfwordTransferKind::Strh => "STRH",
                HalfwordTransferKind::Ldrh => "LDRH",
                HalfwordTransferKind::Ldrsb => "LDRSB",
                HalfwordTransferKind::Ldrsh => "LDRSH",
                HalfwordTransferKind::Ldrd => "LDRD",
                HalfwordTransferKind::Strd => "STRD",
            }),
            Self::SingleDataTransfer {
                load,
                byte,
                translated,
            } => {
                f.write_str(if load { "LDR" } else { "STR" })?;
                if byte {
                    f.write_str("B")?;
                }
                if translated {
                    f.write_str("T")?;
                }
                Ok(())
            }
            Self::Saturating(kind) => f.write_str(match kind {
                SaturatingKind::Qadd => "QADD",
                SaturatingKind::Qsub => "QSUB",
                SaturatingKind::Qdadd => "QDADD",
                SaturatingKind::Qdsub => "QDSUB",
            }),
            Self::SignedHalfwordMultiply(kind) => match kind {
                SignedHalfwordMultiply::Smla { x, y } => write!(f, "SMLA{x}{y}"),
                SignedHalfwordMultiply::Smlaw { y } => write!(f, "SMLAW{y}"),
                SignedHalfwordMultiply::Smulw { y } => write!(f, "SMULW{y}"),
                SignedHalfwordMultiply::Smlal { x, y } => write!(f, "SMLAL{x}{y}"),
                SignedHalfwordMultiply::Smul { x, y } => write!(f, "SMUL{x}{y}"),
            },
            Self::BlockDataTransfer { load, user_bank } => {
                f.write_str(if load { "LDM" } else { "STM" })?;
                if user_bank {
                    f.write_str("^")?;
                }
                Ok(())
            }
            Self::Branch { link } => f.write_str(if link { "BL" } else { "B" }),
            Self::CoprocessorDataTransfer { load } => f.write_str(if load { "LDC" } else { "STC" }),
            Self::CoprocessorDataOperation => f.write_str("CDP"),
            Self::CoprocessorRegisterTransfer { load } => {
                f.write_str(if load { "MRC" } else { "MCR" })
            }
            Self::SoftwareInterrupt => f.write_str("SWI"),
            Self::Undefined => f.write_str("UNDEFINED"),
        }
    }
}
