use serde::{Deserialize, Serialize};

/// Processor operating modes, encoded as CPSR bits 4-0.
///
/// Every mode except User and System owns a banked R13/R14 and an SPSR;
/// FIQ additionally banks R8-R12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// The normal program execution state.
    User = 0b10000,

    /// Fast interrupt handling.
    Fiq = 0b10001,

    /// General-purpose interrupt handling.
    Irq = 0b10010,

    /// Protected mode for the operating system, entered on SWI and reset.
    Supervisor = 0b10011,

    /// Entered after a data or instruction prefetch abort.
    Abort = 0b10111,

    /// Entered when an undefined instruction is executed.
    Undefined = 0b11011,

    /// Privileged mode sharing the User register set.
    System = 0b11111,
}

impl Mode {
    /// User and System have no SPSR and no banked R13/R14.
    #[must_use]
    pub const fn has_banked_registers(self) -> bool {
        !matches!(self, Self::User | Self::System)
    }
}

impl From<Mode> for u32 {
    fn from(m: Mode) -> Self {
        m as Self
    }
}

impl TryFrom<u32> for Mode {
    type Error = String;

    fn try_from(n: u32) -> Result<Self, Self::Error> {
        match n {
            0b10000 => Ok(Self::User),
            0b10001 => Ok(Self::Fiq),
            0b10010 => Ok(Self::Irq),
            0b10011 => Ok(Self::Supervisor),
            0b10111 => Ok(Self::Abort),
            0b11011 => Ok(Self::Undefined),
            0b11111 => Ok(Self::System),
            _ => Err(format!("unexpected value for Mode: 0b{n:05b}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn try_from_raw_bits() {
        assert_eq!(Mode::try_from(0b11011), Ok(Mode::Undefined));
        assert_eq!(Mode::try_from(0b10011), Ok(Mode::Supervisor));
        assert!(Mode::try_from(0).is_err());
    }

    #[test]
    fn banked_registers() {
        assert!(!Mode::User.has_banked_registers());
        assert!(!Mode::System.has_banked_registers());
        assert!(Mode::Undefined.has_banked_registers());
    }
}
