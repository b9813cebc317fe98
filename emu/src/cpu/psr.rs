//! # Program Status Registers (CPSR and SPSR)
//!
//! ```text
//! 31 30 29 28 27 26      8 7 6 5 4   0
//! ┌──┬──┬──┬──┬──┬────────┬─┬─┬─┬─────┐
//! │N │Z │C │V │Q │Reserved│I│F│T│Mode │
//! └──┴──┴──┴──┴──┴────────┴─┴─┴─┴─────┘
//! ```
//!
//! - **Flags (28-31)**: read by the condition evaluator, see
//!   [`condition`](super::condition)
//! - **Q (27)**: sticky overflow of the saturating and DSP multiply group
//! - **I/F (7-6)**: IRQ/FIQ disable
//! - **T (5)**: ARM (0) or Thumb (1) state
//! - **Mode (4-0)**: see [`cpu_modes`](super::cpu_modes)

use serde::{Deserialize, Serialize};

use crate::bitwise::Bits;
use crate::cpu::condition::ConditionFlags;
use crate::cpu::cpu_modes::Mode;

const BIT_N: u8 = 31;
const BIT_Z: u8 = 30;
const BIT_C: u8 = 29;
const BIT_V: u8 = 28;
const BIT_Q: u8 = 27;
const BIT_I: u8 = 7;
const BIT_F: u8 = 6;
const BIT_T: u8 = 5;
const MODE_MASK: u32 = 0b1_1111;

/// Program Status Register (CPSR or SPSR), a typed view over the raw word.
///
/// # Example
///
/// ```
/// use armcore::cpu::psr::Psr;
///
/// let mut cpsr = Psr::default();
/// cpsr.set_zero_flag(true);
/// cpsr.set_carry_flag(true);
///
/// let flags = cpsr.flags();
/// assert!(flags.zero && flags.carry);
/// assert!(!flags.negative && !flags.overflow);
/// ```
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Psr(u32);

impl Psr {
    /// The four condition flags, as seen by the condition evaluator.
    #[must_use]
    pub fn flags(self) -> ConditionFlags {
        ConditionFlags {
            zero: self.zero_flag(),
            carry: self.carry_flag(),
            negative: self.sign_flag(),
            overflow: self.overflow_flag(),
        }
    }

    pub fn set_condition_flags(&mut self, flags: ConditionFlags) {
        self.set_zero_flag(flags.zero);
        self.set_carry_flag(flags.carry);
        self.set_sign_flag(flags.negative);
        self.set_overflow_flag(flags.overflow);
    }

    #[must_use]
    pub fn sign_flag(self) -> bool {
        self.0.get_bit(BIT_N)
    }

    #[must_use]
    pub fn zero_flag(self) -> bool {
        self.0.get_bit(BIT_Z)
    }

    /// Also "no borrow" after a subtraction.
    #[must_use]
    pub fn carry_flag(self) -> bool {
        self.0.get_bit(BIT_C)
    }

    #[must_use]
    pub fn overflow_flag(self) -> bool {
        self.0.get_bit(BIT_V)
    }

    #[must_use]
    pub fn sticky_overflow(self) -> bool {
        self.0.get_bit(BIT_Q)
    }

    #[must_use]
    pub fn irq_disable(self) -> bool {
        self.0.get_bit(BIT_I)
    }

    #[must_use]
    pub fn fiq_disable(self) -> bool {
        self.0.get_bit(BIT_F)
    }

    #[must_use]
    pub fn state_bit(self) -> bool {
        self.0.get_bit(BIT_T)
    }

    /// Software can leave invalid mode bits in an SPSR; those read back as
    /// Supervisor.
    #[must_use]
    pub fn mode(self) -> Mode {
        let mode_bits = self.0 & MODE_MASK;
        Mode::try_from(mode_bits).unwrap_or_else(|_| {
            tracing::debug!(
                "invalid mode bits 0b{:05b} in PSR=0x{:08X}, defaulting to Supervisor",
                mode_bits,
                self.0
            );
            Mode::Supervisor
        })
    }

    pub fn set_sign_flag(&mut self, value: bool) {
        self.0.set_bit(BIT_N, value);
    }

    pub fn set_zero_flag(&mut self, value: bool) {
        self.0.set_bit(BIT_Z, value);
    }

    pub fn set_carry_flag(&mut self, value: bool) {
        self.0.set_bit(BIT_C, value);
    }

    pub fn set_overflow_flag(&mut self, value: bool) {
        self.0.set_bit(BIT_V, value);
    }

    /// Set by the saturating and signed halfword multiply groups on overflow,
    /// cleared only through MSR.
    pub fn set_sticky_overflow(&mut self, value: bool) {
        self.0.set_bit(BIT_Q, value);
    }

    pub fn set_irq_disable(&mut self, value: bool) {
        self.0.set_bit(BIT_I, value);
    }

    pub fn set_fiq_disable(&mut self, value: bool) {
        self.0.set_bit(BIT_F, value);
    }

    pub fn set_state_bit(&mut self, value: bool) {
        self.0.set_bit(BIT_T, value);
    }

    pub const fn set_mode(&mut self, mode: Mode) {
        self.0 = (self.0 & !MODE_MASK) | mode as u32;
    }

    #[must_use]
    pub fn cpu_state(self) -> CpuState {
        self.state_bit().into()
    }

    pub fn set_cpu_state(&mut self, state: CpuState) {
        self.set_state_bit(state.into());
    }
}

impl From<Mode> for Psr {
    fn from(mode: Mode) -> Self {
        Self(mode as u32)
    }
}

impl From<u32> for Psr {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl From<Psr> for u32 {
    fn from(psr: Psr) -> Self {
        psr.0
    }
}

/// The CPU execution state, held by the T bit.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum CpuState {
    Arm,
    Thumb,
}

impl From<bool> for CpuState {
    fn from(state: bool) -> Self {
        if state { Self::Thumb } else { Self::Arm }
    }
}

impl From<CpuState> for bool {
    fn from(state: CpuState) -> Self {
        matches!(state, CpuState::Thumb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_follow_raw_bits() {
        let psr = Psr::from(0b1010_u32 << 28);
        assert_eq!(psr.flags(), ConditionFlags::new(false, true, true, false));

        let psr = Psr::from(0b0101_u32 << 28);
        assert_eq!(psr.flags(), ConditionFlags::new(true, false, false, true));
    }

    #[test]
    fn set_condition_flags_keeps_control_bits() {
        let mut psr = Psr::from(Mode::Irq);
        psr.set_irq_disable(true);
        psr.set_condition_flags(ConditionFlags::new(true, true, true, true));

        assert_eq!(u32::from(psr), 0xF000_0000 | 0x80 | Mode::Irq as u32);
        assert_eq!(psr.mode(), Mode::Irq);
    }

    #[test]
    fn sticky_overflow_survives_flag_writes() {
        let mut psr = Psr::from(Mode::User);
        psr.set_sticky_overflow(true);
        assert_eq!(u32::from(psr), 1 << 27 | Mode::User as u32);

        psr.set_condition_flags(ConditionFlags::new(false, false, false, false));
        assert!(psr.sticky_overflow());

        psr.set_sticky_overflow(false);
        assert!(!psr.sticky_overflow());
    }

    #[test]
    fn interrupt_disable_bits() {
        let mut psr = Psr::from(0x0000_00D3_u32);
        assert!(psr.irq_disable());
        assert!(psr.fiq_disable());
        assert_eq!(psr.mode(), Mode::Supervisor);

        psr.set_fiq_disable(false);
        assert!(!psr.fiq_disable());
        assert!(psr.irq_disable());
        assert_eq!(u32::from(psr), 0x93);
    }

    #[test]
    fn mode_round_trip() {
        let mut psr = Psr::from(Mode::User);
        psr.set_mode(Mode::Undefined);
        assert_eq!(psr.mode(), Mode::Undefined);
    }

    #[test]
    fn invalid_mode_reads_supervisor() {
        let psr = Psr::from(0_u32);
        assert_eq!(psr.mode(), Mode::Supervisor);
    }

    #[test]
    fn cpu_state() {
        let mut psr = Psr::default();
        assert_eq!(psr.cpu_state(), CpuState::Arm);
        psr.set_cpu_state(CpuState::Thumb);
        assert!(psr.state_bit());
        assert_eq!(psr.cpu_state(), CpuState::Thumb);
    }
}
