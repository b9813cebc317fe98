//! # Banked Registers for Exception Modes
//!
//! Each exception mode has its own R13 (SP), R14 (LR) and SPSR.
//! FIQ additionally banks R8-R12. The values of the registers that are not
//! currently visible live here; [`RegisterBank::switch_mode`] swaps them
//! with the visible [`Registers`].

use serde::{Deserialize, Serialize};

use crate::cpu::cpu_modes::Mode;
use crate::cpu::psr::Psr;
use crate::cpu::registers::{REG_LR, REG_SP, Registers};

const SLOTS: usize = 6;

const fn slot(mode: Mode) -> usize {
    match mode {
        Mode::User | Mode::System => 0,
        Mode::Fiq => 1,
        Mode::Irq => 2,
        Mode::Supervisor => 3,
        Mode::Abort => 4,
        Mode::Undefined => 5,
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBank {
    /// R8-R12 shared by every mode but FIQ.
    r8_r12: [u32; 5],

    /// R8-R12 for FIQ mode.
    r8_r12_fiq: [u32; 5],

    /// R13 and R14 per bank slot.
    sp_lr: [[u32; 2]; SLOTS],

    /// SPSR per bank slot. Slot 0 (User/System) is never read.
    spsr: [Psr; SLOTS],
}

impl RegisterBank {
    /// Saves the registers visible in `from` and loads the ones of `to`.
    pub fn switch_mode(&mut self, registers: &mut Registers, from: Mode, to: Mode) {
        let (old, new) = (slot(from), slot(to));
        if old == new {
            return;
        }

        self.sp_lr[old] = [registers.register_at(REG_SP), registers.register_at(REG_LR)];

        let from_fiq = from == Mode::Fiq;
        let to_fiq = to == Mode::Fiq;
        if from_fiq != to_fiq {
            let (save, load) = if from_fiq {
                (&mut self.r8_r12_fiq, &self.r8_r12)
            } else {
                (&mut self.r8_r12, &self.r8_r12_fiq)
            };
            for (i, reg) in (8..=12).enumerate() {
                save[i] = registers.register_at(reg);
            }
            for (i, reg) in (8..=12).enumerate() {
                registers.set_register_at(reg, load[i]);
            }
        }

        let [sp, lr] = self.sp_lr[new];
        registers.set_register_at(REG_SP, sp);
        registers.set_register_at(REG_LR, lr);
    }

    /// SPSR of `mode`, `None` for User and System.
    #[must_use]
    pub const fn spsr(&self, mode: Mode) -> Option<Psr> {
        if mode.has_banked_registers() {
            Some(self.spsr[slot(mode)])
        } else {
            None
        }
    }

    /// Writes the SPSR of `mode`. Ignored for User and System.
    pub const fn set_spsr(&mut self, mode: Mode, psr: Psr) {
        if mode.has_banked_registers() {
            self.spsr[slot(mode)] = psr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numbered_registers() -> Registers {
        let mut registers = Registers::default();
        for i in 0..=15 {
            registers.set_register_at(i, u32::try_from(i).unwrap_or_default());
        }
        registers
    }

    #[test]
    fn round_trip_through_fiq() {
        let mut bank = RegisterBank::default();
        let mut registers = numbered_registers();

        bank.switch_mode(&mut registers, Mode::System, Mode::Fiq);
        for reg in 8..=14 {
            assert_eq!(registers.register_at(reg), 0);
        }
        registers.set_register_at(9, 0x99);
        registers.set_register_at(REG_SP, 0x0300_7F00);

        bank.switch_mode(&mut registers, Mode::Fiq, Mode::System);
        for reg in 0..=15 {
            assert_eq!(registers.register_at(reg), u32::try_from(reg).unwrap_or_default());
        }

        bank.switch_mode(&mut registers, Mode::System, Mode::Fiq);
        assert_eq!(registers.register_at(9), 0x99);
        assert_eq!(registers.register_at(REG_SP), 0x0300_7F00);
    }

    #[test]
    fn undefined_mode_banks_only_sp_and_lr() {
        let mut bank = RegisterBank::default();
        let mut registers = numbered_registers();

        bank.switch_mode(&mut registers, Mode::User, Mode::Undefined);
        assert_eq!(registers.register_at(12), 12);
        assert_eq!(registers.register_at(REG_SP), 0);
        assert_eq!(registers.register_at(REG_LR), 0);
        assert_eq!(registers.program_counter(), 15);
    }

    #[test]
    fn spsr_only_for_exception_modes() {
        let mut bank = RegisterBank::default();
        let psr = Psr::from(Mode::User);

        bank.set_spsr(Mode::Undefined, psr);
        bank.set_spsr(Mode::User, psr);

        assert_eq!(bank.spsr(Mode::Undefined), Some(psr));
        assert_eq!(bank.spsr(Mode::User), None);
        assert_eq!(bank.spsr(Mode::System), None);
    }
}
