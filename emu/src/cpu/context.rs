//! State shared by every operation handler during dispatch.

use serde::{Deserialize, Serialize};

use crate::bus::Bus;
use crate::cpu::condition::ConditionFlags;
use crate::cpu::cpu_modes::Mode;
use crate::cpu::psr::{CpuState, Psr};
use crate::cpu::register_bank::RegisterBank;
use crate::cpu::registers::{REG_LR, REG_PROGRAM_COUNTER, Registers};

/// Visible registers, CPSR and banked copies.
///
/// Writes to R15 go through [`RegisterFile::set_program_counter`], which
/// records a flush request for the core to pick up. The raw register array
/// is read-only outside the crate so a handler cannot skip that request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterFile {
    pub(crate) registers: Registers,
    pub cpsr: Psr,
    pub register_bank: RegisterBank,
    flush_requested: bool,
}

impl Default for RegisterFile {
    /// Reset state: Supervisor mode, ARM state, IRQ and FIQ disabled.
    fn default() -> Self {
        let mut cpsr = Psr::from(Mode::Supervisor);
        cpsr.set_cpu_state(CpuState::Arm);
        cpsr.set_irq_disable(true);
        cpsr.set_fiq_disable(true);

        Self {
            registers: Registers::default(),
            cpsr,
            register_bank: RegisterBank::default(),
            flush_requested: false,
        }
    }
}

impl RegisterFile {
    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }

    #[must_use]
    pub const fn program_counter(&self) -> u32 {
        self.registers.program_counter()
    }

    /// Writes R15 and asks the core to flush the pipeline.
    pub const fn set_program_counter(&mut self, value: u32) {
        self.registers.set_program_counter(value);
        self.flush_requested = true;
    }

    #[must_use]
    pub const fn register_at(&self, reg: usize) -> u32 {
        self.registers.register_at(reg)
    }

    pub fn set_register_at(&mut self, reg: usize, value: u32) {
        if reg == REG_PROGRAM_COUNTER {
            self.set_program_counter(value);
        } else {
            self.registers.set_register_at(reg, value);
        }
    }

    #[must_use]
    pub fn flags(&self) -> ConditionFlags {
        self.cpsr.flags()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.cpsr.mode()
    }

    /// SPSR of the current mode, `None` in User and System.
    #[must_use]
    pub fn spsr(&self) -> Option<Psr> {
        self.register_bank.spsr(self.mode())
    }

    /// Banks the visible registers and enters `to`.
    pub fn switch_mode(&mut self, to: Mode) {
        let from = self.mode();
        self.register_bank
            .switch_mode(&mut self.registers, from, to);
        self.cpsr.set_mode(to);
    }

    #[must_use]
    pub const fn flush_requested(&self) -> bool {
        self.flush_requested
    }

    /// Returns and clears the pending flush request.
    pub const fn take_flush_request(&mut self) -> bool {
        let requested = self.flush_requested;
        self.flush_requested = false;
        requested
    }
}

/// Architectural exceptions raised from the dispatch path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trap {
    UndefinedInstruction,
    SoftwareInterrupt,
}

impl Trap {
    #[must_use]
    pub const fn mode(self) -> Mode {
        match self {
            Self::UndefinedInstruction => Mode::Undefined,
            Self::SoftwareInterrupt => Mode::Supervisor,
        }
    }

    #[must_use]
    pub const fn vector(self) -> u32 {
        match self {
            Self::UndefinedInstruction => 0x04,
            Self::SoftwareInterrupt => 0x08,
        }
    }
}

/// Collaborator that performs exception entry.
pub trait TrapEntry {
    fn enter(&mut self, trap: Trap, cpu: &mut RegisterFile);
}

/// Exception entry as the ARM7TDMI does it, vectors at address 0.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionVectors;

impl TrapEntry for ExceptionVectors {
    fn enter(&mut self, trap: Trap, cpu: &mut RegisterFile) {
        // R15 is two instructions ahead of the one that trapped.
        let faulting = cpu.program_counter().wrapping_sub(8);
        let return_address = faulting.wrapping_add(4);
        let saved = cpu.cpsr;
        let mode = trap.mode();

        cpu.switch_mode(mode);
        cpu.register_bank.set_spsr(mode, saved);
        cpu.registers.set_register_at(REG_LR, return_address);
        cpu.cpsr.set_cpu_state(CpuState::Arm);
        cpu.cpsr.set_irq_disable(true);
        cpu.set_program_counter(trap.vector());

        tracing::debug!(
            "{trap:?} at {faulting:#010X}, entering {mode:?}, return to {return_address:#010X}"
        );
    }
}

/// Everything an operation handler may read or mutate.
pub struct ArmContext<B: Bus, T: TrapEntry = ExceptionVectors> {
    pub cpu: RegisterFile,
    pub bus: B,
    pub traps: T,
}

impl<B: Bus, T: TrapEntry> ArmContext<B, T> {
    pub fn new(bus: B, traps: T) -> Self {
        Self {
            cpu: RegisterFile::default(),
            bus,
            traps,
        }
    }

    /// Forwards `trap` to the trap-entry collaborator.
    pub fn raise(&mut self, trap: Trap) {
        self.traps.enter(trap, &mut self.cpu);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::registers::REG_SP;
    use pretty_assertions::assert_eq;

    #[test]
    fn writing_r15_requests_a_flush() {
        let mut cpu = RegisterFile::default();
        cpu.set_register_at(3, 0x33);
        assert!(!cpu.flush_requested());

        cpu.set_register_at(REG_PROGRAM_COUNTER, 0x0800_0000);
        assert_eq!(cpu.program_counter(), 0x0800_0000);
        assert!(cpu.take_flush_request());
        assert!(!cpu.take_flush_request());
    }

    #[test]
    fn undefined_instruction_entry() {
        let mut cpu = RegisterFile::default();
        cpu.switch_mode(Mode::System);
        cpu.cpsr.set_irq_disable(false);
        cpu.cpsr.set_carry_flag(true);
        cpu.registers.set_register_at(REG_SP, 0x0300_7F00);
        // Instruction at 0x100 is executing.
        cpu.registers.set_program_counter(0x108);
        let before = cpu.cpsr;

        ExceptionVectors.enter(Trap::UndefinedInstruction, &mut cpu);

        assert_eq!(cpu.mode(), Mode::Undefined);
        assert_eq!(cpu.spsr(), Some(before));
        assert_eq!(cpu.register_at(REG_LR), 0x104);
        assert_eq!(cpu.program_counter(), 0x04);
        assert!(cpu.cpsr.irq_disable());
        assert!(cpu.cpsr.carry_flag());
        assert!(cpu.take_flush_request());

        cpu.switch_mode(Mode::System);
        assert_eq!(cpu.register_at(REG_SP), 0x0300_7F00);
    }

    #[test]
    fn software_interrupt_enters_supervisor() {
        let mut cpu = RegisterFile::default();
        cpu.switch_mode(Mode::User);
        cpu.registers.set_program_counter(0x0800_0010);

        ExceptionVectors.enter(Trap::SoftwareInterrupt, &mut cpu);

        assert_eq!(cpu.mode(), Mode::Supervisor);
        assert_eq!(cpu.register_at(REG_LR), 0x0800_000C);
        assert_eq!(cpu.program_counter(), 0x08);
        assert_eq!(cpu.cpsr.cpu_state(), CpuState::Arm);
    }
}
