//! Turns the word in the execute slot into one handler invocation.

use crate::bus::Bus;
use crate::cpu::arm::addressing::AddressingMode;
use crate::cpu::arm::decode_table::DecodeTable;
use crate::cpu::arm::operation::Operation;
use crate::cpu::condition::condition_passed;
use crate::cpu::context::{ArmContext, Trap, TrapEntry};

/// Output of an addressing-mode resolver: an operand or an address, plus
/// the shifter carry when the mode produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolved {
    pub value: u32,
    pub carry: Option<bool>,
}

impl Resolved {
    #[must_use]
    pub const fn new(value: u32, carry: Option<bool>) -> Self {
        Self { value, carry }
    }
}

/// Instruction semantics plugged into the dispatcher.
///
/// `execute` runs one operation handler; it reads its operands by calling
/// `resolve` with the paired addressing mode. Handlers never fail: an
/// architectural exception is raised with [`ArmContext::raise`].
pub trait InstructionSemantics<B: Bus, T: TrapEntry> {
    fn resolve(&mut self, mode: AddressingMode, op_code: u32, ctx: &mut ArmContext<B, T>)
    -> Resolved;

    fn execute(
        &mut self,
        operation: Operation,
        mode: AddressingMode,
        op_code: u32,
        ctx: &mut ArmContext<B, T>,
    );

    /// Handler for encodings with no instruction.
    fn undefined(&mut self, _op_code: u32, ctx: &mut ArmContext<B, T>) {
        ctx.raise(Trap::UndefinedInstruction);
    }
}

/// Decodes `op_code`, checks its condition and runs the selected handler.
///
/// A failed condition skips the handler; the cycle still counts.
pub fn dispatch<B, T, S>(
    op_code: u32,
    table: &DecodeTable,
    ctx: &mut ArmContext<B, T>,
    semantics: &mut S,
) where
    B: Bus,
    T: TrapEntry,
    S: InstructionSemantics<B, T> + ?Sized,
{
    let entry = table.decode(op_code);
    let passed = condition_passed(op_code, ctx.cpu.flags());

    #[cfg(feature = "logger")]
    tracing::trace!(
        "{:#010X} @ {:#010X}: {} ({})",
        op_code,
        ctx.cpu.program_counter().wrapping_sub(8),
        entry,
        if passed { "run" } else { "skip" }
    );

    if !passed {
        return;
    }

    match entry.operation {
        Operation::Undefined => semantics.undefined(op_code, ctx),
        operation => semantics.execute(operation, entry.addressing, op_code, ctx),
    }
}
