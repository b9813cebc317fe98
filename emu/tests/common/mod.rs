#![allow(dead_code)]

use armcore::bus::{Bus, FlatMemory};
use armcore::cpu::arm::addressing::AddressingMode;
use armcore::cpu::arm::dispatch::{InstructionSemantics, Resolved};
use armcore::cpu::arm::operation::{AluOp, Operation};
use armcore::cpu::arm7tdmi::Arm7tdmi;
use armcore::cpu::context::{ArmContext, RegisterFile, Trap, TrapEntry};
use armcore::cpu::registers::REG_LR;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output to the test harness; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub const NOP: u32 = 0xE1A0_0000; // MOV R0, R0
pub const UNDEFINED: u32 = 0xE7F0_00F0;

/// Just enough semantics to move data and branch: MOV with an immediate,
/// B/BL and SWI. Every handler call is recorded as (address, mnemonic).
#[derive(Debug, Default)]
pub struct MiniSemantics {
    pub trace: Vec<(u32, String)>,
}

impl MiniSemantics {
    pub fn mnemonics(&self) -> Vec<&str> {
        self.trace.iter().map(|(_, name)| name.as_str()).collect()
    }
}

impl<B: Bus, T: TrapEntry> InstructionSemantics<B, T> for MiniSemantics {
    fn resolve(&mut self, mode: AddressingMode, op_code: u32, ctx: &mut ArmContext<B, T>) -> Resolved {
        match mode {
            AddressingMode::Immediate => {
                let rotate = ((op_code >> 8) & 0xF) * 2;
                let value = (op_code & 0xFF).rotate_right(rotate);
                let carry = (rotate != 0).then_some(value >> 31 == 1);
                Resolved::new(value, carry)
            }
            AddressingMode::BranchOffset => {
                let offset = (((op_code & 0x00FF_FFFF) << 8) as i32) >> 6;
                Resolved::new(ctx.cpu.program_counter().wrapping_add(offset as u32), None)
            }
            _ => Resolved::default(),
        }
    }

    fn execute(
        &mut self,
        operation: Operation,
        mode: AddressingMode,
        op_code: u32,
        ctx: &mut ArmContext<B, T>,
    ) {
        let address = ctx.cpu.program_counter().wrapping_sub(8);
        self.trace.push((address, operation.to_string()));

        match operation {
            Operation::DataProcessing {
                alu: AluOp::Mov, ..
            } if mode == AddressingMode::Immediate => {
                let rd = ((op_code >> 12) & 0xF) as usize;
                let operand = self.resolve(mode, op_code, ctx);
                ctx.cpu.set_register_at(rd, operand.value);
            }
            Operation::Branch { link } => {
                let target = self.resolve(mode, op_code, ctx);
                if link {
                    ctx.cpu.set_register_at(REG_LR, address.wrapping_add(4));
                }
                ctx.cpu.set_program_counter(target.value);
            }
            Operation::SoftwareInterrupt => ctx.raise(Trap::SoftwareInterrupt),
            _ => {}
        }
    }
}

/// Counts trap entries without touching any register.
#[derive(Debug, Default)]
pub struct CountingTraps {
    pub entered: Vec<Trap>,
}

impl TrapEntry for CountingTraps {
    fn enter(&mut self, trap: Trap, _cpu: &mut RegisterFile) {
        self.entered.push(trap);
    }
}

pub fn memory_with(program: &[u32]) -> FlatMemory {
    let mut memory = FlatMemory::new(0x1000);
    memory.load_words(0, program);
    memory
}

pub fn core_with(program: &[u32]) -> Arm7tdmi<FlatMemory, MiniSemantics> {
    Arm7tdmi::new(memory_with(program), MiniSemantics::default())
}

pub fn run(cpu: &mut Arm7tdmi<FlatMemory, MiniSemantics>, steps: usize) {
    for _ in 0..steps {
        cpu.iterate_step();
    }
}
