use crate::bus::Bus;
use crate::cpu::arm::decode_table::DecodeTable;
use crate::cpu::arm::dispatch::{InstructionSemantics, dispatch};
use crate::cpu::arm::pipeline::Pipeline;
use crate::cpu::context::{ArmContext, ExceptionVectors, RegisterFile, TrapEntry};

pub const SIZE_OF_ARM_INSTRUCTION: u32 = 4;

/// ARM-state core: one pipeline, one register file, a bus and the
/// instruction semantics it dispatches to.
///
/// Thumb state is not executed here; a handler that sets the T bit is
/// expected to hand control to a Thumb core of its own.
pub struct Arm7tdmi<B, S, T = ExceptionVectors>
where
    B: Bus,
    T: TrapEntry,
    S: InstructionSemantics<B, T>,
{
    pub context: ArmContext<B, T>,
    pipeline: Pipeline,
    decode_table: &'static DecodeTable,
    semantics: S,
}

impl<B, S> Arm7tdmi<B, S>
where
    B: Bus,
    S: InstructionSemantics<B, ExceptionVectors>,
{
    pub fn new(bus: B, semantics: S) -> Self {
        Self::with_trap_entry(bus, semantics, ExceptionVectors)
    }
}

impl<B, S, T> Arm7tdmi<B, S, T>
where
    B: Bus,
    T: TrapEntry,
    S: InstructionSemantics<B, T>,
{
    pub fn with_trap_entry(bus: B, semantics: S, traps: T) -> Self {
        Self {
            context: ArmContext::new(bus, traps),
            pipeline: Pipeline::new(),
            decode_table: DecodeTable::shared(),
            semantics,
        }
    }

    /// Runs one cycle: fetch at R15, dispatch the execute slot, shift.
    ///
    /// While a handler runs R15 holds its instruction address plus 8. If the
    /// handler wrote R15 the pipeline is flushed and R15 stays at the new
    /// target, otherwise it moves on to the next word. A flush requested
    /// between steps is honoured before anything is dispatched.
    pub fn iterate_step(&mut self) {
        if self.context.cpu.take_flush_request() {
            self.flush_pipeline();
        }

        let pc = self.context.cpu.program_counter() & !0b11;
        self.context.cpu.registers.set_program_counter(pc);
        let fetched = self.context.bus.fetch_opcode_word(pc);

        let table = self.decode_table;
        let Self {
            context,
            pipeline,
            semantics,
            ..
        } = self;
        pipeline.step(fetched, |op_code| {
            dispatch(op_code, table, context, semantics);
        });

        if self.context.cpu.take_flush_request() {
            self.pipeline.reset();
        } else {
            self.context
                .cpu
                .registers
                .advance_program_counter(SIZE_OF_ARM_INSTRUCTION);
        }
    }

    /// Discards the staged words, e.g. after the host moved R15.
    ///
    /// Consumes any pending flush request, so the refill always costs two
    /// suppressed steps.
    pub fn flush_pipeline(&mut self) {
        tracing::trace!(
            "pipeline flushed at {:#010X}",
            self.context.cpu.program_counter()
        );
        self.context.cpu.take_flush_request();
        self.pipeline.reset();
    }

    #[must_use]
    pub const fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    #[must_use]
    pub const fn cpu(&self) -> &RegisterFile {
        &self.context.cpu
    }

    pub const fn cpu_mut(&mut self) -> &mut RegisterFile {
        &mut self.context.cpu
    }

    #[must_use]
    pub const fn decode_table(&self) -> &'static DecodeTable {
        self.decode_table
    }

    #[must_use]
    pub const fn semantics(&self) -> &S {
        &self.semantics
    }

    pub const fn semantics_mut(&mut self) -> &mut S {
        &mut self.semantics
    }
}
