//! ARM instruction dispatch engine: the three-stage pipeline, condition
//! evaluation and the two-level decode table of an ARM7TDMI-class core.
//!
//! Instruction semantics and the memory system are supplied by the host
//! through [`cpu::arm::dispatch::InstructionSemantics`] and [`bus::Bus`].

#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[allow(clippy::cast_possible_wrap)]
mod bitwise;

#[allow(clippy::missing_panics_doc)]
#[allow(clippy::cast_lossless)]
pub mod bus;

pub mod cpu;
