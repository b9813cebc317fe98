//! # ARM Instruction Set (32-bit)
//!
//! Every ARM instruction is conditional and 32 bits wide.
//!
//! ```text
//! 31-28   27-20      19-8   7-4         3-0
//! [Cond] [Primary]  [....] [Secondary] [....]
//! ```
//!
//! - **Condition (bits 31-28)**: see [`condition`](super::condition)
//! - **Primary / secondary index**: see [`decode_table`]
//!
//! ## Instruction Categories
//!
//! | Bits 27-25 | Category                              | Examples               |
//! |------------|---------------------------------------|------------------------|
//! | 000        | Data Processing (register), Multiply, Swap, Halfword, BX, PSR, DSP | AND, MUL, SWP, LDRH, QADD |
//! | 001        | Data Processing (immediate), MSR      | MOV, MSR               |
//! | 01x        | Single Data Transfer                  | LDR, STRB              |
//! | 100        | Block Data Transfer                   | LDM, STM               |
//! | 101        | Branch                                | B, BL                  |
//! | 110        | Coprocessor Data Transfer             | LDC, STC               |
//! | 111        | Coprocessor operation, SWI            | CDP, MRC, SWI          |
//!
//! ## Submodules
//!
//! - [`operation`] - Operation handlers
//! - [`addressing`] - Addressing-mode resolvers
//! - [`decode_table`] - (primary, secondary) → (operation, resolver)
//! - [`pipeline`] - Fetch/decode/execute slots and refill latency
//! - [`dispatch`] - Condition gate and handler invocation

pub mod addressing;

#[allow(clippy::cast_possible_truncation)]
pub mod decode_table;
pub mod dispatch;
pub mod operation;
pub mod pipeline;
