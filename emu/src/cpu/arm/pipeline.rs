//! # Three-stage ARM pipeline
//!
//! ```text
//!  bus ──► [fetch] ──► [decode] ──► [execute] ──► dispatch
//! ```
//!
//! The pipeline only stores instruction words; decoding happens when a word
//! reaches the execute slot. After a discontinuity (branch, trap entry,
//! external flush) the slots hold stale words, so dispatch is suppressed
//! until the refill is complete. The flush counter is a bitmask that is
//! shifted right once per step: `0b11 → 0b01 → 0b00`, which suppresses
//! exactly two steps.

use serde::{Deserialize, Serialize};

/// Counter value right after a flush.
pub const FLUSH_COUNTER_RESET: u8 = 0b11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    fetch: u32,
    decode: u32,
    execute: u32,
    flush_counter: u8,
}

impl Default for Pipeline {
    /// A powered-on pipeline is empty, so it starts in the flushed state.
    fn default() -> Self {
        Self {
            fetch: 0,
            decode: 0,
            execute: 0,
            flush_counter: FLUSH_COUNTER_RESET,
        }
    }
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every slot and suppresses dispatch for the next two steps.
    pub const fn reset(&mut self) {
        self.fetch = 0;
        self.decode = 0;
        self.execute = 0;
        self.flush_counter = FLUSH_COUNTER_RESET;
    }

    /// Advances the pipeline by one cycle.
    ///
    /// `fetched` is latched into the fetch slot, then the word in the
    /// execute slot is handed to `dispatch` if the pipeline is refilled
    /// (otherwise the flush counter is shifted), and finally every word
    /// moves one stage down.
    pub fn step<F>(&mut self, fetched: u32, mut dispatch: F)
    where
        F: FnMut(u32),
    {
        self.fetch = fetched;

        if self.flush_counter == 0 {
            dispatch(self.execute);
        } else {
            self.flush_counter >>= 1;
        }

        self.execute = self.decode;
        self.decode = self.fetch;
    }

    #[must_use]
    pub const fn fetch(&self) -> u32 {
        self.fetch
    }

    #[must_use]
    pub const fn decode(&self) -> u32 {
        self.decode
    }

    #[must_use]
    pub const fn execute(&self) -> u32 {
        self.execute
    }

    #[must_use]
    pub const fn flush_counter(&self) -> u8 {
        self.flush_counter
    }

    /// Whether the next step will dispatch the execute slot.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.flush_counter == 0
    }
}
