pub mod arm;

#[allow(clippy::module_name_repetitions)]
pub mod arm7tdmi;
pub mod condition;
pub mod context;
pub mod cpu_modes;
pub mod psr;
pub mod register_bank;

#[allow(clippy::missing_panics_doc)]
pub mod registers;
