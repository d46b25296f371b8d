//! Session register state model primitives.

/// Session execution-phase machine.
pub mod phase;
/// Register identifier set and fixed-slot bank storage model.
pub mod registers;

pub use phase::SessionPhase;
pub use registers::{
    RegisterBank, RegisterId, GENERAL_REGISTER_COUNT, GENERAL_REGISTER_MAX, REGISTER_SLOT_COUNT,
};
