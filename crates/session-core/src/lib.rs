//! Session-state engine for a simulated low-level debugger.
//!
//! The crate models one interactive stepping session: an immutable
//! instruction stream, a fixed register bank, a static memory image, a
//! command interpreter, and the controller that owns every legal state
//! transition. Presentation layers are external collaborators that only read
//! snapshots and react through the [`ViewSync`] boundary.

/// Error taxonomy for session-state operations.
pub mod error;
pub use error::SessionError;

/// Register bank and session-phase state model primitives.
pub mod state;
pub use state::{
    RegisterBank, RegisterId, SessionPhase, GENERAL_REGISTER_COUNT, GENERAL_REGISTER_MAX,
    REGISTER_SLOT_COUNT,
};

/// Instruction stream generation and storage.
pub mod stream;
pub use stream::{
    hex64, Annotation, Instruction, InstructionStream, MnemonicClass, BRANCH_MNEMONICS,
    DATA_PROCESSING_MNEMONICS, INSTRUCTION_WIDTH_BYTES, LOAD_STORE_MNEMONICS, RETURN_MNEMONICS,
};

/// Static memory image backing the hex-dump pane.
pub mod memory;
pub use memory::{MemoryImage, DEFAULT_MEMORY_BYTES};

/// Textual command interpretation.
pub mod command;
pub use command::{interpret, ActionToken, RESET_ALIASES, STEP_ALIASES};

/// Session controller state machine.
pub mod session;
pub use session::{
    SessionConfig, SessionController, StepOutcome, Transition, DEFAULT_BASE_ADDRESS,
    DEFAULT_HIGHLIGHT_DURATION, DEFAULT_HISTORY_CAPACITY, DEFAULT_INSTRUCTION_COUNT,
    DEFAULT_START_INDEX,
};

/// View-synchronization boundary contract.
pub mod view;
pub use view::{visible_window, ViewSync};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
