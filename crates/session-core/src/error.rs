use thiserror::Error;

/// Failures surfaced by the session-state engine.
///
/// No variant is fatal: the session always remains in its last valid state
/// and keeps accepting `Reset`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SessionError {
    /// Register access used an identifier outside the fixed register set.
    ///
    /// The set is closed at initialization; a miss means a programmer error
    /// and must never silently create a new slot.
    #[error("unknown register identifier `{0}`")]
    UnknownRegister(String),

    /// Step attempted at or past the last instruction of the stream.
    #[error("end of program reached")]
    EndOfProgram,

    /// Configured start index does not address an instruction in the stream.
    #[error("start index {index} is outside the instruction stream of length {len}")]
    StartIndexOutOfRange {
        /// The rejected program-counter start index.
        index: usize,
        /// Length of the instruction stream it was checked against.
        len: usize,
    },
}
