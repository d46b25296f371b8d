//! Textual command interpretation.
//!
//! Parsing is deliberately separate from transition application: the action
//! vocabulary stays closed, and new aliases never touch the controller.

/// Raw inputs mapped to [`ActionToken::Step`].
pub const STEP_ALIASES: [&str; 3] = ["n", "next", "s"];
/// Raw inputs mapped to [`ActionToken::Reset`].
pub const RESET_ALIASES: [&str; 2] = ["r", "reset"];

/// Recognized action for one line of command input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum ActionToken {
    /// Advance the program counter by one instruction.
    Step,
    /// Restore the initial session snapshot.
    Reset,
    /// Input matched no alias; performs no state transition.
    Unrecognized,
}

/// Maps raw command text to a recognized action token.
///
/// Matching trims surrounding whitespace and is case-sensitive against the
/// fixed alias tables. Anything else, including empty input, is
/// [`ActionToken::Unrecognized`].
#[must_use]
pub fn interpret(raw: &str) -> ActionToken {
    let trimmed = raw.trim();
    if STEP_ALIASES.contains(&trimmed) {
        ActionToken::Step
    } else if RESET_ALIASES.contains(&trimmed) {
        ActionToken::Reset
    } else {
        ActionToken::Unrecognized
    }
}
