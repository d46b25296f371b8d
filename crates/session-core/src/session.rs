//! Session controller: the single owner of all mutable session state.
//!
//! Every mutation — program-counter index, register bank, change set,
//! history — goes through [`SessionController`], so the register panel, the
//! listing highlight, and the auto-scroll target can never disagree.
//! External readers only see immutable snapshots and borrows.

use std::collections::{BTreeSet, VecDeque};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::Rng;

use crate::command::ActionToken;
use crate::memory::MemoryImage;
use crate::state::{RegisterBank, RegisterId, SessionPhase, GENERAL_REGISTER_MAX};
use crate::stream::{hex64, Instruction, InstructionStream};
use crate::view::ViewSync;
use crate::SessionError;

/// How long a step's register highlight stays active before it expires.
pub const DEFAULT_HIGHLIGHT_DURATION: Duration = Duration::from_millis(800);
/// Bounded history capacity; the oldest entry is discarded first.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;
/// Base address of the generated instruction stream.
pub const DEFAULT_BASE_ADDRESS: u64 = 0x0000_007d_a8c3_bbe0;
/// Number of instructions generated for a default session.
pub const DEFAULT_INSTRUCTION_COUNT: usize = 2048;
/// Program-counter index the session starts at and resets to.
pub const DEFAULT_START_INDEX: usize = 1286;

/// Immutable per-session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct SessionConfig {
    /// Program-counter index at session start; restored by reset.
    pub start_index: usize,
    /// Delay before a step's change-set highlight expires.
    pub highlight_duration: Duration,
    /// Maximum retained history entries.
    pub history_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_index: DEFAULT_START_INDEX,
            highlight_duration: DEFAULT_HIGHLIGHT_DURATION,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// Outcome of one step attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepOutcome {
    /// The program counter advanced to `index` and `mutated` got a new value.
    Stepped {
        /// New program-counter index.
        index: usize,
        /// General-purpose register mutated by this step.
        mutated: RegisterId,
    },
    /// Stepping would pass the last instruction; the session is now halted.
    EndOfProgram,
}

/// Result of applying an interpreted action token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// A step completed.
    Stepped {
        /// New program-counter index.
        index: usize,
        /// General-purpose register mutated by this step.
        mutated: RegisterId,
    },
    /// A step was rejected at the end of the program.
    EndOfProgram,
    /// The session was restored to its initial snapshot.
    ResetApplied,
    /// The token was unrecognized; nothing changed.
    Ignored,
}

/// Pending deferred clear of the change set.
///
/// Replacing the stored timer is the cancellation: a deadline superseded by a
/// newer step can never clear the newer step's highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HighlightTimer {
    deadline: Instant,
}

/// The session state machine.
///
/// Methods execute synchronously and atomically with respect to each other;
/// the only asynchronous element is the highlight expiry deadline, which the
/// host polls via [`SessionController::expire_highlight`].
#[derive(Debug)]
pub struct SessionController {
    stream: InstructionStream,
    memory: MemoryImage,
    config: SessionConfig,
    registers: RegisterBank,
    initial_registers: RegisterBank,
    changed: BTreeSet<RegisterId>,
    history: VecDeque<String>,
    pc_index: usize,
    phase: SessionPhase,
    highlight: Option<HighlightTimer>,
    rng: StdRng,
}

impl SessionController {
    /// Creates a session over a fixed stream and memory image.
    ///
    /// Registers are seeded with arbitrary values from `rng`, then `pc` is
    /// forced to the address of the instruction at the configured start
    /// index. The resulting bank becomes the snapshot that reset restores.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::StartIndexOutOfRange`] when the stream is
    /// empty or the start index does not address an instruction.
    pub fn new(
        stream: InstructionStream,
        memory: MemoryImage,
        config: SessionConfig,
        mut rng: StdRng,
    ) -> Result<Self, SessionError> {
        let start_address = stream.address_at(config.start_index).ok_or(
            SessionError::StartIndexOutOfRange {
                index: config.start_index,
                len: stream.len(),
            },
        )?;

        let mut registers = RegisterBank::seeded(&mut rng);
        registers.set(RegisterId::Pc, start_address)?;
        let initial_registers = registers.snapshot();
        let pc_index = config.start_index;

        Ok(Self {
            stream,
            memory,
            config,
            registers,
            initial_registers,
            changed: BTreeSet::new(),
            history: VecDeque::new(),
            pc_index,
            phase: SessionPhase::Ready,
            highlight: None,
            rng,
        })
    }

    /// Applies an interpreted action token.
    ///
    /// [`ActionToken::Unrecognized`] performs no state transition and is not
    /// echoed to history.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError::UnknownRegister`] from register writes;
    /// unreachable with the closed identifier set, but never swallowed.
    pub fn apply(&mut self, token: ActionToken, now: Instant) -> Result<Transition, SessionError> {
        match token {
            ActionToken::Step => Ok(match self.step(now)? {
                StepOutcome::Stepped { index, mutated } => Transition::Stepped { index, mutated },
                StepOutcome::EndOfProgram => Transition::EndOfProgram,
            }),
            ActionToken::Reset => {
                self.reset();
                Ok(Transition::ResetApplied)
            }
            ActionToken::Unrecognized => Ok(Transition::Ignored),
        }
    }

    /// Advances the program counter by one instruction.
    ///
    /// On success, one arbitrary general-purpose register receives a new
    /// value, `pc` follows the new active instruction, the change set becomes
    /// exactly `{mutated, pc}`, and any pending highlight expiry is
    /// superseded by a fresh deadline measured from `now`.
    ///
    /// At the end of the stream nothing is mutated: the phase flips to
    /// [`SessionPhase::Halted`] and an end-of-program entry is logged.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError::UnknownRegister`] from register writes;
    /// unreachable with the closed identifier set, but never swallowed.
    pub fn step(&mut self, now: Instant) -> Result<StepOutcome, SessionError> {
        let next = self.pc_index + 1;
        let Some(address) = self.stream.address_at(next) else {
            self.phase = SessionPhase::Halted;
            self.push_history("step: end of program reached".to_string());
            return Ok(StepOutcome::EndOfProgram);
        };

        let mutated = RegisterId::X(self.rng.gen_range(0..=GENERAL_REGISTER_MAX));
        let value = self.rng.gen::<u64>();
        self.registers.set(mutated, value)?;
        self.registers.set(RegisterId::Pc, address)?;
        self.pc_index = next;

        // Clear before publishing the new highlight: no stale overlap.
        self.changed.clear();
        let _ = self.changed.insert(mutated);
        let _ = self.changed.insert(RegisterId::Pc);
        self.highlight = Some(HighlightTimer {
            deadline: now + self.config.highlight_duration,
        });

        self.push_history(format!(
            "step: pc -> {} ({mutated} = {})",
            hex64(address),
            hex64(value)
        ));
        Ok(StepOutcome::Stepped { index: next, mutated })
    }

    /// Restores the initial session snapshot. Valid from any phase.
    ///
    /// Registers revert to their seeded values, the program counter returns
    /// to the start index, and the change set, pending highlight, and
    /// history all clear immediately.
    pub fn reset(&mut self) {
        self.registers = self.initial_registers.clone();
        self.pc_index = self.config.start_index;
        self.phase = SessionPhase::Ready;
        self.changed.clear();
        self.highlight = None;
        self.history.clear();
    }

    /// Clears the change set once the pending highlight deadline has passed.
    ///
    /// A deadline replaced by a newer step no longer exists here, so a
    /// late poll driven by an old step cannot erase the newer highlight.
    pub fn expire_highlight(&mut self, now: Instant) {
        if let Some(timer) = self.highlight {
            if now >= timer.deadline {
                self.changed.clear();
                self.highlight = None;
            }
        }
    }

    /// Pushes the current program-counter position to a presentation layer.
    ///
    /// One-way data flow: the sink receives values and has no handle back
    /// into session state.
    pub fn sync_view(&self, view: &mut dyn ViewSync) {
        if let Some(instruction) = self.stream.get(self.pc_index) {
            view.scroll_to(self.pc_index, instruction.address);
        }
    }

    /// Current execution phase.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Index of the active instruction.
    #[must_use]
    pub const fn pc_index(&self) -> usize {
        self.pc_index
    }

    /// The active instruction row.
    #[must_use]
    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.stream.get(self.pc_index)
    }

    /// The immutable instruction stream.
    #[must_use]
    pub const fn stream(&self) -> &InstructionStream {
        &self.stream
    }

    /// The static memory image.
    #[must_use]
    pub const fn memory(&self) -> &MemoryImage {
        &self.memory
    }

    /// Immutable copy of the register bank for external readers.
    #[must_use]
    pub fn register_snapshot(&self) -> RegisterBank {
        self.registers.snapshot()
    }

    /// Reads a single register value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownRegister`] when `id` lies outside the
    /// fixed register set.
    pub fn register_value(&self, id: RegisterId) -> Result<u64, SessionError> {
        self.registers.get(id)
    }

    /// Identifiers mutated by the most recent step, for display emphasis.
    #[must_use]
    pub const fn changed_registers(&self) -> &BTreeSet<RegisterId> {
        &self.changed
    }

    /// Returns `true` while a highlight expiry deadline is outstanding.
    #[must_use]
    pub const fn highlight_pending(&self) -> bool {
        self.highlight.is_some()
    }

    /// History entries, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    fn push_history(&mut self, entry: String) {
        if self.config.history_capacity == 0 {
            return;
        }
        if self.history.len() == self.config.history_capacity {
            let _ = self.history.pop_front();
        }
        self.history.push_back(entry);
    }
}
