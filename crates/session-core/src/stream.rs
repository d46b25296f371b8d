//! Instruction stream generation for the simulated disassembly listing.
//!
//! The stream is a mock: mnemonics and operands are drawn from fixed
//! vocabularies rather than decoded from real machine code. What matters is
//! the structural contract consumed by the session controller — a fixed
//! number of immutable entries whose addresses increase by exactly the
//! instruction width.

use std::fmt;

use rand::Rng;

use crate::state::GENERAL_REGISTER_MAX;

/// Byte width of every instruction in the reference encoding.
pub const INSTRUCTION_WIDTH_BYTES: u64 = 4;

/// Fixed load/store vocabulary.
pub const LOAD_STORE_MNEMONICS: [&str; 4] = ["ldr", "str", "ldur", "stur"];
/// Fixed branch vocabulary.
pub const BRANCH_MNEMONICS: [&str; 4] = ["b", "bl", "b.eq", "b.ne"];
/// Fixed return vocabulary.
pub const RETURN_MNEMONICS: [&str; 1] = ["ret"];
/// Fixed data-processing vocabulary.
pub const DATA_PROCESSING_MNEMONICS: [&str; 8] =
    ["mov", "add", "sub", "and", "orr", "eor", "cmp", "tst"];

/// Canonical hex text form for 64-bit addresses and register values.
#[must_use]
pub fn hex64(value: u64) -> String {
    format!("0x{value:016x}")
}

/// Operand-grammar class of a mnemonic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MnemonicClass {
    /// `"<reg>, [<reg>, #<imm>]"`.
    LoadStore,
    /// Absolute target address text, no bracket syntax.
    Branch,
    /// Empty operand text.
    Return,
    /// `"<reg>, <reg>"`.
    DataProcessing,
}

impl MnemonicClass {
    /// Returns the fixed mnemonic vocabulary for this class.
    #[must_use]
    pub const fn vocabulary(self) -> &'static [&'static str] {
        match self {
            Self::LoadStore => &LOAD_STORE_MNEMONICS,
            Self::Branch => &BRANCH_MNEMONICS,
            Self::Return => &RETURN_MNEMONICS,
            Self::DataProcessing => &DATA_PROCESSING_MNEMONICS,
        }
    }

    /// Classifies a mnemonic from the fixed vocabularies.
    #[must_use]
    pub fn of(mnemonic: &str) -> Option<Self> {
        [
            Self::LoadStore,
            Self::Branch,
            Self::Return,
            Self::DataProcessing,
        ]
        .into_iter()
        .find(|class| class.vocabulary().contains(&mnemonic))
    }
}

/// Cosmetic tag attached to some instructions; carries no stepping semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Annotation {
    /// Operand is addressed relative to the program counter.
    PcRelative,
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PcRelative => write!(f, "pc-relative"),
        }
    }
}

/// One immutable decoded-instruction row.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Instruction {
    /// Address of this instruction.
    pub address: u64,
    /// Mnemonic drawn from the fixed vocabulary.
    pub mnemonic: String,
    /// Formatted operand text; grammar depends on the mnemonic class.
    pub operands: String,
    /// Optional cosmetic tag.
    pub annotation: Option<Annotation>,
}

/// Ordered, immutable sequence of instructions created once per session.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct InstructionStream {
    instructions: Vec<Instruction>,
}

impl InstructionStream {
    /// Generates `count` instructions starting at `base_address`.
    ///
    /// Pure given `rng`: equal seeds produce equal streams. Entry `i` lives
    /// at `base_address + i * INSTRUCTION_WIDTH_BYTES`.
    pub fn generate(base_address: u64, count: usize, rng: &mut impl Rng) -> Self {
        let last_address =
            base_address.wrapping_add(INSTRUCTION_WIDTH_BYTES.wrapping_mul(count.max(1) as u64));
        let mut instructions = Vec::with_capacity(count);
        let mut address = base_address;

        for _ in 0..count {
            instructions.push(generate_one(address, base_address, last_address, rng));
            address = address.wrapping_add(INSTRUCTION_WIDTH_BYTES);
        }

        Self { instructions }
    }

    /// Builds a stream from pre-made instructions, for fixtures.
    #[must_use]
    pub fn from_instructions(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    /// Number of instructions in the stream.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` when the stream holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Returns the instruction at `index`, if present.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Instruction> {
        self.instructions.get(index)
    }

    /// Returns the address of the instruction at `index`, if present.
    #[must_use]
    pub fn address_at(&self, index: usize) -> Option<u64> {
        self.instructions.get(index).map(|entry| entry.address)
    }

    /// Iterates the instructions in stream order.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }
}

fn generate_one(
    address: u64,
    base_address: u64,
    last_address: u64,
    rng: &mut impl Rng,
) -> Instruction {
    let class = match rng.gen_range(0_u32..100) {
        0..=44 => MnemonicClass::DataProcessing,
        45..=74 => MnemonicClass::LoadStore,
        75..=91 => MnemonicClass::Branch,
        _ => MnemonicClass::Return,
    };
    let vocabulary = class.vocabulary();
    let mnemonic = vocabulary[rng.gen_range(0..vocabulary.len())];

    let operands = match class {
        MnemonicClass::LoadStore => {
            let rd = rng.gen_range(0..=GENERAL_REGISTER_MAX);
            let rn = rng.gen_range(0..=GENERAL_REGISTER_MAX);
            let imm = u32::from(rng.gen_range(0_u8..32)) * 8;
            format!("x{rd}, [x{rn}, #{imm}]")
        }
        MnemonicClass::Branch => {
            let span = last_address.wrapping_sub(base_address) / INSTRUCTION_WIDTH_BYTES;
            let target =
                base_address.wrapping_add(rng.gen_range(0..span) * INSTRUCTION_WIDTH_BYTES);
            hex64(target)
        }
        MnemonicClass::Return => String::new(),
        MnemonicClass::DataProcessing => {
            let rd = rng.gen_range(0..=GENERAL_REGISTER_MAX);
            let rn = rng.gen_range(0..=GENERAL_REGISTER_MAX);
            format!("x{rd}, x{rn}")
        }
    };

    let annotation = if class == MnemonicClass::LoadStore && rng.gen_range(0_u8..6) == 0 {
        Some(Annotation::PcRelative)
    } else {
        None
    };

    Instruction {
        address,
        mnemonic: mnemonic.to_string(),
        operands,
        annotation,
    }
}
