use std::fmt;

use rand::Rng;

use crate::SessionError;

/// Number of general-purpose registers (`x0..x30`).
pub const GENERAL_REGISTER_COUNT: usize = 31;
/// Highest valid general-purpose register number.
pub const GENERAL_REGISTER_MAX: u8 = 30;
/// Total register slots, including the `sp` and `pc` specials.
pub const REGISTER_SLOT_COUNT: usize = GENERAL_REGISTER_COUNT + 2;

/// Identifier for one slot in the fixed register set.
///
/// The set is closed: `x0..x30`, `sp`, and `pc` exist from initialization and
/// are never added or removed. `X(n)` with `n > 30` is representable but lies
/// outside the set; every bank operation rejects it with
/// [`SessionError::UnknownRegister`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum RegisterId {
    /// General-purpose register `x0..x30`.
    X(u8),
    /// Stack pointer.
    Sp,
    /// Program counter.
    Pc,
}

impl RegisterId {
    /// Iterates every identifier in the fixed set, in canonical order
    /// (`x0..x30`, then `sp`, then `pc`).
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=GENERAL_REGISTER_MAX)
            .map(Self::X)
            .chain([Self::Sp, Self::Pc])
    }

    /// Parses a textual register name (`x0..x30`, `sp`, `pc`).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownRegister`] for any name outside the
    /// fixed set.
    pub fn from_name(name: &str) -> Result<Self, SessionError> {
        match name {
            "sp" => Ok(Self::Sp),
            "pc" => Ok(Self::Pc),
            _ => name
                .strip_prefix('x')
                .and_then(|digits| digits.parse::<u8>().ok())
                .filter(|number| *number <= GENERAL_REGISTER_MAX)
                .map(Self::X)
                .ok_or_else(|| SessionError::UnknownRegister(name.to_string())),
        }
    }

    /// Returns the backing-array slot for this identifier.
    fn slot(self) -> Result<usize, SessionError> {
        match self {
            Self::X(number) if usize::from(number) < GENERAL_REGISTER_COUNT => {
                Ok(usize::from(number))
            }
            Self::X(_) => Err(SessionError::UnknownRegister(self.to_string())),
            Self::Sp => Ok(GENERAL_REGISTER_COUNT),
            Self::Pc => Ok(GENERAL_REGISTER_COUNT + 1),
        }
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X(number) => write!(f, "x{number}"),
            Self::Sp => write!(f, "sp"),
            Self::Pc => write!(f, "pc"),
        }
    }
}

/// Fixed-slot bank of 64-bit register values.
///
/// Only the session controller mutates a bank; external readers receive
/// immutable copies via [`RegisterBank::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterBank {
    values: [u64; REGISTER_SLOT_COUNT],
}

impl Default for RegisterBank {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl RegisterBank {
    /// Creates a bank with every slot zeroed.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            values: [0; REGISTER_SLOT_COUNT],
        }
    }

    /// Creates a bank with arbitrary starting values drawn from `rng`.
    ///
    /// `sp` is seeded 16-byte aligned. `pc` is left zeroed here; the session
    /// controller forces it to the active instruction address before the
    /// state becomes externally observable.
    pub fn seeded(rng: &mut impl Rng) -> Self {
        let mut values = [0_u64; REGISTER_SLOT_COUNT];
        for slot in values.iter_mut().take(GENERAL_REGISTER_COUNT) {
            *slot = rng.gen();
        }
        values[GENERAL_REGISTER_COUNT] = rng.gen::<u64>() & !0xF;
        Self { values }
    }

    /// Reads a register value.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownRegister`] when `id` lies outside the
    /// fixed register set.
    pub fn get(&self, id: RegisterId) -> Result<u64, SessionError> {
        Ok(self.values[id.slot()?])
    }

    /// Writes a register value. Never creates a new slot.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownRegister`] when `id` lies outside the
    /// fixed register set.
    pub fn set(&mut self, id: RegisterId, value: u64) -> Result<(), SessionError> {
        self.values[id.slot()?] = value;
        Ok(())
    }

    /// Returns an immutable copy for safe external reads.
    #[must_use]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    /// Iterates `(identifier, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (RegisterId, u64)> + '_ {
        RegisterId::all().zip(self.values.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{
        RegisterBank, RegisterId, GENERAL_REGISTER_COUNT, GENERAL_REGISTER_MAX,
        REGISTER_SLOT_COUNT,
    };
    use crate::SessionError;

    #[test]
    fn slot_count_covers_generals_plus_specials() {
        assert_eq!(GENERAL_REGISTER_COUNT, 31);
        assert_eq!(REGISTER_SLOT_COUNT, 33);
        assert_eq!(RegisterId::all().count(), REGISTER_SLOT_COUNT);
    }

    #[test]
    fn canonical_order_ends_with_sp_then_pc() {
        let tail: Vec<RegisterId> = RegisterId::all().skip(GENERAL_REGISTER_COUNT).collect();
        assert_eq!(tail, vec![RegisterId::Sp, RegisterId::Pc]);
    }

    #[test]
    fn get_set_roundtrip_tracks_each_slot_independently() {
        let mut bank = RegisterBank::zeroed();

        for (offset, id) in (0_u64..).zip(RegisterId::all()) {
            bank.set(id, 0x1000 + offset).expect("valid identifier");
        }

        for (offset, id) in (0_u64..).zip(RegisterId::all()) {
            assert_eq!(bank.get(id).expect("valid identifier"), 0x1000 + offset);
        }
    }

    #[test]
    fn identifiers_outside_the_fixed_set_are_rejected() {
        let mut bank = RegisterBank::zeroed();

        for number in [GENERAL_REGISTER_MAX + 1, 100, u8::MAX] {
            let id = RegisterId::X(number);
            assert_eq!(
                bank.get(id),
                Err(SessionError::UnknownRegister(format!("x{number}")))
            );
            assert_eq!(
                bank.set(id, 1),
                Err(SessionError::UnknownRegister(format!("x{number}")))
            );
        }
    }

    #[test]
    fn from_name_parses_the_whole_fixed_set() {
        assert_eq!(RegisterId::from_name("sp"), Ok(RegisterId::Sp));
        assert_eq!(RegisterId::from_name("pc"), Ok(RegisterId::Pc));
        for number in 0..=GENERAL_REGISTER_MAX {
            assert_eq!(
                RegisterId::from_name(&format!("x{number}")),
                Ok(RegisterId::X(number))
            );
        }
    }

    #[test]
    fn from_name_rejects_names_outside_the_set() {
        for name in ["x31", "x255", "X0", "SP", "r7", "", "xx"] {
            assert_eq!(
                RegisterId::from_name(name),
                Err(SessionError::UnknownRegister(name.to_string()))
            );
        }
    }

    #[test]
    fn display_matches_parse_names() {
        assert_eq!(RegisterId::X(7).to_string(), "x7");
        assert_eq!(RegisterId::Sp.to_string(), "sp");
        assert_eq!(RegisterId::Pc.to_string(), "pc");
    }

    #[test]
    fn seeding_is_reproducible_for_equal_seeds() {
        let first = RegisterBank::seeded(&mut StdRng::seed_from_u64(7));
        let second = RegisterBank::seeded(&mut StdRng::seed_from_u64(7));
        assert_eq!(first, second);
    }

    #[test]
    fn seeded_bank_aligns_sp_and_zeroes_pc() {
        let bank = RegisterBank::seeded(&mut StdRng::seed_from_u64(3));
        assert_eq!(bank.get(RegisterId::Sp).expect("sp present") % 16, 0);
        assert_eq!(bank.get(RegisterId::Pc).expect("pc present"), 0);
    }

    #[test]
    fn snapshot_is_decoupled_from_later_writes() {
        let mut bank = RegisterBank::zeroed();
        let snapshot = bank.snapshot();

        bank.set(RegisterId::X(3), 0xDEAD).expect("valid identifier");

        assert_eq!(snapshot.get(RegisterId::X(3)), Ok(0));
        assert_eq!(bank.get(RegisterId::X(3)), Ok(0xDEAD));
    }
}
