//! Static memory image backing the hex-dump pane.

use rand::Rng;

/// Default memory-image length in bytes.
pub const DEFAULT_MEMORY_BYTES: usize = 512;

/// Fixed-length, immutable byte buffer.
///
/// The image never changes for the session's lifetime; there is no simulated
/// write path, so no mutator exists on this type at all.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MemoryImage {
    bytes: Box<[u8]>,
}

impl MemoryImage {
    /// Generates `len` arbitrary bytes. Pure given `rng`.
    pub fn generate(len: usize, rng: &mut impl Rng) -> Self {
        let mut bytes = vec![0_u8; len];
        rng.fill(bytes.as_mut_slice());
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Wraps a pre-made buffer, for fixtures.
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    /// Length of the image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when the image holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read-only view of the whole image.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the byte at `offset`, if in range.
    #[must_use]
    pub fn byte(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }
}
