//! View-synchronization boundary between the engine and a presentation layer.
//!
//! Strictly one-way: the engine pushes the active row position outward after
//! a transition, and implementations receive plain values with no handle back
//! into session state.

use std::ops::Range;

/// Reaction target for program-counter movement.
///
/// Implementations must bring the instruction row at the reported index into
/// their visible region without blocking further input.
pub trait ViewSync {
    /// Called after a transition with the active row's index and address.
    fn scroll_to(&mut self, index: usize, address: u64);
}

/// Computes which rows to draw so the active row stays visible.
///
/// The active row is centered where possible; at either end of the listing
/// the window clamps instead of running out of rows.
#[must_use]
pub fn visible_window(active: usize, total: usize, height: usize) -> Range<usize> {
    if height == 0 || total == 0 {
        return 0..0;
    }
    if height >= total {
        return 0..total;
    }
    let start = active.saturating_sub(height / 2).min(total - height);
    start..start + height
}
