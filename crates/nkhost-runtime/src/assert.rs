//! Invariant checks for the GUI core.
//!
//! A failed check stops the process. Layout code uses assertions to catch
//! internal contract violations, and nothing downstream can recover from a
//! corrupted layout state.

use core::panic::Location;

/// Abort the process if `condition` is false.
#[track_caller]
#[inline]
pub fn assert_invariant(condition: bool) {
    if !condition {
        invariant_violated(Location::caller());
    }
}

#[cold]
#[inline(never)]
fn invariant_violated(location: &Location<'_>) -> ! {
    tracing::error!(%location, "GUI core invariant violated; aborting");
    std::process::abort()
}

/// `NK_ASSERT` hook.
#[unsafe(no_mangle)]
pub extern "C" fn nkhost_assert(condition: bool) {
    assert_invariant(condition);
}
