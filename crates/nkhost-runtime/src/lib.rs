//! nkhost runtime library.
//!
//! Provides the primitives the GUI core calls instead of the C standard library:
//! - Invariant checks (`nkhost_assert`)
//! - Memory fill and copy (`nkhost_memset`, `nkhost_memcpy`)
//! - Fast inverse square root and trigonometry (`nkhost_inv_sqrt`, `nkhost_sin`, `nkhost_cos`)
//! - Bounded formatted output (`nkhost_snprintf`)
//!
//! Each primitive is stateless and reentrant. The safe Rust functions and
//! the exported C symbols share one implementation.

pub mod assert;
pub mod format;
pub mod math;
pub mod memory;


use nkhost_config::HookTable;

pub use assert::{assert_invariant, nkhost_assert};
pub use format::{Arg, BoundedWriter, FormatError, Formatted, format_into, nkhost_snprintf, safe_format};
pub use math::{cosine, inverse_sqrt, nkhost_cos, nkhost_inv_sqrt, nkhost_sin, sin_cos, sine};
pub use memory::{copy_memory, fill_memory, nkhost_memcpy, nkhost_memset};

/// Hook table bound to this crate's exported primitives.
///
/// Every slot is filled here at compile time; adding a slot to
/// [`HookTable`] without a primitive behind it fails to build.
pub fn hook_table() -> HookTable {
    HookTable {
        assert: nkhost_assert,
        memset: nkhost_memset,
        memcpy: nkhost_memcpy,
        inv_sqrt: nkhost_inv_sqrt,
        sin: nkhost_sin,
        cos: nkhost_cos,
        format: nkhost_snprintf,
    }
}
