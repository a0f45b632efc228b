//! C ABI shapes shared by the hook table and the runtime.
//!
//! Every function pointer type here mirrors the prototype the GUI core
//! expects for the corresponding hook. A mismatch in parameter order,
//! passing mode or return type is a type error at the binding site.

use core::ffi::{c_char, c_int, c_void};

/// `void nkhost_assert(_Bool x)`
pub type AssertFn = extern "C" fn(bool);

/// `void *nkhost_memset(void *s, int c, size_t n)`
pub type MemsetFn = unsafe extern "C" fn(*mut c_void, c_int, usize) -> *mut c_void;

/// `void *nkhost_memcpy(void *dest, const void *src, size_t n)`
pub type MemcpyFn = unsafe extern "C" fn(*mut c_void, *const c_void, usize) -> *mut c_void;

/// `float f(float)`, shared by the inverse square root and trig hooks.
pub type UnaryFn = extern "C" fn(f32) -> f32;

/// `int nkhost_snprintf(char *buf, size_t cap, const char *fmt, const nkhost_format_arg *args, size_t nargs)`
pub type FormatFn =
    unsafe extern "C" fn(*mut c_char, usize, *const c_char, *const FormatArg, usize) -> c_int;

// =============================================================================
// Format arguments
//
// Stable Rust cannot define C variadic functions, so the formatting hook
// takes an explicit array of tagged arguments instead of a `va_list`.
// =============================================================================

/// Discriminant of a [`FormatArg`].
///
/// Stored as a raw `u32` in the C struct; an unknown value is rejected by
/// [`FormatArgKind::from_raw`] rather than transmuted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FormatArgKind {
    Int = 0,
    Uint = 1,
    Double = 2,
    Char = 3,
    CStr = 4,
}

impl FormatArgKind {
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Int),
            1 => Some(Self::Uint),
            2 => Some(Self::Double),
            3 => Some(Self::Char),
            4 => Some(Self::CStr),
            _ => None,
        }
    }

    /// Name used for this kind in the generated C header.
    pub const fn c_name(self) -> &'static str {
        match self {
            Self::Int => "NKHOST_ARG_INT",
            Self::Uint => "NKHOST_ARG_UINT",
            Self::Double => "NKHOST_ARG_DOUBLE",
            Self::Char => "NKHOST_ARG_CHAR",
            Self::CStr => "NKHOST_ARG_CSTR",
        }
    }

    pub const ALL: [FormatArgKind; 5] = [
        Self::Int,
        Self::Uint,
        Self::Double,
        Self::Char,
        Self::CStr,
    ];
}

#[derive(Clone, Copy)]
#[repr(C)]
pub union FormatValue {
    pub int: i64,
    pub uint: u64,
    pub double: f64,
    pub ch: c_int,
    pub cstr: *const c_char,
}

/// One tagged formatting argument, `nkhost_format_arg` on the C side.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct FormatArg {
    pub kind: u32,
    pub value: FormatValue,
}

impl FormatArg {
    pub const fn int(value: i64) -> Self {
        Self {
            kind: FormatArgKind::Int as u32,
            value: FormatValue { int: value },
        }
    }

    pub const fn uint(value: u64) -> Self {
        Self {
            kind: FormatArgKind::Uint as u32,
            value: FormatValue { uint: value },
        }
    }

    pub const fn double(value: f64) -> Self {
        Self {
            kind: FormatArgKind::Double as u32,
            value: FormatValue { double: value },
        }
    }

    pub const fn ch(value: u8) -> Self {
        Self {
            kind: FormatArgKind::Char as u32,
            value: FormatValue { ch: value as c_int },
        }
    }

    /// A NUL-terminated string argument. The pointer must stay valid for the
    /// duration of the formatting call; null prints as `(null)`.
    pub const fn cstr(value: *const c_char) -> Self {
        Self {
            kind: FormatArgKind::CStr as u32,
            value: FormatValue { cstr: value },
        }
    }

    pub const fn kind(&self) -> Option<FormatArgKind> {
        FormatArgKind::from_raw(self.kind)
    }
}

impl core::fmt::Debug for FormatArg {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // SAFETY: every union field is plain data; the tag picks which one is meaningful.
        unsafe {
            match self.kind() {
                Some(FormatArgKind::Int) => f.debug_tuple("Int").field(&self.value.int).finish(),
                Some(FormatArgKind::Uint) => f.debug_tuple("Uint").field(&self.value.uint).finish(),
                Some(FormatArgKind::Double) => {
                    f.debug_tuple("Double").field(&self.value.double).finish()
                }
                Some(FormatArgKind::Char) => f.debug_tuple("Char").field(&self.value.ch).finish(),
                Some(FormatArgKind::CStr) => f.debug_tuple("CStr").field(&self.value.cstr).finish(),
                None => f.debug_tuple("Unknown").field(&self.kind).finish(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_raw_tag() {
        for kind in FormatArgKind::ALL {
            assert_eq!(FormatArgKind::from_raw(kind as u32), Some(kind));
        }
        assert_eq!(FormatArgKind::from_raw(5), None);
        assert_eq!(FormatArgKind::from_raw(u32::MAX), None);
    }

    #[test]
    fn constructors_set_matching_tag() {
        assert_eq!(FormatArg::int(-3).kind(), Some(FormatArgKind::Int));
        assert_eq!(FormatArg::uint(3).kind(), Some(FormatArgKind::Uint));
        assert_eq!(FormatArg::double(0.5).kind(), Some(FormatArgKind::Double));
        assert_eq!(FormatArg::ch(b'x').kind(), Some(FormatArgKind::Char));
        assert_eq!(
            FormatArg::cstr(core::ptr::null()).kind(),
            Some(FormatArgKind::CStr)
        );
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn c_layout_is_tag_plus_eight_byte_union() {
        assert_eq!(core::mem::size_of::<FormatValue>(), 8);
        assert_eq!(core::mem::size_of::<FormatArg>(), 16);
        assert_eq!(core::mem::align_of::<FormatArg>(), 8);
    }
}
