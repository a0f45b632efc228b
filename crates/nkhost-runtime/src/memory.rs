//! Memory fill and copy primitives
//!
//! The safe functions work on slices; a requested length beyond a slice is a
//! contract violation and aborts. The exported symbols keep the C contract:
//! the caller vouches for the bounds and for non-overlap.

use core::ffi::{c_int, c_void};

use crate::assert::assert_invariant;

/// Set the first `len` bytes of `region` to `value` and return the region.
#[track_caller]
pub fn fill_memory(region: &mut [u8], value: u8, len: usize) -> &mut [u8] {
    assert_invariant(len <= region.len());
    region[..len].fill(value);
    region
}

/// Copy the first `len` bytes of `src` into `dest` and return `dest`.
#[track_caller]
pub fn copy_memory<'a>(dest: &'a mut [u8], src: &[u8], len: usize) -> &'a mut [u8] {
    assert_invariant(len <= dest.len() && len <= src.len());
    dest[..len].copy_from_slice(&src[..len]);
    dest
}

/// `NK_MEMSET` hook.
///
/// # Safety
///
/// `s` must be valid for writes of `n` bytes. `c` is converted to
/// `unsigned char` as in C.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn nkhost_memset(s: *mut c_void, c: c_int, n: usize) -> *mut c_void {
    if n != 0 {
        unsafe { core::ptr::write_bytes(s.cast::<u8>(), c as u8, n) };
    }
    s
}

/// `NK_MEMCPY` hook.
///
/// # Safety
///
/// `src` must be valid for reads and `dest` for writes of `n` bytes, and the
/// two ranges must not overlap.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn nkhost_memcpy(
    dest: *mut c_void,
    src: *const c_void,
    n: usize,
) -> *mut c_void {
    if n != 0 {
        unsafe { core::ptr::copy_nonoverlapping(src.cast::<u8>(), dest.cast::<u8>(), n) };
    }
    dest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_touches_only_requested_prefix() {
        let mut region = [0xAAu8; 16];
        let returned = fill_memory(&mut region, 0x5C, 10);
        assert_eq!(returned.len(), 16);
        assert!(region[..10].iter().all(|&b| b == 0x5C));
        assert!(region[10..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn fill_zero_length_is_noop() {
        let mut region = [7u8; 4];
        fill_memory(&mut region, 0, 0);
        assert_eq!(region, [7; 4]);
    }

    #[test]
    fn copy_matches_source_prefix() {
        let src: Vec<u8> = (0..32).collect();
        let mut dest = [0xFFu8; 40];
        copy_memory(&mut dest, &src, 32);
        assert_eq!(&dest[..32], &src[..]);
        assert!(dest[32..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn c_memset_truncates_value_to_byte() {
        let mut region = [0u8; 8];
        let base = region.as_mut_ptr().cast::<c_void>();
        let returned = unsafe { nkhost_memset(base, 0x1_41, 5) };
        assert_eq!(returned, base);
        assert_eq!(region, [0x41, 0x41, 0x41, 0x41, 0x41, 0, 0, 0]);
    }

    #[test]
    fn c_memcpy_returns_destination() {
        let src = *b"nuklear!";
        let mut dest = [0u8; 8];
        let base = dest.as_mut_ptr().cast::<c_void>();
        let returned = unsafe { nkhost_memcpy(base, src.as_ptr().cast(), 7) };
        assert_eq!(returned, base);
        assert_eq!(&dest, b"nuklear\0");
    }

    #[test]
    fn c_primitives_accept_null_with_zero_length() {
        let null = core::ptr::null_mut::<c_void>();
        assert!(unsafe { nkhost_memset(null, 0, 0) }.is_null());
        assert!(unsafe { nkhost_memcpy(null, core::ptr::null(), 0) }.is_null());
    }
}
