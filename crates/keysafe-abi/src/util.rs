//! Shared internal utilities for the raw process-state adapters.

use std::ffi::c_char;

/// Scan a C string with an optional hard bound.
///
/// Returns `(len, terminated)` where:
/// - `len` is the byte length before the first NUL or before the bound.
/// - `terminated` indicates whether a NUL byte was observed.
///
/// # Safety
///
/// `ptr` must be valid to read up to the discovered length (and bound when given).
pub unsafe fn scan_c_string(ptr: *const c_char, bound: Option<usize>) -> (usize, bool) {
    match bound {
        Some(limit) => {
            for i in 0..limit {
                if unsafe { *ptr.add(i) } == 0 {
                    return (i, true);
                }
            }
            (limit, false)
        }
        None => {
            let mut i = 0usize;
            while unsafe { *ptr.add(i) } != 0 {
                i += 1;
            }
            (i, true)
        }
    }
}

/// Borrow a NUL-terminated C string as bytes, without the terminator.
///
/// # Safety
///
/// `ptr` must be non-null and point to a NUL-terminated string that stays
/// valid and unmodified for `'a`.
pub unsafe fn c_bytes<'a>(ptr: *const c_char) -> &'a [u8] {
    // SAFETY: caller guarantees a readable, terminated string.
    let (len, _) = unsafe { scan_c_string(ptr, None) };
    // SAFETY: `len` bytes starting at `ptr` were just read.
    unsafe { std::slice::from_raw_parts(ptr.cast::<u8>(), len) }
}

/// Count entries of a null-terminated pointer vector such as `envp`.
///
/// # Safety
///
/// `base` must be null or point to a readable vector terminated by a null
/// pointer.
pub unsafe fn count_c_string_vector(base: *const *mut c_char) -> usize {
    if base.is_null() {
        return 0;
    }
    let mut n = 0usize;
    // SAFETY: caller guarantees the vector is null-terminated.
    while !unsafe { *base.add(n) }.is_null() {
        n += 1;
    }
    n
}
