//! Raw environment access: control-variable slots, getenv/setenv/unsetenv.
//!
//! Control values are not copied out of the environment. Each resolved
//! variable is an [`EnvSlot`] pointing at the value bytes inside its
//! `NAME=VALUE` string; purging consumes the slot, zeroes the value in
//! place and then unsets the name.

use std::ffi::{CStr, c_char};
use std::io;
use std::marker::PhantomData;
use std::ptr::NonNull;

use keysafe_core::env::classify;
use keysafe_core::{ControlNames, ControlSet};

use crate::util::{c_bytes, count_c_string_vector};

unsafe extern "C" {
    static mut environ: *mut *mut c_char;
}

/// Current value of the process `environ` pointer.
#[must_use]
pub fn environ_ptr() -> *mut *mut c_char {
    // SAFETY: reading the pointer value; the table is not dereferenced here.
    unsafe { std::ptr::addr_of!(environ).read() }
}

/// A control variable's value, still living in environment storage.
pub struct EnvSlot<'env> {
    value: NonNull<u8>,
    len: usize,
    _env: PhantomData<&'env mut [u8]>,
}

impl EnvSlot<'_> {
    #[must_use]
    pub fn value(&self) -> &[u8] {
        // SAFETY: `value..value+len` lies inside the entry string captured at
        // resolve time, which the environment keeps alive for `'env`.
        unsafe { std::slice::from_raw_parts(self.value.as_ptr(), self.len) }
    }

    /// Zero the value in place, then remove `name` from the environment.
    ///
    /// Consumes the slot so no borrowed view of the value survives the purge.
    pub fn defuse(self, name: &CStr) -> io::Result<()> {
        // SAFETY: the value bytes are writable environment storage and no
        // shared borrow of them outlives `self`.
        unsafe {
            let bytes = std::slice::from_raw_parts_mut(self.value.as_ptr(), self.len);
            bytes.fill(0);
            std::hint::black_box(bytes);
        }
        remove_var(name)
    }
}

/// Resolve control variables by walking `envp`.
///
/// # Safety
///
/// `envp` must be null or a null-terminated vector of writable, NUL-terminated
/// `NAME=VALUE` strings that stay valid for `'env`.
pub unsafe fn resolve_controls<'env>(
    envp: *mut *mut c_char,
    names: &ControlNames,
) -> ControlSet<EnvSlot<'env>> {
    let mut set = ControlSet::default();
    // SAFETY: caller guarantees `envp` is null-terminated or null.
    let count = unsafe { count_c_string_vector(envp) };

    for i in 0..count {
        // SAFETY: `i < count`, so the slot holds a non-null entry pointer.
        let entry_ptr = unsafe { *envp.add(i) };
        // SAFETY: caller guarantees each entry is NUL-terminated.
        let entry = unsafe { c_bytes(entry_ptr) };
        let Some(m) = classify(entry, names) else {
            continue;
        };
        // SAFETY: `m.offset <= entry.len()` so the pointer stays inside the
        // entry (at worst on its terminator) and is non-null.
        let value = unsafe { NonNull::new_unchecked(entry_ptr.cast::<u8>().add(m.offset)) };
        set.insert(
            m.kind,
            EnvSlot {
                value,
                len: m.value.len(),
                _env: PhantomData,
            },
        );
    }
    set
}

/// Borrow the current value of `name`.
///
/// # Safety
///
/// The returned slice is only valid until the environment is next modified.
pub unsafe fn var_bytes<'a>(name: &CStr) -> Option<&'a [u8]> {
    // SAFETY: `name` is a valid C string.
    let p = unsafe { libc::getenv(name.as_ptr()) };
    if p.is_null() {
        return None;
    }
    // SAFETY: getenv returns a NUL-terminated value string.
    Some(unsafe { c_bytes(p) })
}

pub fn set_var(name: &CStr, value: &CStr) -> io::Result<()> {
    // SAFETY: both arguments are valid C strings; the shim is single-threaded
    // at load time.
    if unsafe { libc::setenv(name.as_ptr(), value.as_ptr(), 1) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

pub fn remove_var(name: &CStr) -> io::Result<()> {
    // SAFETY: `name` is a valid C string; see `set_var`.
    if unsafe { libc::unsetenv(name.as_ptr()) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Purge every resolved control variable. Returns how many were purged.
pub fn purge_controls(controls: ControlSet<EnvSlot<'_>>, names: &ControlNames) -> usize {
    let mut purged = 0;
    for (kind, slot) in controls.drain() {
        // Control names are validated at build time, so unsetenv cannot
        // reject them.
        let _ = slot.defuse(names.name(kind));
        purged += 1;
    }
    purged
}
