//! Stderr diagnostics.
//!
//! Writes go straight to `STDERR_FILENO` with `write(2)`: at `.init_array`
//! time the host program's own stdio is not set up yet, and the fatal
//! path must not run atexit handlers or flush foreign buffers.

use std::fmt;

use keysafe_core::KeysafeError;

use crate::MODULE;

/// Format one diagnostic line: `<label>: <message>\n`.
#[must_use]
pub fn diagnostic_line(label: &str, message: &dyn fmt::Display) -> String {
    format!("{label}: {message}\n")
}

fn write_stderr(bytes: &[u8]) {
    let mut rest = bytes;
    while !rest.is_empty() {
        // SAFETY: `rest` is a valid readable buffer of `rest.len()` bytes.
        let rc = unsafe { libc::write(libc::STDERR_FILENO, rest.as_ptr().cast(), rest.len()) };
        if rc < 0 {
            if std::io::Error::last_os_error().kind() == std::io::ErrorKind::Interrupted {
                continue;
            }
            return;
        }
        if rc == 0 {
            return;
        }
        rest = &rest[rc as usize..];
    }
}

/// Report `err` and terminate the process with status 1.
pub fn die(err: &KeysafeError) -> ! {
    write_stderr(diagnostic_line(MODULE.label, err).as_bytes());
    // SAFETY: `_exit` never returns and touches no Rust state.
    unsafe { libc::_exit(1) }
}

#[cfg(feature = "trace")]
pub fn trace_line(args: fmt::Arguments<'_>) {
    write_stderr(diagnostic_line(MODULE.label, &format_args!("trace: {args}")).as_bytes());
}
