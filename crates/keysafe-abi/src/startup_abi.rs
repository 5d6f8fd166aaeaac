//! Load-time entry point.
//!
//! glibc calls every `.init_array` function of a preloaded object with
//! `(argc, argv, envp)` before the target program's `main`. The loader
//! guarantees this happens once per process, single-threaded, so no
//! locking is done here. Every mutation below is attempted exactly once;
//! any error terminates the process.

use std::ffi::{c_char, c_int};

use keysafe_core::argv::replace;
use keysafe_core::conversion::parse_arg_index;
use keysafe_core::preload::{PRELOAD_ENV, rewrite_preload};
use keysafe_core::source::read_secret;
use keysafe_core::{KeysafeError, Phase, PreloadEdit, PreloadOutcome, Report};

use crate::MODULE;
use crate::diag;
use crate::env_abi::{self, EnvSlot, purge_controls, resolve_controls};
use crate::fd_abi::ProcessDescriptors;

type InitFn = unsafe extern "C" fn(c_int, *mut *mut c_char, *mut *mut c_char);

#[cfg(target_os = "linux")]
#[used]
#[unsafe(link_section = ".init_array")]
static KEYSAFE_INIT: InitFn = keysafe_init;

unsafe extern "C" fn keysafe_init(argc: c_int, argv: *mut *mut c_char, envp: *mut *mut c_char) {
    // SAFETY: glibc passes the process's own argc/argv/envp to init_array
    // functions.
    unsafe { bootstrap(argc, argv, envp) }
}

/// Run the shim, terminating the process on any failure.
///
/// # Safety
///
/// Same contract as [`run`].
pub unsafe fn bootstrap(argc: c_int, argv: *mut *mut c_char, envp: *mut *mut c_char) {
    // SAFETY: forwarded caller contract.
    if let Err(err) = unsafe { run(argc, argv, envp) } {
        trace!("{}", Phase::Terminated);
        diag::die(&err);
    }
}

/// Tracks the phase and traces each transition.
struct Progress {
    report: Report,
}

impl Progress {
    fn enter(&mut self, next: Phase) {
        debug_assert!(
            self.report.phase.can_advance_to(next),
            "illegal phase transition {} -> {next}",
            self.report.phase
        );
        self.report.phase = next;
        trace!("{next}");
    }
}

/// Resolve, substitute, scrub, rewrite `LD_PRELOAD` and purge.
///
/// Running it again in the same process is a no-op: the control variables
/// are gone after the first run.
///
/// # Safety
///
/// `argv` must point to `argc` writable string pointers followed by a null
/// pointer. `envp` must be null or the process environment vector (or a
/// vector whose strings are writable and outlive the call). No other thread
/// may touch the environment during the call.
pub unsafe fn run(
    argc: c_int,
    argv: *mut *mut c_char,
    envp: *mut *mut c_char,
) -> Result<Report, KeysafeError> {
    let mut progress = Progress {
        report: Report::default(),
    };
    let names = &MODULE.names;

    // SAFETY: caller contract on `envp`.
    let controls = unsafe { resolve_controls(envp, names) };
    progress.enter(Phase::Resolved);

    match controls.substitution() {
        Some((index, file)) => {
            // SAFETY: caller contract on `argv`/`argc`.
            let slot = unsafe { substitute(argc, argv, index, file) }?;
            progress.report.substituted = Some(slot.0);
            progress.report.scrubbed = slot.1;
            progress.enter(Phase::Substituted);
        }
        None => progress.enter(Phase::SubstitutionSkipped),
    }
    progress.enter(Phase::Scrubbed);

    progress.report.preload = match controls.preload.as_ref() {
        Some(own) => rewrite_preload_env(own.value())?,
        None => PreloadOutcome::NotRequested,
    };
    progress.enter(Phase::PreloadRewritten);

    progress.report.purged = purge_controls(controls, names);
    progress.enter(Phase::Purged);

    progress.enter(Phase::Done);
    Ok(progress.report)
}

/// Returns the replaced slot and the descriptor scrubbed while reading.
unsafe fn substitute(
    argc: c_int,
    argv: *mut *mut c_char,
    index: &EnvSlot<'_>,
    file: &EnvSlot<'_>,
) -> Result<(usize, Option<std::os::fd::RawFd>), KeysafeError> {
    let argc = usize::try_from(argc).unwrap_or(0);
    let slot = parse_arg_index(index.value(), argc)?;

    let retrieved = read_secret(file.value(), &mut ProcessDescriptors)?;
    let secret = retrieved.line.into_c_string()?;

    // SAFETY: caller guarantees `argc` readable and writable slots.
    let args = unsafe { std::slice::from_raw_parts_mut(argv, argc) };
    // The placeholder belongs to whoever built argv; abandon it.
    let _placeholder = replace(args, slot, secret.into_raw());
    Ok((slot, retrieved.scrubbed))
}

fn rewrite_preload_env(own: &[u8]) -> Result<PreloadOutcome, KeysafeError> {
    // SAFETY: the borrow ends before the environment is modified below.
    let Some(list) = (unsafe { env_abi::var_bytes(PRELOAD_ENV) }) else {
        return Ok(PreloadOutcome::Absent);
    };

    match rewrite_preload(list, own)? {
        PreloadEdit::Unchanged => Ok(PreloadOutcome::Unchanged),
        PreloadEdit::Remove => {
            env_abi::remove_var(PRELOAD_ENV).map_err(KeysafeError::PreloadRewriteError)?;
            Ok(PreloadOutcome::Removed)
        }
        PreloadEdit::Replace(mut value) => {
            // `rewrite_preload` reserved room for the terminator.
            value.push(0);
            let value = std::ffi::CString::from_vec_with_nul(value).map_err(|e| {
                KeysafeError::PreloadRewriteError(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    e,
                ))
            })?;
            env_abi::set_var(PRELOAD_ENV, &value).map_err(KeysafeError::PreloadRewriteError)?;
            Ok(PreloadOutcome::Rewritten)
        }
    }
}
