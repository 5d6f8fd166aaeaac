//! The secret source: open, read one line, scrub aliases, close.

use std::ffi::OsStr;
use std::fs::File;
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::descriptor::{DescriptorTable, FileIdentity, scrub_alias};
use crate::error::{KeysafeError, ReadFailure};
use crate::line::{SecretLine, read_line};

/// A secret read from its source, with the scrub result.
#[derive(Debug)]
pub struct Retrieved {
    pub line: SecretLine,
    /// Descriptor closed because it aliased the source, if any.
    pub scrubbed: Option<RawFd>,
}

/// Read the secret named by `path` and scrub one aliasing descriptor.
///
/// The scrub runs while the read handle is still open so the handle's own
/// descriptor is excluded by number and cannot be reused by the scan. The
/// handle is closed before returning. If the source identity cannot be
/// determined the scrub is skipped; the read itself still counts.
pub fn read_secret<T>(path: &[u8], table: &mut T) -> Result<Retrieved, KeysafeError>
where
    T: DescriptorTable + ?Sized,
{
    let mut file = File::open(Path::new(OsStr::from_bytes(path)))
        .map_err(|e| KeysafeError::read(path, ReadFailure::Open(e)))?;

    let line = read_line(&mut file).map_err(|cause| KeysafeError::read(path, cause))?;

    let scrubbed = file
        .metadata()
        .ok()
        .map(|meta| FileIdentity::of(&meta))
        .and_then(|identity| scrub_alias(table, identity, file.as_raw_fd()));

    drop(file);
    Ok(Retrieved { line, scrubbed })
}
