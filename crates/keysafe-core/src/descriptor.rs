//! Descriptor alias scrubbing.
//!
//! There is no portable way to list open descriptors, so the scrub walks
//! every number below the soft `RLIMIT_NOFILE` limit. The limit is read at
//! scrub time since the process may have changed it.

use std::fs::Metadata;
use std::os::fd::RawFd;
use std::os::unix::fs::MetadataExt;

/// Identity of an open file: device plus inode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub dev: u64,
    pub ino: u64,
}

impl FileIdentity {
    #[must_use]
    pub fn of(meta: &Metadata) -> Self {
        Self {
            dev: meta.dev(),
            ino: meta.ino(),
        }
    }
}

/// The process-wide open descriptor table.
pub trait DescriptorTable {
    /// Current soft limit on open files, or `None` if it cannot be read.
    fn soft_limit(&self) -> Option<u64>;

    /// Identity of the file behind `fd`, or `None` if `fd` is not open or
    /// cannot be inspected.
    fn identity(&self, fd: RawFd) -> Option<FileIdentity>;

    fn close(&mut self, fd: RawFd);
}

/// Highest descriptor number the scan will consider.
const MAX_SCAN_FD: u64 = RawFd::MAX as u64;

/// Close the first descriptor other than `exclude` that aliases `target`.
///
/// Only one alias is expected, so the scan stops at the first match. That
/// also keeps the number of probes visible under `strace(1)` low. Returns
/// the descriptor that was closed.
pub fn scrub_alias<T>(table: &mut T, target: FileIdentity, exclude: RawFd) -> Option<RawFd>
where
    T: DescriptorTable + ?Sized,
{
    let limit = table.soft_limit()?.min(MAX_SCAN_FD);

    // `limit` is clamped to `RawFd::MAX` above.
    let found = (0..limit as RawFd)
        .filter(|&fd| fd != exclude)
        .find(|&fd| table.identity(fd) == Some(target))?;

    table.close(found);
    Some(found)
}
