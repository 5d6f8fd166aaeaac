//! libc-backed view of the process descriptor table.

use std::ffi::c_int;
use std::mem::MaybeUninit;
use std::os::fd::RawFd;

use keysafe_core::{DescriptorTable, FileIdentity};

/// The real descriptor table of this process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessDescriptors;

impl DescriptorTable for ProcessDescriptors {
    fn soft_limit(&self) -> Option<u64> {
        let mut rlim = MaybeUninit::<libc::rlimit>::uninit();
        // SAFETY: `rlim` is a valid out-pointer for one `rlimit`.
        if unsafe { libc::getrlimit(libc::RLIMIT_NOFILE, rlim.as_mut_ptr()) } != 0 {
            return None;
        }
        // SAFETY: getrlimit succeeded and initialised `rlim`.
        let rlim = unsafe { rlim.assume_init() };
        Some(rlim.rlim_cur as u64)
    }

    fn identity(&self, fd: RawFd) -> Option<FileIdentity> {
        fstat_identity(fd)
    }

    fn close(&mut self, fd: RawFd) {
        // SAFETY: closing a descriptor number; the scrub only picks
        // descriptors that are open and alias the secret source.
        unsafe { libc::close(fd as c_int) };
    }
}

/// Device and inode of `fd`, or `None` if `fstat` fails.
#[must_use]
pub fn fstat_identity(fd: RawFd) -> Option<FileIdentity> {
    let mut st = MaybeUninit::<libc::stat>::uninit();
    // SAFETY: `st` is a valid out-pointer for one `stat`.
    if unsafe { libc::fstat(fd, st.as_mut_ptr()) } != 0 {
        return None;
    }
    // SAFETY: fstat succeeded and initialised `st`.
    let st = unsafe { st.assume_init() };
    Some(FileIdentity {
        dev: st.st_dev as u64,
        ino: st.st_ino as u64,
    })
}
