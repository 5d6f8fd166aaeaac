//! Single-line secret reader.

use std::ffi::CString;
use std::fmt;
use std::io::{self, Read};

use crate::error::{KeysafeError, ReadFailure};

/// Line delimiter stripped from the end of the secret.
pub const LINE_DELIMITER: u8 = b'\n';

const READ_CHUNK: usize = 256;

/// The first line of the secret source, delimiter removed.
///
/// Contains neither the line delimiter nor a NUL byte. The buffer is zeroed
/// on drop unless ownership was handed off with [`SecretLine::into_c_string`].
pub struct SecretLine {
    bytes: Vec<u8>,
}

impl SecretLine {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hand the secret off as a NUL-terminated string.
    pub fn into_c_string(mut self) -> Result<CString, KeysafeError> {
        let mut bytes = std::mem::take(&mut self.bytes);
        if bytes.try_reserve_exact(1).is_err() {
            wipe(&mut bytes);
            return Err(KeysafeError::AllocationError {
                context: "argument string",
                requested: bytes.len() + 1,
            });
        }
        bytes.push(0);
        // Interior NUL bytes are rejected by `read_line`.
        CString::from_vec_with_nul(bytes).map_err(|err| {
            let mut bytes = err.into_bytes();
            wipe(&mut bytes);
            KeysafeError::AllocationError {
                context: "argument string",
                requested: bytes.len(),
            }
        })
    }
}

impl Drop for SecretLine {
    fn drop(&mut self) {
        wipe(&mut self.bytes);
    }
}

impl fmt::Debug for SecretLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretLine")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

fn wipe(buf: &mut [u8]) {
    buf.fill(0);
    std::hint::black_box(buf);
}

/// Read one line from `reader`.
///
/// Reading stops at the first delimiter; anything after it is discarded.
/// A final line without a delimiter is accepted. Fails with
/// [`ReadFailure::Empty`] if the very first read hits end of file.
pub fn read_line<R: Read + ?Sized>(reader: &mut R) -> Result<SecretLine, ReadFailure> {
    let mut line = SecretLine { bytes: Vec::new() };
    let mut chunk = [0u8; READ_CHUNK];
    let mut seen = 0usize;

    let result = loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => break Err(ReadFailure::Read(e)),
        };
        seen += n;

        let (data, done) = match chunk[..n].iter().position(|&b| b == LINE_DELIMITER) {
            Some(pos) => (&chunk[..pos], true),
            None => (&chunk[..n], false),
        };
        if line.bytes.try_reserve(data.len()).is_err() {
            break Err(ReadFailure::OutOfMemory(line.bytes.len()));
        }
        line.bytes.extend_from_slice(data);
        if done {
            break Ok(());
        }
    };
    wipe(&mut chunk);
    result?;

    if seen == 0 {
        return Err(ReadFailure::Empty);
    }
    if line.bytes.contains(&0) {
        return Err(ReadFailure::InteriorNul);
    }
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Yields its data in fixed-size pieces, with an interruption first.
    struct Trickle<'a> {
        data: &'a [u8],
        step: usize,
        interrupted: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            let n = self.step.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::from_raw_os_error(5))
        }
    }

    #[test]
    fn strips_trailing_delimiter() {
        let line = read_line(&mut Cursor::new(b"hunter2\n")).unwrap();
        assert_eq!(line.as_bytes(), b"hunter2");
    }

    #[test]
    fn accepts_missing_delimiter() {
        let line = read_line(&mut Cursor::new(b"hunter2")).unwrap();
        assert_eq!(line.as_bytes(), b"hunter2");
    }

    #[test]
    fn keeps_only_first_line() {
        let line = read_line(&mut Cursor::new(b"first\nsecond\n")).unwrap();
        assert_eq!(line.as_bytes(), b"first");
    }

    #[test]
    fn blank_line_is_an_empty_secret() {
        let line = read_line(&mut Cursor::new(b"\n")).unwrap();
        assert!(line.is_empty());
    }

    #[test]
    fn empty_source_fails() {
        assert!(matches!(
            read_line(&mut Cursor::new(b"")),
            Err(ReadFailure::Empty)
        ));
    }

    #[test]
    fn read_error_propagates() {
        assert!(matches!(read_line(&mut Broken), Err(ReadFailure::Read(_))));
    }

    #[test]
    fn interior_nul_fails() {
        assert!(matches!(
            read_line(&mut Cursor::new(b"hun\0ter2\n")),
            Err(ReadFailure::InteriorNul)
        ));
    }

    #[test]
    fn long_line_across_reads() {
        let mut data = vec![b'k'; READ_CHUNK * 3 + 17];
        data.push(LINE_DELIMITER);
        data.extend_from_slice(b"tail");
        let mut reader = Trickle {
            data: &data,
            step: 100,
            interrupted: false,
        };
        let line = read_line(&mut reader).unwrap();
        assert_eq!(line.len(), READ_CHUNK * 3 + 17);
        assert!(line.as_bytes().iter().all(|&b| b == b'k'));
    }

    #[test]
    fn into_c_string_terminates() {
        let line = read_line(&mut Cursor::new(b"s3cret\n")).unwrap();
        let c = line.into_c_string().unwrap();
        assert_eq!(c.as_bytes(), b"s3cret");
        assert_eq!(c.as_bytes_with_nul(), b"s3cret\0");
    }

    #[test]
    fn debug_redacts_content() {
        let line = read_line(&mut Cursor::new(b"hunter2")).unwrap();
        let shown = format!("{line:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("len: 7"));
    }
}
