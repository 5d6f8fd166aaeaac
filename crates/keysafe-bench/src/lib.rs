//! Input generators shared by the keysafe benchmarks.

/// A preload list of `entries` libraries with `own` inserted at `position`.
#[must_use]
pub fn preload_list(entries: usize, own: &str, position: usize) -> String {
    let mut parts: Vec<String> = (0..entries).map(|i| format!("/usr/lib/libbench{i}.so")).collect();
    parts.insert(position.min(parts.len()), own.to_owned());
    parts.join(":")
}

/// A secret file image of `len` bytes followed by a newline and a tail.
#[must_use]
pub fn secret_image(len: usize) -> Vec<u8> {
    let mut v: Vec<u8> = (0..len).map(|i| b'a' + (i % 26) as u8).collect();
    v.extend_from_slice(b"\nignored-second-line\n");
    v
}
