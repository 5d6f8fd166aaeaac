//! Loader preload-list rewriting.
//!
//! `LD_PRELOAD` is a list of shared objects separated by spaces or colons
//! (see `handle_ld_preload()` in glibc's `elf/rtld.c`). The shim removes
//! its own entry so descendants of the target program do not load it.

use crate::error::KeysafeError;

/// The dynamic loader's preload-list variable.
pub const PRELOAD_ENV: &std::ffi::CStr = c"LD_PRELOAD";

/// Bytes the loader treats as entry separators.
pub const PRELOAD_SEPARATORS: &[u8] = b" :";

#[inline]
fn is_separator(b: u8) -> bool {
    PRELOAD_SEPARATORS.contains(&b)
}

/// What to do with the preload variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreloadEdit {
    /// Own entry not present; leave the variable alone.
    Unchanged,
    /// Own entry was the only one; unset the variable.
    Remove,
    /// Set the variable to this list.
    Replace(Vec<u8>),
}

/// Compute the preload list with the first exact `own` entry removed.
///
/// Entries are compared whole, so `xlibkeysafe.so` never matches
/// `libkeysafe.so`. Later duplicates of `own` are kept, mirroring the
/// loader's single left-to-right pass. The separators between the kept
/// prefix and the removed entry join the prefix to the remaining suffix;
/// separators directly after the removed entry are dropped. The result is
/// built in a scratch buffer with room for a trailing NUL, so committing
/// it needs no further allocation.
pub fn rewrite_preload(list: &[u8], own: &[u8]) -> Result<PreloadEdit, KeysafeError> {
    if own.is_empty() {
        return Ok(PreloadEdit::Unchanged);
    }

    let mut prefix_end = 0usize;
    let mut pos = 0usize;

    while pos < list.len() {
        if is_separator(list[pos]) {
            pos += 1;
            continue;
        }

        let entry_end = list[pos..]
            .iter()
            .position(|&b| is_separator(b))
            .map_or(list.len(), |n| pos + n);

        if &list[pos..entry_end] != own {
            prefix_end = entry_end;
            pos = entry_end;
            continue;
        }

        let suffix_start = list[entry_end..]
            .iter()
            .position(|&b| !is_separator(b))
            .map_or(list.len(), |n| entry_end + n);

        let prefix = &list[..prefix_end];
        let suffix = &list[suffix_start..];
        let joint = if prefix.is_empty() || suffix.is_empty() {
            &[][..]
        } else {
            &list[prefix_end..pos]
        };

        let len = prefix.len() + joint.len() + suffix.len();
        if len == 0 {
            return Ok(PreloadEdit::Remove);
        }

        let mut replacement = Vec::new();
        replacement
            .try_reserve_exact(len + 1)
            .map_err(|_| KeysafeError::AllocationError {
                context: "LD_PRELOAD replacement",
                requested: len + 1,
            })?;
        replacement.extend_from_slice(prefix);
        replacement.extend_from_slice(joint);
        replacement.extend_from_slice(suffix);
        return Ok(PreloadEdit::Replace(replacement));
    }

    Ok(PreloadEdit::Unchanged)
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWN: &[u8] = b"libkeysafe.so";

    fn replaced(list: &str) -> String {
        match rewrite_preload(list.as_bytes(), OWN).unwrap() {
            PreloadEdit::Replace(v) => String::from_utf8(v).unwrap(),
            other => panic!("expected Replace for {list:?}, got {other:?}"),
        }
    }

    #[test]
    fn sole_entry_removes_variable() {
        assert_eq!(
            rewrite_preload(b"libkeysafe.so", OWN).unwrap(),
            PreloadEdit::Remove
        );
    }

    #[test]
    fn sole_entry_with_stray_separators_removes_variable() {
        assert_eq!(
            rewrite_preload(b": libkeysafe.so :", OWN).unwrap(),
            PreloadEdit::Remove
        );
    }

    #[test]
    fn middle_entry_keeps_one_separator() {
        assert_eq!(replaced("a.so:libkeysafe.so:b.so"), "a.so:b.so");
        assert_eq!(replaced("a.so libkeysafe.so b.so"), "a.so b.so");
    }

    #[test]
    fn trailing_entry_drops_separator() {
        assert_eq!(replaced("a.so libkeysafe.so"), "a.so");
        assert_eq!(replaced("a.so:libkeysafe.so:"), "a.so");
    }

    #[test]
    fn leading_entry_drops_separator() {
        assert_eq!(replaced("libkeysafe.so:b.so"), "b.so");
        assert_eq!(replaced("libkeysafe.so  b.so c.so"), "b.so c.so");
    }

    #[test]
    fn original_delimiters_are_preserved() {
        assert_eq!(replaced("a.so: :libkeysafe.so::b.so c.so"), "a.so: :b.so c.so");
    }

    #[test]
    fn only_first_duplicate_removed() {
        assert_eq!(
            replaced("libkeysafe.so:a.so:libkeysafe.so"),
            "a.so:libkeysafe.so"
        );
    }

    #[test]
    fn substring_entries_do_not_match() {
        for list in ["xlibkeysafe.so", "libkeysafe.so.1", "/opt/libkeysafe.so", "libkeysafe"] {
            assert_eq!(
                rewrite_preload(list.as_bytes(), OWN).unwrap(),
                PreloadEdit::Unchanged,
                "{list}"
            );
        }
    }

    #[test]
    fn absent_entry_is_unchanged() {
        assert_eq!(
            rewrite_preload(b"a.so:b.so", OWN).unwrap(),
            PreloadEdit::Unchanged
        );
        assert_eq!(rewrite_preload(b"", OWN).unwrap(), PreloadEdit::Unchanged);
    }

    #[test]
    fn empty_self_name_never_matches() {
        assert_eq!(rewrite_preload(b"a.so::b.so", b"").unwrap(), PreloadEdit::Unchanged);
    }

    #[test]
    fn absolute_paths_match_exactly() {
        let own = b"/usr/lib/keysafe/libkeysafe.so";
        let edit = rewrite_preload(b"/usr/lib/keysafe/libkeysafe.so /lib/x.so", own).unwrap();
        assert_eq!(edit, PreloadEdit::Replace(b"/lib/x.so".to_vec()));
    }

    #[test]
    fn replacement_has_room_for_terminator() {
        match rewrite_preload(b"a.so:libkeysafe.so", OWN).unwrap() {
            PreloadEdit::Replace(v) => assert!(v.capacity() > v.len()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
