//! Build-time identity of the shim.
//!
//! The module identifier (for example `KEYSAFE` or `KEYFOB`) is chosen when
//! the ABI crate is compiled. It scopes the three control variable names
//! and prefixes every diagnostic line.

use std::ffi::CStr;

use crate::env::ControlKind;

/// Suffix of the control variable carrying the argv index.
pub const ARGINDEX_SUFFIX: &str = "_ARGINDEX";
/// Suffix of the control variable carrying the secret file path.
pub const ARGFILE_SUFFIX: &str = "_ARGFILE";
/// Suffix of the control variable naming this shim's own preload entry.
pub const PRELOAD_SUFFIX: &str = "_PRELOAD";

/// Case-exact names of the three control variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlNames {
    pub index: &'static CStr,
    pub file: &'static CStr,
    pub preload: &'static CStr,
}

impl ControlNames {
    #[must_use]
    pub const fn name(&self, kind: ControlKind) -> &'static CStr {
        match kind {
            ControlKind::Index => self.index,
            ControlKind::File => self.file,
            ControlKind::Preload => self.preload,
        }
    }
}

/// Diagnostic label plus control names for one build of the shim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Module {
    /// Lowercase module name, used as the stderr prefix.
    pub label: &'static str,
    pub names: ControlNames,
}

/// Returns `true` if `name` is usable as a module identifier.
///
/// The identifier is spliced into environment variable names, so it is
/// restricted to upper-case ASCII letters, digits and underscores.
#[must_use]
pub fn valid_module_name(name: &[u8]) -> bool {
    !name.is_empty()
        && name
            .iter()
            .all(|&b| b.is_ascii_uppercase() || b.is_ascii_digit() || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: ControlNames = ControlNames {
        index: c"_KEYSAFE_ARGINDEX",
        file: c"_KEYSAFE_ARGFILE",
        preload: c"_KEYSAFE_PRELOAD",
    };

    #[test]
    fn name_lookup_by_kind() {
        assert_eq!(NAMES.name(ControlKind::Index), c"_KEYSAFE_ARGINDEX");
        assert_eq!(NAMES.name(ControlKind::File), c"_KEYSAFE_ARGFILE");
        assert_eq!(NAMES.name(ControlKind::Preload), c"_KEYSAFE_PRELOAD");
    }

    #[test]
    fn suffixes_match_names() {
        for kind in ControlKind::ALL {
            let name = NAMES.name(kind).to_str().unwrap();
            let suffix = match kind {
                ControlKind::Index => ARGINDEX_SUFFIX,
                ControlKind::File => ARGFILE_SUFFIX,
                ControlKind::Preload => PRELOAD_SUFFIX,
            };
            assert!(name.ends_with(suffix));
        }
    }

    #[test]
    fn module_names() {
        assert!(valid_module_name(b"KEYSAFE"));
        assert!(valid_module_name(b"KEYFOB"));
        assert!(valid_module_name(b"MY_SHIM2"));
        assert!(!valid_module_name(b""));
        assert!(!valid_module_name(b"keysafe"));
        assert!(!valid_module_name(b"KEY=SAFE"));
        assert!(!valid_module_name(b"KEY SAFE"));
    }
}
