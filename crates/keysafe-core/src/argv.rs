//! Argument-vector slot replacement.

/// Store `value` into `argv[index]` and return the displaced placeholder.
///
/// The placeholder is handed back rather than dropped: for a real argv the
/// storage belongs to whoever built the vector and must be abandoned, not
/// freed. `index` must already have been validated against `argv.len()`.
pub fn replace<T>(argv: &mut [T], index: usize, value: T) -> T {
    std::mem::replace(&mut argv[index], value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::parse_arg_index;

    #[test]
    fn replaces_only_target_slot() {
        let mut argv = vec!["prog", "--password", "PLACEHOLDER", "--verbose"];
        let index = parse_arg_index(b"2", argv.len()).unwrap();
        let old = replace(&mut argv, index, "hunter2");
        assert_eq!(old, "PLACEHOLDER");
        assert_eq!(argv, vec!["prog", "--password", "hunter2", "--verbose"]);
    }

    #[test]
    fn last_slot_is_eligible() {
        let mut argv = vec!["prog", "x"];
        let index = parse_arg_index(b"1", argv.len()).unwrap();
        replace(&mut argv, index, "y");
        assert_eq!(argv, vec!["prog", "y"]);
    }
}
