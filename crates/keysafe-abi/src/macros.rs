//! Helper macros for the startup path.

/// Emit a phase trace line when the `trace` feature is enabled.
///
/// Expands to nothing otherwise. Arguments must never include secret
/// content or control variable values.
macro_rules! trace {
    ($($arg:tt)*) => {{
        #[cfg(feature = "trace")]
        $crate::diag::trace_line(format_args!($($arg)*));
    }};
}
