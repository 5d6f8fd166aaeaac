//! # keysafe
//!
//! Preloaded shared object that swaps a secret into the process's own
//! `argv` before the target program's `main` runs.
//!
//! This crate produces a `cdylib` (`libkeysafe.so`). It exports no symbols;
//! the dynamic loader reaches it through an `.init_array` entry that glibc
//! calls with `(argc, argv, envp)`. The decision logic lives in
//! `keysafe-core`; this crate owns the raw pointer work.
//!
//! # Control variables
//!
//! ```text
//! _KEYSAFE_ARGINDEX=<n>      argv slot to replace, 0 < n < argc
//! _KEYSAFE_ARGFILE=<path>    file whose first line is the secret
//! _KEYSAFE_PRELOAD=<entry>   this library's exact LD_PRELOAD entry
//! ```
//!
//! `KEYSAFE` is the default module name; set `KEYSAFE_MODULE_NAME` at build
//! time to produce a differently scoped shim (for example `KEYFOB`).
//!
//! # Flow
//!
//! ```text
//! resolve controls -> [parse index -> read line -> scrub alias -> replace slot]
//!                  -> rewrite LD_PRELOAD -> purge controls
//! ```
//!
//! Any failure writes `<name>: <message>` to stderr and calls `_exit(1)`.

use std::ffi::CStr;

use keysafe_core::{ControlNames, Module};

#[macro_use]
mod macros;

pub mod diag;
pub mod env_abi;
pub mod fd_abi;
pub mod startup_abi;
pub mod util;

macro_rules! control_name {
    ($suffix:literal) => {
        match CStr::from_bytes_with_nul(
            concat!("_", env!("KEYSAFE_MODULE_NAME"), $suffix, "\0").as_bytes(),
        ) {
            Ok(name) => name,
            Err(_) => panic!("control variable name must not contain NUL"),
        }
    };
}

/// Identity of this build of the shim.
pub const MODULE: Module = Module {
    label: env!("KEYSAFE_MODULE_LABEL"),
    names: ControlNames {
        index: control_name!("_ARGINDEX"),
        file: control_name!("_ARGFILE"),
        preload: control_name!("_PRELOAD"),
    },
};

pub use startup_abi::{bootstrap, run};
