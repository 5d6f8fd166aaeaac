//! # keysafe-core
//!
//! Safe decision logic for the keysafe argument-substitution shim.
//!
//! The shim is a preloaded shared object that runs before the target
//! program's `main`, reads a secret from a file named in the environment,
//! and swaps it into one `argv` slot. Everything that can be expressed
//! without touching raw process state lives here; the pointer work
//! (argv storage, `environ`, the descriptor table) lives in `keysafe-abi`.
//!
//! ```text
//! environ -> resolve controls -> parse index -> read line -> scrub aliases
//!         -> replace argv slot -> rewrite LD_PRELOAD -> purge controls
//! ```
//!
//! No `unsafe` code is permitted at the crate level.

#![deny(unsafe_code)]

pub mod argv;
pub mod config;
pub mod conversion;
pub mod descriptor;
pub mod env;
pub mod error;
pub mod line;
pub mod phase;
pub mod preload;
pub mod source;

pub use config::{ControlNames, Module};
pub use descriptor::{DescriptorTable, FileIdentity};
pub use env::{ControlKind, ControlSet};
pub use error::{KeysafeError, ReadFailure};
pub use line::SecretLine;
pub use phase::{Phase, PreloadOutcome, Report};
pub use preload::PreloadEdit;
