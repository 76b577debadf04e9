//! relaydash - relay provider dashboard core
//!
//! Provider family registry, upstream token list normalization, and a site
//! directory, with a CLI for inspecting each of them.

// Note: deny (not forbid) to allow #[allow(unsafe_code)] in test helpers for env var manipulation
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod core;
pub mod error;
pub mod render;
pub mod storage;
pub mod util;

pub use error::{ExitCode, RelayError, Result};
