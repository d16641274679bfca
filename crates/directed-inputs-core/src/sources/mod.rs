//! Input sources
//!
//! The loader merges sources in a fixed precedence, later sources winning ties:
//! - explicit inputs (baseline)
//! - process environment, optionally filtered and stripped by a prefix
//! - standard input, parsed as one JSON object and capped at
//!   [`MAX_STDIN_BYTES`]
//!
//! Environment and stdin are reached through the [`EnvSource`] and
//! [`StdinSource`] traits so tests can run without touching the process.

mod env;
mod loader;
mod stdin;

pub use env::{EnvSource, MockEnv, StdEnv, filter_environment};
pub use loader::{InputOptions, InputOverrides, InputSource, OVERRIDE_STDIN_VAR, SourceLoader};
pub use stdin::{MAX_STDIN_BYTES, MockStdin, StdStdin, StdinSource, read_stdin_inputs};
