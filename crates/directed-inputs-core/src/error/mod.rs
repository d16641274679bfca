//! Error types for directed inputs
//!
//! Every failure the core can raise is a variant of [`InputError`]. Errors are
//! raised synchronously at the point of failure and never retried or swallowed:
//! the only tolerated "no value" case is an optional input that is simply
//! absent, which resolution reports as [`crate::Resolved::Missing`] instead of
//! an error.

mod constructors;
mod types;

pub use types::{InputError, InputResult};
