//! CLI commands
//!
//! Each command renders its output as a string so the router decides where it
//! goes.

pub mod decode;
pub mod dump;
pub mod get;
