//! Per-instance resolution context
//!
//! An [`InputContext`] owns the construction options and lazily materializes
//! an [`InputStore`](crate::store::InputStore) from them on first use. Each
//! injectable parameter is described by an [`InputConfig`]; resolving it
//! yields either a value or [`Resolved::Missing`], which tells the injection
//! engine to leave the callable's own default alone.

mod config;
mod resolver;

pub use config::{DefaultValue, InputConfig};
pub use resolver::{InputContext, Resolved};
