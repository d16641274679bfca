//! Input store
//!
//! [`InputMap`] is the case-insensitive mapping every source is merged into;
//! [`InputStore`] wraps it with the legacy typed accessors and the
//! freeze/thaw/shift protocol used for transactional snapshot and restore.

mod input_store;
mod map;

pub use input_store::{DecodeInput, GetInput, InputStore};
pub use map::{InputMap, merge_values};
