//! Directed Inputs
//!
//! Layered input resolution and automatic argument injection.
//!
//! Inputs are merged from an explicit mapping, the process environment
//! (optionally filtered by a prefix) and a JSON object on stdin, in that order
//! of increasing precedence. They can be read directly with typed coercion
//! and base64/JSON/YAML decoding, or injected into the omitted arguments of
//! methods on a decorated class.
//!
//! ```
//! use directed_inputs::{InputConfig, InputContext, InputOptions, InputValue, Resolved, inputs};
//!
//! let mut context = InputContext::new(
//!     InputOptions::new()
//!         .from_environment(false)
//!         .with_inputs(inputs! { "PORT" => "8080" }),
//! );
//! let port = context.resolve(&InputConfig::new("port").integer()).unwrap();
//! assert_eq!(port, Resolved::Value(InputValue::Integer(8080)));
//! ```

pub use directed_inputs_core::*;
