//! Directed Inputs Core Library
//!
//! This crate provides layered input resolution (explicit mappings, the
//! process environment and stdin), typed coercion, a base64/JSON/YAML decode
//! pipeline, and automatic injection of resolved inputs into method calls.

pub mod coerce;
pub mod context;
pub mod error;
pub mod inject;
pub mod sources;
pub mod store;
pub mod value;

// Re-export commonly used types
pub use coerce::{CoerceType, DecodeFlags, DecodeStage, coerce, decode_value};
pub use context::{DefaultValue, InputConfig, InputContext, Resolved};
pub use error::{InputError, InputResult};
pub use inject::{
    BoundArguments, CONFIG_KWARG, CallArgs, ClassDef, Decorate, Directed, DirectedClass,
    DirectedInputsMetadata, Method, MethodKind, Param, ParamKind, RUNTIME_LOGGING_KWARG,
    RUNTIME_SETTINGS_KWARG, Signature,
};
pub use sources::{
    EnvSource, InputOptions, InputOverrides, MockEnv, MockStdin, SourceLoader, StdEnv, StdStdin,
    StdinSource,
};
pub use store::{DecodeInput, GetInput, InputMap, InputStore};
pub use value::InputValue;
