//! Core error type for directed inputs

use crate::coerce::{CoerceType, DecodeStage};
use thiserror::Error;

/// Result type alias for directed inputs operations
pub type InputResult<T> = Result<T, InputError>;

/// Main error type for directed inputs
///
/// Each variant carries the offending key (or parameter) and enough of the raw
/// value to diagnose the failure without re-running the lookup.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// A value could not be converted to the requested type
    #[error("Input {key} cannot be converted to {target}: {value:?} ({reason})")]
    Coercion {
        key: String,
        value: String,
        target: CoerceType,
        reason: String,
    },

    /// A base64/JSON/YAML decode stage failed
    #[error("Failed to decode input {key} at {stage} stage: {reason}")]
    Decode {
        key: String,
        stage: DecodeStage,
        payload: String,
        reason: String,
    },

    /// A required input resolved to nothing after applying defaults
    #[error("Required input {key} not passed from inputs")]
    RequiredInputMissing {
        key: String,
        available: Vec<String>,
    },

    /// Standard input held malformed JSON or exceeded the size cap
    #[error("Failed to read inputs from stdin: {message}")]
    StdinRead {
        message: String,
        payload: Option<String>,
    },

    /// An injection accessor was used on an instance that never finished
    /// directed construction
    #[error("directed inputs context not initialized on {type_name}")]
    ContextNotInitialized { type_name: String },

    /// Caller-supplied arguments do not fit the method signature
    #[error("Invalid arguments for {callable}: {message}")]
    InvalidArguments { callable: String, message: String },

    /// A bound argument could not be read as the type the method body expects
    #[error("Argument {name} cannot be read as {expected}: {message}")]
    ArgumentType {
        name: String,
        expected: String,
        message: String,
    },

    /// The per-instance override mapping was malformed
    #[error("Invalid input options: {message}")]
    InvalidOptions { message: String },
}
