//! Constructor and inspection methods for InputError

use super::types::InputError;
use crate::coerce::{CoerceType, DecodeStage};

/// Longest payload excerpt kept on decode and stdin errors
const PAYLOAD_PREVIEW_CHARS: usize = 200;

fn preview(payload: &str) -> String {
    if payload.chars().count() <= PAYLOAD_PREVIEW_CHARS {
        return payload.to_string();
    }
    let mut cut: String = payload.chars().take(PAYLOAD_PREVIEW_CHARS).collect();
    cut.push('…');
    cut
}

impl InputError {
    /// Create a coercion error
    pub fn coercion(
        key: impl Into<String>,
        value: impl Into<String>,
        target: CoerceType,
        reason: impl Into<String>,
    ) -> Self {
        Self::Coercion {
            key: key.into(),
            value: value.into(),
            target,
            reason: reason.into(),
        }
    }

    /// Create a decode error, keeping a bounded excerpt of the payload
    pub fn decode(
        key: impl Into<String>,
        stage: DecodeStage,
        payload: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Decode {
            key: key.into(),
            stage,
            payload: preview(payload),
            reason: reason.into(),
        }
    }

    /// Create a missing required input error
    pub fn required_missing(key: impl Into<String>, available: Vec<String>) -> Self {
        Self::RequiredInputMissing {
            key: key.into(),
            available,
        }
    }

    /// Create a stdin read error
    pub fn stdin(message: impl Into<String>) -> Self {
        Self::StdinRead {
            message: message.into(),
            payload: None,
        }
    }

    /// Create a stdin read error that carries the offending payload
    pub fn stdin_with_payload(message: impl Into<String>, payload: &str) -> Self {
        Self::StdinRead {
            message: message.into(),
            payload: Some(preview(payload)),
        }
    }

    /// Create a context-not-initialized error
    pub fn context_not_initialized(type_name: impl Into<String>) -> Self {
        Self::ContextNotInitialized {
            type_name: type_name.into(),
        }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(callable: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            callable: callable.into(),
            message: message.into(),
        }
    }

    /// Create an argument type error
    pub fn argument_type(
        name: impl Into<String>,
        expected: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ArgumentType {
            name: name.into(),
            expected: expected.into(),
            message: message.into(),
        }
    }

    /// Create an invalid options error
    pub fn invalid_options(message: impl Into<String>) -> Self {
        Self::InvalidOptions {
            message: message.into(),
        }
    }

    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Coercion { .. } => "INPUT_COERCION",
            Self::Decode { .. } => "INPUT_DECODE",
            Self::RequiredInputMissing { .. } => "INPUT_REQUIRED_MISSING",
            Self::StdinRead { .. } => "INPUT_STDIN_READ",
            Self::ContextNotInitialized { .. } => "INPUT_CONTEXT_NOT_INITIALIZED",
            Self::InvalidArguments { .. } => "INPUT_INVALID_ARGUMENTS",
            Self::ArgumentType { .. } => "INPUT_ARGUMENT_TYPE",
            Self::InvalidOptions { .. } => "INPUT_INVALID_OPTIONS",
        }
    }

    /// Human-readable message, same as the display form
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The input key or parameter name the error is about, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Coercion { key, .. }
            | Self::Decode { key, .. }
            | Self::RequiredInputMissing { key, .. } => Some(key),
            Self::ArgumentType { name, .. } => Some(name),
            Self::StdinRead { .. }
            | Self::ContextNotInitialized { .. }
            | Self::InvalidArguments { .. }
            | Self::InvalidOptions { .. } => None,
        }
    }

    /// Optional extra detail beyond the display message
    pub fn context(&self) -> Option<String> {
        match self {
            Self::Decode { payload, .. } => Some(format!("payload: {}", payload)),
            Self::RequiredInputMissing { available, .. } if !available.is_empty() => {
                Some(format!("available inputs: {}", available.join(", ")))
            }
            Self::StdinRead {
                payload: Some(payload),
                ..
            } => Some(format!("payload: {}", payload)),
            _ => None,
        }
    }

    /// Whether the error points at a bug in the calling code rather than at
    /// bad input data
    pub fn is_programming_error(&self) -> bool {
        matches!(
            self,
            Self::ContextNotInitialized { .. } | Self::InvalidArguments { .. }
        )
    }
}
