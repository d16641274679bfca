//! Standard input source

use crate::error::{InputError, InputResult};
use crate::store::InputMap;
use std::fmt;
use std::io::Read;

/// Largest stdin payload accepted, in bytes
pub const MAX_STDIN_BYTES: usize = 1024 * 1024;

/// Abstracts over where "standard input" is read from.
pub trait StdinSource: fmt::Debug + Send + Sync {
    fn open(&self) -> Box<dyn Read + '_>;
}

/// The real process stdin
#[derive(Debug, Clone, Copy, Default)]
pub struct StdStdin;

impl StdinSource for StdStdin {
    fn open(&self) -> Box<dyn Read + '_> {
        Box::new(std::io::stdin())
    }
}

/// In-memory stdin
#[derive(Debug, Clone, Default)]
pub struct MockStdin {
    bytes: Vec<u8>,
}

impl MockStdin {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl StdinSource for MockStdin {
    fn open(&self) -> Box<dyn Read + '_> {
        Box::new(self.bytes.as_slice())
    }
}

/// Read one JSON object from `source`.
///
/// Blank input yields an empty map. Payloads over [`MAX_STDIN_BYTES`],
/// non-UTF-8 payloads, malformed JSON and JSON that is not an object are all
/// errors.
pub fn read_stdin_inputs(source: &dyn StdinSource) -> InputResult<InputMap> {
    let mut buffer = Vec::new();
    source
        .open()
        .take(MAX_STDIN_BYTES as u64 + 1)
        .read_to_end(&mut buffer)
        .map_err(|e| InputError::stdin(format!("Failed to read stdin: {}", e)))?;

    if buffer.len() > MAX_STDIN_BYTES {
        return Err(InputError::stdin(format!(
            "stdin payload exceeds {} bytes",
            MAX_STDIN_BYTES
        )));
    }

    let text = String::from_utf8(buffer)
        .map_err(|e| InputError::stdin(format!("stdin is not valid UTF-8: {}", e)))?;

    if text.trim().is_empty() {
        return Ok(InputMap::new());
    }

    let decoded: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        InputError::stdin_with_payload(format!("Failed to decode stdin as JSON: {}", e), &text)
    })?;

    match decoded {
        serde_json::Value::Object(object) => {
            tracing::debug!(keys = object.len(), "Decoded inputs from stdin");
            Ok(InputMap::from_json_object(object))
        }
        other => Err(InputError::stdin_with_payload(
            "stdin JSON must be an object",
            &other.to_string(),
        )),
    }
}
