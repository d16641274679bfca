//! Multi-stage decode pipeline: bytes → text → base64 → JSON/YAML

use super::transcode;
use crate::error::{InputError, InputResult};
use crate::value::InputValue;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the decode pipeline that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeStage {
    Utf8,
    Base64,
    Json,
    Yaml,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Utf8 => "utf8",
            Self::Base64 => "base64",
            Self::Json => "json",
            Self::Yaml => "yaml",
        })
    }
}

/// Independently combinable decode stages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeFlags {
    pub base64: bool,
    pub json: bool,
    pub yaml: bool,
}

impl DecodeFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base64(mut self) -> Self {
        self.base64 = true;
        self
    }

    pub fn json(mut self) -> Self {
        self.json = true;
        self
    }

    pub fn yaml(mut self) -> Self {
        self.yaml = true;
        self
    }

    /// True when no stage is requested
    pub fn is_empty(&self) -> bool {
        !(self.base64 || self.json || self.yaml)
    }

    /// True when a JSON or YAML stage follows
    pub fn is_structural(&self) -> bool {
        self.json || self.yaml
    }
}

/// Run the requested decode stages over `value`.
///
/// Bytes are transcoded to text first. Anything that is not text after that
/// (an already-structured value) is returned unchanged. Base64 output feeds
/// the structural stage; YAML takes precedence when both structural flags are
/// set.
pub fn decode_value(key: &str, value: InputValue, flags: DecodeFlags) -> InputResult<InputValue> {
    let mut text = match transcode(key, value)? {
        InputValue::Text(text) => text,
        structured => return Ok(structured),
    };

    if flags.base64 {
        let bytes = STANDARD
            .decode(text.trim())
            .map_err(|e| InputError::decode(key, DecodeStage::Base64, &text, e.to_string()))?;
        text = match String::from_utf8(bytes) {
            Ok(decoded) => decoded,
            Err(e) if flags.is_structural() => {
                return Err(InputError::decode(
                    key,
                    DecodeStage::Utf8,
                    &text,
                    format!("base64 payload is not UTF-8: {}", e),
                ));
            }
            Err(e) => return Ok(InputValue::Bytes(e.into_bytes())),
        };
    }

    if flags.yaml {
        let parsed: serde_yaml::Value = serde_yaml::from_str(&text)
            .map_err(|e| InputError::decode(key, DecodeStage::Yaml, &text, e.to_string()))?;
        return Ok(InputValue::from_yaml(parsed));
    }

    if flags.json {
        let parsed: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| InputError::decode(key, DecodeStage::Json, &text, e.to_string()))?;
        return Ok(InputValue::from(parsed));
    }

    Ok(InputValue::Text(text))
}
