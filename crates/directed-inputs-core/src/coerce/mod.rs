//! Value coercion
//!
//! Pure conversions from a raw value (usually text from the environment or
//! stdin) into a target semantic type. Coercion is a strict no-op when the
//! value already has the target shape, and a failure is always reported as
//! [`InputError::Coercion`] carrying the key and raw value; nothing is ever
//! defaulted on a partial parse.

mod decode;

pub use decode::{DecodeFlags, DecodeStage, decode_value};

use crate::error::{InputError, InputResult};
use crate::value::InputValue;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Range of floats that convert to `i64` without saturating. The upper
/// bound is 2^63 and exclusive.
const I64_LOWER: f64 = -9_223_372_036_854_775_808.0;
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Target type for coercion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoerceType {
    Bool,
    Integer,
    Float,
    Path,
    Timestamp,
}

impl CoerceType {
    /// Whether the value already has this type's runtime shape
    pub fn matches(self, value: &InputValue) -> bool {
        matches!(
            (self, value),
            (Self::Bool, InputValue::Bool(_))
                | (Self::Integer, InputValue::Integer(_))
                | (Self::Float, InputValue::Float(_))
                | (Self::Path, InputValue::Path(_))
                | (Self::Timestamp, InputValue::Timestamp(_))
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Path => "path",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for CoerceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoerceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bool" | "boolean" => Ok(Self::Bool),
            "int" | "integer" => Ok(Self::Integer),
            "float" | "number" => Ok(Self::Float),
            "path" => Ok(Self::Path),
            "timestamp" | "datetime" => Ok(Self::Timestamp),
            other => Err(format!("unknown coercion type: {}", other)),
        }
    }
}

/// Parse a boolean token.
///
/// Accepts `y yes t true on 1` and `n no f false off 0`, case-insensitively.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "y" | "yes" | "t" | "true" | "on" | "1" => Some(true),
        "n" | "no" | "f" | "false" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// Parse a timestamp from RFC 3339, a naive `YYYY-MM-DD[ T]HH:MM:SS[.f]`
/// (taken as UTC) or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, String> {
    let raw = raw.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp);
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
        .ok_or_else(|| "unrecognized timestamp format".to_string())
}

/// Transcode bytes to text. Any other value is returned unchanged.
pub(crate) fn transcode(key: &str, value: InputValue) -> InputResult<InputValue> {
    match value {
        InputValue::Bytes(bytes) => String::from_utf8(bytes)
            .map(InputValue::Text)
            .map_err(|e| {
                let lossy = String::from_utf8_lossy(e.as_bytes()).into_owned();
                InputError::decode(key, DecodeStage::Utf8, &lossy, e.to_string())
            }),
        other => Ok(other),
    }
}

/// Coerce `value` into `target`.
///
/// Null passes through untouched; absence is the caller's concern.
pub fn coerce(key: &str, value: InputValue, target: CoerceType) -> InputResult<InputValue> {
    if value.is_null() || target.matches(&value) {
        return Ok(value);
    }

    let value = transcode(key, value)?;
    let fail = |value: &InputValue, reason: String| {
        InputError::coercion(key, value.display_raw(), target, reason)
    };

    match target {
        CoerceType::Bool => match &value {
            InputValue::Text(text) => parse_bool(text)
                .map(InputValue::Bool)
                .ok_or_else(|| fail(&value, "unrecognized boolean token".into())),
            InputValue::Integer(0) => Ok(InputValue::Bool(false)),
            InputValue::Integer(1) => Ok(InputValue::Bool(true)),
            other => Err(fail(other, format!("{} is not a boolean", other.kind_name()))),
        },
        CoerceType::Integer => match &value {
            InputValue::Text(text) => text
                .trim()
                .parse::<i64>()
                .map(InputValue::Integer)
                .map_err(|e| fail(&value, e.to_string())),
            InputValue::Float(number)
                if number.is_finite()
                    && number.fract() == 0.0
                    && *number >= I64_LOWER
                    && *number < I64_UPPER =>
            {
                Ok(InputValue::Integer(*number as i64))
            }
            other => Err(fail(other, format!("{} is not an integer", other.kind_name()))),
        },
        CoerceType::Float => match &value {
            InputValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(InputValue::Float)
                .map_err(|e| fail(&value, e.to_string())),
            InputValue::Integer(number) => Ok(InputValue::Float(*number as f64)),
            other => Err(fail(other, format!("{} is not a float", other.kind_name()))),
        },
        CoerceType::Path => match &value {
            InputValue::Text(text) if !text.trim().is_empty() => {
                Ok(InputValue::Path(PathBuf::from(text.trim())))
            }
            InputValue::Text(_) => Err(fail(&value, "path is blank".into())),
            other => Err(fail(other, format!("{} is not a path", other.kind_name()))),
        },
        CoerceType::Timestamp => match &value {
            InputValue::Text(text) => parse_timestamp(text)
                .map(InputValue::Timestamp)
                .map_err(|reason| fail(&value, reason)),
            other => Err(fail(other, format!("{} is not a timestamp", other.kind_name()))),
        },
    }
}
