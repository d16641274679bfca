//! Live input store with freeze/thaw side storage

use super::map::InputMap;
use crate::coerce::{CoerceType, DecodeFlags, coerce, decode_value};
use crate::error::{InputError, InputResult};
use crate::value::InputValue;

/// Options for [`InputStore::get_input`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetInput {
    /// Used when the key is absent or holds nothing; null means no default
    pub default: InputValue,
    pub required: bool,
    pub coerce: Option<CoerceType>,
}

impl GetInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_value(mut self, default: impl Into<InputValue>) -> Self {
        self.default = default.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn coerce(mut self, target: CoerceType) -> Self {
        self.coerce = Some(target);
        self
    }

    pub fn bool(self) -> Self {
        self.coerce(CoerceType::Bool)
    }

    pub fn integer(self) -> Self {
        self.coerce(CoerceType::Integer)
    }

    pub fn float(self) -> Self {
        self.coerce(CoerceType::Float)
    }

    pub fn path(self) -> Self {
        self.coerce(CoerceType::Path)
    }

    pub fn datetime(self) -> Self {
        self.coerce(CoerceType::Timestamp)
    }
}

/// Options for [`InputStore::decode_input`]
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeInput {
    pub default: InputValue,
    pub required: bool,
    pub flags: DecodeFlags,
    /// When false, a decoded null is replaced by the default
    pub allow_none: bool,
}

impl Default for DecodeInput {
    fn default() -> Self {
        Self {
            default: InputValue::Null,
            required: false,
            flags: DecodeFlags::default(),
            allow_none: true,
        }
    }
}

impl DecodeInput {
    pub fn new(flags: DecodeFlags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }

    pub fn default_value(mut self, default: impl Into<InputValue>) -> Self {
        self.default = default.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allow_none(mut self, allow_none: bool) -> Self {
        self.allow_none = allow_none;
        self
    }
}

/// Live inputs plus a frozen side store.
///
/// Under the freeze/thaw protocol at most one of the two sides holds data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputStore {
    inputs: InputMap,
    frozen_inputs: InputMap,
}

impl InputStore {
    pub fn new(inputs: InputMap) -> Self {
        Self {
            inputs,
            frozen_inputs: InputMap::new(),
        }
    }

    /// Live inputs
    pub fn inputs(&self) -> &InputMap {
        &self.inputs
    }

    pub fn frozen_inputs(&self) -> &InputMap {
        &self.frozen_inputs
    }

    pub fn is_frozen(&self) -> bool {
        !self.frozen_inputs.is_empty()
    }

    /// Look up `key`, apply the default, coerce, and enforce `required`.
    ///
    /// A value that is nothing (null, blank, empty) is replaced by the default.
    /// Returns null when there is neither a value nor a default.
    pub fn get_input(&self, key: &str, options: &GetInput) -> InputResult<InputValue> {
        let mut value = self
            .inputs
            .get(key)
            .cloned()
            .unwrap_or_else(|| options.default.clone());

        if value.is_nothing() {
            value = options.default.clone();
        }

        if let Some(target) = options.coerce {
            value = coerce(key, value, target)?;
        }

        if options.required && value.is_nothing() {
            return Err(self.required_missing(key));
        }

        Ok(value)
    }

    /// Look up `key` and run the decode pipeline over it.
    ///
    /// The default is returned as-is, never decoded. `required` is checked
    /// again on the decoded value, so a payload that decodes to nothing fails.
    pub fn decode_input(&self, key: &str, options: &DecodeInput) -> InputResult<InputValue> {
        let lookup = GetInput {
            default: options.default.clone(),
            required: options.required,
            coerce: None,
        };
        let value = self.get_input(key, &lookup)?;

        if value.is_null() || value == options.default {
            return Ok(value);
        }

        let mut decoded = decode_value(key, value, options.flags)?;
        if decoded.is_null() && !options.allow_none {
            decoded = options.default.clone();
        }

        if options.required && decoded.is_nothing() {
            return Err(self.required_missing(key));
        }

        Ok(decoded)
    }

    fn required_missing(&self, key: &str) -> InputError {
        InputError::required_missing(key, self.inputs.keys().map(str::to_string).collect())
    }

    /// Deep-merge `new_inputs` into the live inputs and return a copy of the
    /// result. `None` leaves the store unchanged.
    pub fn merge_inputs(&mut self, new_inputs: Option<InputMap>) -> InputMap {
        if let Some(new_inputs) = new_inputs.filter(|map| !map.is_empty()) {
            tracing::debug!(keys = new_inputs.len(), "Merging inputs");
            self.inputs = self.inputs.merged(&new_inputs);
        }
        self.inputs.clone()
    }

    /// Move the live inputs to the frozen side.
    ///
    /// No-op while already frozen. Returns a copy of the frozen inputs.
    pub fn freeze_inputs(&mut self) -> InputMap {
        if self.frozen_inputs.is_empty() {
            self.frozen_inputs = std::mem::take(&mut self.inputs);
            tracing::debug!(keys = self.frozen_inputs.len(), "Froze inputs");
        } else {
            tracing::trace!("Inputs already frozen");
        }
        self.frozen_inputs.clone()
    }

    /// Bring the frozen inputs back.
    ///
    /// If the live side is empty the frozen inputs replace it; otherwise they
    /// are deep-merged over it. The frozen side is emptied either way.
    pub fn thaw_inputs(&mut self) -> InputMap {
        let frozen = std::mem::take(&mut self.frozen_inputs);

        if self.inputs.is_empty() {
            self.inputs = frozen;
        } else {
            if !frozen.is_empty() {
                tracing::warn!(
                    live = self.inputs.len(),
                    frozen = frozen.len(),
                    "Thawing into non-empty live inputs, merging frozen inputs over them"
                );
            }
            self.inputs = self.inputs.merged(&frozen);
        }

        tracing::debug!(keys = self.inputs.len(), "Thawed inputs");
        self.inputs.clone()
    }

    /// Freeze if not frozen, otherwise thaw
    pub fn shift_inputs(&mut self) -> InputMap {
        if self.frozen_inputs.is_empty() {
            self.freeze_inputs()
        } else {
            self.thaw_inputs()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs;
    use serde_json::json;

    fn store() -> InputStore {
        InputStore::new(inputs! {
            "DEBUG" => "true",
            "PORT" => "8080",
            "TIMEOUT" => "30.5",
            "NAME" => "MyApplication",
            "BLANK" => "  ",
        })
    }

    #[test]
    fn test_get_input_with_coercion() {
        let store = store();
        assert_eq!(
            store.get_input("debug", &GetInput::new().bool()).unwrap(),
            InputValue::Bool(true)
        );
        assert_eq!(
            store.get_input("port", &GetInput::new().integer()).unwrap(),
            InputValue::Integer(8080)
        );
        assert_eq!(
            store.get_input("timeout", &GetInput::new().float()).unwrap(),
            InputValue::Float(30.5)
        );
        assert_eq!(
            store.get_input("name", &GetInput::new()).unwrap(),
            InputValue::from("MyApplication")
        );
    }

    #[test]
    fn test_get_input_defaults() {
        let store = store();
        assert_eq!(
            store
                .get_input("log_level", &GetInput::new().default_value("INFO"))
                .unwrap(),
            InputValue::from("INFO")
        );
        assert_eq!(
            store
                .get_input("blank", &GetInput::new().default_value("fallback"))
                .unwrap(),
            InputValue::from("fallback")
        );
        assert_eq!(
            store.get_input("absent", &GetInput::new()).unwrap(),
            InputValue::Null
        );
    }

    #[test]
    fn test_get_input_required() {
        let store = store();
        let err = store
            .get_input("api_key", &GetInput::new().required())
            .unwrap_err();
        assert!(
            matches!(err, InputError::RequiredInputMissing { ref key, .. } if key == "api_key")
        );

        let err = store
            .get_input("blank", &GetInput::new().required())
            .unwrap_err();
        assert_eq!(err.error_code(), "INPUT_REQUIRED_MISSING");

        assert!(
            store
                .get_input("api_key", &GetInput::new().required().default_value("k"))
                .is_ok()
        );
    }

    #[test]
    fn test_get_input_coercion_failure_is_not_defaulted() {
        let store = store();
        let err = store
            .get_input("name", &GetInput::new().integer().default_value(1))
            .unwrap_err();
        assert!(matches!(err, InputError::Coercion { .. }));
    }

    #[test]
    fn test_decode_input_skips_default() {
        let store = InputStore::new(inputs! { "config" => r#"{"a": 1}"# });
        let options = DecodeInput::new(DecodeFlags::new().json())
            .default_value(InputValue::from(json!({"fallback": true})));

        assert_eq!(
            store.decode_input("config", &options).unwrap().to_json(),
            json!({"a": 1})
        );
        assert_eq!(
            store.decode_input("missing", &options).unwrap().to_json(),
            json!({"fallback": true})
        );
    }

    #[test]
    fn test_decode_input_allow_none() {
        let store = InputStore::new(inputs! { "config" => "null" });
        let strict = DecodeInput::new(DecodeFlags::new().json())
            .default_value("fallback")
            .allow_none(false);
        assert_eq!(
            store.decode_input("config", &strict).unwrap(),
            InputValue::from("fallback")
        );

        let lenient = DecodeInput::new(DecodeFlags::new().json());
        assert_eq!(
            store.decode_input("config", &lenient).unwrap(),
            InputValue::Null
        );
    }

    #[test]
    fn test_decode_input_required_rejects_decoded_null() {
        let store = InputStore::new(inputs! { "config" => "null", "tags" => "[]" });

        let required = DecodeInput::new(DecodeFlags::new().json()).required();
        let err = store.decode_input("config", &required).unwrap_err();
        assert!(matches!(err, InputError::RequiredInputMissing { ref key, .. } if key == "config"));

        let strict = required.clone().allow_none(false);
        assert!(store.decode_input("config", &strict).is_err());

        let err = store.decode_input("tags", &required).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_REQUIRED_MISSING");

        let with_default = strict.default_value("fallback");
        assert_eq!(
            store.decode_input("config", &with_default).unwrap(),
            InputValue::from("fallback")
        );
    }

    #[test]
    fn test_freeze_thaw_roundtrip() {
        let mut store = store();
        let original = store.inputs().clone();

        let frozen = store.freeze_inputs();
        assert_eq!(frozen, original);
        assert!(store.inputs().is_empty());
        assert!(store.is_frozen());

        let thawed = store.thaw_inputs();
        assert_eq!(thawed, original);
        assert_eq!(store.inputs(), &original);
        assert!(store.frozen_inputs().is_empty());
    }

    #[test]
    fn test_freeze_twice_is_noop() {
        let mut store = store();
        let first = store.freeze_inputs();
        store.merge_inputs(Some(inputs! { "late" => "value" }));
        let second = store.freeze_inputs();
        assert_eq!(first, second);
        assert_eq!(store.inputs().get("late"), Some(&InputValue::from("value")));
    }

    #[test]
    fn test_thaw_merges_into_non_empty_live_inputs() {
        let mut store = InputStore::new(inputs! { "a" => "1", "shared" => "frozen" });
        store.freeze_inputs();
        store.merge_inputs(Some(inputs! { "b" => "2", "shared" => "live" }));

        let thawed = store.thaw_inputs();
        assert_eq!(thawed.get("a"), Some(&InputValue::from("1")));
        assert_eq!(thawed.get("b"), Some(&InputValue::from("2")));
        assert_eq!(thawed.get("shared"), Some(&InputValue::from("frozen")));
        assert!(store.frozen_inputs().is_empty());
    }

    #[test]
    fn test_shift_toggles() {
        let mut store = store();
        let original = store.inputs().clone();

        store.shift_inputs();
        assert!(store.is_frozen());
        assert!(store.inputs().is_empty());

        store.shift_inputs();
        assert!(!store.is_frozen());
        assert_eq!(store.inputs(), &original);
    }

    #[test]
    fn test_merge_inputs_returns_copy() {
        let mut store = store();
        let mut snapshot = store.merge_inputs(None);
        snapshot.insert("debug", "false");
        assert_eq!(store.inputs().get("debug"), Some(&InputValue::from("true")));

        let merged = store.merge_inputs(Some(inputs! { "debug" => "false" }));
        assert_eq!(merged.get("debug"), Some(&InputValue::from("false")));
    }
}
