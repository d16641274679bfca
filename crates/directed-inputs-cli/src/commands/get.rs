//! Get command implementation

use crate::args::LookupArgs;
use directed_inputs_core::{CoerceType, GetInput, InputContext, InputResult};

/// Resolve `key`, optionally coerced, and render it as JSON
pub fn get(
    context: &mut InputContext,
    key: &str,
    coerce: Option<CoerceType>,
    lookup: &LookupArgs,
) -> InputResult<String> {
    let mut options = GetInput::new();
    if let Some(default) = &lookup.default {
        options = options.default_value(default.as_str());
    }
    if lookup.required {
        options = options.required();
    }
    if let Some(target) = coerce {
        options = options.coerce(target);
    }

    let value = context.directed_inputs()?.get_input(key, &options)?;
    Ok(value.to_json().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use directed_inputs_core::{InputOptions, MockEnv, MockStdin};
    use std::sync::Arc;

    fn context(pairs: &[(&str, &str)]) -> InputContext {
        let env = MockEnv::from_pairs(pairs.iter().copied());
        InputContext::with_sources(
            InputOptions::new().env_prefix("APP_").strip_env_prefix(true),
            Arc::new(env),
            Arc::new(MockStdin::empty()),
        )
    }

    #[test]
    fn test_get_coerced_value() {
        let mut ctx = context(&[("APP_PORT", "8080")]);
        let out = get(&mut ctx, "port", Some(CoerceType::Integer), &LookupArgs::default()).unwrap();
        assert_eq!(out, "8080");
    }

    #[test]
    fn test_get_default_and_missing() {
        let mut ctx = context(&[]);
        let lookup = LookupArgs {
            default: Some("true".into()),
            required: false,
        };
        assert_eq!(get(&mut ctx, "debug", Some(CoerceType::Bool), &lookup).unwrap(), "true");
        assert_eq!(get(&mut ctx, "absent", None, &LookupArgs::default()).unwrap(), "null");
    }

    #[test]
    fn test_get_required_missing() {
        let mut ctx = context(&[]);
        let lookup = LookupArgs {
            default: None,
            required: true,
        };
        let err = get(&mut ctx, "api_key", None, &lookup).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_REQUIRED_MISSING");
    }
}
