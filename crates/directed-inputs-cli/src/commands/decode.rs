//! Decode command implementation

use crate::args::LookupArgs;
use directed_inputs_core::{DecodeFlags, DecodeInput, InputContext, InputResult};

/// Resolve `key`, run the requested decode stages and render it as JSON
pub fn decode(
    context: &mut InputContext,
    key: &str,
    flags: DecodeFlags,
    lookup: &LookupArgs,
) -> InputResult<String> {
    let mut options = DecodeInput::new(flags);
    if let Some(default) = &lookup.default {
        options = options.default_value(default.as_str());
    }
    if lookup.required {
        options = options.required();
    }

    let value = context.directed_inputs()?.decode_input(key, &options)?;
    Ok(value.to_json().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use directed_inputs_core::{InputOptions, MockEnv, MockStdin, inputs};
    use std::sync::Arc;

    fn context() -> InputContext {
        InputContext::with_sources(
            InputOptions::new()
                .from_environment(false)
                .with_inputs(inputs! {
                    "config" => r#"{"enabled": true}"#,
                    "token" => "c2VjcmV0",
                }),
            Arc::new(MockEnv::new()),
            Arc::new(MockStdin::empty()),
        )
    }

    #[test]
    fn test_decode_json() {
        let out = decode(
            &mut context(),
            "config",
            DecodeFlags::new().json(),
            &LookupArgs::default(),
        )
        .unwrap();
        assert_eq!(out, r#"{"enabled":true}"#);
    }

    #[test]
    fn test_decode_base64_text() {
        let out = decode(
            &mut context(),
            "token",
            DecodeFlags::new().base64(),
            &LookupArgs::default(),
        )
        .unwrap();
        assert_eq!(out, r#""secret""#);
    }

    #[test]
    fn test_decode_failure_names_the_stage() {
        let err = decode(
            &mut context(),
            "token",
            DecodeFlags::new().json(),
            &LookupArgs::default(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("json"));
    }
}
