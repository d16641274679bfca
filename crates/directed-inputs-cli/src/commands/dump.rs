//! Dump command implementation

use directed_inputs_core::{InputContext, InputResult};

/// Render every merged input as pretty JSON
pub fn dump(context: &mut InputContext) -> InputResult<String> {
    let inputs = context.directed_inputs()?.inputs().to_json();
    Ok(serde_json::to_string_pretty(&inputs).unwrap_or_else(|_| inputs.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use directed_inputs_core::{InputOptions, MockEnv, MockStdin, inputs};
    use std::sync::Arc;

    #[test]
    fn test_dump_merges_sources() {
        let mut ctx = InputContext::with_sources(
            InputOptions::new()
                .with_inputs(inputs! { "name" => "explicit", "only" => "x" })
                .from_stdin(true),
            Arc::new(MockEnv::from_pairs([("NAME", "env")])),
            Arc::new(MockStdin::new(r#"{"extra": [1, 2]}"#)),
        );
        let out: serde_json::Value = serde_json::from_str(&dump(&mut ctx).unwrap()).unwrap();
        assert_eq!(
            out,
            serde_json::json!({"name": "env", "only": "x", "extra": [1, 2]})
        );
    }
}
