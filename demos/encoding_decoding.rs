//! Decoding inputs: JSON, YAML, base64 and the combined stages.
//!
//! Run with: cargo run --example encoding_decoding

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use directed_inputs::{
    DecodeFlags, DecodeInput, GetInput, InputContext, InputOptions, InputValue, inputs,
};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let json_data = r#"{"database": "postgres", "port": 5432}"#;
    let yaml_data = "server:\n  host: localhost\n  port: 8080";

    let mut context = InputContext::new(
        InputOptions::new()
            .from_environment(false)
            .with_inputs(inputs! {
                "json_config" => json_data,
                "yaml_config" => yaml_data,
                "base64_json_config" => STANDARD.encode(json_data),
                "base64_yaml_config" => STANDARD.encode(yaml_data),
                "plain_text" => "Hello, World!",
            }),
    );
    let inputs = context.directed_inputs()?;

    println!("=== JSON Decoding ===");
    let decoded = inputs.decode_input("json_config", &DecodeInput::new(DecodeFlags::new().json()))?;
    println!("JSON decoded: {}", decoded.to_json());

    println!("\n=== YAML Decoding ===");
    let decoded = inputs.decode_input("yaml_config", &DecodeInput::new(DecodeFlags::new().yaml()))?;
    println!("YAML decoded: {}", decoded.to_json());

    println!("\n=== Base64 + JSON Decoding ===");
    let decoded = inputs.decode_input(
        "base64_json_config",
        &DecodeInput::new(DecodeFlags::new().base64().json()),
    )?;
    println!("Base64+JSON decoded: {}", decoded.to_json());

    println!("\n=== Base64 + YAML Decoding ===");
    let decoded = inputs.decode_input(
        "base64_yaml_config",
        &DecodeInput::new(DecodeFlags::new().base64().yaml()),
    )?;
    println!("Base64+YAML decoded: {}", decoded.to_json());

    println!("\n=== Plain Text (No Decoding) ===");
    let plain = inputs.get_input("plain_text", &GetInput::new())?;
    println!("Plain text: {}", plain.display_raw());

    println!("\n=== Missing Input with Default ===");
    let missing = inputs.decode_input(
        "nonexistent",
        &DecodeInput::new(DecodeFlags::new().json())
            .default_value(InputValue::from(json!({"fallback": true}))),
    )?;
    println!("Missing (with default): {}", missing.to_json());

    Ok(())
}
