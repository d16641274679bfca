//! Basic usage: prefix-filtered environment, typed lookups, defaults and
//! freeze/thaw on the input store.
//!
//! Run with: cargo run --example basic_usage

use directed_inputs::{GetInput, InputContext, InputOptions, MockEnv, MockStdin};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let env = MockEnv::from_pairs([
        ("APP_DEBUG", "true"),
        ("APP_PORT", "8080"),
        ("APP_TIMEOUT", "30.5"),
        ("APP_NAME", "MyApplication"),
        ("HOME", "/home/demo"),
    ]);

    let mut context = InputContext::with_sources(
        InputOptions::new().env_prefix("APP_").strip_env_prefix(true),
        Arc::new(env),
        Arc::new(MockStdin::empty()),
    );
    let inputs = context.directed_inputs()?;

    let debug = inputs.get_input("DEBUG", &GetInput::new().bool())?;
    let port = inputs.get_input("PORT", &GetInput::new().integer())?;
    let timeout = inputs.get_input("TIMEOUT", &GetInput::new().float())?;
    let name = inputs.get_input("NAME", &GetInput::new())?;

    println!("Debug mode: {} (type: {})", debug.to_json(), debug.kind_name());
    println!("Port: {} (type: {})", port.to_json(), port.kind_name());
    println!("Timeout: {} (type: {})", timeout.to_json(), timeout.kind_name());
    println!("App name: {}", name.display_raw());

    let log_level = inputs.get_input("LOG_LEVEL", &GetInput::new().default_value("INFO"))?;
    println!("Log level (with default): {}", log_level.display_raw());

    println!("\n--- Freezing inputs ---");
    let frozen = inputs.freeze_inputs();
    println!("Frozen inputs: {}", frozen.to_json());
    println!("Current inputs (should be empty): {}", inputs.inputs().to_json());

    println!("\n--- Thawing inputs ---");
    let thawed = inputs.thaw_inputs();
    println!("Thawed inputs: {}", thawed.to_json());

    Ok(())
}
