//! Decorator API: methods whose omitted arguments are resolved from inputs.
//!
//! Run with: cargo run --example decorator_api

use directed_inputs::{
    CONFIG_KWARG, CallArgs, ClassDef, Decorate, DirectedClass, InputConfig, InputOptions,
    InputValue, Method, MockEnv, MockStdin, Signature,
};
use serde_json::json;
use std::sync::Arc;

struct UserService;

fn user_service() -> anyhow::Result<DirectedClass<UserService>> {
    let class = ClassDef::new("UserService", |_, _| Ok(UserService))
        .method(Method::new(
            "get_user",
            Signature::new().param("user_id"),
            |_, args| {
                let user_id: String = args.get("user_id")?;
                Ok(InputValue::from(json!({
                    "id": user_id,
                    "name": format!("User {}", user_id),
                })))
            },
        ))
        .method(
            Method::new(
                "authenticated_call",
                Signature::new()
                    .param("api_key")
                    .param_with_default("endpoint", "/users"),
                |_, args| {
                    let api_key: String = args.get("api_key")?;
                    let endpoint: String = args.get("endpoint")?;
                    let shown: String = api_key.chars().take(4).collect();
                    Ok(InputValue::from(format!("Calling {} with key {}...", endpoint, shown)))
                },
            )
            .input_config(InputConfig::new("api_key").source("API_KEY").required()),
        )
        .method(
            Method::new(
                "parse_config",
                Signature::new().param_with_default("config", InputValue::Null),
                |_, args| {
                    Ok(match args.value("config") {
                        Some(InputValue::Null) | None => InputValue::from(json!({})),
                        Some(config) => config.clone(),
                    })
                },
            )
            .input_config(InputConfig::new("config").json()),
        )
        .method(
            Method::new("get_port", Signature::new().param("port"), |_, args| {
                Ok(InputValue::Integer(args.get("port")?))
            })
            .input_config(InputConfig::new("port").integer().default_value(8080)),
        );

    Ok(class.directed_inputs(
        InputOptions::new().env_prefix("SERVICE_").strip_env_prefix(true),
    )?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let env = Arc::new(MockEnv::from_pairs([
        ("SERVICE_USER_ID", "12345"),
        ("SERVICE_API_KEY", "secret-key-abc123"),
        ("SERVICE_CONFIG", r#"{"host": "localhost", "debug": "true"}"#),
        ("SERVICE_PORT", "9000"),
    ]));
    let stdin = Arc::new(MockStdin::empty());

    let class = user_service()?;
    let mut service = class.construct_with_sources(CallArgs::new(), env.clone(), stdin.clone())?;

    println!("=== Automatic Parameter Injection ===");
    let user = service.call("get_user", CallArgs::new())?;
    println!("User: {}", user.to_json());

    println!("\n=== Required Input with Custom Source ===");
    let result = service.call("authenticated_call", CallArgs::new())?;
    println!("Result: {}", result.display_raw());

    println!("\n=== JSON Decoding ===");
    let config = service.call("parse_config", CallArgs::new())?;
    println!("Config: {}", config.to_json());

    println!("\n=== Type Coercion ===");
    let port = service.call("get_port", CallArgs::new())?;
    println!("Port: {} (type: {})", port.to_json(), port.kind_name());

    // The environment outranks explicit inputs, so switch it off to let the
    // override mapping take effect
    println!("\n=== Override at Instantiation ===");
    let overrides = CallArgs::new().kwarg(
        CONFIG_KWARG,
        InputValue::from(json!({
            "from_environment": false,
            "inputs": {"USER_ID": "custom-999"},
        })),
    );
    let mut custom = class.construct_with_sources(overrides, env, stdin)?;
    let user = custom.call("get_user", CallArgs::new())?;
    println!("Custom user: {}", user.to_json());

    println!("\n=== Explicit Arguments ===");
    let user = service.call("get_user", CallArgs::new().kwarg("user_id", "explicit-user"))?;
    println!("Explicit user: {}", user.to_json());

    Ok(())
}
