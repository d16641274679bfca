//! Decorated class behaviour through the public facade

use directed_inputs::{
    CONFIG_KWARG, CallArgs, ClassDef, Decorate, Directed, DirectedClass, InputConfig, InputError,
    InputOptions, InputOverrides, InputValue, Method, MockEnv, MockStdin, Signature, inputs,
};
use serde_json::json;
use std::sync::Arc;

struct ExampleService;

fn example_service() -> DirectedClass<ExampleService> {
    ClassDef::new("ExampleService", |_, _| Ok(ExampleService))
        .method(Method::new(
            "list_users",
            Signature::new().param("domain"),
            |_, args| Ok(InputValue::Text(args.get("domain")?)),
        ))
        .method(
            Method::new(
                "secure_call",
                Signature::new().param("api_key"),
                |_, args| Ok(InputValue::Text(args.get("api_key")?)),
            )
            .input_config(InputConfig::new("api_key").source("API_KEY").required()),
        )
        .method(
            Method::new(
                "parse_config",
                Signature::new().param("config"),
                |_, args| Ok(args.value("config").cloned().unwrap_or_default()),
            )
            .input_config(InputConfig::new("config").json()),
        )
        .method(Method::new(
            "greet",
            Signature::new().param_with_default("prefix", "hello"),
            |_, args| Ok(InputValue::Text(args.get("prefix")?)),
        ))
        .directed_inputs(
            InputOptions::new()
                .with_inputs(inputs! { "domain" => "example.com" })
                .from_environment(false),
        )
        .unwrap()
}

fn construct(overrides: Option<serde_json::Value>) -> Directed<ExampleService> {
    let mut call = CallArgs::new();
    if let Some(overrides) = overrides {
        call = call.kwarg(CONFIG_KWARG, InputValue::from(overrides));
    }
    example_service()
        .construct_with_sources(call, Arc::new(MockEnv::new()), Arc::new(MockStdin::empty()))
        .unwrap()
}

#[test]
fn test_decorator_populates_missing_argument() {
    let mut service = construct(None);
    let domain: String = service.call_as("list_users", CallArgs::new()).unwrap();
    assert_eq!(domain, "example.com");
}

#[test]
fn test_provided_argument_is_not_overwritten() {
    let mut service = construct(None);
    let domain: String = service
        .call_as("list_users", CallArgs::new().kwarg("domain", "override"))
        .unwrap();
    assert_eq!(domain, "override");
}

#[test]
fn test_required_input_uses_custom_source() {
    let mut service = construct(Some(json!({"inputs": {"API_KEY": "super-secret"}})));
    let key: String = service.call_as("secure_call", CallArgs::new()).unwrap();
    assert_eq!(key, "super-secret");
}

#[test]
fn test_missing_required_input_raises_error() {
    let mut service = construct(Some(json!({"inputs": {"domain": "acme.io"}})));
    let err = service.call("secure_call", CallArgs::new()).unwrap_err();
    assert!(matches!(err, InputError::RequiredInputMissing { ref key, .. } if key == "API_KEY"));
}

#[test]
fn test_decode_from_json_input_config() {
    let mut service = construct(Some(json!({"inputs": {"config": r#"{"enabled": true}"#}})));
    let config = service.call("parse_config", CallArgs::new()).unwrap();
    assert_eq!(config.to_json(), json!({"enabled": true}));
}

#[test]
fn test_method_default_used_when_input_missing() {
    let mut service = construct(Some(json!({"inputs": {"domain": "acme.io"}})));
    let greeting: String = service.call_as("greet", CallArgs::new()).unwrap();
    assert_eq!(greeting, "hello");
}

#[test]
fn test_refresh_inputs_updates_context() {
    let mut service = construct(Some(json!({"inputs": {"domain": "override.io"}})));
    let domain: String = service.call_as("list_users", CallArgs::new()).unwrap();
    assert_eq!(domain, "override.io");

    service
        .refresh_inputs(InputOverrides {
            inputs: Some(inputs! { "domain" => "beta.example" }),
            ..InputOverrides::default()
        })
        .unwrap();
    let domain: String = service.call_as("list_users", CallArgs::new()).unwrap();
    assert_eq!(domain, "beta.example");
}

#[test]
fn test_metadata_exposes_decorator_options() {
    let class = example_service();
    assert!(!class.metadata().options.from_environment);
    assert!(class.metadata().options.inputs.contains_key("domain"));

    let names: Vec<_> = class.method_names().collect();
    assert_eq!(names, vec!["list_users", "secure_call", "parse_config", "greet"]);
}
