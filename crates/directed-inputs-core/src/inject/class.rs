//! Class definitions, decoration and directed instances

use super::binder::{BoundArguments, CallArgs, bind_partial};
use super::method::{Method, MethodBody};
use crate::context::{InputConfig, InputContext, Resolved};
use crate::error::{InputError, InputResult};
use crate::sources::{EnvSource, InputOptions, InputOverrides, SourceLoader, StdinSource};
use crate::store::InputStore;
use crate::value::InputValue;
use futures::future::{self, BoxFuture};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;

/// Reserved constructor keyword carrying per-instance option overrides
pub const CONFIG_KWARG: &str = "_directed_inputs_config";

/// Reserved constructor keywords for opaque per-instance runtime values.
/// They are removed before the initializer runs and kept on the instance.
pub const RUNTIME_SETTINGS_KWARG: &str = "_directed_inputs_runtime_settings";
pub const RUNTIME_LOGGING_KWARG: &str = "_directed_inputs_runtime_logging";

/// User initializer; receives the constructor arguments and the fresh context
pub type Initializer<T> =
    Arc<dyn Fn(CallArgs, &mut InputContext) -> InputResult<T> + Send + Sync>;

/// An undecorated class: a name, an initializer and a method table
pub struct ClassDef<T> {
    name: String,
    init: Initializer<T>,
    methods: IndexMap<String, Method<T>>,
}

impl<T> ClassDef<T> {
    pub fn new<F>(name: impl Into<String>, init: F) -> Self
    where
        F: Fn(CallArgs, &mut InputContext) -> InputResult<T> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            init: Arc::new(init),
            methods: IndexMap::new(),
        }
    }

    pub fn method(mut self, method: Method<T>) -> Self {
        self.methods.insert(method.name().to_string(), method);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Options captured when a class was decorated
#[derive(Debug, Clone, PartialEq)]
pub struct DirectedInputsMetadata {
    pub options: InputOptions,
}

/// A method plus the parameter configs injected on every call
struct PreparedMethod<T> {
    method: Method<T>,
    injections: Vec<InputConfig>,
}

struct ClassInner<T> {
    name: String,
    metadata: DirectedInputsMetadata,
    init: Initializer<T>,
    methods: IndexMap<String, PreparedMethod<T>>,
}

/// A decorated class. Cheap to clone.
pub struct DirectedClass<T> {
    inner: Arc<ClassInner<T>>,
}

impl<T> Clone for DirectedClass<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for DirectedClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectedClass")
            .field("name", &self.inner.name)
            .field("metadata", &self.inner.metadata)
            .field("methods", &self.inner.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Turns a class into one whose instances resolve missing method arguments
/// from inputs.
pub trait Decorate<T> {
    fn directed_inputs(self, options: InputOptions) -> InputResult<DirectedClass<T>>;
}

impl<T> Decorate<T> for ClassDef<T> {
    fn directed_inputs(self, options: InputOptions) -> InputResult<DirectedClass<T>> {
        let mut methods = IndexMap::with_capacity(self.methods.len());

        for (name, method) in self.methods {
            let callable = format!("{}.{}", self.name, name);
            method.signature().validate(&callable)?;

            for parameter in method.configs().keys() {
                match method.signature().get(parameter) {
                    Some(param) if !param.kind.is_variadic() => {}
                    Some(_) => {
                        return Err(InputError::invalid_arguments(
                            &callable,
                            format!("cannot configure variadic parameter '{}'", parameter),
                        ));
                    }
                    None => {
                        return Err(InputError::invalid_arguments(
                            &callable,
                            format!("input config names unknown parameter '{}'", parameter),
                        ));
                    }
                }
            }

            let injections = if method.is_injectable() {
                method
                    .signature()
                    .params()
                    .iter()
                    .filter(|param| !param.kind.is_variadic())
                    .map(|param| {
                        method
                            .configs()
                            .get(&param.name)
                            .cloned()
                            .unwrap_or_else(|| InputConfig::from_param(param))
                    })
                    .collect()
            } else {
                Vec::new()
            };

            methods.insert(name, PreparedMethod { method, injections });
        }

        tracing::debug!(class = %self.name, methods = methods.len(), "Decorated class");

        Ok(DirectedClass {
            inner: Arc::new(ClassInner {
                name: self.name,
                metadata: DirectedInputsMetadata { options },
                init: self.init,
                methods,
            }),
        })
    }
}

impl<T> Decorate<T> for DirectedClass<T> {
    fn directed_inputs(self, _options: InputOptions) -> InputResult<DirectedClass<T>> {
        tracing::debug!(class = %self.inner.name, "Class already decorated");
        Ok(self)
    }
}

impl<T> DirectedClass<T> {
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn metadata(&self) -> &DirectedInputsMetadata {
        &self.inner.metadata
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.inner.methods.keys().map(String::as_str)
    }

    /// Construct over the real process environment and stdin
    pub fn construct(&self, call: CallArgs) -> InputResult<Directed<T>> {
        self.construct_with_loader(call, SourceLoader::process())
    }

    pub fn construct_with_sources(
        &self,
        call: CallArgs,
        env: Arc<dyn EnvSource>,
        stdin: Arc<dyn StdinSource>,
    ) -> InputResult<Directed<T>> {
        self.construct_with_loader(call, SourceLoader::new(env, stdin))
    }

    /// Build the context from the decorator options and any overrides in the
    /// reserved keyword, then run the initializer with the remaining
    /// arguments. With stdin enabled the store is loaded here, so a bad
    /// payload fails construction.
    pub fn construct_with_loader(
        &self,
        mut call: CallArgs,
        loader: SourceLoader,
    ) -> InputResult<Directed<T>> {
        let overrides = match call.take_keyword(CONFIG_KWARG) {
            Some(value) => InputOverrides::from_value(&value)?,
            None => InputOverrides::default(),
        };
        let runtime_settings = call.take_keyword(RUNTIME_SETTINGS_KWARG);
        let runtime_logging = call.take_keyword(RUNTIME_LOGGING_KWARG);
        let options = self.inner.metadata.options.merged(overrides);
        let eager = options.from_stdin;

        let mut context = InputContext::with_loader(options, loader);
        if eager {
            context.directed_inputs()?;
        }

        let instance = (self.inner.init)(call, &mut context)?;
        tracing::debug!(class = %self.inner.name, "Constructed directed instance");

        Ok(Directed {
            class: self.clone(),
            instance,
            context: Some(context),
            runtime_settings,
            runtime_logging,
        })
    }

    /// Wrap an instance built without going through construction. It has no
    /// context, so injection and the input accessors fail.
    pub fn adopt(&self, instance: T) -> Directed<T> {
        Directed {
            class: self.clone(),
            instance,
            context: None,
            runtime_settings: None,
            runtime_logging: None,
        }
    }
}

/// An instance of a decorated class together with its input context
pub struct Directed<T> {
    class: DirectedClass<T>,
    instance: T,
    context: Option<InputContext>,
    runtime_settings: Option<InputValue>,
    runtime_logging: Option<InputValue>,
}

impl<T: fmt::Debug> fmt::Debug for Directed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Directed")
            .field("class", &self.class.inner.name)
            .field("instance", &self.instance)
            .field("context", &self.context)
            .field("runtime_settings", &self.runtime_settings)
            .field("runtime_logging", &self.runtime_logging)
            .finish()
    }
}

impl<T> Directed<T> {
    pub fn class(&self) -> &DirectedClass<T> {
        &self.class
    }

    pub fn inner(&self) -> &T {
        &self.instance
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.instance
    }

    pub fn into_inner(self) -> T {
        self.instance
    }

    pub fn context(&self) -> InputResult<&InputContext> {
        self.context
            .as_ref()
            .ok_or_else(|| InputError::context_not_initialized(&self.class.inner.name))
    }

    /// Value passed under [`RUNTIME_SETTINGS_KWARG`] at construction
    pub fn runtime_settings(&self) -> Option<&InputValue> {
        self.runtime_settings.as_ref()
    }

    /// Value passed under [`RUNTIME_LOGGING_KWARG`] at construction
    pub fn runtime_logging(&self) -> Option<&InputValue> {
        self.runtime_logging.as_ref()
    }

    fn context_mut(&mut self) -> InputResult<&mut InputContext> {
        let name = &self.class.inner.name;
        self.context
            .as_mut()
            .ok_or_else(|| InputError::context_not_initialized(name))
    }

    /// The instance's input store, loading it if needed
    pub fn directed_inputs(&mut self) -> InputResult<&mut InputStore> {
        self.context_mut()?.directed_inputs()
    }

    /// Layer `overrides` onto the context options and drop the loaded store.
    /// Inputs read from stdin at construction carry over to the rebuilt store.
    pub fn refresh_inputs(&mut self, overrides: InputOverrides) -> InputResult<()> {
        self.context_mut()?.refresh(overrides)
    }

    /// Bind `call`, inject inputs for every omitted parameter, then apply
    /// declared defaults.
    fn prepare(
        &mut self,
        name: &str,
        call: CallArgs,
    ) -> InputResult<(MethodBody<T>, BoundArguments)> {
        let class = Arc::clone(&self.class.inner);
        let callable = format!("{}.{}", class.name, name);
        let prepared = class.methods.get(name).ok_or_else(|| {
            InputError::invalid_arguments(&callable, "no such method")
        })?;

        let mut bound = bind_partial(&callable, Arc::clone(prepared.method.signature()), call)?;

        for config in &prepared.injections {
            if bound.is_supplied(&config.parameter_name) {
                continue;
            }
            match self.context_mut()?.resolve(config)? {
                Resolved::Missing => {}
                Resolved::Value(value) => {
                    tracing::debug!(
                        method = %callable,
                        parameter = %config.parameter_name,
                        key = %config.lookup_key(),
                        "Injected input"
                    );
                    bound.inject(config.parameter_name.clone(), value);
                }
            }
        }

        bound.apply_defaults()?;
        Ok((prepared.method.body().clone(), bound))
    }

    /// Call a synchronous method
    pub fn call(&mut self, name: &str, call: CallArgs) -> InputResult<InputValue> {
        let (body, bound) = self.prepare(name, call)?;
        match body {
            MethodBody::Sync(body) => body(&mut self.instance, bound),
            MethodBody::Async(_) => Err(InputError::invalid_arguments(
                bound.callable(),
                "async method must be called with call_async",
            )),
        }
    }

    /// Call a method, returning a future. Binding and injection happen before
    /// this returns; a synchronous body runs immediately and its result is
    /// wrapped in a ready future.
    pub fn call_async<'a>(
        &'a mut self,
        name: &str,
        call: CallArgs,
    ) -> BoxFuture<'a, InputResult<InputValue>> {
        let (body, bound) = match self.prepare(name, call) {
            Ok(prepared) => prepared,
            Err(e) => return Box::pin(future::ready(Err(e))),
        };
        match body {
            MethodBody::Sync(body) => Box::pin(future::ready(body(&mut self.instance, bound))),
            MethodBody::Async(body) => body(&mut self.instance, bound),
        }
    }

    /// Call a synchronous method and read its result as `R`
    pub fn call_as<R: DeserializeOwned>(&mut self, name: &str, call: CallArgs) -> InputResult<R> {
        let value = self.call(name, call)?;
        serde_json::from_value(value.to_json()).map_err(|e| {
            InputError::argument_type(name, std::any::type_name::<R>(), e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inject::Signature;
    use crate::inputs;
    use crate::sources::{MockEnv, MockStdin};

    #[derive(Debug, Default)]
    struct Service {
        calls: usize,
    }

    fn class() -> ClassDef<Service> {
        ClassDef::new("Service", |_, _| Ok(Service::default()))
            .method(Method::new(
                "list_users",
                Signature::new().param("domain"),
                |this: &mut Service, args| {
                    this.calls += 1;
                    Ok(args.value("domain").cloned().unwrap_or_default())
                },
            ))
            .method(Method::new(
                "_hidden",
                Signature::new().param_with_default("domain", "unset"),
                |_, args| Ok(args.value("domain").cloned().unwrap_or_default()),
            ))
    }

    fn options() -> InputOptions {
        InputOptions::new()
            .with_inputs(inputs! { "domain" => "example.com" })
            .from_environment(false)
    }

    fn construct(
        directed: &DirectedClass<Service>,
        call: CallArgs,
    ) -> InputResult<Directed<Service>> {
        directed.construct_with_sources(
            call,
            Arc::new(MockEnv::new()),
            Arc::new(MockStdin::empty()),
        )
    }

    #[test]
    fn test_decorating_twice_is_a_noop() {
        let directed = class().directed_inputs(options()).unwrap();
        let again = directed
            .clone()
            .directed_inputs(InputOptions::new().from_stdin(true))
            .unwrap();
        assert_eq!(again.metadata(), directed.metadata());
        assert!(!again.metadata().options.from_stdin);
    }

    #[test]
    fn test_private_methods_are_not_injected() {
        let directed = class().directed_inputs(options()).unwrap();
        let mut service = construct(&directed, CallArgs::new()).unwrap();

        assert_eq!(
            service.call("list_users", CallArgs::new()).unwrap(),
            InputValue::from("example.com")
        );
        assert_eq!(
            service.call("_hidden", CallArgs::new()).unwrap(),
            InputValue::from("unset")
        );
        assert_eq!(service.inner().calls, 1);
    }

    #[test]
    fn test_adopted_instance_has_no_context() {
        let directed = class().directed_inputs(options()).unwrap();
        let mut adopted = directed.adopt(Service::default());

        let err = adopted.call("list_users", CallArgs::new()).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_CONTEXT_NOT_INITIALIZED");
        assert!(adopted.directed_inputs().is_err());
        assert!(adopted.refresh_inputs(InputOverrides::default()).is_err());
        assert!(adopted.context().is_err());

        assert_eq!(
            adopted.call("list_users", CallArgs::new().arg("x")).unwrap(),
            InputValue::from("x")
        );
    }

    #[test]
    fn test_config_for_unknown_parameter_is_rejected() {
        let class = ClassDef::new("Service", |_, _| Ok(Service::default())).method(
            Method::new("f", Signature::new().param("a"), |_, _| Ok(InputValue::Null))
                .input_config(InputConfig::new("b")),
        );
        let err = class.directed_inputs(InputOptions::new()).unwrap_err();
        assert!(err.to_string().contains("unknown parameter 'b'"));
    }

    #[test]
    fn test_unknown_method() {
        let directed = class().directed_inputs(options()).unwrap();
        let mut service = construct(&directed, CallArgs::new()).unwrap();
        let err = service.call("missing", CallArgs::new()).unwrap_err();
        assert!(matches!(err, InputError::InvalidArguments { .. }));
    }

    #[test]
    fn test_reserved_keyword_is_consumed() {
        let directed = ClassDef::new("Strict", |call: CallArgs, _: &mut InputContext| {
            if call.is_empty() {
                Ok(Service::default())
            } else {
                Err(InputError::invalid_arguments("Strict", "unexpected arguments"))
            }
        })
        .directed_inputs(options())
        .unwrap();

        let call = CallArgs::new().kwarg(
            CONFIG_KWARG,
            InputValue::from(serde_json::json!({"env_prefix": "APP_"})),
        );
        let instance = construct(&directed, call).unwrap();
        assert_eq!(
            instance.context().unwrap().options().env_prefix.as_deref(),
            Some("APP_")
        );
    }

    #[test]
    fn test_runtime_keywords_are_kept_off_the_initializer() {
        let directed = ClassDef::new("Strict", |call: CallArgs, _: &mut InputContext| {
            if call.is_empty() {
                Ok(Service::default())
            } else {
                Err(InputError::invalid_arguments("Strict", "unexpected arguments"))
            }
        })
        .directed_inputs(options())
        .unwrap();

        let call = CallArgs::new()
            .kwarg(RUNTIME_SETTINGS_KWARG, InputValue::from(serde_json::json!({"retries": 3})))
            .kwarg(RUNTIME_LOGGING_KWARG, "deploy-logger");
        let instance = construct(&directed, call).unwrap();
        assert_eq!(
            instance.runtime_settings().map(InputValue::to_json),
            Some(serde_json::json!({"retries": 3}))
        );
        assert_eq!(
            instance.runtime_logging(),
            Some(&InputValue::from("deploy-logger"))
        );

        let plain = construct(&directed, CallArgs::new()).unwrap();
        assert!(plain.runtime_settings().is_none());
        assert!(directed.adopt(Service::default()).runtime_logging().is_none());
    }

    #[test]
    fn test_malformed_overrides_fail_construction() {
        let directed = class().directed_inputs(options()).unwrap();
        let call = CallArgs::new().kwarg(CONFIG_KWARG, "not a mapping");
        let err = construct(&directed, call).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_INVALID_OPTIONS");
    }
}
