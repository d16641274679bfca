//! Method table entries

use super::binder::BoundArguments;
use super::signature::Signature;
use crate::context::InputConfig;
use crate::error::InputResult;
use crate::value::InputValue;
use futures::future::BoxFuture;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Synchronous method body
pub type SyncBody<T> =
    Arc<dyn Fn(&mut T, BoundArguments) -> InputResult<InputValue> + Send + Sync>;

/// Asynchronous method body
pub type AsyncBody<T> = Arc<
    dyn for<'a> Fn(&'a mut T, BoundArguments) -> BoxFuture<'a, InputResult<InputValue>>
        + Send
        + Sync,
>;

pub enum MethodBody<T> {
    Sync(SyncBody<T>),
    Async(AsyncBody<T>),
}

impl<T> Clone for MethodBody<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(body) => Self::Sync(Arc::clone(body)),
            Self::Async(body) => Self::Async(Arc::clone(body)),
        }
    }
}

impl<T> fmt::Debug for MethodBody<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sync(_) => f.write_str("Sync"),
            Self::Async(_) => f.write_str("Async"),
        }
    }
}

/// What kind of class member a method is. Only instance methods receive
/// injected inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodKind {
    #[default]
    Instance,
    Static,
    Property,
}

/// A named method with its signature, parameter configs and body
pub struct Method<T> {
    name: String,
    signature: Arc<Signature>,
    configs: IndexMap<String, InputConfig>,
    kind: MethodKind,
    body: MethodBody<T>,
}

impl<T> Clone for Method<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            signature: Arc::clone(&self.signature),
            configs: self.configs.clone(),
            kind: self.kind,
            body: self.body.clone(),
        }
    }
}

impl<T> fmt::Debug for Method<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Method")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .field("configs", &self.configs)
            .field("kind", &self.kind)
            .field("body", &self.body)
            .finish()
    }
}

impl<T> Method<T> {
    pub fn new<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&mut T, BoundArguments) -> InputResult<InputValue> + Send + Sync + 'static,
    {
        Self::with_body(name, signature, MethodBody::Sync(Arc::new(body)))
    }

    pub fn new_async<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: for<'a> Fn(&'a mut T, BoundArguments) -> BoxFuture<'a, InputResult<InputValue>>
            + Send
            + Sync
            + 'static,
    {
        Self::with_body(name, signature, MethodBody::Async(Arc::new(body)))
    }

    fn with_body(name: impl Into<String>, signature: Signature, body: MethodBody<T>) -> Self {
        Self {
            name: name.into(),
            signature: Arc::new(signature),
            configs: IndexMap::new(),
            kind: MethodKind::Instance,
            body,
        }
    }

    /// Attach resolution config for one parameter, replacing any earlier one
    pub fn input_config(mut self, config: InputConfig) -> Self {
        self.configs.insert(config.parameter_name.clone(), config);
        self
    }

    pub fn kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Arc<Signature> {
        &self.signature
    }

    pub fn configs(&self) -> &IndexMap<String, InputConfig> {
        &self.configs
    }

    pub fn method_kind(&self) -> MethodKind {
        self.kind
    }

    pub fn body(&self) -> &MethodBody<T> {
        &self.body
    }

    pub fn is_async(&self) -> bool {
        matches!(self.body, MethodBody::Async(_))
    }

    /// Public instance methods receive injected inputs
    pub fn is_injectable(&self) -> bool {
        self.kind == MethodKind::Instance && !self.name.starts_with('_')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;

    struct Counter;

    fn noop() -> Method<Counter> {
        Method::new("noop", Signature::new(), |_, _| Ok(InputValue::Null))
    }

    #[test]
    fn test_injectable() {
        assert!(noop().is_injectable());
        assert!(!noop().kind(MethodKind::Static).is_injectable());
        assert!(!noop().kind(MethodKind::Property).is_injectable());

        let private: Method<Counter> =
            Method::new("_private", Signature::new(), |_, _| Ok(InputValue::Null));
        assert!(!private.is_injectable());
    }

    #[test]
    fn test_input_config_replaces_by_parameter() {
        let method = noop()
            .input_config(InputConfig::new("key").required())
            .input_config(InputConfig::new("key").source("API_KEY"));
        assert_eq!(method.configs().len(), 1);
        assert!(!method.configs()["key"].required);
    }

    #[test]
    fn test_async_body() {
        let method: Method<Counter> = Method::new_async("later", Signature::new(), |_, _| {
            Box::pin(async { Ok::<_, InputError>(InputValue::Bool(true)) })
        });
        assert!(method.is_async());
        assert!(!noop().is_async());
    }
}
