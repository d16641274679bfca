//! Argument binding

use super::signature::{ParamKind, Signature};
use crate::error::{InputError, InputResult};
use crate::value::InputValue;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Caller-supplied arguments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    pub positional: Vec<InputValue>,
    pub keyword: IndexMap<String, InputValue>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<InputValue>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    /// Remove a keyword argument, keeping the order of the rest
    pub fn take_keyword(&mut self, name: &str) -> Option<InputValue> {
        self.keyword.shift_remove(name)
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

/// Arguments bound to a signature
#[derive(Debug, Clone)]
pub struct BoundArguments {
    callable: String,
    signature: Arc<Signature>,
    arguments: IndexMap<String, InputValue>,
    supplied: Vec<String>,
}

/// Bind `call` against `signature` without applying any defaults.
///
/// Positional arguments fill positional parameters in order, with surplus
/// going to the variadic positional collector. Keyword arguments bind by
/// name, with unknown names going to the variadic keyword collector.
pub fn bind_partial(
    callable: &str,
    signature: Arc<Signature>,
    call: CallArgs,
) -> InputResult<BoundArguments> {
    let invalid = |message: String| InputError::invalid_arguments(callable, message);

    let mut arguments: IndexMap<String, InputValue> = IndexMap::new();
    let mut positional = call.positional.into_iter();
    let mut params = signature.params().iter().peekable();

    while let Some(param) = params.peek() {
        if !param.kind.accepts_positional() {
            break;
        }
        match positional.next() {
            Some(value) => {
                arguments.insert(param.name.clone(), value);
                params.next();
            }
            None => break,
        }
    }

    let surplus: Vec<InputValue> = positional.collect();
    if !surplus.is_empty() {
        match signature.find_kind(ParamKind::VarPositional) {
            Some(collector) => {
                arguments.insert(collector.name.clone(), InputValue::List(surplus));
            }
            None => {
                let accepted = signature
                    .params()
                    .iter()
                    .filter(|param| param.kind.accepts_positional())
                    .count();
                return Err(invalid(format!(
                    "takes {} positional arguments but {} were given",
                    accepted,
                    accepted + surplus.len()
                )));
            }
        }
    }

    let var_keyword = signature.find_kind(ParamKind::VarKeyword);
    let mut extra: IndexMap<String, InputValue> = IndexMap::new();

    for (name, value) in call.keyword {
        match signature.get(&name) {
            Some(param) if param.kind.accepts_keyword() => {
                if arguments.contains_key(&name) {
                    return Err(invalid(format!("got multiple values for argument '{}'", name)));
                }
                arguments.insert(name, value);
            }
            Some(param) if param.kind == ParamKind::PositionalOnly && var_keyword.is_none() => {
                return Err(invalid(format!(
                    "got some positional-only arguments passed as keyword arguments: '{}'",
                    name
                )));
            }
            _ if var_keyword.is_some() => {
                extra.insert(name, value);
            }
            _ => {
                return Err(invalid(format!("got an unexpected keyword argument '{}'", name)));
            }
        }
    }

    if let Some(collector) = var_keyword.filter(|_| !extra.is_empty()) {
        arguments.insert(collector.name.clone(), InputValue::Map(extra));
    }

    let supplied = arguments.keys().cloned().collect();
    Ok(BoundArguments {
        callable: callable.to_string(),
        signature,
        arguments,
        supplied,
    })
}

impl BoundArguments {
    pub fn callable(&self) -> &str {
        &self.callable
    }

    /// Whether the caller supplied `name` explicitly
    pub fn is_supplied(&self, name: &str) -> bool {
        self.supplied.iter().any(|supplied| supplied == name)
    }

    /// Whether `name` is bound by any means
    pub fn is_bound(&self, name: &str) -> bool {
        self.arguments.contains_key(name)
    }

    /// Bind an injected value
    pub fn inject(&mut self, name: impl Into<String>, value: InputValue) {
        self.arguments.insert(name.into(), value);
    }

    pub fn value(&self, name: &str) -> Option<&InputValue> {
        self.arguments.get(name)
    }

    /// Read a bound argument as `T`. An unbound name reads as null.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> InputResult<T> {
        let json = self
            .arguments
            .get(name)
            .map(InputValue::to_json)
            .unwrap_or(serde_json::Value::Null);
        serde_json::from_value(json).map_err(|e| {
            InputError::argument_type(name, std::any::type_name::<T>(), e.to_string())
        })
    }

    /// Surplus positional arguments
    pub fn args(&self) -> &[InputValue] {
        match self
            .signature
            .find_kind(ParamKind::VarPositional)
            .and_then(|collector| self.arguments.get(&collector.name))
        {
            Some(InputValue::List(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// Surplus keyword arguments
    pub fn kwargs(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        let extra = match self
            .signature
            .find_kind(ParamKind::VarKeyword)
            .and_then(|collector| self.arguments.get(&collector.name))
        {
            Some(InputValue::Map(map)) => Some(map),
            _ => None,
        };
        extra
            .into_iter()
            .flat_map(|map| map.iter().map(|(key, value)| (key.as_str(), value)))
    }

    /// Bound arguments in signature order
    pub fn arguments(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.arguments.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Fill declared defaults and empty collectors, then order the arguments
    /// by signature.
    ///
    /// Fails when a parameter without a default is still unbound.
    pub fn apply_defaults(&mut self) -> InputResult<()> {
        let mut ordered = IndexMap::with_capacity(self.signature.len());

        for param in self.signature.params() {
            let value = match self.arguments.shift_remove(&param.name) {
                Some(value) => value,
                None => match param.kind {
                    ParamKind::VarPositional => InputValue::List(Vec::new()),
                    ParamKind::VarKeyword => InputValue::Map(IndexMap::new()),
                    _ if param.default.is_set() => param.default.value(),
                    _ => {
                        return Err(InputError::invalid_arguments(
                            &self.callable,
                            format!("missing required argument '{}'", param.name),
                        ));
                    }
                },
            };
            ordered.insert(param.name.clone(), value);
        }

        self.arguments = ordered;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig() -> Arc<Signature> {
        Arc::new(
            Signature::new()
                .param("domain")
                .param_with_default("prefix", "hello")
                .var_positional("rest")
                .keyword_only_with_default("verbose", false),
        )
    }

    #[test]
    fn test_positional_and_keyword_binding() {
        let bound = bind_partial(
            "f",
            sig(),
            CallArgs::new().arg("example.com").kwarg("verbose", true),
        )
        .unwrap();

        assert!(bound.is_supplied("domain"));
        assert!(bound.is_supplied("verbose"));
        assert!(!bound.is_supplied("prefix"));
        assert_eq!(bound.get::<String>("domain").unwrap(), "example.com");
        assert!(bound.get::<bool>("verbose").unwrap());
    }

    #[test]
    fn test_surplus_positionals_are_collected() {
        let call = CallArgs::new().arg("a").arg("b").arg(1).arg(2);
        let bound = bind_partial("f", sig(), call).unwrap();
        assert_eq!(bound.args(), &[InputValue::Integer(1), InputValue::Integer(2)]);
        assert!(bound.is_supplied("rest"));
    }

    #[test]
    fn test_too_many_positionals() {
        let sig = Arc::new(Signature::new().param("a"));
        let err = bind_partial("f", sig, CallArgs::new().arg(1).arg(2)).unwrap_err();
        assert!(err.to_string().contains("takes 1 positional arguments but 2 were given"));
    }

    #[test]
    fn test_duplicate_and_unexpected_keywords() {
        let err = bind_partial("f", sig(), CallArgs::new().arg("a").kwarg("domain", "b"))
            .unwrap_err();
        assert!(err.to_string().contains("multiple values for argument 'domain'"));

        let err = bind_partial("f", sig(), CallArgs::new().kwarg("nope", 1)).unwrap_err();
        assert!(err.to_string().contains("unexpected keyword argument 'nope'"));
    }

    #[test]
    fn test_var_keyword_collects_unknown_names() {
        let sig = Arc::new(Signature::new().positional_only("a").var_keyword("extra"));
        let bound = bind_partial("f", sig, CallArgs::new().arg(1).kwarg("a", 2).kwarg("b", 3))
            .unwrap();
        let extra: Vec<_> = bound.kwargs().map(|(k, _)| k).collect();
        assert_eq!(extra, vec!["a", "b"]);
        assert_eq!(bound.get::<i64>("a").unwrap(), 1);

        let sig = Arc::new(Signature::new().positional_only("a").var_keyword("extra"));
        let bound = bind_partial("f", sig, CallArgs::new().arg(1)).unwrap();
        assert!(!bound.is_bound("extra"));
        assert_eq!(bound.kwargs().count(), 0);
    }

    #[test]
    fn test_positional_only_passed_as_keyword() {
        let sig = Arc::new(Signature::new().positional_only("a"));
        let err = bind_partial("f", sig, CallArgs::new().kwarg("a", 1)).unwrap_err();
        assert!(err.to_string().contains("positional-only"));
    }

    #[test]
    fn test_apply_defaults_fills_and_orders() {
        let mut bound = bind_partial(
            "f",
            sig(),
            CallArgs::new().kwarg("verbose", true).kwarg("domain", "x"),
        )
        .unwrap();
        bound.apply_defaults().unwrap();

        let names: Vec<_> = bound.arguments().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["domain", "prefix", "rest", "verbose"]);
        assert_eq!(bound.get::<String>("prefix").unwrap(), "hello");
        assert!(bound.args().is_empty());
        assert!(bound.kwargs().next().is_none());
    }

    #[test]
    fn test_apply_defaults_reports_missing_argument() {
        let mut bound = bind_partial("f", sig(), CallArgs::new()).unwrap();
        let err = bound.apply_defaults().unwrap_err();
        assert!(err.to_string().contains("missing required argument 'domain'"));
    }

    #[test]
    fn test_get_type_mismatch() {
        let bound = bind_partial("f", sig(), CallArgs::new().arg("text")).unwrap();
        let err = bound.get::<i64>("domain").unwrap_err();
        assert!(matches!(err, InputError::ArgumentType { ref name, .. } if name == "domain"));
        assert_eq!(bound.get::<Option<String>>("prefix").unwrap(), None);
    }
}
