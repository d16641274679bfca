//! Method signatures

use crate::coerce::CoerceType;
use crate::context::DefaultValue;
use crate::error::{InputError, InputResult};
use crate::value::InputValue;

/// How a parameter may be supplied, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKind {
    PositionalOnly,
    PositionalOrKeyword,
    /// Collects surplus positional arguments
    VarPositional,
    KeywordOnly,
    /// Collects surplus keyword arguments
    VarKeyword,
}

impl ParamKind {
    pub fn is_variadic(self) -> bool {
        matches!(self, Self::VarPositional | Self::VarKeyword)
    }

    pub fn accepts_positional(self) -> bool {
        matches!(self, Self::PositionalOnly | Self::PositionalOrKeyword)
    }

    pub fn accepts_keyword(self) -> bool {
        matches!(self, Self::PositionalOrKeyword | Self::KeywordOnly)
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub default: DefaultValue,
    pub declared_type: Option<CoerceType>,
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::PositionalOrKeyword,
            default: DefaultValue::Unset,
            declared_type: None,
        }
    }

    pub fn with_kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_default(mut self, default: impl Into<InputValue>) -> Self {
        self.default = DefaultValue::Value(default.into());
        self
    }

    pub fn with_type(mut self, declared_type: CoerceType) -> Self {
        self.declared_type = Some(declared_type);
        self
    }
}

/// Ordered parameter list of a method. The receiver is implicit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    params: Vec<Param>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn param(self, name: impl Into<String>) -> Self {
        self.push(Param::new(name))
    }

    pub fn param_with_default(
        self,
        name: impl Into<String>,
        default: impl Into<InputValue>,
    ) -> Self {
        self.push(Param::new(name).with_default(default))
    }

    pub fn typed(self, name: impl Into<String>, declared_type: CoerceType) -> Self {
        self.push(Param::new(name).with_type(declared_type))
    }

    pub fn positional_only(self, name: impl Into<String>) -> Self {
        self.push(Param::new(name).with_kind(ParamKind::PositionalOnly))
    }

    pub fn keyword_only(self, name: impl Into<String>) -> Self {
        self.push(Param::new(name).with_kind(ParamKind::KeywordOnly))
    }

    pub fn keyword_only_with_default(
        self,
        name: impl Into<String>,
        default: impl Into<InputValue>,
    ) -> Self {
        self.push(
            Param::new(name)
                .with_kind(ParamKind::KeywordOnly)
                .with_default(default),
        )
    }

    pub fn var_positional(self, name: impl Into<String>) -> Self {
        self.push(Param::new(name).with_kind(ParamKind::VarPositional))
    }

    pub fn var_keyword(self, name: impl Into<String>) -> Self {
        self.push(Param::new(name).with_kind(ParamKind::VarKeyword))
    }

    pub fn get(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.name == name)
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub(crate) fn find_kind(&self, kind: ParamKind) -> Option<&Param> {
        self.params.iter().find(|param| param.kind == kind)
    }

    /// Check that the parameter list is well formed: unique names, kinds in
    /// declaration order, at most one collector of each kind, no collector
    /// defaults, and no positional parameter without a default after one with
    /// a default.
    pub fn validate(&self, callable: &str) -> InputResult<()> {
        let invalid = |message: String| Err(InputError::invalid_arguments(callable, message));

        let mut previous: Option<ParamKind> = None;
        let mut seen_positional_default = false;

        for (index, param) in self.params.iter().enumerate() {
            if self.params[..index].iter().any(|p| p.name == param.name) {
                return invalid(format!("duplicate parameter '{}'", param.name));
            }

            if let Some(previous) = previous {
                if param.kind < previous {
                    return invalid(format!(
                        "parameter '{}' ({:?}) cannot follow a {:?} parameter",
                        param.name, param.kind, previous
                    ));
                }
                if param.kind == previous && param.kind.is_variadic() {
                    return invalid(format!("more than one {:?} parameter", param.kind));
                }
            }

            if param.kind.is_variadic() && param.default.is_set() {
                return invalid(format!(
                    "variadic parameter '{}' cannot have a default",
                    param.name
                ));
            }

            if param.kind.accepts_positional() {
                if param.default.is_set() {
                    seen_positional_default = true;
                } else if seen_positional_default {
                    return invalid(format!(
                        "parameter '{}' without a default follows a parameter with a default",
                        param.name
                    ));
                }
            }

            previous = Some(param.kind);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_preserves_order() {
        let sig = Signature::new()
            .positional_only("a")
            .param("b")
            .typed("port", CoerceType::Integer)
            .param_with_default("c", 1)
            .var_positional("args")
            .keyword_only("d")
            .var_keyword("kwargs");

        let names: Vec<_> = sig.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "port", "c", "args", "d", "kwargs"]);
        assert_eq!(sig.get("port").unwrap().declared_type, Some(CoerceType::Integer));
        assert!(sig.validate("f").is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_order() {
        let sig = Signature::new().keyword_only("a").param("b");
        assert!(sig.validate("f").is_err());

        let sig = Signature::new().var_keyword("kw").var_keyword("more");
        assert!(sig.validate("f").is_err());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_default_gaps() {
        let sig = Signature::new().param("a").param("a");
        let err = sig.validate("f").unwrap_err();
        assert_eq!(err.error_code(), "INPUT_INVALID_ARGUMENTS");

        let sig = Signature::new().param_with_default("a", 1).param("b");
        assert!(sig.validate("f").is_err());

        let sig = Signature::new()
            .param_with_default("a", 1)
            .keyword_only("b");
        assert!(sig.validate("f").is_ok());
    }
}
