//! Per-parameter resolution configuration

use crate::coerce::{CoerceType, DecodeFlags};
use crate::inject::{Param, ParamKind};
use crate::store::InputMap;
use crate::value::InputValue;

/// A configured default, distinguishing "no default" from an explicit null
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DefaultValue {
    #[default]
    Unset,
    Value(InputValue),
}

impl DefaultValue {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// The default as a value; unset reads as null
    pub fn value(&self) -> InputValue {
        match self {
            Self::Unset => InputValue::Null,
            Self::Value(value) => value.clone(),
        }
    }
}

/// How one method parameter is resolved from inputs
#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    pub parameter_name: String,
    /// Input key to read instead of the parameter name
    pub source_name: Option<String>,
    /// Fallback keys probed in order when the primary key is absent
    pub aliases: Vec<String>,
    pub required: bool,
    pub default: DefaultValue,
    pub decode: DecodeFlags,
    pub allow_none: bool,
    pub coerce: Option<CoerceType>,
}

impl InputConfig {
    pub fn new(parameter_name: impl Into<String>) -> Self {
        Self {
            parameter_name: parameter_name.into(),
            source_name: None,
            aliases: Vec::new(),
            required: false,
            default: DefaultValue::Unset,
            decode: DecodeFlags::default(),
            allow_none: true,
            coerce: None,
        }
    }

    /// Config derived from a signature parameter: required when there is no
    /// declared default, coerced to the declared type.
    pub fn from_param(param: &Param) -> Self {
        let variadic = matches!(param.kind, ParamKind::VarPositional | ParamKind::VarKeyword);
        Self {
            required: !param.default.is_set() && !variadic,
            coerce: param.declared_type,
            ..Self::new(param.name.clone())
        }
    }

    pub fn source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, default: impl Into<InputValue>) -> Self {
        self.default = DefaultValue::Value(default.into());
        self
    }

    pub fn json(mut self) -> Self {
        self.decode.json = true;
        self
    }

    pub fn yaml(mut self) -> Self {
        self.decode.yaml = true;
        self
    }

    pub fn base64(mut self) -> Self {
        self.decode.base64 = true;
        self
    }

    pub fn allow_none(mut self, allow_none: bool) -> Self {
        self.allow_none = allow_none;
        self
    }

    pub fn coerce(mut self, target: CoerceType) -> Self {
        self.coerce = Some(target);
        self
    }

    pub fn bool(self) -> Self {
        self.coerce(CoerceType::Bool)
    }

    pub fn integer(self) -> Self {
        self.coerce(CoerceType::Integer)
    }

    pub fn float(self) -> Self {
        self.coerce(CoerceType::Float)
    }

    pub fn path(self) -> Self {
        self.coerce(CoerceType::Path)
    }

    pub fn datetime(self) -> Self {
        self.coerce(CoerceType::Timestamp)
    }

    /// Source name if set, otherwise the parameter name
    pub fn lookup_key(&self) -> &str {
        self.source_name.as_deref().unwrap_or(&self.parameter_name)
    }

    /// Every key this config may read from, in probe order
    pub fn candidate_keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.lookup_key()).chain(self.aliases.iter().map(String::as_str))
    }

    /// The first candidate key present in `inputs`, or the primary key
    pub fn select_key<'a>(&'a self, inputs: &InputMap) -> &'a str {
        self.candidate_keys()
            .find(|key| inputs.contains_key(key))
            .unwrap_or_else(|| self.lookup_key())
    }
}
