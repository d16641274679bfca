//! Construction options and the source loader

use super::env::{EnvSource, StdEnv, filter_environment};
use super::stdin::{StdStdin, StdinSource, read_stdin_inputs};
use crate::coerce::{CoerceType, coerce};
use crate::error::{InputError, InputResult};
use crate::store::InputMap;
use crate::value::InputValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Environment toggle that disables stdin reading regardless of options
pub const OVERRIDE_STDIN_VAR: &str = "OVERRIDE_STDIN";

/// Options controlling where the initial inputs come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputOptions {
    /// Baseline inputs, overridden by every other source
    pub inputs: InputMap,
    pub from_environment: bool,
    pub from_stdin: bool,
    /// Only environment variables starting with this literal prefix are kept
    pub env_prefix: Option<String>,
    pub strip_env_prefix: bool,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            inputs: InputMap::new(),
            from_environment: true,
            from_stdin: false,
            env_prefix: None,
            strip_env_prefix: false,
        }
    }
}

impl InputOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(mut self, inputs: InputMap) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn from_environment(mut self, enabled: bool) -> Self {
        self.from_environment = enabled;
        self
    }

    pub fn from_stdin(mut self, enabled: bool) -> Self {
        self.from_stdin = enabled;
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn strip_env_prefix(mut self, strip: bool) -> Self {
        self.strip_env_prefix = strip;
        self
    }

    /// Layer `overrides` over these options; every present field wins
    pub fn apply(&mut self, overrides: InputOverrides) {
        if let Some(inputs) = overrides.inputs {
            self.inputs = inputs;
        }
        if let Some(enabled) = overrides.from_environment {
            self.from_environment = enabled;
        }
        if let Some(enabled) = overrides.from_stdin {
            self.from_stdin = enabled;
        }
        if let Some(prefix) = overrides.env_prefix {
            self.env_prefix = Some(prefix);
        }
        if let Some(strip) = overrides.strip_env_prefix {
            self.strip_env_prefix = strip;
        }
    }

    /// Copy with `overrides` applied
    pub fn merged(&self, overrides: InputOverrides) -> Self {
        let mut options = self.clone();
        options.apply(overrides);
        options
    }
}

/// Per-instance overrides for [`InputOptions`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputOverrides {
    pub inputs: Option<InputMap>,
    pub from_environment: Option<bool>,
    pub from_stdin: Option<bool>,
    pub env_prefix: Option<String>,
    pub strip_env_prefix: Option<bool>,
}

impl InputOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Read overrides from a mapping-shaped value
    pub fn from_value(value: &InputValue) -> InputResult<Self> {
        match value {
            InputValue::Null => Ok(Self::default()),
            InputValue::Map(_) => serde_json::from_value(value.to_json())
                .map_err(|e| InputError::invalid_options(e.to_string())),
            other => Err(InputError::invalid_options(format!(
                "expected a mapping, got {}",
                other.kind_name()
            ))),
        }
    }
}

/// An input source, in increasing precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Explicit,
    Environment,
    Stdin,
}

/// Builds the initial input mapping from explicit inputs, the environment
/// and stdin.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    env: Arc<dyn EnvSource>,
    stdin: Arc<dyn StdinSource>,
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::process()
    }
}

impl SourceLoader {
    pub fn new(env: Arc<dyn EnvSource>, stdin: Arc<dyn StdinSource>) -> Self {
        Self { env, stdin }
    }

    /// Loader over the real process environment and stdin
    pub fn process() -> Self {
        Self::new(Arc::new(StdEnv), Arc::new(StdStdin))
    }

    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    /// True when the stdin override toggle is set
    pub fn stdin_overridden(&self) -> InputResult<bool> {
        let Some(raw) = self.env.get(OVERRIDE_STDIN_VAR) else {
            return Ok(false);
        };
        match coerce(OVERRIDE_STDIN_VAR, InputValue::Text(raw), CoerceType::Bool)? {
            InputValue::Bool(flag) => Ok(flag),
            _ => Ok(false),
        }
    }

    fn sources(&self, options: &InputOptions) -> InputResult<Vec<InputSource>> {
        let mut sources = vec![InputSource::Explicit];
        if options.from_environment {
            sources.push(InputSource::Environment);
        }
        if options.from_stdin {
            if self.stdin_overridden()? {
                tracing::debug!("Skipping stdin, {} is set", OVERRIDE_STDIN_VAR);
            } else {
                sources.push(InputSource::Stdin);
            }
        }
        Ok(sources)
    }

    fn load_source(
        &self,
        source: InputSource,
        options: &InputOptions,
        stdin: &mut Option<InputResult<InputMap>>,
    ) -> InputResult<InputMap> {
        match source {
            InputSource::Explicit => Ok(options.inputs.clone()),
            InputSource::Environment => Ok(filter_environment(
                self.env.vars(),
                options.env_prefix.as_deref(),
                options.strip_env_prefix,
            )),
            InputSource::Stdin => stdin
                .get_or_insert_with(|| read_stdin_inputs(self.stdin.as_ref()))
                .clone(),
        }
    }

    /// Load and merge every enabled source, later sources winning
    pub fn load(&self, options: &InputOptions) -> InputResult<InputMap> {
        self.load_cached(options, &mut None)
    }

    /// Like [`load`](Self::load), but stdin is read only when `stdin` is
    /// empty. The outcome of that read, error included, is stored there and
    /// replayed by later loads.
    pub fn load_cached(
        &self,
        options: &InputOptions,
        stdin: &mut Option<InputResult<InputMap>>,
    ) -> InputResult<InputMap> {
        let mut inputs = InputMap::new();

        for source in self.sources(options)? {
            let loaded = self.load_source(source, options, stdin)?;
            tracing::debug!(source = ?source, keys = loaded.len(), "Loaded inputs");
            inputs.deep_merge(loaded);
        }

        Ok(inputs)
    }
}
