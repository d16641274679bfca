//! Lazily materialized input context

use super::config::InputConfig;
use crate::coerce::coerce;
use crate::error::InputResult;
use crate::sources::{EnvSource, InputOptions, InputOverrides, SourceLoader, StdinSource};
use crate::store::{DecodeInput, GetInput, InputMap, InputStore};
use crate::value::InputValue;
use std::sync::Arc;

/// Outcome of resolving one parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Nothing found and nothing configured; the callable's own default applies
    Missing,
    Value(InputValue),
}

impl Resolved {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn into_value(self) -> Option<InputValue> {
        match self {
            Self::Missing => None,
            Self::Value(value) => Some(value),
        }
    }
}

/// Construction options plus the store built from them on first use
#[derive(Debug, Clone)]
pub struct InputContext {
    options: InputOptions,
    loader: SourceLoader,
    store: Option<InputStore>,
    /// Outcome of the single stdin read, replayed whenever the store is rebuilt
    stdin: Option<InputResult<InputMap>>,
}

impl InputContext {
    /// Context over the real process environment and stdin
    pub fn new(options: InputOptions) -> Self {
        Self::with_loader(options, SourceLoader::process())
    }

    pub fn with_sources(
        options: InputOptions,
        env: Arc<dyn EnvSource>,
        stdin: Arc<dyn StdinSource>,
    ) -> Self {
        Self::with_loader(options, SourceLoader::new(env, stdin))
    }

    pub fn with_loader(options: InputOptions, loader: SourceLoader) -> Self {
        Self {
            options,
            loader,
            store: None,
            stdin: None,
        }
    }

    /// Copy of the current options
    pub fn options(&self) -> InputOptions {
        self.options.clone()
    }

    pub fn is_materialized(&self) -> bool {
        self.store.is_some()
    }

    /// Layer `overrides` onto the options and drop the materialized store.
    ///
    /// When the new options enable stdin and it has not been read yet, the
    /// store is rebuilt right away so stdin is consumed here rather than on
    /// some later lookup.
    pub fn refresh(&mut self, overrides: InputOverrides) -> InputResult<()> {
        self.options.apply(overrides);
        self.store = None;
        tracing::debug!("Refreshed input context");

        if self.options.from_stdin && self.stdin.is_none() {
            self.directed_inputs()?;
        }
        Ok(())
    }

    /// The store, loading it from the sources if needed
    pub fn directed_inputs(&mut self) -> InputResult<&mut InputStore> {
        let store = match self.store.take() {
            Some(store) => store,
            None => {
                let inputs = self.loader.load_cached(&self.options, &mut self.stdin)?;
                tracing::debug!(keys = inputs.len(), "Materialized input store");
                InputStore::new(inputs)
            }
        };
        Ok(self.store.insert(store))
    }

    /// Resolve one parameter.
    ///
    /// Yields [`Resolved::Missing`] only when no candidate key is present, no
    /// default is configured and the parameter is not required.
    pub fn resolve(&mut self, config: &InputConfig) -> InputResult<Resolved> {
        let store = self.directed_inputs()?;
        let key = config.select_key(store.inputs()).to_string();
        let source_present = store.inputs().contains_key(&key);
        let default = config.default.value();

        let value = if config.decode.is_empty() {
            let options = GetInput {
                default,
                required: config.required,
                coerce: config.coerce,
            };
            store.get_input(&key, &options)?
        } else {
            let options = DecodeInput {
                default,
                required: config.required,
                flags: config.decode,
                allow_none: config.allow_none,
            };
            let decoded = store.decode_input(&key, &options)?;
            match config.coerce {
                Some(target) => coerce(&key, decoded, target)?,
                None => decoded,
            }
        };

        if value.is_null() && !source_present && !config.default.is_set() && !config.required {
            tracing::trace!(parameter = %config.parameter_name, key = %key, "Input missing");
            return Ok(Resolved::Missing);
        }

        tracing::trace!(parameter = %config.parameter_name, key = %key, "Resolved input");
        Ok(Resolved::Value(value))
    }
}
