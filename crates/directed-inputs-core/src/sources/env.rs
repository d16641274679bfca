//! Environment variable source

use crate::store::InputMap;
use indexmap::IndexMap;
use std::fmt;

/// Abstracts over where environment variables come from.
pub trait EnvSource: fmt::Debug + Send + Sync {
    /// Get the value of a variable by exact name
    fn get(&self, name: &str) -> Option<String>;

    /// Iterate over all variables
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        // vars_os skips the panic std::env::vars raises on non-UTF-8 entries
        Box::new(std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }
}

/// In-memory environment
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: IndexMap<String, String>,
}

impl MockEnv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvSource for MockEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(self.vars.iter().map(|(key, value)| (key.clone(), value.clone())))
    }
}

/// Collect environment variables into an input map.
///
/// With a prefix, only variables starting with that literal prefix are kept,
/// and `strip_prefix` removes it from the key. Without a prefix every variable
/// is kept as-is.
pub fn filter_environment<I>(vars: I, prefix: Option<&str>, strip_prefix: bool) -> InputMap
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut inputs = InputMap::new();

    for (key, value) in vars {
        let key = match prefix {
            None => key,
            Some(prefix) if !key.starts_with(prefix) => continue,
            Some(prefix) if strip_prefix => key[prefix.len()..].to_string(),
            Some(_) => key,
        };
        if key.is_empty() {
            continue;
        }
        inputs.insert(key, value);
    }

    inputs
}
