//! Case-insensitive input mapping with deep-merge semantics

use crate::value::InputValue;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Canonical form of a top-level key
fn canonical(key: &str) -> String {
    key.to_lowercase()
}

/// Ordered mapping from case-insensitive key to [`InputValue`].
///
/// Keys are lowercased on insert, lookup and removal, so `API_KEY` and
/// `api_key` name the same entry. Nested maps keep their keys verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputMap {
    entries: IndexMap<String, InputValue>,
}

impl InputMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.entries.get(&canonical(key))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&canonical(key))
    }

    /// Insert a value, returning the one it replaced
    pub fn insert(
        &mut self,
        key: impl AsRef<str>,
        value: impl Into<InputValue>,
    ) -> Option<InputValue> {
        self.entries.insert(canonical(key.as_ref()), value.into())
    }

    /// Remove a key, preserving the order of the remaining entries
    pub fn remove(&mut self, key: &str) -> Option<InputValue> {
        self.entries.shift_remove(&canonical(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Canonical keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &InputValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Deep-merge `incoming` into this map.
    ///
    /// Lists append, maps merge key by key, sets union; for any other
    /// combination the incoming value overrides.
    pub fn deep_merge(&mut self, incoming: InputMap) {
        for (key, value) in incoming.entries {
            match self.entries.get_mut(&key) {
                Some(existing) => {
                    let base = std::mem::take(existing);
                    *existing = merge_values(base, value);
                }
                None => {
                    self.entries.insert(key, value);
                }
            }
        }
    }

    /// Deep-merge into a copy, leaving `self` untouched
    pub fn merged(&self, incoming: &InputMap) -> InputMap {
        let mut result = self.clone();
        result.deep_merge(incoming.clone());
        result
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.entries
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    pub fn from_json_object(object: serde_json::Map<String, serde_json::Value>) -> Self {
        object
            .into_iter()
            .map(|(key, value)| (key, InputValue::from(value)))
            .collect()
    }
}

/// Merge two values: incoming wins unless both sides are the same kind of
/// collection.
pub fn merge_values(base: InputValue, incoming: InputValue) -> InputValue {
    match (base, incoming) {
        (InputValue::List(mut base), InputValue::List(incoming)) => {
            base.extend(incoming);
            InputValue::List(base)
        }
        (InputValue::Map(mut base), InputValue::Map(incoming)) => {
            for (key, value) in incoming {
                match base.get_mut(&key) {
                    Some(existing) => {
                        let old = std::mem::take(existing);
                        *existing = merge_values(old, value);
                    }
                    None => {
                        base.insert(key, value);
                    }
                }
            }
            InputValue::Map(base)
        }
        (InputValue::Set(mut base), InputValue::Set(incoming)) => {
            for member in incoming {
                if !base.contains(&member) {
                    base.push(member);
                }
            }
            InputValue::Set(base)
        }
        (_, incoming) => incoming,
    }
}

impl<K, V> FromIterator<(K, V)> for InputMap
where
    K: AsRef<str>,
    V: Into<InputValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = InputMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl IntoIterator for InputMap {
    type Item = (String, InputValue);
    type IntoIter = indexmap::map::IntoIter<String, InputValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<IndexMap<String, InputValue>> for InputMap {
    fn from(entries: IndexMap<String, InputValue>) -> Self {
        entries.into_iter().collect()
    }
}

impl Serialize for InputMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InputMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IndexMap::<String, InputValue>::deserialize(deserializer).map(InputMap::from)
    }
}

/// Build an [`InputMap`] from `key => value` pairs.
///
/// ```
/// use directed_inputs_core::inputs;
///
/// let map = inputs! { "domain" => "example.com", "PORT" => 8080 };
/// assert_eq!(map.get("port").and_then(|v| v.as_i64()), Some(8080));
/// ```
#[macro_export]
macro_rules! inputs {
    () => {
        $crate::InputMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::InputMap::new();
        $( map.insert($key, $value); )+
        map
    }};
}
