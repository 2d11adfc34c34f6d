use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Variable assignments reported by the recognizer, sent back with every
/// submission so later drawings can reference them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolBindings {
    values: HashMap<String, String>,
}

impl SymbolBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value previously bound to `name`, if any.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.values
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SymbolBindings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        for (k, v) in iter {
            bindings.bind(k, v);
        }
        bindings
    }
}
