use std::collections::BTreeMap;

/// Identifier-to-value mapping with functional update. Lookups take a
/// per-call default, so the map itself never stores one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Env<T> {
    map: BTreeMap<String, T>,
}

impl<T> Default for Env<T> {
    fn default() -> Self {
        Env { map: BTreeMap::new() }
    }
}

impl<T: Clone> Env<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.map.get(id)
    }

    pub fn lookup(&self, id: &str, default: T) -> T {
        self.map.get(id).cloned().unwrap_or(default)
    }

    /// Functional update: returns the extended environment, leaving `self`
    /// untouched.
    pub fn with(&self, id: &str, value: T) -> Self {
        let mut map = self.map.clone();
        map.insert(id.to_string(), value);
        Env { map }
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
