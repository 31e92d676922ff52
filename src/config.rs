use crate::error::MorphError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shared configuration context mapping parameter name to scalar value.
///
/// One `MorphConfig` is shared by every morph in a chain and is the single
/// source of truth for parameter values: a morph reads its declared
/// parameters from here on every invocation and never keeps a private copy.
/// Morphs publish derived values (such as auto-widened grid bounds) by
/// writing them back, which makes them visible to downstream morphs and to
/// the refiner.
///
/// An absent key means the parameter is unset.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MorphConfig {
    values: BTreeMap<String, f64>,
}

impl MorphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of a parameter, `None` when unset.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value of a parameter that `morph` cannot work without.
    pub fn require(&self, name: &str, morph: &'static str) -> Result<f64, MorphError> {
        self.get(name).ok_or_else(|| MorphError::MissingParameter {
            name: name.into(),
            morph,
        })
    }

    pub fn set(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn unset(&mut self, name: &str) -> Option<f64> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn update(&mut self, pairs: impl IntoIterator<Item = (String, f64)>) {
        self.values.extend(pairs);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(name, &value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set() {
        let mut config = MorphConfig::new();
        assert_eq!(config.get("scale"), None);
        config.set("scale", 1.5);
        assert_eq!(config.get("scale"), Some(1.5));
        config.set("scale", 2.0);
        assert_eq!(config.get("scale"), Some(2.0));
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn require_missing() {
        let config = MorphConfig::new();
        let err = config.require("smear", "Smear morph by desired amount");
        assert_eq!(
            err,
            Err(MorphError::MissingParameter {
                name: "smear".into(),
                morph: "Smear morph by desired amount",
            })
        );
    }

    #[test]
    fn update_overwrites() {
        let mut config = MorphConfig::new();
        config.set("scale", 1.0);
        config.update([("scale".to_string(), 3.0), ("stretch".to_string(), 0.1)]);
        assert_eq!(config.get("scale"), Some(3.0));
        assert_eq!(config.get("stretch"), Some(0.1));
    }

    #[test]
    fn serde_round_trip() {
        let mut config = MorphConfig::new();
        config.set("scale", 3.0);
        config.set("rmin", 0.01);
        let json = serde_json::to_string(&config).unwrap();
        let restored: MorphConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
