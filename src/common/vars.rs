//! JSON-backed variable maps passed between stages.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// JSON object wrapper used for stage outputs and per-workflow result maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Vars(Map<String, Value>);

#[allow(unused)]
impl Vars {
    /// create an empty map
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// insert or replace a key
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) {
        self.0.insert(key.into(), value.into());
    }

    /// get a key, decoded into `T`
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<T> {
        self.0.get(key).cloned().and_then(|v| serde_json::from_value(v).ok())
    }

    /// check whether a key is present
    pub fn contains(
        &self,
        key: &str,
    ) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// iterate over the entries
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Value> for Vars {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }
}

impl From<Vars> for Value {
    fn from(vars: Vars) -> Self {
        Value::Object(vars.0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut vars = Vars::new();
        vars.set("count", 42);
        vars.set("name", "launch");

        assert_eq!(vars.get::<i64>("count"), Some(42));
        assert_eq!(vars.get::<String>("name"), Some("launch".to_string()));
        assert_eq!(vars.get::<String>("missing"), None);
    }

    #[test]
    fn test_value_round_trip() {
        let mut vars = Vars::new();
        vars.set("data", json!({"headline": "New product"}));

        let value: Value = vars.clone().into();
        assert_eq!(Vars::from(value), vars);
    }

    #[test]
    fn test_non_object_value_becomes_empty() {
        assert!(Vars::from(json!(["a", "b"])).is_empty());
    }
}
