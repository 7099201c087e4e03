use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::runtime::Value;

/// Variable bindings for expression evaluation
///
/// A context is a single flat namespace: expressions read names out of it
/// and assignment writes names back into it. Hosts seed it before
/// evaluating and inspect it afterwards.
#[derive(Debug, Clone)]
pub struct Context {
    /// Variables visible to the expression
    variables: HashMap<String, Value>,
}

impl Context {
    /// Creates an empty context
    pub fn new() -> Self {
        Context {
            variables: HashMap::new(),
        }
    }

    /// Adds a binding, builder style
    ///
    /// ```
    /// use pybble::{Context, Value};
    ///
    /// let ctx = Context::new().with("x", 2.0).with("name", "alice");
    /// assert_eq!(ctx.get("x").unwrap(), Value::Number(2.0));
    /// ```
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Gets the value bound to a name
    pub fn get(&self, name: &str) -> Result<Value> {
        self.variables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::NameError {
                name: name.to_string(),
            })
    }

    /// Binds a name, replacing any previous value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Removes a binding, returning its value if it existed
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.variables.remove(name)
    }

    /// Checks whether a name is bound
    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// True when no names are bound
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Iterates over all bindings
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.variables.iter()
    }

    /// All bound names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.variables.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HashMap<String, Value>> for Context {
    fn from(variables: HashMap<String, Value>) -> Self {
        Context { variables }
    }
}

impl FromIterator<(String, Value)> for Context {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Context {
            variables: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_set_and_get() {
        let mut ctx = Context::new();
        ctx.set("x", 42.0);

        let val = ctx.get("x").unwrap();
        assert_eq!(val, Value::Number(42.0));
    }

    #[test]
    fn test_undefined_name() {
        let ctx = Context::new();
        let err = ctx.get("undefined").unwrap_err();
        assert!(err.to_string().contains("undefined"));
    }

    #[test]
    fn test_builder() {
        let ctx = Context::new()
            .with("x", 1.0)
            .with("flag", true)
            .with("name", "bob");

        assert_eq!(ctx.get("x").unwrap(), Value::Number(1.0));
        assert_eq!(ctx.get("flag").unwrap(), Value::Bool(true));
        assert_eq!(ctx.get("name").unwrap(), Value::Str("bob".to_string()));
        assert_eq!(ctx.len(), 3);
    }

    #[test]
    fn test_overwrite() {
        let mut ctx = Context::new();
        ctx.set("x", 1.0);
        ctx.set("x", 2.0);
        assert_eq!(ctx.get("x").unwrap(), Value::Number(2.0));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_contains_and_remove() {
        let mut ctx = Context::new().with("x", 1.0);
        assert!(ctx.contains("x"));
        assert!(!ctx.contains("y"));

        assert_eq!(ctx.remove("x"), Some(Value::Number(1.0)));
        assert!(!ctx.contains("x"));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_from_map() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), Value::Number(1.0));
        map.insert("b".to_string(), Value::Number(2.0));

        let ctx = Context::from(map);
        assert_eq!(ctx.len(), 2);
        assert_eq!(ctx.names(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_collect() {
        let ctx: Context = [
            ("x".to_string(), Value::Number(1.0)),
            ("y".to_string(), Value::Number(2.0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(ctx.get("y").unwrap(), Value::Number(2.0));
    }
}
