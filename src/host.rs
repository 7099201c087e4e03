//! Host integration surface
//!
//! Hosts expose functions and property bags to evaluated expressions by
//! implementing these traits and binding the values into a [`Context`].
//!
//! [`Context`]: crate::runtime::Context

use std::collections::HashMap;

use crate::error::Result;
use crate::runtime::Value;

/// A host function callable from expressions
pub trait Callable: Send + Sync {
    /// Callable name, used in error messages and display
    fn name(&self) -> &str;

    /// Invokes the callable with positional and keyword arguments
    fn call(&self, args: &[Value], kwargs: &HashMap<String, Value>) -> Result<Value>;

    /// Required number of positional arguments
    fn arity(&self) -> Option<usize> {
        None // None means variadic
    }
}

/// A host object exposing named properties to expressions
pub trait Object: Send + Sync {
    /// Type name, used in error messages and display
    fn type_name(&self) -> &str;

    /// Looks up a property; `None` means the property does not exist
    fn attr(&self, name: &str) -> Option<Value>;
}

/// Wraps a closure as a [`Callable`]
///
/// ```
/// use pybble::{NativeFunction, Value};
///
/// let double = NativeFunction::new("double", |args, _kwargs| {
///     Ok(Value::Number(args[0].as_number()? * 2.0))
/// });
/// ```
pub struct NativeFunction {
    name: String,
    arity: Option<usize>,
    func: Box<dyn Fn(&[Value], &HashMap<String, Value>) -> Result<Value> + Send + Sync>,
}

impl NativeFunction {
    /// Creates a variadic native function
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value], &HashMap<String, Value>) -> Result<Value> + Send + Sync + 'static,
    {
        NativeFunction {
            name: name.into(),
            arity: None,
            func: Box::new(func),
        }
    }

    /// Creates a native function with a fixed positional arity
    pub fn with_arity<F>(name: impl Into<String>, arity: usize, func: F) -> Self
    where
        F: Fn(&[Value], &HashMap<String, Value>) -> Result<Value> + Send + Sync + 'static,
    {
        NativeFunction {
            name: name.into(),
            arity: Some(arity),
            func: Box::new(func),
        }
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&self, args: &[Value], kwargs: &HashMap<String, Value>) -> Result<Value> {
        (self.func)(args, kwargs)
    }

    fn arity(&self) -> Option<usize> {
        self.arity
    }
}
