use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::host::{Callable, Object};
use crate::parser::DictKey;

/// Runtime value representation
///
/// All numbers are doubles. Containers are reference-counted, so cloning a
/// value out of the engine is cheap and identity (`is`) is observable.
#[derive(Clone)]
pub enum Value {
    // Primitives
    /// The `None` value
    None,
    /// Boolean value
    Bool(bool),
    /// Numeric value (64-bit float)
    Number(f64),
    /// String value
    Str(String),

    // Collections (reference-counted)
    /// List of values
    List(Arc<Vec<Value>>),
    /// Tuple of values; same shape as a list, distinguished by origin
    Tuple(Arc<Vec<Value>>),
    /// Dictionary with string or number keys
    Dict(Arc<HashMap<Key, Value>>),

    // Host values
    /// Host-provided function
    Callable(Arc<dyn Callable>),
    /// Host-provided property bag
    Object(Arc<dyn Object>),
}

/// Dictionary key: a string or a number
///
/// Number keys hash and compare by a normalized bit pattern, so `-0.0` and
/// `0.0` are the same key and booleans can index as `1` and `0`.
#[derive(Debug, Clone)]
pub enum Key {
    /// String key
    Str(String),
    /// Number key
    Number(f64),
}

/// Folds the two IEEE zeros into one key value
fn normalized(n: f64) -> f64 {
    if n == 0.0 {
        0.0
    } else {
        n
    }
}

impl Key {
    /// Builds a key from a runtime value; booleans coerce to their number
    pub fn from_value(value: &Value) -> Result<Key> {
        match value {
            Value::Str(s) => Ok(Key::Str(s.clone())),
            Value::Number(n) => Ok(Key::Number(*n)),
            Value::Bool(b) => Ok(Key::Number(if *b { 1.0 } else { 0.0 })),
            _ => Err(Error::TypeError {
                expected: "a string or number key".to_string(),
                got: value.type_name(),
            }),
        }
    }

    /// The key as a runtime value (used by `keys()` and `items()`)
    pub fn to_value(&self) -> Value {
        match self {
            Key::Str(s) => Value::Str(s.clone()),
            Key::Number(n) => Value::Number(*n),
        }
    }

    /// The key rendered as a JSON object key
    pub fn json_key(&self) -> String {
        match self {
            Key::Str(s) => s.clone(),
            Key::Number(n) => format!("{}", n),
        }
    }
}

impl From<&DictKey> for Key {
    fn from(key: &DictKey) -> Self {
        match key {
            DictKey::Str(s) => Key::Str(s.clone()),
            DictKey::Number(n) => Key::Number(*n),
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Str(a), Key::Str(b)) => a == b,
            (Key::Number(a), Key::Number(b)) => {
                normalized(*a).to_bits() == normalized(*b).to_bits()
            }
            _ => false,
        }
    }
}

impl Eq for Key {}

impl std::hash::Hash for Key {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Str(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Key::Number(n) => {
                1u8.hash(state);
                normalized(*n).to_bits().hash(state);
            }
        }
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Key::Number(a), Key::Number(b)) => normalized(*a).total_cmp(&normalized(*b)),
            (Key::Str(a), Key::Str(b)) => a.cmp(b),
            // number keys sort before string keys, mirroring the value ranks
            (Key::Number(_), Key::Str(_)) => Ordering::Less,
            (Key::Str(_), Key::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Key::Str(s) => write!(f, "'{}'", s),
            Key::Number(n) => write!(f, "{}", n),
        }
    }
}

impl Value {
    /// Creates a list value from a vector of values
    pub fn list(values: Vec<Value>) -> Self {
        Value::List(Arc::new(values))
    }

    /// Creates a tuple value from a vector of values
    pub fn tuple(values: Vec<Value>) -> Self {
        Value::Tuple(Arc::new(values))
    }

    /// Creates a dictionary value from a map of entries
    pub fn dict(entries: HashMap<Key, Value>) -> Self {
        Value::Dict(Arc::new(entries))
    }

    /// Wraps a host callable as a value
    pub fn callable(callable: impl Callable + 'static) -> Self {
        Value::Callable(Arc::new(callable))
    }

    /// Wraps a host object as a value
    pub fn object(object: impl Object + 'static) -> Self {
        Value::Object(Arc::new(object))
    }

    /// Returns the type name as a string
    pub fn type_name(&self) -> String {
        match self {
            Value::None => "none".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Number(_) => "number".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Tuple(_) => "tuple".to_string(),
            Value::Dict(_) => "dict".to_string(),
            Value::Callable(_) => "callable".to_string(),
            Value::Object(o) => o.type_name().to_string(),
        }
    }

    /// Returns true if the value is truthy in a boolean context
    ///
    /// `None`, `False`, `0`, the empty string, and empty containers are
    /// falsy; everything else, including every host value, is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Dict(entries) => !entries.is_empty(),
            Value::Callable(_) => true,
            Value::Object(_) => true,
        }
    }

    /// True when the value is the floating-point NaN
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Number(n) if n.is_nan())
    }

    // Type conversion methods

    /// Converts value to a number; booleans count as 1 and 0
    pub fn as_number(&self) -> Result<f64> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            _ => Err(Error::TypeError {
                expected: "a number".to_string(),
                got: self.type_name(),
            }),
        }
    }

    /// Converts value to an integer for indexing and bitwise operations
    ///
    /// Fractional numbers are rejected rather than truncated.
    pub fn as_int(&self) -> Result<i64> {
        match self {
            Value::Number(n) if n.fract() == 0.0 => Ok(*n as i64),
            Value::Bool(b) => Ok(if *b { 1 } else { 0 }),
            _ => Err(Error::TypeError {
                expected: "an integer".to_string(),
                got: self.type_name(),
            }),
        }
    }

    /// Returns a reference to the string value
    pub fn as_str(&self) -> Result<&str> {
        match self {
            Value::Str(s) => Ok(s),
            _ => Err(Error::TypeError {
                expected: "a string".to_string(),
                got: self.type_name(),
            }),
        }
    }

    /// Returns a reference to the dictionary entries
    pub fn as_dict(&self) -> Result<&HashMap<Key, Value>> {
        match self {
            Value::Dict(entries) => Ok(entries),
            _ => Err(Error::TypeError {
                expected: "a dict".to_string(),
                got: self.type_name(),
            }),
        }
    }

    /// Sequence elements, when the value is a list or tuple
    fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Rank in the cross-type order; host values have no rank
    fn rank(&self) -> Option<u8> {
        match self {
            Value::None => Some(0),
            Value::Bool(_) | Value::Number(_) => Some(1),
            Value::Str(_) => Some(2),
            Value::Dict(_) => Some(3),
            Value::List(_) | Value::Tuple(_) => Some(4),
            Value::Callable(_) | Value::Object(_) => None,
        }
    }

    /// Language-level equality, used by `==` and membership tests
    ///
    /// Numbers and booleans equate numerically (`0 == False`), lists and
    /// tuples equate elementwise regardless of which they are, and host
    /// values equate by identity. Never fails.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, va)| b.get(key).is_some_and(|vb| va.equals(vb)))
            }
            _ => {
                if let (Ok(x), Ok(y)) = (self.as_number(), other.as_number()) {
                    return x == y;
                }
                match (self.as_items(), other.as_items()) {
                    (Some(a), Some(b)) => {
                        a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.equals(y))
                    }
                    _ => false,
                }
            }
        }
    }

    /// Total cross-type ordering, used by `<`, `<=`, `>`, `>=`
    ///
    /// Values order by rank first: `None` < numbers and booleans < strings <
    /// dictionaries < lists and tuples. Within a rank: numerically,
    /// lexicographically, by length then sorted entries, or elementwise.
    /// Host values cannot be ordered.
    pub fn compare(&self, other: &Value) -> Result<Ordering> {
        let (ra, rb) = match (self.rank(), other.rank()) {
            (Some(ra), Some(rb)) => (ra, rb),
            _ => {
                return Err(Error::InvalidComparison {
                    left_type: self.type_name(),
                    right_type: other.type_name(),
                })
            }
        };
        if ra != rb {
            return Ok(ra.cmp(&rb));
        }

        match (self, other) {
            (Value::None, Value::None) => Ok(Ordering::Equal),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (
                Value::Number(_) | Value::Bool(_),
                Value::Number(_) | Value::Bool(_),
            ) => {
                let x = self.as_number()?;
                let y = other.as_number()?;
                Ok(x.total_cmp(&y))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                let by_len = a.len().cmp(&b.len());
                if by_len != Ordering::Equal {
                    return Ok(by_len);
                }
                let mut left: Vec<_> = a.iter().collect();
                let mut right: Vec<_> = b.iter().collect();
                left.sort_by(|(ka, _), (kb, _)| ka.cmp(kb));
                right.sort_by(|(ka, _), (kb, _)| ka.cmp(kb));
                for ((ka, va), (kb, vb)) in left.into_iter().zip(right) {
                    let by_key = ka.cmp(kb);
                    if by_key != Ordering::Equal {
                        return Ok(by_key);
                    }
                    let by_value = va.compare(vb)?;
                    if by_value != Ordering::Equal {
                        return Ok(by_value);
                    }
                }
                Ok(Ordering::Equal)
            }
            (
                Value::List(a) | Value::Tuple(a),
                Value::List(b) | Value::Tuple(b),
            ) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.compare(y)?;
                    if ord != Ordering::Equal {
                        return Ok(ord);
                    }
                }
                Ok(a.len().cmp(&b.len()))
            }
            _ => Err(Error::InvalidComparison {
                left_type: self.type_name(),
                right_type: other.type_name(),
            }),
        }
    }

    /// Identity test, used by `is`
    ///
    /// Scalars are identical when equal in value; containers and host
    /// values are identical when they share an allocation.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Arc::ptr_eq(a, b),
            (Value::Tuple(a), Value::Tuple(b)) => Arc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Arc::ptr_eq(a, b),
            (Value::Callable(a), Value::Callable(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Membership test, used by `in`
    ///
    /// Substring for strings, element equality for sequences, key presence
    /// for dictionaries.
    pub fn contains(&self, needle: &Value) -> Result<bool> {
        match self {
            Value::Str(haystack) => match needle {
                Value::Str(sub) => Ok(haystack.contains(sub.as_str())),
                _ => Err(Error::TypeError {
                    expected: "a string".to_string(),
                    got: needle.type_name(),
                }),
            },
            Value::List(items) | Value::Tuple(items) => {
                Ok(items.iter().any(|item| item.equals(needle)))
            }
            Value::Dict(entries) => {
                let key = Key::from_value(needle)?;
                Ok(entries.contains_key(&key))
            }
            _ => Err(Error::TypeError {
                expected: "a container".to_string(),
                got: self.type_name(),
            }),
        }
    }

    /// Subscript access for sequences and dictionaries
    ///
    /// Negative indexes count from the end of sequences and strings; a
    /// missing dictionary key is an error, not a default.
    pub fn get_index(&self, index: &Value) -> Result<Value> {
        match self {
            Value::List(items) | Value::Tuple(items) => {
                let idx = resolve_index(index.as_int()?, items.len())?;
                Ok(items[idx].clone())
            }
            Value::Str(s) => {
                let chars: Vec<char> = s.chars().collect();
                let idx = resolve_index(index.as_int()?, chars.len())?;
                Ok(Value::Str(chars[idx].to_string()))
            }
            Value::Dict(entries) => {
                let key = Key::from_value(index)?;
                entries
                    .get(&key)
                    .cloned()
                    .ok_or_else(|| Error::KeyError {
                        key: key.to_string(),
                    })
            }
            _ => Err(Error::TypeError {
                expected: "a sequence or dict".to_string(),
                got: self.type_name(),
            }),
        }
    }

    /// Builds a value from a JSON document
    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Str(s.clone()),
            serde_json::Value::Array(items) => {
                Value::list(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::dict(
                entries
                    .iter()
                    .map(|(k, v)| (Key::Str(k.clone()), Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Renders the value as a JSON document
    ///
    /// Host values have no JSON form; non-finite numbers become `null`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let json = match self {
            Value::None => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) | Value::Tuple(items) => {
                let mut array = Vec::with_capacity(items.len());
                for item in items.iter() {
                    array.push(item.to_json()?);
                }
                serde_json::Value::Array(array)
            }
            Value::Dict(entries) => {
                let mut sorted: Vec<_> = entries.iter().collect();
                sorted.sort_by(|(ka, _), (kb, _)| ka.cmp(kb));
                let mut object = serde_json::Map::new();
                for (key, value) in sorted {
                    object.insert(key.json_key(), value.to_json()?);
                }
                serde_json::Value::Object(object)
            }
            Value::Callable(_) | Value::Object(_) => {
                return Err(Error::TypeError {
                    expected: "a JSON-representable value".to_string(),
                    got: self.type_name(),
                })
            }
        };
        Ok(json)
    }
}

/// Maps a possibly-negative index onto a sequence of the given length
fn resolve_index(index: i64, length: usize) -> Result<usize> {
    let adjusted = if index < 0 {
        index + length as i64
    } else {
        index
    };
    if adjusted < 0 || adjusted as usize >= length {
        return Err(Error::IndexOutOfBounds { index, length });
    }
    Ok(adjusted as usize)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::Number(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "'{}'", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
            Value::Dict(entries) => {
                let mut sorted: Vec<_> = entries.iter().collect();
                sorted.sort_by(|(ka, _), (kb, _)| ka.cmp(kb));
                write!(f, "{{")?;
                for (i, (key, value)) in sorted.into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Callable(c) => write!(f, "<callable {}>", c.name()),
            Value::Object(o) => write!(f, "<{} object>", o.type_name()),
        }
    }
}

// Host values carry no useful structure to dump, so Debug falls back to the
// callable/object name.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::None => write!(f, "None"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Tuple(items) => f.debug_tuple("Tuple").field(items).finish(),
            Value::Dict(entries) => f.debug_tuple("Dict").field(entries).finish(),
            Value::Callable(c) => write!(f, "Callable({})", c.name()),
            Value::Object(o) => write!(f, "Object({})", o.type_name()),
        }
    }
}

// Structural equality for tests and assertions; language-level `==` goes
// through `equals`, which additionally bridges numbers with booleans and
// lists with tuples.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => Arc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::list(values)
    }
}
