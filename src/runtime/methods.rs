//! Built-in methods on dictionaries, strings, and sequences
//!
//! Attribute access materializes these as bound callables: `d.get` captures
//! the receiver and evaluates like any other callable value.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::host::Callable;
use crate::runtime::value::{Key, Value};

/// Resolves a built-in method on a receiver, if one exists
pub(crate) fn lookup(receiver: &Value, name: &str) -> Option<Value> {
    let method = match (receiver, name) {
        (Value::Dict(_), "get") => MethodKind::DictGet,
        (Value::Dict(_), "keys") => MethodKind::DictKeys,
        (Value::Dict(_), "values") => MethodKind::DictValues,
        (Value::Dict(_), "items") => MethodKind::DictItems,
        (Value::Str(_), "upper") => MethodKind::StrUpper,
        (Value::Str(_), "lower") => MethodKind::StrLower,
        (Value::Str(_), "strip") => MethodKind::StrStrip,
        (Value::Str(_), "startswith") => MethodKind::StrStartswith,
        (Value::Str(_), "endswith") => MethodKind::StrEndswith,
        (Value::List(_) | Value::Tuple(_), "count") => MethodKind::SeqCount,
        (Value::List(_) | Value::Tuple(_), "index") => MethodKind::SeqIndex,
        _ => return None,
    };
    Some(Value::Callable(Arc::new(BoundMethod {
        receiver: receiver.clone(),
        method,
    })))
}

/// A built-in method bound to its receiver
struct BoundMethod {
    receiver: Value,
    method: MethodKind,
}

#[derive(Debug, Clone, Copy)]
enum MethodKind {
    DictGet,
    DictKeys,
    DictValues,
    DictItems,
    StrUpper,
    StrLower,
    StrStrip,
    StrStartswith,
    StrEndswith,
    SeqCount,
    SeqIndex,
}

impl MethodKind {
    fn name(&self) -> &'static str {
        match self {
            MethodKind::DictGet => "get",
            MethodKind::DictKeys => "keys",
            MethodKind::DictValues => "values",
            MethodKind::DictItems => "items",
            MethodKind::StrUpper => "upper",
            MethodKind::StrLower => "lower",
            MethodKind::StrStrip => "strip",
            MethodKind::StrStartswith => "startswith",
            MethodKind::StrEndswith => "endswith",
            MethodKind::SeqCount => "count",
            MethodKind::SeqIndex => "index",
        }
    }
}

impl Callable for BoundMethod {
    fn name(&self) -> &str {
        self.method.name()
    }

    fn arity(&self) -> Option<usize> {
        match self.method {
            // get accepts an optional default, so the count varies
            MethodKind::DictGet => None,
            MethodKind::DictKeys
            | MethodKind::DictValues
            | MethodKind::DictItems
            | MethodKind::StrUpper
            | MethodKind::StrLower
            | MethodKind::StrStrip => Some(0),
            MethodKind::StrStartswith
            | MethodKind::StrEndswith
            | MethodKind::SeqCount
            | MethodKind::SeqIndex => Some(1),
        }
    }

    fn call(&self, args: &[Value], kwargs: &HashMap<String, Value>) -> Result<Value> {
        if !kwargs.is_empty() {
            return Err(Error::InvalidArguments {
                callable: self.method.name().to_string(),
                reason: "takes no keyword arguments".to_string(),
            });
        }

        match self.method {
            // ================================================================
            // Dictionary methods
            // ================================================================
            MethodKind::DictGet => {
                if args.is_empty() || args.len() > 2 {
                    return Err(Error::InvalidArguments {
                        callable: "get".to_string(),
                        reason: format!("takes 1 or 2 arguments, got {}", args.len()),
                    });
                }
                let entries = self.receiver.as_dict()?;
                let key = Key::from_value(&args[0])?;
                match entries.get(&key) {
                    Some(value) => Ok(value.clone()),
                    None => Ok(args.get(1).cloned().unwrap_or(Value::None)),
                }
            }
            MethodKind::DictKeys => {
                let entries = self.receiver.as_dict()?;
                Ok(Value::list(
                    sorted_keys(entries).into_iter().map(|k| k.to_value()).collect(),
                ))
            }
            MethodKind::DictValues => {
                let entries = self.receiver.as_dict()?;
                let mut values = Vec::with_capacity(entries.len());
                for key in sorted_keys(entries) {
                    if let Some(value) = entries.get(&key) {
                        values.push(value.clone());
                    }
                }
                Ok(Value::list(values))
            }
            MethodKind::DictItems => {
                let entries = self.receiver.as_dict()?;
                let mut items = Vec::with_capacity(entries.len());
                for key in sorted_keys(entries) {
                    if let Some(value) = entries.get(&key) {
                        items.push(Value::tuple(vec![key.to_value(), value.clone()]));
                    }
                }
                Ok(Value::list(items))
            }

            // ================================================================
            // String methods
            // ================================================================
            MethodKind::StrUpper => {
                let s = self.receiver.as_str()?;
                Ok(Value::Str(s.to_uppercase()))
            }
            MethodKind::StrLower => {
                let s = self.receiver.as_str()?;
                Ok(Value::Str(s.to_lowercase()))
            }
            MethodKind::StrStrip => {
                let s = self.receiver.as_str()?;
                Ok(Value::Str(s.trim().to_string()))
            }
            MethodKind::StrStartswith => {
                let s = self.receiver.as_str()?;
                let prefix = required_arg(args, "startswith")?;
                Ok(Value::Bool(s.starts_with(prefix.as_str()?)))
            }
            MethodKind::StrEndswith => {
                let s = self.receiver.as_str()?;
                let suffix = required_arg(args, "endswith")?;
                Ok(Value::Bool(s.ends_with(suffix.as_str()?)))
            }

            // ================================================================
            // Sequence methods
            // ================================================================
            MethodKind::SeqCount => {
                let needle = required_arg(args, "count")?;
                let count = match &self.receiver {
                    Value::List(items) | Value::Tuple(items) => {
                        items.iter().filter(|item| item.equals(needle)).count()
                    }
                    other => {
                        return Err(Error::TypeError {
                            expected: "a sequence".to_string(),
                            got: other.type_name(),
                        })
                    }
                };
                Ok(Value::Number(count as f64))
            }
            MethodKind::SeqIndex => {
                let needle = required_arg(args, "index")?;
                let position = match &self.receiver {
                    Value::List(items) | Value::Tuple(items) => {
                        items.iter().position(|item| item.equals(needle))
                    }
                    other => {
                        return Err(Error::TypeError {
                            expected: "a sequence".to_string(),
                            got: other.type_name(),
                        })
                    }
                };
                match position {
                    Some(idx) => Ok(Value::Number(idx as f64)),
                    None => Err(Error::InvalidArguments {
                        callable: "index".to_string(),
                        reason: format!("{} is not in the sequence", needle),
                    }),
                }
            }
        }
    }
}

/// First positional argument, or an argument error naming the method
fn required_arg<'a>(args: &'a [Value], method: &str) -> Result<&'a Value> {
    args.first().ok_or_else(|| Error::InvalidArguments {
        callable: method.to_string(),
        reason: "missing required argument".to_string(),
    })
}

/// Keys in sorted order; map iteration order is unstable
fn sorted_keys(entries: &HashMap<Key, Value>) -> Vec<Key> {
    let mut keys: Vec<_> = entries.keys().cloned().collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(method: &Value, args: &[Value]) -> Result<Value> {
        match method {
            Value::Callable(c) => c.call(args, &HashMap::new()),
            other => panic!("expected a callable, got {}", other),
        }
    }

    fn sample_dict() -> Value {
        let mut entries = HashMap::new();
        entries.insert(Key::Str("a".to_string()), Value::Number(1.0));
        entries.insert(Key::Str("b".to_string()), Value::Number(2.0));
        Value::dict(entries)
    }

    #[test]
    fn test_dict_get() {
        let dict = sample_dict();
        let get = lookup(&dict, "get").unwrap();

        let hit = call(&get, &[Value::Str("a".to_string())]).unwrap();
        assert_eq!(hit, Value::Number(1.0));

        let miss = call(&get, &[Value::Str("z".to_string())]).unwrap();
        assert_eq!(miss, Value::None);

        let with_default = call(
            &get,
            &[Value::Str("z".to_string()), Value::Number(54.0)],
        )
        .unwrap();
        assert_eq!(with_default, Value::Number(54.0));

        assert!(call(&get, &[]).is_err());
    }

    #[test]
    fn test_dict_views() {
        let dict = sample_dict();

        let keys = call(&lookup(&dict, "keys").unwrap(), &[]).unwrap();
        assert_eq!(
            keys,
            Value::list(vec![
                Value::Str("a".to_string()),
                Value::Str("b".to_string())
            ])
        );

        let values = call(&lookup(&dict, "values").unwrap(), &[]).unwrap();
        assert_eq!(
            values,
            Value::list(vec![Value::Number(1.0), Value::Number(2.0)])
        );

        let items = call(&lookup(&dict, "items").unwrap(), &[]).unwrap();
        assert_eq!(
            items,
            Value::list(vec![
                Value::tuple(vec![Value::Str("a".to_string()), Value::Number(1.0)]),
                Value::tuple(vec![Value::Str("b".to_string()), Value::Number(2.0)]),
            ])
        );
    }

    #[test]
    fn test_string_methods() {
        let s = Value::Str("  Hello  ".to_string());
        assert_eq!(
            call(&lookup(&s, "upper").unwrap(), &[]).unwrap(),
            Value::Str("  HELLO  ".to_string())
        );
        assert_eq!(
            call(&lookup(&s, "lower").unwrap(), &[]).unwrap(),
            Value::Str("  hello  ".to_string())
        );
        assert_eq!(
            call(&lookup(&s, "strip").unwrap(), &[]).unwrap(),
            Value::Str("Hello".to_string())
        );

        let word = Value::Str("prefix_body".to_string());
        assert_eq!(
            call(
                &lookup(&word, "startswith").unwrap(),
                &[Value::Str("prefix".to_string())]
            )
            .unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call(
                &lookup(&word, "endswith").unwrap(),
                &[Value::Str("prefix".to_string())]
            )
            .unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_sequence_methods() {
        let items = Value::list(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(1.0),
        ]);

        let count = call(&lookup(&items, "count").unwrap(), &[Value::Number(1.0)]).unwrap();
        assert_eq!(count, Value::Number(2.0));

        let index = call(&lookup(&items, "index").unwrap(), &[Value::Number(2.0)]).unwrap();
        assert_eq!(index, Value::Number(1.0));

        let missing = call(&lookup(&items, "index").unwrap(), &[Value::Number(9.0)]);
        assert!(missing.is_err());

        // booleans equate numerically in membership-style lookups
        let bools = Value::tuple(vec![Value::Bool(true), Value::Number(1.0)]);
        let count = call(&lookup(&bools, "count").unwrap(), &[Value::Number(1.0)]).unwrap();
        assert_eq!(count, Value::Number(2.0));
    }

    #[test]
    fn test_unknown_method() {
        assert!(lookup(&Value::Number(1.0), "upper").is_none());
        assert!(lookup(&sample_dict(), "upper").is_none());
        assert!(lookup(&Value::Str("x".to_string()), "get").is_none());
    }

    #[test]
    fn test_kwargs_rejected() {
        let s = Value::Str("x".to_string());
        let upper = lookup(&s, "upper").unwrap();
        let mut kwargs = HashMap::new();
        kwargs.insert("mode".to_string(), Value::None);
        match &upper {
            Value::Callable(c) => assert!(c.call(&[], &kwargs).is_err()),
            other => panic!("expected a callable, got {}", other),
        }
    }
}
