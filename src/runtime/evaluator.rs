use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::parser::{BinaryOp, BoolOpKind, Expression, UnaryOp};
use crate::runtime::methods;
use crate::runtime::value::Key;
use crate::runtime::{Context, Value};

/// Default nesting limit, shared by the parser and the evaluator
pub const DEFAULT_MAX_DEPTH: usize = 500;

/// Tree-walking expression evaluator
///
/// Walks a parsed expression against a [`Context`] and produces a value:
/// - `and`, `or`, and `x if c else y` evaluate lazily and yield the winning
///   operand, not a coerced boolean
/// - `==` and the ordered comparisons use one cross-type order, so mixed
///   operands compare instead of failing
/// - assignment writes into the context and yields the assigned value
/// - nesting is bounded; deeply nested input fails instead of overflowing
///   the stack
pub struct Evaluator {
    /// Nesting limit
    max_depth: usize,
    /// Current nesting depth
    depth: usize,
}

impl Evaluator {
    /// Creates an evaluator with the default nesting limit
    pub fn new() -> Self {
        Evaluator {
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    /// Creates an evaluator with a custom nesting limit
    pub fn with_max_depth(max_depth: usize) -> Self {
        Evaluator { max_depth, depth: 0 }
    }

    /// Evaluates an expression against a context
    pub fn evaluate(&mut self, expr: &Expression, ctx: &mut Context) -> Result<Value> {
        if self.depth >= self.max_depth {
            return Err(Error::RecursionLimitExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.eval_expression(expr, ctx);
        self.depth -= 1;
        result
    }

    fn eval_expression(&mut self, expr: &Expression, ctx: &mut Context) -> Result<Value> {
        match expr {
            Expression::NumberLiteral(n) => Ok(Value::Number(*n)),
            Expression::StringLiteral(s) => Ok(Value::Str(s.clone())),
            Expression::BoolLiteral(b) => Ok(Value::Bool(*b)),
            Expression::NoneLiteral => Ok(Value::None),

            Expression::ListLiteral(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.evaluate(item, ctx)?);
                }
                Ok(Value::list(values))
            }

            Expression::TupleLiteral(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.evaluate(item, ctx)?);
                }
                Ok(Value::tuple(values))
            }

            Expression::DictLiteral(entries) => {
                let mut map = HashMap::with_capacity(entries.len());
                for (key, value) in entries {
                    // a repeated key keeps the last value
                    map.insert(Key::from(key), self.evaluate(value, ctx)?);
                }
                Ok(Value::dict(map))
            }

            Expression::Name(name) => ctx.get(name),

            Expression::Unary { op, operand } => {
                let value = self.evaluate(operand, ctx)?;
                self.apply_unary_op(*op, value)
            }

            Expression::Binary { op, left, right } => {
                let left = self.evaluate(left, ctx)?;
                let right = self.evaluate(right, ctx)?;
                self.apply_binary_op(*op, left, right)
            }

            Expression::BoolOp { op, left, right } => {
                let left = self.evaluate(left, ctx)?;
                let decided = match op {
                    BoolOpKind::And => !left.is_truthy(),
                    BoolOpKind::Or => left.is_truthy(),
                };
                if decided {
                    Ok(left)
                } else {
                    self.evaluate(right, ctx)
                }
            }

            Expression::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                if self.evaluate(condition, ctx)?.is_truthy() {
                    self.evaluate(then_expr, ctx)
                } else {
                    self.evaluate(else_expr, ctx)
                }
            }

            Expression::Assign { name, value } => {
                let value = self.evaluate(value, ctx)?;
                ctx.set(name.clone(), value.clone());
                Ok(value)
            }

            Expression::FieldAccess { object, field } => {
                let object = self.evaluate(object, ctx)?;
                self.eval_attribute(&object, field)
            }

            Expression::IndexAccess { target, index } => {
                let target = self.evaluate(target, ctx)?;
                let index = self.evaluate(index, ctx)?;
                target.get_index(&index)
            }

            Expression::Call {
                callee,
                args,
                kwargs,
            } => {
                let callee = self.evaluate(callee, ctx)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.evaluate(arg, ctx)?);
                }
                let mut kwarg_values = HashMap::with_capacity(kwargs.len());
                for (name, value) in kwargs {
                    kwarg_values.insert(name.clone(), self.evaluate(value, ctx)?);
                }
                self.eval_call(&callee, &arg_values, &kwarg_values)
            }
        }
    }

    /// Attribute lookup: dictionary data first, then built-in methods
    fn eval_attribute(&self, object: &Value, field: &str) -> Result<Value> {
        if let Value::Dict(entries) = object {
            if let Some(value) = entries.get(&Key::Str(field.to_string())) {
                return Ok(value.clone());
            }
        }
        if let Value::Object(o) = object {
            return o.attr(field).ok_or_else(|| Error::MissingAttribute {
                type_name: o.type_name().to_string(),
                attr: field.to_string(),
            });
        }
        methods::lookup(object, field).ok_or_else(|| Error::MissingAttribute {
            type_name: object.type_name(),
            attr: field.to_string(),
        })
    }

    fn eval_call(
        &self,
        callee: &Value,
        args: &[Value],
        kwargs: &HashMap<String, Value>,
    ) -> Result<Value> {
        match callee {
            Value::Callable(c) => {
                if let Some(arity) = c.arity() {
                    if args.len() != arity {
                        return Err(Error::InvalidArguments {
                            callable: c.name().to_string(),
                            reason: format!(
                                "expected {} positional arguments, got {}",
                                arity,
                                args.len()
                            ),
                        });
                    }
                }
                c.call(args, kwargs)
            }
            other => Err(Error::NotCallable {
                type_name: other.type_name(),
            }),
        }
    }

    fn apply_unary_op(&self, op: UnaryOp, operand: Value) -> Result<Value> {
        match op {
            UnaryOp::Neg => Ok(Value::Number(-operand.as_number()?)),
            // unary plus normalizes booleans to numbers
            UnaryOp::Pos => Ok(Value::Number(operand.as_number()?)),
            UnaryOp::Invert => Ok(Value::Number(!operand.as_int()? as f64)),
            UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        }
    }

    fn apply_binary_op(&self, op: BinaryOp, left: Value, right: Value) -> Result<Value> {
        match op {
            BinaryOp::Add => match (&left, &right) {
                (Value::Str(l), Value::Str(r)) => Ok(Value::Str(format!("{}{}", l, r))),
                (Value::List(l), Value::List(r)) => {
                    let mut items = (**l).clone();
                    items.extend(r.iter().cloned());
                    Ok(Value::list(items))
                }
                (Value::Tuple(l), Value::Tuple(r)) => {
                    let mut items = (**l).clone();
                    items.extend(r.iter().cloned());
                    Ok(Value::tuple(items))
                }
                _ => self.numeric_op("add", &left, &right, |x, y| x + y),
            },

            BinaryOp::Sub => self.numeric_op("subtract", &left, &right, |x, y| x - y),

            BinaryOp::Mul => match (&left, &right) {
                (Value::Str(s), count) | (count, Value::Str(s))
                    if matches!(count, Value::Number(_) | Value::Bool(_)) =>
                {
                    Ok(Value::Str(s.repeat(repeat_count(count)?)))
                }
                (Value::List(items), count) | (count, Value::List(items))
                    if matches!(count, Value::Number(_) | Value::Bool(_)) =>
                {
                    Ok(Value::list(repeat_items(items, repeat_count(count)?)))
                }
                (Value::Tuple(items), count) | (count, Value::Tuple(items))
                    if matches!(count, Value::Number(_) | Value::Bool(_)) =>
                {
                    Ok(Value::tuple(repeat_items(items, repeat_count(count)?)))
                }
                _ => self.numeric_op("multiply", &left, &right, |x, y| x * y),
            },

            // division follows IEEE arithmetic: dividing by zero yields
            // an infinity or NaN, never an error
            BinaryOp::Div => self.numeric_op("divide", &left, &right, |x, y| x / y),

            BinaryOp::FloorDiv => {
                self.numeric_op("floor divide", &left, &right, |x, y| (x / y).floor())
            }

            // remainder takes the sign of the divisor
            BinaryOp::Mod => self.numeric_op("modulo", &left, &right, |x, y| {
                x - y * (x / y).floor()
            }),

            BinaryOp::Pow => self.numeric_op("exponentiate", &left, &right, |x, y| x.powf(y)),

            BinaryOp::BitOr => self.integer_op(&left, &right, |x, y| x | y),
            BinaryOp::BitXor => self.integer_op(&left, &right, |x, y| x ^ y),
            BinaryOp::BitAnd => self.integer_op(&left, &right, |x, y| x & y),
            // shift counts mask to the low six bits
            BinaryOp::Shl => self.integer_op(&left, &right, |x, y| x.wrapping_shl(y as u32)),
            BinaryOp::Shr => self.integer_op(&left, &right, |x, y| x.wrapping_shr(y as u32)),

            BinaryOp::Eq => Ok(Value::Bool(left.equals(&right))),
            BinaryOp::NotEq => Ok(Value::Bool(!left.equals(&right))),

            BinaryOp::Lt => Ok(Value::Bool(matches!(
                self.order(&left, &right)?,
                Some(Ordering::Less)
            ))),
            BinaryOp::LtEq => Ok(Value::Bool(matches!(
                self.order(&left, &right)?,
                Some(Ordering::Less | Ordering::Equal)
            ))),
            BinaryOp::Gt => Ok(Value::Bool(matches!(
                self.order(&left, &right)?,
                Some(Ordering::Greater)
            ))),
            BinaryOp::GtEq => Ok(Value::Bool(matches!(
                self.order(&left, &right)?,
                Some(Ordering::Greater | Ordering::Equal)
            ))),

            BinaryOp::In => Ok(Value::Bool(right.contains(&left)?)),
            BinaryOp::NotIn => Ok(Value::Bool(!right.contains(&left)?)),

            BinaryOp::Is => Ok(Value::Bool(left.is_identical(&right))),
            BinaryOp::IsNot => Ok(Value::Bool(!left.is_identical(&right))),
        }
    }

    /// Cross-type order for `<`-family operators; `None` when NaN is
    /// involved, which makes every ordered comparison false
    fn order(&self, left: &Value, right: &Value) -> Result<Option<Ordering>> {
        if left.is_nan() || right.is_nan() {
            return Ok(None);
        }
        Ok(Some(left.compare(right)?))
    }

    fn numeric_op(
        &self,
        op: &str,
        left: &Value,
        right: &Value,
        f: impl Fn(f64, f64) -> f64,
    ) -> Result<Value> {
        match (left.as_number(), right.as_number()) {
            (Ok(x), Ok(y)) => Ok(Value::Number(f(x, y))),
            _ => Err(Error::InvalidOperation {
                op: op.to_string(),
                left_type: left.type_name(),
                right_type: right.type_name(),
            }),
        }
    }

    fn integer_op(
        &self,
        left: &Value,
        right: &Value,
        f: impl Fn(i64, i64) -> i64,
    ) -> Result<Value> {
        let x = left.as_int()?;
        let y = right.as_int()?;
        Ok(Value::Number(f(x, y) as f64))
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequence repetition count; negative counts produce an empty sequence
fn repeat_count(count: &Value) -> Result<usize> {
    let n = count.as_int()?;
    Ok(n.max(0) as usize)
}

fn repeat_items(items: &[Value], count: usize) -> Vec<Value> {
    let mut out = Vec::with_capacity(items.len().saturating_mul(count));
    for _ in 0..count {
        out.extend(items.iter().cloned());
    }
    out
}
