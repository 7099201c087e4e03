//! # Pybble - Embedded Python-Flavored Expressions
//!
//! [![Crates.io](https://img.shields.io/crates/v/pybble.svg)](https://crates.io/crates/pybble)
//! [![Documentation](https://docs.rs/pybble/badge.svg)](https://docs.rs/pybble)
//! [![License: MIT](https://img.shields.io/badge/License-MIT-yellow.svg)](https://opensource.org/licenses/MIT)
//!
//! An embeddable evaluator for a **Python-flavored expression language**:
//! one expression in, one value out. Hosts hand it a string like
//! `price * qty if qty > 0 else 0` together with variable bindings and get
//! back a typed result, making it a good fit for rule filters, feature
//! flags, config predicates, and spreadsheet-style formulas.
//!
//! ## Features
//!
//! - ✅ **Familiar syntax** - Python operators, precedence, and laziness,
//!   including chained comparisons and `x if c else y`
//! - 🔌 **Host integration** - Bind Rust functions and property bags into
//!   expressions via the [`Callable`] and [`Object`] traits
//! - 🚀 **Single pass, no compile step** - Scanner, Pratt parser, and
//!   tree-walking evaluator over plain Rust data
//! - 🔒 **Zero unsafe code** - Reference-counted values, bounded recursion
//!
//! ## Quick Start
//!
//! Add Pybble to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! pybble = "1.0.0"
//! ```
//!
//! ### Basic Usage
//!
//! Evaluate an expression against a set of bindings:
//!
//! ```rust
//! use pybble::{evaluate_expr, Context, Value};
//!
//! # fn main() -> pybble::Result<()> {
//! let mut ctx = Context::new().with("price", 120.0).with("qty", 3.0);
//!
//! let total = evaluate_expr("price * qty if qty > 0 else 0", &mut ctx)?;
//! assert_eq!(total, Value::Number(360.0));
//!
//! // assignments write back into the context
//! evaluate_expr("discounted = price * 0.9", &mut ctx)?;
//! assert_eq!(ctx.get("discounted")?, Value::Number(108.0));
//! # Ok(())
//! # }
//! ```
//!
//! ### Staged Pipeline
//!
//! The one-shot helpers are thin wrappers; each stage is also public so
//! hosts can parse once and evaluate many times:
//!
//! ```rust
//! use pybble::{parse_expr, Context, Evaluator, Value};
//!
//! # fn main() -> pybble::Result<()> {
//! let expr = parse_expr("x ** 2 + 1")?;
//! let mut evaluator = Evaluator::new();
//!
//! for (x, expected) in [(0.0, 1.0), (3.0, 10.0)] {
//!     let mut ctx = Context::new().with("x", x);
//!     assert_eq!(evaluator.evaluate(&expr, &mut ctx)?, Value::Number(expected));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Language Overview
//!
//! ### Data Types
//!
//! - **Primitives**: numbers (64-bit floats), strings, `True`/`False`, `None`
//! - **Collections**: lists `[1, 2]`, tuples `(1, 2)`, dicts `{'a': 1}`
//! - **Host values**: functions and objects provided by the embedding host
//!
//! ### Operators
//!
//! - **Arithmetic**: `+ - * / // % **`, with Python floor division and
//!   sign-of-divisor remainder; `+` concatenates and `*` repeats sequences
//! - **Comparison**: `< <= > >= == != <>`, chainable (`1 < x < 10`) and
//!   defined across types through a single cross-type order
//! - **Membership and identity**: `in`, `not in`, `is`, `is not`
//! - **Boolean**: `and`, `or`, `not` - lazy, returning the deciding operand
//! - **Bitwise**: `| ^ & << >> ~` on integer-valued numbers
//! - **Access**: `obj.attr`, `seq[i]` (negative indexes count from the
//!   end), `f(a, b, key=value)`
//!
//! ### Built-in Methods
//!
//! Dictionaries carry `get/keys/values/items`, strings carry
//! `upper/lower/strip/startswith/endswith`, and sequences carry
//! `count/index`. Dictionary data shadows methods: `{'get': 5}.get` is `5`.
//!
//! ## Architecture
//!
//! Pybble follows a classic interpreter architecture:
//!
//! ```text
//! Source Code → Scanner → Tokens → ExprParser → Expression → Evaluator → Value
//! ```
//!
//! ### Main Components
//!
//! - [`Scanner`] - Tokenizes source text into tokens
//! - [`ExprParser`] - Parses tokens into an [`Expression`] tree
//! - [`Evaluator`] - Walks the tree against a [`Context`] and produces a [`Value`]
//! - [`Context`] - Variable bindings shared between host and expression
//! - [`Callable`] / [`Object`] - Host integration traits
//!
//! ## Examples
//!
//! ### Host Functions
//!
//! ```rust
//! use pybble::{evaluate_expr, Context, NativeFunction, Value};
//!
//! # fn main() -> pybble::Result<()> {
//! let clamp = NativeFunction::with_arity("clamp", 3, |args, _kwargs| {
//!     let x = args[0].as_number()?;
//!     let lo = args[1].as_number()?;
//!     let hi = args[2].as_number()?;
//!     Ok(Value::Number(x.max(lo).min(hi)))
//! });
//!
//! let mut ctx = Context::new().with("clamp", Value::callable(clamp));
//! assert_eq!(evaluate_expr("clamp(15, 0, 10)", &mut ctx)?, Value::Number(10.0));
//! # Ok(())
//! # }
//! ```
//!
//! ### JSON Data
//!
//! ```rust
//! use pybble::{evaluate_expr, Context, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let payload = serde_json::json!({"user": {"name": "alice", "admin": true}});
//! let mut ctx = Context::new().with("data", Value::from_json(&payload));
//!
//! let result = evaluate_expr("data['user'].get('admin', False)", &mut ctx)?;
//! assert_eq!(result, Value::Bool(true));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every failure is a typed [`Error`] with a coarse [`ErrorClass`] for
//! hosts that only care which stage failed:
//!
//! ```rust
//! use pybble::{evaluate_expr, Context, ErrorClass};
//!
//! let mut ctx = Context::new();
//! match evaluate_expr("missing + 1", &mut ctx) {
//!     Ok(_) => panic!("should have failed"),
//!     Err(e) => {
//!         assert_eq!(e.class(), ErrorClass::Name);
//!         assert!(e.to_string().contains("missing"));
//!     }
//! }
//! ```
//!
//! ## License
//!
//! Licensed under the [MIT License](https://opensource.org/licenses/MIT).

/// Version of the Pybble engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod host;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use error::{Error, ErrorClass, Result};
pub use host::{Callable, NativeFunction, Object};
pub use lexer::{Constant, Scanner, Symbol, Token, TokenKind};
pub use parser::{BinaryOp, BoolOpKind, DictKey, ExprParser, Expression, UnaryOp};
pub use runtime::{Context, Evaluator, Key, Value, DEFAULT_MAX_DEPTH};

/// Tokenizes expression source text
///
/// ```rust
/// let tokens = pybble::tokenize("1 + 2")?;
/// assert_eq!(tokens.len(), 3);
/// # Ok::<(), pybble::Error>(())
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut scanner = Scanner::new(source);
    scanner.scan_tokens()
}

/// Parses a token stream into an expression tree
pub fn parse(tokens: Vec<Token>) -> Result<Expression> {
    let mut parser = ExprParser::new(tokens);
    parser.parse()
}

/// Tokenizes and parses expression source text
///
/// ```rust
/// let expr = pybble::parse_expr("a.b[0](1, key='x')")?;
/// # let _ = expr;
/// # Ok::<(), pybble::Error>(())
/// ```
pub fn parse_expr(source: &str) -> Result<Expression> {
    tracing::debug!("parsing expression ({} bytes)", source.len());
    parse(tokenize(source)?)
}

/// Evaluates a parsed expression against a context
pub fn evaluate(expr: &Expression, ctx: &mut Context) -> Result<Value> {
    let mut evaluator = Evaluator::new();
    evaluator.evaluate(expr, ctx)
}

/// Evaluates expression source text against a context
///
/// ```rust
/// let mut ctx = pybble::Context::new().with("x", 7.0);
/// let result = pybble::evaluate_expr("1 < x < 10", &mut ctx)?;
/// assert_eq!(result, pybble::Value::Bool(true));
/// # Ok::<(), pybble::Error>(())
/// ```
pub fn evaluate_expr(source: &str, ctx: &mut Context) -> Result<Value> {
    tracing::debug!("evaluating expression: {}", source);
    let expr = parse_expr(source)?;
    evaluate(&expr, ctx)
}
