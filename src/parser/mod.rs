//! Expression parsing
//!
//! Parses token streams into expression trees using precedence climbing.

mod ast;
mod expr_parser;

pub use ast::{BinaryOp, BoolOpKind, DictKey, Expression, UnaryOp};
pub use expr_parser::ExprParser;
