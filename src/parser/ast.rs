use serde::{Deserialize, Serialize};
use std::fmt;

/// Expressions
///
/// One closed set of node kinds; the evaluator matches exhaustively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    // Literals
    /// Number literal expression (all numbers are doubles)
    NumberLiteral(f64),
    /// String literal expression
    StringLiteral(String),
    /// Boolean literal expression (`True` / `False`)
    BoolLiteral(bool),
    /// `None` literal expression
    NoneLiteral,

    // Collections
    /// List literal expression
    ListLiteral(Vec<Expression>),
    /// Tuple literal expression
    TupleLiteral(Vec<Expression>),
    /// Dictionary literal expression with literal keys
    DictLiteral(Vec<(DictKey, Expression)>),

    /// Name reference expression, resolved against the evaluation context
    Name(String),

    /// Unary operation expression
    Unary {
        /// Unary operator to apply
        op: UnaryOp,
        /// Operand expression
        operand: Box<Expression>,
    },

    /// Binary operation expression
    Binary {
        /// Binary operator to apply
        op: BinaryOp,
        /// Left operand expression
        left: Box<Expression>,
        /// Right operand expression
        right: Box<Expression>,
    },

    /// Short-circuit boolean operation expression
    ///
    /// Kept apart from `Binary` because evaluation is lazy and the result is
    /// one of the operands, not a coerced boolean.
    BoolOp {
        /// Boolean operator to apply
        op: BoolOpKind,
        /// Left operand expression
        left: Box<Expression>,
        /// Right operand expression
        right: Box<Expression>,
    },

    /// Ternary conditional expression: `a if cond else b`
    Ternary {
        /// Condition expression to evaluate first
        condition: Box<Expression>,
        /// Expression to evaluate if condition is truthy
        then_expr: Box<Expression>,
        /// Expression to evaluate if condition is falsy
        else_expr: Box<Expression>,
    },

    /// Function call expression
    Call {
        /// Callee expression, evaluated to a callable
        callee: Box<Expression>,
        /// Positional argument expressions
        args: Vec<Expression>,
        /// Keyword arguments as (name, value) pairs
        kwargs: Vec<(String, Expression)>,
    },

    /// Assignment expression: `name = value`
    ///
    /// Writes into the evaluation context and yields the assigned value.
    Assign {
        /// Name to bind
        name: String,
        /// Expression value to assign
        value: Box<Expression>,
    },

    /// Field access expression (`object.field`)
    FieldAccess {
        /// Object being accessed
        object: Box<Expression>,
        /// Name of the field to access
        field: String,
    },

    /// Index access expression (`target[index]`)
    IndexAccess {
        /// Sequence or dictionary being indexed
        target: Box<Expression>,
        /// Index expression
        index: Box<Expression>,
    },
}

/// Dictionary literal key
///
/// Keys are restricted to literal strings and numbers at parse time, so the
/// restriction lives in the type rather than in a runtime check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DictKey {
    /// String key
    Str(String),
    /// Number key
    Number(f64),
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// Arithmetic negation operator (-x)
    Neg,
    /// Arithmetic identity operator (+x)
    Pos,
    /// Bitwise NOT operator (~x)
    Invert,
    /// Logical NOT operator (not x)
    Not,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    // Arithmetic
    /// Addition operator (+)
    Add,
    /// Subtraction operator (-)
    Sub,
    /// Multiplication operator (*)
    Mul,
    /// True division operator (/)
    Div,
    /// Floor division operator (//)
    FloorDiv,
    /// Modulo operator (%)
    Mod,
    /// Power operator (**)
    Pow,

    // Bitwise
    /// Bitwise OR operator (|)
    BitOr,
    /// Bitwise XOR operator (^)
    BitXor,
    /// Bitwise AND operator (&)
    BitAnd,
    /// Left shift operator (<<)
    Shl,
    /// Right shift operator (>>)
    Shr,

    // Comparison
    /// Equality operator (==)
    Eq,
    /// Inequality operator (!= and the legacy <>)
    NotEq,
    /// Less than operator (<)
    Lt,
    /// Less than or equal operator (<=)
    LtEq,
    /// Greater than operator (>)
    Gt,
    /// Greater than or equal operator (>=)
    GtEq,

    // Membership and identity
    /// Membership test operator (in)
    In,
    /// Negated membership test operator (not in)
    NotIn,
    /// Identity test operator (is)
    Is,
    /// Negated identity test operator (is not)
    IsNot,
}

impl BinaryOp {
    /// True for the comparison family, which participates in chain folding
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
                | BinaryOp::In
                | BinaryOp::NotIn
                | BinaryOp::Is
                | BinaryOp::IsNot
        )
    }
}

/// Short-circuit boolean operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoolOpKind {
    /// Logical AND operator
    And,
    /// Logical OR operator
    Or,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Pos => write!(f, "+"),
            UnaryOp::Invert => write!(f, "~"),
            UnaryOp::Not => write!(f, "not"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOp::Add => write!(f, "+"),
            BinaryOp::Sub => write!(f, "-"),
            BinaryOp::Mul => write!(f, "*"),
            BinaryOp::Div => write!(f, "/"),
            BinaryOp::FloorDiv => write!(f, "//"),
            BinaryOp::Mod => write!(f, "%"),
            BinaryOp::Pow => write!(f, "**"),
            BinaryOp::BitOr => write!(f, "|"),
            BinaryOp::BitXor => write!(f, "^"),
            BinaryOp::BitAnd => write!(f, "&"),
            BinaryOp::Shl => write!(f, "<<"),
            BinaryOp::Shr => write!(f, ">>"),
            BinaryOp::Eq => write!(f, "=="),
            BinaryOp::NotEq => write!(f, "!="),
            BinaryOp::Lt => write!(f, "<"),
            BinaryOp::LtEq => write!(f, "<="),
            BinaryOp::Gt => write!(f, ">"),
            BinaryOp::GtEq => write!(f, ">="),
            BinaryOp::In => write!(f, "in"),
            BinaryOp::NotIn => write!(f, "not in"),
            BinaryOp::Is => write!(f, "is"),
            BinaryOp::IsNot => write!(f, "is not"),
        }
    }
}

impl fmt::Display for BoolOpKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BoolOpKind::And => write!(f, "and"),
            BoolOpKind::Or => write!(f, "or"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_display() {
        assert_eq!(BinaryOp::FloorDiv.to_string(), "//");
        assert_eq!(BinaryOp::NotIn.to_string(), "not in");
        assert_eq!(UnaryOp::Not.to_string(), "not");
        assert_eq!(BoolOpKind::Or.to_string(), "or");
    }

    #[test]
    fn test_comparison_family() {
        assert!(BinaryOp::Lt.is_comparison());
        assert!(BinaryOp::IsNot.is_comparison());
        assert!(!BinaryOp::Add.is_comparison());
        assert!(!BinaryOp::BitOr.is_comparison());
    }
}
