//! Error types for the Pybble expression engine

use thiserror::Error;

/// Expression engine errors
#[derive(Error, Debug, Clone)]
pub enum Error {
    // Tokenize errors
    /// Invalid character sequence encountered while scanning
    ///
    /// **Triggered by:** Unrecognized characters, bare `!`, unterminated strings
    /// **Example:** `'hello` (missing closing quote)
    #[error("Tokenize error at line {line}, column {col}: {message}")]
    TokenizeError {
        /// Line number where scanning failed
        line: usize,
        /// Column number where scanning failed
        col: usize,
        /// Error description
        message: String,
    },

    // Parse errors
    /// Syntax error encountered during parsing
    ///
    /// **Triggered by:** Malformed expressions (unmatched brackets, misplaced
    /// operators, non-literal dictionary keys)
    /// **Example:** `[1, 2` (missing closing bracket)
    #[error("Syntax error at line {line}, column {col}: {message}")]
    SyntaxError {
        /// Line number where parsing failed
        line: usize,
        /// Column number where parsing failed
        col: usize,
        /// Error description
        message: String,
    },

    /// Unexpected token encountered during parsing
    #[error("Unexpected token: expected {expected}, got {got}")]
    UnexpectedToken {
        /// Expected token description
        expected: String,
        /// Actual token received
        got: String,
    },

    /// Input ended in the middle of an expression
    #[error("Unexpected end of input")]
    UnexpectedEof,

    // Name errors
    /// Reference to a name missing from the evaluation context
    ///
    /// **Triggered by:** Using a name the caller never bound
    /// **Example:** `x + 1` (when the context has no `x`)
    #[error("Name is not defined: {name}")]
    NameError {
        /// The unbound name
        name: String,
    },

    // Type errors
    /// Type mismatch error
    ///
    /// **Triggered by:** Operation expecting one type but receiving another
    /// **Example:** `-'hello'` (negating a string), `'ab'[1.5]` (fractional index)
    #[error("Type error: expected {expected}, got {got}")]
    TypeError {
        /// Expected type
        expected: String,
        /// Actual type
        got: String,
    },

    /// Attempt to call a non-callable value
    #[error("Value is not callable: {type_name}")]
    NotCallable {
        /// Type of non-callable value
        type_name: String,
    },

    /// Invalid operation for given types
    ///
    /// **Triggered by:** Binary operators applied to unsupported operand kinds
    /// **Example:** `[1, 2] + 'text'` (list concatenated with string)
    #[error("Invalid operation: {op} on types {left_type} and {right_type}")]
    InvalidOperation {
        /// Operator spelling
        op: String,
        /// Left operand type
        left_type: String,
        /// Right operand type
        right_type: String,
    },

    /// Invalid comparison between types with no defined order
    #[error("Invalid comparison between types {left_type} and {right_type}")]
    InvalidComparison {
        /// Left operand type
        left_type: String,
        /// Right operand type
        right_type: String,
    },

    /// Invalid arguments provided to a callable
    #[error("Invalid arguments for {callable}: {reason}")]
    InvalidArguments {
        /// Callable name
        callable: String,
        /// Reason for invalidity
        reason: String,
    },

    // Key errors
    /// Dictionary lookup with a missing key
    ///
    /// **Triggered by:** Subscripting a dictionary with an absent key
    /// **Example:** `{'a': 1}['b']`
    #[error("Key not found: {key}")]
    KeyError {
        /// The missing key, rendered as written
        key: String,
    },

    /// Sequence index outside the valid range
    #[error("Index out of bounds: {index} for sequence of length {length}")]
    IndexOutOfBounds {
        /// Requested index as written (may be negative)
        index: i64,
        /// Sequence length
        length: usize,
    },

    /// Attribute access that matches neither data nor a built-in method
    #[error("No attribute '{attr}' on {type_name}")]
    MissingAttribute {
        /// Type of the attribute target
        type_name: String,
        /// Requested attribute name
        attr: String,
    },

    // Resource errors
    /// Expression tree nested past the evaluator's depth limit
    #[error("Recursion limit exceeded (max depth: {limit})")]
    RecursionLimitExceeded {
        /// Configured maximum depth
        limit: usize,
    },
}

/// Coarse error classification, one class per failure stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Scanning failed before any tokens could be used
    Tokenize,
    /// Token stream did not form a valid expression
    Parse,
    /// A name was missing from the context
    Name,
    /// Values had the wrong type for an operation
    Type,
    /// A key, index, or attribute was absent
    Key,
    /// An evaluator resource limit was hit
    Resource,
}

impl Error {
    /// Create a tokenize error with a position and message
    pub fn tokenize(line: usize, col: usize, msg: impl Into<String>) -> Self {
        Error::TokenizeError {
            line,
            col,
            message: msg.into(),
        }
    }

    /// Create a syntax error with a position and message
    pub fn syntax(line: usize, col: usize, msg: impl Into<String>) -> Self {
        Error::SyntaxError {
            line,
            col,
            message: msg.into(),
        }
    }

    /// Classify the error by failure stage
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::TokenizeError { .. } => ErrorClass::Tokenize,

            Error::SyntaxError { .. } => ErrorClass::Parse,
            Error::UnexpectedToken { .. } => ErrorClass::Parse,
            Error::UnexpectedEof => ErrorClass::Parse,

            Error::NameError { .. } => ErrorClass::Name,

            Error::TypeError { .. } => ErrorClass::Type,
            Error::NotCallable { .. } => ErrorClass::Type,
            Error::InvalidOperation { .. } => ErrorClass::Type,
            Error::InvalidComparison { .. } => ErrorClass::Type,
            Error::InvalidArguments { .. } => ErrorClass::Type,

            Error::KeyError { .. } => ErrorClass::Key,
            Error::IndexOutOfBounds { .. } => ErrorClass::Key,
            Error::MissingAttribute { .. } => ErrorClass::Key,

            Error::RecursionLimitExceeded { .. } => ErrorClass::Resource,
        }
    }
}

/// Result type for Pybble operations
pub type Result<T> = std::result::Result<T, Error>;
