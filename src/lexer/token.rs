use serde::{Deserialize, Serialize};

/// A single token from the source text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Line number where the token starts (1-indexed)
    pub line: usize,
    /// Column number where the token starts (1-indexed)
    pub column: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, line: usize, column: usize) -> Self {
        Token {
            kind,
            lexeme,
            line,
            column,
        }
    }
}

/// All possible token types
///
/// The stream carries no end-of-input marker; the parser works against the
/// token vector's length instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenKind {
    /// Numeric literal (all numbers are doubles)
    Number(f64),
    /// String literal, quotes stripped
    Str(String),
    /// Identifier
    Name(String),
    /// Reserved constant (`None`, `True`, `False`)
    Constant(Constant),
    /// Operator or punctuation, including the word operators
    Symbol(Symbol),
}

/// The three reserved constants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant {
    /// `None`
    None,
    /// `True`
    True,
    /// `False`
    False,
}

impl Constant {
    /// Maps a reserved word to its constant, if it is one
    pub fn from_word(s: &str) -> Option<Constant> {
        match s {
            "None" => Some(Constant::None),
            "True" => Some(Constant::True),
            "False" => Some(Constant::False),
            _ => None,
        }
    }

    /// The constant's source spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Constant::None => "None",
            Constant::True => "True",
            Constant::False => "False",
        }
    }
}

/// Operator and punctuation tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbol {
    // Arithmetic
    /// Plus operator (+)
    Plus,
    /// Minus operator (-)
    Minus,
    /// Star operator (*)
    Star,
    /// Slash operator (/)
    Slash,
    /// Floor division operator (//)
    SlashSlash,
    /// Percent operator (%)
    Percent,
    /// Power operator (**)
    StarStar,

    // Bitwise
    /// Bitwise OR operator (|)
    Pipe,
    /// Bitwise XOR operator (^)
    Caret,
    /// Bitwise AND operator (&)
    Amp,
    /// Left shift operator (<<)
    Shl,
    /// Right shift operator (>>)
    Shr,
    /// Bitwise NOT operator (~)
    Tilde,

    // Comparison
    /// Less than operator (<)
    Lt,
    /// Less than or equal operator (<=)
    LtEq,
    /// Greater than operator (>)
    Gt,
    /// Greater than or equal operator (>=)
    GtEq,
    /// Equality operator (==)
    Eq,
    /// Inequality operator (!=)
    NotEq,
    /// Legacy inequality operator (<>)
    LtGt,

    // Word operators
    /// Logical AND operator
    And,
    /// Logical OR operator
    Or,
    /// Logical NOT operator
    Not,
    /// Membership operator
    In,
    /// Negated membership operator (two words)
    NotIn,
    /// Identity operator
    Is,
    /// Negated identity operator (two words)
    IsNot,
    /// Ternary condition keyword
    If,
    /// Ternary alternative keyword
    Else,

    // Structure
    /// Assignment operator (=)
    Assign,
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Left bracket [
    LeftBracket,
    /// Right bracket ]
    RightBracket,
    /// Left brace {
    LeftBrace,
    /// Right brace }
    RightBrace,
    /// Comma delimiter
    Comma,
    /// Colon delimiter
    Colon,
    /// Attribute access operator (.)
    Dot,
}

impl Symbol {
    /// Maps a reserved word to its operator symbol, if it is one
    ///
    /// The two-word forms `not in` and `is not` are assembled by the scanner,
    /// not by this lookup.
    pub fn from_word(s: &str) -> Option<Symbol> {
        match s {
            "and" => Some(Symbol::And),
            "or" => Some(Symbol::Or),
            "not" => Some(Symbol::Not),
            "in" => Some(Symbol::In),
            "is" => Some(Symbol::Is),
            "if" => Some(Symbol::If),
            "else" => Some(Symbol::Else),
            _ => None,
        }
    }

    /// The symbol's source spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Symbol::Plus => "+",
            Symbol::Minus => "-",
            Symbol::Star => "*",
            Symbol::Slash => "/",
            Symbol::SlashSlash => "//",
            Symbol::Percent => "%",
            Symbol::StarStar => "**",
            Symbol::Pipe => "|",
            Symbol::Caret => "^",
            Symbol::Amp => "&",
            Symbol::Shl => "<<",
            Symbol::Shr => ">>",
            Symbol::Tilde => "~",
            Symbol::Lt => "<",
            Symbol::LtEq => "<=",
            Symbol::Gt => ">",
            Symbol::GtEq => ">=",
            Symbol::Eq => "==",
            Symbol::NotEq => "!=",
            Symbol::LtGt => "<>",
            Symbol::And => "and",
            Symbol::Or => "or",
            Symbol::Not => "not",
            Symbol::In => "in",
            Symbol::NotIn => "not in",
            Symbol::Is => "is",
            Symbol::IsNot => "is not",
            Symbol::If => "if",
            Symbol::Else => "else",
            Symbol::Assign => "=",
            Symbol::LeftParen => "(",
            Symbol::RightParen => ")",
            Symbol::LeftBracket => "[",
            Symbol::RightBracket => "]",
            Symbol::LeftBrace => "{",
            Symbol::RightBrace => "}",
            Symbol::Comma => ",",
            Symbol::Colon => ":",
            Symbol::Dot => ".",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Str(s) => write!(f, "'{}'", s),
            TokenKind::Name(name) => write!(f, "{}", name),
            TokenKind::Constant(c) => write!(f, "{}", c.as_str()),
            TokenKind::Symbol(sym) => write!(f, "{}", sym.as_str()),
        }
    }
}
