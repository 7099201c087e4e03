//! Lexical analysis
//!
//! Converts expression source text into a stream of tokens.

mod scanner;
mod token;

pub use scanner::Scanner;
pub use token::{Constant, Symbol, Token, TokenKind};
