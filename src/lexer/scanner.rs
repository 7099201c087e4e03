use super::token::{Constant, Symbol, Token, TokenKind};
use crate::error::{Error, Result};

/// Scanner for Python-style expression source
pub struct Scanner {
    /// Source code as character vector
    source: Vec<char>,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Start position of current token
    start: usize,
    /// Current position in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Line where the current token starts
    start_line: usize,
    /// Column where the current token starts
    start_column: usize,
}

impl Scanner {
    /// Creates a new scanner from source text
    pub fn new(source: &str) -> Self {
        Scanner {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Scans all tokens from the source and returns them as a vector
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>> {
        while !self.is_at_end() {
            self.start = self.current;
            self.start_line = self.line;
            self.start_column = self.column;
            self.scan_token()?;
        }

        Ok(self.tokens.clone())
    }

    fn scan_token(&mut self) -> Result<()> {
        let c = self.advance();

        match c {
            // Whitespace (ignore, no indentation tracking needed)
            ' ' | '\r' | '\t' | '\n' => {
                if c == '\n' {
                    self.line += 1;
                    self.column = 1;
                }
            }

            // Delimiters
            '(' => self.add_token(TokenKind::Symbol(Symbol::LeftParen)),
            ')' => self.add_token(TokenKind::Symbol(Symbol::RightParen)),
            '[' => self.add_token(TokenKind::Symbol(Symbol::LeftBracket)),
            ']' => self.add_token(TokenKind::Symbol(Symbol::RightBracket)),
            '{' => self.add_token(TokenKind::Symbol(Symbol::LeftBrace)),
            '}' => self.add_token(TokenKind::Symbol(Symbol::RightBrace)),
            ',' => self.add_token(TokenKind::Symbol(Symbol::Comma)),
            ':' => self.add_token(TokenKind::Symbol(Symbol::Colon)),

            // Operators; a sign before a number is always its own token
            '+' => self.add_token(TokenKind::Symbol(Symbol::Plus)),
            '-' => self.add_token(TokenKind::Symbol(Symbol::Minus)),
            '%' => self.add_token(TokenKind::Symbol(Symbol::Percent)),
            '~' => self.add_token(TokenKind::Symbol(Symbol::Tilde)),
            '^' => self.add_token(TokenKind::Symbol(Symbol::Caret)),
            '&' => self.add_token(TokenKind::Symbol(Symbol::Amp)),
            '|' => self.add_token(TokenKind::Symbol(Symbol::Pipe)),
            '*' => {
                if self.match_char('*') {
                    self.add_token(TokenKind::Symbol(Symbol::StarStar));
                } else {
                    self.add_token(TokenKind::Symbol(Symbol::Star));
                }
            }
            '/' => {
                if self.match_char('/') {
                    self.add_token(TokenKind::Symbol(Symbol::SlashSlash));
                } else {
                    self.add_token(TokenKind::Symbol(Symbol::Slash));
                }
            }

            // Comparison operators, longest match first
            '<' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Symbol(Symbol::LtEq));
                } else if self.match_char('<') {
                    self.add_token(TokenKind::Symbol(Symbol::Shl));
                } else if self.match_char('>') {
                    self.add_token(TokenKind::Symbol(Symbol::LtGt));
                } else {
                    self.add_token(TokenKind::Symbol(Symbol::Lt));
                }
            }
            '>' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Symbol(Symbol::GtEq));
                } else if self.match_char('>') {
                    self.add_token(TokenKind::Symbol(Symbol::Shr));
                } else {
                    self.add_token(TokenKind::Symbol(Symbol::Gt));
                }
            }
            '=' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Symbol(Symbol::Eq));
                } else {
                    self.add_token(TokenKind::Symbol(Symbol::Assign));
                }
            }
            '!' => {
                if self.match_char('=') {
                    self.add_token(TokenKind::Symbol(Symbol::NotEq));
                } else {
                    return Err(self.error("unexpected character '!' (use 'not')"));
                }
            }

            // Attribute access, or a leading-dot number like .42
            '.' => {
                if self.peek().is_ascii_digit() {
                    self.scan_number()?;
                } else {
                    self.add_token(TokenKind::Symbol(Symbol::Dot));
                }
            }

            // Strings, single or double quoted
            '\'' | '"' => self.scan_string(c)?,

            // Numbers
            c if c.is_ascii_digit() => self.scan_number()?,

            // Names, constants, and word operators
            c if c.is_alphabetic() || c == '_' => self.scan_word(),

            _ => {
                return Err(self.error(format!("unexpected character '{}'", c)));
            }
        }

        Ok(())
    }

    /// Scans a string literal delimited by `quote`
    ///
    /// The content is taken verbatim; there are no escape sequences, so the
    /// other quote kind is the only way to embed a quote character.
    fn scan_string(&mut self, quote: char) -> Result<()> {
        let mut value = String::new();

        while !self.is_at_end() && self.peek() != quote {
            let ch = self.advance();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            }
            value.push(ch);
        }

        if self.is_at_end() {
            return Err(self.error("unterminated string"));
        }

        self.advance(); // closing quote

        self.add_token(TokenKind::Str(value));
        Ok(())
    }

    /// Scans a number literal: `12`, `12.`, `12.5`, or `.42`
    ///
    /// A leading sign is never part of the literal; it arrives as a separate
    /// `+`/`-` token and is handled as a unary operator by the parser.
    fn scan_number(&mut self) -> Result<()> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Fraction part, digits optional so `12.` is valid. Skipped when the
        // literal itself started with a dot.
        if self.source[self.start] != '.' && self.peek() == '.' {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let value: f64 = text
            .parse()
            .map_err(|_| self.error(format!("invalid number: {}", text)))?;

        self.add_token(TokenKind::Number(value));
        Ok(())
    }

    /// Scans a name and maps reserved words to constants or word operators
    fn scan_word(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();

        if let Some(constant) = Constant::from_word(&text) {
            self.add_token(TokenKind::Constant(constant));
        } else if let Some(symbol) = Symbol::from_word(&text) {
            // Greedy two-word operators: `not in` and `is not`
            let symbol = match symbol {
                Symbol::Not if self.match_word("in") => Symbol::NotIn,
                Symbol::Is if self.match_word("not") => Symbol::IsNot,
                other => other,
            };
            self.add_token(TokenKind::Symbol(symbol));
        } else {
            self.add_token(TokenKind::Name(text));
        }
    }

    /// Tries to consume whitespace followed by exactly the word `word`
    ///
    /// On failure the scanner position is restored, so a miss costs nothing.
    /// A full identifier is read for the comparison, which keeps `not inner`
    /// from being misread as `not in` + `ner`.
    fn match_word(&mut self, word: &str) -> bool {
        let saved = (self.current, self.line, self.column);

        while matches!(self.peek(), ' ' | '\r' | '\t' | '\n') {
            let ch = self.advance();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            }
        }

        let word_start = self.current;
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text: String = self.source[word_start..self.current].iter().collect();
        if text == word {
            true
        } else {
            let (current, line, column) = saved;
            self.current = current;
            self.line = line;
            self.column = column;
            false
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        self.column += 1;
        c
    }

    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.current += 1;
            self.column += 1;
            true
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        self.tokens
            .push(Token::new(kind, lexeme, self.start_line, self.start_column));
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::tokenize(self.start_line, self.start_column, message)
    }
}
