use super::ast::{BinaryOp, BoolOpKind, DictKey, Expression, UnaryOp};
use crate::error::{Error, Result};
use crate::lexer::{Constant, Symbol, Token, TokenKind};
use crate::runtime::DEFAULT_MAX_DEPTH;

// Binding powers, lowest to highest. An infix operator extends the current
// expression only when its power is strictly above the surrounding minimum,
// which makes same-power operators group to the left.
const BP_ASSIGN: u8 = 10;
const BP_TERNARY: u8 = 20;
const BP_OR: u8 = 30;
const BP_AND: u8 = 40;
const BP_NOT: u8 = 50;
const BP_COMPARISON: u8 = 60;
const BP_BIT_OR: u8 = 70;
const BP_BIT_XOR: u8 = 80;
const BP_BIT_AND: u8 = 90;
const BP_SHIFT: u8 = 100;
const BP_TERM: u8 = 110;
const BP_FACTOR: u8 = 120;
const BP_UNARY: u8 = 130;
const BP_POWER: u8 = 140;
const BP_POSTFIX: u8 = 150;

/// Precedence-climbing parser for Python-style expressions
///
/// Consumes the token vector through an index cursor and produces a single
/// expression tree; anything left over after the root is an error. Nesting
/// is bounded the same way evaluation is, so deeply bracketed input fails
/// with an error instead of overflowing the stack.
pub struct ExprParser {
    tokens: Vec<Token>,
    current: usize,
    /// Nesting limit
    max_depth: usize,
    /// Current nesting depth
    depth: usize,
}

impl ExprParser {
    /// Creates a new parser over a token vector
    pub fn new(tokens: Vec<Token>) -> Self {
        ExprParser {
            tokens,
            current: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            depth: 0,
        }
    }

    /// Parses the tokens into a single expression AST
    pub fn parse(&mut self) -> Result<Expression> {
        let expr = self.parse_binding_power(0)?;

        if let Some(token) = self.peek() {
            return Err(Error::UnexpectedToken {
                expected: "end of expression".to_string(),
                got: token.kind.to_string(),
            });
        }

        Ok(expr)
    }

    /// Recursion entry: every descent funnels through here, which is where
    /// the nesting limit is enforced
    fn parse_binding_power(&mut self, min_bp: u8) -> Result<Expression> {
        if self.depth >= self.max_depth {
            return Err(Error::RecursionLimitExceeded {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.climb(min_bp);
        self.depth -= 1;
        result
    }

    /// Core precedence climb: parse a prefix, then fold in every infix
    /// operator binding more tightly than `min_bp`
    fn climb(&mut self, min_bp: u8) -> Result<Expression> {
        let mut left = self.parse_prefix()?;

        loop {
            let symbol = match self.peek_symbol() {
                Some(symbol) => symbol,
                None => break,
            };
            let bp = match left_binding_power(symbol) {
                Some(bp) => bp,
                None => break,
            };
            if bp <= min_bp {
                break;
            }

            left = self.parse_infix(left, symbol)?;
        }

        Ok(left)
    }

    /// Parses a token in prefix position: literals, names, unary operators,
    /// and the bracketed literal forms
    fn parse_prefix(&mut self) -> Result<Expression> {
        let token = self.advance_token()?;

        match token.kind {
            TokenKind::Number(n) => Ok(Expression::NumberLiteral(n)),
            TokenKind::Str(s) => Ok(Expression::StringLiteral(s)),
            TokenKind::Name(name) => Ok(Expression::Name(name)),
            TokenKind::Constant(Constant::None) => Ok(Expression::NoneLiteral),
            TokenKind::Constant(Constant::True) => Ok(Expression::BoolLiteral(true)),
            TokenKind::Constant(Constant::False) => Ok(Expression::BoolLiteral(false)),

            TokenKind::Symbol(Symbol::Minus) => self.parse_unary(UnaryOp::Neg, BP_UNARY),
            TokenKind::Symbol(Symbol::Plus) => self.parse_unary(UnaryOp::Pos, BP_UNARY),
            TokenKind::Symbol(Symbol::Tilde) => self.parse_unary(UnaryOp::Invert, BP_UNARY),
            TokenKind::Symbol(Symbol::Not) => self.parse_unary(UnaryOp::Not, BP_NOT),

            TokenKind::Symbol(Symbol::LeftParen) => self.parse_paren_group(),
            TokenKind::Symbol(Symbol::LeftBracket) => self.parse_list_literal(),
            TokenKind::Symbol(Symbol::LeftBrace) => self.parse_dict_literal(),

            other => Err(Error::UnexpectedToken {
                expected: "an expression".to_string(),
                got: other.to_string(),
            }),
        }
    }

    fn parse_unary(&mut self, op: UnaryOp, bp: u8) -> Result<Expression> {
        let operand = self.parse_binding_power(bp)?;
        Ok(Expression::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// Parses the form after an opening parenthesis: either a grouped
    /// expression (which leaves no node behind) or a tuple literal
    ///
    /// Empty parentheses and any comma force the tuple reading; a trailing
    /// comma is tolerated.
    fn parse_paren_group(&mut self) -> Result<Expression> {
        if self.match_symbol(Symbol::RightParen) {
            return Ok(Expression::TupleLiteral(Vec::new()));
        }

        let first = self.parse_binding_power(0)?;

        if self.match_symbol(Symbol::Comma) {
            let mut items = vec![first];
            while !self.check_symbol(Symbol::RightParen) {
                items.push(self.parse_binding_power(0)?);
                if !self.match_symbol(Symbol::Comma) {
                    break;
                }
            }
            self.expect_symbol(Symbol::RightParen)?;
            Ok(Expression::TupleLiteral(items))
        } else {
            self.expect_symbol(Symbol::RightParen)?;
            Ok(first)
        }
    }

    fn parse_list_literal(&mut self) -> Result<Expression> {
        let mut items = Vec::new();

        while !self.check_symbol(Symbol::RightBracket) {
            items.push(self.parse_binding_power(0)?);
            if !self.match_symbol(Symbol::Comma) {
                break;
            }
        }
        self.expect_symbol(Symbol::RightBracket)?;

        Ok(Expression::ListLiteral(items))
    }

    fn parse_dict_literal(&mut self) -> Result<Expression> {
        let mut entries = Vec::new();

        while !self.check_symbol(Symbol::RightBrace) {
            let key = self.parse_dict_key()?;
            self.expect_symbol(Symbol::Colon)?;
            let value = self.parse_binding_power(0)?;
            entries.push((key, value));
            if !self.match_symbol(Symbol::Comma) {
                break;
            }
        }
        self.expect_symbol(Symbol::RightBrace)?;

        Ok(Expression::DictLiteral(entries))
    }

    /// Dictionary keys must be literal string or number tokens
    fn parse_dict_key(&mut self) -> Result<DictKey> {
        let token = self.advance_token()?;
        match token.kind {
            TokenKind::Str(s) => Ok(DictKey::Str(s)),
            TokenKind::Number(n) => Ok(DictKey::Number(n)),
            other => Err(Error::syntax(
                token.line,
                token.column,
                format!(
                    "dictionary keys must be string or number literals, got {}",
                    other
                ),
            )),
        }
    }

    /// Parses the operator in infix position; `symbol` was peeked by the
    /// caller and is consumed here
    fn parse_infix(&mut self, left: Expression, symbol: Symbol) -> Result<Expression> {
        let token = self.advance_token()?;

        match symbol {
            Symbol::Assign => {
                let name = match left {
                    Expression::Name(name) => name,
                    _ => {
                        return Err(Error::syntax(
                            token.line,
                            token.column,
                            "assignment target must be a name",
                        ));
                    }
                };
                // Right side at the assignment's own power, so `a = b = 1`
                // stops after `b` and the second `=` fails the target check.
                let value = self.parse_binding_power(BP_ASSIGN)?;
                Ok(Expression::Assign {
                    name,
                    value: Box::new(value),
                })
            }

            Symbol::If => {
                let condition = self.parse_binding_power(BP_TERNARY)?;
                self.expect_symbol(Symbol::Else)?;
                // One below the ternary power makes chained ternaries nest
                // into the else branch.
                let else_expr = self.parse_binding_power(BP_TERNARY - 1)?;
                Ok(Expression::Ternary {
                    condition: Box::new(condition),
                    then_expr: Box::new(left),
                    else_expr: Box::new(else_expr),
                })
            }

            Symbol::Or => self.parse_bool_op(left, BoolOpKind::Or, BP_OR),
            Symbol::And => self.parse_bool_op(left, BoolOpKind::And, BP_AND),

            Symbol::Eq => self.parse_comparison(left, BinaryOp::Eq),
            Symbol::NotEq | Symbol::LtGt => self.parse_comparison(left, BinaryOp::NotEq),
            Symbol::Lt => self.parse_comparison(left, BinaryOp::Lt),
            Symbol::LtEq => self.parse_comparison(left, BinaryOp::LtEq),
            Symbol::Gt => self.parse_comparison(left, BinaryOp::Gt),
            Symbol::GtEq => self.parse_comparison(left, BinaryOp::GtEq),
            Symbol::In => self.parse_comparison(left, BinaryOp::In),
            Symbol::NotIn => self.parse_comparison(left, BinaryOp::NotIn),
            Symbol::Is => self.parse_comparison(left, BinaryOp::Is),
            Symbol::IsNot => self.parse_comparison(left, BinaryOp::IsNot),

            Symbol::Pipe => self.parse_binary(left, BinaryOp::BitOr, BP_BIT_OR),
            Symbol::Caret => self.parse_binary(left, BinaryOp::BitXor, BP_BIT_XOR),
            Symbol::Amp => self.parse_binary(left, BinaryOp::BitAnd, BP_BIT_AND),
            Symbol::Shl => self.parse_binary(left, BinaryOp::Shl, BP_SHIFT),
            Symbol::Shr => self.parse_binary(left, BinaryOp::Shr, BP_SHIFT),
            Symbol::Plus => self.parse_binary(left, BinaryOp::Add, BP_TERM),
            Symbol::Minus => self.parse_binary(left, BinaryOp::Sub, BP_TERM),
            Symbol::Star => self.parse_binary(left, BinaryOp::Mul, BP_FACTOR),
            Symbol::Slash => self.parse_binary(left, BinaryOp::Div, BP_FACTOR),
            Symbol::SlashSlash => self.parse_binary(left, BinaryOp::FloorDiv, BP_FACTOR),
            Symbol::Percent => self.parse_binary(left, BinaryOp::Mod, BP_FACTOR),
            // Right-associative: rhs re-enters one below the operator.
            Symbol::StarStar => self.parse_binary(left, BinaryOp::Pow, BP_POWER - 1),

            Symbol::Dot => {
                let token = self.advance_token()?;
                match token.kind {
                    TokenKind::Name(field) => Ok(Expression::FieldAccess {
                        object: Box::new(left),
                        field,
                    }),
                    other => Err(Error::UnexpectedToken {
                        expected: "attribute name".to_string(),
                        got: other.to_string(),
                    }),
                }
            }

            Symbol::LeftParen => self.parse_call(left),

            Symbol::LeftBracket => {
                let index = self.parse_binding_power(0)?;
                self.expect_symbol(Symbol::RightBracket)?;
                Ok(Expression::IndexAccess {
                    target: Box::new(left),
                    index: Box::new(index),
                })
            }

            other => Err(Error::UnexpectedToken {
                expected: "an operator".to_string(),
                got: other.as_str().to_string(),
            }),
        }
    }

    fn parse_binary(&mut self, left: Expression, op: BinaryOp, rhs_bp: u8) -> Result<Expression> {
        let right = self.parse_binding_power(rhs_bp)?;
        Ok(Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    fn parse_bool_op(
        &mut self,
        left: Expression,
        op: BoolOpKind,
        rhs_bp: u8,
    ) -> Result<Expression> {
        let right = self.parse_binding_power(rhs_bp)?;
        Ok(Expression::BoolOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Parses a comparison, folding any chain into pairwise `and` nodes
    ///
    /// `a < b < c` becomes `(a < b) and (b < c)`. The shared operand is
    /// cloned, so a side-effecting middle term runs once per pair it appears
    /// in; the fold also short-circuits, so terms after a failed pair never
    /// run at all.
    fn parse_comparison(&mut self, left: Expression, op: BinaryOp) -> Result<Expression> {
        let mut right = self.parse_binding_power(BP_COMPARISON)?;
        let mut chain = Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right.clone()),
        };

        while let Some(next_op) = self.peek_comparison() {
            self.current += 1; // consume the operator
            let far = self.parse_binding_power(BP_COMPARISON)?;
            let pair = Expression::Binary {
                op: next_op,
                left: Box::new(right),
                right: Box::new(far.clone()),
            };
            chain = Expression::BoolOp {
                op: BoolOpKind::And,
                left: Box::new(chain),
                right: Box::new(pair),
            };
            right = far;
        }

        Ok(chain)
    }

    /// Parses call arguments after the opening parenthesis
    ///
    /// An argument that parses as an assignment is a keyword argument;
    /// positional arguments may not follow keyword arguments, and a keyword
    /// name may not repeat.
    fn parse_call(&mut self, callee: Expression) -> Result<Expression> {
        let mut args = Vec::new();
        let mut kwargs: Vec<(String, Expression)> = Vec::new();

        while !self.check_symbol(Symbol::RightParen) {
            match self.parse_binding_power(0)? {
                Expression::Assign { name, value } => {
                    if kwargs.iter().any(|(existing, _)| *existing == name) {
                        return Err(self.syntax_error_here(format!(
                            "keyword argument repeated: {}",
                            name
                        )));
                    }
                    kwargs.push((name, *value));
                }
                arg => {
                    if !kwargs.is_empty() {
                        return Err(self
                            .syntax_error_here("positional argument follows keyword argument"));
                    }
                    args.push(arg);
                }
            }
            if !self.match_symbol(Symbol::Comma) {
                break;
            }
        }
        self.expect_symbol(Symbol::RightParen)?;

        Ok(Expression::Call {
            callee: Box::new(callee),
            args,
            kwargs,
        })
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn peek_symbol(&self) -> Option<Symbol> {
        match self.peek() {
            Some(Token {
                kind: TokenKind::Symbol(symbol),
                ..
            }) => Some(*symbol),
            _ => None,
        }
    }

    fn peek_comparison(&self) -> Option<BinaryOp> {
        match self.peek_symbol()? {
            Symbol::Eq => Some(BinaryOp::Eq),
            Symbol::NotEq | Symbol::LtGt => Some(BinaryOp::NotEq),
            Symbol::Lt => Some(BinaryOp::Lt),
            Symbol::LtEq => Some(BinaryOp::LtEq),
            Symbol::Gt => Some(BinaryOp::Gt),
            Symbol::GtEq => Some(BinaryOp::GtEq),
            Symbol::In => Some(BinaryOp::In),
            Symbol::NotIn => Some(BinaryOp::NotIn),
            Symbol::Is => Some(BinaryOp::Is),
            Symbol::IsNot => Some(BinaryOp::IsNot),
            _ => None,
        }
    }

    fn check_symbol(&self, symbol: Symbol) -> bool {
        self.peek_symbol() == Some(symbol)
    }

    fn match_symbol(&mut self, symbol: Symbol) -> bool {
        if self.check_symbol(symbol) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn expect_symbol(&mut self, expected: Symbol) -> Result<Token> {
        if self.check_symbol(expected) {
            self.advance_token()
        } else {
            match self.peek() {
                Some(token) => Err(Error::UnexpectedToken {
                    expected: format!("'{}'", expected.as_str()),
                    got: token.kind.to_string(),
                }),
                None => Err(Error::UnexpectedEof),
            }
        }
    }

    fn advance_token(&mut self) -> Result<Token> {
        if self.is_at_end() {
            return Err(Error::UnexpectedEof);
        }
        let token = self.tokens[self.current].clone();
        self.current += 1;
        Ok(token)
    }

    /// Syntax error at the current position, falling back to the last token
    /// when the cursor has run off the end
    fn syntax_error_here(&self, message: impl Into<String>) -> Error {
        let position = self
            .peek()
            .or_else(|| self.tokens.last())
            .map(|token| (token.line, token.column))
            .unwrap_or((1, 1));
        Error::syntax(position.0, position.1, message)
    }
}

/// Left binding power of an infix or postfix symbol, `None` for symbols
/// that cannot continue an expression
fn left_binding_power(symbol: Symbol) -> Option<u8> {
    let bp = match symbol {
        Symbol::Assign => BP_ASSIGN,
        Symbol::If => BP_TERNARY,
        Symbol::Or => BP_OR,
        Symbol::And => BP_AND,
        Symbol::Eq
        | Symbol::NotEq
        | Symbol::LtGt
        | Symbol::Lt
        | Symbol::LtEq
        | Symbol::Gt
        | Symbol::GtEq
        | Symbol::In
        | Symbol::NotIn
        | Symbol::Is
        | Symbol::IsNot => BP_COMPARISON,
        Symbol::Pipe => BP_BIT_OR,
        Symbol::Caret => BP_BIT_XOR,
        Symbol::Amp => BP_BIT_AND,
        Symbol::Shl | Symbol::Shr => BP_SHIFT,
        Symbol::Plus | Symbol::Minus => BP_TERM,
        Symbol::Star | Symbol::Slash | Symbol::SlashSlash | Symbol::Percent => BP_FACTOR,
        Symbol::StarStar => BP_POWER,
        Symbol::Dot | Symbol::LeftParen | Symbol::LeftBracket => BP_POSTFIX,
        _ => return None,
    };
    Some(bp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Scanner;

    fn parse_str(source: &str) -> Result<Expression> {
        let tokens = Scanner::new(source).scan_tokens()?;
        ExprParser::new(tokens).parse()
    }

    fn num(n: f64) -> Box<Expression> {
        Box::new(Expression::NumberLiteral(n))
    }

    fn name(s: &str) -> Box<Expression> {
        Box::new(Expression::Name(s.to_string()))
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_str("42").unwrap(), Expression::NumberLiteral(42.0));
        assert_eq!(
            parse_str("'hi'").unwrap(),
            Expression::StringLiteral("hi".to_string())
        );
        assert_eq!(parse_str("None").unwrap(), Expression::NoneLiteral);
        assert_eq!(parse_str("True").unwrap(), Expression::BoolLiteral(true));
        assert_eq!(
            parse_str("foo").unwrap(),
            Expression::Name("foo".to_string())
        );
    }

    #[test]
    fn test_arithmetic_precedence() {
        assert_eq!(
            parse_str("1 + 2 * 3").unwrap(),
            Expression::Binary {
                op: BinaryOp::Add,
                left: num(1.0),
                right: Box::new(Expression::Binary {
                    op: BinaryOp::Mul,
                    left: num(2.0),
                    right: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse_str("1 - 2 - 3").unwrap(),
            Expression::Binary {
                op: BinaryOp::Sub,
                left: Box::new(Expression::Binary {
                    op: BinaryOp::Sub,
                    left: num(1.0),
                    right: num(2.0),
                }),
                right: num(3.0),
            }
        );
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(
            parse_str("2 ** 3 ** 2").unwrap(),
            Expression::Binary {
                op: BinaryOp::Pow,
                left: num(2.0),
                right: Box::new(Expression::Binary {
                    op: BinaryOp::Pow,
                    left: num(3.0),
                    right: num(2.0),
                }),
            }
        );
    }

    #[test]
    fn test_power_binds_tighter_than_unary_minus() {
        assert_eq!(
            parse_str("-2 ** 2").unwrap(),
            Expression::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(Expression::Binary {
                    op: BinaryOp::Pow,
                    left: num(2.0),
                    right: num(2.0),
                }),
            }
        );
    }

    #[test]
    fn test_grouping_leaves_no_node() {
        assert_eq!(
            parse_str("(1 + 2) * 3").unwrap(),
            Expression::Binary {
                op: BinaryOp::Mul,
                left: Box::new(Expression::Binary {
                    op: BinaryOp::Add,
                    left: num(1.0),
                    right: num(2.0),
                }),
                right: num(3.0),
            }
        );
    }

    #[test]
    fn test_tuple_forms() {
        assert_eq!(
            parse_str("()").unwrap(),
            Expression::TupleLiteral(Vec::new())
        );
        assert_eq!(
            parse_str("(1,)").unwrap(),
            Expression::TupleLiteral(vec![Expression::NumberLiteral(1.0)])
        );
        assert_eq!(
            parse_str("(1, 2,)").unwrap(),
            Expression::TupleLiteral(vec![
                Expression::NumberLiteral(1.0),
                Expression::NumberLiteral(2.0),
            ])
        );
    }

    #[test]
    fn test_list_literal() {
        assert_eq!(
            parse_str("[1, foo, 'x',]").unwrap(),
            Expression::ListLiteral(vec![
                Expression::NumberLiteral(1.0),
                Expression::Name("foo".to_string()),
                Expression::StringLiteral("x".to_string()),
            ])
        );
        assert_eq!(parse_str("[]").unwrap(), Expression::ListLiteral(Vec::new()));
    }

    #[test]
    fn test_dict_literal() {
        assert_eq!(
            parse_str("{'a': 1, 2: 'b'}").unwrap(),
            Expression::DictLiteral(vec![
                (DictKey::Str("a".to_string()), Expression::NumberLiteral(1.0)),
                (
                    DictKey::Number(2.0),
                    Expression::StringLiteral("b".to_string())
                ),
            ])
        );
    }

    #[test]
    fn test_dict_key_must_be_literal() {
        let err = parse_str("{a: 1}").unwrap_err();
        assert!(err.to_string().contains("string or number literals"));
        assert!(parse_str("{[1]: 2}").is_err());
    }

    #[test]
    fn test_comparison_chain_folds_into_and() {
        assert_eq!(
            parse_str("a < b < c").unwrap(),
            Expression::BoolOp {
                op: BoolOpKind::And,
                left: Box::new(Expression::Binary {
                    op: BinaryOp::Lt,
                    left: name("a"),
                    right: name("b"),
                }),
                right: Box::new(Expression::Binary {
                    op: BinaryOp::Lt,
                    left: name("b"),
                    right: name("c"),
                }),
            }
        );
    }

    #[test]
    fn test_mixed_comparison_chain() {
        // in/is belong to the comparison family and chain the same way
        assert_eq!(
            parse_str("a == b in c").unwrap(),
            Expression::BoolOp {
                op: BoolOpKind::And,
                left: Box::new(Expression::Binary {
                    op: BinaryOp::Eq,
                    left: name("a"),
                    right: name("b"),
                }),
                right: Box::new(Expression::Binary {
                    op: BinaryOp::In,
                    left: name("b"),
                    right: name("c"),
                }),
            }
        );
    }

    #[test]
    fn test_legacy_not_equal() {
        assert_eq!(
            parse_str("a <> b").unwrap(),
            Expression::Binary {
                op: BinaryOp::NotEq,
                left: name("a"),
                right: name("b"),
            }
        );
    }

    #[test]
    fn test_not_binds_below_comparison() {
        assert_eq!(
            parse_str("not a in b").unwrap(),
            Expression::Unary {
                op: UnaryOp::Not,
                operand: Box::new(Expression::Binary {
                    op: BinaryOp::In,
                    left: name("a"),
                    right: name("b"),
                }),
            }
        );
    }

    #[test]
    fn test_ternary() {
        assert_eq!(
            parse_str("1 if cond else 2").unwrap(),
            Expression::Ternary {
                condition: name("cond"),
                then_expr: num(1.0),
                else_expr: num(2.0),
            }
        );
    }

    #[test]
    fn test_ternary_nests_into_else() {
        assert_eq!(
            parse_str("1 if a else 2 if b else 3").unwrap(),
            Expression::Ternary {
                condition: name("a"),
                then_expr: num(1.0),
                else_expr: Box::new(Expression::Ternary {
                    condition: name("b"),
                    then_expr: num(2.0),
                    else_expr: num(3.0),
                }),
            }
        );
    }

    #[test]
    fn test_assignment() {
        assert_eq!(
            parse_str("x = 1 + 2").unwrap(),
            Expression::Assign {
                name: "x".to_string(),
                value: Box::new(Expression::Binary {
                    op: BinaryOp::Add,
                    left: num(1.0),
                    right: num(2.0),
                }),
            }
        );
    }

    #[test]
    fn test_assignment_target_must_be_name() {
        assert!(parse_str("1 = 2").is_err());
        assert!(parse_str("a.b = 2").is_err());
        assert!(parse_str("a = b = 1").is_err());
    }

    #[test]
    fn test_call_arguments() {
        assert_eq!(
            parse_str("f(1, x, a=2)").unwrap(),
            Expression::Call {
                callee: name("f"),
                args: vec![
                    Expression::NumberLiteral(1.0),
                    Expression::Name("x".to_string()),
                ],
                kwargs: vec![("a".to_string(), Expression::NumberLiteral(2.0))],
            }
        );
    }

    #[test]
    fn test_positional_after_keyword_rejected() {
        let err = parse_str("f(a=1, 2)").unwrap_err();
        assert!(err
            .to_string()
            .contains("positional argument follows keyword argument"));
    }

    #[test]
    fn test_repeated_keyword_rejected() {
        let err = parse_str("f(a=1, a=2)").unwrap_err();
        assert!(err.to_string().contains("keyword argument repeated: a"));
        assert!(parse_str("f(a=1, b=2)").is_ok());
    }

    #[test]
    fn test_postfix_chaining() {
        assert_eq!(
            parse_str("a.b[0](1)").unwrap(),
            Expression::Call {
                callee: Box::new(Expression::IndexAccess {
                    target: Box::new(Expression::FieldAccess {
                        object: name("a"),
                        field: "b".to_string(),
                    }),
                    index: num(0.0),
                }),
                args: vec![Expression::NumberLiteral(1.0)],
                kwargs: Vec::new(),
            }
        );
    }

    #[test]
    fn test_attribute_requires_name() {
        assert!(parse_str("a.'x'").is_err());
        assert!(parse_str("a.").is_err());
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        assert!(parse_str("1 2").is_err());
        assert!(parse_str("1 + 2 )").is_err());
    }

    #[test]
    fn test_unexpected_eof() {
        assert!(matches!(parse_str(""), Err(Error::UnexpectedEof)));
        assert!(matches!(parse_str("1 +"), Err(Error::UnexpectedEof)));
        assert!(parse_str("[1, 2").is_err());
    }

    #[test]
    fn test_nesting_limit_stops_runaway_recursion() {
        // grouping parens nest in the parser even though they leave no node
        let deep = format!("{}7{}", "(".repeat(100_000), ")".repeat(100_000));
        assert!(matches!(
            parse_str(&deep),
            Err(Error::RecursionLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_nesting_limit_boundary() {
        let fits = format!("{}7{}", "(".repeat(499), ")".repeat(499));
        assert_eq!(parse_str(&fits).unwrap(), Expression::NumberLiteral(7.0));

        let over = format!("{}7{}", "(".repeat(500), ")".repeat(500));
        assert!(matches!(
            parse_str(&over),
            Err(Error::RecursionLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_boolean_operator_grouping() {
        // or is looser than and
        assert_eq!(
            parse_str("a or b and c").unwrap(),
            Expression::BoolOp {
                op: BoolOpKind::Or,
                left: name("a"),
                right: Box::new(Expression::BoolOp {
                    op: BoolOpKind::And,
                    left: name("b"),
                    right: name("c"),
                }),
            }
        );
    }

    #[test]
    fn test_bitwise_precedence_between_comparison_and_shift() {
        // a < b | c parses the | first
        assert_eq!(
            parse_str("a < b | c").unwrap(),
            Expression::Binary {
                op: BinaryOp::Lt,
                left: name("a"),
                right: Box::new(Expression::Binary {
                    op: BinaryOp::BitOr,
                    left: name("b"),
                    right: name("c"),
                }),
            }
        );
    }
}
