use std::ops::Range;

use super::lexer::{tokenize, Token};
use crate::error::{FormulaError, FormulaResult};

/// Formula expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    String(String),
    Boolean(bool),
    Variable(String),
    Member {
        object: Box<Expr>,
        property: String,
    },
    Negate(Box<Expr>),
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
        }
    }
}

/// Parse a complete formula expression
pub fn parse_formula(source: &str) -> FormulaResult<Expr> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: source.len(),
    };

    let expr = parser.parse_expression()?;
    if let Some((token, span)) = parser.tokens.get(parser.pos) {
        return Err(FormulaError::syntax(
            span.start,
            format!("unexpected {:?} after expression", token),
        ));
    }
    Ok(expr)
}

struct Parser<'src> {
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    end: usize,
}

impl<'src> Parser<'src> {
    fn peek(&self) -> Option<&Token<'src>> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn current_pos(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.end)
    }

    fn advance(&mut self) -> Option<Token<'src>> {
        let token = self.tokens.get(self.pos).map(|(t, _)| t.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn match_op(&mut self, table: &[(Token<'src>, BinaryOp)]) -> Option<BinaryOp> {
        let current = self.peek()?;
        let op = table
            .iter()
            .find(|(token, _)| token == current)
            .map(|(_, op)| *op)?;
        self.pos += 1;
        Some(op)
    }

    /// Equality has the lowest precedence
    fn parse_expression(&mut self) -> FormulaResult<Expr> {
        self.parse_binary_level(0)
    }

    fn parse_binary_level(&mut self, level: usize) -> FormulaResult<Expr> {
        const LEVELS: [&[(Token<'static>, BinaryOp)]; 3] = [
            &[(Token::EqEq, BinaryOp::Equals), (Token::NotEq, BinaryOp::NotEquals)],
            &[
                (Token::Lt, BinaryOp::LessThan),
                (Token::Lte, BinaryOp::LessThanOrEqual),
                (Token::Gt, BinaryOp::GreaterThan),
                (Token::Gte, BinaryOp::GreaterThanOrEqual),
            ],
            &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Subtract)],
        ];
        const MULTIPLICATIVE: &[(Token<'static>, BinaryOp)] = &[
            (Token::Star, BinaryOp::Multiply),
            (Token::Slash, BinaryOp::Divide),
        ];

        let table = LEVELS.get(level).copied().unwrap_or(MULTIPLICATIVE);
        let is_last = level >= LEVELS.len();

        let mut left = if is_last {
            self.parse_unary()?
        } else {
            self.parse_binary_level(level + 1)?
        };

        while let Some(operator) = self.match_op(table) {
            let right = if is_last {
                self.parse_unary()?
            } else {
                self.parse_binary_level(level + 1)?
            };
            left = Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Expr> {
        if self.peek() == Some(&Token::Minus) {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Negate(Box::new(operand)));
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> FormulaResult<Expr> {
        let mut expr = self.parse_primary()?;

        while self.peek() == Some(&Token::Dot) {
            self.advance();
            let pos = self.current_pos();
            match self.advance() {
                Some(Token::Ident(property)) => {
                    expr = Expr::Member {
                        object: Box::new(expr),
                        property: property.to_string(),
                    };
                }
                _ => return Err(FormulaError::syntax(pos, "expected property name after '.'")),
            }
        }

        Ok(expr)
    }

    fn parse_primary(&mut self) -> FormulaResult<Expr> {
        let pos = self.current_pos();

        match self.advance() {
            Some(Token::Number(n)) => n
                .parse::<f64>()
                .map(Expr::Number)
                .map_err(|_| FormulaError::syntax(pos, format!("invalid number {}", n))),
            Some(Token::String(s)) => Ok(Expr::String(s.replace("\\\"", "\""))),
            Some(Token::True) => Ok(Expr::Boolean(true)),
            Some(Token::False) => Ok(Expr::Boolean(false)),
            Some(Token::Ident(name)) => Ok(Expr::Variable(name.to_string())),
            Some(Token::LParen) => {
                let expr = self.parse_expression()?;
                let close = self.current_pos();
                match self.advance() {
                    Some(Token::RParen) => Ok(expr),
                    _ => Err(FormulaError::syntax(close, "expected ')'")),
                }
            }
            Some(token) => Err(FormulaError::syntax(
                pos,
                format!("unexpected {:?}", token),
            )),
            None => Err(FormulaError::syntax(pos, "unexpected end of formula")),
        }
    }
}
