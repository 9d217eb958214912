use super::error::QueryError;
use super::expr::{Expr, LikePattern, col, lit};
use super::lexer::{Token, tokenize};
use crate::dataset::value::Value;

const RESERVED: [&str; 10] = [
    "SELECT", "FROM", "WHERE", "LIMIT", "AND", "OR", "NOT", "IS", "NULL", "LIKE",
];

/// Deepest combined nesting of parentheses and `NOT` accepted in a condition.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Columns requested by a `SELECT` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    All,
    Columns(Vec<String>),
}

/// A parsed `SELECT <projection> FROM <view> [WHERE <condition>] [LIMIT <n>]` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    pub projection: Projection,
    pub from: String,
    pub predicate: Option<Expr>,
    pub limit: Option<usize>,
}

/// Parses a filter condition such as `Ki IS NOT NULL AND ecNo LIKE '2.7.%'`.
///
/// `NOT` binds tighter than `AND`, which binds tighter than `OR`. Keywords are
/// case-insensitive.
pub fn parse_predicate(text: &str) -> Result<Expr, QueryError> {
    let mut parser = Parser::new(tokenize(text)?);
    let expr = parser.or_expr()?;
    parser.finish()?;
    Ok(expr)
}

/// Parses a single `SELECT` statement, optionally terminated by `;`.
pub fn parse_select(text: &str) -> Result<SelectStatement, QueryError> {
    let mut parser = Parser::new(tokenize(text)?);
    let statement = parser.select()?;
    parser.finish()?;
    Ok(statement)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<T, QueryError>,
    ) -> Result<T, QueryError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(QueryError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(expected: &str, found: Option<Token>) -> QueryError {
        match found {
            Some(token) => QueryError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.to_string(),
            },
            None => QueryError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(
            self.peek(),
            Some(Token::Ident { name, quoted: false }) if name.eq_ignore_ascii_case(keyword)
        )
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.at_keyword(keyword) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), QueryError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(Self::unexpected(keyword, self.advance()))
        }
    }

    fn expect(&mut self, expected: Token, description: &str) -> Result<(), QueryError> {
        match self.advance() {
            Some(token) if token == expected => Ok(()),
            other => Err(Self::unexpected(description, other)),
        }
    }

    fn identifier(&mut self, description: &str) -> Result<String, QueryError> {
        match self.advance() {
            Some(Token::Ident { name, quoted: true }) => Ok(name),
            Some(Token::Ident {
                name,
                quoted: false,
            }) if !is_reserved(&name) => Ok(name),
            other => Err(Self::unexpected(description, other)),
        }
    }

    fn finish(&mut self) -> Result<(), QueryError> {
        if self.peek() == Some(&Token::Semicolon) {
            self.pos += 1;
        }
        match self.advance() {
            None => Ok(()),
            found => Err(Self::unexpected("end of query", found)),
        }
    }

    fn select(&mut self) -> Result<SelectStatement, QueryError> {
        self.expect_keyword("SELECT")?;
        let projection = if self.peek() == Some(&Token::Star) {
            self.pos += 1;
            Projection::All
        } else {
            let mut columns = vec![self.identifier("column name or '*'")?];
            while self.peek() == Some(&Token::Comma) {
                self.pos += 1;
                columns.push(self.identifier("column name")?);
            }
            Projection::Columns(columns)
        };

        self.expect_keyword("FROM")?;
        let from = self.identifier("view name")?;

        let predicate = if self.eat_keyword("WHERE") {
            Some(self.or_expr()?)
        } else {
            None
        };

        let limit = if self.eat_keyword("LIMIT") {
            match self.advance() {
                Some(Token::Integer(n)) if n >= 0 => Some(n as usize),
                other => return Err(Self::unexpected("non-negative row count", other)),
            }
        } else {
            None
        };

        Ok(SelectStatement {
            projection,
            from,
            predicate,
            limit,
        })
    }

    fn or_expr(&mut self) -> Result<Expr, QueryError> {
        let mut expr = self.and_expr()?;
        while self.eat_keyword("OR") {
            expr = expr.or(self.and_expr()?);
        }
        Ok(expr)
    }

    fn and_expr(&mut self) -> Result<Expr, QueryError> {
        let mut expr = self.not_expr()?;
        while self.eat_keyword("AND") {
            expr = expr.and(self.not_expr()?);
        }
        Ok(expr)
    }

    fn not_expr(&mut self) -> Result<Expr, QueryError> {
        if self.eat_keyword("NOT") {
            Ok(self.nested(Self::not_expr)?.not())
        } else {
            self.predicate()
        }
    }

    fn predicate(&mut self) -> Result<Expr, QueryError> {
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let inner = self.nested(Self::or_expr)?;
            self.expect(Token::RParen, "')'")?;
            return Ok(inner);
        }

        let operand = self.operand()?;

        if self.eat_keyword("IS") {
            let negated = self.eat_keyword("NOT");
            self.expect_keyword("NULL")?;
            return Ok(if negated {
                operand.is_not_null()
            } else {
                operand.is_null()
            });
        }

        let negated_like = self.at_keyword("NOT")
            && matches!(
                self.tokens.get(self.pos + 1),
                Some(Token::Ident { name, quoted: false }) if name.eq_ignore_ascii_case("LIKE")
            );
        if negated_like {
            self.pos += 1;
        }
        if self.eat_keyword("LIKE") {
            let pattern = match self.advance() {
                Some(Token::Str(text)) => LikePattern::new(&text),
                other => return Err(Self::unexpected("pattern string", other)),
            };
            return Ok(Expr::Like {
                expr: Box::new(operand),
                pattern,
                negated: negated_like,
            });
        }

        if let Some(Token::Op(op)) = self.peek() {
            let op = *op;
            self.pos += 1;
            let right = self.operand()?;
            return Ok(Expr::Compare {
                left: Box::new(operand),
                op,
                right: Box::new(right),
            });
        }

        Ok(operand)
    }

    fn operand(&mut self) -> Result<Expr, QueryError> {
        match self.advance() {
            Some(Token::Ident { name, quoted: true }) => Ok(col(&name)),
            Some(Token::Ident {
                name,
                quoted: false,
            }) => {
                if name.eq_ignore_ascii_case("NULL") {
                    Ok(lit(Value::Null))
                } else if is_reserved(&name) {
                    Err(Self::unexpected(
                        "column or literal",
                        Some(Token::Ident {
                            name,
                            quoted: false,
                        }),
                    ))
                } else {
                    Ok(col(&name))
                }
            }
            Some(Token::Str(text)) => Ok(lit(text)),
            Some(Token::Integer(v)) => Ok(lit(v)),
            Some(Token::Double(v)) => Ok(lit(v)),
            Some(Token::Minus) => match self.advance() {
                Some(Token::Integer(v)) => Ok(lit(-v)),
                Some(Token::Double(v)) => Ok(lit(-v)),
                other => Err(Self::unexpected("number", other)),
            },
            other => Err(Self::unexpected("column or literal", other)),
        }
    }
}

fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|k| k.eq_ignore_ascii_case(word))
}
