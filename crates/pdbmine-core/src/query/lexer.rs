use super::error::QueryError;
use super::expr::CompareOp;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Bare or quoted identifier. Keywords are identifiers matched case-insensitively by the parser.
    Ident { name: String, quoted: bool },
    Str(String),
    Integer(i64),
    Double(f64),
    Op(CompareOp),
    LParen,
    RParen,
    Comma,
    Star,
    Minus,
    Semicolon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident { name, .. } => write!(f, "identifier '{}'", name),
            Token::Str(s) => write!(f, "string '{}'", s),
            Token::Integer(v) => write!(f, "number {}", v),
            Token::Double(v) => write!(f, "number {}", v),
            Token::Op(op) => write!(f, "operator '{}'", op),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Comma => write!(f, "','"),
            Token::Star => write!(f, "'*'"),
            Token::Minus => write!(f, "'-'"),
            Token::Semicolon => write!(f, "';'"),
        }
    }
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, QueryError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        match c {
            c if c.is_whitespace() => pos += 1,
            '(' => {
                tokens.push(Token::LParen);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                pos += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                pos += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                pos += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                pos += 1;
            }
            ';' => {
                tokens.push(Token::Semicolon);
                pos += 1;
            }
            '=' => {
                pos += if chars.get(pos + 1) == Some(&'=') { 2 } else { 1 };
                tokens.push(Token::Op(CompareOp::Eq));
            }
            '!' if chars.get(pos + 1) == Some(&'=') => {
                tokens.push(Token::Op(CompareOp::NotEq));
                pos += 2;
            }
            '<' => match chars.get(pos + 1) {
                Some('=') => {
                    tokens.push(Token::Op(CompareOp::LtEq));
                    pos += 2;
                }
                Some('>') => {
                    tokens.push(Token::Op(CompareOp::NotEq));
                    pos += 2;
                }
                _ => {
                    tokens.push(Token::Op(CompareOp::Lt));
                    pos += 1;
                }
            },
            '>' => {
                if chars.get(pos + 1) == Some(&'=') {
                    tokens.push(Token::Op(CompareOp::GtEq));
                    pos += 2;
                } else {
                    tokens.push(Token::Op(CompareOp::Gt));
                    pos += 1;
                }
            }
            '\'' => {
                let (text, next) = read_quoted(&chars, pos, '\'')?;
                tokens.push(Token::Str(text));
                pos = next;
            }
            '`' | '"' => {
                let (name, next) = read_quoted(&chars, pos, c)?;
                tokens.push(Token::Ident { name, quoted: true });
                pos = next;
            }
            c if c.is_ascii_digit() || (c == '.' && next_is_digit(&chars, pos)) => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                    pos += 1;
                }
                if pos < chars.len() && matches!(chars[pos], 'e' | 'E') {
                    pos += 1;
                    if pos < chars.len() && matches!(chars[pos], '+' | '-') {
                        pos += 1;
                    }
                    while pos < chars.len() && chars[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
                let text: String = chars[start..pos].iter().collect();
                tokens.push(parse_number(&text, start)?);
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = pos;
                while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                    pos += 1;
                }
                tokens.push(Token::Ident {
                    name: chars[start..pos].iter().collect(),
                    quoted: false,
                });
            }
            other => {
                return Err(QueryError::UnexpectedCharacter {
                    position: pos,
                    found: other,
                });
            }
        }
    }

    Ok(tokens)
}

fn next_is_digit(chars: &[char], pos: usize) -> bool {
    chars.get(pos + 1).is_some_and(|c| c.is_ascii_digit())
}

fn parse_number(text: &str, position: usize) -> Result<Token, QueryError> {
    let invalid = || QueryError::InvalidNumber {
        position,
        text: text.to_string(),
    };
    if text.contains(['.', 'e', 'E']) {
        text.parse().map(Token::Double).map_err(|_| invalid())
    } else {
        text.parse().map(Token::Integer).map_err(|_| invalid())
    }
}

/// Reads a literal delimited by `quote`; a doubled quote stands for one quote character.
fn read_quoted(chars: &[char], start: usize, quote: char) -> Result<(String, usize), QueryError> {
    let mut text = String::new();
    let mut pos = start + 1;
    loop {
        match chars.get(pos) {
            None => return Err(QueryError::UnterminatedString { position: start }),
            Some(&c) if c == quote => {
                if chars.get(pos + 1) == Some(&quote) {
                    text.push(quote);
                    pos += 2;
                } else {
                    return Ok((text, pos + 1));
                }
            }
            Some(&c) => {
                text.push(c);
                pos += 1;
            }
        }
    }
}
