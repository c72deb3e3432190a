//! Parser for the `$filter` and `$orderby` text the translator emits.
//!
//! The grammar is the translator's output, not all of OData: compound
//! expressions are always parenthesized and literals use the translator's
//! spelling.

use std::str::FromStr;

use rust_decimal::Decimal;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use verity_model::{
    ArithOp, CmpOp, Direction, Expr, FieldId, Func, OrderClause, Predicate, TextOp, Value,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("syntax error at offset {offset}: {message}")]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

// ──────────────────────────────────────────────
// Tokens
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    LParen,
    RParen,
    Comma,
    Ident(String),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    DateTime(OffsetDateTime),
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, ParseError> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    let err = |offset: usize, message: String| ParseError { offset, message };

    while i < chars.len() {
        let (offset, c) = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' => {
                tokens.push((offset, Token::LParen));
                i += 1;
            }
            ')' => {
                tokens.push((offset, Token::RParen));
                i += 1;
            }
            ',' => {
                tokens.push((offset, Token::Comma));
                i += 1;
            }
            '\'' => {
                let (text, next) = read_quoted(&chars, i)
                    .ok_or_else(|| err(offset, "unterminated string literal".to_string()))?;
                tokens.push((offset, Token::Text(text)));
                i = next;
            }
            c if c.is_ascii_digit()
                || (c == '-' && chars.get(i + 1).is_some_and(|(_, n)| n.is_ascii_digit())) =>
            {
                let start = i;
                i += 1;
                while i < chars.len() && (chars[i].1.is_ascii_digit() || chars[i].1 == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().map(|(_, c)| c).collect();
                let token = if text.contains('.') {
                    Decimal::from_str(&text)
                        .map(Token::Decimal)
                        .map_err(|e| err(offset, format!("bad decimal '{}': {}", text, e)))?
                } else {
                    text.parse::<i64>()
                        .map(Token::Int)
                        .map_err(|e| err(offset, format!("bad integer '{}': {}", text, e)))?
                };
                tokens.push((offset, token));
            }
            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && (chars[i].1.is_ascii_alphanumeric() || chars[i].1 == '_')
                {
                    i += 1;
                }
                let word: String = chars[start..i].iter().map(|(_, c)| c).collect();
                if word == "datetime" && chars.get(i).is_some_and(|(_, c)| *c == '\'') {
                    let (text, next) = read_quoted(&chars, i)
                        .ok_or_else(|| err(offset, "unterminated datetime literal".to_string()))?;
                    let dt = OffsetDateTime::parse(&text, &Rfc3339)
                        .map_err(|e| err(offset, format!("bad datetime '{}': {}", text, e)))?;
                    tokens.push((offset, Token::DateTime(dt)));
                    i = next;
                } else {
                    tokens.push((offset, Token::Ident(word)));
                }
            }
            other => return Err(err(offset, format!("unexpected character '{}'", other))),
        }
    }
    Ok(tokens)
}

/// Read a `'...'` literal starting at `start`, with `''` as an escaped
/// quote. Returns the text and the index after the closing quote.
fn read_quoted(chars: &[(usize, char)], start: usize) -> Option<(String, usize)> {
    let mut out = String::new();
    let mut i = start + 1;
    loop {
        let (_, c) = *chars.get(i)?;
        if c == '\'' {
            if chars.get(i + 1).is_some_and(|(_, n)| *n == '\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            return Some((out, i + 1));
        }
        out.push(c);
        i += 1;
    }
}

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

/// Either side of the predicate/expression split. Parenthesized groups
/// are parsed before their role is known.
enum Node {
    Pred(Predicate),
    Expr(Expr),
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(o, _)| *o)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            offset: self.offset(),
            message: message.into(),
        }
    }

    fn next(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).map(|(_, t)| t.clone());
        self.pos += 1;
        t
    }

    fn expect(&mut self, want: Token, what: &str) -> Result<(), ParseError> {
        if self.peek() == Some(&want) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected {}", what)))
        }
    }

    fn peek_keyword(&self) -> Option<&str> {
        match self.peek() {
            Some(Token::Ident(w)) => Some(w.as_str()),
            _ => None,
        }
    }

    // or := and ("or" and)*
    fn parse_or(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_and()?;
        while self.peek_keyword() == Some("or") {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Node::Pred(self.as_pred(left)?.or(self.as_pred(right)?));
        }
        Ok(left)
    }

    // and := cmp ("and" cmp)*
    fn parse_and(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_comparison()?;
        while self.peek_keyword() == Some("and") {
            self.pos += 1;
            let right = self.parse_comparison()?;
            left = Node::Pred(self.as_pred(left)?.and(self.as_pred(right)?));
        }
        Ok(left)
    }

    // cmp := additive (cmpop additive)?
    fn parse_comparison(&mut self) -> Result<Node, ParseError> {
        let left = self.parse_additive()?;
        let op = match self.peek_keyword() {
            Some("eq") => CmpOp::Eq,
            Some("ne") => CmpOp::Ne,
            Some("lt") => CmpOp::Lt,
            Some("le") => CmpOp::Le,
            Some("gt") => CmpOp::Gt,
            Some("ge") => CmpOp::Ge,
            _ => return Ok(left),
        };
        self.pos += 1;
        let right = self.parse_additive()?;
        Ok(Node::Pred(Predicate::Compare {
            left: self.as_expr(left)?,
            op,
            right: self.as_expr(right)?,
        }))
    }

    fn parse_additive(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_keyword() {
                Some("add") => ArithOp::Add,
                Some("sub") => ArithOp::Sub,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_multiplicative()?;
            left = Node::Expr(self.arith(op, left, right)?);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Node, ParseError> {
        let mut left = self.parse_primary()?;
        loop {
            let op = match self.peek_keyword() {
                Some("mul") => ArithOp::Mul,
                Some("div") => ArithOp::Div,
                _ => return Ok(left),
            };
            self.pos += 1;
            let right = self.parse_primary()?;
            left = Node::Expr(self.arith(op, left, right)?);
        }
    }

    fn arith(&self, op: ArithOp, left: Node, right: Node) -> Result<Expr, ParseError> {
        Ok(Expr::Arith {
            op,
            left: Box::new(self.as_expr(left)?),
            right: Box::new(self.as_expr(right)?),
        })
    }

    fn parse_primary(&mut self) -> Result<Node, ParseError> {
        let offset = self.offset();
        match self.next() {
            Some(Token::LParen) => {
                let inner = self.parse_or()?;
                self.expect(Token::RParen, "')'")?;
                Ok(inner)
            }
            Some(Token::Int(i)) => Ok(Node::Expr(Expr::Literal(Value::Int(i)))),
            Some(Token::Decimal(d)) => Ok(Node::Expr(Expr::Literal(Value::Decimal(d)))),
            Some(Token::Text(s)) => Ok(Node::Expr(Expr::Literal(Value::Text(s)))),
            Some(Token::DateTime(dt)) => Ok(Node::Expr(Expr::Literal(Value::DateTime(dt)))),
            Some(Token::Ident(word)) => self.parse_word(&word, offset),
            Some(other) => Err(ParseError {
                offset,
                message: format!("unexpected token {:?}", other),
            }),
            None => Err(ParseError {
                offset,
                message: "unexpected end of input".to_string(),
            }),
        }
    }

    fn parse_word(&mut self, word: &str, offset: usize) -> Result<Node, ParseError> {
        match word {
            "true" => return Ok(Node::Expr(Expr::Literal(Value::Bool(true)))),
            "false" => return Ok(Node::Expr(Expr::Literal(Value::Bool(false)))),
            _ => {}
        }

        if self.peek() != Some(&Token::LParen) {
            return FieldId::from_wire_name(word)
                .map(|f| Node::Expr(Expr::Field(f)))
                .ok_or_else(|| ParseError {
                    offset,
                    message: format!("unknown field '{}'", word),
                });
        }
        self.pos += 1;

        let node = match word {
            "not" => {
                let inner = self.parse_or()?;
                Node::Pred(Predicate::Not(Box::new(self.as_pred(inner)?)))
            }
            "startswith" | "endswith" => {
                let subject = self.parse_or()?;
                self.expect(Token::Comma, "','")?;
                let needle = self.parse_needle()?;
                let op = if word == "startswith" {
                    TextOp::StartsWith
                } else {
                    TextOp::EndsWith
                };
                Node::Pred(Predicate::Text {
                    op,
                    subject: self.as_expr(subject)?,
                    needle,
                })
            }
            "substringof" => {
                let needle = self.parse_needle()?;
                self.expect(Token::Comma, "','")?;
                let subject = self.parse_or()?;
                Node::Pred(Predicate::Text {
                    op: TextOp::Contains,
                    subject: self.as_expr(subject)?,
                    needle,
                })
            }
            name => {
                let func = function_by_name(name).ok_or_else(|| ParseError {
                    offset,
                    message: format!("unknown function '{}'", name),
                })?;
                let arg = self.parse_or()?;
                Node::Expr(Expr::Call {
                    func,
                    arg: Box::new(self.as_expr(arg)?),
                })
            }
        };
        self.expect(Token::RParen, "')'")?;
        Ok(node)
    }

    fn parse_needle(&mut self) -> Result<String, ParseError> {
        match self.next() {
            Some(Token::Text(s)) => Ok(s),
            _ => {
                self.pos -= 1;
                Err(self.error("expected a string literal"))
            }
        }
    }

    fn as_pred(&self, node: Node) -> Result<Predicate, ParseError> {
        match node {
            Node::Pred(p) => Ok(p),
            Node::Expr(Expr::Literal(Value::Bool(true))) => Ok(Predicate::Always),
            Node::Expr(e) => Err(self.error(format!("expected a condition, found '{}'", e))),
        }
    }

    fn as_expr(&self, node: Node) -> Result<Expr, ParseError> {
        match node {
            Node::Expr(e) => Ok(e),
            Node::Pred(p) => Err(self.error(format!("expected a value, found '{}'", p))),
        }
    }
}

fn function_by_name(name: &str) -> Option<Func> {
    [
        Func::ToLower,
        Func::ToUpper,
        Func::Floor,
        Func::Ceiling,
        Func::Round,
        Func::Sqrt,
        Func::Year,
        Func::Month,
        Func::Day,
    ]
    .into_iter()
    .find(|f| f.name() == name)
}

/// Parse a `$filter` value into a predicate.
pub fn parse_filter(input: &str) -> Result<Predicate, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        end: input.len(),
    };
    let node = parser.parse_or()?;
    if parser.pos < parser.tokens.len() {
        return Err(parser.error("trailing input"));
    }
    parser.as_pred(node)
}

/// Parse a `$orderby` value such as `releaseDate desc,title`.
pub fn parse_order_by(input: &str) -> Result<Vec<OrderClause>, ParseError> {
    let mut clauses = Vec::new();
    let mut offset = 0;
    for part in input.split(',') {
        let mut words = part.split_whitespace();
        let name = words.next().ok_or_else(|| ParseError {
            offset,
            message: "empty sort key".to_string(),
        })?;
        let field = FieldId::from_wire_name(name).ok_or_else(|| ParseError {
            offset,
            message: format!("unknown field '{}'", name),
        })?;
        let direction = match words.next() {
            None | Some("asc") => Direction::Ascending,
            Some("desc") => Direction::Descending,
            Some(other) => {
                return Err(ParseError {
                    offset,
                    message: format!("unknown sort direction '{}'", other),
                })
            }
        };
        if words.next().is_some() {
            return Err(ParseError {
                offset,
                message: "unexpected text after sort direction".to_string(),
            });
        }
        clauses.push(OrderClause { field, direction });
        offset += part.len() + 1;
    }
    Ok(clauses)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::{render_ordering, render_predicate};
    use time::macros::datetime;
    use verity_model::predicate::field;
    use verity_model::FieldId::*;

    fn round_trip(p: Predicate) {
        let text = render_predicate(&p).unwrap();
        let parsed = parse_filter(&text).unwrap();
        assert_eq!(parsed, p, "{text}");
    }

    #[test]
    fn comparisons_and_logic() {
        round_trip(field(Year).gt(1989).and(field(Year).lt(2000)));
        round_trip(
            field(Year)
                .ge(1930)
                .and(field(Year).lt(1940))
                .or(field(Year).ge(1940).and(field(Year).lt(1950))),
        );
        round_trip(!field(BestPictureWinner).equals(false));
    }

    #[test]
    fn arithmetic_and_functions() {
        round_trip(field(Year).sub(1900).ge(80));
        round_trip(field(Duration).div(Decimal::new(600, 1)).ceiling().equals(3));
        round_trip(field(ReleaseDate).year().differs(field(Year)));
    }

    #[test]
    fn text_and_literals() {
        round_trip(field(Title).to_lower().starts_with("the"));
        round_trip(field(Title).contains("father"));
        round_trip(field(Title).equals("Schindler's List"));
        round_trip(field(ReleaseDate).equals(datetime!(1994-10-14 0:00 UTC)));
        round_trip(field(Year).gt(-5));
    }

    #[test]
    fn sqrt_parses_even_though_it_is_never_emitted() {
        let parsed = parse_filter("(sqrt(year) gt 43)").unwrap();
        assert_eq!(parsed, field(Year).sqrt().gt(43));
    }

    #[test]
    fn nested_true_is_always() {
        round_trip(Predicate::Always.and(field(Year).gt(1)));
    }

    #[test]
    fn errors_carry_offsets() {
        let err = parse_filter("(year gt 1990").unwrap_err();
        assert_eq!(err.offset, 13);
        let err = parse_filter("(rating eq 'R").unwrap_err();
        assert_eq!(err.offset, 11);
        assert!(parse_filter("(nope eq 1)").is_err());
        assert!(parse_filter("bogus(title)").is_err());
        assert!(parse_filter("year").is_err());
        assert!(parse_filter("(year gt 1) (year lt 2)").is_err());
    }

    #[test]
    fn orderings() {
        let clauses = parse_order_by("releaseDate desc,title").unwrap();
        assert_eq!(
            clauses,
            vec![OrderClause::desc(ReleaseDate), OrderClause::asc(Title)]
        );
        assert_eq!(render_ordering(&clauses), "releaseDate desc,title");
        assert_eq!(parse_order_by("year desc").unwrap(), vec![OrderClause::desc(Year)]);
        assert!(parse_order_by("title sideways").is_err());
        assert!(parse_order_by("").is_err());
    }
}
