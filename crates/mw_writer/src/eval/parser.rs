use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use super::EvalError;
use super::token::{Spanned, Token, tokenize};

/// The expression subset the serializer writes.
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Expr {
    Name(String),
    Attribute(Box<Expr>, String),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        kwargs: Vec<(String, Expr)>,
    },
    Neg(Box<Expr>),
    /// Magnitude only, so `-2**127` can be written.
    Int(u128),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    List(Vec<Expr>),
    Tuple(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    Set(Vec<Expr>),
}

impl Expr {
    /// The dotted text of a name or attribute chain, e.g. `models.SET`.
    pub fn dotted(&self) -> Option<String> {
        match self {
            Self::Name(name) => Some(name.clone()),
            Self::Attribute(base, attr) => {
                let mut path = base.dotted()?;
                path.push('.');
                path.push_str(attr);
                Some(path)
            }
            _ => None,
        }
    }
}

/// Parses exactly one expression.
pub(super) fn parse(source: &str) -> Result<Expr, EvalError> {
    let mut parser = Parser {
        tokens: tokenize(source)?,
        pos: 0,
    };
    let expr = parser.expr()?;
    match parser.peek() {
        Token::Eof => Ok(expr),
        _ => Err(parser.unexpected("end of input")),
    }
}

static EOF: Token = Token::Eof;

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    fn peek_nth(&self, n: usize) -> &Token {
        self.tokens
            .get(self.pos + n)
            .or_else(|| self.tokens.last())
            .map_or(&EOF, |spanned| &spanned.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |spanned| spanned.offset)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, what: &str) -> Result<(), EvalError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn unexpected(&self, expected: &str) -> EvalError {
        EvalError::parse(
            self.offset(),
            alloc::format!("expected {expected}, found {:?}", self.peek()),
        )
    }

    fn expr(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.expr()?)));
        }
        let mut expr = self.atom()?;
        loop {
            if self.eat(&Token::Dot) {
                match self.advance() {
                    Token::Name(attr) => expr = Expr::Attribute(Box::new(expr), attr),
                    _ => return Err(self.unexpected("an attribute name")),
                }
            } else if self.eat(&Token::LParen) {
                let (args, kwargs) = self.arguments()?;
                expr = Expr::Call {
                    func: Box::new(expr),
                    args,
                    kwargs,
                };
            } else {
                return Ok(expr);
            }
        }
    }

    fn atom(&mut self) -> Result<Expr, EvalError> {
        let offset = self.offset();
        match self.advance() {
            Token::Name(name) => Ok(Expr::Name(name)),
            Token::Int(int) => Ok(Expr::Int(int)),
            Token::Float(float) => Ok(Expr::Float(float)),
            Token::Str(mut text) => {
                // Adjacent literals concatenate.
                while let Token::Str(next) = self.peek() {
                    text.push_str(next);
                    self.advance();
                }
                Ok(Expr::Str(text))
            }
            Token::Bytes(mut bytes) => {
                while let Token::Bytes(next) = self.peek() {
                    bytes.extend_from_slice(next);
                    self.advance();
                }
                Ok(Expr::Bytes(bytes))
            }
            Token::LParen => self.parenthesized(),
            Token::LBracket => Ok(Expr::List(self.sequence(&Token::RBracket)?)),
            Token::LBrace => self.braced(),
            token => Err(EvalError::parse(
                offset,
                alloc::format!("expected an expression, found {token:?}"),
            )),
        }
    }

    // After `(`: `()`, `(x)` or a tuple.
    fn parenthesized(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::RParen) {
            return Ok(Expr::Tuple(Vec::new()));
        }
        let first = self.expr()?;
        if self.eat(&Token::RParen) {
            return Ok(first);
        }
        self.expect(&Token::Comma, "`,` or `)`")?;
        let mut items = alloc::vec![first];
        items.extend(self.sequence(&Token::RParen)?);
        Ok(Expr::Tuple(items))
    }

    // After `{`: a dict or a set.
    fn braced(&mut self) -> Result<Expr, EvalError> {
        if self.eat(&Token::RBrace) {
            return Ok(Expr::Dict(Vec::new()));
        }
        let first = self.expr()?;
        if !self.eat(&Token::Colon) {
            let mut items = alloc::vec![first];
            if self.eat(&Token::Comma) {
                items.extend(self.sequence(&Token::RBrace)?);
            } else {
                self.expect(&Token::RBrace, "`,` or `}`")?;
            }
            return Ok(Expr::Set(items));
        }

        let mut entries = alloc::vec![(first, self.expr()?)];
        while self.eat(&Token::Comma) {
            if self.eat(&Token::RBrace) {
                return Ok(Expr::Dict(entries));
            }
            let key = self.expr()?;
            self.expect(&Token::Colon, "`:`")?;
            entries.push((key, self.expr()?));
        }
        self.expect(&Token::RBrace, "`,` or `}`")?;
        Ok(Expr::Dict(entries))
    }

    // Comma separated expressions up to `close`, trailing comma allowed.
    fn sequence(&mut self, close: &Token) -> Result<Vec<Expr>, EvalError> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.expr()?);
            if !self.eat(&Token::Comma) {
                self.expect(close, "`,` or a closing bracket")?;
                return Ok(items);
            }
        }
    }

    // After `(` of a call.
    fn arguments(&mut self) -> Result<(Vec<Expr>, Vec<(String, Expr)>), EvalError> {
        let mut args = Vec::new();
        let mut kwargs: Vec<(String, Expr)> = Vec::new();
        loop {
            if self.eat(&Token::RParen) {
                return Ok((args, kwargs));
            }
            if let (Token::Name(name), Token::Equals) = (self.peek(), self.peek_nth(1)) {
                let name = name.clone();
                self.advance();
                self.advance();
                kwargs.push((name, self.expr()?));
            } else if kwargs.is_empty() {
                args.push(self.expr()?);
            } else {
                return Err(EvalError::parse(
                    self.offset(),
                    "positional argument follows keyword argument",
                ));
            }
            if !self.eat(&Token::Comma) {
                self.expect(&Token::RParen, "`,` or `)`")?;
                return Ok((args, kwargs));
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
