use alloc::string::String;
use alloc::vec::Vec;

use super::EvalError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Name(String),
    /// The magnitude of an integer literal; a leading `-` is a separate token.
    Int(u128),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Dot,
    Equals,
    Minus,
    Eof,
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub offset: usize,
}

/// Splits `source` into tokens, ending with [`Token::Eof`].
pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, EvalError> {
    let mut lexer = Lexer {
        source,
        pos: 0,
        tokens: Vec::new(),
    };
    lexer.run()?;
    Ok(lexer.tokens)
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    tokens: Vec<Spanned>,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.source[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn push(&mut self, token: Token, offset: usize) {
        self.tokens.push(Spanned { token, offset });
    }

    fn run(&mut self) -> Result<(), EvalError> {
        while let Some(c) = self.peek() {
            let start = self.pos;
            match c {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '(' | ')' | '[' | ']' | '{' | '}' | ',' | ':' | '.' | '=' | '-' => {
                    self.bump();
                    let token = match c {
                        '(' => Token::LParen,
                        ')' => Token::RParen,
                        '[' => Token::LBracket,
                        ']' => Token::RBracket,
                        '{' => Token::LBrace,
                        '}' => Token::RBrace,
                        ',' => Token::Comma,
                        ':' => Token::Colon,
                        '.' => Token::Dot,
                        '=' => Token::Equals,
                        _ => Token::Minus,
                    };
                    self.push(token, start);
                }
                '\'' | '"' => {
                    let text = self.string()?;
                    self.push(Token::Str(text), start);
                }
                'b' | 'B' if matches!(self.peek_second(), Some('\'' | '"')) => {
                    self.bump();
                    let bytes = self.bytes()?;
                    self.push(Token::Bytes(bytes), start);
                }
                c if c.is_ascii_digit() => {
                    let token = self.number()?;
                    self.push(token, start);
                }
                c if c == '_' || c.is_alphabetic() => {
                    while self
                        .peek()
                        .is_some_and(|c| c == '_' || c.is_alphanumeric())
                    {
                        self.bump();
                    }
                    let name = String::from(&self.source[start..self.pos]);
                    self.push(Token::Name(name), start);
                }
                other => {
                    return Err(EvalError::parse(
                        start,
                        alloc::format!("unexpected character {other:?}"),
                    ));
                }
            }
        }
        self.push(Token::Eof, self.pos);
        Ok(())
    }

    fn number(&mut self) -> Result<Token, EvalError> {
        let start = self.pos;
        let mut is_float = false;
        self.digits();
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            self.digits();
        } else if self.peek() == Some('.') && !self.peek_second().is_some_and(char::is_alphabetic) {
            // `1.` is a float without a fraction.
            is_float = true;
            self.bump();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(EvalError::parse(self.pos, "missing exponent digits"));
            }
            self.digits();
        }

        let text = &self.source[start..self.pos];
        if is_float {
            text.parse::<f64>()
                .map(Token::Float)
                .map_err(|_| EvalError::parse(start, "invalid float literal"))
        } else {
            text.parse::<u128>()
                .map(Token::Int)
                .map_err(|_| EvalError::parse(start, "integer literal out of range"))
        }
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    // Reads a quoted literal and passes each unescaped unit to `sink`.
    fn quoted(&mut self, mut sink: impl FnMut(Unit, usize) -> Result<(), EvalError>) -> Result<(), EvalError> {
        let open = self.pos;
        let Some(quote) = self.bump() else {
            return Err(EvalError::parse(open, "expected a quote"));
        };
        loop {
            let at = self.pos;
            match self.bump() {
                None | Some('\n') => return Err(EvalError::parse(open, "unterminated string literal")),
                Some(c) if c == quote => return Ok(()),
                Some('\\') => {
                    let unit = self.escape(at)?;
                    sink(unit, at)?;
                }
                Some(c) => sink(Unit::Char(c), at)?,
            }
        }
    }

    fn escape(&mut self, at: usize) -> Result<Unit, EvalError> {
        let Some(c) = self.bump() else {
            return Err(EvalError::parse(at, "unterminated escape"));
        };
        Ok(match c {
            '\\' | '\'' | '"' => Unit::Char(c),
            'n' => Unit::Char('\n'),
            't' => Unit::Char('\t'),
            'r' => Unit::Char('\r'),
            'a' => Unit::Char('\u{7}'),
            'b' => Unit::Char('\u{8}'),
            'f' => Unit::Char('\u{c}'),
            'v' => Unit::Char('\u{b}'),
            '\n' => Unit::Nothing,
            'x' => Unit::Byte(self.hex(2, at)? as u8),
            'u' => Unit::Wide(self.hex(4, at)?, 'u'),
            'U' => Unit::Wide(self.hex(8, at)?, 'U'),
            '0'..='7' => {
                let mut code = c.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match self.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            code = code * 8 + digit;
                            self.bump();
                        }
                        None => break,
                    }
                }
                Unit::Octal(code)
            }
            other => Unit::Unknown(other),
        })
    }

    fn hex(&mut self, len: usize, at: usize) -> Result<u32, EvalError> {
        let end = self.pos + len;
        let digits = self
            .source
            .get(self.pos..end)
            .filter(|digits| digits.chars().all(|c| c.is_ascii_hexdigit()))
            .ok_or_else(|| EvalError::parse(at, "truncated hex escape"))?;
        let code = u32::from_str_radix(digits, 16)
            .map_err(|_| EvalError::parse(at, "invalid hex escape"))?;
        self.pos = end;
        Ok(code)
    }

    fn string(&mut self) -> Result<String, EvalError> {
        let mut text = String::new();
        self.quoted(|unit, at| {
            match unit {
                Unit::Char(c) => text.push(c),
                Unit::Nothing => {}
                Unit::Byte(code) => text.push(char::from(code)),
                Unit::Octal(code) | Unit::Wide(code, _) => text.push(
                    char::from_u32(code).ok_or_else(|| EvalError::parse(at, "invalid code point"))?,
                ),
                Unit::Unknown(c) => {
                    text.push('\\');
                    text.push(c);
                }
            }
            Ok(())
        })?;
        Ok(text)
    }

    fn bytes(&mut self) -> Result<Vec<u8>, EvalError> {
        let mut bytes = Vec::new();
        self.quoted(|unit, at| {
            match unit {
                Unit::Char(c) if c.is_ascii() => bytes.push(c as u8),
                Unit::Char(_) => {
                    return Err(EvalError::parse(at, "bytes can only contain ASCII literal characters"));
                }
                Unit::Nothing => {}
                Unit::Byte(byte) => bytes.push(byte),
                Unit::Octal(code) => bytes.push((code & 0xff) as u8),
                // `\u` is not an escape in bytes; the digits were consumed, so rebuild them.
                Unit::Wide(code, marker) => {
                    let width = if marker == 'u' { 4 } else { 8 };
                    bytes.push(b'\\');
                    bytes.push(marker as u8);
                    bytes.extend_from_slice(alloc::format!("{code:0width$x}").as_bytes());
                }
                Unit::Unknown(c) if c.is_ascii() => {
                    bytes.push(b'\\');
                    bytes.push(c as u8);
                }
                Unit::Unknown(_) => {
                    return Err(EvalError::parse(at, "bytes can only contain ASCII literal characters"));
                }
            }
            Ok(())
        })?;
        Ok(bytes)
    }
}

/// One unescaped piece of a quoted literal.
enum Unit {
    Char(char),
    /// A line continuation.
    Nothing,
    Byte(u8),
    Octal(u32),
    Wide(u32, char),
    Unknown(char),
}

// -----------------------------------------------------------------------------
// Tests
