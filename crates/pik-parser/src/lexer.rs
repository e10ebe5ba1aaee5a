use pik_core::{SourceLocation, SourceSpan, SyntaxError};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Identifier(String),
    Number(f64),
    String(String),
    True,
    False,
    This,
    Dot,
    LParen,
    RParen,
    Comma,
    Semicolon,
    Eof,
}

impl TokenKind {
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Identifier(name) => format!("identifier \"{}\"", name),
            Self::Number(value) => format!("number {}", value),
            Self::String(value) => format!("string \"{}\"", value),
            Self::True => "TRUE".to_string(),
            Self::False => "FALSE".to_string(),
            Self::This => "THIS".to_string(),
            Self::Dot => "'.'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
            Self::Comma => "','".to_string(),
            Self::Semicolon => "';'".to_string(),
            Self::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) span: SourceSpan,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let current = self.chars.next()?;
        if current == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(current)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    /// Character after the next one, without consuming anything.
    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();
        let start = self.location();
        let Some(current) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                span: SourceSpan { start, end: start },
            });
        };

        let kind = match current {
            '.' => self.single(TokenKind::Dot),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ',' => self.single(TokenKind::Comma),
            ';' => self.single(TokenKind::Semicolon),
            '"' => self.string(start)?,
            '-' if self.peek_second().is_some_and(|next| next.is_ascii_digit()) => {
                self.number(start)?
            }
            digit if digit.is_ascii_digit() => self.number(start)?,
            letter if is_identifier_start(letter) => self.word(),
            other => {
                return Err(SyntaxError::new(
                    format!("Unexpected character '{}'", other),
                    SourceSpan { start, end: start },
                ))
            }
        };

        Ok(Token {
            kind,
            span: SourceSpan {
                start,
                end: self.location(),
            },
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    // No escape sequences: the literal runs to the next double quote.
    fn string(&mut self, start: SourceLocation) -> Result<TokenKind, SyntaxError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(TokenKind::String(value)),
                Some(current) => value.push(current),
                None => {
                    return Err(SyntaxError::new(
                        "Unterminated string literal",
                        SourceSpan {
                            start,
                            end: self.location(),
                        },
                    ))
                }
            }
        }
    }

    fn number(&mut self, start: SourceLocation) -> Result<TokenKind, SyntaxError> {
        let mut text = String::new();
        if self.peek() == Some('-') {
            text.push('-');
            self.bump();
        }
        self.digits(&mut text);
        if self.peek() == Some('.') && self.peek_second().is_some_and(|next| next.is_ascii_digit())
        {
            text.push('.');
            self.bump();
            self.digits(&mut text);
        }
        text.parse::<f64>().map(TokenKind::Number).map_err(|_| {
            SyntaxError::new(
                format!("Invalid number literal \"{}\"", text),
                SourceSpan {
                    start,
                    end: self.location(),
                },
            )
        })
    }

    fn digits(&mut self, text: &mut String) {
        while let Some(digit) = self.peek().filter(char::is_ascii_digit) {
            text.push(digit);
            self.bump();
        }
    }

    fn word(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(current) = self.peek().filter(|c| is_identifier_continue(*c)) {
            text.push(current);
            self.bump();
        }
        match text.as_str() {
            "TRUE" => TokenKind::True,
            "FALSE" => TokenKind::False,
            "THIS" => TokenKind::This,
            _ => TokenKind::Identifier(text),
        }
    }
}

fn is_identifier_start(current: char) -> bool {
    current.is_alphabetic() || current == '_' || current == '$'
}

fn is_identifier_continue(current: char) -> bool {
    current.is_alphanumeric() || current == '_' || current == '$'
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
