use crate::error::{MintError, Span};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Structural tokens
    Semicolon,
    Comma,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Pipe,

    // Arithmetic operators
    Plus,
    Minus,
    Star,
    Slash,

    // Literals
    Number,
    Identifier,

    // Keywords
    Let,
    Be,
    Fn,
    With,
    Of,
    Returning,
    Print,

    // Special
    Eof,
}

impl TokenType {
    pub fn describe(&self) -> &'static str {
        match self {
            TokenType::Semicolon => "';'",
            TokenType::Comma => "','",
            TokenType::LeftParen => "'('",
            TokenType::RightParen => "')'",
            TokenType::LeftBrace => "'{'",
            TokenType::RightBrace => "'}'",
            TokenType::Pipe => "'|'",
            TokenType::Plus => "'+'",
            TokenType::Minus => "'-'",
            TokenType::Star => "'*'",
            TokenType::Slash => "'/'",
            TokenType::Number => "number",
            TokenType::Identifier => "identifier",
            TokenType::Let => "'let'",
            TokenType::Be => "'be'",
            TokenType::Fn => "'fn'",
            TokenType::With => "'with'",
            TokenType::Of => "'of'",
            TokenType::Returning => "'returning'",
            TokenType::Print => "'print'",
            TokenType::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Literal payload of a token: the parsed number, the identifier text, or an
/// operator's symbol.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub value: Option<TokenValue>,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, value: Option<TokenValue>, span: Span) -> Self {
        Self {
            token_type,
            value,
            span,
        }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.column
    }

    pub fn text(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn number(&self) -> Option<f64> {
        match self.value {
            Some(TokenValue::Number(n)) => Some(n),
            _ => None,
        }
    }
}

/// Position of a character before it was consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

pub struct Lexer {
    source: Vec<char>,
    current: usize,
    line: usize,
    column: usize,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("let", TokenType::Let);
        keywords.insert("be", TokenType::Be);
        keywords.insert("fn", TokenType::Fn);
        keywords.insert("with", TokenType::With);
        keywords.insert("of", TokenType::Of);
        keywords.insert("returning", TokenType::Returning);
        keywords.insert("print", TokenType::Print);

        Self {
            source: source.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
            keywords,
        }
    }

    /// Scan the whole input. The result always ends in exactly one `Eof`.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, MintError> {
        let mut tokens = vec![self.next_token()?];
        while tokens[tokens.len() - 1].token_type != TokenType::Eof {
            tokens.push(self.next_token()?);
        }
        Ok(tokens)
    }

    /// Next token in the input; keeps returning `Eof` once exhausted.
    pub fn next_token(&mut self) -> Result<Token, MintError> {
        loop {
            let c = match self.peek() {
                Some(c) => c,
                None => {
                    return Ok(Token::new(
                        TokenType::Eof,
                        None,
                        Span::new(self.current, self.current, self.line, self.column),
                    ))
                }
            };

            match c {
                ' ' | '\t' | '\r' | '\n' => {
                    self.advance();
                }
                '#' => {
                    // Comment runs through the end of the line, newline included
                    while let Some(c) = self.peek() {
                        self.advance();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                ';' => return Ok(self.single(TokenType::Semicolon, None)),
                ',' => return Ok(self.single(TokenType::Comma, None)),
                '(' => return Ok(self.single(TokenType::LeftParen, None)),
                ')' => return Ok(self.single(TokenType::RightParen, None)),
                '{' => return Ok(self.single(TokenType::LeftBrace, None)),
                '}' => return Ok(self.single(TokenType::RightBrace, None)),
                '|' => return Ok(self.single(TokenType::Pipe, None)),
                '+' | '-' | '*' | '/' => {
                    let token_type = match c {
                        '+' => TokenType::Plus,
                        '-' => TokenType::Minus,
                        '*' => TokenType::Star,
                        _ => TokenType::Slash,
                    };
                    return Ok(self.single(token_type, Some(TokenValue::Text(c.to_string()))));
                }
                c if c.is_ascii_digit() => return self.number(),
                c if c.is_ascii_alphabetic() => return Ok(self.identifier()),
                _ => {
                    return Err(MintError::invalid_character(
                        Span::single(self.current, self.line, self.column),
                        c,
                    ))
                }
            }
        }
    }

    /// Consume one character, returning where it started.
    pub fn advance(&mut self) -> Position {
        let position = Position {
            offset: self.current,
            line: self.line,
            column: self.column,
        };

        if let Some(c) = self.peek() {
            self.current += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }

        position
    }

    pub fn peek(&self) -> Option<char> {
        self.source.get(self.current).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.source.get(self.current + 1).copied()
    }

    fn single(&mut self, token_type: TokenType, value: Option<TokenValue>) -> Token {
        let start = self.advance();
        Token::new(
            token_type,
            value,
            Span::single(start.offset, start.line, start.column),
        )
    }

    fn number(&mut self) -> Result<Token, MintError> {
        let start = self.advance();

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.peek() == Some('.') {
            if !self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
                let dot = Span::single(self.current, self.line, self.column);
                return Err(MintError::invalid_character(dot, '.')
                    .with_help("A fractional part needs digits on both sides of '.', e.g. 10.5"));
            }
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text: String = self.source[start.offset..self.current].iter().collect();
        let span = Span::new(start.offset, self.current, start.line, start.column);
        let value = text.parse::<f64>().map_err(|_| {
            MintError::invalid_syntax(span, format!("Invalid number literal '{}'", text))
        })?;

        Ok(Token::new(TokenType::Number, Some(TokenValue::Number(value)), span))
    }

    fn identifier(&mut self) -> Token {
        let start = self.advance();

        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance();
        }

        let text: String = self.source[start.offset..self.current].iter().collect();
        let span = Span::new(start.offset, self.current, start.line, start.column);

        match self.keywords.get(text.to_ascii_lowercase().as_str()) {
            Some(keyword) => Token::new(*keyword, None, span),
            None => Token::new(TokenType::Identifier, Some(TokenValue::Text(text)), span),
        }
    }
}
