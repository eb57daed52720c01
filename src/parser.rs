use crate::ast::{BinaryOp, FnArgs, Node, Program, UnaryOp, Var};
use crate::error::{ErrorKind, MintError, Span};
use crate::lexer::{Token, TokenType};

/// Recursive-descent parser over a fully scanned token list.
///
/// ```text
/// program        := (statement ';')*
/// statement      := declaration | print | expr
/// declaration    := 'let' VAR 'be' (fn_declaration | expr)
/// fn_declaration := 'fn' fn_args 'returning' (fn_declaration | expr)
/// fn_args        := 'with' VAR (',' VAR)*
/// fn_call        := VAR 'of' expr (',' expr)*
/// print          := 'print' expr
/// expr           := fn_call | sum
/// sum            := product (('+' | '-') product)?
/// product        := value (('*' | '/') value)?
/// value          := ('+' | '-') value | VAR | NUM | '(' expr ')'
/// ```
///
/// `sum` and `product` take at most one operator each, so `1 + 2 + 3` is a
/// syntax error rather than a left-associative chain.
///
/// Nesting (parentheses, unary chains, call arguments, curried bodies) is
/// capped at `max_nesting` levels so deep input fails with `RecursionLimit`
/// instead of exhausting the stack.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    depth: usize,
    max_nesting: usize,
}

pub const DEFAULT_MAX_NESTING: usize = 200;

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self::with_max_nesting(tokens, DEFAULT_MAX_NESTING)
    }

    pub fn with_max_nesting(mut tokens: Vec<Token>, max_nesting: usize) -> Self {
        if tokens.last().map(|t| t.token_type) != Some(TokenType::Eof) {
            let span = tokens
                .last()
                .map(|t| Span::new(t.span.end, t.span.end, t.span.line, t.span.column + 1))
                .unwrap_or_default();
            tokens.push(Token::new(TokenType::Eof, None, span));
        }
        Self {
            tokens,
            current: 0,
            depth: 0,
            max_nesting,
        }
    }

    pub fn parse(&mut self) -> Result<Program, MintError> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.statement()?);
            self.consume_with_help(
                TokenType::Semicolon,
                "Every statement must end with ';'. Note that '+'/'-' and '*'/'/' take one operator per expression; use parentheses to chain more.",
            )?;
        }

        Ok(Program { statements })
    }

    fn statement(&mut self) -> Result<Node, MintError> {
        match self.peek().token_type {
            TokenType::Let => self.declaration(),
            TokenType::Print => self.print(),
            _ => self.expression(),
        }
    }

    fn declaration(&mut self) -> Result<Node, MintError> {
        let start = self.consume(TokenType::Let)?.span;
        let identifier = self.var()?;
        self.consume(TokenType::Be)?;

        let value = if self.check(TokenType::Fn) {
            self.fn_declaration()?
        } else {
            self.expression()?
        };

        let span = start.to(value.span());
        Ok(Node::Declaration {
            identifier,
            value: Box::new(value),
            span,
        })
    }

    fn fn_declaration(&mut self) -> Result<Node, MintError> {
        let start = self.consume(TokenType::Fn)?.span;
        let parameters = self.fn_args()?;
        self.consume_with_help(
            TokenType::Returning,
            "Function declarations look like: fn with a, b returning a + b",
        )?;

        let body = if self.check(TokenType::Fn) {
            let span = self.peek().span;
            self.nested(span, Self::fn_declaration)?
        } else {
            self.expression()?
        };

        let span = start.to(body.span());
        Ok(Node::FnDeclaration {
            parameters,
            body: Box::new(body),
            span,
        })
    }

    fn fn_args(&mut self) -> Result<FnArgs, MintError> {
        self.consume(TokenType::With)?;

        let mut parameters = vec![self.var()?];
        while self.match_type(TokenType::Comma) {
            parameters.push(self.var()?);
        }

        Ok(FnArgs { parameters })
    }

    fn fn_call(&mut self) -> Result<Node, MintError> {
        let identifier = self.var()?;
        self.consume(TokenType::Of)?;

        let mut arguments = vec![self.expression()?];
        while self.match_type(TokenType::Comma) {
            arguments.push(self.expression()?);
        }

        let span = identifier.span.to(arguments[arguments.len() - 1].span());
        Ok(Node::FnCall {
            identifier,
            arguments,
            span,
        })
    }

    fn print(&mut self) -> Result<Node, MintError> {
        let start = self.consume(TokenType::Print)?.span;
        let expression = self.expression()?;
        let span = start.to(expression.span());
        Ok(Node::Print {
            expression: Box::new(expression),
            span,
        })
    }

    /// Parse a single expression (`fn_call` or `sum`).
    pub fn expression(&mut self) -> Result<Node, MintError> {
        let span = self.peek().span;
        self.nested(span, |parser| {
            if parser.check(TokenType::Identifier)
                && parser.peek_next_type() == Some(TokenType::Of)
            {
                return parser.fn_call();
            }
            parser.sum()
        })
    }

    fn nested<T>(
        &mut self,
        span: Span,
        parse: impl FnOnce(&mut Self) -> Result<T, MintError>,
    ) -> Result<T, MintError> {
        if self.depth >= self.max_nesting {
            return Err(MintError::new(
                ErrorKind::RecursionLimit,
                Some(span),
                format!("Expression nesting exceeds {} levels", self.max_nesting),
            )
            .with_help("Split the expression into several declarations."));
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn sum(&mut self) -> Result<Node, MintError> {
        let left = self.product()?;

        if self.check(TokenType::Plus) || self.check(TokenType::Minus) {
            let operator = self.binary_operator()?;
            let right = self.product()?;
            return Ok(Self::binary(left, operator, right));
        }

        Ok(left)
    }

    fn product(&mut self) -> Result<Node, MintError> {
        let left = self.value()?;

        if self.check(TokenType::Star) || self.check(TokenType::Slash) {
            let operator = self.binary_operator()?;
            let right = self.value()?;
            return Ok(Self::binary(left, operator, right));
        }

        Ok(left)
    }

    fn value(&mut self) -> Result<Node, MintError> {
        match self.peek().token_type {
            TokenType::Plus | TokenType::Minus => {
                let token = self.advance().clone();
                let operator = token
                    .text()
                    .and_then(UnaryOp::from_symbol)
                    .ok_or_else(|| Self::invalid_operator(&token))?;
                let operand = self.nested(token.span, Self::value)?;
                let span = token.span.to(operand.span());
                Ok(Node::UnaryOp {
                    operator,
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenType::Identifier => Ok(Node::Var(self.var()?)),
            TokenType::LeftParen => {
                self.advance();
                let expression = self.expression()?;
                self.consume_with_help(
                    TokenType::RightParen,
                    "Parenthesised expressions must be closed with ')'.",
                )?;
                Ok(expression)
            }
            _ => self.num(),
        }
    }

    fn var(&mut self) -> Result<Var, MintError> {
        let token = self.consume(TokenType::Identifier)?;
        let name = token.text().unwrap_or_default().to_string();
        Ok(Var::new(name, token.span))
    }

    fn num(&mut self) -> Result<Node, MintError> {
        let token = self.consume(TokenType::Number)?;
        let span = token.span;
        let value = token.number().ok_or_else(|| {
            MintError::invalid_syntax(span, "Number token carries no value".to_string())
        })?;
        Ok(Node::Num { value, span })
    }

    fn binary_operator(&mut self) -> Result<BinaryOp, MintError> {
        let token = self.advance().clone();
        token
            .text()
            .and_then(BinaryOp::from_symbol)
            .ok_or_else(|| Self::invalid_operator(&token))
    }

    fn binary(left: Node, operator: BinaryOp, right: Node) -> Node {
        let span = left.span().to(right.span());
        Node::BinaryOp {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span,
        }
    }

    fn invalid_operator(token: &Token) -> MintError {
        MintError::new(
            ErrorKind::InvalidBinaryOp,
            Some(token.span),
            format!(
                "Invalid operator {:?} on {} token",
                token.text().unwrap_or(""),
                token.token_type
            ),
        )
    }

    fn match_type(&mut self, token_type: TokenType) -> bool {
        if self.check(token_type) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next_type(&self) -> Option<TokenType> {
        self.tokens.get(self.current + 1).map(|t| t.token_type)
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn consume(&mut self, token_type: TokenType) -> Result<&Token, MintError> {
        if self.check(token_type) {
            self.current += 1;
            return Ok(self.previous());
        }

        let found = self.peek();
        Err(MintError::invalid_syntax(
            found.span,
            format!("Expected {}, got {}", token_type, found.token_type),
        ))
    }

    fn consume_with_help(&mut self, token_type: TokenType, help: &str) -> Result<&Token, MintError> {
        if self.check(token_type) {
            self.current += 1;
            return Ok(self.previous());
        }

        let found = self.peek();
        Err(MintError::invalid_syntax(
            found.span,
            format!("Expected {}, got {}", token_type, found.token_type),
        )
        .with_help(help))
    }
}
