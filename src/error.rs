use ariadne::{Color, Fmt, Label, Report, ReportKind, Source};
use std::fmt;

/// Location of a token or node in the source.
///
/// `start` and `end` are character offsets (what ariadne labels expect),
/// `line` and `column` are 1-based and point at the first character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn single(pos: usize, line: usize, column: usize) -> Self {
        Self::new(pos, pos + 1, line, column)
    }

    /// Span covering `self` through `other`, keeping the position of `self`.
    pub fn to(&self, other: &Span) -> Self {
        Self {
            start: self.start,
            end: other.end.max(self.end),
            line: self.line,
            column: self.column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidCharacter,
    InvalidSyntax,
    UnboundIdentifier,
    DuplicateBinding,
    InvalidBinaryOp,
    NotCallable,
    InvalidOperand,
    ArityMismatch,
    RecursionLimit,
}

impl ErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::InvalidCharacter => "InvalidCharacter",
            ErrorKind::InvalidSyntax => "InvalidSyntax",
            ErrorKind::UnboundIdentifier => "UnboundIdentifier",
            ErrorKind::DuplicateBinding => "DuplicateBinding",
            ErrorKind::InvalidBinaryOp => "InvalidBinaryOp",
            ErrorKind::NotCallable => "NotCallable",
            ErrorKind::InvalidOperand => "InvalidOperand",
            ErrorKind::ArityMismatch => "ArityMismatch",
            ErrorKind::RecursionLimit => "RecursionLimit",
        }
    }

    fn color(&self) -> Color {
        match self {
            ErrorKind::InvalidCharacter => Color::Red,
            ErrorKind::InvalidSyntax => Color::Yellow,
            _ => Color::Magenta,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone)]
pub struct MintError {
    pub kind: ErrorKind,
    pub span: Option<Span>,
    pub message: String,
    pub help: Option<String>,
}

impl MintError {
    pub fn new(kind: ErrorKind, span: Option<Span>, message: String) -> Self {
        Self {
            kind,
            span,
            message,
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn invalid_character(span: Span, c: char) -> Self {
        Self::new(
            ErrorKind::InvalidCharacter,
            Some(span),
            format!("Unrecognized character '{}'", c),
        )
    }

    pub fn invalid_syntax(span: Span, message: String) -> Self {
        Self::new(ErrorKind::InvalidSyntax, Some(span), message)
    }

    pub fn unbound_identifier(span: Option<Span>, name: &str) -> Self {
        Self::new(
            ErrorKind::UnboundIdentifier,
            span,
            format!("Reference to unassigned variable '{}'", name),
        )
    }

    pub fn duplicate_binding(span: Option<Span>, name: &str) -> Self {
        Self::new(
            ErrorKind::DuplicateBinding,
            span,
            format!("Assignment to existing variable '{}'", name),
        )
        .with_help("Bindings are write-once; choose a new name or bind it in a function scope.")
    }

    pub fn runtime_error(kind: ErrorKind, span: Span, message: String) -> Self {
        Self::new(kind, Some(span), message)
    }

    /// 1-based line and column of the offending token, if known.
    pub fn position(&self) -> Option<(usize, usize)> {
        self.span.map(|span| (span.line, span.column))
    }

    /// Attach a location to an error raised somewhere that had none.
    pub fn at(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    pub fn report(&self, source: &str, filename: Option<&str>) {
        let filename = filename.unwrap_or("<repl>");
        let color = self.kind.color();
        let len = source.chars().count();

        // ariadne needs a range inside the source; clamp end-of-input spans.
        let range = match self.span {
            Some(span) => {
                let start = span.start.min(len);
                start..span.end.min(len).max(start)
            }
            None => 0..0,
        };

        let mut report_builder = Report::build(ReportKind::Error, filename, range.start)
            .with_message(format!("{}: {}", self.kind.name().fg(color), self));

        if self.span.is_some() {
            report_builder = report_builder.with_label(
                Label::new((filename, range))
                    .with_message(&self.message)
                    .with_color(color),
            );
        }

        if let Some(ref help_text) = self.help {
            report_builder =
                report_builder.with_note(format!("{}: {}", "help".fg(Color::Cyan), help_text));
        }

        if report_builder
            .finish()
            .eprint((filename, Source::from(source)))
            .is_err()
        {
            eprintln!("Error: {}\n{}", self.kind, self);
        }
    }
}

impl fmt::Display for MintError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some((line, column)) = self.position() {
            write!(f, " at Ln {} Col {}", line, column)?;
        }
        Ok(())
    }
}

impl std::error::Error for MintError {}
