//! Error types for all phases: host-side compilation errors and the
//! first-class runtime Error values the VM propagates.

use crate::span::Span;
use std::fmt;
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Error)]
pub enum LexerError {
    #[error("Unexpected character '{0}' at {1}")]
    UnexpectedChar(char, Span),

    #[error("Unterminated string at {0}")]
    UnterminatedString(Span),

    #[error("Invalid escape sequence '\\{0}' at {1}")]
    InvalidEscape(char, Span),

    #[error("Invalid number '{0}' at {1}")]
    InvalidNumber(String, Span),
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedChar(_, span) => *span,
            Self::UnterminatedString(span) => *span,
            Self::InvalidEscape(_, span) => *span,
            Self::InvalidNumber(_, span) => *span,
        }
    }
}

/// Parser errors.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Unexpected token '{found}', expected {expected} at {span}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("Unexpected end of file at {0}")]
    UnexpectedEof(Span),

    #[error("Invalid assignment target at {0}")]
    InvalidAssignmentTarget(Span),

    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl ParserError {
    pub fn unexpected_token(
        expected: impl Into<String>,
        found: impl Into<String>,
        span: Span,
    ) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    pub fn general(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::UnexpectedToken { span, .. } => *span,
            Self::UnexpectedEof(span) => *span,
            Self::InvalidAssignmentTarget(span) => *span,
            Self::General { span, .. } => *span,
        }
    }
}

/// Bytecode compilation errors.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{message} at {span}")]
    General { message: String, span: Span },
}

impl CompileError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self::General {
            message: message.into(),
            span,
        }
    }
}

/// The kind of a runtime Error value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Argument,
    Type,
    UndefinedMethod,
    Internal,
    Name,
    UnsupportedMethod,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argument => "ArgumentError",
            Self::Type => "TypeError",
            Self::UndefinedMethod => "UndefinedMethodError",
            Self::Internal => "InternalError",
            Self::Name => "NameError",
            Self::UnsupportedMethod => "UnsupportedMethodError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime error. Unlike the host-side errors above, these are first-class
/// values in the language: built-ins return them through `Result` and the VM
/// surfaces them on the operand stack with the faulting send's file and line.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    pub file: Option<String>,
    pub line: usize,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file: None,
            line: 0,
        }
    }

    /// `ArgumentError: Expect <n> argument[s]. got: <m>`; plural for n >= 2.
    pub fn argument_count(expected: usize, got: usize) -> Self {
        let plural = if expected >= 2 { "s" } else { "" };
        Self::new(
            ErrorKind::Argument,
            format!("Expect {} argument{}. got: {}", expected, plural, got),
        )
    }

    pub fn argument_count_at_least(minimum: usize, got: usize) -> Self {
        let plural = if minimum >= 2 { "s" } else { "" };
        Self::new(
            ErrorKind::Argument,
            format!("Expect at least {} argument{}. got: {}", minimum, plural, got),
        )
    }

    /// For built-ins taking an optional argument, e.g. `Expect 0..1 argument. got: 2`.
    pub fn argument_count_range(range: &str, got: usize) -> Self {
        Self::new(
            ErrorKind::Argument,
            format!("Expect {} argument. got: {}", range, got),
        )
    }

    pub fn wrong_type(expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::Type,
            format!("Expect argument to be {}. got: {}", expected, got),
        )
    }

    pub fn undefined_method(name: &str, receiver: &str) -> Self {
        Self::new(
            ErrorKind::UndefinedMethod,
            format!("Undefined Method '{}' for {}", name, receiver),
        )
    }

    pub fn unsupported_method(name: &str, receiver: &str) -> Self {
        Self::new(
            ErrorKind::UnsupportedMethod,
            format!("Method {} is not supported for {}", name, receiver),
        )
    }

    pub fn module_inheritance(name: &str) -> Self {
        Self::new(
            ErrorKind::Internal,
            format!("Module inheritance is not supported: {}", name),
        )
    }

    pub fn cant_yield_without_block() -> Self {
        Self::new(ErrorKind::Internal, "can't yield without a block")
    }

    pub fn cant_require(name: &str) -> Self {
        Self::new(ErrorKind::Internal, format!("Can't require \"{}\"", name))
    }

    pub fn uninitialized_constant(name: &str) -> Self {
        Self::new(ErrorKind::Name, format!("uninitialized constant {}", name))
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::Internal, "Division by zero")
    }

    pub fn modulo_by_zero() -> Self {
        Self::new(ErrorKind::Internal, "Modulo by zero")
    }

    /// Stamp the faulting location. The first stamp wins, so an error that
    /// crossed several frames keeps the innermost send site.
    pub fn with_location(mut self, file: &str, line: usize) -> Self {
        if self.file.is_none() {
            self.file = Some(file.to_string());
            self.line = line;
        }
        self
    }
}

/// A unified error type for the whole pipeline.
#[derive(Debug, Error)]
pub enum GarnetError {
    #[error("Lexer error: {0}")]
    Lexer(#[from] LexerError),

    #[error("Parser error: {0}")]
    Parser(#[from] ParserError),

    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("{0}")]
    Runtime(RuntimeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
