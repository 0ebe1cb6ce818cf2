//! Token definitions for the Garnet lexer.

use crate::span::Span;
use std::fmt;

/// All token types in Garnet.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Str(String),
    /// `:name` — Garnet has no symbol type; these read as strings.
    Symbol(String),

    // Names
    Ident(String),
    Const(String),
    InstanceVar(String),

    // Keywords
    Class,
    Module,
    Def,
    End,
    If,
    Elsif,
    Else,
    While,
    Do,
    Yield,
    SelfKw,
    Return,
    True,
    False,
    Nil,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Bang,
    AndAnd,
    OrOr,
    OrOrEq,

    // Punctuation
    Dot,
    DotDot,
    Colon,
    ColonColon,
    Comma,
    Semicolon,
    Pipe,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,

    Newline,
    Eof,
}

impl TokenKind {
    /// Map an identifier to its keyword token, if it is one.
    pub fn keyword(name: &str) -> Option<TokenKind> {
        let kind = match name {
            "class" => Self::Class,
            "module" => Self::Module,
            "def" => Self::Def,
            "end" => Self::End,
            "if" => Self::If,
            "elsif" => Self::Elsif,
            "else" => Self::Else,
            "while" => Self::While,
            "do" => Self::Do,
            "yield" => Self::Yield,
            "self" => Self::SelfKw,
            "return" => Self::Return,
            "true" => Self::True,
            "false" => Self::False,
            "nil" => Self::Nil,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Str(s) => write!(f, "\"{}\"", s),
            Self::Symbol(s) => write!(f, ":{}", s),
            Self::Ident(s) | Self::Const(s) => f.write_str(s),
            Self::InstanceVar(s) => f.write_str(s),
            Self::Class => f.write_str("class"),
            Self::Module => f.write_str("module"),
            Self::Def => f.write_str("def"),
            Self::End => f.write_str("end"),
            Self::If => f.write_str("if"),
            Self::Elsif => f.write_str("elsif"),
            Self::Else => f.write_str("else"),
            Self::While => f.write_str("while"),
            Self::Do => f.write_str("do"),
            Self::Yield => f.write_str("yield"),
            Self::SelfKw => f.write_str("self"),
            Self::Return => f.write_str("return"),
            Self::True => f.write_str("true"),
            Self::False => f.write_str("false"),
            Self::Nil => f.write_str("nil"),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Percent => f.write_str("%"),
            Self::Eq => f.write_str("="),
            Self::EqEq => f.write_str("=="),
            Self::NotEq => f.write_str("!="),
            Self::Lt => f.write_str("<"),
            Self::LtEq => f.write_str("<="),
            Self::Gt => f.write_str(">"),
            Self::GtEq => f.write_str(">="),
            Self::Bang => f.write_str("!"),
            Self::AndAnd => f.write_str("&&"),
            Self::OrOr => f.write_str("||"),
            Self::OrOrEq => f.write_str("||="),
            Self::Dot => f.write_str("."),
            Self::DotDot => f.write_str(".."),
            Self::Colon => f.write_str(":"),
            Self::ColonColon => f.write_str("::"),
            Self::Comma => f.write_str(","),
            Self::Semicolon => f.write_str(";"),
            Self::Pipe => f.write_str("|"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::LBracket => f.write_str("["),
            Self::RBracket => f.write_str("]"),
            Self::LBrace => f.write_str("{"),
            Self::RBrace => f.write_str("}"),
            Self::Newline => f.write_str("newline"),
            Self::Eof => f.write_str("end of file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn eof(pos: usize, line: usize, column: usize) -> Self {
        Self::new(TokenKind::Eof, Span::new(pos, pos, line, column))
    }
}
