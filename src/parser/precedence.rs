//! Operator precedence for Pratt parsing.

use crate::lexer::TokenKind;

/// Precedence levels, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(super) enum Precedence {
    Lowest,
    Assignment, // = ||=
    Or,         // ||
    And,        // &&
    Equality,   // == !=
    Comparison, // < <= > >=
    Range,      // ..
    Term,       // + -
    Factor,     // * / %
    Unary,      // ! -
    Call,       // . :: []
}

pub(super) fn precedence_of(kind: &TokenKind) -> Precedence {
    match kind {
        TokenKind::Eq | TokenKind::OrOrEq => Precedence::Assignment,
        TokenKind::OrOr => Precedence::Or,
        TokenKind::AndAnd => Precedence::And,
        TokenKind::EqEq | TokenKind::NotEq => Precedence::Equality,
        TokenKind::Lt | TokenKind::LtEq | TokenKind::Gt | TokenKind::GtEq => {
            Precedence::Comparison
        }
        TokenKind::DotDot => Precedence::Range,
        TokenKind::Plus | TokenKind::Minus => Precedence::Term,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Precedence::Factor,
        TokenKind::Dot | TokenKind::ColonColon | TokenKind::LBracket => Precedence::Call,
        _ => Precedence::Lowest,
    }
}
