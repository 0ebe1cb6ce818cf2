//! Scanner for Garnet source code.
//!
//! Newlines are significant (they terminate statements), so the scanner
//! emits them as tokens instead of swallowing them with the rest of the
//! whitespace.

use crate::error::LexerError;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

pub struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    source_len: usize,
    current_pos: usize,
    line: usize,
    column: usize,
    start_pos: usize,
    start_line: usize,
    start_column: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            source_len: source.len(),
            current_pos: 0,
            line: 1,
            column: 1,
            start_pos: 0,
            start_line: 1,
            start_column: 1,
        }
    }

    /// Scan all tokens from the source.
    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    fn scan_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace_and_comments();
        self.mark_start();

        let Some(c) = self.advance() else {
            return Ok(Token::eof(self.source_len, self.line, self.column));
        };

        match c {
            '\n' => {
                let token = self.make_token(TokenKind::Newline);
                self.line += 1;
                self.column = 1;
                Ok(token)
            }
            '(' => Ok(self.make_token(TokenKind::LParen)),
            ')' => Ok(self.make_token(TokenKind::RParen)),
            '[' => Ok(self.make_token(TokenKind::LBracket)),
            ']' => Ok(self.make_token(TokenKind::RBracket)),
            '{' => Ok(self.make_token(TokenKind::LBrace)),
            '}' => Ok(self.make_token(TokenKind::RBrace)),
            ',' => Ok(self.make_token(TokenKind::Comma)),
            ';' => Ok(self.make_token(TokenKind::Semicolon)),
            '+' => Ok(self.make_token(TokenKind::Plus)),
            '-' => Ok(self.make_token(TokenKind::Minus)),
            '*' => Ok(self.make_token(TokenKind::Star)),
            '/' => Ok(self.make_token(TokenKind::Slash)),
            '%' => Ok(self.make_token(TokenKind::Percent)),
            '.' => {
                if self.match_char('.') {
                    Ok(self.make_token(TokenKind::DotDot))
                } else {
                    Ok(self.make_token(TokenKind::Dot))
                }
            }
            '=' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::EqEq))
                } else {
                    Ok(self.make_token(TokenKind::Eq))
                }
            }
            '!' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::NotEq))
                } else {
                    Ok(self.make_token(TokenKind::Bang))
                }
            }
            '<' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::LtEq))
                } else {
                    Ok(self.make_token(TokenKind::Lt))
                }
            }
            '>' => {
                if self.match_char('=') {
                    Ok(self.make_token(TokenKind::GtEq))
                } else {
                    Ok(self.make_token(TokenKind::Gt))
                }
            }
            '&' => {
                if self.match_char('&') {
                    Ok(self.make_token(TokenKind::AndAnd))
                } else {
                    Err(LexerError::UnexpectedChar(c, self.current_span()))
                }
            }
            '|' => {
                if self.match_char('|') {
                    if self.match_char('=') {
                        Ok(self.make_token(TokenKind::OrOrEq))
                    } else {
                        Ok(self.make_token(TokenKind::OrOr))
                    }
                } else {
                    Ok(self.make_token(TokenKind::Pipe))
                }
            }
            ':' => {
                if self.match_char(':') {
                    Ok(self.make_token(TokenKind::ColonColon))
                } else if self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                {
                    let name = self.scan_name();
                    Ok(self.make_token(TokenKind::Symbol(name)))
                } else {
                    Ok(self.make_token(TokenKind::Colon))
                }
            }
            '@' => {
                if self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                {
                    let name = self.scan_name();
                    Ok(self.make_token(TokenKind::InstanceVar(format!("@{}", name))))
                } else {
                    Err(LexerError::UnexpectedChar(c, self.current_span()))
                }
            }
            '"' => self.scan_string('"'),
            '\'' => self.scan_string('\''),
            c if c.is_ascii_digit() => self.scan_number(c),
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                name.push(c);
                name.push_str(&self.scan_name());
                match TokenKind::keyword(&name) {
                    Some(kind) => Ok(self.make_token(kind)),
                    None if name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) => {
                        Ok(self.make_token(TokenKind::Const(name)))
                    }
                    None => Ok(self.make_token(TokenKind::Ident(name))),
                }
            }
            _ => Err(LexerError::UnexpectedChar(c, self.current_span())),
        }
    }

    /// Scan the continuation of a name; identifiers may end in `?` or `!`.
    fn scan_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if let Some(c @ ('?' | '!')) = self.peek() {
            name.push(c);
            self.advance();
        }
        name
    }

    fn scan_number(&mut self, first: char) -> Result<Token, LexerError> {
        let mut digits = String::new();
        digits.push(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '_' {
                if c != '_' {
                    digits.push(c);
                }
                self.advance();
            } else {
                break;
            }
        }
        let value: i64 = digits
            .parse()
            .map_err(|_| LexerError::InvalidNumber(digits.clone(), self.current_span()))?;
        Ok(self.make_token(TokenKind::Int(value)))
    }

    fn scan_string(&mut self, quote: char) -> Result<Token, LexerError> {
        let mut value = String::new();
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(LexerError::UnterminatedString(self.current_span()));
                }
                Some(c) if c == quote => break,
                // Single-quoted strings are raw; escapes apply in double quotes.
                Some('\\') if quote == '"' => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some(other) => {
                        return Err(LexerError::InvalidEscape(other, self.current_span()));
                    }
                    None => {
                        return Err(LexerError::UnterminatedString(self.current_span()));
                    }
                },
                Some(c) => value.push(c),
            }
        }
        Ok(self.make_token(TokenKind::Str(value)))
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            match c {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '#' => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn mark_start(&mut self) {
        self.start_pos = self.current_pos;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.current_pos = pos + c.len_utf8();
        self.column += 1;
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_span(&self) -> Span {
        Span::new(
            self.start_pos,
            self.current_pos,
            self.start_line,
            self.start_column,
        )
    }

    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.current_span())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_tokens()
            .expect("lexer error")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_punctuation_and_operators() {
        assert_eq!(
            kinds("+ - * / % == != <= >= && || ||= :: .."),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::OrOrEq,
                TokenKind::ColonColon,
                TokenKind::DotDot,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn distinguishes_idents_consts_and_keywords() {
        assert_eq!(
            kinds("class Foo bar nil nil? @baz"),
            vec![
                TokenKind::Class,
                TokenKind::Const("Foo".to_string()),
                TokenKind::Ident("bar".to_string()),
                TokenKind::Nil,
                TokenKind::Ident("nil?".to_string()),
                TokenKind::InstanceVar("@baz".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_symbols_and_hash_colons() {
        // `:bar` is a symbol literal; `b: 2` and `c:3` use a plain colon.
        assert_eq!(
            kinds(":bar b: 2 c:3"),
            vec![
                TokenKind::Symbol("bar".to_string()),
                TokenKind::Ident("b".to_string()),
                TokenKind::Colon,
                TokenKind::Int(2),
                TokenKind::Ident("c".to_string()),
                TokenKind::Colon,
                TokenKind::Int(3),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn scans_strings_with_escapes() {
        assert_eq!(
            kinds(r#""a\nb" 'raw\n'"#),
            vec![
                TokenKind::Str("a\nb".to_string()),
                TokenKind::Str("raw\\n".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn emits_newline_tokens_and_tracks_lines() {
        let tokens = Scanner::new("a\nb").scan_tokens().expect("lexer error");
        assert_eq!(tokens[1].kind, TokenKind::Newline);
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[2].span.line, 2);
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            kinds("1 # the rest is ignored"),
            vec![TokenKind::Int(1), TokenKind::Eof]
        );
    }

    #[test]
    fn rejects_unterminated_string() {
        let result = Scanner::new("\"abc").scan_tokens();
        assert!(matches!(result, Err(LexerError::UnterminatedString(_))));
    }
}
