//! Statement-level parsing: programs, class/module/method definitions,
//! while loops and returns.

use crate::ast::{Expr, ExprKind, Program, Stmt, StmtKind};
use crate::error::ParserError;
use crate::lexer::TokenKind;
use crate::parser::core::Parser;

impl Parser {
    pub fn parse(&mut self) -> Result<Program, ParserError> {
        let statements = self.parse_statements(|k| matches!(k, TokenKind::Eof))?;
        Ok(Program { statements })
    }

    /// Parse statements until the stop predicate matches. Statements are
    /// separated by newlines or semicolons; the stop token is not consumed.
    pub(super) fn parse_statements(
        &mut self,
        stop: fn(&TokenKind) -> bool,
    ) -> Result<Vec<Stmt>, ParserError> {
        let mut statements = Vec::new();
        self.skip_terminators();
        while !stop(self.peek_kind()) {
            if matches!(self.peek_kind(), TokenKind::Eof) {
                return Err(ParserError::UnexpectedEof(self.span()));
            }
            statements.push(self.parse_statement()?);
            if stop(self.peek_kind()) {
                break;
            }
            if !self.at_terminator() {
                return Err(ParserError::unexpected_token(
                    "newline or ';'",
                    self.peek_kind().to_string(),
                    self.span(),
                ));
            }
            self.skip_terminators();
        }
        Ok(statements)
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParserError> {
        match self.peek_kind() {
            TokenKind::Class => self.parse_class(false),
            TokenKind::Module => self.parse_class(true),
            TokenKind::Def => self.parse_def(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            _ => {
                let expr = self.parse_expression_lowest()?;
                Ok(Stmt {
                    span: expr.span,
                    kind: StmtKind::Expression(expr),
                })
            }
        }
    }

    fn parse_class(&mut self, is_module: bool) -> Result<Stmt, ParserError> {
        let keyword = self.advance();
        let name = match self.advance().kind {
            TokenKind::Const(name) => name,
            other => {
                return Err(ParserError::unexpected_token(
                    "class name",
                    other.to_string(),
                    keyword.span,
                ));
            }
        };
        let superclass = if !is_module && self.match_kind(&TokenKind::Lt) {
            Some(self.parse_constant_path()?)
        } else {
            None
        };
        let body = self.parse_statements(|k| matches!(k, TokenKind::End))?;
        self.expect(TokenKind::End, "'end'")?;
        Ok(Stmt {
            span: keyword.span,
            kind: StmtKind::ClassDef {
                name,
                superclass,
                body,
                is_module,
            },
        })
    }

    /// A superclass reference: `Name` or `Outer::Inner::Name`.
    fn parse_constant_path(&mut self) -> Result<Expr, ParserError> {
        let first = self.advance();
        let mut expr = match first.kind {
            TokenKind::Const(name) => Expr {
                span: first.span,
                kind: ExprKind::Constant(name),
            },
            other => {
                return Err(ParserError::unexpected_token(
                    "constant",
                    other.to_string(),
                    first.span,
                ));
            }
        };
        while self.match_kind(&TokenKind::ColonColon) {
            let segment = self.advance();
            match segment.kind {
                TokenKind::Const(name) => {
                    expr = Expr {
                        span: first.span,
                        kind: ExprKind::ScopeResolution {
                            scope: Box::new(expr),
                            name,
                        },
                    };
                }
                other => {
                    return Err(ParserError::unexpected_token(
                        "constant",
                        other.to_string(),
                        segment.span,
                    ));
                }
            }
        }
        Ok(expr)
    }

    fn parse_def(&mut self) -> Result<Stmt, ParserError> {
        let keyword = self.advance();
        let self_method = if matches!(self.peek_kind(), TokenKind::SelfKw) {
            self.advance();
            self.expect(TokenKind::Dot, "'.'")?;
            true
        } else {
            false
        };
        let name = match self.advance().kind {
            TokenKind::Ident(name) => name,
            other => {
                return Err(ParserError::unexpected_token(
                    "method name",
                    other.to_string(),
                    keyword.span,
                ));
            }
        };
        let mut params = Vec::new();
        if self.match_kind(&TokenKind::LParen) {
            if !matches!(self.peek_kind(), TokenKind::RParen) {
                loop {
                    let param = self.advance();
                    match param.kind {
                        TokenKind::Ident(name) => params.push(name),
                        other => {
                            return Err(ParserError::unexpected_token(
                                "parameter name",
                                other.to_string(),
                                param.span,
                            ));
                        }
                    }
                    if !self.match_kind(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "')'")?;
        }
        let body = self.parse_statements(|k| matches!(k, TokenKind::End))?;
        self.expect(TokenKind::End, "'end'")?;
        Ok(Stmt {
            span: keyword.span,
            kind: StmtKind::MethodDef {
                name,
                self_method,
                params,
                body,
            },
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParserError> {
        let keyword = self.advance();
        let condition = self.parse_expression_lowest()?;
        self.match_kind(&TokenKind::Do);
        let body = self.parse_statements(|k| matches!(k, TokenKind::End))?;
        self.expect(TokenKind::End, "'end'")?;
        Ok(Stmt {
            span: keyword.span,
            kind: StmtKind::While { condition, body },
        })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParserError> {
        let keyword = self.advance();
        let value = if self.at_terminator() || matches!(self.peek_kind(), TokenKind::End) {
            None
        } else {
            Some(self.parse_expression_lowest()?)
        };
        Ok(Stmt {
            span: keyword.span,
            kind: StmtKind::Return(value),
        })
    }
}
