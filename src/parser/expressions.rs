//! Expression parsing: Pratt loop, unary/primary forms, calls, blocks and
//! literals. Most surface forms desugar to `Send` nodes here.

use crate::ast::{BlockLiteral, Expr, ExprKind, Stmt};
use crate::error::ParserError;
use crate::lexer::TokenKind;
use crate::parser::core::Parser;
use crate::parser::precedence::{precedence_of, Precedence};

impl Parser {
    pub(super) fn parse_expression_lowest(&mut self) -> Result<Expr, ParserError> {
        self.parse_expression(Precedence::Lowest)
    }

    pub(super) fn parse_expression(&mut self, min: Precedence) -> Result<Expr, ParserError> {
        let mut left = self.parse_unary()?;
        while precedence_of(self.peek_kind()) > min {
            left = self.parse_infix(left)?;
        }
        Ok(left)
    }

    fn parse_infix(&mut self, left: Expr) -> Result<Expr, ParserError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Eq => {
                self.check_assignment_target(&left)?;
                self.skip_newlines();
                let value = self.parse_expression_lowest()?;
                Ok(Expr {
                    span: left.span,
                    kind: ExprKind::Assign {
                        target: Box::new(left),
                        value: Box::new(value),
                    },
                })
            }
            TokenKind::OrOrEq => {
                self.check_assignment_target(&left)?;
                self.skip_newlines();
                let rhs = self.parse_expression_lowest()?;
                // a ||= b  =>  a = a || b
                let or = Expr {
                    span: left.span,
                    kind: ExprKind::Or {
                        left: Box::new(left.clone()),
                        right: Box::new(rhs),
                    },
                };
                Ok(Expr {
                    span: left.span,
                    kind: ExprKind::Assign {
                        target: Box::new(left),
                        value: Box::new(or),
                    },
                })
            }
            TokenKind::OrOr => {
                self.skip_newlines();
                let right = self.parse_expression(Precedence::Or)?;
                Ok(Expr {
                    span: left.span,
                    kind: ExprKind::Or {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                })
            }
            TokenKind::AndAnd => {
                self.skip_newlines();
                let right = self.parse_expression(Precedence::And)?;
                Ok(Expr {
                    span: left.span,
                    kind: ExprKind::And {
                        left: Box::new(left),
                        right: Box::new(right),
                    },
                })
            }
            TokenKind::DotDot => {
                self.skip_newlines();
                let end = self.parse_expression(Precedence::Range)?;
                Ok(Expr {
                    span: left.span,
                    kind: ExprKind::RangeLiteral {
                        start: Box::new(left),
                        end: Box::new(end),
                    },
                })
            }
            TokenKind::Dot => self.parse_call_after_dot(left),
            TokenKind::ColonColon => {
                let segment = self.advance();
                match segment.kind {
                    TokenKind::Const(name) => Ok(Expr {
                        span: left.span,
                        kind: ExprKind::ScopeResolution {
                            scope: Box::new(left),
                            name,
                        },
                    }),
                    other => Err(ParserError::unexpected_token(
                        "constant",
                        other.to_string(),
                        segment.span,
                    )),
                }
            }
            TokenKind::LBracket => {
                self.skip_newlines();
                let mut args = Vec::new();
                if !matches!(self.peek_kind(), TokenKind::RBracket) {
                    loop {
                        args.push(self.parse_expression_lowest()?);
                        self.skip_newlines();
                        if self.match_kind(&TokenKind::Comma) {
                            self.skip_newlines();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket, "']'")?;
                if self.match_kind(&TokenKind::Eq) {
                    self.skip_newlines();
                    args.push(self.parse_expression_lowest()?);
                    Ok(Expr {
                        span: left.span,
                        kind: ExprKind::Send {
                            receiver: Some(Box::new(left)),
                            name: "[]=".to_string(),
                            args,
                            block: None,
                        },
                    })
                } else {
                    Ok(Expr {
                        span: left.span,
                        kind: ExprKind::Send {
                            receiver: Some(Box::new(left)),
                            name: "[]".to_string(),
                            args,
                            block: None,
                        },
                    })
                }
            }
            // Binary operators dispatch as sends so they resolve through the
            // method tables like any other message.
            kind @ (TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::EqEq
            | TokenKind::NotEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq) => {
                self.skip_newlines();
                let right = self.parse_expression(precedence_of(&kind))?;
                Ok(Expr {
                    span: left.span,
                    kind: ExprKind::Send {
                        receiver: Some(Box::new(left)),
                        name: kind.to_string(),
                        args: vec![right],
                        block: None,
                    },
                })
            }
            other => Err(ParserError::unexpected_token(
                "operator",
                other.to_string(),
                token.span,
            )),
        }
    }

    fn check_assignment_target(&self, target: &Expr) -> Result<(), ParserError> {
        match target.kind {
            ExprKind::Identifier(_)
            | ExprKind::InstanceVariable(_)
            | ExprKind::Constant(_) => Ok(()),
            _ => Err(ParserError::InvalidAssignmentTarget(target.span)),
        }
    }

    fn parse_call_after_dot(&mut self, receiver: Expr) -> Result<Expr, ParserError> {
        let name_token = self.advance();
        let name = match name_token.kind {
            TokenKind::Ident(name) => name,
            // `class` is a keyword but also an ordinary message.
            TokenKind::Class => "class".to_string(),
            other => {
                return Err(ParserError::unexpected_token(
                    "method name",
                    other.to_string(),
                    name_token.span,
                ));
            }
        };
        // Attribute assignment: `recv.name = value` sends `name=`.
        if matches!(self.peek_kind(), TokenKind::Eq) {
            self.advance();
            self.skip_newlines();
            let value = self.parse_expression_lowest()?;
            return Ok(Expr {
                span: receiver.span,
                kind: ExprKind::Send {
                    receiver: Some(Box::new(receiver)),
                    name: format!("{}=", name),
                    args: vec![value],
                    block: None,
                },
            });
        }
        let args = if matches!(self.peek_kind(), TokenKind::LParen) {
            self.parse_call_args()?
        } else {
            Vec::new()
        };
        let block = self.parse_block_opt()?;
        Ok(Expr {
            span: receiver.span,
            kind: ExprKind::Send {
                receiver: Some(Box::new(receiver)),
                name,
                args,
                block,
            },
        })
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expr>, ParserError> {
        self.expect(TokenKind::LParen, "'('")?;
        self.skip_newlines();
        let mut args = Vec::new();
        if !matches!(self.peek_kind(), TokenKind::RParen) {
            loop {
                args.push(self.parse_expression_lowest()?);
                self.skip_newlines();
                if self.match_kind(&TokenKind::Comma) {
                    self.skip_newlines();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(args)
    }

    /// Paren-less command arguments, e.g. `require "x"` or
    /// `attr_accessor :foo, :bar`. Only simple first tokens qualify, which
    /// keeps bare identifiers unambiguous.
    fn parse_command_args(&mut self) -> Result<Vec<Expr>, ParserError> {
        let mut args = Vec::new();
        loop {
            args.push(self.parse_expression_lowest()?);
            if self.match_kind(&TokenKind::Comma) {
                self.skip_newlines();
            } else {
                break;
            }
        }
        Ok(args)
    }

    fn starts_command_arg(kind: &TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Str(_)
                | TokenKind::Symbol(_)
                | TokenKind::Int(_)
                | TokenKind::Const(_)
                | TokenKind::InstanceVar(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
        )
    }

    fn parse_block_opt(&mut self) -> Result<Option<BlockLiteral>, ParserError> {
        match self.peek_kind() {
            TokenKind::LBrace => {
                self.advance();
                let params = self.parse_block_params()?;
                let body =
                    self.parse_statements(|k| matches!(k, TokenKind::RBrace))?;
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(Some(BlockLiteral { params, body }))
            }
            TokenKind::Do => {
                self.advance();
                let params = self.parse_block_params()?;
                let body = self.parse_statements(|k| matches!(k, TokenKind::End))?;
                self.expect(TokenKind::End, "'end'")?;
                Ok(Some(BlockLiteral { params, body }))
            }
            _ => Ok(None),
        }
    }

    fn parse_block_params(&mut self) -> Result<Vec<String>, ParserError> {
        let mut params = Vec::new();
        if self.match_kind(&TokenKind::Pipe) {
            if !matches!(self.peek_kind(), TokenKind::Pipe) {
                loop {
                    let param = self.advance();
                    match param.kind {
                        TokenKind::Ident(name) => params.push(name),
                        other => {
                            return Err(ParserError::unexpected_token(
                                "block parameter",
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
            self.expect(TokenKind::Pipe, "'|'")?;
        }
        Ok(params)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParserError> {
        let token = self.advance();
        let span = token.span;
        match token.kind {
            TokenKind::Minus => {
                let operand = self.parse_expression(Precedence::Unary)?;
                if let ExprKind::IntegerLiteral(n) = operand.kind {
                    return Ok(Expr {
                        span,
                        kind: ExprKind::IntegerLiteral(-n),
                    });
                }
                Ok(Expr {
                    span,
                    kind: ExprKind::Send {
                        receiver: Some(Box::new(operand)),
                        name: "-@".to_string(),
                        args: Vec::new(),
                        block: None,
                    },
                })
            }
            TokenKind::Bang => {
                let operand = self.parse_expression(Precedence::Unary)?;
                Ok(Expr {
                    span,
                    kind: ExprKind::Send {
                        receiver: Some(Box::new(operand)),
                        name: "!".to_string(),
                        args: Vec::new(),
                        block: None,
                    },
                })
            }
            TokenKind::Int(n) => Ok(Expr {
                span,
                kind: ExprKind::IntegerLiteral(n),
            }),
            TokenKind::Str(s) => Ok(Expr {
                span,
                kind: ExprKind::StringLiteral(s),
            }),
            // No symbol type: `:name` reads as the string "name".
            TokenKind::Symbol(s) => Ok(Expr {
                span,
                kind: ExprKind::StringLiteral(s),
            }),
            TokenKind::True => Ok(Expr {
                span,
                kind: ExprKind::BooleanLiteral(true),
            }),
            TokenKind::False => Ok(Expr {
                span,
                kind: ExprKind::BooleanLiteral(false),
            }),
            TokenKind::Nil => Ok(Expr {
                span,
                kind: ExprKind::NullLiteral,
            }),
            TokenKind::SelfKw => Ok(Expr {
                span,
                kind: ExprKind::SelfExpr,
            }),
            TokenKind::Yield => {
                let args = if matches!(self.peek_kind(), TokenKind::LParen) {
                    self.parse_call_args()?
                } else {
                    Vec::new()
                };
                Ok(Expr {
                    span,
                    kind: ExprKind::Yield { args },
                })
            }
            TokenKind::If => self.parse_if_body(span),
            TokenKind::Ident(name) => {
                if matches!(self.peek_kind(), TokenKind::LParen) {
                    let args = self.parse_call_args()?;
                    let block = self.parse_block_opt()?;
                    Ok(Expr {
                        span,
                        kind: ExprKind::Send {
                            receiver: None,
                            name,
                            args,
                            block,
                        },
                    })
                } else if matches!(self.peek_kind(), TokenKind::Do | TokenKind::LBrace)
                    && self.peek().span.line == span.line
                {
                    // A paren-less call with just a block: `run do ... end`.
                    let block = self.parse_block_opt()?;
                    Ok(Expr {
                        span,
                        kind: ExprKind::Send {
                            receiver: None,
                            name,
                            args: Vec::new(),
                            block,
                        },
                    })
                } else if Self::starts_command_arg(self.peek_kind())
                    && self.peek().span.line == span.line
                {
                    let args = self.parse_command_args()?;
                    Ok(Expr {
                        span,
                        kind: ExprKind::Send {
                            receiver: None,
                            name,
                            args,
                            block: None,
                        },
                    })
                } else {
                    Ok(Expr {
                        span,
                        kind: ExprKind::Identifier(name),
                    })
                }
            }
            TokenKind::Const(name) => Ok(Expr {
                span,
                kind: ExprKind::Constant(name),
            }),
            TokenKind::InstanceVar(name) => Ok(Expr {
                span,
                kind: ExprKind::InstanceVariable(name),
            }),
            TokenKind::LParen => {
                self.skip_newlines();
                let expr = self.parse_expression_lowest()?;
                self.skip_newlines();
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.skip_newlines();
                let mut elements = Vec::new();
                if !matches!(self.peek_kind(), TokenKind::RBracket) {
                    loop {
                        elements.push(self.parse_expression_lowest()?);
                        self.skip_newlines();
                        if self.match_kind(&TokenKind::Comma) {
                            self.skip_newlines();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBracket, "']'")?;
                Ok(Expr {
                    span,
                    kind: ExprKind::ArrayLiteral(elements),
                })
            }
            // `{` in operand position is a hash literal; in call-postfix
            // position it was already taken as a block.
            TokenKind::LBrace => {
                self.skip_newlines();
                let mut entries = Vec::new();
                if !matches!(self.peek_kind(), TokenKind::RBrace) {
                    loop {
                        let key_token = self.advance();
                        let key = match key_token.kind {
                            TokenKind::Ident(name) => name,
                            TokenKind::Str(s) => s,
                            other => {
                                return Err(ParserError::unexpected_token(
                                    "hash key",
                                    other.to_string(),
                                    key_token.span,
                                ));
                            }
                        };
                        self.expect(TokenKind::Colon, "':'")?;
                        self.skip_newlines();
                        let value = self.parse_expression_lowest()?;
                        entries.push((key, value));
                        self.skip_newlines();
                        if self.match_kind(&TokenKind::Comma) {
                            self.skip_newlines();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(Expr {
                    span,
                    kind: ExprKind::HashLiteral(entries),
                })
            }
            other => Err(ParserError::unexpected_token(
                "expression",
                other.to_string(),
                span,
            )),
        }
    }

    /// Parse the rest of an `if`/`elsif` arm; the recursion bottoms out by
    /// consuming the single shared `end`.
    fn parse_if_body(&mut self, span: crate::span::Span) -> Result<Expr, ParserError> {
        let condition = self.parse_expression_lowest()?;
        let then_body = self.parse_statements(|k| {
            matches!(k, TokenKind::Elsif | TokenKind::Else | TokenKind::End)
        })?;
        let else_body: Vec<Stmt> = match self.peek_kind() {
            TokenKind::Elsif => {
                let token = self.advance();
                let nested = self.parse_if_body(token.span)?;
                vec![Stmt {
                    span: token.span,
                    kind: crate::ast::StmtKind::Expression(nested),
                }]
            }
            TokenKind::Else => {
                self.advance();
                let body = self.parse_statements(|k| matches!(k, TokenKind::End))?;
                self.expect(TokenKind::End, "'end'")?;
                body
            }
            _ => {
                self.expect(TokenKind::End, "'end'")?;
                Vec::new()
            }
        };
        Ok(Expr {
            span,
            kind: ExprKind::If {
                condition: Box::new(condition),
                then_body,
                else_body,
            },
        })
    }
}
