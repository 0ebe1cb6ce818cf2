//! Expression lowering. Sends carry their block prototype in the constant
//! pool; bare identifiers become local reads or implicit sends to `self`
//! depending on what the scope has seen.

use crate::ast::{BlockLiteral, Expr, ExprKind};
use crate::error::CompileError;

use super::chunk::Constant;
use super::compiler::{Compiler, ProtoContext};
use super::opcode::Op;

impl Compiler {
    pub(super) fn compile_expr(
        &self,
        ctx: &mut ProtoContext,
        expr: &Expr,
    ) -> Result<(), CompileError> {
        let line = expr.span.line;
        match &expr.kind {
            ExprKind::IntegerLiteral(n) => {
                let index = ctx.constant(Constant::Integer(*n), expr.span)?;
                ctx.emit(Op::Constant(index), line);
                Ok(())
            }
            ExprKind::StringLiteral(s) => {
                let index = ctx.constant(Constant::Str(s.clone()), expr.span)?;
                ctx.emit(Op::Constant(index), line);
                Ok(())
            }
            ExprKind::BooleanLiteral(true) => {
                ctx.emit(Op::True, line);
                Ok(())
            }
            ExprKind::BooleanLiteral(false) => {
                ctx.emit(Op::False, line);
                Ok(())
            }
            ExprKind::NullLiteral => {
                ctx.emit(Op::Null, line);
                Ok(())
            }
            ExprKind::SelfExpr => {
                ctx.emit(Op::PutSelf, line);
                Ok(())
            }

            ExprKind::Identifier(name) => {
                if ctx.is_local(name) {
                    let index = ctx.name_constant(name, expr.span)?;
                    ctx.emit(Op::GetLocal(index), line);
                } else {
                    // An unassigned bare name is a message to self.
                    ctx.emit(Op::PutSelf, line);
                    let name = ctx.name_constant(name, expr.span)?;
                    ctx.emit(
                        Op::Send {
                            name,
                            argc: 0,
                            block: None,
                        },
                        line,
                    );
                }
                Ok(())
            }

            ExprKind::InstanceVariable(name) => {
                let index = ctx.name_constant(name, expr.span)?;
                ctx.emit(Op::GetInstanceVariable(index), line);
                Ok(())
            }

            ExprKind::Constant(name) => {
                let index = ctx.name_constant(name, expr.span)?;
                ctx.emit(Op::GetConstant(index), line);
                Ok(())
            }

            ExprKind::ScopeResolution { scope, name } => {
                self.compile_expr(ctx, scope)?;
                let index = ctx.name_constant(name, expr.span)?;
                ctx.emit(Op::ScopedConstant(index), line);
                Ok(())
            }

            ExprKind::Assign { target, value } => {
                self.compile_expr(ctx, value)?;
                match &target.kind {
                    ExprKind::Identifier(name) => {
                        let index = ctx.name_constant(name, target.span)?;
                        ctx.emit(Op::SetLocal(index), line);
                        ctx.declare_local(name);
                    }
                    ExprKind::InstanceVariable(name) => {
                        let index = ctx.name_constant(name, target.span)?;
                        ctx.emit(Op::SetInstanceVariable(index), line);
                    }
                    ExprKind::Constant(name) => {
                        let index = ctx.name_constant(name, target.span)?;
                        ctx.emit(Op::SetConstant(index), line);
                    }
                    _ => {
                        return Err(CompileError::new(
                            "invalid assignment target",
                            target.span,
                        ));
                    }
                }
                Ok(())
            }

            ExprKind::And { left, right } => {
                self.compile_expr(ctx, left)?;
                let end = ctx.emit_jump(Op::JumpIfFalseKeep(0), line);
                ctx.emit(Op::Pop, line);
                self.compile_expr(ctx, right)?;
                ctx.patch_jump(end);
                Ok(())
            }

            ExprKind::Or { left, right } => {
                self.compile_expr(ctx, left)?;
                let end = ctx.emit_jump(Op::JumpIfTrueKeep(0), line);
                ctx.emit(Op::Pop, line);
                self.compile_expr(ctx, right)?;
                ctx.patch_jump(end);
                Ok(())
            }

            ExprKind::Send {
                receiver,
                name,
                args,
                block,
            } => {
                match receiver {
                    Some(receiver) => self.compile_expr(ctx, receiver)?,
                    None => {
                        ctx.emit(Op::PutSelf, line);
                    }
                }
                for arg in args {
                    self.compile_expr(ctx, arg)?;
                }
                let argc = u8::try_from(args.len())
                    .map_err(|_| CompileError::new("too many arguments", expr.span))?;
                let block = match block {
                    Some(literal) => Some(self.compile_block(ctx, literal, expr)?),
                    None => None,
                };
                let name = ctx.name_constant(name, expr.span)?;
                ctx.emit(Op::Send { name, argc, block }, line);
                Ok(())
            }

            ExprKind::Yield { args } => {
                for arg in args {
                    self.compile_expr(ctx, arg)?;
                }
                let argc = u8::try_from(args.len())
                    .map_err(|_| CompileError::new("too many arguments", expr.span))?;
                ctx.emit(Op::InvokeBlock(argc), line);
                Ok(())
            }

            ExprKind::ArrayLiteral(elements) => {
                for element in elements {
                    self.compile_expr(ctx, element)?;
                }
                let count = u16::try_from(elements.len())
                    .map_err(|_| CompileError::new("array literal too large", expr.span))?;
                ctx.emit(Op::NewArray(count), line);
                Ok(())
            }

            ExprKind::HashLiteral(entries) => {
                for (key, value) in entries {
                    let index = ctx.constant(Constant::Str(key.clone()), expr.span)?;
                    ctx.emit(Op::Constant(index), line);
                    self.compile_expr(ctx, value)?;
                }
                let count = u16::try_from(entries.len())
                    .map_err(|_| CompileError::new("hash literal too large", expr.span))?;
                ctx.emit(Op::NewHash(count), line);
                Ok(())
            }

            ExprKind::RangeLiteral { start, end } => {
                self.compile_expr(ctx, start)?;
                self.compile_expr(ctx, end)?;
                ctx.emit(Op::NewRange, line);
                Ok(())
            }

            ExprKind::If {
                condition,
                then_body,
                else_body,
            } => {
                self.compile_expr(ctx, condition)?;
                let else_jump = ctx.emit_jump(Op::JumpIfFalse(0), line);
                self.compile_statements(ctx, then_body, true, line)?;
                let end_jump = ctx.emit_jump(Op::Jump(0), line);
                ctx.patch_jump(else_jump);
                self.compile_statements(ctx, else_body, true, line)?;
                ctx.patch_jump(end_jump);
                Ok(())
            }
        }
    }

    /// Compile a block literal into a prototype. The block sees a snapshot
    /// of the enclosing scope's locals, mirroring the environment chain the
    /// VM builds at yield time.
    fn compile_block(
        &self,
        ctx: &mut ProtoContext,
        literal: &BlockLiteral,
        expr: &Expr,
    ) -> Result<u16, CompileError> {
        let mut block_ctx = ProtoContext::new(
            String::new(),
            literal.params.clone(),
            self.file.clone(),
            ctx.visible_locals(),
        );
        self.compile_body(&mut block_ctx, &literal.body, expr.span.line)?;
        ctx.proto_constant(block_ctx.finish(), expr.span)
    }
}
