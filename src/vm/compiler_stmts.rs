//! Statement lowering: definitions, loops and returns.

use std::collections::HashSet;

use crate::ast::{Stmt, StmtKind};
use crate::error::CompileError;

use super::compiler::{Compiler, ProtoContext};
use super::opcode::{DefinitionKind, Op};

impl Compiler {
    pub(super) fn compile_stmt(
        &self,
        ctx: &mut ProtoContext,
        stmt: &Stmt,
    ) -> Result<(), CompileError> {
        let line = stmt.span.line;
        match &stmt.kind {
            StmtKind::Expression(expr) => self.compile_expr(ctx, expr),

            StmtKind::While { condition, body } => {
                let loop_start = ctx.code_len();
                self.compile_expr(ctx, condition)?;
                let exit = ctx.emit_jump(Op::JumpIfFalse(0), line);
                self.compile_statements(ctx, body, false, line)?;
                ctx.emit_loop(loop_start, line);
                ctx.patch_jump(exit);
                // A while loop evaluates to NIL.
                ctx.emit(Op::Null, line);
                Ok(())
            }

            StmtKind::Return(value) => {
                match value {
                    Some(expr) => self.compile_expr(ctx, expr)?,
                    None => {
                        ctx.emit(Op::Null, line);
                    }
                }
                ctx.emit(Op::Leave, line);
                Ok(())
            }

            StmtKind::MethodDef {
                name,
                self_method,
                params,
                body,
            } => {
                let mut proto_ctx = ProtoContext::new(
                    name.clone(),
                    params.clone(),
                    self.file.clone(),
                    HashSet::new(),
                );
                self.compile_body(&mut proto_ctx, body, line)?;
                let proto = ctx.proto_constant(proto_ctx.finish(), stmt.span)?;
                let op = if *self_method {
                    Op::DefClassMethod(proto)
                } else {
                    Op::DefMethod(proto)
                };
                ctx.emit(op, line);
                Ok(())
            }

            StmtKind::ClassDef {
                name,
                superclass,
                body,
                is_module,
            } => {
                ctx.emit(Op::PutSelf, line);
                let kind = if *is_module {
                    DefinitionKind::Module
                } else if let Some(superclass) = superclass {
                    self.compile_expr(ctx, superclass)?;
                    DefinitionKind::SubClass
                } else {
                    DefinitionKind::Class
                };
                let mut body_ctx = ProtoContext::new(
                    name.clone(),
                    Vec::new(),
                    self.file.clone(),
                    HashSet::new(),
                );
                self.compile_body(&mut body_ctx, body, line)?;
                let proto = ctx.proto_constant(body_ctx.finish(), stmt.span)?;
                let name = ctx.name_constant(name, stmt.span)?;
                ctx.emit(Op::DefClass { name, proto, kind }, line);
                Ok(())
            }
        }
    }
}
