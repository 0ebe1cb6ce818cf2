//! AST → bytecode compiler: shared state and emit helpers. Statement and
//! expression lowering live in `compiler_stmts` / `compiler_exprs`.

use std::collections::HashSet;
use std::rc::Rc;

use crate::ast::Program;
use crate::error::CompileError;
use crate::span::Span;

use super::chunk::{Chunk, CompiledUnit, Constant, MethodProto};
use super::opcode::Op;

pub struct Compiler {
    pub(super) file: Rc<str>,
}

impl Compiler {
    pub fn compile(program: &Program, file: &str) -> Result<CompiledUnit, CompileError> {
        let compiler = Compiler {
            file: Rc::from(file),
        };
        let mut ctx = ProtoContext::new(
            String::new(),
            Vec::new(),
            compiler.file.clone(),
            HashSet::new(),
        );
        let end_line = program
            .statements
            .last()
            .map(|s| s.span.line)
            .unwrap_or(1);
        compiler.compile_body(&mut ctx, &program.statements, end_line)?;
        Ok(CompiledUnit {
            main: Rc::new(ctx.finish()),
        })
    }

    /// Compile a frame body: statements keeping the last value, then Leave.
    pub(super) fn compile_body(
        &self,
        ctx: &mut ProtoContext,
        statements: &[crate::ast::Stmt],
        end_line: usize,
    ) -> Result<(), CompileError> {
        self.compile_statements(ctx, statements, true, end_line)?;
        ctx.emit(Op::Leave, end_line);
        Ok(())
    }

    /// Compile a statement list. Every statement nets exactly one value;
    /// all but the last are popped when `keep_last` is set, all of them
    /// otherwise. An empty list pushes NIL when a value is required.
    pub(super) fn compile_statements(
        &self,
        ctx: &mut ProtoContext,
        statements: &[crate::ast::Stmt],
        keep_last: bool,
        line: usize,
    ) -> Result<(), CompileError> {
        if statements.is_empty() {
            if keep_last {
                ctx.emit(Op::Null, line);
            }
            return Ok(());
        }
        let last = statements.len() - 1;
        for (i, stmt) in statements.iter().enumerate() {
            self.compile_stmt(ctx, stmt)?;
            if !(keep_last && i == last) {
                ctx.emit(Op::Pop, stmt.span.line);
            }
        }
        Ok(())
    }
}

/// Per-body compilation state: the chunk under construction plus the set of
/// lexically known locals, which decides whether a bare identifier reads a
/// local or sends to `self`.
pub(super) struct ProtoContext {
    name: String,
    params: Vec<String>,
    chunk: Chunk,
    locals: HashSet<String>,
}

impl ProtoContext {
    /// `enclosing` seeds the visible locals; blocks pass a snapshot of the
    /// scope they appear in, methods and class bodies start fresh.
    pub(super) fn new(
        name: String,
        params: Vec<String>,
        file: Rc<str>,
        enclosing: HashSet<String>,
    ) -> Self {
        let mut locals = enclosing;
        for param in &params {
            locals.insert(param.clone());
        }
        Self {
            name,
            params,
            chunk: Chunk::new(file),
            locals,
        }
    }

    pub(super) fn declare_local(&mut self, name: &str) {
        self.locals.insert(name.to_string());
    }

    pub(super) fn is_local(&self, name: &str) -> bool {
        self.locals.contains(name)
    }

    pub(super) fn visible_locals(&self) -> HashSet<String> {
        self.locals.clone()
    }

    pub(super) fn emit(&mut self, op: Op, line: usize) -> usize {
        self.chunk.emit(op, line)
    }

    pub(super) fn code_len(&self) -> usize {
        self.chunk.code.len()
    }

    /// Intern a constant, deduplicating literals.
    pub(super) fn constant(
        &mut self,
        constant: Constant,
        span: Span,
    ) -> Result<u16, CompileError> {
        let existing = self.chunk.constants.iter().position(|c| match (c, &constant) {
            (Constant::Integer(a), Constant::Integer(b)) => a == b,
            (Constant::Str(a), Constant::Str(b)) => a == b,
            _ => false,
        });
        let index = match existing {
            Some(index) => index,
            None => {
                self.chunk.constants.push(constant);
                self.chunk.constants.len() - 1
            }
        };
        u16::try_from(index)
            .map_err(|_| CompileError::new("too many constants in one chunk", span))
    }

    pub(super) fn name_constant(&mut self, name: &str, span: Span) -> Result<u16, CompileError> {
        self.constant(Constant::Str(name.to_string()), span)
    }

    pub(super) fn proto_constant(
        &mut self,
        proto: MethodProto,
        span: Span,
    ) -> Result<u16, CompileError> {
        self.constant(Constant::Proto(Rc::new(proto)), span)
    }

    /// Emit a forward jump with a placeholder offset; patch it later.
    pub(super) fn emit_jump(&mut self, op: Op, line: usize) -> usize {
        self.emit(op, line)
    }

    pub(super) fn patch_jump(&mut self, index: usize) {
        let offset = (self.chunk.code.len() - index - 1) as u16;
        match &mut self.chunk.code[index] {
            Op::Jump(o)
            | Op::JumpIfFalse(o)
            | Op::JumpIfTrueKeep(o)
            | Op::JumpIfFalseKeep(o) => *o = offset,
            _ => {}
        }
    }

    /// Emit a backward jump to `start`.
    pub(super) fn emit_loop(&mut self, start: usize, line: usize) {
        let offset = (self.chunk.code.len() - start + 1) as u16;
        self.emit(Op::Loop(offset), line);
    }

    pub(super) fn finish(self) -> MethodProto {
        MethodProto {
            name: self.name,
            params: self.params,
            chunk: self.chunk,
        }
    }
}
