//! The bytecode pipeline: instruction set, chunks, the compiler and the
//! virtual machine.

pub mod chunk;
pub mod compiler;
mod compiler_exprs;
mod compiler_stmts;
pub mod disassembler;
pub mod opcode;
pub mod vm;
mod vm_calls;
mod vm_classes;


pub use chunk::{Chunk, CompiledUnit, Constant, MethodProto};
pub use compiler::Compiler;
pub use disassembler::disassemble;
pub use opcode::{DefinitionKind, Op};
pub use vm::{Block, CallFrame, Vm};
