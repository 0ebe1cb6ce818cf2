//! Garnet: a small, dynamically typed, class-based object-oriented
//! scripting language running on a bytecode VM.
//!
//! The pipeline is lexer → parser → compiler → VM. The VM owns the class
//! registry, a value stack and a call-frame stack; runtime errors are
//! first-class values carrying kind, message, file and line.

#![allow(clippy::module_inception)]

pub mod ast;
pub mod builtins;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;
pub mod span;
pub mod vm;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

use error::GarnetError;
use runtime::Value;
use vm::{CompiledUnit, Vm};

/// Compile source text into a unit the VM can execute.
pub fn compile(source: &str, file: &str) -> Result<CompiledUnit, GarnetError> {
    let tokens = lexer::Scanner::new(source).scan_tokens()?;
    let program = parser::Parser::new(tokens).parse()?;
    let unit = vm::Compiler::compile(&program, file)?;
    Ok(unit)
}

/// Compile and run source text on a fresh VM. A runtime Error value
/// surfaces as `GarnetError::Runtime`.
pub fn run(source: &str, file: &str) -> Result<Value, GarnetError> {
    let unit = compile(source, file)?;
    let mut vm = Vm::new();
    finish(vm.execute(&unit))
}

/// Compile and run a script file. The script's directory joins the load
/// path so `require` can see sibling libraries.
pub fn run_file(path: &Path) -> Result<Value, GarnetError> {
    let source = std::fs::read_to_string(path)?;
    let file = path.to_string_lossy();
    let unit = compile(&source, &file)?;
    let mut vm = Vm::new();
    if let Some(parent) = path.parent() {
        vm.load_paths.push(parent.to_path_buf());
    }
    finish(vm.execute(&unit))
}

fn finish(value: Value) -> Result<Value, GarnetError> {
    match value {
        Value::Error(e) => Err(GarnetError::Runtime((*e).clone())),
        value => Ok(value),
    }
}
