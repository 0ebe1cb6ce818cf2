//! Human-readable listings of compiled code, for `--disassemble`.

use std::fmt::Write;

use super::chunk::{Chunk, CompiledUnit, Constant, MethodProto};
use super::opcode::Op;

pub fn disassemble(unit: &CompiledUnit) -> String {
    let mut out = String::new();
    disassemble_proto(&unit.main, "<main>", &mut out);
    out
}

fn disassemble_proto(proto: &MethodProto, label: &str, out: &mut String) {
    let _ = writeln!(out, "== {} ==", label);
    for (offset, op) in proto.chunk.code.iter().enumerate() {
        let line = proto.chunk.lines.get(offset).copied().unwrap_or(0);
        let _ = writeln!(
            out,
            "{:04} {:>4} {}",
            offset,
            line,
            render_op(&proto.chunk, op)
        );
    }
    // Nested bodies follow their owner.
    for constant in &proto.chunk.constants {
        if let Constant::Proto(nested) = constant {
            let label = if nested.name.is_empty() {
                "<block>".to_string()
            } else {
                nested.name.clone()
            };
            disassemble_proto(nested, &label, out);
        }
    }
}

fn render_op(chunk: &Chunk, op: &Op) -> String {
    match op {
        Op::Constant(i) => format!("constant        {}", render_constant(chunk, *i)),
        Op::Null => "null".to_string(),
        Op::True => "true".to_string(),
        Op::False => "false".to_string(),
        Op::Pop => "pop".to_string(),
        Op::PutSelf => "put_self".to_string(),
        Op::GetLocal(i) => format!("get_local       {}", chunk.string_constant(*i)),
        Op::SetLocal(i) => format!("set_local       {}", chunk.string_constant(*i)),
        Op::GetInstanceVariable(i) => {
            format!("get_ivar        {}", chunk.string_constant(*i))
        }
        Op::SetInstanceVariable(i) => {
            format!("set_ivar        {}", chunk.string_constant(*i))
        }
        Op::GetConstant(i) => format!("get_constant    {}", chunk.string_constant(*i)),
        Op::ScopedConstant(i) => format!("scoped_constant {}", chunk.string_constant(*i)),
        Op::SetConstant(i) => format!("set_constant    {}", chunk.string_constant(*i)),
        Op::NewArray(n) => format!("new_array       {}", n),
        Op::NewHash(n) => format!("new_hash        {}", n),
        Op::NewRange => "new_range".to_string(),
        Op::Jump(o) => format!("jump            +{}", o),
        Op::JumpIfFalse(o) => format!("jump_if_false   +{}", o),
        Op::JumpIfTrueKeep(o) => format!("jump_if_true*   +{}", o),
        Op::JumpIfFalseKeep(o) => format!("jump_if_false*  +{}", o),
        Op::Loop(o) => format!("loop            -{}", o),
        Op::Send { name, argc, block } => {
            let block = if block.is_some() { " block" } else { "" };
            format!(
                "send            {} argc={}{}",
                chunk.string_constant(*name),
                argc,
                block
            )
        }
        Op::InvokeBlock(argc) => format!("invoke_block    argc={}", argc),
        Op::DefMethod(i) => format!("def_method      {}", proto_name(chunk, *i)),
        Op::DefClassMethod(i) => format!("def_class_meth  {}", proto_name(chunk, *i)),
        Op::DefClass { name, kind, .. } => {
            format!("def_class       {} ({:?})", chunk.string_constant(*name), kind)
        }
        Op::Leave => "leave".to_string(),
    }
}

fn render_constant(chunk: &Chunk, index: u16) -> String {
    match &chunk.constants[index as usize] {
        Constant::Integer(n) => n.to_string(),
        Constant::Str(s) => format!("\"{}\"", s),
        Constant::Proto(p) => format!("<proto {}>", p.name),
    }
}

fn proto_name(chunk: &Chunk, index: u16) -> String {
    chunk
        .proto_constant(index)
        .map(|p| p.name.clone())
        .unwrap_or_default()
}
