//! Message-send dispatch: MRO lookup, builtin/defined/accessor invocation,
//! block construction and yield.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::runtime::class::{lookup_method, MethodEntry, MethodObject};
use crate::runtime::environment::Environment;
use crate::runtime::value::Value;

use super::vm::{Block, Vm};

impl Vm {
    /// The `Send` instruction: pop receiver and arguments, resolve, invoke,
    /// push the result. Popping before resolution is what the documented
    /// post-error stack depths rely on.
    pub(super) fn op_send(
        &mut self,
        name_index: u16,
        argc: u8,
        block_index: Option<u16>,
    ) -> Result<(), RuntimeError> {
        let proto = self.current_proto();
        let name = proto.chunk.string_constant(name_index).to_string();
        let block = block_index
            .and_then(|index| proto.chunk.proto_constant(index))
            .map(|block_proto| {
                let frame = self.frames.last().unwrap();
                Rc::new(Block {
                    proto: block_proto,
                    env: frame.env.clone(),
                    self_value: frame.self_value.clone(),
                    lexical: frame.lexical.clone(),
                    block: frame.block.clone(),
                })
            });
        let args = self.stack.split_off(self.stack.len() - argc as usize);
        let receiver = self.pop();
        let result = self.send_message(receiver, &name, &args, block.as_ref())?;
        self.push(result);
        Ok(())
    }

    /// The `InvokeBlock` instruction: yield to the current frame's block.
    pub(super) fn op_invoke_block(&mut self, argc: u8) -> Result<(), RuntimeError> {
        let block = self.frames.last().unwrap().block.clone();
        let Some(block) = block else {
            return Err(RuntimeError::cant_yield_without_block());
        };
        let args = self.stack.split_off(self.stack.len() - argc as usize);
        let result = self.yield_block(&block, &args)?;
        self.push(result);
        Ok(())
    }

    /// Resolve `name` on `receiver` and invoke it. Dispatch starts at the
    /// receiver's class, or its singleton class for class receivers, so
    /// class-side methods inherit along the superclass chain.
    pub fn send_message(
        &mut self,
        receiver: Value,
        name: &str,
        args: &[Value],
        block: Option<&Rc<Block>>,
    ) -> Result<Value, RuntimeError> {
        let start = receiver.dispatch_class(&self.classes);
        match lookup_method(&start, name) {
            Some(entry) => self.invoke_method(&entry, receiver, args, block),
            None => Err(RuntimeError::undefined_method(name, &receiver.to_string())),
        }
    }

    pub(crate) fn invoke_method(
        &mut self,
        entry: &MethodEntry,
        receiver: Value,
        args: &[Value],
        block: Option<&Rc<Block>>,
    ) -> Result<Value, RuntimeError> {
        match entry {
            MethodEntry::Builtin(builtin) => (builtin.func)(self, receiver, args, block),
            MethodEntry::AttrReader(ivar) => {
                if !args.is_empty() {
                    return Err(RuntimeError::argument_count(0, args.len()));
                }
                Ok(receiver.instance_variable(ivar))
            }
            MethodEntry::AttrWriter(ivar) => {
                if args.len() != 1 {
                    return Err(RuntimeError::argument_count(1, args.len()));
                }
                receiver.set_instance_variable(ivar, args[0].clone());
                Ok(args[0].clone())
            }
            MethodEntry::Defined(method) => {
                self.call_defined(method, receiver, args, block)
            }
        }
    }

    fn call_defined(
        &mut self,
        method: &Rc<MethodObject>,
        receiver: Value,
        args: &[Value],
        block: Option<&Rc<Block>>,
    ) -> Result<Value, RuntimeError> {
        let params = &method.proto.params;
        if args.len() != params.len() {
            return Err(RuntimeError::argument_count(params.len(), args.len()));
        }
        let env = Rc::new(RefCell::new(Environment::new()));
        {
            let mut env = env.borrow_mut();
            for (param, arg) in params.iter().zip(args) {
                env.define(param.clone(), arg.clone());
            }
        }
        self.push_frame(
            method.proto.clone(),
            receiver,
            env,
            block.cloned(),
            method.lexical.clone(),
        );
        self.run_frame()
    }

    /// Call a block with the given arguments. Built-ins use this for their
    /// own yields; it is synchronous, the caller resumes when the block
    /// frame returns. Missing arguments bind NIL, extras are dropped.
    pub fn yield_block(
        &mut self,
        block: &Rc<Block>,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        let env = Rc::new(RefCell::new(Environment::with_enclosing(
            block.env.clone(),
        )));
        {
            let mut env = env.borrow_mut();
            for (i, param) in block.proto.params.iter().enumerate() {
                env.define(
                    param.clone(),
                    args.get(i).cloned().unwrap_or(Value::Null),
                );
            }
        }
        self.push_frame(
            block.proto.clone(),
            block.self_value.clone(),
            env,
            block.block.clone(),
            block.lexical.clone(),
        );
        self.run_frame()
    }
}
