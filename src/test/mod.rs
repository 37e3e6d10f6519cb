//! Shared factories for unit tests.

use std::sync::Arc;

use crate::{
    catalog::{AccessFlags, ClassCatalog, ClassDef, MethodDef},
    dalvik::{InvokeInstruction, MethodReference, Opcode},
    emulate::EmulationRegistry,
    exec::{ExecutionContext, InvokeDispatcher, Value},
};

pub const TOKEN: &str = "Lcom/example/Token;";
pub const BUFFER: &str = "Lcom/example/Buffer;";
pub const UTIL: &str = "Lcom/example/Util;";

// Helper function to create a MethodReference from its descriptor
pub fn create_method(descriptor: &str) -> MethodReference {
    MethodReference::parse(descriptor).unwrap()
}

// Helper function to create a catalog method
pub fn create_method_def(descriptor: &str, flags: AccessFlags) -> MethodDef {
    MethodDef::new(create_method(descriptor), flags)
}

// Helper function to create the catalog used across the dispatcher tests
//
// Token is final, Buffer is not, Util only has static helpers.
pub fn create_catalog() -> Arc<ClassCatalog> {
    Arc::new(ClassCatalog::new(vec![
        ClassDef::new(TOKEN, AccessFlags::PUBLIC | AccessFlags::FINAL).with_method(
            create_method_def("Lcom/example/Token;->value()I", AccessFlags::PUBLIC),
        ),
        ClassDef::new(BUFFER, AccessFlags::PUBLIC)
            .with_method(create_method_def(
                "Lcom/example/Buffer;->append(Ljava/lang/String;)V",
                AccessFlags::PUBLIC,
            ))
            .with_method(create_method_def(
                "Lcom/example/Buffer;->size()I",
                AccessFlags::PUBLIC,
            )),
        ClassDef::new(UTIL, AccessFlags::PUBLIC | AccessFlags::FINAL).with_method(
            create_method_def(
                "Lcom/example/Util;->mix(ILcom/example/Buffer;Lcom/example/Token;)I",
                AccessFlags::PUBLIC | AccessFlags::STATIC,
            ),
        ),
    ]))
}

// Helper function to create a dispatcher over the test catalog with the built-in handlers
pub fn create_dispatcher() -> InvokeDispatcher {
    InvokeDispatcher::new(create_catalog(), Arc::new(EmulationRegistry::with_builtins()))
}

// Helper function to create a compact invoke
pub fn create_compact(opcode: Opcode, descriptor: &str, registers: &[u8]) -> InvokeInstruction {
    InvokeInstruction::compact(opcode, registers, create_method(descriptor)).unwrap()
}

// Helper function to create a range invoke
pub fn create_range(opcode: Opcode, descriptor: &str, start: u16, count: u8) -> InvokeInstruction {
    InvokeInstruction::range(opcode, start, count, create_method(descriptor)).unwrap()
}

// Helper function to create a caller context with locals written at point 1
pub fn create_caller(
    register_count: u16,
    remaining_call_depth: u32,
    locals: &[(u16, &str, Value)],
) -> ExecutionContext {
    let mut context = ExecutionContext::new(register_count, 0, remaining_call_depth);
    for (register, ty, value) in locals {
        context
            .add_register(*register, *ty, value.clone(), 1)
            .unwrap();
    }
    context
}
