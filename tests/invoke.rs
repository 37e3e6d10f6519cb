//! Invoke dispatch integration tests.
//!
//! These tests drive the public API the way a simplification pass would:
//! 1. Describe the code under analysis as a `ClassCatalog`
//! 2. Build a caller `ExecutionContext` with some known registers
//! 3. Dispatch invoke instructions in both addressing modes
//! 4. Verify the caller's registers, result register and diagnostics

use std::sync::Arc;

use dexsimplify::{
    dalvik::types::UNRESOLVED_TYPE,
    exec::build_callee_context,
    prelude::*,
};

const OWNER: &str = "Lcom/example/Crypto;";
const KEY: &str = "Lcom/example/Key;";
const STATE: &str = "Lcom/example/State;";

/// Catalog with one final and one open class plus a few methods.
fn catalog() -> Arc<ClassCatalog> {
    let method = |descriptor: &str, flags: AccessFlags| {
        MethodDef::new(MethodReference::parse(descriptor).unwrap(), flags)
    };

    Arc::new(ClassCatalog::new(vec![
        ClassDef::new(KEY, AccessFlags::PUBLIC | AccessFlags::FINAL),
        ClassDef::new(STATE, AccessFlags::PUBLIC),
        ClassDef::new(OWNER, AccessFlags::PUBLIC)
            .with_method(method(
                "Lcom/example/Crypto;->decrypt(Lcom/example/Key;Lcom/example/State;I)Ljava/lang/String;",
                AccessFlags::PUBLIC | AccessFlags::STATIC,
            ))
            .with_method(method(
                "Lcom/example/Crypto;->reset()V",
                AccessFlags::PUBLIC,
            )),
    ]))
}

fn dispatcher() -> InvokeDispatcher {
    let mut registry = EmulationRegistry::with_builtins();
    registry
        .register("Lcom/example/Crypto;->xor(II)I", |call| {
            match (call.argument(0).as_int(), call.argument(1).as_int()) {
                (Some(a), Some(b)) => Ok(Value::Int(a ^ b)),
                _ => Ok(call.unknown()),
            }
        })
        .unwrap();
    InvokeDispatcher::new(catalog(), Arc::new(registry))
}

fn method(descriptor: &str) -> MethodReference {
    MethodReference::parse(descriptor).unwrap()
}

#[test]
fn range_addressing_decodes_consecutive_registers() {
    let instruction = InvokeInstruction::range(
        Opcode::InvokeStaticRange,
        2,
        4,
        method("Lcom/example/Crypto;->sum(IIII)I"),
    )
    .unwrap();
    assert_eq!(invoke_registers(&instruction), vec![2, 3, 4, 5]);
}

#[test]
fn compact_addressing_uses_lowest_slots() {
    let format = Format35c::new(3, [7, 8, 9, 10, 11]).unwrap();
    let instruction = InvokeInstruction::new(
        Opcode::InvokeStatic,
        InvokeOperands::Compact(format),
        method("Lcom/example/Crypto;->mix(III)I"),
    )
    .unwrap();
    assert_eq!(invoke_registers(&instruction), vec![7, 8, 9]);
}

#[test]
fn addressing_mode_must_match_opcode() {
    let format = Format3rc::new(0, 1).unwrap();
    let result = InvokeInstruction::new(
        Opcode::InvokeStatic,
        InvokeOperands::Range(format),
        method("Lcom/example/Crypto;->f(I)V"),
    );
    assert!(matches!(result, Err(Error::Malformed { .. })));

    // Two registers for a single int parameter
    let result = InvokeInstruction::compact(
        Opcode::InvokeStatic,
        &[0, 1],
        method("Lcom/example/Crypto;->f(I)V"),
    );
    assert!(matches!(result, Err(Error::Malformed { .. })));
}

#[test]
fn callee_depth_is_one_less() {
    let caller = ExecutionContext::for_method(4, 0, &ExecutionConfig::default());
    assert_eq!(caller.remaining_call_depth(), 64);

    let instruction = InvokeInstruction::compact(
        Opcode::InvokeDirect,
        &[0],
        method("Lcom/example/Crypto;->reset()V"),
    )
    .unwrap();
    let callee = build_callee_context(&caller, &instruction, 1).unwrap();
    assert_eq!(callee.remaining_call_depth(), 63);
}

#[test]
fn emulated_call_computes_result() -> Result<()> {
    let dispatcher = dispatcher();
    let mut caller = ExecutionContext::new(3, 0, 8);
    caller.add_register(0, "I", Value::Int(0b1100), 1)?;
    caller.add_register(1, "I", Value::Int(0b1010), 1)?;

    let instruction = InvokeInstruction::compact(
        Opcode::InvokeStatic,
        &[0, 1],
        method("Lcom/example/Crypto;->xor(II)I"),
    )?;
    let outcome = dispatcher.dispatch(&mut caller, &instruction, 2)?;

    assert_eq!(outcome.disposition, Disposition::Emulated);
    let result = caller.result_register().expect("result is set");
    assert_eq!(result.ty(), "I");
    assert_eq!(result.value(), &Value::Int(0b0110));
    Ok(())
}

#[test]
fn unknown_target_gives_unknown_result() -> Result<()> {
    let dispatcher = dispatcher();
    let mut caller = ExecutionContext::new(1, 0, 8);
    caller.add_register(0, "I", Value::Int(3), 1)?;

    let instruction = InvokeInstruction::compact(
        Opcode::InvokeStatic,
        &[0],
        method("Lcom/thirdparty/Lib;->lookup(I)Ljava/lang/Object;"),
    )?;
    let outcome = dispatcher.dispatch(&mut caller, &instruction, 2)?;

    assert_eq!(outcome.disposition, Disposition::Opaque);
    let result = caller.result_register().expect("result is set");
    assert_eq!(result.ty(), UNRESOLVED_TYPE);
    assert!(result.is_unknown());
    // Primitive arguments are never invalidated
    assert_eq!(caller.register_value(0, 2), Value::Int(3));
    Ok(())
}

#[test]
fn deferred_known_keeps_final_and_primitive_arguments() -> Result<()> {
    let dispatcher = dispatcher();
    let mut caller = ExecutionContext::new(8, 2, 8);
    caller.add_register(4, KEY, Value::Null, 1)?;
    caller.add_register(5, STATE, Value::Null, 1)?;
    caller.add_register(6, "I", Value::Int(99), 1)?;

    let instruction = InvokeInstruction::range(
        Opcode::InvokeStaticRange,
        4,
        3,
        method("Lcom/example/Crypto;->decrypt(Lcom/example/Key;Lcom/example/State;I)Ljava/lang/String;"),
    )?;
    let outcome = dispatcher.dispatch(&mut caller, &instruction, 5)?;

    assert_eq!(outcome.disposition, Disposition::DeferredKnown);
    assert_eq!(caller.register_value(4, 5), Value::Null);
    assert!(caller.register_value(5, 5).is_unknown());
    assert_eq!(caller.register_value(6, 5), Value::Int(99));
    assert_eq!(caller.result_register().map(|r| r.ty()), Some(UNRESOLVED_TYPE));

    let warnings = dispatcher.events().at_least(EventLevel::Warn);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].kind, EventKind::DeferredKnown);
    Ok(())
}

#[test]
fn custom_type_metadata_is_consulted() -> Result<()> {
    let metadata = PlatformTypes::empty().with_type("com.thirdparty.Frozen", true);
    let dispatcher = dispatcher().with_type_metadata(Arc::new(metadata));

    let mut caller = ExecutionContext::new(2, 0, 8);
    caller.add_register(0, "Lcom/thirdparty/Frozen;", Value::Null, 1)?;
    caller.add_register(1, "Ljava/lang/String;", Value::from("s"), 1)?;

    let instruction = InvokeInstruction::compact(
        Opcode::InvokeStatic,
        &[0, 1],
        method("Lcom/thirdparty/Lib;->use(Lcom/thirdparty/Frozen;Ljava/lang/String;)V"),
    )?;
    let outcome = dispatcher.dispatch(&mut caller, &instruction, 2)?;

    // The empty table no longer knows String is final
    assert_eq!(outcome.retained, vec![0]);
    assert_eq!(outcome.invalidated, vec![1]);
    Ok(())
}

#[test]
fn batch_dispatch_over_shared_dispatcher() {
    let dispatcher = dispatcher();
    let xor = InvokeInstruction::compact(
        Opcode::InvokeStatic,
        &[0, 1],
        method("Lcom/example/Crypto;->xor(II)I"),
    )
    .unwrap();

    let mut activations: Vec<_> = (0..64)
        .map(|i| {
            let mut context = ExecutionContext::new(2, 0, 4);
            context.add_register(0, "I", Value::Int(i), 1).unwrap();
            context.add_register(1, "I", Value::Int(0xff), 1).unwrap();
            MethodActivation::new(format!("Lcom/example/M{i};->run()V"), context)
                .with_call_site(2, xor.clone())
        })
        .collect();

    let results = dispatcher.dispatch_batch(&mut activations);
    for (i, (activation, result)) in (0..64).zip(activations.iter().zip(results)) {
        assert_eq!(result.unwrap()[0].disposition, Disposition::Emulated);
        assert_eq!(
            activation.context.result_register().map(|r| r.value().clone()),
            Some(Value::Int(i ^ 0xff))
        );
    }
}
