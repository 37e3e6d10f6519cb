//! Benchmarks for invoke dispatch.
//!
//! Measures the per-call-site cost of each disposition:
//! - Emulated calls (handler lookup and evaluation)
//! - Deferred-known and opaque calls (mutability checks and invalidation)
//! - Register decoding in both addressing modes
//! - Parallel batches over many activations

extern crate dexsimplify;

use std::{hint::black_box, sync::Arc};

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use dexsimplify::prelude::*;

fn catalog() -> Arc<ClassCatalog> {
    let reference = MethodReference::parse(
        "Lcom/example/Cipher;->apply(Lcom/example/Buffer;Lcom/example/Key;I)I",
    )
    .unwrap();
    Arc::new(ClassCatalog::new(vec![
        ClassDef::new("Lcom/example/Key;", AccessFlags::PUBLIC | AccessFlags::FINAL),
        ClassDef::new("Lcom/example/Buffer;", AccessFlags::PUBLIC),
        ClassDef::new("Lcom/example/Cipher;", AccessFlags::PUBLIC)
            .with_method(MethodDef::new(reference, AccessFlags::STATIC)),
    ]))
}

fn dispatcher() -> InvokeDispatcher {
    InvokeDispatcher::new(catalog(), Arc::new(EmulationRegistry::with_builtins()))
        .with_config(ExecutionConfig::quiet())
}

fn caller() -> ExecutionContext {
    let mut context = ExecutionContext::new(8, 0, 32);
    context.add_register(0, "Lcom/example/Buffer;", Value::Null, 1).unwrap();
    context.add_register(1, "Lcom/example/Key;", Value::Null, 1).unwrap();
    context.add_register(2, "I", Value::Int(-12), 1).unwrap();
    context
}

/// Benchmark an emulated `Math.abs(int)` call.
fn bench_dispatch_emulated(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let instruction = InvokeInstruction::compact(
        Opcode::InvokeStatic,
        &[2],
        MethodReference::parse("Ljava/lang/Math;->abs(I)I").unwrap(),
    )
    .unwrap();

    c.bench_function("dispatch_emulated", |b| {
        b.iter_batched(
            caller,
            |mut context| {
                let outcome = dispatcher.dispatch(&mut context, &instruction, 2).unwrap();
                black_box(outcome)
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark a deferred-known call with mixed argument types.
fn bench_dispatch_deferred(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let instruction = InvokeInstruction::compact(
        Opcode::InvokeStatic,
        &[0, 1, 2],
        MethodReference::parse(
            "Lcom/example/Cipher;->apply(Lcom/example/Buffer;Lcom/example/Key;I)I",
        )
        .unwrap(),
    )
    .unwrap();

    c.bench_function("dispatch_deferred_known", |b| {
        b.iter_batched(
            caller,
            |mut context| {
                let outcome = dispatcher.dispatch(&mut context, &instruction, 2).unwrap();
                black_box(outcome)
            },
            BatchSize::SmallInput,
        );
    });
}

/// Benchmark decoding of both addressing modes.
fn bench_invoke_registers(c: &mut Criterion) {
    let compact = InvokeInstruction::compact(
        Opcode::InvokeVirtual,
        &[1, 2, 3, 4, 5],
        MethodReference::parse("Lcom/example/A;->f(IIII)V").unwrap(),
    )
    .unwrap();
    let range = InvokeInstruction::range(
        Opcode::InvokeStaticRange,
        16,
        12,
        MethodReference::parse("Lcom/example/A;->g(JJJJJJ)V").unwrap(),
    )
    .unwrap();

    c.bench_function("invoke_registers_compact", |b| {
        b.iter(|| black_box(invoke_registers(black_box(&compact))));
    });
    c.bench_function("invoke_registers_range", |b| {
        b.iter(|| black_box(invoke_registers(black_box(&range))));
    });
}

/// Benchmark a parallel batch of 256 activations with two call sites each.
fn bench_dispatch_batch(c: &mut Criterion) {
    let dispatcher = dispatcher();
    let abs = InvokeInstruction::compact(
        Opcode::InvokeStatic,
        &[2],
        MethodReference::parse("Ljava/lang/Math;->abs(I)I").unwrap(),
    )
    .unwrap();
    let opaque = InvokeInstruction::compact(
        Opcode::InvokeStatic,
        &[0],
        MethodReference::parse("Lcom/thirdparty/Sink;->drain(Lcom/example/Buffer;)V").unwrap(),
    )
    .unwrap();

    let activations: Vec<_> = (0..256)
        .map(|i| {
            MethodActivation::new(format!("m{i}"), caller())
                .with_call_site(2, abs.clone())
                .with_call_site(3, opaque.clone())
        })
        .collect();

    c.bench_function("dispatch_batch_256", |b| {
        b.iter_batched(
            || activations.clone(),
            |mut batch| black_box(dispatcher.dispatch_batch(&mut batch)),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_dispatch_emulated,
    bench_dispatch_deferred,
    bench_invoke_registers,
    bench_dispatch_batch
);
criterion_main!(benches);
