#![no_main]

use std::sync::Arc;

use dexsimplify::prelude::*;
use libfuzzer_sys::fuzz_target;

// Layout: opcode byte, five compact slots / range start + count, descriptor text
fuzz_target!(|data: &[u8]| {
    if data.len() < 8 {
        return;
    }

    let Some(opcode) = Opcode::from_byte(data[0]) else {
        return;
    };
    let Ok(descriptor) = std::str::from_utf8(&data[8..]) else {
        return;
    };
    let Ok(method) = MethodReference::parse(descriptor) else {
        return;
    };

    let instruction = if opcode.is_range() {
        let start = u16::from_le_bytes([data[1], data[2]]);
        InvokeInstruction::range(opcode, start, data[3], method)
    } else {
        let count = usize::from(data[1] % 6);
        let slots: Vec<u8> = data[2..2 + count].iter().map(|s| s & 0xF).collect();
        InvokeInstruction::compact(opcode, &slots, method)
    };
    let Ok(instruction) = instruction else {
        return;
    };

    let dispatcher = InvokeDispatcher::new(
        Arc::new(ClassCatalog::empty()),
        Arc::new(EmulationRegistry::with_builtins()),
    );
    let mut caller = ExecutionContext::new(u16::from(data[7]), 0, 4);
    let _ = dispatcher.dispatch(&mut caller, &instruction, 1);
});
