//! Construction of callee contexts from caller state.

use std::sync::Arc;

use crate::{
    dalvik::{types::is_wide, InvokeInstruction},
    exec::{ExecutionContext, RegisterStore, UnknownValue},
    Result,
};

/// Builds the context a call site's callee would start with.
///
/// The callee frame holds exactly the argument registers, all of them parameters, and gets
/// one less call budget than the caller (never below zero).
///
/// - Non-static calls bind callee register 0 to the very store the caller's instance register
///   holds at `point`, type and value unchanged.
/// - Every declared parameter is bound with its declared type and the value the caller's
///   argument register holds at `point`. Wide parameters bind both halves of their register
///   pair.
///
/// The declared types win over whatever the caller's stores say, so the callee's view always
/// mirrors the method's declaration.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if the argument registers do not line up with the
/// declared parameters. Instructions built through [`InvokeInstruction::new`] are validated
/// for this already.
pub fn build_callee_context(
    caller: &ExecutionContext,
    instruction: &InvokeInstruction,
    point: usize,
) -> Result<ExecutionContext> {
    let method = instruction.method();
    let registers = instruction.registers();
    let count = u16::try_from(registers.len())
        .map_err(|_| malformed_error!("{} passes {} registers", method, registers.len()))?;

    let mut callee = ExecutionContext::new(
        count,
        count,
        caller.remaining_call_depth().saturating_sub(1),
    );

    let mut arguments = registers.iter();
    let mut index: u16 = 0;

    if !instruction.is_static() {
        let instance = arguments
            .next()
            .ok_or_else(|| malformed_error!("{} has no instance register", method))?;
        let store = caller.register(*instance, point).unwrap_or_else(|| {
            Arc::new(RegisterStore::unknown(
                method.owner(),
                UnknownValue::unanalyzed(),
            ))
        });
        callee.add_parameter_store(index, store)?;
        index += 1;
    }

    for ty in method.parameter_types() {
        let register = arguments
            .next()
            .ok_or_else(|| malformed_error!("{} is missing an argument for {}", method, ty))?;
        let value = caller.register_value(*register, point);

        if is_wide(ty) {
            arguments
                .next()
                .ok_or_else(|| malformed_error!("{} is missing the upper half of {}", method, ty))?;
            callee.add_parameter_register(index, ty.as_str(), value.clone())?;
            index += 1;
        }

        callee.add_parameter_register(index, ty.as_str(), value)?;
        index += 1;
    }

    if arguments.next().is_some() {
        return Err(malformed_error!(
            "{} passes more registers than it declares",
            method
        ));
    }

    Ok(callee)
}
