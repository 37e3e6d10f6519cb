//! Parallel dispatch across independent method activations.
//!
//! Call sites inside one method depend on each other through the register file and are
//! processed strictly in program order. Different methods share nothing but the
//! dispatcher's read-only state, so activations are spread over the `rayon` pool.

use rayon::prelude::*;

use crate::{
    dalvik::InvokeInstruction,
    exec::{DispatchOutcome, ExecutionContext, InvokeDispatcher},
    Result,
};

/// An invoke instruction together with its program point.
#[derive(Debug, Clone)]
pub struct CallSite {
    /// Program point of the instruction in its method.
    pub point: usize,
    /// The invoke instruction.
    pub instruction: InvokeInstruction,
}

impl CallSite {
    /// Creates a call site.
    #[must_use]
    pub fn new(point: usize, instruction: InvokeInstruction) -> Self {
        CallSite { point, instruction }
    }
}

/// One method's context and the call sites to apply to it.
#[derive(Debug, Clone)]
pub struct MethodActivation {
    /// Descriptor or display name of the analysed method.
    pub name: String,
    /// Register file of the activation, updated in place.
    pub context: ExecutionContext,
    /// Call sites, in program order.
    pub call_sites: Vec<CallSite>,
}

impl MethodActivation {
    /// Creates an activation without call sites.
    #[must_use]
    pub fn new(name: impl Into<String>, context: ExecutionContext) -> Self {
        MethodActivation {
            name: name.into(),
            context,
            call_sites: Vec::new(),
        }
    }

    /// Appends a call site.
    #[must_use]
    pub fn with_call_site(mut self, point: usize, instruction: InvokeInstruction) -> Self {
        self.call_sites.push(CallSite::new(point, instruction));
        self
    }
}

impl InvokeDispatcher {
    /// Dispatches every call site of every activation.
    ///
    /// Activations are processed in parallel, each one's call sites sequentially. The
    /// returned vector holds, per activation and in the same order, the outcome of each
    /// call site, or the first error that stopped that activation. An error in one
    /// activation does not affect the others.
    pub fn dispatch_batch(
        &self,
        activations: &mut [MethodActivation],
    ) -> Vec<Result<Vec<DispatchOutcome>>> {
        activations
            .par_iter_mut()
            .map(|activation| {
                let MethodActivation {
                    context,
                    call_sites,
                    ..
                } = activation;

                call_sites
                    .iter()
                    .map(|site| self.dispatch(context, &site.instruction, site.point))
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        dalvik::Opcode,
        exec::{Disposition, EventKind, Value},
        test::{create_caller, create_compact, create_dispatcher, BUFFER},
    };

    use super::*;

    const SIZE: &str = "Lcom/example/Buffer;->size()I";
    const ABS: &str = "Ljava/lang/Math;->abs(I)I";

    #[test]
    fn test_batch_matches_sequential() {
        let dispatcher = create_dispatcher();

        let mut activations: Vec<_> = (0..16)
            .map(|i| {
                let caller = create_caller(
                    2,
                    4,
                    &[(0, BUFFER, Value::Null), (1, "I", Value::Int(-i))],
                );
                MethodActivation::new(format!("method{i}"), caller)
                    .with_call_site(2, create_compact(Opcode::InvokeStatic, ABS, &[1]))
                    .with_call_site(3, create_compact(Opcode::InvokeVirtual, SIZE, &[0]))
            })
            .collect();

        let results = dispatcher.dispatch_batch(&mut activations);
        assert_eq!(results.len(), 16);

        for (i, (activation, result)) in activations.iter().zip(results).enumerate() {
            let outcomes = result.unwrap();
            let dispositions: Vec<_> = outcomes.iter().map(|o| o.disposition).collect();
            assert_eq!(
                dispositions,
                vec![Disposition::Emulated, Disposition::DeferredKnown]
            );
            assert_eq!(
                outcomes[0].result.as_ref().map(|s| s.value().clone()),
                Some(Value::Int(i32::try_from(i).unwrap()))
            );
            // The deferred call invalidated the receiver after the emulated one
            assert!(activation.context.register_value(0, 3).is_unknown());
            assert_eq!(activation.context.register_value(0, 2), Value::Null);
        }

        assert_eq!(dispatcher.events().count_kind(EventKind::InvokeProcessed), 32);
    }

    #[test]
    fn test_batch_isolates_errors() {
        let dispatcher = create_dispatcher();
        let mut activations = vec![
            MethodActivation::new("bad", create_caller(1, 4, &[]))
                .with_call_site(1, create_compact(Opcode::InvokeVirtual, SIZE, &[3])),
            MethodActivation::new("good", create_caller(1, 4, &[]))
                .with_call_site(1, create_compact(Opcode::InvokeVirtual, SIZE, &[0])),
        ];

        let results = dispatcher.dispatch_batch(&mut activations);
        assert!(results[0].is_err());
        assert_eq!(results[1].as_ref().unwrap().len(), 1);
    }
}
