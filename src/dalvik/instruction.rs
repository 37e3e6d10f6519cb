//! Invoke instructions and argument register decoding.
//!
//! An invoke names its argument registers in one of two encodings:
//!
//! ```text
//! 35c  A|G|op BBBB F|E|D|C    op {vC, vD, vE, vF, vG}, meth@BBBB
//! 3rc  AA|op BBBB CCCC        op {vCCCC .. vNNNN}, meth@BBBB
//! ```
//!
//! [`invoke_registers`] turns either encoding into the ordered list of caller registers that
//! supply the call's arguments. It is purely structural and never looks at register values.

use crate::{
    dalvik::{opcode::Opcode, reference::MethodReference},
    Result,
};

/// Highest register number addressable by a compact slot (4-bit field).
const COMPACT_REGISTER_MAX: u8 = 0x0f;

/// Number of explicit register slots in the compact encoding.
pub const COMPACT_SLOTS: usize = 5;

/// Compact operand encoding (format `35c`).
///
/// Up to five registers are named individually by the `C`, `D`, `E`, `F` and `G`
/// slots; `register_count` (the `A` field) states how many of them are in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format35c {
    register_count: u8,
    slots: [u8; COMPACT_SLOTS],
}

impl Format35c {
    /// Creates a compact encoding from the declared count and the raw `C..G` slot values.
    ///
    /// Slots beyond `register_count` are carried verbatim and ignored by decoding.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if more than five registers are declared or a slot
    /// in use does not fit the 4-bit register field.
    pub fn new(register_count: u8, slots: [u8; COMPACT_SLOTS]) -> Result<Self> {
        if usize::from(register_count) > COMPACT_SLOTS {
            return Err(malformed_error!(
                "Compact invoke declares {} registers, at most {} are encodable",
                register_count,
                COMPACT_SLOTS
            ));
        }

        if let Some(slot) = slots[..usize::from(register_count)]
            .iter()
            .find(|slot| **slot > COMPACT_REGISTER_MAX)
        {
            return Err(malformed_error!(
                "Compact invoke register v{} exceeds the 4-bit register field",
                slot
            ));
        }

        Ok(Format35c {
            register_count,
            slots,
        })
    }

    /// Creates a compact encoding naming exactly `registers`, in order.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Format35c::new`].
    pub fn from_registers(registers: &[u8]) -> Result<Self> {
        if registers.len() > COMPACT_SLOTS {
            return Err(malformed_error!(
                "Compact invoke declares {} registers, at most {} are encodable",
                registers.len(),
                COMPACT_SLOTS
            ));
        }

        let mut slots = [0u8; COMPACT_SLOTS];
        slots[..registers.len()].copy_from_slice(registers);
        // Bounded by COMPACT_SLOTS above
        #[allow(clippy::cast_possible_truncation)]
        let count = registers.len() as u8;
        Self::new(count, slots)
    }

    /// The declared register count (`A`).
    #[must_use]
    pub fn register_count(&self) -> u8 {
        self.register_count
    }

    /// Register slot `C`.
    #[must_use]
    pub fn register_c(&self) -> u8 {
        self.slots[0]
    }

    /// Register slot `D`.
    #[must_use]
    pub fn register_d(&self) -> u8 {
        self.slots[1]
    }

    /// Register slot `E`.
    #[must_use]
    pub fn register_e(&self) -> u8 {
        self.slots[2]
    }

    /// Register slot `F`.
    #[must_use]
    pub fn register_f(&self) -> u8 {
        self.slots[3]
    }

    /// Register slot `G`.
    #[must_use]
    pub fn register_g(&self) -> u8 {
        self.slots[4]
    }

    /// Positional accessor for slot `index` (0 = `C` .. 4 = `G`).
    fn slot(&self, index: usize) -> u8 {
        match index {
            4 => self.register_g(),
            3 => self.register_f(),
            2 => self.register_e(),
            1 => self.register_d(),
            _ => self.register_c(),
        }
    }
}

/// Range operand encoding (format `3rc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Format3rc {
    start: u16,
    count: u8,
}

impl Format3rc {
    /// Creates a range encoding covering `start .. start + count`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the span runs past the last addressable register.
    pub fn new(start: u16, count: u8) -> Result<Self> {
        if u32::from(start) + u32::from(count) > u32::from(u16::MAX) + 1 {
            return Err(malformed_error!(
                "Range invoke v{} + {} runs past the register file",
                start,
                count
            ));
        }

        Ok(Format3rc { start, count })
    }

    /// First register of the span (`CCCC`).
    #[must_use]
    pub fn start_register(&self) -> u16 {
        self.start
    }

    /// Number of registers in the span (`AA`).
    #[must_use]
    pub fn register_count(&self) -> u8 {
        self.count
    }
}

/// The raw operand encoding of an invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvokeOperands {
    /// Individually named registers.
    Compact(Format35c),
    /// Contiguous register span.
    Range(Format3rc),
}

impl InvokeOperands {
    /// Total number of argument registers, including the instance.
    #[must_use]
    pub fn register_count(&self) -> usize {
        match self {
            InvokeOperands::Compact(format) => usize::from(format.register_count()),
            InvokeOperands::Range(format) => usize::from(format.register_count()),
        }
    }
}

/// A decoded method invocation.
///
/// Construction validates that the operand encoding matches the opcode's arity class and
/// that the number of argument registers matches the referenced method's declared
/// parameters (wide parameters taking two registers, plus one for the instance of
/// non-static calls).
///
/// # Examples
///
/// ```rust
/// use dexsimplify::dalvik::{InvokeInstruction, MethodReference, Opcode};
///
/// let method = MethodReference::parse("Ljava/lang/StringBuilder;->append(I)Ljava/lang/StringBuilder;")?;
/// let invoke = InvokeInstruction::compact(Opcode::InvokeVirtual, &[0, 3], method)?;
/// assert_eq!(invoke.registers(), vec![0, 3]);
/// # Ok::<(), dexsimplify::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InvokeInstruction {
    opcode: Opcode,
    operands: InvokeOperands,
    method: MethodReference,
}

impl InvokeInstruction {
    /// Creates an invoke from its opcode, raw operands and method reference.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if the addressing mode disagrees with the opcode or
    /// the register count disagrees with the method's declared parameters.
    pub fn new(opcode: Opcode, operands: InvokeOperands, method: MethodReference) -> Result<Self> {
        let range_operands = matches!(operands, InvokeOperands::Range(_));
        if opcode.is_range() != range_operands {
            return Err(malformed_error!(
                "{} cannot use {} operands",
                opcode,
                if range_operands { "range" } else { "compact" }
            ));
        }

        let expected = method.parameter_register_count() + usize::from(!opcode.is_static());
        if operands.register_count() != expected {
            return Err(malformed_error!(
                "{} {} passes {} registers, the declaration needs {}",
                opcode,
                method,
                operands.register_count(),
                expected
            ));
        }

        Ok(InvokeInstruction {
            opcode,
            operands,
            method,
        })
    }

    /// Creates a compact-form invoke naming `registers` in order.
    ///
    /// # Errors
    ///
    /// See [`InvokeInstruction::new`] and [`Format35c::new`].
    pub fn compact(opcode: Opcode, registers: &[u8], method: MethodReference) -> Result<Self> {
        let format = Format35c::from_registers(registers)?;
        Self::new(opcode, InvokeOperands::Compact(format), method)
    }

    /// Creates a range-form invoke covering `start .. start + count`.
    ///
    /// # Errors
    ///
    /// See [`InvokeInstruction::new`] and [`Format3rc::new`].
    pub fn range(opcode: Opcode, start: u16, count: u8, method: MethodReference) -> Result<Self> {
        let format = Format3rc::new(start, count)?;
        Self::new(opcode, InvokeOperands::Range(format), method)
    }

    /// The invoke opcode.
    #[must_use]
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// The raw operand encoding.
    #[must_use]
    pub fn operands(&self) -> &InvokeOperands {
        &self.operands
    }

    /// The invoked method.
    #[must_use]
    pub fn method(&self) -> &MethodReference {
        &self.method
    }

    /// Returns `true` if the call has no instance register.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.opcode.is_static()
    }

    /// The caller registers supplying the arguments, see [`invoke_registers`].
    #[must_use]
    pub fn registers(&self) -> Vec<u16> {
        invoke_registers(self)
    }
}

/// Decodes the ordered caller registers supplying an invoke's arguments.
///
/// The instance register of non-static calls comes first.
///
/// - Range operands produce `start, start + 1, .., start + count - 1`.
/// - Compact operands fill the result with switch-fallthrough semantics: for a declared count
///   of `k`, slot `k - 1` is assigned first and every lower slot down to `C` follows, so a
///   declared count always yields exactly the `k` lowest positional slots regardless of what
///   the unused higher slots hold.
#[must_use]
pub fn invoke_registers(instruction: &InvokeInstruction) -> Vec<u16> {
    match instruction.operands() {
        InvokeOperands::Range(format) => {
            let start = format.start_register();
            (0..u16::from(format.register_count()))
                .map(|offset| start + offset)
                .collect()
        }
        InvokeOperands::Compact(format) => fill_compact(format),
    }
}

/// Fallthrough fill: `case 5: r[4] = G; case 4: r[3] = F; .. case 1: r[0] = C;`
fn fill_compact(format: &Format35c) -> Vec<u16> {
    let mut result = vec![0u16; usize::from(format.register_count())];
    for index in (0..result.len()).rev() {
        result[index] = u16::from(format.slot(index));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn static_method(params: &[&str]) -> MethodReference {
        MethodReference::new("Lcom/example/Util;", "run", params.iter().copied(), "V")
    }

    #[test]
    fn test_range_decoding() {
        let invoke = InvokeInstruction::range(
            Opcode::InvokeStaticRange,
            2,
            4,
            static_method(&["I", "I", "I", "I"]),
        )
        .unwrap();
        assert_eq!(invoke_registers(&invoke), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_compact_count_three_ignores_higher_slots() {
        let format = Format35c::new(3, [7, 8, 9, 14, 15]).unwrap();
        let invoke = InvokeInstruction::new(
            Opcode::InvokeStatic,
            InvokeOperands::Compact(format),
            static_method(&["I", "I", "I"]),
        )
        .unwrap();
        assert_eq!(invoke_registers(&invoke), vec![7, 8, 9]);
    }

    #[test]
    fn test_compact_all_counts() {
        let slots = [1, 2, 3, 4, 5];
        for count in 0..=5u8 {
            let format = Format35c::new(count, slots).unwrap();
            let expected: Vec<u16> = slots[..usize::from(count)]
                .iter()
                .map(|r| u16::from(*r))
                .collect();
            assert_eq!(fill_compact(&format), expected);
        }
    }

    #[test]
    fn test_compact_rejects_six_registers() {
        assert!(Format35c::new(6, [0; 5]).is_err());
        assert!(Format35c::from_registers(&[0, 1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn test_compact_rejects_wide_register_numbers() {
        assert!(Format35c::from_registers(&[16]).is_err());
        // Unused slots are not validated
        assert!(Format35c::new(1, [3, 200, 0, 0, 0]).is_ok());
    }

    #[test]
    fn test_range_overflow() {
        assert!(Format3rc::new(u16::MAX, 1).is_ok());
        assert!(Format3rc::new(u16::MAX, 2).is_err());
    }

    #[test]
    fn test_mode_must_match_opcode() {
        let format = Format3rc::new(0, 1).unwrap();
        let err = InvokeInstruction::new(
            Opcode::InvokeStatic,
            InvokeOperands::Range(format),
            static_method(&["I"]),
        );
        assert!(err.is_err());

        let err = InvokeInstruction::compact(Opcode::InvokeStaticRange, &[0], static_method(&["I"]));
        assert!(err.is_err());
    }

    #[test]
    fn test_register_count_must_match_declaration() {
        // Non-static calls need an extra register for the instance
        let method = MethodReference::new("Lfoo;", "m", ["I"], "V");
        assert!(InvokeInstruction::compact(Opcode::InvokeVirtual, &[0], method.clone()).is_err());
        assert!(InvokeInstruction::compact(Opcode::InvokeVirtual, &[0, 1], method).is_ok());

        // Wide parameters take two registers
        let method = static_method(&["J"]);
        assert!(InvokeInstruction::compact(Opcode::InvokeStatic, &[0], method.clone()).is_err());
        assert!(InvokeInstruction::compact(Opcode::InvokeStatic, &[0, 1], method).is_ok());
    }
}
