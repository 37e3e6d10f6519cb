use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors only ever originate from structurally invalid input. The symbolic pass itself never
/// fails on uncertainty: unresolvable methods, unknown types and exhausted call depth all degrade
/// to conservative approximations instead of surfacing here.
///
/// # Error Categories
///
/// ## Input Errors
/// - [`Error::Malformed`] - Invalid instruction encoding or arity mismatch
/// - [`Error::InvalidDescriptor`] - Unparsable method or type descriptor
///
/// ## Execution Errors
/// - [`Error::RegisterOutOfRange`] - Write outside of a register file
/// - [`Error::Emulation`] - A registered emulation handler rejected its input
///
/// # Examples
///
/// ```rust
/// use dexsimplify::{Error, dalvik::MethodReference};
///
/// match MethodReference::parse("not a descriptor") {
///     Ok(method) => println!("parsed {}", method.descriptor()),
///     Err(Error::InvalidDescriptor(text)) => eprintln!("bad descriptor: {}", text),
///     Err(e) => eprintln!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The instruction is structurally invalid and could not be decoded.
    ///
    /// Raised when a compact encoding declares more than five registers, when the
    /// operand encoding does not match the opcode's addressing mode, or when the
    /// argument registers do not line up with the declared parameter types.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A method or type descriptor could not be parsed.
    ///
    /// The associated string is the offending descriptor text.
    #[error("Invalid descriptor - {0}")]
    InvalidDescriptor(String),

    /// A register write targeted an index outside of the context's register file.
    #[error("Register v{register} is out of range for a frame of {count} registers")]
    RegisterOutOfRange {
        /// The register that was addressed
        register: u16,
        /// The number of registers in the frame
        count: u16,
    },

    /// An emulation handler failed to compute a result.
    ///
    /// The dispatcher never propagates this; the call is downgraded to an opaque
    /// call and a warning is recorded instead.
    #[error("Emulation of {descriptor} failed: {message}")]
    Emulation {
        /// Descriptor of the emulated method
        descriptor: String,
        /// Reason reported by the handler
        message: String,
    },
}
