//! Symbolic execution configuration.
//!
//! # Presets
//!
//! - [`ExecutionConfig::default()`] - Deep call budget, cached mutability answers, verbose
//!   per-register diagnostics
//! - [`ExecutionConfig::quiet()`] - Same limits without per-register diagnostics
//! - [`ExecutionConfig::shallow()`] - A single level of call contexts
//!
//! # Example
//!
//! ```rust
//! use dexsimplify::exec::ExecutionConfig;
//!
//! let config = ExecutionConfig::quiet().with_max_call_depth(8);
//! assert!(!config.verbose_parameters);
//! assert_eq!(config.max_call_depth, 8);
//! ```

/// Configuration shared by the dispatcher and top-level contexts.
///
/// # Default Values
///
/// | Setting | Default |
/// |---------|---------|
/// | `max_call_depth` | 64 |
/// | `cache_mutability` | `true` |
/// | `verbose_parameters` | `true` |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Call budget given to top-level contexts.
    ///
    /// Every callee context receives one less than its caller. A call site reached with an
    /// exhausted budget is handled as an opaque call.
    pub max_call_depth: u32,

    /// Memoize mutability answers per type descriptor.
    ///
    /// Types repeat heavily across call sites; disabling this only makes sense when the
    /// type metadata provider's answers can change during a pass.
    pub cache_mutability: bool,

    /// Record a `Fine` event for every parameter register retained or invalidated by an
    /// opaque call.
    pub verbose_parameters: bool,
}

impl ExecutionConfig {
    /// Default limits without per-register diagnostics.
    #[must_use]
    pub fn quiet() -> Self {
        ExecutionConfig {
            verbose_parameters: false,
            ..Self::default()
        }
    }

    /// A single level of call contexts below the analysed method.
    #[must_use]
    pub fn shallow() -> Self {
        ExecutionConfig {
            max_call_depth: 1,
            ..Self::default()
        }
    }

    /// Sets the call budget for top-level contexts.
    #[must_use]
    pub fn with_max_call_depth(mut self, depth: u32) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Enables or disables the mutability cache.
    #[must_use]
    pub fn with_mutability_cache(mut self, enabled: bool) -> Self {
        self.cache_mutability = enabled;
        self
    }

    /// Enables or disables per-register diagnostics.
    #[must_use]
    pub fn with_verbose_parameters(mut self, enabled: bool) -> Self {
        self.verbose_parameters = enabled;
        self
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig {
            max_call_depth: 64,
            cache_mutability: true,
            verbose_parameters: true,
        }
    }
}
