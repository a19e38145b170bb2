//! Execution limits.

/// Limits applied to a single [`Execution`](crate::runtime::Execution).
///
/// | Field | Default |
/// |-------|---------|
/// | `max_steps` | 10,000 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionConfig {
    /// Maximum number of nodes executed (0 for unlimited).
    pub max_steps: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        ExecutionConfig { max_steps: 10_000 }
    }
}

impl ExecutionConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the step budget.
    #[must_use]
    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }
}
