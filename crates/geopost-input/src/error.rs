//! Error types for the `geopost-input` crate.

/// Errors raised when configuring an input budget.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// A budget of zero characters would reject every message.
    #[error("character budget must be at least 1")]
    ZeroBudget,
}
