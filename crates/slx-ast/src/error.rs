//! Error types for the AST and type system.

/// A string↔enum lookup missed.
///
/// Produced by every `from_str` map in this crate; the reflection analyzer
/// downgrades it to a warning for sampler states and reports it as an error
/// for the other pipeline-state blocks.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to map '{value}' to {target}")]
pub struct MapError {
    /// The string that failed to resolve.
    pub value: String,
    /// Name of the enumeration that was looked up.
    pub target: &'static str,
}

impl MapError {
    pub fn new(value: impl Into<String>, target: &'static str) -> Self {
        Self {
            value: value.into(),
            target,
        }
    }
}

/// Errors raised by type queries.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// A swizzle or matrix subscript could not be resolved.
    #[error("invalid subscript '{subscript}' for type {data_type}")]
    InvalidSubscript {
        subscript: String,
        data_type: &'static str,
    },

    /// A string↔enum lookup missed.
    #[error(transparent)]
    Map(#[from] MapError),
}
