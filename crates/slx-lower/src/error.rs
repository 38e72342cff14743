//! Errors raised by the lowering passes.

use slx_ast::SourceArea;

/// Irrecoverable failures during conversion. Unlike reflection, lowering
/// aborts the compilation when an invariant breaks.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConvertError {
    /// An intrinsic call had the wrong number of arguments.
    #[error("invalid number of arguments for intrinsic '{name}'")]
    InvalidIntrinsicArgCount { name: &'static str, area: SourceArea },

    /// An intrinsic call had an argument of an unsupported type.
    #[error("invalid argument type for intrinsic '{name}'")]
    InvalidIntrinsicArgType { name: &'static str, area: SourceArea },

    /// A member-function call has no object prefix and no enclosing `self`.
    #[error("missing 'self' parameter for call to member function '{function}'")]
    MissingSelfParam { function: String, area: SourceArea },

    /// An internal invariant was violated.
    #[error("{0}")]
    Internal(String),
}
