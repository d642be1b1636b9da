// ============================================================================
// jux-reactive - Errors
// The single error type shared by bindings, collections and animation
// ============================================================================

/// Errors raised synchronously by the call that triggered them.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum JuxError {
    /// A required value was missing
    #[error("{name} must not be null")]
    NullArgument { name: &'static str },

    /// Mutation attempted on an unmodifiable or immutable collection
    #[error("unsupported operation: {operation}")]
    UnsupportedOperation { operation: &'static str },

    /// Index outside `0..len`
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A factory parameter was outside its defined range
    #[error("illegal argument: {reason}")]
    IllegalArgument { reason: String },
}

impl JuxError {
    pub(crate) fn unsupported(operation: &'static str) -> Self {
        JuxError::UnsupportedOperation { operation }
    }

    pub(crate) fn illegal(reason: impl Into<String>) -> Self {
        JuxError::IllegalArgument {
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, JuxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_parameter() {
        let err = JuxError::NullArgument { name: "node" };
        assert_eq!(err.to_string(), "node must not be null");

        let err = JuxError::IndexOutOfBounds { index: 3, len: 1 };
        assert_eq!(err.to_string(), "index 3 out of bounds for length 1");

        let err = JuxError::illegal("steps must be at least 1");
        assert_eq!(err.to_string(), "illegal argument: steps must be at least 1");
    }
}
