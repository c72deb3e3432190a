use verity_model::UnsupportedOrdering;

/// Errors raised while computing a reference result.
///
/// Any of these coming out of [`crate::evaluate`] means the reference
/// computation itself is inconsistent; it is never a test failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// Operands of the wrong type for an operator or function.
    #[error("type error: {message}")]
    TypeError { message: String },

    /// Checked arithmetic overflowed.
    #[error("numeric overflow: {message}")]
    Overflow { message: String },

    #[error("division by zero in {expression}")]
    DivisionByZero { expression: String },

    /// A function has no defined result for its argument (e.g. sqrt(-1)).
    #[error("{func} is undefined for {value}")]
    Domain { func: &'static str, value: String },

    /// Two sort keys could not be ordered against each other.
    #[error("cannot order {left} against {right} on {field}")]
    IncomparableKeys {
        field: String,
        left: String,
        right: String,
    },

    #[error(transparent)]
    UnsupportedOrdering(#[from] UnsupportedOrdering),
}
