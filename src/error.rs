use miette::Diagnostic;
use thiserror::Error;

/// Error type for pattern construction.
///
/// Every variant is produced at construction time; rendering a tree that was
/// successfully built never fails.
#[derive(Debug, Error, Diagnostic)]
pub enum PatternError {
    #[error("{expr} requires at least {min} operands, got {got}")]
    #[diagnostic(code(stix_pattern::invalid_arity))]
    InvalidArity {
        expr: &'static str,
        min: usize,
        got: usize,
    },

    #[error("operator {operator} cannot take a {found} operand")]
    #[diagnostic(
        code(stix_pattern::invalid_operand),
        help("IN takes a list constant; LIKE, MATCHES, ISSUBSET and ISSUPERSET take a string constant; every other operator takes a single scalar constant")
    )]
    InvalidOperand {
        operator: &'static str,
        found: &'static str,
    },

    #[error("invalid object path: {reason}")]
    #[diagnostic(code(stix_pattern::invalid_path))]
    InvalidPath { reason: String },

    #[error("invalid qualifier: {reason}")]
    #[diagnostic(code(stix_pattern::invalid_qualifier))]
    InvalidQualifier { reason: String },

    #[error("invalid constant: {reason}")]
    #[diagnostic(code(stix_pattern::invalid_constant))]
    InvalidConstant { reason: String },
}

impl PatternError {
    pub(crate) fn invalid_path(reason: impl Into<String>) -> Self {
        PatternError::InvalidPath {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_qualifier(reason: impl Into<String>) -> Self {
        PatternError::InvalidQualifier {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_constant(reason: impl Into<String>) -> Self {
        PatternError::InvalidConstant {
            reason: reason.into(),
        }
    }
}
