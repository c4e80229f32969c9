//! Comparison operator vocabulary.

use std::fmt::{self, Display};

use crate::constant::Constant;
use crate::error::PatternError;

/// The closed set of comparison operators the grammar defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Neq,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    Like,
    Matches,
    IsSubset,
    IsSuperset,
}

impl ComparisonOp {
    pub fn token(&self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Neq => "!=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::In => "IN",
            ComparisonOp::Like => "LIKE",
            ComparisonOp::Matches => "MATCHES",
            ComparisonOp::IsSubset => "ISSUBSET",
            ComparisonOp::IsSuperset => "ISSUPERSET",
        }
    }

    /// The operator's native negated spelling, where the grammar defines one.
    /// Negating those renders the swapped token instead of a `NOT` prefix.
    pub(crate) fn negated_spelling(&self) -> Option<ComparisonOp> {
        match self {
            ComparisonOp::Eq => Some(ComparisonOp::Neq),
            ComparisonOp::Neq => Some(ComparisonOp::Eq),
            _ => None,
        }
    }

    /// Operand contract, checked at comparison construction.
    pub(crate) fn validate_operand(&self, value: &Constant) -> Result<(), PatternError> {
        let ok = match self {
            ComparisonOp::In => matches!(value, Constant::List(_)),
            ComparisonOp::Like
            | ComparisonOp::Matches
            | ComparisonOp::IsSubset
            | ComparisonOp::IsSuperset => matches!(value, Constant::String(_)),
            _ => !matches!(value, Constant::List(_)),
        };
        if ok {
            Ok(())
        } else {
            Err(PatternError::InvalidOperand {
                operator: self.token(),
                found: value.kind(),
            })
        }
    }
}

impl Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens() {
        assert_eq!(ComparisonOp::Eq.to_string(), "=");
        assert_eq!(ComparisonOp::Neq.to_string(), "!=");
        assert_eq!(ComparisonOp::Ge.to_string(), ">=");
        assert_eq!(ComparisonOp::Matches.to_string(), "MATCHES");
        assert_eq!(ComparisonOp::IsSuperset.to_string(), "ISSUPERSET");
    }

    #[test]
    fn in_requires_list() {
        let list = Constant::list(vec![Constant::integer(1)]).unwrap();
        assert!(ComparisonOp::In.validate_operand(&list).is_ok());
        assert!(matches!(
            ComparisonOp::In.validate_operand(&Constant::integer(1)),
            Err(PatternError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn scalar_operators_reject_lists() {
        let list = Constant::list(vec![Constant::integer(1)]).unwrap();
        for op in [ComparisonOp::Eq, ComparisonOp::Lt, ComparisonOp::Ge] {
            assert!(op.validate_operand(&list).is_err());
        }
    }

    #[test]
    fn string_only_operators() {
        for op in [
            ComparisonOp::Like,
            ComparisonOp::Matches,
            ComparisonOp::IsSubset,
            ComparisonOp::IsSuperset,
        ] {
            assert!(op.validate_operand(&Constant::string("10.0.0.0/8")).is_ok());
            assert!(op.validate_operand(&Constant::integer(8)).is_err());
        }
    }
}
