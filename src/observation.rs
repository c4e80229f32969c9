//! Observation-level expressions: bracketed observations, their AND / OR /
//! FOLLOWEDBY combinations, and temporal/repetition qualifiers.
//!
//! These are the only root-capable nodes; a finished tree becomes a pattern
//! string via [`ObservationExpr::to_pattern_string`].

use std::fmt::{self, Display};

use itertools::Itertools;

use crate::constant::Timestamp;
use crate::error::PatternError;
use crate::expr::PropertyExpr;

/// Connective between already-bracketed observation expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservationOp {
    And,
    Or,
    FollowedBy,
}

impl ObservationOp {
    pub fn token(&self) -> &'static str {
        match self {
            ObservationOp::And => "AND",
            ObservationOp::Or => "OR",
            ObservationOp::FollowedBy => "FOLLOWEDBY",
        }
    }
}

impl Display for ObservationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A temporal or repetition constraint attached to an observation.
#[derive(Debug, Clone, PartialEq)]
pub enum Qualifier {
    Within { seconds: u64 },
    Repeats { times: u64 },
    StartStop { start: Timestamp, stop: Timestamp },
}

impl Qualifier {
    pub fn within(seconds: u64) -> Result<Self, PatternError> {
        if seconds == 0 {
            return Err(PatternError::invalid_qualifier("WITHIN requires a positive number of seconds"));
        }
        Ok(Qualifier::Within { seconds })
    }

    pub fn repeats(times: u64) -> Result<Self, PatternError> {
        if times == 0 {
            return Err(PatternError::invalid_qualifier("REPEATS requires a positive count"));
        }
        Ok(Qualifier::Repeats { times })
    }

    pub fn start_stop(start: Timestamp, stop: Timestamp) -> Result<Self, PatternError> {
        if start >= stop {
            return Err(PatternError::invalid_qualifier(format!(
                "START {} must precede STOP {}",
                start, stop
            )));
        }
        Ok(Qualifier::StartStop { start, stop })
    }
}

impl Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Qualifier::Within { seconds } => write!(f, "WITHIN {} SECONDS", seconds),
            Qualifier::Repeats { times } => write!(f, "REPEATS {} TIMES", times),
            Qualifier::StartStop { start, stop } => {
                write!(f, "START t'{}' STOP t'{}'", start, stop)
            }
        }
    }
}

/// A root-capable pattern expression.
///
/// Only values of this type render as complete patterns; property-level
/// trees must pass through [`ObservationExpr::observe`] first, which is how
/// the grammar's "comparisons live inside brackets" rule is enforced at
/// compile time.
#[derive(Debug, Clone, PartialEq)]
pub enum ObservationExpr {
    /// `[` property expression `]`: one Observable instance.
    Observation(PropertyExpr),
    Compound {
        op: ObservationOp,
        operands: Vec<ObservationExpr>,
    },
    Qualified {
        child: Box<ObservationExpr>,
        qualifier: Qualifier,
    },
    Paren(Box<ObservationExpr>),
}

impl ObservationExpr {
    /// Wrap a property-level tree in observation brackets.
    pub fn observe(child: impl Into<PropertyExpr>) -> Self {
        ObservationExpr::Observation(child.into())
    }

    pub fn and(operands: Vec<ObservationExpr>) -> Result<Self, PatternError> {
        Self::compound(ObservationOp::And, operands)
    }

    pub fn or(operands: Vec<ObservationExpr>) -> Result<Self, PatternError> {
        Self::compound(ObservationOp::Or, operands)
    }

    /// Sequential occurrence; operand order is significant and preserved.
    pub fn followed_by(operands: Vec<ObservationExpr>) -> Result<Self, PatternError> {
        Self::compound(ObservationOp::FollowedBy, operands)
    }

    pub fn compound(
        op: ObservationOp,
        operands: Vec<ObservationExpr>,
    ) -> Result<Self, PatternError> {
        if operands.len() < 2 {
            return Err(PatternError::InvalidArity {
                expr: "compound observation expression",
                min: 2,
                got: operands.len(),
            });
        }
        log::trace!("compound observation: {} over {} operands", op, operands.len());
        Ok(ObservationExpr::Compound { op, operands })
    }

    /// Attach a qualifier, consuming self. Qualifiers stack by repeated
    /// calls; the innermost renders closest to the child and order is
    /// preserved verbatim.
    pub fn qualified(self, qualifier: Qualifier) -> Self {
        ObservationExpr::Qualified {
            child: Box::new(self),
            qualifier,
        }
    }

    /// Explicit grouping; always renders its parentheses.
    pub fn paren(self) -> Self {
        ObservationExpr::Paren(Box::new(self))
    }

    /// The canonical pattern string. This is the crate's sole external
    /// artifact; collaborators embedding a pattern into an indicator record
    /// call this exactly once at assignment time.
    pub fn to_pattern_string(&self) -> String {
        self.to_string()
    }

    /// Render precedence across observation connectives:
    /// atom > AND > OR > FOLLOWEDBY, with trailing qualifiers loosest of
    /// all. A compound's child is parenthesized whenever its precedence is
    /// strictly lower than the compound's.
    fn precedence(&self) -> u8 {
        match self {
            ObservationExpr::Observation(_) | ObservationExpr::Paren(_) => 4,
            ObservationExpr::Compound {
                op: ObservationOp::And,
                ..
            } => 3,
            ObservationExpr::Compound {
                op: ObservationOp::Or,
                ..
            } => 2,
            ObservationExpr::Compound {
                op: ObservationOp::FollowedBy,
                ..
            } => 1,
            ObservationExpr::Qualified { .. } => 0,
        }
    }
}

impl Display for ObservationExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationExpr::Observation(child) => write!(f, "[{}]", child),
            ObservationExpr::Paren(inner) => write!(f, "({})", inner),
            ObservationExpr::Compound { op, operands } => {
                let parent = self.precedence();
                let sep = format!(" {} ", op.token());
                let joined = operands
                    .iter()
                    .map(|operand| {
                        if operand.precedence() < parent {
                            format!("({})", operand)
                        } else {
                            operand.to_string()
                        }
                    })
                    .join(&sep);
                f.write_str(&joined)
            }
            // A qualifier binds tighter than the compound connectives, so a
            // bare compound child must be grouped or the qualifier would
            // attach to its last operand only. Observation, Paren and
            // Qualified children render verbatim (stacked qualifiers must
            // not accumulate parentheses).
            ObservationExpr::Qualified { child, qualifier } => {
                if matches!(child.as_ref(), ObservationExpr::Compound { .. }) {
                    write!(f, "({}) {}", child, qualifier)
                } else {
                    write!(f, "{} {}", child, qualifier)
                }
            }
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ObservationExpr {
    /// A pattern serializes as its rendered string, so embedding a tree in
    /// an indicator record's `pattern` field renders it exactly once.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
