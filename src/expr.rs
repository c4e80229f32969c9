//! Property-level expressions: what goes inside one pair of observation
//! brackets.

use std::fmt::{self, Display};

use itertools::Itertools;

use crate::constant::Constant;
use crate::error::PatternError;
use crate::operator::ComparisonOp;
use crate::path::ObjectPath;

/// A leaf predicate: object path, operator, operand constant, negation flag.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonExpr {
    path: ObjectPath,
    op: ComparisonOp,
    value: Constant,
    negated: bool,
}

impl ComparisonExpr {
    pub fn new(path: ObjectPath, op: ComparisonOp, value: Constant) -> Result<Self, PatternError> {
        op.validate_operand(&value)?;
        log::trace!("comparison: {} {} {}", path, op, value);
        Ok(ComparisonExpr {
            path,
            op,
            value,
            negated: false,
        })
    }

    pub fn equal(path: ObjectPath, value: impl Into<Constant>) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::Eq, value.into())
    }

    pub fn not_equal(path: ObjectPath, value: impl Into<Constant>) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::Neq, value.into())
    }

    pub fn less_than(path: ObjectPath, value: impl Into<Constant>) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::Lt, value.into())
    }

    pub fn less_or_equal(
        path: ObjectPath,
        value: impl Into<Constant>,
    ) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::Le, value.into())
    }

    pub fn greater_than(
        path: ObjectPath,
        value: impl Into<Constant>,
    ) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::Gt, value.into())
    }

    pub fn greater_or_equal(
        path: ObjectPath,
        value: impl Into<Constant>,
    ) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::Ge, value.into())
    }

    /// Set membership; the operand must be a list constant.
    pub fn in_list(path: ObjectPath, value: Constant) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::In, value)
    }

    pub fn like(path: ObjectPath, pattern: impl Into<String>) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::Like, Constant::string(pattern))
    }

    pub fn matches(path: ObjectPath, regex: impl Into<String>) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::Matches, Constant::string(regex))
    }

    pub fn is_subset(path: ObjectPath, cidr: impl Into<String>) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::IsSubset, Constant::string(cidr))
    }

    pub fn is_superset(path: ObjectPath, cidr: impl Into<String>) -> Result<Self, PatternError> {
        Self::new(path, ComparisonOp::IsSuperset, Constant::string(cidr))
    }

    /// Flip the negation flag, consuming self (trees are never mutated in
    /// place).
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn path(&self) -> &ObjectPath {
        &self.path
    }

    pub fn op(&self) -> ComparisonOp {
        self.op
    }

    pub fn value(&self) -> &Constant {
        &self.value
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }
}

impl Display for ComparisonExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            match self.op.negated_spelling() {
                Some(flipped) => write!(f, "{} {} {}", self.path, flipped, self.value),
                None => write!(f, "{} NOT {} {}", self.path, self.op, self.value),
            }
        } else {
            write!(f, "{} {} {}", self.path, self.op, self.value)
        }
    }
}

/// Boolean connective between property-level expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    pub fn token(&self) -> &'static str {
        match self {
            BoolOp::And => "AND",
            BoolOp::Or => "OR",
        }
    }
}

impl Display for BoolOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// An expression tree valid inside one observation's brackets.
///
/// Kind constraints from the grammar are carried by the type itself: an
/// observation or compound observation can never appear here.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyExpr {
    Comparison(ComparisonExpr),
    Boolean {
        op: BoolOp,
        operands: Vec<PropertyExpr>,
    },
    Paren(Box<PropertyExpr>),
}

impl PropertyExpr {
    pub fn and(operands: Vec<PropertyExpr>) -> Result<Self, PatternError> {
        Self::boolean(BoolOp::And, operands)
    }

    pub fn or(operands: Vec<PropertyExpr>) -> Result<Self, PatternError> {
        Self::boolean(BoolOp::Or, operands)
    }

    pub fn boolean(op: BoolOp, operands: Vec<PropertyExpr>) -> Result<Self, PatternError> {
        if operands.len() < 2 {
            return Err(PatternError::InvalidArity {
                expr: "boolean expression",
                min: 2,
                got: operands.len(),
            });
        }
        Ok(PropertyExpr::Boolean { op, operands })
    }

    /// Explicit grouping; always renders its parentheses.
    pub fn paren(expr: PropertyExpr) -> Self {
        PropertyExpr::Paren(Box::new(expr))
    }

    /// Render precedence: comparisons bind tightest, AND binds tighter than
    /// OR. A child is parenthesized by the renderer whenever its precedence
    /// is strictly lower than its parent's.
    fn precedence(&self) -> u8 {
        match self {
            PropertyExpr::Comparison(_) | PropertyExpr::Paren(_) => 3,
            PropertyExpr::Boolean { op: BoolOp::And, .. } => 2,
            PropertyExpr::Boolean { op: BoolOp::Or, .. } => 1,
        }
    }
}

impl From<ComparisonExpr> for PropertyExpr {
    fn from(c: ComparisonExpr) -> Self {
        PropertyExpr::Comparison(c)
    }
}

impl Display for PropertyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyExpr::Comparison(c) => write!(f, "{}", c),
            PropertyExpr::Paren(inner) => write!(f, "({})", inner),
            PropertyExpr::Boolean { op, operands } => {
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
        }
    }
}
