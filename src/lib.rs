//! Build STIX Patterning Language detection patterns from typed expression
//! trees.
//!
//! Callers compose an immutable tree bottom-up (comparisons over object
//! paths, boolean combinations, observation brackets, temporal qualifiers)
//! and render it into the canonical pattern string for an indicator's
//! `pattern` field. All validation happens at construction time; rendering
//! never fails.
//!
//! ```
//! use stix_pattern::{ComparisonExpr, ObjectPath, ObservationExpr, Qualifier};
//!
//! let path = ObjectPath::new("domain-name", ["value"])?;
//! let pattern = ObservationExpr::observe(ComparisonExpr::equal(path, "site.of.interest.zaz")?)
//!     .qualified(Qualifier::within(300)?);
//! assert_eq!(
//!     pattern.to_pattern_string(),
//!     "[domain-name:value = 'site.of.interest.zaz'] WITHIN 300 SECONDS"
//! );
//! # Ok::<(), stix_pattern::PatternError>(())
//! ```
//!
//! Precedence is always preserved in output: an OR subtree used as an AND
//! operand is parenthesized automatically, whether or not the caller wrapped
//! it explicitly.

pub mod constant;
pub mod error;
pub mod expr;
pub mod observation;
pub mod operator;
pub mod path;

pub use constant::{Constant, HashAlgorithm, Timestamp};
pub use error::PatternError;
pub use expr::{BoolOp, ComparisonExpr, PropertyExpr};
pub use observation::{ObservationExpr, ObservationOp, Qualifier};
pub use operator::ComparisonOp;
pub use path::{ObjectPath, PathComponent};
