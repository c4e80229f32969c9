//! Object paths: the left-hand side of a comparison.
//!
//! A path names an object type and a sequence of property segments, e.g.
//! `file:extensions.windows-pebinary-ext.sections[*].entropy`.

use std::fmt::{self, Display};

use crate::constant::{quote, HashAlgorithm};
use crate::error::PatternError;

/// One step into the property graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathComponent {
    /// A property name, dot-joined to its predecessor.
    Property(String),
    /// A list index, appended as `[n]` with no separator.
    Index(u64),
    /// A list wildcard, appended as `[*]`.
    Wildcard,
}

/// A dotted/indexed path into an object's property graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    object_type: String,
    components: Vec<PathComponent>,
}

impl ObjectPath {
    /// Build a path from an object type and segment strings.
    ///
    /// Segment strings may carry trailing index suffixes (`sections[*]`,
    /// `values[0]`), which are split into the corresponding components.
    pub fn new<I, S>(object_type: impl Into<String>, segments: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let object_type = object_type.into();
        validate_object_type(&object_type)?;

        let mut components = Vec::new();
        for segment in segments {
            parse_segment(segment.as_ref(), &mut components)?;
        }
        if components.is_empty() {
            return Err(PatternError::invalid_path("no path segments"));
        }
        Ok(ObjectPath {
            object_type,
            components,
        })
    }

    /// Build a path from pre-constructed components.
    pub fn from_components(
        object_type: impl Into<String>,
        components: Vec<PathComponent>,
    ) -> Result<Self, PatternError> {
        let object_type = object_type.into();
        validate_object_type(&object_type)?;
        if components.is_empty() {
            return Err(PatternError::invalid_path("no path segments"));
        }
        Ok(ObjectPath {
            object_type,
            components,
        })
    }

    /// The `<type>:hashes.'<ALGO>'` path used with hash constants, quoted
    /// according to the algorithm's canonical casing.
    pub fn hash(
        object_type: impl Into<String>,
        algorithm: HashAlgorithm,
    ) -> Result<Self, PatternError> {
        Self::from_components(
            object_type,
            vec![
                PathComponent::Property("hashes".to_string()),
                PathComponent::Property(algorithm.as_str().to_string()),
            ],
        )
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn components(&self) -> &[PathComponent] {
        &self.components
    }
}

/// STIX object-type identifiers: lowercase, digits and hyphens, starting
/// with a letter.
fn validate_object_type(object_type: &str) -> Result<(), PatternError> {
    let mut chars = object_type.chars();
    let valid = match chars.next() {
        Some(first) => {
            first.is_ascii_lowercase()
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(PatternError::invalid_path(format!(
            "invalid object type: {:?}",
            object_type
        )))
    }
}

/// Split `name[idx]...` into a property component plus index components.
fn parse_segment(segment: &str, out: &mut Vec<PathComponent>) -> Result<(), PatternError> {
    let (name, mut rest) = match segment.find('[') {
        Some(pos) => (&segment[..pos], &segment[pos..]),
        None => (segment, ""),
    };

    if name.is_empty() && rest.is_empty() {
        return Err(PatternError::invalid_path("empty path segment"));
    }
    if !name.is_empty() {
        out.push(PathComponent::Property(name.to_string()));
    } else if out.is_empty() {
        // A bare index has nothing to attach to
        return Err(PatternError::invalid_path(format!(
            "index segment {:?} has no preceding property",
            segment
        )));
    }

    while !rest.is_empty() {
        let close = rest.find(']').ok_or_else(|| {
            PatternError::invalid_path(format!("unterminated index in segment {:?}", segment))
        })?;
        let inner = &rest[1..close];
        if inner == "*" {
            out.push(PathComponent::Wildcard);
        } else {
            let idx: u64 = inner.parse().map_err(|_| {
                PatternError::invalid_path(format!("malformed index [{}] in segment {:?}", inner, segment))
            })?;
            out.push(PathComponent::Index(idx));
        }
        rest = &rest[close + 1..];
        if !rest.is_empty() && !rest.starts_with('[') {
            return Err(PatternError::invalid_path(format!(
                "trailing text after index in segment {:?}",
                segment
            )));
        }
    }
    Ok(())
}

/// Property segments render bare when they fit the grammar's identifier
/// shape; anything else (uppercase, dots, quotes) renders single-quoted with
/// the string-constant escaping table.
fn is_bare_segment(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_')
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        }
        None => false,
    }
}

impl Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.object_type)?;
        let mut first = true;
        for component in &self.components {
            match component {
                PathComponent::Property(name) => {
                    if !first {
                        f.write_str(".")?;
                    }
                    if is_bare_segment(name) {
                        f.write_str(name)?;
                    } else {
                        f.write_str(&quote(name))?;
                    }
                }
                PathComponent::Index(i) => write!(f, "[{}]", i)?,
                PathComponent::Wildcard => f.write_str("[*]")?,
            }
            first = false;
        }
        Ok(())
    }
}
