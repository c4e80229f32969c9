//! Typed constants and their canonical grammar encodings.
//!
//! Each constant kind has exactly one textual form. Validation happens in the
//! constructors; `Display` is total once a value exists.

use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use itertools::Itertools;

use crate::error::PatternError;

/// Single-quote a string, backslash-escaping `\` and `'`.
///
/// Shared between string constants and quoted object-path segments.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Hash algorithms from the STIX 2.1 `hash-algorithm-ov` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    Sha256,
    Sha512,
    Sha3_256,
    Sha3_512,
    Ssdeep,
    Tlsh,
}

impl HashAlgorithm {
    /// Canonical spelling used in rendered paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA-1",
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha512 => "SHA-512",
            HashAlgorithm::Sha3_256 => "SHA3-256",
            HashAlgorithm::Sha3_512 => "SHA3-512",
            HashAlgorithm::Ssdeep => "SSDEEP",
            HashAlgorithm::Tlsh => "TLSH",
        }
    }

    fn digest_is_valid(&self, digest: &str) -> bool {
        fn is_hex(s: &str, len: usize) -> bool {
            s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit())
        }
        match self {
            HashAlgorithm::Md5 => is_hex(digest, 32),
            HashAlgorithm::Sha1 => is_hex(digest, 40),
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 => is_hex(digest, 64),
            HashAlgorithm::Sha512 | HashAlgorithm::Sha3_512 => is_hex(digest, 128),
            // Optional "T1" version prefix, then 70 hex digits
            HashAlgorithm::Tlsh => {
                let body = digest.strip_prefix("T1").unwrap_or(digest);
                is_hex(body, 70)
            }
            // chunk-size:block:block
            HashAlgorithm::Ssdeep => {
                let mut parts = digest.split(':');
                match (parts.next(), parts.next(), parts.next(), parts.next()) {
                    (Some(size), Some(a), Some(b), None) => {
                        !size.is_empty()
                            && size.chars().all(|c| c.is_ascii_digit())
                            && !a.is_empty()
                            && !b.is_empty()
                    }
                    _ => false,
                }
            }
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = PatternError;

    /// Case- and separator-insensitive: `sha256`, `SHA-256` and `Sha_256`
    /// all resolve to `SHA-256`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha1" => Ok(HashAlgorithm::Sha1),
            "sha256" => Ok(HashAlgorithm::Sha256),
            "sha512" => Ok(HashAlgorithm::Sha512),
            "sha3256" => Ok(HashAlgorithm::Sha3_256),
            "sha3512" => Ok(HashAlgorithm::Sha3_512),
            "ssdeep" => Ok(HashAlgorithm::Ssdeep),
            "tlsh" => Ok(HashAlgorithm::Tlsh),
            _ => Err(PatternError::invalid_constant(format!(
                "unsupported hash algorithm: {}",
                s
            ))),
        }
    }
}

impl Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A UTC instant rendered in the grammar's timestamp form:
/// `YYYY-MM-DDThh:mm:ss[.subsec]Z`, subsecond digits only when nonzero and
/// with trailing zeros trimmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(instant: DateTime<Utc>) -> Self {
        Timestamp(instant)
    }

    /// Parse an RFC 3339 timestamp, converting to UTC.
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Timestamp(dt.with_timezone(&Utc)))
            .map_err(|e| PatternError::invalid_constant(format!("malformed timestamp {}: {}", s, e)))
    }

    pub fn instant(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Timestamp(instant)
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Leap-second representation can push nanos past 1e9
        let nanos = self.0.nanosecond() % 1_000_000_000;
        if nanos == 0 {
            write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
        } else {
            let subsec = format!("{:09}", nanos);
            write!(
                f,
                "{}.{}Z",
                self.0.format("%Y-%m-%dT%H:%M:%S"),
                subsec.trim_end_matches('0')
            )
        }
    }
}

/// A typed literal value with a canonical textual encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Hash(HashAlgorithm, String),
    Timestamp(Timestamp),
    /// Base64 payload, rendered as `b'...'`.
    Binary(String),
    /// Hex payload, rendered as `h'...'`.
    Hex(String),
    List(Vec<Constant>),
}

impl Constant {
    pub fn string(s: impl Into<String>) -> Self {
        Constant::String(s.into())
    }

    pub fn integer(v: i64) -> Self {
        Constant::Integer(v)
    }

    /// Floats must be finite; NaN and infinities have no grammar encoding.
    pub fn float(v: f64) -> Result<Self, PatternError> {
        if v.is_finite() {
            Ok(Constant::Float(v))
        } else {
            Err(PatternError::invalid_constant(format!(
                "non-finite float: {}",
                v
            )))
        }
    }

    pub fn boolean(v: bool) -> Self {
        Constant::Boolean(v)
    }

    /// A hash digest validated against its algorithm's shape.
    pub fn hash(algorithm: HashAlgorithm, digest: impl Into<String>) -> Result<Self, PatternError> {
        let digest = digest.into();
        if algorithm.digest_is_valid(&digest) {
            Ok(Constant::Hash(algorithm, digest))
        } else {
            Err(PatternError::invalid_constant(format!(
                "{} is not a valid {} digest",
                digest, algorithm
            )))
        }
    }

    pub fn timestamp(ts: impl Into<Timestamp>) -> Self {
        Constant::Timestamp(ts.into())
    }

    /// Parse an RFC 3339 string into a timestamp constant.
    pub fn timestamp_str(s: &str) -> Result<Self, PatternError> {
        Ok(Constant::Timestamp(Timestamp::parse(s)?))
    }

    /// A base64-encoded binary literal (`b'...'`).
    pub fn binary(base64: impl Into<String>) -> Result<Self, PatternError> {
        let base64 = base64.into();
        if is_base64(&base64) {
            Ok(Constant::Binary(base64))
        } else {
            Err(PatternError::invalid_constant(format!(
                "not a base64 payload: {}",
                base64
            )))
        }
    }

    /// A hex-encoded binary literal (`h'...'`).
    pub fn hex(hex: impl Into<String>) -> Result<Self, PatternError> {
        let hex = hex.into();
        if !hex.is_empty() && hex.len() % 2 == 0 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Constant::Hex(hex))
        } else {
            Err(PatternError::invalid_constant(format!(
                "not a hex payload: {}",
                hex
            )))
        }
    }

    pub fn list(elements: Vec<Constant>) -> Result<Self, PatternError> {
        if elements.is_empty() {
            return Err(PatternError::InvalidArity {
                expr: "list constant",
                min: 1,
                got: 0,
            });
        }
        Ok(Constant::List(elements))
    }

    /// Kind name used in operand-mismatch errors.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Constant::String(_) => "string",
            Constant::Integer(_) => "integer",
            Constant::Float(_) => "float",
            Constant::Boolean(_) => "boolean",
            Constant::Hash(..) => "hash",
            Constant::Timestamp(_) => "timestamp",
            Constant::Binary(_) => "binary",
            Constant::Hex(_) => "hex",
            Constant::List(_) => "list",
        }
    }
}

fn is_base64(s: &str) -> bool {
    if s.is_empty() || s.len() % 4 != 0 {
        return false;
    }
    let padding = s.chars().rev().take_while(|c| *c == '=').count();
    if padding > 2 {
        return false;
    }
    s[..s.len() - padding]
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/')
}

/// Canonical float form: always carries a fractional part or exponent so it
/// cannot be read back as an integer literal.
fn format_float(v: f64) -> String {
    let s = v.to_string();
    if s.contains('.') || s.contains('e') || s.contains('E') {
        s
    } else {
        format!("{}.0", s)
    }
}

impl Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::String(s) => f.write_str(&quote(s)),
            Constant::Integer(v) => write!(f, "{}", v),
            Constant::Float(v) => f.write_str(&format_float(*v)),
            Constant::Boolean(v) => f.write_str(if *v { "true" } else { "false" }),
            Constant::Hash(_, digest) => f.write_str(&quote(digest)),
            Constant::Timestamp(ts) => write!(f, "t'{}'", ts),
            Constant::Binary(b) => write!(f, "b'{}'", b),
            Constant::Hex(h) => write!(f, "h'{}'", h),
            Constant::List(elements) => {
                write!(f, "({})", elements.iter().map(|e| e.to_string()).join(", "))
            }
        }
    }
}

impl From<&str> for Constant {
    fn from(s: &str) -> Self {
        Constant::String(s.to_string())
    }
}

impl From<String> for Constant {
    fn from(s: String) -> Self {
        Constant::String(s)
    }
}

impl From<i64> for Constant {
    fn from(v: i64) -> Self {
        Constant::Integer(v)
    }
}

impl From<bool> for Constant {
    fn from(v: bool) -> Self {
        Constant::Boolean(v)
    }
}

impl From<Timestamp> for Constant {
    fn from(ts: Timestamp) -> Self {
        Constant::Timestamp(ts)
    }
}
