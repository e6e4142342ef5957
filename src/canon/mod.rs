//! Canonical byte encoding of primitive values.
//!
//! This is the one and only encoding fed into leaf hashes, and it is part
//! of the wire contract: every implementation, in every language, must
//! produce these exact bytes or roots stop agreeing.
//!
//! The encoding is JSON-shaped:
//!
//! * `String`: double-quoted with standard JSON escaping.
//! * `Boolean`: `true` / `false`.
//! * `Integer`, `Long`: decimal digits, optional leading `-`.
//! * `Double`: shortest decimal form that round-trips the IEEE-754 value.
//!   Non-finite doubles have no JSON form and are rejected.
//! * `DateTime`: ISO-8601 in UTC with `Z` offset and exactly millisecond
//!   precision, double-quoted. Instants are converted to UTC first, so
//!   equal instants in different offsets canonicalise identically.
//!
//! All output is UTF-8.

use core::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::record::Value;
use crate::schema::PrimitiveType;

/// Result alias for canonicalisation.
pub type CanonResult<T> = core::result::Result<T, CanonError>;

/// Errors raised while canonicalising a value for its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanonError {
    /// The runtime value's shape disagrees with the declared primitive
    /// type.
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// A `Double` was NaN or infinite; JSON has no encoding for these.
    NonFiniteDouble,
}

impl fmt::Display for CanonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CanonError::WrongType { expected, found } => {
                write!(f, "expected {expected} value, found {found}")
            }
            CanonError::NonFiniteDouble => {
                write!(f, "non-finite Double has no canonical encoding")
            }
        }
    }
}

impl std::error::Error for CanonError {}

impl CanonError {
    /// The runtime shape that triggered the error, for diagnostics.
    pub fn found(&self) -> &'static str {
        match self {
            CanonError::WrongType { found, .. } => found,
            CanonError::NonFiniteDouble => "non-finite Double",
        }
    }
}

/// Canonicalises `value` for its declared primitive type.
///
/// # Errors
///
/// `WrongType` when the value's runtime shape is not the declared one,
/// `NonFiniteDouble` for NaN or infinities.
pub fn canonical_bytes(ty: PrimitiveType, value: &Value) -> CanonResult<Vec<u8>> {
    let text = match (ty, value) {
        (PrimitiveType::String, Value::String(s)) => escape_json(s),
        (PrimitiveType::Boolean, Value::Boolean(b)) => {
            if *b {
                "true".to_owned()
            } else {
                "false".to_owned()
            }
        }
        (PrimitiveType::Integer, Value::Integer(n)) => n.to_string(),
        (PrimitiveType::Long, Value::Long(n)) => n.to_string(),
        (PrimitiveType::Double, Value::Double(x)) => {
            if !x.is_finite() {
                return Err(CanonError::NonFiniteDouble);
            }
            // ryu via serde_json: the shortest representation that parses
            // back to the same bits.
            serde_json::to_string(x).map_err(|_| CanonError::NonFiniteDouble)?
        }
        (PrimitiveType::DateTime, Value::DateTime(dt)) => format!("\"{}\"", format_datetime(dt)),
        (expected, found) => {
            return Err(CanonError::WrongType {
                expected: expected.name(),
                found: found.kind(),
            })
        }
    };
    Ok(text.into_bytes())
}

/// Fixed DateTime form: ISO-8601, UTC, `Z` offset, millisecond precision.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn escape_json(s: &str) -> String {
    // serde_json's string writer is the escaping authority.
    serde_json::to_string(s).expect("UTF-8 string serialisation is infallible")
}
