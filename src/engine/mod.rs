//! The four traversal engines: salt, root, proof, verify.
//!
//! All four share one walk shape: resolve the class declaration, visit its
//! own properties in declaration order, `match` on the property kind, and
//! recurse into nested classes. They differ only in what they emit per
//! node. State threads through function arguments; the only cross-cutting
//! piece is the explicit [`PropertyPath`], pushed before and popped after
//! every property visit so that errors can name the exact schema location
//! of a failure.
//!
//! Salt takes the record by `&mut` and is the only mutating engine. Root
//! and proof take shared references. Verify never sees a record: it walks
//! the declaration shape alone.

use core::fmt;

use crate::canon::CanonError;
use crate::record::{Record, Value};
use crate::schema::{ClassDecl, PrimitiveType, SchemaRegistry};
use crate::{EngineError, EngineResult};

pub mod proof;
pub mod root;
pub mod salt;
pub mod verify;

pub use proof::{Proof, SiblingHashes};

/// Ordered property names from the root class down to the current walk
/// position. Doubles as the user-facing address of a primitive leaf.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PropertyPath(Vec<String>);

impl PropertyPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }

    /// True when the walk position addresses exactly `target`.
    pub(crate) fn matches(&self, target: &[&str]) -> bool {
        self.0.len() == target.len()
            && self.0.iter().zip(target).all(|(a, b)| a.as_str() == *b)
    }

    /// True when `target` continues strictly below the walk position.
    pub(crate) fn is_proper_prefix_of(&self, target: &[&str]) -> bool {
        self.0.len() < target.len()
            && self.0.iter().zip(target).all(|(a, b)| a.as_str() == *b)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        for (index, segment) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, ".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

pub(crate) fn lookup_class<'a>(
    registry: &'a SchemaRegistry,
    name: &str,
) -> EngineResult<&'a ClassDecl> {
    registry.class(name).ok_or_else(|| EngineError::UnknownClass {
        name: name.to_owned(),
    })
}

pub(crate) fn not_implemented(path: &PropertyPath, construct: &'static str) -> EngineError {
    EngineError::NotImplemented {
        path: path.clone(),
        construct,
    }
}

pub(crate) fn missing_value(path: &PropertyPath, expected: &'static str) -> EngineError {
    EngineError::TypeMismatch {
        path: path.clone(),
        expected,
        found: "missing value",
    }
}

pub(crate) fn map_canon(path: &PropertyPath, ty: PrimitiveType, err: CanonError) -> EngineError {
    EngineError::TypeMismatch {
        path: path.clone(),
        expected: ty.name(),
        found: err.found(),
    }
}

/// Resolves a value that must hold a nested record.
pub(crate) fn expect_nested<'a>(
    path: &PropertyPath,
    record: &'a Record,
    name: &str,
) -> EngineResult<&'a Record> {
    let value = record
        .value(name)
        .ok_or_else(|| missing_value(path, "nested class"))?;
    match value {
        Value::Record(child) => Ok(child),
        other => Err(EngineError::TypeMismatch {
            path: path.clone(),
            expected: "nested class",
            found: other.kind(),
        }),
    }
}
