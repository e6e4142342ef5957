#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

//! Selective-disclosure Merkle engine for schema-typed records.
//!
//! The crate commits to a typed record with a per-field salted Merkle tree
//! and can disclose a single primitive field without revealing the others:
//!
//! 1. [`salt`] draws a fresh 32-byte salt for every primitive leaf of a
//!    record and stores it in the owning record's salt store.
//! 2. [`root`] computes the Merkle commitment over the record's canonical
//!    field encodings and salts, returned as 64 lowercase hex characters.
//! 3. [`proof`] discloses one primitive leaf: its value, its salt, and the
//!    sibling digests of every enclosing level.
//! 4. [`verify`] recomputes the root from a proof and the schema shape
//!    alone and compares it against an expected commitment.
//!
//! The hash contract is fixed: leaves are
//! `SHA256(canonical(value) || salt)`, interior nodes are the SHA-256 of
//! their children's digests concatenated in property declaration order with
//! no separators. Canonical encodings are defined in [`canon`]. Changing any
//! of these breaks every existing root.
//!
//! Schema declarations are supplied through [`schema::SchemaRegistry`];
//! records through [`record::Record`]. Arrays, enums, and relationships are
//! reserved constructs: the engines refuse them with
//! [`EngineError::NotImplemented`] rather than guessing a hash form.

use core::fmt;

pub mod canon;
pub mod engine;
pub mod hash;
pub mod record;
pub mod schema;

use engine::PropertyPath;
use schema::SchemaRegistry;
use tracing::debug;

pub use engine::{Proof, SiblingHashes};
pub use hash::Digest;
pub use record::{Record, Value};

/// Result type used throughout the engine.
pub type EngineResult<T> = core::result::Result<T, EngineError>;

/// Errors surfaced by the salt, root, proof, and verify engines.
///
/// Every walk-time variant carries the schema path at which the walk
/// stopped; proofs over deep records are undebuggable without it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The walk reached an array, enum, or relationship property. These
    /// constructs are reserved; hashing them is deliberately undefined.
    NotImplemented {
        path: PropertyPath,
        construct: &'static str,
    },
    /// A primitive leaf had no salt in its record's salt store.
    SaltMissing { path: PropertyPath },
    /// The record's in-memory value does not match the declared property.
    TypeMismatch {
        path: PropertyPath,
        expected: &'static str,
        found: &'static str,
    },
    /// The requested path does not resolve to a primitive leaf.
    PathInvalid {
        path: PropertyPath,
        reason: &'static str,
    },
    /// The operating-system randomness source failed.
    RandomnessUnavailable,
    /// The verifier received a structurally undecodable proof.
    MalformedProof { reason: &'static str },
    /// A class name could not be resolved by the schema registry.
    UnknownClass { name: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NotImplemented { path, construct } => {
                write!(f, "{construct} properties are not implemented (at {path})")
            }
            EngineError::SaltMissing { path } => {
                write!(f, "no salt generated for primitive leaf {path}")
            }
            EngineError::TypeMismatch {
                path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "type mismatch at {path}: expected {expected}, found {found}"
                )
            }
            EngineError::PathInvalid { path, reason } => {
                write!(f, "invalid disclosure path {path}: {reason}")
            }
            EngineError::RandomnessUnavailable => {
                write!(f, "operating-system randomness source unavailable")
            }
            EngineError::MalformedProof { reason } => {
                write!(f, "malformed proof: {reason}")
            }
            EngineError::UnknownClass { name } => {
                write!(f, "class {name} is not declared in the schema registry")
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Populates a fresh 32-byte random salt for every primitive leaf of
/// `record`, walking nested records recursively. Salts land in the salt
/// store of the record that owns the leaf.
///
/// Calling this twice replaces every salt, producing a new commitment.
/// On error the record may hold a partial salt store and must be
/// discarded; partial stores are never observable on success.
///
/// # Errors
///
/// `NotImplemented` for reserved constructs, `TypeMismatch` when a value
/// disagrees with its declaration, `RandomnessUnavailable` when the OS
/// randomness source fails, `UnknownClass` for an unresolvable class name.
pub fn salt(registry: &SchemaRegistry, record: &mut Record) -> EngineResult<()> {
    debug!(class = record.class_name(), "salting record");
    engine::salt::salt_record(registry, record)
}

/// Computes the Merkle root of a salted record, hex-encoded.
///
/// Pure: reads values and salts, mutates nothing. Two calls on the same
/// record return identical bytes.
///
/// # Errors
///
/// `SaltMissing` when a primitive leaf was never salted, plus the walk
/// errors documented on [`salt`].
pub fn root(registry: &SchemaRegistry, record: &Record) -> EngineResult<String> {
    root_digest(registry, record).map(|digest| digest.to_hex())
}

/// Computes the Merkle root of a salted record as a raw 32-byte digest.
pub fn root_digest(registry: &SchemaRegistry, record: &Record) -> EngineResult<Digest> {
    debug!(class = record.class_name(), "computing record root");
    engine::root::root_digest(registry, record)
}

/// Builds a disclosure proof for the primitive leaf addressed by `path`.
///
/// The proof carries the leaf value, its salt (hex), and one
/// `(before, after)` sibling-digest pair per level, ordered leaf-first.
/// Salts must already be populated.
///
/// # Errors
///
/// `PathInvalid` when the path does not resolve to a primitive leaf,
/// `NotImplemented` when the schema contains a reserved construct,
/// `SaltMissing` for any unsalted hashed leaf.
pub fn proof<S: AsRef<str>>(
    registry: &SchemaRegistry,
    record: &Record,
    path: &[S],
) -> EngineResult<Proof> {
    debug!(
        class = record.class_name(),
        depth = path.len(),
        "building disclosure proof"
    );
    engine::proof::build_proof(registry, record, path)
}

/// Checks a disclosure proof against an expected root.
///
/// Walks the declaration of `class_name` without any record, recomputes
/// the leaf hash from the disclosed value and salt, folds the proof's
/// sibling digests upward, and compares the result against
/// `expected_root`. Any cryptographic or structural mismatch returns
/// `Ok(false)`.
///
/// # Errors
///
/// `MalformedProof` when the proof or expected root cannot be decoded
/// (non-hex digests, wrong-sized salt), `UnknownClass` when the schema
/// registry cannot resolve a class on the walk.
pub fn verify<S: AsRef<str>>(
    registry: &SchemaRegistry,
    class_name: &str,
    path: &[S],
    expected_root: &str,
    proof: &Proof,
) -> EngineResult<bool> {
    debug!(class = class_name, depth = path.len(), "verifying proof");
    engine::verify::verify_proof(registry, class_name, path, expected_root, proof)
}
