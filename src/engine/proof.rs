//! Proof engine: discloses one primitive leaf plus the sibling digests of
//! every enclosing level.

use serde::{Deserialize, Serialize};

use crate::canon;
use crate::hash::Digest;
use crate::record::{Record, SaltBytes, Value};
use crate::schema::{PropertyKind, SchemaRegistry};
use crate::{EngineError, EngineResult};

use super::{
    expect_nested, lookup_class, map_canon, missing_value, not_implemented, root, PropertyPath,
};

/// Sibling digests of one level, split at the disclosed subtree: `before`
/// holds the digests of siblings declared before it, `after` those
/// declared after, both in declaration order, hex-encoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingHashes {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

/// Disclosure of a single primitive leaf.
///
/// `hashes` is ordered leaf-first: the first entry describes the leaf's
/// immediate siblings, the last entry the top-level siblings. Together
/// with `value` and `salt` it is sufficient to recompute the root and
/// nothing else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Proof {
    /// The disclosed leaf value, preserved as-is.
    pub value: Value,
    /// The leaf's 32-byte salt, lowercase hex.
    pub salt: String,
    /// One `(before, after)` pair per level, leaf-first.
    pub hashes: Vec<SiblingHashes>,
}

/// Per-child result of the raw proof walk. Exactly one non-digest entry
/// exists per level on the path to the disclosed leaf.
enum RawNode {
    Digest(Digest),
    Disclosure { value: Value, salt: SaltBytes },
    Nested(Vec<RawNode>),
}

/// Builds the disclosure proof for the leaf addressed by `path`.
pub fn build_proof<S: AsRef<str>>(
    registry: &SchemaRegistry,
    record: &Record,
    path: &[S],
) -> EngineResult<Proof> {
    let target: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
    if target.is_empty() {
        return Err(EngineError::PathInvalid {
            path: PropertyPath::new(),
            reason: "path is empty",
        });
    }
    let mut current = PropertyPath::new();
    let raw = prove_class(registry, record, &target, &mut current)?;
    flatten(raw, &target)
}

fn prove_class(
    registry: &SchemaRegistry,
    record: &Record,
    target: &[&str],
    current: &mut PropertyPath,
) -> EngineResult<Vec<RawNode>> {
    let class = lookup_class(registry, record.class_name())?;
    let mut nodes = Vec::with_capacity(class.properties().len());
    for property in class.properties() {
        current.push(property.name());
        let node = match property.kind() {
            PropertyKind::Primitive(ty) => {
                if current.matches(target) {
                    let value = record
                        .value(property.name())
                        .ok_or_else(|| missing_value(current, ty.name()))?;
                    canon::canonical_bytes(*ty, value)
                        .map_err(|err| map_canon(current, *ty, err))?;
                    let salt = record.salt(property.name()).ok_or_else(|| {
                        EngineError::SaltMissing {
                            path: current.clone(),
                        }
                    })?;
                    RawNode::Disclosure {
                        value: value.clone(),
                        salt: *salt,
                    }
                } else {
                    RawNode::Digest(root::leaf_digest(record, property.name(), *ty, current)?)
                }
            }
            PropertyKind::NestedClass(_) => {
                let child = expect_nested(current, record, property.name())?;
                if current.is_proper_prefix_of(target) {
                    RawNode::Nested(prove_class(registry, child, target, current)?)
                } else {
                    RawNode::Digest(root::class_digest(registry, child, current)?)
                }
            }
            PropertyKind::Array => return Err(not_implemented(current, "array")),
            PropertyKind::Enum => return Err(not_implemented(current, "enum")),
            PropertyKind::Relationship => return Err(not_implemented(current, "relationship")),
        };
        current.pop();
        nodes.push(node);
    }
    Ok(nodes)
}

/// Splits each raw level at its single non-digest entry and descends into
/// it, collecting levels top-down; the final sequence is reversed into the
/// public leaf-first order.
fn flatten(mut level: Vec<RawNode>, target: &[&str]) -> EngineResult<Proof> {
    let mut levels: Vec<SiblingHashes> = Vec::new();
    loop {
        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut disclosure: Option<(Value, SaltBytes)> = None;
        let mut nested: Option<Vec<RawNode>> = None;
        let mut focus_seen = false;
        for node in level {
            match node {
                RawNode::Digest(digest) => {
                    if focus_seen {
                        after.push(digest.to_hex());
                    } else {
                        before.push(digest.to_hex());
                    }
                }
                RawNode::Disclosure { value, salt } => {
                    focus_seen = true;
                    disclosure = Some((value, salt));
                }
                RawNode::Nested(children) => {
                    focus_seen = true;
                    nested = Some(children);
                }
            }
        }
        if !focus_seen {
            return Err(EngineError::PathInvalid {
                path: PropertyPath::from_segments(
                    target.iter().map(|s| (*s).to_owned()).collect(),
                ),
                reason: "path does not address a primitive leaf",
            });
        }
        levels.push(SiblingHashes { before, after });
        if let Some((value, salt)) = disclosure {
            levels.reverse();
            return Ok(Proof {
                value,
                salt: hex::encode(salt),
                hashes: levels,
            });
        }
        level = nested.expect("focused entry is a disclosure or a nested level");
    }
}
