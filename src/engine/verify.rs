//! Verify engine: recomputes a root from a proof and the schema shape
//! alone.
//!
//! The verifier holds no record. It walks the class declaration, finds the
//! property the requested path addresses, recomputes the leaf hash from
//! the disclosed value and salt, and folds the proof's sibling digests
//! upward level by level. Every cryptographic or structural disagreement
//! is an `Ok(false)` verdict; only undecodable inputs (non-hex digests, a
//! wrong-sized salt, a bad expected root) are reported as
//! [`EngineError::MalformedProof`].

use crate::canon;
use crate::hash::{leaf_hash, node_hash, Digest, DigestParseError};
use crate::record::{SaltBytes, SALT_LEN};
use crate::schema::{PropertyKind, SchemaRegistry};
use crate::{EngineError, EngineResult};

use super::{lookup_class, PropertyPath, Proof, SiblingHashes};

/// One decoded `(before, after)` level.
struct DecodedLevel {
    before: Vec<Digest>,
    after: Vec<Digest>,
}

/// Result of one class-node visit during the verify walk.
enum Outcome {
    /// The proof is definitively invalid for this schema and path.
    Reject,
    /// The path does not enter this subtree; its digest is supplied by the
    /// enclosing level's `before`/`after` lists.
    NoMatch,
    /// The path enters this subtree and this digest was recomputed.
    Matched(Digest),
}

/// Checks `proof` for `path` under `class_name` against `expected_root`.
pub fn verify_proof<S: AsRef<str>>(
    registry: &SchemaRegistry,
    class_name: &str,
    path: &[S],
    expected_root: &str,
    proof: &Proof,
) -> EngineResult<bool> {
    let target: Vec<&str> = path.iter().map(AsRef::as_ref).collect();

    let expected = Digest::from_hex(expected_root).map_err(|_| EngineError::MalformedProof {
        reason: "expected root is not a 64-character hex digest",
    })?;
    let salt = decode_salt(&proof.salt)?;
    let levels = match decode_levels(&proof.hashes)? {
        Some(levels) => levels,
        None => return Ok(false),
    };

    let mut current = PropertyPath::new();
    let mut level_iter = levels.iter();
    let outcome = verify_class(
        registry,
        class_name,
        &target,
        &mut current,
        proof,
        &salt,
        &mut level_iter,
    )?;
    match outcome {
        Outcome::Matched(digest) => Ok(level_iter.next().is_none() && digest == expected),
        Outcome::NoMatch | Outcome::Reject => Ok(false),
    }
}

fn verify_class(
    registry: &SchemaRegistry,
    class_name: &str,
    target: &[&str],
    current: &mut PropertyPath,
    proof: &Proof,
    salt: &SaltBytes,
    levels: &mut std::slice::Iter<'_, DecodedLevel>,
) -> EngineResult<Outcome> {
    let class = lookup_class(registry, class_name)?;
    let mut matched: Option<(usize, Digest)> = None;
    for (index, property) in class.properties().iter().enumerate() {
        current.push(property.name());
        let child = match property.kind() {
            PropertyKind::Primitive(ty) => {
                if current.matches(target) {
                    // The disclosed value must canonicalise for the
                    // declared leaf type.
                    match canon::canonical_bytes(*ty, &proof.value) {
                        Ok(canonical) => Some(leaf_hash(&canonical, salt)),
                        Err(_) => {
                            current.pop();
                            return Ok(Outcome::Reject);
                        }
                    }
                } else {
                    None
                }
            }
            PropertyKind::NestedClass(nested_class) => {
                if current.is_proper_prefix_of(target) {
                    match verify_class(
                        registry,
                        nested_class,
                        target,
                        current,
                        proof,
                        salt,
                        levels,
                    )? {
                        Outcome::Reject => {
                            current.pop();
                            return Ok(Outcome::Reject);
                        }
                        Outcome::NoMatch => None,
                        Outcome::Matched(digest) => Some(digest),
                    }
                } else {
                    None
                }
            }
            PropertyKind::Array | PropertyKind::Enum | PropertyKind::Relationship => {
                if current.matches(target) || current.is_proper_prefix_of(target) {
                    current.pop();
                    return Ok(Outcome::Reject);
                }
                None
            }
        };
        current.pop();
        if let Some(digest) = child {
            matched = Some((index, digest));
        }
    }

    let Some((index, digest)) = matched else {
        return Ok(Outcome::NoMatch);
    };
    // Consume the next leaf-first level. Shortfall, a split that does not
    // sit at the matched property's declaration index, or a level whose
    // width disagrees with the declaration all make the proof unverifiable.
    let Some(level) = levels.next() else {
        return Ok(Outcome::Reject);
    };
    if level.before.len() != index
        || level.before.len() + level.after.len() + 1 != class.properties().len()
    {
        return Ok(Outcome::Reject);
    }
    let mut children = Vec::with_capacity(class.properties().len());
    children.extend_from_slice(&level.before);
    children.push(digest);
    children.extend_from_slice(&level.after);
    Ok(Outcome::Matched(node_hash(&children)))
}

fn decode_salt(text: &str) -> EngineResult<SaltBytes> {
    let bytes = hex::decode(text).map_err(|_| EngineError::MalformedProof {
        reason: "salt is not hex",
    })?;
    if bytes.len() != SALT_LEN {
        return Err(EngineError::MalformedProof {
            reason: "salt is not 32 bytes",
        });
    }
    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&bytes);
    Ok(salt)
}

/// Decodes every sibling digest. `Ok(None)` marks a wrong-length digest
/// (a plain verification failure); non-hex content is `MalformedProof`.
fn decode_levels(hashes: &[SiblingHashes]) -> EngineResult<Option<Vec<DecodedLevel>>> {
    let mut levels = Vec::with_capacity(hashes.len());
    for level in hashes {
        let Some(before) = decode_digest_list(&level.before)? else {
            return Ok(None);
        };
        let Some(after) = decode_digest_list(&level.after)? else {
            return Ok(None);
        };
        levels.push(DecodedLevel { before, after });
    }
    Ok(Some(levels))
}

fn decode_digest_list(texts: &[String]) -> EngineResult<Option<Vec<Digest>>> {
    let mut digests = Vec::with_capacity(texts.len());
    for text in texts {
        match Digest::from_hex(text) {
            Ok(digest) => digests.push(digest),
            Err(DigestParseError::Length { .. }) => return Ok(None),
            Err(DigestParseError::Encoding) => {
                return Err(EngineError::MalformedProof {
                    reason: "sibling digest is not hex",
                })
            }
        }
    }
    Ok(Some(digests))
}
