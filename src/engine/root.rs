//! Root engine: the Merkle commitment over a salted record.

use crate::canon;
use crate::hash::{leaf_hash, node_hash, Digest};
use crate::record::Record;
use crate::schema::{PrimitiveType, PropertyKind, SchemaRegistry};
use crate::{EngineError, EngineResult};

use super::{expect_nested, lookup_class, map_canon, missing_value, not_implemented, PropertyPath};

/// Computes the Merkle root of `record`. Pure: the record and its salts
/// are read, never written.
pub fn root_digest(registry: &SchemaRegistry, record: &Record) -> EngineResult<Digest> {
    let mut path = PropertyPath::new();
    class_digest(registry, record, &mut path)
}

/// Node hash of one record: child digests in declaration order, no
/// separators. Shared with the proof engine, which uses it for
/// non-disclosed sibling subtrees.
pub(crate) fn class_digest(
    registry: &SchemaRegistry,
    record: &Record,
    path: &mut PropertyPath,
) -> EngineResult<Digest> {
    let class = lookup_class(registry, record.class_name())?;
    let mut children = Vec::with_capacity(class.properties().len());
    for property in class.properties() {
        path.push(property.name());
        let digest = match property.kind() {
            PropertyKind::Primitive(ty) => leaf_digest(record, property.name(), *ty, path)?,
            PropertyKind::NestedClass(_) => {
                let child = expect_nested(path, record, property.name())?;
                class_digest(registry, child, path)?
            }
            PropertyKind::Array => return Err(not_implemented(path, "array")),
            PropertyKind::Enum => return Err(not_implemented(path, "enum")),
            PropertyKind::Relationship => return Err(not_implemented(path, "relationship")),
        };
        path.pop();
        children.push(digest);
    }
    Ok(node_hash(&children))
}

/// Leaf hash of one primitive field: `SHA256(canonical(value) || salt)`.
pub(crate) fn leaf_digest(
    record: &Record,
    name: &str,
    ty: PrimitiveType,
    path: &PropertyPath,
) -> EngineResult<Digest> {
    let value = record
        .value(name)
        .ok_or_else(|| missing_value(path, ty.name()))?;
    let canonical = canon::canonical_bytes(ty, value).map_err(|err| map_canon(path, ty, err))?;
    let salt = record
        .salt(name)
        .ok_or_else(|| EngineError::SaltMissing { path: path.clone() })?;
    Ok(leaf_hash(&canonical, salt))
}
