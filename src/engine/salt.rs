//! Salt engine: populates a record's salt stores in place.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::canon;
use crate::record::{Record, SaltBytes, Value, SALT_LEN};
use crate::schema::{PropertyKind, SchemaRegistry};
use crate::{EngineError, EngineResult};

use super::{lookup_class, map_canon, missing_value, not_implemented, PropertyPath};

/// Walks `record` against its class declaration and stores a fresh
/// 32-byte random salt for every primitive leaf, recursing into nested
/// records. Nested salts land in the nested record's own store.
///
/// On error the record's salt stores are left in an unspecified state and
/// the record must be discarded.
pub fn salt_record(registry: &SchemaRegistry, record: &mut Record) -> EngineResult<()> {
    let mut path = PropertyPath::new();
    salt_class(registry, record, &mut path)
}

fn salt_class(
    registry: &SchemaRegistry,
    record: &mut Record,
    path: &mut PropertyPath,
) -> EngineResult<()> {
    let class = lookup_class(registry, record.class_name())?;
    for property in class.properties() {
        path.push(property.name());
        match property.kind() {
            PropertyKind::Primitive(ty) => {
                let value = record
                    .value(property.name())
                    .ok_or_else(|| missing_value(path, ty.name()))?;
                // Values must canonicalise for their declared type before
                // any salt is drawn.
                canon::canonical_bytes(*ty, value).map_err(|err| map_canon(path, *ty, err))?;
                record.set_salt(property.name(), fresh_salt()?);
            }
            PropertyKind::NestedClass(_) => {
                let value = record
                    .value_mut(property.name())
                    .ok_or_else(|| missing_value(path, "nested class"))?;
                match value {
                    Value::Record(child) => salt_class(registry, child, path)?,
                    other => {
                        return Err(EngineError::TypeMismatch {
                            path: path.clone(),
                            expected: "nested class",
                            found: other.kind(),
                        })
                    }
                }
            }
            PropertyKind::Array => return Err(not_implemented(path, "array")),
            PropertyKind::Enum => return Err(not_implemented(path, "enum")),
            PropertyKind::Relationship => return Err(not_implemented(path, "relationship")),
        }
        path.pop();
    }
    Ok(())
}

fn fresh_salt() -> EngineResult<SaltBytes> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|_| EngineError::RandomnessUnavailable)?;
    Ok(salt)
}
