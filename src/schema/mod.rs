//! Schema-introspection surface consumed by the engines.
//!
//! The surrounding platform compiles full schemas (imports, super-types,
//! identifiers, decorators); the engines only ever see the narrow contract
//! modelled here: for a class name, the ordered list of its own properties,
//! and for each property a classifier plus, for primitives, the type tag.
//!
//! Property order is the declaration order and is part of the hash
//! contract: reordering two properties changes every root over the class.

mod registry;
mod types;

pub use registry::{RegistryBuilder, SchemaError, SchemaRegistry};
pub use types::{ClassDecl, PrimitiveType, Property, PropertyKind};
