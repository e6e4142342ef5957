use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{ClassDecl, PropertyKind};

/// Errors raised while assembling a [`SchemaRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two declarations share a fully-qualified name.
    DuplicateClass { name: String },
    /// A class declares the same property name twice. Property names key
    /// the salt store, so a duplicate would make salts ambiguous.
    DuplicateProperty { class: String, property: String },
    /// A nested-class property points at a class the registry does not
    /// hold.
    UnresolvedNestedClass {
        class: String,
        property: String,
        target: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::DuplicateClass { name } => {
                write!(f, "class {name} declared twice")
            }
            SchemaError::DuplicateProperty { class, property } => {
                write!(f, "class {class} declares property {property} twice")
            }
            SchemaError::UnresolvedNestedClass {
                class,
                property,
                target,
            } => {
                write!(
                    f,
                    "property {class}.{property} references undeclared class {target}"
                )
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Builder used to assemble a [`SchemaRegistry`] with validation.
///
/// Declarations are collected with [`declare`](Self::declare) and checked
/// as a whole by [`finish`](Self::finish): duplicate class names, duplicate
/// property names within a class, and dangling nested-class references are
/// all rejected before the registry becomes usable.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    classes: Vec<ClassDecl>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class declaration. Validation happens in [`finish`](Self::finish).
    pub fn declare(&mut self, class: ClassDecl) -> &mut Self {
        self.classes.push(class);
        self
    }

    /// Validates the collected declarations and releases the registry.
    pub fn finish(&self) -> Result<SchemaRegistry, SchemaError> {
        let mut classes: BTreeMap<String, ClassDecl> = BTreeMap::new();
        for class in &self.classes {
            if classes.contains_key(class.name()) {
                return Err(SchemaError::DuplicateClass {
                    name: class.name().to_owned(),
                });
            }
            let mut seen: Vec<&str> = Vec::with_capacity(class.properties().len());
            for property in class.properties() {
                if seen.contains(&property.name()) {
                    return Err(SchemaError::DuplicateProperty {
                        class: class.name().to_owned(),
                        property: property.name().to_owned(),
                    });
                }
                seen.push(property.name());
            }
            classes.insert(class.name().to_owned(), class.clone());
        }

        for class in classes.values() {
            for property in class.properties() {
                if let PropertyKind::NestedClass(target) = property.kind() {
                    if !classes.contains_key(target) {
                        return Err(SchemaError::UnresolvedNestedClass {
                            class: class.name().to_owned(),
                            property: property.name().to_owned(),
                            target: target.clone(),
                        });
                    }
                }
            }
        }

        Ok(SchemaRegistry { classes })
    }
}

/// Immutable, validated collection of class declarations.
///
/// The lookup map only resolves class names; the order that matters for
/// hashing is the property order inside each [`ClassDecl`], never the
/// iteration order of this map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    classes: BTreeMap<String, ClassDecl>,
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolves a fully-qualified class name.
    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    /// Number of declared classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
