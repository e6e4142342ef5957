use serde::{Deserialize, Serialize};

/// Type tag of a primitive field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrimitiveType {
    String,
    Boolean,
    Integer,
    Long,
    Double,
    DateTime,
}

impl PrimitiveType {
    /// Canonical name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Integer => "Integer",
            PrimitiveType::Long => "Long",
            PrimitiveType::Double => "Double",
            PrimitiveType::DateTime => "DateTime",
        }
    }
}

/// Classifier of a declared property.
///
/// `Array`, `Enum`, and `Relationship` are reserved: the engines refuse
/// them rather than committing to a hash form that would have to be
/// supported forever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// A primitive leaf field.
    Primitive(PrimitiveType),
    /// A field holding a nested record; the payload is the fully-qualified
    /// name of the nested class.
    NestedClass(String),
    /// Reserved.
    Array,
    /// Reserved.
    Enum,
    /// Reserved.
    Relationship,
}

impl PropertyKind {
    /// Short classifier name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            PropertyKind::Primitive(ty) => ty.name(),
            PropertyKind::NestedClass(_) => "nested class",
            PropertyKind::Array => "array",
            PropertyKind::Enum => "enum",
            PropertyKind::Relationship => "relationship",
        }
    }
}

/// One declared property: a name and its classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    name: String,
    kind: PropertyKind,
}

impl Property {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Shorthand for a primitive property.
    pub fn primitive(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self::new(name, PropertyKind::Primitive(ty))
    }

    /// Shorthand for a nested-class property.
    pub fn nested(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::NestedClass(class_name.into()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }
}

/// A class declaration: fully-qualified `ns.Name` plus the ordered list of
/// its own properties.
///
/// The engines never see super-types or identifier flags; flattening
/// inherited properties into declaration order is the schema compiler's
/// job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    name: String,
    properties: Vec<Property>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, properties: Vec<Property>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Fully-qualified class name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Own properties in declaration order.
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }
}
