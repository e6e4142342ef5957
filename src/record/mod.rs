//! Typed records and their per-record salt stores.
//!
//! Records are constructed by the surrounding platform's factory; the
//! engines only rely on the narrow surface here: the class name, value
//! lookup by property name, and the salt store accessors. Only the salt
//! engine ever takes a record by `&mut`; root and proof read, verify never
//! sees the record at all. Two concurrent read-only walks over one record
//! are therefore safe by construction, and an exclusive borrow guards the
//! one mutating walk.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Length in bytes of every field salt.
pub const SALT_LEN: usize = 32;

/// A field salt: 32 bytes drawn from the operating-system CSPRNG.
pub type SaltBytes = [u8; SALT_LEN];

/// A runtime field value: a primitive scalar or a nested record.
///
/// Arrays, enums, and relationship pointers are reserved constructs with
/// no value representation here; the engines reject their *declarations*
/// before any value would be consulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Boolean(bool),
    Integer(i32),
    Long(i64),
    Double(f64),
    DateTime(DateTime<Utc>),
    Record(Record),
}

impl Value {
    /// Short description of the value's runtime shape, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "String",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Long(_) => "Long",
            Value::Double(_) => "Double",
            Value::DateTime(_) => "DateTime",
            Value::Record(_) => "record",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<Record> for Value {
    fn from(value: Record) -> Self {
        Value::Record(value)
    }
}

/// A typed record: its fully-qualified class name, the `name → value`
/// mapping, and the salt store over this record's own primitive leaves.
///
/// Nested records carry their own salt stores; a parent never holds salts
/// for a child's fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    class_name: String,
    values: BTreeMap<String, Value>,
    salts: BTreeMap<String, SaltBytes>,
}

impl Record {
    /// Creates an empty record of the given class.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            values: BTreeMap::new(),
            salts: BTreeMap::new(),
        }
    }

    /// Fully-qualified name of the record's class.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Looks up a property value by name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Mutable lookup, used by the salt engine to descend into nested
    /// records.
    pub fn value_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.get_mut(name)
    }

    /// Sets a property value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Returns the salt stored for one of this record's own primitive
    /// fields.
    pub fn salt(&self, name: &str) -> Option<&SaltBytes> {
        self.salts.get(name)
    }

    /// Stores a salt for one of this record's own primitive fields.
    pub fn set_salt(&mut self, name: impl Into<String>, salt: SaltBytes) {
        self.salts.insert(name.into(), salt);
    }

    /// Number of salts currently stored on this record (own fields only).
    pub fn salt_count(&self) -> usize {
        self.salts.len()
    }
}
