//! Schema descriptors for stored records
//!
//! Every record type describes how its fields map onto store indexes with an
//! explicit [`Schema`] value. The descriptor is what gets handed to the store
//! when a namespace is opened, and what the gateway consults when a raw user
//! value has to be coerced into a field's type.

use crate::utils::error::{AppError, AppResult};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Semantic type of a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Int,
    Int64,
    String,
    /// Nested documents stored inline and never indexed
    Embedded,
}

/// How the store indexes a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    /// Equality lookups
    Hash,
    /// Ordered index, required for sorting
    Tree,
    /// Unix timestamp; rows expire `expire_after` seconds after it
    Ttl { expire_after: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub index: Option<IndexKind>,
    pub is_pk: bool,
    pub is_array: bool,
}

impl FieldDef {
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        let index = match field_type {
            FieldType::Embedded => None,
            _ => Some(IndexKind::Hash),
        };
        Self {
            name,
            field_type,
            index,
            is_pk: false,
            is_array: false,
        }
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn int64(name: &'static str) -> Self {
        Self::new(name, FieldType::Int64)
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn embedded(name: &'static str) -> Self {
        Self::new(name, FieldType::Embedded).array()
    }

    pub fn primary_key(mut self) -> Self {
        self.is_pk = true;
        self
    }

    pub fn array(mut self) -> Self {
        self.is_array = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.index = Some(IndexKind::Tree);
        self
    }

    pub fn ttl(mut self, expire_after: u64) -> Self {
        self.index = Some(IndexKind::Ttl { expire_after });
        self
    }

    pub fn is_sortable(&self) -> bool {
        matches!(self.index, Some(IndexKind::Tree))
    }

    /// Convert raw user input into a JSON value of this field's type
    pub fn coerce(&self, raw: &str) -> AppResult<Value> {
        let raw = raw.trim();
        let scalar = match self.field_type {
            FieldType::Int | FieldType::Int64 => raw
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| {
                    AppError::Write(format!(
                        "'{}' is not a valid integer for field '{}'",
                        raw, self.name
                    ))
                })?,
            FieldType::String => Value::String(raw.to_string()),
            FieldType::Embedded => {
                return Err(AppError::Write(format!(
                    "Field '{}' holds embedded documents and cannot be set from text",
                    self.name
                )));
            }
        };

        if self.is_array {
            Ok(Value::Array(vec![scalar]))
        } else {
            Ok(scalar)
        }
    }
}

/// Field layout of one namespace
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub fields: Vec<FieldDef>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, def: FieldDef) -> Self {
        self.fields.push(def);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn primary_key(&self) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.is_pk)
    }

    /// The TTL field name together with its lifetime in seconds
    pub fn ttl(&self) -> Option<(&'static str, u64)> {
        self.fields.iter().find_map(|f| match f.index {
            Some(IndexKind::Ttl { expire_after }) => Some((f.name, expire_after)),
            _ => None,
        })
    }

    pub fn indexed_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.index.is_some())
    }

    /// Describe the first incompatibility with a previously registered layout.
    ///
    /// Fields present on only one side are compatible; a shared field must
    /// agree on type, index, key and array-ness.
    pub fn conflict_with(&self, registered: &Schema) -> Option<String> {
        self.fields.iter().find_map(|def| {
            let existing = registered.get(def.name)?;
            if existing == def {
                None
            } else {
                Some(format!(
                    "field '{}' is registered as {:?}/{:?} but requested as {:?}/{:?}",
                    def.name, existing.field_type, existing.index, def.field_type, def.index
                ))
            }
        })
    }

    /// Coerce a raw value for `field`, failing when the field is unknown
    pub fn coerce(&self, field: &str, raw: &str) -> AppResult<Value> {
        self.get(field)
            .ok_or_else(|| AppError::Write(format!("Unknown field '{}'", field)))?
            .coerce(raw)
    }
}

/// A record type that lives in its own namespace
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const NAMESPACE: &'static str;

    fn schema() -> Schema;
}
