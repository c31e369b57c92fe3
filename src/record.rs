//! Structured records handed to the serializer
//!
//! A record is either statically bound to a Rust type generated or derived
//! at compile time, or driven entirely by a schema attached at runtime. The
//! producer picks the variant when it builds the [`Record`]; the serializer
//! never inspects values to decide.

use apache_avro::types::Value;
use apache_avro::{AvroResult, AvroSchema, Schema};
use serde::Serialize;

use crate::error::{CodecError, Result};

/// Capability a statically-bound value exposes to the serializer.
///
/// Implemented for every `Serialize` type that derives `AvroSchema`.
pub trait AvroRecord {
    /// Schema bound to this value's type.
    fn schema(&self) -> Schema;

    /// Convert the value into an Avro datum conforming to [`AvroRecord::schema`].
    fn to_datum(&self) -> AvroResult<Value>;
}

impl<T> AvroRecord for T
where
    T: AvroSchema + Serialize,
{
    fn schema(&self) -> Schema {
        T::get_schema()
    }

    fn to_datum(&self) -> AvroResult<Value> {
        apache_avro::to_value(self)
    }
}

/// A schema-driven record: an Avro value interpreted through its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericRecord {
    schema: Schema,
    value: Value,
}

impl GenericRecord {
    /// Pair a value with its schema, resolving unions and promotions.
    ///
    /// Fails with `Validation` when the value does not conform.
    pub fn new(schema: Schema, value: Value) -> Result<Self> {
        let value = value.resolve(&schema).map_err(|e| {
            CodecError::Validation(format!("value does not conform to schema: {}", e))
        })?;
        Ok(Self { schema, value })
    }

    /// Build a record from JSON, e.g. read from a file.
    pub fn from_json(schema: Schema, json: serde_json::Value) -> Result<Self> {
        Self::new(schema, Value::from(json))
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A structured value ready for serialization, tagged by how it is written.
#[derive(Clone, Copy)]
pub enum Record<'a> {
    /// Bound to a compile-time Rust type
    Specific(&'a dyn AvroRecord),
    /// Interpreted through its attached schema
    Generic(&'a GenericRecord),
}

impl<'a> Record<'a> {
    pub fn specific<T: AvroRecord>(record: &'a T) -> Self {
        Record::Specific(record)
    }

    pub fn generic(record: &'a GenericRecord) -> Self {
        Record::Generic(record)
    }

    /// Schema the record will be written with.
    pub fn schema(&self) -> Schema {
        match self {
            Record::Specific(record) => record.schema(),
            Record::Generic(record) => record.schema().clone(),
        }
    }
}

impl<'a> From<&'a GenericRecord> for Record<'a> {
    fn from(record: &'a GenericRecord) -> Self {
        Record::Generic(record)
    }
}

impl std::fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Record::Specific(_) => f.write_str("Record::Specific(..)"),
            Record::Generic(record) => f.debug_tuple("Record::Generic").field(record).finish(),
        }
    }
}
