//! Record serialization
//!
//! Turns a [`Record`] into Avro binary. Each variant has its own writer; both
//! produce identical bytes for the same schema and equal values.

use std::io::{BufWriter, Write};

use apache_avro::types::Value;
use apache_avro::Schema;

use crate::error::EncodingError;
use crate::record::{AvroRecord, GenericRecord, Record};

/// Buffered binary sink for datum writers.
///
/// Writes are held in an internal buffer; [`BinaryEncoder::finish`] flushes
/// and hands back the bytes. Dropping an encoder without finishing it loses
/// whatever is still buffered.
pub struct BinaryEncoder {
    inner: BufWriter<Vec<u8>>,
}

impl BinaryEncoder {
    pub fn new() -> Self {
        Self {
            inner: BufWriter::new(Vec::new()),
        }
    }

    /// Flush any buffered writes and return the encoded bytes.
    pub fn finish(self) -> Result<Vec<u8>, EncodingError> {
        self.inner
            .into_inner()
            .map_err(|e| EncodingError::Io(e.into_error()))
    }
}

impl Default for BinaryEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for BinaryEncoder {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

/// Writes values bound to a compile-time type.
struct SpecificDatumWriter {
    schema: Schema,
}

impl SpecificDatumWriter {
    fn new(schema: Schema) -> Self {
        Self { schema }
    }

    fn write(&self, record: &dyn AvroRecord, encoder: &mut dyn Write) -> Result<(), EncodingError> {
        // serde output still needs unions and promotions resolved against the schema
        let datum = record.to_datum()?.resolve(&self.schema)?;
        write_datum(&self.schema, datum, encoder)
    }
}

/// Writes values purely from their attached schema.
struct GenericDatumWriter<'s> {
    schema: &'s Schema,
}

impl<'s> GenericDatumWriter<'s> {
    fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    fn write(&self, value: &Value, encoder: &mut dyn Write) -> Result<(), EncodingError> {
        write_datum(self.schema, value.clone(), encoder)
    }
}

fn write_datum(schema: &Schema, datum: Value, encoder: &mut dyn Write) -> Result<(), EncodingError> {
    let bytes = apache_avro::to_avro_datum(schema, datum)?;
    encoder.write_all(&bytes)?;
    Ok(())
}

/// Serialize a record to Avro binary.
///
/// The writer is chosen from the record's declared variant. The encoder is
/// always flushed before the bytes are returned.
pub fn serialize(record: &Record<'_>) -> Result<Vec<u8>, EncodingError> {
    let mut encoder = BinaryEncoder::new();
    match record {
        Record::Specific(specific) => {
            SpecificDatumWriter::new(specific.schema()).write(*specific, &mut encoder)?
        }
        Record::Generic(generic) => write_generic(generic, &mut encoder)?,
    }
    let bytes = encoder.finish()?;
    tracing::trace!(len = bytes.len(), "serialized record");
    Ok(bytes)
}

fn write_generic(record: &GenericRecord, encoder: &mut dyn Write) -> Result<(), EncodingError> {
    GenericDatumWriter::new(record.schema()).write(record.value(), encoder)
}
