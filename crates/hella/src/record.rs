//! Records: a normalized timestamp plus a flat field-path mapping.
//!
//! The schema layer hands records to the [`RecordEncoder`], which turns them
//! into codec bytes and content pointers. A record's pointer covers its
//! fields only, so the same field content observed at different times shares
//! one pointer.

use hella_core::{
    decode_with_depth, encode, object_parts, object_pointer, CodecError, ComboIter, Object,
    Pointer, Value,
};
use indexmap::IndexMap;
use serde_json::Value as Json;
use tracing::{debug, trace, warn};

use crate::config::EncoderConfig;
use crate::error::{HellaError, Result};
use crate::json;

/// A flat record.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Timestamp in nanoseconds since the Unix epoch.
    pub timestamp_ns: i64,
    /// Field path to value; values are never objects.
    pub fields: Object,
}

impl Record {
    pub fn new(timestamp_ns: i64) -> Self {
        Self {
            timestamp_ns,
            fields: Object::new(),
        }
    }

    /// Build from an existing mapping, rejecting nested objects.
    pub fn from_fields(timestamp_ns: i64, fields: Object) -> Result<Self> {
        check_flat(&fields)?;
        Ok(Self {
            timestamp_ns,
            fields,
        })
    }

    /// Flatten a JSON document into a record. See [`json::flatten`].
    pub fn from_json(timestamp_ns: i64, doc: &Json) -> Result<Self> {
        Ok(Self {
            timestamp_ns,
            fields: json::flatten(doc)?,
        })
    }

    /// Builder-style insert.
    pub fn with_field(mut self, path: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(path.into(), value.into());
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(path.into(), value.into())
    }

    pub fn get(&self, path: &str) -> Option<&Value> {
        self.fields.get(path)
    }
}

fn check_flat(fields: &Object) -> Result<()> {
    match fields.iter().find(|(_, v)| v.is_object()) {
        Some((path, _)) => Err(HellaError::NestedField(path.clone())),
        None => Ok(()),
    }
}

/// Output of [`RecordEncoder::encode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedRecord {
    /// Codec bytes: an object with the timestamp first, then the fields.
    pub bytes: Vec<u8>,
    /// Whole-record pointer over the fields.
    pub pointer: Pointer,
}

/// Encodes and decodes records under one configuration.
#[derive(Debug, Clone, Default)]
pub struct RecordEncoder {
    config: EncoderConfig,
}

impl RecordEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    fn check_record(&self, record: &Record) -> Result<()> {
        if record.fields.contains_key(&self.config.timestamp_field) {
            return Err(HellaError::ReservedField(self.config.timestamp_field.clone()));
        }
        check_flat(&record.fields)
    }

    /// Serialize a record and derive its pointer.
    pub fn encode(&self, record: &Record) -> Result<EncodedRecord> {
        self.check_record(record)?;

        let mut obj = Object::with_capacity(record.fields.len() + 1);
        obj.insert(
            self.config.timestamp_field.clone(),
            Value::Integer(record.timestamp_ns),
        );
        obj.extend(record.fields.iter().map(|(k, v)| (k.clone(), v.clone())));

        let bytes = encode(&Value::Object(obj));
        let pointer = Pointer::from_bytes(object_pointer(&record.fields, self.config.object_tag)?);

        debug!(
            fields = record.fields.len(),
            bytes = bytes.len(),
            %pointer,
            "encoded record"
        );
        Ok(EncodedRecord { bytes, pointer })
    }

    /// The whole-record pointer without serializing the record.
    pub fn pointer(&self, record: &Record) -> Result<Pointer> {
        check_flat(&record.fields)?;
        Ok(Pointer::from_bytes(object_pointer(
            &record.fields,
            self.config.object_tag,
        )?))
    }

    /// Rebuild a record from [`encode`](Self::encode) output.
    pub fn decode(&self, bytes: &[u8]) -> Result<Record> {
        let (value, end) = decode_with_depth(bytes, 0, self.config.max_depth)?;
        if end != bytes.len() {
            return Err(HellaError::TrailingBytes(bytes.len() - end));
        }

        let mut fields = match value {
            Value::Object(obj) => obj,
            other => {
                return Err(CodecError::InvalidInput(format!(
                    "record must be an object, found {}",
                    other.kind()
                ))
                .into())
            }
        };

        let timestamp_ns = match fields.shift_remove(&self.config.timestamp_field) {
            Some(Value::Integer(ts)) => ts,
            _ => return Err(HellaError::UnknownField(self.config.timestamp_field.clone())),
        };

        let record = Record::from_fields(timestamp_ns, fields)?;
        debug!(
            fields = record.fields.len(),
            bytes = bytes.len(),
            "decoded record"
        );
        Ok(record)
    }

    /// Pointers for every non-empty combination of the named fields.
    ///
    /// Keys list field paths in the order given; repeated names are counted
    /// once. Each pointer combines the `key || value` encodings of its fields
    /// under the configured combination tag.
    pub fn combination_pointers(
        &self,
        record: &Record,
        paths: &[&str],
    ) -> Result<IndexMap<Vec<String>, Pointer>> {
        let mut selected = Object::with_capacity(paths.len());
        for &path in paths {
            let value = record
                .get(path)
                .ok_or_else(|| HellaError::UnknownField(path.to_string()))?;
            if value.is_object() {
                return Err(HellaError::NestedField(path.to_string()));
            }
            selected.insert(path.to_string(), value.clone());
        }

        let max = self.config.max_combination_fields;
        if selected.len() > max {
            warn!(
                count = selected.len(),
                max, "rejecting field combination request"
            );
            return Err(HellaError::TooManyFields {
                count: selected.len(),
                max,
            });
        }

        let names: Vec<&String> = selected.keys().collect();
        let parts = object_parts(&selected).joined_entries();

        let mut out = IndexMap::new();
        for combo in ComboIter::new(&parts, self.config.combination_tag) {
            let key: Vec<String> = combo.indices.iter().map(|&i| names[i].clone()).collect();
            let pointer = Pointer::new(combo.hash);
            trace!(fields = ?key, %pointer, "combination pointer");
            out.insert(key, pointer);
        }

        debug!(
            fields = selected.len(),
            combinations = out.len(),
            "derived combination pointers"
        );
        Ok(out)
    }
}
