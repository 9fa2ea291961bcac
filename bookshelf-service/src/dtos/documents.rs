//! JSON rendering for schemaless book documents.
//!
//! Books have no enforced shape, so handlers work with raw BSON documents.
//! Responses render `ObjectId` values as their 24-char hex string and BSON
//! datetimes as RFC 3339, instead of the extended-JSON forms serde would
//! produce.

use mongodb::bson::{Bson, Document};
use serde_json::Value;

pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.to_string()),
        ),
        Bson::Document(document) => document_to_json(document),
        Bson::Array(values) => Value::Array(values.into_iter().map(bson_to_json).collect()),
        Bson::Decimal128(decimal) => Value::String(decimal.to_string()),
        other => mongodb::bson::from_bson(other).unwrap_or(Value::Null),
    }
}

pub fn document_to_json(document: Document) -> Value {
    let mut map = serde_json::Map::new();
    for (key, value) in document {
        map.insert(key, bson_to_json(value));
    }
    Value::Object(map)
}
