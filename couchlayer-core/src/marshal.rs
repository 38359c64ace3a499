//! Conversion between records and stored JSON documents.
//!
//! Stored documents carry the identity attributes under `_id` and `_rev`. Absent attributes are
//! omitted and every association is written as an array, empty or not:
//!
//! ```text
//! {"_id": "abc", "_rev": "1-x", "number": "2024-001", "lineitems": [{"price": 10.5}]}
//! ```

use serde_json::{Map, Value};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    record::Record,
    schema::{ID, REV, SchemaRegistry},
};

/// Renders a record as a stored document.
pub fn serialize(record: &Record) -> Map<String, Value> {
    let mut document = Map::new();

    for attribute in record.attributes().filter(|a| !a.is_absent()) {
        let wire_name = record
            .schema()
            .attribute(attribute.name())
            .map(|def| def.wire_name())
            .unwrap_or(attribute.name());
        document.insert(wire_name.to_string(), attribute.value().clone());
    }

    for association in record.associations() {
        let children = association
            .children()
            .iter()
            .map(|child| Value::Object(serialize(child)))
            .collect();
        document.insert(association.name().to_string(), Value::Array(children));
    }

    document
}

/// Renders a record as stored document text.
pub fn to_json(record: &Record) -> DocumentStoreResult<String> {
    Ok(serde_json::to_string(&serialize(record))?)
}

/// Renames `_id`/`_rev` to `id`/`rev` at the top level of `document`.
pub fn unwrap_identity(mut document: Map<String, Value>) -> Map<String, Value> {
    for (wire, name) in [("_id", ID), ("_rev", REV)] {
        if let Some(value) = document.remove(wire) {
            document.insert(name.to_string(), value);
        }
    }

    document
}

/// Unwraps the identity of a stored `type_name` document and of the children under its
/// declared associations. Attribute values are left as they are.
fn unwrap_document(
    registry: &SchemaRegistry,
    type_name: &str,
    document: Map<String, Value>,
) -> DocumentStoreResult<Map<String, Value>> {
    let schema = registry.schema(type_name)?;
    let mut document = unwrap_identity(document);

    for association in schema.associations() {
        if let Some(Value::Array(items)) = document.get_mut(association.name()) {
            for item in items.iter_mut() {
                if let Value::Object(child) = item {
                    let stored = std::mem::take(child);
                    *child = unwrap_document(registry, association.target_type(), stored)?;
                }
            }
        }
    }

    Ok(document)
}

/// Builds a record of `type_name` from a stored document.
///
/// # Errors
///
/// - [`DocumentStoreError::Serialization`] if `document` is not a JSON object
/// - any error of [`Record::build`]
pub fn deserialize(
    registry: &SchemaRegistry,
    type_name: &str,
    document: Value,
) -> DocumentStoreResult<Record> {
    match document {
        Value::Object(fields) => {
            let fields = unwrap_document(registry, type_name, fields)?;
            Record::build(registry, type_name, &fields)
        }
        other => Err(DocumentStoreError::Serialization(format!(
            "expected a document object, got {other}"
        ))),
    }
}

/// Renders a record as a plain mapping keyed by attribute name, absent attributes as `null`.
///
/// This is the shape typed models deserialize from.
pub fn to_plain(record: &Record) -> Map<String, Value> {
    let mut plain = record
        .attributes()
        .map(|a| (a.name().to_string(), a.value().clone()))
        .collect::<Map<_, _>>();

    for association in record.associations() {
        let children = association
            .children()
            .iter()
            .map(|child| Value::Object(to_plain(child)))
            .collect();
        plain.insert(association.name().to_string(), Value::Array(children));
    }

    plain
}
