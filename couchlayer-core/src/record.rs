//! Live record instances.
//!
//! A [`Record`] holds one value per attribute and one child list per association of its
//! [`Schema`]. Records are built from a JSON mapping with [`Record::build`]: keys naming an
//! association are expanded into child records, every other key is assigned through the attribute
//! setter, and keys the schema does not know are ignored.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    schema::{AttributeType, ID, REV, Schema, SchemaRegistry},
};

/// The value held by one attribute of a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    name: String,
    declared_type: AttributeType,
    value: Value,
}

impl Attribute {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> AttributeType {
        self.declared_type
    }

    /// The current value; `null` when absent.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_absent(&self) -> bool {
        self.value.is_null()
    }
}

/// The children held by one association of a record.
#[derive(Debug, Clone)]
pub struct Association {
    name: String,
    target_type: String,
    children: Vec<Record>,
}

impl Association {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn children(&self) -> &[Record] {
        &self.children
    }
}

/// An instance of a record type.
#[derive(Debug, Clone)]
pub struct Record {
    schema: Arc<Schema>,
    attributes: Vec<Attribute>,
    associations: Vec<Association>,
}

impl Record {
    /// Creates a record with every attribute at its default value and no children.
    pub fn new(schema: Arc<Schema>) -> Self {
        let attributes = schema
            .attributes()
            .iter()
            .map(|def| Attribute {
                name: def.name().to_string(),
                declared_type: def.declared_type(),
                value: def.default_value().clone(),
            })
            .collect();
        let associations = schema
            .associations()
            .iter()
            .map(|def| Association {
                name: def.name().to_string(),
                target_type: def.target_type().to_string(),
                children: Vec::new(),
            })
            .collect();

        Self {
            schema,
            attributes,
            associations,
        }
    }

    /// Builds a record of `type_name` from a mapping of attribute and association values.
    ///
    /// - Arrays under an association name become child records; each element that is a mapping
    ///   is built recursively as the association's target type, other elements are skipped.
    /// - Other mappings are ignored; to-one relations are not supported.
    /// - Every other value is assigned through [`Record::set`]. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::UnknownType`] if `type_name`, or the target of a populated
    ///   association, is not registered
    /// - [`DocumentStoreError::Hierarchy`] if either has a broken parent chain
    pub fn build(
        registry: &SchemaRegistry,
        type_name: &str,
        input: &Map<String, Value>,
    ) -> DocumentStoreResult<Self> {
        Self::build_with(registry, type_name, input, |_| {})
    }

    /// Like [`Record::build`], then runs `init` on the constructed record.
    pub fn build_with<F>(
        registry: &SchemaRegistry,
        type_name: &str,
        input: &Map<String, Value>,
        init: F,
    ) -> DocumentStoreResult<Self>
    where
        F: FnOnce(&mut Record),
    {
        let mut record = Record::new(registry.schema(type_name)?);
        record.populate(registry, input)?;
        init(&mut record);

        Ok(record)
    }

    fn populate(&mut self, registry: &SchemaRegistry, input: &Map<String, Value>) -> DocumentStoreResult<()> {
        for (key, value) in input {
            match value {
                Value::Array(items) if self.association(key).is_some() => {
                    for item in items {
                        match item {
                            Value::Object(fields) => {
                                let target = self.target_of(key)?;
                                let child = Record::build(registry, &target, fields)?;
                                self.push_child(key, child);
                            }
                            other => warn!(
                                association = %key,
                                value = %other,
                                "skipping association element that is not a mapping"
                            ),
                        }
                    }
                }
                Value::Object(_) if self.association(key).is_none() => {
                    debug!(key = %key, "ignoring nested mapping");
                }
                _ => {
                    if !self.set(key, value.clone()) {
                        debug!(key = %key, record_type = self.type_name(), "ignoring unknown key");
                    }
                }
            }
        }

        Ok(())
    }

    fn target_of(&self, association: &str) -> DocumentStoreResult<String> {
        self.association(association)
            .map(|a| a.target_type.clone())
            .ok_or_else(|| DocumentStoreError::Argument(format!("no association named {association}")))
    }

    fn push_child(&mut self, association: &str, child: Record) {
        if let Some(a) = self.associations.iter_mut().find(|a| a.name == association) {
            a.children.push(child);
        }
    }

    /// The record type name.
    pub fn type_name(&self) -> &str {
        self.schema.name()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    pub fn associations(&self) -> impl Iterator<Item = &Association> {
        self.associations.iter()
    }

    pub fn association(&self, name: &str) -> Option<&Association> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// Returns the value of an attribute, or `None` if it is absent or not declared.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
            .filter(|v| !v.is_null())
    }

    /// Returns an attribute value deserialized as `T`.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the value does not deserialize as `T`.
    pub fn get_as<T>(&self, name: &str) -> DocumentStoreResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        self.get(name)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(Into::into)
    }

    /// Assigns an attribute. Returns `false` if the schema declares no such attribute.
    ///
    /// A value that does not match the declared type is stored anyway and logged.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> bool {
        let Some(attribute) = self.attributes.iter_mut().find(|a| a.name == name) else {
            return false;
        };

        let value = value.into();
        if !attribute.declared_type.accepts(&value) {
            warn!(
                record_type = self.schema.name(),
                attribute = name,
                declared = ?attribute.declared_type,
                value = %value,
                "value does not match declared attribute type"
            );
        }
        attribute.value = value;

        true
    }

    /// Makes an attribute absent.
    pub fn clear(&mut self, name: &str) -> bool {
        self.set(name, Value::Null)
    }

    /// The document id, if assigned.
    pub fn id(&self) -> Option<String> {
        self.get(ID).map(identity_text)
    }

    /// The document revision, if the record has been stored.
    pub fn rev(&self) -> Option<String> {
        self.get(REV).map(identity_text)
    }

    /// Assigns the document id used by the next save.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.set(ID, id.into());
    }

    /// Returns `true` until the record has a revision.
    pub fn is_new(&self) -> bool {
        self.rev().is_none()
    }

    pub(crate) fn set_identity(&mut self, id: Value, rev: Value) {
        self.set(ID, id);
        self.set(REV, rev);
    }

    /// Children of an association; empty if the association is not declared.
    pub fn children(&self, association: &str) -> &[Record] {
        self.association(association)
            .map(|a| a.children.as_slice())
            .unwrap_or_default()
    }

    /// Appends an already built child to an association.
    /// Returns `false` if the schema declares no such association.
    pub fn add_child(&mut self, association: &str, child: Record) -> bool {
        match self.associations.iter_mut().find(|a| a.name == association) {
            Some(a) => {
                if child.type_name() != a.target_type {
                    debug!(
                        association,
                        expected = %a.target_type,
                        actual = child.type_name(),
                        "adding child of a different record type"
                    );
                }
                a.children.push(child);
                true
            }
            None => false,
        }
    }
}

fn identity_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::schema::{AssociationOptions, AttributeOptions, RecordType};

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                RecordType::builder("Invoice")
                    .has("number", AttributeOptions::new().of_type(AttributeType::Text))
                    .has("paid", AttributeOptions::new().default_value(false))
                    .has_many("lineitems", AssociationOptions::new())
                    .build()
                    .unwrap(),
            )
            .unwrap()
            .register(
                RecordType::builder("Invoice::Lineitem")
                    .has("price", AttributeOptions::new().of_type(AttributeType::Decimal))
                    .build()
                    .unwrap(),
            )
            .unwrap();
        registry
    }

    fn input(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn starts_from_defaults() {
        let registry = registry();
        let invoice = Record::build(&registry, "Invoice", &Map::new()).unwrap();

        assert_eq!(invoice.get("paid"), Some(&json!(false)));
        assert_eq!(invoice.get("number"), None);
        assert_eq!(invoice.id(), None);
        assert!(invoice.is_new());
        assert!(invoice.children("lineitems").is_empty());
    }

    #[test]
    fn builds_children_from_arrays_of_mappings() {
        let registry = registry();
        let invoice = Record::build(
            &registry,
            "Invoice",
            &input(json!({
                "number": "2024-001",
                "lineitems": [{"price": 10.5}, {"price": 4}],
            })),
        )
        .unwrap();

        let items = invoice.children("lineitems");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].type_name(), "Invoice::Lineitem");
        assert_eq!(items[0].get("price"), Some(&json!(10.5)));
        assert_eq!(invoice.get("number"), Some(&json!("2024-001")));
    }

    #[test]
    fn skips_non_mapping_children_and_ignores_unknown_keys() {
        let registry = registry();
        let invoice = Record::build(
            &registry,
            "Invoice",
            &input(json!({
                "lineitems": [{"price": 1}, 7, "x"],
                "customer": {"name": "McLovin"},
                "color": "red",
            })),
        )
        .unwrap();

        assert_eq!(invoice.children("lineitems").len(), 1);
        assert_eq!(invoice.get("customer"), None);
        assert_eq!(invoice.get("color"), None);
    }

    #[test]
    fn unresolved_association_target_fails() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                RecordType::builder("Order")
                    .has_many("widgets", AssociationOptions::new())
                    .build()
                    .unwrap(),
            )
            .unwrap();

        let empty = Record::build(&registry, "Order", &input(json!({"widgets": []})));
        assert!(empty.is_ok());

        let err = Record::build(&registry, "Order", &input(json!({"widgets": [{}]}))).unwrap_err();
        assert!(matches!(err, DocumentStoreError::UnknownType(name) if name == "Widget"));
    }

    #[test]
    fn setter_reports_unknown_attributes_and_stores_mismatched_values() {
        let registry = registry();
        let mut invoice = Record::new(registry.schema("Invoice").unwrap());

        assert!(!invoice.set("color", "red"));
        assert!(invoice.set("number", 42));
        assert_eq!(invoice.get_as::<u32>("number").unwrap(), Some(42));
        assert!(invoice.clear("number"));
        assert_eq!(invoice.get("number"), None);
    }

    #[test]
    fn identity_accessors() {
        let registry = registry();
        let mut invoice = Record::new(registry.schema("Invoice").unwrap());

        invoice.set_id("abc");
        assert_eq!(invoice.id().as_deref(), Some("abc"));
        assert!(invoice.is_new());

        invoice.set("rev", "1-x");
        assert!(!invoice.is_new());

        invoice.set_identity(Value::Null, Value::Null);
        assert_eq!(invoice.id(), None);
        assert!(invoice.is_new());
    }

    #[test]
    fn runs_initializer_after_population() {
        let registry = registry();
        let invoice = Record::build_with(
            &registry,
            "Invoice",
            &input(json!({"number": "7"})),
            |record| {
                let number = record.get_as::<String>("number").unwrap().unwrap_or_default();
                record.set("number", format!("INV-{number}"));
            },
        )
        .unwrap();

        assert_eq!(invoice.get("number"), Some(&json!("INV-7")));
    }

    #[test]
    fn adds_prebuilt_children() {
        let registry = registry();
        let mut invoice = Record::new(registry.schema("Invoice").unwrap());
        let item = Record::new(registry.schema("Invoice::Lineitem").unwrap());

        assert!(invoice.add_child("lineitems", item.clone()));
        assert!(!invoice.add_child("payments", item));
        assert_eq!(invoice.children("lineitems").len(), 1);
    }
}
