//! Typed models.
//!
//! A [`Model`] is a plain Rust struct that declares a record type. It is usually derived:
//!
//! ```ignore
//! use couchlayer::prelude::*;
//!
//! #[derive(Debug, Serialize, Deserialize, Model)]
//! #[model(name = "Invoice")]
//! pub struct Invoice {
//!     pub id: Option<String>,
//!     pub rev: Option<String>,
//!     pub number: String,
//!     #[model(has_many)]
//!     pub lineitems: Vec<Lineitem>,
//! }
//!
//! registry.register_model::<Invoice>()?;
//! ```
//!
//! Models convert to and from [`Record`]s through their serde representation, keyed by attribute
//! name. The identity fields, when the struct has them, are named `id` and `rev`.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::{DocumentStoreError, DocumentStoreResult},
    marshal,
    record::Record,
    schema::{RecordType, SchemaRegistry},
};

/// A Rust type mapped onto a record type.
pub trait Model: Serialize + DeserializeOwned + Send + Sync {
    /// Name of the record type, e.g. `Invoice` or `Invoice::Lineitem`.
    fn type_name() -> &'static str;

    /// The record type declaration.
    fn record_type() -> DocumentStoreResult<RecordType>;
}

impl SchemaRegistry {
    /// Registers the record type declared by `M`.
    pub fn register_model<M: Model>(&mut self) -> DocumentStoreResult<&mut Self> {
        self.register(M::record_type()?)
    }
}

impl Record {
    /// Converts the record into a model value.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the record's attributes do not deserialize as `M`.
    pub fn to_model<M: DeserializeOwned>(&self) -> DocumentStoreResult<M> {
        Ok(serde_json::from_value(Value::Object(marshal::to_plain(self)))?)
    }

    /// Builds a record from a model value.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::Serialization`] if `model` does not serialize to a mapping
    /// - any error of [`Record::build`]
    pub fn from_model<M: Model>(registry: &SchemaRegistry, model: &M) -> DocumentStoreResult<Record> {
        match serde_json::to_value(model)? {
            Value::Object(fields) => Record::build(registry, M::type_name(), &fields),
            other => Err(DocumentStoreError::Serialization(format!(
                "model {} serialized to {other}, expected a mapping",
                M::type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::schema::{AssociationOptions, AttributeOptions, AttributeType};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Invoice {
        id: Option<String>,
        rev: Option<String>,
        number: String,
        lineitems: Vec<Lineitem>,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Lineitem {
        price: f64,
    }

    impl Model for Invoice {
        fn type_name() -> &'static str {
            "Invoice"
        }

        fn record_type() -> DocumentStoreResult<RecordType> {
            RecordType::builder("Invoice")
                .has("number", AttributeOptions::new().of_type(AttributeType::Text))
                .has_many("lineitems", AssociationOptions::new())
                .build()
        }
    }

    impl Model for Lineitem {
        fn type_name() -> &'static str {
            "Invoice::Lineitem"
        }

        fn record_type() -> DocumentStoreResult<RecordType> {
            RecordType::builder("Invoice::Lineitem")
                .has("price", AttributeOptions::new().of_type(AttributeType::Decimal))
                .build()
        }
    }

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .register_model::<Invoice>()
            .unwrap()
            .register_model::<Lineitem>()
            .unwrap();
        registry
    }

    #[test]
    fn models_convert_through_records() {
        let registry = registry();
        let invoice = Invoice {
            id: None,
            rev: None,
            number: "2024-001".to_string(),
            lineitems: vec![Lineitem { price: 10.5 }, Lineitem { price: 2.0 }],
        };

        let record = Record::from_model(&registry, &invoice).unwrap();
        assert_eq!(record.get("number"), Some(&json!("2024-001")));
        assert_eq!(record.children("lineitems").len(), 2);
        assert!(record.is_new());

        assert_eq!(record.to_model::<Invoice>().unwrap(), invoice);
    }

    #[test]
    fn identity_reaches_the_model() {
        let registry = registry();
        let record = marshal::deserialize(
            &registry,
            "Invoice",
            json!({"_id": "a", "_rev": "1-a", "number": "7", "lineitems": []}),
        )
        .unwrap();

        let invoice = record.to_model::<Invoice>().unwrap();
        assert_eq!(invoice.id.as_deref(), Some("a"));
        assert_eq!(invoice.rev.as_deref(), Some("1-a"));
    }
}
