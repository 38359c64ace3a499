//! Record type declarations and the registry that resolves them into schemas.
//!
//! A [`RecordType`] is a declaration: its own attributes, its own associations, an optional
//! parent type and an optional database name override. Declarations are collected in a
//! [`SchemaRegistry`], together with the transport bound to each type, and resolved on first
//! use into an immutable [`Schema`]. Resolution merges a type's declarations over its parent's
//! resolved schema, so subtypes inherit everything their ancestors declare.
//!
//! # Example
//!
//! ```ignore
//! use couchlayer::schema::{RecordType, SchemaRegistry, AttributeOptions, AttributeType};
//!
//! let mut registry = SchemaRegistry::new();
//! registry.register(
//!     RecordType::builder("Invoice")
//!         .has("number", AttributeOptions::new().of_type(AttributeType::Text))
//!         .has("paid", AttributeOptions::new().default_value(false))
//!         .has_many("lineitems", AssociationOptions::new())
//!         .build()?,
//! )?;
//! registry.register(RecordType::builder("Invoice::Lineitem").has("price", AttributeOptions::new()).build()?)?;
//! registry.connect("Invoice", transport);
//!
//! assert_eq!(registry.schema("Invoice")?.database_name(), "invoices");
//! assert_eq!(registry.schema("Invoice::Lineitem")?.database_name(), "invoice_lineitems");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{
    backend::{SharedTransport, Transport},
    error::{DocumentStoreError, DocumentStoreResult},
    inflect,
};

/// Name of the implicit identity attribute.
pub const ID: &str = "id";
/// Name of the implicit revision attribute.
pub const REV: &str = "rev";

/// The declared type of an attribute.
///
/// Declared types describe what an attribute is expected to hold. Assigning a value of another
/// type is logged but not rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// A JSON string.
    Text,
    /// An integral JSON number.
    Number,
    /// Any JSON number.
    Decimal,
    /// A JSON boolean.
    Boolean,
    /// An RFC 3339 timestamp or ISO 8601 date, stored as a string.
    Time,
    /// A JSON array of scalars.
    List,
    /// Anything.
    #[default]
    Any,
}

impl AttributeType {
    /// Returns whether `value` is acceptable for this declared type.
    ///
    /// `null` is the absent value and is accepted by every type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) | (AttributeType::Any, _) => true,
            (AttributeType::Text, Value::String(_)) => true,
            (AttributeType::Number, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (AttributeType::Decimal, Value::Number(_)) => true,
            (AttributeType::Boolean, Value::Bool(_)) => true,
            (AttributeType::Time, Value::String(s)) => {
                chrono::DateTime::parse_from_rfc3339(s).is_ok()
                    || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
            }
            (AttributeType::List, Value::Array(_)) => true,
            _ => false,
        }
    }
}

/// Options accepted when declaring an attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeOptions {
    pub declared_type: AttributeType,
    pub default_value: Value,
}

impl AttributeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the declared type.
    pub fn of_type(mut self, declared_type: AttributeType) -> Self {
        self.declared_type = declared_type;
        self
    }

    /// Sets the value a freshly constructed record starts with.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = value.into();
        self
    }
}

/// Options accepted when declaring an association.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationOptions {
    /// Overrides the target type inferred from the association name.
    pub target_type: Option<String>,
}

impl AssociationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target record type explicitly.
    pub fn target(mut self, target_type: impl Into<String>) -> Self {
        self.target_type = Some(target_type.into());
        self
    }
}

/// Metadata of a single attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDef {
    name: String,
    wire_name: String,
    declared_type: AttributeType,
    default_value: Value,
}

impl AttributeDef {
    fn new(name: &str, options: AttributeOptions) -> Self {
        Self {
            name: name.to_string(),
            wire_name: wire_name(name),
            declared_type: options.declared_type,
            default_value: options.default_value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field name used in stored documents: `_id` and `_rev` for the identity attributes,
    /// the attribute name otherwise.
    pub fn wire_name(&self) -> &str {
        &self.wire_name
    }

    pub fn declared_type(&self) -> AttributeType {
        self.declared_type
    }

    pub fn default_value(&self) -> &Value {
        &self.default_value
    }
}

fn wire_name(name: &str) -> String {
    match name {
        ID => "_id".to_string(),
        REV => "_rev".to_string(),
        _ => name.to_string(),
    }
}

/// Metadata of a one-to-many association.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssociationDef {
    name: String,
    target_type: String,
}

impl AssociationDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resolved name of the record type children are built as.
    pub fn target_type(&self) -> &str {
        &self.target_type
    }
}

/// An association as declared, before its target has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AssociationDecl {
    name: String,
    target_type: Option<String>,
}

/// The declaration of one record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    name: String,
    parent: Option<String>,
    database_name: Option<String>,
    attributes: Vec<AttributeDef>,
    associations: Vec<AssociationDecl>,
}

impl RecordType {
    /// Creates an empty base type declaration.
    ///
    /// Nested types are named with `::`, e.g. `Invoice::Lineitem`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            database_name: None,
            attributes: Vec::new(),
            associations: Vec::new(),
        }
    }

    /// Creates a builder for fluent declaration.
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Makes this type a subtype of `parent`.
    pub fn extend(&mut self, parent: impl Into<String>) -> &mut Self {
        self.parent = Some(parent.into());
        self
    }

    /// Replaces database name inference with a fixed name.
    pub fn set_database_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.database_name = Some(name.into());
        self
    }

    /// Declares an attribute, replacing any earlier declaration of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDeclaration`] if `name` is not an identifier.
    pub fn declare_attribute(
        &mut self,
        name: &str,
        options: AttributeOptions,
    ) -> DocumentStoreResult<&mut Self> {
        check_identifier(name, "attribute")?;

        let def = AttributeDef::new(name, options);
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => *existing = def,
            None => self.attributes.push(def),
        }

        Ok(self)
    }

    /// Declares a one-to-many association, replacing any earlier declaration of the same name.
    ///
    /// Unless `options.target_type` is set, the target is the singularized, camelized name,
    /// looked up first as a type nested in the declaring type, then as a top-level type.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDeclaration`] if `name` is not an identifier.
    pub fn declare_association(
        &mut self,
        name: &str,
        options: AssociationOptions,
    ) -> DocumentStoreResult<&mut Self> {
        check_identifier(name, "association")?;

        let decl = AssociationDecl {
            name: name.to_string(),
            target_type: options.target_type,
        };
        match self.associations.iter_mut().find(|a| a.name == name) {
            Some(existing) => *existing = decl,
            None => self.associations.push(decl),
        }

        Ok(self)
    }
}

/// Fluent builder for [`RecordType`].
///
/// Declaration errors are kept until [`RecordTypeBuilder::build`], which reports the first one.
#[derive(Debug)]
pub struct RecordTypeBuilder {
    decl: RecordType,
    error: Option<DocumentStoreError>,
}

impl RecordTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { decl: RecordType::new(name), error: None }
    }

    /// Makes the type a subtype of `parent`.
    pub fn extends(mut self, parent: impl Into<String>) -> Self {
        self.decl.extend(parent);
        self
    }

    /// Overrides the inferred database name.
    pub fn database_name(mut self, name: impl Into<String>) -> Self {
        self.decl.set_database_name(name);
        self
    }

    /// Declares an attribute.
    pub fn has(mut self, name: &str, options: AttributeOptions) -> Self {
        if let Err(err) = self.decl.declare_attribute(name, options) {
            self.error.get_or_insert(err);
        }
        self
    }

    /// Declares a one-to-many association.
    pub fn has_many(mut self, name: &str, options: AssociationOptions) -> Self {
        if let Err(err) = self.decl.declare_association(name, options) {
            self.error.get_or_insert(err);
        }
        self
    }

    /// Finishes the declaration.
    ///
    /// # Errors
    ///
    /// Returns the first declaration error encountered.
    pub fn build(self) -> DocumentStoreResult<RecordType> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.decl),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

fn check_identifier(name: &str, what: &str) -> DocumentStoreResult<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(DocumentStoreError::InvalidDeclaration(format!(
            "{what} name {name:?} is not an identifier"
        )))
    }
}

fn check_type_name(name: &str) -> DocumentStoreResult<()> {
    if name.split("::").all(is_identifier) {
        Ok(())
    } else {
        Err(DocumentStoreError::InvalidDeclaration(format!(
            "record type name {name:?} is not a type path"
        )))
    }
}

/// The resolved, effective schema of a record type.
///
/// Schemas are immutable and shared between every record of the type.
#[derive(Debug)]
pub struct Schema {
    name: String,
    base: String,
    database_name: String,
    attributes: Vec<AttributeDef>,
    associations: Vec<AssociationDef>,
    connection: Option<SharedTransport>,
}

impl Schema {
    /// The record type name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base type of the inheritance chain; owns the database name.
    pub fn base_name(&self) -> &str {
        &self.base
    }

    /// The database documents of this type are stored in.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Every attribute, `id` and `rev` first, then ancestors' declarations, then the type's own.
    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn associations(&self) -> &[AssociationDef] {
        &self.associations
    }

    pub fn association(&self, name: &str) -> Option<&AssociationDef> {
        self.associations.iter().find(|a| a.name == name)
    }

    /// The transport bound to this type or its nearest ancestor.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::NotConnected`] if no transport is bound.
    pub fn connection(&self) -> DocumentStoreResult<&SharedTransport> {
        self.connection
            .as_ref()
            .ok_or_else(|| DocumentStoreError::NotConnected(self.name.clone()))
    }
}

/// Registry of record type declarations and their transport bindings.
///
/// The registry is configured with `&mut self` at startup and shared afterwards (usually behind
/// an `Arc`). Resolved schemas are computed once per type and cached.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    types: HashMap<String, RecordType>,
    connections: HashMap<String, SharedTransport>,
    resolved: RwLock<HashMap<String, Arc<Schema>>>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a record type declaration, replacing any earlier one with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentStoreError::InvalidDeclaration`] if the type name is not a `::`-separated
    /// path of identifiers.
    pub fn register(&mut self, decl: RecordType) -> DocumentStoreResult<&mut Self> {
        check_type_name(&decl.name)?;

        self.types.insert(decl.name.clone(), decl);
        self.invalidate();

        Ok(self)
    }

    /// Binds a transport to a record type and, by inheritance, to its subtypes.
    pub fn connect<T>(&mut self, type_name: &str, transport: T) -> &mut Self
    where
        T: Transport + 'static,
    {
        self.connect_shared(type_name, Arc::new(transport))
    }

    /// Binds an already shared transport to a record type.
    pub fn connect_shared(&mut self, type_name: &str, transport: SharedTransport) -> &mut Self {
        self.connections.insert(type_name.to_string(), transport);
        self.invalidate();
        self
    }

    fn invalidate(&mut self) {
        self.resolved
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Returns whether a type with this name is registered.
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Returns the declaration registered under `type_name`.
    pub fn declaration(&self, type_name: &str) -> Option<&RecordType> {
        self.types.get(type_name)
    }

    /// Resolves the effective schema of a record type.
    ///
    /// # Errors
    ///
    /// - [`DocumentStoreError::UnknownType`] if no such type is registered
    /// - [`DocumentStoreError::Hierarchy`] if its parent chain is broken or cyclic
    pub fn schema(&self, type_name: &str) -> DocumentStoreResult<Arc<Schema>> {
        if !self.types.contains_key(type_name) {
            return Err(DocumentStoreError::UnknownType(type_name.to_string()));
        }

        self.resolve(type_name, &mut Vec::new())
    }

    /// Returns the database name of a record type.
    pub fn database_name(&self, type_name: &str) -> DocumentStoreResult<String> {
        Ok(self.schema(type_name)?.database_name().to_string())
    }

    fn cached(&self, type_name: &str) -> Option<Arc<Schema>> {
        self.resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(type_name)
            .cloned()
    }

    fn resolve(&self, type_name: &str, visiting: &mut Vec<String>) -> DocumentStoreResult<Arc<Schema>> {
        if let Some(schema) = self.cached(type_name) {
            return Ok(schema);
        }

        if visiting.iter().any(|seen| seen == type_name) {
            return Err(DocumentStoreError::Hierarchy(
                visiting[0].clone(),
                format!("inheritance cycle through {type_name}"),
            ));
        }
        visiting.push(type_name.to_string());

        let decl = self.types.get(type_name).ok_or_else(|| {
            DocumentStoreError::Hierarchy(
                visiting[0].clone(),
                format!("{type_name} is not a registered record type"),
            )
        })?;

        let schema = match &decl.parent {
            Some(parent) => {
                let parent = self.resolve(parent, visiting)?;
                self.compose(decl, Some(&parent), visiting)?
            }
            None => self.compose(decl, None, visiting)?,
        };
        visiting.pop();

        let schema = Arc::new(schema);
        self.resolved
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_name.to_string(), schema.clone());

        Ok(schema)
    }

    /// Merges `decl` over its parent's schema, or over the implicit identity attributes for a
    /// base type.
    fn compose(
        &self,
        decl: &RecordType,
        parent: Option<&Schema>,
        visiting: &mut Vec<String>,
    ) -> DocumentStoreResult<Schema> {
        let (base, mut attributes, mut associations, inherited_db, inherited_connection) = match parent {
            Some(parent) => (
                parent.base.clone(),
                parent.attributes.clone(),
                parent.associations.clone(),
                Some(parent.database_name.clone()),
                parent.connection.clone(),
            ),
            None => (
                decl.name.clone(),
                vec![
                    AttributeDef::new(ID, AttributeOptions::new().of_type(AttributeType::Text)),
                    AttributeDef::new(REV, AttributeOptions::new().of_type(AttributeType::Text)),
                ],
                Vec::new(),
                None,
                None,
            ),
        };

        for attribute in &decl.attributes {
            match attributes.iter_mut().find(|a| a.name == attribute.name) {
                Some(existing) => *existing = attribute.clone(),
                None => attributes.push(attribute.clone()),
            }
        }

        for association in &decl.associations {
            let resolved = AssociationDef {
                name: association.name.clone(),
                target_type: self.association_target(&decl.name, association),
            };
            match associations.iter_mut().find(|a| a.name == association.name) {
                Some(existing) => *existing = resolved,
                None => associations.push(resolved),
            }
        }

        let database_name = match (&decl.database_name, inherited_db) {
            (Some(name), _) => name.clone(),
            (None, Some(name)) => name,
            (None, None) => self.infer_database_name(&decl.name, visiting)?,
        };

        Ok(Schema {
            name: decl.name.clone(),
            base,
            database_name,
            attributes,
            associations,
            connection: self
                .connections
                .get(&decl.name)
                .cloned()
                .or(inherited_connection),
        })
    }

    fn association_target(&self, owner: &str, association: &AssociationDecl) -> String {
        if let Some(target) = &association.target_type {
            return target.clone();
        }

        let simple = inflect::camelize(&inflect::singularize(&association.name));
        let nested = format!("{owner}::{simple}");
        if self.types.contains_key(&nested) {
            nested
        } else {
            simple
        }
    }

    fn infer_database_name(
        &self,
        type_name: &str,
        visiting: &mut Vec<String>,
    ) -> DocumentStoreResult<String> {
        let own = inflect::pluralize(&inflect::underscore(inflect::demodulize(type_name)));

        match inflect::deconstantize(type_name) {
            Some(enclosing) if self.types.contains_key(enclosing) => {
                let enclosing = self.resolve(enclosing, visiting)?;
                Ok(format!(
                    "{}_{}",
                    inflect::singularize(enclosing.database_name()),
                    own
                ))
            }
            _ => Ok(own),
        }
    }
}
