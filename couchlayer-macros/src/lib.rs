//! Procedural macros for the couchlayer project.
//!
//! This crate provides compile-time code generation for couchlayer. Its derive macro turns a
//! plain struct into a record type declaration, so the schema of a type and its Rust
//! representation cannot drift apart.

#[allow(unused_extern_crates)]
extern crate self as couchlayer_macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod model;

/// Derives `couchlayer::model::Model` for a struct with named fields.
///
/// ```ignore
/// #[derive(Serialize, Deserialize, Model)]
/// #[model(name = "Invoice", database = "bills")]
/// pub struct Invoice {
///     pub id: Option<String>,
///     pub rev: Option<String>,
///     pub number: String,
///     #[model(default = false)]
///     pub paid: bool,
///     #[model(kind = "time")]
///     pub issued_at: Option<String>,
///     #[model(has_many)]
///     pub lineitems: Vec<Lineitem>,
///     #[model(skip)]
///     pub cached_total: Option<f64>,
/// }
/// ```
///
/// Struct options:
/// - `name` - record type name, defaults to the struct name
/// - `database` - database name override
/// - `extends` - parent record type
///
/// Field options:
/// - `has_many` or `has_many = "Target"` - declares an association instead of an attribute
/// - `kind` - one of `text`, `number`, `decimal`, `boolean`, `time`, `list`, `any`; inferred
///   from the field type when omitted
/// - `default` - a string, integer, float or boolean literal
/// - `skip` - declares nothing for the field
///
/// Fields named `id` and `rev` map onto the implicit identity attributes.
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
