//! `#[derive(Model)]` expansion.

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, GenericArgument, Lit, LitStr, PathArguments, Type};

#[derive(Default)]
struct ModelAttrs {
    name: Option<LitStr>,
    database: Option<LitStr>,
    extends: Option<LitStr>,
}

#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    has_many: Option<Option<LitStr>>,
    kind: Option<LitStr>,
    default: Option<Lit>,
}

pub fn expand(input: DeriveInput) -> syn::Result<TokenStream> {
    let ModelAttrs { name, database, extends } = parse_model_attrs(&input.attrs)?;

    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named,
            _ => return Err(syn::Error::new_spanned(&input.ident, "Model needs named fields")),
        },
        _ => return Err(syn::Error::new_spanned(&input.ident, "Model can only be derived for structs")),
    };

    let type_name = name.unwrap_or_else(|| LitStr::new(&input.ident.to_string(), input.ident.span()));

    let mut declarations = Vec::new();
    for field in &named.named {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "field must have a name"))?;
        let field_name = ident.to_string().trim_start_matches("r#").to_string();
        let attrs = parse_field_attrs(&field.attrs)?;

        if attrs.skip || field_name == "id" || field_name == "rev" {
            continue;
        }

        if let Some(target) = attrs.has_many {
            let target = target.map(|t| quote! { .target(#t) });
            declarations.push(quote! {
                .has_many(#field_name, ::couchlayer::schema::AssociationOptions::new() #target)
            });
            continue;
        }

        let kind = match &attrs.kind {
            Some(kind) => kind_variant(kind)?,
            None => Ident::new(infer_kind(&field.ty), Span::call_site()),
        };
        let default = attrs.default.map(|lit| quote! { .default_value(#lit) });
        declarations.push(quote! {
            .has(
                #field_name,
                ::couchlayer::schema::AttributeOptions::new()
                    .of_type(::couchlayer::schema::AttributeType::#kind)
                    #default
            )
        });
    }

    let extends = extends.map(|parent| quote! { .extends(#parent) });
    let database = database.map(|db| quote! { .database_name(#db) });

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::couchlayer::model::Model for #ident #ty_generics #where_clause {
            fn type_name() -> &'static str {
                #type_name
            }

            fn record_type() -> ::couchlayer::error::DocumentStoreResult<::couchlayer::schema::RecordType> {
                ::couchlayer::schema::RecordType::builder(#type_name)
                    #extends
                    #database
                    #(#declarations)*
                    .build()
            }
        }
    })
}

fn parse_model_attrs(attrs: &[Attribute]) -> syn::Result<ModelAttrs> {
    let mut parsed = ModelAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("name") {
                parsed.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("database") {
                parsed.database = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("extends") {
                parsed.extends = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("expected `name`, `database` or `extends`"));
            }
            Ok(())
        })?;
    }

    Ok(parsed)
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut parsed = FieldAttrs::default();

    for attr in attrs.iter().filter(|a| a.path().is_ident("model")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                parsed.skip = true;
            } else if meta.path.is_ident("has_many") {
                parsed.has_many = Some(if meta.input.peek(syn::Token![=]) {
                    Some(meta.value()?.parse()?)
                } else {
                    None
                });
            } else if meta.path.is_ident("kind") {
                parsed.kind = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("default") {
                let lit: Lit = meta.value()?.parse()?;
                match lit {
                    Lit::Str(_) | Lit::Int(_) | Lit::Float(_) | Lit::Bool(_) => parsed.default = Some(lit),
                    other => return Err(syn::Error::new_spanned(other, "unsupported default literal")),
                }
            } else {
                return Err(meta.error("expected `skip`, `has_many`, `kind` or `default`"));
            }
            Ok(())
        })?;
    }

    if parsed.has_many.is_some() && (parsed.kind.is_some() || parsed.default.is_some()) {
        return Err(syn::Error::new(
            Span::call_site(),
            "`has_many` cannot be combined with `kind` or `default`",
        ));
    }

    Ok(parsed)
}

fn kind_variant(kind: &LitStr) -> syn::Result<Ident> {
    let variant = match kind.value().as_str() {
        "text" => "Text",
        "number" => "Number",
        "decimal" => "Decimal",
        "boolean" => "Boolean",
        "time" => "Time",
        "list" => "List",
        "any" => "Any",
        _ => {
            return Err(syn::Error::new_spanned(
                kind,
                "expected one of text, number, decimal, boolean, time, list, any",
            ));
        }
    };

    Ok(Ident::new(variant, kind.span()))
}

/// Maps a field type to an attribute type, looking through `Option` and references.
fn infer_kind(ty: &Type) -> &'static str {
    match ty {
        Type::Reference(reference) => infer_kind(&reference.elem),
        Type::Path(path) => match path.path.segments.last() {
            Some(segment) => match segment.ident.to_string().as_str() {
                "Option" => match &segment.arguments {
                    PathArguments::AngleBracketed(args) => match args.args.first() {
                        Some(GenericArgument::Type(inner)) => infer_kind(inner),
                        _ => "Any",
                    },
                    _ => "Any",
                },
                "String" | "str" | "char" => "Text",
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
                | "u128" | "usize" => "Number",
                "f32" | "f64" => "Decimal",
                "bool" => "Boolean",
                "DateTime" | "NaiveDate" | "NaiveDateTime" => "Time",
                "Vec" | "VecDeque" | "HashSet" | "BTreeSet" => "List",
                _ => "Any",
            },
            None => "Any",
        },
        Type::Array(_) | Type::Slice(_) => "List",
        _ => "Any",
    }
}
