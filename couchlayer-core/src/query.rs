//! Find scopes and view-query construction.
//!
//! Lookups other than a fetch by id go through a store-side view named after the filtered
//! field. A filter on `name` queries the view `by_name` in the design document `by_name`:
//!
//! ```ignore
//! use couchlayer::query::{FindOptions, view_path};
//!
//! let options = FindOptions::builder().by("name", "McLovin").build();
//! assert_eq!(
//!     view_path("people", &options)?,
//!     "/people/_view/by_name/by_name?key=McLovin"
//! );
//! ```
//!
//! Callers with their own views pass the full request path with [`FindOptionsBuilder::from`].

use serde_json::{Map, Value};

use crate::error::{DocumentStoreError, DocumentStoreResult};

/// What a find returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every record in the view result.
    All,
    /// The first record of the view result, if any.
    First,
    /// The record stored under this id, if any.
    Id(String),
}

/// Options of a view-backed find.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// A mapping with exactly one `field: value` entry.
    pub filter: Option<Value>,
    /// A request path used verbatim instead of the `by_{field}` convention.
    pub from: Option<String>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> FindOptionsBuilder {
        FindOptionsBuilder::default()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FindOptionsBuilder {
    options: FindOptions,
}

impl FindOptionsBuilder {
    /// Filters on a single field.
    pub fn by(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut filter = Map::new();
        filter.insert(field.into(), value.into());
        self.options.filter = Some(Value::Object(filter));
        self
    }

    /// Sets a raw filter value. It must be a mapping with exactly one entry when the find runs.
    pub fn filter(mut self, filter: Value) -> Self {
        self.options.filter = Some(filter);
        self
    }

    /// Queries this path verbatim.
    pub fn from(mut self, path: impl Into<String>) -> Self {
        self.options.from = Some(path.into());
        self
    }

    pub fn build(self) -> FindOptions {
        self.options
    }
}

/// Returns the request path of a view-backed find against `database_name`.
///
/// # Errors
///
/// Returns [`DocumentStoreError::Argument`] when no `from` path is given and the filter is
/// missing or is not a mapping with exactly one entry.
pub fn view_path(database_name: &str, options: &FindOptions) -> DocumentStoreResult<String> {
    if let Some(from) = &options.from {
        return Ok(from.clone());
    }

    let (field, value) = match &options.filter {
        Some(Value::Object(filter)) if filter.len() == 1 => filter
            .iter()
            .next()
            .ok_or_else(|| DocumentStoreError::Argument("empty filter".to_string()))?,
        Some(other) => {
            return Err(DocumentStoreError::Argument(format!(
                "filter must be a mapping with exactly one entry, got {other}"
            )));
        }
        None => {
            return Err(DocumentStoreError::Argument(
                "find needs a filter or a from path".to_string(),
            ));
        }
    };

    Ok(format!(
        "/{database_name}/_view/by_{field}/by_{field}?key={}",
        urlencode(&key_text(value))
    ))
}

/// Strings are used as they are, every other value as its JSON text.
fn key_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Form-encodes a query value: a space becomes `+`.
pub fn urlencode(s: &str) -> String {
    encode(s, "+")
}

/// Percent-encodes one path segment: a space becomes `%20` and `+` is escaped.
pub fn encode_segment(s: &str) -> String {
    encode(s, "%20")
}

fn encode(s: &str, space: &str) -> String {
    let mut encoded = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => encoded.push(ch),
            ' ' => encoded.push_str(space),
            _ => {
                let mut buf = [0u8; 4];
                for byte in ch.encode_utf8(&mut buf).bytes() {
                    encoded.push_str(&format!("%{byte:02X}"));
                }
            }
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn builds_view_path_from_single_filter() {
        let options = FindOptions::builder().by("name", "McLovin").build();
        assert_eq!(
            view_path("people", &options).unwrap(),
            "/people/_view/by_name/by_name?key=McLovin"
        );
    }

    #[test]
    fn encodes_keys() {
        let options = FindOptions::builder().by("name", "Fogell McLovin").build();
        assert_eq!(
            view_path("people", &options).unwrap(),
            "/people/_view/by_name/by_name?key=Fogell+McLovin"
        );

        let options = FindOptions::builder().by("age", 17).build();
        assert_eq!(
            view_path("people", &options).unwrap(),
            "/people/_view/by_age/by_age?key=17"
        );
        assert_eq!(urlencode("a/b&c=é"), "a%2Fb%26c%3D%C3%A9");
    }

    #[test]
    fn path_segments_keep_plus_and_space_apart() {
        assert_eq!(encode_segment("my doc"), "my%20doc");
        assert_eq!(encode_segment("a+b"), "a%2Bb");
        assert_eq!(encode_segment("a/b"), "a%2Fb");
    }

    #[test]
    fn from_path_is_verbatim() {
        let options = FindOptions::builder()
            .by("name", "ignored")
            .from("/people/_design/custom/_view/all")
            .build();
        assert_eq!(
            view_path("people", &options).unwrap(),
            "/people/_design/custom/_view/all"
        );
    }

    #[test]
    fn rejects_missing_or_malformed_filters() {
        let malformed = [
            FindOptions::new(),
            FindOptions::builder().filter(json!({})).build(),
            FindOptions::builder().filter(json!({"a": 1, "b": 2})).build(),
            FindOptions::builder().filter(json!("name")).build(),
        ];

        for options in &malformed {
            assert!(matches!(
                view_path("people", options).unwrap_err(),
                DocumentStoreError::Argument(_)
            ));
        }
    }
}
