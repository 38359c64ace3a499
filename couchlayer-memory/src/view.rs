//! Emulation of `by_{field}` views.
//!
//! A view `by_{field}` emits every document that has a top-level `field`, keyed by that field's
//! value. Keys are compared in their query-string form: strings as they are, every other value as
//! its JSON text, so `?key=17` matches both `17` and `"17"`.

use serde_json::{Value, json};

/// Returns the field a `by_{field}` view indexes, or `None` for any other view name.
pub(crate) fn indexed_field(view: &str) -> Option<&str> {
    view.strip_prefix("by_").filter(|field| !field.is_empty())
}

fn key_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds a view result over `documents`, sorted by id.
///
/// Without a `key`, every document with the field is emitted.
pub(crate) fn query<'a>(
    documents: impl Iterator<Item = (&'a String, &'a Value)>,
    field: &str,
    key: Option<&str>,
) -> Value {
    let mut rows = documents
        .filter_map(|(id, document)| {
            let emitted = document.get(field)?;
            match key {
                Some(key) if key_text(emitted) != key => None,
                _ => Some((id, emitted, document)),
            }
        })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    let total = rows.len();
    let rows = rows
        .into_iter()
        .map(|(id, key, document)| json!({"id": id, "key": key, "value": document}))
        .collect::<Vec<_>>();

    json!({"total_rows": total, "offset": 0, "rows": rows})
}
