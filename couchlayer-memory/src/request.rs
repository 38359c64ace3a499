//! Request path parsing.

use std::collections::HashMap;

/// A request path split into decoded segments and query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestPath {
    pub segments: Vec<String>,
    pub query: HashMap<String, String>,
}

impl RequestPath {
    pub(crate) fn parse(path: &str) -> Self {
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, query),
            None => (path, ""),
        };

        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(|segment| decode(segment, false))
            .collect();
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (decode(key, true), decode(value, true)),
                None => (decode(pair, true), String::new()),
            })
            .collect();

        Self { segments, query }
    }
}

/// Reverses percent encoding; `%XX` is a byte and, in query strings (`form`), `+` is a space.
/// Malformed escapes are kept as they are.
pub(crate) fn decode(s: &str, form: bool) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' if form => decoded.push(b' '),
            b'%' if i + 2 < bytes.len() => match (hex(bytes[i + 1]), hex(bytes[i + 2])) {
                (Some(high), Some(low)) => {
                    decoded.push((high << 4) | low);
                    i += 2;
                }
                _ => decoded.push(b'%'),
            },
            byte => decoded.push(byte),
        }
        i += 1;
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|digit| digit as u8)
}
