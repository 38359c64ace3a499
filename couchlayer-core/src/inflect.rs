//! English inflection helpers used to infer database names and association targets.
//!
//! The rules follow the common Rails-style inflector closely enough for identifier-shaped
//! input: lowercase snake_case words for [`pluralize`] and [`singularize`], CamelCase type
//! names for [`underscore`], `::`-separated paths for [`demodulize`].

const UNCOUNTABLE: [&str; 10] = [
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "jeans",
    "police",
];

const IRREGULAR: [(&str, &str); 11] = [
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("sex", "sexes"),
    ("move", "moves"),
    ("mouse", "mice"),
    ("louse", "lice"),
    ("ox", "oxen"),
    ("tooth", "teeth"),
    ("goose", "geese"),
];

/// Splits `word` into its last `_`-separated segment and everything before it, so that rules
/// only ever look at the final word of a compound name.
fn split_last(word: &str) -> (&str, &str) {
    match word.rfind('_') {
        Some(idx) => (&word[..=idx], &word[idx + 1..]),
        None => ("", word),
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Returns the char before a suffix of `len` bytes, if any.
fn before(word: &str, len: usize) -> Option<char> {
    word.len()
        .checked_sub(len)
        .and_then(|end| word[..end].chars().last())
}

fn replace_suffix(word: &str, len: usize, with: &str) -> String {
    format!("{}{}", &word[..word.len() - len], with)
}

/// Returns the plural form of a lowercase word.
///
/// ```ignore
/// assert_eq!(pluralize("invoice"), "invoices");
/// assert_eq!(pluralize("line_item"), "line_items");
/// assert_eq!(pluralize("category"), "categories");
/// ```
pub fn pluralize(word: &str) -> String {
    let (head, last) = split_last(word);
    if last.is_empty() {
        return word.to_string();
    }

    format!("{}{}", head, pluralize_word(last))
}

fn pluralize_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(single, _)| *single == word) {
        return plural.to_string();
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == word) {
        return word.to_string();
    }

    if word.ends_with("quiz") {
        return format!("{word}zes");
    }
    if word.ends_with("matrix") {
        return replace_suffix(word, 2, "ices");
    }
    if word.ends_with("vertex") || word.ends_with("index") {
        return replace_suffix(word, 2, "ices");
    }
    if word.ends_with("octopus") || word.ends_with("virus") {
        return replace_suffix(word, 2, "i");
    }
    if word.ends_with("sis") {
        return replace_suffix(word, 2, "es");
    }
    if word.ends_with("us") {
        return format!("{word}es");
    }
    if ["x", "ch", "ss", "sh", "zz"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }
    if word.ends_with('s') {
        return word.to_string();
    }
    if word.ends_with('y') && (word.ends_with("quy") || before(word, 1).is_some_and(|c| !is_vowel(c) && c != 'y')) {
        return replace_suffix(word, 1, "ies");
    }
    if word.ends_with("ium") || word.ends_with("tum") {
        return replace_suffix(word, 2, "a");
    }
    if word.ends_with("hive") {
        return format!("{word}s");
    }
    if word.ends_with("fe") && before(word, 2).is_some_and(|c| c != 'f') {
        return replace_suffix(word, 2, "ves");
    }
    if word.ends_with("lf") || word.ends_with("rf") {
        return replace_suffix(word, 1, "ves");
    }
    if ["buffalo", "tomato", "potato", "hero", "echo"].iter().any(|s| word.ends_with(s)) {
        return format!("{word}es");
    }

    format!("{word}s")
}

/// Returns the singular form of a lowercase word.
///
/// ```ignore
/// assert_eq!(singularize("invoices"), "invoice");
/// assert_eq!(singularize("line_items"), "line_item");
/// assert_eq!(singularize("categories"), "category");
/// ```
pub fn singularize(word: &str) -> String {
    let (head, last) = split_last(word);
    if last.is_empty() {
        return word.to_string();
    }

    format!("{}{}", head, singularize_word(last))
}

fn singularize_word(word: &str) -> String {
    if UNCOUNTABLE.contains(&word) {
        return word.to_string();
    }
    if let Some((single, _)) = IRREGULAR.iter().find(|(_, plural)| *plural == word) {
        return single.to_string();
    }
    if IRREGULAR.iter().any(|(single, _)| *single == word) {
        return word.to_string();
    }

    if word.ends_with("databases") {
        return replace_suffix(word, 1, "");
    }
    if word.ends_with("quizzes") {
        return replace_suffix(word, 3, "");
    }
    if word.ends_with("matrices") {
        return replace_suffix(word, 4, "x");
    }
    if word.ends_with("vertices") || word.ends_with("indices") {
        return replace_suffix(word, 4, "ex");
    }
    if word.ends_with("octopi") || word.ends_with("viri") {
        return replace_suffix(word, 1, "us");
    }
    if word.ends_with("uses") {
        return replace_suffix(word, 2, "");
    }
    if word.ends_with("us") || word.ends_with("ss") {
        return word.to_string();
    }
    if word.ends_with("axes") || word.ends_with("crises") || word.ends_with("testes") {
        return replace_suffix(word, 2, "is");
    }
    if ["analyses", "bases", "diagnoses", "parentheses", "prognoses", "synopses", "theses"]
        .iter()
        .any(|s| word.ends_with(s))
    {
        return replace_suffix(word, 2, "is");
    }
    if word.ends_with("shoes") {
        return replace_suffix(word, 1, "");
    }
    if ["buffaloes", "tomatoes", "potatoes", "heroes", "echoes"].iter().any(|s| word.ends_with(s)) {
        return replace_suffix(word, 2, "");
    }
    if ["xes", "ches", "sses", "shes", "zzes"].iter().any(|s| word.ends_with(s)) {
        return replace_suffix(word, 2, "");
    }
    if word.ends_with("movies") {
        return replace_suffix(word, 1, "");
    }
    if word.ends_with("ies") && (word.ends_with("quies") || before(word, 3).is_some_and(|c| !is_vowel(c) && c != 'y')) {
        return replace_suffix(word, 3, "y");
    }
    if word.ends_with("lves") || word.ends_with("rves") {
        return replace_suffix(word, 3, "f");
    }
    if word.ends_with("tives") || word.ends_with("hives") {
        return replace_suffix(word, 1, "");
    }
    if word.ends_with("ves") && before(word, 3).is_some_and(|c| c != 'f') {
        return replace_suffix(word, 3, "fe");
    }
    if word.ends_with("news") {
        return word.to_string();
    }
    if word.ends_with("ia") || word.ends_with("ta") {
        return replace_suffix(word, 1, "um");
    }
    if word.ends_with('s') {
        return replace_suffix(word, 1, "");
    }

    word.to_string()
}

/// Converts a CamelCase name to snake_case.
///
/// Runs of capitals are treated as one word: `HTTPRequest` becomes `http_request`.
pub fn underscore(name: &str) -> String {
    let chars = name.chars().collect::<Vec<_>>();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());

            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}

/// Converts a snake_case name to CamelCase.
pub fn camelize(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Strips the module path from a `::`-separated type name.
pub fn demodulize(name: &str) -> &str {
    match name.rfind("::") {
        Some(idx) => &name[idx + 2..],
        None => name,
    }
}

/// Returns the enclosing path of a `::`-separated type name, if it has one.
pub fn deconstantize(name: &str) -> Option<&str> {
    name.rfind("::").map(|idx| &name[..idx])
}
