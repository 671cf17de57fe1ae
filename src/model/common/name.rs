//! Comparison keys for personal names.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;

/// Case- and accent-insensitive form of `text`: canonical decomposition
/// with the combining diacritical marks dropped, then lowercased.
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Order names alphabetically, ignoring case and accents, with the raw
/// text breaking ties between names that fold to the same key.
pub fn compare(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// The first word of a full name.
pub fn first_name(full_name: &str) -> &str {
    full_name.split_whitespace().next().unwrap_or("")
}

/// Every word of a full name after the first.
pub fn surnames(full_name: &str) -> impl Iterator<Item = &str> {
    full_name.split_whitespace().skip(1)
}

/// Filter names by prefix. Names whose first name starts with `query` win;
/// if there are none, names with any surname starting with it are returned.
/// A blank query keeps everything.
pub fn prefix_search<T>(items: Vec<T>, query: &str, name: impl Fn(&T) -> &str) -> Vec<T> {
    let query = fold(query.trim());
    if query.is_empty() {
        return items;
    }

    let first_matches = |item: &T| fold(first_name(name(item))).starts_with(&query);
    if items.iter().any(first_matches) {
        return items.into_iter().filter(first_matches).collect();
    }
    items
        .into_iter()
        .filter(|item| surnames(name(item)).any(|part| fold(part).starts_with(&query)))
        .collect()
}
