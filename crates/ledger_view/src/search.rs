//! Free-text search over the filtered set.
//!
//! Search runs on every keystroke, but terms of one or two characters are
//! too broad to be useful: they leave the current set untouched until the
//! user types a third character (or clears the field).

use crate::Record;

/// Shortest non-empty term that triggers a search.
pub const MIN_TERM_CHARS: usize = 3;

/// Whether `term` should (re)filter the set: empty or at least
/// [`MIN_TERM_CHARS`] characters long.
pub fn is_active(term: &str) -> bool {
    let chars = term.chars().count();
    chars == 0 || chars >= MIN_TERM_CHARS
}

/// Case-insensitive containment over category, note, amount and kind.
pub fn matches(record: &Record, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let in_text = |value: Option<&str>| value.is_some_and(|v| v.to_lowercase().contains(&needle));

    in_text(record.category.as_deref())
        || in_text(record.note.as_deref())
        || record.amount.compact().contains(&needle)
        || record.kind.code().contains(&needle)
        || record.kind.label().to_lowercase().contains(&needle)
}

/// Applies `term` to `items`; inactive terms return `items` unchanged.
pub fn search(term: &str, items: &[Record]) -> Vec<Record> {
    if !is_active(term) {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|record| matches(record, term))
        .cloned()
        .collect()
}
