//! FILENAME: core/engine/src/text.rs
//! PURPOSE: Case folding and collation for report text.
//! CONTEXT: Report labels are mostly Russian. Rust's Unicode lowercasing
//! handles Cyrillic; on top of that `ё` is folded onto `е` the way
//! Russian-locale comparison treats them at the primary level.

use std::cmp::Ordering;

/// Lowercase `text` and fold `ё` onto `е`.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ё' { 'е' } else { c })
        .collect()
}

/// Case-insensitive substring test. `needle` must already be folded.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    fold_case(haystack).contains(needle)
}

/// Locale-style comparison: folded text first, then lowercase with `ё`
/// intact, then the raw strings so the order is total.
pub fn collate(a: &str, b: &str) -> Ordering {
    fold_case(a)
        .cmp(&fold_case(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| b.cmp(a))
}
