//! Title clean-up applied to parsed outline entries.

/// Normalize an authored title.
///
/// Trailing dashes (`-`, `–`, `—`) are dropped. A shouting title longer than
/// three characters and free of parentheses becomes sentence case; otherwise
/// only a lowercase first letter is capitalized.
pub fn format_title(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }

    let title = title.trim_end_matches(['-', '–', '—']).trim();

    let mut chars = title.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();

    if title == title.to_uppercase() && title.chars().count() > 3 && !title.contains('(') {
        return format!("{}{}", first, rest.to_lowercase());
    }

    if first.to_lowercase().eq(std::iter::once(first)) {
        return format!("{}{}", first.to_uppercase(), rest);
    }

    title.to_string()
}
