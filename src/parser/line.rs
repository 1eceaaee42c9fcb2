//! Single-line classification.
//!
//! Matchers are tried in a fixed order and the first hit wins. Each one
//! yields a [`LineMatch`] variant; lines nothing recognizes yield `None`.

use super::FallbackPolicy;
use crate::key::DottedKey;
use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•\-*]\s*").unwrap());

static CHAPTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^chapter\s+([0-9]+)[\s:.\-]*(.*)").unwrap());

// ".0" must end the number: "1.0.1 Foo" and "10.05 Bar" are numbered entries.
// Titles run to the end of the first line only; digits are ASCII.
static SECTION_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\.0(?:\.?(?:$|[\s:\-][\s:.\-]*))(.*)").unwrap());

static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)+)[\s:.\-]+(.+)").unwrap());

static ARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^article\s+([0-9]+)[\s:.\-]*(.*)").unwrap());

static FALLBACK_LENIENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)[\s:.\-]+(.+)").unwrap());

static FALLBACK_STRICT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)\s*[:.][\s:.\-]*(.+)").unwrap());

/// Which matcher recognized a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Chapter,
    SectionHeader,
    Numbered,
    Article,
    Fallback,
}

impl LineKind {
    /// Every matcher, in the order they are tried.
    pub const ALL: [LineKind; 5] = [
        LineKind::Chapter,
        LineKind::SectionHeader,
        LineKind::Numbered,
        LineKind::Article,
        LineKind::Fallback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Chapter => "chapter",
            LineKind::SectionHeader => "section header",
            LineKind::Numbered => "numbered",
            LineKind::Article => "article",
            LineKind::Fallback => "fallback",
        }
    }
}

/// Typed outcome of matching one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineMatch {
    /// `Chapter <n>[: title]`
    Chapter { number: String, title: String },
    /// `<n>.0[: title]`
    SectionHeader { number: String, title: String },
    /// `<n>.<m>[.<k>...] title`
    Numbered { key: String, title: String },
    /// `Article <n>[: title]`
    Article { number: String, title: String },
    /// `<n> title`, filed under `<n>.1`.
    Fallback { number: String, title: String },
}

impl LineMatch {
    /// Which matcher produced this.
    pub fn kind(&self) -> LineKind {
        match self {
            LineMatch::Chapter { .. } => LineKind::Chapter,
            LineMatch::SectionHeader { .. } => LineKind::SectionHeader,
            LineMatch::Numbered { .. } => LineKind::Numbered,
            LineMatch::Article { .. } => LineKind::Article,
            LineMatch::Fallback { .. } => LineKind::Fallback,
        }
    }

    /// Dotted key text and title, with empty header titles filled in.
    pub fn key_and_title(&self) -> (String, String) {
        fn or_default(title: &str, default: String) -> String {
            if title.is_empty() { default } else { title.to_string() }
        }

        match self {
            LineMatch::Chapter { number, title } => {
                (format!("{number}.0"), or_default(title, format!("Chapter {number}")))
            }
            LineMatch::SectionHeader { number, title } => {
                (format!("{number}.0"), or_default(title, format!("Section {number}")))
            }
            LineMatch::Numbered { key, title } => (key.clone(), title.clone()),
            LineMatch::Article { number, title } => {
                (format!("{number}.0"), or_default(title, format!("Article {number}")))
            }
            LineMatch::Fallback { number, title } => (format!("{number}.1"), title.clone()),
        }
    }

    /// Dotted key for this match.
    ///
    /// `None` only if the captured digits cannot form a key, which the
    /// patterns above rule out.
    pub fn key(&self) -> Option<DottedKey> {
        DottedKey::parse(&self.key_and_title().0).ok()
    }
}

/// Remove one leading `•`, `-` or `*` marker and the whitespace after it.
pub fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    match BULLET_MARKER.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    }
}

/// Classify one line. The line is trimmed and bullet-stripped first.
pub fn match_line(line: &str, fallback: FallbackPolicy) -> Option<LineMatch> {
    let line = strip_bullet(line);

    if let Some((number, title)) = captured(&CHAPTER, line) {
        return Some(LineMatch::Chapter { number, title });
    }
    if let Some((number, title)) = captured(&SECTION_HEADER, line) {
        return Some(LineMatch::SectionHeader { number, title });
    }
    if let Some((key, title)) = captured(&NUMBERED, line) {
        return Some(LineMatch::Numbered { key, title });
    }
    if let Some((number, title)) = captured(&ARTICLE, line) {
        return Some(LineMatch::Article { number, title });
    }

    let fallback_re = match fallback {
        FallbackPolicy::Lenient => &FALLBACK_LENIENT,
        FallbackPolicy::Strict => &FALLBACK_STRICT,
        FallbackPolicy::Off => return None,
    };
    captured(fallback_re, line).map(|(number, title)| LineMatch::Fallback { number, title })
}

/// First two capture groups, trimmed.
fn captured(re: &Regex, line: &str) -> Option<(String, String)> {
    let caps = re.captures(line)?;
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).trim().to_string();
    Some((group(1), group(2)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient(line: &str) -> Option<(String, String)> {
        match_line(line, FallbackPolicy::Lenient).map(|m| m.key_and_title())
    }

    fn pair(key: &str, title: &str) -> Option<(String, String)> {
        Some((key.to_string(), title.to_string()))
    }

    #[test]
    fn test_chapter_lines() {
        assert_eq!(lenient("Chapter 1: Introduction"), pair("1.0", "Introduction"));
        assert_eq!(lenient("CHAPTER 3 Finance-"), pair("3.0", "Finance-"));
        assert_eq!(lenient("Chapter 2"), pair("2.0", "Chapter 2"));
        assert_eq!(lenient("chapter 4."), pair("4.0", "Chapter 4"));
    }

    #[test]
    fn test_section_header_lines() {
        assert_eq!(lenient("1.0 Background"), pair("1.0", "Background"));
        assert_eq!(lenient("2.0. Management Concepts"), pair("2.0", "Management Concepts"));
        assert_eq!(lenient("1.0:"), pair("1.0", "Section 1"));
        assert_eq!(lenient("5.0"), pair("5.0", "Section 5"));
    }

    #[test]
    fn test_zero_prefix_is_not_a_header() {
        let m = match_line("1.0.1 Early history", FallbackPolicy::Lenient).unwrap();
        assert_eq!(m.kind(), LineKind::Numbered);
        assert_eq!(m.key_and_title(), ("1.0.1".into(), "Early history".into()));

        assert_eq!(lenient("10.05 Controls"), pair("10.05", "Controls"));
    }

    #[test]
    fn test_numbered_lines() {
        assert_eq!(lenient("1.1: introduction"), pair("1.1", "introduction"));
        assert_eq!(lenient("1.1. introduction"), pair("1.1", "introduction"));
        assert_eq!(lenient("2.3.1. Credit Policies"), pair("2.3.1", "Credit Policies"));
        assert_eq!(lenient("4.2.1.7 - Deep"), pair("4.2.1.7", "Deep"));
    }

    #[test]
    fn test_article_lines() {
        assert_eq!(lenient("Article 6. Rights and Duties"), pair("6.0", "Rights and Duties"));
        assert_eq!(lenient("article 1."), pair("1.0", "Article 1"));
    }

    #[test]
    fn test_bullet_markers_stripped() {
        assert_eq!(lenient("• 1.1 Overview"), pair("1.1", "Overview"));
        assert_eq!(lenient("- Chapter 1: Basics"), pair("1.0", "Basics"));
        assert_eq!(lenient("  *1.2 Summary  "), pair("1.2", "Summary"));
    }

    #[test]
    fn test_unmatched_lines() {
        assert_eq!(lenient("Random text with no numbering"), None);
        assert_eq!(lenient(""), None);
    }

    #[test]
    fn test_fallback_policies() {
        assert_eq!(lenient("3 easy steps to success"), pair("3.1", "easy steps to success"));
        assert_eq!(
            match_line("3 easy steps to success", FallbackPolicy::Strict),
            None
        );
        assert_eq!(
            match_line("3: Closing remarks", FallbackPolicy::Strict).map(|m| m.key_and_title()),
            pair("3.1", "Closing remarks")
        );
        assert_eq!(match_line("3: Closing remarks", FallbackPolicy::Off), None);
    }

    #[test]
    fn test_title_stops_at_line_break() {
        assert_eq!(lenient("1.1 Overview\nDetails follow"), pair("1.1", "Overview"));
        assert_eq!(lenient("Chapter 2: Ledgers\n\nnotes"), pair("2.0", "Ledgers"));
    }

    #[test]
    fn test_non_ascii_digits_fall_through() {
        // Arabic-Indic one is not a key digit, so only the leading "1" counts.
        let m = match_line("1.\u{0661} Foo", FallbackPolicy::Lenient).unwrap();
        assert_eq!(m.kind(), LineKind::Fallback);
        assert_eq!(m.key_and_title(), ("1.1".into(), "\u{0661} Foo".into()));
        assert_eq!(match_line("\u{0661}.1 Foo", FallbackPolicy::Lenient), None);
    }

    #[test]
    fn test_key_is_valid() {
        let m = match_line("Chapter 7", FallbackPolicy::Lenient).unwrap();
        assert_eq!(m.key().unwrap().as_str(), "7.0");
    }
}
