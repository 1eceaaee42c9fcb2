//! Bullet-list parsing.
//!
//! Turns the free-form bullets of a training module into a [`ParsedModule`]:
//!
//! 1. blank lines are skipped and repeated lines dropped;
//! 2. each line is classified by [`match_line`];
//! 3. items are sorted by dotted key ([`sort_topics`]);
//! 4. the sorted items are folded into chapters ([`build_hierarchy`]).
//!
//! Parsing is total: anything unrecognized is left out, never reported as an error.

mod line;
mod title;

pub use line::{LineKind, LineMatch, match_line, strip_bullet};
pub use title::format_title;

use crate::error::OutlineError;
use crate::hierarchy::build_hierarchy;
use crate::key::DottedKey;
use crate::outline::ParsedModule;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// How lines starting with a bare integer ("3 Closing remarks") are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Any separator after the integer; the line is filed under `<n>.1`.
    #[default]
    Lenient,
    /// Only a colon or period after the integer ("3: ...", "3. ...").
    Strict,
    /// Never fall back; such lines are dropped.
    Off,
}

impl FromStr for FallbackPolicy {
    type Err = OutlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(FallbackPolicy::Lenient),
            "strict" => Ok(FallbackPolicy::Strict),
            "off" | "none" => Ok(FallbackPolicy::Off),
            other => Err(OutlineError::Config(format!(
                "unknown fallback policy '{other}' (expected lenient, strict or off)"
            ))),
        }
    }
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FallbackPolicy::Lenient => "lenient",
            FallbackPolicy::Strict => "strict",
            FallbackPolicy::Off => "off",
        })
    }
}

/// One recognized outline entry, before it is placed in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicItem {
    /// Dotted key, e.g. "2.3.1".
    pub key: DottedKey,
    /// Title as captured (not yet normalized).
    pub title: String,
    /// The bullet-stripped line it came from.
    pub original_line: String,
    /// Matcher that recognized the line.
    pub kind: LineKind,
}

impl TopicItem {
    /// Build an item from a line match. `None` if the match carries no usable key.
    pub fn from_match(m: &LineMatch, original_line: &str) -> Option<Self> {
        let key = m.key()?;
        let (_, title) = m.key_and_title();
        Some(Self {
            key,
            title,
            original_line: original_line.to_string(),
            kind: m.kind(),
        })
    }
}

/// What happened to the input while parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    /// The resulting outline.
    pub parsed: ParsedModule,
    /// Items that made it into the tree, in key order.
    pub items: Vec<TopicItem>,
    /// Lines skipped as repeats of an earlier line or entry.
    pub duplicates: usize,
    /// Lines no matcher recognized.
    pub dropped: Vec<String>,
}

impl ParseReport {
    /// How many items each matcher recognized, in matcher order. Matchers with no hits are left out.
    pub fn count_by_kind(&self) -> Vec<(LineKind, usize)> {
        LineKind::ALL
            .into_iter()
            .map(|kind| (kind, self.items.iter().filter(|i| i.kind == kind).count()))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    /// Items that only the bare-integer fallback recognized.
    pub fn fallback_items(&self) -> impl Iterator<Item = &TopicItem> {
        self.items.iter().filter(|i| i.kind == LineKind::Fallback)
    }
}

/// Configurable bullet parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineParser {
    fallback: FallbackPolicy,
}

impl OutlineParser {
    /// Create a parser with the default (lenient) fallback.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with an explicit fallback policy.
    pub fn with_fallback(fallback: FallbackPolicy) -> Self {
        Self { fallback }
    }

    /// The active fallback policy.
    pub fn fallback(&self) -> FallbackPolicy {
        self.fallback
    }

    /// Parse bullets into an outline.
    pub fn parse<S: AsRef<str>>(&self, bullets: &[S]) -> ParsedModule {
        self.parse_with_report(bullets).parsed
    }

    /// Parse bullets and keep track of duplicates and dropped lines.
    pub fn parse_with_report<S: AsRef<str>>(&self, bullets: &[S]) -> ParseReport {
        let mut report = ParseReport::default();
        let items = sort_topics(self.collect_items(bullets, &mut report));
        report.parsed = ParsedModule::new(build_hierarchy(&items));
        report.items = items;
        debug!(
            "parsed {} items into {} chapters ({} duplicates, {} dropped)",
            report.items.len(),
            report.parsed.chapters.len(),
            report.duplicates,
            report.dropped.len()
        );
        report
    }

    fn collect_items<S: AsRef<str>>(
        &self,
        bullets: &[S],
        report: &mut ParseReport,
    ) -> Vec<TopicItem> {
        let mut items = Vec::new();
        let mut seen_lines = HashSet::new();
        let mut seen_entries = HashSet::new();

        for line in bullets {
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }

            if !seen_lines.insert(normalize_line(trimmed)) {
                debug!("skipping repeated line: {trimmed}");
                report.duplicates += 1;
                continue;
            }

            let stripped = strip_bullet(trimmed);
            let Some(item) = match_line(trimmed, self.fallback)
                .and_then(|m| TopicItem::from_match(&m, stripped))
            else {
                debug!("no outline pattern matches: {trimmed}");
                report.dropped.push(trimmed.to_string());
                continue;
            };

            // "1.1 Overview" and "1.1. overview" are the same entry.
            if !seen_entries.insert((item.key.parts().to_vec(), item.title.to_lowercase())) {
                debug!("skipping repeated entry {}: {}", item.key, item.title);
                report.duplicates += 1;
                continue;
            }

            items.push(item);
        }

        items
    }
}

/// Parse bullets with the default parser.
pub fn parse_training_module<S: AsRef<str>>(bullets: &[S]) -> ParsedModule {
    OutlineParser::new().parse(bullets)
}

/// Comparison form of a line: lowercase, every `•`, `-`, `*` removed, trimmed.
pub fn normalize_line(line: &str) -> String {
    line.trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '•' | '-' | '*'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Order items by dotted key, numerically and component-wise.
///
/// The sort is stable: items with numerically equal keys keep their input order.
pub fn sort_topics(mut topics: Vec<TopicItem>) -> Vec<TopicItem> {
    topics.sort_by(|a, b| a.key.numeric_cmp(&b.key));
    topics
}
