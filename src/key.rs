//! Dotted numeric outline keys ("2", "2.3", "2.3.1").
//!
//! Keys compare component-wise as numbers, never lexicographically, so
//! "1.10" sorts after "1.9". A missing trailing component counts as zero.

use crate::error::{OutlineError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A dotted key with at least two numeric components.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DottedKey {
    raw: String,
    parts: Vec<u64>,
}

/// Where a key sits in the outline, derived purely from its components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    /// `<n>.0`: the header line of chapter `n`.
    ChapterHeader { chapter: u64 },
    /// `<n>.<m>` with `m != 0`: a section or a direct subtopic, depending on descendants.
    Item { chapter: u64, item: u64 },
    /// Three or more components: a subtopic of section `<chapter>.<section>`.
    Nested { chapter: u64, section: u64 },
}

impl DottedKey {
    /// Parse a key such as `"2.3.1"`.
    ///
    /// Components that overflow `u64` saturate rather than fail.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let mut parts = Vec::new();
        for component in raw.split('.') {
            if component.is_empty() || !component.bytes().all(|b| b.is_ascii_digit()) {
                return Err(OutlineError::InvalidKey(raw.to_string()));
            }
            parts.push(component.parse().unwrap_or(u64::MAX));
        }
        if parts.len() < 2 {
            return Err(OutlineError::InvalidKey(raw.to_string()));
        }
        Ok(Self {
            raw: raw.to_string(),
            parts,
        })
    }

    /// Build `"<first>.<second>"` from two numbers.
    pub fn pair(first: u64, second: u64) -> Self {
        Self {
            raw: format!("{first}.{second}"),
            parts: vec![first, second],
        }
    }

    /// The key exactly as authored.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric components.
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    /// Number of components.
    pub fn depth(&self) -> usize {
        self.parts.len()
    }

    /// Leading component (the chapter number).
    pub fn chapter(&self) -> u64 {
        self.parts[0]
    }

    /// Key of the owning chapter, `"<first>.0"`.
    pub fn chapter_key(&self) -> DottedKey {
        Self::pair(self.parts[0], 0)
    }

    /// Key of the owning section, `"<first>.<second>"`.
    pub fn section_key(&self) -> DottedKey {
        Self::pair(self.parts[0], self.parts[1])
    }

    /// Classify the key for the hierarchy builder.
    pub fn shape(&self) -> KeyShape {
        match self.parts.as_slice() {
            [chapter, 0] => KeyShape::ChapterHeader { chapter: *chapter },
            [chapter, item] => KeyShape::Item {
                chapter: *chapter,
                item: *item,
            },
            [chapter, section, ..] => KeyShape::Nested {
                chapter: *chapter,
                section: *section,
            },
            // `parse` and `pair` never build a key with fewer than two parts.
            [chapter] => KeyShape::ChapterHeader { chapter: *chapter },
            [] => KeyShape::ChapterHeader { chapter: 0 },
        }
    }

    /// Component-wise numeric comparison; missing trailing components are zero.
    ///
    /// This is deliberately not `Ord`: `"1.1"` and `"1.1.0"` compare equal
    /// here while remaining distinct keys.
    pub fn numeric_cmp(&self, other: &DottedKey) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        for i in 0..len {
            let a = self.parts.get(i).copied().unwrap_or(0);
            let b = other.parts.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl FromStr for DottedKey {
    type Err = OutlineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DottedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
