//! Outline tree produced from a module's bullets.
//!
//! A parsed module is a forest of chapters. Chapters hold sections and
//! direct subtopics; sections hold subtopics.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Structural role of an outline node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "lowercase")]
pub enum TopicKind {
    Chapter,
    Section,
    Subtopic,
}

impl TopicKind {
    /// Lowercase name, as used in JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicKind::Chapter => "chapter",
            TopicKind::Section => "section",
            TopicKind::Subtopic => "subtopic",
        }
    }
}

/// A node in the outline tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct StructuredTopic {
    /// Chapter, section or subtopic.
    #[serde(rename = "type")]
    pub kind: TopicKind,

    /// Display title.
    pub title: String,

    /// Depth: 1 = chapter, 2 = section or direct subtopic, 3 = nested subtopic.
    pub level: u8,

    /// Dotted key (e.g. "2.3.1").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,

    /// Child nodes in ascending key order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<StructuredTopic>,
}

impl StructuredTopic {
    /// Create a chapter node.
    pub fn chapter(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(TopicKind::Chapter, 1, number, title)
    }

    /// Create a section node.
    pub fn section(number: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(TopicKind::Section, 2, number, title)
    }

    /// Create a subtopic node at the given level.
    pub fn subtopic(level: u8, number: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(TopicKind::Subtopic, level, number, title)
    }

    fn new(kind: TopicKind, level: u8, number: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            level,
            number: Some(number.into()),
            children: Vec::new(),
        }
    }

    /// Add a child node.
    pub fn add_child(&mut self, child: StructuredTopic) {
        self.children.push(child);
    }

    /// Check if this node has children.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Recursively count all nodes in this subtree (including self).
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|n| n.node_count()).sum::<usize>()
    }

    /// Heading text: `"<number> <title>"`, or just the title when unnumbered.
    pub fn label(&self) -> String {
        match &self.number {
            Some(number) => format!("{} {}", number, self.title),
            None => self.title.clone(),
        }
    }

    /// Format the subtree as indented text.
    pub fn format_tree(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        let mut result = format!("{}{} [{}]\n", prefix, self.label(), self.kind.as_str());

        for child in &self.children {
            result.push_str(&child.format_tree(indent + 1));
        }

        result
    }
}

/// Node totals by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutlineStats {
    pub chapters: usize,
    pub sections: usize,
    pub subtopics: usize,
}

/// The chapter forest for one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct ParsedModule {
    pub chapters: Vec<StructuredTopic>,
}

impl ParsedModule {
    /// Wrap a chapter list.
    pub fn new(chapters: Vec<StructuredTopic>) -> Self {
        Self { chapters }
    }

    /// True when no chapter was produced.
    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Total node count.
    pub fn node_count(&self) -> usize {
        self.chapters.iter().map(|n| n.node_count()).sum()
    }

    /// Maximum depth of the tree.
    pub fn max_depth(&self) -> usize {
        fn depth(node: &StructuredTopic) -> usize {
            1 + node.children.iter().map(depth).max().unwrap_or(0)
        }

        self.chapters.iter().map(depth).max().unwrap_or(0)
    }

    /// Count nodes by kind.
    pub fn stats(&self) -> OutlineStats {
        let mut stats = OutlineStats::default();
        for topic in self.walk() {
            match topic.kind {
                TopicKind::Chapter => stats.chapters += 1,
                TopicKind::Section => stats.sections += 1,
                TopicKind::Subtopic => stats.subtopics += 1,
            }
        }
        stats
    }

    /// Depth-first, pre-order traversal of every node.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: self.chapters.iter().rev().collect(),
        }
    }

    /// Find the first node with this dotted key.
    pub fn find_by_number(&self, number: &str) -> Option<&StructuredTopic> {
        self.walk().find(|t| t.number.as_deref() == Some(number))
    }

    /// Find a node by title (case-insensitive).
    pub fn find_by_title(&self, title: &str) -> Option<&StructuredTopic> {
        let title_lower = title.to_lowercase();
        self.walk().find(|t| t.title.to_lowercase() == title_lower)
    }

    /// Format the tree for display.
    pub fn format(&self) -> String {
        self.chapters.iter().map(|c| c.format_tree(0)).collect()
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Pre-order iterator returned by [`ParsedModule::walk`].
pub struct Walk<'a> {
    stack: Vec<&'a StructuredTopic>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a StructuredTopic;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A module's raw bullets bundled with their parsed outline.
///
/// This is what `parse -o` writes and what `show`/`info` can read back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct OutlineDocument {
    /// Module title.
    pub title: String,

    /// Catalog id, when the module came from a catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,

    /// Bullets as authored.
    #[serde(default)]
    pub bullets: Vec<String>,

    /// Parsed outline.
    pub parsed: ParsedModule,
}

impl OutlineDocument {
    /// Bundle a title, its bullets and their parse.
    pub fn new(title: impl Into<String>, bullets: Vec<String>, parsed: ParsedModule) -> Self {
        Self {
            title: title.into(),
            module_id: None,
            bullets,
            parsed,
        }
    }

    /// Format with a summary header.
    pub fn format(&self) -> String {
        let stats = self.parsed.stats();
        let mut result = format!(
            "Module: {} ({} chapters, {} sections, {} subtopics)\n",
            self.title, stats.chapters, stats.sections, stats.subtopics
        );
        result.push_str(&"─".repeat(50));
        result.push('\n');
        result.push_str(&self.parsed.format());
        result
    }
}
