//! Collapsible on-screen outline.
//!
//! Chapters can be expanded or collapsed individually. When parsing produced
//! no chapters at all, the view shows the module's bullets as written.

use crate::outline::{ParsedModule, StructuredTopic, TopicKind};
use std::collections::HashSet;

/// Interactive view state over one parsed module.
#[derive(Debug, Clone)]
pub struct OutlineView<'a> {
    parsed: &'a ParsedModule,
    bullets: &'a [String],
    /// Indices of collapsed chapters.
    collapsed: HashSet<usize>,
}

impl<'a> OutlineView<'a> {
    /// Create a view with every chapter expanded.
    pub fn new(parsed: &'a ParsedModule, bullets: &'a [String]) -> Self {
        Self {
            parsed,
            bullets,
            collapsed: HashSet::new(),
        }
    }

    /// Index of the chapter whose number is `number` ("2" or "2.0").
    pub fn chapter_index(&self, number: &str) -> Option<usize> {
        let wanted = if number.contains('.') {
            number.to_string()
        } else {
            format!("{number}.0")
        };
        self.parsed
            .chapters
            .iter()
            .position(|c| c.number.as_deref() == Some(wanted.as_str()))
    }

    /// Flip one chapter. Returns the new expanded state, or `None` for an unknown index.
    pub fn toggle(&mut self, chapter: usize) -> Option<bool> {
        if chapter >= self.parsed.chapters.len() {
            return None;
        }
        if self.collapsed.remove(&chapter) {
            Some(true)
        } else {
            self.collapsed.insert(chapter);
            Some(false)
        }
    }

    /// Expand every chapter.
    pub fn expand_all(&mut self) {
        self.collapsed.clear();
    }

    /// Collapse every chapter.
    pub fn collapse_all(&mut self) {
        self.collapsed = (0..self.parsed.chapters.len()).collect();
    }

    /// Whether a chapter's contents are shown.
    pub fn is_expanded(&self, chapter: usize) -> bool {
        !self.collapsed.contains(&chapter)
    }

    /// True when the view falls back to raw bullets.
    pub fn is_fallback(&self) -> bool {
        self.parsed.is_empty()
    }

    /// Render the visible lines.
    pub fn render(&self) -> Vec<String> {
        if self.is_fallback() {
            return self.bullets.to_vec();
        }

        let mut lines = Vec::new();
        for (i, chapter) in self.parsed.chapters.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            let expanded = self.is_expanded(i);
            let marker = if expanded { '▾' } else { '▸' };
            lines.push(format!("{marker} {}", chapter.title));
            if expanded {
                for child in &chapter.children {
                    render_node(child, 1, &mut lines);
                }
            }
        }
        lines
    }
}

fn render_node(topic: &StructuredTopic, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let number = topic.number.as_deref().unwrap_or_default();
    let line = match topic.kind {
        TopicKind::Section => format!("{indent}{number} {}", topic.title),
        TopicKind::Subtopic | TopicKind::Chapter => format!("{indent}{number}  {}", topic.title),
    };
    lines.push(line.trim_end().to_string());

    for child in &topic.children {
        render_node(child, depth + 1, lines);
    }
}
