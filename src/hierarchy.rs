//! Folds sorted topic items into the chapter forest.
//!
//! Two passes. Whether a two-part key such as "1.1" is a section or a leaf
//! depends on whether any deeper key like "1.1.1" exists, so the first pass
//! collects every section key with descendants before any node is built.

use crate::key::{DottedKey, KeyShape};
use crate::outline::StructuredTopic;
use crate::parser::{TopicItem, format_title};
use std::collections::{HashMap, HashSet};

/// Build chapters from items already ordered by [`crate::parser::sort_topics`].
///
/// Chapters appear in order of first encounter, which for sorted input is
/// ascending chapter number.
pub fn build_hierarchy(sorted: &[TopicItem]) -> Vec<StructuredTopic> {
    let nested = sections_with_descendants(sorted);
    let mut forest = Forest::default();

    for item in sorted {
        let chapter = forest.chapter_for(item);

        match item.key.shape() {
            KeyShape::ChapterHeader { chapter: number } => {
                let node = &mut forest.chapters[chapter];
                if node.title == default_chapter_title(number) && !item.title.is_empty() {
                    node.title = format_title(&item.title);
                }
            }
            KeyShape::Item { chapter: number, item: index } => {
                if nested.contains(&(number, index)) {
                    forest.explicit_section(chapter, (number, index), item);
                } else {
                    forest.chapters[chapter].add_child(StructuredTopic::subtopic(
                        2,
                        item.key.as_str(),
                        format_title(&item.title),
                    ));
                }
            }
            KeyShape::Nested { chapter: number, section } => {
                let (parent, child) = forest.section_slot(chapter, (number, section));
                forest.chapters[parent].children[child].add_child(StructuredTopic::subtopic(
                    3,
                    item.key.as_str(),
                    format_title(&item.title),
                ));
            }
        }
    }

    forest.chapters
}

/// First pass: every `(chapter, section)` that owns a key three or more parts deep.
fn sections_with_descendants(items: &[TopicItem]) -> HashSet<(u64, u64)> {
    items
        .iter()
        .filter(|item| item.key.depth() > 2)
        .map(|item| {
            let parts = item.key.parts();
            (parts[0], parts[1])
        })
        .collect()
}

fn default_chapter_title(number: u64) -> String {
    format!("Chapter {number}")
}

/// Scratch state for the second pass. Nodes are addressed by index so the
/// lookup tables never alias the tree they point into.
#[derive(Default)]
struct Forest {
    chapters: Vec<StructuredTopic>,
    chapter_index: HashMap<u64, usize>,
    /// `(chapter, section)` -> `(chapter slot, child slot)`.
    section_index: HashMap<(u64, u64), (usize, usize)>,
}

impl Forest {
    /// Slot of the item's chapter, creating the chapter on first sight.
    fn chapter_for(&mut self, item: &TopicItem) -> usize {
        let number = item.key.chapter();
        if let Some(&slot) = self.chapter_index.get(&number) {
            return slot;
        }

        let title = match item.key.shape() {
            KeyShape::ChapterHeader { .. } => format_title(&item.title),
            KeyShape::Item { .. } | KeyShape::Nested { .. } => default_chapter_title(number),
        };
        self.chapters.push(StructuredTopic::chapter(
            item.key.chapter_key().as_str(),
            title,
        ));
        let slot = self.chapters.len() - 1;
        self.chapter_index.insert(number, slot);
        slot
    }

    /// Place a two-part item that has descendants as a section, unless one already exists.
    fn explicit_section(&mut self, chapter: usize, key: (u64, u64), item: &TopicItem) {
        if self.section_index.contains_key(&key) {
            return;
        }
        let node = StructuredTopic::section(item.key.as_str(), format_title(&item.title));
        self.insert_section(chapter, key, node);
    }

    /// Slot of a section, synthesizing "Section a.b" when the input never named it.
    fn section_slot(&mut self, chapter: usize, key: (u64, u64)) -> (usize, usize) {
        if let Some(&slot) = self.section_index.get(&key) {
            return slot;
        }
        let number = DottedKey::pair(key.0, key.1);
        let node = StructuredTopic::section(number.as_str(), format!("Section {number}"));
        self.insert_section(chapter, key, node)
    }

    fn insert_section(
        &mut self,
        chapter: usize,
        key: (u64, u64),
        node: StructuredTopic,
    ) -> (usize, usize) {
        let children = &mut self.chapters[chapter].children;
        children.push(node);
        let slot = (chapter, children.len() - 1);
        self.section_index.insert(key, slot);
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::TopicKind;
    use crate::parser::parse_training_module;

    #[test]
    fn test_canonical_outline() {
        let parsed = parse_training_module(&[
            "Chapter 1: Basics",
            "1.1 Overview",
            "1.1.1 History",
            "1.1.2 Scope",
            "1.2 Summary",
        ]);

        assert_eq!(parsed.chapters.len(), 1);
        let chapter = &parsed.chapters[0];
        assert_eq!(chapter.kind, TopicKind::Chapter);
        assert_eq!(chapter.number.as_deref(), Some("1.0"));
        assert_eq!(chapter.title, "Basics");
        assert_eq!(chapter.level, 1);
        assert_eq!(chapter.children.len(), 2);

        let section = &chapter.children[0];
        assert_eq!(section.kind, TopicKind::Section);
        assert_eq!(section.number.as_deref(), Some("1.1"));
        assert_eq!(section.title, "Overview");
        assert_eq!(section.level, 2);

        let nested: Vec<_> = section
            .children
            .iter()
            .map(|t| (t.kind, t.level, t.number.as_deref().unwrap(), t.title.as_str()))
            .collect();
        assert_eq!(
            nested,
            [
                (TopicKind::Subtopic, 3, "1.1.1", "History"),
                (TopicKind::Subtopic, 3, "1.1.2", "Scope"),
            ]
        );

        let summary = &chapter.children[1];
        assert_eq!(summary.kind, TopicKind::Subtopic);
        assert_eq!(summary.level, 2);
        assert_eq!(summary.title, "Summary");
        assert!(summary.children.is_empty());

        // Four nodes below the chapter.
        assert_eq!(parsed.node_count() - 1, 4);
    }

    #[test]
    fn test_default_chapter_title() {
        let parsed = parse_training_module(&["1.1 Overview"]);
        assert_eq!(parsed.chapters[0].title, "Chapter 1");
        assert_eq!(parsed.chapters[0].number.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_synthesized_section() {
        let parsed = parse_training_module(&["2.3.1 Credit Policies", "2.3.2 Collections"]);
        let chapter = &parsed.chapters[0];
        assert_eq!(chapter.title, "Chapter 2");
        let section = &chapter.children[0];
        assert_eq!(section.kind, TopicKind::Section);
        assert_eq!(section.number.as_deref(), Some("2.3"));
        assert_eq!(section.title, "Section 2.3");
        assert_eq!(section.children.len(), 2);
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let parsed = parse_training_module(&[
            "2.1 Later",
            "1.2.1 Deep",
            "Chapter 2: Second",
            "1.1 First",
            "1.2 Middle",
            "Chapter 1: First chapter",
        ]);

        let order: Vec<_> = parsed
            .walk()
            .map(|t| t.number.clone().unwrap_or_default())
            .collect();
        assert_eq!(order, ["1.0", "1.1", "1.2", "1.2.1", "2.0", "2.1"]);
        assert_eq!(parsed.chapters[1].title, "Second");
    }

    #[test]
    fn test_traversal_follows_numeric_order() {
        let parsed = parse_training_module(&[
            "10.1 Ten",
            "2.10 Two ten",
            "2.9 Two nine",
            "2.9.2 B",
            "2.9.10 C",
            "2.9.1 A",
        ]);

        let keys: Vec<DottedKey> = parsed
            .walk()
            .filter_map(|t| t.number.as_deref())
            .map(|n| DottedKey::parse(n).unwrap())
            .collect();
        assert!(
            keys.windows(2)
                .all(|w| w[0].numeric_cmp(&w[1]) == std::cmp::Ordering::Less)
        );
    }

    #[test]
    fn test_chapter_header_after_default() {
        // "Chapter 1" with no title keeps the default; a later "1.0" header names it.
        let parsed = parse_training_module(&["Chapter 1", "1.0 Background", "1.1 Item"]);
        assert_eq!(parsed.chapters.len(), 1);
        assert_eq!(parsed.chapters[0].title, "Background");
    }

    #[test]
    fn test_first_named_header_wins() {
        let parsed = parse_training_module(&["Chapter 1: Basics", "1.0 Background"]);
        assert_eq!(parsed.chapters[0].title, "Basics");
        assert!(parsed.chapters[0].children.is_empty());
    }

    #[test]
    fn test_article_becomes_chapter() {
        let parsed = parse_training_module(&["Article 6. RIGHTS AND DUTIES", "6.1 employer duties"]);
        let chapter = &parsed.chapters[0];
        assert_eq!(chapter.number.as_deref(), Some("6.0"));
        assert_eq!(chapter.title, "Rights and duties");
        assert_eq!(chapter.children[0].title, "Employer duties");
    }

    #[test]
    fn test_titles_normalized_in_tree() {
        let parsed = parse_training_module(&["1.1 FINANCIAL BASICS", "1.2 (ERP) Systems"]);
        let children = &parsed.chapters[0].children;
        assert_eq!(children[0].title, "Financial basics");
        assert_eq!(children[1].title, "(ERP) Systems");
    }

    #[test]
    fn test_keys_are_prefix_consistent() {
        let parsed = parse_training_module(&[
            "Chapter 1: A",
            "1.1 B",
            "1.1.1 C",
            "2.4.2 D",
            "3.1 E",
        ]);

        fn check(node: &StructuredTopic) {
            let parent = DottedKey::parse(node.number.as_deref().unwrap()).unwrap();
            for child in &node.children {
                let key = DottedKey::parse(child.number.as_deref().unwrap()).unwrap();
                assert_eq!(key.chapter(), parent.chapter());
                if node.kind == TopicKind::Section {
                    assert_eq!(key.section_key(), parent);
                }
                check(child);
            }
        }
        parsed.chapters.iter().for_each(check);
    }
}
