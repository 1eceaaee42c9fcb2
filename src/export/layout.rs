//! Page layout for the export.

use super::{FooterBlock, LayoutSettings};
use crate::outline::{ParsedModule, StructuredTopic, TopicKind};
use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Millimetres per point.
const PT_TO_MM: f64 = 0.3528;

/// Average glyph width as a fraction of the font size (proportional sans).
const AVG_GLYPH_EM: f64 = 0.5;

/// Baseline distance between wrapped lines, as a multiple of the font size.
const LINE_SPACING: f64 = 1.15;

/// Millimetres per column when rendering pages as plain text.
const MM_PER_COLUMN: f64 = 2.0;

const HEADING_SIZE: f64 = 18.0;
const TITLE_SIZE: f64 = 14.0;
const CHAPTER_SIZE: f64 = 14.0;
const SECTION_SIZE: f64 = 11.0;
const SUBTOPIC_SIZE: f64 = 10.0;

/// What a text block represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum TextStyle {
    Heading,
    ModuleTitle,
    Chapter,
    Section,
    Subtopic,
}

/// Wrapped text placed at a baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TextBlock {
    pub style: TextStyle,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    /// Centred on `x` rather than starting at it.
    #[serde(default)]
    pub centered: bool,
    pub lines: Vec<String>,
}

/// Horizontal rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Rule {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

/// Anything drawn on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Element {
    Text(TextBlock),
    Rule(Rule),
}

/// One page of the export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct Page {
    /// 1-indexed page number.
    pub number: usize,
    pub elements: Vec<Element>,
    pub footer: Vec<String>,
    /// "Page i of n".
    pub stamp: String,
}

impl Page {
    fn new(number: usize) -> Self {
        Self {
            number,
            elements: Vec::new(),
            footer: Vec::new(),
            stamp: String::new(),
        }
    }

    /// Text blocks on this page, in placement order.
    pub fn text_blocks(&self) -> impl Iterator<Item = &TextBlock> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(block) => Some(block),
            Element::Rule(_) => None,
        })
    }
}

/// A laid-out export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PagedDocument {
    pub title: String,
    pub settings: LayoutSettings,
    pub pages: Vec<Page>,
}

impl PagedDocument {
    /// Total number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Render as plain text. Pages are separated by a form feed.
    pub fn render_text(&self) -> String {
        let left = self.settings.margin_left;
        let width = columns(self.settings.content_width());
        let mut out = String::new();

        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                out.push_str("\u{c}\n");
            }

            let mut first_block = true;
            for element in &page.elements {
                match element {
                    Element::Text(block) => {
                        if block.style == TextStyle::Chapter && !first_block {
                            out.push('\n');
                        }
                        first_block = false;
                        let indent = columns(block.x - left);
                        for line in &block.lines {
                            let pad = if block.centered {
                                width.saturating_sub(line.chars().count()) / 2
                            } else {
                                indent
                            };
                            out.push_str(&" ".repeat(pad));
                            out.push_str(line);
                            out.push('\n');
                        }
                    }
                    Element::Rule(rule) => {
                        out.push_str(&" ".repeat(columns(rule.x1 - left)));
                        out.push_str(&"─".repeat(columns(rule.x2 - rule.x1)));
                        out.push('\n');
                    }
                }
            }

            out.push('\n');
            for line in &page.footer {
                let pad = width.saturating_sub(line.chars().count()) / 2;
                out.push_str(&" ".repeat(pad));
                out.push_str(line);
                out.push('\n');
            }
            let pad = width.saturating_sub(page.stamp.chars().count());
            out.push_str(&" ".repeat(pad));
            out.push_str(&page.stamp);
            out.push('\n');
        }

        out
    }
}

fn columns(mm: f64) -> usize {
    (mm.max(0.0) / MM_PER_COLUMN).round() as usize
}

/// Estimated printed width of `text` in millimetres.
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text.chars().count() as f64 * glyph_width(font_size)
}

/// Baseline step between the lines of one wrapped block, in millimetres.
pub fn line_advance(font_size: f64) -> f64 {
    font_size * LINE_SPACING * PT_TO_MM
}

fn glyph_width(font_size: f64) -> f64 {
    font_size * PT_TO_MM * AVG_GLYPH_EM
}

/// Greedy word wrap against an estimated glyph width.
///
/// Always returns at least one line; words wider than a line are split.
pub fn wrap_text(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let max_chars = ((max_width / glyph_width(font_size)).floor() as usize).max(1);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars && current_len > 0 {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Tracks the current page and baseline while placing elements.
struct Pager<'a> {
    settings: &'a LayoutSettings,
    done: Vec<Page>,
    current: Page,
    y: f64,
}

impl<'a> Pager<'a> {
    fn new(settings: &'a LayoutSettings) -> Self {
        Self {
            settings,
            done: Vec::new(),
            current: Page::new(1),
            y: settings.margin_top,
        }
    }

    /// Break to a new page when the baseline is within `headroom` of the footer reservation.
    fn ensure_room(&mut self, headroom: f64) {
        if self.y > self.settings.content_bottom() - headroom {
            let next = Page::new(self.current.number + 1);
            self.done.push(std::mem::replace(&mut self.current, next));
            self.y = self.settings.continuation_top;
        }
    }

    fn text(&mut self, style: TextStyle, x: f64, font_size: f64, lines: Vec<String>) -> usize {
        let count = lines.len();
        self.current.elements.push(Element::Text(TextBlock {
            style,
            x,
            y: self.y,
            font_size,
            centered: false,
            lines,
        }));
        count
    }

    fn rule(&mut self, x1: f64, x2: f64, y: f64) {
        self.current.elements.push(Element::Rule(Rule { x1, x2, y }));
    }

    fn finish(mut self, footer: &FooterBlock) -> Vec<Page> {
        self.done.push(self.current);
        let total = self.done.len();
        let footer_lines = footer.lines();
        for page in &mut self.done {
            page.footer = footer_lines.clone();
            page.stamp = format!("Page {} of {}", page.number, total);
        }
        self.done
    }

    /// Place a node and its subtree with its left edge at `left`.
    fn topic(&mut self, topic: &StructuredTopic, left: f64) {
        let lh = self.settings.line_height;
        let max_width = self.settings.page_width - left - self.settings.margin_right;

        match topic.kind {
            TopicKind::Chapter => {
                self.ensure_room(20.0);
                let lines = wrap_text(&topic.title, max_width, CHAPTER_SIZE);
                let count = self.text(TextStyle::Chapter, left, CHAPTER_SIZE, lines);
                self.y += count as f64 * lh * 1.3;
                let right = self.settings.page_width - self.settings.margin_right;
                self.rule(left, right, self.y - 2.0);
                self.y += lh;
            }
            TopicKind::Section => {
                self.ensure_room(15.0);
                let lines = wrap_text(&topic.label(), max_width - 10.0, SECTION_SIZE);
                let count = self.text(TextStyle::Section, left, SECTION_SIZE, lines);
                self.y += count as f64 * lh * 1.2;
            }
            TopicKind::Subtopic => {
                self.ensure_room(10.0);
                let inset = if left > self.settings.margin_left { 10.0 } else { 0.0 };
                let lines = wrap_text(&topic.label(), max_width - inset, SUBTOPIC_SIZE);
                let count = self.text(TextStyle::Subtopic, left, SUBTOPIC_SIZE, lines);
                self.y += count as f64 * lh * 1.1;
            }
        }

        let child_left = match topic.kind {
            TopicKind::Chapter => left + 8.0,
            TopicKind::Section | TopicKind::Subtopic => left + 12.0,
        };
        for child in &topic.children {
            self.topic(child, child_left);
        }
    }
}

/// Lay out a module outline on pages.
pub fn paginate(
    title: &str,
    parsed: &ParsedModule,
    settings: &LayoutSettings,
    footer: &FooterBlock,
) -> PagedDocument {
    let mut pager = Pager::new(settings);
    let left = settings.margin_left;
    let right = settings.page_width - settings.margin_right;
    let lh = settings.line_height;

    pager.current.elements.push(Element::Text(TextBlock {
        style: TextStyle::Heading,
        x: settings.page_width / 2.0,
        y: settings.margin_top,
        font_size: HEADING_SIZE,
        centered: true,
        lines: vec![settings.heading.clone()],
    }));
    pager.rule(left, right, settings.margin_top + 5.0);

    pager.y = settings.margin_top + 15.0;
    let lines = wrap_text(title, settings.content_width(), TITLE_SIZE);
    let count = pager.text(TextStyle::ModuleTitle, left, TITLE_SIZE, lines);
    pager.y += count as f64 * lh * 1.3 + 5.0;

    let last = parsed.chapters.len().saturating_sub(1);
    for (i, chapter) in parsed.chapters.iter().enumerate() {
        pager.topic(chapter, left);
        if i < last {
            pager.y += lh * 2.0;
        }
    }

    PagedDocument {
        title: title.to_string(),
        settings: settings.clone(),
        pages: pager.finish(footer),
    }
}
