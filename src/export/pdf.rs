//! PDF backend: draws a [`PagedDocument`] with the standard Helvetica faces.
//!
//! Layout coordinates are measured from the top edge; PDF measures from the
//! bottom, so every baseline is flipped against the page height.

use super::layout::{Element, PagedDocument, Rule, TextBlock, TextStyle, line_advance, text_width};
use crate::error::{OutlineError, Result};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};

/// Footer anchor, up from the bottom edge.
const FOOTER_OFFSET: f64 = 25.0;
const FOOTER_LINE_STEP: f64 = 4.5;
const FOOTER_SIZE: f64 = 10.0;
const STAMP_SIZE: f64 = 9.0;
/// Page stamp baseline, up from the bottom edge.
const STAMP_OFFSET: f64 = 10.0;

const ACCENT: (u8, u8, u8) = (127, 90, 255);
const BODY: (u8, u8, u8) = (60, 60, 60);
const BLACK: (u8, u8, u8) = (0, 0, 0);
const FOOTER_TEXT: (u8, u8, u8) = (187, 187, 187);
const STAMP_TEXT: (u8, u8, u8) = (150, 150, 150);
const DIVIDER: (u8, u8, u8) = (220, 220, 220);

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

fn mm(value: f64) -> Mm {
    Mm(value as f32)
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

/// Draws onto one page layer.
struct Canvas<'a> {
    layer: PdfLayerReference,
    fonts: &'a Fonts,
    page_height: f64,
}

impl Canvas<'_> {
    fn text(&self, text: &str, x: f64, y: f64, size: f64, bold: bool, color: (u8, u8, u8)) {
        let font = if bold { &self.fonts.bold } else { &self.fonts.regular };
        self.layer.set_fill_color(rgb(color));
        self.layer
            .use_text(text, size as f32, mm(x), mm(self.page_height - y), font);
    }

    fn line(&self, x1: f64, x2: f64, y: f64, thickness: f64, color: (u8, u8, u8)) {
        let y = mm(self.page_height - y);
        self.layer.set_outline_color(rgb(color));
        self.layer.set_outline_thickness(thickness as f32);
        self.layer.add_line(Line {
            points: vec![(Point::new(mm(x1), y), false), (Point::new(mm(x2), y), false)],
            is_closed: false,
        });
    }

    fn block(&self, block: &TextBlock) {
        let (bold, color) = match block.style {
            TextStyle::Heading | TextStyle::Chapter | TextStyle::Section => (true, ACCENT),
            TextStyle::ModuleTitle => (true, BLACK),
            TextStyle::Subtopic => (false, BODY),
        };
        let step = line_advance(block.font_size);
        for (i, line) in block.lines.iter().enumerate() {
            let x = if block.centered {
                block.x - text_width(line, block.font_size) / 2.0
            } else {
                block.x
            };
            self.text(line, x, block.y + i as f64 * step, block.font_size, bold, color);
        }
    }

    fn rule(&self, rule: &Rule) {
        self.line(rule.x1, rule.x2, rule.y, 0.5, ACCENT);
    }

    fn footer(&self, lines: &[String], stamp: &str, page_width: f64, margin: f64) {
        let anchor = self.page_height - FOOTER_OFFSET;
        self.line(margin, page_width - margin, anchor - 14.0, 0.3, DIVIDER);

        let center = page_width / 2.0;
        let mut y = anchor - 10.0;
        for line in lines {
            let x = center - text_width(line, FOOTER_SIZE) / 2.0;
            self.text(line, x, y, FOOTER_SIZE, false, FOOTER_TEXT);
            y += FOOTER_LINE_STEP;
        }

        let x = page_width - margin - text_width(stamp, STAMP_SIZE);
        self.text(stamp, x, self.page_height - STAMP_OFFSET, STAMP_SIZE, false, STAMP_TEXT);
    }
}

impl PagedDocument {
    /// Render the layout as PDF bytes.
    pub fn render_pdf(&self) -> Result<Vec<u8>> {
        let settings = &self.settings;
        let (width, height) = (mm(settings.page_width), mm(settings.page_height));
        let (pdf, first_page, first_layer) = PdfDocument::new(&self.title, width, height, "Outline");

        let fonts = Fonts {
            regular: pdf
                .add_builtin_font(BuiltinFont::Helvetica)
                .map_err(|e| OutlineError::Render(e.to_string()))?,
            bold: pdf
                .add_builtin_font(BuiltinFont::HelveticaBold)
                .map_err(|e| OutlineError::Render(e.to_string()))?,
        };

        let mut first = Some((first_page, first_layer));
        for page in &self.pages {
            let (page_index, layer_index) = first
                .take()
                .unwrap_or_else(|| pdf.add_page(width, height, "Outline"));
            let canvas = Canvas {
                layer: pdf.get_page(page_index).get_layer(layer_index),
                fonts: &fonts,
                page_height: settings.page_height,
            };

            for element in &page.elements {
                match element {
                    Element::Text(block) => canvas.block(block),
                    Element::Rule(rule) => canvas.rule(rule),
                }
            }
            canvas.footer(
                &page.footer,
                &page.stamp,
                settings.page_width,
                settings.margin_right,
            );
        }

        pdf.save_to_bytes()
            .map_err(|e| OutlineError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::export::{FooterBlock, LayoutSettings, paginate};
    use crate::parser::parse_training_module;

    #[test]
    fn test_render_pdf_bytes() {
        let bullets: Vec<String> = (1..=80).map(|i| format!("1.{i} Topic {i}")).collect();
        let parsed = parse_training_module(&bullets);
        let doc = paginate(
            "Finance",
            &parsed,
            &LayoutSettings::default(),
            &FooterBlock::default(),
        );
        assert!(doc.page_count() > 1);

        let bytes = doc.render_pdf().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn test_render_empty_outline() {
        let doc = paginate(
            "Empty",
            &Default::default(),
            &LayoutSettings::default(),
            &FooterBlock::default(),
        );
        assert!(doc.render_pdf().unwrap().starts_with(b"%PDF"));
    }
}
