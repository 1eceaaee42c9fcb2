//! Paginated export of an outline.
//!
//! [`paginate`] lays the outline out on fixed-size pages, breaking to a new
//! page whenever the next node would run into the footer reservation.
//! Dimensions are millimetres and font sizes points, A4 by default. The
//! result can be drawn as PDF ([`PagedDocument::render_pdf`]), written as
//! plain text ([`PagedDocument::render_text`]) or dumped as JSON.

mod layout;
mod pdf;

pub use layout::{
    Element, Page, PagedDocument, Rule, TextBlock, TextStyle, line_advance, paginate, text_width,
    wrap_text,
};

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Page geometry and spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
#[serde(default)]
pub struct LayoutSettings {
    pub page_width: f64,
    pub page_height: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    /// Baseline of the document heading on page 1.
    pub margin_top: f64,
    /// Baseline where content resumes after a page break.
    pub continuation_top: f64,
    pub line_height: f64,
    /// Space kept clear at the bottom of every page for the footer.
    pub footer_space: f64,
    /// Heading printed at the top of page 1.
    pub heading: String,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin_left: 20.0,
            margin_right: 20.0,
            margin_top: 30.0,
            continuation_top: 30.0,
            line_height: 6.0,
            footer_space: 50.0,
            heading: "AdmasITS – Training Module Outline".to_string(),
        }
    }
}

impl LayoutSettings {
    /// Width available for text at the left margin.
    pub fn content_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Lowest baseline content may start on before the footer reservation.
    pub fn content_bottom(&self) -> f64 {
        self.page_height - self.footer_space
    }
}

/// Contact block stamped at the bottom of every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterBlock {
    pub company: String,
    pub name: String,
    pub title: String,
    pub location: String,
    pub website: String,
}

impl Default for FooterBlock {
    fn default() -> Self {
        Self {
            company: "AdmasITS – AI-Driven Systems & Intelligent Ideas".to_string(),
            name: "Prof. Dr. Sebhatleab Tewolde".to_string(),
            title: "Secretary, Co-Founder & Head of Department of Business Training".to_string(),
            location: "Frankfurt, Germany".to_string(),
            website: "admasits.com".to_string(),
        }
    }
}

impl FooterBlock {
    /// Non-empty footer lines, top to bottom.
    pub fn lines(&self) -> Vec<String> {
        [
            &self.company,
            &self.name,
            &self.title,
            &self.location,
            &self.website,
        ]
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .cloned()
        .collect()
    }
}

/// Output flavours for an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Printable PDF.
    #[default]
    Pdf,
    /// Form-feed separated plain text pages.
    Text,
    /// The full page layout as JSON.
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Text => "txt",
            ExportFormat::Json => "json",
        }
    }
}

/// File name for an exported outline: `"Cash & Credit"` -> `"cash___credit_outline.txt"`.
pub fn export_file_name(title: &str, extension: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}_outline.{extension}")
}
