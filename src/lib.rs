//! Module Outline - structured outlines from training-module bullet lists.
//!
//! Training modules are authored as loose bullet lists: "Chapter 1: Basics",
//! "1.1 Overview", "• 1.1.1 History", "Article 6. Rights". This crate turns
//! such a list into a chapter → section → subtopic tree, renders it as a
//! collapsible text view, and lays it out as a paginated export.
//!
//! # Quick Start
//!
//! ```no_run
//! use module_outline::{
//!     config::Config,
//!     export::paginate,
//!     module::ModuleCatalog,
//!     persistence::save_outline,
//! };
//! use std::path::Path;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     let catalog = ModuleCatalog::from_path(Path::new("finance.yaml"))?;
//!     let module = catalog.select(None)?;
//!
//!     let outline = module.outline(&config.parser());
//!     println!("{}", outline.format());
//!     save_outline(&outline, Path::new("finance.outline.json"))?;
//!
//!     let paged = paginate(&module.title, &outline.parsed, &config.layout, &config.footer);
//!     println!("{}", paged.render_text());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - **parser**: line matching, title clean-up, de-duplication and sorting
//! - **hierarchy**: folds sorted items into the chapter forest
//! - **outline**: the resulting tree (`ParsedModule`, `StructuredTopic`)
//! - **view**: collapsible on-screen rendering
//! - **export**: paginated layout with footer and page stamps, drawn as PDF
//! - **module** / **persistence** / **batch**: file input and output

pub mod batch;
pub mod config;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod key;
pub mod module;
pub mod outline;
pub mod parser;
pub mod persistence;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use error::{OutlineError, Result};
pub use export::{FooterBlock, LayoutSettings, PagedDocument, paginate};
pub use key::DottedKey;
pub use module::{ModuleCatalog, TrainingModule};
pub use outline::{OutlineDocument, ParsedModule, StructuredTopic, TopicKind};
pub use parser::{FallbackPolicy, OutlineParser, parse_training_module};
pub use persistence::{load_outline, save_outline};
pub use view::OutlineView;
