//! Training module input.
//!
//! A module is a title plus the bullet lines that describe its contents.
//! Modules come either from a plain text file (one bullet per line) or
//! from a JSON/YAML catalog holding one or many modules.

use crate::error::{OutlineError, Result};
use crate::outline::{OutlineDocument, ParsedModule};
use crate::parser::{OutlineParser, parse_training_module};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A training module as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingModule {
    /// Catalog id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Module title.
    pub title: String,

    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Duration, e.g. "3 days".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Audience level, e.g. "Intermediate".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Outline lines, free-form.
    #[serde(default)]
    pub bullets: Vec<String>,
}

impl TrainingModule {
    /// Create a module from a title and bullets.
    pub fn new(title: impl Into<String>, bullets: Vec<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            description: None,
            duration: None,
            level: None,
            bullets,
        }
    }

    /// Read a plain text module.
    ///
    /// A `# ` heading line sets the title (first one wins); otherwise the
    /// file stem is used. Every other non-blank line is a bullet.
    pub fn from_text_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| OutlineError::io(path, e))?;
        Ok(Self::from_text(file_stem(path), &content))
    }

    /// Build a module from text content, using `fallback_title` when no heading is present.
    pub fn from_text(fallback_title: impl Into<String>, content: &str) -> Self {
        let mut title = None;
        let mut bullets = Vec::new();

        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match trimmed.strip_prefix("# ") {
                Some(heading) if title.is_none() => title = Some(heading.trim().to_string()),
                _ => bullets.push(trimmed.to_string()),
            }
        }

        Self::new(title.unwrap_or_else(|| fallback_title.into()), bullets)
    }

    /// Parse the bullets with the default parser.
    pub fn parse(&self) -> ParsedModule {
        parse_training_module(&self.bullets)
    }

    /// Parse the bullets with a configured parser and bundle the result.
    pub fn outline(&self, parser: &OutlineParser) -> OutlineDocument {
        let mut doc = OutlineDocument::new(
            &self.title,
            self.bullets.clone(),
            parser.parse(&self.bullets),
        );
        doc.module_id = self.id.clone();
        doc
    }

    /// True if `selector` names this module by id or (case-insensitive) title.
    pub fn matches(&self, selector: &str) -> bool {
        self.id.as_deref() == Some(selector) || self.title.eq_ignore_ascii_case(selector)
    }
}

/// On-disk module formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFormat {
    /// One bullet per line.
    Text,
    /// A module object or an array of them.
    Json,
    /// Same shape as JSON.
    Yaml,
}

impl ModuleFormat {
    /// Determine format from file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("txt") | Some("md") => Some(ModuleFormat::Text),
            Some("json") => Some(ModuleFormat::Json),
            Some("yaml") | Some("yml") => Some(ModuleFormat::Yaml),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogShape {
    Many(Vec<TrainingModule>),
    Wrapped { modules: Vec<TrainingModule> },
    One(TrainingModule),
}

impl From<CatalogShape> for Vec<TrainingModule> {
    fn from(shape: CatalogShape) -> Self {
        match shape {
            CatalogShape::Many(modules) | CatalogShape::Wrapped { modules } => modules,
            CatalogShape::One(module) => vec![module],
        }
    }
}

/// The modules read from one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleCatalog {
    /// Where they came from.
    pub path: Option<PathBuf>,
    /// Modules in file order.
    pub modules: Vec<TrainingModule>,
}

impl ModuleCatalog {
    /// Load every module in a file, picking the format from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(OutlineError::ModuleNotFound(path.display().to_string()));
        }

        let format = ModuleFormat::from_path(path)
            .ok_or_else(|| OutlineError::UnsupportedFormat(path.to_path_buf()))?;

        let modules = match format {
            ModuleFormat::Text => vec![TrainingModule::from_text_file(path)?],
            ModuleFormat::Json => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| OutlineError::io(path, e))?;
                Self::from_json(&content)?
            }
            ModuleFormat::Yaml => {
                let content =
                    std::fs::read_to_string(path).map_err(|e| OutlineError::io(path, e))?;
                Self::from_yaml(&content)?
            }
        };

        if modules.is_empty() {
            return Err(OutlineError::EmptyCatalog(path.to_path_buf()));
        }

        Ok(Self {
            path: Some(path.to_path_buf()),
            modules,
        })
    }

    /// Parse modules from JSON text.
    pub fn from_json(json: &str) -> Result<Vec<TrainingModule>> {
        let shape: CatalogShape = serde_json::from_str(json)?;
        Ok(shape.into())
    }

    /// Parse modules from YAML text.
    pub fn from_yaml(yaml: &str) -> Result<Vec<TrainingModule>> {
        let shape: CatalogShape = serde_yaml::from_str(yaml)?;
        Ok(shape.into())
    }

    /// Pick a module by id or title, or the first one without a selector.
    pub fn select(&self, selector: Option<&str>) -> Result<&TrainingModule> {
        match selector {
            Some(selector) => self
                .modules
                .iter()
                .find(|m| m.matches(selector))
                .ok_or_else(|| OutlineError::ModuleNotFound(selector.to_string())),
            None => self
                .modules
                .first()
                .ok_or_else(|| OutlineError::ModuleNotFound("<first>".to_string())),
        }
    }

    /// Number of modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// True if the catalog holds nothing.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}
