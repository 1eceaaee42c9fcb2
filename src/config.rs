//! Configuration for parsing and export.
//!
//! Supports both environment variables and YAML config file.
//! Environment variables take precedence over config file values.

use crate::error::{OutlineError, Result};
use crate::export::{FooterBlock, LayoutSettings};
use crate::parser::{FallbackPolicy, OutlineParser};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Parser settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Treatment of lines that start with a bare integer.
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Parser settings
    #[serde(default)]
    pub parser: ParserConfig,

    /// Page geometry for exports
    #[serde(default)]
    pub layout: LayoutSettings,

    /// Footer stamped on exported pages
    #[serde(default)]
    pub footer: FooterBlock,
}

impl Config {
    /// Load configuration from environment variables and optional config file.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (OUTLINE_FALLBACK, OUTLINE_FOOTER_*, OUTLINE_PAGE_*)
    /// 2. Config file (~/.config/module-outline/config.yaml)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::load_from_file(&config_path)?;
            }
        }

        config.apply_env()?;
        Ok(config)
    }

    /// Load a specific file, then apply environment overrides.
    pub fn load_with_file(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    ///
    /// Missing sections and fields keep their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| OutlineError::io(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| OutlineError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Override values from `OUTLINE_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(fallback) = var("OUTLINE_FALLBACK") {
            self.parser.fallback = fallback.parse()?;
        }

        let footer = [
            ("OUTLINE_FOOTER_COMPANY", &mut self.footer.company),
            ("OUTLINE_FOOTER_NAME", &mut self.footer.name),
            ("OUTLINE_FOOTER_TITLE", &mut self.footer.title),
            ("OUTLINE_FOOTER_LOCATION", &mut self.footer.location),
            ("OUTLINE_FOOTER_WEBSITE", &mut self.footer.website),
        ];
        for (name, field) in footer {
            if let Some(value) = var(name) {
                *field = value;
            }
        }

        if let Some(width) = var("OUTLINE_PAGE_WIDTH") {
            if let Ok(width) = width.parse() {
                self.layout.page_width = width;
            }
        }

        if let Some(height) = var("OUTLINE_PAGE_HEIGHT") {
            if let Ok(height) = height.parse() {
                self.layout.page_height = height;
            }
        }

        Ok(())
    }

    /// Get the default config file path.
    pub fn config_file_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "module-outline")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Validate that the page geometry leaves room to print.
    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;

        if layout.page_width <= 0.0 || layout.page_height <= 0.0 {
            return Err(OutlineError::Config(format!(
                "Page size must be positive (got {} x {}).",
                layout.page_width, layout.page_height
            )));
        }

        if layout.line_height <= 0.0 {
            return Err(OutlineError::Config(
                "Line height must be positive.".to_string(),
            ));
        }

        if layout.content_width() <= 0.0 {
            return Err(OutlineError::Config(
                "Left and right margins leave no printable width.".to_string(),
            ));
        }

        if layout.continuation_top >= layout.content_bottom()
            || layout.margin_top >= layout.content_bottom()
        {
            return Err(OutlineError::Config(
                "Top margin and footer space leave no printable height.".to_string(),
            ));
        }

        Ok(())
    }

    /// A parser configured from these settings.
    pub fn parser(&self) -> OutlineParser {
        OutlineParser::with_fallback(self.parser.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.parser.fallback, FallbackPolicy::Lenient);
        assert_eq!(config.layout.page_width, 210.0);
        assert_eq!(config.layout.footer_space, 50.0);
        assert_eq!(config.footer.website, "admasits.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "parser:\n  fallback: strict\nfooter:\n  company: Example GmbH\nlayout:\n  line_height: 5\n",
        )
        .unwrap();
        assert_eq!(config.parser.fallback, FallbackPolicy::Strict);
        assert_eq!(config.footer.company, "Example GmbH");
        assert_eq!(config.footer.location, "Frankfurt, Germany");
        assert_eq!(config.layout.line_height, 5.0);
        assert_eq!(config.layout.page_height, 297.0);
        assert_eq!(config.parser().fallback(), FallbackPolicy::Strict);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "layout:\n  page_width: 216\n  page_height: 279\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.layout.page_width, 216.0);
        assert_eq!(config.layout.page_height, 279.0);

        assert!(Config::load_from_file(&dir.path().join("missing.yaml")).is_err());
        assert!(Config::from_yaml("layout: [").is_err());
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("OUTLINE_FALLBACK", "off"),
            ("OUTLINE_FOOTER_NAME", "Jane Doe"),
            ("OUTLINE_PAGE_WIDTH", "216"),
            ("OUTLINE_PAGE_HEIGHT", "not a number"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.parser.fallback, FallbackPolicy::Off);
        assert_eq!(config.footer.name, "Jane Doe");
        assert_eq!(config.layout.page_width, 216.0);
        assert_eq!(config.layout.page_height, 297.0);

        let mut config = Config::default();
        let bad = config.apply_overrides(|name| {
            (name == "OUTLINE_FALLBACK").then(|| "sometimes".to_string())
        });
        assert!(bad.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut config = Config::default();
        config.layout.margin_left = 150.0;
        config.layout.margin_right = 80.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.layout.footer_space = 280.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.layout.page_height = 0.0;
        assert!(config.validate().is_err());
    }
}
