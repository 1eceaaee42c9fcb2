//! Reading and writing outlines and exports.
//!
//! Outline documents and page layouts are stored as JSON (readable) or
//! bincode (compact), picked from the file extension. Exports are written in
//! the requested [`ExportFormat`].

use crate::error::{OutlineError, Result};
use crate::export::{ExportFormat, PagedDocument};
use crate::outline::OutlineDocument;
use bincode::{Decode, Encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Storage encoding for outlines and layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    Json,
    Bincode,
}

impl SaveFormat {
    /// `.bin`/`.bincode` is bincode; anything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("bin") | Some("bincode") => SaveFormat::Bincode,
            _ => SaveFormat::Json,
        }
    }

    /// True if `path` looks like a saved outline rather than a module source.
    pub fn is_outline_path(path: &Path) -> bool {
        SaveFormat::from_path(path) == SaveFormat::Bincode
            || path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(".outline.json"))
    }

    fn encode<T: Serialize + Encode>(self, value: &T) -> Result<Vec<u8>> {
        match self {
            SaveFormat::Json => Ok(serde_json::to_vec_pretty(value)?),
            SaveFormat::Bincode => bincode::encode_to_vec(value, bincode::config::standard())
                .map_err(|e| OutlineError::Serialization(e.to_string())),
        }
    }

    fn decode<T: DeserializeOwned + Decode<()>>(self, data: &[u8]) -> Result<T> {
        match self {
            SaveFormat::Json => Ok(serde_json::from_slice(data)?),
            SaveFormat::Bincode => bincode::decode_from_slice(data, bincode::config::standard())
                .map(|(value, _)| value)
                .map_err(|e| OutlineError::Serialization(e.to_string())),
        }
    }
}

/// Save an outline document, format from the extension.
pub fn save_outline(doc: &OutlineDocument, path: &Path) -> Result<()> {
    save_outline_with_format(doc, path, SaveFormat::from_path(path))
}

pub fn save_outline_with_format(
    doc: &OutlineDocument,
    path: &Path,
    format: SaveFormat,
) -> Result<()> {
    write_file(path, &format.encode(doc)?)
}

/// Load an outline document, format from the extension.
pub fn load_outline(path: &Path) -> Result<OutlineDocument> {
    load_outline_with_format(path, SaveFormat::from_path(path))
}

pub fn load_outline_with_format(path: &Path, format: SaveFormat) -> Result<OutlineDocument> {
    format.decode(&read_file(path)?)
}

/// Save a page layout so it can be rendered again later.
pub fn save_layout(doc: &PagedDocument, path: &Path) -> Result<()> {
    write_file(path, &SaveFormat::from_path(path).encode(doc)?)
}

/// Load a page layout written by [`save_layout`].
pub fn load_layout(path: &Path) -> Result<PagedDocument> {
    SaveFormat::from_path(path).decode(&read_file(path)?)
}

/// Write an export in the given format.
pub fn save_export(doc: &PagedDocument, path: &Path, format: ExportFormat) -> Result<()> {
    let data = match format {
        ExportFormat::Text => doc.render_text().into_bytes(),
        ExportFormat::Json => SaveFormat::Json.encode(doc)?,
        ExportFormat::Pdf => doc.render_pdf()?,
    };
    write_file(path, &data)
}

/// Get the size of a file in bytes.
pub fn file_size(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path).map_err(|e| OutlineError::io(path, e))?;
    Ok(metadata.len())
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(OutlineError::OutlineNotFound(path.to_path_buf()));
    }
    fs::read(path).map_err(|e| OutlineError::io(path, e))
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| OutlineError::io(parent, e))?;
        }
    }

    fs::write(path, data).map_err(|e| OutlineError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{FooterBlock, LayoutSettings, paginate};
    use crate::parser::parse_training_module;
    use tempfile::TempDir;

    fn sample_outline() -> OutlineDocument {
        let bullets: Vec<String> = [
            "Chapter 1: Introduction",
            "1.1 Scope",
            "1.1.1 Goals",
            "Chapter 2: Methods",
        ]
        .map(String::from)
        .to_vec();
        let parsed = parse_training_module(&bullets);
        OutlineDocument::new("Test Module", bullets, parsed)
    }

    fn sample_layout() -> PagedDocument {
        let outline = sample_outline();
        paginate(
            &outline.title,
            &outline.parsed,
            &LayoutSettings::default(),
            &FooterBlock::default(),
        )
    }

    #[test]
    fn test_outline_json_and_bincode() {
        let dir = TempDir::new().unwrap();
        let original = sample_outline();

        for name in ["test.outline.json", "nested/test.bin"] {
            let path = dir.path().join(name);
            save_outline(&original, &path).unwrap();
            assert_eq!(load_outline(&path).unwrap(), original);
            assert!(file_size(&path).unwrap() > 0);
        }

        let text = fs::read_to_string(dir.path().join("test.outline.json")).unwrap();
        assert!(text.contains("\"type\": \"section\""));
    }

    #[test]
    fn test_layout_survives_bincode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.bin");
        let layout = sample_layout();

        save_layout(&layout, &path).unwrap();
        let back = load_layout(&path).unwrap();
        assert_eq!(back.render_text(), layout.render_text());
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(SaveFormat::from_path(Path::new("a.json")), SaveFormat::Json);
        assert_eq!(SaveFormat::from_path(Path::new("a.bincode")), SaveFormat::Bincode);
        assert_eq!(SaveFormat::from_path(Path::new("a")), SaveFormat::Json);

        assert!(SaveFormat::is_outline_path(Path::new("a/finance.outline.json")));
        assert!(SaveFormat::is_outline_path(Path::new("finance.bin")));
        assert!(!SaveFormat::is_outline_path(Path::new("catalog.json")));
        assert!(!SaveFormat::is_outline_path(Path::new("module.txt")));
    }

    #[test]
    fn test_missing_outline_is_named() {
        let err = load_outline(Path::new("/nonexistent/outline.json")).unwrap_err();
        assert!(matches!(err, OutlineError::OutlineNotFound(_)));
        assert!(err.to_string().contains("Outline not found"));
    }

    #[test]
    fn test_save_exports() {
        let dir = TempDir::new().unwrap();
        let layout = sample_layout();

        let text_path = dir.path().join("out").join("test_module_outline.txt");
        save_export(&layout, &text_path, ExportFormat::Text).unwrap();
        let text = fs::read_to_string(&text_path).unwrap();
        assert!(text.contains("Introduction"));
        assert!(text.contains("Page 1 of 1"));

        let json_path = dir.path().join("test_module_outline.json");
        save_export(&layout, &json_path, ExportFormat::Json).unwrap();
        assert!(fs::read_to_string(&json_path).unwrap().contains("\"pages\""));

        let pdf_path = dir.path().join("test_module_outline.pdf");
        save_export(&layout, &pdf_path, ExportFormat::Pdf).unwrap();
        assert!(fs::read(&pdf_path).unwrap().starts_with(b"%PDF"));
    }
}
