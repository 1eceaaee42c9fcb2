//! Export every module found under a directory.

use crate::config::Config;
use crate::error::{OutlineError, Result};
use crate::export::{ExportFormat, export_file_name, paginate};
use crate::module::{ModuleCatalog, ModuleFormat, TrainingModule};
use crate::persistence::{SaveFormat, save_export};
use log::{info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One exported module.
#[derive(Debug, Clone)]
pub struct ExportedModule {
    pub source: PathBuf,
    pub title: String,
    pub output: PathBuf,
    pub pages: usize,
    pub nodes: usize,
}

/// A file that could not be read as a module catalog.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: OutlineError,
}

/// Result of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub exported: Vec<ExportedModule>,
    pub skipped: Vec<SkippedFile>,
}

/// Paginate one module and write it into `out_dir` under its export file name.
pub fn export_module(
    module: &TrainingModule,
    config: &Config,
    out_dir: &Path,
    format: ExportFormat,
) -> Result<(PathBuf, usize, usize)> {
    let output = out_dir.join(export_file_name(&module.title, format.extension()));
    export_module_to(module, config, &output, format)
}

/// Paginate one module and write it to `output`.
pub fn export_module_to(
    module: &TrainingModule,
    config: &Config,
    output: &Path,
    format: ExportFormat,
) -> Result<(PathBuf, usize, usize)> {
    let parsed = config.parser().parse(&module.bullets);
    let paged = paginate(&module.title, &parsed, &config.layout, &config.footer);
    save_export(&paged, output, format)?;

    info!(
        "exported '{}' to {} ({} pages)",
        module.title,
        output.display(),
        paged.page_count()
    );
    Ok((output.to_path_buf(), paged.page_count(), parsed.node_count()))
}

/// Module source files under `dir`, in sorted path order.
///
/// Saved outlines (`*.outline.json`, `*.bin`) are not module sources and are left out,
/// as is everything below `exclude`.
pub fn find_module_files(dir: &Path, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(OutlineError::ModuleNotFound(dir.display().to_string()));
    }

    // A missing output directory cannot hold anything to skip yet.
    let exclude = exclude.and_then(|path| path.canonicalize().ok());

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| match &exclude {
            Some(exclude) if entry.file_type().is_dir() => entry
                .path()
                .canonicalize()
                .map_or(true, |path| path != *exclude),
            _ => true,
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| ModuleFormat::from_path(path).is_some())
        .filter(|path| !SaveFormat::is_outline_path(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Export every module of every catalog under `dir`.
///
/// Files that fail to load are skipped and reported; write failures abort the run.
/// Titles that map to the same file name get a numeric suffix (`_2`, `_3`, ...).
pub fn export_directory(
    dir: &Path,
    out_dir: &Path,
    config: &Config,
    format: ExportFormat,
) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    let mut taken = HashSet::new();

    for path in find_module_files(dir, Some(out_dir))? {
        let catalog = match ModuleCatalog::from_path(&path) {
            Ok(catalog) => catalog,
            Err(error) => {
                warn!("skipping {}: {}", path.display(), error);
                report.skipped.push(SkippedFile { path, error });
                continue;
            }
        };

        for module in &catalog.modules {
            let output = out_dir.join(unique_file_name(&module.title, format, &mut taken));
            let (output, pages, nodes) = export_module_to(module, config, &output, format)?;
            report.exported.push(ExportedModule {
                source: path.clone(),
                title: module.title.clone(),
                output,
                pages,
                nodes,
            });
        }
    }

    Ok(report)
}

fn unique_file_name(title: &str, format: ExportFormat, taken: &mut HashSet<String>) -> String {
    let mut name = export_file_name(title, format.extension());
    let mut suffix = 1;
    while !taken.insert(name.clone()) {
        suffix += 1;
        name = export_file_name(&format!("{title} {suffix}"), format.extension());
        warn!("export name for '{title}' already used, writing {name}");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_find_module_files() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("b.txt"), "1.1 A");
        write(&dir.path().join("sub/a.yaml"), "title: A");
        write(&dir.path().join("notes.docx"), "x");
        write(&dir.path().join("saved.outline.json"), "{}");

        let files = find_module_files(dir.path(), None).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(names, [PathBuf::from("b.txt"), PathBuf::from("sub/a.yaml")]);

        assert!(find_module_files(&dir.path().join("missing"), None).is_err());
    }

    #[test]
    fn test_export_directory() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("modules");
        let out = dir.path().join("exports");

        write(
            &input.join("finance.txt"),
            "# Finance Basics\nChapter 1: Ledgers\n1.1 Accounts\n",
        );
        write(
            &input.join("catalog.json"),
            r#"[{"title": "HR", "bullets": ["1.1 Hiring"]}, {"title": "Legal"}]"#,
        );
        write(&input.join("broken.yaml"), "title: [unclosed");

        let report =
            export_directory(&input, &out, &Config::default(), ExportFormat::Text).unwrap();

        let mut titles: Vec<_> = report.exported.iter().map(|e| e.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, ["Finance Basics", "HR", "Legal"]);
        assert_eq!(report.skipped.len(), 1);

        let finance = fs::read_to_string(out.join("finance_basics_outline.txt")).unwrap();
        assert!(finance.contains("Ledgers"));
        assert!(out.join("legal_outline.txt").exists());
    }

    #[test]
    fn test_export_module_json() {
        let dir = TempDir::new().unwrap();
        let module = TrainingModule::new("Ops", vec!["Chapter 1: Run".into(), "1.1 Deploy".into()]);
        let (output, pages, nodes) =
            export_module(&module, &Config::default(), dir.path(), ExportFormat::Json).unwrap();
        assert_eq!(output.file_name().unwrap(), "ops_outline.json");
        assert_eq!(pages, 1);
        assert_eq!(nodes, 2);
    }

    #[test]
    fn test_colliding_titles_get_distinct_files() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("modules");
        let out = dir.path().join("exports");
        write(&input.join("a.json"), r#"{"title": "Cash & Credit", "bullets": ["1.1 A"]}"#);
        write(&input.join("b.json"), r#"{"title": "Cash - Credit", "bullets": ["1.1 B"]}"#);

        let report =
            export_directory(&input, &out, &Config::default(), ExportFormat::Text).unwrap();

        let outputs: Vec<_> = report.exported.iter().map(|e| e.output.clone()).collect();
        assert_eq!(
            outputs,
            [
                out.join("cash___credit_outline.txt"),
                out.join("cash___credit_2_outline.txt")
            ]
        );
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
        assert!(fs::read_to_string(&outputs[1]).unwrap().contains("1.1 B"));
    }

    #[test]
    fn test_rerun_skips_output_inside_input() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("modules");
        write(&root.join("finance.txt"), "# Finance\n1.1 Accounts\n");
        write(&root.join("sub/keep.txt"), "");

        // Same directory spelled two ways, as with `batch .` and `-o exports`.
        let input = root.join("sub").join("..");
        let out = root.join("exports");

        let first = export_directory(&input, &out, &Config::default(), ExportFormat::Text).unwrap();
        let second =
            export_directory(&input, &out, &Config::default(), ExportFormat::Text).unwrap();

        let titles = |r: &BatchReport| {
            let mut titles: Vec<_> = r.exported.iter().map(|e| e.title.clone()).collect();
            titles.sort();
            titles
        };
        assert_eq!(titles(&first), ["Finance", "keep"]);
        assert_eq!(titles(&second), titles(&first));
    }
}
