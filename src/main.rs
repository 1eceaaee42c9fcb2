//! Module Outline CLI
//!
//! Parses training-module bullet lists into outlines and exports them.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use module_outline::{
    batch::{export_directory, export_module},
    config::Config,
    export::ExportFormat,
    module::ModuleCatalog,
    outline::OutlineDocument,
    parser::FallbackPolicy,
    persistence::{SaveFormat, file_size, load_outline, save_outline},
    view::OutlineView,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Module Outline - structured outlines from training-module bullet lists
#[derive(Parser)]
#[command(name = "module-outline")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the bare-integer fallback (lenient, strict, off)
    #[arg(long, global = true)]
    fallback: Option<FallbackPolicy>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a module and print its outline
    Parse {
        /// Module file (.txt, .md, .json, .yaml)
        input: PathBuf,

        /// Module id or title within a catalog
        #[arg(short, long)]
        module: Option<String>,

        /// Output as JSON instead of formatted tree
        #[arg(long)]
        json: bool,

        /// Save the parsed outline (.outline.json or .bin)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display the collapsible outline view
    Show {
        /// Module file or saved outline
        input: PathBuf,

        /// Module id or title within a catalog
        #[arg(short, long)]
        module: Option<String>,

        /// Chapter numbers to collapse (e.g. 2 or 2.0)
        #[arg(long)]
        collapse: Vec<String>,

        /// Collapse every chapter
        #[arg(long)]
        collapse_all: bool,
    },

    /// Write the paginated export of a module
    Export {
        /// Module file (.txt, .md, .json, .yaml)
        input: PathBuf,

        /// Module id or title within a catalog
        #[arg(short, long)]
        module: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = "exports")]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
        format: FormatArg,
    },

    /// Show statistics about a module or saved outline
    Info {
        /// Module file or saved outline
        input: PathBuf,

        /// Module id or title within a catalog
        #[arg(short, long)]
        module: Option<String>,
    },

    /// Export every module found under a directory
    Batch {
        /// Directory to search
        dir: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "exports")]
        output: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = FormatArg::Pdf)]
        format: FormatArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Pdf,
    Text,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Pdf => ExportFormat::Pdf,
            FormatArg::Text => ExportFormat::Text,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.fallback)?;

    match cli.command {
        Commands::Parse {
            input,
            module,
            json,
            output,
        } => cmd_parse(&config, input, module, json, output),
        Commands::Show {
            input,
            module,
            collapse,
            collapse_all,
        } => cmd_show(&config, input, module, collapse, collapse_all),
        Commands::Export {
            input,
            module,
            output,
            format,
        } => cmd_export(&config, input, module, output, format.into()),
        Commands::Info { input, module } => cmd_info(&config, input, module),
        Commands::Batch {
            dir,
            output,
            format,
        } => cmd_batch(&config, dir, output, format.into()),
    }
}

fn load_config(path: Option<&Path>, fallback: Option<FallbackPolicy>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_with_file(path)
            .with_context(|| format!("Failed to load config from '{}'", path.display()))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    if let Some(fallback) = fallback {
        config.parser.fallback = fallback;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Read a saved outline, or parse a module source into one.
fn load_document(config: &Config, input: &Path, select: Option<&str>) -> Result<OutlineDocument> {
    if SaveFormat::is_outline_path(input) {
        return load_outline(input)
            .with_context(|| format!("Failed to load outline '{}'", input.display()));
    }

    let catalog = ModuleCatalog::from_path(input)
        .with_context(|| format!("Failed to load module '{}'", input.display()))?;
    let module = catalog.select(select).context("Failed to select module")?;
    Ok(module.outline(&config.parser()))
}

fn cmd_parse(
    config: &Config,
    module_path: PathBuf,
    select: Option<String>,
    json: bool,
    output: Option<PathBuf>,
) -> Result<()> {
    let doc = load_document(config, &module_path, select.as_deref())?;

    if json {
        let json_str = doc.parsed.to_json().context("Failed to serialize outline")?;
        println!("{}", json_str);
    } else {
        println!("{}", doc.format());
    }

    if let Some(output) = output {
        save_outline(&doc, &output).context("Failed to save outline")?;
        let size = file_size(&output)?;
        eprintln!(
            "Outline saved to: {} ({:.1} KB)",
            output.display(),
            size as f64 / 1024.0
        );
    }

    Ok(())
}

fn cmd_show(
    config: &Config,
    input: PathBuf,
    select: Option<String>,
    collapse: Vec<String>,
    collapse_all: bool,
) -> Result<()> {
    let doc = load_document(config, &input, select.as_deref())?;
    let mut view = OutlineView::new(&doc.parsed, &doc.bullets);

    if collapse_all {
        view.collapse_all();
    }
    for number in &collapse {
        let Some(index) = view.chapter_index(number) else {
            anyhow::bail!("No chapter numbered '{}' in '{}'", number, doc.title);
        };
        if view.is_expanded(index) {
            view.toggle(index);
        }
    }

    println!("{}", doc.title);
    println!("{}", "─".repeat(50));
    for line in view.render() {
        println!("{}", line);
    }

    Ok(())
}

fn cmd_export(
    config: &Config,
    module_path: PathBuf,
    select: Option<String>,
    output: PathBuf,
    format: ExportFormat,
) -> Result<()> {
    let catalog = ModuleCatalog::from_path(&module_path)
        .with_context(|| format!("Failed to load module '{}'", module_path.display()))?;
    let module = catalog
        .select(select.as_deref())
        .context("Failed to select module")?;

    let (path, pages, nodes) =
        export_module(module, config, &output, format).context("Failed to write export")?;

    println!("Exported: {}", module.title);
    println!("  Topics:  {}", nodes);
    println!("  Pages:   {}", pages);
    println!("  File:    {}", path.display());

    Ok(())
}

fn cmd_info(config: &Config, input: PathBuf, select: Option<String>) -> Result<()> {
    let doc = load_document(config, &input, select.as_deref())?;
    let report = config.parser().parse_with_report(&doc.bullets);
    let stats = doc.parsed.stats();

    println!("Module Outline Information");
    println!("{}", "─".repeat(40));
    println!("  Module:       {}", doc.title);
    if let Some(id) = &doc.module_id {
        println!("  Id:           {}", id);
    }
    println!("  Bullets:      {}", doc.bullets.len());
    println!("  Chapters:     {}", stats.chapters);
    println!("  Sections:     {}", stats.sections);
    println!("  Subtopics:    {}", stats.subtopics);
    println!("  Max depth:    {}", doc.parsed.max_depth());
    println!("  Duplicates:   {}", report.duplicates);
    println!("  Unmatched:    {}", report.dropped.len());
    println!("  Fallback:     {}", config.parser.fallback);

    if !report.items.is_empty() {
        println!("  Matched by:");
        for (kind, count) in report.count_by_kind() {
            println!("    {:<16}{}", kind.as_str(), count);
        }
    }
    for item in report.fallback_items() {
        println!("    ? {} <- {}", item.key, item.original_line);
    }
    for line in &report.dropped {
        println!("    - {}", line);
    }

    Ok(())
}

fn cmd_batch(config: &Config, dir: PathBuf, output: PathBuf, format: ExportFormat) -> Result<()> {
    let start = Instant::now();

    let report =
        export_directory(&dir, &output, config, format).context("Batch export failed")?;

    for exported in &report.exported {
        println!(
            "{:<40} {:>3} pages  {}",
            exported.title,
            exported.pages,
            exported.output.display()
        );
    }
    for skipped in &report.skipped {
        println!("skipped {}: {}", skipped.path.display(), skipped.error);
    }

    println!("{}", "─".repeat(60));
    println!(
        "Exported {} modules ({} files skipped) in {:.2?}",
        report.exported.len(),
        report.skipped.len(),
        start.elapsed()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_flag_selects_catalog_entry() {
        let cli = Cli::try_parse_from(["module-outline", "show", "catalog.yaml", "--module", "hr"])
            .unwrap();
        match cli.command {
            Commands::Show { input, module, .. } => {
                assert_eq!(input, PathBuf::from("catalog.yaml"));
                assert_eq!(module.as_deref(), Some("hr"));
            }
            _ => panic!("expected show"),
        }

        let cli = Cli::try_parse_from(["module-outline", "info", "c.json", "-m", "Finance"]).unwrap();
        assert!(matches!(cli.command, Commands::Info { module: Some(m), .. } if m == "Finance"));

        assert!(Cli::try_parse_from(["module-outline", "parse", "c.json", "--select", "x"]).is_err());
    }

    #[test]
    fn test_export_defaults_to_pdf() {
        let cli = Cli::try_parse_from(["module-outline", "export", "finance.txt"]).unwrap();
        match cli.command {
            Commands::Export { format, output, module, .. } => {
                assert_eq!(format, FormatArg::Pdf);
                assert_eq!(output, PathBuf::from("exports"));
                assert_eq!(module, None);
            }
            _ => panic!("expected export"),
        }

        let cli =
            Cli::try_parse_from(["module-outline", "batch", "modules", "--format", "text"]).unwrap();
        assert!(matches!(cli.command, Commands::Batch { format: FormatArg::Text, .. }));
    }
}
