//! jdstub — generate compilable Java skeleton sources from javadoc HTML.
//!
//! Supports two modes:
//!
//! - **stdin mode**: `jdstub < Widget.html` prints the stub for one page
//! - **file mode**: `jdstub -o stub/ docs/api` writes one source file per
//!   type page, laid out by package

mod error;
mod model;
mod parser;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info, warn};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use error::StubError;
use parser::ParseOptions;
use render::{EmitOptions, Renderer};

#[derive(Parser)]
#[command(
    name = "jdstub",
    about = "Generate Java skeleton sources from javadoc HTML pages"
)]
struct Cli {
    /// Javadoc pages, directories (searched recursively) or glob patterns.
    /// If omitted, reads a single page from stdin.
    inputs: Vec<String>,

    /// Output directory (required when inputs are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: java (default), json
    #[arg(short = 'f', long, default_value = "java")]
    format: String,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Put a "not yet implemented" comment in every stub body
    #[arg(long)]
    stub_comment: bool,

    /// Drop members whose tag list has an unrecognized term
    #[arg(long)]
    strict: bool,

    /// Log more (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Page names javadoc generates that do not describe a single type.
const EXCLUDED_PAGES: &[&str] = &[
    "allclasses-frame.html",
    "allclasses-noframe.html",
    "allclasses-index.html",
    "allpackages-index.html",
    "constant-values.html",
    "deprecated-list.html",
    "help-doc.html",
    "index-all.html",
    "index.html",
    "overview-frame.html",
    "overview-summary.html",
    "overview-tree.html",
    "package-frame.html",
    "package-summary.html",
    "package-tree.html",
    "package-use.html",
    "serialized-form.html",
];

/// Directories holding cross-reference pages rather than type pages.
const EXCLUDED_DIRS: &[&str] = &["class-use", "index-files"];

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let renderer = render::create_renderer(
        &cli.format,
        EmitOptions {
            indent_width: cli.indent,
            stub_comment: cli.stub_comment,
        },
    )?;
    let options = ParseOptions { strict: cli.strict };

    if cli.inputs.is_empty() {
        return stdin_mode(renderer.as_ref(), &options);
    }

    file_mode(&cli, renderer.as_ref(), &options)
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// stdin mode: read one page from stdin, write the rendered stub to stdout.
fn stdin_mode(renderer: &dyn Renderer, options: &ParseOptions) -> Result<()> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let decl = parser::parse("<stdin>", &input, options).context("<stdin>")?;
    print!("{}", renderer.render(&decl)?);
    Ok(())
}

/// file mode: render every type page, write under the output directory.
fn file_mode(cli: &Cli, renderer: &dyn Renderer, options: &ParseOptions) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when inputs are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let pages = expand_inputs(&cli.inputs)?;

    let mut written = 0usize;
    let mut skipped = 0usize;
    for path in &pages {
        let source = path.display().to_string();
        let html = fs::read_to_string(path).with_context(|| format!("failed to read {}", source))?;

        let decl = match parser::parse(&source, &html, options) {
            Ok(decl) => decl,
            Err(e @ StubError::NestedType(_)) => {
                warn!("skipping {}: {}", source, e);
                skipped += 1;
                continue;
            }
            Err(e) => {
                error!("skipping {}: {}", source, e);
                skipped += 1;
                continue;
            }
        };

        let out_path = output_dir.join(decl.output_path(renderer.file_extension()));
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        fs::write(&out_path, renderer.render(&decl)?)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!("{} -> {}", source, out_path.display());
        written += 1;
    }

    info!("wrote {} file(s), skipped {} page(s)", written, skipped);
    Ok(())
}

/// Expand inputs into the list of type pages to process.
///
/// Files are taken as-is, directories are searched recursively for `*.html`,
/// anything else is treated as a glob pattern. Overview, index and
/// cross-reference pages are dropped.
fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }

        let glob_pattern = if path.is_dir() {
            format!(
                "{}/**/*.html",
                glob::Pattern::escape(pattern.trim_end_matches(['/', '\\']))
            )
        } else {
            pattern.clone()
        };
        let matches: Vec<_> = glob::glob(&glob_pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }

    files.retain(|p| {
        let keep = is_type_page(p);
        if !keep {
            debug!("not a type page: {}", p.display());
        }
        keep
    });
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Whether a javadoc file documents a single type.
fn is_type_page(path: &Path) -> bool {
    let excluded_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| EXCLUDED_PAGES.contains(&name));
    let excluded_dir = path
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .any(|c| c.as_os_str().to_str().is_some_and(|c| EXCLUDED_DIRS.contains(&c)));
    !excluded_name && !excluded_dir
}
