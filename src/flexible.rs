//! Markdown to HTML for one file or a whole directory.
//!
//! A directory is either combined into one printable document or, with
//! `separate`, turned into one page per file plus an index.

use crate::detection::{title_from_name, title_from_stem};
use crate::error::{ensure_dir, read_text, write_output, ConvertError};
use crate::file_ordering::discover;
use crate::highlight::{Highlighter, SyntaxTheme};
use crate::markdown::{plain_text_preview, render, title_from_markdown, RenderOptions};
use crate::sinks::html::{
    combine_markdown, page_names, plural, render_document, render_index, IndexCard, IndexPage,
    INDEX_PAGE,
};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_DIR: &str = "html_output";
pub const COMBINED_NAME: &str = "combined_documents";
const PREVIEW_CHARS: usize = 300;

/// Settings shared by all three modes.
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    pub input: PathBuf,
    /// Treat `input` as a directory of markdown files
    pub dir: bool,
    /// With `dir`: one page per file plus an index
    pub separate: bool,
    /// Output directory, or an `.html` file name for single-file mode
    pub output: Option<PathBuf>,
    pub toc: bool,
    pub title: Option<String>,
    pub theme: Option<SyntaxTheme>,
}

impl HtmlOptions {
    pub fn new<P: Into<PathBuf>>(input: P) -> HtmlOptions {
        HtmlOptions {
            input: input.into(),
            dir: false,
            separate: false,
            output: None,
            toc: true,
            title: None,
            theme: None,
        }
    }

    fn output_dir(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// `--output` names the page itself when it ends in `.html` outside directory mode.
    fn output_file(&self) -> Option<&Path> {
        self.output.as_deref().filter(|p| {
            !self.dir
                && p.extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("html"))
        })
    }
}

/// Pages written by a run; `index` only in separate mode.
#[derive(Debug, Default)]
pub struct HtmlReport {
    pub pages: Vec<PathBuf>,
    pub index: Option<PathBuf>,
}

pub fn run(options: &HtmlOptions) -> Result<HtmlReport> {
    if !options.input.exists() {
        return Err(ConvertError::MissingInput(options.input.clone()).into());
    }
    let highlighter = options.theme.map(Highlighter::new);
    let render_options = RenderOptions {
        highlighter: highlighter.as_ref(),
        ..RenderOptions::default()
    };

    match (options.dir, options.separate) {
        (false, _) => single(options, &render_options),
        (true, false) => combined(options, &render_options),
        (true, true) => separate(options, &render_options),
    }
}

fn dir_title(options: &HtmlOptions) -> String {
    options.title.clone().unwrap_or_else(|| {
        options
            .input
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| title_from_name(&n.to_string_lossy())))
            .unwrap_or_else(|| "Documents".to_string())
    })
}

fn single(options: &HtmlOptions, render_options: &RenderOptions<'_>) -> Result<HtmlReport> {
    let markdown = read_text(&options.input)?;
    let title = options
        .title
        .clone()
        .unwrap_or_else(|| title_from_stem(&options.input));

    let path = match options.output_file() {
        Some(file) => file.to_path_buf(),
        None => {
            let stem = options
                .input
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "document".to_string());
            options.output_dir().join(format!("{stem}.html"))
        }
    };

    let rendered = render(&markdown, render_options);
    write_output(&path, render_document(&title, &rendered, options.toc))?;
    log::info!("Wrote {}", path.display());
    Ok(HtmlReport {
        pages: vec![path],
        index: None,
    })
}

fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let files = discover(dir, &["*.md"], None)?;
    if files.is_empty() {
        return Err(ConvertError::EmptyInput(dir.to_path_buf()).into());
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn combined(options: &HtmlOptions, render_options: &RenderOptions<'_>) -> Result<HtmlReport> {
    let files = markdown_files(&options.input)?;
    let mut documents = Vec::with_capacity(files.len());
    for path in &files {
        log::info!("Reading {}", path.display());
        documents.push((file_name(path), read_text(path)?));
    }

    let markdown = combine_markdown(
        documents
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str())),
    );
    let rendered = render(&markdown, render_options);

    let title = dir_title(options);
    let path = options.output_dir().join(format!("{COMBINED_NAME}.html"));
    write_output(&path, render_document(&title, &rendered, options.toc))?;
    log::info!("Combined {} file(s) into {}", files.len(), path.display());
    Ok(HtmlReport {
        pages: vec![path],
        index: None,
    })
}

fn separate(options: &HtmlOptions, render_options: &RenderOptions<'_>) -> Result<HtmlReport> {
    let files = markdown_files(&options.input)?;
    let output_dir = options.output_dir();
    ensure_dir(&output_dir)?;

    let mut report = HtmlReport::default();
    let mut cards = Vec::with_capacity(files.len());
    for (path, html_name) in files.iter().zip(page_names(&files)) {
        let markdown = read_text(path)?;
        let title = title_from_markdown(&markdown).unwrap_or_else(|| title_from_stem(path));

        let rendered = render(&markdown, render_options);
        let page = output_dir.join(&html_name);
        write_output(&page, render_document(&title, &rendered, options.toc))?;
        log::info!("Wrote {}", page.display());

        cards.push(IndexCard {
            href: html_name,
            title,
            details: vec![format!("Source: {}", file_name(path))],
            preview: Some(plain_text_preview(&markdown, PREVIEW_CHARS)),
        });
        report.pages.push(page);
    }

    let index = output_dir.join(INDEX_PAGE);
    write_output(
        &index,
        render_index(&IndexPage {
            title: dir_title(options),
            subtitle: "Markdown documents".to_string(),
            summary: plural(cards.len(), "document"),
            cards,
        }),
    )?;
    report.index = Some(index);
    Ok(report)
}
