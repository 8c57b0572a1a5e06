//! ASCII art diagrams to printable HTML figures.

use crate::error::{ensure_dir, read_text, write_output, ConvertError};
use crate::fences::{fenced_blocks, trim_blank_lines};
use crate::file_ordering::discover_inputs;
use crate::sinks::html::{
    document, generated_footer, page_names, plural, render_index, styles, IndexCard, IndexPage,
    INDEX_PAGE,
};
use anyhow::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const DEFAULT_TITLE: &str = "ASCII Diagram";
/// Lines searched for a title.
const TITLE_WINDOW: usize = 10;
const PREVIEW_LINES: usize = 8;
const BOX_DRAWING: &[char] = &['┌', '┐', '└', '┘', '│', '─', '┬', '┴', '├', '┤', '┼'];

/// `FIGURE 3: ...`, any case
static FIGURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^FIGURE\s+\d+:").expect("can compile figure pattern"));

/// A line of capitals and spaces, e.g. `SYSTEM ARCHITECTURE`
static CAPS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z\s]+[A-Z]$").expect("can compile caps pattern"));

/// Pick a figure title from the first lines of a file.
///
/// A `FIGURE N:` line wins, extended with the following line unless that line is
/// part of the drawing. Otherwise the first all-caps line longer than ten
/// characters is used.
pub fn detect_title(content: &str) -> String {
    let lines: Vec<&str> = content.trim().lines().collect();

    for (i, line) in lines.iter().take(TITLE_WINDOW).enumerate() {
        let line = line.trim();
        if FIGURE_RE.is_match(line) {
            let next = lines.get(i + 1).map(|l| l.trim()).unwrap_or_default();
            if !next.is_empty() && !next.contains(BOX_DRAWING) {
                return format!("{line} - {next}");
            }
            return line.to_string();
        }
        if CAPS_RE.is_match(line) && line.chars().count() > 10 {
            return line.to_string();
        }
    }

    DEFAULT_TITLE.to_string()
}

/// The art itself: fenced block bodies if there are any, else the whole file.
pub fn extract_art(content: &str) -> String {
    let blocks = fenced_blocks(content);
    if blocks.is_empty() {
        trim_blank_lines(&content.replace("\r\n", "\n"))
    } else {
        let bodies = blocks
            .iter()
            .map(|b| trim_blank_lines(&b.body))
            .collect::<Vec<_>>();
        trim_blank_lines(&bodies.join("\n\n"))
    }
}

/// One converted figure.
#[derive(Debug, Clone)]
pub struct Figure {
    pub source: PathBuf,
    /// File name of the generated page
    pub page: String,
    pub title: String,
    pub art: String,
}

impl Figure {
    /// Read a file that will be written as `page`; `None` when it holds nothing
    /// but whitespace.
    pub fn load(path: &Path, page: String) -> Result<Option<Figure>> {
        let content = read_text(path)?;
        let art = extract_art(&content);
        if art.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Figure {
            source: path.to_path_buf(),
            page,
            title: detect_title(&content),
            art,
        }))
    }

    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn preview(&self) -> String {
        self.art
            .lines()
            .take(PREVIEW_LINES)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render(&self) -> String {
        let body = format!(
            r#"<div class="container">
<div class="header">
    <h1>{title}</h1>
    <div class="source">Source: {source}</div>
</div>
<div class="content">
<div class="navigation"><a href="{index}">← Back to Index</a> | <a href="javascript:window.print()">Print</a></div>
<div class="diagram-container">
<figure class="ascii-art">
<pre>{art}</pre>
<figcaption>{title}</figcaption>
</figure>
</div>
</div>
{footer}
</div>"#,
            title = html_escape::encode_text(&self.title),
            source = html_escape::encode_text(&self.source_name()),
            art = html_escape::encode_text(&self.art),
            footer = generated_footer(),
            index = INDEX_PAGE,
        );
        document(&self.title, styles::DIAGRAM, "", &body)
    }
}

pub fn render_figure_index(figures: &[Figure]) -> String {
    render_index(&IndexPage {
        title: "ASCII Diagrams".to_string(),
        subtitle: "Technical diagrams rendered from plain text".to_string(),
        summary: plural(figures.len(), "diagram"),
        cards: figures
            .iter()
            .map(|figure| IndexCard {
                href: figure.page.clone(),
                title: figure.title.clone(),
                details: vec![format!("Source: {}", figure.source_name())],
                preview: Some(figure.preview()),
            })
            .collect(),
    })
}

#[derive(Debug, Default)]
pub struct AsciiReport {
    pub pages: Vec<PathBuf>,
    pub index: PathBuf,
    pub skipped: usize,
}

/// Convert one file, or every `.txt` and `.md` file directly inside a directory.
pub fn run(input: &Path, output_dir: &Path) -> Result<AsciiReport> {
    let files = discover_inputs(input, &["*.txt", "*.md"])?;
    if files.is_empty() {
        return Err(ConvertError::EmptyInput(input.to_path_buf()).into());
    }
    log::info!("Found {} ASCII art file(s)", files.len());

    let mut figures = Vec::with_capacity(files.len());
    let mut skipped = 0;
    for (path, page) in files.iter().zip(page_names(&files)) {
        match Figure::load(path, page)? {
            Some(figure) => {
                log::info!("{}: {}", path.display(), figure.title);
                figures.push(figure);
            }
            None => {
                log::warn!("Skipping empty file {}", path.display());
                skipped += 1;
            }
        }
    }
    if figures.is_empty() {
        return Err(ConvertError::EmptyInput(input.to_path_buf()).into());
    }

    ensure_dir(output_dir)?;
    let mut pages = Vec::with_capacity(figures.len());
    for figure in &figures {
        let path = output_dir.join(&figure.page);
        write_output(&path, figure.render())?;
        pages.push(path);
    }
    let index = output_dir.join(INDEX_PAGE);
    write_output(&index, render_figure_index(&figures))?;

    Ok(AsciiReport {
        pages,
        index,
        skipped,
    })
}
