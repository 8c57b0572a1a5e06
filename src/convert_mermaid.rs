//! Mermaid diagrams to standalone HTML pages.
//!
//! Every markdown file with at least one ```` ```mermaid ```` fence becomes one page
//! that renders its diagrams in the browser with Mermaid.js. An index page links
//! the pages in file name order.

use crate::error::{ensure_dir, read_text, write_output, ConvertError};
use crate::fences::blocks_tagged;
use crate::file_ordering::discover_inputs;
use crate::markdown::title_from_markdown;
use crate::sinks::html::{
    document, generated_footer, page_names, plural, render_index, styles, IndexCard, IndexPage,
    INDEX_PAGE,
};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const MERMAID_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/mermaid@10.6.1/dist/mermaid.min.js";
const DEFAULT_TITLE: &str = "Mermaid Diagram";

/// The diagrams of one markdown file.
#[derive(Debug, Clone)]
pub struct DiagramPage {
    pub source: PathBuf,
    /// File name of the generated page
    pub page: String,
    pub title: String,
    pub diagrams: Vec<String>,
}

impl DiagramPage {
    /// Read a markdown file and collect its diagrams for the page `page`.
    ///
    /// Returns `None` when the file has no mermaid fences.
    pub fn load(path: &Path, page: String) -> Result<Option<DiagramPage>> {
        let markdown = read_text(path)?;
        let diagrams = blocks_tagged(&markdown, "mermaid");
        if diagrams.is_empty() {
            return Ok(None);
        }

        Ok(Some(DiagramPage {
            source: path.to_path_buf(),
            page,
            title: title_from_markdown(&markdown).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            diagrams,
        }))
    }

    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn render(&self) -> String {
        let diagrams = self
            .diagrams
            .iter()
            .enumerate()
            .map(|(i, diagram)| {
                format!(
                    "<div class=\"diagram-container\">\n<h3>Diagram {}</h3>\n<div class=\"mermaid\">\n{}\n</div>\n</div>",
                    i + 1,
                    html_escape::encode_text(diagram.trim_end())
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let body = format!(
            r#"<div class="container">
<div class="header">
    <h1>{title}</h1>
    <div class="source">Source: {source}</div>
</div>
<div class="content">
<div class="navigation"><a href="{index}">← Back to Index</a></div>
{diagrams}
</div>
{footer}
</div>"#,
            title = html_escape::encode_text(&self.title),
            source = html_escape::encode_text(&self.source_name()),
            footer = generated_footer(),
            index = INDEX_PAGE,
        );

        document(&self.title, styles::DIAGRAM, &mermaid_head(), &body)
    }
}

fn mermaid_head() -> String {
    format!(
        r#"    <script src="{MERMAID_SCRIPT}"></script>
    <script>
        mermaid.initialize({{ startOnLoad: true, theme: 'default', securityLevel: 'loose' }});
    </script>"#
    )
}

/// Index page linking every diagram page, in the order given.
pub fn render_diagram_index(pages: &[DiagramPage]) -> String {
    let total: usize = pages.iter().map(|p| p.diagrams.len()).sum();
    render_index(&IndexPage {
        title: "Mermaid Diagrams".to_string(),
        subtitle: "Diagrams extracted from markdown documents".to_string(),
        summary: format!(
            "{}, {}",
            plural(pages.len(), "file"),
            plural(total, "diagram")
        ),
        cards: pages
            .iter()
            .map(|page| IndexCard {
                href: page.page.clone(),
                title: page.title.clone(),
                details: vec![
                    plural(page.diagrams.len(), "diagram"),
                    format!("Source: {}", page.source_name()),
                ],
                preview: None,
            })
            .collect(),
    })
}

/// What a conversion wrote.
#[derive(Debug, Default)]
pub struct MermaidReport {
    pub pages: Vec<PathBuf>,
    pub index: PathBuf,
    pub diagrams: usize,
    pub skipped: usize,
}

/// Convert one markdown file, or every markdown file directly inside a directory.
pub fn run(input: &Path, output_dir: &Path) -> Result<MermaidReport> {
    let files = discover_inputs(input, &["*.md"])?;
    if files.is_empty() {
        return Err(ConvertError::EmptyInput(input.to_path_buf()).into());
    }
    log::info!("Found {} markdown file(s) in {}", files.len(), input.display());

    let mut pages = Vec::with_capacity(files.len());
    let mut skipped = 0;
    for (path, name) in files.iter().zip(page_names(&files)) {
        match DiagramPage::load(path, name)? {
            Some(page) => {
                log::info!(
                    "{}: {}",
                    path.display(),
                    plural(page.diagrams.len(), "diagram")
                );
                pages.push(page);
            }
            None => {
                log::warn!("No mermaid diagrams in {}, skipping", path.display());
                skipped += 1;
            }
        }
    }
    if pages.is_empty() {
        return Err(ConvertError::EmptyInput(input.to_path_buf()).into());
    }

    ensure_dir(output_dir)?;
    let mut report = MermaidReport {
        skipped,
        ..MermaidReport::default()
    };
    for page in &pages {
        let path = output_dir.join(&page.page);
        write_output(&path, page.render())?;
        log::debug!("Wrote {}", path.display());
        report.diagrams += page.diagrams.len();
        report.pages.push(path);
    }

    report.index = output_dir.join(INDEX_PAGE);
    write_output(&report.index, render_diagram_index(&pages))?;
    Ok(report)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).expect("can write fixture");
    }

    #[test]
    fn can_convert_directory() {
        let input = tempfile::tempdir().expect("can create temp dir");
        let output = tempfile::tempdir().expect("can create temp dir");
        write(
            input.path(),
            "b-flows.md",
            "# Flows\n\n```mermaid\ngraph TD\n  A-->B\n```\n\n```rust\nfn main() {}\n```\n\n```mermaid\nsequenceDiagram\n  A->>B: hi\n```\n",
        );
        write(input.path(), "a-plain.md", "# Nothing here\n");
        write(
            input.path(),
            "c-crlf.md",
            "```mermaid\r\npie\r\n  \"x\" : 1\r\n```\r\n",
        );

        let report = run(input.path(), output.path()).expect("can convert");
        assert_eq!(report.pages.len(), 2);
        assert_eq!(report.diagrams, 3);
        assert_eq!(report.skipped, 1);
        assert!(!output.path().join("a-plain.html").exists());

        let flows = fs::read_to_string(output.path().join("b-flows.html")).expect("can read page");
        assert_eq!(flows.matches(r#"<div class="mermaid">"#).count(), 2);
        assert!(flows.contains("A--&gt;B"));
        assert!(!flows.contains("fn main"));
        assert!(flows.contains(MERMAID_SCRIPT));
        assert!(flows.contains("<title>Flows</title>"));

        let crlf = fs::read_to_string(output.path().join("c-crlf.html")).expect("can read page");
        assert!(crlf.contains("<title>Mermaid Diagram</title>"));

        let index = fs::read_to_string(report.index).expect("can read index");
        let b = index.find("b-flows.html").expect("links b");
        let c = index.find("c-crlf.html").expect("links c");
        assert!(b < c);
        assert!(index.contains("2 files, 3 diagrams"));
    }

    #[test]
    fn can_convert_single_file() {
        let input = tempfile::tempdir().expect("can create temp dir");
        let output = input.path().join("out");
        write(input.path(), "flows.md", "```mermaid\ngraph LR\n  A-->B\n```\n");
        write(input.path(), "other.md", "```mermaid\npie\n```\n");

        let report = run(&input.path().join("flows.md"), &output).expect("can convert");
        assert_eq!(report.pages, vec![output.join("flows.html")]);
        assert_eq!(report.diagrams, 1);
        assert!(!output.join("other.html").exists());
        assert!(report.index.exists());
    }

    #[test]
    fn index_named_source_keeps_its_own_page() {
        let input = tempfile::tempdir().expect("can create temp dir");
        let output = tempfile::tempdir().expect("can create temp dir");
        write(input.path(), "flows.md", "```mermaid\ngraph TD\n  FlowNode-->X\n```\n");
        write(input.path(), "index.md", "```mermaid\ngraph TD\n  IndexNode-->X\n```\n");

        let report = run(input.path(), output.path()).expect("can convert");
        assert_eq!(
            report.pages,
            vec![output.path().join("flows.html"), output.path().join("index.md.html")]
        );
        let page = fs::read_to_string(&report.pages[1]).expect("can read page");
        assert!(page.contains("IndexNode"));

        let index = fs::read_to_string(&report.index).expect("can read index");
        assert!(!index.contains("IndexNode"));
        assert!(index.contains(r#"href="index.md.html""#));
    }

    #[test]
    fn no_diagrams_is_an_error() {
        let input = tempfile::tempdir().expect("can create temp dir");
        let output = tempfile::tempdir().expect("can create temp dir");
        write(input.path(), "plain.md", "# Plain\n\n```text\nnot a diagram\n```\n");

        let err = run(input.path(), output.path()).expect_err("nothing to convert");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::EmptyInput(_))
        ));
        assert!(!output.path().join("index.html").exists());
    }

    #[test]
    fn missing_input_is_an_error() {
        let output = tempfile::tempdir().expect("can create temp dir");
        let err = run(&output.path().join("missing"), output.path()).expect_err("missing input");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::MissingInput(_))
        ));
    }
}
