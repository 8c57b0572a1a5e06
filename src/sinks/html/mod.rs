//! Standalone HTML page generation.
//!
//! Every page is a single self-contained file: styles are inlined in a `<style>`
//! block so the output can be opened from disk, mailed around, or printed to PDF
//! from a browser without any companion assets.

pub mod styles;
mod volume;

pub use volume::{render as render_volume, PAGE_BREAK};

use crate::markdown::{Rendered, TOC_ID};
use chrono::Local;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// File name of the index page written next to converted pages.
pub const INDEX_PAGE: &str = "index.html";

/// Deepest heading level listed in a standalone document's table of contents.
const DOCUMENT_TOC_DEPTH: u8 = 3;

/// One line of a table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    pub title: String,
    pub href: String,
}

/// One card on an index page.
#[derive(Debug, Clone, Default)]
pub struct IndexCard {
    pub href: String,
    pub title: String,
    /// Short facts shown under the title ("3 diagrams", "Source: flows.md")
    pub details: Vec<String>,
    pub preview: Option<String>,
}

/// An index page linking to generated pages.
#[derive(Debug, Clone, Default)]
pub struct IndexPage {
    pub title: String,
    pub subtitle: String,
    /// Summary line above the cards, e.g. "4 files, 9 diagrams"
    pub summary: String,
    pub cards: Vec<IndexCard>,
}

/// Wrap a body fragment in a complete HTML document.
///
/// `head_extra` is inserted verbatim at the end of `<head>` (scripts, meta tags).
pub fn document(title: &str, css: &str, head_extra: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
{head_extra}
</head>
<body>
{body}
</body>
</html>
"#,
        title = html_escape::encode_text(title),
    )
}

/// The "Generated on" line placed at the bottom of pages.
pub fn generated_footer() -> String {
    format!(
        r#"<div class="footer"><p>Generated on {}</p></div>"#,
        Local::now().format("%B %d, %Y at %H:%M")
    )
}

/// Render a nested table of contents.
///
/// Levels are relative: the shallowest entry becomes the top of the list, and an
/// entry never nests more than one level deeper than the one before it.
pub fn render_toc(heading: &str, entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let base = entries.iter().map(|e| e.level).min().unwrap_or(1);
    let mut html = format!(
        "<div class=\"toc\" id=\"{TOC_ID}\">\n<h2>{}</h2>\n<ul>\n",
        html_escape::encode_text(heading)
    );
    let mut depth = 0usize;

    for (i, entry) in entries.iter().enumerate() {
        let target = if i == 0 {
            0
        } else {
            ((entry.level - base) as usize).min(depth + 1)
        };

        if i > 0 {
            if target > depth {
                html.push_str("\n<ul>\n");
                depth = target;
            } else {
                html.push_str("</li>\n");
                while depth > target {
                    html.push_str("</ul>\n</li>\n");
                    depth -= 1;
                }
            }
        }

        html.push_str(&format!(
            r#"<li><a href="{}">{}</a>"#,
            html_escape::encode_double_quoted_attribute(&entry.href),
            html_escape::encode_text(&entry.title)
        ));
    }

    html.push_str("</li>\n");
    while depth > 0 {
        html.push_str("</ul>\n</li>\n");
        depth -= 1;
    }
    html.push_str("</ul>\n</div>\n");
    html
}

/// Join markdown documents into one, each introduced by a `<!-- name -->`
/// comment and separated from the previous one by a page break.
pub fn combine_markdown<'a, I>(documents: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut parts = Vec::new();
    for (name, markdown) in documents {
        if !parts.is_empty() {
            parts.push(PAGE_BREAK.to_string());
        }
        parts.push(html_comment(name));
        parts.push(markdown.to_string());
    }
    parts.join("\n\n")
}

/// An HTML comment holding `text`, which must not close the comment early.
pub fn html_comment(text: &str) -> String {
    format!("<!-- {} -->", text.replace("--", "- -"))
}

/// A complete page for one rendered markdown document.
pub fn render_document(title: &str, rendered: &Rendered, include_toc: bool) -> String {
    let toc = if include_toc {
        let entries = rendered
            .headings
            .iter()
            .filter(|h| h.level <= DOCUMENT_TOC_DEPTH)
            .map(|h| TocEntry {
                level: h.level,
                title: h.text.clone(),
                href: format!("#{}", h.id),
            })
            .collect::<Vec<_>>();
        render_toc("Table of Contents", &entries)
    } else {
        String::new()
    };

    let body = format!(
        r#"<div class="document-header">
<h1 class="document-title">{title}</h1>
<p class="document-date">{date}</p>
</div>
{toc}
<div class="content">
{content}
</div>
{footer}"#,
        title = html_escape::encode_text(title),
        date = Local::now().format("%B %d, %Y"),
        content = rendered.html,
        footer = generated_footer(),
    );
    document(title, styles::DOCUMENT, "", &body)
}

/// Render an index page of cards linking to generated pages.
pub fn render_index(index: &IndexPage) -> String {
    let cards = index
        .cards
        .iter()
        .map(|card| {
            let details = card
                .details
                .iter()
                .map(|d| format!("<span>{}</span>", html_escape::encode_text(d)))
                .collect::<Vec<_>>()
                .join("");
            let preview = card
                .preview
                .as_deref()
                .map(|p| format!(r#"<p class="preview">{}</p>"#, html_escape::encode_text(p)))
                .unwrap_or_default();
            format!(
                r#"<div class="card">
    <h3><a href="{href}">{title}</a></h3>
    <div class="details">{details}</div>
    {preview}
</div>"#,
                href = html_escape::encode_double_quoted_attribute(&card.href),
                title = html_escape::encode_text(&card.title),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        r#"<div class="header">
    <h1>{title}</h1>
    <div class="subtitle">{subtitle}</div>
</div>
<div class="summary">{summary}</div>
<div class="grid">
{cards}
</div>
{footer}"#,
        title = html_escape::encode_text(&index.title),
        subtitle = html_escape::encode_text(&index.subtitle),
        summary = html_escape::encode_text(&index.summary),
        footer = generated_footer(),
    );

    document(&index.title, styles::INDEX, "", &body)
}

/// `"1 diagram"` / `"2 diagrams"`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn lossy(name: Option<&std::ffi::OsStr>) -> String {
    name.map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Page names for converted files, one per file and in the same order.
///
/// A page is normally `{stem}.html`. Files whose stems clash (ignoring case), or
/// whose page would replace the index, keep their whole file name instead
/// (`arch.txt.html`). Anything still taken gets a numeric suffix.
pub fn page_names(files: &[PathBuf]) -> Vec<String> {
    let mut stems: HashMap<String, usize> = HashMap::new();
    for path in files {
        *stems
            .entry(lossy(path.file_stem()).to_lowercase())
            .or_default() += 1;
    }

    let mut taken = HashSet::from([INDEX_PAGE.to_string()]);
    let mut names = Vec::with_capacity(files.len());
    for path in files {
        let stem = lossy(path.file_stem());
        let file_name = lossy(path.file_name());
        let mut name = if stems.get(&stem.to_lowercase()).copied().unwrap_or_default() > 1 {
            format!("{file_name}.html")
        } else {
            format!("{stem}.html")
        };
        if taken.contains(&name.to_lowercase()) {
            name = format!("{file_name}.html");
        }
        let mut n = 2;
        while !taken.insert(name.to_lowercase()) {
            name = format!("{stem}-{n}.html");
            n += 1;
        }
        names.push(name);
    }
    names
}
