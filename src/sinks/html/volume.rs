//! Single-page rendering of a master volume.
//!
//! Chapters follow one another in one document, separated by page-break markers so
//! that printing from a browser starts every chapter on a fresh page. The table of
//! contents links each chapter's anchor and its top-level sections.

use super::{document, generated_footer, html_comment, render_toc, styles, TocEntry};
use crate::book::Book;
use crate::markdown::TOC_ID;
use crate::sinks::epub::styles::reading_styles;

/// Marker placed between chapters.
pub const PAGE_BREAK: &str = r#"<div class="page-break" style="page-break-before: always;"></div>"#;

/// Table of contents entries: each chapter, then its sections one level deeper.
pub fn toc_entries(book: &Book) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    for chapter in &book.chapters {
        entries.push(TocEntry {
            level: 1,
            title: chapter.title.clone(),
            href: format!("#{}", chapter.anchor),
        });
        entries.extend(chapter.sections().map(|section| TocEntry {
            level: 2,
            title: section.text.clone(),
            href: format!("#{}", section.id),
        }));
    }
    entries
}

/// Render the whole volume as one HTML document.
pub fn render(book: &Book) -> String {
    let mut body = Vec::with_capacity(book.chapters.len() * 3 + 4);

    body.push(format!(
        r#"<h1 id="title">{}</h1>"#,
        html_escape::encode_text(&book.title)
    ));
    if !book.authors.is_empty() {
        body.push(format!(
            r#"<p class="author">by {}</p>"#,
            html_escape::encode_text(&book.authors_display())
        ));
    }
    body.push(render_toc("Table of Contents", &toc_entries(book)));

    for (i, chapter) in book.chapters.iter().enumerate() {
        if i > 0 {
            body.push(PAGE_BREAK.to_string());
        }
        body.push(format!(
            "{}\n<section class=\"chapter\" id=\"{}\">\n{}</section>",
            html_comment(
                &chapter
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default()
            ),
            chapter.anchor,
            chapter.html
        ));
        body.push(format!(
            r##"<p><a href="#{TOC_ID}" class="toc-link">↑ Back to Table of Contents</a></p>"##
        ));
    }
    body.push(generated_footer());

    let css = format!("{}{}{}", reading_styles(), styles::DOCUMENT, styles::VOLUME);
    let head_extra = if book.authors.is_empty() {
        String::new()
    } else {
        format!(
            r#"    <meta name="author" content="{}">"#,
            html_escape::encode_double_quoted_attribute(&book.authors_display())
        )
    };
    document(&book.title, &css, &head_extra, &body.join("\n"))
}
