//! EPUB rendering orchestration.
//!
//! Coordinates the generation of all EPUB components: cover, table of contents and
//! one XHTML document per chapter. Uses the `epub-builder` crate which handles
//! the EPUB packaging requirements (OPF manifest, NCX navigation, ZIP structure
//! with proper MIME type). Keeping chapters in separate documents gives e-readers
//! a chapter boundary to break pages on and keeps navigation fast.

mod chapter;
mod cover;
mod toc;

use super::config::{EpubConfig, RenderStats};
use super::styles;
use crate::book::Book;
use anyhow::{Context, Result};
use epub_builder::{EpubBuilder, EpubContent, ReferenceType, TocElement, ZipLibrary};
use indicatif::ProgressBar;
use std::io::Write;

/// File name of the n-th chapter (zero-based) inside the package.
pub fn chapter_filename(index: usize) -> String {
    format!("chapter_{:02}.xhtml", index + 1)
}

impl EpubConfig {
    /// Render a book into an EPUB package written to `writer`.
    ///
    /// Returns statistics about the generated EPUB.
    pub fn render<W: Write>(
        &self,
        book: &Book,
        writer: W,
        progress: &ProgressBar,
    ) -> Result<RenderStats> {
        progress.set_message("Generating EPUB...");

        let zip = ZipLibrary::new().map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to create ZIP library for EPUB")?;
        let mut builder = EpubBuilder::new(zip).map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to build builder")?;

        builder
            .metadata("title", &book.title)
            .map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to set title metadata")?;
        builder
            .metadata("generator", "docforge")
            .map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to set generator metadata")?;
        builder
            .metadata("lang", &self.metadata.language)
            .map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to set language metadata")?;

        for author in &book.authors {
            builder
                .metadata("author", author)
                .map_err(|e| anyhow::anyhow!(e)).with_context(|| format!("Failed to add author metadata for author: {}", author))?;
        }

        if let Some(description) = self.description_opt().or(book.description.as_deref()) {
            builder
                .metadata("description", description)
                .map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to set description metadata")?;
        }
        if let Some(keywords) = self.keywords_opt() {
            builder
                .metadata("subject", keywords)
                .map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to set subject (keywords) metadata")?;
        }

        let stylesheet = styles::generate_stylesheet();
        builder
            .stylesheet(stylesheet.as_bytes())
            .map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to add stylesheet")?;

        let mut document_count = 0;

        if !self.cover.template.is_empty() {
            let cover_html = cover::render(self, book);
            builder
                .add_content(
                    EpubContent::new("cover.xhtml", cover_html.as_bytes())
                        .title("Cover")
                        .reftype(ReferenceType::Cover),
                )
                .map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to add cover page")?;
            document_count += 1;
        }

        if let Some(cover_path) = self.cover_image_path() {
            let image_data = std::fs::read(&cover_path)
                .with_context(|| format!("Failed to read cover image: {}", cover_path.display()))?;
            let mime = mime_from_path(&cover_path);
            let filename = cover_path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "cover-image".to_string());
            builder
                .add_cover_image(&filename, image_data.as_slice(), mime)
                .map_err(|e| anyhow::anyhow!(e)).with_context(|| {
                    format!(
                        "Failed to add cover image to EPUB: {}",
                        cover_path.display()
                    )
                })?;
        }

        if self.toc_page {
            let toc_html = toc::render(self, book);
            builder
                .add_content(
                    EpubContent::new("toc.xhtml", toc_html.as_bytes())
                        .title("Table of Contents")
                        .reftype(ReferenceType::Toc),
                )
                .map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to add table of contents page")?;
            document_count += 1;
        }

        for (i, chapter) in book.chapters.iter().enumerate() {
            progress.inc(1);
            let filename = chapter_filename(i);
            let html = chapter::render(self, chapter);

            let mut content = EpubContent::new(&filename, html.as_bytes())
                .title(&chapter.title)
                .reftype(ReferenceType::Text);
            for section in chapter.sections() {
                content = content.child(TocElement::new(
                    format!("{}#{}", filename, section.id),
                    &section.text,
                ));
            }

            builder.add_content(content).map_err(|e| anyhow::anyhow!(e)).with_context(|| {
                format!(
                    "Failed to add chapter to EPUB: {}",
                    chapter.source.display()
                )
            })?;
            document_count += 1;
        }

        builder
            .generate(writer)
            .map_err(|e| anyhow::anyhow!(e)).with_context(|| "Failed to generate EPUB file")?;

        progress.finish_with_message("EPUB generated");

        Ok(RenderStats { document_count })
    }
}

/// Wrap a body fragment in an XHTML 1.1 document linking the shared stylesheet.
fn xhtml_page(language: &str, title: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.1//EN" "http://www.w3.org/TR/xhtml11/DTD/xhtml11.dtd">
<html xmlns="http://www.w3.org/1999/xhtml" xml:lang="{lang}">
<head>
    <meta http-equiv="Content-Type" content="text/html; charset=UTF-8"/>
    <title>{title}</title>
    <link rel="stylesheet" type="text/css" href="stylesheet.css"/>
</head>
<body>
{body}
</body>
</html>"#,
        lang = html_escape::encode_double_quoted_attribute(language),
        title = html_escape::encode_text(title),
    )
}

/// Determine MIME type from file extension.
fn mime_from_path(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}
