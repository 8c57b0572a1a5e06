//! Table of contents rendering for EPUB.
//!
//! Complements the EPUB's built-in navigation (NCX/nav.xhtml) with a
//! human-readable page listing every chapter and its top-level sections.

use super::{chapter_filename, xhtml_page};
use crate::book::Book;
use crate::sinks::epub::config::EpubConfig;

/// Render the table of contents as XHTML.
pub fn render(config: &EpubConfig, book: &Book) -> String {
    let mut items = Vec::with_capacity(book.chapters.len() + 2);
    items.push("<ol>".to_string());

    for (i, chapter) in book.chapters.iter().enumerate() {
        let file = chapter_filename(i);
        let sections = chapter
            .sections()
            .map(|section| {
                format!(
                    r#"<li><a href="{file}#{}">{}</a></li>"#,
                    section.id,
                    html_escape::encode_text(&section.text)
                )
            })
            .collect::<Vec<_>>();

        let nested = if sections.is_empty() {
            String::new()
        } else {
            format!("<ol>{}</ol>", sections.join(""))
        };
        items.push(format!(
            r#"<li class="chapter-entry"><a href="{file}">{}</a>{nested}</li>"#,
            html_escape::encode_text(&chapter.title)
        ));
    }
    items.push("</ol>".to_string());

    xhtml_page(
        &config.metadata.language,
        &format!("Table of Contents - {}", book.title),
        &format!(
            "<div class=\"toc\">\n<h2>Table of Contents</h2>\n{}\n</div>",
            items.join("\n")
        ),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::book::BookChapter;
    use crate::markdown::Heading;
    use std::path::PathBuf;

    #[test]
    fn can_list_chapters_and_sections() {
        let mut book = Book::new("Guide");
        book.add_chapter(BookChapter {
            title: "Intro".to_string(),
            source: PathBuf::from("intro.md"),
            anchor: "chapter-1".to_string(),
            html: String::new(),
            headings: vec![
                Heading {
                    level: 2,
                    text: "Intro".to_string(),
                    id: "chapter-1-intro".to_string(),
                },
                Heading {
                    level: 3,
                    text: "Scope & Goals".to_string(),
                    id: "chapter-1-scope-goals".to_string(),
                },
            ],
        });

        let html = render(&EpubConfig::default(), &book);
        assert!(html.contains(r#"<a href="chapter_01.xhtml">Intro</a>"#));
        assert!(html.contains(
            r#"<a href="chapter_01.xhtml#chapter-1-scope-goals">Scope &amp; Goals</a>"#
        ));
        assert!(html.contains("<title>Table of Contents - Guide</title>"));
    }
}
