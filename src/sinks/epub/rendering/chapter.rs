//! Chapter document rendering for EPUB.

use super::xhtml_page;
use crate::book::BookChapter;
use crate::sinks::epub::config::EpubConfig;

/// Render one chapter as a standalone XHTML document.
pub fn render(config: &EpubConfig, chapter: &BookChapter) -> String {
    xhtml_page(
        &config.metadata.language,
        &chapter.title,
        &format!(
            "<div class=\"chapter\" id=\"{}\">\n{}</div>",
            chapter.anchor, chapter.html
        ),
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn can_render_chapter_document() {
        let chapter = BookChapter {
            title: "Intro".to_string(),
            source: PathBuf::from("intro.md"),
            anchor: "chapter-1".to_string(),
            html: "<h2 id=\"chapter-1-intro\">Intro</h2>\n<hr />\n".to_string(),
            headings: Vec::new(),
        };
        let html = render(&EpubConfig::default(), &chapter);
        assert!(html.starts_with("<?xml"));
        assert!(html.contains(r#"xml:lang="en""#));
        assert!(html.contains(r#"<div class="chapter" id="chapter-1">"#));
        assert!(html.contains("<title>Intro</title>"));
        assert!(html.contains(r#"href="stylesheet.css""#));
    }
}
