//! Cover page rendering for EPUB.
//!
//! Creates the book's cover page from a configurable template with placeholders
//! for title, authors and date. Supports an optional cover image. The cover is
//! marked with EPUB's cover reference type so e-readers display it appropriately
//! in library views.

use super::xhtml_page;
use crate::book::Book;
use crate::sinks::epub::config::EpubConfig;
use chrono::Local;

/// Render the cover page as XHTML.
pub fn render(config: &EpubConfig, book: &Book) -> String {
    let date = Local::now().format("%Y-%m-%d").to_string();

    // expand template
    let content = config
        .cover
        .template
        .replace("{title}", &book.title)
        .replace("{authors}", &book.authors_display())
        .replace("{date}", &date);

    // convert to HTML paragraphs
    let body_html = content
        .lines()
        .map(|line| {
            if line.trim().is_empty() {
                "<br/>".to_string()
            } else {
                format!("<p>{}</p>", html_escape::encode_text(line))
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let image_html = match config.cover_image_path() {
        Some(path) => {
            let filename = path
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "cover-image".to_string());
            format!(
                r#"<img src="{}" alt="Cover"/>"#,
                html_escape::encode_double_quoted_attribute(&filename)
            )
        }
        None => String::new(),
    };

    xhtml_page(
        &config.metadata.language,
        &book.title,
        &format!("<div class=\"cover\">\n{image_html}\n{body_html}\n</div>"),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_expand_cover_template() {
        let mut book = Book::new("Field <Notes>");
        book.add_author("Jane Doe").add_author("John Smith");
        let config = EpubConfig::default();

        let html = render(&config, &book);
        assert!(html.contains("<p>Field &lt;Notes&gt;</p>"));
        assert!(html.contains("<p>Jane Doe, John Smith</p>"));
        assert!(html.contains("<p>- by -</p>"));
        assert!(!html.contains("{date}"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn cover_image_is_referenced_by_file_name() {
        let mut config = EpubConfig::default();
        config.cover.image = "art/front.png".to_string();
        let html = render(&config, &Book::new("Guide"));
        assert!(html.contains(r#"<img src="front.png" alt="Cover"/>"#));
    }
}
