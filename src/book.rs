use crate::markdown::Heading;
use std::path::PathBuf;

/// Everything the sinks need to know to write a multi-chapter document
#[derive(Debug, Clone, Default)]
pub struct Book {
    /// The title of the book / volume
    pub title: String,

    /// Authors in the order they were given
    pub authors: Vec<String>,

    /// Short description written into the EPUB metadata
    pub description: Option<String>,

    /// Chapters in reading order
    pub chapters: Vec<BookChapter>,
}

/// One rendered chapter
#[derive(Debug, Clone)]
pub struct BookChapter {
    /// Chapter title (its first heading, or derived from the file name)
    pub title: String,

    /// The markdown file this chapter came from
    pub source: PathBuf,

    /// Anchor of the chapter inside a single-page document, e.g. `chapter-3`
    pub anchor: String,

    /// Rendered HTML fragment
    pub html: String,

    /// Headings of the chapter after renumbering, in document order
    pub headings: Vec<Heading>,
}

impl Book {
    pub fn new<S: ToString>(title: S) -> Book {
        Book {
            title: title.to_string(),
            ..Book::default()
        }
    }

    pub fn add_author<S: ToString>(&mut self, author: S) -> &mut Self {
        self.authors.push(author.to_string());
        self
    }

    pub fn set_description<S: ToString>(&mut self, description: S) -> &mut Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn add_chapter(&mut self, chapter: BookChapter) -> &mut Self {
        self.chapters.push(chapter);
        self
    }

    pub fn authors_display(&self) -> String {
        self.authors.join(", ")
    }
}

impl BookChapter {
    /// Headings one level below the chapter's own heading, for navigation.
    pub fn sections(&self) -> impl Iterator<Item = &Heading> {
        let chapter_level = self.headings.first().map(|h| h.level).unwrap_or(1);
        self.headings
            .iter()
            .skip(1)
            .filter(move |h| h.level == chapter_level + 1)
    }
}
