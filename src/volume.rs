//! Master volume assembly.
//!
//! Combines the chapter files of one directory into a single document: chapters
//! are put in sequence (order file, or file name order), every chapter's headings
//! are moved so its first heading sits at the volume's section level, anchors are
//! made chapter-specific, and the result is written as one HTML page and/or one
//! EPUB package.
//!
//! Everything is read and rendered in memory before the first byte is written, so
//! a failing chapter never leaves a half-finished volume behind.

use crate::book::{Book, BookChapter};
use crate::detection::{detect_title, output_stem, title_from_stem};
use crate::error::{ensure_dir, read_text, write_output};
use crate::file_ordering::{read_order_file, resolve_chapters, ChapterOrder};
use crate::highlight::{Highlighter, SyntaxTheme};
use crate::markdown::{first_heading, level_shift_to, render, RenderOptions};
use crate::sinks::{epub, html};
use anyhow::{Context, Result};
use derive_builder::Builder;
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_AUTHOR: &str = "Generated Document";
pub const DEFAULT_SECTION_LEVEL: u8 = 2;
const DESCRIPTION: &str = "Generated from markdown files";

/// Which artifacts to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formats {
    pub html: bool,
    pub epub: bool,
}

impl Default for Formats {
    fn default() -> Self {
        Formats {
            html: true,
            epub: true,
        }
    }
}

impl Formats {
    /// Formats selected by the `--html-only` / `--epub-only` flags.
    pub fn from_flags(html_only: bool, epub_only: bool) -> Formats {
        Formats {
            html: !epub_only,
            epub: !html_only,
        }
    }
}

/// Everything needed to assemble one volume.
#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct VolumeOptions {
    /// Directory holding the chapter files
    pub dir: PathBuf,
    /// Output directory, defaults to `dir`
    #[builder(setter(into, strip_option), default)]
    pub output: Option<PathBuf>,
    /// Volume title, defaults to the title-cased directory name
    #[builder(setter(into, strip_option), default)]
    pub title: Option<String>,
    #[builder(default = "DEFAULT_AUTHOR.to_string()")]
    pub author: String,
    #[builder(default = "ChapterOrder::Lexicographic { prefix: None }")]
    pub order: ChapterOrder,
    /// Level the first heading of every chapter is moved to
    #[builder(default = "DEFAULT_SECTION_LEVEL")]
    pub section_level: u8,
    /// Colour fenced code blocks with this theme
    #[builder(setter(into, strip_option), default)]
    pub theme: Option<SyntaxTheme>,
    #[builder(default)]
    pub formats: Formats,
    #[builder(default)]
    pub epub: epub::EpubConfig,
}

/// One chapter file, read but not yet rendered.
#[derive(Debug, Clone)]
pub struct Chapter {
    pub path: PathBuf,
    pub file_name: String,
    /// First heading of the file, or its title-cased stem
    pub title: String,
    pub markdown: String,
    /// Whether the title came from the file name because the file has no heading
    pub untitled: bool,
}

impl Chapter {
    pub fn load(path: &Path) -> Result<Chapter> {
        let markdown = read_text(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let heading = first_heading(&markdown);
        let untitled = heading.is_none();
        let title = match heading {
            Some((_, text)) => text,
            None => {
                if markdown.trim().is_empty() {
                    log::warn!("Chapter `{file_name}` is empty");
                } else {
                    log::warn!("Chapter `{file_name}` has no heading, titling it from its file name");
                }
                title_from_stem(path)
            }
        };

        Ok(Chapter {
            path: path.to_path_buf(),
            file_name,
            title,
            markdown,
            untitled,
        })
    }

    /// Render this chapter as the `number`-th (1-based) chapter of a volume.
    pub fn render(
        &self,
        number: usize,
        section_level: u8,
        highlighter: Option<&Highlighter>,
    ) -> BookChapter {
        let section_level = section_level.clamp(1, 6);

        // a chapter without a heading gets one so it still has a TOC entry
        let markdown = if self.untitled {
            format!(
                "{} {}\n\n{}",
                "#".repeat(section_level as usize),
                self.title,
                self.markdown
            )
        } else {
            self.markdown.clone()
        };

        let rendered = render(
            &markdown,
            &RenderOptions {
                id_prefix: format!("chapter-{number}-"),
                level_shift: level_shift_to(&markdown, section_level),
                highlighter,
            },
        );

        BookChapter {
            title: self.title.clone(),
            source: self.path.clone(),
            anchor: format!("chapter-{number}"),
            html: rendered.html,
            headings: rendered.headings,
        }
    }
}

/// Build the chapter order from an optional order file and prefix filter.
///
/// An order file fixes the sequence on its own; a prefix given alongside it is
/// ignored.
pub fn chapter_order(order_file: Option<&Path>, prefix: Option<String>) -> Result<ChapterOrder> {
    match order_file {
        Some(path) => {
            if let Some(prefix) = prefix {
                log::warn!("Ignoring prefix `{prefix}` because an order file was given");
            }
            let names = read_order_file(path)
                .with_context(|| format!("Failed to load order file {}", path.display()))?;
            Ok(ChapterOrder::Explicit(names))
        }
        None => Ok(ChapterOrder::Lexicographic { prefix }),
    }
}

/// Read every chapter of a volume, in reading order.
pub fn load_chapters(dir: &Path, order: &ChapterOrder) -> Result<Vec<Chapter>> {
    let paths = resolve_chapters(dir, order)?;
    log::info!("Found {} chapter(s) in {}", paths.len(), dir.display());
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            log::info!("  {}. {}", i + 1, path.display());
            Chapter::load(path)
        })
        .collect()
}

/// Render loaded chapters into a book.
pub fn assemble(options: &VolumeOptions, title: &str, chapters: &[Chapter]) -> Book {
    let highlighter = options.theme.map(Highlighter::new);

    let mut book = Book::new(title);
    book.add_author(&options.author).set_description(DESCRIPTION);
    for (i, chapter) in chapters.iter().enumerate() {
        book.add_chapter(chapter.render(i + 1, options.section_level, highlighter.as_ref()));
    }
    book
}

/// What a volume run wrote.
#[derive(Debug, Default)]
pub struct VolumeReport {
    pub title: String,
    pub chapters: usize,
    pub html: Option<PathBuf>,
    pub epub: Option<PathBuf>,
}

/// Assemble and write a volume.
pub fn run(options: &VolumeOptions, progress: &ProgressBar) -> Result<VolumeReport> {
    if options.formats.epub {
        epub::ensure_available()?;
    }

    let chapters = load_chapters(&options.dir, &options.order)?;
    let title = options
        .title
        .clone()
        .or_else(|| detect_title(&options.dir))
        .unwrap_or_else(|| "Master Volume".to_string());
    log::info!("Title: {title}");
    log::info!("Author: {}", options.author);

    let book = assemble(options, &title, &chapters);

    let html_doc = if options.formats.html {
        Some(html::render_volume(&book))
    } else {
        None
    };
    let epub_doc = if options.formats.epub {
        progress.set_length(book.chapters.len() as u64);
        let (bytes, stats) = epub::render_to_bytes(&options.epub, &book, progress)
            .with_context(|| "Failed to render EPUB")?;
        log::debug!("EPUB holds {} documents", stats.document_count);
        Some(bytes)
    } else {
        None
    };

    let output_dir = options.output.as_deref().unwrap_or(&options.dir);
    ensure_dir(output_dir)?;
    let stem = output_stem(&title);

    let mut report = VolumeReport {
        title,
        chapters: book.chapters.len(),
        ..VolumeReport::default()
    };

    if let Some(doc) = html_doc {
        let path = output_dir.join(format!("{stem}.html"));
        write_output(&path, doc)?;
        log::info!("Wrote {}", path.display());
        report.html = Some(path);
    }
    if let Some(bytes) = epub_doc {
        let path = output_dir.join(format!("{stem}.epub"));
        if let Err(e) = write_output(&path, bytes) {
            // don't leave half a volume behind
            if let Some(html_path) = report.html.take() {
                if let Err(remove) = std::fs::remove_file(&html_path) {
                    log::warn!("Failed to remove {}: {remove}", html_path.display());
                }
            }
            return Err(e.into());
        }
        log::info!("Wrote {}", path.display());
        report.epub = Some(path);
    }

    Ok(report)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ConvertError;
    use std::fs;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).expect("can write fixture");
    }

    fn chapter_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("can create temp dir");
        write(dir.path(), "02-middle.md", "# Middle\n\nSecond.\n\n## Detail\n");
        write(dir.path(), "01-start.md", "# Start\n\nFirst.\n");
        write(dir.path(), "03-end.md", "## End\n\n### Deep\n\n#### Deeper\n");
        write(dir.path(), "notes.txt", "not a chapter");
        dir
    }

    fn options(dir: &Path, formats: Formats) -> VolumeOptions {
        VolumeOptionsBuilder::default()
            .dir(dir)
            .title("My Book")
            .formats(formats)
            .build()
            .expect("can build options")
    }

    fn html_only() -> Formats {
        Formats::from_flags(true, false)
    }

    fn titles(book: &Book) -> Vec<&str> {
        book.chapters.iter().map(|c| c.title.as_str()).collect()
    }

    #[test]
    fn chapters_default_to_file_name_order() {
        let dir = chapter_dir();
        let opts = options(dir.path(), html_only());
        let chapters = load_chapters(dir.path(), &opts.order).expect("can load chapters");
        let book = assemble(&opts, "My Book", &chapters);
        assert_eq!(titles(&book), vec!["Start", "Middle", "End"]);
        assert_eq!(book.chapters[2].anchor, "chapter-3");
    }

    #[test]
    fn order_file_fixes_sequence_and_membership() {
        let dir = chapter_dir();
        write(dir.path(), "order.txt", "# reading order\n03-end.md\n\n01-start.md\n");
        let order = chapter_order(Some(&dir.path().join("order.txt")), Some("02".to_string()))
            .expect("can read order file");
        let chapters = load_chapters(dir.path(), &order).expect("can load chapters");
        let names: Vec<_> = chapters.iter().map(|c| c.file_name.as_str()).collect();
        assert_eq!(names, vec!["03-end.md", "01-start.md"]);
    }

    #[test]
    fn prefix_filters_chapters() {
        let dir = chapter_dir();
        let order = chapter_order(None, Some("0".to_string())).expect("can build order");
        assert_eq!(load_chapters(dir.path(), &order).expect("can load").len(), 3);
        let order = chapter_order(None, Some("02".to_string())).expect("can build order");
        assert_eq!(load_chapters(dir.path(), &order).expect("can load").len(), 1);
    }

    #[test]
    fn headings_move_to_the_section_level_in_order() {
        let dir = chapter_dir();
        let opts = options(dir.path(), html_only());
        let chapters = load_chapters(dir.path(), &opts.order).expect("can load chapters");
        let book = assemble(&opts, "My Book", &chapters);

        for chapter in &book.chapters {
            assert_eq!(chapter.headings[0].level, DEFAULT_SECTION_LEVEL);
        }
        let end: Vec<_> = book.chapters[2].headings.iter().map(|h| h.level).collect();
        assert_eq!(end, vec![2, 3, 4]);
        assert_eq!(book.chapters[1].headings[1].id, "chapter-2-detail");
    }

    #[test]
    fn shifting_is_clamped_but_keeps_relative_order() {
        let chapter = Chapter {
            path: PathBuf::from("deep.md"),
            file_name: "deep.md".to_string(),
            title: "Top".to_string(),
            markdown: "# Top\n\n###### Six\n\n## Two\n".to_string(),
            untitled: false,
        };
        let rendered = chapter.render(1, 3, None);
        let levels: Vec<_> = rendered.headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![3, 6, 4]);
    }

    #[test]
    fn untitled_chapters_get_a_heading_from_their_file_name() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        write(dir.path(), "getting_started.md", "Just text.\n");
        let chapter = Chapter::load(&dir.path().join("getting_started.md")).expect("can load");
        assert_eq!(chapter.title, "Getting Started");

        let rendered = chapter.render(4, 2, None);
        assert_eq!(rendered.headings[0].level, 2);
        assert_eq!(rendered.headings[0].id, "chapter-4-getting-started");
        assert!(rendered.html.contains("Just text."));
    }

    #[test]
    fn can_write_html_only() {
        let dir = chapter_dir();
        let out = tempfile::tempdir().expect("can create temp dir");
        let mut opts = options(dir.path(), html_only());
        opts.output = Some(out.path().to_path_buf());

        let report = run(&opts, &ProgressBar::hidden()).expect("can build volume");
        let html_path = out.path().join("My_Book.html");
        assert_eq!(report.html.as_deref(), Some(html_path.as_path()));
        assert!(report.epub.is_none());
        assert!(!out.path().join("My_Book.epub").exists());

        let html = fs::read_to_string(html_path).expect("can read output");
        let start = html.find(r#"id="chapter-1""#).expect("has chapter 1");
        let end = html.find(r#"id="chapter-3""#).expect("has chapter 3");
        assert!(start < end);
        assert!(html.contains(r##"<a href="#chapter-2-detail">Detail</a>"##));
        assert!(html.contains("by Generated Document"));
    }

    #[cfg(feature = "epub")]
    #[test]
    fn can_write_epub_only() {
        let dir = chapter_dir();
        let opts = options(dir.path(), Formats::from_flags(false, true));

        let report = run(&opts, &ProgressBar::hidden()).expect("can build volume");
        assert!(report.html.is_none());
        assert!(!dir.path().join("My_Book.html").exists());
        let bytes = fs::read(dir.path().join("My_Book.epub")).expect("can read epub");
        assert!(bytes.starts_with(b"PK"));
    }

    #[cfg(feature = "epub")]
    #[test]
    fn writes_both_formats_by_default() {
        let dir = chapter_dir();
        let opts = options(dir.path(), Formats::default());
        let report = run(&opts, &ProgressBar::hidden()).expect("can build volume");
        assert_eq!(report.chapters, 3);
        assert!(report.html.as_deref().is_some_and(Path::is_file));
        assert!(report.epub.as_deref().is_some_and(Path::is_file));
    }

    #[cfg(feature = "epub")]
    #[test]
    fn failed_epub_write_removes_the_html() {
        let dir = chapter_dir();
        // a directory where the package should go makes the write fail
        fs::create_dir(dir.path().join("My_Book.epub")).expect("can create blocker");
        let opts = options(dir.path(), Formats::default());

        let err = run(&opts, &ProgressBar::hidden()).expect_err("epub write fails");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::Write { .. })
        ));
        assert!(!dir.path().join("My_Book.html").exists());
    }

    #[test]
    fn unreadable_chapter_fails_without_output() {
        let dir = chapter_dir();
        fs::write(dir.path().join("02-middle.md"), b"\xff\xfe\x00\xc3")
            .expect("can write fixture");
        let opts = options(dir.path(), html_only());

        let err = run(&opts, &ProgressBar::hidden()).expect_err("invalid utf-8 fails");
        match err.downcast_ref::<ConvertError>() {
            Some(ConvertError::Read { path, .. }) => {
                assert_eq!(path, &dir.path().join("02-middle.md"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!dir.path().join("My_Book.html").exists());
    }

    #[test]
    fn empty_first_heading_is_skipped_for_the_title() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        write(dir.path(), "odd.md", "#\n\n### Real\n\nBody.\n");
        let chapter = Chapter::load(&dir.path().join("odd.md")).expect("can load");
        assert_eq!(chapter.title, "Real");
        assert!(!chapter.untitled);

        let rendered = chapter.render(1, 2, None);
        let real = rendered
            .headings
            .iter()
            .find(|h| h.text == "Real")
            .expect("keeps the real heading");
        assert_eq!(real.level, 2);
        assert!(!rendered.html.contains("Odd"));
    }

    #[test]
    fn missing_chapter_fails_without_output() {
        let dir = chapter_dir();
        write(dir.path(), "order.txt", "01-start.md\n99-missing.md\n");
        let mut opts = options(dir.path(), html_only());
        opts.order = chapter_order(Some(&dir.path().join("order.txt")), None)
            .expect("can read order file");

        let err = run(&opts, &ProgressBar::hidden()).expect_err("missing chapter fails");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::MissingChapter { name, .. }) if name == "99-missing.md"
        ));
        assert!(!dir.path().join("My_Book.html").exists());
    }

    #[test]
    fn empty_directory_fails() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let err = run(&options(dir.path(), html_only()), &ProgressBar::hidden())
            .expect_err("empty dir fails");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::EmptyInput(_))
        ));
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let missing = dir.path().join("nope");
        let err = run(&options(&missing, html_only()), &ProgressBar::hidden())
            .expect_err("missing dir fails");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::MissingInput(_))
        ));
    }

    #[test]
    fn title_defaults_to_directory_name() {
        let root = tempfile::tempdir().expect("can create temp dir");
        let dir = root.path().join("field-guide_notes");
        fs::create_dir(&dir).expect("can create chapter dir");
        write(&dir, "a.md", "# A\n");
        let opts = VolumeOptionsBuilder::default()
            .dir(&dir)
            .formats(html_only())
            .build()
            .expect("can build options");

        let report = run(&opts, &ProgressBar::hidden()).expect("can build volume");
        assert_eq!(report.title, "Field Guide Notes");
        assert!(dir.join("Field_Guide_Notes.html").exists());
    }

    #[test]
    fn formats_follow_flags() {
        assert_eq!(Formats::from_flags(false, false), Formats::default());
        assert!(!Formats::from_flags(true, false).epub);
        assert!(!Formats::from_flags(false, true).html);
    }
}
