//! Kindle-ready EPUB from one markdown file or a directory of them.

use crate::book::{Book, BookChapter};
use crate::detection::{title_from_name, title_from_stem};
use crate::error::{read_text, write_output, ConvertError};
use crate::file_ordering::{discover, MARKDOWN_PATTERNS};
use crate::highlight::{Highlighter, SyntaxTheme};
use crate::markdown::{render, title_from_markdown, RenderOptions};
use crate::sinks::epub::{self, EpubConfig};
use crate::volume::DEFAULT_AUTHOR;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

const DESCRIPTION: &str = "Generated from markdown files";

#[derive(Debug, Clone)]
pub struct KindleOptions {
    /// A markdown file, or a directory when `dir` is set
    pub input: PathBuf,
    pub dir: bool,
    /// Output directory, defaults to the input's directory (or the directory itself)
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub author: String,
    pub theme: Option<SyntaxTheme>,
    pub epub: EpubConfig,
}

impl KindleOptions {
    pub fn new<P: Into<PathBuf>>(input: P) -> KindleOptions {
        KindleOptions {
            input: input.into(),
            dir: false,
            output: None,
            title: None,
            author: DEFAULT_AUTHOR.to_string(),
            theme: None,
            epub: EpubConfig::default(),
        }
    }
}

#[derive(Debug)]
pub struct KindleReport {
    pub output: PathBuf,
    pub title: String,
    pub chapters: usize,
}

struct Source {
    path: PathBuf,
    markdown: String,
}

fn chapter(number: usize, source: &Source, highlighter: Option<&Highlighter>) -> BookChapter {
    let rendered = render(
        &source.markdown,
        &RenderOptions {
            id_prefix: format!("chapter-{number}-"),
            highlighter,
            ..RenderOptions::default()
        },
    );
    BookChapter {
        title: title_from_markdown(&source.markdown)
            .unwrap_or_else(|| title_from_stem(&source.path)),
        source: source.path.clone(),
        anchor: format!("chapter-{number}"),
        html: rendered.html,
        headings: rendered.headings,
    }
}

fn read_sources(options: &KindleOptions) -> Result<Vec<Source>> {
    let paths = if options.dir {
        discover(&options.input, MARKDOWN_PATTERNS, None)?
    } else {
        vec![options.input.clone()]
    };

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        let markdown = read_text(&path)?;
        if markdown.trim().is_empty() {
            log::warn!("Skipping empty file {}", path.display());
            continue;
        }
        sources.push(Source { path, markdown });
    }
    if sources.is_empty() {
        return Err(ConvertError::EmptyInput(options.input.clone()).into());
    }
    Ok(sources)
}

fn book_title(options: &KindleOptions, sources: &[Source]) -> String {
    if let Some(title) = &options.title {
        return title.clone();
    }
    if options.dir {
        options
            .input
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| title_from_name(&n.to_string_lossy())))
            .unwrap_or_else(|| "Untitled".to_string())
    } else {
        sources
            .first()
            .and_then(|s| title_from_markdown(&s.markdown))
            .unwrap_or_else(|| title_from_stem(&options.input))
    }
}

/// Where the package goes: `{stem}.epub` for a file, `{dir_name}.epub` for a directory.
fn output_path(options: &KindleOptions) -> PathBuf {
    let name = if options.dir {
        options
            .input
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
            .unwrap_or_else(|| "book".to_string())
    } else {
        options
            .input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "book".to_string())
    };

    let dir = match &options.output {
        Some(dir) => dir.clone(),
        None if options.dir => options.input.clone(),
        None => options
            .input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
    };
    dir.join(format!("{name}.epub"))
}

pub fn run(options: &KindleOptions, progress: &ProgressBar) -> Result<KindleReport> {
    epub::ensure_available()?;
    if !options.input.exists() {
        return Err(ConvertError::MissingInput(options.input.clone()).into());
    }

    let sources = read_sources(options)?;
    let highlighter = options.theme.map(Highlighter::new);

    let title = book_title(options, &sources);
    let mut book = Book::new(&title);
    book.add_author(&options.author).set_description(DESCRIPTION);
    for (i, source) in sources.iter().enumerate() {
        let chapter = chapter(i + 1, source, highlighter.as_ref());
        log::info!("Chapter {}: {}", i + 1, chapter.title);
        book.add_chapter(chapter);
    }

    progress.set_length(book.chapters.len() as u64);
    let (bytes, _) = epub::render_to_bytes(&options.epub, &book, progress)
        .with_context(|| format!("Failed to render EPUB for {}", options.input.display()))?;

    let output = output_path(options);
    write_output(&output, bytes)?;
    Ok(KindleReport {
        output,
        title,
        chapters: book.chapters.len(),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn output_paths_follow_the_input() {
        let options = KindleOptions::new("notes/intro.md");
        assert_eq!(output_path(&options), PathBuf::from("notes/intro.epub"));

        let mut options = KindleOptions::new("notes/intro.md");
        options.output = Some(PathBuf::from("out"));
        assert_eq!(output_path(&options), PathBuf::from("out/intro.epub"));
    }

    #[test]
    fn single_file_title_comes_from_its_heading() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join("field-notes.md");
        fs::write(&path, "Intro line\n\n# Real Title\n").expect("can write");
        let options = KindleOptions::new(&path);
        let sources = read_sources(&options).expect("can read");
        assert_eq!(book_title(&options, &sources), "Real Title");

        fs::write(&path, "no heading\n").expect("can write");
        let sources = read_sources(&options).expect("can read");
        assert_eq!(book_title(&options, &sources), "Field Notes");
    }

    #[test]
    fn directory_chapters_are_sorted_and_titled() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        fs::write(dir.path().join("02-b.md"), "# Bee\n").expect("can write");
        fs::write(dir.path().join("01-a.markdown"), "plain\n").expect("can write");
        fs::write(dir.path().join("03-empty.md"), "\n").expect("can write");
        let mut options = KindleOptions::new(dir.path());
        options.dir = true;

        let sources = read_sources(&options).expect("can read");
        let titles: Vec<_> = sources
            .iter()
            .enumerate()
            .map(|(i, s)| chapter(i + 1, s, None).title)
            .collect();
        assert_eq!(titles, vec!["01 A", "Bee"]);
    }

    #[test]
    fn empty_input_is_an_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let mut options = KindleOptions::new(dir.path());
        options.dir = true;
        let err = read_sources(&options).err().expect("nothing to convert");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::EmptyInput(_))
        ));
    }

    #[cfg(feature = "epub")]
    #[test]
    fn can_write_directory_epub() {
        let root = tempfile::tempdir().expect("can create temp dir");
        let dir = root.path().join("my-notes");
        fs::create_dir(&dir).expect("can create dir");
        fs::write(dir.join("a.md"), "# A\n\ntext\n").expect("can write");
        fs::write(dir.join("b.md"), "# B\n\n## Sub\n").expect("can write");
        let mut options = KindleOptions::new(&dir);
        options.dir = true;

        let report = run(&options, &ProgressBar::hidden()).expect("can build epub");
        assert_eq!(report.output, dir.join("my-notes.epub"));
        assert_eq!(report.title, "My Notes");
        assert_eq!(report.chapters, 2);
        let bytes = fs::read(&report.output).expect("can read epub");
        assert!(bytes.starts_with(b"PK"));
    }

    #[cfg(not(feature = "epub"))]
    #[test]
    fn epub_needs_the_feature() {
        let err = run(&KindleOptions::new("x.md"), &ProgressBar::hidden())
            .expect_err("epub is unavailable");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::EpubUnavailable)
        ));
    }
}
