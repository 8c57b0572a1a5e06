//! Input discovery and chapter ordering.
//!
//! Every converter starts the same way: list the matching files directly inside a
//! directory, then put them in reading order. Reading order is the file name sort
//! unless the user supplies an order file, in which case the order file is the
//! whole truth: listed files appear in listed order and nothing else is included.

use crate::error::ConvertError;
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// File name patterns treated as markdown chapters.
pub const MARKDOWN_PATTERNS: &[&str] = &["*.md", "*.markdown"];

/// How chapters are put in sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterOrder {
    /// File names read from an order file, in order
    Explicit(Vec<String>),
    /// All markdown files sorted by name, optionally only those starting with a prefix
    Lexicographic { prefix: Option<String> },
}

fn glob_set(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .with_context(|| format!("Failed to parse glob `{pattern}`"))?;
        builder.add(glob);
    }
    builder.build().with_context(|| "Failed to build glob set")
}

/// List files directly inside `dir` whose names match any of `patterns`.
///
/// Hidden files are skipped. When `prefix` is set only names starting with it are
/// kept. The result is sorted by file name.
pub fn discover(dir: &Path, patterns: &[&str], prefix: Option<&str>) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConvertError::MissingInput(dir.to_path_buf()).into());
    }
    let matcher = glob_set(patterns)?;

    let mut files = Vec::new();
    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .hidden(true)
        .follow_links(true)
        .build();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to list `{}`", dir.display()))?;
        if entry.depth() == 0 || !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !matcher.is_match(name.as_ref()) {
            continue;
        }
        if prefix.is_some_and(|prefix| !name.starts_with(prefix)) {
            continue;
        }
        files.push(entry.into_path());
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::debug!("Discovered {} file(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// The given file on its own, or the matching files of a directory.
///
/// A file named explicitly is taken as-is, whatever its extension.
pub fn discover_inputs(input: &Path, patterns: &[&str]) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    discover(input, patterns, None)
}

/// Order file entries name files directly inside the chapter directory.
fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(components.next(), Some(Component::Normal(_)))
        && components.next().is_none()
        && !name.contains(['/', '\\'])
}

/// Read an order file: one file name per line.
///
/// Surrounding whitespace is trimmed, blank lines are skipped and lines starting
/// with `#` are comments.
pub fn read_order_file(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        return Err(ConvertError::MissingInput(path.to_path_buf()).into());
    }
    let contents = crate::error::read_text(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Resolve the chapter files of `dir` in reading order.
pub fn resolve_chapters(dir: &Path, order: &ChapterOrder) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ConvertError::MissingInput(dir.to_path_buf()).into());
    }

    let files = match order {
        ChapterOrder::Explicit(names) => {
            let mut seen = HashSet::new();
            let mut files = Vec::with_capacity(names.len());
            for name in names {
                if !seen.insert(name.as_str()) {
                    log::warn!("`{name}` is listed more than once in the order file, keeping the first");
                    continue;
                }
                if !is_plain_name(name) {
                    return Err(ConvertError::InvalidOrderEntry(name.clone()).into());
                }
                let path = dir.join(name);
                if !path.is_file() {
                    return Err(ConvertError::MissingChapter {
                        name: name.clone(),
                        dir: dir.to_path_buf(),
                    }
                    .into());
                }
                files.push(path);
            }
            files
        }
        ChapterOrder::Lexicographic { prefix } => {
            discover(dir, MARKDOWN_PATTERNS, prefix.as_deref())?
        }
    };

    if files.is_empty() {
        return Err(ConvertError::EmptyInput(dir.to_path_buf()).into());
    }
    Ok(files)
}
