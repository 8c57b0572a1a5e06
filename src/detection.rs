//! Default titles and inputs derived from file and directory names.
//!
//! Converters fall back to these when the user gives no `--title` and a document
//! has no heading of its own.

use std::path::{Path, PathBuf};

/// Candidate order file names, checked in this order.
const ORDER_FILE_NAMES: &[&str] = &[
    "order.txt",
    "chapter-order.txt",
    "chapters.txt",
    "ORDER",
    ".order",
];

/// Turn a file or directory name into a readable title.
///
/// Hyphens and underscores become spaces and each word is capitalised:
/// `stage-1_intent-processing` becomes `Stage 1 Intent Processing`.
pub fn title_from_name(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title for a file, from its stem.
pub fn title_from_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| title_from_name(&s.to_string_lossy()))
        .unwrap_or_default()
}

/// Detect a title from a directory's name.
pub fn detect_title(dir: &Path) -> Option<String> {
    let canonical = dir.canonicalize().ok()?;
    let dir_name = canonical.file_name()?.to_str()?;
    let title = title_from_name(dir_name);

    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Look for a conventionally named order file inside a chapter directory.
pub fn detect_order_file(dir: &Path) -> Option<PathBuf> {
    ORDER_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// File name used for a master volume's outputs: spaces become underscores.
pub fn output_stem(title: &str) -> String {
    let stem = title
        .trim()
        .replace(' ', "_")
        .replace(['/', '\\', ':'], "-");
    if stem.is_empty() {
        "volume".to_string()
    } else {
        stem
    }
}
