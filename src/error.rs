//! Failure kinds shared by every converter.
//!
//! Command code propagates with `anyhow`, but the conditions a user can act on
//! (a missing path, an empty directory, a stale order file, I/O failures) are
//! raised as `ConvertError` so they can be told apart after the fact.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("input path `{}` does not exist", .0.display())]
    MissingInput(PathBuf),

    #[error("no matching files found in `{}`", .0.display())]
    EmptyInput(PathBuf),

    #[error("chapter `{name}` listed in the order file was not found in `{}`", dir.display())]
    MissingChapter { name: String, dir: PathBuf },

    #[error("order file entry `{0}` must be a file name inside the chapter directory")]
    InvalidOrderEntry(String),

    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("EPUB output is not available: docforge was built without the `epub` feature")]
    EpubUnavailable,
}

/// Read a UTF-8 text file, mapping failures onto [`ConvertError::Read`].
pub fn read_text(path: &Path) -> Result<String, ConvertError> {
    std::fs::read_to_string(path).map_err(|source| ConvertError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a file, creating its parent directory if needed.
pub fn write_output<C: AsRef<[u8]>>(path: &Path, contents: C) -> Result<(), ConvertError> {
    let map = |source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(map)?;
    }
    std::fs::write(path, contents).map_err(map)
}

/// Create a directory (and its parents) for outputs.
pub fn ensure_dir(path: &Path) -> Result<(), ConvertError> {
    std::fs::create_dir_all(path).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })
}
