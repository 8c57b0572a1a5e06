//! EPUB generation for Kindle and other e-readers.
//!
//! This module converts a [`Book`] into an EPUB ebook with:
//! - Cover page with template placeholders and optional image
//! - Human-readable table of contents page
//! - One XHTML document per chapter, with sections in the navigation tree
//!
//! Packaging needs the `epub` cargo feature. Without it, callers get
//! [`ConvertError::EpubUnavailable`] and can still produce HTML.

mod config;
#[cfg(feature = "epub")]
mod rendering;
pub mod styles;

pub use config::{CoverConfig, EpubConfig, MetadataConfig, RenderStats};

use crate::book::Book;
use crate::error::ConvertError;
use anyhow::Result;
use indicatif::ProgressBar;

/// Whether this build can write EPUB packages.
pub const AVAILABLE: bool = cfg!(feature = "epub");

/// Render a book to an in-memory EPUB package.
#[cfg(feature = "epub")]
pub fn render_to_bytes(
    config: &EpubConfig,
    book: &Book,
    progress: &ProgressBar,
) -> Result<(Vec<u8>, RenderStats)> {
    let mut buffer = Vec::new();
    let stats = config.render(book, &mut buffer, progress)?;
    Ok((buffer, stats))
}

/// Render a book to an in-memory EPUB package.
#[cfg(not(feature = "epub"))]
pub fn render_to_bytes(
    _config: &EpubConfig,
    _book: &Book,
    _progress: &ProgressBar,
) -> Result<(Vec<u8>, RenderStats)> {
    Err(ConvertError::EpubUnavailable.into())
}

/// Fail early, before any work is done, when EPUB output was requested but
/// this build cannot produce it.
pub fn ensure_available() -> Result<(), ConvertError> {
    if AVAILABLE {
        Ok(())
    } else {
        Err(ConvertError::EpubUnavailable)
    }
}
