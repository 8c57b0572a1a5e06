//! EPUB output configuration.
//!
//! Lives in the `[epub]` table of `docforge.toml`. Every field has a default so an
//! empty table (or no table at all) produces a sensible Kindle-ready book.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Cover page configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CoverConfig {
    /// Template with placeholders: {title}, {authors}, {date}.
    /// Empty string disables the cover page.
    pub template: String,
    /// Optional cover image path. Empty string for none.
    pub image: String,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            template: default_cover_template(),
            image: String::new(),
        }
    }
}

/// EPUB document metadata configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MetadataConfig {
    /// Description for EPUB metadata.
    /// Empty string to use the book's own description.
    pub description: String,
    /// Keywords for EPUB metadata (comma-separated recommended).
    /// Empty string for none.
    pub keywords: String,
    /// Language code (BCP 47 format, e.g., "en", "en-GB", "fr").
    /// Required for valid EPUB.
    pub language: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            description: String::new(),
            keywords: String::new(),
            language: "en".to_string(),
        }
    }
}

/// EPUB output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EpubConfig {
    /// Cover page configuration
    pub cover: CoverConfig,
    /// EPUB document metadata
    pub metadata: MetadataConfig,
    /// Whether to add a human-readable table of contents page after the cover
    pub toc_page: bool,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            cover: CoverConfig::default(),
            metadata: MetadataConfig::default(),
            toc_page: true,
        }
    }
}

impl EpubConfig {
    /// Returns the cover image path, if configured.
    pub fn cover_image_path(&self) -> Option<PathBuf> {
        if self.cover.image.is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.cover.image))
        }
    }

    /// Returns the configured description, if any.
    pub fn description_opt(&self) -> Option<&str> {
        if self.metadata.description.is_empty() {
            None
        } else {
            Some(&self.metadata.description)
        }
    }

    /// Returns the keywords, if configured.
    pub fn keywords_opt(&self) -> Option<&str> {
        if self.metadata.keywords.is_empty() {
            None
        } else {
            Some(&self.metadata.keywords)
        }
    }
}

pub fn default_cover_template() -> String {
    r#"{title}

- by -

{authors}

{date}"#
        .to_string()
}

/// Statistics from rendering an EPUB, used for user feedback.
pub struct RenderStats {
    /// Number of documents in the EPUB, cover and contents pages included
    pub document_count: usize,
}
