//! Printable bundle of the implementation guideline documents.

use crate::error::{read_text, write_output, ConvertError};
use crate::highlight::{Highlighter, SyntaxTheme};
use crate::markdown::{render, RenderOptions};
use crate::sinks::html::{combine_markdown, render_document};
use anyhow::Result;
use std::path::{Path, PathBuf};

pub const DEFAULT_DIR: &str = "docs/implementation-guidelines";
pub const DEFAULT_OUTPUT: &str = "implementation_guidelines.html";
pub const TITLE: &str = "Implementation Guidelines";

/// The guideline stages, in reading order.
pub const STAGE_FILES: &[&str] = &[
    "stage-1-intent-processing-implementation.md",
    "stage-2-rag-enhanced-retrieval-implementation.md",
    "stage-3-promql-generation-implementation.md",
    "stage-4-execution-self-healing-implementation.md",
    "stage-5-semantic-analysis-implementation.md",
    "stage-6-counterfactual-visualization-implementation.md",
];

#[derive(Debug)]
pub struct BundleReport {
    pub output: PathBuf,
    pub included: Vec<String>,
    pub missing: Vec<String>,
}

/// Bundle `files` (names relative to `dir`, in order) into one document at `output`.
///
/// Missing files are skipped; it is an error only when none exist or `dir` itself
/// is missing.
pub fn run<S: AsRef<str>>(
    dir: &Path,
    files: &[S],
    output: &Path,
    theme: Option<SyntaxTheme>,
) -> Result<BundleReport> {
    if !dir.is_dir() {
        return Err(ConvertError::MissingInput(dir.to_path_buf()).into());
    }
    let mut documents = Vec::with_capacity(files.len());
    let mut missing = Vec::new();
    for name in files {
        let name = name.as_ref();
        let path = dir.join(name);
        if path.is_file() {
            log::info!("Reading {name}");
            documents.push((name.to_string(), read_text(&path)?));
        } else {
            log::warn!("{} not found, skipping", path.display());
            missing.push(name.to_string());
        }
    }
    if documents.is_empty() {
        return Err(ConvertError::EmptyInput(dir.to_path_buf()).into());
    }

    let markdown = combine_markdown(
        documents
            .iter()
            .map(|(name, text)| (name.as_str(), text.as_str())),
    );
    let highlighter = theme.map(Highlighter::new);
    let rendered = render(
        &markdown,
        &RenderOptions {
            highlighter: highlighter.as_ref(),
            ..RenderOptions::default()
        },
    );

    write_output(output, render_document(TITLE, &rendered, true))?;
    Ok(BundleReport {
        output: output.to_path_buf(),
        included: documents.into_iter().map(|(name, _)| name).collect(),
        missing,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn can_bundle_in_listed_order() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        fs::write(dir.path().join(STAGE_FILES[2]), "# Stage 3\n").expect("can write");
        fs::write(dir.path().join(STAGE_FILES[0]), "# Stage 1\n").expect("can write");
        let output = dir.path().join("out").join(DEFAULT_OUTPUT);

        let report = run(dir.path(), STAGE_FILES, &output, None).expect("can bundle");
        assert_eq!(report.included, vec![STAGE_FILES[0], STAGE_FILES[2]]);
        assert_eq!(report.missing.len(), 4);

        let html = fs::read_to_string(&output).expect("can read bundle");
        let one = html.find(r#"id="stage-1""#).expect("has stage 1");
        let three = html.find(r#"id="stage-3""#).expect("has stage 3");
        assert!(one < three);
        assert!(html.contains("<title>Implementation Guidelines</title>"));
    }

    #[test]
    fn nothing_to_bundle_is_an_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let output = dir.path().join(DEFAULT_OUTPUT);
        let err = run(dir.path(), &["missing.md"], &output, None).expect_err("nothing found");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::EmptyInput(_))
        ));
        assert!(!output.exists());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let root = tempfile::tempdir().expect("can create temp dir");
        let output = root.path().join(DEFAULT_OUTPUT);
        let err = run(&root.path().join("nope"), STAGE_FILES, &output, None)
            .expect_err("directory is missing");
        assert!(matches!(
            err.downcast_ref::<ConvertError>(),
            Some(ConvertError::MissingInput(_))
        ));
        assert!(!output.exists());
    }
}
