use crate::config_wizard::Configuration;
use crate::file_ordering::ChapterOrder;
use crate::highlight::SyntaxTheme;
use crate::volume::{chapter_order, Formats, VolumeOptions, VolumeOptionsBuilder};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a docforge.toml config file for the volume command
    Config,
    /// Converts ASCII art files (.txt, .md) into printable HTML figures
    Ascii(DirPairArgs),
    /// Converts mermaid diagrams in markdown files into HTML pages
    Mermaid(DirPairArgs),
    /// Bundles the implementation guideline documents into one printable page
    Bundle(BundleArgs),
    /// Converts a markdown file or directory into HTML
    Html(HtmlArgs),
    /// Generates a Kindle-ready EPUB from a markdown file or directory
    Epub(EpubArgs),
    /// Assembles a directory of chapters into one master volume (HTML and EPUB)
    Volume(VolumeArgs),
}

#[derive(Args, Debug)]
pub struct DirPairArgs {
    /// A source file, or a directory holding the source files
    pub input: PathBuf,
    /// Directory the HTML pages are written to
    pub output_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct BundleArgs {
    /// Files to bundle, in order (defaults to the six stage guidelines)
    pub files: Vec<String>,
    /// Directory holding the files
    #[arg(long, default_value = crate::bundle::DEFAULT_DIR)]
    pub dir: PathBuf,
    /// Output HTML file
    #[arg(short, long, default_value = crate::bundle::DEFAULT_OUTPUT)]
    pub output: PathBuf,
    /// Colour code blocks with this theme
    #[arg(long, value_enum)]
    pub theme: Option<SyntaxTheme>,
}

#[derive(Args, Debug)]
pub struct HtmlArgs {
    /// Markdown file, or a directory with --dir
    pub input: PathBuf,
    /// Process every markdown file in the INPUT directory
    #[arg(long)]
    pub dir: bool,
    /// With --dir: write one page per file plus an index
    #[arg(long, requires = "dir")]
    pub separate: bool,
    /// Output directory, or an .html file name for a single input file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Leave out the table of contents
    #[arg(long)]
    pub no_toc: bool,
    /// Document title (default: derived from the file or directory name)
    #[arg(long)]
    pub title: Option<String>,
    /// Colour code blocks with this theme
    #[arg(long, value_enum)]
    pub theme: Option<SyntaxTheme>,
}

#[derive(Args, Debug)]
pub struct EpubArgs {
    /// Markdown file to convert
    #[arg(required_unless_present = "dir", conflicts_with = "dir")]
    pub input: Option<PathBuf>,
    /// Convert every markdown file in this directory, one chapter each
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Output directory (default: next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Book title (default: first heading, or the file or directory name)
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long, default_value = crate::volume::DEFAULT_AUTHOR)]
    pub author: String,
    /// Colour code blocks with this theme
    #[arg(long, value_enum)]
    pub theme: Option<SyntaxTheme>,
}

#[derive(Args, Debug)]
pub struct VolumeArgs {
    /// Directory containing the markdown chapter files
    #[arg(long, required_unless_present = "config")]
    pub dir: Option<PathBuf>,
    /// Output directory (default: the chapter directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Volume title (default: the directory name)
    #[arg(long)]
    pub title: Option<String>,
    /// Author name (default: "Generated Document")
    #[arg(long)]
    pub author: Option<String>,
    /// Only include files whose names start with this prefix
    #[arg(long)]
    pub prefix: Option<String>,
    /// File listing chapter file names in the desired order
    #[arg(long)]
    pub order_file: Option<PathBuf>,
    /// Heading level each chapter's first heading is moved to
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
    pub section_level: Option<u8>,
    /// Colour code blocks with this theme
    #[arg(long, value_enum)]
    pub theme: Option<SyntaxTheme>,
    /// Generate only the HTML volume
    #[arg(long, conflicts_with = "epub_only")]
    pub html_only: bool,
    /// Generate only the EPUB volume
    #[arg(long)]
    pub epub_only: bool,
    /// Read defaults from a docforge.toml file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl VolumeArgs {
    /// Merge the flags with the optional configuration file.
    pub fn resolve(self) -> Result<VolumeOptions> {
        let (file, epub) = match &self.config {
            Some(path) => {
                let Configuration { volume, epub } = Configuration::load(path)?;
                (volume, epub.unwrap_or_default())
            }
            None => Default::default(),
        };

        let dir = self
            .dir
            .or(file.dir)
            .ok_or_else(|| anyhow!("No chapter directory given, use --dir"))?;
        let order_file = self.order_file.or(file.order_file);
        let prefix = self.prefix.or(file.prefix);
        let order: ChapterOrder = chapter_order(order_file.as_deref(), prefix)?;

        let mut builder = VolumeOptionsBuilder::default();
        builder
            .dir(dir)
            .order(order)
            .formats(Formats::from_flags(self.html_only, self.epub_only))
            .epub(epub);
        if let Some(output) = self.output.or(file.output) {
            builder.output(output);
        }
        if let Some(title) = self.title.or(file.title) {
            builder.title(title);
        }
        if let Some(author) = self.author.or(file.author) {
            builder.author(author);
        }
        if let Some(level) = self.section_level.or(file.section_level) {
            builder.section_level(level.clamp(1, 6));
        }
        if let Some(theme) = self.theme.or(file.theme) {
            builder.theme(theme);
        }
        builder
            .build()
            .with_context(|| "Failed to assemble volume options")
    }
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::volume::{DEFAULT_AUTHOR, DEFAULT_SECTION_LEVEL};

    fn volume_args(args: &[&str]) -> VolumeArgs {
        let mut argv = vec!["docforge", "volume"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).expect("can parse arguments").command {
            Commands::Volume(args) => args,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn html_only_and_epub_only_conflict() {
        let err = Cli::try_parse_from([
            "docforge",
            "volume",
            "--dir",
            "book",
            "--html-only",
            "--epub-only",
        ])
        .expect_err("flags conflict");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn volume_needs_a_directory_or_config() {
        assert!(Cli::try_parse_from(["docforge", "volume"]).is_err());
    }

    #[test]
    fn can_resolve_volume_flags() {
        let options = volume_args(&["--dir", "book", "--prefix", "ch-", "--epub-only"])
            .resolve()
            .expect("can resolve options");
        assert_eq!(options.dir, PathBuf::from("book"));
        assert_eq!(options.author, DEFAULT_AUTHOR);
        assert_eq!(options.section_level, DEFAULT_SECTION_LEVEL);
        assert_eq!(
            options.order,
            ChapterOrder::Lexicographic {
                prefix: Some("ch-".to_string())
            }
        );
        assert!(!options.formats.html && options.formats.epub);
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let config = dir.path().join("docforge.toml");
        std::fs::write(
            &config,
            "[volume]\ndir = \"chapters\"\ntitle = \"From File\"\nauthor = \"File Author\"\nsection_level = 3\n\n[epub.metadata]\nlanguage = \"de\"\n",
        )
        .expect("can write config");

        let options = volume_args(&[
            "--config",
            config.to_str().expect("utf-8 path"),
            "--title",
            "From Flag",
        ])
        .resolve()
        .expect("can resolve options");
        assert_eq!(options.title.as_deref(), Some("From Flag"));
        assert_eq!(options.author, "File Author");
        assert_eq!(options.section_level, 3);
        assert_eq!(options.dir, dir.path().join("chapters"));
        assert_eq!(options.epub.metadata.language, "de");
    }

    #[test]
    fn separate_requires_dir() {
        assert!(Cli::try_parse_from(["docforge", "html", "a.md", "--separate"]).is_err());
    }

    #[test]
    fn epub_takes_a_file_or_a_directory() {
        assert!(Cli::try_parse_from(["docforge", "epub"]).is_err());
        assert!(Cli::try_parse_from(["docforge", "epub", "--dir", "notes"]).is_ok());
        assert!(Cli::try_parse_from(["docforge", "epub", "a.md", "--dir", "notes"]).is_err());
    }
}
