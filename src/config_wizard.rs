//! Interactive configuration wizard for creating `docforge.toml`.
//!
//! The wizard collects the settings of a master volume (chapter directory, title,
//! author, ordering, heading level, code theme) and optional EPUB metadata through
//! a series of prompts. Titles and order files are detected from the chapter
//! directory so most prompts can be accepted as-is.

use crate::detection::{detect_order_file, detect_title};
use crate::highlight::SyntaxTheme;
use crate::sinks::epub::{CoverConfig, EpubConfig, MetadataConfig};
use crate::volume::{DEFAULT_AUTHOR, DEFAULT_SECTION_LEVEL};
use anyhow::{anyhow, Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "docforge.toml";

/// Complete configuration for a docforge project.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Configuration {
    #[serde(default)]
    pub volume: VolumeConfig,
    pub epub: Option<EpubConfig>,
}

/// The `[volume]` table. Every value can be overridden on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub prefix: Option<String>,
    pub order_file: Option<PathBuf>,
    pub section_level: Option<u8>,
    pub theme: Option<SyntaxTheme>,
}

impl Configuration {
    /// Load a configuration file.
    ///
    /// Relative paths inside the file are taken relative to the file's directory.
    pub fn load(path: &Path) -> Result<Configuration> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        let mut config: Configuration = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))?;

        let base = path.parent().unwrap_or(Path::new(""));
        let volume = &mut config.volume;
        for p in [&mut volume.dir, &mut volume.output, &mut volume.order_file]
            .into_iter()
            .flatten()
        {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        }
        if let Some(epub) = config.epub.as_mut() {
            if !epub.cover.image.is_empty() && Path::new(&epub.cover.image).is_relative() {
                epub.cover.image = base.join(&epub.cover.image).to_string_lossy().to_string();
            }
        }
        Ok(config)
    }
}

fn optional(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Run the interactive configuration wizard.
///
/// Prompts for the volume settings and EPUB metadata, then writes
/// `docforge.toml` to the current directory.
pub fn run() -> Result<()> {
    let theme = ColorfulTheme {
        ..ColorfulTheme::default()
    };

    // get the chapter directory first so we can detect defaults
    let dir: String = Input::with_theme(&theme)
        .with_prompt("Chapter directory")
        .default(".".to_string())
        .interact()
        .with_context(|| "Failed to obtain chapter directory")?;
    let dir = PathBuf::from(dir);
    if !dir.is_dir() {
        return Err(anyhow!("Path '{}' isn't a directory!", dir.display()));
    }

    let title: String = Input::with_theme(&theme)
        .with_prompt("Volume title")
        .with_initial_text(detect_title(&dir).unwrap_or_default())
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain title")?;

    let author: String = Input::with_theme(&theme)
        .with_prompt("Author")
        .default(DEFAULT_AUTHOR.to_string())
        .interact()
        .with_context(|| "Failed to obtain author")?;

    let output: String = Input::with_theme(&theme)
        .with_prompt("Output directory (leave empty to write next to the chapters)")
        .allow_empty(true)
        .interact()?;

    // an order file makes the prefix irrelevant, so only ask for one of them
    let detected_order = detect_order_file(&dir);
    let mut prefix = None;
    let order_file = if Confirm::with_theme(&theme)
        .with_prompt("Do you want to fix the chapter order with an order file?")
        .default(detected_order.is_some())
        .interact()?
    {
        let order: String = Input::with_theme(&theme)
            .with_prompt("Order file (one chapter file name per line)")
            .with_initial_text(
                detected_order
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default(),
            )
            .allow_empty(false)
            .interact()?;
        Some(PathBuf::from(order))
    } else {
        let value: String = Input::with_theme(&theme)
            .with_prompt("Only include files starting with (leave empty for all)")
            .allow_empty(true)
            .interact()?;
        prefix = optional(value);
        None
    };

    let section_level: u8 = Input::with_theme(&theme)
        .with_prompt("Heading level of chapter titles (1-6)")
        .default(DEFAULT_SECTION_LEVEL)
        .validate_with(|input: &u8| {
            if (1..=6).contains(input) {
                Ok(())
            } else {
                Err("Heading levels run from 1 to 6")
            }
        })
        .interact()?;

    let syntax_theme = FuzzySelect::with_theme(&theme)
        .with_prompt("Syntax highlighting theme for code blocks")
        .items(SyntaxTheme::all())
        .default(0)
        .interact()?;
    let syntax_theme = SyntaxTheme::all()[syntax_theme];

    let mut epub = None;
    if Confirm::with_theme(&theme)
        .with_prompt("Do you want to customise the EPUB metadata?")
        .default(false)
        .interact()?
    {
        let language: String = Input::with_theme(&theme)
            .with_prompt("Language code (e.g. en, en-GB, fr)")
            .default("en".to_string())
            .interact()?;
        let description: String = Input::with_theme(&theme)
            .with_prompt("Description (leave empty for the default)")
            .allow_empty(true)
            .interact()?;
        let keywords: String = Input::with_theme(&theme)
            .with_prompt("Keywords, comma separated (leave empty for none)")
            .allow_empty(true)
            .interact()?;
        let image: String = Input::with_theme(&theme)
            .with_prompt("Cover image (leave empty for none)")
            .allow_empty(true)
            .interact()?;

        epub = Some(EpubConfig {
            cover: CoverConfig {
                image: image.trim().to_string(),
                ..CoverConfig::default()
            },
            metadata: MetadataConfig {
                description: description.trim().to_string(),
                keywords: keywords.trim().to_string(),
                language,
            },
            ..EpubConfig::default()
        });
    }

    let config = Configuration {
        volume: VolumeConfig {
            dir: Some(dir),
            output: optional(output).map(PathBuf::from),
            title: Some(title),
            author: Some(author),
            prefix,
            order_file,
            section_level: Some(section_level),
            theme: Some(syntax_theme),
        },
        epub,
    };

    let config =
        toml::to_string_pretty(&config).with_context(|| "Failed to convert configuration to TOML")?;

    let config_path = PathBuf::from(CONFIG_FILE);
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!("{CONFIG_FILE} already exists, do you want to override it?"))
            .interact()?
    {
        println!("Configuration:");
        println!("{}", config);
    } else {
        std::fs::write(&config_path, config)
            .with_context(|| "Failed to write configuration file")?;
        println!("{CONFIG_FILE} written!");
    }

    Ok(())
}
