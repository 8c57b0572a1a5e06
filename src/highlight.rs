//! Syntax highlighting assets, serialised by `build.rs` and embedded in the binary.

use serde::{Deserialize, Serialize};
use std::fmt;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::SyntaxSet;

pub const SERIALIZED_SYNTAX: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/syntaxes.bin"));
pub const SERIALIZED_THEMES: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/themes.bin"));

#[derive(Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Debug, Default, clap::ValueEnum)]
pub enum SyntaxTheme {
    #[default]
    #[serde(rename = "InspiredGitHub")]
    #[value(name = "github")]
    InspiredGitHub,
    #[serde(rename = "Solarized (light)")]
    #[value(name = "solarized")]
    SolarizedLight,
    #[serde(rename = "base16-ocean.light")]
    #[value(name = "ocean")]
    OceanLight,
}

impl fmt::Display for SyntaxTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl SyntaxTheme {
    pub fn name(&self) -> &'static str {
        match self {
            SyntaxTheme::InspiredGitHub => "InspiredGitHub",
            SyntaxTheme::SolarizedLight => "Solarized (light)",
            SyntaxTheme::OceanLight => "base16-ocean.light",
        }
    }

    pub fn all() -> &'static [SyntaxTheme] {
        &[
            SyntaxTheme::InspiredGitHub,
            SyntaxTheme::SolarizedLight,
            SyntaxTheme::OceanLight,
        ]
    }
}

/// Loaded syntaxes plus one theme, ready to colour fenced code blocks.
pub struct Highlighter {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl Highlighter {
    pub fn new(theme: SyntaxTheme) -> Highlighter {
        let syntaxes: SyntaxSet =
            bincode::serde::decode_from_slice(SERIALIZED_SYNTAX, bincode::config::standard())
                .expect("can deserialise syntax set")
                .0;
        let themes: ThemeSet =
            bincode::serde::decode_from_slice(SERIALIZED_THEMES, bincode::config::standard())
                .expect("can deserialise theme set")
                .0;
        let theme = themes
            .themes
            .get(theme.name())
            .cloned()
            .expect("theme exists in set");
        Highlighter { syntaxes, theme }
    }

    /// Highlight `code` as `language`, returning `None` when the language is unknown.
    ///
    /// The result is a `<pre>` block with inline colours so it renders the same in
    /// browsers and e-readers that ignore stylesheets.
    pub fn highlight(&self, code: &str, language: &str) -> Option<String> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(language)
            .or_else(|| self.syntaxes.find_syntax_by_extension(language))?;
        match syntect::html::highlighted_html_for_string(code, &self.syntaxes, syntax, &self.theme)
        {
            Ok(html) => Some(html),
            Err(e) => {
                log::debug!("Failed to highlight `{language}` block: {e}");
                None
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_load_all_themes() {
        for theme in SyntaxTheme::all() {
            let _ = Highlighter::new(*theme);
        }
    }

    #[test]
    fn known_languages_get_coloured() {
        let highlighter = Highlighter::new(SyntaxTheme::default());
        let html = highlighter
            .highlight("fn main() {}\n", "rust")
            .expect("rust is a known syntax");
        assert!(html.starts_with("<pre"));
        assert!(html.contains("style=\"color:"));
    }

    #[test]
    fn unknown_languages_are_left_alone() {
        let highlighter = Highlighter::new(SyntaxTheme::default());
        assert!(highlighter.highlight("???", "not-a-language").is_none());
    }
}
