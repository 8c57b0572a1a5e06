use anyhow::{Context, Result};
use std::path::PathBuf;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

fn main() -> Result<()> {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").expect("OUT_DIR is set"));

    // generate syntaxes.bin from syntect's defaults
    let syntax_path = out_dir.join("syntaxes.bin");
    let ss = SyntaxSet::load_defaults_newlines();
    let syntax_bytes = bincode::serde::encode_to_vec(&ss, bincode::config::standard())
        .with_context(|| "Failed to serialize syntaxset to bincode")?;
    std::fs::write(&syntax_path, syntax_bytes)
        .with_context(|| "Failed to write serialized syntaxes")?;

    // generate themes.bin from the light themes bundled with syntect
    let themes_path = out_dir.join("themes.bin");
    let defaults = ThemeSet::load_defaults();
    let mut themes = ThemeSet::new();
    for name in ["InspiredGitHub", "Solarized (light)", "base16-ocean.light"] {
        let theme = defaults
            .themes
            .get(name)
            .cloned()
            .with_context(|| format!("syntect is missing the bundled theme `{name}`"))?;
        themes.themes.insert(name.to_string(), theme);
    }

    let themes_bytes = bincode::serde::encode_to_vec(&themes, bincode::config::standard())
        .with_context(|| "Failed to serialize themeset to bincode")?;
    std::fs::write(&themes_path, themes_bytes)
        .with_context(|| "Failed to write serialized themes")?;

    Ok(())
}
