use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use luma_edit::EditorOptions;
use serde::Deserialize;

/// Layout of the `--config` file:
///
/// ```toml
/// [editor]
/// window_width = 600
/// window_height = 800
/// histogram_radius = 5
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    editor: EditorOptions,
}

/// Command line overrides for [`EditorOptions`].
#[derive(Args, Debug, Clone, Default)]
pub struct EditorSettings {
    /// Window width used to scale gesture deltas
    #[arg(long)]
    pub window_width: Option<u32>,
    /// Window height used to scale gesture deltas
    #[arg(long)]
    pub window_height: Option<u32>,
    /// Local histogram equalization radius (>= 1)
    #[arg(long)]
    pub radius: Option<u32>,
}

impl EditorSettings {
    pub fn to_options(&self, config: Option<&Path>) -> Result<EditorOptions> {
        let mut options = match config {
            Some(path) => load(path)?,
            None => EditorOptions::default(),
        };
        if let Some(width) = self.window_width {
            options.window_width = width;
        }
        if let Some(height) = self.window_height {
            options.window_height = height;
        }
        if let Some(radius) = self.radius {
            options.histogram_radius = radius;
        }
        Ok(options)
    }
}

fn load(path: &Path) -> Result<EditorOptions> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {:?}", path))?;
    parse(&contents).with_context(|| format!("failed to parse config {:?}", path))
}

fn parse(contents: &str) -> Result<EditorOptions> {
    let file: ConfigFile = toml::from_str(contents)?;
    Ok(file.editor)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_tables_keep_defaults() {
        let options = parse("[editor]\nhistogram_radius = 9\n").unwrap();
        assert_eq!(options, EditorOptions { histogram_radius: 9, ..EditorOptions::default() });
        assert_eq!(parse("").unwrap(), EditorOptions::default());
    }

    #[test]
    fn unknown_sections_are_rejected() {
        assert!(parse("[viewer]\nzoom = 2\n").is_err());
    }

    #[test]
    fn flags_override_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editor]\nwindow_width = 1024\nhistogram_radius = 3").unwrap();

        let settings = EditorSettings { radius: Some(7), ..EditorSettings::default() };
        let options = settings.to_options(Some(file.path())).unwrap();

        assert_eq!(options.window_width, 1024);
        assert_eq!(options.window_height, 800);
        assert_eq!(options.histogram_radius, 7);
    }
}
