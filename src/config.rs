use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub font: FontConfig,
    pub layout: LayoutConfig,
    pub html: HtmlConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Typst paper name, e.g. "a4" or "us-letter"
    pub paper: String,
    pub margin: String,
    pub numbers: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            paper: "a4".to_string(),
            margin: "0.4in".to_string(),
            numbers: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub body: String,
    pub mono: String,
    pub size: String,
    /// Also search fonts installed on the system
    pub system_fonts: bool,
    /// Extra directories searched for font files
    pub dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            body: "Libertinus Serif".to_string(),
            mono: "DejaVu Sans Mono".to_string(),
            size: "11pt".to_string(),
            system_fonts: false,
            dirs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Never leave a heading alone at the bottom of a page.
    pub keep_heading_with_next: bool,
    /// Lists with at most this many items are not split across pages.
    pub keep_list_together_max: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            keep_heading_with_next: true,
            keep_list_together_max: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    /// CSS length for the content column
    pub max_width: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            max_width: "800px".to_string(),
        }
    }
}

impl Config {
    /// The configuration bundled with the crate.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            warn!("bundled default config is invalid: {e}");
            Self::default()
        })
    }

    /// Load config from a TOML file, or return the bundled defaults if the
    /// file does not exist. Keys missing from the file keep their defaults.
    /// Relative font directories are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                return Ok(Self::compiled_default());
            }
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let mut config: Self = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(base) = path.parent() {
            for dir in &mut config.font.dirs {
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }
        Ok(config)
    }
}
