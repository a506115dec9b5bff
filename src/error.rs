//! Error type for the mdpdf library.
//!
//! Converting Markdown to blocks and rendering blocks to markup never fails.
//! Errors only come from reading configuration and from the PDF toolchain.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The config file exists but could not be read.
    #[error("Failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML or has fields of the wrong type.
    #[error("Invalid config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Typst rejected the generated markup.
    #[error("Typst compilation failed: {0}")]
    Compile(String),

    /// The compiled document could not be exported as PDF.
    #[error("PDF generation failed: {0}")]
    Pdf(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_display() {
        let e = Error::Compile("unknown font".into());
        assert_eq!(e.to_string(), "Typst compilation failed: unknown font");
    }

    #[test]
    fn config_read_display_names_path() {
        let e = Error::ConfigRead {
            path: PathBuf::from("mdpdf.toml"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(e.to_string().contains("mdpdf.toml"), "got: {e}");
    }
}
