use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mdpdf::{Config, HtmlOptions};

#[derive(Parser)]
#[command(name = "mdpdf")]
#[command(about = "Convert Markdown files to PDF, HTML, Typst or plain text")]
struct Cli {
    /// Input Markdown file, or `-` for stdin
    input: PathBuf,

    /// Output file, or `-` for stdout (defaults to input name with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Pdf)]
    format: Format,

    /// Config file
    #[arg(short, long, default_value = "mdpdf.toml")]
    config: PathBuf,

    /// Document title for HTML output (defaults to the first heading)
    #[arg(long)]
    title: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Pdf,
    Typst,
    Html,
    Text,
    Json,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Pdf => "pdf",
            Format::Typst => "typ",
            Format::Html => "html",
            Format::Text => "txt",
            Format::Json => "json",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let markdown = read_input(&cli.input)?;
    let config = Config::load(&cli.config).context("Failed to load config")?;

    let bytes = render(&markdown, cli.format, &config, cli.title.clone())?;

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output(&cli.input, cli.format));
    write_output(&output, &bytes)?;

    Ok(())
}

fn render(markdown: &str, format: Format, config: &Config, title: Option<String>) -> Result<Vec<u8>> {
    let bytes = match format {
        Format::Pdf => mdpdf::markdown_to_pdf_with_config(markdown, config)
            .context("Conversion failed")?,
        Format::Typst => mdpdf::markdown_to_typst_with_config(markdown, config).into_bytes(),
        Format::Html => {
            let mut options = HtmlOptions::new(config.clone());
            options.title = title;
            mdpdf::markdown_to_html(markdown, &options).into_bytes()
        }
        Format::Text => mdpdf::markdown_to_text(markdown).into_bytes(),
        Format::Json => {
            let blocks = mdpdf::convert(markdown);
            serde_json::to_vec_pretty(&blocks).context("Failed to serialise blocks")?
        }
    };
    Ok(bytes)
}

fn read_input(input: &Path) -> Result<String> {
    if input == Path::new("-") {
        let mut markdown = String::new();
        io::stdin()
            .read_to_string(&mut markdown)
            .context("Failed to read stdin")?;
        return Ok(markdown);
    }
    fs::read_to_string(input).with_context(|| format!("Error reading {}", input.display()))
}

fn default_output(input: &Path, format: Format) -> PathBuf {
    if input == Path::new("-") {
        return PathBuf::from("-");
    }
    match format {
        Format::Pdf => {
            let stem = input
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            input.with_file_name(mdpdf::pdf_file_name(&stem))
        }
        _ => input.with_extension(format.extension()),
    }
}

fn write_output(output: &Path, bytes: &[u8]) -> Result<()> {
    if output == Path::new("-") {
        io::stdout()
            .write_all(bytes)
            .context("Failed to write to stdout")?;
        return Ok(());
    }
    fs::write(output, bytes).with_context(|| format!("Error writing {}", output.display()))?;
    info!("wrote {} bytes", bytes.len());
    println!("Created {}", output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_output_swaps_extension() {
        assert_eq!(
            default_output(Path::new("notes/readme.md"), Format::Html),
            PathBuf::from("notes/readme.html")
        );
        assert_eq!(
            default_output(Path::new("notes/readme.md"), Format::Pdf),
            PathBuf::from("notes/readme.pdf")
        );
        assert_eq!(default_output(Path::new("-"), Format::Pdf), PathBuf::from("-"));
    }

    #[test]
    fn json_output_lists_blocks() {
        let bytes = render("# Hi\n---", Format::Json, &Config::default(), None).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[0]["kind"], "heading");
        assert_eq!(value[1]["kind"], "rule");
    }

    #[test]
    fn cli_parses_format() {
        let cli = Cli::try_parse_from(["mdpdf", "in.md", "-f", "html", "--title", "T"]).unwrap();
        assert_eq!(cli.format, Format::Html);
        assert_eq!(cli.title.as_deref(), Some("T"));
        assert_eq!(cli.config, PathBuf::from("mdpdf.toml"));
    }
}
