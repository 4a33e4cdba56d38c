//! Output formatting for CLI commands

use anyhow::{Context, Result};
use serde::Serialize;

/// Output format for structured results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Output helper for consistent formatting
///
/// Results go to stdout; verbose diagnostics go to stderr.
pub struct Output {
    format: OutputFormat,
    verbose: bool,
}

impl Output {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Prints structured data in the selected format
    pub fn data<T: Serialize>(&self, data: &T) -> Result<()> {
        match self.format {
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(data).context("Failed to serialize result")?;
                print!("{}", yaml);
            }
            OutputFormat::Json => {
                let json =
                    serde_json::to_string_pretty(data).context("Failed to serialize result")?;
                println!("{}", json);
            }
        }
        Ok(())
    }

    /// Prints preformatted text as is
    pub fn text(&self, text: &str) {
        print!("{}", text);
    }

    /// Prints a verbose debug message (only when --verbose is set)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("[verbose] {}", message);
        }
    }

    /// Prints a verbose debug message with context (only when --verbose is set)
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        if self.verbose {
            eprintln!("[verbose:{}] {}", context, message);
        }
    }
}
