use crate::config::toml_config::parse_export_kinds;
use crate::core::roster::ROSTER_EXTENSIONS;
use crate::core::{ExportKind, Storage};
use crate::utils::error::{EventError, Result};
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Parser)]
#[command(name = "eventpro")]
#[command(about = "Lucky draws and random groups for office events")]
pub struct CliConfig {
    /// Text or CSV file with names separated by newlines or commas
    #[arg(long, global = true)]
    pub names_file: Option<String>,

    /// Names given inline, comma separated
    #[arg(long, value_delimiter = ',', global = true)]
    pub names: Vec<String>,

    /// Use the built-in sample roster
    #[arg(long, global = true)]
    pub sample: bool,

    /// Keep only the first person for each repeated name
    #[arg(long, global = true)]
    pub dedupe: bool,

    /// Path to an event TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory exported files are written to
    #[arg(long, global = true)]
    pub output_path: Option<String>,

    /// Seed for reproducible draws and groupings
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the roster and any repeated names
    Roster,

    /// Run the lucky draw
    Draw {
        /// Number of winners to draw
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,

        /// Let the same person win more than once
        #[arg(long)]
        allow_repeat: bool,

        /// Play the name reel before each reveal
        #[arg(long)]
        suspense: bool,
    },

    /// Split everyone into random groups
    Group {
        /// Members per group (clamped to 2..=roster size)
        #[arg(short, long)]
        size: Option<usize>,

        /// Export formats to write, e.g. `csv,txt`
        #[arg(long, value_delimiter = ',')]
        export: Vec<String>,
    },
}

impl CliConfig {
    pub fn export_kinds(&self) -> Result<Vec<ExportKind>> {
        match &self.command {
            Command::Group { export, .. } => parse_export_kinds("--export", export),
            _ => Ok(Vec::new()),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(file) = &self.names_file {
            validation::validate_path("--names-file", file)?;
            validation::validate_file_extensions(
                "--names-file",
                &[file.clone()],
                ROSTER_EXTENSIONS,
            )?;
        }
        if let Some(path) = &self.output_path {
            validation::validate_path("--output-path", path)?;
        }
        if let Command::Draw { count, .. } = &self.command {
            validation::validate_positive_number("--count", *count, 1)?;
        }
        self.export_kinds()?;
        Ok(())
    }
}

/// Filesystem storage rooted at `base_path`. Absolute paths bypass the root.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(&full_path).map_err(|e| {
            EventError::IoError(std::io::Error::new(
                e.kind(),
                format!("{}: {}", full_path.display(), e),
            ))
        })?;
        Ok(data)
    }

    async fn save_file(&self, file_name: &str, content_type: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(file_name);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        tracing::debug!(
            "Saved {} ({} bytes, {})",
            full_path.display(),
            data.len(),
            content_type
        );
        Ok(full_path.display().to_string())
    }
}
