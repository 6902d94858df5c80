use crate::config::toml_config::FileConfig;
use crate::config::Settings;
use crate::domain::strategy::{OutputFormat, Strategy};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Draw Secret Santa pairs that respect family and category rules")]
pub struct CliConfig {
    /// Participant file (email;first_name;last_name;family;category per line).
    /// Asked for interactively when omitted.
    pub input: Option<PathBuf>,

    /// TOML file with matching, input and output settings
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for the matched and debug files (default: next to the input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Attempts per category before giving up
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// How many times matches may be rejected and redrawn
    #[arg(long)]
    pub max_rounds: Option<u32>,

    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Field separator of the participant file
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Do not write the debug log file
    #[arg(long)]
    pub no_debug_log: bool,

    /// Accept the first valid draw without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Load and check the participant file without drawing
    #[arg(long)]
    pub dry_run: bool,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Resolves flags over the optional config file and validates the result.
    pub fn into_settings(&self, input: PathBuf) -> Result<Settings> {
        let mut settings = Settings::new(input);

        if let Some(path) = &self.config {
            tracing::info!("Loading configuration from: {}", path.display());
            let file = FileConfig::from_file(path)?;
            file.validate()?;
            settings.apply_file(&file);
        }

        if let Some(dir) = &self.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(max_retries) = self.max_retries {
            settings.max_retries = max_retries;
        }
        if let Some(max_rounds) = self.max_rounds {
            settings.max_rounds = max_rounds;
        }
        if let Some(strategy) = self.strategy {
            settings.strategy = strategy;
        }
        if let Some(format) = self.format {
            settings.output_format = format;
        }
        if self.seed.is_some() {
            settings.seed = self.seed;
        }
        if let Some(delimiter) = self.delimiter {
            settings.delimiter = delimiter;
        }
        if self.no_debug_log {
            settings.debug_log = false;
        }

        settings.validate()?;
        Ok(settings)
    }
}
