#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::matcher::DEFAULT_MAX_RETRIES;
use crate::core::ConfigProvider;
use crate::domain::strategy::{OutputFormat, Strategy};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_delimiter, validate_path, validate_positive_number, validate_range, Validate,
};
use std::path::{Path, PathBuf};
use toml_config::FileConfig;

pub const DEFAULT_MAX_ROUNDS: u32 = 10;
pub const DEFAULT_DELIMITER: char = ';';

/// Fully resolved run settings. Command line values win over the config
/// file, which wins over the defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub max_retries: u32,
    pub max_rounds: u32,
    pub strategy: Strategy,
    pub output_format: OutputFormat,
    pub delimiter: char,
    pub seed: Option<u64>,
    pub debug_log: bool,
}

impl Settings {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        let output_dir = default_output_dir(&input_path);
        Self {
            input_path,
            output_dir,
            max_retries: DEFAULT_MAX_RETRIES,
            max_rounds: DEFAULT_MAX_ROUNDS,
            strategy: Strategy::default(),
            output_format: OutputFormat::default(),
            delimiter: DEFAULT_DELIMITER,
            seed: None,
            debug_log: true,
        }
    }

    pub fn apply_file(&mut self, file: &FileConfig) {
        let matching = &file.matching;
        if let Some(max_retries) = matching.max_retries {
            self.max_retries = max_retries;
        }
        if let Some(max_rounds) = matching.max_rounds {
            self.max_rounds = max_rounds;
        }
        if let Some(strategy) = matching.strategy {
            self.strategy = strategy;
        }
        if matching.seed.is_some() {
            self.seed = matching.seed;
        }
        if let Some(delimiter) = file.input.delimiter {
            self.delimiter = delimiter;
        }
        if let Some(dir) = &file.output.dir {
            self.output_dir = dir.clone();
        }
        if let Some(format) = file.output.format {
            self.output_format = format;
        }
        if let Some(debug_log) = file.output.debug_log {
            self.debug_log = debug_log;
        }
    }
}

/// Output lands next to the input file unless told otherwise.
fn default_output_dir(input_path: &Path) -> PathBuf {
    match input_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_path("input", &self.input_path.to_string_lossy())?;
        validate_path("output_dir", &self.output_dir.to_string_lossy())?;
        validate_positive_number("max_retries", self.max_retries, 1)?;
        validate_range("max_rounds", self.max_rounds, 1, 1000)?;
        validate_delimiter("delimiter", self.delimiter)?;
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn input_path(&self) -> &Path {
        &self.input_path
    }

    fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn strategy(&self) -> Strategy {
        self.strategy
    }

    fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    fn delimiter(&self) -> u8 {
        // ASCII is enforced by `validate`.
        self.delimiter as u8
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn debug_log(&self) -> bool {
        self.debug_log
    }
}
