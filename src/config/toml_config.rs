use crate::domain::strategy::{OutputFormat, Strategy};
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{
    validate_delimiter, validate_path, validate_positive_number, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    pub max_retries: Option<u32>,
    pub max_rounds: Option<u32>,
    pub strategy: Option<Strategy>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub debug_log: Option<bool>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SantaError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SantaError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replaces `${VAR}` with the environment value; unknown variables are left as written.
fn substitute_env_vars(content: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

impl Validate for FileConfig {
    fn validate(&self) -> Result<()> {
        if let Some(max_retries) = self.matching.max_retries {
            validate_positive_number("matching.max_retries", max_retries, 1)?;
        }
        if let Some(max_rounds) = self.matching.max_rounds {
            validate_positive_number("matching.max_rounds", max_rounds, 1)?;
        }
        if let Some(delimiter) = self.input.delimiter {
            validate_delimiter("input.delimiter", delimiter)?;
        }
        if let Some(dir) = &self.output.dir {
            validate_path("output.dir", &dir.to_string_lossy())?;
        }
        Ok(())
    }
}
