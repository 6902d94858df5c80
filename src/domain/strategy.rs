use crate::utils::error::SantaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a candidate pairing is drawn for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Shuffle, then give each giver the first free compatible receiver.
    Greedy,
    /// Shuffle, then give position i to position i+1 (one gift circle).
    Rotation,
    /// Pick each receiver at random among those that keep the rest of the
    /// group solvable. Never dead-ends on a group that can be paired.
    #[default]
    #[serde(alias = "backtracking")]
    #[cfg_attr(feature = "cli", value(alias = "backtracking"))]
    Constructive,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `giver_email -> receiver_email`
    #[default]
    Arrow,
    /// Names and emails of both sides as comma separated columns.
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Arrow => "txt",
            Self::Csv => "csv",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Greedy => "greedy",
            Self::Rotation => "rotation",
            Self::Constructive => "constructive",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = SantaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Self::Greedy),
            "rotation" => Ok(Self::Rotation),
            "constructive" | "backtracking" => Ok(Self::Constructive),
            other => Err(SantaError::InvalidConfigValue {
                field: "strategy".to_string(),
                value: other.to_string(),
                reason: "Valid strategies: greedy, rotation, constructive".to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Arrow => "arrow",
            Self::Csv => "csv",
        };
        f.write_str(name)
    }
}

impl FromStr for OutputFormat {
    type Err = SantaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrow" | "txt" => Ok(Self::Arrow),
            "csv" => Ok(Self::Csv),
            other => Err(SantaError::InvalidConfigValue {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: arrow, csv".to_string(),
            }),
        }
    }
}
