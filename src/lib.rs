pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::{toml_config::FileConfig, Settings};

pub use crate::adapters::storage::LocalStorage;
pub use crate::core::{
    confirm::{AutoConfirm, Confirmer, Decision, TerminalConfirmer},
    engine::{RunReport, SantaEngine},
    matcher::{match_participants, MatchOptions},
    pipeline::SantaPipeline,
};
pub use crate::domain::model::{Assignment, Pair, Participant, Violation};
pub use crate::domain::strategy::{OutputFormat, Strategy};
pub use crate::utils::error::{Result, SantaError};
