pub mod confirm;
pub mod engine;
pub mod loader;
pub mod match_log;
pub mod matcher;
pub mod output;
pub mod pipeline;

pub use crate::domain::model::{Assignment, Pair, Participant, Violation};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
