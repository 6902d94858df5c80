use crate::domain::model::{Assignment, Participant};
use crate::domain::strategy::{OutputFormat, Strategy};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &Path;
    fn output_dir(&self) -> &Path;
    fn max_retries(&self) -> u32;
    fn strategy(&self) -> Strategy;
    fn output_format(&self) -> OutputFormat;
    fn delimiter(&self) -> u8;
    fn seed(&self) -> Option<u64>;
    fn debug_log(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Participant>>;
    fn transform(&self, participants: &[Participant]) -> Result<Assignment>;
    async fn load(&self, assignment: &Assignment) -> Result<String>;
    async fn write_debug_log(&self) -> Result<Option<String>>;
}
