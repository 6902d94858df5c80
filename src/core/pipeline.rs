use crate::core::loader::parse_participants;
use crate::core::match_log::DebugLog;
use crate::core::matcher::{match_participants, MatchOptions};
use crate::core::output::{debug_file_name, output_file_name, render};
use crate::core::{Assignment, ConfigProvider, Participant, Pipeline, Storage};
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Mutex, MutexGuard};

pub struct SantaPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    rng: Mutex<StdRng>,
    debug_log: Mutex<DebugLog>,
    started_at: DateTime<Local>,
}

impl<S: Storage, C: ConfigProvider> SantaPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            storage,
            config,
            rng: Mutex::new(rng),
            debug_log: Mutex::new(DebugLog::new()),
            started_at: Local::now(),
        }
    }

    pub fn debug_lines(&self) -> Vec<String> {
        lock(&self.debug_log).lines().to_vec()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for SantaPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Participant>> {
        let path = self.config.input_path();
        tracing::debug!("Reading participants from: {}", path.display());

        let data = self.storage.read_file(path).await?;
        let participants = parse_participants(&data, self.config.delimiter())?;

        lock(&self.debug_log).note(format!(
            "Loaded {} participants from {}",
            participants.len(),
            path.display()
        ));
        Ok(participants)
    }

    fn transform(&self, participants: &[Participant]) -> Result<Assignment> {
        let options = MatchOptions {
            max_retries: self.config.max_retries(),
            strategy: self.config.strategy(),
        };
        tracing::debug!(
            "Matching {} participants (strategy: {}, max retries: {})",
            participants.len(),
            options.strategy,
            options.max_retries
        );

        let mut rng = lock(&self.rng);
        let mut log = lock(&self.debug_log);
        match_participants(participants, &options, &mut *rng, &mut *log)
    }

    async fn load(&self, assignment: &Assignment) -> Result<String> {
        let format = self.config.output_format();
        let path = output_file_name(
            self.config.output_dir(),
            self.config.input_path(),
            format,
            self.started_at,
        );

        let content = render(assignment, format)?;
        tracing::debug!(
            "Writing {} matches ({} bytes) to {}",
            assignment.len(),
            content.len(),
            path.display()
        );
        self.storage.write_file(&path, content.as_bytes()).await?;

        Ok(path.display().to_string())
    }

    async fn write_debug_log(&self) -> Result<Option<String>> {
        if !self.config.debug_log() {
            return Ok(None);
        }

        let content = {
            let log = lock(&self.debug_log);
            if log.is_empty() {
                return Ok(None);
            }
            log.render()
        };

        let path = debug_file_name(
            self.config.output_dir(),
            self.config.input_path(),
            self.started_at,
        );
        self.storage.write_file(&path, content.as_bytes()).await?;
        Ok(Some(path.display().to_string()))
    }
}
