use crate::core::confirm::{Confirmer, Decision};
use crate::core::matcher::{summarize, CategorySummary};
use crate::core::{Assignment, Participant, Pipeline};
use crate::utils::error::{Result, SantaError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub output_path: String,
    pub debug_log_path: Option<String>,
    pub participants: usize,
    pub rounds: u32,
}

pub struct SantaEngine<P: Pipeline> {
    pipeline: P,
    max_rounds: u32,
}

impl<P: Pipeline> SantaEngine<P> {
    pub fn new(pipeline: P, max_rounds: u32) -> Self {
        Self {
            pipeline,
            max_rounds,
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Loads, matches until the confirmer accepts, then writes the artifact.
    /// The debug log is written on every path past loading; the output file
    /// only once an assignment was accepted.
    pub async fn run(&self, confirmer: &mut dyn Confirmer) -> Result<RunReport> {
        tracing::info!("Loading participants...");
        let participants = self.pipeline.extract().await?;
        tracing::info!("Loaded {} participants", participants.len());

        let outcome = self.match_until_accepted(&participants, confirmer);

        let debug_log_path = match self.pipeline.write_debug_log().await {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("Could not write debug log: {}", e);
                None
            }
        };
        if let Some(path) = &debug_log_path {
            tracing::info!("Debug log written to: {}", path);
        }

        let (assignment, rounds) = outcome?;

        tracing::info!("Writing {} matches...", assignment.len());
        let output_path = self.pipeline.load(&assignment).await?;

        Ok(RunReport {
            output_path,
            debug_log_path,
            participants: participants.len(),
            rounds,
        })
    }

    /// Loads and reports what each category looks like without matching.
    pub async fn inspect(&self) -> Result<Vec<CategorySummary>> {
        let participants = self.pipeline.extract().await?;
        Ok(summarize(&participants))
    }

    fn match_until_accepted(
        &self,
        participants: &[Participant],
        confirmer: &mut dyn Confirmer,
    ) -> Result<(Assignment, u32)> {
        for round in 1..=self.max_rounds {
            tracing::info!("Generating matches (round {})...", round);
            let assignment = self.pipeline.transform(participants)?;

            match confirmer.review(&assignment)? {
                Decision::Accept => return Ok((assignment, round)),
                Decision::Rematch => {
                    tracing::info!("Matches rejected, drawing again");
                }
                Decision::Abort => {
                    return Err(SantaError::Cancelled {
                        reason: "matches were not accepted".to_string(),
                    })
                }
            }
        }

        Err(SantaError::Cancelled {
            reason: format!("no matches accepted after {} rounds", self.max_rounds),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Pair;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    struct StubPipeline {
        participants: Vec<Participant>,
        transforms: AtomicU32,
        fail_transform: bool,
        loaded: Mutex<Vec<Assignment>>,
        debug_writes: AtomicU32,
    }

    impl StubPipeline {
        fn new(fail_transform: bool) -> Self {
            Self {
                participants: vec![
                    Participant::new("a@x.com", "Alice", "A", "F1", "P"),
                    Participant::new("b@x.com", "Bob", "B", "F2", "P"),
                ],
                transforms: AtomicU32::new(0),
                fail_transform,
                loaded: Mutex::new(Vec::new()),
                debug_writes: AtomicU32::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl Pipeline for StubPipeline {
        async fn extract(&self) -> Result<Vec<Participant>> {
            Ok(self.participants.clone())
        }

        fn transform(&self, participants: &[Participant]) -> Result<Assignment> {
            self.transforms.fetch_add(1, Ordering::SeqCst);
            if self.fail_transform {
                return Err(SantaError::unsatisfiable("P", 100, "exhausted"));
            }
            Ok(Assignment::new(vec![
                Pair {
                    giver: participants[0].clone(),
                    receiver: participants[1].clone(),
                },
                Pair {
                    giver: participants[1].clone(),
                    receiver: participants[0].clone(),
                },
            ]))
        }

        async fn load(&self, assignment: &Assignment) -> Result<String> {
            self.loaded.lock().unwrap().push(assignment.clone());
            Ok("out/matched.txt".to_string())
        }

        async fn write_debug_log(&self) -> Result<Option<String>> {
            self.debug_writes.fetch_add(1, Ordering::SeqCst);
            Ok(Some("out/debug.txt".to_string()))
        }
    }

    struct Scripted(Vec<Decision>);

    impl Confirmer for Scripted {
        fn review(&mut self, _assignment: &Assignment) -> Result<Decision> {
            Ok(self.0.remove(0))
        }
    }

    #[tokio::test]
    async fn test_rematch_then_accept() {
        let engine = SantaEngine::new(StubPipeline::new(false), 5);
        let mut confirmer = Scripted(vec![Decision::Rematch, Decision::Rematch, Decision::Accept]);

        let report = engine.run(&mut confirmer).await.unwrap();
        assert_eq!(report.rounds, 3);
        assert_eq!(report.participants, 2);
        assert_eq!(report.output_path, "out/matched.txt");
        assert_eq!(report.debug_log_path.as_deref(), Some("out/debug.txt"));
        assert_eq!(engine.pipeline().transforms.load(Ordering::SeqCst), 3);
        assert_eq!(engine.pipeline().loaded.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_abort_writes_no_output() {
        let engine = SantaEngine::new(StubPipeline::new(false), 5);
        let err = engine.run(&mut Scripted(vec![Decision::Abort])).await.unwrap_err();

        assert!(matches!(err, SantaError::Cancelled { .. }));
        assert!(engine.pipeline().loaded.lock().unwrap().is_empty());
        assert_eq!(engine.pipeline().debug_writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_round_cap() {
        let engine = SantaEngine::new(StubPipeline::new(false), 2);
        let err = engine
            .run(&mut Scripted(vec![Decision::Rematch, Decision::Rematch]))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("after 2 rounds"));
    }

    #[tokio::test]
    async fn test_unsatisfiable_keeps_debug_log_only() {
        let engine = SantaEngine::new(StubPipeline::new(true), 5);
        let err = engine.run(&mut Scripted(vec![])).await.unwrap_err();

        assert!(matches!(err, SantaError::ConstraintUnsatisfiable { .. }));
        assert!(engine.pipeline().loaded.lock().unwrap().is_empty());
        assert_eq!(engine.pipeline().debug_writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_inspect_summarizes_categories() {
        let engine = SantaEngine::new(StubPipeline::new(false), 5);
        let summary = engine.inspect().await.unwrap();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].families, 2);
        assert!(summary[0].blocker.is_none());
    }
}
