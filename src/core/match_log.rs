use crate::domain::model::Violation;

/// One step of a matching run, as seen by whoever is watching it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchEvent {
    CategoryStarted {
        category: String,
        participants: usize,
    },
    AttemptRejected {
        category: String,
        attempt: u32,
        seed: u64,
        violation: Violation,
    },
    CategoryMatched {
        category: String,
        attempt: u32,
        seed: u64,
    },
    CategoryFailed {
        category: String,
        attempts: u32,
        reason: String,
    },
}

/// Sink for match diagnostics. The matcher reports to it and never reads back.
pub trait MatchLog {
    fn record(&mut self, event: MatchEvent);
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl MatchLog for TracingLog {
    fn record(&mut self, event: MatchEvent) {
        match &event {
            MatchEvent::CategoryFailed { .. } => tracing::warn!("{}", describe(&event)),
            _ => tracing::debug!("{}", describe(&event)),
        }
    }
}

/// Keeps a readable transcript of every event so it can be written next to
/// the output file.
#[derive(Debug, Default, Clone)]
pub struct DebugLog {
    lines: Vec<String>,
}

impl DebugLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }
}

impl MatchLog for DebugLog {
    fn record(&mut self, event: MatchEvent) {
        TracingLog.record(event.clone());
        if let MatchEvent::CategoryStarted { .. } = event {
            self.lines.push(String::new());
        }
        self.lines.push(describe(&event));
    }
}

fn describe(event: &MatchEvent) -> String {
    match event {
        MatchEvent::CategoryStarted {
            category,
            participants,
        } => format!(
            "Starting matching for category: {} ({} participants)",
            category, participants
        ),
        MatchEvent::AttemptRejected {
            category,
            attempt,
            seed,
            violation,
        } => format!(
            "Attempt {} for category {} rejected (seed {}): {}",
            attempt, category, seed, violation
        ),
        MatchEvent::CategoryMatched {
            category,
            attempt,
            seed,
        } => format!(
            "Successfully matched category {} on attempt {} (seed {})",
            category, attempt, seed
        ),
        MatchEvent::CategoryFailed {
            category,
            attempts,
            reason,
        } => format!(
            "FAILED: Could not match category {} after {} attempts: {}",
            category, attempts, reason
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_log_transcript() {
        let mut log = DebugLog::new();
        log.record(MatchEvent::CategoryStarted {
            category: "kids".to_string(),
            participants: 3,
        });
        log.record(MatchEvent::AttemptRejected {
            category: "kids".to_string(),
            attempt: 1,
            seed: 42,
            violation: Violation::NoCandidate {
                giver: "a@x.com".to_string(),
            },
        });
        log.record(MatchEvent::CategoryMatched {
            category: "kids".to_string(),
            attempt: 2,
            seed: 7,
        });

        assert_eq!(log.lines().len(), 4);
        assert_eq!(log.lines()[0], "");
        assert!(log.lines()[1].contains("Starting matching for category: kids"));
        assert!(log.lines()[2].contains("seed 42"));
        assert!(log.lines()[2].contains("no receiver left for a@x.com"));
        assert!(log.render().ends_with("attempt 2 (seed 7)\n"));
    }

    #[test]
    fn test_empty_debug_log_renders_nothing() {
        assert_eq!(DebugLog::new().render(), "");
    }
}
