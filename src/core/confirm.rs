use crate::domain::model::Assignment;
use crate::utils::error::Result;
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accept,
    Rematch,
    Abort,
}

/// Shows a computed assignment to a person and collects their verdict.
pub trait Confirmer {
    fn review(&mut self, assignment: &Assignment) -> Result<Decision>;
}

/// Accepts whatever it is shown.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Confirmer for AutoConfirm {
    fn review(&mut self, assignment: &Assignment) -> Result<Decision> {
        tracing::info!("Auto-accepting {} matches", assignment.len());
        Ok(Decision::Accept)
    }
}

pub struct TerminalConfirmer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalConfirmer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl TerminalConfirmer<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirmer for TerminalConfirmer<R, W> {
    fn review(&mut self, assignment: &Assignment) -> Result<Decision> {
        writeln!(self.output, "\nGenerated Secret Santa matches:")?;
        for pair in assignment.pairs() {
            writeln!(self.output, "{} -> {}", pair.giver, pair.receiver)?;
        }

        loop {
            write!(self.output, "\nAre these matches okay? (Y/N/Q): ")?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                writeln!(self.output)?;
                return Ok(Decision::Abort);
            }

            match answer.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return Ok(Decision::Accept),
                "n" | "no" => {
                    writeln!(self.output, "Restarting the matching process...")?;
                    return Ok(Decision::Rematch);
                }
                "q" | "quit" => return Ok(Decision::Abort),
                _ => writeln!(self.output, "Invalid input. Please enter Y/y, N/n or Q/q.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Pair, Participant};
    use std::io::Cursor;

    fn sample() -> Assignment {
        let alice = Participant::new("a@example.com", "Alice", "A", "F1", "P");
        let bob = Participant::new("b@example.com", "Bob", "B", "F2", "P");
        Assignment::new(vec![
            Pair {
                giver: alice.clone(),
                receiver: bob.clone(),
            },
            Pair {
                giver: bob,
                receiver: alice,
            },
        ])
    }

    fn review(input: &str) -> (Decision, String) {
        let mut confirmer =
            TerminalConfirmer::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
        let decision = confirmer.review(&sample()).unwrap();
        (decision, String::from_utf8(confirmer.into_output()).unwrap())
    }

    #[test]
    fn test_accept_shows_pairs() {
        let (decision, shown) = review("Y\n");
        assert_eq!(decision, Decision::Accept);
        assert!(shown.contains("Alice A (a@example.com) -> Bob B (b@example.com)"));
    }

    #[test]
    fn test_reject_and_quit() {
        assert_eq!(review("n\n").0, Decision::Rematch);
        assert_eq!(review("q\n").0, Decision::Abort);
        assert_eq!(review("").0, Decision::Abort);
    }

    #[test]
    fn test_invalid_answer_asks_again() {
        let (decision, shown) = review("maybe\ny\n");
        assert_eq!(decision, Decision::Accept);
        assert!(shown.contains("Invalid input"));
        assert_eq!(shown.matches("Are these matches okay?").count(), 2);
    }

    #[test]
    fn test_auto_confirm() {
        assert_eq!(AutoConfirm.review(&sample()).unwrap(), Decision::Accept);
    }
}
