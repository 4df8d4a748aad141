use std::fmt;
use sweeptrace_core::Outcome;

use crate::{ProblemGenerator, ProblemSolver, Session};

/// One-line summary of where playback stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Status {
    /// Zero-based index of the active problem.
    pub problem: usize,
    pub problems: usize,
    pub applied: usize,
    pub total_moves: usize,
    pub outcome: Outcome,
    pub playing: bool,
}

impl Status {
    pub fn of<B: ProblemGenerator + ProblemSolver>(session: &Session<B>) -> Option<Self> {
        let problem = session.current_index()?;
        Some(Self {
            problem,
            problems: session.problems().len(),
            applied: session.move_position(),
            total_moves: session.total_moves(),
            outcome: session.outcome().unwrap_or_default(),
            playing: session.is_playing(),
        })
    }

    /// Share of the trace applied, in whole percent.
    pub fn progress(&self) -> usize {
        if self.total_moves == 0 {
            0
        } else {
            self.applied.min(self.total_moves) * 100 / self.total_moves
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Problem {}/{} · Move {} of {} ({}%) · {}",
            self.problem + 1,
            self.problems,
            self.applied,
            self.total_moves,
            self.progress(),
            self.outcome
        )?;
        if self.playing {
            f.write_str(" · playing")?;
        }
        Ok(())
    }
}

/// Status line followed by the displayed grid, or `None` before anything was generated.
pub fn frame<B: ProblemGenerator + ProblemSolver>(session: &Session<B>) -> Option<String> {
    let status = Status::of(session)?;
    let display = session.display()?;
    Some(format!("{status}\n{display}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_counts_from_one() {
        let status = Status {
            problem: 0,
            problems: 3,
            applied: 0,
            total_moves: 12,
            outcome: Outcome::Pending,
            playing: false,
        };

        assert_eq!(status.to_string(), "Problem 1/3 · Move 0 of 12 (0%) · PENDING");
    }

    #[test]
    fn status_marks_playback() {
        let status = Status {
            problem: 2,
            problems: 3,
            applied: 12,
            total_moves: 12,
            outcome: Outcome::Win,
            playing: true,
        };

        assert_eq!(status.to_string(), "Problem 3/3 · Move 12 of 12 (100%) · WIN · playing");
    }

    #[test]
    fn progress_rounds_down_and_handles_empty_traces() {
        let mut status = Status {
            problem: 0,
            problems: 1,
            applied: 1,
            total_moves: 3,
            outcome: Outcome::Lose,
            playing: false,
        };
        assert_eq!(status.progress(), 33);

        status.total_moves = 0;
        status.applied = 0;
        assert_eq!(status.progress(), 0);
        assert_eq!(status.to_string(), "Problem 1/1 · Move 0 of 0 (0%) · LOSE");
    }
}
