//! The problem collection and everything that moves it between states.
//!
//! A [`Session`] holds the generated problems, which one is active, and the [`Player`] replaying it. Generation and
//! processing go through the [`ProblemGenerator`] and [`ProblemSolver`] collaborators and either replace the
//! collection as a whole or leave it untouched.

use std::future;
use std::mem;
use std::time::Duration;
use sweeptrace_core::{DisplayGrid, GridError, MoveList, Outcome, Problem};
use sweeptrace_protocol::{GenerateRequest, ProblemResult, ProcessRequest, grid_of};

use crate::{Difficulty, Player, ProblemGenerator, ProblemSolver, SessionError, Settings, TickOutcome};

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateReport {
    pub generated: usize,
    /// Position in the generator response and why that grid was rejected.
    pub skipped: Vec<(usize, GridError)>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessReport {
    pub matched: usize,
    /// Problems that got no result and were reset to an empty pending trace.
    pub padded: usize,
    /// Results that matched no problem.
    pub unmatched: usize,
}

pub struct Session<B> {
    backend: B,
    settings: Settings,
    problems: Vec<Problem>,
    current: usize,
    /// Present exactly when `problems` is not empty.
    player: Option<Player>,
}

impl<B: ProblemGenerator + ProblemSolver> Session<B> {
    pub fn new(backend: B, settings: Settings) -> Self {
        Self {
            backend,
            settings: settings.normalized(),
            problems: Vec::new(),
            current: 0,
            player: None,
        }
    }

    /// Replaces the collection with freshly generated problems and shows the first one.
    pub async fn generate(&mut self) -> Result<GenerateReport> {
        self.pause();

        let request = GenerateRequest {
            difficulty: self.settings.difficulty.name().to_owned(),
            count: self.settings.count,
        };
        log::info!("generating {} {} problem(s)", request.count, request.difficulty);
        let response = self.backend.generate(&request).await?;

        let requested = request.count as usize;
        let returned = response.problems.len();
        if returned < requested {
            return Err(SessionError::TooFewProblems { requested, returned });
        }
        if returned > requested {
            log::warn!(
                "asked for {} problems, generator returned {}, keeping the first {}",
                requested,
                returned,
                requested
            );
        }

        let mut problems = Vec::with_capacity(requested);
        let mut skipped = Vec::new();
        for (index, generated) in response.problems.iter().take(requested).enumerate() {
            match grid_of(generated) {
                Ok(grid) => {
                    let problem = Problem::new(problems.len() as u32, grid);
                    log::debug!(
                        "problem {} is {}x{} with {} mines",
                        problem.id(),
                        problem.grid().cols(),
                        problem.grid().rows(),
                        problem.grid().mine_count()
                    );
                    problems.push(problem);
                }
                Err(err) => {
                    log::warn!("dropping generated problem #{}: {}", index, err);
                    skipped.push((index, err));
                }
            }
        }

        if problems.is_empty() {
            let Some(&(index, source)) = skipped.first() else {
                return Err(SessionError::TooFewProblems { requested, returned });
            };
            return Err(SessionError::MalformedGrid { index, source });
        }

        let report = GenerateReport {
            generated: problems.len(),
            skipped,
        };
        self.replace_problems(problems);
        log::info!("generated {} problem(s)", report.generated);
        Ok(report)
    }

    /// Runs the solver over the whole collection and attaches its traces.
    pub async fn process(&mut self) -> Result<ProcessReport> {
        if self.problems.is_empty() {
            return Err(SessionError::NoProblems);
        }
        self.pause();

        let request = ProcessRequest::from_problems(&self.problems);
        log::info!("processing {} problem(s)", request.problems.len());
        let response = self.backend.process(&request).await?;

        let problems = self.problems.len();
        let results = response.results.len();
        if results != problems {
            if self.settings.strict_results {
                return Err(SessionError::ResultCountMismatch { problems, results });
            }
            log::warn!("solver returned {} results for {} problems", results, problems);
        }

        let (slots, report) = reconcile(&self.problems, response.results);
        let resolved = mem::take(&mut self.problems)
            .into_iter()
            .zip(slots)
            .map(|(problem, result)| match result {
                Some(result) => {
                    let moves = result.move_list();
                    if moves.hole_count() > 0 {
                        log::warn!(
                            "problem {}: {} of {} moves unreadable, they will be skipped",
                            problem.id(),
                            moves.hole_count(),
                            moves.len()
                        );
                    }
                    let outcome = result.outcome();
                    problem.resolve(moves, outcome)
                }
                None => problem.resolve(MoveList::new(), Outcome::Pending),
            })
            .collect();
        self.replace_problems(resolved);

        if report.padded > 0 {
            log::warn!("{} problem(s) got no result and stay pending", report.padded);
        }
        log::info!("processed {} problem(s)", report.matched);
        Ok(report)
    }

    /// Generates first when there is nothing to process yet.
    pub async fn generate_and_process(&mut self) -> Result<(Option<GenerateReport>, ProcessReport)> {
        let generated = if self.problems.is_empty() {
            Some(self.generate().await?)
        } else {
            None
        };
        let processed = self.process().await?;
        Ok((generated, processed))
    }

    pub fn select_problem(&mut self, index: usize) -> Result<()> {
        let len = self.problems.len();
        let (Some(problem), Some(player)) = (self.problems.get(index), self.player.as_mut()) else {
            return Err(SessionError::NoSuchProblem { index, len });
        };
        player.load(problem);
        self.current = index;
        log::debug!("selected problem {} of {}", index + 1, len);
        Ok(())
    }

    pub fn play(&mut self) -> Result<()> {
        let (Some(problem), Some(player)) = (self.problems.get(self.current), self.player.as_mut()) else {
            return Err(SessionError::NoProblems);
        };
        player.play(problem);
        Ok(())
    }

    /// Returns whether playback was running.
    pub fn pause(&mut self) -> bool {
        self.player.as_mut().is_some_and(Player::pause)
    }

    pub fn next(&mut self) -> Option<usize> {
        let problem = self.problems.get(self.current)?;
        self.player.as_mut()?.next(problem)
    }

    pub fn previous(&mut self) -> bool {
        match (self.problems.get(self.current), self.player.as_mut()) {
            (Some(problem), Some(player)) => player.previous(problem),
            _ => false,
        }
    }

    /// Shows the active problem with moves up to `target` applied, `None` for the initial grid.
    pub fn seek(&mut self, target: Option<usize>) {
        if let (Some(problem), Some(player)) = (self.problems.get(self.current), self.player.as_mut()) {
            player.seek(problem, target);
        }
    }

    /// Waits for the next playback tick and applies it. Never resolves while nothing is playing.
    pub async fn tick(&mut self) -> TickOutcome {
        match (self.problems.get(self.current), self.player.as_mut()) {
            (Some(problem), Some(player)) => player.tick(problem).await,
            _ => future::pending().await,
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.difficulty = difficulty;
    }

    pub fn set_count(&mut self, count: u32) {
        self.settings.set_count(count);
    }

    pub fn set_speed(&mut self, speed: u8) {
        self.settings.set_speed(speed);
        self.apply_cadence();
    }

    /// Fixes the tick delay, or goes back to deriving it from the speed with `None`.
    pub fn set_cadence(&mut self, cadence: Option<Duration>) {
        self.settings.cadence_ms = cadence.map(|cadence| {
            u64::try_from(cadence.as_millis()).unwrap_or(u64::MAX)
        });
        self.apply_cadence();
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.problems.is_empty()).then_some(self.current)
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.problems.get(self.current)
    }

    pub fn display(&self) -> Option<&DisplayGrid> {
        self.player.as_ref().map(|player| player.replay().display())
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.current_problem().map(Problem::outcome)
    }

    /// Number of moves applied on the active problem.
    pub fn move_position(&self) -> usize {
        self.player.as_ref().map_or(0, |player| player.replay().applied())
    }

    pub fn total_moves(&self) -> usize {
        self.current_problem().map_or(0, Problem::total_moves)
    }

    pub fn is_playing(&self) -> bool {
        self.player.as_ref().is_some_and(Player::is_playing)
    }

    fn replace_problems(&mut self, problems: Vec<Problem>) {
        self.problems = problems;
        self.current = 0;
        self.player = self
            .problems
            .first()
            .map(|problem| Player::new(problem, self.settings.cadence()));
    }

    fn apply_cadence(&mut self) {
        let cadence = self.settings.cadence();
        if let Some(player) = self.player.as_mut() {
            player.set_cadence(cadence);
        }
    }
}

/// Lines solver results up with the problems they belong to.
///
/// Results carrying an id go to the problem with that id, the others to the problem at their own position. Each
/// problem takes at most one result.
fn reconcile(
    problems: &[Problem],
    results: Vec<Option<ProblemResult>>,
) -> (Vec<Option<ProblemResult>>, ProcessReport) {
    let mut slots: Vec<Option<ProblemResult>> = vec![None; problems.len()];
    let mut report = ProcessReport::default();
    let mut positional = Vec::new();

    for (position, result) in results.into_iter().enumerate() {
        let Some(result) = result else {
            continue;
        };
        match result.id {
            Some(id) => match problems.iter().position(|problem| problem.id() == id) {
                Some(index) if slots[index].is_none() => slots[index] = Some(result),
                Some(_) => {
                    log::warn!("duplicate result for problem {}", id);
                    report.unmatched += 1;
                }
                None => {
                    log::warn!("result for unknown problem {}", id);
                    report.unmatched += 1;
                }
            },
            None => positional.push((position, result)),
        }
    }

    for (position, result) in positional {
        match slots.get_mut(position) {
            Some(slot @ None) => *slot = Some(result),
            _ => {
                log::warn!("result #{} matches no problem", position);
                report.unmatched += 1;
            }
        }
    }

    report.matched = slots.iter().filter(|slot| slot.is_some()).count();
    report.padded = slots.len() - report.matched;
    (slots, report)
}
