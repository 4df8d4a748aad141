//! Timed playback of a solver trace.
//!
//! [`PlaybackScheduler`] owns the only tick source a player has. Starting replaces it and stopping drops it, so a
//! second timer can never be running and no tick can arrive once `stop` has returned.

use std::future;
use std::time::Duration;
use sweeptrace_core::{Problem, ReplayState, Visibility};
use tokio::time::{Instant, Interval, MissedTickBehavior};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
}

#[derive(Debug)]
pub struct PlaybackScheduler {
    cadence: Duration,
    ticker: Option<Interval>,
}

impl PlaybackScheduler {
    /// Tokio intervals cannot have a zero period.
    pub const MIN_CADENCE: Duration = Duration::from_millis(1);

    pub fn new(cadence: Duration) -> Self {
        Self {
            cadence: cadence.max(Self::MIN_CADENCE),
            ticker: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        if self.ticker.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Stopped
        }
    }

    pub fn is_playing(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn cadence(&self) -> Duration {
        self.cadence
    }

    /// Starts ticking one cadence from now, dropping any ticker that was already running.
    pub fn start(&mut self) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.cadence, self.cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        if self.ticker.replace(ticker).is_some() {
            log::debug!("restarted playback ticker");
        }
    }

    /// Cancels the ticker, returning whether playback was running.
    pub fn stop(&mut self) -> bool {
        self.ticker.take().is_some()
    }

    pub fn set_cadence(&mut self, cadence: Duration) {
        self.cadence = cadence.max(Self::MIN_CADENCE);
        if self.is_playing() {
            self.start();
        }
    }

    /// Waits for the next tick. Never resolves while stopped.
    ///
    /// Cancel safe: dropping the future before it resolves loses no tick.
    pub async fn tick(&mut self) {
        match self.ticker.as_mut() {
            Some(ticker) => {
                ticker.tick().await;
            }
            None => future::pending().await,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Applied the move at this index.
    Advanced(usize),
    /// The trace was already at its end and playback stopped.
    Finished,
}

/// Replay cursor of the active problem together with the scheduler that advances it.
#[derive(Debug)]
pub struct Player {
    replay: ReplayState,
    scheduler: PlaybackScheduler,
}

impl Player {
    pub fn new(problem: &Problem, cadence: Duration) -> Self {
        Self {
            replay: ReplayState::new(problem),
            scheduler: PlaybackScheduler::new(cadence),
        }
    }

    pub fn replay(&self) -> &ReplayState {
        &self.replay
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.state() == PlaybackState::Playing
    }

    /// Stops playback and shows `problem` from its initial grid.
    pub fn load(&mut self, problem: &Problem) {
        self.scheduler.stop();
        self.replay.reset(problem);
    }

    /// Starts playback, rewinding first when the cursor already sits on the last move.
    pub fn play(&mut self, problem: &Problem) {
        if self.replay.problem_id() != problem.id() || self.replay.is_at_end(problem) {
            self.replay.reset(problem);
        }
        self.scheduler.start();
        log::debug!(
            "playing problem {} from move {} of {}",
            problem.id(),
            self.replay.applied(),
            problem.total_moves()
        );
    }

    pub fn pause(&mut self) -> bool {
        self.scheduler.stop()
    }

    pub fn set_cadence(&mut self, cadence: Duration) {
        self.scheduler.set_cadence(cadence);
    }

    /// Handles one tick: apply the next move, or stop once there is none.
    pub fn on_tick(&mut self, problem: &Problem) -> TickOutcome {
        match self.replay.step_forward(problem) {
            Some(index) => TickOutcome::Advanced(index),
            None => {
                self.scheduler.stop();
                let display = self.replay.display();
                log::debug!(
                    "playback of problem {} finished, {} revealed, {} flagged, {} exploded",
                    problem.id(),
                    display.count(Visibility::Revealed),
                    display.count(Visibility::Flagged),
                    display.count(Visibility::Exploded)
                );
                TickOutcome::Finished
            }
        }
    }

    /// Waits for the next tick and handles it. Cancel safe.
    pub async fn tick(&mut self, problem: &Problem) -> TickOutcome {
        self.scheduler.tick().await;
        self.on_tick(problem)
    }

    pub fn next(&mut self, problem: &Problem) -> Option<usize> {
        self.replay.step_forward(problem)
    }

    pub fn previous(&mut self, problem: &Problem) -> bool {
        self.replay.step_backward(problem)
    }

    pub fn seek(&mut self, problem: &Problem, target: Option<usize>) {
        self.replay.seek(problem, target);
    }
}
